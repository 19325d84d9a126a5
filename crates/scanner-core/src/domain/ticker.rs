//! 종목 메타데이터.
//!
//! 데이터 수집기가 선택적으로 제공하는 정보로, 결과 레코드를 꾸미는 용도로만
//! 사용되며 분류/점수에는 영향을 주지 않습니다.

use serde::{Deserialize, Serialize};

/// 종목 부가 정보.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickerMetadata {
    /// 종목명
    pub name: Option<String>,
    /// 발행 주식 수
    pub shares_outstanding: Option<u64>,
    /// 유통 주식 수
    pub float_shares: Option<u64>,
}

impl TickerMetadata {
    /// 유통 주식 수로 메타데이터를 생성합니다.
    pub fn with_float(float_shares: u64) -> Self {
        Self {
            float_shares: Some(float_shares),
            ..Default::default()
        }
    }

    /// 평균 거래량이 유통 주식에서 차지하는 비율 (%).
    ///
    /// 유통 주식 수가 없거나 0이면 `None`.
    pub fn effective_volume_pct(&self, avg_volume: Option<f64>) -> Option<f64> {
        let float_shares = self.float_shares.filter(|f| *f > 0)? as f64;
        avg_volume.map(|v| v / float_shares * 100.0)
    }
}
