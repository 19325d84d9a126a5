//! 일봉 데이터와 검증된 가격 시계열.
//!
//! - `DailyBar` - 하루치 OHLCV 레코드
//! - `PriceSeries` - 날짜 오름차순으로 검증된 일봉 시계열

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ScannerError, ScannerResult};
use crate::types::{DecimalExt, Price, Volume};

/// 일봉 OHLCV 데이터.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    /// 거래일
    pub date: NaiveDate,
    /// 시가
    pub open: Price,
    /// 고가
    pub high: Price,
    /// 저가
    pub low: Price,
    /// 종가
    pub close: Price,
    /// 거래량 (주식 수)
    pub volume: Volume,
}

impl DailyBar {
    /// 새 일봉을 생성합니다.
    pub fn new(
        date: NaiveDate,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: Volume,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// 단일 봉의 OHLCV 불변식 검사. 위반 시 사유를 반환합니다.
    fn violation(&self) -> Option<String> {
        if !self.close.is_strictly_positive() {
            return Some(format!("종가는 양수여야 합니다: {}", self.close));
        }
        if self.low.is_strictly_negative() {
            return Some(format!("저가는 음수일 수 없습니다: {}", self.low));
        }
        if self.volume.is_strictly_negative() {
            return Some(format!("거래량은 음수일 수 없습니다: {}", self.volume));
        }

        let body_high = self.open.max(self.close);
        let body_low = self.open.min(self.close);

        if self.high < body_high {
            return Some(format!(
                "고가가 시가/종가보다 낮습니다: high={}, max(open, close)={}",
                self.high, body_high
            ));
        }
        if body_low < self.low {
            return Some(format!(
                "저가가 시가/종가보다 높습니다: low={}, min(open, close)={}",
                self.low, body_low
            ));
        }

        None
    }
}

/// 검증된 일봉 시계열.
///
/// 생성 시점에 다음을 보장합니다:
/// - 비어 있지 않음
/// - 날짜가 엄격하게 오름차순
/// - `high ≥ max(open, close) ≥ min(open, close) ≥ low ≥ 0`, `close > 0`, `volume ≥ 0`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    bars: Vec<DailyBar>,
}

impl PriceSeries {
    /// 일봉 목록을 검증하여 시계열을 생성합니다.
    pub fn new(bars: Vec<DailyBar>) -> ScannerResult<Self> {
        if bars.is_empty() {
            return Err(ScannerError::EmptySeries);
        }

        for (index, bar) in bars.iter().enumerate() {
            if index > 0 && bar.date <= bars[index - 1].date {
                return Err(ScannerError::MalformedSeries {
                    index,
                    reason: format!(
                        "날짜가 오름차순이 아닙니다: {} 다음 {}",
                        bars[index - 1].date,
                        bar.date
                    ),
                });
            }

            if let Some(reason) = bar.violation() {
                return Err(ScannerError::MalformedSeries { index, reason });
            }
        }

        Ok(Self { bars })
    }

    /// 전체 일봉.
    pub fn bars(&self) -> &[DailyBar] {
        &self.bars
    }

    /// 세션 수.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// 검증된 시계열은 비어 있을 수 없으므로 항상 `false`.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// 최근 일봉.
    pub fn latest(&self) -> &DailyBar {
        // 생성자가 비어 있지 않음을 보장
        &self.bars[self.bars.len() - 1]
    }

    /// 최근 거래일.
    pub fn as_of(&self) -> NaiveDate {
        self.latest().date
    }

    /// 종가 목록.
    pub fn closes(&self) -> Vec<Decimal> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// 고가 목록.
    pub fn highs(&self) -> Vec<Decimal> {
        self.bars.iter().map(|b| b.high).collect()
    }

    /// 저가 목록.
    pub fn lows(&self) -> Vec<Decimal> {
        self.bars.iter().map(|b| b.low).collect()
    }

    /// 거래량 목록.
    pub fn volumes(&self) -> Vec<Decimal> {
        self.bars.iter().map(|b| b.volume).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(offset)
    }

    fn bar(offset: i64, close: Decimal) -> DailyBar {
        DailyBar::new(
            day(offset),
            close,
            close + dec!(1),
            close - dec!(1),
            close,
            dec!(1000000),
        )
    }

    #[test]
    fn test_valid_series() {
        let series = PriceSeries::new(vec![bar(0, dec!(100)), bar(1, dec!(101))]).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.latest().close, dec!(101));
        assert_eq!(series.as_of(), day(1));
        assert_eq!(series.closes(), vec![dec!(100), dec!(101)]);
    }

    #[test]
    fn test_empty_series_rejected() {
        let err = PriceSeries::new(vec![]).unwrap_err();
        assert!(matches!(err, ScannerError::EmptySeries));
    }

    #[test]
    fn test_non_monotonic_dates_rejected() {
        let err = PriceSeries::new(vec![bar(1, dec!(100)), bar(1, dec!(101))]).unwrap_err();
        assert!(matches!(err, ScannerError::MalformedSeries { index: 1, .. }));

        let err = PriceSeries::new(vec![bar(2, dec!(100)), bar(1, dec!(101))]).unwrap_err();
        assert!(err.is_malformed_input());
    }

    #[test]
    fn test_high_below_low_rejected() {
        let mut bad = bar(1, dec!(100));
        bad.high = dec!(98);
        let err = PriceSeries::new(vec![bar(0, dec!(100)), bad]).unwrap_err();
        assert!(matches!(err, ScannerError::MalformedSeries { index: 1, .. }));
    }

    #[test]
    fn test_negative_volume_rejected() {
        let mut bad = bar(0, dec!(100));
        bad.volume = dec!(-1);
        assert!(PriceSeries::new(vec![bad]).is_err());
    }

    #[test]
    fn test_non_positive_close_rejected() {
        let bad = DailyBar::new(day(0), dec!(0), dec!(0), dec!(0), dec!(0), dec!(10));
        let err = PriceSeries::new(vec![bad]).unwrap_err();
        assert!(matches!(err, ScannerError::MalformedSeries { index: 0, .. }));

        // 앞선 봉이 정상이어도 0 종가가 있으면 거부
        let mut bars = vec![bar(0, dec!(100)), bar(1, dec!(101))];
        bars.push(DailyBar::new(day(2), dec!(1), dec!(1), dec!(0), dec!(0), dec!(10)));
        let err = PriceSeries::new(bars).unwrap_err();
        assert!(matches!(err, ScannerError::MalformedSeries { index: 2, .. }));
    }

    #[test]
    fn test_open_outside_range_rejected() {
        let mut bad = bar(0, dec!(100));
        bad.open = dec!(102);
        let err = PriceSeries::new(vec![bad]).unwrap_err();
        assert!(err.to_string().contains("고가"));
    }

    proptest! {
        #[test]
        fn prop_well_formed_bars_accepted(
            closes in proptest::collection::vec(1u32..10_000, 1..100)
        ) {
            let bars: Vec<DailyBar> = closes
                .iter()
                .enumerate()
                .map(|(i, c)| bar(i as i64, Decimal::from(*c) + dec!(1)))
                .collect();

            let series = PriceSeries::new(bars).unwrap();
            prop_assert_eq!(series.len(), closes.len());
        }
    }
}
