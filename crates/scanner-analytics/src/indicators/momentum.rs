//! 모멘텀 지표 (Momentum Indicators).
//!
//! - RSI (Relative Strength Index, Wilder 평활)

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{IndicatorError, IndicatorResult};

/// RSI 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RsiParams {
    /// RSI 기간 (기본: 14).
    pub period: usize,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// 모멘텀 지표 계산기.
#[derive(Debug, Default)]
pub struct MomentumCalculator;

impl MomentumCalculator {
    /// 새로운 모멘텀 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// RSI (Relative Strength Index) 계산.
    ///
    /// RSI = 100 - (100 / (1 + RS))
    /// RS = 평균 상승폭 / 평균 하락폭
    ///
    /// Wilder 평활: 첫 평균은 처음 period개 변화의 단순 평균이고,
    /// 이후 `avg = (이전 avg × (n-1) + 현재값) / n` 입니다.
    ///
    /// # 반환
    /// 인덱스 period부터 0~100 사이 값. 상승/하락이 모두 0이면 None.
    pub fn rsi(&self, prices: &[Decimal], params: RsiParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;

        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "기간은 0보다 커야 합니다".to_string(),
            ));
        }

        if prices.len() < period + 1 {
            return Err(IndicatorError::InsufficientData {
                required: period + 1,
                provided: prices.len(),
            });
        }

        // 상승/하락 분리 (인덱스 0은 변화 없음)
        let mut gains = vec![Decimal::ZERO; prices.len()];
        let mut losses = vec![Decimal::ZERO; prices.len()];
        for i in 1..prices.len() {
            let delta = prices[i] - prices[i - 1];
            if delta > Decimal::ZERO {
                gains[i] = delta;
            } else {
                losses[i] = delta.abs();
            }
        }

        let avg_gains = self.wilder_average(&gains, period);
        let avg_losses = self.wilder_average(&losses, period);

        let result = avg_gains
            .iter()
            .zip(avg_losses.iter())
            .map(|pair| match pair {
                (Some(gain), Some(loss)) => Self::rsi_from_averages(*gain, *loss),
                _ => None,
            })
            .collect();

        Ok(result)
    }

    fn rsi_from_averages(gain: Decimal, loss: Decimal) -> Option<Decimal> {
        if loss == Decimal::ZERO {
            if gain == Decimal::ZERO {
                None
            } else {
                Some(dec!(100))
            }
        } else {
            let rs = gain / loss;
            Some(dec!(100) - (dec!(100) / (Decimal::ONE + rs)))
        }
    }

    /// Wilder 평활 평균. `values[0]`은 변화가 없는 자리이므로 제외합니다.
    fn wilder_average(&self, values: &[Decimal], period: usize) -> Vec<Option<Decimal>> {
        let mut result = vec![None; values.len()];
        let period_dec = Decimal::from(period);

        let seed: Decimal = values[1..=period].iter().sum();
        let mut avg = seed / period_dec;
        result[period] = Some(avg);

        for i in (period + 1)..values.len() {
            avg = (avg * (period_dec - Decimal::ONE) + values[i]) / period_dec;
            result[i] = Some(avg);
        }

        result
    }
}
