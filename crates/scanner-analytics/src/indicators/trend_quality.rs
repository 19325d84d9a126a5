//! 추세 품질 지표.
//!
//! 최근 구간 하나에 대해 스칼라 값을 계산합니다.
//! - **Efficiency Ratio** (Kaufman): 순 이동 / 총 이동 경로, 0~1
//! - **Choppiness Index**: `100 × log10(ΣTR / (최고가 - 최저가)) / log10(n)`, 낮을수록 매끄러운 추세
//! - **평활 괴리율**: 가우시안 평활선 대비 종가의 평균 괴리 (%)
//!
//! 분모가 0인 경우(가격 변동 없음)는 에러가 아니라 "계산되지 않음"(None)입니다.

use rust_decimal::Decimal;
use scanner_core::DecimalExt;
use serde::{Deserialize, Serialize};

use super::smoothing::{GaussianParams, GaussianSmoother};
use super::trend::true_range;
use super::{IndicatorError, IndicatorResult};

/// 추세 품질 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrendQualityParams {
    /// 계산 구간 (기본: 60).
    pub lookback: usize,
    /// 최소 봉 수 (기본: 20). 구간은 `min(lookback, 시계열 길이)`입니다.
    pub min_bars: usize,
    /// 괴리율 계산용 가우시안 시그마 (기본: 5.0).
    pub sigma: f64,
}

impl Default for TrendQualityParams {
    fn default() -> Self {
        Self {
            lookback: 60,
            min_bars: 20,
            sigma: 5.0,
        }
    }
}

/// 추세 품질 결과.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendQuality {
    /// 사용한 봉 수
    pub bars: usize,
    /// Efficiency Ratio (0~1)
    pub efficiency_ratio: Option<f64>,
    /// Choppiness Index
    pub choppiness_index: Option<f64>,
    /// 평활선 대비 평균 괴리율 (%)
    pub deviation_pct: Option<f64>,
    /// 세 지표를 합친 0~1 품질 (1 = 가장 매끄러움)
    pub composite: Option<f64>,
}

impl TrendQuality {
    /// 합성 품질을 0~10 등급으로 변환합니다.
    pub fn grade(&self) -> Option<u8> {
        self.composite.map(|c| match c {
            c if c >= 0.70 => 10,
            c if c >= 0.55 => 7,
            c if c >= 0.40 => 4,
            c if c >= 0.25 => 2,
            _ => 0,
        })
    }
}

/// 추세 품질 계산기.
#[derive(Debug, Default)]
pub struct TrendQualityCalculator {
    smoother: GaussianSmoother,
}

impl TrendQualityCalculator {
    /// 새로운 계산기 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 최근 구간의 추세 품질을 계산합니다.
    pub fn calculate(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: TrendQualityParams,
    ) -> IndicatorResult<TrendQuality> {
        let len = high.len().min(low.len()).min(close.len());

        if params.min_bars < 2 {
            return Err(IndicatorError::InvalidParameter(
                "최소 봉 수는 2 이상이어야 합니다".to_string(),
            ));
        }

        let n = params.lookback.min(len);
        if n < params.min_bars {
            return Err(IndicatorError::InsufficientData {
                required: params.min_bars,
                provided: len,
            });
        }

        let start = len - n;
        let high = &high[start..len];
        let low = &low[start..len];
        let close = &close[start..len];

        let efficiency_ratio = Self::efficiency_ratio(close);
        let choppiness_index = Self::choppiness_index(high, low, close);

        let closes_f64: Vec<f64> = close.iter().map(|c| c.to_f64_lossy()).collect();
        let smoothed = self.smoother.filter(
            &closes_f64,
            GaussianParams {
                sigma: params.sigma,
            },
        )?;
        let deviation_pct = Self::average_deviation_pct(&closes_f64, &smoothed);

        let composite = match (efficiency_ratio, choppiness_index, deviation_pct) {
            (Some(er), Some(ci), Some(dev)) => {
                let ci_score = ((62.0 - ci) / 24.0).clamp(0.0, 1.0);
                let dev_score = ((3.0 - dev) / 3.0).clamp(0.0, 1.0);
                Some(er * 0.4 + ci_score * 0.4 + dev_score * 0.2)
            }
            _ => None,
        };

        Ok(TrendQuality {
            bars: n,
            efficiency_ratio,
            choppiness_index,
            deviation_pct,
            composite,
        })
    }

    /// |마지막 종가 - 첫 종가| / Σ|일간 변화|.
    fn efficiency_ratio(close: &[Decimal]) -> Option<f64> {
        let first = close.first()?;
        let last = close.last()?;

        let path: Decimal = close.windows(2).map(|w| (w[1] - w[0]).abs()).sum();
        if path == Decimal::ZERO {
            return None;
        }

        Some(((*last - *first).abs() / path).to_f64_lossy())
    }

    /// 구간 내 TR 합과 고저 범위로 계산한 Choppiness Index.
    fn choppiness_index(high: &[Decimal], low: &[Decimal], close: &[Decimal]) -> Option<f64> {
        let n = close.len();
        if n < 2 {
            return None;
        }

        let tr_sum: Decimal = (1..n).map(|i| true_range(high[i], low[i], close[i - 1])).sum();
        let max_high = high.iter().max()?;
        let min_low = low.iter().min()?;
        let range = *max_high - *min_low;

        if range <= Decimal::ZERO || tr_sum <= Decimal::ZERO {
            return None;
        }

        let ratio = tr_sum.to_f64_lossy() / range.to_f64_lossy();
        Some(100.0 * ratio.log10() / (n as f64).log10())
    }

    fn average_deviation_pct(close: &[f64], smoothed: &[f64]) -> Option<f64> {
        let deviations: Vec<f64> = close
            .iter()
            .zip(smoothed.iter())
            .filter(|(_, s)| **s > 0.0)
            .map(|(c, s)| (c - s).abs() / s * 100.0)
            .collect();

        if deviations.is_empty() {
            return None;
        }

        Some(deviations.iter().sum::<f64>() / deviations.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ohlc_from(closes: &[Decimal], spread: Decimal) -> (Vec<Decimal>, Vec<Decimal>) {
        let high = closes.iter().map(|c| *c + spread).collect();
        let low = closes.iter().map(|c| *c - spread).collect();
        (high, low)
    }

    #[test]
    fn test_straight_line_is_efficient() {
        let calc = TrendQualityCalculator::new();
        let close: Vec<Decimal> = (0..60).map(|i| Decimal::from(100 + i)).collect();
        let (high, low) = ohlc_from(&close, dec!(0.5));

        let quality = calc
            .calculate(&high, &low, &close, TrendQualityParams::default())
            .unwrap();

        assert_eq!(quality.bars, 60);
        assert!((quality.efficiency_ratio.unwrap() - 1.0).abs() < 1e-12);
        // ΣTR = 59 × 1.5, 범위 = 60 → CI = 100 × log10(1.475) / log10(60)
        let expected_ci = 100.0 * (88.5f64 / 60.0).log10() / 60f64.log10();
        assert!((quality.choppiness_index.unwrap() - expected_ci).abs() < 1e-9);
        assert!(quality.deviation_pct.unwrap() < 1.0);
    }

    #[test]
    fn test_oscillation_is_inefficient() {
        let calc = TrendQualityCalculator::new();
        let close: Vec<Decimal> = (0..60)
            .map(|i| if i % 2 == 0 { dec!(100) } else { dec!(101) })
            .collect();
        let (high, low) = ohlc_from(&close, dec!(0.5));

        let quality = calc
            .calculate(&high, &low, &close, TrendQualityParams::default())
            .unwrap();

        // 순 이동 1, 총 경로 59
        assert!((quality.efficiency_ratio.unwrap() - 1.0 / 59.0).abs() < 1e-12);
        assert!(quality.choppiness_index.unwrap() > 58.0);
    }

    #[test]
    fn test_flat_window_not_computed() {
        let calc = TrendQualityCalculator::new();
        let close = vec![dec!(100); 40];
        let (high, low) = ohlc_from(&close, Decimal::ZERO);

        let quality = calc
            .calculate(&high, &low, &close, TrendQualityParams::default())
            .unwrap();

        assert_eq!(quality.bars, 40);
        assert_eq!(quality.efficiency_ratio, None);
        assert_eq!(quality.choppiness_index, None);
        assert_eq!(quality.composite, None);
        assert!(quality.deviation_pct.unwrap() < 1e-9);
    }

    #[test]
    fn test_short_history_rejected() {
        let calc = TrendQualityCalculator::new();
        let close = vec![dec!(100); 19];
        let result = calc.calculate(&close, &close, &close, TrendQualityParams::default());
        assert!(matches!(result, Err(IndicatorError::InsufficientData { .. })));
    }

    #[test]
    fn test_grade_thresholds() {
        let quality = |c: f64| TrendQuality {
            composite: Some(c),
            ..Default::default()
        };
        assert_eq!(quality(0.70).grade(), Some(10));
        assert_eq!(quality(0.69).grade(), Some(7));
        assert_eq!(quality(0.40).grade(), Some(4));
        assert_eq!(quality(0.1).grade(), Some(0));
        assert_eq!(TrendQuality::default().grade(), None);
    }
}
