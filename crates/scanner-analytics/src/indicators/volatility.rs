//! 변동성 지표 (Volatility Indicators).
//!
//! 가격 변동성을 측정하는 지표들을 제공합니다.
//! - Bollinger Bands (볼린저 밴드)
//! - ATR (Average True Range, 평균 실제 범위)
//! - 연환산 변동성 (일간 로그 수익률 표준편차 기반)

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use scanner_core::DecimalExt;
use serde::{Deserialize, Serialize};

use super::trend::true_range;
use super::{IndicatorError, IndicatorResult};

/// 볼린저 밴드 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BollingerBandsParams {
    /// 이동평균 기간 (기본: 20).
    pub period: usize,
    /// 표준편차 배수 (기본: 2.0).
    pub std_dev_multiplier: Decimal,
}

impl Default for BollingerBandsParams {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: dec!(2.0),
        }
    }
}

/// 볼린저 밴드 결과.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BollingerBandsResult {
    /// 상단 밴드 (MA + k × σ).
    pub upper: Option<Decimal>,
    /// 중간 밴드 (이동평균).
    pub middle: Option<Decimal>,
    /// 하단 밴드 (MA - k × σ).
    pub lower: Option<Decimal>,
    /// %B 지표 ((현재가 - 하단) / (상단 - 하단)).
    pub percent_b: Option<Decimal>,
    /// 밴드 폭 ((상단 - 하단) / 중간).
    pub bandwidth: Option<Decimal>,
}

/// ATR 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AtrParams {
    /// ATR 기간 (기본: 14).
    pub period: usize,
}

impl Default for AtrParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// 연환산 변동성 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HistoricalVolatilityParams {
    /// 수익률 윈도우 (기본: 20).
    pub window: usize,
    /// 연환산 거래일 수 (기본: 252).
    pub trading_days: f64,
}

impl Default for HistoricalVolatilityParams {
    fn default() -> Self {
        Self {
            window: 20,
            trading_days: 252.0,
        }
    }
}

/// 변동성 지표 계산기.
#[derive(Debug, Default)]
pub struct VolatilityIndicators;

impl VolatilityIndicators {
    /// 새로운 변동성 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 볼린저 밴드 계산.
    ///
    /// 중간 밴드 = SMA(period), 밴드 = 중간 ± k × 표본 표준편차(n-1).
    pub fn bollinger_bands(
        &self,
        prices: &[Decimal],
        params: BollingerBandsParams,
    ) -> IndicatorResult<Vec<BollingerBandsResult>> {
        let period = params.period;

        if period < 2 {
            return Err(IndicatorError::InvalidParameter(
                "볼린저 밴드 기간은 2 이상이어야 합니다".to_string(),
            ));
        }

        if prices.len() < period {
            return Err(IndicatorError::InsufficientData {
                required: period,
                provided: prices.len(),
            });
        }

        let mut result = Vec::with_capacity(prices.len());
        let period_decimal = Decimal::from(period);
        let dof = Decimal::from(period - 1);

        for i in 0..prices.len() {
            if i < period - 1 {
                result.push(BollingerBandsResult::default());
                continue;
            }

            let window = &prices[i + 1 - period..=i];
            let ma = window.iter().sum::<Decimal>() / period_decimal;

            let variance: Decimal = window
                .iter()
                .map(|&p| {
                    let diff = p - ma;
                    diff * diff
                })
                .sum::<Decimal>()
                / dof;

            let std_dev = variance.sqrt().ok_or_else(|| {
                IndicatorError::CalculationError(format!("표준편차 계산 실패: {}", variance))
            })?;

            let deviation = params.std_dev_multiplier * std_dev;
            let upper = ma + deviation;
            let lower = ma - deviation;

            let percent_b = if upper != lower {
                Some((prices[i] - lower) / (upper - lower))
            } else {
                Some(dec!(0.5)) // 밴드가 수렴하면 중립값
            };

            let bandwidth = if ma != Decimal::ZERO {
                Some((upper - lower) / ma)
            } else {
                None
            };

            result.push(BollingerBandsResult {
                upper: Some(upper),
                middle: Some(ma),
                lower: Some(lower),
                percent_b,
                bandwidth,
            });
        }

        Ok(result)
    }

    /// ATR (Average True Range) 계산.
    ///
    /// 첫 TR은 당일 범위(H - L)이고, 첫 ATR은 처음 period개 TR의 평균입니다.
    /// 이후 `ATR = TR × (1/n) + 이전 ATR × (1 - 1/n)`.
    pub fn atr(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: AtrParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let len = high.len().min(low.len()).min(close.len());
        let period = params.period;

        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "기간은 0보다 커야 합니다".to_string(),
            ));
        }

        if len < period + 1 {
            return Err(IndicatorError::InsufficientData {
                required: period + 1,
                provided: len,
            });
        }

        let true_ranges = self.true_ranges(high, low, close);

        let mut result = Vec::with_capacity(len);
        let alpha = Decimal::ONE / Decimal::from(period);
        let one_minus_alpha = Decimal::ONE - alpha;
        let mut prev_atr = Decimal::ZERO;

        for i in 0..len {
            if i < period - 1 {
                result.push(None);
            } else if i == period - 1 {
                let sum: Decimal = true_ranges[..=i].iter().sum();
                prev_atr = sum / Decimal::from(period);
                result.push(Some(prev_atr));
            } else {
                prev_atr = (true_ranges[i] * alpha) + (prev_atr * one_minus_alpha);
                result.push(Some(prev_atr));
            }
        }

        Ok(result)
    }

    /// 시점별 True Range (인덱스 0은 당일 범위).
    pub fn true_ranges(&self, high: &[Decimal], low: &[Decimal], close: &[Decimal]) -> Vec<Decimal> {
        let len = high.len().min(low.len()).min(close.len());
        let mut true_ranges = Vec::with_capacity(len);

        if len == 0 {
            return true_ranges;
        }

        true_ranges.push(high[0] - low[0]);
        for i in 1..len {
            true_ranges.push(true_range(high[i], low[i], close[i - 1]));
        }

        true_ranges
    }

    /// 연환산 변동성 (%) 계산.
    ///
    /// 일간 로그 수익률 `ln(C_t / C_{t-1})`의 윈도우 표본 표준편차 × √거래일 × 100.
    /// 첫 값은 인덱스 window에 위치합니다 (수익률 window개 필요).
    pub fn annualized_volatility(
        &self,
        closes: &[Decimal],
        params: HistoricalVolatilityParams,
    ) -> IndicatorResult<Vec<Option<f64>>> {
        let window = params.window;

        if window < 2 {
            return Err(IndicatorError::InvalidParameter(
                "변동성 윈도우는 2 이상이어야 합니다".to_string(),
            ));
        }

        if closes.len() < window + 1 {
            return Err(IndicatorError::InsufficientData {
                required: window + 1,
                provided: closes.len(),
            });
        }

        let prices: Vec<f64> = closes.iter().map(|c| c.to_f64_lossy()).collect();
        let mut returns = vec![f64::NAN; prices.len()];
        for i in 1..prices.len() {
            if prices[i] > 0.0 && prices[i - 1] > 0.0 {
                returns[i] = (prices[i] / prices[i - 1]).ln();
            }
        }

        let annualizer = params.trading_days.sqrt() * 100.0;
        let mut result = vec![None; prices.len()];

        for (i, slot) in result.iter_mut().enumerate().skip(window) {
            let sample = &returns[i + 1 - window..=i];
            *slot = sample_std_dev(sample)
                .filter(|s| s.is_finite())
                .map(|s| s * annualizer);
        }

        Ok(result)
    }
}

/// 표본 표준편차 (n-1). 값이 2개 미만이면 None.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);

    Some(variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_ohlc() -> (Vec<Decimal>, Vec<Decimal>, Vec<Decimal>) {
        let close: Vec<Decimal> = [
            100, 102, 101, 103, 105, 104, 106, 108, 107, 109, 111, 110, 112, 114, 113, 115, 117,
            116, 118, 120, 119, 121,
        ]
        .iter()
        .map(|c| Decimal::from(*c))
        .collect();
        let high = close.iter().map(|c| *c + dec!(1.5)).collect();
        let low = close.iter().map(|c| *c - dec!(1.5)).collect();
        (high, low, close)
    }

    #[test]
    fn test_bollinger_bands_sample_std() {
        let vol = VolatilityIndicators::new();
        // 평균 3, 표본 분산 ((4+1+0+1+4)/4) = 2.5
        let prices = vec![dec!(1), dec!(2), dec!(3), dec!(4), dec!(5)];

        let bands = vol
            .bollinger_bands(
                &prices,
                BollingerBandsParams {
                    period: 5,
                    std_dev_multiplier: dec!(2),
                },
            )
            .unwrap();

        let last = bands[4];
        assert_eq!(last.middle, Some(dec!(3)));
        let expected_dev = 2.0 * 2.5f64.sqrt();
        let upper = last.upper.unwrap().to_f64_lossy();
        assert!((upper - (3.0 + expected_dev)).abs() < 1e-9);
        assert!(bands[3].upper.is_none());
    }

    #[test]
    fn test_bollinger_flat_prices_neutral_percent_b() {
        let vol = VolatilityIndicators::new();
        let prices = vec![dec!(50); 20];

        let bands = vol
            .bollinger_bands(&prices, BollingerBandsParams::default())
            .unwrap();
        assert_eq!(bands[19].percent_b, Some(dec!(0.5)));
        assert_eq!(bands[19].upper, Some(dec!(50)));
    }

    #[test]
    fn test_atr_calculation() {
        let vol = VolatilityIndicators::new();
        let (high, low, close) = sample_ohlc();

        let atr = vol.atr(&high, &low, &close, AtrParams::default()).unwrap();

        assert_eq!(atr.len(), close.len());
        assert!(atr[12].is_none());
        assert!(atr[13].is_some());
        for value in atr.iter().flatten() {
            assert!(*value > Decimal::ZERO);
        }
    }

    #[test]
    fn test_annualized_volatility_constant_growth_is_zero() {
        let vol = VolatilityIndicators::new();
        // 매일 정확히 같은 비율로 상승하면 로그 수익률 분산은 0
        let mut closes = vec![dec!(100)];
        for _ in 0..25 {
            let last = *closes.last().unwrap();
            closes.push(last * dec!(1.01));
        }

        let series = vol
            .annualized_volatility(&closes, HistoricalVolatilityParams::default())
            .unwrap();

        assert!(series[19].is_none());
        let value = series[20].unwrap();
        assert!(value.abs() < 1e-6);
    }

    #[test]
    fn test_annualized_volatility_alternating() {
        let vol = VolatilityIndicators::new();
        let closes: Vec<Decimal> = (0..30)
            .map(|i| if i % 2 == 0 { dec!(100) } else { dec!(102) })
            .collect();

        let series = vol
            .annualized_volatility(
                &closes,
                HistoricalVolatilityParams {
                    window: 20,
                    trading_days: 252.0,
                },
            )
            .unwrap();

        // 수익률 ±ln(1.02), 평균 0, 표본 표준편차 ≈ ln(1.02) × sqrt(20/19)
        let r = (1.02f64).ln();
        let expected = r * (20.0f64 / 19.0).sqrt() * 252f64.sqrt() * 100.0;
        assert!((series[29].unwrap() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_sample_std_dev() {
        assert_eq!(sample_std_dev(&[1.0]), None);
        let sd = sample_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((sd - 2.138089935).abs() < 1e-6);
    }
}
