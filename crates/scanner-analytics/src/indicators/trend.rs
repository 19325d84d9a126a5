//! 추세 지표 (Trend Indicators).
//!
//! 이동평균 기반의 추세 지표들을 제공합니다.
//! - SMA (Simple Moving Average)
//! - EMA (Exponential Moving Average)
//! - MACD (Moving Average Convergence Divergence)
//! - ADX (Average Directional Index, Wilder)

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{IndicatorError, IndicatorResult};

/// SMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SmaParams {
    /// 이동평균 기간.
    pub period: usize,
}

impl Default for SmaParams {
    fn default() -> Self {
        Self { period: 20 }
    }
}

/// EMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EmaParams {
    /// 이동평균 기간.
    pub period: usize,
}

impl Default for EmaParams {
    fn default() -> Self {
        Self { period: 12 }
    }
}

/// MACD 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacdParams {
    /// 단기 EMA 기간 (기본: 12).
    pub fast_period: usize,
    /// 장기 EMA 기간 (기본: 26).
    pub slow_period: usize,
    /// 시그널 라인 기간 (기본: 9).
    pub signal_period: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// MACD 결과.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacdResult {
    /// MACD 라인 (단기 EMA - 장기 EMA).
    pub macd: Option<Decimal>,
    /// 시그널 라인 (MACD의 EMA).
    pub signal: Option<Decimal>,
    /// 히스토그램 (MACD - 시그널).
    pub histogram: Option<Decimal>,
}

/// ADX 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AdxParams {
    /// ADX 기간 (기본: 14).
    pub period: usize,
}

impl Default for AdxParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// ADX 결과.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AdxResult {
    /// ADX (0~100).
    pub adx: Option<Decimal>,
    /// +DI.
    pub plus_di: Option<Decimal>,
    /// -DI.
    pub minus_di: Option<Decimal>,
}

/// 추세 지표 계산기.
#[derive(Debug, Default)]
pub struct TrendIndicators;

impl TrendIndicators {
    /// 새로운 추세 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 단순 이동평균 (SMA) 계산.
    ///
    /// SMA = (P1 + P2 + ... + Pn) / n
    ///
    /// # 반환
    /// 각 시점의 SMA 값 (처음 period-1개는 None)
    pub fn sma(
        &self,
        prices: &[Decimal],
        params: SmaParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;

        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "기간은 0보다 커야 합니다".to_string(),
            ));
        }

        if prices.len() < period {
            return Err(IndicatorError::InsufficientData {
                required: period,
                provided: prices.len(),
            });
        }

        let period_decimal = Decimal::from(period);
        let mut result = vec![None; period - 1];
        result.reserve(prices.len() + 1 - period);

        // 누적 합을 유지하며 윈도우를 이동
        let mut window_sum: Decimal = prices[..period].iter().sum();
        result.push(Some(window_sum / period_decimal));

        for i in period..prices.len() {
            window_sum += prices[i] - prices[i - period];
            result.push(Some(window_sum / period_decimal));
        }

        Ok(result)
    }

    /// 지수 이동평균 (EMA) 계산.
    ///
    /// EMA = (현재가 × k) + (이전 EMA × (1 - k))
    /// k = 2 / (period + 1)
    ///
    /// 첫 EMA는 처음 period개의 SMA로 시작합니다.
    pub fn ema(
        &self,
        prices: &[Decimal],
        params: EmaParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;

        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "기간은 0보다 커야 합니다".to_string(),
            ));
        }

        if prices.len() < period {
            return Err(IndicatorError::InsufficientData {
                required: period,
                provided: prices.len(),
            });
        }

        let mut result = Vec::with_capacity(prices.len());
        let multiplier = dec!(2) / Decimal::from(period + 1);

        // 처음 period-1개는 None
        for _ in 0..period - 1 {
            result.push(None);
        }

        let initial_sma: Decimal = prices[..period].iter().sum::<Decimal>() / Decimal::from(period);
        result.push(Some(initial_sma));

        let mut prev_ema = initial_sma;
        for price in prices.iter().skip(period) {
            let ema = (*price * multiplier) + (prev_ema * (Decimal::ONE - multiplier));
            result.push(Some(ema));
            prev_ema = ema;
        }

        Ok(result)
    }

    /// MACD 계산.
    ///
    /// MACD 라인 = 단기 EMA - 장기 EMA
    /// 시그널 라인 = MACD 라인의 EMA
    /// 히스토그램 = MACD 라인 - 시그널 라인
    ///
    /// 장기 EMA 기간만큼 데이터가 있으면 MACD 라인이 계산되고,
    /// 시그널이 아직 정의되지 않은 구간은 시그널/히스토그램이 None입니다.
    pub fn macd(&self, prices: &[Decimal], params: MacdParams) -> IndicatorResult<Vec<MacdResult>> {
        if params.fast_period >= params.slow_period {
            return Err(IndicatorError::InvalidParameter(format!(
                "단기 기간({})은 장기 기간({})보다 짧아야 합니다",
                params.fast_period, params.slow_period
            )));
        }

        if prices.len() < params.slow_period {
            return Err(IndicatorError::InsufficientData {
                required: params.slow_period,
                provided: prices.len(),
            });
        }

        let fast_ema = self.ema(
            prices,
            EmaParams {
                period: params.fast_period,
            },
        )?;
        let slow_ema = self.ema(
            prices,
            EmaParams {
                period: params.slow_period,
            },
        )?;

        let macd_line: Vec<Option<Decimal>> = fast_ema
            .iter()
            .zip(slow_ema.iter())
            .map(|pair| match pair {
                (Some(fast), Some(slow)) => Some(*fast - *slow),
                _ => None,
            })
            .collect();

        // 시그널 라인 (정의된 MACD 값들의 EMA)
        let macd_values: Vec<Decimal> = macd_line.iter().flatten().copied().collect();
        let signal_ema = if macd_values.len() >= params.signal_period {
            self.ema(
                &macd_values,
                EmaParams {
                    period: params.signal_period,
                },
            )?
        } else {
            vec![None; macd_values.len()]
        };

        let mut result = Vec::with_capacity(prices.len());
        let mut signal_idx = 0;

        for macd_val in macd_line.iter() {
            if macd_val.is_some() {
                let signal = signal_ema.get(signal_idx).copied().flatten();
                let histogram = match (*macd_val, signal) {
                    (Some(m), Some(s)) => Some(m - s),
                    _ => None,
                };

                result.push(MacdResult {
                    macd: *macd_val,
                    signal,
                    histogram,
                });
                signal_idx += 1;
            } else {
                result.push(MacdResult::default());
            }
        }

        Ok(result)
    }

    /// ADX (Average Directional Index) 계산.
    ///
    /// Wilder 방식:
    /// - TR, +DM, -DM을 기간 합으로 시작해 `S = S - S/n + X`로 평활
    /// - +DI = 100 × +DM_s / TR_s, -DI = 100 × -DM_s / TR_s
    /// - DX = 100 × |+DI - -DI| / (+DI + -DI)
    /// - 첫 ADX는 처음 n개 DX의 평균, 이후 `ADX = (이전 ADX × (n-1) + DX) / n`
    ///
    /// # 반환
    /// DI는 인덱스 period부터, ADX는 인덱스 2×period-1부터 값이 있습니다.
    pub fn adx(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: AdxParams,
    ) -> IndicatorResult<Vec<AdxResult>> {
        let len = high.len().min(low.len()).min(close.len());
        let period = params.period;

        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "기간은 0보다 커야 합니다".to_string(),
            ));
        }

        if len < period * 2 {
            return Err(IndicatorError::InsufficientData {
                required: period * 2,
                provided: len,
            });
        }

        let mut tr = vec![Decimal::ZERO; len];
        let mut plus_dm = vec![Decimal::ZERO; len];
        let mut minus_dm = vec![Decimal::ZERO; len];

        for i in 1..len {
            tr[i] = true_range(high[i], low[i], close[i - 1]);

            let up_move = high[i] - high[i - 1];
            let down_move = low[i - 1] - low[i];

            if up_move > down_move && up_move > Decimal::ZERO {
                plus_dm[i] = up_move;
            }
            if down_move > up_move && down_move > Decimal::ZERO {
                minus_dm[i] = down_move;
            }
        }

        let period_dec = Decimal::from(period);
        let hundred = dec!(100);
        let mut result = vec![AdxResult::default(); len];
        let mut dx = vec![None; len];

        let mut tr_s: Decimal = tr[1..=period].iter().sum();
        let mut plus_s: Decimal = plus_dm[1..=period].iter().sum();
        let mut minus_s: Decimal = minus_dm[1..=period].iter().sum();

        for i in period..len {
            if i > period {
                tr_s = tr_s - tr_s / period_dec + tr[i];
                plus_s = plus_s - plus_s / period_dec + plus_dm[i];
                minus_s = minus_s - minus_s / period_dec + minus_dm[i];
            }

            let (plus_di, minus_di) = if tr_s > Decimal::ZERO {
                (hundred * plus_s / tr_s, hundred * minus_s / tr_s)
            } else {
                (Decimal::ZERO, Decimal::ZERO)
            };

            let di_sum = plus_di + minus_di;
            dx[i] = Some(if di_sum > Decimal::ZERO {
                hundred * (plus_di - minus_di).abs() / di_sum
            } else {
                Decimal::ZERO
            });

            result[i].plus_di = Some(plus_di);
            result[i].minus_di = Some(minus_di);
        }

        let first_adx_idx = period * 2 - 1;
        let seed: Decimal = dx[period..=first_adx_idx].iter().flatten().sum();
        let mut prev_adx = seed / period_dec;
        result[first_adx_idx].adx = Some(prev_adx);

        for i in (first_adx_idx + 1)..len {
            let current_dx = dx[i].unwrap_or(Decimal::ZERO);
            prev_adx = (prev_adx * (period_dec - Decimal::ONE) + current_dx) / period_dec;
            result[i].adx = Some(prev_adx);
        }

        Ok(result)
    }

    /// 상향 돌파 감지.
    ///
    /// 이전: 빠른 선 ≤ 느린 선, 현재: 빠른 선 > 느린 선.
    /// 어느 한 값이라도 None이면 돌파가 아닙니다.
    pub fn detect_golden_cross(
        &self,
        fast: &[Option<Decimal>],
        slow: &[Option<Decimal>],
    ) -> Vec<bool> {
        let len = fast.len().min(slow.len());
        let mut result = vec![false; len];

        for i in 1..len {
            if let (Some(prev_fast), Some(prev_slow), Some(curr_fast), Some(curr_slow)) =
                (fast[i - 1], slow[i - 1], fast[i], slow[i])
            {
                result[i] = prev_fast <= prev_slow && curr_fast > curr_slow;
            }
        }

        result
    }

    /// 최근 `lookback`개 세션 중 상향 돌파가 있었는지 확인합니다.
    pub fn crossed_above_within(
        &self,
        fast: &[Option<Decimal>],
        slow: &[Option<Decimal>],
        lookback: usize,
    ) -> bool {
        let crosses = self.detect_golden_cross(fast, slow);
        let start = crosses.len().saturating_sub(lookback);
        crosses[start..].iter().any(|c| *c)
    }
}

/// True Range = max(H - L, |H - 이전 C|, |L - 이전 C|).
pub fn true_range(high: Decimal, low: Decimal, prev_close: Decimal) -> Decimal {
    let hl = high - low;
    let hc = (high - prev_close).abs();
    let lc = (low - prev_close).abs();
    hl.max(hc).max(lc)
}
