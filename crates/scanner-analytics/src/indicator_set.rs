//! 시계열 한 개에 대한 전체 지표 집합.
//!
//! 스캔마다 한 번 계산되고 변경되지 않습니다. 시점별 지표는 시계열과 1:1로
//! 정렬된 벡터이며, 기간이 부족한 구간은 `None`입니다. 시계열 전체가 어떤
//! 지표의 기간보다 짧으면 그 지표는 모두 `None`이 되고 에러는 발생하지 않습니다.

use rust_decimal::Decimal;
use scanner_core::{
    decimal_from_f64, opt_f64, DecimalExt, IndicatorSnapshot, PriceSeries, ScannerError,
    ScannerResult, ScoringConfig, SwingPoint,
};
use serde::Serialize;

use crate::indicators::{
    AdxParams, AdxResult, AtrParams, BollingerBandsParams, BollingerBandsResult, GaussianParams,
    HistoricalVolatilityParams, IndicatorEngine, IndicatorResult, MacdParams,
    MacdResult, PullbackParams, RsiParams, SmaParams, SmoothedSeries, SupportParams, SwingParams,
    TrendQuality, TrendQualityParams,
};

/// 최근 N 세션의 상승일/하락일 평균 거래량.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct VolumeSplit {
    /// 상승일 평균 거래량 (상승일이 없으면 None)
    pub up_avg: Option<f64>,
    /// 하락/보합일 평균 거래량 (해당일이 없으면 None)
    pub down_avg: Option<f64>,
}

/// 계산된 지표 집합.
#[derive(Debug, Clone, Serialize)]
pub struct IndicatorSet {
    /// 세션 수
    pub len: usize,
    /// 종가
    pub closes: Vec<Decimal>,
    /// 단기 이동평균 (MA20)
    pub ma_short: Vec<Option<Decimal>>,
    /// 중기 이동평균 (MA50)
    pub ma_medium: Vec<Option<Decimal>>,
    /// 장기 이동평균 (MA200)
    pub ma_long: Vec<Option<Decimal>>,
    /// 거래량 이동평균 (50일)
    pub volume_ma: Vec<Option<Decimal>>,
    pub rsi: Vec<Option<Decimal>>,
    pub macd: Vec<MacdResult>,
    pub adx: Vec<AdxResult>,
    pub bollinger: Vec<BollingerBandsResult>,
    pub atr: Vec<Option<Decimal>>,
    /// 단기 연환산 변동성 (%)
    pub volatility_short: Vec<Option<f64>>,
    /// 장기 연환산 변동성 (%)
    pub volatility_long: Vec<Option<f64>>,
    /// 가우시안 평활 가격, 속도, 가속도
    pub smoothed: SmoothedSeries,
    /// 최근 구간 추세 품질 (최소 봉 수 미만이면 None)
    pub trend_quality: Option<TrendQuality>,
    /// 구조 확인 구간의 스윙 포인트
    pub swing_points: Vec<SwingPoint>,
    /// MA20 지지 터치 횟수
    pub support_touches: Option<u32>,
    /// 눌림 깊이 목록 (%). 구간이 부족하면 None, 관측된 눌림이 없으면 빈 벡터
    pub pullbacks: Option<Vec<f64>>,
    /// MA20 대비 종가 위치 (%, 부호 있음)
    pub distance_from_ma20_pct: Option<f64>,
    /// 구간 최고가
    pub recent_high: Option<f64>,
    /// 구간 최고가까지 여유 (%)
    pub room_to_resistance_pct: Option<f64>,
    /// MA20 기울기 (%, N 세션 전 대비)
    pub ma20_slope_pct: Option<f64>,
    /// 종가가 MA20 위에 있는 최근 연속 일수
    pub days_above_ma20: u32,
    /// 당일 거래량 / 50일 평균 거래량
    pub relative_volume: Option<f64>,
    /// 최근 N 세션 상승일/하락일 거래량
    pub volume_split: Option<VolumeSplit>,
}

impl IndicatorSet {
    /// 시계열과 설정으로 전체 지표를 계산합니다.
    pub fn compute(series: &PriceSeries, config: &ScoringConfig) -> ScannerResult<Self> {
        let engine = IndicatorEngine::new();
        let params = &config.indicators;

        let len = series.len();
        let closes = series.closes();
        let highs = series.highs();
        let lows = series.lows();
        let volumes = series.volumes();

        let ma_short = or_unavailable(
            engine.sma(&closes, SmaParams { period: params.ma_short }),
            len,
            None,
        )?;
        let ma_medium = or_unavailable(
            engine.sma(&closes, SmaParams { period: params.ma_medium }),
            len,
            None,
        )?;
        let ma_long = or_unavailable(
            engine.sma(&closes, SmaParams { period: params.ma_long }),
            len,
            None,
        )?;
        let volume_ma = or_unavailable(
            engine.sma(&volumes, SmaParams { period: params.volume_ma }),
            len,
            None,
        )?;

        let rsi = or_unavailable(engine.rsi(&closes, RsiParams { period: params.rsi }), len, None)?;

        let macd = or_unavailable(
            engine.macd(
                &closes,
                MacdParams {
                    fast_period: params.macd_fast,
                    slow_period: params.macd_slow,
                    signal_period: params.macd_signal,
                },
            ),
            len,
            MacdResult::default(),
        )?;

        let adx = or_unavailable(
            engine.adx(&highs, &lows, &closes, AdxParams { period: params.adx }),
            len,
            AdxResult::default(),
        )?;

        let std_dev_multiplier = decimal_from_f64(params.bollinger_std_dev).ok_or_else(|| {
            ScannerError::InvalidConfig(format!(
                "볼린저 배수를 변환할 수 없습니다: {}",
                params.bollinger_std_dev
            ))
        })?;
        let bollinger = or_unavailable(
            engine.bollinger_bands(
                &closes,
                BollingerBandsParams {
                    period: params.bollinger_period,
                    std_dev_multiplier,
                },
            ),
            len,
            BollingerBandsResult::default(),
        )?;

        let atr = or_unavailable(
            engine.atr(&highs, &lows, &closes, AtrParams { period: params.atr }),
            len,
            None,
        )?;

        let volatility_short = or_unavailable(
            engine.annualized_volatility(
                &closes,
                HistoricalVolatilityParams {
                    window: params.volatility_short,
                    trading_days: params.trading_days_per_year,
                },
            ),
            len,
            None,
        )?;
        let volatility_long = or_unavailable(
            engine.annualized_volatility(
                &closes,
                HistoricalVolatilityParams {
                    window: params.volatility_long,
                    trading_days: params.trading_days_per_year,
                },
            ),
            len,
            None,
        )?;

        let closes_f64: Vec<f64> = closes.iter().map(|c| c.to_f64_lossy()).collect();
        let smoothed = engine.smoothed_derivatives(
            &closes_f64,
            GaussianParams {
                sigma: params.smoothing_sigma,
            },
        )?;

        let trend_quality = optional(engine.trend_quality(
            &highs,
            &lows,
            &closes,
            TrendQualityParams {
                lookback: params.trend_quality_lookback,
                min_bars: params.trend_quality_min_bars,
                sigma: params.smoothing_sigma,
            },
        ))?;

        let swing_points = optional(engine.swing_points(
            series.bars(),
            SwingParams {
                window: config.established.structure_window,
                radius: config.established.swing_radius,
            },
        ))?
        .unwrap_or_default();

        let support_touches = optional(engine.support_touches(
            &lows,
            &ma_short,
            SupportParams {
                lookback: params.structure_lookback,
                tolerance_pct: params.support_tolerance_pct,
            },
        ))?;

        let pullbacks = optional(engine.pullback_depths(
            &highs,
            &lows,
            PullbackParams {
                lookback: params.structure_lookback,
                span: params.pullback_span,
            },
        ))?;

        let latest_close = series.latest().close;
        let latest_ma_short = latest(&ma_short);

        let distance_from_ma20_pct = latest_ma_short
            .filter(|ma| ma.is_strictly_positive())
            .map(|ma| ((latest_close - ma) / ma).to_f64_lossy() * 100.0);

        let recent_high = if len >= params.structure_lookback {
            highs[len - params.structure_lookback..].iter().max().copied()
        } else {
            None
        };
        let room_to_resistance_pct = recent_high
            .filter(|_| latest_close.is_strictly_positive())
            .map(|high| ((high - latest_close) / latest_close).to_f64_lossy() * 100.0);

        let ma20_slope_pct = sessions_ago(&ma_short, params.slope_lookback)
            .zip(latest_ma_short)
            .filter(|(prior, _)| prior.is_strictly_positive())
            .map(|(prior, current)| ((current - prior) / prior).to_f64_lossy() * 100.0);

        let days_above_ma20 = closes
            .iter()
            .zip(ma_short.iter())
            .rev()
            .take_while(|(close, ma)| matches!(ma, Some(ma) if *close > ma))
            .count() as u32;

        let relative_volume = latest(&volume_ma)
            .filter(|avg| avg.is_strictly_positive())
            .map(|avg| (series.latest().volume / avg).to_f64_lossy());

        let volume_split = Self::volume_split(&closes, &volumes, params.volume_trend_sessions);

        Ok(Self {
            len,
            closes,
            ma_short,
            ma_medium,
            ma_long,
            volume_ma,
            rsi,
            macd,
            adx,
            bollinger,
            atr,
            volatility_short,
            volatility_long,
            smoothed,
            trend_quality,
            swing_points,
            support_touches,
            pullbacks,
            distance_from_ma20_pct,
            recent_high: opt_f64(recent_high),
            room_to_resistance_pct,
            ma20_slope_pct,
            days_above_ma20,
            relative_volume,
            volume_split,
        })
    }

    /// 눌림 깊이 평균 (%). 관측된 눌림이 없으면 None.
    pub fn avg_pullback_pct(&self) -> Option<f64> {
        self.pullbacks
            .as_ref()
            .filter(|p| !p.is_empty())
            .map(|p| p.iter().sum::<f64>() / p.len() as f64)
    }

    /// MACD 히스토그램의 최근 값과 N 세션 전 값.
    pub fn macd_histogram_pair(&self, lookback: usize) -> (Option<Decimal>, Option<Decimal>) {
        let histogram: Vec<Option<Decimal>> = self.macd.iter().map(|m| m.histogram).collect();
        (latest(&histogram), sessions_ago(&histogram, lookback))
    }

    /// 최근 ADX 값.
    pub fn latest_adx(&self) -> Option<Decimal> {
        self.adx.last().and_then(|a| a.adx)
    }

    /// 최근 RSI 값.
    pub fn latest_rsi(&self) -> Option<Decimal> {
        latest(&self.rsi)
    }

    /// 최근 단기 변동성 (%).
    pub fn latest_volatility_short(&self) -> Option<f64> {
        latest(&self.volatility_short)
    }

    /// 최근 세션 기준 지표 스냅샷을 생성합니다.
    pub fn snapshot(&self, series: &PriceSeries) -> IndicatorSnapshot {
        let close = series.latest().close;
        let pct_from = |ma: Option<Decimal>| {
            ma.filter(|m| m.is_strictly_positive())
                .map(|m| ((close - m) / m).to_f64_lossy() * 100.0)
        };

        let ma20 = latest(&self.ma_short);
        let ma50 = latest(&self.ma_medium);
        let ma200 = latest(&self.ma_long);
        let macd = self.macd.last().copied().unwrap_or_default();
        let adx = self.adx.last().copied().unwrap_or_default();
        let bands = self.bollinger.last().copied().unwrap_or_default();
        let quality = self.trend_quality.unwrap_or_default();

        IndicatorSnapshot {
            close: close.to_f64_lossy(),
            ma20: opt_f64(ma20),
            ma50: opt_f64(ma50),
            ma200: opt_f64(ma200),
            pct_from_ma20: pct_from(ma20),
            pct_from_ma50: pct_from(ma50),
            pct_from_ma200: pct_from(ma200),
            ma20_slope_pct: self.ma20_slope_pct,
            days_above_ma20: self.days_above_ma20,
            rsi: opt_f64(self.latest_rsi()),
            macd: opt_f64(macd.macd),
            macd_signal: opt_f64(macd.signal),
            macd_histogram: opt_f64(macd.histogram),
            adx: opt_f64(adx.adx),
            plus_di: opt_f64(adx.plus_di),
            minus_di: opt_f64(adx.minus_di),
            bb_upper: opt_f64(bands.upper),
            bb_middle: opt_f64(bands.middle),
            bb_lower: opt_f64(bands.lower),
            bb_percent_b: opt_f64(bands.percent_b),
            atr: opt_f64(latest(&self.atr)),
            volatility_20: self.latest_volatility_short(),
            volatility_50: latest(&self.volatility_long),
            smoothed_price: latest(&self.smoothed.smoothed),
            velocity: latest(&self.smoothed.velocity),
            acceleration: latest(&self.smoothed.acceleration),
            choppiness_index: quality.choppiness_index,
            efficiency_ratio: quality.efficiency_ratio,
            trend_deviation_pct: quality.deviation_pct,
            trend_quality_grade: quality.grade(),
            avg_volume_50: opt_f64(latest(&self.volume_ma)),
            relative_volume: self.relative_volume,
            support_touches: self.support_touches,
            avg_pullback_pct: self.avg_pullback_pct(),
            distance_from_ma20_pct: self.distance_from_ma20_pct,
            room_to_resistance_pct: self.room_to_resistance_pct,
            high_60: self.recent_high,
        }
    }

    /// 최근 `sessions`개 세션을 상승일(종가 > 전일 종가)과 나머지로 나눈 평균 거래량.
    fn volume_split(closes: &[Decimal], volumes: &[Decimal], sessions: usize) -> Option<VolumeSplit> {
        let len = closes.len();
        if sessions == 0 || len < sessions + 1 {
            return None;
        }

        let mut up = Vec::new();
        let mut down = Vec::new();
        for i in (len - sessions)..len {
            let volume = volumes[i].to_f64_lossy();
            if closes[i] > closes[i - 1] {
                up.push(volume);
            } else {
                down.push(volume);
            }
        }

        let mean = |v: &[f64]| {
            if v.is_empty() {
                None
            } else {
                Some(v.iter().sum::<f64>() / v.len() as f64)
            }
        };

        Some(VolumeSplit {
            up_avg: mean(&up),
            down_avg: mean(&down),
        })
    }
}

/// 마지막 값.
pub(crate) fn latest<T: Copy>(values: &[Option<T>]) -> Option<T> {
    values.last().copied().flatten()
}

/// 최근 세션 기준 `n` 세션 전 값 (인덱스 `len - 1 - n`).
pub(crate) fn sessions_ago<T: Copy>(values: &[Option<T>], n: usize) -> Option<T> {
    let last = values.len().checked_sub(1)?;
    let idx = last.checked_sub(n)?;
    values[idx]
}

/// 데이터 부족은 전 구간 "계산되지 않음"으로 바꾸고, 그 외 오류는 전파합니다.
fn or_unavailable<T: Clone>(
    result: IndicatorResult<Vec<T>>,
    len: usize,
    unavailable: T,
) -> ScannerResult<Vec<T>> {
    match result {
        Ok(values) => Ok(values),
        Err(err) if err.is_insufficient_data() => Ok(vec![unavailable; len]),
        Err(err) => Err(err.into()),
    }
}

/// 스칼라 지표용: 데이터 부족은 None.
fn optional<T>(result: IndicatorResult<T>) -> ScannerResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_insufficient_data() => Ok(None),
        Err(err) => Err(err.into()),
    }
}
