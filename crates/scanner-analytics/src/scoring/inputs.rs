//! 점수 계산 입력값.
//!
//! [`IndicatorSet`]에서 최근 세션 기준 스칼라 값만 뽑아낸 평면 구조체입니다.
//! 점수 계산기는 이 값만 보므로, 시계열 없이도 임의의 지표 조합으로 점수를
//! 재현할 수 있습니다.

use scanner_core::opt_f64;
use serde::{Deserialize, Serialize};

use crate::indicator_set::IndicatorSet;

/// 최근 N 세션의 상승일/하락일 거래량 비교.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum VolumeTrend {
    /// 세션 수 부족
    #[default]
    NotComputed,
    /// 모두 상승일이거나 모두 하락일
    OneSided,
    /// 상승일/하락일 평균 거래량
    Split { up_avg: f64, down_avg: f64 },
}

/// 평균 눌림 깊이.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum PullbackDepth {
    /// 구간 부족
    #[default]
    NotComputed,
    /// 구간 내 눌림 없음
    NoPullbacks,
    /// 평균 깊이 (%)
    Average(f64),
}

/// 점수 계산 입력값. `None`은 계산되지 않은 지표이며 해당 항목은 0점입니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringInputs {
    pub adx: Option<f64>,
    pub ma20_slope_pct: Option<f64>,
    pub days_above_ma20: Option<u32>,
    pub rsi: Option<f64>,
    pub macd_histogram: Option<f64>,
    /// 비교 기간 전 MACD 히스토그램
    pub macd_histogram_prior: Option<f64>,
    pub volume_trend: VolumeTrend,
    pub relative_volume: Option<f64>,
    pub support_touches: Option<u32>,
    pub pullback: PullbackDepth,
    /// MA20 대비 이격 (%, 부호 있음)
    pub distance_from_ma20_pct: Option<f64>,
    pub room_to_resistance_pct: Option<f64>,
    pub choppiness_index: Option<f64>,
    pub efficiency_ratio: Option<f64>,
    pub trend_deviation_pct: Option<f64>,
}

impl ScoringInputs {
    /// 지표 집합에서 입력값을 추출합니다.
    ///
    /// `lookback`은 MACD 히스토그램 비교 기간(세션 전)입니다.
    pub fn from_indicators(indicators: &IndicatorSet, lookback: usize) -> Self {
        let (histogram, prior) = indicators.macd_histogram_pair(lookback);

        let volume_trend = match indicators.volume_split {
            None => VolumeTrend::NotComputed,
            Some(split) => match (split.up_avg, split.down_avg) {
                (Some(up_avg), Some(down_avg)) => VolumeTrend::Split { up_avg, down_avg },
                _ => VolumeTrend::OneSided,
            },
        };

        let pullback = match &indicators.pullbacks {
            None => PullbackDepth::NotComputed,
            Some(depths) if depths.is_empty() => PullbackDepth::NoPullbacks,
            Some(_) => indicators
                .avg_pullback_pct()
                .map(PullbackDepth::Average)
                .unwrap_or(PullbackDepth::NoPullbacks),
        };

        // MA20이 없으면 연속 일수도 의미가 없습니다.
        let days_above_ma20 = indicators
            .ma_short
            .last()
            .copied()
            .flatten()
            .map(|_| indicators.days_above_ma20);

        let quality = indicators.trend_quality.unwrap_or_default();

        Self {
            adx: opt_f64(indicators.latest_adx()),
            ma20_slope_pct: indicators.ma20_slope_pct,
            days_above_ma20,
            rsi: opt_f64(indicators.latest_rsi()),
            macd_histogram: opt_f64(histogram),
            macd_histogram_prior: opt_f64(prior),
            volume_trend,
            relative_volume: indicators.relative_volume,
            support_touches: indicators.support_touches,
            pullback,
            distance_from_ma20_pct: indicators.distance_from_ma20_pct,
            room_to_resistance_pct: indicators.room_to_resistance_pct,
            choppiness_index: quality.choppiness_index,
            efficiency_ratio: quality.efficiency_ratio,
            trend_deviation_pct: quality.deviation_pct,
        }
    }
}
