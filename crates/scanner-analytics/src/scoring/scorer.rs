//! 상승 추세 품질 점수 계산기.
//!
//! # 6개 카테고리 (기본 가중치 합계 = 100)
//!
//! 1. **Trend Strength**: 20 - ADX 수준, MA20 기울기, MA20 위 연속 일수
//! 2. **Momentum Quality**: 18 - RSI 위치, MACD 히스토그램 추세
//! 3. **Volume Profile**: 17 - 상승일/하락일 거래량, 상대 거래량
//! 4. **Price Structure**: 17 - MA20 지지 터치, 평균 눌림 깊이
//! 5. **Risk/Reward**: 13 - MA20 이격, 60일 고점까지 여유
//! 6. **Trend Quality**: 15 - Choppiness Index, Efficiency Ratio, 평활 괴리율
//!
//! 세부 항목 점수는 기본 가중치 기준 표에서 찾은 뒤 `설정 가중치 / 기본 가중치`
//! 비율을 곱합니다. 카테고리 점수는 설정 가중치를 넘지 않습니다.

use scanner_core::{CategoryWeights, ScoreBreakdown, ScoreDetails};

use super::buckets::{self, BucketTable};
use super::inputs::{PullbackDepth, ScoringInputs, VolumeTrend};

/// 점수 계산기.
#[derive(Debug, Clone, Copy)]
pub struct StockScorer {
    weights: CategoryWeights,
}

/// 카테고리별 환산 비율.
#[derive(Debug, Clone, Copy)]
struct Scale {
    trend_strength: f64,
    momentum_quality: f64,
    volume_profile: f64,
    price_structure: f64,
    risk_reward: f64,
    trend_quality: f64,
}

impl StockScorer {
    /// 설정 가중치로 점수 계산기를 생성합니다.
    ///
    /// 가중치 검증은 [`scanner_core::ScoringConfig::validate`]의 책임입니다.
    pub fn new(weights: CategoryWeights) -> Self {
        Self { weights }
    }

    /// 카테고리 가중치.
    pub fn weights(&self) -> &CategoryWeights {
        &self.weights
    }

    /// 입력값으로 카테고리 점수와 세부 점수를 계산합니다.
    pub fn score(&self, inputs: &ScoringInputs) -> (ScoreBreakdown, ScoreDetails) {
        let scale = self.scale();

        let details = ScoreDetails {
            adx_level: table(&buckets::ADX_LEVEL, inputs.adx) * scale.trend_strength,
            ma20_slope: table(&buckets::MA20_SLOPE, inputs.ma20_slope_pct) * scale.trend_strength,
            days_above_ma20: table(
                &buckets::DAYS_ABOVE_MA20,
                inputs.days_above_ma20.map(f64::from),
            ) * scale.trend_strength,
            rsi_position: table(&buckets::RSI_POSITION, inputs.rsi) * scale.momentum_quality,
            macd_histogram: Self::macd_points(inputs.macd_histogram, inputs.macd_histogram_prior)
                * scale.momentum_quality,
            volume_trend: Self::volume_trend_points(inputs.volume_trend) * scale.volume_profile,
            relative_volume: table(&buckets::RELATIVE_VOLUME, inputs.relative_volume)
                * scale.volume_profile,
            support_touches: table(
                &buckets::SUPPORT_TOUCHES,
                inputs.support_touches.map(f64::from),
            ) * scale.price_structure,
            pullback_depth: Self::pullback_points(inputs.pullback) * scale.price_structure,
            ma20_distance: table(
                &buckets::MA20_DISTANCE,
                inputs.distance_from_ma20_pct.map(f64::abs),
            ) * scale.risk_reward,
            resistance_room: table(&buckets::RESISTANCE_ROOM, inputs.room_to_resistance_pct)
                * scale.risk_reward,
            choppiness: table(&buckets::CHOPPINESS, inputs.choppiness_index) * scale.trend_quality,
            efficiency: table(&buckets::EFFICIENCY, inputs.efficiency_ratio) * scale.trend_quality,
            trend_deviation: table(&buckets::TREND_DEVIATION, inputs.trend_deviation_pct)
                * scale.trend_quality,
        };

        let w = &self.weights;
        let breakdown = ScoreBreakdown::new(
            capped(
                details.adx_level + details.ma20_slope + details.days_above_ma20,
                w.trend_strength,
            ),
            capped(details.rsi_position + details.macd_histogram, w.momentum_quality),
            capped(details.volume_trend + details.relative_volume, w.volume_profile),
            capped(details.support_touches + details.pullback_depth, w.price_structure),
            capped(details.ma20_distance + details.resistance_room, w.risk_reward),
            capped(
                details.choppiness + details.efficiency + details.trend_deviation,
                w.trend_quality,
            ),
        );

        (breakdown, details)
    }

    fn scale(&self) -> Scale {
        let d = CategoryWeights::DEFAULT;
        let w = &self.weights;
        Scale {
            trend_strength: w.trend_strength / d.trend_strength,
            momentum_quality: w.momentum_quality / d.momentum_quality,
            volume_profile: w.volume_profile / d.volume_profile,
            price_structure: w.price_structure / d.price_structure,
            risk_reward: w.risk_reward / d.risk_reward,
            trend_quality: w.trend_quality / d.trend_quality,
        }
    }

    /// 히스토그램 양수 + 확대 9, 양수 6, 음수지만 개선 3, 그 외 0.
    fn macd_points(current: Option<f64>, prior: Option<f64>) -> f64 {
        let Some(current) = current else {
            return 0.0;
        };
        let improving = prior.map(|p| current > p).unwrap_or(false);

        match (current > 0.0, improving) {
            (true, true) => buckets::MACD_EXPANDING,
            (true, false) => buckets::MACD_STEADY,
            (false, true) => buckets::MACD_IMPROVING,
            (false, false) => buckets::MACD_NEGATIVE,
        }
    }

    fn volume_trend_points(trend: VolumeTrend) -> f64 {
        match trend {
            VolumeTrend::NotComputed => 0.0,
            VolumeTrend::OneSided => buckets::VOLUME_ONE_SIDED,
            VolumeTrend::Split { up_avg, down_avg } => {
                if up_avg > down_avg * buckets::VOLUME_UP_RATIO {
                    buckets::VOLUME_UP_STRONG
                } else if up_avg > down_avg {
                    buckets::VOLUME_UP
                } else {
                    buckets::VOLUME_DOWN
                }
            }
        }
    }

    fn pullback_points(pullback: PullbackDepth) -> f64 {
        match pullback {
            PullbackDepth::NotComputed => 0.0,
            PullbackDepth::NoPullbacks => buckets::PULLBACK_NONE,
            PullbackDepth::Average(depth) => buckets::PULLBACK_DEPTH.lookup(depth),
        }
    }
}

impl Default for StockScorer {
    fn default() -> Self {
        Self::new(CategoryWeights::DEFAULT)
    }
}

/// 값이 없으면 0점.
fn table(table: &BucketTable, value: Option<f64>) -> f64 {
    value.map(|v| table.lookup(v)).unwrap_or(0.0)
}

fn capped(points: f64, max: f64) -> f64 {
    points.clamp(0.0, max.max(0.0))
}
