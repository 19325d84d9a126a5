//! 점수/티어/조기 판정 속성 테스트.

mod common;

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use scanner_analytics::{PullbackDepth, ScoringInputs, StockScorer, TierAssigner, UptrendEngine, VolumeTrend};
use scanner_core::{
    decimal_from_f64, CategoryWeights, DailyBar, EarlyUptrendChecks, ScoringConfig, TickerMetadata,
    EARLY_SCORE_MAX,
};

fn volume_trend() -> impl Strategy<Value = VolumeTrend> {
    prop_oneof![
        Just(VolumeTrend::NotComputed),
        Just(VolumeTrend::OneSided),
        (0.0f64..1e7, 0.0f64..1e7).prop_map(|(up_avg, down_avg)| VolumeTrend::Split { up_avg, down_avg }),
    ]
}

fn pullback() -> impl Strategy<Value = PullbackDepth> {
    prop_oneof![
        Just(PullbackDepth::NotComputed),
        Just(PullbackDepth::NoPullbacks),
        (0.0f64..40.0).prop_map(PullbackDepth::Average),
    ]
}

prop_compose! {
    fn scoring_inputs()(
        adx in proptest::option::of(0.0f64..100.0),
        ma20_slope_pct in proptest::option::of(-10.0f64..10.0),
        days_above_ma20 in proptest::option::of(0u32..300),
        rsi in proptest::option::of(0.0f64..100.0),
        macd_histogram in proptest::option::of(-5.0f64..5.0),
        macd_histogram_prior in proptest::option::of(-5.0f64..5.0),
        volume_trend in volume_trend(),
        relative_volume in proptest::option::of(0.0f64..5.0),
        support_touches in proptest::option::of(0u32..60),
        pullback in pullback(),
        distance_from_ma20_pct in proptest::option::of(-30.0f64..30.0),
        room_to_resistance_pct in proptest::option::of(0.0f64..50.0),
        choppiness_index in proptest::option::of(20.0f64..100.0),
        efficiency_ratio in proptest::option::of(0.0f64..1.0),
        trend_deviation_pct in proptest::option::of(0.0f64..10.0),
    ) -> ScoringInputs {
        ScoringInputs {
            adx,
            ma20_slope_pct,
            days_above_ma20,
            rsi,
            macd_histogram,
            macd_histogram_prior,
            volume_trend,
            relative_volume,
            support_touches,
            pullback,
            distance_from_ma20_pct,
            room_to_resistance_pct,
            choppiness_index,
            efficiency_ratio,
            trend_deviation_pct,
        }
    }
}

prop_compose! {
    /// 합계 100으로 정규화한 양수 가중치.
    fn custom_weights()(raw in proptest::collection::vec(1.0f64..50.0, 6)) -> CategoryWeights {
        let sum: f64 = raw.iter().sum();
        let w: Vec<f64> = raw.iter().map(|r| r / sum * 100.0).collect();
        CategoryWeights {
            trend_strength: w[0],
            momentum_quality: w[1],
            volume_profile: w[2],
            price_structure: w[3],
            risk_reward: w[4],
            trend_quality: w[5],
        }
    }
}

prop_compose! {
    /// 양수 종가를 유지하는 무작위 일봉 시계열.
    fn random_walk()(
        steps in proptest::collection::vec(-3.0f64..3.0, 200..260),
        volumes in proptest::collection::vec(100_000u32..5_000_000, 260),
    ) -> Vec<DailyBar> {
        let mut close = 100.0f64;
        steps
            .iter()
            .enumerate()
            .map(|(i, step)| {
                close = (close + step).max(5.0);
                let c = decimal_from_f64(close).unwrap().round_dp(2);
                common::bar(i as i64, c, dec!(0.5), Decimal::from(volumes[i]))
            })
            .collect()
    }
}

proptest! {
    #[test]
    fn total_is_bounded_and_equals_category_sum(inputs in scoring_inputs()) {
        let (breakdown, _) = StockScorer::default().score(&inputs);

        let sum: f64 = breakdown.categories().iter().map(|(_, v)| v).sum();
        prop_assert!((breakdown.total - sum).abs() < 1e-9);
        prop_assert!(breakdown.total >= 0.0);
        prop_assert!(breakdown.total <= 100.0 + 1e-9);
    }

    #[test]
    fn categories_never_exceed_default_maxima(inputs in scoring_inputs()) {
        let (breakdown, _) = StockScorer::default().score(&inputs);
        let maxima = CategoryWeights::DEFAULT.as_array();

        for ((name, value), (_, max)) in breakdown.categories().iter().zip(maxima.iter()) {
            prop_assert!(*value <= *max, "{} = {} > {}", name, value, max);
        }
    }

    #[test]
    fn custom_weights_rescale_proportionally(inputs in scoring_inputs(), weights in custom_weights()) {
        let (default_breakdown, _) = StockScorer::default().score(&inputs);
        let (custom_breakdown, _) = StockScorer::new(weights).score(&inputs);

        let defaults = CategoryWeights::DEFAULT.as_array();
        let custom = weights.as_array();
        let default_values = default_breakdown.categories();
        let custom_values = custom_breakdown.categories();

        for i in 0..6 {
            let (_, default_max) = defaults[i];
            let (name, custom_max) = custom[i];
            let expected = default_values[i].1 * custom_max / default_max;

            prop_assert!(custom_values[i].1 <= custom_max + 1e-9, "{} 최대치 초과", name);
            prop_assert!((custom_values[i].1 - expected).abs() < 1e-6, "{} 비례 환산 불일치", name);
        }
        prop_assert!(custom_breakdown.total <= 100.0 + 1e-6);
    }

    #[test]
    fn tier_is_monotonic_in_score(a in 0.0f64..100.0, b in 0.0f64..100.0) {
        let assigner = TierAssigner::default();
        let (low, high) = if a <= b { (a, b) } else { (b, a) };

        // 번호가 작을수록 높은 티어
        prop_assert!(assigner.assign(high) <= assigner.assign(low));
    }

    #[test]
    fn early_qualification_follows_point_total(
        ma20_cross: bool,
        volume_spike: bool,
        rsi_healthy: bool,
        adx_rising: bool,
        macd_cross: bool,
        breakout: bool,
    ) {
        let checks = EarlyUptrendChecks {
            ma20_cross,
            volume_spike,
            rsi_healthy,
            adx_rising,
            macd_cross,
            breakout,
        };
        let score = checks.score();

        prop_assert!(score <= EARLY_SCORE_MAX);
        prop_assert_eq!(checks.qualifies(5), score >= 5);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn engine_output_is_bounded_for_random_series(bars in random_walk()) {
        let engine = UptrendEngine::new(ScoringConfig::default()).unwrap();
        let result = engine.analyze("RAND", bars, TickerMetadata::default()).unwrap();

        let breakdown = result.score_breakdown;
        let sum: f64 = breakdown.categories().iter().map(|(_, v)| v).sum();
        prop_assert!((breakdown.total - sum).abs() < 1e-9);
        prop_assert!(breakdown.total >= 0.0 && breakdown.total <= 100.0);
        prop_assert!(result.early_score <= EARLY_SCORE_MAX);
        prop_assert_eq!(result.tier, TierAssigner::default().assign(breakdown.total));
    }
}
