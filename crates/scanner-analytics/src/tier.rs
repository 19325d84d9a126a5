//! 티어 배정.
//!
//! 총점을 하한 포함 구분점으로 4개 티어에 배정합니다. 변동성 기반 조정과
//! 티어별 변동성 한도는 선택 기능이며 기본값은 비활성화입니다.

use scanner_core::{Tier, TierThresholds, VolatilityTierConfig};

/// 티어 배정기.
#[derive(Debug, Clone, Copy, Default)]
pub struct TierAssigner {
    thresholds: TierThresholds,
    volatility: VolatilityTierConfig,
}

impl TierAssigner {
    pub fn new(thresholds: TierThresholds, volatility: VolatilityTierConfig) -> Self {
        Self {
            thresholds,
            volatility,
        }
    }

    /// 총점 기반 티어. 구분점과 같은 점수는 위 티어입니다.
    pub fn assign(&self, total: f64) -> Tier {
        let t = &self.thresholds;
        if total >= t.tier_1 {
            Tier::PrimeMovers
        } else if total >= t.tier_2 {
            Tier::SolidPerformers
        } else if total >= t.tier_3 {
            Tier::MomentumPlays
        } else {
            Tier::WatchList
        }
    }

    /// 변동성 조정 티어.
    ///
    /// 고변동성 Tier 1은 Tier 2로, 저변동성 Tier 2/3은 한 단계 위로 조정합니다.
    /// 조정이 비활성화되었거나 변동성이 계산되지 않았으면 원래 티어입니다.
    pub fn volatility_adjusted(&self, tier: Tier, volatility: Option<f64>) -> Tier {
        if !self.volatility.enable_tier_modifier {
            return tier;
        }
        let Some(vol) = volatility else {
            return tier;
        };

        match tier {
            Tier::PrimeMovers if vol > self.volatility.high => tier.downgraded(),
            Tier::SolidPerformers | Tier::MomentumPlays if vol < self.volatility.low => {
                tier.upgraded()
            }
            _ => tier,
        }
    }

    /// 티어별 최대 변동성 이내인지 확인합니다.
    pub fn within_volatility_limit(&self, tier: Tier, volatility: Option<f64>) -> bool {
        if !self.volatility.enable_filters {
            return true;
        }
        let Some(vol) = volatility else {
            return true;
        };

        match tier {
            Tier::PrimeMovers => vol < self.volatility.max_for_tier_1,
            Tier::SolidPerformers => vol < self.volatility.max_for_tier_2,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled() -> TierAssigner {
        TierAssigner::new(
            TierThresholds::default(),
            VolatilityTierConfig {
                enable_tier_modifier: true,
                enable_filters: true,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_closed_lower_bounds() {
        let assigner = TierAssigner::default();
        assert_eq!(assigner.assign(100.0), Tier::PrimeMovers);
        assert_eq!(assigner.assign(80.0), Tier::PrimeMovers);
        assert_eq!(assigner.assign(79.99), Tier::SolidPerformers);
        assert_eq!(assigner.assign(60.0), Tier::SolidPerformers);
        assert_eq!(assigner.assign(40.0), Tier::MomentumPlays);
        assert_eq!(assigner.assign(39.99), Tier::WatchList);
        assert_eq!(assigner.assign(0.0), Tier::WatchList);
    }

    #[test]
    fn test_custom_thresholds() {
        let assigner = TierAssigner::new(
            TierThresholds {
                tier_1: 90.0,
                tier_2: 70.0,
                tier_3: 50.0,
            },
            VolatilityTierConfig::default(),
        );
        assert_eq!(assigner.assign(85.0), Tier::SolidPerformers);
        assert_eq!(assigner.assign(90.0), Tier::PrimeMovers);
    }

    #[test]
    fn test_modifier_disabled_by_default() {
        let assigner = TierAssigner::default();
        assert_eq!(assigner.volatility_adjusted(Tier::PrimeMovers, Some(80.0)), Tier::PrimeMovers);
        assert!(assigner.within_volatility_limit(Tier::PrimeMovers, Some(80.0)));
    }

    #[test]
    fn test_volatility_modifier() {
        let assigner = enabled();
        assert_eq!(assigner.volatility_adjusted(Tier::PrimeMovers, Some(45.0)), Tier::SolidPerformers);
        assert_eq!(assigner.volatility_adjusted(Tier::PrimeMovers, Some(40.0)), Tier::PrimeMovers);
        assert_eq!(assigner.volatility_adjusted(Tier::SolidPerformers, Some(20.0)), Tier::PrimeMovers);
        assert_eq!(assigner.volatility_adjusted(Tier::MomentumPlays, Some(20.0)), Tier::SolidPerformers);
        assert_eq!(assigner.volatility_adjusted(Tier::WatchList, Some(10.0)), Tier::WatchList);
        assert_eq!(assigner.volatility_adjusted(Tier::SolidPerformers, None), Tier::SolidPerformers);
    }

    #[test]
    fn test_volatility_filter() {
        let assigner = enabled();
        assert!(assigner.within_volatility_limit(Tier::PrimeMovers, Some(34.9)));
        assert!(!assigner.within_volatility_limit(Tier::PrimeMovers, Some(35.0)));
        assert!(!assigner.within_volatility_limit(Tier::SolidPerformers, Some(50.0)));
        assert!(assigner.within_volatility_limit(Tier::MomentumPlays, Some(90.0)));
        assert!(assigner.within_volatility_limit(Tier::PrimeMovers, None));
    }
}
