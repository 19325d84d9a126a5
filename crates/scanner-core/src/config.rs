//! 점수 설정 관리.
//!
//! 엔진의 모든 임계값과 가중치는 [`ScoringConfig`] 값으로 명시적으로 전달됩니다.
//! 프로세스 전역 설정 상태는 없습니다.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ScannerError, ScannerResult};

/// 기본 가중치 합계.
pub const TOTAL_POINTS: f64 = 100.0;

/// 가중치 합계 비교 허용 오차.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// 조기 상승 추세 점수 만점.
pub const EARLY_SCORE_MAX: u8 = 8;

/// 스캐너 점수 설정.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// 카테고리별 가중치 (만점 기준)
    pub weights: CategoryWeights,
    /// 티어 구분점
    pub tiers: TierThresholds,
    /// 조기 상승 추세 판정 설정
    pub early: EarlyUptrendConfig,
    /// 확립된 상승 추세 판정 설정
    pub established: EstablishedUptrendConfig,
    /// 지표 기간 설정
    pub indicators: IndicatorParams,
    /// 변동성 기반 티어 조정 설정
    pub volatility: VolatilityTierConfig,
}

/// 카테고리별 가중치 (합계 100).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CategoryWeights {
    /// 추세 강도 (ADX, MA20 기울기, MA20 위 일수)
    pub trend_strength: f64,
    /// 모멘텀 품질 (RSI, MACD 히스토그램)
    pub momentum_quality: f64,
    /// 거래량 프로파일 (상승/하락일 거래량, 상대 거래량)
    pub volume_profile: f64,
    /// 가격 구조 (MA20 지지, 눌림 깊이)
    pub price_structure: f64,
    /// 위험/보상 (MA20 이격, 저항까지 여유)
    pub risk_reward: f64,
    /// 추세 품질 (Choppiness, Efficiency Ratio, 평활 가격 괴리)
    pub trend_quality: f64,
}

impl CategoryWeights {
    /// 기본 가중치 (20 + 18 + 17 + 17 + 13 + 15 = 100).
    pub const DEFAULT: CategoryWeights = CategoryWeights {
        trend_strength: 20.0,
        momentum_quality: 18.0,
        volume_profile: 17.0,
        price_structure: 17.0,
        risk_reward: 13.0,
        trend_quality: 15.0,
    };

    /// 가중치 합계.
    pub fn total(&self) -> f64 {
        self.as_array().iter().map(|(_, w)| w).sum()
    }

    /// (카테고리 이름, 가중치) 배열.
    pub fn as_array(&self) -> [(&'static str, f64); 6] {
        [
            ("trend_strength", self.trend_strength),
            ("momentum_quality", self.momentum_quality),
            ("volume_profile", self.volume_profile),
            ("price_structure", self.price_structure),
            ("risk_reward", self.risk_reward),
            ("trend_quality", self.trend_quality),
        ]
    }

    /// 가중치 검증: 음수 불가, 합계 100.
    pub fn validate(&self) -> ScannerResult<()> {
        for (name, weight) in self.as_array() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ScannerError::InvalidConfig(format!(
                    "{} 가중치는 0 이상이어야 합니다: {}",
                    name, weight
                )));
            }
        }

        let total = self.total();
        if (total - TOTAL_POINTS).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ScannerError::InvalidConfig(format!(
                "가중치 합계는 100이어야 합니다: {}",
                total
            )));
        }

        Ok(())
    }
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// 티어 구분점 (하한 포함).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TierThresholds {
    /// Tier 1 (Prime Movers) 하한
    pub tier_1: f64,
    /// Tier 2 (Solid Performers) 하한
    pub tier_2: f64,
    /// Tier 3 (Momentum Plays) 하한
    pub tier_3: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            tier_1: 80.0,
            tier_2: 60.0,
            tier_3: 40.0,
        }
    }
}

impl TierThresholds {
    /// 구분점 검증: 0 이상, 엄격한 내림차순.
    pub fn validate(&self) -> ScannerResult<()> {
        let cuts = [self.tier_1, self.tier_2, self.tier_3];
        if cuts.iter().any(|c| !c.is_finite() || *c < 0.0) {
            return Err(ScannerError::InvalidConfig(format!(
                "티어 구분점은 0 이상이어야 합니다: {:?}",
                cuts
            )));
        }
        if !(self.tier_1 > self.tier_2 && self.tier_2 > self.tier_3) {
            return Err(ScannerError::InvalidConfig(format!(
                "티어 구분점은 tier_1 > tier_2 > tier_3 이어야 합니다: {:?}",
                cuts
            )));
        }
        Ok(())
    }
}

/// 조기 상승 추세 (돌파 단계) 판정 설정.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EarlyUptrendConfig {
    /// 조기 상승 추세로 인정하는 최소 점수 (8점 만점)
    pub min_score: u8,
    /// MA20 상향 돌파 확인 기간 (세션)
    pub ma_cross_days: usize,
    /// MACD 골든 크로스 확인 기간 (세션)
    pub macd_cross_days: usize,
    /// 거래량 급증 배수 (50일 평균 대비)
    pub volume_multiplier: f64,
    /// RSI 건강 구간 하한
    pub rsi_healthy_low: f64,
    /// RSI 건강 구간 상한
    pub rsi_healthy_high: f64,
    /// ADX 상승 판정 최소값
    pub adx_floor: f64,
    /// ADX 비교 기간 (세션 전)
    pub adx_lookback: usize,
    /// 돌파 판정용 직전 고가 기간 (당일 제외)
    pub breakout_lookback: usize,
    /// 조기 상승 추세로 인정하는 최소 세션 수 (0이면 제한 없음)
    pub min_history: usize,
}

impl Default for EarlyUptrendConfig {
    fn default() -> Self {
        Self {
            min_score: 5,
            ma_cross_days: 5,
            macd_cross_days: 10,
            volume_multiplier: 1.5,
            rsi_healthy_low: 50.0,
            rsi_healthy_high: 70.0,
            adx_floor: 20.0,
            adx_lookback: 5,
            breakout_lookback: 20,
            min_history: 0,
        }
    }
}

/// 확립된 상승 추세 (지속 단계) 판정 설정.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EstablishedUptrendConfig {
    /// MA20 위 연속 최소 일수
    pub min_days_above_ma20: u32,
    /// ADX 강한 추세 기준 (초과)
    pub adx_threshold: f64,
    /// 고점/저점 구조 확인 기간 (세션)
    pub structure_window: usize,
    /// 스윙 포인트 판정 반경 (좌우 봉 수)
    pub swing_radius: usize,
    /// 고점/저점 상승 판정에 필요한 최소 스윙 수
    pub min_swings: usize,
}

impl Default for EstablishedUptrendConfig {
    fn default() -> Self {
        Self {
            min_days_above_ma20: 20,
            adx_threshold: 25.0,
            structure_window: 60,
            swing_radius: 3,
            min_swings: 2,
        }
    }
}

/// 지표 계산 기간 설정.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IndicatorParams {
    /// 단기 이동평균 기간
    pub ma_short: usize,
    /// 중기 이동평균 기간
    pub ma_medium: usize,
    /// 장기 이동평균 기간
    pub ma_long: usize,
    /// 거래량 이동평균 기간
    pub volume_ma: usize,
    /// RSI 기간
    pub rsi: usize,
    /// MACD 단기 EMA 기간
    pub macd_fast: usize,
    /// MACD 장기 EMA 기간
    pub macd_slow: usize,
    /// MACD 시그널 기간
    pub macd_signal: usize,
    /// ADX 기간
    pub adx: usize,
    /// 볼린저 밴드 기간
    pub bollinger_period: usize,
    /// 볼린저 밴드 표준편차 배수
    pub bollinger_std_dev: f64,
    /// ATR 기간
    pub atr: usize,
    /// 단기 변동성 기간
    pub volatility_short: usize,
    /// 장기 변동성 기간
    pub volatility_long: usize,
    /// 연환산 거래일 수
    pub trading_days_per_year: f64,
    /// 가우시안 평활 시그마
    pub smoothing_sigma: f64,
    /// 추세 품질 (CI/ER/괴리) 계산 기간
    pub trend_quality_lookback: usize,
    /// 추세 품질 계산 최소 봉 수
    pub trend_quality_min_bars: usize,
    /// MA20 기울기, MACD 히스토그램 비교 기간 (세션 전)
    pub slope_lookback: usize,
    /// 지지 터치, 눌림, 저항 계산 기간
    pub structure_lookback: usize,
    /// MA20 지지 터치 허용 오차 (%)
    pub support_tolerance_pct: f64,
    /// 눌림 측정 구간 (직전 고점/이후 저점 봉 수)
    pub pullback_span: usize,
    /// 상승일/하락일 거래량 비교 세션 수
    pub volume_trend_sessions: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            ma_short: 20,
            ma_medium: 50,
            ma_long: 200,
            volume_ma: 50,
            rsi: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            adx: 14,
            bollinger_period: 20,
            bollinger_std_dev: 2.0,
            atr: 14,
            volatility_short: 20,
            volatility_long: 50,
            trading_days_per_year: 252.0,
            smoothing_sigma: 5.0,
            trend_quality_lookback: 60,
            trend_quality_min_bars: 20,
            slope_lookback: 5,
            structure_lookback: 60,
            support_tolerance_pct: 2.0,
            pullback_span: 5,
            volume_trend_sessions: 5,
        }
    }
}

impl IndicatorParams {
    /// 기간 검증: 모든 기간은 1 이상, 변동성 기간은 2 이상.
    pub fn validate(&self) -> ScannerResult<()> {
        let periods = [
            ("ma_short", self.ma_short),
            ("ma_medium", self.ma_medium),
            ("ma_long", self.ma_long),
            ("volume_ma", self.volume_ma),
            ("rsi", self.rsi),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("adx", self.adx),
            ("bollinger_period", self.bollinger_period),
            ("atr", self.atr),
            ("slope_lookback", self.slope_lookback),
            ("structure_lookback", self.structure_lookback),
            ("pullback_span", self.pullback_span),
            ("volume_trend_sessions", self.volume_trend_sessions),
        ];

        if let Some((name, _)) = periods.iter().find(|(_, p)| *p == 0) {
            return Err(ScannerError::InvalidConfig(format!(
                "{} 기간은 0보다 커야 합니다",
                name
            )));
        }

        if self.macd_fast >= self.macd_slow {
            return Err(ScannerError::InvalidConfig(format!(
                "MACD 단기 기간은 장기 기간보다 짧아야 합니다: {} >= {}",
                self.macd_fast, self.macd_slow
            )));
        }

        if self.volatility_short < 2 || self.volatility_long < 2 || self.structure_lookback < 2 {
            return Err(ScannerError::InvalidConfig(
                "변동성 기간과 구조 확인 기간은 2 이상이어야 합니다".to_string(),
            ));
        }

        if self.trend_quality_min_bars < 2 || self.trend_quality_lookback < self.trend_quality_min_bars
        {
            return Err(ScannerError::InvalidConfig(format!(
                "추세 품질 기간이 잘못되었습니다: lookback={}, min_bars={}",
                self.trend_quality_lookback, self.trend_quality_min_bars
            )));
        }

        if !(self.smoothing_sigma > 0.0) || !(self.bollinger_std_dev > 0.0) {
            return Err(ScannerError::InvalidConfig(
                "평활 시그마와 볼린저 배수는 양수여야 합니다".to_string(),
            ));
        }

        Ok(())
    }
}

/// 변동성 기반 티어 조정/필터 설정.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct VolatilityTierConfig {
    /// 변동성에 따른 티어 상향/하향 조정 활성화
    pub enable_tier_modifier: bool,
    /// 저변동성 기준 (%, 미만)
    pub low: f64,
    /// 고변동성 기준 (%, 초과)
    pub high: f64,
    /// 티어별 최대 변동성 필터 활성화
    pub enable_filters: bool,
    /// Tier 1 허용 최대 변동성 (%, 미만)
    pub max_for_tier_1: f64,
    /// Tier 2 허용 최대 변동성 (%, 미만)
    pub max_for_tier_2: f64,
}

impl Default for VolatilityTierConfig {
    fn default() -> Self {
        Self {
            enable_tier_modifier: false,
            low: 25.0,
            high: 40.0,
            enable_filters: false,
            max_for_tier_1: 35.0,
            max_for_tier_2: 50.0,
        }
    }
}

impl ScoringConfig {
    /// 주어진 가중치로 설정을 생성합니다 (나머지는 기본값).
    ///
    /// 합계가 100이 아닌 가중치는 거부됩니다.
    pub fn with_weights(weights: CategoryWeights) -> ScannerResult<Self> {
        let config = Self {
            weights,
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// 전체 설정 검증.
    pub fn validate(&self) -> ScannerResult<()> {
        self.weights.validate()?;
        self.tiers.validate()?;
        self.indicators.validate()?;

        if self.early.min_score > EARLY_SCORE_MAX {
            return Err(ScannerError::InvalidConfig(format!(
                "조기 상승 추세 최소 점수는 0~{} 사이여야 합니다: {}",
                EARLY_SCORE_MAX, self.early.min_score
            )));
        }

        if self.early.rsi_healthy_low > self.early.rsi_healthy_high {
            return Err(ScannerError::InvalidConfig(format!(
                "RSI 건강 구간이 잘못되었습니다: {} > {}",
                self.early.rsi_healthy_low, self.early.rsi_healthy_high
            )));
        }

        if self.early.ma_cross_days == 0
            || self.early.macd_cross_days == 0
            || self.early.breakout_lookback == 0
            || self.early.adx_lookback == 0
        {
            return Err(ScannerError::InvalidConfig(
                "조기 상승 추세 확인 기간은 0보다 커야 합니다".to_string(),
            ));
        }

        if self.established.swing_radius == 0 || self.established.min_swings < 2 {
            return Err(ScannerError::InvalidConfig(format!(
                "스윙 설정이 잘못되었습니다: radius={}, min_swings={}",
                self.established.swing_radius, self.established.min_swings
            )));
        }

        if self.volatility.low > self.volatility.high {
            return Err(ScannerError::InvalidConfig(format!(
                "변동성 기준이 잘못되었습니다: low={} > high={}",
                self.volatility.low, self.volatility.high
            )));
        }

        Ok(())
    }

    /// TOML 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 환경 변수는 `SCANNER__WEIGHTS__TREND_STRENGTH=25` 형식으로 오버라이드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> ScannerResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("SCANNER")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::finish(builder)
    }

    /// 메모리의 TOML 문서에서 설정을 로드합니다.
    pub fn from_toml_str(document: &str) -> ScannerResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from_str(document, config::FileFormat::Toml));

        Self::finish(builder)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> ScannerResult<Self> {
        let config: ScoringConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ScoringConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.weights.total() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_weights_must_sum_to_100() {
        let weights = CategoryWeights {
            trend_strength: 25.0,
            ..CategoryWeights::DEFAULT
        };
        let err = ScoringConfig::with_weights(weights).unwrap_err();
        assert!(matches!(err, ScannerError::InvalidConfig(_)));
    }

    #[test]
    fn test_custom_weights_summing_to_100_accepted() {
        let weights = CategoryWeights {
            trend_strength: 25.0,
            momentum_quality: 20.0,
            volume_profile: 15.0,
            price_structure: 15.0,
            risk_reward: 10.0,
            trend_quality: 15.0,
        };
        let config = ScoringConfig::with_weights(weights).unwrap();
        assert_eq!(config.weights.trend_strength, 25.0);
    }

    #[test]
    fn test_negative_weight_rejected() {
        let weights = CategoryWeights {
            trend_strength: -5.0,
            momentum_quality: 43.0,
            ..CategoryWeights::DEFAULT
        };
        assert!(ScoringConfig::with_weights(weights).is_err());
    }

    #[test]
    fn test_tier_thresholds_must_descend() {
        let mut config = ScoringConfig::default();
        config.tiers.tier_2 = 85.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_early_min_score_bounds() {
        let mut config = ScoringConfig::default();
        config.early.min_score = 9;
        assert!(config.validate().is_err());

        config.early.min_score = 8;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_period_rejected() {
        let mut config = ScoringConfig::default();
        config.indicators.rsi = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_macd_periods_must_be_ordered() {
        let mut config = ScoringConfig::default();
        config.indicators.macd_fast = 26;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_str_partial_override() {
        let document = r#"
            [tiers]
            tier_1 = 85.0

            [early]
            min_score = 6
            volume_multiplier = 2.0
        "#;

        let config = ScoringConfig::from_toml_str(document).unwrap();
        assert_eq!(config.tiers.tier_1, 85.0);
        assert_eq!(config.tiers.tier_2, 60.0);
        assert_eq!(config.early.min_score, 6);
        assert_eq!(config.early.volume_multiplier, 2.0);
        assert_eq!(config.weights, CategoryWeights::DEFAULT);
    }

    #[test]
    fn test_from_toml_str_rejects_bad_weights() {
        let document = r#"
            [weights]
            trend_strength = 30.0
        "#;

        let err = ScoringConfig::from_toml_str(document).unwrap_err();
        assert!(matches!(err, ScannerError::InvalidConfig(_)));
    }
}
