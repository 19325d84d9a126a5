//! 분류 및 점수 결과 레코드.
//!
//! 종목당 하나의 [`ClassificationResult`]가 생성되며, 표 형식 내보내기를 위해
//! 모든 필드가 항상 직렬화됩니다. 계산되지 않은 지표는 `null`로 표시됩니다.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ticker::TickerMetadata;
use crate::types::Price;

/// 점수 기반 종목 등급.
///
/// - **Tier 1 (Prime Movers)**: 최상위 추세 품질
/// - **Tier 2 (Solid Performers)**: 안정적인 추세
/// - **Tier 3 (Momentum Plays)**: 모멘텀 위주
/// - **Tier 4 (Watch List)**: 관찰 대상
///
/// 순서는 등급 번호를 따릅니다 (`PrimeMovers < WatchList`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Tier {
    /// Tier 1
    PrimeMovers,
    /// Tier 2
    SolidPerformers,
    /// Tier 3
    MomentumPlays,
    /// Tier 4
    WatchList,
}

impl Tier {
    /// 등급 번호 (1~4).
    pub fn number(self) -> u8 {
        match self {
            Tier::PrimeMovers => 1,
            Tier::SolidPerformers => 2,
            Tier::MomentumPlays => 3,
            Tier::WatchList => 4,
        }
    }

    /// 등급 이름.
    pub fn label(self) -> &'static str {
        match self {
            Tier::PrimeMovers => "Prime Movers",
            Tier::SolidPerformers => "Solid Performers",
            Tier::MomentumPlays => "Momentum Plays",
            Tier::WatchList => "Watch List",
        }
    }

    /// 등급 번호로부터 생성합니다.
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Tier::PrimeMovers),
            2 => Some(Tier::SolidPerformers),
            3 => Some(Tier::MomentumPlays),
            4 => Some(Tier::WatchList),
            _ => None,
        }
    }

    /// 한 단계 위 등급 (Tier 1은 그대로).
    pub fn upgraded(self) -> Self {
        Self::from_number(self.number().saturating_sub(1)).unwrap_or(self)
    }

    /// 한 단계 아래 등급 (Tier 4는 그대로).
    pub fn downgraded(self) -> Self {
        Self::from_number(self.number() + 1).unwrap_or(self)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tier {} ({})", self.number(), self.label())
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> Self {
        tier.number()
    }
}

impl TryFrom<u8> for Tier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Tier::from_number(value).ok_or_else(|| format!("알 수 없는 티어: {}", value))
    }
}

/// 카테고리별 점수 (합계 100점 만점).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// 추세 강도 (기본 20점)
    pub trend_strength: f64,
    /// 모멘텀 품질 (기본 18점)
    pub momentum_quality: f64,
    /// 거래량 프로파일 (기본 17점)
    pub volume_profile: f64,
    /// 가격 구조 (기본 17점)
    pub price_structure: f64,
    /// 위험/보상 (기본 13점)
    pub risk_reward: f64,
    /// 추세 품질 (기본 15점)
    pub trend_quality: f64,
    /// 총점
    pub total: f64,
}

impl ScoreBreakdown {
    /// 카테고리 점수로부터 생성합니다. 총점은 여섯 값의 합입니다.
    pub fn new(
        trend_strength: f64,
        momentum_quality: f64,
        volume_profile: f64,
        price_structure: f64,
        risk_reward: f64,
        trend_quality: f64,
    ) -> Self {
        let total = trend_strength
            + momentum_quality
            + volume_profile
            + price_structure
            + risk_reward
            + trend_quality;

        Self {
            trend_strength,
            momentum_quality,
            volume_profile,
            price_structure,
            risk_reward,
            trend_quality,
            total,
        }
    }

    /// (카테고리 이름, 점수) 배열.
    pub fn categories(&self) -> [(&'static str, f64); 6] {
        [
            ("trend_strength", self.trend_strength),
            ("momentum_quality", self.momentum_quality),
            ("volume_profile", self.volume_profile),
            ("price_structure", self.price_structure),
            ("risk_reward", self.risk_reward),
            ("trend_quality", self.trend_quality),
        ]
    }
}

/// 세부 항목별 점수 (가중치 반영 후).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreDetails {
    pub adx_level: f64,
    pub ma20_slope: f64,
    pub days_above_ma20: f64,
    pub rsi_position: f64,
    pub macd_histogram: f64,
    pub volume_trend: f64,
    pub relative_volume: f64,
    pub support_touches: f64,
    pub pullback_depth: f64,
    pub ma20_distance: f64,
    pub resistance_room: f64,
    pub choppiness: f64,
    pub efficiency: f64,
    pub trend_deviation: f64,
}

/// 조기 상승 추세 (돌파 단계) 체크 결과.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarlyUptrendChecks {
    /// 최근 N 세션 내 종가의 MA20 상향 돌파
    pub ma20_cross: bool,
    /// 거래량 급증 (50일 평균 대비)
    pub volume_spike: bool,
    /// RSI 건강 구간
    pub rsi_healthy: bool,
    /// ADX 상승
    pub adx_rising: bool,
    /// 최근 N 세션 내 MACD 골든 크로스
    pub macd_cross: bool,
    /// 직전 고점 돌파
    pub breakout: bool,
}

impl EarlyUptrendChecks {
    pub const MA20_CROSS_POINTS: u8 = 2;
    pub const VOLUME_SPIKE_POINTS: u8 = 2;
    pub const RSI_HEALTHY_POINTS: u8 = 1;
    pub const ADX_RISING_POINTS: u8 = 1;
    pub const MACD_CROSS_POINTS: u8 = 1;
    pub const BREAKOUT_POINTS: u8 = 1;

    /// 충족된 체크의 점수 합계 (0~8).
    pub fn score(&self) -> u8 {
        [
            (self.ma20_cross, Self::MA20_CROSS_POINTS),
            (self.volume_spike, Self::VOLUME_SPIKE_POINTS),
            (self.rsi_healthy, Self::RSI_HEALTHY_POINTS),
            (self.adx_rising, Self::ADX_RISING_POINTS),
            (self.macd_cross, Self::MACD_CROSS_POINTS),
            (self.breakout, Self::BREAKOUT_POINTS),
        ]
        .iter()
        .filter(|(passed, _)| *passed)
        .map(|(_, points)| points)
        .sum()
    }

    /// 최소 점수 이상인지 확인합니다.
    pub fn qualifies(&self, min_score: u8) -> bool {
        self.score() >= min_score
    }
}

/// 확립된 상승 추세 (지속 단계) 체크 결과.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstablishedUptrendChecks {
    /// 종가 > MA20 > MA50 > MA200 정배열
    pub stacked_mas: bool,
    /// MA20 위 연속 일수 조건 충족
    pub sustained_above_ma20: bool,
    /// ADX 강한 추세
    pub strong_adx: bool,
    /// 고점 상승
    pub higher_highs: bool,
    /// 저점 상승
    pub higher_lows: bool,
}

impl EstablishedUptrendChecks {
    /// 모든 조건 충족 여부.
    pub fn all_met(&self) -> bool {
        self.stacked_mas
            && self.sustained_above_ma20
            && self.strong_adx
            && self.higher_highs
            && self.higher_lows
    }
}

/// 스윙 포인트 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwingKind {
    High,
    Low,
}

/// 직전 같은 종류의 스윙 대비 레이블.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwingLabel {
    /// Higher High
    #[serde(rename = "HH")]
    HigherHigh,
    /// Lower High
    #[serde(rename = "LH")]
    LowerHigh,
    /// Higher Low
    #[serde(rename = "HL")]
    HigherLow,
    /// Lower Low
    #[serde(rename = "LL")]
    LowerLow,
}

/// 스윙 고점/저점.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwingPoint {
    /// 시계열 인덱스
    pub index: usize,
    /// 거래일
    pub date: NaiveDate,
    /// 고가(스윙 고점) 또는 저가(스윙 저점)
    pub price: Price,
    /// 종류
    pub kind: SwingKind,
    /// 직전 같은 종류 대비 레이블 (첫 스윙은 없음)
    pub label: Option<SwingLabel>,
}

/// 최근 세션 기준 지표 스냅샷.
///
/// `None`은 "계산되지 않음"을 의미하며 `null`로 직렬화됩니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub close: f64,
    pub ma20: Option<f64>,
    pub ma50: Option<f64>,
    pub ma200: Option<f64>,
    pub pct_from_ma20: Option<f64>,
    pub pct_from_ma50: Option<f64>,
    pub pct_from_ma200: Option<f64>,
    pub ma20_slope_pct: Option<f64>,
    pub days_above_ma20: u32,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub adx: Option<f64>,
    pub plus_di: Option<f64>,
    pub minus_di: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,
    pub bb_percent_b: Option<f64>,
    pub atr: Option<f64>,
    pub volatility_20: Option<f64>,
    pub volatility_50: Option<f64>,
    pub smoothed_price: Option<f64>,
    pub velocity: Option<f64>,
    pub acceleration: Option<f64>,
    pub choppiness_index: Option<f64>,
    pub efficiency_ratio: Option<f64>,
    pub trend_deviation_pct: Option<f64>,
    /// 추세 품질 합성 등급 (0~10)
    pub trend_quality_grade: Option<u8>,
    pub avg_volume_50: Option<f64>,
    pub relative_volume: Option<f64>,
    pub support_touches: Option<u32>,
    pub avg_pullback_pct: Option<f64>,
    pub distance_from_ma20_pct: Option<f64>,
    pub room_to_resistance_pct: Option<f64>,
    pub high_60: Option<f64>,
}

/// 종목별 분류 및 점수 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// 종목 코드
    pub ticker: String,
    /// 기준 거래일 (시계열의 마지막 날짜)
    pub as_of: NaiveDate,
    /// 조기 상승 추세 여부
    pub is_early_uptrend: bool,
    /// 조기 상승 추세 점수 (0~8)
    pub early_score: u8,
    /// 조기 상승 추세 체크 내역
    pub early_checks: EarlyUptrendChecks,
    /// 확립된 상승 추세 여부
    pub is_established_uptrend: bool,
    /// 확립된 상승 추세 체크 내역
    pub established_checks: EstablishedUptrendChecks,
    /// 카테고리별 점수
    pub score_breakdown: ScoreBreakdown,
    /// 세부 항목별 점수
    pub score_details: ScoreDetails,
    /// 점수 기반 티어
    pub tier: Tier,
    /// 변동성 조정 티어 (조정 비활성화 시 `tier`와 동일)
    pub volatility_adjusted_tier: Tier,
    /// 티어별 변동성 한도 이내 여부
    pub within_volatility_limit: bool,
    /// 지표 스냅샷
    pub indicators: IndicatorSnapshot,
    /// 구조 확인 구간의 스윙 포인트
    pub swing_points: Vec<SwingPoint>,
    /// 50일 평균 거래량 / 유통 주식 (%)
    pub effective_volume_pct: Option<f64>,
    /// 종목 메타데이터
    pub metadata: TickerMetadata,
}

impl ClassificationResult {
    /// 총점.
    pub fn total_score(&self) -> f64 {
        self.score_breakdown.total
    }

    /// 두 분류 중 하나라도 해당하는지 확인합니다.
    pub fn is_uptrend(&self) -> bool {
        self.is_early_uptrend || self.is_established_uptrend
    }
}
