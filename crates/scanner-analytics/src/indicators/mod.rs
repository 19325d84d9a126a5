//! 기술적 지표 모듈.
//!
//! 상승 추세 분류와 점수 계산에 사용되는 지표를 제공합니다.
//!
//! # 지원 지표
//!
//! ## 추세 지표 (Trend Indicators)
//! - **SMA** / **EMA**: 단순/지수 이동평균
//! - **MACD**: 이동평균 수렴/확산
//! - **ADX**: 평균 방향성 지수 (Wilder)
//!
//! ## 모멘텀 지표 (Momentum Indicators)
//! - **RSI**: 상대강도지수 (Wilder)
//!
//! ## 변동성 지표 (Volatility Indicators)
//! - **Bollinger Bands**: 볼린저 밴드
//! - **ATR**: 평균 실제 범위
//! - **연환산 변동성**: 로그 수익률 표준편차
//!
//! ## 추세 품질 / 구조
//! - **Choppiness Index**, **Efficiency Ratio**, 평활 괴리율
//! - **가우시안 평활**: 평활 가격, 속도, 가속도
//! - **스윙 포인트**, MA20 지지 터치, 눌림 깊이
//!
//! # 사용 예시
//!
//! ```ignore
//! use scanner_analytics::indicators::{IndicatorEngine, SmaParams, RsiParams};
//!
//! let engine = IndicatorEngine::new();
//! let sma = engine.sma(&closes, SmaParams { period: 20 })?;
//! let rsi = engine.rsi(&closes, RsiParams { period: 14 })?;
//! ```

pub mod momentum;
pub mod smoothing;
pub mod structure;
pub mod trend;
pub mod trend_quality;
pub mod volatility;

use rust_decimal::Decimal;
use scanner_core::{DailyBar, SwingPoint};
use thiserror::Error;

pub use momentum::{MomentumCalculator, RsiParams};
pub use smoothing::{GaussianParams, GaussianSmoother, SmoothedSeries};
pub use structure::{is_rising_sequence, PriceStructureAnalyzer, PullbackParams, SupportParams, SwingParams};
pub use trend::{AdxParams, AdxResult, EmaParams, MacdParams, MacdResult, SmaParams, TrendIndicators};
pub use trend_quality::{TrendQuality, TrendQualityCalculator, TrendQualityParams};
pub use volatility::{
    AtrParams, BollingerBandsParams, BollingerBandsResult, HistoricalVolatilityParams,
    VolatilityIndicators,
};

/// 지표 계산 오류.
#[derive(Debug, Error)]
pub enum IndicatorError {
    /// 데이터 부족 오류
    #[error("데이터가 부족합니다: 필요 {required}개, 제공 {provided}개")]
    InsufficientData { required: usize, provided: usize },

    /// 잘못된 파라미터
    #[error("잘못된 파라미터: {0}")]
    InvalidParameter(String),

    /// 계산 오류
    #[error("계산 오류: {0}")]
    CalculationError(String),
}

impl IndicatorError {
    /// 데이터 부족으로 인한 오류인지 확인합니다.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, IndicatorError::InsufficientData { .. })
    }
}

impl From<IndicatorError> for scanner_core::ScannerError {
    fn from(err: IndicatorError) -> Self {
        scanner_core::ScannerError::Indicator(err.to_string())
    }
}

/// 지표 계산 결과 타입.
pub type IndicatorResult<T> = Result<T, IndicatorError>;

/// 통합 지표 엔진.
///
/// 모든 지표 계산을 위한 단일 진입점입니다. 상태가 없으므로 여러 스레드에서
/// 동시에 사용해도 됩니다.
#[derive(Debug, Default)]
pub struct IndicatorEngine {
    trend: TrendIndicators,
    momentum: MomentumCalculator,
    volatility: VolatilityIndicators,
    smoother: GaussianSmoother,
    quality: TrendQualityCalculator,
    structure: PriceStructureAnalyzer,
}

impl IndicatorEngine {
    /// 새로운 지표 엔진 생성.
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== 추세 지표 ====================

    /// 단순 이동평균 (SMA). 처음 period-1개는 None.
    pub fn sma(&self, prices: &[Decimal], params: SmaParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.trend.sma(prices, params)
    }

    /// 지수 이동평균 (EMA).
    pub fn ema(&self, prices: &[Decimal], params: EmaParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.trend.ema(prices, params)
    }

    /// MACD 라인, 시그널 라인, 히스토그램.
    pub fn macd(&self, prices: &[Decimal], params: MacdParams) -> IndicatorResult<Vec<MacdResult>> {
        self.trend.macd(prices, params)
    }

    /// ADX와 +DI/-DI.
    pub fn adx(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: AdxParams,
    ) -> IndicatorResult<Vec<AdxResult>> {
        self.trend.adx(high, low, close, params)
    }

    /// 최근 `lookback`개 세션 내 상향 돌파 여부.
    pub fn crossed_above_within(
        &self,
        fast: &[Option<Decimal>],
        slow: &[Option<Decimal>],
        lookback: usize,
    ) -> bool {
        self.trend.crossed_above_within(fast, slow, lookback)
    }

    // ==================== 모멘텀 지표 ====================

    /// RSI (0~100).
    pub fn rsi(&self, prices: &[Decimal], params: RsiParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.momentum.rsi(prices, params)
    }

    // ==================== 변동성 지표 ====================

    /// 볼린저 밴드.
    pub fn bollinger_bands(
        &self,
        prices: &[Decimal],
        params: BollingerBandsParams,
    ) -> IndicatorResult<Vec<BollingerBandsResult>> {
        self.volatility.bollinger_bands(prices, params)
    }

    /// ATR (Average True Range).
    pub fn atr(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: AtrParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.volatility.atr(high, low, close, params)
    }

    /// 연환산 변동성 (%).
    pub fn annualized_volatility(
        &self,
        closes: &[Decimal],
        params: HistoricalVolatilityParams,
    ) -> IndicatorResult<Vec<Option<f64>>> {
        self.volatility.annualized_volatility(closes, params)
    }

    // ==================== 평활 / 추세 품질 ====================

    /// 가우시안 평활 가격과 속도/가속도.
    pub fn smoothed_derivatives(
        &self,
        prices: &[f64],
        params: GaussianParams,
    ) -> IndicatorResult<SmoothedSeries> {
        self.smoother.smooth_with_derivatives(prices, params)
    }

    /// 최근 구간의 Choppiness Index, Efficiency Ratio, 평활 괴리율.
    pub fn trend_quality(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: TrendQualityParams,
    ) -> IndicatorResult<TrendQuality> {
        self.quality.calculate(high, low, close, params)
    }

    // ==================== 가격 구조 ====================

    /// 스윙 고점/저점.
    pub fn swing_points(&self, bars: &[DailyBar], params: SwingParams) -> IndicatorResult<Vec<SwingPoint>> {
        self.structure.swing_points(bars, params)
    }

    /// MA 지지 터치 횟수.
    pub fn support_touches(
        &self,
        lows: &[Decimal],
        ma: &[Option<Decimal>],
        params: SupportParams,
    ) -> IndicatorResult<u32> {
        self.structure.support_touches(lows, ma, params)
    }

    /// 눌림 깊이 목록 (%).
    pub fn pullback_depths(
        &self,
        highs: &[Decimal],
        lows: &[Decimal],
        params: PullbackParams,
    ) -> IndicatorResult<Vec<f64>> {
        self.structure.pullback_depths(highs, lows, params)
    }
}
