//! # Scanner Analytics
//!
//! 일봉 시계열을 분석해 상승 추세를 분류하고 점수를 매기는 엔진입니다.
//!
//! ## 구성
//!
//! - [`indicators`]: 기술적 지표 (SMA, EMA, MACD, ADX, RSI, 볼린저 밴드, ATR,
//!   변동성, 가우시안 평활, 추세 품질, 스윙 구조)
//! - [`indicator_set`]: 시계열 하나에 대한 전체 지표 집합
//! - [`classifier`]: 조기/확립된 상승 추세 판정
//! - [`scoring`]: 6개 카테고리 점수 계산
//! - [`tier`]: 티어 배정
//! - [`engine`]: 전체 파이프라인
//! - [`batch`]: 여러 종목 병렬 스캔
//!
//! ## 사용 예시
//!
//! ```ignore
//! use scanner_analytics::UptrendEngine;
//! use scanner_core::{ScoringConfig, TickerMetadata};
//!
//! let engine = UptrendEngine::new(ScoringConfig::default())?;
//! let result = engine.analyze("AAPL", bars, TickerMetadata::default())?;
//! println!("{} {:.1}", result.tier, result.total_score());
//! ```

pub mod batch;
pub mod classifier;
pub mod engine;
pub mod indicator_set;
pub mod indicators;
pub mod scoring;
pub mod tier;

pub use batch::{scan_batch, ScanOutcome, ScanRequest};
pub use classifier::UptrendClassifier;
pub use engine::UptrendEngine;
pub use indicator_set::{IndicatorSet, VolumeSplit};
pub use indicators::{IndicatorEngine, IndicatorError, IndicatorResult};
pub use scoring::{PullbackDepth, ScoringInputs, StockScorer, VolumeTrend};
pub use tier::TierAssigner;
