//! 상승 추세 점수 계산.
//!
//! - [`buckets`]: 세부 항목별 구간 점수표
//! - [`inputs`]: 지표 집합에서 추출한 점수 입력값
//! - [`scorer`]: 가중치 환산과 카테고리 합산

pub mod buckets;
pub mod inputs;
pub mod scorer;

pub use buckets::{Bucket, BucketTable};
pub use inputs::{PullbackDepth, ScoringInputs, VolumeTrend};
pub use scorer::StockScorer;
