//! # Scanner Core
//!
//! 상승 추세 스캐너의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 스캐너 전반에서 사용되는 기본 타입을 제공합니다:
//! - 일봉 데이터와 검증된 가격 시계열
//! - 분류/점수 결과 레코드 (티어, 점수 내역, 지표 스냅샷)
//! - 점수 설정 관리 (가중치, 티어 기준, 지표 기간)
//! - 로깅 인프라
//! - 에러 타입

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
