//! 스캐너 에러 타입.
//!
//! "분석했지만 조건 미충족"은 에러가 아니라 정상 결과입니다.
//! 이 모듈의 에러는 분석 자체가 불가능한 경우(잘못된 입력, 잘못된 설정)에만 사용됩니다.

use thiserror::Error;

/// 핵심 스캐너 에러.
#[derive(Debug, Error)]
pub enum ScannerError {
    /// 빈 시계열
    #[error("가격 시계열이 비어 있습니다")]
    EmptySeries,

    /// 잘못된 시계열 (날짜 역전, 음수 가격/거래량, 고가 < 저가 등)
    #[error("잘못된 시계열 ({index}번째 봉): {reason}")]
    MalformedSeries { index: usize, reason: String },

    /// 설정 검증 실패
    #[error("잘못된 설정: {0}")]
    InvalidConfig(String),

    /// 설정 파일 로드 실패
    #[error("설정 로드 실패: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    /// 지표 계산 에러
    #[error("지표 계산 에러: {0}")]
    Indicator(String),

    /// 배치 작업 실행 실패
    #[error("작업 실행 실패: {0}")]
    Task(String),
}

/// 스캐너 작업을 위한 Result 타입.
pub type ScannerResult<T> = Result<T, ScannerError>;

impl ScannerError {
    /// 입력 데이터 문제로 분석할 수 없는 경우인지 확인합니다.
    ///
    /// 호출자는 이 값으로 "분석 불가"와 "추세 아님"을 구분합니다.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            ScannerError::EmptySeries | ScannerError::MalformedSeries { .. }
        )
    }

    /// 재시도 가능한 에러인지 확인합니다.
    ///
    /// 엔진 자체는 재시도하지 않습니다. 배치 작업 실패만 재시도 대상입니다.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ScannerError::Task(_))
    }
}
