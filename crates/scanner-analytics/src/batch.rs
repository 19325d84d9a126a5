//! 여러 종목 병렬 스캔.
//!
//! 종목별 분석은 CPU 작업이므로 `spawn_blocking`으로 blocking thread pool에서
//! 실행하고, `buffer_unordered`로 동시 실행 수를 제한합니다. 결과 순서는
//! 요청 순서와 다를 수 있습니다.

use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use scanner_core::{ClassificationResult, DailyBar, ScannerError, ScannerResult, TickerMetadata};
use tracing::info;

use crate::engine::UptrendEngine;

/// 종목 하나의 스캔 요청.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub ticker: String,
    pub bars: Vec<DailyBar>,
    pub metadata: TickerMetadata,
}

impl ScanRequest {
    pub fn new(ticker: impl Into<String>, bars: Vec<DailyBar>) -> Self {
        Self {
            ticker: ticker.into(),
            bars,
            metadata: TickerMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: TickerMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// 종목 하나의 스캔 결과.
#[derive(Debug)]
pub struct ScanOutcome {
    pub ticker: String,
    /// 분석 결과 또는 분석 불가 사유
    pub result: ScannerResult<ClassificationResult>,
    pub elapsed_ms: u64,
}

impl ScanOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// 요청 목록을 최대 `parallelism`개씩 동시에 분석합니다.
///
/// 요청마다 하나의 결과를 반환하며, 한 종목의 실패가 다른 종목에 영향을 주지 않습니다.
pub async fn scan_batch(
    engine: Arc<UptrendEngine>,
    requests: Vec<ScanRequest>,
    parallelism: usize,
) -> Vec<ScanOutcome> {
    let started = Instant::now();
    let total = requests.len();
    let parallelism = parallelism.max(1);

    let outcomes: Vec<ScanOutcome> = stream::iter(requests)
        .map(|request| {
            let engine = Arc::clone(&engine);
            async move { scan_one(engine, request).await }
        })
        .buffer_unordered(parallelism)
        .collect()
        .await;

    let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
    info!(
        total,
        succeeded,
        failed = total - succeeded,
        parallelism,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "배치 스캔 완료"
    );

    outcomes
}

async fn scan_one(engine: Arc<UptrendEngine>, request: ScanRequest) -> ScanOutcome {
    let started = Instant::now();
    let ScanRequest {
        ticker,
        bars,
        metadata,
    } = request;
    let task_ticker = ticker.clone();

    let result = tokio::task::spawn_blocking(move || engine.analyze(&task_ticker, bars, metadata))
        .await
        .map_err(|e| ScannerError::Task(format!("{} 분석 태스크 실행 실패: {}", ticker, e)))
        .and_then(|result| result);

    ScanOutcome {
        ticker,
        result,
        elapsed_ms: started.elapsed().as_millis() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanner_core::ScoringConfig;

    #[tokio::test]
    async fn test_empty_batch() {
        let engine = Arc::new(UptrendEngine::new(ScoringConfig::default()).unwrap());
        let outcomes = scan_batch(engine, Vec::new(), 4).await;
        assert!(outcomes.is_empty());
    }

    #[tokio::test]
    async fn test_zero_parallelism_still_runs() {
        let engine = Arc::new(UptrendEngine::new(ScoringConfig::default()).unwrap());
        let outcomes = scan_batch(engine, vec![ScanRequest::new("EMPTY", Vec::new())], 0).await;

        assert_eq!(outcomes.len(), 1);
        assert!(!outcomes[0].is_success());
        assert!(matches!(outcomes[0].result, Err(ScannerError::EmptySeries)));
    }
}
