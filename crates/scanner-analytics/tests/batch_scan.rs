//! 병렬 배치 스캔 통합 테스트.

mod common;

use std::collections::HashMap;
use std::sync::Arc;

use common::{range_breakout, steady_decline, wavy_uptrend};
use scanner_analytics::{scan_batch, ScanRequest, UptrendEngine};
use scanner_core::{ScannerError, ScoringConfig, TickerMetadata};

fn engine() -> Arc<UptrendEngine> {
    Arc::new(UptrendEngine::new(ScoringConfig::default()).unwrap())
}

#[tokio::test]
async fn test_batch_returns_one_outcome_per_request() {
    let requests = vec![
        ScanRequest::new("WAVE", wavy_uptrend(250)),
        ScanRequest::new("BRK", range_breakout()),
        ScanRequest::new("DOWN", steady_decline(250)),
        ScanRequest::new("NONE", Vec::new()),
    ];

    let outcomes = scan_batch(engine(), requests, 2).await;
    assert_eq!(outcomes.len(), 4);

    let by_ticker: HashMap<_, _> = outcomes.iter().map(|o| (o.ticker.as_str(), o)).collect();

    let wave = by_ticker["WAVE"].result.as_ref().unwrap();
    assert!(wave.is_established_uptrend);

    let breakout = by_ticker["BRK"].result.as_ref().unwrap();
    assert!(breakout.is_early_uptrend);

    let down = by_ticker["DOWN"].result.as_ref().unwrap();
    assert!(!down.is_uptrend());

    // 분석 불가는 "추세 아님"과 구분됨
    let none = &by_ticker["NONE"];
    assert!(!none.is_success());
    assert!(matches!(none.result, Err(ScannerError::EmptySeries)));
}

#[tokio::test]
async fn test_batch_matches_sequential_analysis() {
    let engine = engine();
    let sequential = engine
        .analyze("WAVE", wavy_uptrend(250), TickerMetadata::default())
        .unwrap();

    let requests = (0..8)
        .map(|i| ScanRequest::new(format!("WAVE{}", i), wavy_uptrend(250)))
        .collect();
    let outcomes = scan_batch(Arc::clone(&engine), requests, 4).await;

    assert_eq!(outcomes.len(), 8);
    for outcome in outcomes {
        let result = outcome.result.unwrap();
        assert_eq!(result.score_breakdown, sequential.score_breakdown);
        assert_eq!(result.tier, sequential.tier);
        assert_eq!(result.early_checks, sequential.early_checks);
    }
}

#[tokio::test]
async fn test_metadata_flows_through_batch() {
    let request =
        ScanRequest::new("WAVE", wavy_uptrend(250)).with_metadata(TickerMetadata::with_float(50_000_000));

    let outcomes = scan_batch(engine(), vec![request], 1).await;
    let result = outcomes[0].result.as_ref().unwrap();

    assert_eq!(result.metadata.float_shares, Some(50_000_000));
    let pct = result.effective_volume_pct.unwrap();
    assert!((pct - 2.0).abs() < 1e-9);
}
