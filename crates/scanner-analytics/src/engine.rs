//! 상승 추세 분석 엔진.
//!
//! 가격 시계열 → 지표 집합 → {분류기, 점수 계산기} → 티어 배정 → 종목별 결과.
//!
//! 엔진은 생성 시 검증된 설정만 보관하며 호출 간 공유 상태가 없습니다.
//! 같은 시계열과 설정에 대해 항상 같은 결과를 반환하고, 여러 스레드에서
//! 동시에 호출해도 됩니다.

use scanner_core::{
    scan_span, ClassificationResult, DailyBar, PriceSeries, ScannerResult, ScoringConfig,
    TickerMetadata,
};
use tracing::{debug, warn};

use crate::classifier::UptrendClassifier;
use crate::indicator_set::IndicatorSet;
use crate::scoring::{ScoringInputs, StockScorer};
use crate::tier::TierAssigner;

/// 상승 추세 분석 엔진.
#[derive(Debug)]
pub struct UptrendEngine {
    config: ScoringConfig,
    classifier: UptrendClassifier,
    scorer: StockScorer,
    tiers: TierAssigner,
}

impl UptrendEngine {
    /// 설정을 검증하고 엔진을 생성합니다.
    pub fn new(config: ScoringConfig) -> ScannerResult<Self> {
        config.validate()?;

        Ok(Self {
            classifier: UptrendClassifier::new(),
            scorer: StockScorer::new(config.weights),
            tiers: TierAssigner::new(config.tiers, config.volatility),
            config,
        })
    }

    /// 엔진 설정.
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// 일봉 목록을 검증한 뒤 분석합니다.
    ///
    /// 잘못된 시계열은 `MalformedSeries`/`EmptySeries` 에러로 반환되며,
    /// "분석했지만 조건 미충족"은 정상 결과입니다.
    pub fn analyze(
        &self,
        ticker: &str,
        bars: Vec<DailyBar>,
        metadata: TickerMetadata,
    ) -> ScannerResult<ClassificationResult> {
        let series = PriceSeries::new(bars).map_err(|err| {
            warn!(ticker, error = %err, "잘못된 가격 시계열");
            err
        })?;

        self.analyze_series(ticker, &series, metadata)
    }

    /// 검증된 시계열을 분석합니다.
    pub fn analyze_series(
        &self,
        ticker: &str,
        series: &PriceSeries,
        metadata: TickerMetadata,
    ) -> ScannerResult<ClassificationResult> {
        let span = scan_span!("analyze", ticker, series.len());
        let _guard = span.enter();

        let indicators = IndicatorSet::compute(series, &self.config)?;

        let early_checks = self
            .classifier
            .early(&indicators, series, &self.config.early);
        let established_checks =
            self.classifier
                .established(&indicators, series, &self.config.established);

        // 이력이 짧으면 점수와 무관하게 조기 상승 추세 아님
        let is_early_uptrend = series.len() >= self.config.early.min_history
            && early_checks.qualifies(self.config.early.min_score);

        let inputs = ScoringInputs::from_indicators(&indicators, self.config.indicators.slope_lookback);
        let (score_breakdown, score_details) = self.scorer.score(&inputs);

        let volatility = indicators.latest_volatility_short();
        let tier = self.tiers.assign(score_breakdown.total);
        let volatility_adjusted_tier = self.tiers.volatility_adjusted(tier, volatility);
        let within_volatility_limit = self.tiers.within_volatility_limit(tier, volatility);

        let snapshot = indicators.snapshot(series);
        let effective_volume_pct = metadata.effective_volume_pct(snapshot.avg_volume_50);

        let result = ClassificationResult {
            ticker: ticker.to_string(),
            as_of: series.as_of(),
            is_early_uptrend,
            early_score: early_checks.score(),
            early_checks,
            is_established_uptrend: established_checks.all_met(),
            established_checks,
            score_breakdown,
            score_details,
            tier,
            volatility_adjusted_tier,
            within_volatility_limit,
            indicators: snapshot,
            swing_points: indicators.swing_points,
            effective_volume_pct,
            metadata,
        };

        debug!(
            early = result.is_early_uptrend,
            early_score = result.early_score,
            established = result.is_established_uptrend,
            total = result.score_breakdown.total,
            tier = result.tier.number(),
            "분석 완료"
        );

        Ok(result)
    }
}
