//! 상승 추세 분류기.
//!
//! 최근 세션 하나에 대해 두 가지 독립적인 판정을 수행합니다.
//! - **조기 상승 추세**: 여섯 가지 체크의 점수 합계 (8점 만점)
//! - **확립된 상승 추세**: 다섯 가지 조건의 논리곱
//!
//! 두 판정은 서로 배타적이지 않습니다. 필요한 지표가 계산되지 않았으면 해당
//! 체크는 충족되지 않은 것으로 봅니다.

use rust_decimal::Decimal;
use scanner_core::{
    DecimalExt, EarlyUptrendChecks, EarlyUptrendConfig, EstablishedUptrendChecks,
    EstablishedUptrendConfig, PriceSeries, SwingKind,
};

use crate::indicator_set::{latest, sessions_ago, IndicatorSet};
use crate::indicators::{is_rising_sequence, TrendIndicators};

/// 상승 추세 분류기.
#[derive(Debug, Default)]
pub struct UptrendClassifier {
    trend: TrendIndicators,
}

impl UptrendClassifier {
    /// 새로운 분류기 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 조기 상승 추세 체크.
    pub fn early(
        &self,
        indicators: &IndicatorSet,
        series: &PriceSeries,
        config: &EarlyUptrendConfig,
    ) -> EarlyUptrendChecks {
        let closes: Vec<Option<Decimal>> = indicators.closes.iter().copied().map(Some).collect();
        let ma20_cross =
            self.trend
                .crossed_above_within(&closes, &indicators.ma_short, config.ma_cross_days);

        let volume_spike = indicators
            .relative_volume
            .map(|rv| rv >= config.volume_multiplier)
            .unwrap_or(false);

        let rsi_healthy = indicators
            .latest_rsi()
            .map(|rsi| {
                let rsi = rsi.to_f64_lossy();
                rsi >= config.rsi_healthy_low && rsi <= config.rsi_healthy_high
            })
            .unwrap_or(false);

        let adx_values: Vec<Option<Decimal>> = indicators.adx.iter().map(|a| a.adx).collect();
        let adx_rising = match (latest(&adx_values), sessions_ago(&adx_values, config.adx_lookback)) {
            (Some(current), Some(prior)) => {
                current.to_f64_lossy() > config.adx_floor && current > prior
            }
            _ => false,
        };

        let macd_line: Vec<Option<Decimal>> = indicators.macd.iter().map(|m| m.macd).collect();
        let signal_line: Vec<Option<Decimal>> = indicators.macd.iter().map(|m| m.signal).collect();
        let macd_cross =
            self.trend
                .crossed_above_within(&macd_line, &signal_line, config.macd_cross_days);

        let breakout = Self::breakout(series, config.breakout_lookback);

        EarlyUptrendChecks {
            ma20_cross,
            volume_spike,
            rsi_healthy,
            adx_rising,
            macd_cross,
            breakout,
        }
    }

    /// 확립된 상승 추세 체크.
    pub fn established(
        &self,
        indicators: &IndicatorSet,
        series: &PriceSeries,
        config: &EstablishedUptrendConfig,
    ) -> EstablishedUptrendChecks {
        let close = series.latest().close;

        let stacked_mas = match (
            latest(&indicators.ma_short),
            latest(&indicators.ma_medium),
            latest(&indicators.ma_long),
        ) {
            (Some(ma20), Some(ma50), Some(ma200)) => close > ma20 && ma20 > ma50 && ma50 > ma200,
            _ => false,
        };

        let sustained_above_ma20 = indicators.days_above_ma20 >= config.min_days_above_ma20;

        let strong_adx = indicators
            .latest_adx()
            .map(|adx| adx.to_f64_lossy() > config.adx_threshold)
            .unwrap_or(false);

        let higher_highs =
            is_rising_sequence(&indicators.swing_points, SwingKind::High, config.min_swings);
        let higher_lows =
            is_rising_sequence(&indicators.swing_points, SwingKind::Low, config.min_swings);

        EstablishedUptrendChecks {
            stacked_mas,
            sustained_above_ma20,
            strong_adx,
            higher_highs,
            higher_lows,
        }
    }

    /// 당일 종가 > 직전 `lookback`개 세션(당일 제외)의 최고가.
    fn breakout(series: &PriceSeries, lookback: usize) -> bool {
        let bars = series.bars();
        let len = bars.len();
        if lookback == 0 || len < lookback + 1 {
            return false;
        }

        bars[len - 1 - lookback..len - 1]
            .iter()
            .map(|b| b.high)
            .max()
            .map(|prior_high| bars[len - 1].close > prior_high)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use scanner_core::{DailyBar, ScoringConfig};

    fn bar(day: i64, close: Decimal, high: Decimal, volume: Decimal) -> DailyBar {
        let date = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap() + chrono::Duration::days(day);
        DailyBar::new(date, close, high, close - dec!(1), close, volume)
    }

    /// 횡보 후 마지막 봉에서 거래량을 동반해 돌파하는 시계열.
    fn breakout_series() -> PriceSeries {
        let mut bars: Vec<DailyBar> = (0..200)
            .map(|i| {
                let close = if i % 2 == 0 { dec!(99.5) } else { dec!(100.5) };
                bar(i, close, dec!(101), dec!(1000000))
            })
            .collect();
        bars.push(bar(200, dec!(106), dec!(106.5), dec!(3000000)));
        PriceSeries::new(bars).unwrap()
    }

    /// 꾸준히 하락하는 시계열.
    fn declining_series() -> PriceSeries {
        let bars = (0..250)
            .map(|i| {
                let close = Decimal::from(400 - i);
                bar(i, close, close + dec!(1), dec!(1000000))
            })
            .collect();
        PriceSeries::new(bars).unwrap()
    }

    #[test]
    fn test_breakout_bar_triggers_cross_spike_and_breakout() {
        let config = ScoringConfig::default();
        let series = breakout_series();
        let set = IndicatorSet::compute(&series, &config).unwrap();

        let checks = UptrendClassifier::new().early(&set, &series, &config.early);

        assert!(checks.ma20_cross);
        assert!(checks.volume_spike);
        assert!(checks.breakout);
        assert!(checks.score() >= 5);
        assert!(checks.qualifies(config.early.min_score));
    }

    #[test]
    fn test_declining_series_fails_every_check() {
        let config = ScoringConfig::default();
        let series = declining_series();
        let set = IndicatorSet::compute(&series, &config).unwrap();
        let classifier = UptrendClassifier::new();

        let early = classifier.early(&set, &series, &config.early);
        assert!(!early.ma20_cross);
        assert!(!early.volume_spike);
        assert!(!early.rsi_healthy);
        assert!(!early.breakout);
        assert!(!early.qualifies(config.early.min_score));

        let established = classifier.established(&set, &series, &config.established);
        assert!(!established.stacked_mas);
        assert!(!established.sustained_above_ma20);
        assert!(!established.all_met());
    }

    #[test]
    fn test_breakout_requires_close_above_prior_highs() {
        let mut bars: Vec<DailyBar> = (0..25)
            .map(|i| bar(i, dec!(100), dec!(105), dec!(1000)))
            .collect();
        // 직전 고가와 같은 종가는 돌파가 아님
        bars.push(bar(25, dec!(105), dec!(105), dec!(1000)));
        let series = PriceSeries::new(bars).unwrap();
        assert!(!UptrendClassifier::breakout(&series, 20));

        let mut bars = series.bars().to_vec();
        bars.push(bar(26, dec!(105.5), dec!(106), dec!(1000)));
        let series = PriceSeries::new(bars).unwrap();
        assert!(UptrendClassifier::breakout(&series, 20));
    }

    #[test]
    fn test_breakout_needs_full_lookback() {
        let bars = (0..20)
            .map(|i| {
                let close = Decimal::from(100 + i);
                bar(i, close, close, dec!(1000))
            })
            .collect();
        let series = PriceSeries::new(bars).unwrap();
        assert!(!UptrendClassifier::breakout(&series, 20));
    }

    #[test]
    fn test_short_series_is_never_stacked() {
        let config = ScoringConfig::default();
        let bars = (0..90)
            .map(|i| {
                let close = Decimal::from(100 + i);
                bar(i, close, close + dec!(1), dec!(1000000))
            })
            .collect();
        let series = PriceSeries::new(bars).unwrap();
        let set = IndicatorSet::compute(&series, &config).unwrap();

        let checks = UptrendClassifier::new().established(&set, &series, &config.established);
        assert!(!checks.stacked_mas);
        assert!(checks.sustained_above_ma20);
        assert!(!checks.all_met());
    }
}
