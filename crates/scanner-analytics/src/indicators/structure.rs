//! 가격 구조 분석.
//!
//! - 스윙 고점/저점 탐지와 HH/LH/HL/LL 레이블
//! - MA20 지지 터치 횟수
//! - 눌림(pullback) 깊이

use rust_decimal::Decimal;
use scanner_core::{DailyBar, DecimalExt, SwingKind, SwingLabel, SwingPoint};
use serde::{Deserialize, Serialize};

use super::{IndicatorError, IndicatorResult};

/// 스윙 포인트 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SwingParams {
    /// 탐색 구간 (최근 N 세션, 기본: 60).
    pub window: usize,
    /// 좌우 비교 봉 수 (기본: 3).
    pub radius: usize,
}

impl Default for SwingParams {
    fn default() -> Self {
        Self {
            window: 60,
            radius: 3,
        }
    }
}

/// 지지 터치 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SupportParams {
    /// 확인 구간 (기본: 60).
    pub lookback: usize,
    /// 터치로 인정하는 저가-이동평균 거리 (%, 미만, 기본: 2.0).
    pub tolerance_pct: f64,
}

impl Default for SupportParams {
    fn default() -> Self {
        Self {
            lookback: 60,
            tolerance_pct: 2.0,
        }
    }
}

/// 눌림 깊이 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PullbackParams {
    /// 확인 구간 (기본: 60).
    pub lookback: usize,
    /// 직전 고점/이후 저점 탐색 봉 수 (기본: 5).
    pub span: usize,
}

impl Default for PullbackParams {
    fn default() -> Self {
        Self {
            lookback: 60,
            span: 5,
        }
    }
}

/// 가격 구조 분석기.
#[derive(Debug, Default)]
pub struct PriceStructureAnalyzer;

impl PriceStructureAnalyzer {
    /// 새로운 분석기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 최근 구간의 스윙 고점/저점을 시간 순서로 반환합니다.
    ///
    /// 인덱스 i의 고가가 좌우 `radius`개 봉의 고가보다 모두 높으면 스윙 고점,
    /// 저가가 모두 낮으면 스윙 저점입니다. 좌우 이웃이 모두 존재하는 봉만 후보입니다.
    pub fn swing_points(&self, bars: &[DailyBar], params: SwingParams) -> IndicatorResult<Vec<SwingPoint>> {
        let radius = params.radius;

        if radius == 0 {
            return Err(IndicatorError::InvalidParameter(
                "스윙 반경은 0보다 커야 합니다".to_string(),
            ));
        }

        let len = bars.len();
        if len < radius * 2 + 1 {
            return Err(IndicatorError::InsufficientData {
                required: radius * 2 + 1,
                provided: len,
            });
        }

        let start = len.saturating_sub(params.window).max(radius);
        let end = len - radius;

        let mut points = Vec::new();
        let mut last_high: Option<Decimal> = None;
        let mut last_low: Option<Decimal> = None;

        for i in start..end {
            let neighbors = (i - radius..=i + radius).filter(|j| *j != i);

            let is_high = neighbors.clone().all(|j| bars[i].high > bars[j].high);
            let is_low = neighbors.clone().all(|j| bars[i].low < bars[j].low);

            if is_high {
                let price = bars[i].high;
                let label = last_high.map(|prev| {
                    if price > prev {
                        SwingLabel::HigherHigh
                    } else {
                        SwingLabel::LowerHigh
                    }
                });
                last_high = Some(price);
                points.push(SwingPoint {
                    index: i,
                    date: bars[i].date,
                    price,
                    kind: SwingKind::High,
                    label,
                });
            }

            if is_low {
                let price = bars[i].low;
                let label = last_low.map(|prev| {
                    if price > prev {
                        SwingLabel::HigherLow
                    } else {
                        SwingLabel::LowerLow
                    }
                });
                last_low = Some(price);
                points.push(SwingPoint {
                    index: i,
                    date: bars[i].date,
                    price,
                    kind: SwingKind::Low,
                    label,
                });
            }
        }

        Ok(points)
    }

    /// MA 지지 터치 횟수.
    ///
    /// 당일을 제외한 최근 `lookback - 1`개 세션(인덱스 `len - lookback ..= len - 2`)에서
    /// `|저가 - MA| / MA < tolerance` 인 세션 수입니다.
    /// 구간 내 MA가 하나라도 없으면 InsufficientData입니다.
    pub fn support_touches(
        &self,
        lows: &[Decimal],
        ma: &[Option<Decimal>],
        params: SupportParams,
    ) -> IndicatorResult<u32> {
        let len = lows.len().min(ma.len());

        if params.lookback < 2 {
            return Err(IndicatorError::InvalidParameter(
                "지지 확인 구간은 2 이상이어야 합니다".to_string(),
            ));
        }

        if len < params.lookback {
            return Err(IndicatorError::InsufficientData {
                required: params.lookback,
                provided: len,
            });
        }

        let tolerance = params.tolerance_pct / 100.0;
        let mut touches = 0u32;

        for i in (len - params.lookback)..(len - 1) {
            let ma_value = ma[i].ok_or(IndicatorError::InsufficientData {
                required: params.lookback,
                provided: len - i - 1,
            })?;

            if ma_value <= Decimal::ZERO {
                continue;
            }

            let distance = ((lows[i] - ma_value).abs() / ma_value).to_f64_lossy();
            if distance < tolerance {
                touches += 1;
            }
        }

        Ok(touches)
    }

    /// 최근 구간의 눌림 깊이 목록 (%).
    ///
    /// 구간 내 각 인덱스 i(span ≤ i)에 대해 직전 span개 봉의 최고가와
    /// i부터 span개 봉(구간 끝에서 잘림)의 최저가 사이 하락률을 구하고, 양수만 남깁니다.
    pub fn pullback_depths(
        &self,
        highs: &[Decimal],
        lows: &[Decimal],
        params: PullbackParams,
    ) -> IndicatorResult<Vec<f64>> {
        let len = highs.len().min(lows.len());

        if params.span == 0 {
            return Err(IndicatorError::InvalidParameter(
                "눌림 구간은 0보다 커야 합니다".to_string(),
            ));
        }

        if len < params.lookback || params.lookback <= params.span {
            return Err(IndicatorError::InsufficientData {
                required: params.lookback.max(params.span + 1),
                provided: len,
            });
        }

        let highs = &highs[len - params.lookback..len];
        let lows = &lows[len - params.lookback..len];
        let n = highs.len();
        let mut depths = Vec::new();

        for i in params.span..n {
            let local_high = highs[i - params.span..i].iter().max().copied();
            let subsequent_low = lows[i..(i + params.span).min(n)].iter().min().copied();

            if let (Some(high), Some(low)) = (local_high, subsequent_low) {
                if high <= Decimal::ZERO {
                    continue;
                }
                let pct = ((high - low) / high).to_f64_lossy() * 100.0;
                if pct > 0.0 {
                    depths.push(pct);
                }
            }
        }

        Ok(depths)
    }
}

/// 주어진 종류의 스윙이 `min_swings`개 이상이고, 각각이 직전 값보다 엄격히 높은지 확인합니다.
pub fn is_rising_sequence(points: &[SwingPoint], kind: SwingKind, min_swings: usize) -> bool {
    let prices: Vec<Decimal> = points
        .iter()
        .filter(|p| p.kind == kind)
        .map(|p| p.price)
        .collect();

    prices.len() >= min_swings.max(2) && prices.windows(2).all(|w| w[1] > w[0])
}
