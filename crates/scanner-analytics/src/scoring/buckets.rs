//! 구간별 점수표.
//!
//! 각 표는 `(하한, 상한, 점수)` 구간의 순서 있는 목록이며 위에서부터 평가해
//! 처음 일치하는 구간의 점수를 사용합니다. 어떤 구간에도 속하지 않으면
//! `fallback` 점수입니다. 경계 포함 여부는 [`Bound`]로 명시합니다.
//!
//! 점수는 기본 가중치 기준입니다. 사용자 가중치는 [`super::StockScorer`]에서 비율로 환산합니다.

use std::ops::{Bound, RangeBounds};

use Bound::{Excluded, Included, Unbounded};

/// 점수 구간.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    pub lower: Bound<f64>,
    pub upper: Bound<f64>,
    pub points: f64,
}

impl Bucket {
    /// 값이 구간에 속하는지 확인합니다.
    pub fn contains(&self, value: f64) -> bool {
        (self.lower, self.upper).contains(&value)
    }
}

/// 순서 있는 점수표.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketTable {
    /// 표 이름 (로그/테스트용)
    pub name: &'static str,
    pub buckets: &'static [Bucket],
    /// 어느 구간에도 속하지 않을 때의 점수
    pub fallback: f64,
}

impl BucketTable {
    /// 값에 해당하는 점수 (기본 가중치 기준).
    pub fn lookup(&self, value: f64) -> f64 {
        if value.is_nan() {
            return 0.0;
        }

        self.buckets
            .iter()
            .find(|b| b.contains(value))
            .map(|b| b.points)
            .unwrap_or(self.fallback)
    }

    /// 표에서 얻을 수 있는 최대 점수.
    pub fn max_points(&self) -> f64 {
        self.buckets
            .iter()
            .map(|b| b.points)
            .fold(self.fallback, f64::max)
    }
}

const fn bucket(lower: Bound<f64>, upper: Bound<f64>, points: f64) -> Bucket {
    Bucket {
        lower,
        upper,
        points,
    }
}

// ==================== 추세 강도 (20) ====================

/// ADX 수준: 40 이상 8, 30~40 6, 25~30 4, 그 외 2.
pub const ADX_LEVEL: BucketTable = BucketTable {
    name: "adx_level",
    buckets: &[
        bucket(Included(40.0), Unbounded, 8.0),
        bucket(Included(30.0), Excluded(40.0), 6.0),
        bucket(Included(25.0), Excluded(30.0), 4.0),
    ],
    fallback: 2.0,
};

/// MA20 기울기 (%, 5 세션).
pub const MA20_SLOPE: BucketTable = BucketTable {
    name: "ma20_slope",
    buckets: &[
        bucket(Excluded(3.0), Unbounded, 8.0),
        bucket(Excluded(1.5), Included(3.0), 6.0),
        bucket(Excluded(0.5), Included(1.5), 3.0),
    ],
    fallback: 0.0,
};

/// MA20 위 연속 일수. 20~60일이 가장 좋습니다.
pub const DAYS_ABOVE_MA20: BucketTable = BucketTable {
    name: "days_above_ma20",
    buckets: &[
        bucket(Included(20.0), Included(60.0), 4.0),
        bucket(Excluded(60.0), Included(120.0), 2.0),
        bucket(Excluded(120.0), Unbounded, 1.0),
    ],
    fallback: 0.0,
};

// ==================== 모멘텀 품질 (18) ====================

/// RSI 위치.
pub const RSI_POSITION: BucketTable = BucketTable {
    name: "rsi_position",
    buckets: &[
        bucket(Included(55.0), Included(65.0), 9.0),
        bucket(Included(50.0), Excluded(55.0), 6.0),
        bucket(Excluded(65.0), Included(70.0), 6.0),
        bucket(Excluded(70.0), Included(80.0), 3.0),
        bucket(Excluded(80.0), Unbounded, 1.0),
    ],
    fallback: 0.0,
};

/// MACD 히스토그램 추세 점수.
pub const MACD_EXPANDING: f64 = 9.0;
pub const MACD_STEADY: f64 = 6.0;
pub const MACD_IMPROVING: f64 = 3.0;
pub const MACD_NEGATIVE: f64 = 0.0;

// ==================== 거래량 프로파일 (17) ====================

/// 상승일/하락일 평균 거래량 비교 점수.
pub const VOLUME_UP_STRONG: f64 = 9.0;
pub const VOLUME_UP: f64 = 5.0;
pub const VOLUME_DOWN: f64 = 2.0;
/// 최근 세션이 모두 상승일이거나 모두 하락일인 경우.
pub const VOLUME_ONE_SIDED: f64 = 4.0;
/// 상승일 거래량이 하락일 대비 이 배수를 넘으면 최고점.
pub const VOLUME_UP_RATIO: f64 = 1.2;

/// 상대 거래량 (당일 / 50일 평균).
pub const RELATIVE_VOLUME: BucketTable = BucketTable {
    name: "relative_volume",
    buckets: &[
        bucket(Excluded(1.5), Unbounded, 8.0),
        bucket(Excluded(1.2), Included(1.5), 6.0),
        bucket(Excluded(0.8), Included(1.2), 4.0),
    ],
    fallback: 2.0,
};

// ==================== 가격 구조 (17) ====================

/// MA20 지지 터치 횟수.
pub const SUPPORT_TOUCHES: BucketTable = BucketTable {
    name: "support_touches",
    buckets: &[
        bucket(Included(3.0), Unbounded, 9.0),
        bucket(Included(2.0), Excluded(3.0), 5.0),
    ],
    fallback: 2.0,
};

/// 평균 눌림 깊이 (%).
pub const PULLBACK_DEPTH: BucketTable = BucketTable {
    name: "pullback_depth",
    buckets: &[
        bucket(Unbounded, Excluded(10.0), 8.0),
        bucket(Included(10.0), Excluded(15.0), 5.0),
    ],
    fallback: 3.0,
};

/// 구간 내 눌림이 관측되지 않은 경우.
pub const PULLBACK_NONE: f64 = 4.0;

// ==================== 위험/보상 (13) ====================

/// MA20 이격 (절대값 %).
pub const MA20_DISTANCE: BucketTable = BucketTable {
    name: "ma20_distance",
    buckets: &[
        bucket(Unbounded, Included(5.0), 7.0),
        bucket(Excluded(5.0), Included(10.0), 4.0),
    ],
    fallback: 2.0,
};

/// 60일 고점까지 여유 (%).
pub const RESISTANCE_ROOM: BucketTable = BucketTable {
    name: "resistance_room",
    buckets: &[
        bucket(Excluded(10.0), Unbounded, 6.0),
        bucket(Excluded(5.0), Included(10.0), 4.0),
    ],
    fallback: 1.0,
};

// ==================== 추세 품질 (15) ====================

/// Choppiness Index. 낮을수록 매끄러운 추세.
pub const CHOPPINESS: BucketTable = BucketTable {
    name: "choppiness",
    buckets: &[
        bucket(Unbounded, Excluded(40.0), 6.0),
        bucket(Included(40.0), Excluded(47.0), 5.0),
        bucket(Included(47.0), Excluded(53.0), 3.0),
        bucket(Included(53.0), Excluded(58.0), 2.0),
    ],
    fallback: 0.0,
};

/// Efficiency Ratio.
pub const EFFICIENCY: BucketTable = BucketTable {
    name: "efficiency",
    buckets: &[
        bucket(Excluded(0.5), Unbounded, 5.0),
        bucket(Excluded(0.35), Included(0.5), 4.0),
        bucket(Excluded(0.2), Included(0.35), 2.0),
    ],
    fallback: 0.0,
};

/// 평활선 대비 평균 괴리율 (%).
pub const TREND_DEVIATION: BucketTable = BucketTable {
    name: "trend_deviation",
    buckets: &[
        bucket(Unbounded, Excluded(1.0), 4.0),
        bucket(Included(1.0), Excluded(2.0), 3.0),
        bucket(Included(2.0), Excluded(3.0), 2.0),
    ],
    fallback: 0.0,
};
