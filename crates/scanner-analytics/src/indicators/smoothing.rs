//! 가우시안 평활과 평활 가격의 미분 (속도, 가속도).
//!
//! 커널 가중치는 `exp(-x² / (2σ²))`, 반경은 `⌊4σ + 0.5⌋`이며
//! 경계는 반사(reflect) 방식으로 확장합니다 (`d c b a | a b c d | d c b a`).

use serde::{Deserialize, Serialize};

use super::{IndicatorError, IndicatorResult};

/// 가우시안 평활 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GaussianParams {
    /// 표준편차 (기본: 5.0).
    pub sigma: f64,
}

impl Default for GaussianParams {
    fn default() -> Self {
        Self { sigma: 5.0 }
    }
}

/// 평활 가격과 미분 결과.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SmoothedSeries {
    /// 평활 가격
    pub smoothed: Vec<Option<f64>>,
    /// 속도 (평활 가격의 1차 차분, 인덱스 0은 None)
    pub velocity: Vec<Option<f64>>,
    /// 가속도 (속도의 1차 차분, 인덱스 0~1은 None)
    pub acceleration: Vec<Option<f64>>,
}

/// 가우시안 평활 계산기.
#[derive(Debug, Default)]
pub struct GaussianSmoother;

impl GaussianSmoother {
    /// 새로운 평활 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 1차원 가우시안 필터.
    ///
    /// 출력 길이는 입력과 같고 모든 시점에 값이 있습니다.
    pub fn filter(&self, data: &[f64], params: GaussianParams) -> IndicatorResult<Vec<f64>> {
        let sigma = params.sigma;

        if !(sigma > 0.0) || !sigma.is_finite() {
            return Err(IndicatorError::InvalidParameter(format!(
                "시그마는 양수여야 합니다: {}",
                sigma
            )));
        }

        if data.is_empty() {
            return Err(IndicatorError::InsufficientData {
                required: 1,
                provided: 0,
            });
        }

        let weights = Self::kernel(sigma);
        let radius = (weights.len() / 2) as isize;
        let n = data.len() as isize;

        let result = (0..n)
            .map(|i| {
                weights
                    .iter()
                    .enumerate()
                    .map(|(k, w)| {
                        let idx = reflect_index(i + k as isize - radius, n);
                        data[idx] * w
                    })
                    .sum()
            })
            .collect();

        Ok(result)
    }

    /// 평활 가격, 속도, 가속도를 계산합니다.
    pub fn smooth_with_derivatives(
        &self,
        data: &[f64],
        params: GaussianParams,
    ) -> IndicatorResult<SmoothedSeries> {
        let smoothed: Vec<Option<f64>> = self.filter(data, params)?.into_iter().map(Some).collect();
        let velocity = first_difference(&smoothed);
        let acceleration = first_difference(&velocity);

        Ok(SmoothedSeries {
            smoothed,
            velocity,
            acceleration,
        })
    }

    /// 정규화된 가우시안 커널 (길이 2r + 1).
    fn kernel(sigma: f64) -> Vec<f64> {
        let radius = (4.0 * sigma + 0.5) as isize;
        let denom = 2.0 * sigma * sigma;

        let raw: Vec<f64> = (-radius..=radius)
            .map(|x| {
                let x = x as f64;
                (-x * x / denom).exp()
            })
            .collect();

        let total: f64 = raw.iter().sum();
        raw.into_iter().map(|w| w / total).collect()
    }
}

/// 반사 경계 인덱스. 주기 2n으로 접어서 매핑합니다.
fn reflect_index(idx: isize, n: isize) -> usize {
    let period = 2 * n;
    let m = idx.rem_euclid(period);
    if m >= n {
        (period - m - 1) as usize
    } else {
        m as usize
    }
}

/// 1차 차분. 이전 또는 현재 값이 없으면 None.
pub fn first_difference(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut result = Vec::with_capacity(values.len());
    if values.is_empty() {
        return result;
    }

    result.push(None);
    for pair in values.windows(2) {
        result.push(match (pair[0], pair[1]) {
            (Some(prev), Some(curr)) => Some(curr - prev),
            _ => None,
        });
    }

    result
}
