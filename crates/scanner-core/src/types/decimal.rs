//! 정밀한 가격 계산을 위한 Decimal 유틸리티.
//!
//! 가격/거래량은 `Decimal`로 보관하고, 로그·지수 연산이 필요한 지표와
//! 점수 계산은 `f64`로 변환하여 수행합니다.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

/// 가격 타입.
pub type Price = Decimal;

/// 거래량 타입 (주식 수).
pub type Volume = Decimal;

/// Decimal 연산을 위한 확장 트레이트.
///
/// `Decimal::is_positive`는 부호 비트만 보므로 0도 양수로 취급합니다.
/// 0 판정에는 `is_strictly_*`를 사용합니다.
pub trait DecimalExt {
    /// 0보다 큰지 확인합니다.
    fn is_strictly_positive(&self) -> bool;

    /// 0보다 작은지 확인합니다.
    fn is_strictly_negative(&self) -> bool;

    /// `f64`로 변환합니다. 표현 범위를 벗어나면 0.0을 반환합니다.
    fn to_f64_lossy(&self) -> f64;
}

impl DecimalExt for Decimal {
    fn is_strictly_positive(&self) -> bool {
        *self > Decimal::ZERO
    }

    fn is_strictly_negative(&self) -> bool {
        *self < Decimal::ZERO
    }

    fn to_f64_lossy(&self) -> f64 {
        self.to_f64().unwrap_or(0.0)
    }
}

/// `f64`를 Decimal로 변환합니다. NaN/무한대는 `None`.
pub fn decimal_from_f64(value: f64) -> Option<Decimal> {
    if value.is_finite() {
        Decimal::from_f64(value)
    } else {
        None
    }
}

/// 선택적 Decimal 값을 `f64`로 변환합니다.
pub fn opt_f64(value: Option<Decimal>) -> Option<f64> {
    value.map(|v| v.to_f64_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_decimal_sign_helpers() {
        assert!(dec!(1.5).is_strictly_positive());
        assert!(dec!(-0.1).is_strictly_negative());
        assert!(!Decimal::ZERO.is_strictly_positive());
        assert!(!Decimal::ZERO.is_strictly_negative());
        assert!(!dec!(-0.0).is_strictly_negative());
    }

    #[test]
    fn test_to_f64_lossy() {
        assert!((dec!(102.25).to_f64_lossy() - 102.25).abs() < 1e-12);
        assert_eq!(opt_f64(None), None);
        assert_eq!(opt_f64(Some(dec!(2))), Some(2.0));
    }

    #[test]
    fn test_decimal_from_f64_rejects_nan() {
        assert!(decimal_from_f64(f64::NAN).is_none());
        assert!(decimal_from_f64(f64::INFINITY).is_none());
        assert!(decimal_from_f64(1.25).is_some());
    }
}
