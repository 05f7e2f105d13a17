//! Fixed-point arithmetic for deterministic command effects.
//!
//! Every point pool, relation value and cost that a command touches is a
//! [`Fixed`], so two peers applying the same command stream end up with
//! bit-identical balances. Floats only appear when reading configuration.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Fixed-point value with scale 10000.
///
/// Represents decimal values as integers: 0.25 → 2500, 1.0 → 10000.
/// Serializes as the raw integer so wire frames and checksums never see a float.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Fixed(pub i64);

impl Fixed {
    pub const SCALE: i64 = 10_000;

    pub const ZERO: Fixed = Fixed(0);
    pub const ONE: Fixed = Fixed(Self::SCALE);
    pub const HALF: Fixed = Fixed(Self::SCALE / 2);

    pub const fn from_raw(raw: i64) -> Self {
        Fixed(raw)
    }

    pub const fn from_int(v: i64) -> Self {
        Fixed(v * Self::SCALE)
    }

    /// Nearest representable value; non-finite input reads as zero and
    /// out-of-range input saturates.
    pub fn from_f64(v: f64) -> Self {
        if !v.is_finite() {
            return Fixed::ZERO;
        }
        // `as` saturates at the i64 bounds.
        Fixed((v * Self::SCALE as f64).round() as i64)
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }

    /// Whole part, truncated toward zero.
    pub const fn to_int(self) -> i64 {
        self.0 / Self::SCALE
    }
}

macro_rules! raw_binop {
    ($op:ident, $method:ident, $assign:ident, $assign_method:ident, $tok:tt) => {
        impl $op for Fixed {
            type Output = Fixed;
            fn $method(self, rhs: Fixed) -> Fixed {
                Fixed(self.0 $tok rhs.0)
            }
        }

        impl $assign for Fixed {
            fn $assign_method(&mut self, rhs: Fixed) {
                *self = *self $tok rhs;
            }
        }
    };
}

raw_binop!(Add, add, AddAssign, add_assign, +);
raw_binop!(Sub, sub, SubAssign, sub_assign, -);

impl Neg for Fixed {
    type Output = Fixed;
    fn neg(self) -> Fixed {
        Fixed(-self.0)
    }
}

/// Products and quotients widen to i128 so balance math never overflows
/// before rescaling.
impl Mul for Fixed {
    type Output = Fixed;
    fn mul(self, rhs: Fixed) -> Fixed {
        let wide = i128::from(self.0) * i128::from(rhs.0) / i128::from(Self::SCALE);
        Fixed(wide as i64)
    }
}

/// Division by zero yields zero.
impl Div for Fixed {
    type Output = Fixed;
    fn div(self, rhs: Fixed) -> Fixed {
        if rhs.0 == 0 {
            return Fixed::ZERO;
        }
        let wide = i128::from(self.0) * i128::from(Self::SCALE) / i128::from(rhs.0);
        Fixed(wide as i64)
    }
}

impl std::fmt::Debug for Fixed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}

impl std::fmt::Display for Fixed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}", self.to_f64())
    }
}

/// Serde adapter writing a [`Fixed`] as a plain decimal number.
///
/// Used by the balance table so that `"discredit_influence_cost": 25.0` in a
/// config file means 25, not 0.0025.
pub mod decimal {
    use super::Fixed;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.to_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Fixed, D::Error> {
        f64::deserialize(deserializer).map(Fixed::from_f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(Fixed::ZERO.0, 0);
        assert_eq!(Fixed::ONE.0, 10000);
        assert_eq!(Fixed::HALF.0, 5000);
    }

    #[test]
    fn test_from_f64() {
        assert_eq!(Fixed::from_f64(0.25), Fixed(2500));
        assert_eq!(Fixed::from_f64(-200.0), Fixed::from_int(-200));
        assert_eq!(Fixed::from_f64(f64::NAN), Fixed::ZERO);
        assert_eq!(Fixed::from_f64(1e30), Fixed(i64::MAX));
    }

    #[test]
    fn test_multiply_divide() {
        assert_eq!(Fixed::from_int(2) * Fixed::from_int(3), Fixed::from_int(6));
        assert_eq!(Fixed::HALF * Fixed::HALF, Fixed(2500));
        assert_eq!(Fixed::from_int(6) / Fixed::from_int(2), Fixed::from_int(3));
        assert_eq!(Fixed::from_int(6) / Fixed::ZERO, Fixed::ZERO);
    }

    #[test]
    fn test_clamp() {
        let lo = Fixed::from_int(-200);
        let hi = Fixed::from_int(200);
        assert_eq!(Fixed::from_int(250).clamp(lo, hi), hi);
        assert_eq!(Fixed::from_int(-250).clamp(lo, hi), lo);
        assert_eq!(Fixed::from_int(15).clamp(lo, hi), Fixed::from_int(15));
    }

    #[test]
    fn test_decimal_adapter() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            #[serde(with = "decimal")]
            cost: Fixed,
        }

        let parsed: Wrapper = serde_json::from_str(r#"{"cost": 12.5}"#).unwrap();
        assert_eq!(parsed.cost, Fixed(125_000));

        let json = serde_json::to_string(&parsed).unwrap();
        assert_eq!(json, r#"{"cost":12.5}"#);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn game_value() -> impl Strategy<Value = i64> {
            -1_000_000..=1_000_000i64
        }

        proptest! {
            #[test]
            fn mul_is_commutative(a in game_value(), b in game_value()) {
                let x = Fixed::from_int(a);
                let y = Fixed::from_int(b);
                prop_assert_eq!(x * y, y * x);
            }

            #[test]
            fn sub_undoes_add(a in game_value(), b in game_value()) {
                let x = Fixed::from_int(a);
                let y = Fixed::from_int(b);
                prop_assert_eq!((x + y) - y, x);
            }

            #[test]
            fn clamp_stays_in_range(a in game_value()) {
                let v = Fixed::from_int(a).clamp(Fixed::from_int(-200), Fixed::from_int(200));
                prop_assert!(v >= Fixed::from_int(-200) && v <= Fixed::from_int(200));
            }
        }
    }
}
