//! Non-negative decimal quantity (stock levels, per-unit requirements, order units).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// A quantity that can never be negative.
///
/// Backed by `rust_decimal::Decimal` so that `0.2 * 20` is exactly `4`.
/// There are no arithmetic operators: addition and multiplication report
/// overflow as an error, subtraction makes the zero floor explicit.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Quantity(Decimal);

impl ValueObject for Quantity {}

impl Quantity {
    pub const ZERO: Quantity = Quantity(Decimal::ZERO);

    pub fn new(value: Decimal) -> DomainResult<Self> {
        if value < Decimal::ZERO {
            return Err(DomainError::validation(format!(
                "quantity cannot be negative (got {value})"
            )));
        }
        Ok(Self(value.normalize()))
    }

    /// Whole number of units.
    pub fn from_units(units: u32) -> Self {
        Self(Decimal::from(units))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// `self - other`, or `None` if the result would be negative.
    pub fn checked_sub(self, other: Quantity) -> Option<Quantity> {
        if other.0 > self.0 {
            None
        } else {
            Some(Self((self.0 - other.0).normalize()))
        }
    }

    /// `self + other`; fails past `Decimal::MAX`.
    pub fn checked_add(self, other: Quantity) -> DomainResult<Quantity> {
        self.0
            .checked_add(other.0)
            .map(|sum| Self(sum.normalize()))
            .ok_or_else(|| DomainError::validation(format!("quantity overflow: {self} + {other}")))
    }

    /// `self * other`; fails past `Decimal::MAX`.
    pub fn checked_mul(self, other: Quantity) -> DomainResult<Quantity> {
        self.0
            .checked_mul(other.0)
            .map(|product| Self(product.normalize()))
            .ok_or_else(|| DomainError::validation(format!("quantity overflow: {self} × {other}")))
    }

    /// `self - other`, floored at zero.
    pub fn saturating_sub(self, other: Quantity) -> Quantity {
        self.checked_sub(other).unwrap_or(Quantity::ZERO)
    }
}

impl TryFrom<Decimal> for Quantity {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for Decimal {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn q(value: Decimal) -> Quantity {
        Quantity::new(value).unwrap()
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let err = Quantity::new(dec!(-0.1)).unwrap_err();
        match err {
            DomainError::Validation(msg) if msg.contains("cannot be negative") => {}
            other => panic!("Expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn decimal_arithmetic_is_exact() {
        assert_eq!(q(dec!(0.2)).checked_mul(Quantity::from_units(20)).unwrap(), q(dec!(4)));
        assert_eq!(q(dec!(10)).checked_sub(q(dec!(4))), Some(q(dec!(6))));
    }

    #[test]
    fn overflow_is_an_error_not_a_panic() {
        let max = q(Decimal::MAX);
        for err in [
            max.checked_mul(Quantity::from_units(10)).unwrap_err(),
            max.checked_add(Quantity::from_units(1)).unwrap_err(),
        ] {
            match err {
                DomainError::Validation(msg) if msg.contains("overflow") => {}
                other => panic!("Expected Validation, got {other:?}"),
            }
        }
        assert_eq!(max.checked_add(Quantity::ZERO).unwrap(), max);
    }

    #[test]
    fn subtraction_below_zero_is_explicit() {
        assert_eq!(q(dec!(1.5)).checked_sub(q(dec!(2))), None);
        assert_eq!(q(dec!(1.5)).saturating_sub(q(dec!(2))), Quantity::ZERO);
    }

    #[test]
    fn deserializing_a_negative_quantity_fails() {
        assert!(serde_json::from_str::<Quantity>("\"-3\"").is_err());
        let ok: Quantity = serde_json::from_str("\"3.50\"").unwrap();
        assert_eq!(ok, q(dec!(3.5)));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: adding then subtracting the same quantity is the identity.
        #[test]
        fn add_then_sub_is_identity(a in 0u64..1_000_000u64, b in 0u64..1_000_000u64) {
            let a = q(Decimal::new(a as i64, 3));
            let b = q(Decimal::new(b as i64, 3));
            prop_assert_eq!(a.checked_add(b).unwrap().checked_sub(b), Some(a));
        }
    }
}
