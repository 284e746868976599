//! Prices in major and minor currency units.
//!
//! The backend stores every price (delivery price, menu item price) as an
//! integer count of the currency's smallest unit, e.g. cents. Edit forms
//! collect major units as [`Decimal`] so that `4.5` and `9.99` scale exactly.

use core::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Minor units per major unit.
const MINOR_PER_MAJOR: u64 = 100;

/// Errors validating a major-unit amount.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// The amount does not fit in minor units.
    #[error("price is too large")]
    TooLarge,
}

/// A price in integer minor currency units (e.g. cents), as stored by the
/// backend and returned in read models.
///
/// Decoding accepts any non-negative JSON number and rounds it to the nearest
/// integer, so `998.9999999999999` reads as `999`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct MinorUnits(u64);

impl MinorUnits {
    /// Create a price from a minor-unit count.
    #[must_use]
    pub const fn new(minor: u64) -> Self {
        Self(minor)
    }

    /// The minor-unit count.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The amount in major units, e.g. `450` becomes `4.50`.
    ///
    /// Only used to pre-fill edit forms from a loaded record.
    #[must_use]
    pub fn to_major(self) -> MajorUnits {
        MajorUnits(Decimal::from(self.0) / Decimal::from(MINOR_PER_MAJOR))
    }
}

impl fmt::Display for MinorUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for MinorUnits {
    fn from(minor: u64) -> Self {
        Self(minor)
    }
}

impl<'de> Deserialize<'de> for MinorUnits {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MinorUnitsVisitor)
    }
}

struct MinorUnitsVisitor;

impl serde::de::Visitor<'_> for MinorUnitsVisitor {
    type Value = MinorUnits;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative number of minor units")
    }

    fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(MinorUnits(v))
    }

    fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
        u64::try_from(v)
            .map(MinorUnits)
            .map_err(|_| E::custom(PriceError::Negative))
    }

    fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if !v.is_finite() {
            return Err(E::custom("price is not a finite number"));
        }
        let rounded = Decimal::from_f64_retain(v)
            .ok_or_else(|| E::custom(PriceError::TooLarge))?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        if rounded.is_sign_negative() && !rounded.is_zero() {
            return Err(E::custom(PriceError::Negative));
        }
        rounded
            .to_u64()
            .map(MinorUnits)
            .ok_or_else(|| E::custom(PriceError::TooLarge))
    }
}

/// A non-negative price in major currency units (e.g. dollars), as typed
/// into an edit form.
///
/// Construction guarantees that [`MajorUnits::to_minor`] cannot overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct MajorUnits(Decimal);

impl MajorUnits {
    /// Validate a major-unit amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] for amounts below zero and
    /// [`PriceError::TooLarge`] when the amount has no minor-unit
    /// representation.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        if amount > Decimal::from(u64::MAX / MINOR_PER_MAJOR) {
            return Err(PriceError::TooLarge);
        }
        Ok(Self(amount))
    }

    /// Scale to minor units: `round(amount * 100)`, halves away from zero.
    #[must_use]
    pub fn to_minor(self) -> MinorUnits {
        let scaled = (self.0 * Decimal::from(MINOR_PER_MAJOR))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        // In range by construction.
        MinorUnits(scaled.to_u64().unwrap_or(u64::MAX))
    }
}

impl<'de> Deserialize<'de> for MajorUnits {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for MajorUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn major(s: &str) -> MajorUnits {
        MajorUnits::new(Decimal::from_str(s).unwrap()).unwrap()
    }

    #[test]
    fn test_to_minor_scales_exactly() {
        assert_eq!(major("4.5").to_minor().get(), 450);
        assert_eq!(major("9.99").to_minor().get(), 999);
        assert_eq!(major("0").to_minor().get(), 0);
        assert_eq!(major("12").to_minor().get(), 1200);
    }

    #[test]
    fn test_to_minor_rounds_half_away_from_zero() {
        assert_eq!(major("0.005").to_minor().get(), 1);
        assert_eq!(major("1.234").to_minor().get(), 123);
        assert_eq!(major("2.675").to_minor().get(), 268);
    }

    #[test]
    fn test_new_rejects_negative() {
        assert_eq!(
            MajorUnits::new(Decimal::from_str("-0.01").unwrap()),
            Err(PriceError::Negative)
        );
    }

    #[test]
    fn test_new_rejects_unrepresentable() {
        assert_eq!(
            MajorUnits::new(Decimal::from(u64::MAX)),
            Err(PriceError::TooLarge)
        );
    }

    #[test]
    fn test_minor_to_major_round_trips_through_form() {
        let loaded = MinorUnits::new(999);
        assert_eq!(loaded.to_major(), major("9.99"));
        assert_eq!(loaded.to_major().to_minor(), loaded);
    }

    #[test]
    fn test_minor_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&MinorUnits::new(999)).unwrap(), "999");
    }

    #[test]
    fn test_major_deserializes_from_number_or_string() {
        let from_str: MajorUnits = serde_json::from_str("\"4.50\"").unwrap();
        assert_eq!(from_str.to_minor().get(), 450);

        let from_number: MajorUnits = serde_json::from_str("9.99").unwrap();
        assert_eq!(from_number.to_minor().get(), 999);

        let negative: Result<MajorUnits, _> = serde_json::from_str("\"-1\"");
        assert!(negative.is_err());
    }

    #[test]
    fn test_minor_deserializes_fractional_numbers() {
        let drifted: MinorUnits = serde_json::from_str("998.9999999999999").unwrap();
        assert_eq!(drifted.get(), 999);

        let whole_float: MinorUnits = serde_json::from_str("450.0").unwrap();
        assert_eq!(whole_float.get(), 450);

        let integer: MinorUnits = serde_json::from_str("1200").unwrap();
        assert_eq!(integer.get(), 1200);
    }

    #[test]
    fn test_minor_rejects_negative_numbers() {
        assert!(serde_json::from_str::<MinorUnits>("-5").is_err());
        assert!(serde_json::from_str::<MinorUnits>("-0.6").is_err());
        assert!(serde_json::from_str::<MinorUnits>("\"450\"").is_err());
    }
}
