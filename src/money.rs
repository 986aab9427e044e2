//! Fixed-point money type with 2 decimal places precision.
//!
//! Uses `rust_decimal` internally with scale enforcement so balances and
//! prices never pick up floating-point drift. On disk the value is a plain
//! JSON number, which keeps the backing files readable by other tools.
//!
//! Arithmetic is checked: a sum or difference that cannot be held at cent
//! precision is `None`, never a panic.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A decimal amount that always carries exactly 2 decimal places.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use record_desk::Money;
///
/// let amount = Money::from_str("40").unwrap();
/// assert_eq!(amount.to_string(), "40.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    /// Decimal places kept on every value.
    pub const SCALE: u32 = 2;

    pub const ZERO: Self = Money(Decimal::ZERO);

    /// Rounds `value` to cents.
    ///
    /// Returns `None` when the value is too large to carry 2 decimal places
    /// inside the 96-bit mantissa.
    pub fn from_decimal(value: Decimal) -> Option<Self> {
        let mut cents = value;
        cents.rescale(Self::SCALE);
        if cents.scale() != Self::SCALE {
            return None;
        }
        Some(Money(cents))
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).and_then(Self::from_decimal)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).and_then(Self::from_decimal)
    }

    /// Returns `true` if this value is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Returns `true` if this value is strictly less than zero.
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    /// Parses trimmed decimal text, rejecting values that do not fit at cent
    /// precision.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parsed = Decimal::from_str(s.trim())?;
        Money::from_decimal(parsed).ok_or(if parsed.is_sign_negative() {
            rust_decimal::Error::LessThanMinimumPossibleValue
        } else {
            rust_decimal::Error::ExceedsMaximumPossibleValue
        })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.0.to_f64() {
            Some(value) => serializer.serialize_f64(value),
            None => Err(ser::Error::custom(format!(
                "{} does not fit in a JSON number",
                self
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Integers deserialize through f64 as well, so `100` and `100.0` both load.
        let raw = f64::deserialize(deserializer)?;
        Decimal::from_f64(raw)
            .and_then(Money::from_decimal)
            .ok_or_else(|| de::Error::custom(format!("{} is out of range for an amount", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    #[test]
    fn test_from_str_normalizes_scale() {
        assert_eq!(money("1").to_string(), "1.00");
        assert_eq!(money("1.5").to_string(), "1.50");
        assert_eq!(money("  2.25  ").to_string(), "2.25");
        assert_eq!(money("0.004").to_string(), "0.00");
    }

    #[test]
    fn test_from_str_rejects_text() {
        assert!(Money::from_str("abc").is_err());
        assert!(Money::from_str("").is_err());
    }

    #[test]
    fn test_from_str_rejects_values_without_room_for_cents() {
        assert!(matches!(
            Money::from_str("79228162514264337593543950335").unwrap_err(),
            rust_decimal::Error::ExceedsMaximumPossibleValue
        ));
        assert!(matches!(
            Money::from_str("-79228162514264337593543950335").unwrap_err(),
            rust_decimal::Error::LessThanMinimumPossibleValue
        ));
        assert!(Money::from_str("792281625142643375935439503.35").is_ok());
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = money("100.0");
        let b = money("40");

        assert_eq!(a.checked_sub(b), Some(money("60")));
        assert_eq!(a.checked_add(b).unwrap().to_string(), "140.00");
        assert_eq!(b.checked_sub(a).unwrap().to_string(), "-60.00");
    }

    #[test]
    fn test_checked_add_overflow_is_none() {
        let near_max = money("792281625142643375935439503.35");
        assert_eq!(near_max.checked_add(money("0.01")), None);
        assert_eq!(near_max.checked_add(near_max), None);
        assert_eq!(near_max.checked_add(Money::ZERO), Some(near_max));
    }

    #[test]
    fn test_sign_predicates() {
        assert!(money("0.01").is_positive());
        assert!(!Money::ZERO.is_positive());
        assert!(Money::ZERO.is_zero());
        assert!(money("-3").is_negative());
    }

    #[test]
    fn test_serializes_as_json_number() {
        assert_eq!(serde_json::to_string(&money("100")).unwrap(), "100.0");
        assert_eq!(serde_json::to_string(&money("9.99")).unwrap(), "9.99");
    }

    #[test]
    fn test_deserializes_integers_and_floats() {
        let from_int: Money = serde_json::from_str("100").unwrap();
        let from_float: Money = serde_json::from_str("0.1").unwrap();

        assert_eq!(from_int, money("100"));
        assert_eq!(from_float, money("0.10"));
        assert!(serde_json::from_str::<Money>("\"12\"").is_err());
    }

    #[test]
    fn test_deserialize_rejects_out_of_range_numbers() {
        assert!(serde_json::from_str::<Money>("1e30").is_err());
        assert!(serde_json::from_str::<Money>("1e27").is_err());
    }
}
