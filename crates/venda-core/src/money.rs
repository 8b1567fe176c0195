//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Integer Cents Inside, Decimals On The Wire
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  JSON body            Rust / SQLite             JSON response           │
//! │                                                                         │
//! │  "price": 150.5  ──►  Money(15050)  ──► ... ──► "price": 150.5         │
//! │                       INTEGER column                                    │
//! │                                                                         │
//! │  All arithmetic (line totals, tax, sums) happens on i64 cents.          │
//! │  The only float conversion is the serde boundary.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use ts_rs::TS;

use crate::types::Percentage;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents.
///
/// Serialized as a decimal number of major units (`1099` cents ⇄ `10.99`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "number")] i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use venda_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal amount of major units into cents.
    ///
    /// Rounds half away from zero to the nearest cent. Amounts past the
    /// i64 cent range saturate; `Deserialize` rejects them before this.
    ///
    /// ```rust
    /// use venda_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(150.0).cents(), 15_000);
    /// assert_eq!(Money::from_major(10.999).cents(), 1_100);
    /// ```
    pub fn from_major(amount: f64) -> Self {
        Money((amount * 100.0).round() as i64)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the value as a decimal number of major units (display only).
    #[inline]
    pub fn to_major(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ```rust
    /// use venda_core::money::Money;
    ///
    /// let line_total = Money::from_cents(299).multiply_quantity(3);
    /// assert_eq!(line_total.cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Multiplies by a quantity, returning `None` on overflow.
    #[inline]
    pub fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        self.0.checked_mul(qty).map(Money)
    }

    /// Adds two amounts, returning `None` on overflow.
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Calculates tax on this amount, rounding half up to the cent.
    ///
    /// ## Implementation
    /// Integer math on basis points: `(amount * bps + 5000) / 10000`.
    /// The +5000 provides the rounding (5000/10000 = 0.5).
    ///
    /// ```rust
    /// use venda_core::money::Money;
    /// use venda_core::types::Percentage;
    ///
    /// let price = Money::from_cents(1000);
    /// let tax = price.calculate_tax(Percentage::from_bps(825));
    /// // 10.00 × 8.25% = 0.825 → 0.83
    /// assert_eq!(tax.cents(), 83);
    /// ```
    pub fn calculate_tax(&self, rate: Percentage) -> Money {
        // i128 so large line totals cannot overflow mid-calculation
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(tax_cents as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_major())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        if !amount.is_finite() {
            return Err(de::Error::custom("amount must be a finite number"));
        }
        let cents = (amount * 100.0).round();
        if !(i64::MIN as f64..i64::MAX as f64).contains(&cents) {
            return Err(de::Error::custom("amount is too large"));
        }
        Ok(Money::from_major(amount))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);

        let mut c = a;
        c += b;
        assert_eq!(c.cents(), 1500);

        let total: Money = [a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_tax_calculation_basic() {
        // 300.00 at 10% = 30.00
        let amount = Money::from_cents(30_000);
        let tax = amount.calculate_tax(Percentage::from_bps(1000));
        assert_eq!(tax.cents(), 3_000);
    }

    #[test]
    fn test_tax_calculation_with_rounding() {
        let amount = Money::from_cents(1000);
        let tax = amount.calculate_tax(Percentage::from_bps(825));
        assert_eq!(tax.cents(), 83);

        let amount = Money::from_cents(1);
        assert_eq!(amount.calculate_tax(Percentage::from_bps(1000)).cents(), 0);
    }

    #[test]
    fn test_checked_multiply_overflow() {
        let huge = Money::from_cents(i64::MAX / 2);
        assert!(huge.checked_multiply_quantity(3).is_none());
        assert_eq!(
            Money::from_cents(299).checked_multiply_quantity(3),
            Some(Money::from_cents(897))
        );
    }

    #[test]
    fn test_serializes_as_major_units() {
        let json = serde_json::to_string(&Money::from_cents(15_050)).unwrap();
        assert_eq!(json, "150.5");

        let parsed: Money = serde_json::from_str("150").unwrap();
        assert_eq!(parsed.cents(), 15_000);

        let parsed: Money = serde_json::from_str("0.1").unwrap();
        assert_eq!(parsed.cents(), 10);
    }

    #[test]
    fn test_rejects_non_numbers() {
        assert!(serde_json::from_str::<Money>("\"abc\"").is_err());
    }

    #[test]
    fn test_rejects_amounts_past_cent_range() {
        let err = serde_json::from_str::<Money>("1e30").unwrap_err();
        assert!(err.to_string().contains("amount is too large"));
        assert!(serde_json::from_str::<Money>("-1e30").is_err());
        assert!(serde_json::from_str::<Money>("92233720368547758.08").is_err());

        let parsed: Money = serde_json::from_str("90000000000000000").unwrap();
        assert_eq!(parsed.cents(), 9_000_000_000_000_000_000);
    }
}
