//! Money in minor currency units.
//!
//! All prices and totals are carried as whole minor units (e.g. cents), which
//! keeps arithmetic exact and non-negative by construction.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// An amount of money in minor currency units (cents).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// Checked addition; overflow is a validation failure, not a panic.
    pub fn checked_add(self, other: Money) -> Result<Money, DomainError> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or_else(|| DomainError::validation("order total overflows"))
    }

    /// Sum a sequence of amounts with overflow checking.
    pub fn sum<I: IntoIterator<Item = Money>>(amounts: I) -> Result<Money, DomainError> {
        amounts
            .into_iter()
            .try_fold(Money::ZERO, |acc, m| acc.checked_add(m))
    }

    /// Apply a percentage discount, rounding the discount half-up to the
    /// minor unit. `percent` must be <= 100.
    ///
    /// The discount is computed on the pre-discount amount; the result is the
    /// remaining amount to charge.
    pub fn apply_discount_percent(self, percent: u8) -> Result<Money, DomainError> {
        if percent > 100 {
            return Err(DomainError::validation("discount percent must be <= 100"));
        }
        // Half-up rounding in integer arithmetic: +50 before the /100.
        let discount = (u128::from(self.0) * u128::from(percent) + 50) / 100;
        // discount <= self.0 since percent <= 100, so the cast is lossless.
        Ok(Money(self.0 - discount as u64))
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_with_overflow_check() {
        let total = Money::sum([Money::from_cents(1000), Money::from_cents(2000)]).unwrap();
        assert_eq!(total, Money::from_cents(3000));

        let err = Money::sum([Money::from_cents(u64::MAX), Money::from_cents(1)]).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn discount_rounds_half_up() {
        // $30.00 at 50% -> $15.00
        assert_eq!(
            Money::from_cents(3000).apply_discount_percent(50).unwrap(),
            Money::from_cents(1500)
        );
        // 999 at 33% -> discount 329.67 rounds to 330 -> 669
        assert_eq!(
            Money::from_cents(999).apply_discount_percent(33).unwrap(),
            Money::from_cents(669)
        );
        // Exactly .5 rounds up: 10 at 25% -> discount 2.5 -> 3 -> 7
        assert_eq!(
            Money::from_cents(10).apply_discount_percent(25).unwrap(),
            Money::from_cents(7)
        );
    }

    #[test]
    fn full_discount_is_free() {
        assert_eq!(
            Money::from_cents(1234).apply_discount_percent(100).unwrap(),
            Money::ZERO
        );
    }

    #[test]
    fn zero_discount_is_identity() {
        assert_eq!(
            Money::from_cents(1234).apply_discount_percent(0).unwrap(),
            Money::from_cents(1234)
        );
    }

    #[test]
    fn rejects_percent_over_100() {
        assert!(Money::from_cents(100).apply_discount_percent(101).is_err());
    }

    #[test]
    fn displays_as_decimal() {
        assert_eq!(Money::from_cents(1500).to_string(), "15.00");
        assert_eq!(Money::from_cents(7).to_string(), "0.07");
    }
}
