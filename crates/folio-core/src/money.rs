//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    All arithmetic happens on i64 cents.                                 │
//! │    Decimals only exist at the wire boundary ("1800.00").               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use folio_core::money::Money;
//!
//! let price = Money::from_cents(100_000); // 1000.00
//! let line = price * 2;                   // 2000.00
//! assert_eq!(line.to_string(), "2000.00");
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::error::ValidationError;
use crate::types::{DiscountPercent, TaxRate};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: differences such as `total - authoritative_total` can be negative
/// - **Wire format**: a decimal string with exactly two fractional digits
///
/// ## Where Money is Used
/// ```text
/// Book.unit_price ──► LineItem.unit_price ──► line total
///                                                 │
/// Σ gross ──► subtotal ──► − discount ──► + tax ──► total_amount
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "Decimal", try_from = "Decimal")]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use folio_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// ```rust
    /// use folio_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Converts a decimal amount to Money, rounding to the cent
    /// (half away from zero).
    ///
    /// ```rust
    /// use folio_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let m = Money::from_decimal(Decimal::new(12345, 3)).unwrap(); // 12.345
    /// assert_eq!(m.cents(), 1235);
    /// ```
    pub fn from_decimal(amount: Decimal) -> Result<Self, ValidationError> {
        let cents = (amount * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "amount".to_string(),
                reason: format!("{amount} does not fit in a monetary value"),
            })?;
        Ok(Money(cents))
    }

    /// Returns the value as a 2-decimal `Decimal`.
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
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
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Calculates tax at `rate`, rounding half-up to the cent.
    ///
    /// Integer math: `(amount * bps + 5000) / 10000`. Returns `None` when
    /// the tax does not fit in a monetary value.
    ///
    /// ```rust
    /// use folio_core::money::Money;
    /// use folio_core::types::TaxRate;
    ///
    /// let taxable = Money::from_cents(180_000); // 1800.00
    /// let tax = taxable.calculate_tax(TaxRate::from_bps(500)).unwrap();
    /// assert_eq!(tax.cents(), 9_000); // 90.00
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Option<Money> {
        apply_bps(self.0, i64::from(rate.bps())).map(Money)
    }

    /// Returns the discount amount (not the discounted price) for `discount`,
    /// rounded half-up to the cent.
    ///
    /// ```rust
    /// use folio_core::money::Money;
    /// use folio_core::types::DiscountPercent;
    ///
    /// let gross = Money::from_cents(200_000);
    /// let off = gross.discount_amount(DiscountPercent::from_percent(10)).unwrap();
    /// assert_eq!(off.cents(), 20_000);
    /// ```
    pub fn discount_amount(&self, discount: DiscountPercent) -> Option<Money> {
        apply_bps(self.0, discount.bps()).map(Money)
    }

    /// Applies a percentage discount and returns the discounted amount.
    pub fn apply_discount(&self, discount: DiscountPercent) -> Option<Money> {
        self.checked_sub(self.discount_amount(discount)?)
    }

    /// Multiplies money by a quantity. `None` on overflow.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts. `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Subtracts `other`. `None` on overflow.
    #[inline]
    pub const fn checked_sub(&self, other: Money) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

/// `amount * bps / 10000` with half-up rounding, widened to i128.
/// `None` when the result leaves the i64 range.
fn apply_bps(amount: i64, bps: i64) -> Option<i64> {
    let scaled = i128::from(amount).checked_mul(i128::from(bps))?.checked_add(5000)? / 10000;
    i64::try_from(scaled).ok()
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain 2-decimal rendering ("1890.00"). The currency symbol is a
/// presentation concern and is added by the renderer.
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

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.to_decimal()
    }
}

impl TryFrom<Decimal> for Money {
    type Error = ValidationError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Money::from_decimal(amount)
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

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by i64 (quantities). Pricing goes through
/// [`Money::multiply_quantity`] instead.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
