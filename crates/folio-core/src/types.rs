//! # Domain Types
//!
//! Core domain types used by the pricing engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Book       │   │    LineItem     │   │    Customer     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │──►│  book_id        │   │  id             │       │
//! │  │  title          │   │  title (frozen) │   │  account_number │       │
//! │  │  unit_price     │   │  unit_price     │   │  name           │       │
//! │  │  stock_quantity │   │  quantity       │   └─────────────────┘       │
//! │  └─────────────────┘   │  discount       │                             │
//! │                        └─────────────────┘                             │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │ DiscountPercent │   │ PaymentMethod   │       │
//! │  │  bps (u32)      │   │  bps (i64)      │   │  Cash           │       │
//! │  │  500 = 5%       │   │  1000 = 10%     │   │  Card           │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Backend entities are keyed by integer ids (`BookId`, `CustomerId`); the
//! invoice additionally carries a UUID and a human-readable number.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::pricing;

/// Backend identifier of a book.
pub type BookId = i64;

/// Backend identifier of a customer.
pub type CustomerId = i64;

/// Backend identifier of a cashier (staff user).
pub type CashierId = i64;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 500 bps = 5%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// The rate applied when nothing else is configured (5%).
    pub const DEFAULT: TaxRate = TaxRate(500);

    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    pub fn percentage(&self) -> Decimal {
        Decimal::new(i64::from(self.0), 2).normalize()
    }

    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::DEFAULT
    }
}

// =============================================================================
// Discount Percent
// =============================================================================

/// A per-line discount in basis points.
///
/// Signed so that malformed input (e.g. `-5`) survives deserialization and is
/// rejected by the pricing functions with a field-level error instead of a
/// parse failure. The valid range is `0..=10000` (0% to 100%).
///
/// On the wire the value is a decimal percentage: `"12.5"` is 1250 bps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(into = "Decimal", try_from = "Decimal")]
pub struct DiscountPercent(i64);

impl DiscountPercent {
    pub const MAX_BPS: i64 = 10_000;

    #[inline]
    pub const fn from_bps(bps: i64) -> Self {
        DiscountPercent(bps)
    }

    /// Whole-percent constructor: `from_percent(10)` is 10%.
    #[inline]
    pub const fn from_percent(percent: i64) -> Self {
        DiscountPercent(percent * 100)
    }

    /// Converts a decimal percentage, rounding to the basis point.
    pub fn from_decimal(percent: Decimal) -> Result<Self, ValidationError> {
        let bps = (percent * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "discount_percent".to_string(),
                reason: format!("{percent} is not a usable percentage"),
            })?;
        Ok(DiscountPercent(bps))
    }

    #[inline]
    pub const fn bps(&self) -> i64 {
        self.0
    }

    /// The percentage as a normalized decimal (`10`, `12.5`).
    pub fn percentage(&self) -> Decimal {
        Decimal::new(self.0, 2).normalize()
    }

    #[inline]
    pub const fn none() -> Self {
        DiscountPercent(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// True when the value lies in `[0, 100]` percent.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.0 >= 0 && self.0 <= Self::MAX_BPS
    }
}

impl From<DiscountPercent> for Decimal {
    fn from(discount: DiscountPercent) -> Self {
        discount.percentage()
    }
}

impl TryFrom<Decimal> for DiscountPercent {
    type Error = ValidationError;

    fn try_from(percent: Decimal) -> Result<Self, Self::Error> {
        DiscountPercent::from_decimal(percent)
    }
}

impl fmt::Display for DiscountPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percentage())
    }
}

// =============================================================================
// Book
// =============================================================================

/// A book as returned by the inventory service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    #[serde(default)]
    pub isbn: Option<String>,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[ts(type = "string")]
    pub unit_price: Money,
    /// Stock on hand at the time the record was fetched.
    pub stock_quantity: i64,
}

impl Book {
    /// Checks if the fetched stock covers `quantity`.
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.stock_quantity >= quantity
    }
}

// =============================================================================
// Customer & Cashier
// =============================================================================

/// A customer record from the customer directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    /// Business identifier printed on statements.
    pub account_number: String,
    pub name: String,
    #[serde(default)]
    pub telephone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// The staff member issuing the invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cashier {
    pub id: CashierId,
    pub name: String,
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Physical cash payment.
    #[default]
    Cash,
    /// Card payment on an external terminal.
    Card,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "CASH"),
            PaymentMethod::Card => write!(f, "CARD"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" | "credit" | "debit" => Ok(PaymentMethod::Card),
            _ => Err(ValidationError::NotAllowed {
                field: "payment_method".to_string(),
                allowed: vec!["CASH".to_string(), "CARD".to_string()],
            }),
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One book entry in a bill, with its own quantity and discount.
///
/// Title and price are snapshots taken when the line was created, so a
/// catalog change while the cart is open does not alter the bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub book_id: BookId,
    pub title: String,
    #[ts(type = "string")]
    pub unit_price: Money,
    pub quantity: i64,
    #[serde(default)]
    #[ts(type = "string")]
    pub discount_percent: DiscountPercent,
}

impl LineItem {
    pub fn new(
        book_id: BookId,
        title: impl Into<String>,
        unit_price: Money,
        quantity: i64,
    ) -> Self {
        LineItem {
            book_id,
            title: title.into(),
            unit_price,
            quantity,
            discount_percent: DiscountPercent::none(),
        }
    }

    /// Freezes the book's current title and price into a new line.
    pub fn from_book(book: &Book, quantity: i64) -> Self {
        LineItem::new(book.id, book.title.clone(), book.unit_price, quantity)
    }

    pub fn with_discount(mut self, discount: DiscountPercent) -> Self {
        self.discount_percent = discount;
        self
    }

    /// Pre-discount amount (unit price × quantity).
    pub fn gross(&self) -> CoreResult<Money> {
        self.unit_price
            .multiply_quantity(self.quantity)
            .ok_or_else(|| pricing::amount_out_of_range("line_total"))
    }

    /// Discounted line total. Fails when the line is malformed.
    pub fn line_total(&self) -> CoreResult<Money> {
        pricing::compute_line_total(self.unit_price, self.quantity, self.discount_percent)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
