//! # Pricing
//!
//! Line and invoice totals.
//!
//! ## Calculation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  for each line:                                                         │
//! │      gross     = unit_price × quantity                                  │
//! │      discount  = round(gross × discount%)        (half-up, per line)    │
//! │      line      = gross − discount                                       │
//! │                                                                         │
//! │  subtotal        = Σ gross                                              │
//! │  discount_amount = Σ discount                                           │
//! │  tax_amount      = round((subtotal − discount_amount) × tax rate)       │
//! │                    once, on the aggregate, only when tax is applied     │
//! │  total_amount    = subtotal − discount_amount + tax_amount              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rounding the discount per line keeps `Σ line = subtotal − discount_amount`
//! exact to the cent.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{DiscountPercent, LineItem, TaxRate};
use crate::validation::{validate_discount, validate_line_quantity, validate_unit_price};

/// Computed totals of a set of line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
    #[ts(type = "string")]
    pub subtotal: Money,
    #[ts(type = "string")]
    pub discount_amount: Money,
    #[ts(type = "string")]
    pub tax_amount: Money,
    #[ts(type = "string")]
    pub total_amount: Money,
}

impl InvoiceTotals {
    /// Amount the tax is levied on.
    #[inline]
    pub fn taxable_amount(&self) -> Money {
        self.subtotal - self.discount_amount
    }
}

/// Error for an amount that no longer fits in a `Money`.
pub(crate) fn amount_out_of_range(field: &str) -> CoreError {
    CoreError::InvalidInput(ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: i64::MAX,
    })
}

/// Gross amount and discount of one line. Validates the inputs.
fn line_discount(
    unit_price: Money,
    quantity: i64,
    discount: DiscountPercent,
) -> CoreResult<(Money, Money)> {
    validate_unit_price(unit_price)?;
    validate_line_quantity(quantity)?;
    validate_discount(discount)?;

    let gross = unit_price
        .multiply_quantity(quantity)
        .ok_or_else(|| amount_out_of_range("line_total"))?;
    let off = gross
        .discount_amount(discount)
        .ok_or_else(|| amount_out_of_range("discount_amount"))?;
    Ok((gross, off))
}

/// Returns `unit_price × quantity × (1 − discount/100)`, rounded to the cent.
///
/// ## Errors
/// `CoreError::InvalidInput` when quantity < 1, the discount lies outside
/// 0-100%, the unit price is negative, or `unit_price × quantity` does not
/// fit in a `Money`.
///
/// ```rust
/// use folio_core::money::Money;
/// use folio_core::pricing::compute_line_total;
/// use folio_core::types::DiscountPercent;
///
/// let total = compute_line_total(
///     Money::from_cents(100_000),
///     2,
///     DiscountPercent::from_percent(10),
/// ).unwrap();
/// assert_eq!(total.to_string(), "1800.00");
/// ```
pub fn compute_line_total(
    unit_price: Money,
    quantity: i64,
    discount: DiscountPercent,
) -> CoreResult<Money> {
    let (gross, off) = line_discount(unit_price, quantity, discount)?;
    Ok(gross - off)
}

/// Computes subtotal, discount, tax and total for `items`.
///
/// Pure: the same items always produce the same totals. An empty slice
/// yields all zeros. Totals that overflow a `Money` fail with
/// `CoreError::InvalidInput` instead of wrapping.
///
/// ```rust
/// use folio_core::money::Money;
/// use folio_core::pricing::compute_invoice_totals;
/// use folio_core::types::{DiscountPercent, LineItem, TaxRate};
///
/// let items = vec![
///     LineItem::new(1, "Ape Gama", Money::from_cents(100_000), 2)
///         .with_discount(DiscountPercent::from_percent(10)),
/// ];
/// let totals = compute_invoice_totals(&items, true, TaxRate::from_bps(500)).unwrap();
/// assert_eq!(totals.tax_amount.to_string(), "90.00");
/// assert_eq!(totals.total_amount.to_string(), "1890.00");
/// ```
pub fn compute_invoice_totals(
    items: &[LineItem],
    apply_tax: bool,
    tax_rate: TaxRate,
) -> CoreResult<InvoiceTotals> {
    let mut subtotal = Money::zero();
    let mut discount_amount = Money::zero();

    for item in items {
        let (gross, off) = line_discount(item.unit_price, item.quantity, item.discount_percent)?;
        subtotal = subtotal
            .checked_add(gross)
            .ok_or_else(|| amount_out_of_range("subtotal"))?;
        discount_amount = discount_amount
            .checked_add(off)
            .ok_or_else(|| amount_out_of_range("discount_amount"))?;
    }

    // discount ≤ gross on every line, so this cannot go below zero
    let taxable = subtotal - discount_amount;
    let tax_amount = if apply_tax {
        taxable
            .calculate_tax(tax_rate)
            .ok_or_else(|| amount_out_of_range("tax_amount"))?
    } else {
        Money::zero()
    };

    let total_amount = taxable
        .checked_add(tax_amount)
        .ok_or_else(|| amount_out_of_range("total_amount"))?;

    Ok(InvoiceTotals {
        subtotal,
        discount_amount,
        tax_amount,
        total_amount,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
