//! # Invoice Assembly
//!
//! Turns a customer and a set of line items into an immutable, priced,
//! numbered [`Invoice`].
//!
//! ## Submission Sequence (driven by folio-billing)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  fetch stock ──► validate ──► build_invoice ──► submit ──► clear cart  │
//! │                                (this module)       │                    │
//! │                                                    └─ failure: keep cart│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The invoice has no setters and no `Deserialize` impl: its totals can only
//! come from [`compute_invoice_totals`], never from the caller.

use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_rs::TS;
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::{CoreError, CoreResult};
use crate::invoice_number::{generate_invoice_number, InvoiceNumber, DEFAULT_INVOICE_PREFIX};
use crate::money::Money;
use crate::pricing::{compute_invoice_totals, InvoiceTotals};
use crate::types::{
    BookId, Cashier, CashierId, Customer, CustomerId, DiscountPercent, LineItem, PaymentMethod,
    TaxRate,
};
use crate::validation::{validate_display_name, validate_notes, validate_tax_rate_bps};

// =============================================================================
// Options
// =============================================================================

/// Per-submission settings for [`build_invoice`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceOptions {
    /// Whether tax is levied on this invoice.
    pub apply_tax: bool,
    /// Rate used when `apply_tax` is set.
    pub tax_rate: TaxRate,
    /// Invoice number prefix (`INV`).
    pub number_prefix: String,
    pub payment_method: PaymentMethod,
    pub cashier: Cashier,
    pub notes: Option<String>,
}

impl InvoiceOptions {
    /// Options with the default tax policy (5%, applied), `INV` prefix and
    /// cash payment.
    pub fn new(cashier: Cashier) -> Self {
        InvoiceOptions {
            apply_tax: true,
            tax_rate: TaxRate::default(),
            number_prefix: DEFAULT_INVOICE_PREFIX.to_string(),
            payment_method: PaymentMethod::default(),
            cashier,
            notes: None,
        }
    }
}

// =============================================================================
// Invoice Item
// =============================================================================

/// A line item frozen into an invoice together with its computed total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub book_id: BookId,
    pub title: String,
    #[ts(type = "string")]
    pub unit_price: Money,
    pub quantity: i64,
    #[ts(type = "string")]
    pub discount_percent: DiscountPercent,
    #[ts(type = "string")]
    pub line_total: Money,
}

impl InvoiceItem {
    fn price(item: &LineItem) -> CoreResult<Self> {
        Ok(InvoiceItem {
            book_id: item.book_id,
            title: item.title.clone(),
            unit_price: item.unit_price,
            quantity: item.quantity,
            discount_percent: item.discount_percent,
            line_total: item.line_total()?,
        })
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// The finalized, priced bill submitted for persistence.
///
/// ## Dual-Key Identity
/// - `id`: UUID v4, immutable, lets the backend detect a resubmission
/// - `invoice_number`: human-readable, printed on the bill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[ts(type = "string")]
    id: Uuid,
    #[ts(type = "string")]
    invoice_number: InvoiceNumber,
    customer_id: CustomerId,
    customer_name: String,
    items: Vec<InvoiceItem>,
    #[ts(type = "string")]
    subtotal: Money,
    #[ts(type = "string")]
    discount_amount: Money,
    tax_rate: Option<TaxRate>,
    #[ts(type = "string")]
    tax_amount: Money,
    #[ts(type = "string")]
    total_amount: Money,
    payment_method: PaymentMethod,
    cashier_id: CashierId,
    cashier_name: String,
    #[ts(as = "String")]
    invoice_date: DateTime<Utc>,
    notes: Option<String>,
}

impl Invoice {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn invoice_number(&self) -> &InvoiceNumber {
        &self.invoice_number
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn items(&self) -> &[InvoiceItem] {
        &self.items
    }

    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    pub fn discount_amount(&self) -> Money {
        self.discount_amount
    }

    /// The rate that was applied, `None` for untaxed invoices.
    pub fn tax_rate(&self) -> Option<TaxRate> {
        self.tax_rate
    }

    pub fn tax_amount(&self) -> Money {
        self.tax_amount
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    pub fn totals(&self) -> InvoiceTotals {
        InvoiceTotals {
            subtotal: self.subtotal,
            discount_amount: self.discount_amount,
            tax_amount: self.tax_amount,
            total_amount: self.total_amount,
        }
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub fn cashier_id(&self) -> CashierId {
        self.cashier_id
    }

    pub fn cashier_name(&self) -> &str {
        &self.cashier_name
    }

    pub fn invoice_date(&self) -> DateTime<Utc> {
        self.invoice_date
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Total number of copies across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

// =============================================================================
// Build
// =============================================================================

/// Assembles a priced, numbered invoice.
///
/// ## Errors
/// - `EmptyCart` when `items` is empty (checked first)
/// - `MissingCustomer` when no customer is selected
/// - `InvalidInput` for malformed lines, names, notes, prefix or tax rate
///
/// ```rust
/// use folio_core::clock::SystemClock;
/// use folio_core::invoice::{build_invoice, InvoiceOptions};
/// use folio_core::money::Money;
/// use folio_core::types::{Cashier, Customer, LineItem};
///
/// let customer = Customer {
///     id: 1,
///     account_number: "ACC-0001".into(),
///     name: "Nimal Perera".into(),
///     telephone: None,
///     email: None,
/// };
/// let cashier = Cashier { id: 9, name: "Front Desk".into() };
/// let items = vec![LineItem::new(3, "Gamperaliya", Money::from_cents(150_000), 1)];
///
/// let options = InvoiceOptions::new(cashier);
/// let invoice = build_invoice(Some(&customer), &items, &options, &SystemClock).unwrap();
/// assert_eq!(invoice.total_amount().to_string(), "1575.00");
/// ```
pub fn build_invoice(
    customer: Option<&Customer>,
    items: &[LineItem],
    options: &InvoiceOptions,
    clock: &dyn Clock,
) -> CoreResult<Invoice> {
    if items.is_empty() {
        return Err(CoreError::EmptyCart);
    }
    let customer = customer.ok_or(CoreError::MissingCustomer)?;

    validate_display_name("customer_name", &customer.name)?;
    validate_display_name("cashier_name", &options.cashier.name)?;
    validate_tax_rate_bps(options.tax_rate.bps())?;
    let notes = validate_notes(options.notes.as_deref())?;

    let totals = compute_invoice_totals(items, options.apply_tax, options.tax_rate)?;
    let priced = items.iter().map(InvoiceItem::price).collect::<CoreResult<Vec<_>>>()?;
    let invoice_number = generate_invoice_number(&options.number_prefix, clock)?;

    Ok(Invoice {
        id: Uuid::new_v4(),
        invoice_number,
        customer_id: customer.id,
        customer_name: customer.name.trim().to_string(),
        items: priced,
        subtotal: totals.subtotal,
        discount_amount: totals.discount_amount,
        tax_rate: options.apply_tax.then_some(options.tax_rate),
        tax_amount: totals.tax_amount,
        total_amount: totals.total_amount,
        payment_method: options.payment_method,
        cashier_id: options.cashier.id,
        cashier_name: options.cashier.name.trim().to_string(),
        invoice_date: clock.now(),
        notes,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
