//! # Collaborator Ports
//!
//! The services the checkout pipeline talks to, as traits.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         CheckoutService                                 │
//! │                                                                         │
//! │   CustomerDirectory   Inventory         InvoiceStore         Renderer   │
//! │   ─────────────────   ─────────         ────────────         ────────   │
//! │   customer(id)        book(id)          submit(inv)          render()   │
//! │   customers()         stock_snapshot()  invoice_by_number()  render_    │
//! │                                         invoices_for_        committed()│
//! │                                           customer()                    │
//! │                                         invoices()                      │
//! │        │                   │                   │                        │
//! │        ▼                      ▼                   ▼                     │
//! │   REST backend / MemoryBackend (tests, preview binary)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reads (including the invoice lookups) are idempotent and may be retried
//! by the caller. `submit` is not.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use folio_core::{
    Book, BookId, Customer, CustomerId, Invoice, InvoiceNumber, Money, StockSnapshot,
};

use crate::error::BillingResult;

// =============================================================================
// Submission Receipt
// =============================================================================

/// What the backend returns after persisting an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    /// Backend-assigned row id.
    pub invoice_id: i64,
    pub invoice_number: InvoiceNumber,
    /// Total as persisted. Differs from the submitted total only if the
    /// backend re-priced the invoice.
    pub total_amount: Money,
}

/// An invoice as the backend holds it: what was submitted plus the
/// backend's acknowledgement.
///
/// `receipt.total_amount` is authoritative. Anything printed after commit
/// shows that figure.
#[derive(Debug, Clone, PartialEq)]
pub struct CommittedInvoice {
    pub invoice: Invoice,
    pub receipt: SubmissionReceipt,
}

impl CommittedInvoice {
    /// Persisted total minus computed total. Zero unless the backend re-priced.
    pub fn total_adjustment(&self) -> Money {
        self.receipt.total_amount - self.invoice.total_amount()
    }

    pub fn total_adjusted(&self) -> bool {
        !self.total_adjustment().is_zero()
    }

    /// The total the shop is owed.
    pub fn persisted_total(&self) -> Money {
        self.receipt.total_amount
    }
}

// =============================================================================
// Ports
// =============================================================================

/// Customer lookup.
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    /// Returns `Ok(None)` when no customer has this id.
    async fn customer(&self, id: CustomerId) -> BillingResult<Option<Customer>>;

    async fn customers(&self) -> BillingResult<Vec<Customer>>;
}

/// Catalog and stock lookup.
#[async_trait]
pub trait Inventory: Send + Sync {
    async fn book(&self, id: BookId) -> BillingResult<Option<Book>>;

    /// Current stock for `book_ids`. Unknown books are left out of the snapshot.
    async fn stock_snapshot(&self, book_ids: &[BookId]) -> BillingResult<StockSnapshot>;
}

/// Invoice persistence and lookup.
///
/// The backend re-checks stock when it commits and its answer is final.
/// Committed invoices are never changed or deleted.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    async fn submit(&self, invoice: &Invoice) -> BillingResult<SubmissionReceipt>;

    /// Returns `Ok(None)` when no committed invoice has this number.
    async fn invoice_by_number(
        &self,
        number: &InvoiceNumber,
    ) -> BillingResult<Option<CommittedInvoice>>;

    /// Invoices billed to `customer_id`, oldest first.
    async fn invoices_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> BillingResult<Vec<CommittedInvoice>>;

    /// Every committed invoice, oldest first.
    async fn invoices(&self) -> BillingResult<Vec<CommittedInvoice>>;
}

/// Turns an invoice into printable text.
pub trait InvoiceRenderer: Send + Sync {
    /// Bill for an invoice that has not been persisted (print preview).
    fn render(&self, invoice: &Invoice) -> String;

    /// Bill for a committed invoice. Must show the persisted total.
    fn render_committed(&self, committed: &CommittedInvoice) -> String;
}
