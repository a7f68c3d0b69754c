//! # folio-core: Invoice Pricing Engine
//!
//! Pure billing logic for the bookshop console: turns a cart of line items
//! into a priced, numbered invoice.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bookshop Billing                                 │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Admin Console (browser)                        │   │
//! │  │    Customer pick ──► Cart UI ──► Submit ──► Print preview       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               folio-billing (checkout pipeline)                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ folio-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │  pricing  │  │   stock   │  │  invoice  │  │   │
//! │  │   │   Money   │  │ line/total│  │ advisory  │  │  number,  │  │   │
//! │  │   │  TaxRate  │  │   tax     │  │  check    │  │  assembly │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Book, Customer, LineItem, rates)
//! - [`money`] - Integer-cent money with 2-decimal wire format
//! - [`pricing`] - Line totals and invoice totals
//! - [`invoice_number`] - `PREFIX-YYYYMM-NNNN` identifiers
//! - [`stock`] - Advisory stock check against a snapshot
//! - [`invoice`] - Immutable invoice assembly
//! - [`cart`] - Caller-owned cart
//! - [`clock`] - Injected time source
//! - [`validation`] - Field rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use folio_core::money::Money;
//! use folio_core::pricing::compute_invoice_totals;
//! use folio_core::types::{DiscountPercent, LineItem, TaxRate};
//!
//! let items = vec![
//!     LineItem::new(1, "Yuganthaya", Money::from_cents(100_000), 2)
//!         .with_discount(DiscountPercent::from_percent(10)),
//! ];
//! let totals = compute_invoice_totals(&items, true, TaxRate::from_bps(500)).unwrap();
//!
//! assert_eq!(totals.subtotal.to_string(), "2000.00");
//! assert_eq!(totals.discount_amount.to_string(), "200.00");
//! assert_eq!(totals.tax_amount.to_string(), "90.00");
//! assert_eq!(totals.total_amount.to_string(), "1890.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod clock;
pub mod error;
pub mod invoice;
pub mod invoice_number;
pub mod money;
pub mod pricing;
pub mod stock;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::Cart;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CoreError, CoreResult, ValidationError};
pub use invoice::{build_invoice, Invoice, InvoiceItem, InvoiceOptions};
pub use invoice_number::{generate_invoice_number, InvoiceNumber, DEFAULT_INVOICE_PREFIX};
pub use money::Money;
pub use pricing::{compute_invoice_totals, compute_line_total, InvoiceTotals};
pub use stock::{validate_stock_availability, StockIssue, StockSnapshot};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line.
///
/// Guards against typing 1000 instead of 10 at the counter.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum length of free-text invoice notes.
pub const MAX_NOTES_LENGTH: usize = 500;
