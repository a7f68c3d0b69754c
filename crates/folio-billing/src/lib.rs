//! # folio-billing: Checkout Orchestration
//!
//! Drives the pure pricing engine in `folio-core` against the bookshop
//! backend: fetches customers and stock, builds the invoice, submits it,
//! and renders the printable bill.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bookshop Billing                                 │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Admin Console (browser)                        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Cart + CheckoutRequest                 │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ folio-billing (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ checkout  │  │   retry   │  │  receipt  │  │  config   │  │   │
//! │  │   │ pipeline  │  │  (reads)  │  │   text    │  │ TOML+env  │  │   │
//! │  │   └─────┬─────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │         │ ports: CustomerDirectory, Inventory, InvoiceStore    │   │
//! │  └─────────┼───────────────────────────────────────────────────────┘   │
//! │            │                                                            │
//! │  ┌─────────▼──────────────┐        ┌───────────────────────────────┐  │
//! │  │  REST backend          │        │  folio-core (pricing, pure)   │  │
//! │  │  or MemoryBackend      │        └───────────────────────────────┘  │
//! │  └────────────────────────┘                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`checkout`] - `CheckoutService`: quote, preview, checkout, reprint
//! - [`ports`] - Collaborator traits
//! - [`retry`] - Backoff for idempotent reads
//! - [`receipt`] - Plain-text bill
//! - [`memory`] - In-memory backend
//! - [`config`] - `billing.toml` and `FOLIO_*` overrides
//! - [`telemetry`] - Tracing subscriber setup
//! - [`error`] - `BillingError`

pub mod checkout;
pub mod config;
pub mod error;
pub mod memory;
pub mod ports;
pub mod receipt;
pub mod retry;
pub mod telemetry;

pub use checkout::{CheckoutOutcome, CheckoutRequest, CheckoutService};
pub use config::BillingConfig;
pub use error::{BillingError, BillingResult};
pub use memory::MemoryBackend;
pub use ports::{
    CommittedInvoice, CustomerDirectory, Inventory, InvoiceRenderer, InvoiceStore,
    SubmissionReceipt,
};
pub use receipt::TextInvoiceRenderer;
pub use retry::{with_retry, RetryPolicy};
