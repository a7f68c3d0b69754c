//! # Error Types
//!
//! Domain-specific error types for folio-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  folio-core errors (this file)                                         │
//! │  ├── CoreError        - Invoice preparation failures                   │
//! │  └── ValidationError  - Field-level input failures                     │
//! │                                                                         │
//! │  folio-core advisory results (stock.rs)                                │
//! │  └── StockIssue       - Collected, never raised                        │
//! │                                                                         │
//! │  folio-billing errors (separate crate)                                 │
//! │  └── BillingError     - Pipeline, backend and config failures          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → BillingError → console            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant here is recoverable: the caller re-prompts the user and the
//! cart is left as it was.

use thiserror::Error;

use crate::types::BookId;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised while pricing or assembling an invoice.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A line item (or other input) is malformed.
    ///
    /// ## When This Occurs
    /// - quantity < 1
    /// - discount outside 0-100%
    /// - negative unit price
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// No line items were supplied.
    #[error("Cannot create an invoice for an empty cart")]
    EmptyCart,

    /// No customer was selected for the invoice.
    #[error("A customer must be selected before billing")]
    MissingCustomer,

    /// The book is not in the cart.
    #[error("Book {0} is not in the cart")]
    BookNotInCart(BookId),

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Item quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Text does not follow `PREFIX-YYYYMM-NNNN`.
    #[error("Invalid invoice number '{0}'")]
    InvalidInvoiceNumber(String),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Field-level validation failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
