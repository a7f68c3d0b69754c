//! # Billing Error Types
//!
//! Errors raised by the checkout pipeline.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Billing Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Local          │  │   Backend       │  │     Transport           │ │
//! │  │  (cart kept)    │  │   (cart kept)   │  │     (reads retried)     │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Core           │  │  Rejected       │  │  Unavailable            │ │
//! │  │  StockUnavail.  │  │  CustomerNot-   │  │  Timeout                │ │
//! │  │                 │  │  Found          │  │                         │ │
//! │  │                 │  │  InvoiceNot-    │  │                         │ │
//! │  │                 │  │  Found          │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────────────────────────────────┐  │
//! │  │  Configuration  │  │  Serialization                              │  │
//! │  │  InvalidConfig  │  │  Malformed payloads from the backend        │  │
//! │  │  ConfigLoad/Save│  │  or scenario files                          │  │
//! │  └─────────────────┘  └─────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use folio_core::{CoreError, CustomerId, StockIssue};
use thiserror::Error;

/// Result type alias for billing operations.
pub type BillingResult<T> = Result<T, BillingError>;

/// Everything that can go wrong between "Submit" and a printed bill.
#[derive(Debug, Error)]
pub enum BillingError {
    // =========================================================================
    // Local Errors
    // =========================================================================
    /// The engine refused the cart or its options.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The advisory stock check found problems.
    #[error("{}", describe_stock_issues(.0))]
    StockUnavailable(Vec<StockIssue>),

    // =========================================================================
    // Backend Errors
    // =========================================================================
    /// The selected customer does not exist in the directory.
    #[error("Customer {0} not found")]
    CustomerNotFound(CustomerId),

    /// No committed invoice carries this number.
    #[error("Invoice {0} not found")]
    InvoiceNotFound(String),

    /// The backend refused the request. `message` is shown to the cashier as-is.
    #[error("{message}")]
    Rejected { status: Option<u16>, message: String },

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The backend could not be reached.
    #[error("Billing service unavailable: {0}")]
    Unavailable(String),

    /// The backend did not answer in time.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    // =========================================================================
    // Data Errors
    // =========================================================================
    /// A payload could not be encoded or decoded.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid billing configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),
}

fn describe_stock_issues(issues: &[StockIssue]) -> String {
    let details: Vec<String> = issues.iter().map(ToString::to_string).collect();
    format!("Stock unavailable: {}", details.join("; "))
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<serde_json::Error> for BillingError {
    fn from(err: serde_json::Error) -> Self {
        BillingError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for BillingError {
    fn from(err: std::io::Error) -> Self {
        BillingError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for BillingError {
    fn from(err: toml::de::Error) -> Self {
        BillingError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for BillingError {
    fn from(err: toml::ser::Error) -> Self {
        BillingError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl BillingError {
    /// Returns true if a read that failed with this error may be attempted again.
    ///
    /// Only transport failures qualify. A rejection means the backend saw the
    /// request and said no; asking again gets the same answer.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BillingError::Unavailable(_) | BillingError::Timeout(_))
    }

    /// Returns true if the cashier can fix this by editing the cart or the
    /// customer selection and submitting again.
    pub fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            BillingError::Core(_)
                | BillingError::StockUnavailable(_)
                | BillingError::CustomerNotFound(_)
                | BillingError::InvoiceNotFound(_)
                | BillingError::Rejected { .. }
        )
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            BillingError::InvalidConfig(_)
                | BillingError::ConfigLoadFailed(_)
                | BillingError::ConfigSaveFailed(_)
        )
    }

    /// Stock issues carried by this error, if any.
    pub fn stock_issues(&self) -> &[StockIssue] {
        match self {
            BillingError::StockUnavailable(issues) => issues,
            _ => &[],
        }
    }
}
