//! # Advisory Stock Check
//!
//! Compares a cart against a stock snapshot fetched just before submission.
//!
//! ## Advisory, Not Authoritative
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  fetch snapshot ──► validate_stock_availability ──► submit invoice      │
//! │        t0                     (this module)               t1            │
//! │                                                                         │
//! │  Between t0 and t1 another till may sell the last copy. The backend     │
//! │  re-checks at commit and its verdict wins. This check only lets the     │
//! │  cashier fix the cart before a round trip that would fail anyway.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use ts_rs::TS;

use crate::types::{BookId, LineItem};

// =============================================================================
// Stock Snapshot
// =============================================================================

/// Available quantity per book at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockSnapshot(HashMap<BookId, i64>);

impl StockSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Available quantity, or `None` when the book is unknown.
    pub fn available(&self, book_id: BookId) -> Option<i64> {
        self.0.get(&book_id).copied()
    }

    pub fn insert(&mut self, book_id: BookId, quantity: i64) {
        self.0.insert(book_id, quantity);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(BookId, i64)> for StockSnapshot {
    fn from_iter<I: IntoIterator<Item = (BookId, i64)>>(iter: I) -> Self {
        StockSnapshot(iter.into_iter().collect())
    }
}

// =============================================================================
// Stock Issue
// =============================================================================

/// A problem found by the advisory check. Collected, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StockIssue {
    /// The book is not in the snapshot at all.
    #[serde(rename_all = "camelCase")]
    BookNotFound { book_id: BookId, title: String },

    /// Fewer copies on hand than requested.
    #[serde(rename_all = "camelCase")]
    InsufficientStock {
        book_id: BookId,
        title: String,
        available: i64,
        requested: i64,
    },
}

impl StockIssue {
    pub fn book_id(&self) -> BookId {
        match self {
            StockIssue::BookNotFound { book_id, .. }
            | StockIssue::InsufficientStock { book_id, .. } => *book_id,
        }
    }
}

impl fmt::Display for StockIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockIssue::BookNotFound { title, .. } => {
                write!(f, "'{title}' is no longer in the catalog")
            }
            StockIssue::InsufficientStock {
                title,
                available,
                requested,
                ..
            } => write!(f, "Only {available} of '{title}' in stock ({requested} requested)"),
        }
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Checks every requested book against `snapshot`.
///
/// Lines for the same book are summed before comparing; issues come back
/// once per book, in the order the book first appears in `items`. An empty
/// result means everything is satisfiable.
///
/// ```rust
/// use folio_core::money::Money;
/// use folio_core::stock::{validate_stock_availability, StockIssue, StockSnapshot};
/// use folio_core::types::LineItem;
///
/// let snapshot: StockSnapshot = [(1, 5)].into_iter().collect();
/// let items = vec![LineItem::new(1, "Kaliyugaya", Money::from_cents(80_000), 10)];
///
/// let issues = validate_stock_availability(&items, &snapshot);
/// assert!(matches!(
///     issues.as_slice(),
///     [StockIssue::InsufficientStock { available: 5, requested: 10, .. }]
/// ));
/// ```
pub fn validate_stock_availability(
    items: &[LineItem],
    snapshot: &StockSnapshot,
) -> Vec<StockIssue> {
    let mut requested: Vec<(BookId, &str, i64)> = Vec::new();

    for item in items {
        match requested.iter_mut().find(|(id, _, _)| *id == item.book_id) {
            Some(entry) => entry.2 += item.quantity,
            None => requested.push((item.book_id, item.title.as_str(), item.quantity)),
        }
    }

    requested
        .into_iter()
        .filter_map(|(book_id, title, requested)| match snapshot.available(book_id) {
            None => Some(StockIssue::BookNotFound {
                book_id,
                title: title.to_string(),
            }),
            Some(available) if available < requested => Some(StockIssue::InsufficientStock {
                book_id,
                title: title.to_string(),
                available,
                requested,
            }),
            Some(_) => None,
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
