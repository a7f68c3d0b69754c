//! # Invoice Numbers
//!
//! Human-readable invoice identifiers of the form `PREFIX-YYYYMM-NNNN`.
//!
//! ```text
//!   INV-202503-0427
//!   ─┬─ ──┬─── ─┬──
//!    │    │     └── random suffix, 0000-9999
//!    │    └──────── year and month from the clock
//!    └───────────── configured prefix
//! ```
//!
//! Uniqueness is NOT guaranteed: two invoices in the same month can draw the
//! same suffix. The backend rejects the duplicate and the caller surfaces
//! that like any other rejection.

use chrono::Datelike;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::clock::Clock;
use crate::error::{CoreError, CoreResult};
use crate::validation::validate_invoice_prefix;

/// Prefix used when none is configured.
pub const DEFAULT_INVOICE_PREFIX: &str = "INV";

/// A validated `PREFIX-YYYYMM-NNNN` invoice number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InvoiceNumber(String);

impl InvoiceNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The prefix part (`INV` in `INV-202503-0427`).
    pub fn prefix(&self) -> &str {
        self.0.split('-').next().unwrap_or_default()
    }

    /// The `YYYYMM` part.
    pub fn period(&self) -> &str {
        self.0.split('-').nth(1).unwrap_or_default()
    }
}

impl fmt::Display for InvoiceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for InvoiceNumber {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidInvoiceNumber(s.to_string());
        let mut parts = s.split('-');

        let (Some(prefix), Some(period), Some(suffix), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        validate_invoice_prefix(prefix).map_err(|_| invalid())?;

        let all_digits =
            |p: &str, len: usize| p.len() == len && p.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(period, 6) || !all_digits(suffix, 4) {
            return Err(invalid());
        }

        let month: u32 = period[4..].parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }

        Ok(InvoiceNumber(s.to_string()))
    }
}

impl TryFrom<String> for InvoiceNumber {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<InvoiceNumber> for String {
    fn from(number: InvoiceNumber) -> Self {
        number.0
    }
}

/// Generates an invoice number for the clock's current month with a
/// thread-local random suffix.
pub fn generate_invoice_number(prefix: &str, clock: &dyn Clock) -> CoreResult<InvoiceNumber> {
    generate_invoice_number_with(prefix, clock, &mut rand::rng())
}

/// Same as [`generate_invoice_number`] with a caller-supplied RNG.
pub fn generate_invoice_number_with<R: Rng + ?Sized>(
    prefix: &str,
    clock: &dyn Clock,
    rng: &mut R,
) -> CoreResult<InvoiceNumber> {
    validate_invoice_prefix(prefix)?;

    let now = clock.now();
    let suffix: u16 = rng.random_range(0..10_000);

    Ok(InvoiceNumber(format!(
        "{}-{:04}{:02}-{:04}",
        prefix,
        now.year(),
        now.month(),
        suffix
    )))
}
