//! # Validation Module
//!
//! Input validation for line items, carts and invoice options.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Browser console                                              │
//! │  └── Immediate feedback on forms                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (fast, local, recoverable)                       │
//! │  ├── quantity ≥ 1, price ≥ 0, discount 0-100%                          │
//! │  └── advisory stock check lives in stock.rs                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: REST backend (authoritative)                                 │
//! │  └── final stock, uniqueness of invoice numbers                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use folio_core::validation::{validate_quantity, validate_invoice_prefix};
//!
//! assert!(validate_quantity(5).is_ok());
//! assert!(validate_invoice_prefix("INV").is_ok());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::DiscountPercent;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY, MAX_NOTES_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Line Item Validators
// =============================================================================

/// A line quantity must be at least 1.
pub fn validate_line_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 1 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Validates a quantity entered into the cart.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    validate_line_quantity(qty)?;

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price. Zero is allowed (complimentary copies).
///
/// ```rust
/// use folio_core::money::Money;
/// use folio_core::validation::validate_unit_price;
///
/// assert!(validate_unit_price(Money::from_cents(0)).is_ok());
/// assert!(validate_unit_price(Money::from_cents(-100)).is_err());
/// ```
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "unit_price".to_string(),
        });
    }
    Ok(())
}

/// Validates a discount percentage (0-100%).
pub fn validate_discount(discount: DiscountPercent) -> ValidationResult<()> {
    if !discount.is_valid() {
        return Err(ValidationError::OutOfRange {
            field: "discount_percent".to_string(),
            min: 0,
            max: 100,
        });
    }
    Ok(())
}

/// Validates a tax rate in basis points (0% to 100%).
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10_000,
        });
    }
    Ok(())
}

// =============================================================================
// Invoice Validators
// =============================================================================

/// Validates an invoice number prefix.
///
/// ## Rules
/// - 1 to 10 characters
/// - ASCII uppercase letters and digits only (the `-` is the separator)
pub fn validate_invoice_prefix(prefix: &str) -> ValidationResult<()> {
    if prefix.is_empty() {
        return Err(ValidationError::Required {
            field: "invoice_prefix".to_string(),
        });
    }

    if prefix.len() > 10 {
        return Err(ValidationError::TooLong {
            field: "invoice_prefix".to_string(),
            max: 10,
        });
    }

    if !prefix
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    {
        return Err(ValidationError::InvalidFormat {
            field: "invoice_prefix".to_string(),
            reason: "must contain only uppercase letters and digits".to_string(),
        });
    }

    Ok(())
}

/// Validates free-text invoice notes. Returns the trimmed text, or `None`
/// when it is blank.
pub fn validate_notes(notes: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(notes) = notes.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };

    if notes.chars().count() > MAX_NOTES_LENGTH {
        return Err(ValidationError::TooLong {
            field: "notes".to_string(),
            max: MAX_NOTES_LENGTH,
        });
    }

    Ok(Some(notes.to_string()))
}

/// Validates the name printed on an invoice (customer or cashier).
pub fn validate_display_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates that one more distinct line fits in the cart.
pub fn validate_cart_size(current_items: usize) -> ValidationResult<()> {
    if current_items >= MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 0,
            max: MAX_CART_ITEMS as i64,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
