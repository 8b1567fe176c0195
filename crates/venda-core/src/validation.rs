//! # Validation Module
//!
//! Field-level rules shared by the create/update payloads in [`crate::input`].
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: serde (axum Json extractor)                                  │
//! │  ├── Types, JSON syntax, non-negative percentages                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required fields, lengths, ranges                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite                                                       │
//! │  ├── NOT NULL, CHECK and FOREIGN KEY constraints                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Percentage;
use crate::{MAX_ITEM_QUANTITY, MAX_SALE_LINES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest description accepted for products and product types.
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Longest EAN accepted (EAN-13 fits easily; internal codes can be longer).
pub const MAX_EAN_LEN: usize = 50;

/// 100% in basis points.
const MAX_TAX_BPS: u32 = 10_000;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a description.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 200 characters
///
/// ```rust
/// use venda_core::validation::validate_description;
///
/// assert!(validate_description("mouse").is_ok());
/// assert!(validate_description("   ").is_err());
/// ```
pub fn validate_description(description: &str) -> ValidationResult<()> {
    let description = description.trim();

    if description.is_empty() {
        return Err(ValidationError::required("description"));
    }

    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: MAX_DESCRIPTION_LEN,
        });
    }

    Ok(())
}

/// Validates an EAN / barcode.
///
/// ## Rules
/// - Not empty, at most 50 characters
/// - Letters and digits only (scanners emit nothing else)
pub fn validate_ean(ean: &str) -> ValidationResult<()> {
    if ean.is_empty() {
        return Err(ValidationError::required("ean"));
    }

    if ean.len() > MAX_EAN_LEN {
        return Err(ValidationError::TooLong {
            field: "ean".to_string(),
            max: MAX_EAN_LEN,
        });
    }

    if !ean.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::InvalidFormat {
            field: "ean".to_string(),
            reason: "must contain only letters and digits".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a monetary amount that may be zero but not negative.
///
/// ```rust
/// use venda_core::money::Money;
/// use venda_core::validation::validate_amount;
///
/// assert!(validate_amount("price", Money::from_cents(0)).is_ok());
/// assert!(validate_amount("price", Money::from_cents(-1)).is_err());
/// ```
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a stock counter (quantity, minimum quantity).
pub fn validate_stock_level(field: &str, level: i64) -> ValidationResult<()> {
    if level < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a tax rate: 0% to 100%.
pub fn validate_tax_rate(rate: Percentage) -> ValidationResult<()> {
    if rate.bps() > MAX_TAX_BPS {
        return Err(ValidationError::OutOfRange {
            field: "tax".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

/// Validates the quantity of one sale line.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates the number of lines in a sale: 1 to MAX_SALE_LINES (100).
pub fn validate_sale_size(lines: usize) -> ValidationResult<()> {
    if lines == 0 {
        return Err(ValidationError::required("products"));
    }

    if lines > MAX_SALE_LINES {
        return Err(ValidationError::OutOfRange {
            field: "products".to_string(),
            min: 1,
            max: MAX_SALE_LINES as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
