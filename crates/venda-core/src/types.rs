//! # Domain Types
//!
//! Core entities of Venda POS. These are also the JSON wire types: the API
//! serializes them as-is inside its `{"data": ...}` envelope.
//!
//! ## Entity Graph
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌─────────────────┐        ┌─────────────────┐                        │
//! │  │   ProductType   │ 1    * │     Product     │                        │
//! │  │  ─────────────  │◄───────│  ─────────────  │                        │
//! │  │  description    │        │  description    │                        │
//! │  │  tax (%)        │        │  price, ean     │                        │
//! │  └─────────────────┘        │  quantity       │                        │
//! │                             └────────▲────────┘                        │
//! │                                      │ 1                               │
//! │  ┌─────────────────┐        ┌────────┴────────┐                        │
//! │  │      Sale       │ 1    * │    SaleItem     │                        │
//! │  │  ─────────────  │───────►│  ─────────────  │                        │
//! │  │  total_amount   │        │  price_per_unit │  ← snapshots, frozen   │
//! │  │  total_tax      │        │  tax_per_unit   │    at sale time        │
//! │  └─────────────────┘        └─────────────────┘                        │
//! │                                                                         │
//! │  Every entity is soft-deletable through `deleted_at`.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Percentage
// =============================================================================

/// A percentage stored in basis points (1 bp = 0.01%).
///
/// Used for product type tax rates and product sales margins.
/// On the wire it is a plain percentage number: `10.0` means 10%.
///
/// ## Why Basis Points?
/// 825 bps = 8.25% stays an integer, so tax math never touches floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, TS)]
#[ts(export)]
pub struct Percentage(#[ts(type = "number")] u32);

impl Percentage {
    /// Creates a percentage from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Percentage(bps)
    }

    /// Creates a percentage from a percentage number (`8.25` → 825 bps).
    ///
    /// Negative input saturates to zero; callers that must reject negatives
    /// go through `Deserialize`, which refuses them.
    pub fn from_percentage(pct: f64) -> Self {
        Percentage((pct * 100.0).round() as u32)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage number.
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Percentage(0)
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Percentage::zero()
    }
}

impl Serialize for Percentage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.percentage())
    }
}

impl<'de> Deserialize<'de> for Percentage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pct = f64::deserialize(deserializer)?;
        if !pct.is_finite() || pct < 0.0 {
            return Err(de::Error::custom("percentage must be a non-negative number"));
        }
        if pct * 100.0 > u32::MAX as f64 {
            return Err(de::Error::custom("percentage is too large"));
        }
        Ok(Percentage::from_percentage(pct))
    }
}

// =============================================================================
// Product Type
// =============================================================================

/// A product category carrying the tax rate applied to its products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductType {
    #[ts(type = "number")]
    pub id: i64,

    pub description: String,

    /// Tax rate applied to every product of this type.
    pub tax: Percentage,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,

    /// Set when the type was soft-deleted.
    #[ts(as = "Option<String>")]
    pub deleted_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    #[ts(type = "number")]
    pub id: i64,

    /// Display name shown at the register.
    pub description: String,

    /// Current selling price.
    pub price: Money,

    /// Barcode (EAN-13 and friends).
    pub ean: Option<String>,

    /// What the shop paid for one unit.
    pub purchase_price: Option<Money>,

    /// Markup over purchase price, as a percentage.
    pub sales_margin: Option<Percentage>,

    /// Units in stock.
    #[ts(type = "number")]
    pub quantity: i64,

    /// Restock threshold.
    #[ts(type = "number")]
    pub minimum_quantity: i64,

    /// The type this product belongs to, loaded alongside it.
    pub product_type: ProductType,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,

    #[ts(as = "Option<String>")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Tax rate of this product's type.
    #[inline]
    pub fn tax_rate(&self) -> Percentage {
        self.product_type.tax
    }

    /// True when stock has reached the restock threshold.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.minimum_quantity
    }

    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line item in a sale.
///
/// ## Snapshot Pattern
/// `price_per_unit` and `tax_per_unit` are copied from the product when the
/// sale is made. Later price or tax changes on the product do not touch
/// them. `product` is the current product row, for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleItem {
    #[ts(type = "number")]
    pub id: i64,

    pub product: Product,

    #[ts(type = "number")]
    pub quantity: i64,

    /// Unit price at time of sale (frozen).
    pub price_per_unit: Money,

    /// Unit tax at time of sale (frozen).
    pub tax_per_unit: Money,

    /// price_per_unit × quantity.
    pub total_price: Money,

    /// Tax on total_price.
    pub total_tax: Money,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,

    #[ts(as = "Option<String>")]
    pub deleted_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Sale
// =============================================================================

/// A completed sale with its ordered line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Sale {
    #[ts(type = "number")]
    pub id: i64,

    pub items: Vec<SaleItem>,

    /// Sum of item total_price.
    pub total_amount: Money,

    /// Sum of item total_tax.
    pub total_tax: Money,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,

    #[ts(as = "Option<String>")]
    pub deleted_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn product_type(tax_pct: f64) -> ProductType {
        let now = Utc::now();
        ProductType {
            id: 1,
            description: "informatica".to_string(),
            tax: Percentage::from_percentage(tax_pct),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub(crate) fn product(id: i64, price_cents: i64, tax_pct: f64) -> Product {
        let now = Utc::now();
        Product {
            id,
            description: format!("product {}", id),
            price: Money::from_cents(price_cents),
            ean: Some(format!("AB{:011}", id)),
            purchase_price: None,
            sales_margin: None,
            quantity: 150,
            minimum_quantity: 10,
            product_type: product_type(tax_pct),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn test_percentage_from_bps() {
        let rate = Percentage::from_bps(825);
        assert_eq!(rate.bps(), 825);
        assert!((rate.percentage() - 8.25).abs() < 0.001);
    }

    #[test]
    fn test_percentage_from_percentage() {
        assert_eq!(Percentage::from_percentage(8.25).bps(), 825);
        assert_eq!(Percentage::from_percentage(10.0).bps(), 1000);
    }

    #[test]
    fn test_percentage_serde() {
        let rate: Percentage = serde_json::from_str("10").unwrap();
        assert_eq!(rate.bps(), 1000);
        assert_eq!(serde_json::to_string(&rate).unwrap(), "10.0");

        assert!(serde_json::from_str::<Percentage>("-1").is_err());
    }

    #[test]
    fn test_low_stock() {
        let mut p = product(1, 15_000, 10.0);
        assert!(!p.is_low_stock());

        p.quantity = 10;
        assert!(p.is_low_stock());
    }

    #[test]
    fn test_product_json_shape() {
        let p = product(4, 15_000, 10.0);
        let json = serde_json::to_value(&p).unwrap();

        assert_eq!(json["price"], 150.0);
        assert_eq!(json["product_type"]["tax"], 10.0);
        assert!(json["deleted_at"].is_null());
    }
}
