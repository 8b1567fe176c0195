//! # Input Payloads
//!
//! Request bodies for the create/update endpoints.
//!
//! Payloads deserialize leniently (missing fields become `None`/defaults) so
//! that a missing required field is reported as a validation message
//! ("description is required") instead of a bare JSON error. `validate`
//! turns a payload into a record with every required value present.
//!
//! ## Update Flow
//! ```text
//! stored Product ──► ProductChanges::apply_to ──► NewProduct ──► validate ──► ProductRecord
//!                    (only the sent fields win)                              (written by repo)
//! ```

use serde::Deserialize;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Percentage, Product, ProductType};
use crate::validation::{
    validate_amount, validate_description, validate_ean, validate_quantity,
    validate_sale_size, validate_stock_level, validate_tax_rate, ValidationResult,
};
use crate::ValidationError;

// =============================================================================
// Product Type
// =============================================================================

/// Body of `POST /product-types`.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
pub struct NewProductType {
    #[serde(default)]
    pub description: String,
    pub tax: Option<Percentage>,
}

/// A validated product type, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductTypeRecord {
    pub description: String,
    pub tax: Percentage,
}

impl NewProductType {
    pub fn validate(self) -> ValidationResult<ProductTypeRecord> {
        validate_description(&self.description)?;
        let tax = self.tax.ok_or_else(|| ValidationError::required("tax"))?;
        validate_tax_rate(tax)?;

        Ok(ProductTypeRecord {
            description: self.description.trim().to_string(),
            tax,
        })
    }
}

/// Body of `PUT /product-types/{id}`. Absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
pub struct ProductTypeChanges {
    pub description: Option<String>,
    pub tax: Option<Percentage>,
}

impl ProductTypeChanges {
    pub fn apply_to(self, current: &ProductType) -> NewProductType {
        NewProductType {
            description: self
                .description
                .unwrap_or_else(|| current.description.clone()),
            tax: Some(self.tax.unwrap_or(current.tax)),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// Reference to a product type by id: `"product_type": {"id": 1}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, TS)]
#[ts(export)]
pub struct ProductTypeRef {
    #[ts(type = "number")]
    pub id: i64,
}

/// Body of `POST /products`.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    #[serde(default)]
    pub description: String,
    pub price: Option<Money>,
    pub ean: Option<String>,
    pub purchase_price: Option<Money>,
    pub sales_margin: Option<Percentage>,
    #[serde(default)]
    #[ts(type = "number")]
    pub quantity: i64,
    #[serde(default)]
    #[ts(type = "number")]
    pub minimum_quantity: i64,
    pub product_type: Option<ProductTypeRef>,
}

/// A validated product, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub description: String,
    pub price: Money,
    pub ean: Option<String>,
    pub purchase_price: Option<Money>,
    pub sales_margin: Option<Percentage>,
    pub quantity: i64,
    pub minimum_quantity: i64,
    pub product_type_id: i64,
}

impl NewProduct {
    pub fn validate(self) -> ValidationResult<ProductRecord> {
        validate_description(&self.description)?;

        let price = self.price.ok_or_else(|| ValidationError::required("price"))?;
        validate_amount("price", price)?;

        // The admin form sends "" for an empty barcode field
        let ean = self
            .ean
            .map(|ean| ean.trim().to_string())
            .filter(|ean| !ean.is_empty());
        if let Some(ean) = &ean {
            validate_ean(ean)?;
        }

        if let Some(purchase_price) = self.purchase_price {
            validate_amount("purchase_price", purchase_price)?;
        }
        validate_stock_level("quantity", self.quantity)?;
        validate_stock_level("minimum_quantity", self.minimum_quantity)?;

        let product_type = self
            .product_type
            .ok_or_else(|| ValidationError::required("product_type"))?;

        Ok(ProductRecord {
            description: self.description.trim().to_string(),
            price,
            ean,
            purchase_price: self.purchase_price,
            sales_margin: self.sales_margin,
            quantity: self.quantity,
            minimum_quantity: self.minimum_quantity,
            product_type_id: product_type.id,
        })
    }
}

/// Body of `PUT /products/{id}`. Absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
pub struct ProductChanges {
    pub description: Option<String>,
    pub price: Option<Money>,
    pub ean: Option<String>,
    pub purchase_price: Option<Money>,
    pub sales_margin: Option<Percentage>,
    #[ts(type = "number | null")]
    pub quantity: Option<i64>,
    #[ts(type = "number | null")]
    pub minimum_quantity: Option<i64>,
    pub product_type: Option<ProductTypeRef>,
}

impl ProductChanges {
    pub fn apply_to(self, current: &Product) -> NewProduct {
        NewProduct {
            description: self
                .description
                .unwrap_or_else(|| current.description.clone()),
            price: Some(self.price.unwrap_or(current.price)),
            ean: self.ean.or_else(|| current.ean.clone()),
            purchase_price: self.purchase_price.or(current.purchase_price),
            sales_margin: self.sales_margin.or(current.sales_margin),
            quantity: self.quantity.unwrap_or(current.quantity),
            minimum_quantity: self.minimum_quantity.unwrap_or(current.minimum_quantity),
            product_type: Some(self.product_type.unwrap_or(ProductTypeRef {
                id: current.product_type.id,
            })),
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// One requested line of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, TS)]
#[ts(export)]
pub struct SaleLineRequest {
    #[ts(type = "number")]
    pub product_id: i64,
    #[ts(type = "number")]
    pub quantity: i64,
}

/// Body of `POST /sales`: `{"products": [{"product_id": 4, "quantity": 2}]}`.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
pub struct NewSale {
    #[serde(default)]
    pub products: Vec<SaleLineRequest>,
}

impl NewSale {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_sale_size(self.products.len())?;
        for line in &self.products {
            validate_quantity(line.quantity)?;
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
