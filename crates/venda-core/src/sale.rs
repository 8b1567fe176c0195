//! # Sale Pricing
//!
//! Turns requested lines into priced lines and running totals.
//!
//! ## Sale Creation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  {"products": [{"product_id": 4, "quantity": 2}, ...]}                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  for each line (inside one DB transaction, venda-db):                  │
//! │       │                                                                 │
//! │       ├── resolve Product (NotFound aborts the whole sale)             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SaleDraft::add_line(&product, quantity) ← THIS MODULE                 │
//! │       │                                                                 │
//! │       ├── price_per_unit = product.price                               │
//! │       ├── tax_per_unit   = price × tax%                                │
//! │       ├── total_price    = price × quantity                            │
//! │       ├── total_tax      = price × quantity × tax%                     │
//! │       └── totals        += (total_price, total_tax)                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT sale + sale_items, COMMIT                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ```rust
//! use venda_core::sale::PricedLine;
//! # fn demo(product: &venda_core::Product) {
//! let line = PricedLine::price(product, 2).unwrap();
//! assert_eq!(line.total_price, line.price_per_unit.multiply_quantity(2));
//! # }
//! ```

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Product;

// =============================================================================
// Priced Line
// =============================================================================

/// One sale line with its prices frozen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
    pub product_id: i64,
    pub quantity: i64,
    pub price_per_unit: Money,
    pub tax_per_unit: Money,
    pub total_price: Money,
    pub total_tax: Money,
}

impl PricedLine {
    /// Prices `quantity` units of `product` at its current price and tax.
    ///
    /// Tax is computed once on the line total so that
    /// `total_tax = price × quantity × tax%` holds up to a single rounding.
    pub fn price(product: &Product, quantity: i64) -> CoreResult<Self> {
        let rate = product.tax_rate();
        let total_price = product
            .price
            .checked_multiply_quantity(quantity)
            .ok_or(CoreError::AmountOverflow {
                product_id: product.id,
            })?;

        Ok(PricedLine {
            product_id: product.id,
            quantity,
            price_per_unit: product.price,
            tax_per_unit: product.price.calculate_tax(rate),
            total_price,
            total_tax: total_price.calculate_tax(rate),
        })
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Running totals of a sale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaleTotals {
    pub total_amount: Money,
    pub total_tax: Money,
}

impl SaleTotals {
    /// Sums the totals of already priced lines.
    pub fn of<'a>(lines: impl IntoIterator<Item = &'a PricedLine>) -> Self {
        lines.into_iter().fold(SaleTotals::default(), |acc, line| SaleTotals {
            total_amount: acc.total_amount + line.total_price,
            total_tax: acc.total_tax + line.total_tax,
        })
    }
}

// =============================================================================
// Sale Draft
// =============================================================================

/// Accumulates priced lines for a sale that is being created.
#[derive(Debug, Clone, Default)]
pub struct SaleDraft {
    lines: Vec<PricedLine>,
    totals: SaleTotals,
}

impl SaleDraft {
    pub fn new() -> Self {
        SaleDraft::default()
    }

    /// Prices a line and adds it to the running totals.
    pub fn add_line(&mut self, product: &Product, quantity: i64) -> CoreResult<PricedLine> {
        let line = PricedLine::price(product, quantity)?;
        let overflow = || CoreError::AmountOverflow {
            product_id: product.id,
        };

        let total_amount = self
            .totals
            .total_amount
            .checked_add(line.total_price)
            .ok_or_else(overflow)?;
        let total_tax = self
            .totals
            .total_tax
            .checked_add(line.total_tax)
            .ok_or_else(overflow)?;

        self.totals = SaleTotals {
            total_amount,
            total_tax,
        };
        self.lines.push(line);

        Ok(line)
    }

    pub fn lines(&self) -> &[PricedLine] {
        &self.lines
    }

    pub fn totals(&self) -> SaleTotals {
        self.totals
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::tests::product;

    #[test]
    fn test_reference_example() {
        // price 150, tax 10%, quantity 2 → 300 / 30
        let p = product(4, 15_000, 10.0);
        let line = PricedLine::price(&p, 2).unwrap();

        assert_eq!(line.price_per_unit, Money::from_cents(15_000));
        assert_eq!(line.tax_per_unit, Money::from_cents(1_500));
        assert_eq!(line.total_price, Money::from_cents(30_000));
        assert_eq!(line.total_tax, Money::from_cents(3_000));
    }

    #[test]
    fn test_totals_are_sum_of_lines() {
        let mouse = product(1, 15_000, 10.0);
        let cable = product(2, 1_999, 8.25);
        let free = product(3, 0, 0.0);

        let mut draft = SaleDraft::new();
        draft.add_line(&mouse, 2).unwrap();
        draft.add_line(&cable, 3).unwrap();
        draft.add_line(&free, 1).unwrap();

        let totals = draft.totals();
        let expected_amount: Money = draft.lines().iter().map(|l| l.total_price).sum();
        let expected_tax: Money = draft.lines().iter().map(|l| l.total_tax).sum();

        assert_eq!(totals.total_amount, expected_amount);
        assert_eq!(totals.total_tax, expected_tax);
        assert_eq!(totals, SaleTotals::of(draft.lines()));

        // 300.00 + 59.97 + 0
        assert_eq!(totals.total_amount.cents(), 35_997);
        // 30.00 + round(59.97 × 8.25% = 4.947525) = 30.00 + 4.95
        assert_eq!(totals.total_tax.cents(), 3_495);
    }

    #[test]
    fn test_tax_formula_holds_for_many_lines() {
        for (price, pct, qty) in [(1, 10.0, 1), (999, 7.5, 13), (15_000, 10.0, 2), (12_345, 17.0, 999)] {
            let p = product(1, price, pct);
            let line = PricedLine::price(&p, qty).unwrap();

            assert_eq!(line.total_price.cents(), price * qty);
            let exact = (price * qty) as f64 * pct / 100.0;
            assert!((line.total_tax.cents() as f64 - exact).abs() <= 0.5);
        }
    }

    #[test]
    fn test_duplicate_products_are_separate_lines() {
        let p = product(1, 500, 10.0);
        let mut draft = SaleDraft::new();
        draft.add_line(&p, 1).unwrap();
        draft.add_line(&p, 1).unwrap();

        assert_eq!(draft.lines().len(), 2);
        assert_eq!(draft.totals().total_amount.cents(), 1_000);
    }

    #[test]
    fn test_overflow_is_an_error() {
        let p = product(9, i64::MAX / 2, 10.0);
        let err = PricedLine::price(&p, 3).unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow { product_id: 9 }));
    }

    #[test]
    fn test_empty_draft() {
        let draft = SaleDraft::new();
        assert!(draft.is_empty());
        assert_eq!(draft.totals(), SaleTotals::default());
    }
}
