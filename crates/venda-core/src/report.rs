//! # Sales Summary
//!
//! The four figures on the admin dashboard: sales today, total sales,
//! total tax and number of sales.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::sale::SaleTotals;

/// Dashboard figures over all live sales.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct SalesSummary {
    /// Sum of total_amount for sales created on `today` (UTC).
    pub total_today: Money,
    pub total_amount: Money,
    pub total_tax: Money,
    #[ts(type = "number")]
    pub sales_count: u64,
}

impl SalesSummary {
    /// Folds `(created_at, totals)` pairs into a summary.
    ///
    /// ## Errors
    /// `CoreError::SummaryOverflow` when a running total leaves i64 cents.
    pub fn from_sales(
        sales: impl IntoIterator<Item = (DateTime<Utc>, SaleTotals)>,
        today: NaiveDate,
    ) -> CoreResult<Self> {
        sales
            .into_iter()
            .try_fold(SalesSummary::default(), |mut summary, (created_at, totals)| {
                if created_at.date_naive() == today {
                    summary.total_today = add(summary.total_today, totals.total_amount)?;
                }
                summary.total_amount = add(summary.total_amount, totals.total_amount)?;
                summary.total_tax = add(summary.total_tax, totals.total_tax)?;
                summary.sales_count += 1;
                Ok(summary)
            })
    }
}

fn add(total: Money, amount: Money) -> CoreResult<Money> {
    total
        .checked_add(amount)
        .ok_or(CoreError::SummaryOverflow)
}
