//! # Sales Summary
//!
//! Dashboard figures computed from persisted receipts, for one period
//! (normally the shop's local calendar day).
//!
//! ```text
//! receipts ──► in period? ──► count, gross, discounts, net (Σ payable)
//!                         ──► cost of goods (Σ cost × qty) ──► profit = net − cost
//!                         ──► margin % = profit ÷ net × 100
//!                         ──► items sold (Σ quantity)
//!                         ──► 5 most recent headlines
//! ```

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::Receipt;

/// How many recent receipts the summary lists.
pub const RECENT_RECEIPTS: usize = 5;

/// One line in the "recent sales" list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptHeadline {
    pub id: String,
    pub transaction_id: String,
    pub customer: String,
    pub payable: Money,
    pub created_at: DateTime<Utc>,
}

/// Half-open time window `[since, until)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesPeriod {
    pub since: DateTime<Utc>,
    pub until: DateTime<Utc>,
}

impl SalesPeriod {
    /// Midnight to midnight of `day` in `tz`.
    ///
    /// Returns `None` only when a midnight does not exist in `tz` or the
    /// date is at the end of the calendar range.
    pub fn day<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> Option<Self> {
        let midnight = |date: NaiveDate| {
            tz.from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
                .earliest()
                .map(|at| at.with_timezone(&Utc))
        };
        Some(Self {
            since: midnight(day)?,
            until: midnight(day.succ_opt()?)?,
        })
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.since <= at && at < self.until
    }
}

/// Aggregate sales figures for one shop over one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub period: SalesPeriod,
    pub receipt_count: usize,
    pub gross: Money,
    pub discounts: Money,
    pub tax: Money,
    pub net: Money,
    pub cost_of_goods: Money,
    pub profit: Money,
    /// Profit over net sales, in percent (2 dp). Zero unless net is positive.
    pub margin_percent: Decimal,
    pub items_sold: Decimal,
    pub recent: Vec<ReceiptHeadline>,
}

impl SalesSummary {
    /// Summarizes the receipts created inside `period`; others are ignored.
    pub fn from_receipts(receipts: &[Receipt], period: &SalesPeriod) -> Self {
        let receipts: Vec<&Receipt> = receipts
            .iter()
            .filter(|r| period.contains(r.sale.created_at))
            .collect();

        let mut summary = SalesSummary {
            period: *period,
            receipt_count: receipts.len(),
            gross: Money::zero(),
            discounts: Money::zero(),
            tax: Money::zero(),
            net: Money::zero(),
            cost_of_goods: Money::zero(),
            profit: Money::zero(),
            margin_percent: Decimal::ZERO,
            items_sold: Decimal::ZERO,
            recent: Vec::new(),
        };

        for receipt in &receipts {
            let sale = &receipt.sale;
            summary.gross += sale.total_amount;
            summary.discounts += sale.discount;
            summary.tax += sale.tax;
            summary.net += sale.payable;
            summary.cost_of_goods += sale.cost_of_goods();
            summary.items_sold += sale.total_quantity();
        }
        summary.profit = summary.net - summary.cost_of_goods;
        if summary.net.is_positive() {
            summary.margin_percent = (summary.profit.amount() / summary.net.amount()
                * Decimal::ONE_HUNDRED)
                .round_dp(2);
        }

        let mut newest = receipts;
        newest.sort_by(|a, b| b.sale.created_at.cmp(&a.sale.created_at));
        summary.recent = newest
            .into_iter()
            .take(RECENT_RECEIPTS)
            .map(|r| ReceiptHeadline {
                id: r.id.clone(),
                transaction_id: r.sale.transaction_id.clone(),
                customer: r.sale.customer.clone(),
                payable: r.sale.payable,
                created_at: r.sale.created_at,
            })
            .collect();

        summary
    }
}
