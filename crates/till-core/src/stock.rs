//! # Stock Receiving
//!
//! Input rows for recording goods received from a supplier.
//!
//! Rows are typed in on a form: some are half-filled or left blank. A row
//! counts only when it names an item and a positive quantity; the rest
//! are dropped silently. A batch with no usable rows is rejected.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{parse_decimal_lenient, validate_stock_quantity, ValidationResult};

/// One row of the stock-in form, as typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockInRow {
    pub item_id: Option<String>,
    pub quantity: String,
    pub cost_price: Option<String>,
}

impl StockInRow {
    pub fn new(item_id: impl Into<String>, quantity: impl Into<String>) -> Self {
        StockInRow {
            item_id: Some(item_id.into()),
            quantity: quantity.into(),
            cost_price: None,
        }
    }

    /// Returns the cleaned line, or `None` when the row is not usable.
    fn to_line(&self) -> Option<StockInLine> {
        let item_id = self.item_id.as_deref().map(str::trim).filter(|id| !id.is_empty())?;
        let quantity = parse_decimal_lenient(&self.quantity);
        validate_stock_quantity(quantity).ok()?;

        let cost_price = self
            .cost_price
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(Money::parse_lenient)
            .filter(|c| !c.is_negative());

        Some(StockInLine {
            item_id: item_id.to_string(),
            quantity,
            cost_price,
        })
    }
}

/// A validated stock-in line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockInLine {
    pub item_id: String,
    pub quantity: Decimal,
    pub cost_price: Option<Money>,
}

/// A stock-in form: rows plus the delivery details shared by all of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockInBatch {
    pub rows: Vec<StockInRow>,
    pub supplier: Option<String>,
    pub note: Option<String>,
}

impl StockInBatch {
    /// Drops unusable rows and returns what is left, in input order.
    ///
    /// ## Errors
    /// `EmptyStockBatch` when no row survives.
    pub fn validated(&self) -> ValidationResult<Vec<StockInLine>> {
        let lines: Vec<StockInLine> = self.rows.iter().filter_map(StockInRow::to_line).collect();

        if lines.is_empty() {
            return Err(ValidationError::EmptyStockBatch);
        }

        Ok(lines)
    }

    /// Supplier with surrounding whitespace removed (blank becomes `None`).
    pub fn supplier(&self) -> Option<String> {
        clean(self.supplier.as_deref())
    }

    pub fn note(&self) -> Option<String> {
        clean(self.note.as_deref())
    }
}

fn clean(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_unusable_rows_are_dropped() {
        let batch = StockInBatch {
            rows: vec![
                StockInRow::new("oil", "12"),
                StockInRow::new("soap", "0"),
                StockInRow::new("rice", "-3"),
                StockInRow::new("", "5"),
                StockInRow {
                    item_id: None,
                    quantity: "4".to_string(),
                    cost_price: None,
                },
                StockInRow::new("sugar", "many"),
                StockInRow {
                    item_id: Some("flour".to_string()),
                    quantity: "2.5".to_string(),
                    cost_price: Some("95".to_string()),
                },
            ],
            supplier: Some("  Metro  ".to_string()),
            note: Some(" ".to_string()),
        };

        let lines = batch.validated().unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].item_id, "oil");
        assert_eq!(lines[0].quantity, dec!(12));
        assert_eq!(lines[1].cost_price, Some(Money::from_major(95)));
        assert_eq!(batch.supplier().as_deref(), Some("Metro"));
        assert!(batch.note().is_none());
    }

    #[test]
    fn test_empty_batch_is_rejected() {
        let batch = StockInBatch {
            rows: vec![StockInRow::new("oil", "")],
            ..Default::default()
        };
        assert_eq!(batch.validated(), Err(ValidationError::EmptyStockBatch));
        assert_eq!(
            StockInBatch::default().validated(),
            Err(ValidationError::EmptyStockBatch)
        );
    }
}
