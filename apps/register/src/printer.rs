//! # Receipt Printer
//!
//! Plain-text receipts for a 42-column thermal roll, written to stdout or
//! to one file per receipt.
//!
//! ```text
//!                Corner Store
//!                12 Mall Road
//!             Tel: 0300-1, 0300-2
//! ------------------------------------------
//! Receipt #: TXN-20261019101500-AB12CD
//! Date: 2026-10-19 10:15
//! Cashier: Cashier     Manager: Manager
//! Customer: Walk-in Customer
//! Payment: cash
//! ------------------------------------------
//! Oil 1L
//!   2 units x 200.00                  400.00
//! ------------------------------------------
//! Subtotal                            550.00
//! Discount                            -50.00
//! Total                               500.00
//! ...
//! ```

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use till_commit::{ReceiptPrinter, StoreError, StoreResult};
use till_core::{Money, Receipt};

use crate::state::RegisterConfig;

/// Characters per printed line.
pub const RECEIPT_WIDTH: usize = 42;

/// Where rendered receipts go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintTarget {
    Stdout,
    /// One `receipt-<transaction id>.txt` per receipt.
    Directory(PathBuf),
}

pub struct TextReceiptPrinter {
    currency_symbol: String,
    target: PrintTarget,
}

impl TextReceiptPrinter {
    pub fn new(currency_symbol: impl Into<String>, target: PrintTarget) -> Self {
        TextReceiptPrinter {
            currency_symbol: currency_symbol.into(),
            target,
        }
    }

    pub fn from_config(config: &RegisterConfig) -> Self {
        let target = match &config.receipt_dir {
            Some(dir) => PrintTarget::Directory(dir.clone()),
            None => PrintTarget::Stdout,
        };
        Self::new(config.currency_symbol.clone(), target)
    }

    pub fn render(&self, receipt: &Receipt) -> String {
        render_receipt(receipt, &self.currency_symbol)
    }
}

#[async_trait]
impl ReceiptPrinter for TextReceiptPrinter {
    async fn print_receipt(&self, receipt: &Receipt) -> StoreResult<()> {
        let text = self.render(receipt);

        match &self.target {
            PrintTarget::Stdout => {
                let mut stdout = tokio::io::stdout();
                stdout
                    .write_all(text.as_bytes())
                    .await
                    .map_err(|e| StoreError::Unavailable(e.to_string()))?;
                stdout
                    .flush()
                    .await
                    .map_err(|e| StoreError::Unavailable(e.to_string()))?;
            }
            PrintTarget::Directory(dir) => {
                tokio::fs::create_dir_all(dir)
                    .await
                    .map_err(|e| StoreError::Unavailable(e.to_string()))?;
                let path = dir.join(format!("receipt-{}.txt", receipt.sale.transaction_id));
                tokio::fs::write(&path, text)
                    .await
                    .map_err(|e| StoreError::Unavailable(e.to_string()))?;
                debug!(path = %path.display(), "Receipt written");
            }
        }
        Ok(())
    }
}

/// Renders a receipt as fixed-width text.
pub fn render_receipt(receipt: &Receipt, currency_symbol: &str) -> String {
    let sale = &receipt.sale;
    let rule = "-".repeat(RECEIPT_WIDTH);
    let mut out = Vec::new();

    out.push(center(&sale.shop.name));
    if !sale.shop.address.is_empty() {
        out.push(center(&sale.shop.address));
    }
    if !sale.shop.phone_numbers.is_empty() {
        out.push(center(&format!("Tel: {}", sale.shop.phone_line())));
    }
    out.push(rule.clone());

    out.push(format!("Receipt #: {}", sale.transaction_id));
    out.push(format!("Date: {}", sale.created_at.format("%Y-%m-%d %H:%M")));
    out.push(format!("Cashier: {}     Manager: {}", sale.cashier_name, sale.manager_name));
    out.push(format!("Customer: {}", sale.customer));
    if let Some(employee) = &sale.employee {
        out.push(format!("Served by: {}", employee.name));
    }
    out.push(format!("Payment: {}", sale.payment_method));
    out.push(rule.clone());

    for item in &sale.items {
        out.push(item.name.clone());
        let detail = format!("  {} {} x {}", item.quantity.normalize(), item.unit, item.price);
        out.push(two_columns(&detail, &item.line_total().to_string()));
    }
    out.push(rule.clone());

    let money = |amount: Money| format!("{}{}", currency_symbol, amount);
    out.push(two_columns("Subtotal", &money(sale.total_amount)));
    if sale.discount.is_positive() {
        out.push(two_columns("Discount", &format!("-{}", money(sale.discount))));
    }
    if sale.tax.is_positive() {
        out.push(two_columns("Tax", &money(sale.tax)));
    }
    out.push(two_columns("Total", &money(sale.payable)));
    out.push(two_columns("Cash", &money(sale.cash_given)));
    out.push(two_columns("Change", &money(sale.change)));
    out.push(rule);

    out.push(center("Thank you for your business!"));
    if let Some(description) = &sale.shop.receipt_description {
        out.push(center(description));
    }
    out.push(format!("Receipt ID: {}", receipt.id));

    let mut text = out.join("\n");
    text.push('\n');
    text
}

fn center(text: &str) -> String {
    let len = text.chars().count();
    if len >= RECEIPT_WIDTH {
        return text.to_string();
    }
    format!("{}{}", " ".repeat((RECEIPT_WIDTH - len) / 2), text)
}

fn two_columns(left: &str, right: &str) -> String {
    let used = left.chars().count() + right.chars().count();
    let gap = RECEIPT_WIDTH.saturating_sub(used).max(1);
    format!("{}{}{}", left, " ".repeat(gap), right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use till_core::{Catalog, Ledger, LineField, ShopContext, ShopProfile};
    use till_commit::memory::test_item;

    fn receipt() -> Receipt {
        let catalog = Catalog::new(vec![test_item("oil", "Oil 1L", 200, 10), test_item("soap", "Soap", 50, 20)]);
        let mut ledger = Ledger::new();
        ledger.scan("OIL", &catalog).unwrap();
        ledger.scan("SOAP", &catalog).unwrap();
        ledger.edit_line(0, LineField::Quantity, "2").unwrap();
        ledger.edit_line(1, LineField::Quantity, "3").unwrap();
        ledger.set_discount_input("50");
        ledger.set_tendered_input("500");

        let context = ShopContext {
            shop_id: "shop-1".to_string(),
            profile: ShopProfile {
                name: "Corner Store".to_string(),
                address: "12 Mall Road".to_string(),
                phone_numbers: vec!["0300-1".to_string(), "0300-2".to_string()],
                logo_url: None,
                receipt_description: Some("No returns after 7 days".to_string()),
            },
            cashier_name: "Cashier".to_string(),
            manager_name: "Manager".to_string(),
        };

        Receipt {
            id: "rcpt-1".to_string(),
            sale: ledger.to_sale_record(&context, Utc::now()),
        }
    }

    #[test]
    fn test_render_contains_lines_and_totals() {
        let text = render_receipt(&receipt(), "Rs ");

        assert!(text.contains("Corner Store"));
        assert!(text.contains("Tel: 0300-1, 0300-2"));
        assert!(text.contains("Oil 1L"));
        assert!(text.contains("2 units x 200.00"));
        assert!(text.contains("Discount"));
        assert!(text.contains("-Rs 50.00"));
        assert!(text.contains("No returns after 7 days"));
        assert!(text.contains("Receipt ID: rcpt-1"));
        assert!(!text.contains("Tax"));
    }

    #[test]
    fn test_total_lines_fit_the_roll() {
        let text = render_receipt(&receipt(), "Rs ");
        let total = text.lines().find(|l| l.starts_with("Total")).unwrap();

        assert_eq!(total.chars().count(), RECEIPT_WIDTH);
        assert!(total.ends_with("Rs 500.00"));
    }

    #[tokio::test]
    async fn test_directory_target_writes_file() {
        let dir = std::env::temp_dir().join(format!("till-print-{}", std::process::id()));
        let printer = TextReceiptPrinter::new("Rs ", PrintTarget::Directory(dir.clone()));
        let receipt = receipt();

        printer.print_receipt(&receipt).await.unwrap();

        let path = dir.join(format!("receipt-{}.txt", receipt.sale.transaction_id));
        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(written.contains("Corner Store"));
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
