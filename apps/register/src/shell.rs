//! # Register Shell
//!
//! A line-oriented front end: one command per line, one reply per command.
//!
//! ```text
//! > scan 8964000111
//!   #  Item                          Qty      Price        Total
//!   1  Oil 1L                          1     200.00       200.00
//! ...
//! > qty 1 2
//! > pay 500
//! > commit
//! Committed receipt 3f6c… (TXN-20261019101500-AB12CD)
//! ```
//!
//! Line numbers are one-based, as shown by `show`. Errors are printed as
//! `error [CODE]: message` and never end the session; only `quit` (or end
//! of input) does.

use chrono::{Local, NaiveDate};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use till_commit::TransactionCommitter;
use till_core::{StockInBatch, StockInRow};

use crate::commands::checkout::CommitResponse;
use crate::commands::ledger::LedgerResponse;
use crate::commands::{catalog, checkout, ledger, reconciliation, report, stock};
use crate::error::ApiError;
use crate::printer::render_receipt;
use crate::state::{RegisterConfig, SessionState, StoreState};

const HELP: &str = "\
Sale
  scan <code>              add an item by scan code
  add <name>               add an item by exact name
  qty <line> <n>           set a line's quantity
  price <line> <amount>    set a line's unit price
  tax-line <line> <pct>    set a line's tax percent
  rm <line>                remove a line
  discount <amount>        whole-sale discount
  tax <amount>             whole-sale tax
  pay <amount>             amount tendered
  customer [name]          customer label (blank for walk-in)
  staff [name]             attribute the sale (blank to clear)
  method <cash|card>       payment method
  show                     print the ledger
  commit                   save the sale
  clear                    discard the sale
Catalog and stock
  find [text]              search items by name
  reload                   reload the catalog
  stock-in <item:qty[@cost]>... [supplier=<name>] [note=<text>]
                           (supplier and note may contain spaces)
Reports
  summary [YYYY-MM-DD]     sales, profit and margin for a day (default today)
  receipt <id>             print a saved receipt
  recon                    open reconciliation entries
  resolve <id>             close a reconciliation entry
  help | quit";

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Scan(String),
    Add(String),
    /// `line` is zero-based.
    Edit {
        line: usize,
        field: &'static str,
        value: String,
    },
    Remove(usize),
    Discount(String),
    Tax(String),
    Pay(String),
    Customer(String),
    Staff(String),
    Method(String),
    Show,
    Commit,
    Clear,
    Find(String),
    Reload,
    StockIn(StockInBatch),
    /// `None` means today.
    Summary(Option<NaiveDate>),
    Receipt(String),
    Recon,
    Resolve(String),
    Help,
    Quit,
    Empty,
}

/// Parses one input line.
pub fn parse(input: &str) -> Result<Command, ApiError> {
    let input = input.trim();
    let (verb, rest) = match input.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (input, ""),
    };

    let command = match verb.to_lowercase().as_str() {
        "" => Command::Empty,
        "scan" => Command::Scan(required(rest, "code")?),
        "add" => Command::Add(required(rest, "item name")?),
        "qty" => edit(rest, "qty")?,
        "price" => edit(rest, "price")?,
        "tax-line" => edit(rest, "tax")?,
        "rm" => Command::Remove(line_number(rest)?),
        "discount" => Command::Discount(rest.to_string()),
        "tax" => Command::Tax(rest.to_string()),
        "pay" => Command::Pay(rest.to_string()),
        "customer" => Command::Customer(rest.to_string()),
        "staff" => Command::Staff(rest.to_string()),
        "method" => Command::Method(required(rest, "payment method")?),
        "show" => Command::Show,
        "commit" => Command::Commit,
        "clear" => Command::Clear,
        "find" => Command::Find(rest.to_string()),
        "reload" => Command::Reload,
        "stock-in" => Command::StockIn(stock_in(rest)?),
        "summary" => Command::Summary(summary_day(rest)?),
        "receipt" => Command::Receipt(required(rest, "receipt id")?),
        "recon" => Command::Recon,
        "resolve" => Command::Resolve(required(rest, "entry id")?),
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => {
            return Err(ApiError::validation(format!(
                "Unknown command '{}', type 'help'",
                other
            )))
        }
    };
    Ok(command)
}

fn required(rest: &str, what: &str) -> Result<String, ApiError> {
    if rest.is_empty() {
        return Err(ApiError::validation(format!("Missing {}", what)));
    }
    Ok(rest.to_string())
}

/// One-based line number to zero-based index.
fn line_number(text: &str) -> Result<usize, ApiError> {
    match text.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(ApiError::validation(format!(
            "Line must be a number from 1, got '{}'",
            text.trim()
        ))),
    }
}

fn edit(rest: &str, field: &'static str) -> Result<Command, ApiError> {
    let (line, value) = rest
        .split_once(char::is_whitespace)
        .ok_or_else(|| ApiError::validation(format!("Usage: {} <line> <value>", field)))?;
    Ok(Command::Edit {
        line: line_number(line)?,
        field,
        value: value.trim().to_string(),
    })
}

fn summary_day(rest: &str) -> Result<Option<NaiveDate>, ApiError> {
    if rest.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(rest, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ApiError::validation(format!("Expected a date like 2026-10-19, got '{}'", rest)))
}

/// Parses `item:qty[@cost]... [supplier=<text>] [note=<text>]`.
///
/// A `supplier=` or `note=` value runs until the next `key=` token, so
/// both may contain spaces. Item rows come before them.
fn stock_in(rest: &str) -> Result<StockInBatch, ApiError> {
    let mut batch = StockInBatch::default();
    let mut open_text: Option<TextField> = None;

    for token in rest.split_whitespace() {
        if let Some(supplier) = token.strip_prefix("supplier=") {
            batch.supplier = Some(supplier.to_string());
            open_text = Some(TextField::Supplier);
            continue;
        }
        if let Some(note) = token.strip_prefix("note=") {
            batch.note = Some(note.to_string());
            open_text = Some(TextField::Note);
            continue;
        }

        match open_text {
            Some(TextField::Supplier) => append_word(&mut batch.supplier, token),
            Some(TextField::Note) => append_word(&mut batch.note, token),
            None => batch.rows.push(stock_row(token)?),
        }
    }

    Ok(batch)
}

#[derive(Clone, Copy)]
enum TextField {
    Supplier,
    Note,
}

fn append_word(value: &mut Option<String>, word: &str) {
    match value {
        Some(text) if !text.is_empty() => {
            text.push(' ');
            text.push_str(word);
        }
        _ => *value = Some(word.to_string()),
    }
}

fn stock_row(token: &str) -> Result<StockInRow, ApiError> {
    let (item_id, amount) = token.split_once(':').ok_or_else(|| {
        ApiError::validation(format!("Expected item:qty[@cost], got '{}'", token))
    })?;
    let (quantity, cost_price) = match amount.split_once('@') {
        Some((quantity, cost)) => (quantity, Some(cost.to_string())),
        None => (amount, None),
    };
    Ok(StockInRow {
        item_id: Some(item_id.to_string()),
        quantity: quantity.to_string(),
        cost_price,
    })
}

// =============================================================================
// Register
// =============================================================================

/// Everything a running register needs to execute commands.
pub struct Register {
    pub config: RegisterConfig,
    pub session: SessionState,
    pub stores: StoreState,
    pub committer: TransactionCommitter,
}

impl Register {
    /// Runs one command and renders its reply.
    pub async fn execute(&self, command: Command) -> Result<String, ApiError> {
        let shop_id = self.config.shop_id.as_str();
        let session = &self.session;

        let reply = match command {
            Command::Scan(code) => self.render_ledger(&ledger::scan_item(session, &code).await?),
            Command::Add(name) => self.render_ledger(&ledger::select_item(session, &name).await?),
            Command::Edit { line, field, value } => {
                self.render_ledger(&ledger::edit_line(session, line, field, &value).await?)
            }
            Command::Remove(line) => self.render_ledger(&ledger::remove_line(session, line).await?),
            Command::Discount(input) => self.render_ledger(&ledger::set_discount(session, &input).await),
            Command::Tax(input) => self.render_ledger(&ledger::set_tax(session, &input).await),
            Command::Pay(input) => self.render_ledger(&ledger::set_tendered(session, &input).await),
            Command::Customer(name) => self.render_ledger(&ledger::set_customer(session, &name).await),
            Command::Staff(name) => self.render_ledger(
                &ledger::set_staff(session, &self.stores, shop_id, &name).await?,
            ),
            Command::Method(method) => {
                self.render_ledger(&ledger::set_payment_method(session, &method).await?)
            }
            Command::Show => self.render_ledger(&ledger::get_ledger(session).await),
            Command::Commit => self.render_commit(
                &checkout::commit_sale(session, &self.committer, &self.stores, shop_id).await?,
            ),
            Command::Clear => {
                let response = ledger::clear_ledger(session).await;
                format!("Cleared. New transaction {}", response.transaction_id)
            }
            Command::Find(query) => self.render_items(&query).await,
            Command::Reload => {
                let count = catalog::reload_catalog(session, &self.stores, shop_id).await?;
                format!("Loaded {} items", count)
            }
            Command::StockIn(batch) => {
                let response = stock::receive_stock_batch(session, &self.stores, shop_id, &batch).await?;
                let mut out = vec![format!("Received {} rows", response.received.len())];
                for row in &response.received {
                    out.push(format!(
                        "  {:<12} +{:<8} on hand {}",
                        row.entry.item_id,
                        row.entry.quantity.normalize(),
                        row.on_hand.normalize()
                    ));
                }
                out.join("\n")
            }
            Command::Summary(day) => {
                let day = day.unwrap_or_else(|| Local::now().date_naive());
                let summary = report::sales_summary(&self.stores, shop_id, day).await?;
                let money = |m| self.config.format_currency(m);
                let mut out = vec![
                    format!("Sales for {}", day),
                    format!("Receipts:   {}", summary.receipt_count),
                    format!("Items sold: {}", summary.items_sold.normalize()),
                    format!("Gross:      {}", money(summary.gross)),
                    format!("Discounts:  {}", money(summary.discounts)),
                    format!("Tax:        {}", money(summary.tax)),
                    format!("Net:        {}", money(summary.net)),
                    format!("Profit:     {}", money(summary.profit)),
                    format!("Margin:     {}%", summary.margin_percent.normalize()),
                ];
                for recent in &summary.recent {
                    out.push(format!(
                        "  {}  {}  {}  {}",
                        recent.created_at.format("%Y-%m-%d %H:%M"),
                        recent.transaction_id,
                        recent.customer,
                        money(recent.payable)
                    ));
                }
                out.join("\n")
            }
            Command::Receipt(id) => {
                let receipt = report::get_receipt(&self.stores, &id).await?;
                render_receipt(&receipt, &self.config.currency_symbol)
            }
            Command::Recon => {
                let entries = reconciliation::list_open(&self.stores).await?;
                if entries.is_empty() {
                    "No open reconciliation entries".to_string()
                } else {
                    entries
                        .iter()
                        .map(|e| {
                            format!(
                                "{}  receipt {}  {} x{}  ({})",
                                e.id,
                                e.receipt_id,
                                e.item_name,
                                e.quantity.normalize(),
                                e.reason
                            )
                        })
                        .collect::<Vec<_>>()
                        .join("\n")
                }
            }
            Command::Resolve(id) => {
                reconciliation::resolve(&self.stores, &id).await?;
                format!("Resolved {}", id)
            }
            Command::Help => HELP.to_string(),
            Command::Quit | Command::Empty => String::new(),
        };

        Ok(reply)
    }

    fn render_ledger(&self, ledger: &LedgerResponse) -> String {
        let money = |m| self.config.format_currency(m);
        let totals = &ledger.totals;

        let mut out = vec![format!(
            "Transaction {}  [{}]  {}",
            ledger.transaction_id, ledger.payment_method, ledger.customer
        )];
        if let Some(staff) = &ledger.staff {
            out.push(format!("Served by: {}", staff.name));
        }

        if ledger.lines.is_empty() {
            out.push("  (no items)".to_string());
        } else {
            out.push(format!(
                "{:>3}  {:<26} {:>8} {:>10} {:>12}",
                "#", "Item", "Qty", "Price", "Total"
            ));
            for (i, line) in ledger.lines.iter().enumerate() {
                out.push(format!(
                    "{:>3}  {:<26} {:>8} {:>10} {:>12}",
                    i + 1,
                    line.name(),
                    line.quantity().normalize().to_string(),
                    line.sale_price().to_string(),
                    line.line_total().to_string()
                ));
            }
        }

        out.push(format!("Subtotal: {}", money(totals.total_amount)));
        if totals.discount.is_positive() {
            out.push(format!("Discount: {}", money(totals.discount)));
        }
        if totals.tax.is_positive() {
            out.push(format!("Tax:      {}", money(totals.tax)));
        }
        out.push(format!("Payable:  {}", money(totals.payable)));
        out.push(format!("Tendered: {}", money(totals.tendered)));
        if totals.amount_outstanding.is_positive() {
            out.push(format!("Due:      {}", money(totals.amount_outstanding)));
        } else {
            out.push(format!("Change:   {}", money(totals.change_returned)));
        }
        out.join("\n")
    }

    fn render_commit(&self, response: &CommitResponse) -> String {
        let mut out = vec![
            format!(
                "Committed receipt {} ({})",
                response.receipt_id, response.transaction_id
            ),
            format!(
                "Payable: {}  Change: {}",
                self.config.format_currency(response.payable),
                self.config.format_currency(response.change)
            ),
        ];
        if let Some(warning) = &response.warning {
            out.push(format!("warning: {}", warning));
        }
        out.join("\n")
    }

    async fn render_items(&self, query: &str) -> String {
        let items = catalog::search_catalog(&self.session, query).await;
        if items.is_empty() {
            return "No matching items".to_string();
        }
        items
            .iter()
            .map(|item| {
                format!(
                    "{:<14} {:<26} {:>10}  on hand {}",
                    item.code.as_deref().unwrap_or("-"),
                    item.name,
                    item.price.to_string(),
                    item.quantity.normalize()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Reads commands from `input` until `quit` or end of input.
pub async fn run_shell<R, W>(register: &Register, input: R, mut output: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    output.write_all(b"> ").await?;
    output.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let reply = match parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => register.execute(command).await,
            Err(e) => Err(e),
        };

        let text = match reply {
            Ok(text) => text,
            Err(e) => {
                debug!(code = e.code.as_str(), error = %e.message, "Command failed");
                if e.retryable {
                    format!("error [{}]: {} (try again)", e.code.as_str(), e.message)
                } else {
                    format!("error [{}]: {}", e.code.as_str(), e.message)
                }
            }
        };

        if !text.is_empty() {
            output.write_all(text.as_bytes()).await?;
            output.write_all(b"\n").await?;
        }
        output.write_all(b"> ").await?;
        output.flush().await?;
    }

    output.write_all(b"\n").await?;
    output.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use till_commit::memory::{test_item, MemoryStore};
    use till_commit::{InventoryStore, ReceiptStore, ReconciliationLog};
    use till_core::Catalog;

    async fn register() -> (Arc<MemoryStore>, Register) {
        let store = Arc::new(MemoryStore::with_items(vec![
            test_item("oil", "Oil 1L", 200, 10),
            test_item("soap", "Soap", 50, 20),
        ]));
        let config = RegisterConfig {
            shop_id: "shop-1".to_string(),
            ..Default::default()
        };
        let stores = StoreState::shared(Arc::clone(&store));
        let session = SessionState::new(Catalog::default());
        catalog::reload_catalog(&session, &stores, "shop-1").await.unwrap();

        let receipts: Arc<dyn ReceiptStore> = store.clone();
        let inventory: Arc<dyn InventoryStore> = store.clone();
        let log: Arc<dyn ReconciliationLog> = store.clone();
        let committer = TransactionCommitter::new(config.shop_context(), receipts, inventory)
            .with_reconciliation_log(log);

        let register = Register {
            config,
            session,
            stores,
            committer,
        };
        (store, register)
    }

    async fn run(register: &Register, script: &str) -> String {
        let mut output = Vec::new();
        run_shell(register, script.as_bytes(), &mut output).await.unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_parse_edits_use_zero_based_lines() {
        assert_eq!(
            parse("qty 2 3").unwrap(),
            Command::Edit {
                line: 1,
                field: "qty",
                value: "3".to_string()
            }
        );
        assert_eq!(parse("RM 1").unwrap(), Command::Remove(0));
        assert!(parse("rm 0").is_err());
        assert!(parse("price 1").is_err());
        assert_eq!(parse("   ").unwrap(), Command::Empty);
    }

    #[test]
    fn test_parse_stock_in() {
        let batch = match parse("stock-in oil:12@150 soap:6 supplier=Metro").unwrap() {
            Command::StockIn(batch) => batch,
            other => panic!("expected stock-in, got {:?}", other),
        };

        assert_eq!(batch.rows.len(), 2);
        assert_eq!(batch.rows[0].cost_price.as_deref(), Some("150"));
        assert_eq!(batch.rows[1].quantity, "6");
        assert_eq!(batch.supplier.as_deref(), Some("Metro"));

        assert!(parse("stock-in oil").is_err());
    }

    #[test]
    fn test_parse_stock_in_free_text_fields() {
        let line = "stock-in soap:5 supplier=Acme Foods note=late delivery, box 2:3";
        let batch = match parse(line).unwrap() {
            Command::StockIn(batch) => batch,
            other => panic!("expected stock-in, got {:?}", other),
        };

        assert_eq!(batch.rows.len(), 1);
        assert_eq!(batch.supplier.as_deref(), Some("Acme Foods"));
        assert_eq!(batch.note.as_deref(), Some("late delivery, box 2:3"));
    }

    #[test]
    fn test_parse_summary_day() {
        assert_eq!(parse("summary").unwrap(), Command::Summary(None));
        assert_eq!(
            parse("summary 2026-10-18").unwrap(),
            Command::Summary(NaiveDate::from_ymd_opt(2026, 10, 18))
        );
        assert!(parse("summary yesterday").is_err());
    }

    #[tokio::test]
    async fn test_summary_covers_one_day() {
        let (_store, register) = register().await;

        let output = run(&register, "scan oil
pay 200
commit
summary
summary 2000-01-01
").await;

        let today = format!("Sales for {}", Local::now().date_naive());
        let (today_part, old_part) = output.split_at(output.find("Sales for 2000-01-01").unwrap());
        assert!(today_part.contains(&today));
        assert!(today_part.contains("Receipts:   1"));
        assert!(today_part.contains("Margin:"));
        assert!(old_part.contains("Receipts:   0"));
        assert!(old_part.contains("Margin:     0%"));
    }

    #[tokio::test]
    async fn test_sale_session() {
        let (store, register) = register().await;

        let output = run(
            &register,
            "scan oil\nscan soap\nqty 2 2\ndiscount 50\npay 500\ncommit\nquit\nscan oil\n",
        )
        .await;

        assert!(output.contains("Oil 1L"));
        assert!(output.contains("Payable:  Rs 250.00"));
        assert!(output.contains("Committed receipt"));
        assert!(output.contains("Change: Rs 250.00"));
        assert_eq!(store.receipts().await.len(), 1);
        assert!(register.session.with_ledger(|l| l.is_empty()).await);
    }

    #[tokio::test]
    async fn test_errors_do_not_end_session() {
        let (_store, register) = register().await;

        let output = run(&register, "scan nope\nfrobnicate\ncommit\nscan oil\nshow\n").await;

        assert!(output.contains("error [NOT_FOUND]"));
        assert!(output.contains("error [VALIDATION_ERROR]: Unknown command 'frobnicate'"));
        assert!(output.contains("error [VALIDATION_ERROR]: Please add at least one item"));
        assert!(output.contains("Due:      Rs 200.00"));
    }

    #[tokio::test]
    async fn test_stock_in_and_recon() {
        let (store, register) = register().await;

        let output = run(&register, "stock-in oil:5 soap:0\nrecon\nresolve nope\n").await;

        assert!(output.contains("Received 1 rows"));
        assert!(output.contains("No open reconciliation entries"));
        assert!(output.contains("error [NOT_FOUND]"));
        assert_eq!(store.stock_entries().await.len(), 1);
    }
}
