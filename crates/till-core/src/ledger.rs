//! # Line-Item Ledger
//!
//! The working set of sale lines for one in-progress transaction.
//!
//! ## Ledger Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Ledger Operations                                    │
//! │                                                                         │
//! │  Operator Action          Ledger Method            State Change         │
//! │  ───────────────          ─────────────            ────────────         │
//! │                                                                         │
//! │  Scan barcode ───────────► scan() ───────────────► add_or_increment()   │
//! │                                                                         │
//! │  Pick from list ─────────► select() ─────────────► add_or_increment()   │
//! │                                                                         │
//! │  Type price / qty ───────► edit_line() ──────────► line_total recomputed│
//! │                                                                         │
//! │  Click remove ───────────► remove_line() ────────► lines.remove(i)      │
//! │                                                                         │
//! │  Any render ─────────────► compute_totals() ─────► (read only)          │
//! │                                                                         │
//! │  Commit succeeded ───────► reset() ──────────────► empty, new txn id    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Name Matching
//! Lines are deduplicated by product name, case-insensitively: adding
//! "SOAP" when a "Soap" line exists increments that line. Two catalog
//! entries that differ only by case therefore share one line, and the
//! line keeps the identifier of whichever was added first.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{
    CatalogItem, PaymentMethod, ReceiptItem, SaleRecord, ShopContext, StaffMember,
    UnitOfMeasure,
};
use crate::validation::{parse_decimal_lenient, validate_non_negative};

/// Customer label used until the operator types one.
pub const DEFAULT_CUSTOMER: &str = "Walk-in Customer";

// =============================================================================
// Line Item
// =============================================================================

/// One product entry in the ledger.
///
/// ## Invariant
/// `line_total == quantity × sale_price` at all times. The two operands are
/// private and only change through setters that recompute the total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    item_id: String,
    code: Option<String>,
    name: String,
    sale_price: Money,
    quantity: Decimal,
    tax_percent: Decimal,
    cost_price: Money,
    unit: UnitOfMeasure,
    category: String,
    /// On-hand quantity shown next to the line (snapshot, informational).
    in_stock: Decimal,
    line_total: Money,
}

impl LineItem {
    /// Seeds a line from a catalog snapshot with quantity 1.
    pub fn from_catalog(item: &CatalogItem) -> Self {
        let quantity = Decimal::ONE;
        LineItem {
            item_id: item.id.clone(),
            code: item.code.clone(),
            name: item.name.clone(),
            sale_price: item.price,
            quantity,
            tax_percent: Decimal::ZERO,
            cost_price: item.cost_or_zero(),
            unit: item.unit,
            category: item.category.clone(),
            in_stock: item.quantity,
            line_total: item.price.times(quantity),
        }
    }

    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sale_price(&self) -> Money {
        self.sale_price
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn tax_percent(&self) -> Decimal {
        self.tax_percent
    }

    pub fn cost_price(&self) -> Money {
        self.cost_price
    }

    pub fn unit(&self) -> UnitOfMeasure {
        self.unit
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn in_stock(&self) -> Decimal {
        self.in_stock
    }

    pub fn line_total(&self) -> Money {
        self.line_total
    }

    /// Sets the sale price and recomputes the line total.
    pub fn set_sale_price(&mut self, price: Money) {
        self.sale_price = price;
        self.recompute();
    }

    /// Sets the quantity and recomputes the line total.
    pub fn set_quantity(&mut self, quantity: Decimal) {
        self.quantity = quantity;
        self.recompute();
    }

    /// Records the per-line tax percentage. It is kept for display only.
    pub fn set_tax_percent(&mut self, percent: Decimal) {
        self.tax_percent = percent;
    }

    fn increment(&mut self) {
        self.set_quantity(self.quantity + Decimal::ONE);
    }

    fn recompute(&mut self) {
        self.line_total = self.sale_price.times(self.quantity);
    }

    /// Case-insensitive product-name comparison used for deduplication.
    fn matches_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    fn to_receipt_item(&self) -> ReceiptItem {
        ReceiptItem {
            item_id: self.item_id.clone(),
            name: self.name.clone(),
            code: self.code.clone(),
            price: self.sale_price,
            quantity: self.quantity,
            cost_price: self.cost_price,
            unit: self.unit,
            category: self.category.clone(),
        }
    }
}

/// Editable fields of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineField {
    SalePrice,
    Quantity,
    TaxPercent,
}

impl fmt::Display for LineField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LineField::SalePrice => "salePrice",
            LineField::Quantity => "quantity",
            LineField::TaxPercent => "tax",
        };
        f.write_str(label)
    }
}

impl FromStr for LineField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "price" | "saleprice" | "sale_price" => Ok(LineField::SalePrice),
            "qty" | "quantity" => Ok(LineField::Quantity),
            "tax" | "taxpercent" | "tax_percent" => Ok(LineField::TaxPercent),
            other => Err(ValidationError::InvalidFormat {
                field: "field".to_string(),
                reason: format!("unknown line field '{}'", other),
            }),
        }
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Aggregate figures for the current ledger.
///
/// All values are full precision; format with `Display` to get 2 places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub line_count: usize,
    /// Σ quantity.
    pub total_quantities: Decimal,
    /// Σ sale price × quantity.
    pub total_amount: Money,
    pub discount: Money,
    pub tax: Money,
    /// total_amount − discount + tax.
    pub payable: Money,
    pub tendered: Money,
    /// tendered − payable (negative when the customer still owes).
    pub balance: Money,
    /// max(0, balance): cash handed back to the customer.
    pub change_returned: Money,
    /// max(0, −balance): what the customer still owes.
    pub amount_outstanding: Money,
}

// =============================================================================
// Ledger
// =============================================================================

/// The in-progress transaction.
///
/// ## Ownership
/// Owned by exactly one register session. It is never shared between
/// writers, so it carries no locking of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ledger {
    transaction_id: String,
    lines: Vec<LineItem>,
    discount: Money,
    tax: Money,
    tendered: Money,
    customer: String,
    staff: Option<StaffMember>,
    payment_method: PaymentMethod,
    started_at: DateTime<Utc>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Creates an empty ledger with a fresh transaction id.
    pub fn new() -> Self {
        Ledger {
            transaction_id: generate_transaction_id(),
            lines: Vec::new(),
            discount: Money::zero(),
            tax: Money::zero(),
            tendered: Money::zero(),
            customer: DEFAULT_CUSTOMER.to_string(),
            staff: None,
            payment_method: PaymentMethod::Cash,
            started_at: Utc::now(),
        }
    }

    /// Transaction id, fixed for the lifetime of this sale.
    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn discount(&self) -> Money {
        self.discount
    }

    pub fn tax(&self) -> Money {
        self.tax
    }

    pub fn tendered(&self) -> Money {
        self.tendered
    }

    pub fn customer(&self) -> &str {
        &self.customer
    }

    pub fn staff(&self) -> Option<&StaffMember> {
        self.staff.as_ref()
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    // -------------------------------------------------------------------------
    // Line operations
    // -------------------------------------------------------------------------

    /// Adds a catalog item, or bumps the quantity of the line with the same name.
    ///
    /// ## Returns
    /// The index of the line that was created or incremented.
    pub fn add_or_increment(&mut self, item: &CatalogItem) -> usize {
        if let Some(index) = self.lines.iter().position(|l| l.matches_name(&item.name)) {
            self.lines[index].increment();
            return index;
        }

        self.lines.push(LineItem::from_catalog(item));
        self.lines.len() - 1
    }

    /// Resolves a scan code against the catalog and adds the item.
    pub fn scan(&mut self, code: &str, catalog: &Catalog) -> CoreResult<usize> {
        let item = catalog
            .find_by_code(code)
            .ok_or_else(|| CoreError::UnknownCode(code.trim().to_string()))?;
        Ok(self.add_or_increment(item))
    }

    /// Resolves a display name picked from the catalog list and adds the item.
    pub fn select(&mut self, name: &str, catalog: &Catalog) -> CoreResult<usize> {
        if name.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "product".to_string(),
            }
            .into());
        }

        let item = catalog
            .find_by_name(name)
            .ok_or_else(|| CoreError::UnknownProduct(name.to_string()))?;
        Ok(self.add_or_increment(item))
    }

    /// Applies operator input to one field of a line.
    ///
    /// Unparsable input is stored as zero. Price and quantity edits
    /// recompute the line total immediately.
    pub fn edit_line(&mut self, index: usize, field: LineField, value: &str) -> CoreResult<&LineItem> {
        let len = self.lines.len();
        let line = self
            .lines
            .get_mut(index)
            .ok_or(CoreError::LineNotFound { index, len })?;

        let value = parse_decimal_lenient(value);
        match field {
            LineField::SalePrice => line.set_sale_price(Money::new(value)),
            LineField::Quantity => line.set_quantity(value),
            LineField::TaxPercent => line.set_tax_percent(value),
        }

        Ok(line)
    }

    /// Removes a line and returns it.
    pub fn remove_line(&mut self, index: usize) -> CoreResult<LineItem> {
        if index >= self.lines.len() {
            return Err(CoreError::LineNotFound {
                index,
                len: self.lines.len(),
            });
        }
        Ok(self.lines.remove(index))
    }

    // -------------------------------------------------------------------------
    // Transaction-scoped fields
    // -------------------------------------------------------------------------

    pub fn set_discount(&mut self, discount: Money) {
        self.discount = discount;
    }

    /// Sets the flat discount from free-form input (garbage becomes 0).
    pub fn set_discount_input(&mut self, input: &str) {
        self.discount = Money::parse_lenient(input);
    }

    pub fn set_tax(&mut self, tax: Money) {
        self.tax = tax;
    }

    /// Sets the flat tax from free-form input (garbage becomes 0).
    pub fn set_tax_input(&mut self, input: &str) {
        self.tax = Money::parse_lenient(input);
    }

    pub fn set_tendered(&mut self, tendered: Money) {
        self.tendered = tendered;
    }

    /// Sets the amount tendered from free-form input (garbage becomes 0).
    pub fn set_tendered_input(&mut self, input: &str) {
        self.tendered = Money::parse_lenient(input);
    }

    /// Sets the customer label; blank input restores the walk-in default.
    pub fn set_customer(&mut self, customer: &str) {
        let customer = customer.trim();
        self.customer = if customer.is_empty() {
            DEFAULT_CUSTOMER.to_string()
        } else {
            customer.to_string()
        };
    }

    pub fn set_staff(&mut self, staff: Option<StaffMember>) {
        self.staff = staff;
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = method;
    }

    // -------------------------------------------------------------------------
    // Totals & snapshot
    // -------------------------------------------------------------------------

    /// Computes aggregate totals from the current lines.
    ///
    /// `total_amount` is recomputed from price × quantity rather than summed
    /// from stored line totals, so it cannot drift from the lines.
    ///
    /// ## Example
    /// ```text
    /// Oil 1L  200 × 2 = 400
    /// Soap     50 × 3 = 150
    ///                   ───
    /// total_amount      550
    /// − discount         50
    /// + tax               0
    /// payable           500
    /// tendered          600  → balance 100, change 100
    /// ```
    pub fn compute_totals(&self) -> Totals {
        let total_quantities: Decimal = self.lines.iter().map(|l| l.quantity).sum();
        let total_amount: Money = self
            .lines
            .iter()
            .map(|l| l.sale_price.times(l.quantity))
            .sum();

        let payable = total_amount - self.discount + self.tax;
        let balance = self.tendered - payable;

        Totals {
            line_count: self.lines.len(),
            total_quantities,
            total_amount,
            discount: self.discount,
            tax: self.tax,
            payable,
            tendered: self.tendered,
            balance,
            change_returned: balance.non_negative(),
            amount_outstanding: (-balance).non_negative(),
        }
    }

    /// Checks that the ledger may be committed.
    pub fn validate_for_commit(&self) -> Result<(), ValidationError> {
        if self.lines.is_empty() {
            return Err(ValidationError::EmptyLedger);
        }
        validate_non_negative("discount", self.discount)?;
        validate_non_negative("tax", self.tax)?;
        Ok(())
    }

    /// Freezes the ledger into an immutable sale record.
    ///
    /// Items are value copies; the record holds no reference back to the
    /// catalog or to this ledger.
    pub fn to_sale_record(&self, context: &ShopContext, created_at: DateTime<Utc>) -> SaleRecord {
        let totals = self.compute_totals();

        SaleRecord {
            shop_id: context.shop_id.clone(),
            shop: context.profile.clone(),
            transaction_id: self.transaction_id.clone(),
            cashier_name: context.cashier_name.clone(),
            manager_name: context.manager_name.clone(),
            customer: self.customer.clone(),
            items: self.lines.iter().map(LineItem::to_receipt_item).collect(),
            total_amount: totals.total_amount,
            discount: totals.discount,
            tax: totals.tax,
            payable: totals.payable,
            payment_method: self.payment_method,
            cash_given: totals.tendered,
            change: totals.change_returned,
            employee: self.staff.clone(),
            created_at,
        }
    }

    /// Clears everything and starts a new transaction id.
    pub fn reset(&mut self) {
        *self = Ledger::new();
    }
}

/// Generates a transaction id: `TXN-YYYYMMDDHHMMSS-XXXXXX`.
///
/// The date prefix keeps ids sortable on printed receipts; the random
/// suffix keeps two registers from colliding in the same second.
pub fn generate_transaction_id() -> String {
    let now = Utc::now();
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "TXN-{}-{}",
        now.format("%Y%m%d%H%M%S"),
        suffix[..6].to_uppercase()
    )
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::item;
    use crate::types::ShopProfile;
    use rust_decimal_macros::dec;

    fn oil_and_soap() -> Ledger {
        let mut ledger = Ledger::new();
        let oil = item("oil", "Oil 1L", Some("OIL1"), 200);
        let soap = item("soap", "Soap", Some("SOAP"), 50);

        ledger.add_or_increment(&oil);
        ledger.add_or_increment(&oil);
        for _ in 0..3 {
            ledger.add_or_increment(&soap);
        }
        ledger
    }

    fn independent_total(ledger: &Ledger) -> Money {
        ledger
            .lines()
            .iter()
            .fold(Money::zero(), |acc, l| acc + Money::new(l.sale_price().amount() * l.quantity()))
    }

    #[test]
    fn test_add_or_increment_dedups_case_insensitively() {
        let mut ledger = Ledger::new();
        let names = ["Soap", "SOAP", "soap", "Oil 1L", "oil 1l", "Soap"];
        for (i, name) in names.iter().enumerate() {
            ledger.add_or_increment(&item(&i.to_string(), name, None, 10));
        }

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.lines()[0].name(), "Soap");
        assert_eq!(ledger.lines()[0].quantity(), dec!(4));
        assert_eq!(ledger.lines()[1].quantity(), dec!(2));
        // First-added identifier wins
        assert_eq!(ledger.lines()[0].item_id(), "0");
    }

    #[test]
    fn test_new_line_is_seeded_from_catalog() {
        let mut ledger = Ledger::new();
        let mut rice = item("rice", "Rice", None, 180);
        rice.cost_price = Some(Money::from_major(150));
        rice.unit = UnitOfMeasure::Kg;
        rice.category = "Grocery".to_string();

        let index = ledger.add_or_increment(&rice);
        let line = &ledger.lines()[index];

        assert_eq!(line.quantity(), Decimal::ONE);
        assert_eq!(line.sale_price(), Money::from_major(180));
        assert_eq!(line.cost_price(), Money::from_major(150));
        assert_eq!(line.unit(), UnitOfMeasure::Kg);
        assert_eq!(line.category(), "Grocery");
        assert_eq!(line.tax_percent(), Decimal::ZERO);
        assert_eq!(line.line_total(), Money::from_major(180));
    }

    #[test]
    fn test_edit_recomputes_line_total() {
        let mut ledger = oil_and_soap();

        let line = ledger.edit_line(0, LineField::Quantity, "2.5").unwrap();
        assert_eq!(line.line_total(), Money::from_major(500));

        let line = ledger.edit_line(0, LineField::SalePrice, "190").unwrap();
        assert_eq!(line.line_total(), Money::from_major(475));

        let line = ledger.edit_line(0, LineField::TaxPercent, "5").unwrap();
        assert_eq!(line.tax_percent(), dec!(5));
        assert_eq!(line.line_total(), Money::from_major(475));
    }

    #[test]
    fn test_edit_with_garbage_input_is_zero() {
        let mut ledger = oil_and_soap();

        let line = ledger.edit_line(1, LineField::Quantity, "three").unwrap();
        assert_eq!(line.quantity(), Decimal::ZERO);
        assert_eq!(line.line_total(), Money::zero());

        let totals = ledger.compute_totals();
        assert_eq!(totals.total_amount, Money::from_major(400));
        assert_eq!(totals.total_quantities, dec!(2));
    }

    #[test]
    fn test_edit_out_of_bounds_is_reported() {
        let mut ledger = oil_and_soap();
        let err = ledger.edit_line(7, LineField::Quantity, "1").unwrap_err();
        assert_eq!(err, CoreError::LineNotFound { index: 7, len: 2 });
    }

    #[test]
    fn test_remove_out_of_bounds_is_reported() {
        let mut ledger = Ledger::new();
        assert!(matches!(
            ledger.remove_line(0),
            Err(CoreError::LineNotFound { index: 0, len: 0 })
        ));
    }

    #[test]
    fn test_removing_last_line_resets_totals() {
        let mut ledger = oil_and_soap();
        ledger.remove_line(1).unwrap();
        ledger.remove_line(0).unwrap();

        let totals = ledger.compute_totals();
        assert!(ledger.is_empty());
        assert_eq!(totals.total_quantities, Decimal::ZERO);
        assert_eq!(totals.total_amount, Money::zero());
        assert_eq!(totals.line_count, 0);
    }

    #[test]
    fn test_total_amount_never_drifts() {
        let mut ledger = oil_and_soap();
        ledger.add_or_increment(&item("sugar", "Sugar", None, 3));

        ledger.edit_line(0, LineField::SalePrice, "199.99").unwrap();
        ledger.edit_line(2, LineField::Quantity, "0.333").unwrap();
        ledger.remove_line(1).unwrap();
        ledger.edit_line(1, LineField::SalePrice, "1.01").unwrap();
        ledger.add_or_increment(&item("soap", "Soap", None, 50));

        assert_eq!(ledger.compute_totals().total_amount, independent_total(&ledger));
    }

    #[test]
    fn test_scenario_exact_tender() {
        let mut ledger = oil_and_soap();
        ledger.set_discount_input("50");
        ledger.set_tendered_input("500");

        let totals = ledger.compute_totals();
        assert_eq!(totals.total_amount.to_string(), "550.00");
        assert_eq!(totals.payable.to_string(), "500.00");
        assert_eq!(totals.balance.to_string(), "0.00");
        assert_eq!(totals.change_returned.to_string(), "0.00");
        assert_eq!(totals.total_quantities, dec!(5));
    }

    #[test]
    fn test_scenario_over_tender() {
        let mut ledger = oil_and_soap();
        ledger.set_discount(Money::from_major(50));
        ledger.set_tendered(Money::from_major(600));

        let totals = ledger.compute_totals();
        assert_eq!(totals.balance.to_string(), "100.00");
        assert_eq!(totals.change_returned.to_string(), "100.00");
        assert_eq!(totals.amount_outstanding, Money::zero());
    }

    #[test]
    fn test_under_tender_has_no_change() {
        let mut ledger = oil_and_soap();
        ledger.set_tendered(Money::from_major(300));

        let totals = ledger.compute_totals();
        assert_eq!(totals.payable, Money::from_major(550));
        assert_eq!(totals.balance, Money::from_major(-250));
        assert_eq!(totals.change_returned, Money::zero());
        assert_eq!(totals.amount_outstanding, Money::from_major(250));
    }

    #[test]
    fn test_payable_formula_with_defaults_and_tax() {
        let mut ledger = oil_and_soap();
        assert_eq!(ledger.compute_totals().payable, Money::from_major(550));

        ledger.set_tax_input("12.5");
        ledger.set_discount_input("");
        assert_eq!(ledger.compute_totals().payable, Money::new(dec!(562.5)));

        ledger.set_discount_input("garbage");
        assert_eq!(ledger.discount(), Money::zero());
    }

    #[test]
    fn test_zero_priced_lines_are_valid() {
        let mut ledger = Ledger::new();
        ledger.add_or_increment(&item("free", "Promo Pen", None, 0));
        ledger.add_or_increment(&item("soap", "Soap", None, 50));

        let totals = ledger.compute_totals();
        assert_eq!(totals.total_amount, Money::from_major(50));
        assert_eq!(totals.total_quantities, dec!(2));
        assert!(ledger.validate_for_commit().is_ok());
    }

    #[test]
    fn test_full_precision_until_presentation() {
        let mut ledger = Ledger::new();
        for i in 0..3 {
            ledger.add_or_increment(&item(&i.to_string(), &format!("Item {}", i), None, 0));
            ledger
                .edit_line(i, LineField::SalePrice, "0.005")
                .unwrap();
        }

        let totals = ledger.compute_totals();
        assert_eq!(totals.total_amount.amount(), dec!(0.015));
        assert_eq!(totals.total_amount.to_string(), "0.02");
    }

    #[test]
    fn test_scan_and_select() {
        let catalog = Catalog::new(vec![
            item("oil", "Oil 1L", Some("OIL1"), 200),
            item("soap", "Soap", Some("SOAP"), 50),
        ]);
        let mut ledger = Ledger::new();

        assert_eq!(ledger.scan("oil1", &catalog).unwrap(), 0);
        assert_eq!(ledger.select("Soap", &catalog).unwrap(), 1);
        assert_eq!(ledger.scan("SOAP", &catalog).unwrap(), 1);
        assert_eq!(ledger.lines()[1].quantity(), dec!(2));

        assert!(matches!(
            ledger.scan("nope", &catalog),
            Err(CoreError::UnknownCode(_))
        ));
        assert!(matches!(
            ledger.select("Sugar", &catalog),
            Err(CoreError::UnknownProduct(_))
        ));
        assert!(matches!(
            ledger.select(" ", &catalog),
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));
    }

    #[test]
    fn test_validate_for_commit() {
        assert_eq!(
            Ledger::new().validate_for_commit(),
            Err(ValidationError::EmptyLedger)
        );

        let mut ledger = oil_and_soap();
        ledger.set_discount(Money::from_major(-1));
        assert!(matches!(
            ledger.validate_for_commit(),
            Err(ValidationError::Negative { .. })
        ));
    }

    #[test]
    fn test_sale_record_is_a_value_copy() {
        let mut ledger = oil_and_soap();
        ledger.set_discount(Money::from_major(50));
        ledger.set_tendered(Money::from_major(600));
        ledger.set_customer("Ayesha");
        ledger.set_staff(Some(StaffMember {
            id: "e1".to_string(),
            name: "Bilal".to_string(),
        }));

        let context = ShopContext {
            shop_id: "shop-1".to_string(),
            profile: ShopProfile {
                name: "Corner Store".to_string(),
                ..Default::default()
            },
            cashier_name: "Cashier".to_string(),
            manager_name: "Manager".to_string(),
        };
        let record = ledger.to_sale_record(&context, Utc::now());

        ledger.edit_line(0, LineField::SalePrice, "1").unwrap();

        assert_eq!(record.transaction_id, ledger.transaction_id());
        assert_eq!(record.items.len(), 2);
        assert_eq!(record.items[0].price, Money::from_major(200));
        assert_eq!(record.total_amount, Money::from_major(550));
        assert_eq!(record.payable, Money::from_major(500));
        assert_eq!(record.change, Money::from_major(100));
        assert_eq!(record.customer, "Ayesha");
        assert_eq!(record.employee.as_ref().map(|e| e.name.as_str()), Some("Bilal"));
    }

    #[test]
    fn test_transaction_id_is_stable_until_reset() {
        let mut ledger = oil_and_soap();
        let id = ledger.transaction_id().to_string();

        ledger.edit_line(0, LineField::Quantity, "9").unwrap();
        assert_eq!(ledger.transaction_id(), id);

        ledger.reset();
        assert_ne!(ledger.transaction_id(), id);
        assert!(ledger.is_empty());
        assert_eq!(ledger.customer(), DEFAULT_CUSTOMER);
        assert!(ledger.transaction_id().starts_with("TXN-"));
    }

    #[test]
    fn test_line_field_parsing() {
        assert_eq!("qty".parse::<LineField>().unwrap(), LineField::Quantity);
        assert_eq!("salePrice".parse::<LineField>().unwrap(), LineField::SalePrice);
        assert_eq!("tax".parse::<LineField>().unwrap(), LineField::TaxPercent);
        assert!("colour".parse::<LineField>().is_err());
    }
}
