//! # Domain Types
//!
//! Core domain types used throughout Till.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  CatalogItem    │   │   SaleRecord    │   │    Receipt      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  transaction_id │   │  id (store)     │       │
//! │  │  name / code    │──►│  items (copies) │──►│  sale           │       │
//! │  │  price / cost   │   │  totals         │   │                 │       │
//! │  │  quantity, unit │   │  shop snapshot  │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │  ShopContext    │   │   StockEntry    │   │ ReconciliationEntry │   │
//! │  │  shop + staff   │   │  stock-in row   │   │ failed decrement    │   │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Rule
//! Receipt items are value copies taken at commit time. Nothing on a
//! receipt points back at a mutable catalog record, so later price
//! changes never alter historical receipts.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;

/// Category assigned when the catalog has none.
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

// =============================================================================
// Unit of Measure
// =============================================================================

/// How a product is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum UnitOfMeasure {
    /// Discrete pieces.
    #[default]
    Units,
    /// Kilograms (weighed).
    Kg,
    /// Grams (weighed).
    G,
    /// Litres.
    L,
    /// Millilitres.
    Ml,
}

impl UnitOfMeasure {
    /// Returns the storage/display label.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitOfMeasure::Units => "units",
            UnitOfMeasure::Kg => "kg",
            UnitOfMeasure::G => "g",
            UnitOfMeasure::L => "l",
            UnitOfMeasure::Ml => "ml",
        }
    }

    /// True for units sold by weight or volume (fractional quantities expected).
    pub fn is_measured(&self) -> bool {
        !matches!(self, UnitOfMeasure::Units)
    }
}

impl fmt::Display for UnitOfMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitOfMeasure {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "unit" | "units" | "pcs" | "piece" | "pieces" => Ok(UnitOfMeasure::Units),
            "kg" | "kilogram" | "kilograms" => Ok(UnitOfMeasure::Kg),
            "g" | "gram" | "grams" => Ok(UnitOfMeasure::G),
            "l" | "litre" | "litres" | "liter" | "liters" => Ok(UnitOfMeasure::L),
            "ml" | "millilitre" | "millilitres" => Ok(UnitOfMeasure::Ml),
            other => Err(ValidationError::InvalidFormat {
                field: "unit".to_string(),
                reason: format!("unknown unit '{}'", other),
            }),
        }
    }
}

// =============================================================================
// Catalog Item
// =============================================================================

/// A product in the shop's inventory, as read from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Store-assigned identifier.
    pub id: String,

    /// Shop this item belongs to.
    pub shop_id: String,

    /// Display name shown to the cashier and on receipts.
    pub name: String,

    /// Scan code (SKU / barcode).
    pub code: Option<String>,

    /// Unit sale price.
    pub price: Money,

    /// Unit cost price (for profit reporting).
    pub cost_price: Option<Money>,

    /// Current on-hand quantity.
    pub quantity: Decimal,

    /// Unit of measure.
    pub unit: UnitOfMeasure,

    /// Category label.
    pub category: String,
}

impl CatalogItem {
    /// Returns the cost price, or zero when the catalog has none.
    pub fn cost_or_zero(&self) -> Money {
        self.cost_price.unwrap_or_default()
    }
}

// =============================================================================
// Shop Context
// =============================================================================

/// Shop identity printed on every receipt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopProfile {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub phone_numbers: Vec<String>,
    pub logo_url: Option<String>,
    pub receipt_description: Option<String>,
}

impl ShopProfile {
    /// All phone numbers on one line, as printed on receipts.
    pub fn phone_line(&self) -> String {
        self.phone_numbers.join(", ")
    }
}

/// A staff member a sale can be attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub id: String,
    pub name: String,
}

/// Explicit shop/session context handed to the ledger's consumers.
///
/// Replaces any ambient "current user" lookup: whoever builds a committer
/// or a register session passes this in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopContext {
    pub shop_id: String,
    pub profile: ShopProfile,
    pub cashier_name: String,
    pub manager_name: String,
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    #[default]
    Cash,
    /// Card payment on an external terminal.
    Card,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" | "credit" | "debit" => Ok(PaymentMethod::Card),
            other => Err(ValidationError::InvalidFormat {
                field: "payment method".to_string(),
                reason: format!("unknown method '{}'", other),
            }),
        }
    }
}

// =============================================================================
// Receipt
// =============================================================================

/// A sold line, frozen at commit time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptItem {
    /// Catalog identifier the line was sold from (target of the stock decrement).
    pub item_id: String,
    pub name: String,
    pub code: Option<String>,
    pub price: Money,
    pub quantity: Decimal,
    pub cost_price: Money,
    pub unit: UnitOfMeasure,
    pub category: String,
}

impl ReceiptItem {
    /// Line total (price × quantity), full precision.
    pub fn line_total(&self) -> Money {
        self.price.times(self.quantity)
    }

    /// Line cost (cost price × quantity), full precision.
    pub fn line_cost(&self) -> Money {
        self.cost_price.times(self.quantity)
    }
}

/// Everything a committed sale records, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    pub shop_id: String,
    pub shop: ShopProfile,
    pub transaction_id: String,
    pub cashier_name: String,
    pub manager_name: String,
    pub customer: String,
    pub items: Vec<ReceiptItem>,
    /// Σ price × quantity.
    pub total_amount: Money,
    pub discount: Money,
    pub tax: Money,
    /// total_amount − discount + tax.
    pub payable: Money,
    pub payment_method: PaymentMethod,
    pub cash_given: Money,
    /// max(0, cash_given − payable).
    pub change: Money,
    pub employee: Option<StaffMember>,
    pub created_at: DateTime<Utc>,
}

impl SaleRecord {
    /// Total quantity across all items.
    pub fn total_quantity(&self) -> Decimal {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Σ cost price × quantity.
    pub fn cost_of_goods(&self) -> Money {
        self.items.iter().map(ReceiptItem::line_cost).sum()
    }
}

/// A persisted receipt: the sale record plus its store-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub id: String,
    #[serde(flatten)]
    pub sale: SaleRecord,
}

// =============================================================================
// Stock Entry
// =============================================================================

/// A stock-in record (goods received from a supplier).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockEntry {
    pub id: String,
    pub shop_id: String,
    pub item_id: String,
    pub quantity: Decimal,
    pub cost_price: Option<Money>,
    pub supplier: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Reconciliation Entry
// =============================================================================

/// An inventory decrement that failed after its receipt was written.
///
/// The catalog quantity for `item_id` is stale by `quantity` until someone
/// corrects it and marks the entry resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationEntry {
    pub id: String,
    pub receipt_id: String,
    pub item_id: String,
    pub item_name: String,
    pub quantity: Decimal,
    pub reason: String,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Unit Tests
// =============================================================================
