//! # Ledger Commands
//!
//! Commands that build up the sale being rung.
//!
//! ## Ledger Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Ledger Lifecycle                                     │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│  Lines   │────►│ Tendered │────►│ Committed│       │
//! │  │  Ledger  │     │          │     │          │     │ (reset)  │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                 │                              │
//! │                   scan_item         commit_sale                        │
//! │                   select_item       (checkout.rs)                      │
//! │                   edit_line                                             │
//! │                   remove_line                                           │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_ledger ────────────────────►                   │
//! │                                                      (back to empty)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Line indexes here are zero-based; the shell shows them one-based.

use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use till_core::{Ledger, LineField, LineItem, PaymentMethod, StaffMember, Totals};

use crate::error::ApiError;
use crate::state::{SessionState, StoreState};

/// Ledger response including lines and totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerResponse {
    pub transaction_id: String,
    pub customer: String,
    pub staff: Option<StaffMember>,
    pub payment_method: PaymentMethod,
    pub lines: Vec<LineItem>,
    pub totals: Totals,
}

impl From<&Ledger> for LedgerResponse {
    fn from(ledger: &Ledger) -> Self {
        LedgerResponse {
            transaction_id: ledger.transaction_id().to_string(),
            customer: ledger.customer().to_string(),
            staff: ledger.staff().cloned(),
            payment_method: ledger.payment_method(),
            lines: ledger.lines().to_vec(),
            totals: ledger.compute_totals(),
        }
    }
}

pub async fn get_ledger(session: &SessionState) -> LedgerResponse {
    session.with_ledger(|l| LedgerResponse::from(l)).await
}

/// Adds the item with this scan code, or bumps its quantity.
pub async fn scan_item(session: &SessionState, code: &str) -> Result<LedgerResponse, ApiError> {
    debug!(code = %code, "scan_item command");
    session
        .with_ledger_and_catalog(|ledger, catalog| {
            ledger.scan(code, catalog)?;
            Ok::<LedgerResponse, ApiError>(LedgerResponse::from(&*ledger))
        })
        .await
}

/// Adds the item with this exact display name, or bumps its quantity.
pub async fn select_item(session: &SessionState, name: &str) -> Result<LedgerResponse, ApiError> {
    debug!(name = %name, "select_item command");
    session
        .with_ledger_and_catalog(|ledger, catalog| {
            ledger.select(name, catalog)?;
            Ok::<LedgerResponse, ApiError>(LedgerResponse::from(&*ledger))
        })
        .await
}

/// Edits one field of a line.
///
/// ## Arguments
/// * `field` - `price`, `qty` or `tax`
/// * `value` - free-form text; unparsable input becomes 0
pub async fn edit_line(
    session: &SessionState,
    index: usize,
    field: &str,
    value: &str,
) -> Result<LedgerResponse, ApiError> {
    debug!(index, field = %field, value = %value, "edit_line command");
    let field = LineField::from_str(field)?;

    session
        .with_ledger_mut(|ledger| {
            ledger.edit_line(index, field, value)?;
            Ok::<LedgerResponse, ApiError>(LedgerResponse::from(&*ledger))
        })
        .await
}

pub async fn remove_line(session: &SessionState, index: usize) -> Result<LedgerResponse, ApiError> {
    debug!(index, "remove_line command");
    session
        .with_ledger_mut(|ledger| {
            ledger.remove_line(index)?;
            Ok::<LedgerResponse, ApiError>(LedgerResponse::from(&*ledger))
        })
        .await
}

pub async fn set_discount(session: &SessionState, input: &str) -> LedgerResponse {
    session
        .with_ledger_mut(|ledger| {
            ledger.set_discount_input(input);
            LedgerResponse::from(&*ledger)
        })
        .await
}

pub async fn set_tax(session: &SessionState, input: &str) -> LedgerResponse {
    session
        .with_ledger_mut(|ledger| {
            ledger.set_tax_input(input);
            LedgerResponse::from(&*ledger)
        })
        .await
}

pub async fn set_tendered(session: &SessionState, input: &str) -> LedgerResponse {
    session
        .with_ledger_mut(|ledger| {
            ledger.set_tendered_input(input);
            LedgerResponse::from(&*ledger)
        })
        .await
}

/// Sets the customer label. Blank restores "Walk-in Customer".
pub async fn set_customer(session: &SessionState, customer: &str) -> LedgerResponse {
    session
        .with_ledger_mut(|ledger| {
            ledger.set_customer(customer);
            LedgerResponse::from(&*ledger)
        })
        .await
}

pub async fn set_payment_method(
    session: &SessionState,
    method: &str,
) -> Result<LedgerResponse, ApiError> {
    let method = PaymentMethod::from_str(method)?;
    Ok(session
        .with_ledger_mut(|ledger| {
            ledger.set_payment_method(method);
            LedgerResponse::from(&*ledger)
        })
        .await)
}

/// Attributes the sale to a staff member, matched by name ignoring case.
/// A blank name clears the attribution.
pub async fn set_staff(
    session: &SessionState,
    stores: &StoreState,
    shop_id: &str,
    name: &str,
) -> Result<LedgerResponse, ApiError> {
    let name = name.trim();
    let staff = if name.is_empty() {
        None
    } else {
        let members = stores.staff.list_staff(shop_id).await?;
        let member = members
            .into_iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ApiError::not_found("Staff member", name))?;
        Some(member)
    };

    Ok(session
        .with_ledger_mut(|ledger| {
            ledger.set_staff(staff);
            LedgerResponse::from(&*ledger)
        })
        .await)
}

/// Drops every line and starts a new transaction id.
pub async fn clear_ledger(session: &SessionState) -> LedgerResponse {
    debug!("clear_ledger command");
    session
        .with_ledger_mut(|ledger| {
            ledger.reset();
            LedgerResponse::from(&*ledger)
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use rust_decimal_macros::dec;
    use till_commit::memory::{test_item, MemoryStore};
    use till_core::{Catalog, Money};

    use crate::error::ErrorCode;

    fn session() -> SessionState {
        SessionState::new(Catalog::new(vec![
            test_item("oil", "Oil 1L", 200, 10),
            test_item("soap", "Soap", 50, 20),
        ]))
    }

    #[tokio::test]
    async fn test_scan_select_and_edit() {
        let session = session();

        scan_item(&session, "oil").await.unwrap();
        select_item(&session, "Soap").await.unwrap();
        scan_item(&session, "SOAP").await.unwrap();
        edit_line(&session, 0, "qty", "2").await.unwrap();
        let response = set_discount(&session, "50").await;

        assert_eq!(response.lines.len(), 2);
        assert_eq!(response.lines[1].quantity(), dec!(2));
        assert_eq!(response.totals.total_amount, Money::from_major(500));
        assert_eq!(response.totals.payable, Money::from_major(450));
    }

    #[tokio::test]
    async fn test_unknown_code_is_not_found() {
        let session = session();
        let err = scan_item(&session, "nope").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(get_ledger(&session).await.lines.is_empty());
    }

    #[tokio::test]
    async fn test_bad_field_and_index() {
        let session = session();
        scan_item(&session, "oil").await.unwrap();

        let err = edit_line(&session, 0, "colour", "red").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = remove_line(&session, 5).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_staff_lookup_ignores_case() {
        let session = session();
        let store = Arc::new(MemoryStore::new());
        store
            .add_staff(StaffMember {
                id: "e1".to_string(),
                name: "Bilal".to_string(),
            })
            .await;
        let stores = StoreState::shared(store);

        let response = set_staff(&session, &stores, "shop-1", "bilal").await.unwrap();
        assert_eq!(response.staff.map(|s| s.id), Some("e1".to_string()));

        let err = set_staff(&session, &stores, "shop-1", "Zara").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let response = set_staff(&session, &stores, "shop-1", " ").await.unwrap();
        assert!(response.staff.is_none());
    }

    #[tokio::test]
    async fn test_clear_starts_new_transaction() {
        let session = session();
        let before = scan_item(&session, "oil").await.unwrap().transaction_id;

        let after = clear_ledger(&session).await;

        assert!(after.lines.is_empty());
        assert_ne!(after.transaction_id, before);
    }
}
