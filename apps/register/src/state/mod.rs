//! # State Module
//!
//! Manages register state.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────┐          │
//! │  │  StoreState  │  │  SessionState    │  │  RegisterConfig  │          │
//! │  │              │  │                  │  │                  │          │
//! │  │  catalog     │  │  Mutex<Ledger>   │  │  shop identity   │          │
//! │  │  receipts    │  │  RwLock<Catalog> │  │  cashier/manager │          │
//! │  │  inventory   │  │                  │  │  printing        │          │
//! │  │  reconcil.   │  │                  │  │                  │          │
//! │  │  staff       │  │                  │  │                  │          │
//! │  └──────────────┘  └──────────────────┘  └──────────────────┘          │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • StoreState: Arc<dyn Trait> handles, each store is Send + Sync       │
//! │  • SessionState: async Mutex / RwLock                                  │
//! │  • RegisterConfig: Read-only after initialization                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod session;
mod store;

pub use config::{default_config_path, ConfigError, RegisterConfig, ShopSection, CONFIG_FILE_NAME};
pub use session::SessionState;
pub use store::StoreState;
