//! # Till Register Library
//!
//! The register application: configuration, state, commands and the
//! line-oriented shell that drives them.
//!
//! ## Module Organization
//! ```text
//! till_register/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── config.rs   ◄─── register.toml + TILL_* overrides
//! │   ├── session.rs  ◄─── Ledger + catalog snapshot
//! │   └── store.rs    ◄─── Store trait objects
//! ├── commands/       ◄─── One module per concern (ledger, checkout, ...)
//! ├── printer.rs      ◄─── Text receipts
//! ├── shell.rs        ◄─── Line parser and dispatcher
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod printer;
pub mod shell;
pub mod state;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use till_commit::TransactionCommitter;
use till_core::Catalog;
use till_db::{Database, DbConfig};

use error::{ApiError, ErrorCode};
use printer::TextReceiptPrinter;
use shell::{run_shell, Register};
use state::{RegisterConfig, SessionState, StoreState};

const USAGE: &str = "\
Usage: till-register [OPTIONS]

Options:
  -c, --config <PATH>  Config file (default: platform config dir)
  -d, --db <PATH>      SQLite database file (overrides config)
  -h, --help           Show this help";

/// Parsed command-line options.
#[derive(Debug, Default, PartialEq)]
pub struct CliArgs {
    pub config: Option<PathBuf>,
    pub database: Option<PathBuf>,
    pub help: bool,
}

/// Parses arguments (without the program name).
pub fn parse_args(args: &[String]) -> Result<CliArgs, ApiError> {
    let mut cli = CliArgs::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let value = iter
                    .next()
                    .ok_or_else(|| ApiError::validation(format!("{} needs a path", arg)))?;
                cli.config = Some(PathBuf::from(value));
            }
            "--db" | "-d" => {
                let value = iter
                    .next()
                    .ok_or_else(|| ApiError::validation(format!("{} needs a path", arg)))?;
                cli.database = Some(PathBuf::from(value));
            }
            "--help" | "-h" => cli.help = true,
            other => {
                return Err(ApiError::validation(format!("Unknown argument: {}", other)));
            }
        }
    }

    Ok(cli)
}

/// Runs the register against stdin/stdout.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Register Startup                                  │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │     • Default: INFO, can be overridden with RUST_LOG                    │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults ◄── register.toml ◄── TILL_* environment                 │
/// │                                                                         │
/// │  3. Connect to Database ──────────────────────────────────────────────► │
/// │     • SQLite with WAL mode                                              │
/// │     • Run pending migrations                                            │
/// │                                                                         │
/// │  4. Initialize State Objects ─────────────────────────────────────────► │
/// │     • StoreState: trait objects over the database                       │
/// │     • SessionState: empty ledger + loaded catalog                       │
/// │     • TransactionCommitter: receipts, inventory, reconciliation         │
/// │                                                                         │
/// │  5. Run the Shell ────────────────────────────────────────────────────► │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> Result<(), ApiError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = parse_args(&args)?;
    if cli.help {
        println!("{}", USAGE);
        return Ok(());
    }

    init_tracing();
    info!("Starting Till register");

    let mut config = RegisterConfig::load(cli.config.as_deref())?;
    if let Some(path) = cli.database {
        config.database_path = Some(path);
    }

    let db = open_database(&config.resolve_database_path()?).await?;

    let register = build_register(config, StoreState::from_database(db.clone())).await?;
    if register.session.with_catalog(|c| c.is_empty()).await {
        warn!(shop_id = %register.config.shop_id, "Catalog is empty; run the seed binary to load demo items");
    }

    let stdin = BufReader::new(tokio::io::stdin());
    run_shell(&register, stdin, tokio::io::stdout())
        .await
        .map_err(|e| ApiError::internal(format!("Shell I/O failed: {}", e)))?;

    db.close().await;
    info!("Register closed");
    Ok(())
}

/// Creates the parent directory, connects, migrates and checks the
/// database answers queries.
pub async fn open_database(path: &Path) -> Result<Database, ApiError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ApiError::internal(format!("Cannot create {}: {}", parent.display(), e)))?;
    }

    let db = Database::new(DbConfig::new(path)).await?;
    if !db.health_check().await {
        db.close().await;
        return Err(ApiError::new(
            ErrorCode::DatabaseError,
            format!("Database at {} is not answering queries", path.display()),
        ));
    }

    info!(path = %path.display(), "Database ready");
    Ok(db)
}

/// Loads the catalog and wires the committer for a configured register.
pub async fn build_register(config: RegisterConfig, stores: StoreState) -> Result<Register, ApiError> {
    let items = stores.catalog.load_catalog(&config.shop_id).await?;
    let session = SessionState::new(Catalog::new(items));

    let mut committer = TransactionCommitter::new(
        config.shop_context(),
        Arc::clone(&stores.receipts),
        Arc::clone(&stores.inventory),
    )
    .with_reconciliation_log(Arc::clone(&stores.reconciliation));

    if config.auto_print {
        committer = committer.with_printer(Arc::new(TextReceiptPrinter::from_config(&config)));
    }

    Ok(Register {
        config,
        session,
        stores,
        committer,
    })
}

/// Initializes the tracing subscriber for logging.
///
/// Logs go to stderr so they never interleave with shell replies.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,till=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
