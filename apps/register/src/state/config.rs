//! # Register Configuration
//!
//! Stores register configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`TILL_*`)
//! 2. Config file (`register.toml`, or the path given with `--config`)
//! 3. Defaults (this file)
//!
//! The merged result is checked by [`RegisterConfig::validate`] before the
//! register opens.
//!
//! ## Example `register.toml`
//! ```toml
//! shop_id = "shop-gulberg"
//! cashier_name = "Bilal"
//! auto_print = true
//! receipt_dir = "/var/spool/till"
//!
//! [shop]
//! name = "Corner Store"
//! address = "12 Mall Road"
//! phone_numbers = ["0300-1234567"]
//! receipt_description = "No returns after 7 days"
//! ```
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use till_core::{
    Money, ShopContext, ShopProfile, DEFAULT_CASHIER_NAME, DEFAULT_MANAGER_NAME, DEFAULT_SHOP_ID,
};

/// File name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "register.toml";

const DATABASE_FILE_NAME: &str = "till.db";
const MAX_CURRENCY_SYMBOL_LEN: usize = 8;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: '{value}'")]
    InvalidEnv { key: String, value: String },

    #[error("Invalid configuration: {field} {reason}")]
    Invalid { field: String, reason: String },

    #[error("Could not determine app data directory")]
    NoDataDir,
}

/// Register configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterConfig {
    /// Shop this register sells for.
    /// Default: "shop-default"
    pub shop_id: String,

    /// Shop identity printed on every receipt.
    pub shop: ShopSection,

    pub cashier_name: String,
    pub manager_name: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// SQLite file. `None` uses the platform data directory.
    pub database_path: Option<PathBuf>,

    /// Print every committed receipt.
    pub auto_print: bool,

    /// Where printed receipts are written. `None` prints to stdout.
    pub receipt_dir: Option<PathBuf>,
}

impl Default for RegisterConfig {
    /// Returns default configuration suitable for development.
    fn default() -> Self {
        RegisterConfig {
            shop_id: DEFAULT_SHOP_ID.to_string(),
            shop: ShopSection::default(),
            cashier_name: DEFAULT_CASHIER_NAME.to_string(),
            manager_name: DEFAULT_MANAGER_NAME.to_string(),
            currency_symbol: "Rs ".to_string(),
            database_path: None,
            auto_print: false,
            receipt_dir: None,
        }
    }
}

/// The `[shop]` table. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopSection {
    pub name: String,
    pub address: String,
    pub phone_numbers: Vec<String>,
    pub logo_url: Option<String>,
    pub receipt_description: Option<String>,
}

impl Default for ShopSection {
    fn default() -> Self {
        ShopSection {
            name: "Till Dev Store".to_string(),
            address: "1 Market Street".to_string(),
            phone_numbers: Vec::new(),
            logo_url: None,
            receipt_description: None,
        }
    }
}

impl ShopSection {
    pub fn profile(&self) -> ShopProfile {
        ShopProfile {
            name: self.name.clone(),
            address: self.address.clone(),
            phone_numbers: self.phone_numbers.clone(),
            logo_url: self.logo_url.clone(),
            receipt_description: self.receipt_description.clone(),
        }
    }
}

impl RegisterConfig {
    /// Loads defaults, then the config file, then `TILL_*` overrides, and
    /// validates the result.
    ///
    /// An explicit `path` must exist. Without one, `register.toml` in the
    /// platform config directory is read if present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    debug!("No config file, using defaults");
                    RegisterConfig::default()
                }
            },
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;

        info!(shop_id = %config.shop_id, shop = %config.shop.name, "Configuration loaded");
        Ok(config)
    }

    /// Reads a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Read config file");
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Applies `TILL_*` overrides from `lookup`.
    ///
    /// ## Environment Variables
    /// - `TILL_SHOP_ID`, `TILL_SHOP_NAME`, `TILL_SHOP_ADDRESS`
    /// - `TILL_SHOP_PHONES`: comma separated
    /// - `TILL_CASHIER_NAME`, `TILL_MANAGER_NAME`
    /// - `TILL_CURRENCY_SYMBOL`
    /// - `TILL_DB_PATH`, `TILL_RECEIPT_DIR`
    /// - `TILL_AUTO_PRINT`: true/false/1/0/yes/no
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("TILL_SHOP_ID") {
            self.shop_id = v;
        }
        if let Some(v) = lookup("TILL_SHOP_NAME") {
            self.shop.name = v;
        }
        if let Some(v) = lookup("TILL_SHOP_ADDRESS") {
            self.shop.address = v;
        }
        if let Some(v) = lookup("TILL_SHOP_PHONES") {
            self.shop.phone_numbers = v
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(v) = lookup("TILL_CASHIER_NAME") {
            self.cashier_name = v;
        }
        if let Some(v) = lookup("TILL_MANAGER_NAME") {
            self.manager_name = v;
        }
        if let Some(v) = lookup("TILL_CURRENCY_SYMBOL") {
            self.currency_symbol = v;
        }
        if let Some(v) = lookup("TILL_DB_PATH") {
            self.database_path = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("TILL_RECEIPT_DIR") {
            self.receipt_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("TILL_AUTO_PRINT") {
            self.auto_print = parse_flag(&v).ok_or(ConfigError::InvalidEnv {
                key: "TILL_AUTO_PRINT".to_string(),
                value: v,
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require("shop_id", &self.shop_id)?;
        require("shop.name", &self.shop.name)?;
        require("cashier_name", &self.cashier_name)?;
        require("manager_name", &self.manager_name)?;

        if self.currency_symbol.chars().count() > MAX_CURRENCY_SYMBOL_LEN {
            return Err(ConfigError::Invalid {
                field: "currency_symbol".to_string(),
                reason: format!("must be at most {} characters", MAX_CURRENCY_SYMBOL_LEN),
            });
        }
        Ok(())
    }

    /// The context handed to the committer.
    pub fn shop_context(&self) -> ShopContext {
        ShopContext {
            shop_id: self.shop_id.clone(),
            profile: self.shop.profile(),
            cashier_name: self.cashier_name.clone(),
            manager_name: self.manager_name.clone(),
        }
    }

    /// The configured database path, or `till.db` in the platform data directory.
    pub fn resolve_database_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }
        let dirs = project_dirs().ok_or(ConfigError::NoDataDir)?;
        Ok(dirs.data_dir().join(DATABASE_FILE_NAME))
    }

    /// Formats an amount with the currency symbol, rounded to 2 places.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = RegisterConfig::default();
    /// assert_eq!(config.format_currency(Money::from_minor(123456)), "Rs 1234.56");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        if amount.is_negative() {
            format!("-{}{}", self.currency_symbol, amount.abs())
        } else {
            format!("{}{}", self.currency_symbol, amount)
        }
    }
}

/// `register.toml` in the platform config directory.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "till", "register")
}

fn require(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid {
            field: field.to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = RegisterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.shop_id, DEFAULT_SHOP_ID);
        assert!(!config.auto_print);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RegisterConfig::from_toml(
            r#"
            cashier_name = "Bilal"
            auto_print = true

            [shop]
            name = "Corner Store"
            phone_numbers = ["0300-1", "0300-2"]
            "#,
        )
        .unwrap();

        assert_eq!(config.cashier_name, "Bilal");
        assert!(config.auto_print);
        assert_eq!(config.shop.profile().phone_line(), "0300-1, 0300-2");
        assert_eq!(config.shop.receipt_description, None);
        assert_eq!(config.manager_name, DEFAULT_MANAGER_NAME);
        assert_eq!(config.shop_id, DEFAULT_SHOP_ID);
        assert_eq!(config.shop.address, "1 Market Street");
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = RegisterConfig::from_toml(r#"shop_id = "from-file""#).unwrap();
        config
            .apply_env(env(&[
                ("TILL_SHOP_ID", "from-env"),
                ("TILL_SHOP_PHONES", "0300-1, ,0300-2"),
                ("TILL_AUTO_PRINT", "yes"),
                ("TILL_DB_PATH", "/tmp/till.db"),
            ]))
            .unwrap();

        assert_eq!(config.shop_id, "from-env");
        assert_eq!(config.shop.phone_numbers, vec!["0300-1", "0300-2"]);
        assert!(config.auto_print);
        assert_eq!(
            config.resolve_database_path().unwrap(),
            PathBuf::from("/tmp/till.db")
        );
    }

    #[test]
    fn test_bad_flag_is_rejected() {
        let mut config = RegisterConfig::default();
        let err = config
            .apply_env(env(&[("TILL_AUTO_PRINT", "sometimes")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { .. }));
    }

    #[test]
    fn test_validate_rejects_blank_names() {
        let mut config = RegisterConfig::default();
        config.cashier_name = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field, .. }) if field == "cashier_name"
        ));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = RegisterConfig::load(Some(Path::new("/nonexistent/register.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_format_currency() {
        let config = RegisterConfig::default();
        assert_eq!(config.format_currency(Money::from_minor(123456)), "Rs 1234.56");
        assert_eq!(config.format_currency(Money::zero()), "Rs 0.00");
        assert_eq!(config.format_currency(Money::from_minor(-1050)), "-Rs 10.50");
    }

    #[test]
    fn test_shop_context() {
        let config = RegisterConfig::default();
        let context = config.shop_context();
        assert_eq!(context.shop_id, config.shop_id);
        assert_eq!(context.profile.name, "Till Dev Store");
    }
}
