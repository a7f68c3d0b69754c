//! # Billing Configuration
//!
//! Store identity, tax policy, retry budget and receipt layout.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     FOLIO_TAX_RATE_BPS=500                                             │
//! │     FOLIO_APPLY_TAX=false                                              │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/billing/billing.toml (Linux)                             │
//! │     ~/Library/Application Support/com.folio.billing/billing.toml       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     5% tax applied, INV prefix, cash, 3 read attempts                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # billing.toml
//! [store]
//! name = "Pahana Edu Bookshop"
//! currency_symbol = "Rs."
//!
//! [billing]
//! tax_rate_bps = 500
//! apply_tax = true
//! invoice_prefix = "INV"
//! payment_method = "CASH"
//!
//! [retry]
//! max_attempts = 3
//! initial_backoff_ms = 1000
//! multiplier = 2.0
//! max_backoff_ms = 10000
//!
//! [receipt]
//! width = 50
//! utc_offset_minutes = 330
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use folio_core::validation::{validate_invoice_prefix, validate_tax_rate_bps};
use folio_core::{Cashier, InvoiceOptions, PaymentMethod, TaxRate, DEFAULT_INVOICE_PREFIX};

use crate::error::{BillingError, BillingResult};
use crate::retry::RetryPolicy;

// =============================================================================
// Store Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Printed in the receipt banner.
    #[serde(default = "default_store_name")]
    pub name: String,

    /// Printed next to the grand total.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_store_name() -> String {
    "Folio Bookshop".to_string()
}

fn default_currency_symbol() -> String {
    "Rs.".to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: default_store_name(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

// =============================================================================
// Billing Settings
// =============================================================================

/// Tax and numbering policy for new invoices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingSettings {
    /// Tax rate in basis points (500 = 5%).
    #[serde(default = "default_tax_rate_bps")]
    pub tax_rate_bps: u32,

    /// Whether tax is levied unless the cashier turns it off.
    #[serde(default = "default_true")]
    pub apply_tax: bool,

    #[serde(default = "default_invoice_prefix")]
    pub invoice_prefix: String,

    #[serde(default)]
    pub payment_method: PaymentMethod,
}

fn default_tax_rate_bps() -> u32 {
    TaxRate::DEFAULT.bps()
}

fn default_true() -> bool {
    true
}

fn default_invoice_prefix() -> String {
    DEFAULT_INVOICE_PREFIX.to_string()
}

impl Default for BillingSettings {
    fn default() -> Self {
        BillingSettings {
            tax_rate_bps: default_tax_rate_bps(),
            apply_tax: true,
            invoice_prefix: default_invoice_prefix(),
            payment_method: PaymentMethod::default(),
        }
    }
}

// =============================================================================
// Retry Settings
// =============================================================================

/// Backoff for idempotent reads (customer and stock lookups).
///
/// Invoice submission never uses these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Total attempts including the first one.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,

    #[serde(default = "default_multiplier")]
    pub multiplier: f64,

    #[serde(default = "default_max_backoff")]
    pub max_backoff_ms: u64,
}

fn default_max_attempts() -> u32 {
    3
}
fn default_initial_backoff() -> u64 {
    1_000
}
fn default_multiplier() -> f64 {
    2.0
}
fn default_max_backoff() -> u64 {
    10_000
}

impl Default for RetrySettings {
    fn default() -> Self {
        RetrySettings {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff(),
            multiplier: default_multiplier(),
            max_backoff_ms: default_max_backoff(),
        }
    }
}

// =============================================================================
// Receipt Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptSettings {
    /// Characters per printed line.
    #[serde(default = "default_receipt_width")]
    pub width: usize,

    /// Offset of the shop's local time from UTC, for the printed date.
    #[serde(default = "default_utc_offset")]
    pub utc_offset_minutes: i32,
}

fn default_receipt_width() -> usize {
    50
}

fn default_utc_offset() -> i32 {
    330
}

/// Narrowest layout that still fits the item table.
pub const MIN_RECEIPT_WIDTH: usize = 40;

impl Default for ReceiptSettings {
    fn default() -> Self {
        ReceiptSettings {
            width: default_receipt_width(),
            utc_offset_minutes: default_utc_offset(),
        }
    }
}

// =============================================================================
// Main Billing Configuration
// =============================================================================

/// Complete billing configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillingConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub billing: BillingSettings,

    #[serde(default)]
    pub retry: RetrySettings,

    #[serde(default)]
    pub receipt: ReceiptSettings,
}

impl BillingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (billing.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> BillingResult<Self> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// [`BillingConfig::load`] with overrides read from `lookup` instead of
    /// the process environment.
    fn load_with(
        config_path: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> BillingResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading billing config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(lookup);
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load billing config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> BillingResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| BillingError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| BillingError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| BillingError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Billing config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> BillingResult<()> {
        if self.store.name.trim().is_empty() {
            return Err(BillingError::InvalidConfig("store.name must not be empty".into()));
        }

        validate_tax_rate_bps(self.billing.tax_rate_bps)
            .map_err(|e| BillingError::InvalidConfig(e.to_string()))?;
        validate_invoice_prefix(&self.billing.invoice_prefix)
            .map_err(|e| BillingError::InvalidConfig(e.to_string()))?;

        if self.retry.max_attempts == 0 {
            return Err(BillingError::InvalidConfig(
                "retry.max_attempts must be at least 1".into(),
            ));
        }
        if self.retry.multiplier.is_nan() || self.retry.multiplier < 1.0 {
            return Err(BillingError::InvalidConfig(format!(
                "retry.multiplier must be at least 1.0, got {}",
                self.retry.multiplier
            )));
        }
        if self.retry.max_backoff_ms < self.retry.initial_backoff_ms {
            return Err(BillingError::InvalidConfig(
                "retry.max_backoff_ms must not be below retry.initial_backoff_ms".into(),
            ));
        }

        if self.receipt.width < MIN_RECEIPT_WIDTH {
            return Err(BillingError::InvalidConfig(format!(
                "receipt.width must be at least {MIN_RECEIPT_WIDTH}, got {}",
                self.receipt.width
            )));
        }
        if self.receipt.utc_offset_minutes.abs() >= 24 * 60 {
            return Err(BillingError::InvalidConfig(format!(
                "receipt.utc_offset_minutes out of range: {}",
                self.receipt.utc_offset_minutes
            )));
        }

        Ok(())
    }

    /// Applies `FOLIO_*` environment variable overrides.
    /// Applies overrides from any key lookup. Unparseable values are ignored
    /// with a warning.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(name) = lookup("FOLIO_STORE_NAME") {
            self.store.name = name;
        }

        if let Some(symbol) = lookup("FOLIO_CURRENCY_SYMBOL") {
            self.store.currency_symbol = symbol;
        }

        if let Some(bps) = lookup("FOLIO_TAX_RATE_BPS") {
            match bps.parse::<u32>() {
                Ok(b) => {
                    debug!(tax_rate_bps = b, "Overriding tax rate from environment");
                    self.billing.tax_rate_bps = b;
                }
                Err(_) => warn!(value = %bps, "Invalid FOLIO_TAX_RATE_BPS in environment"),
            }
        }

        if let Some(apply) = lookup("FOLIO_APPLY_TAX") {
            match apply.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.billing.apply_tax = true,
                "0" | "false" | "no" | "off" => self.billing.apply_tax = false,
                _ => warn!(value = %apply, "Invalid FOLIO_APPLY_TAX in environment"),
            }
        }

        if let Some(prefix) = lookup("FOLIO_INVOICE_PREFIX") {
            debug!(prefix = %prefix, "Overriding invoice prefix from environment");
            self.billing.invoice_prefix = prefix;
        }

        if let Some(method) = lookup("FOLIO_PAYMENT_METHOD") {
            match method.parse() {
                Ok(m) => self.billing.payment_method = m,
                Err(_) => warn!(value = %method, "Unknown payment method in environment"),
            }
        }

        if let Some(attempts) = lookup("FOLIO_RETRY_MAX_ATTEMPTS") {
            if let Ok(n) = attempts.parse::<u32>() {
                self.retry.max_attempts = n;
            }
        }

        if let Some(width) = lookup("FOLIO_RECEIPT_WIDTH") {
            if let Ok(w) = width.parse::<usize>() {
                self.receipt.width = w;
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "folio", "billing")
            .map(|dirs| dirs.config_dir().join("billing.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.billing.tax_rate_bps)
    }

    /// Invoice options carrying the configured policy for `cashier`.
    pub fn invoice_options(&self, cashier: Cashier) -> InvoiceOptions {
        InvoiceOptions {
            apply_tax: self.billing.apply_tax,
            tax_rate: self.tax_rate(),
            number_prefix: self.billing.invoice_prefix.clone(),
            payment_method: self.billing.payment_method,
            cashier,
            notes: None,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry.max_attempts,
            initial_backoff: Duration::from_millis(self.retry.initial_backoff_ms),
            multiplier: self.retry.multiplier,
            max_backoff: Duration::from_millis(self.retry.max_backoff_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = BillingConfig::default();
        assert_eq!(config.billing.tax_rate_bps, 500);
        assert!(config.billing.apply_tax);
        assert_eq!(config.billing.invoice_prefix, "INV");
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.receipt.width, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: BillingConfig = toml::from_str(
            r#"
            [store]
            name = "Pahana Edu Bookshop"

            [billing]
            apply_tax = false
            payment_method = "CARD"
            "#,
        )
        .unwrap();

        assert_eq!(config.store.name, "Pahana Edu Bookshop");
        assert_eq!(config.store.currency_symbol, "Rs.");
        assert!(!config.billing.apply_tax);
        assert_eq!(config.billing.payment_method, PaymentMethod::Card);
        assert_eq!(config.billing.tax_rate_bps, 500);
        assert_eq!(config.retry.initial_backoff_ms, 1_000);
    }

    #[test]
    fn test_config_validation() {
        let mut config = BillingConfig::default();

        config.billing.tax_rate_bps = 10_001;
        assert!(matches!(config.validate(), Err(BillingError::InvalidConfig(_))));

        config.billing.tax_rate_bps = 825;
        config.billing.invoice_prefix = "inv-".to_string();
        assert!(config.validate().is_err());

        config.billing.invoice_prefix = "BK".to_string();
        config.retry.max_attempts = 0;
        assert!(config.validate().is_err());

        config.retry.max_attempts = 1;
        config.receipt.width = 20;
        assert!(config.validate().is_err());

        config.receipt.width = 64;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("FOLIO_TAX_RATE_BPS", "825"),
            ("FOLIO_APPLY_TAX", "off"),
            ("FOLIO_INVOICE_PREFIX", "BK"),
            ("FOLIO_PAYMENT_METHOD", "debit"),
            ("FOLIO_RETRY_MAX_ATTEMPTS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = BillingConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.tax_rate(), TaxRate::from_bps(825));
        assert!(!config.billing.apply_tax);
        assert_eq!(config.billing.invoice_prefix, "BK");
        assert_eq!(config.billing.payment_method, PaymentMethod::Card);
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn test_invoice_options_follow_policy() {
        let mut config = BillingConfig::default();
        config.billing.apply_tax = false;
        config.billing.invoice_prefix = "BK".to_string();

        let options = config.invoice_options(Cashier {
            id: 1,
            name: "Front Desk".to_string(),
        });
        assert!(!options.apply_tax);
        assert_eq!(options.number_prefix, "BK");
        assert_eq!(options.tax_rate.bps(), 500);
    }

    #[test]
    fn test_retry_policy_from_config() {
        let policy = BillingConfig::default().retry_policy();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.initial_backoff, Duration::from_millis(1_000));
        assert_eq!(policy.multiplier, 2.0);
    }

    #[test]
    fn test_toml_roundtrip_sections() {
        let config = BillingConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[store]"));
        assert!(toml_str.contains("[billing]"));
        assert!(toml_str.contains("[retry]"));
        assert!(toml_str.contains("[receipt]"));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("folio-billing-{}.toml", std::process::id()));
        let mut config = BillingConfig::default();
        config.store.name = "Kandy Branch".to_string();
        config.save(Some(path.clone())).unwrap();

        let loaded = BillingConfig::load_with(Some(path.clone()), |_| None).unwrap();
        assert_eq!(loaded.store.name, "Kandy Branch");
        assert_eq!(loaded.billing.tax_rate_bps, config.billing.tax_rate_bps);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_load_applies_lookup_over_file() {
        let file = format!("folio-billing-env-{}.toml", std::process::id());
        let path = std::env::temp_dir().join(file);
        let mut config = BillingConfig::default();
        config.store.name = "Kandy Branch".to_string();
        config.save(Some(path.clone())).unwrap();

        let loaded = BillingConfig::load_with(Some(path.clone()), |key| match key {
            "FOLIO_STORE_NAME" => Some("Galle Branch".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(loaded.store.name, "Galle Branch");

        let _ = std::fs::remove_file(path);
    }
}
