use std::collections::HashMap;
use std::path::PathBuf;

use validator::Validate;

use crate::cli::Cli;
use crate::errors::AppError;

pub const DEFAULT_ASSET: &str = "bitcoin";
pub const DEFAULT_CURRENCY: &str = "usd";
pub const DEFAULT_DROP_PERCENT: f64 = 5.0;
pub const DEFAULT_RISE_PERCENT: f64 = 5.0;
pub const DEFAULT_STATE_FILE: &str = ".btc_state.json";

const PRICE_API_BASE: &str = "https://api.coingecko.com/api/v3/simple/price";

/// Alert thresholds in percent. Zero disables a direction.
#[derive(Debug, Clone, Copy, PartialEq, Validate)]
pub struct ThresholdConfig {
    #[validate(range(min = 0.0))]
    pub drop_percent: f64,
    #[validate(range(min = 0.0))]
    pub rise_percent: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            drop_percent: DEFAULT_DROP_PERCENT,
            rise_percent: DEFAULT_RISE_PERCENT,
        }
    }
}

/// Manual watermark adjustments for a single invocation
#[derive(Debug, Clone, Copy, Default, PartialEq, Validate)]
pub struct Overrides {
    #[validate(range(min = 0.0))]
    pub set_high: Option<f64>,
    #[validate(range(min = 0.0))]
    pub set_low: Option<f64>,
    /// Clears both watermarks before overrides are applied
    pub reset: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushoverCredentials {
    pub app_token: String,
    pub user_key: String,
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone, Validate)]
pub struct AppConfig {
    #[validate(length(min = 1))]
    pub asset: String,
    #[validate(length(min = 1))]
    pub currency: String,
    #[validate(length(min = 1))]
    pub price_api_url: String,
    #[validate(nested)]
    pub thresholds: ThresholdConfig,
    #[validate(nested)]
    pub overrides: Overrides,
    /// Synthetic price that bypasses the live quote
    pub injected_price: Option<f64>,
    pub pushover: Option<PushoverCredentials>,
    pub state_file: PathBuf,
}

impl AppConfig {
    /// Merge command-line values over configuration entries. CLI wins.
    pub fn resolve(cli: &Cli, entries: &HashMap<String, String>) -> Result<Self, AppError> {
        let asset = entry(entries, "ASSET").unwrap_or(DEFAULT_ASSET).to_string();
        let currency = entry(entries, "CURRENCY")
            .unwrap_or(DEFAULT_CURRENCY)
            .to_string();
        let price_api_url = entry(entries, "PRICE_API_URL")
            .map(str::to_string)
            .unwrap_or_else(|| default_price_url(&asset, &currency));

        let thresholds = ThresholdConfig {
            drop_percent: number_entry(entries, "DROP_THRESHOLD_PERCENT")?
                .unwrap_or(DEFAULT_DROP_PERCENT),
            rise_percent: number_entry(entries, "RISE_THRESHOLD_PERCENT")?
                .unwrap_or(DEFAULT_RISE_PERCENT),
        };

        let overrides = Overrides {
            set_high: match cli.set_high {
                Some(value) => Some(value),
                None => number_entry(entries, "SET_HIGH")?,
            },
            set_low: match cli.set_low {
                Some(value) => Some(value),
                None => number_entry(entries, "SET_LOW")?,
            },
            reset: cli.reset || entry(entries, "RESET_STATE").is_some_and(is_truthy),
        };

        let pushover = match (
            entry(entries, "PUSHOVER_APP_TOKEN"),
            entry(entries, "PUSHOVER_USER_KEY"),
        ) {
            (Some(app_token), Some(user_key)) => Some(PushoverCredentials {
                app_token: app_token.to_string(),
                user_key: user_key.to_string(),
            }),
            _ => None,
        };

        let state_file = cli
            .state_file
            .clone()
            .or_else(|| entry(entries, "STATE_FILE").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE));

        let config = Self {
            asset,
            currency,
            price_api_url,
            thresholds,
            overrides,
            injected_price: cli.price,
            pushover,
            state_file,
        };

        config
            .validate()
            .map_err(|err| AppError::Config(err.to_string()))?;

        // Zero would collapse both watermarks.
        if let Some(price) = config.injected_price {
            if price <= 0.0 {
                return Err(AppError::Config(format!(
                    "injected price must be positive, got {price}"
                )));
            }
        }

        Ok(config)
    }

    /// Ticker-style label used in alert text.
    pub fn symbol(&self) -> String {
        match self.asset.as_str() {
            "bitcoin" => "BTC".to_string(),
            other => other.to_uppercase(),
        }
    }

    pub fn alert_title(&self) -> String {
        format!("{} Trailing Alert", self.symbol())
    }
}

/// Snapshot of the process environment as configuration entries.
pub fn env_entries() -> HashMap<String, String> {
    std::env::vars().collect()
}

fn default_price_url(asset: &str, currency: &str) -> String {
    format!("{PRICE_API_BASE}?ids={asset}&vs_currencies={currency}")
}

// Blank values count as unset.
fn entry<'a>(entries: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    entries
        .get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

fn number_entry(entries: &HashMap<String, String>, key: &str) -> Result<Option<f64>, AppError> {
    let Some(raw) = entry(entries, key) else {
        return Ok(None);
    };
    let value: f64 = raw
        .parse()
        .map_err(|_| AppError::Config(format!("{key} must be a number, got '{raw}'")))?;
    if !value.is_finite() {
        return Err(AppError::Config(format!("{key} must be finite, got '{raw}'")));
    }
    Ok(Some(value))
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}
