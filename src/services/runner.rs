use crate::business_logic::config::{AppConfig, Overrides, ThresholdConfig};
use crate::business_logic::watermark::compute;
use crate::errors::AppError;
use crate::models::report::{RunReport, StatusReport};
use crate::services::coingecko::CoinGeckoClient;
use crate::services::notifier::{Notifier, PushoverNotifier};
use crate::services::price_source::{FixedPrice, PriceSource};
use crate::services::state_store::{JsonFileStore, StateStore};

/// One invocation: fetch, load, evaluate, persist, notify.
pub struct Runner {
    price_source: Box<dyn PriceSource>,
    store: Box<dyn StateStore>,
    notifier: Box<dyn Notifier>,
    thresholds: ThresholdConfig,
    overrides: Overrides,
    symbol: String,
    currency: String,
}

impl Runner {
    pub fn new(
        config: &AppConfig,
        price_source: Box<dyn PriceSource>,
        store: Box<dyn StateStore>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            price_source,
            store,
            notifier,
            thresholds: config.thresholds,
            overrides: config.overrides,
            symbol: config.symbol(),
            currency: config.currency.clone(),
        }
    }

    /// Wire the production ports. An injected price replaces the live quote.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let price_source: Box<dyn PriceSource> = match config.injected_price {
            Some(price) => {
                tracing::info!("Using injected price {}", price);
                Box::new(FixedPrice(price))
            }
            None => Box::new(CoinGeckoClient::new(
                &config.price_api_url,
                &config.asset,
                &config.currency,
            )?),
        };
        let store = Box::new(JsonFileStore::new(config.state_file.clone()));
        let notifier = Box::new(PushoverNotifier::new(
            config.alert_title(),
            config.pushover.clone(),
        )?);

        Ok(Self::new(config, price_source, store, notifier))
    }

    pub async fn run_once(&self) -> Result<RunReport, AppError> {
        let price = self.price_source.fetch().await?;

        let prior = self
            .store
            .load()
            .map_err(|err| err.with_fetched_price(price))?;

        let evaluation = compute(prior, price, &self.overrides, &self.thresholds);
        tracing::info!(
            "{} at {}: high {} -> {}, low {} -> {}",
            self.symbol,
            price,
            prior.high,
            evaluation.state.high,
            prior.low,
            evaluation.state.low
        );

        self.store.save(&evaluation.state)?;

        // State is already persisted; delivery problems only get logged.
        let mut notify_failures = 0;
        for alert in &evaluation.alerts {
            let message = alert.message(&self.symbol, &self.currency);
            tracing::warn!("ALERT: {}", message);
            match self.notifier.send(&message).await {
                Ok(()) => {}
                Err(err) if !err.is_fatal() => {
                    notify_failures += 1;
                    tracing::error!("Failed to deliver alert '{}': {}", message, err);
                }
                Err(err) => return Err(err),
            }
        }

        Ok(RunReport {
            price,
            state: evaluation.state,
            alerts: evaluation.alerts,
            notify_failures,
        })
    }

    /// Current price against the stored watermarks. Never writes.
    pub async fn status(&self) -> Result<StatusReport, AppError> {
        let price = self.price_source.fetch().await?;
        let state = self
            .store
            .load()
            .map_err(|err| err.with_fetched_price(price))?;

        Ok(StatusReport {
            symbol: self.symbol.clone(),
            price,
            state,
        })
    }
}
