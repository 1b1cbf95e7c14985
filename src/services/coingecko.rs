use std::time::Duration;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::quote::extract_price;
use crate::services::price_source::PriceSource;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Simple-price quote client. The response is keyed by asset id, then currency.
#[derive(Clone)]
pub struct CoinGeckoClient {
    client: reqwest::Client,
    url: String,
    asset: String,
    currency: String,
}

impl CoinGeckoClient {
    pub fn new(url: &str, asset: &str, currency: &str) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| AppError::Config(format!("failed to build price client: {err}")))?;

        Ok(Self {
            client,
            url: url.to_string(),
            asset: asset.to_string(),
            currency: currency.to_string(),
        })
    }
}

#[async_trait]
impl PriceSource for CoinGeckoClient {
    async fn fetch(&self) -> Result<f64, AppError> {
        let body = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;

        let price = extract_price(&body, &self.asset, &self.currency)?;
        tracing::debug!("Fetched {}/{} price {}", self.asset, self.currency, price);
        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::serve_once;

    #[tokio::test]
    async fn fetches_price_keyed_by_asset_then_currency() {
        let (url, request) = serve_once(200, r#"{"bitcoin":{"usd":64123.5}}"#).await;
        let client = CoinGeckoClient::new(
            &format!("{url}/api/v3/simple/price?ids=bitcoin&vs_currencies=usd"),
            "bitcoin",
            "usd",
        )
        .unwrap();

        let price = client.fetch().await.unwrap();

        assert_eq!(price, 64_123.5);
        let request = request.await.unwrap();
        assert!(request.starts_with("GET /api/v3/simple/price?ids=bitcoin&vs_currencies=usd "));
    }

    #[tokio::test]
    async fn server_error_is_fetch_error() {
        let (url, _request) = serve_once(500, r#"{"error":"internal"}"#).await;
        let client = CoinGeckoClient::new(&url, "bitcoin", "usd").unwrap();

        let result = client.fetch().await;

        assert!(matches!(result, Err(AppError::Fetch(_))));
    }

    #[tokio::test]
    async fn unexpected_body_is_fetch_error() {
        let (url, _request) = serve_once(200, r#"{"ethereum":{"usd":3000}}"#).await;
        let client = CoinGeckoClient::new(&url, "bitcoin", "usd").unwrap();

        let result = client.fetch().await;

        assert!(matches!(result, Err(AppError::Fetch(_))));
    }
}
