use async_trait::async_trait;

use crate::errors::AppError;

/// Supplies the current price for the configured asset.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch(&self) -> Result<f64, AppError>;
}

/// Injected price that never touches the network.
#[derive(Debug, Clone, Copy)]
pub struct FixedPrice(pub f64);

#[async_trait]
impl PriceSource for FixedPrice {
    async fn fetch(&self) -> Result<f64, AppError> {
        Ok(self.0)
    }
}
