use std::time::Duration;

use async_trait::async_trait;

use crate::business_logic::config::PushoverCredentials;
use crate::errors::AppError;

const PUSHOVER_API_URL: &str = "https://api.pushover.net/1/messages.json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const LOGGED_BODY_CHARS: usize = 120;

/// Best-effort alert delivery.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &str) -> Result<(), AppError>;
}

pub struct PushoverNotifier {
    client: reqwest::Client,
    endpoint: String,
    title: String,
    credentials: Option<PushoverCredentials>,
}

impl PushoverNotifier {
    pub fn new(title: String, credentials: Option<PushoverCredentials>) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| AppError::Config(format!("failed to build notify client: {err}")))?;

        Ok(Self {
            client,
            endpoint: PUSHOVER_API_URL.to_string(),
            title,
            credentials,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl Notifier for PushoverNotifier {
    async fn send(&self, message: &str) -> Result<(), AppError> {
        let Some(credentials) = &self.credentials else {
            tracing::warn!("Pushover not configured, alert suppressed: {}", message);
            return Ok(());
        };

        let form = [
            ("token", credentials.app_token.as_str()),
            ("user", credentials.user_key.as_str()),
            ("title", self.title.as_str()),
            ("message", message),
        ];

        let response = self
            .client
            .post(&self.endpoint)
            .form(&form)
            .send()
            .await
            .map_err(|err| AppError::Notify(err.to_string()))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let snippet: String = body.chars().take(LOGGED_BODY_CHARS).collect();
        tracing::info!("Pushover {} {}", status.as_u16(), snippet);

        if !status.is_success() {
            return Err(AppError::Notify(format!("pushover returned {status}")));
        }
        Ok(())
    }
}
