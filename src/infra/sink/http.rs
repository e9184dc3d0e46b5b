//! Delivers distributions to the dining hall over HTTP.

use async_trait::async_trait;
use reqwest::Client;

use crate::core::{Distribution, DistributionSink, KitchenError};

/// Path appended to the dining hall's base URL.
pub const DISTRIBUTION_PATH: &str = "/distribution";

/// POSTs each distribution as JSON; any non-2xx status is a failure.
#[derive(Clone)]
pub struct HttpSink {
    client: Client,
    endpoint: String,
}

impl HttpSink {
    /// Sink posting to `{base_url}/distribution`.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Same as [`Self::new`] with a preconfigured client.
    #[must_use]
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}{DISTRIBUTION_PATH}", base_url.trim_end_matches('/')),
        }
    }

    /// Full URL distributions are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl DistributionSink for HttpSink {
    async fn deliver(&self, distribution: &Distribution) -> Result<(), KitchenError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(distribution)
            .send()
            .await
            .map_err(|e| KitchenError::Sink(e.to_string()))?;
        response
            .error_for_status()
            .map_err(|e| KitchenError::Sink(e.to_string()))?;
        tracing::debug!(
            order_id = distribution.order_id(),
            endpoint = %self.endpoint,
            "distribution posted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_url() {
        assert_eq!(
            HttpSink::new("http://hall:8080/").endpoint(),
            "http://hall:8080/distribution"
        );
        assert_eq!(
            HttpSink::new("http://hall:8080").endpoint(),
            "http://hall:8080/distribution"
        );
    }
}
