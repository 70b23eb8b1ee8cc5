//! One-call conversion of a part program into its True Hole variant.

use crate::client::{ApiClient, ThApiClient};
use crate::config::ClientConfiguration;
use crate::error::ClientError;

/// Runs upload, upload, convert, download in sequence.
///
/// Any failing step ends the run and its error is returned as is. Files
/// already uploaded are left to the server.
#[derive(Debug, Clone)]
pub struct TrueHoleClient<A = ThApiClient> {
    api: A,
}

impl TrueHoleClient<ThApiClient> {
    /// Client for the public API using only a subscription key.
    pub fn with_subscription_key(subscription_key: impl Into<String>) -> Self {
        Self::from_config(&ClientConfiguration::new(subscription_key))
    }

    pub fn from_config(config: &ClientConfiguration) -> Self {
        Self::new(ThApiClient::from_config(config))
    }
}

impl<A: ApiClient> TrueHoleClient<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// Convert `part` using `settings` and return the converted part.
    pub fn convert(&self, settings: &str, part: &str) -> Result<String, ClientError> {
        let settings_file_id = self.api.upload(settings)?;
        tracing::debug!(%settings_file_id, "settings uploaded");

        let part_file_id = self.api.upload(part)?;
        tracing::debug!(%part_file_id, "part uploaded");

        let converted_file_id = self.api.convert(&settings_file_id, &part_file_id)?;
        tracing::debug!(%converted_file_id, "part converted");

        let converted = self.api.download(&converted_file_id)?;
        tracing::info!(
            part_len = part.len(),
            converted_len = converted.len(),
            "True Hole conversion finished"
        );
        Ok(converted)
    }
}
