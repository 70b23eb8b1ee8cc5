//! Connection settings for the True Hole API.

use std::fmt;

use serde::Deserialize;

use crate::error::ClientError;

pub const DEFAULT_BASE_URI: &str = "https://api.hypertherm.com/convert/";
pub const DEFAULT_SUBSCRIPTION_HEADER: &str = "ocp-apim-subscription-key";

pub const ENV_SUBSCRIPTION_KEY: &str = "TRUEHOLE_SUBSCRIPTION_KEY";
pub const ENV_BASE_URI: &str = "TRUEHOLE_BASE_URI";
pub const ENV_SUBSCRIPTION_HEADER: &str = "TRUEHOLE_SUBSCRIPTION_HEADER";

/// Base URI plus the subscription header sent with every request.
///
/// Immutable once built. Empty values for the base URI or header name fall
/// back to the public defaults.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfiguration {
    #[serde(default = "default_base_uri", deserialize_with = "or_default_base_uri")]
    base_uri: String,
    #[serde(
        default = "default_subscription_header",
        deserialize_with = "or_default_subscription_header"
    )]
    subscription_header: String,
    subscription_key: String,
}

impl ClientConfiguration {
    pub fn new(subscription_key: impl Into<String>) -> Self {
        Self {
            base_uri: default_base_uri(),
            subscription_header: default_subscription_header(),
            subscription_key: subscription_key.into(),
        }
    }

    pub fn with_base_uri(mut self, base_uri: impl Into<String>) -> Self {
        let base_uri = base_uri.into();
        if !base_uri.is_empty() {
            self.base_uri = base_uri;
        }
        self
    }

    pub fn with_subscription_header(mut self, header: impl Into<String>) -> Self {
        let header = header.into();
        if !header.is_empty() {
            self.subscription_header = header;
        }
        self
    }

    /// Read the configuration from `TRUEHOLE_*` environment variables.
    ///
    /// The subscription key is required; base URI and header name are
    /// optional.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let key = lookup(ENV_SUBSCRIPTION_KEY)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ClientError::Configuration(format!("{ENV_SUBSCRIPTION_KEY} is not set"))
            })?;
        let mut config = Self::new(key);
        if let Some(uri) = lookup(ENV_BASE_URI) {
            config = config.with_base_uri(uri);
        }
        if let Some(header) = lookup(ENV_SUBSCRIPTION_HEADER) {
            config = config.with_subscription_header(header);
        }
        Ok(config)
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    pub fn subscription_header(&self) -> &str {
        &self.subscription_header
    }

    pub fn subscription_key(&self) -> &str {
        &self.subscription_key
    }
}

impl fmt::Debug for ClientConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfiguration")
            .field("base_uri", &self.base_uri)
            .field("subscription_header", &self.subscription_header)
            .field("subscription_key", &"<redacted>")
            .finish()
    }
}

fn default_base_uri() -> String {
    DEFAULT_BASE_URI.to_string()
}

fn default_subscription_header() -> String {
    DEFAULT_SUBSCRIPTION_HEADER.to_string()
}

fn or_default_base_uri<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_empty()).unwrap_or_else(default_base_uri))
}

fn or_default_subscription_header<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(default_subscription_header))
}
