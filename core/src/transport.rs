//! Production `Transport` backed by a blocking ureq agent.

use std::fmt;

use ureq::tls::{TlsConfig, TlsProvider};
use ureq::Agent;

use crate::config::ClientConfiguration;
use crate::error::ClientError;
use crate::http::{HttpRequest, HttpResponse, Transport};

/// Converted part programs can be far larger than ureq's default 10 MiB
/// body limit; responses are buffered whole.
pub const MAX_RESPONSE_BODY: u64 = u64::MAX;

/// Sends requests to the configured base URI with the subscription header
/// attached.
///
/// The agent is built with an explicit rustls TLS configuration; rustls
/// never negotiates below TLS 1.2, so the floor travels with this instance
/// instead of being a process-wide switch. Status codes are never turned
/// into errors here.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
    base_uri: String,
    subscription_header: String,
    subscription_key: String,
}

impl UreqTransport {
    pub fn new(config: &ClientConfiguration) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .tls_config(TlsConfig::builder().provider(TlsProvider::Rustls).build())
            .build()
            .new_agent();
        Self {
            agent,
            base_uri: config.base_uri().trim_end_matches('/').to_string(),
            subscription_header: config.subscription_header().to_string(),
            subscription_key: config.subscription_key().to_string(),
        }
    }

    /// Absolute URL for a path relative to the base URI.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_uri, path.trim_start_matches('/'))
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport")
            .field("base_uri", &self.base_uri)
            .field("subscription_header", &self.subscription_header)
            .finish_non_exhaustive()
    }
}

impl Transport for UreqTransport {
    fn post(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let url = self.url(&request.path);
        tracing::debug!(
            %url,
            content_type = request.content_type.as_str(),
            accept = request.accept.as_str(),
            body_len = request.body.len(),
            "sending request"
        );

        let mut response = self
            .agent
            .post(&url)
            .header(self.subscription_header.as_str(), self.subscription_key.as_str())
            .header("accept", request.accept.as_str())
            .content_type(request.content_type.as_str())
            .send(request.body.as_bytes())
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .body_mut()
            .with_config()
            .limit(MAX_RESPONSE_BODY)
            .read_to_string()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        tracing::debug!(%url, status, ?content_type, body_len = body.len(), "received response");
        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}
