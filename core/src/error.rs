//! Error type for the True Hole client.
//!
//! # Design
//! Every failure, whatever layer it comes from, surfaces as one
//! `ClientError`. The variants exist so tests and callers can match on the
//! failure class, but the `Display` text is the contract: it is exactly the
//! message the remote API (or the protocol check) produced.

/// Errors returned by the operations and orchestration layers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The response carried a content type the operation cannot handle.
    #[error("Response did not contain Content-Type: {expected}.")]
    Protocol { expected: &'static str },

    /// A JSON body was expected but could not be parsed as an object.
    #[error("Response contained malformed json.")]
    MalformedJson,

    /// The API or its gateway reported an error; holds the server's message.
    #[error("{0}")]
    Api(String),

    /// The request never produced a response (DNS, connect, TLS, I/O).
    #[error("{0}")]
    Transport(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The client configuration is missing or invalid.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Human-readable message, identical to the `Display` output.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_message_names_expected_content_type() {
        let err = ClientError::Protocol {
            expected: "application/json",
        };
        assert_eq!(
            err.message(),
            "Response did not contain Content-Type: application/json."
        );
    }

    #[test]
    fn malformed_json_message_is_fixed() {
        assert_eq!(
            ClientError::MalformedJson.to_string(),
            "Response contained malformed json."
        );
    }

    #[test]
    fn api_message_is_passed_through() {
        let err = ClientError::Api("Invalid settings file.".to_string());
        assert_eq!(err.to_string(), "Invalid settings file.");
    }
}
