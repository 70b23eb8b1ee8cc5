//! HTTP transport types and the transport seam.
//!
//! # Design
//! Requests and responses are plain data. The operations layer builds an
//! `HttpRequest` and parses an `HttpResponse` without touching the network;
//! a `Transport` implementation performs the actual POST in between. Tests
//! swap in a scripted transport, production uses `UreqTransport`.
//!
//! All fields use owned types so values can be recorded and replayed freely.

use crate::error::ClientError;

pub const TEXT_PLAIN: &str = "text/plain";
pub const APPLICATION_JSON: &str = "application/json";

/// The two content types the API speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    TextPlain,
    ApplicationJson,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::TextPlain => TEXT_PLAIN,
            ContentType::ApplicationJson => APPLICATION_JSON,
        }
    }
}

/// A POST request described as plain data.
///
/// `path` is relative to the configured base URI. `content_type` declares
/// the body encoding and `accept` is the response type the operation wants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub path: String,
    pub content_type: ContentType,
    pub accept: ContentType,
    pub body: String,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Raw `Content-Type` header value, parameters included.
    pub content_type: Option<String>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, content_type: Option<&str>, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: content_type.map(str::to_string),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Media type without parameters, lowercased (`text/plain; charset=utf-8`
    /// becomes `text/plain`).
    pub fn media_type(&self) -> Option<String> {
        self.content_type.as_deref().and_then(|value| {
            let media = value.split(';').next().unwrap_or("").trim();
            (!media.is_empty()).then(|| media.to_ascii_lowercase())
        })
    }

    pub fn has_content_type(&self, content_type: ContentType) -> bool {
        self.media_type().as_deref() == Some(content_type.as_str())
    }
}

/// Executes requests against the remote API.
///
/// A `TextPlain` request is the `postText` call, an `ApplicationJson` one
/// the `postJson` call. Implementations attach the subscription header and
/// resolve `path` against their base URI. Non-2xx responses are data, not
/// errors; only failures that produce no response map to
/// `ClientError::Transport`.
pub trait Transport {
    fn post(&self, request: HttpRequest) -> Result<HttpResponse, ClientError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        (**self).post(request)
    }
}
