//! Request builder and response parser for the three True Hole endpoints.
//!
//! # Design
//! Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! Both halves are pure, so protocol rules are testable without a network.
//! `ThApiClient` joins them through its `Transport` and implements
//! `ApiClient`, the seam the orchestration layer depends on.
//!
//! All non-success JSON bodies go through one decoder, `decode_json`, which
//! picks the domain message (`errorMsg`) over the gateway message
//! (`message`).

use serde_json::{Map, Value};

use crate::config::ClientConfiguration;
use crate::error::ClientError;
use crate::http::{
    ContentType, HttpRequest, HttpResponse, Transport, APPLICATION_JSON, TEXT_PLAIN,
};
use crate::transport::UreqTransport;
use crate::types::{
    ConvertRequest, DownloadRequest, FileId, CONVERT_ID_FIELD, ERROR_MSG_FIELD,
    PROXY_MESSAGE_FIELD, UPLOAD_ID_FIELD,
};

pub const UPLOAD_PATH: &str = "api/upload";
pub const CONVERT_PATH: &str = "api/convert";
pub const DOWNLOAD_PATH: &str = "api/download";

const UNKNOWN_ERROR: &str = "Response contained an unknown error.";

/// The individual endpoints of the True Hole API.
pub trait ApiClient {
    /// Upload settings or part content and return its file id.
    fn upload(&self, content: &str) -> Result<FileId, ClientError>;

    /// Convert an uploaded part with uploaded settings; returns the id of
    /// the converted part.
    fn convert(&self, settings_file_id: &FileId, part_file_id: &FileId)
        -> Result<FileId, ClientError>;

    /// Download converted part content.
    fn download(&self, file_id: &FileId) -> Result<String, ClientError>;
}

impl<A: ApiClient + ?Sized> ApiClient for &A {
    fn upload(&self, content: &str) -> Result<FileId, ClientError> {
        (**self).upload(content)
    }

    fn convert(
        &self,
        settings_file_id: &FileId,
        part_file_id: &FileId,
    ) -> Result<FileId, ClientError> {
        (**self).convert(settings_file_id, part_file_id)
    }

    fn download(&self, file_id: &FileId) -> Result<String, ClientError> {
        (**self).download(file_id)
    }
}

/// `ApiClient` over a `Transport`. Holds no state between calls.
#[derive(Debug, Clone)]
pub struct ThApiClient<T = UreqTransport> {
    transport: T,
}

impl ThApiClient<UreqTransport> {
    /// Client that talks to the API described by `config` over ureq.
    pub fn from_config(config: &ClientConfiguration) -> Self {
        Self::new(UreqTransport::new(config))
    }
}

impl<T> ThApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn build_upload(&self, content: &str) -> HttpRequest {
        HttpRequest {
            path: UPLOAD_PATH.to_string(),
            content_type: ContentType::TextPlain,
            accept: ContentType::ApplicationJson,
            body: content.to_string(),
        }
    }

    pub fn build_convert(
        &self,
        settings_file_id: &FileId,
        part_file_id: &FileId,
    ) -> Result<HttpRequest, ClientError> {
        let body = serde_json::to_string(&ConvertRequest {
            settings_file_id,
            part_file_id,
        })
        .map_err(|e| ClientError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            path: CONVERT_PATH.to_string(),
            content_type: ContentType::ApplicationJson,
            accept: ContentType::ApplicationJson,
            body,
        })
    }

    pub fn build_download(&self, file_id: &FileId) -> Result<HttpRequest, ClientError> {
        let body = serde_json::to_string(&DownloadRequest { file_id })
            .map_err(|e| ClientError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            path: DOWNLOAD_PATH.to_string(),
            content_type: ContentType::ApplicationJson,
            accept: ContentType::TextPlain,
            body,
        })
    }

    pub fn parse_upload(&self, response: HttpResponse) -> Result<FileId, ClientError> {
        parse_file_id(&response, UPLOAD_ID_FIELD)
    }

    pub fn parse_convert(&self, response: HttpResponse) -> Result<FileId, ClientError> {
        parse_file_id(&response, CONVERT_ID_FIELD)
    }

    /// The first matching rule wins: plain text success returns the body,
    /// plain text failure carries the body as the message, JSON failure is
    /// decoded, anything else is a protocol violation.
    pub fn parse_download(&self, response: HttpResponse) -> Result<String, ClientError> {
        let success = response.is_success();
        if response.has_content_type(ContentType::TextPlain) {
            if success {
                return Ok(response.body);
            }
            return Err(ClientError::Api(response.body));
        }
        if response.has_content_type(ContentType::ApplicationJson) && !success {
            return Err(match decode_json(&response) {
                Ok(_) => ClientError::Api(UNKNOWN_ERROR.to_string()),
                Err(err) => err,
            });
        }
        Err(ClientError::Protocol {
            expected: TEXT_PLAIN,
        })
    }
}

impl<T: Transport> ApiClient for ThApiClient<T> {
    fn upload(&self, content: &str) -> Result<FileId, ClientError> {
        tracing::debug!(content_len = content.len(), "uploading content");
        let response = self.transport.post(self.build_upload(content))?;
        self.parse_upload(response)
    }

    fn convert(
        &self,
        settings_file_id: &FileId,
        part_file_id: &FileId,
    ) -> Result<FileId, ClientError> {
        tracing::debug!(%settings_file_id, %part_file_id, "requesting conversion");
        let request = self.build_convert(settings_file_id, part_file_id)?;
        let response = self.transport.post(request)?;
        self.parse_convert(response)
    }

    fn download(&self, file_id: &FileId) -> Result<String, ClientError> {
        tracing::debug!(%file_id, "downloading converted part");
        let request = self.build_download(file_id)?;
        let response = self.transport.post(request)?;
        self.parse_download(response)
    }
}

/// Shared handling for the two JSON endpoints. A missing or null id field
/// yields an empty `FileId`; the server rejects it on the next call.
fn parse_file_id(response: &HttpResponse, field: &str) -> Result<FileId, ClientError> {
    if !response.has_content_type(ContentType::ApplicationJson) {
        return Err(ClientError::Protocol {
            expected: APPLICATION_JSON,
        });
    }
    let object = decode_json(response)?;
    match field_text(&object, field) {
        Some(id) => Ok(FileId::new(id.trim())),
        None => {
            tracing::warn!(field, "response did not contain a file id");
            Ok(FileId::default())
        }
    }
}

/// Parse a JSON object body. On success status the object is returned;
/// otherwise the error message is extracted and returned as `Api`.
fn decode_json(response: &HttpResponse) -> Result<Map<String, Value>, ClientError> {
    let object = match serde_json::from_str::<Value>(&response.body) {
        Ok(Value::Object(object)) => object,
        Ok(_) | Err(_) => return Err(ClientError::MalformedJson),
    };

    if response.is_success() {
        return Ok(object);
    }

    let message = [ERROR_MSG_FIELD, PROXY_MESSAGE_FIELD]
        .iter()
        .filter_map(|field| field_text(&object, field))
        .map(|text| text.trim().to_string())
        .find(|text| !text.is_empty())
        .unwrap_or_else(|| UNKNOWN_ERROR.to_string());

    tracing::debug!(status = response.status, %message, "API reported an error");
    Err(ClientError::Api(message))
}

/// Text of a field: strings as-is, other values as their JSON text, null
/// and absent as `None`.
fn field_text(object: &Map<String, Value>, field: &str) -> Option<String> {
    match object.get(field)? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
