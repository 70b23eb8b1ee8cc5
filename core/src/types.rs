//! Wire DTOs for the True Hole API.
//!
//! # Design
//! Request payloads borrow their ids so building a request never clones.
//! Field order in the structs is the field order on the wire.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque server-assigned token for uploaded or converted content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(String);

impl FileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FileId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for FileId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for FileId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Body of `api/convert`.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertRequest<'a> {
    #[serde(rename = "settingsFileID")]
    pub settings_file_id: &'a FileId,
    #[serde(rename = "partFileID")]
    pub part_file_id: &'a FileId,
}

/// Body of `api/download`.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadRequest<'a> {
    #[serde(rename = "fileID")]
    pub file_id: &'a FileId,
}

pub const UPLOAD_ID_FIELD: &str = "fileID";
pub const CONVERT_ID_FIELD: &str = "convertedPartFileID";
pub const ERROR_MSG_FIELD: &str = "errorMsg";
pub const PROXY_MESSAGE_FIELD: &str = "message";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_request_keeps_field_order() {
        let settings = FileId::from("s");
        let part = FileId::from("p");
        let body = serde_json::to_string(&ConvertRequest {
            settings_file_id: &settings,
            part_file_id: &part,
        })
        .unwrap();
        assert_eq!(body, r#"{"settingsFileID":"s","partFileID":"p"}"#);
    }

    #[test]
    fn download_request_shape() {
        let id = FileId::from("abc");
        let body = serde_json::to_string(&DownloadRequest { file_id: &id }).unwrap();
        assert_eq!(body, r#"{"fileID":"abc"}"#);
    }

    #[test]
    fn file_id_is_transparent() {
        let id: FileId = serde_json::from_str(r#""xyz""#).unwrap();
        assert_eq!(id.as_str(), "xyz");
        assert_eq!(id.to_string(), "xyz");
    }
}
