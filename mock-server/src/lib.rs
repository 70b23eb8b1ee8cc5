use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const SUBSCRIPTION_HEADER: &str = "ocp-apim-subscription-key";

/// Marker line prepended to every converted part.
pub const CONVERTED_MARKER: &str = "; TRUE HOLE";

#[derive(Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(rename = "fileID")]
    pub file_id: String,
}

#[derive(Deserialize)]
pub struct ConvertRequest {
    #[serde(rename = "settingsFileID")]
    pub settings_file_id: Option<String>,
    #[serde(rename = "partFileID")]
    pub part_file_id: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct ConvertResponse {
    #[serde(rename = "convertedPartFileID")]
    pub converted_part_file_id: String,
}

#[derive(Deserialize)]
pub struct DownloadRequest {
    #[serde(rename = "fileID")]
    pub file_id: Option<String>,
}

pub type Files = Arc<RwLock<HashMap<String, String>>>;

#[derive(Clone)]
pub struct AppState {
    files: Files,
    subscription_key: Arc<str>,
}

pub fn app(subscription_key: &str) -> Router {
    let state = AppState {
        files: Arc::new(RwLock::new(HashMap::new())),
        subscription_key: Arc::from(subscription_key),
    };
    Router::new()
        .route("/api/upload", post(upload))
        .route("/api/convert", post(convert))
        .route("/api/download", post(download))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_subscription_key,
        ))
        .with_state(state)
}

pub async fn run(listener: TcpListener, subscription_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(subscription_key)).await
}

/// Gateway check in front of every endpoint; rejections use the gateway's
/// `message` field rather than the API's `errorMsg`.
async fn require_subscription_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let provided = request
        .headers()
        .get(SUBSCRIPTION_HEADER)
        .and_then(|value| value.to_str().ok());
    match provided {
        Some(key) if key == &*state.subscription_key => next.run(request).await,
        Some(_) => gateway_error("Access denied due to invalid subscription key."),
        None => gateway_error("Access denied due to missing subscription key."),
    }
}

fn gateway_error(message: &str) -> Response {
    tracing::warn!(message, "rejected request at gateway");
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "statusCode": 401, "message": message })),
    )
        .into_response()
}

fn api_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "errorMsg": message }))).into_response()
}

async fn upload(State(state): State<AppState>, content: String) -> Response {
    if content.trim().is_empty() {
        return api_error(StatusCode::BAD_REQUEST, "Uploaded file was empty.");
    }
    let file_id = Uuid::new_v4().to_string();
    tracing::debug!(%file_id, len = content.len(), "stored upload");
    state.files.write().await.insert(file_id.clone(), content);
    (StatusCode::OK, Json(UploadResponse { file_id })).into_response()
}

async fn convert(State(state): State<AppState>, Json(input): Json<ConvertRequest>) -> Response {
    let mut files = state.files.write().await;
    let settings = input
        .settings_file_id
        .as_deref()
        .and_then(|id| files.get(id));
    let Some(settings) = settings else {
        return api_error(StatusCode::BAD_REQUEST, "Settings file ID was not found.");
    };
    let part = input.part_file_id.as_deref().and_then(|id| files.get(id));
    let Some(part) = part else {
        return api_error(StatusCode::BAD_REQUEST, "Part file ID was not found.");
    };

    let converted = convert_part(settings, part);
    let converted_part_file_id = Uuid::new_v4().to_string();
    files.insert(converted_part_file_id.clone(), converted);
    (
        StatusCode::OK,
        Json(ConvertResponse {
            converted_part_file_id,
        }),
    )
        .into_response()
}

/// Download errors are plain text, matching the endpoint's success type.
async fn download(State(state): State<AppState>, Json(input): Json<DownloadRequest>) -> Response {
    let files = state.files.read().await;
    match input.file_id.as_deref().and_then(|id| files.get(id)) {
        Some(content) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            content.clone(),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            "File ID was not found.".to_string(),
        )
            .into_response(),
    }
}

/// Stand-in conversion: marks the part and records the settings size.
pub fn convert_part(settings: &str, part: &str) -> String {
    format!(
        "{CONVERTED_MARKER} ({} settings bytes)\n{part}",
        settings.len()
    )
}
