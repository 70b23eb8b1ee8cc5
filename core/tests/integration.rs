//! End-to-end conversions against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the real
//! `UreqTransport` through the operations and orchestration layers. Covers
//! the success path and each error shape the server can produce: gateway
//! JSON (`message`), API JSON (`errorMsg`) and plain-text download errors.

use std::net::SocketAddr;

use truehole_core::{
    ApiClient, ClientConfiguration, ClientError, FileId, ThApiClient, TrueHoleClient,
};

const KEY: &str = "integration-key";

/// Start the mock server on a background thread and return its address.
fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, KEY).await
        })
        .unwrap();
    });

    addr
}

fn config(addr: SocketAddr, key: &str) -> ClientConfiguration {
    ClientConfiguration::new(key).with_base_uri(format!("http://{addr}/"))
}

#[test]
fn conversion_lifecycle() {
    let addr = start_server();
    let client = TrueHoleClient::from_config(&config(addr, KEY));

    let converted = client.convert("settings content", "part content").unwrap();
    assert_eq!(
        converted,
        mock_server::convert_part("settings content", "part content")
    );
}

#[test]
fn individual_operations() {
    let addr = start_server();
    let api = ThApiClient::from_config(&config(addr, KEY));

    // Step 1: uploads return distinct ids.
    let settings = api.upload("settings content").unwrap();
    let part = api.upload("G21\nG90\nM30\n").unwrap();
    assert!(!settings.is_empty());
    assert_ne!(settings, part);

    // Step 2: convert.
    let converted = api.convert(&settings, &part).unwrap();
    assert!(!converted.is_empty());

    // Step 3: download yields the converted content verbatim.
    let content = api.download(&converted).unwrap();
    assert!(content.starts_with(mock_server::CONVERTED_MARKER));
    assert!(content.ends_with("G21\nG90\nM30\n"));

    // Step 4: uploaded files can be downloaded as-is too.
    assert_eq!(api.download(&part).unwrap(), "G21\nG90\nM30\n");
}

#[test]
fn wrong_subscription_key_reports_gateway_message() {
    let addr = start_server();
    let client = TrueHoleClient::from_config(&config(addr, "wrong-key"));

    let err = client.convert("settings content", "part content").unwrap_err();
    assert_eq!(
        err,
        ClientError::Api("Access denied due to invalid subscription key.".to_string())
    );
}

#[test]
fn subscription_key_travels_under_configured_header_name() {
    let addr = start_server();

    // An explicitly configured default name is accepted by the gateway.
    let api = ThApiClient::from_config(
        &config(addr, KEY).with_subscription_header(mock_server::SUBSCRIPTION_HEADER),
    );
    assert!(!api.upload("content").unwrap().is_empty());

    // Under another name the gateway, which only reads the default header,
    // sees no key at all.
    let api = ThApiClient::from_config(&config(addr, KEY).with_subscription_header("x-other"));
    let err = api.upload("content").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Access denied due to missing subscription key."
    );
}

#[test]
fn api_errors_use_error_msg() {
    let addr = start_server();
    let api = ThApiClient::from_config(&config(addr, KEY));

    let err = api.upload("   ").unwrap_err();
    assert_eq!(err, ClientError::Api("Uploaded file was empty.".to_string()));

    let part = api.upload("part content").unwrap();
    let err = api.convert(&FileId::from("missing"), &part).unwrap_err();
    assert_eq!(err, ClientError::Api("Settings file ID was not found.".to_string()));
}

#[test]
fn download_plain_text_error() {
    let addr = start_server();
    let api = ThApiClient::from_config(&config(addr, KEY));

    let err = api.download(&FileId::from("missing")).unwrap_err();
    assert_eq!(err, ClientError::Api("File ID was not found.".to_string()));
}

#[test]
fn unknown_endpoint_content_type_is_protocol_error() {
    let addr = start_server();
    // Axum answers unknown routes with an empty 404 and no JSON content type.
    let api = ThApiClient::from_config(
        &ClientConfiguration::new(KEY).with_base_uri(format!("http://{addr}/missing/")),
    );

    let err = api.upload("content").unwrap_err();
    assert_eq!(
        err,
        ClientError::Protocol {
            expected: "application/json"
        }
    );
}
