//! Synchronous client for the XPR True Hole conversion API.
//!
//! # Overview
//! Turns a part program into its True Hole variant with one call:
//! upload the settings, upload the part, convert, download the result.
//!
//! ```no_run
//! use truehole_core::TrueHoleClient;
//!
//! # fn example() -> Result<(), truehole_core::ClientError> {
//! let client = TrueHoleClient::with_subscription_key("my-key");
//! let converted = client.convert("settings", "part program")?;
//! println!("{converted}");
//! # Ok(())
//! # }
//! ```
//!
//! # Design
//! - `ThApiClient` splits every endpoint into a pure `build_*` (produces an
//!   `HttpRequest`) and `parse_*` (consumes an `HttpResponse`); the
//!   `Transport` trait sits between them.
//! - `UreqTransport` is the only production transport; tests substitute
//!   their own.
//! - `TrueHoleClient` sequences the endpoints through the `ApiClient` trait.
//! - Every failure is a `ClientError` whose message is the only contract.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod truehole;
pub mod types;

pub use client::{ApiClient, ThApiClient};
pub use config::ClientConfiguration;
pub use error::ClientError;
pub use http::{ContentType, HttpRequest, HttpResponse, Transport};
pub use transport::UreqTransport;
pub use truehole::TrueHoleClient;
pub use types::FileId;
