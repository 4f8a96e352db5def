//! # Roster Client
//!
//! HTTP transport for the roster sync layer: [`HttpRestClient`] implements
//! [`roster_core::rest::RestClient`] over `reqwest`.
//!
//! Paths are joined onto [`ClientConfig::base_url`]; non-success statuses map
//! to [`RestError::Status`](roster_core::rest::RestError::Status) with the
//! response body, and `DELETE` responses must be a JSON boolean.
//!
//! ```no_run
//! use roster_client::HttpRestClient;
//! use roster_core::rest::RestClient;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpRestClient::from_env()?;
//! let spots = client.get("/tenant/0/spot/").await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;

pub use client::HttpRestClient;
pub use config::{ClientConfig, ConfigError};
