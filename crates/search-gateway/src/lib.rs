//! Search Gateway
//!
//! A thin convenience layer over the Elasticsearch client for applications
//! that search, page and highlight documents.
//!
//! # Components
//!
//! - [`gateway`] - [`SearchGateway`], one method per engine operation
//!   (indices, aliases, mappings, settings, documents, search, scroll,
//!   point in time, ping)
//! - [`request`] - pure builders for request bodies
//! - [`result`] - [`build_result`](result::build_result), which shapes a raw
//!   search response into a pagination envelope
//! - [`config`] - hosts, retries, timeouts and credentials
//! - [`error`] - error types
//!
//! # Quick Start
//!
//! ```no_run
//! use search_gateway::{GatewayConfig, SearchGateway};
//! use search_gateway::request::SearchRequest;
//! use search_gateway::result::{ResultParams, build_result};
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), search_gateway::Error> {
//! let gateway = SearchGateway::new(GatewayConfig::from_env())?;
//!
//! gateway
//!     .add_doc("products", json!({"id": 1, "name": "red shoes"}), None, "id")
//!     .await?;
//!
//! let request = SearchRequest::new("products")
//!     .with_query(json!({"match": {"name": "shoes"}}))
//!     .with_size(20);
//! let raw = gateway.search(&request).await?;
//!
//! let params = ResultParams::new(0, 20).with_highlight_fields("name");
//! let envelope = build_result(&raw, &params)?;
//! println!("{}", envelope.to_value());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod gateway;
pub mod json;
pub mod request;
pub mod result;

pub use config::{GatewayAuth, GatewayConfig};
pub use error::{Error, GatewayError, GatewayResult, ShapeError, ShapeResult};
pub use gateway::SearchGateway;
pub use result::{ResultParams, SearchEnvelope, build_result};
