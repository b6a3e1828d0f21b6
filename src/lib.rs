//! Typed client for the Google Security Operations (Chronicle) REST API.
//!
//! Requests are plain values built from a [`ResourceIdentity`] and raw inputs;
//! [`ChronicleClient`] sends them to the regional endpoint with an OAuth token.
//!
//! ```no_run
//! # async fn run() -> chronicle_api::Result<()> {
//! use chronicle_api::{ChronicleClient, ClientConfig, RunParserRequest};
//!
//! let config = ClientConfig::builder()
//!     .project("my-project")
//!     .location("us")
//!     .instance("my-instance")
//!     .api_version("v1alpha")
//!     .build()?;
//! let client = ChronicleClient::from_config(config)?;
//!
//! let request = RunParserRequest::new(
//!     client.identity(),
//!     "WINEVTLOG",
//!     std::fs::read("parser.conf").unwrap_or_default(),
//!     b"",
//!     ["<Event>...</Event>"],
//!     false,
//! );
//! let result = client.run_parser(&request).await?;
//! println!("{} results", result.run_parser_results.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod encoding;
mod error;
pub mod gauth;
mod paths;
pub mod requests;
pub mod resources;
mod utils;

pub use client::ChronicleClient;
pub use config::{ClientConfig, ClientConfigBuilder, ClientConfigBuilderError};
pub use encoding::{encode_blob, encode_logs};
pub use error::{ChronicleError, Result};
pub use paths::{OperationSuffix, ResourceIdentity};
pub use requests::{
    ActivateParserExtensionRequest, ActivateParserRequest, ApiRequest,
    CreateParserExtensionRequest, CreateParserRequest, DeactivateParserRequest,
    DeleteParserExtensionRequest, DeleteParserRequest, GetParserRequest, ListLogTypesRequest,
    ListParsersRequest, RunParserRequest,
};
