//! OpsLevel Provider
//!
//! This crate exposes OpsLevel's catalog objects (services, teams, domains,
//! users, checks) as infrastructure-as-code resources and data sources. It
//! follows the pattern established by
//! [terraform-plugin-go](https://github.com/hashicorp/terraform-plugin-go):
//! the hosting runtime owns planning, diffing, and the wire protocol; this
//! crate owns schemas, CRUD dispatch, and the GraphQL calls behind them.
//!
//! # Overview
//!
//! The crate provides:
//!
//! - **Schema types**: Types for describing the provider, resource, and data
//!   source attribute schemas
//! - **Generic dispatchers**: [`ResourceCrud`] and the single/multi data
//!   source dispatchers, which factor the decode/call/map/write
//!   sequence out of every resource definition
//! - **GraphQL client**: One authenticated client shared by every operation,
//!   with cursor pagination followed to exhaustion
//! - **Provider entrypoint**: [`OpsLevelProvider`], which registers every
//!   type and resolves configuration from config, environment, or defaults
//! - **Error types**: [`ProviderError`] and the [`Diagnostic`] surface
//! - **Logging**: Integration with `tracing` for structured logging
//!
//! # Quick Start
//!
//! ```ignore
//! use opslevel_provider::{init_logging, OpsLevelProvider};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() {
//!     init_logging();
//!
//!     let provider = OpsLevelProvider::new();
//!     let diagnostics = provider.configure(&json!({
//!         "api_token": std::env::var("OPSLEVEL_API_TOKEN").unwrap(),
//!     }));
//!     assert!(diagnostics.is_empty());
//!
//!     let response = provider
//!         .create("opslevel_domain", &json!({"name": "Payments"}))
//!         .await;
//!     println!("{:?}", response.state);
//! }
//! ```
//!
//! # Configuration
//!
//! The provider block takes `api_token` (required, sensitive), `api_url`, and
//! `api_timeout`. Each falls back to its environment variable
//! (`OPSLEVEL_API_TOKEN`, `OPSLEVEL_API_URL`, `OPSLEVEL_API_TIMEOUT`) and
//! then to a default. A missing token fails configuration; a malformed
//! timeout only warns.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod client;
pub mod config;
pub mod convert;
pub mod data_source;
pub mod data_sources;
pub mod error;
pub mod logging;
pub mod pagination;
pub mod provider;
pub mod resource;
pub mod resources;
pub mod schema;
pub mod testing;
pub mod validation;

// Re-export main types at crate root
pub use client::{Client, PageInfo, PAGE_SIZE};
pub use config::ProviderConfig;
pub use data_source::{MultiDataSource, MultiLookup, SingleDataSource, SingleLookup};
pub use error::ProviderError;
pub use logging::{init_logging, try_init_logging};
pub use pagination::{collect_pages, Page};
pub use provider::OpsLevelProvider;
pub use resource::{OperationResponse, ResourceCrud, ResourceHandler};
pub use schema::{Diagnostic, DiagnosticSeverity, ProviderSchema};
pub use validation::{is_valid, validate, validate_result};

// Re-export async_trait for convenience
pub use async_trait::async_trait;

// Re-export commonly used external types
pub use serde_json;
pub use tracing;
