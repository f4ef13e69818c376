//! Meraki Provider
//!
//! A Terraform-style provider engine for the Cisco Meraki dashboard API. The
//! host owns the plugin protocol and calls into [`ProviderService`] with
//! decoded JSON; this crate turns those callbacks into dashboard REST calls.
//!
//! # Overview
//!
//! Every endpoint is handled by the same pipeline:
//!
//! - **Method selection** ([`selector`]): a data source with several candidate
//!   operations picks the first with any parameter set.
//! - **Request mapping** ([`mapping::request`]): configuration values become a
//!   request body. Null and unknown values are omitted.
//! - **Backend invocation** ([`client`]): the typed dashboard client, with
//!   `Link` header pagination in [`pagination`].
//! - **Response mapping** ([`mapping::response`]): response payloads become
//!   state, absent values becoming null.
//! - **State merging** ([`merge`]): fresh state is reconciled with the plan or
//!   prior state so write-only values and path identifiers survive.
//!
//! [`dispatch`] runs that pipeline once for every endpoint definition in
//! [`resources`], and [`MerakiProvider`] exposes the registry to the host.
//!
//! # Quick Start
//!
//! ```no_run
//! use meraki_provider::{MerakiProvider, ProviderService};
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), meraki_provider::ProviderError> {
//! meraki_provider::try_init_logging();
//!
//! let provider = MerakiProvider::new();
//! provider
//!     .configure(json!({"meraki_dashboard_api_key": "0123456789abcdef"}))
//!     .await?;
//!
//! let orgs = provider
//!     .read_data_source("meraki_organizations", json!({}))
//!     .await?;
//! println!("{}", orgs["items"]);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod mapping;
pub mod merge;
pub mod pagination;
pub mod provider;
pub mod resources;
pub mod schema;
pub mod selector;
pub mod service;
pub mod testing;
pub mod types;
pub mod validation;
pub mod value;

// Re-export main types at crate root
pub use client::DashboardClient;
pub use config::ProviderConfig;
pub use error::ProviderError;
pub use logging::{init_debug_logging, init_logging, init_logging_with_default, try_init_logging};
pub use provider::MerakiProvider;
pub use schema::ProviderSchema;
pub use service::ProviderService;
pub use types::{
    AttributeChange, ChangeKind, ImportedResource, PlanResult, ProviderMetadata, ReadResult, ServerCapabilities,
};
pub use validation::{is_valid, validate, validate_result};
pub use value::Field;

// Re-export async_trait for convenience
pub use async_trait::async_trait;

// Re-export commonly used external types
pub use serde_json;
pub use tracing;
