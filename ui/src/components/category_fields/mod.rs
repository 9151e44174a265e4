//! Tenant Category Fields
//!
//! Renders the extra product fields a tenant's industry category defines:
//! - `fetcher`: loads and caches the schema once per session
//! - `render`: maps each field descriptor to a control description
//! - `navigator`: section tabs for multi-section schemas
//! - `fields` / `form`: the Leptos components

pub mod types;
pub mod render;
pub mod navigator;
pub mod fetcher;
pub mod fields;
pub mod form;

pub use types::*;
pub use fetcher::{FetchHandle, SchemaFetcher, SharedSchemaFetcher};
pub use form::CategoryFields;
