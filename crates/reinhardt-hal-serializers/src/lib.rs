//! # reinhardt-hal-serializers
//!
//! HAL serializers for Reinhardt models.
//!
//! A [`HalModelSerializer`] renders an instance as
//!
//! ```text
//! {
//!   "_links":    { "self": "<url>", "<relation>": "<url>", ... },
//!   "id":        <pk>,
//!   "<field>":   <value>, ...,
//!   "_embedded": { "<relation>": <document> | [<document>, ...], ... }
//! }
//! ```
//!
//! Which relations are linked and which are embedded is decided by
//! [`reinhardt_hal_core::classify`] from the serializer's depth, declared
//! fields and nested-field overrides.

pub mod context;
pub mod embedded;
pub mod links;
pub mod model_serializer;
pub mod pagination;
pub mod url;

pub use context::HalContext;
pub use embedded::{child_config, render_embedded};
pub use links::render_links;
pub use model_serializer::{
	EMBEDDED_KEY, HalModelSerializer, LINKS_KEY, ValidatedData, prepare_for_validation,
};
pub use pagination::{HalPaginationSerializer, Page, Paginator};
pub use url::{RouteUrlResolver, UrlResolver};
