//! # reinhardt-hal-viewsets
//!
//! HAL model viewsets for Reinhardt.
//!
//! - [`HalModelViewSet`]: CRUD actions rendering `application/hal+json`, with
//!   the serializer narrowed per request by the `fields` query parameter
//! - [`HalSettings`]: the `[hal]` settings table
//! - [`media`]: HAL body parser and renderer
//!
//! ## Field selection
//!
//! ```text
//! GET /people/1/?fields=name,address.fields(city,country.fields(name))
//! ```
//!
//! embeds `address` (and its `country`) with only the requested fields and
//! keeps links only for `self` and forward to-one relations.

pub mod media;
pub mod settings;
pub mod viewset;

pub use media::{HAL_JSON, HalJsonParser, HalJsonRenderer};
pub use settings::{HalSettings, SettingsError};
pub use viewset::HalModelViewSet;
