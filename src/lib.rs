//! # Reinhardt HAL
//!
//! [HAL](https://stateless.group/hal_specification.html) rendering for
//! Reinhardt models.
//!
//! Every instance becomes a document with a `_links` section (its own URL
//! under `self` plus hyperlinks to related resources), its plain attributes
//! and an optional `_embedded` section holding related resources inline.
//! Clients narrow documents with the `fields` query parameter:
//!
//! ```text
//! GET /people/1/?fields=name,address.fields(city,zip)
//! ```
//!
//! ## Crates
//!
//! - [`core`]: model descriptors, the `fields` parser and field classification
//! - [`serializers`]: the HAL model serializer, links, embedded documents and
//!   pagination
//! - [`viewsets`] (feature `viewsets`): request handling, settings and the
//!   `application/hal+json` media type
//!
//! ## Feature Flags
//!
//! - `full` (default) - everything
//! - `viewsets` - HTTP viewsets
//! - `minimal` - serializers only
//!
//! ## Quick Example
//!
//! ```
//! use reinhardt_hal::prelude::*;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let registry = ModelRegistry::new()
//!     .with_model(
//!         ModelDescriptor::new("Person")
//!             .with_resource_name("people")
//!             .field(FieldDescriptor::attribute("id").primary_key())
//!             .field(FieldDescriptor::attribute("name"))
//!             .field(FieldDescriptor::foreign_key("address", "Address")),
//!     )
//!     .with_model(
//!         ModelDescriptor::new("Address")
//!             .with_resource_name("addresses")
//!             .field(FieldDescriptor::attribute("id").primary_key())
//!             .field(FieldDescriptor::attribute("city")),
//!     );
//! let context = HalContext::new(Arc::new(registry), Arc::new(RouteUrlResolver::new("/api")));
//! let serializer = HalModelSerializer::new(SerializerConfig::new("Person").with_depth(1), context);
//!
//! let address = Record::new("Address").with("id", json!(7)).with("city", json!("Basel"));
//! let ada = Record::new("Person")
//!     .with("id", json!(1))
//!     .with("name", json!("Ada"))
//!     .with_one("address", Some(address));
//!
//! assert_eq!(
//!     serializer.serialize(&ada).unwrap(),
//!     json!({
//!         "_links": {"self": "/api/people/1/"},
//!         "id": 1,
//!         "name": "Ada",
//!         "_embedded": {
//!             "address": {"_links": {"self": "/api/addresses/7/"}, "id": 7, "city": "Basel"}
//!         }
//!     })
//! );
//! ```

pub use reinhardt_hal_core as core;
pub use reinhardt_hal_serializers as serializers;

#[cfg(feature = "viewsets")]
pub use reinhardt_hal_viewsets as viewsets;

pub use reinhardt_hal_core::{
	FieldDescriptor, FieldError, FieldSelection, HalError, HalInstance, ModelDescriptor,
	ModelIntrospector, ModelRegistry, Record, Related, Result, SELF_LINK, SelectionMode,
	SerializerConfig,
};
pub use reinhardt_hal_serializers::{
	EMBEDDED_KEY, HalContext, HalModelSerializer, HalPaginationSerializer, LINKS_KEY, Page,
	Paginator, RouteUrlResolver, UrlResolver, ValidatedData,
};

#[cfg(feature = "viewsets")]
pub use reinhardt_hal_viewsets::{
	HAL_JSON, HalJsonParser, HalJsonRenderer, HalModelViewSet, HalSettings, SettingsError,
};

/// Commonly used types
pub mod prelude {
	pub use crate::{
		FieldDescriptor, FieldSelection, HalContext, HalError, HalInstance, HalModelSerializer,
		ModelDescriptor, ModelRegistry, Record, RouteUrlResolver, SerializerConfig, UrlResolver,
	};

	#[cfg(feature = "viewsets")]
	pub use crate::{HAL_JSON, HalModelViewSet, HalSettings};
}
