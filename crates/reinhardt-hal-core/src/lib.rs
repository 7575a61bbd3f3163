//! # reinhardt-hal-core
//!
//! Building blocks of the HAL serializers that do not depend on HTTP or URL
//! resolution:
//!
//! - **Model descriptors**: read-only field and relation metadata served by a
//!   [`ModelIntrospector`]
//! - **Instance capability**: the object-safe [`HalInstance`] trait
//! - **Serializer configuration**: [`SerializerConfig`], the `Meta` options of
//!   a HAL serializer as a plain value
//! - **Field selection**: the `fields` query DSL parser
//! - **Field classification**: plain / link / embedded partitioning
//!
//! ## Examples
//!
//! ```
//! use reinhardt_hal_core::{FieldDescriptor, ModelDescriptor, SerializerConfig};
//! use reinhardt_hal_core::classifier::classify;
//! use reinhardt_hal_core::selection::parse;
//!
//! let person = ModelDescriptor::new("Person")
//!     .field(FieldDescriptor::attribute("id").primary_key())
//!     .field(FieldDescriptor::attribute("name"))
//!     .field(FieldDescriptor::foreign_key("address", "Address"));
//!
//! let selection = parse("name,address.fields(city)");
//! let config = SerializerConfig::from_selection("Person", &selection);
//! let fields = classify(&person, &config);
//!
//! assert!(fields.embedded.contains_key("address"));
//! assert!(fields.plain.contains_key("name"));
//! ```

pub mod classifier;
pub mod error;
pub mod model;
pub mod options;
pub mod selection;

pub use classifier::{
	EmbeddedField, FieldClassification, LinkField, PlainField, RelationPlacement, classify,
};
pub use error::{FieldError, HalError, NON_FIELD_ERRORS, Result};
pub use model::{
	AttributeInfo, Cardinality, Direction, FieldDescriptor, FieldKind, HalInstance,
	ModelDescriptor, ModelIntrospector, ModelRegistry, Record, Related, RelationInfo,
};
pub use options::{SELF_LINK, SerializerConfig};
pub use selection::{FieldSelection, SelectionMode};
