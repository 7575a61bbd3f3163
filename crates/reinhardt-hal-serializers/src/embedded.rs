//! `_embedded` section
//!
//! Every embedded relation is rendered as a complete HAL document of its own,
//! one level shallower than its parent. Client overrides narrow the child to
//! the requested fields and carry the next level of overrides down.

use crate::context::HalContext;
use crate::model_serializer::serialize_instance;
use reinhardt_hal_core::{
	EmbeddedField, FieldClassification, HalError, HalInstance, ModelDescriptor, Related, Result,
	SELF_LINK, SerializerConfig,
};
use serde_json::{Map, Value};

/// Configuration of the serializer used for one embedded relation
///
/// # Examples
///
/// ```
/// use reinhardt_hal_core::{FieldSelection, SerializerConfig, classify};
/// use reinhardt_hal_core::{FieldDescriptor, ModelDescriptor};
/// use reinhardt_hal_serializers::embedded::child_config;
///
/// let person = ModelDescriptor::new("Person")
///     .field(FieldDescriptor::attribute("id").primary_key())
///     .field(FieldDescriptor::foreign_key("address", "Address"));
/// let parent = SerializerConfig::new("Person")
///     .with_nested("address", FieldSelection::from_fields(["city"]));
///
/// let fields = classify(&person, &parent);
/// let child = child_config(&parent, &fields.embedded["address"]);
///
/// assert_eq!(child.model, "Address");
/// assert_eq!(child.fields, vec!["self", "city"]);
/// assert_eq!(child.depth, 0);
/// ```
pub fn child_config(parent: &SerializerConfig, field: &EmbeddedField) -> SerializerConfig {
	let child = SerializerConfig::new(field.relation.target.clone())
		.with_depth(parent.depth.saturating_sub(1))
		.with_no_links(parent.no_links);

	match &field.selection {
		Some(selection) => {
			let mut fields = vec![SELF_LINK.to_string()];
			fields.extend(selection.field_names());
			child
				.with_fields(fields)
				.with_nested_fields(selection.nested.clone())
		}
		None => child,
	}
}

/// Render the `_embedded` object of `instance`
///
/// To-one relations become a document (or `null`), to-many relations an
/// array of documents in the order the instance yields them.
pub fn render_embedded(
	instance: &dyn HalInstance,
	model: &ModelDescriptor,
	config: &SerializerConfig,
	classification: &FieldClassification,
	context: &HalContext,
) -> Result<Map<String, Value>> {
	let mut embedded = Map::new();
	for (name, field) in &classification.embedded {
		let child = child_config(config, field);
		let target = context.descriptor(&child.model)?;

		let value = match instance.related(name) {
			Some(Related::One(Some(related))) => serialize_instance(related, target, &child, context)?,
			Some(Related::One(None)) => Value::Null,
			Some(Related::Many(related)) => Value::Array(
				related
					.into_iter()
					.map(|item| serialize_instance(item, target, &child, context))
					.collect::<Result<Vec<_>>>()?,
			),
			None => {
				return Err(HalError::UnknownRelation {
					model: model.name().to_string(),
					relation: name.clone(),
				});
			}
		};
		embedded.insert(name.clone(), value);
	}
	Ok(embedded)
}
