//! `_links` section
//!
//! Always starts with `self`, followed by one hyperlink per link-classified
//! relation. To-many relations are linked through the collection endpoint of
//! their target resource rather than one URL per related object.

use crate::context::HalContext;
use crate::url::{collection_url, instance_url};
use reinhardt_hal_core::{
	FieldClassification, HalError, HalInstance, LinkField, ModelDescriptor, Related, RelationInfo,
	Result,
};
use serde_json::{Map, Value};

/// Render the `_links` object of `instance`
pub fn render_links(
	instance: &dyn HalInstance,
	model: &ModelDescriptor,
	classification: &FieldClassification,
	context: &HalContext,
) -> Result<Map<String, Value>> {
	let mut links = Map::new();
	for (name, field) in &classification.links {
		let href = match field {
			LinkField::Identity => {
				Value::String(instance_url(context.resolver(), model.resource_name(), &instance.pk())?)
			}
			LinkField::Relation(relation) => relation_link(instance, model, name, relation, context)?,
		};
		links.insert(name.clone(), href);
	}
	Ok(links)
}

fn relation_link(
	instance: &dyn HalInstance,
	model: &ModelDescriptor,
	name: &str,
	relation: &RelationInfo,
	context: &HalContext,
) -> Result<Value> {
	let target = context.descriptor(&relation.target)?;
	if relation.is_many() {
		return collection_url(context.resolver(), target.resource_name()).map(Value::String);
	}

	match instance.related(name) {
		Some(Related::One(Some(related))) => {
			instance_url(context.resolver(), target.resource_name(), &related.pk()).map(Value::String)
		}
		Some(Related::One(None)) => Ok(Value::Null),
		Some(Related::Many(_)) | None => Err(HalError::UnknownRelation {
			model: model.name().to_string(),
			relation: name.to_string(),
		}),
	}
}
