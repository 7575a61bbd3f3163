//! HalModelSerializer - HAL flavoured model serialization
//!
//! Composes plain attributes, the `_links` section and the `_embedded`
//! section of a model instance into one document, and prepares HAL-shaped
//! request bodies for validation on the write path.

use crate::context::HalContext;
use crate::embedded::render_embedded;
use crate::links::render_links;
use reinhardt_hal_core::{
	FieldClassification, FieldError, HalError, HalInstance, ModelDescriptor, PlainField, Record,
	Related, Result, SerializerConfig, classify,
};
use serde_json::{Map, Value};

/// Reserved key of the links section
pub const LINKS_KEY: &str = "_links";
/// Reserved key of the embedded section
pub const EMBEDDED_KEY: &str = "_embedded";

/// Serializer producing HAL documents for one model
///
/// A serializer is a configuration plus the shared [`HalContext`]. Request
/// specific variants are created with [`with_config`](Self::with_config),
/// which leaves the original untouched.
///
/// # Examples
///
/// ```
/// use reinhardt_hal_core::{FieldDescriptor, ModelDescriptor, ModelRegistry, Record, SerializerConfig};
/// use reinhardt_hal_serializers::{HalContext, HalModelSerializer, RouteUrlResolver};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let registry = ModelRegistry::new().with_model(
///     ModelDescriptor::new("Person")
///         .with_resource_name("people")
///         .field(FieldDescriptor::attribute("id").primary_key())
///         .field(FieldDescriptor::attribute("name")),
/// );
/// let context = HalContext::new(Arc::new(registry), Arc::new(RouteUrlResolver::new("/api")));
/// let serializer = HalModelSerializer::new(SerializerConfig::new("Person"), context);
///
/// let ada = Record::new("Person").with("id", json!(1)).with("name", json!("Ada"));
/// let document = serializer.serialize(&ada).unwrap();
///
/// assert_eq!(
///     document,
///     json!({"_links": {"self": "/api/people/1/"}, "id": 1, "name": "Ada"})
/// );
/// ```
#[derive(Debug, Clone)]
pub struct HalModelSerializer {
	config: SerializerConfig,
	context: HalContext,
}

impl HalModelSerializer {
	pub fn new(config: SerializerConfig, context: HalContext) -> Self {
		Self { config, context }
	}

	pub fn config(&self) -> &SerializerConfig {
		&self.config
	}

	pub fn context(&self) -> &HalContext {
		&self.context
	}

	/// Variant of this serializer with another configuration
	pub fn with_config(&self, config: SerializerConfig) -> Self {
		Self {
			config,
			context: self.context.clone(),
		}
	}

	/// Descriptor of the configured model
	pub fn descriptor(&self) -> Result<&ModelDescriptor> {
		self.context.descriptor(&self.config.model)
	}

	/// Field buckets used for reading
	pub fn classification(&self) -> Result<FieldClassification> {
		Ok(classify(self.descriptor()?, &self.config))
	}

	/// Serialize one instance into a HAL document
	pub fn serialize(&self, instance: &dyn HalInstance) -> Result<Value> {
		serialize_instance(instance, self.descriptor()?, &self.config, &self.context)
	}

	/// Serialize several instances, keeping their order
	pub fn serialize_many<T: HalInstance>(&self, instances: &[T]) -> Result<Vec<Value>> {
		let descriptor = self.descriptor()?;
		instances
			.iter()
			.map(|instance| serialize_instance(instance, descriptor, &self.config, &self.context))
			.collect()
	}

	/// Validate a create or update body
	///
	/// `_links` and `_embedded` never reach the result, nested overrides are
	/// ignored, read-only and unknown keys are skipped. With `partial`, missing
	/// required fields are not reported.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_hal_core::{FieldDescriptor, ModelDescriptor, ModelRegistry, SerializerConfig};
	/// use reinhardt_hal_serializers::{HalContext, HalModelSerializer, RouteUrlResolver};
	/// use serde_json::json;
	/// use std::sync::Arc;
	///
	/// let registry = ModelRegistry::new().with_model(
	///     ModelDescriptor::new("Person")
	///         .field(FieldDescriptor::attribute("id").primary_key())
	///         .field(FieldDescriptor::attribute("name")),
	/// );
	/// let context = HalContext::new(Arc::new(registry), Arc::new(RouteUrlResolver::new("")));
	/// let serializer = HalModelSerializer::new(SerializerConfig::new("Person"), context);
	///
	/// let data = serializer.validate(json!({"name": "Ada"}), false).unwrap();
	/// assert_eq!(data.get("name"), Some(&json!("Ada")));
	/// assert!(serializer.validate(json!({}), false).is_err());
	/// ```
	pub fn validate(&self, raw: Value, partial: bool) -> Result<ValidatedData> {
		let descriptor = self.descriptor()?;
		let config = self.config.for_write();
		let classification = classify(descriptor, &config);

		let Value::Object(mut body) = prepare_for_validation(raw) else {
			return Err(HalError::Validation(vec![FieldError::non_field(
				"Invalid data. Expected a dictionary.",
			)]));
		};
		// Prepared bodies always carry `_links`; both reserved sections are
		// dropped here so they never reach field validation or persistence.
		body.remove(LINKS_KEY);
		body.remove(EMBEDDED_KEY);

		let mut values = Map::new();
		let mut errors = Vec::new();
		for (name, field) in &classification.plain {
			let Some(descriptor_field) = descriptor.get_field(name) else {
				continue;
			};
			match (field, body.remove(name)) {
				(PlainField::Attribute, value) => {
					let Some(info) = descriptor_field.as_attribute() else {
						continue;
					};
					if info.read_only {
						continue;
					}
					match value {
						Some(Value::Null) if !info.nullable => {
							errors.push(FieldError::new(name, "This field may not be null."));
						}
						Some(value) => {
							values.insert(name.clone(), value);
						}
						None if info.is_required() && !partial => {
							errors.push(FieldError::new(name, "This field is required."));
						}
						None => {}
					}
				}
				(PlainField::RelationKey(relation), Some(value)) => {
					if relation.is_reverse() {
						continue;
					}
					if relation.is_many() && !value.is_array() {
						errors.push(FieldError::new(name, "Expected a list of items."));
					} else {
						values.insert(name.clone(), value);
					}
				}
				(PlainField::RelationKey(_), None) => {}
			}
		}

		if !errors.is_empty() {
			tracing::debug!(
				model = descriptor.name(),
				errors = errors.len(),
				"HAL input failed validation"
			);
			return Err(HalError::Validation(errors));
		}

		Ok(ValidatedData {
			model: descriptor.name().to_string(),
			pk_field: descriptor.pk_field().to_string(),
			values,
		})
	}
}

/// Inject an empty `_links` object into HAL input that lacks one
///
/// Clients cannot write links, so a body without `_links` must still pass
/// validation. Non-object input is returned unchanged.
///
/// # Examples
///
/// ```
/// use reinhardt_hal_serializers::prepare_for_validation;
/// use serde_json::json;
///
/// let prepared = prepare_for_validation(json!({"name": "Ada"}));
/// assert_eq!(prepared, json!({"name": "Ada", "_links": {}}));
/// ```
pub fn prepare_for_validation(raw: Value) -> Value {
	match raw {
		Value::Object(mut body) => {
			if !body.contains_key(LINKS_KEY) {
				body.insert(LINKS_KEY.to_string(), Value::Object(Map::new()));
			}
			Value::Object(body)
		}
		other => other,
	}
}

/// Attribute values that passed validation, ready for persistence
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedData {
	model: String,
	pk_field: String,
	values: Map<String, Value>,
}

impl ValidatedData {
	pub fn model(&self) -> &str {
		&self.model
	}

	pub fn get(&self, name: &str) -> Option<&Value> {
		self.values.get(name)
	}

	pub fn values(&self) -> &Map<String, Value> {
		&self.values
	}

	pub fn into_values(self) -> Map<String, Value> {
		self.values
	}

	/// Apply the values onto an existing record (update)
	pub fn apply_to(&self, record: &mut Record) {
		for (name, value) in &self.values {
			record.set(name.clone(), value.clone());
		}
	}

	/// Build a new record holding the values (create)
	pub fn into_record(self) -> Record {
		Record::from_values(self.model, self.values).with_pk_field(self.pk_field)
	}
}

/// Compose the HAL document of `instance`
///
/// Key order: `_links`, plain fields, `_embedded`.
pub(crate) fn serialize_instance(
	instance: &dyn HalInstance,
	model: &ModelDescriptor,
	config: &SerializerConfig,
	context: &HalContext,
) -> Result<Value> {
	let classification = classify(model, config);
	let mut document = Map::new();

	if !config.no_links && classification.has_links() {
		let links = render_links(instance, model, &classification, context)?;
		document.insert(LINKS_KEY.to_string(), Value::Object(links));
	}

	for (name, field) in &classification.plain {
		document.insert(name.clone(), plain_value(instance, model, name, field)?);
	}

	if config.embeds() && classification.has_embedded() {
		let embedded = render_embedded(instance, model, config, &classification, context)?;
		document.insert(EMBEDDED_KEY.to_string(), Value::Object(embedded));
	}

	Ok(Value::Object(document))
}

fn plain_value(
	instance: &dyn HalInstance,
	model: &ModelDescriptor,
	name: &str,
	field: &PlainField,
) -> Result<Value> {
	match field {
		PlainField::Attribute => Ok(instance.attribute(name).unwrap_or(Value::Null)),
		PlainField::RelationKey(_) => match instance.related(name) {
			Some(Related::One(related)) => Ok(related.map_or(Value::Null, |r| r.pk())),
			Some(Related::Many(related)) => {
				Ok(Value::Array(related.into_iter().map(|r| r.pk()).collect()))
			}
			None => Err(HalError::UnknownRelation {
				model: model.name().to_string(),
				relation: name.to_string(),
			}),
		},
	}
}
