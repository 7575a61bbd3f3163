//! Model descriptors and the instance capability
//!
//! The HAL layer never talks to the ORM directly. It sees models through
//! [`ModelDescriptor`]s served by a [`ModelIntrospector`], and instances
//! through the object-safe [`HalInstance`] trait.

use crate::error::{HalError, Result};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Number of related objects on the far side of a relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
	/// Foreign key or one-to-one
	One,
	/// Many-to-many or the reverse side of a foreign key
	Many,
}

/// Which model declares the relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
	/// Declared on this model
	Forward,
	/// Declared on the target model, reached through an accessor
	Reverse,
}

/// Plain attribute metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeInfo {
	pub primary_key: bool,
	pub read_only: bool,
	pub nullable: bool,
	/// Whether the ORM supplies a value when the client omits it
	pub has_default: bool,
}

impl AttributeInfo {
	/// Whether a create request must provide this attribute
	pub fn is_required(&self) -> bool {
		!(self.primary_key || self.read_only || self.nullable || self.has_default)
	}
}

/// Relation metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationInfo {
	/// Name of the target model in the registry
	pub target: String,
	pub cardinality: Cardinality,
	pub direction: Direction,
}

impl RelationInfo {
	pub fn is_many(&self) -> bool {
		self.cardinality == Cardinality::Many
	}

	pub fn is_reverse(&self) -> bool {
		self.direction == Direction::Reverse
	}
}

/// Attribute or relation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
	Attribute(AttributeInfo),
	Relation(RelationInfo),
}

/// A single model field as reported by the ORM
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
	pub name: String,
	pub kind: FieldKind,
}

impl FieldDescriptor {
	/// Create a plain attribute
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_hal_core::FieldDescriptor;
	///
	/// let field = FieldDescriptor::attribute("name").nullable();
	/// assert!(!field.is_relation());
	/// ```
	pub fn attribute(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			kind: FieldKind::Attribute(AttributeInfo::default()),
		}
	}

	/// Create a relation field
	pub fn relation(
		name: impl Into<String>,
		target: impl Into<String>,
		cardinality: Cardinality,
		direction: Direction,
	) -> Self {
		Self {
			name: name.into(),
			kind: FieldKind::Relation(RelationInfo {
				target: target.into(),
				cardinality,
				direction,
			}),
		}
	}

	/// Forward foreign key / one-to-one
	pub fn foreign_key(name: impl Into<String>, target: impl Into<String>) -> Self {
		Self::relation(name, target, Cardinality::One, Direction::Forward)
	}

	/// Forward many-to-many
	pub fn many_to_many(name: impl Into<String>, target: impl Into<String>) -> Self {
		Self::relation(name, target, Cardinality::Many, Direction::Forward)
	}

	/// Reverse side of a foreign key declared on `target`
	pub fn reverse_many(name: impl Into<String>, target: impl Into<String>) -> Self {
		Self::relation(name, target, Cardinality::Many, Direction::Reverse)
	}

	/// Reverse side of a one-to-one declared on `target`
	pub fn reverse_one(name: impl Into<String>, target: impl Into<String>) -> Self {
		Self::relation(name, target, Cardinality::One, Direction::Reverse)
	}

	/// Mark the attribute as the primary key (implies read-only)
	pub fn primary_key(self) -> Self {
		self.map_attribute(|info| {
			info.primary_key = true;
			info.read_only = true;
		})
	}

	pub fn read_only(self) -> Self {
		self.map_attribute(|info| info.read_only = true)
	}

	pub fn nullable(self) -> Self {
		self.map_attribute(|info| info.nullable = true)
	}

	pub fn with_default(self) -> Self {
		self.map_attribute(|info| info.has_default = true)
	}

	fn map_attribute(mut self, f: impl FnOnce(&mut AttributeInfo)) -> Self {
		if let FieldKind::Attribute(info) = &mut self.kind {
			f(info);
		}
		self
	}

	pub fn is_relation(&self) -> bool {
		matches!(self.kind, FieldKind::Relation(_))
	}

	pub fn as_relation(&self) -> Option<&RelationInfo> {
		match &self.kind {
			FieldKind::Relation(info) => Some(info),
			FieldKind::Attribute(_) => None,
		}
	}

	pub fn as_attribute(&self) -> Option<&AttributeInfo> {
		match &self.kind {
			FieldKind::Attribute(info) => Some(info),
			FieldKind::Relation(_) => None,
		}
	}
}

/// Read-only description of a model type
///
/// # Examples
///
/// ```
/// use reinhardt_hal_core::{FieldDescriptor, ModelDescriptor};
///
/// let person = ModelDescriptor::new("Person")
///     .with_resource_name("people")
///     .field(FieldDescriptor::attribute("id").primary_key())
///     .field(FieldDescriptor::attribute("name"))
///     .field(FieldDescriptor::foreign_key("address", "Address"));
///
/// assert_eq!(person.pk_field(), "id");
/// assert_eq!(person.relations().count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ModelDescriptor {
	name: String,
	resource_name: String,
	pk_field: String,
	fields: Vec<FieldDescriptor>,
	index: HashMap<String, usize>,
}

impl ModelDescriptor {
	/// Create an empty descriptor; the resource name defaults to the
	/// lowercased model name
	pub fn new(name: impl Into<String>) -> Self {
		let name = name.into();
		Self {
			resource_name: name.to_lowercase(),
			name,
			pk_field: String::from("id"),
			fields: Vec::new(),
			index: HashMap::new(),
		}
	}

	/// Set the URL resource name used when building hyperlinks
	pub fn with_resource_name(mut self, resource_name: impl Into<String>) -> Self {
		self.resource_name = resource_name.into();
		self
	}

	/// Append a field, keeping declaration order
	///
	/// Re-declaring a name replaces the earlier field in place.
	pub fn field(mut self, field: FieldDescriptor) -> Self {
		if field.as_attribute().is_some_and(|info| info.primary_key) {
			self.pk_field = field.name.clone();
		}
		match self.index.get(&field.name) {
			Some(&position) => self.fields[position] = field,
			None => {
				self.index.insert(field.name.clone(), self.fields.len());
				self.fields.push(field);
			}
		}
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn resource_name(&self) -> &str {
		&self.resource_name
	}

	pub fn pk_field(&self) -> &str {
		&self.pk_field
	}

	pub fn fields(&self) -> &[FieldDescriptor] {
		&self.fields
	}

	pub fn get_field(&self, name: &str) -> Option<&FieldDescriptor> {
		self.index.get(name).map(|&position| &self.fields[position])
	}

	pub fn has_field(&self, name: &str) -> bool {
		self.index.contains_key(name)
	}

	/// Relation fields in declaration order
	pub fn relations(&self) -> impl Iterator<Item = (&str, &RelationInfo)> {
		self.fields
			.iter()
			.filter_map(|f| f.as_relation().map(|info| (f.name.as_str(), info)))
	}

	/// Plain attributes in declaration order
	pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttributeInfo)> {
		self.fields
			.iter()
			.filter_map(|f| f.as_attribute().map(|info| (f.name.as_str(), info)))
	}

	pub fn relation(&self, name: &str) -> Option<&RelationInfo> {
		self.get_field(name).and_then(FieldDescriptor::as_relation)
	}
}

/// ORM capability: look up model metadata by name
pub trait ModelIntrospector: Send + Sync {
	/// Full descriptor for `model`
	fn descriptor(&self, model: &str) -> Result<&ModelDescriptor>;

	/// Ordered `(name, kind)` pairs
	fn fields(&self, model: &str) -> Result<Vec<(String, FieldKind)>> {
		Ok(self
			.descriptor(model)?
			.fields()
			.iter()
			.map(|f| (f.name.clone(), f.kind.clone()))
			.collect())
	}

	/// Relation metadata only
	fn relations(&self, model: &str) -> Result<Vec<(String, RelationInfo)>> {
		Ok(self
			.descriptor(model)?
			.relations()
			.map(|(name, info)| (name.to_string(), info.clone()))
			.collect())
	}
}

/// In-process registry of model descriptors
///
/// Built once at startup and shared read-only between requests.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
	models: IndexMap<String, ModelDescriptor>,
}

impl ModelRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a descriptor under its model name
	pub fn register(&mut self, descriptor: ModelDescriptor) {
		self.models.insert(descriptor.name().to_string(), descriptor);
	}

	/// Builder-style [`register`](Self::register)
	pub fn with_model(mut self, descriptor: ModelDescriptor) -> Self {
		self.register(descriptor);
		self
	}

	pub fn model_names(&self) -> impl Iterator<Item = &str> {
		self.models.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.models.len()
	}

	pub fn is_empty(&self) -> bool {
		self.models.is_empty()
	}
}

impl ModelIntrospector for ModelRegistry {
	fn descriptor(&self, model: &str) -> Result<&ModelDescriptor> {
		self.models
			.get(model)
			.ok_or_else(|| HalError::UnknownModel(model.to_string()))
	}
}

/// Objects reachable through a relation
pub enum Related<'a> {
	One(Option<&'a dyn HalInstance>),
	Many(Vec<&'a dyn HalInstance>),
}

/// Instance capability consumed by the serializers
pub trait HalInstance: Send + Sync {
	/// Registry name of the instance's model
	fn model_name(&self) -> &str;

	/// Primary key value (`null` for unsaved instances)
	fn pk(&self) -> Value;

	/// Value of a plain attribute
	fn attribute(&self, name: &str) -> Option<Value>;

	/// Related objects, `None` when the relation is unknown to the instance
	fn related(&self, name: &str) -> Option<Related<'_>>;
}

#[derive(Debug, Clone)]
enum RelatedRecords {
	One(Option<Box<Record>>),
	Many(Vec<Record>),
}

/// JSON-backed [`HalInstance`]
///
/// # Examples
///
/// ```
/// use reinhardt_hal_core::{HalInstance, Record};
/// use serde_json::json;
///
/// let address = Record::new("Address").with("id", json!(7)).with("city", json!("Basel"));
/// let person = Record::new("Person")
///     .with("id", json!(1))
///     .with("name", json!("Ada"))
///     .with_one("address", Some(address));
///
/// assert_eq!(person.pk(), json!(1));
/// assert!(person.related("address").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct Record {
	model: String,
	pk_field: String,
	values: Map<String, Value>,
	relations: IndexMap<String, RelatedRecords>,
}

impl Record {
	pub fn new(model: impl Into<String>) -> Self {
		Self {
			model: model.into(),
			pk_field: String::from("id"),
			values: Map::new(),
			relations: IndexMap::new(),
		}
	}

	/// Build a record from an attribute map, e.g. validated input
	pub fn from_values(model: impl Into<String>, values: Map<String, Value>) -> Self {
		Self {
			values,
			..Self::new(model)
		}
	}

	pub fn with_pk_field(mut self, pk_field: impl Into<String>) -> Self {
		self.pk_field = pk_field.into();
		self
	}

	pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
		self.values.insert(name.into(), value);
		self
	}

	pub fn with_one(mut self, name: impl Into<String>, related: Option<Record>) -> Self {
		self.relations
			.insert(name.into(), RelatedRecords::One(related.map(Box::new)));
		self
	}

	pub fn with_many(mut self, name: impl Into<String>, related: Vec<Record>) -> Self {
		self.relations
			.insert(name.into(), RelatedRecords::Many(related));
		self
	}

	pub fn set(&mut self, name: impl Into<String>, value: Value) {
		self.values.insert(name.into(), value);
	}

	pub fn values(&self) -> &Map<String, Value> {
		&self.values
	}
}

impl HalInstance for Record {
	fn model_name(&self) -> &str {
		&self.model
	}

	fn pk(&self) -> Value {
		self.values.get(&self.pk_field).cloned().unwrap_or(Value::Null)
	}

	fn attribute(&self, name: &str) -> Option<Value> {
		self.values.get(name).cloned()
	}

	fn related(&self, name: &str) -> Option<Related<'_>> {
		self.relations.get(name).map(|related| match related {
			RelatedRecords::One(record) => {
				Related::One(record.as_deref().map(|r| r as &dyn HalInstance))
			}
			RelatedRecords::Many(records) => {
				Related::Many(records.iter().map(|r| r as &dyn HalInstance).collect())
			}
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	fn person() -> ModelDescriptor {
		ModelDescriptor::new("Person")
			.field(FieldDescriptor::attribute("id").primary_key())
			.field(FieldDescriptor::attribute("name"))
			.field(FieldDescriptor::attribute("nickname").nullable())
			.field(FieldDescriptor::foreign_key("address", "Address"))
			.field(FieldDescriptor::reverse_many("tags", "Tag"))
	}

	#[rstest]
	fn test_descriptor_keeps_declaration_order() {
		let descriptor = person();
		let names: Vec<_> = descriptor.fields().iter().map(|f| f.name.as_str()).collect();
		assert_eq!(names, vec!["id", "name", "nickname", "address", "tags"]);
		assert_eq!(descriptor.resource_name(), "person");
	}

	#[rstest]
	fn test_redeclared_field_replaces_in_place() {
		let descriptor = person().field(FieldDescriptor::attribute("name").read_only());
		assert_eq!(descriptor.fields().len(), 5);
		assert!(descriptor.get_field("name").unwrap().as_attribute().unwrap().read_only);
	}

	#[rstest]
	#[case("id", false)]
	#[case("name", true)]
	#[case("nickname", false)]
	fn test_required_attributes(#[case] name: &str, #[case] required: bool) {
		let descriptor = person();
		let info = descriptor.get_field(name).unwrap().as_attribute().unwrap();
		assert_eq!(info.is_required(), required);
	}

	#[rstest]
	fn test_registry_lookup() {
		let registry = ModelRegistry::new().with_model(person());

		let relations = registry.relations("Person").unwrap();
		assert_eq!(relations.len(), 2);
		assert!(relations[1].1.is_reverse());
		assert!(matches!(
			registry.descriptor("Ghost"),
			Err(HalError::UnknownModel(name)) if name == "Ghost"
		));
	}

	#[rstest]
	fn test_record_related() {
		let record = Record::new("Person")
			.with("id", json!(3))
			.with_many(
				"tags",
				vec![Record::new("Tag").with("id", json!(1)), Record::new("Tag").with("id", json!(2))],
			)
			.with_one("address", None);

		match record.related("tags") {
			Some(Related::Many(tags)) => {
				assert_eq!(tags.iter().map(|t| t.pk()).collect::<Vec<_>>(), vec![json!(1), json!(2)]);
			}
			_ => panic!("Expected to-many relation"),
		}
		assert!(matches!(record.related("address"), Some(Related::One(None))));
		assert!(record.related("missing").is_none());
		assert_eq!(Record::new("Tag").pk(), Value::Null);
	}
}
