//! Serializer configuration
//!
//! The HAL counterpart of a serializer's `Meta` options. A configuration is a
//! plain value: the dispatcher derives request-scoped copies from a shared
//! base instead of mutating it.

use crate::selection::FieldSelection;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Name of the identity link inside `_links`
pub const SELF_LINK: &str = "self";

/// Options driving a HAL serializer
///
/// # Examples
///
/// ```
/// use reinhardt_hal_core::SerializerConfig;
///
/// let config = SerializerConfig::new("Person")
///     .with_fields(["name", "address"])
///     .with_exclude(["address"])
///     .with_depth(1);
///
/// assert!(config.is_field_included("name"));
/// // Exclusion always wins over `fields`
/// assert!(!config.is_field_included("address"));
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializerConfig {
	/// Model name in the registry
	pub model: String,
	/// Declared fields, empty means every model field
	pub fields: Vec<String>,
	/// Fields dropped after classification
	pub exclude: Vec<String>,
	/// Levels of relations embedded automatically
	pub depth: usize,
	/// Per-relation sub-selections that force embedding
	pub nested_fields: IndexMap<String, FieldSelection>,
	/// Suppress hyperlink generation entirely
	pub no_links: bool,
}

impl SerializerConfig {
	pub fn new(model: impl Into<String>) -> Self {
		Self {
			model: model.into(),
			..Self::default()
		}
	}

	pub fn with_fields<I, S>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.fields = fields.into_iter().map(Into::into).collect();
		self
	}

	pub fn with_exclude<I, S>(mut self, exclude: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.exclude = exclude.into_iter().map(Into::into).collect();
		self
	}

	pub fn with_depth(mut self, depth: usize) -> Self {
		self.depth = depth;
		self
	}

	/// Add a nested-field override for one relation
	pub fn with_nested(mut self, relation: impl Into<String>, selection: FieldSelection) -> Self {
		self.nested_fields.insert(relation.into(), selection);
		self
	}

	pub fn with_nested_fields(mut self, nested_fields: IndexMap<String, FieldSelection>) -> Self {
		self.nested_fields = nested_fields;
		self
	}

	pub fn with_no_links(mut self, no_links: bool) -> Self {
		self.no_links = no_links;
		self
	}

	/// Configuration mirroring a client selection
	///
	/// Declared fields become the flat names plus the nested relation names
	/// and the nested map becomes the override table. Exclusions are dropped.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_hal_core::{SerializerConfig, selection::parse};
	///
	/// let config = SerializerConfig::from_selection("Person", &parse("name,address.fields(city)"));
	/// assert_eq!(config.fields, vec!["name", "address"]);
	/// assert!(config.nested_fields.contains_key("address"));
	/// ```
	pub fn from_selection(model: impl Into<String>, selection: &FieldSelection) -> Self {
		Self::new(model)
			.with_fields(selection.field_names())
			.with_nested_fields(selection.nested.clone())
	}

	/// Declared fields with the identity fields prepended
	///
	/// Empty when nothing is declared. Otherwise `pk_field` comes first and
	/// `self` second, unless links are disabled.
	pub fn declared_fields(&self, pk_field: &str) -> Vec<String> {
		if self.fields.is_empty() {
			return Vec::new();
		}
		let mut declared = self.fields.clone();
		if !self.no_links && !declared.iter().any(|f| f == SELF_LINK) {
			declared.insert(0, SELF_LINK.to_string());
		}
		if !declared.iter().any(|f| f == pk_field) {
			declared.insert(0, pk_field.to_string());
		}
		declared
	}

	pub fn is_excluded(&self, field_name: &str) -> bool {
		self.exclude.iter().any(|f| f == field_name)
	}

	/// Check if a field survives `fields` and `exclude`
	pub fn is_field_included(&self, field_name: &str) -> bool {
		if self.is_excluded(field_name) {
			return false;
		}
		self.fields.is_empty() || self.fields.iter().any(|f| f == field_name)
	}

	/// Whether an `_embedded` section can appear at all
	pub fn embeds(&self) -> bool {
		self.depth > 0 || !self.nested_fields.is_empty()
	}

	/// Copy used on the write path, where nested overrides do not apply
	pub fn for_write(&self) -> Self {
		Self {
			nested_fields: IndexMap::new(),
			..self.clone()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_declared_fields_prepends_identity() {
		let config = SerializerConfig::new("Person").with_fields(["name"]);
		assert_eq!(config.declared_fields("id"), vec!["id", "self", "name"]);
	}

	#[rstest]
	fn test_declared_fields_keeps_explicit_positions() {
		let config = SerializerConfig::new("Person").with_fields(["name", "self", "id"]);
		assert_eq!(config.declared_fields("id"), vec!["name", "self", "id"]);
	}

	#[rstest]
	fn test_declared_fields_without_links() {
		let config = SerializerConfig::new("Person")
			.with_fields(["name"])
			.with_no_links(true);
		assert_eq!(config.declared_fields("pk"), vec!["pk", "name"]);
	}

	#[rstest]
	fn test_declared_fields_empty_means_all() {
		assert!(SerializerConfig::new("Person").declared_fields("id").is_empty());
	}

	#[rstest]
	fn test_embeds() {
		assert!(!SerializerConfig::new("Person").embeds());
		assert!(SerializerConfig::new("Person").with_depth(1).embeds());
		assert!(
			SerializerConfig::new("Person")
				.with_nested("address", FieldSelection::from_fields(["city"]))
				.embeds()
		);
	}

	#[rstest]
	fn test_for_write_drops_overrides_only() {
		let config = SerializerConfig::new("Person")
			.with_depth(2)
			.with_nested("address", FieldSelection::new());
		let write = config.for_write();
		assert!(write.nested_fields.is_empty());
		assert_eq!(write.depth, 2);
		assert_eq!(config.nested_fields.len(), 1);
	}
}
