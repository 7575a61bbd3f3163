//! Field classification
//!
//! Decides, for one model and one [`SerializerConfig`], which fields are
//! rendered as plain attributes, which relations become `_links` entries and
//! which are embedded under `_embedded`. Both the links and the embedded
//! composers read the same [`FieldClassification`], so the three buckets
//! never disagree.

use crate::model::{ModelDescriptor, RelationInfo};
use crate::options::{SELF_LINK, SerializerConfig};
use crate::selection::FieldSelection;
use indexmap::IndexMap;

/// How a plain field is read from an instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlainField {
	/// Ordinary attribute value
	Attribute,
	/// Relation rendered as primary key(s) because links are disabled
	RelationKey(RelationInfo),
}

/// Entry of the `_links` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkField {
	/// The `self` hyperlink
	Identity,
	/// Hyperlink to a related object or collection
	Relation(RelationInfo),
}

/// Entry of the `_embedded` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedField {
	pub relation: RelationInfo,
	/// Client override for this relation, if any
	pub selection: Option<FieldSelection>,
}

/// Where a relation ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationPlacement {
	Link,
	Embedded,
	Plain,
	Excluded,
}

/// Three disjoint buckets, each in output order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldClassification {
	pub plain: IndexMap<String, PlainField>,
	pub links: IndexMap<String, LinkField>,
	pub embedded: IndexMap<String, EmbeddedField>,
}

impl FieldClassification {
	/// Placement of a field; `Excluded` when it is in no bucket
	pub fn placement(&self, name: &str) -> RelationPlacement {
		if self.links.contains_key(name) {
			RelationPlacement::Link
		} else if self.embedded.contains_key(name) {
			RelationPlacement::Embedded
		} else if self.plain.contains_key(name) {
			RelationPlacement::Plain
		} else {
			RelationPlacement::Excluded
		}
	}

	pub fn has_links(&self) -> bool {
		!self.links.is_empty()
	}

	pub fn has_embedded(&self) -> bool {
		!self.embedded.is_empty()
	}

	fn remove(&mut self, name: &str) {
		self.plain.shift_remove(name);
		self.links.shift_remove(name);
		self.embedded.shift_remove(name);
	}
}

struct Candidate<'a> {
	name: &'a str,
	/// Undeclared forward to-one relation kept only as a hyperlink
	implicit: bool,
}

/// Classify the fields of `model` under `config`
///
/// Rules, in order:
/// 1. candidates are the declared fields (with the primary key and `self`
///    prepended) or every model field when nothing is declared; reverse
///    relations must be declared explicitly
/// 2. a relation is embedded when it has a nested override or `depth > 0`,
///    otherwise it is a link; at `depth > 0` links only hold `self`
/// 3. `no_links` turns would-be links into plain primary-key fields
/// 4. `exclude` is applied last and never removes `self`
///
/// When fields are declared, undeclared forward to-one relations are still
/// offered as hyperlinks. They never become embedded or plain.
///
/// # Examples
///
/// ```
/// use reinhardt_hal_core::{FieldDescriptor, ModelDescriptor, SerializerConfig};
/// use reinhardt_hal_core::classifier::{RelationPlacement, classify};
///
/// let person = ModelDescriptor::new("Person")
///     .field(FieldDescriptor::attribute("id").primary_key())
///     .field(FieldDescriptor::attribute("name"))
///     .field(FieldDescriptor::foreign_key("address", "Address"));
///
/// let flat = classify(&person, &SerializerConfig::new("Person"));
/// assert_eq!(flat.placement("address"), RelationPlacement::Link);
///
/// let nested = classify(&person, &SerializerConfig::new("Person").with_depth(1));
/// assert_eq!(nested.placement("address"), RelationPlacement::Embedded);
/// assert_eq!(nested.links.len(), 1);
/// ```
pub fn classify(model: &ModelDescriptor, config: &SerializerConfig) -> FieldClassification {
	let mut result = FieldClassification::default();
	let declared = config.declared_fields(model.pk_field());

	if !config.no_links && (declared.is_empty() || declared.iter().any(|f| f == SELF_LINK)) {
		result
			.links
			.insert(SELF_LINK.to_string(), LinkField::Identity);
	}

	for candidate in candidates(model, &declared) {
		let Some(field) = model.get_field(candidate.name) else {
			tracing::debug!(
				model = model.name(),
				field = candidate.name,
				"declared field not found on model, ignoring"
			);
			continue;
		};

		let Some(relation) = field.as_relation() else {
			result
				.plain
				.insert(field.name.clone(), PlainField::Attribute);
			continue;
		};

		let selection = config.nested_fields.get(candidate.name);
		if selection.is_some() || config.depth > 0 {
			if candidate.implicit {
				continue;
			}
			result.embedded.insert(
				field.name.clone(),
				EmbeddedField {
					relation: relation.clone(),
					selection: selection.cloned(),
				},
			);
		} else if config.no_links {
			if !candidate.implicit {
				result
					.plain
					.insert(field.name.clone(), PlainField::RelationKey(relation.clone()));
			}
		} else {
			result
				.links
				.insert(field.name.clone(), LinkField::Relation(relation.clone()));
		}
	}

	for relation in config.nested_fields.keys() {
		if model.relation(relation).is_none() {
			tracing::warn!(
				model = model.name(),
				relation = relation.as_str(),
				"nested field override does not name a relation, ignoring"
			);
		}
	}

	for name in &config.exclude {
		if name == SELF_LINK {
			continue;
		}
		result.remove(name);
	}

	tracing::debug!(
		model = model.name(),
		depth = config.depth,
		plain = result.plain.len(),
		links = result.links.len(),
		embedded = result.embedded.len(),
		"classified serializer fields"
	);

	result
}

fn candidates<'a>(model: &'a ModelDescriptor, declared: &'a [String]) -> Vec<Candidate<'a>> {
	if declared.is_empty() {
		return model
			.fields()
			.iter()
			.map(|f| Candidate {
				name: f.name.as_str(),
				implicit: false,
			})
			.collect();
	}

	let mut candidates: Vec<Candidate<'a>> = declared
		.iter()
		.filter(|name| name.as_str() != SELF_LINK)
		.map(|name| Candidate {
			name: name.as_str(),
			implicit: false,
		})
		.collect();

	for (name, relation) in model.relations() {
		if !relation.is_many() && !relation.is_reverse() && !declared.iter().any(|d| d == name) {
			candidates.push(Candidate {
				name,
				implicit: true,
			});
		}
	}

	candidates
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::FieldDescriptor;
	use rstest::{fixture, rstest};

	#[fixture]
	fn person() -> ModelDescriptor {
		ModelDescriptor::new("Person")
			.field(FieldDescriptor::attribute("id").primary_key())
			.field(FieldDescriptor::attribute("name"))
			.field(FieldDescriptor::foreign_key("address", "Address"))
			.field(FieldDescriptor::many_to_many("tags", "Tag"))
			.field(FieldDescriptor::reverse_many("posts", "Post"))
	}

	fn keys<V>(map: &IndexMap<String, V>) -> Vec<&str> {
		map.keys().map(String::as_str).collect()
	}

	#[rstest]
	fn test_all_fields_at_depth_zero(person: ModelDescriptor) {
		let result = classify(&person, &SerializerConfig::new("Person"));

		assert_eq!(keys(&result.plain), vec!["id", "name"]);
		assert_eq!(keys(&result.links), vec!["self", "address", "tags", "posts"]);
		assert!(result.embedded.is_empty());
	}

	#[rstest]
	fn test_depth_embeds_every_relation_and_restricts_links(person: ModelDescriptor) {
		let result = classify(&person, &SerializerConfig::new("Person").with_depth(1));

		assert_eq!(keys(&result.links), vec!["self"]);
		assert_eq!(keys(&result.embedded), vec!["address", "tags", "posts"]);
		assert!(result.embedded["address"].selection.is_none());
	}

	#[rstest]
	fn test_declared_fields_keep_forward_to_one_links(person: ModelDescriptor) {
		let config = SerializerConfig::new("Person").with_fields(["name"]);
		let result = classify(&person, &config);

		assert_eq!(keys(&result.plain), vec!["id", "name"]);
		assert_eq!(keys(&result.links), vec!["self", "address"]);
		assert_eq!(result.placement("tags"), RelationPlacement::Excluded);
		assert_eq!(result.placement("posts"), RelationPlacement::Excluded);
	}

	#[rstest]
	fn test_declared_reverse_relation_is_linked(person: ModelDescriptor) {
		let config = SerializerConfig::new("Person").with_fields(["posts", "name"]);
		let result = classify(&person, &config);

		assert_eq!(keys(&result.links), vec!["self", "posts", "address"]);
		assert_eq!(keys(&result.plain), vec!["id", "name"]);
	}

	#[rstest]
	fn test_undeclared_to_one_is_not_embedded(person: ModelDescriptor) {
		let config = SerializerConfig::new("Person")
			.with_fields(["name", "tags"])
			.with_depth(1);
		let result = classify(&person, &config);

		assert_eq!(keys(&result.embedded), vec!["tags"]);
		assert_eq!(result.placement("address"), RelationPlacement::Excluded);
	}

	#[rstest]
	fn test_nested_override_embeds_only_that_relation(person: ModelDescriptor) {
		let config = SerializerConfig::new("Person")
			.with_nested("address", FieldSelection::from_fields(["city"]));
		let result = classify(&person, &config);

		assert_eq!(keys(&result.embedded), vec!["address"]);
		assert_eq!(
			result.embedded["address"].selection,
			Some(FieldSelection::from_fields(["city"]))
		);
		assert_eq!(keys(&result.links), vec!["self", "tags", "posts"]);
	}

	#[rstest]
	fn test_unknown_override_is_ignored(person: ModelDescriptor) {
		let config = SerializerConfig::new("Person").with_nested("ghost", FieldSelection::new());
		let result = classify(&person, &config);

		assert!(result.embedded.is_empty());
		assert_eq!(result.placement("ghost"), RelationPlacement::Excluded);
	}

	#[rstest]
	fn test_no_links_turns_links_into_plain_keys(person: ModelDescriptor) {
		let config = SerializerConfig::new("Person")
			.with_no_links(true)
			.with_nested("tags", FieldSelection::new());
		let result = classify(&person, &config);

		assert!(result.links.is_empty());
		assert_eq!(keys(&result.plain), vec!["id", "name", "address", "posts"]);
		assert!(matches!(result.plain["address"], PlainField::RelationKey(_)));
		assert_eq!(keys(&result.embedded), vec!["tags"]);
	}

	#[rstest]
	fn test_no_links_drops_implicit_relations(person: ModelDescriptor) {
		let config = SerializerConfig::new("Person")
			.with_fields(["name"])
			.with_no_links(true);
		let result = classify(&person, &config);

		assert_eq!(keys(&result.plain), vec!["id", "name"]);
		assert_eq!(result.placement("address"), RelationPlacement::Excluded);
	}

	#[rstest]
	fn test_exclude_applies_last_but_keeps_self(person: ModelDescriptor) {
		let config = SerializerConfig::new("Person")
			.with_fields(["name", "tags"])
			.with_exclude(["tags", "self", "name", "missing"])
			.with_depth(1);
		let result = classify(&person, &config);

		assert_eq!(keys(&result.plain), vec!["id"]);
		assert_eq!(keys(&result.links), vec!["self"]);
		assert!(result.embedded.is_empty());
	}

	#[rstest]
	#[case(SerializerConfig::new("Person"))]
	#[case(SerializerConfig::new("Person").with_depth(1))]
	#[case(SerializerConfig::new("Person").with_fields(["tags"]).with_depth(2))]
	#[case(SerializerConfig::new("Person").with_nested("posts", FieldSelection::new()))]
	#[case(SerializerConfig::new("Person").with_no_links(true))]
	#[case(SerializerConfig::new("Person").with_exclude(["address"]))]
	fn test_relations_land_in_a_single_bucket(person: ModelDescriptor, #[case] config: SerializerConfig) {
		let result = classify(&person, &config);
		for (name, _) in person.relations() {
			let buckets = [
				result.links.contains_key(name),
				result.embedded.contains_key(name),
				result.plain.contains_key(name),
			];
			assert!(buckets.iter().filter(|b| **b).count() <= 1, "{} in several buckets", name);
		}
	}
}
