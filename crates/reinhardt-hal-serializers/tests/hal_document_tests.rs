//! Read-path tests for HAL documents

use reinhardt_hal_core::{
	FieldDescriptor, FieldSelection, HalError, ModelDescriptor, ModelRegistry, Record,
	SerializerConfig,
};
use reinhardt_hal_serializers::{HalContext, HalModelSerializer, RouteUrlResolver};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use std::sync::Arc;

#[fixture]
fn context() -> HalContext {
	let registry = ModelRegistry::new()
		.with_model(
			ModelDescriptor::new("Person")
				.with_resource_name("people")
				.field(FieldDescriptor::attribute("id").primary_key())
				.field(FieldDescriptor::attribute("name"))
				.field(FieldDescriptor::foreign_key("address", "Address"))
				.field(FieldDescriptor::many_to_many("tags", "Tag")),
		)
		.with_model(
			ModelDescriptor::new("Address")
				.with_resource_name("addresses")
				.field(FieldDescriptor::attribute("id").primary_key())
				.field(FieldDescriptor::attribute("city"))
				.field(FieldDescriptor::attribute("zip"))
				.field(FieldDescriptor::foreign_key("country", "Country")),
		)
		.with_model(
			ModelDescriptor::new("Country")
				.with_resource_name("countries")
				.field(FieldDescriptor::attribute("id").primary_key())
				.field(FieldDescriptor::attribute("name")),
		)
		.with_model(
			ModelDescriptor::new("Tag")
				.with_resource_name("tags")
				.field(FieldDescriptor::attribute("id").primary_key())
				.field(FieldDescriptor::attribute("label")),
		);
	HalContext::new(
		Arc::new(registry),
		Arc::new(RouteUrlResolver::new("http://testserver")),
	)
}

#[fixture]
fn ada() -> Record {
	let country = Record::new("Country")
		.with("id", json!(41))
		.with("name", json!("Switzerland"));
	let address = Record::new("Address")
		.with("id", json!(7))
		.with("city", json!("Basel"))
		.with("zip", json!("4051"))
		.with_one("country", Some(country));
	Record::new("Person")
		.with("id", json!(1))
		.with("name", json!("Ada"))
		.with_one("address", Some(address))
		.with_many(
			"tags",
			vec![
				Record::new("Tag").with("id", json!(3)).with("label", json!("math")),
				Record::new("Tag").with("id", json!(2)).with("label", json!("poetry")),
			],
		)
}

fn serializer(context: HalContext, config: SerializerConfig) -> HalModelSerializer {
	HalModelSerializer::new(config, context)
}

fn keys(value: &Value) -> Vec<&str> {
	value
		.as_object()
		.map(|map| map.keys().map(String::as_str).collect())
		.unwrap_or_default()
}

#[rstest]
fn test_depth_zero_links_every_relation(context: HalContext, ada: Record) {
	let document = serializer(context, SerializerConfig::new("Person"))
		.serialize(&ada)
		.unwrap();

	assert_eq!(
		document,
		json!({
			"_links": {
				"self": "http://testserver/people/1/",
				"address": "http://testserver/addresses/7/",
				"tags": "http://testserver/tags/"
			},
			"id": 1,
			"name": "Ada"
		})
	);
	assert_eq!(keys(&document), vec!["_links", "id", "name"]);
}

#[rstest]
fn test_declared_fields_document(context: HalContext, ada: Record) {
	let config = SerializerConfig::new("Person").with_fields(["name"]);
	let document = serializer(context, config).serialize(&ada).unwrap();

	assert_eq!(
		document,
		json!({
			"_links": {
				"self": "http://testserver/people/1/",
				"address": "http://testserver/addresses/7/"
			},
			"id": 1,
			"name": "Ada"
		})
	);
}

#[rstest]
fn test_depth_one_embeds_relations_one_level(context: HalContext, ada: Record) {
	let config = SerializerConfig::new("Person").with_depth(1);
	let document = serializer(context, config).serialize(&ada).unwrap();

	assert_eq!(keys(&document), vec!["_links", "id", "name", "_embedded"]);
	assert_eq!(keys(&document["_links"]), vec!["self"]);

	let address = &document["_embedded"]["address"];
	assert_eq!(
		address,
		&json!({
			"_links": {
				"self": "http://testserver/addresses/7/",
				"country": "http://testserver/countries/41/"
			},
			"id": 7,
			"city": "Basel",
			"zip": "4051"
		})
	);
	assert!(address.get("_embedded").is_none());

	let tags = document["_embedded"]["tags"].as_array().unwrap();
	let labels: Vec<_> = tags.iter().map(|t| t["label"].clone()).collect();
	assert_eq!(labels, vec![json!("math"), json!("poetry")]);
}

#[rstest]
fn test_depth_two_recurses(context: HalContext, ada: Record) {
	let config = SerializerConfig::new("Person").with_depth(2);
	let document = serializer(context, config).serialize(&ada).unwrap();

	let address = &document["_embedded"]["address"];
	assert_eq!(keys(&address["_links"]), vec!["self"]);
	assert_eq!(address["_embedded"]["country"]["name"], "Switzerland");
}

#[rstest]
fn test_nested_override_narrows_child(context: HalContext, ada: Record) {
	let config = SerializerConfig::new("Person")
		.with_fields(["name", "address"])
		.with_nested(
			"address",
			FieldSelection::from_fields(["city"])
				.with_nested("country", FieldSelection::from_fields(["name"])),
		);
	let document = serializer(context, config).serialize(&ada).unwrap();

	assert_eq!(keys(&document["_links"]), vec!["self"]);
	assert_eq!(
		document["_embedded"]["address"],
		json!({
			"_links": {"self": "http://testserver/addresses/7/"},
			"id": 7,
			"city": "Basel",
			"_embedded": {
				"country": {
					"_links": {"self": "http://testserver/countries/41/"},
					"id": 41,
					"name": "Switzerland"
				}
			}
		})
	);
}

#[rstest]
fn test_override_without_declared_fields_keeps_other_links(context: HalContext, ada: Record) {
	let config = SerializerConfig::new("Person").with_nested("tags", FieldSelection::from_fields(["label"]));
	let document = serializer(context, config).serialize(&ada).unwrap();

	assert_eq!(keys(&document["_links"]), vec!["self", "address"]);
	assert_eq!(document["_embedded"]["tags"][1]["label"], "poetry");
	assert!(document["_embedded"].get("address").is_none());
}

#[rstest]
#[case(SerializerConfig::new("Person").with_no_links(true))]
#[case(SerializerConfig::new("Person").with_no_links(true).with_depth(2))]
#[case(SerializerConfig::new("Person").with_no_links(true).with_fields(["name"]))]
fn test_no_links_never_emits_links(context: HalContext, ada: Record, #[case] config: SerializerConfig) {
	let document = serializer(context, config).serialize(&ada).unwrap();

	fn assert_no_links(value: &Value) {
		match value {
			Value::Object(map) => {
				assert!(!map.contains_key("_links"));
				map.values().for_each(assert_no_links);
			}
			Value::Array(items) => items.iter().for_each(assert_no_links),
			_ => {}
		}
	}
	assert_no_links(&document);
}

#[rstest]
fn test_no_links_renders_relation_keys(context: HalContext, ada: Record) {
	let config = SerializerConfig::new("Person").with_no_links(true);
	let document = serializer(context, config).serialize(&ada).unwrap();

	assert_eq!(
		document,
		json!({"id": 1, "name": "Ada", "address": 7, "tags": [3, 2]})
	);
}

#[rstest]
fn test_empty_to_one_relation(context: HalContext) {
	let lonely = Record::new("Person")
		.with("id", json!(9))
		.with("name", json!("Lonely"))
		.with_one("address", None)
		.with_many("tags", Vec::new());

	let linked = serializer(context.clone(), SerializerConfig::new("Person"))
		.serialize(&lonely)
		.unwrap();
	assert_eq!(linked["_links"]["address"], Value::Null);

	let embedded = serializer(context, SerializerConfig::new("Person").with_depth(1))
		.serialize(&lonely)
		.unwrap();
	assert_eq!(embedded["_embedded"], json!({"address": null, "tags": []}));
}

#[rstest]
fn test_missing_relation_data_is_internal_error(context: HalContext) {
	let partial = Record::new("Person").with("id", json!(1)).with("name", json!("Ada"));
	let err = serializer(context, SerializerConfig::new("Person"))
		.serialize(&partial)
		.unwrap_err();

	assert!(matches!(err, HalError::UnknownRelation { ref relation, .. } if relation == "address"));
	assert_eq!(err.status_code(), 500);
}

#[rstest]
fn test_unknown_model_is_internal_error(context: HalContext, ada: Record) {
	let err = serializer(context, SerializerConfig::new("Ghost"))
		.serialize(&ada)
		.unwrap_err();
	assert!(matches!(err, HalError::UnknownModel(_)));
}

#[rstest]
fn test_serialize_many_keeps_order(context: HalContext, ada: Record) {
	let grace = Record::new("Person")
		.with("id", json!(2))
		.with("name", json!("Grace"))
		.with_one("address", None)
		.with_many("tags", Vec::new());
	let documents = serializer(context, SerializerConfig::new("Person").with_fields(["name"]))
		.serialize_many(&[grace, ada])
		.unwrap();

	let names: Vec<_> = documents.iter().map(|d| d["name"].clone()).collect();
	assert_eq!(names, vec![json!("Grace"), json!("Ada")]);
}
