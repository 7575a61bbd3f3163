//! Client field selection (`?fields=name,address.fields(city,zip)`)
//!
//! ```text
//! selection   := item ("," item)*
//! item        := simpleField | nestedField
//! nestedField := identifier "." "fields" "(" selection ")"
//! simpleField := identifier
//! identifier  := [A-Za-z0-9_-]+
//! ```

use crate::error::{HalError, Result};
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static NESTED_FIELD_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_-]+)\.fields\((.*)\)$").unwrap());

static IDENTIFIER_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// How malformed selection expressions are treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
	/// Keep malformed items verbatim as field names
	#[default]
	Lenient,
	/// Reject malformed expressions with a client error
	Strict,
}

/// Parsed field selection
///
/// `fields` lists leaf requests in order, `nested` maps relation names to
/// their own sub-selection. A name lives in exactly one of the two.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSelection {
	pub fields: Vec<String>,
	pub nested: IndexMap<String, FieldSelection>,
}

impl FieldSelection {
	pub fn new() -> Self {
		Self::default()
	}

	/// Selection made only of flat fields
	pub fn from_fields<I, S>(fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut selection = Self::new();
		for field in fields {
			selection.push_field(field.into());
		}
		selection
	}

	/// Add a nested sub-selection (builder style)
	pub fn with_nested(mut self, name: impl Into<String>, selection: FieldSelection) -> Self {
		self.push_nested(name.into(), selection);
		self
	}

	fn push_field(&mut self, name: String) {
		if !self.nested.contains_key(&name) && !self.fields.contains(&name) {
			self.fields.push(name);
		}
	}

	fn push_nested(&mut self, name: String, selection: FieldSelection) {
		self.fields.retain(|f| f != &name);
		self.nested.insert(name, selection);
	}

	/// Flat names followed by nested relation names
	///
	/// This is the declared field list of a serializer built from the
	/// selection.
	pub fn field_names(&self) -> Vec<String> {
		self.fields
			.iter()
			.chain(self.nested.keys())
			.cloned()
			.collect()
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty() && self.nested.is_empty()
	}
}

/// Parse a selection expression, keeping malformed items as literal names
///
/// # Examples
///
/// ```
/// use reinhardt_hal_core::selection::parse;
///
/// let selection = parse("name,address.fields(city,zip)");
/// assert_eq!(selection.fields, vec!["name"]);
/// assert_eq!(selection.nested["address"].fields, vec!["city", "zip"]);
///
/// // Unbalanced input does not fail
/// assert_eq!(parse("a.fields(").fields, vec!["a.fields("]);
/// ```
pub fn parse(expression: &str) -> FieldSelection {
	let mut selection = FieldSelection::new();
	for item in split_top_level(expression) {
		match NESTED_FIELD_RE.captures(item) {
			Some(captures) => {
				let name = captures[1].to_string();
				let inner = parse(&captures[2]);
				selection.push_nested(name, inner);
			}
			None => selection.push_field(item.to_string()),
		}
	}
	selection
}

/// Parse a selection expression, rejecting anything outside the grammar
///
/// # Examples
///
/// ```
/// use reinhardt_hal_core::selection::parse_strict;
///
/// assert!(parse_strict("a,b.fields(c)").is_ok());
/// assert!(parse_strict("a.fields(").is_err());
/// assert!(parse_strict("a,,b").is_err());
/// ```
pub fn parse_strict(expression: &str) -> Result<FieldSelection> {
	check_balanced(expression)?;
	parse_strict_inner(expression, expression)
}

/// Parse according to `mode`
pub fn parse_with_mode(expression: &str, mode: SelectionMode) -> Result<FieldSelection> {
	match mode {
		SelectionMode::Lenient => Ok(parse(expression)),
		SelectionMode::Strict => parse_strict(expression),
	}
}

fn parse_strict_inner(expression: &str, original: &str) -> Result<FieldSelection> {
	let mut selection = FieldSelection::new();
	for item in split_top_level(expression) {
		if let Some(captures) = NESTED_FIELD_RE.captures(item) {
			let inner = parse_strict_inner(captures.get(2).map_or("", |m| m.as_str()), original)?;
			selection.push_nested(captures[1].to_string(), inner);
		} else if IDENTIFIER_RE.is_match(item) {
			selection.push_field(item.to_string());
		} else {
			let message = if item.is_empty() {
				String::from("empty field name")
			} else {
				format!("'{}' is not a valid field", item)
			};
			return Err(invalid(original, message));
		}
	}
	Ok(selection)
}

fn check_balanced(expression: &str) -> Result<()> {
	let mut depth: usize = 0;
	for c in expression.chars() {
		match c {
			'(' => depth += 1,
			')' => {
				depth = depth
					.checked_sub(1)
					.ok_or_else(|| invalid(expression, "unexpected ')'"))?;
			}
			_ => {}
		}
	}
	if depth != 0 {
		return Err(invalid(expression, "unbalanced parentheses"));
	}
	Ok(())
}

fn invalid(expression: &str, message: impl Into<String>) -> HalError {
	HalError::InvalidSelection {
		expression: expression.to_string(),
		message: message.into(),
	}
}

/// Split on commas that are not inside parentheses
///
/// Always yields at least one item, so an empty expression becomes `[""]`.
fn split_top_level(expression: &str) -> Vec<&str> {
	let mut items = Vec::new();
	let mut depth: i32 = 0;
	let mut start = 0;
	for (position, c) in expression.char_indices() {
		match c {
			'(' => depth += 1,
			')' => depth -= 1,
			',' if depth == 0 => {
				items.push(&expression[start..position]);
				start = position + 1;
			}
			_ => {}
		}
	}
	items.push(&expression[start..]);
	items
}
