//! Error types shared by the HAL serializer stack

use serde::Serialize;
use thiserror::Error;

/// Result type alias for HAL operations
pub type Result<T> = std::result::Result<T, HalError>;

/// A single field-level validation failure
///
/// Collected by the write path so clients receive every failing field at
/// once instead of only the first one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
	/// Name of the offending field (`non_field_errors` for body-level problems)
	pub field: String,
	/// Human readable message
	pub message: String,
}

impl FieldError {
	/// Create a new field error
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_hal_core::FieldError;
	///
	/// let err = FieldError::new("name", "This field is required.");
	/// assert_eq!(err.field, "name");
	/// ```
	pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			field: field.into(),
			message: message.into(),
		}
	}

	/// Error that is not tied to a particular field
	pub fn non_field(message: impl Into<String>) -> Self {
		Self::new(NON_FIELD_ERRORS, message)
	}
}

/// Key used for errors that concern the whole body
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Errors raised while building or consuming HAL documents
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum HalError {
	/// A model name could not be resolved against the registry
	#[error("Unknown model: {0}")]
	UnknownModel(String),

	/// Relation metadata disappeared between classification and rendering
	#[error("Unknown relation '{relation}' on model '{model}'")]
	UnknownRelation { model: String, relation: String },

	/// The URL resolver could not build a hyperlink
	#[error("URL resolution error for '{resource}': {message}")]
	UrlResolution { resource: String, message: String },

	/// The `fields` selection expression was rejected
	#[error("Invalid field selection '{expression}': {message}")]
	InvalidSelection { expression: String, message: String },

	/// Write-path validation failed
	#[error("Validation failed: {}", format_field_errors(.0))]
	Validation(Vec<FieldError>),

	/// The request body could not be parsed
	#[error("Parse error: {0}")]
	Parse(String),

	/// Requested page is outside the result set
	#[error("Invalid page: {0}")]
	InvalidPage(String),

	/// JSON (de)serialization failure
	#[error("Serde error: {0}")]
	Serde(#[from] serde_json::Error),
}

fn format_field_errors(errors: &[FieldError]) -> String {
	errors
		.iter()
		.map(|e| format!("{}: {}", e.field, e.message))
		.collect::<Vec<_>>()
		.join("; ")
}

impl HalError {
	/// HTTP status code the framework should answer with
	///
	/// Client mistakes map to 400, everything caused by server-side metadata
	/// or collaborators maps to 500.
	pub fn status_code(&self) -> u16 {
		match self {
			HalError::InvalidSelection { .. } | HalError::Validation(_) | HalError::Parse(_) => 400,
			HalError::InvalidPage(_) => 404,
			HalError::UnknownModel(_)
			| HalError::UnknownRelation { .. }
			| HalError::UrlResolution { .. }
			| HalError::Serde(_) => 500,
		}
	}

	/// Check whether the error was caused by the client
	pub fn is_client_error(&self) -> bool {
		(400..500).contains(&self.status_code())
	}

	/// Field-level details, if this is a validation error
	pub fn field_errors(&self) -> &[FieldError] {
		match self {
			HalError::Validation(errors) => errors,
			_ => &[],
		}
	}

	/// JSON body describing the error
	///
	/// Validation errors are grouped per field (`{"name": ["..."]}`), the
	/// rest use a single `detail` key.
	pub fn to_json(&self) -> serde_json::Value {
		match self {
			HalError::Validation(errors) => {
				let mut body = serde_json::Map::new();
				for error in errors {
					let entry = body
						.entry(error.field.clone())
						.or_insert_with(|| serde_json::Value::Array(Vec::new()));
					if let serde_json::Value::Array(messages) = entry {
						messages.push(serde_json::Value::String(error.message.clone()));
					}
				}
				serde_json::Value::Object(body)
			}
			other => serde_json::json!({ "detail": other.to_string() }),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_status_codes() {
		assert_eq!(HalError::Parse("bad".into()).status_code(), 400);
		assert_eq!(HalError::UnknownModel("Ghost".into()).status_code(), 500);
		assert_eq!(HalError::InvalidPage("9".into()).status_code(), 404);
		assert!(
			HalError::InvalidSelection {
				expression: "a(".into(),
				message: "unbalanced".into(),
			}
			.is_client_error()
		);
	}

	#[rstest]
	fn test_validation_error_json_groups_by_field() {
		let err = HalError::Validation(vec![
			FieldError::new("name", "This field is required."),
			FieldError::new("name", "Too short."),
			FieldError::non_field("Expected an object."),
		]);

		let body = err.to_json();
		assert_eq!(body["name"].as_array().unwrap().len(), 2);
		assert_eq!(body[NON_FIELD_ERRORS][0], "Expected an object.");
		assert!(err.to_string().contains("name: This field is required."));
	}
}
