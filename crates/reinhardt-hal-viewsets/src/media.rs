//! `application/hal+json` parsing and rendering
//!
//! Content negotiation is left to the router; these only encode and decode
//! bodies.

use bytes::Bytes;
use reinhardt_hal_core::{HalError, Result};
use serde_json::Value;

/// HAL media type
pub const HAL_JSON: &str = "application/hal+json";

/// Request body parser for HAL documents
#[derive(Debug, Clone, Copy, Default)]
pub struct HalJsonParser;

impl HalJsonParser {
	/// Parse a request body
	///
	/// An empty body is a parse error, not `null`.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_hal_viewsets::media::HalJsonParser;
	///
	/// let value = HalJsonParser.parse(br#"{"name": "Ada"}"#).unwrap();
	/// assert_eq!(value["name"], "Ada");
	/// assert!(HalJsonParser.parse(b"{").is_err());
	/// ```
	pub fn parse(&self, body: &[u8]) -> Result<Value> {
		if body.is_empty() {
			return Err(HalError::Parse("Empty request body".to_string()));
		}
		serde_json::from_slice(body).map_err(|e| HalError::Parse(format!("JSON parse error - {}", e)))
	}
}

/// Response renderer for HAL documents
#[derive(Debug, Clone, Copy, Default)]
pub struct HalJsonRenderer;

impl HalJsonRenderer {
	/// Render compact JSON, keeping non-ASCII characters as UTF-8
	pub fn render(&self, document: &Value) -> Result<Bytes> {
		Ok(Bytes::from(serde_json::to_vec(document)?))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_render_keeps_unicode_and_order() {
		let document = json!({"_links": {"self": "/people/1/"}, "name": "Zoë"});
		let body = HalJsonRenderer.render(&document).unwrap();
		assert_eq!(
			std::str::from_utf8(&body).unwrap(),
			r#"{"_links":{"self":"/people/1/"},"name":"Zoë"}"#
		);
	}

	#[rstest]
	#[case(b"".as_slice())]
	#[case(b"not json".as_slice())]
	#[case(b"\xff\xfe".as_slice())]
	fn test_parse_errors(#[case] body: &[u8]) {
		let err = HalJsonParser.parse(body).unwrap_err();
		assert!(matches!(err, HalError::Parse(_)));
		assert_eq!(err.status_code(), 400);
	}
}
