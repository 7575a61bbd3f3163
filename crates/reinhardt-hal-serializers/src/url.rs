//! Hyperlink construction
//!
//! The serializers only need two things from the routing layer: the URL of a
//! single resource and the URL of a resource collection. [`UrlResolver`]
//! abstracts that so routers can plug in without a dependency cycle.

use reinhardt_hal_core::{HalError, Result};
use serde_json::Value;

/// URL resolution capability
///
/// # Example
///
/// ```
/// use reinhardt_hal_serializers::UrlResolver;
///
/// struct ApiResolver;
///
/// impl UrlResolver for ApiResolver {
///     fn build_url(&self, resource: &str, pk: &str) -> Result<String, String> {
///         Ok(format!("https://api.example.com/{}/{}", resource, pk))
///     }
///
///     fn build_collection_url(&self, resource: &str) -> Result<String, String> {
///         Ok(format!("https://api.example.com/{}", resource))
///     }
/// }
/// ```
pub trait UrlResolver: Send + Sync {
	/// URL of one instance of `resource`
	fn build_url(&self, resource: &str, pk: &str) -> std::result::Result<String, String>;

	/// URL of the `resource` collection endpoint
	fn build_collection_url(&self, resource: &str) -> std::result::Result<String, String>;
}

/// Route-pattern resolver: `{base_url}/{resource}/{pk}/`
///
/// # Examples
///
/// ```
/// use reinhardt_hal_serializers::{RouteUrlResolver, UrlResolver};
///
/// let resolver = RouteUrlResolver::new("http://testserver/api/");
/// assert_eq!(resolver.build_url("people", "1").unwrap(), "http://testserver/api/people/1/");
/// assert_eq!(resolver.build_collection_url("tags").unwrap(), "http://testserver/api/tags/");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteUrlResolver {
	base_url: String,
}

impl RouteUrlResolver {
	pub fn new(base_url: impl Into<String>) -> Self {
		let base_url: String = base_url.into();
		Self {
			base_url: base_url.trim_end_matches('/').to_string(),
		}
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}
}

impl UrlResolver for RouteUrlResolver {
	fn build_url(&self, resource: &str, pk: &str) -> std::result::Result<String, String> {
		if resource.is_empty() {
			return Err(String::from("empty resource name"));
		}
		Ok(format!("{}/{}/{}/", self.base_url, resource, pk))
	}

	fn build_collection_url(&self, resource: &str) -> std::result::Result<String, String> {
		if resource.is_empty() {
			return Err(String::from("empty resource name"));
		}
		Ok(format!("{}/{}/", self.base_url, resource))
	}
}

/// Render a primary key as a URL path segment
///
/// Strings are used verbatim, numbers and booleans through their JSON text.
/// Unsaved instances (`null` key) cannot be linked.
pub(crate) fn pk_segment(resource: &str, pk: &Value) -> Result<String> {
	match pk {
		Value::String(s) => Ok(s.clone()),
		Value::Number(n) => Ok(n.to_string()),
		Value::Bool(b) => Ok(b.to_string()),
		Value::Null => Err(HalError::UrlResolution {
			resource: resource.to_string(),
			message: String::from("Instance has no primary key"),
		}),
		other => Err(HalError::UrlResolution {
			resource: resource.to_string(),
			message: format!("Unsupported primary key value: {}", other),
		}),
	}
}

/// Build an instance URL, mapping resolver failures to [`HalError`]
pub(crate) fn instance_url(resolver: &dyn UrlResolver, resource: &str, pk: &Value) -> Result<String> {
	let segment = pk_segment(resource, pk)?;
	resolver
		.build_url(resource, &segment)
		.map_err(|message| HalError::UrlResolution {
			resource: resource.to_string(),
			message,
		})
}

/// Build a collection URL, mapping resolver failures to [`HalError`]
pub(crate) fn collection_url(resolver: &dyn UrlResolver, resource: &str) -> Result<String> {
	resolver
		.build_collection_url(resource)
		.map_err(|message| HalError::UrlResolution {
			resource: resource.to_string(),
			message,
		})
}
