//! HAL settings
//!
//! Loaded from the `[hal]` table of a TOML settings file or built in code.
//!
//! ```toml
//! [hal]
//! base_url = "https://api.example.com"
//! fields_param = "fields"
//! page_size = 50
//! selection_mode = "strict"
//! ```

use reinhardt_hal_core::SelectionMode;
use reinhardt_hal_serializers::RouteUrlResolver;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors raised while loading settings
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),
}

/// Settings of the HAL viewsets
///
/// # Examples
///
/// ```
/// use reinhardt_hal_viewsets::HalSettings;
/// use reinhardt_hal_core::SelectionMode;
///
/// let settings = HalSettings::from_toml_str(r#"
/// [hal]
/// page_size = 5
/// selection_mode = "strict"
/// "#).unwrap();
///
/// assert_eq!(settings.page_size, 5);
/// assert_eq!(settings.selection_mode, SelectionMode::Strict);
/// assert_eq!(settings.fields_param, "fields");
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HalSettings {
	/// Prefix of the paginated collection URLs (`self`, `next`, `previous`)
	///
	/// Item links come from the serializer's URL resolver; build it with
	/// [`url_resolver`](Self::url_resolver) so both share this prefix.
	pub base_url: String,
	/// Query parameter holding the field selection
	pub fields_param: String,
	/// Query parameter holding the page number
	pub page_param: String,
	/// Items per page of list responses
	pub page_size: usize,
	/// Treatment of malformed field selections
	pub selection_mode: SelectionMode,
}

impl Default for HalSettings {
	fn default() -> Self {
		Self {
			base_url: String::new(),
			fields_param: String::from("fields"),
			page_param: String::from("page"),
			page_size: 20,
			selection_mode: SelectionMode::Lenient,
		}
	}
}

#[derive(Deserialize)]
struct SettingsFile {
	#[serde(default)]
	hal: HalSettings,
}

impl HalSettings {
	pub fn new() -> Self {
		Self::default()
	}

	/// Parse the `[hal]` table of a TOML document; missing keys keep defaults
	pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
		let file: SettingsFile = toml::from_str(source)?;
		Ok(file.hal)
	}

	/// Read and parse a TOML settings file
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let source = std::fs::read_to_string(path.as_ref())?;
		let settings = Self::from_toml_str(&source)?;
		tracing::debug!(path = %path.as_ref().display(), "loaded HAL settings");
		Ok(settings)
	}

	/// Route resolver for item links, rooted at `base_url`
	pub fn url_resolver(&self) -> RouteUrlResolver {
		RouteUrlResolver::new(self.base_url.as_str())
	}

	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into();
		self
	}

	pub fn with_fields_param(mut self, param: impl Into<String>) -> Self {
		self.fields_param = param.into();
		self
	}

	pub fn with_page_param(mut self, param: impl Into<String>) -> Self {
		self.page_param = param.into();
		self
	}

	pub fn with_page_size(mut self, page_size: usize) -> Self {
		self.page_size = page_size;
		self
	}

	pub fn with_selection_mode(mut self, mode: SelectionMode) -> Self {
		self.selection_mode = mode;
		self
	}
}
