//! HAL model viewset
//!
//! Picks the serializer for each request from the `fields` query parameter
//! and turns serializer results into `application/hal+json` responses.

use crate::media::{HAL_JSON, HalJsonParser, HalJsonRenderer};
use crate::settings::HalSettings;
use bytes::Bytes;
use http::header::{CONTENT_TYPE, LOCATION};
use http::{HeaderMap, HeaderValue, Request, Response, StatusCode};
use reinhardt_hal_core::selection::parse_with_mode;
use reinhardt_hal_core::{
	FieldSelection, HalError, HalInstance, Result, SELF_LINK, SerializerConfig,
};
use reinhardt_hal_serializers::{
	HalModelSerializer, HalPaginationSerializer, LINKS_KEY, Paginator, ValidatedData,
};
use serde_json::Value;
use std::borrow::Cow;

/// CRUD actions of a HAL model resource
///
/// The viewset holds the statically declared serializer and never modifies
/// it. Persistence is left to the caller, which receives validated data and
/// returns the stored instance.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use http::Request;
/// use reinhardt_hal_core::{FieldDescriptor, ModelDescriptor, ModelRegistry, Record, SerializerConfig};
/// use reinhardt_hal_serializers::{HalContext, HalModelSerializer, RouteUrlResolver};
/// use reinhardt_hal_viewsets::{HalModelViewSet, HalSettings};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let registry = ModelRegistry::new().with_model(
///     ModelDescriptor::new("Person")
///         .with_resource_name("people")
///         .field(FieldDescriptor::attribute("id").primary_key())
///         .field(FieldDescriptor::attribute("name"))
///         .field(FieldDescriptor::attribute("email")),
/// );
/// let context = HalContext::new(Arc::new(registry), Arc::new(RouteUrlResolver::new("")));
/// let viewset = HalModelViewSet::new(
///     "people",
///     HalModelSerializer::new(SerializerConfig::new("Person"), context),
///     HalSettings::default(),
/// );
///
/// let ada = Record::new("Person")
///     .with("id", json!(1))
///     .with("name", json!("Ada"))
///     .with("email", json!("ada@example.com"));
/// let request = Request::get("/people/1/?fields=name").body(Bytes::new()).unwrap();
/// let response = viewset.retrieve(&request, &ada).unwrap();
///
/// let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
/// assert_eq!(body, json!({"_links": {"self": "/people/1/"}, "id": 1, "name": "Ada"}));
/// ```
#[derive(Debug, Clone)]
pub struct HalModelViewSet {
	basename: String,
	serializer: HalModelSerializer,
	settings: HalSettings,
}

impl HalModelViewSet {
	pub fn new(
		basename: impl Into<String>,
		serializer: HalModelSerializer,
		settings: HalSettings,
	) -> Self {
		Self {
			basename: basename.into(),
			serializer,
			settings,
		}
	}

	pub fn basename(&self) -> &str {
		&self.basename
	}

	/// The declared serializer
	pub fn serializer(&self) -> &HalModelSerializer {
		&self.serializer
	}

	pub fn settings(&self) -> &HalSettings {
		&self.settings
	}

	/// Field selection carried by the request, if any
	///
	/// An empty `fields` value counts as no selection.
	pub fn selection<B>(&self, request: &Request<B>) -> Result<Option<FieldSelection>> {
		let Some(expression) = query_param(request, &self.settings.fields_param)?
			.filter(|expression| !expression.is_empty())
		else {
			return Ok(None);
		};
		parse_with_mode(&expression, self.settings.selection_mode)
			.map(Some)
			.inspect_err(|err| {
				tracing::warn!(viewset = %self.basename, error = %err, "rejected field selection");
			})
	}

	/// Serializer answering `request`
	///
	/// Without a field selection the declared serializer is returned as is.
	/// Otherwise a derived one is built: the selection replaces the declared
	/// fields and nested overrides, exclusions are dropped, depth is reset to
	/// zero and `no_links` is kept.
	pub fn serializer_for<B>(&self, request: &Request<B>) -> Result<Cow<'_, HalModelSerializer>> {
		let Some(selection) = self.selection(request)? else {
			return Ok(Cow::Borrowed(&self.serializer));
		};
		let base = self.serializer.config();
		let config = SerializerConfig::from_selection(base.model.clone(), &selection)
			.with_no_links(base.no_links);
		tracing::debug!(
			viewset = %self.basename,
			fields = ?config.fields,
			nested = ?config.nested_fields.keys().collect::<Vec<_>>(),
			"derived serializer from field selection"
		);
		Ok(Cow::Owned(self.serializer.with_config(config)))
	}

	/// `GET` on one instance
	pub fn retrieve<B>(&self, request: &Request<B>, instance: &dyn HalInstance) -> Result<Response<Bytes>> {
		let document = self.serializer_for(request)?.serialize(instance)?;
		hal_response(StatusCode::OK, &document, HeaderMap::new())
	}

	/// `GET` on the collection, paginated with the `page` parameter
	pub fn list<B, T: HalInstance>(&self, request: &Request<B>, items: &[T]) -> Result<Response<Bytes>> {
		let serializer = self.serializer_for(request)?;
		let number = match query_param(request, &self.settings.page_param)? {
			Some(raw) => raw.parse::<usize>().map_err(|_| HalError::InvalidPage(raw))?,
			None => 1,
		};
		let page = Paginator::new(self.settings.page_size).page(items, number)?;
		let request_url = format!("{}{}", self.settings.base_url, request_target(request));
		let document = HalPaginationSerializer::new(self.settings.page_param.as_str())
			.serialize(&page, &request_url, &serializer)?;
		hal_response(StatusCode::OK, &document, HeaderMap::new())
	}

	/// `POST` on the collection
	///
	/// The body is always validated by the declared serializer; a field
	/// selection only shapes the response. Answers `201 Created` with a
	/// `Location` header pointing at the new instance.
	pub fn create<F, R>(&self, request: &Request<Bytes>, persist: F) -> Result<Response<Bytes>>
	where
		F: FnOnce(ValidatedData) -> Result<R>,
		R: HalInstance,
	{
		let response_serializer = self.serializer_for(request)?;
		let data = self.validated(request, false)?;
		let created = persist(data)?;
		let document = response_serializer.serialize(&created)?;
		let headers = self.success_headers(&document);
		tracing::info!(viewset = %self.basename, pk = %created.pk(), "created instance");
		hal_response(StatusCode::CREATED, &document, headers)
	}

	/// `PUT` on one instance
	pub fn update<F, R>(&self, request: &Request<Bytes>, persist: F) -> Result<Response<Bytes>>
	where
		F: FnOnce(ValidatedData) -> Result<R>,
		R: HalInstance,
	{
		self.save(request, false, persist)
	}

	/// `PATCH` on one instance
	pub fn partial_update<F, R>(&self, request: &Request<Bytes>, persist: F) -> Result<Response<Bytes>>
	where
		F: FnOnce(ValidatedData) -> Result<R>,
		R: HalInstance,
	{
		self.save(request, true, persist)
	}

	fn save<F, R>(&self, request: &Request<Bytes>, partial: bool, persist: F) -> Result<Response<Bytes>>
	where
		F: FnOnce(ValidatedData) -> Result<R>,
		R: HalInstance,
	{
		let response_serializer = self.serializer_for(request)?;
		let data = self.validated(request, partial)?;
		let saved = persist(data)?;
		let document = response_serializer.serialize(&saved)?;
		hal_response(StatusCode::OK, &document, HeaderMap::new())
	}

	fn validated(&self, request: &Request<Bytes>, partial: bool) -> Result<ValidatedData> {
		let body = HalJsonParser.parse(request.body())?;
		self.serializer.validate(body, partial).inspect_err(|err| {
			tracing::debug!(viewset = %self.basename, error = %err, "request body rejected");
		})
	}

	/// `Location` header taken from the `self` link of a document
	///
	/// Empty when the document has no string `self` link.
	pub fn success_headers(&self, document: &Value) -> HeaderMap {
		let mut headers = HeaderMap::new();
		if let Some(url) = document
			.get(LINKS_KEY)
			.and_then(|links| links.get(SELF_LINK))
			.and_then(Value::as_str)
			&& let Ok(value) = HeaderValue::from_str(url)
		{
			headers.insert(LOCATION, value);
		}
		headers
	}

	/// Render a failed action
	pub fn error_response(&self, error: &HalError) -> Response<Bytes> {
		if error.is_client_error() {
			tracing::debug!(viewset = %self.basename, error = %error, "client error");
		} else {
			tracing::error!(viewset = %self.basename, error = %error, "request failed");
		}
		let status = StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
		let body = HalJsonRenderer
			.render(&error.to_json())
			.unwrap_or_else(|_| Bytes::from_static(b"{}"));
		build_response(status, body, HeaderMap::new())
	}

	/// Collapse an action result into a response
	pub fn respond(&self, result: Result<Response<Bytes>>) -> Response<Bytes> {
		result.unwrap_or_else(|err| self.error_response(&err))
	}
}

fn query_param<B>(request: &Request<B>, name: &str) -> Result<Option<String>> {
	let Some(query) = request.uri().query() else {
		return Ok(None);
	};
	let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)
		.map_err(|e| HalError::Parse(format!("Malformed query string - {}", e)))?;
	Ok(pairs.into_iter().find(|(key, _)| key == name).map(|(_, value)| value))
}

fn request_target<B>(request: &Request<B>) -> &str {
	request
		.uri()
		.path_and_query()
		.map(|pq| pq.as_str())
		.unwrap_or("/")
}

fn hal_response(status: StatusCode, document: &Value, headers: HeaderMap) -> Result<Response<Bytes>> {
	Ok(build_response(status, HalJsonRenderer.render(document)?, headers))
}

fn build_response(status: StatusCode, body: Bytes, headers: HeaderMap) -> Response<Bytes> {
	let mut response = Response::new(body);
	*response.status_mut() = status;
	*response.headers_mut() = headers;
	response
		.headers_mut()
		.insert(CONTENT_TYPE, HeaderValue::from_static(HAL_JSON));
	response
}
