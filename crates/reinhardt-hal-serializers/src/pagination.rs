//! Paginated HAL collections
//!
//! A page is itself a HAL document: `_links` carries `self`, `next` and
//! `previous`, the counters are plain fields and the page items sit under
//! `_embedded` as a list.

use crate::model_serializer::{EMBEDDED_KEY, HalModelSerializer, LINKS_KEY};
use reinhardt_hal_core::{HalError, HalInstance, Result, SELF_LINK};
use serde_json::{Map, Value, json};

/// A slice of a result set
#[derive(Debug, Clone, Copy)]
pub struct Page<'a, T> {
	items: &'a [T],
	number: usize,
	page_size: usize,
	count: usize,
}

impl<'a, T> Page<'a, T> {
	pub fn items(&self) -> &'a [T] {
		self.items
	}

	/// 1-based page number
	pub fn number(&self) -> usize {
		self.number
	}

	pub fn page_size(&self) -> usize {
		self.page_size
	}

	/// Size of the whole result set
	pub fn count(&self) -> usize {
		self.count
	}

	pub fn num_pages(&self) -> usize {
		num_pages(self.count, self.page_size)
	}

	pub fn has_next(&self) -> bool {
		self.number < self.num_pages()
	}

	pub fn has_previous(&self) -> bool {
		self.number > 1
	}
}

fn num_pages(count: usize, page_size: usize) -> usize {
	count.div_ceil(page_size).max(1)
}

/// Page-number paginator
///
/// # Examples
///
/// ```
/// use reinhardt_hal_serializers::Paginator;
///
/// let items: Vec<u32> = (1..=5).collect();
/// let page = Paginator::new(2).page(&items, 3).unwrap();
///
/// assert_eq!(page.items(), &[5]);
/// assert!(!page.has_next());
/// assert!(Paginator::new(2).page(&items, 4).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
	page_size: usize,
}

impl Paginator {
	/// Create a paginator; a zero page size is treated as one
	pub fn new(page_size: usize) -> Self {
		Self {
			page_size: page_size.max(1),
		}
	}

	pub fn page_size(&self) -> usize {
		self.page_size
	}

	/// Select page `number` (1-based) of `items`
	///
	/// Page 1 of an empty result set is valid.
	pub fn page<'a, T>(&self, items: &'a [T], number: usize) -> Result<Page<'a, T>> {
		let count = items.len();
		if number == 0 || number > num_pages(count, self.page_size) {
			return Err(HalError::InvalidPage(number.to_string()));
		}
		let start = (number - 1) * self.page_size;
		let end = (start + self.page_size).min(count);
		Ok(Page {
			items: &items[start..end],
			number,
			page_size: self.page_size,
			count,
		})
	}
}

/// Serializer for [`Page`]s
#[derive(Debug, Clone)]
pub struct HalPaginationSerializer {
	page_param: String,
}

impl HalPaginationSerializer {
	pub fn new(page_param: impl Into<String>) -> Self {
		Self {
			page_param: page_param.into(),
		}
	}

	pub fn page_param(&self) -> &str {
		&self.page_param
	}

	/// Render `page` requested at `request_url`
	pub fn serialize<T: HalInstance>(
		&self,
		page: &Page<'_, T>,
		request_url: &str,
		item_serializer: &HalModelSerializer,
	) -> Result<Value> {
		let next = page
			.has_next()
			.then(|| replace_query_param(request_url, &self.page_param, &(page.number() + 1).to_string()));
		let previous = page
			.has_previous()
			.then(|| replace_query_param(request_url, &self.page_param, &(page.number() - 1).to_string()));

		let mut links = Map::new();
		links.insert(SELF_LINK.to_string(), Value::String(request_url.to_string()));
		links.insert("next".to_string(), json!(next));
		links.insert("previous".to_string(), json!(previous));

		let mut document = Map::new();
		document.insert(LINKS_KEY.to_string(), Value::Object(links));
		document.insert("count".to_string(), json!(page.count()));
		document.insert("page_size".to_string(), json!(page.page_size()));
		document.insert(
			EMBEDDED_KEY.to_string(),
			Value::Array(item_serializer.serialize_many(page.items())?),
		);
		Ok(Value::Object(document))
	}
}

impl Default for HalPaginationSerializer {
	fn default() -> Self {
		Self::new("page")
	}
}

/// Set `key=value` in the query string of `url`, keeping other parameters
///
/// # Examples
///
/// ```
/// use reinhardt_hal_serializers::pagination::replace_query_param;
///
/// assert_eq!(replace_query_param("/people/?page=2&fields=name", "page", "3"), "/people/?fields=name&page=3");
/// assert_eq!(replace_query_param("/people/", "page", "2"), "/people/?page=2");
/// ```
pub fn replace_query_param(url: &str, key: &str, value: &str) -> String {
	let (path, query) = url.split_once('?').unwrap_or((url, ""));
	let mut pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).unwrap_or_default();
	pairs.retain(|(k, _)| k != key);
	pairs.push((key.to_string(), value.to_string()));
	match serde_urlencoded::to_string(&pairs) {
		Ok(encoded) => format!("{}?{}", path, encoded),
		Err(_) => url.to_string(),
	}
}
