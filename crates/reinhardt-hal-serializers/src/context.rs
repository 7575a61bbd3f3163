//! Collaborators shared by every serializer in a process

use crate::url::UrlResolver;
use reinhardt_hal_core::{ModelDescriptor, ModelIntrospector, Result};
use std::sync::Arc;

/// Model metadata and URL resolution handed to serializers at call time
///
/// Embedded serializers look up their target models here instead of holding
/// a reference back to the serializer type that created them.
#[derive(Clone)]
pub struct HalContext {
	introspector: Arc<dyn ModelIntrospector>,
	resolver: Arc<dyn UrlResolver>,
}

impl HalContext {
	pub fn new(introspector: Arc<dyn ModelIntrospector>, resolver: Arc<dyn UrlResolver>) -> Self {
		Self {
			introspector,
			resolver,
		}
	}

	pub fn descriptor(&self, model: &str) -> Result<&ModelDescriptor> {
		self.introspector.descriptor(model)
	}

	pub fn introspector(&self) -> &dyn ModelIntrospector {
		self.introspector.as_ref()
	}

	pub fn resolver(&self) -> &dyn UrlResolver {
		self.resolver.as_ref()
	}
}

impl std::fmt::Debug for HalContext {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("HalContext").finish_non_exhaustive()
	}
}
