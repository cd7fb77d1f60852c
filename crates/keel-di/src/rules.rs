//! Custom resolution rules
//!
//! A rule is consulted only after direct, alias and fallback resolution have
//! failed. Its predicate is tested against the requested name; the first
//! matching rule supplies either another name to resolve or a builder that
//! produces a source for the requested name.

use crate::source::DependencySource;
use crate::{DiResult, Value};
use std::sync::Arc;

pub(crate) type RuleTest = Arc<dyn Fn(&str) -> bool + Send + Sync>;
pub(crate) type SourceBuilder = Arc<dyn Fn(&str) -> Box<dyn DependencySource> + Send + Sync>;

/// What a matching rule resolves to.
#[derive(Clone)]
pub(crate) enum RuleTarget {
	/// Resolve this name instead.
	Name(String),
	/// Build a source for the requested name.
	Build(SourceBuilder),
}

#[derive(Clone)]
pub(crate) struct Rule {
	pub(crate) test: RuleTest,
	pub(crate) target: RuleTarget,
}

impl Rule {
	pub(crate) fn matches(&self, name: &str) -> bool {
		(self.test)(name)
	}
}

/// Adapter the repository keeps per (builder rule, requested name).
///
/// The builder runs on first use, so merely checking that the dependency
/// exists never invokes it.
pub(crate) struct RuleSource {
	requested: String,
	builder: SourceBuilder,
	inner: Option<Box<dyn DependencySource>>,
}

impl RuleSource {
	pub(crate) fn new(requested: impl Into<String>, builder: SourceBuilder) -> Self {
		Self {
			requested: requested.into(),
			builder,
			inner: None,
		}
	}

	fn inner(&mut self) -> &mut Box<dyn DependencySource> {
		let builder = &self.builder;
		let requested = &self.requested;
		self.inner.get_or_insert_with(|| {
			tracing::debug!(name = %requested, "Building source from resolution rule");
			builder(requested)
		})
	}
}

impl DependencySource for RuleSource {
	fn get(&mut self) -> DiResult<Value> {
		self.inner().get()
	}

	fn get_all(&mut self) -> DiResult<Vec<Value>> {
		self.inner().get_all()
	}

	fn has(&mut self) -> bool {
		self.inner().has()
	}
}

impl std::fmt::Debug for RuleSource {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RuleSource")
			.field("requested", &self.requested)
			.field("built", &self.inner.is_some())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::source::ValueSource;
	use rstest::rstest;
	use std::sync::atomic::{AtomicUsize, Ordering};

	#[rstest]
	fn test_rule_source_builds_lazily_once() {
		// Arrange
		let calls = Arc::new(AtomicUsize::new(0));
		let counter = calls.clone();
		let builder: SourceBuilder = Arc::new(move |name: &str| {
			counter.fetch_add(1, Ordering::SeqCst);
			Box::new(ValueSource::new(Value::new(name.to_uppercase()))) as Box<dyn DependencySource>
		});
		let mut source = RuleSource::new("$first_name", builder);
		assert_eq!(calls.load(Ordering::SeqCst), 0);

		// Act
		let first = source.get().unwrap();
		let second = source.get().unwrap();

		// Assert
		assert_eq!(first.downcast_ref::<String>().unwrap(), "$FIRST_NAME");
		assert!(Value::ptr_eq(&first, &second));
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}
}
