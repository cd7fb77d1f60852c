use super::DependencySource;
use crate::{DiResult, Value};
use std::any::Any;

type Getter = Box<dyn FnMut() -> DiResult<Value> + Send>;
type Tester = Box<dyn FnMut() -> bool + Send>;
type GetAll = Box<dyn FnMut() -> DiResult<Vec<Value>> + Send>;

/// Source driven by external callbacks.
///
/// - `get` invokes the getter
/// - `has` invokes the tester if one is set, otherwise always true
/// - `get_all` invokes the get-all callback if one is set, otherwise calls the
///   getter while the tester holds, otherwise returns a single `get`
///
/// # Examples
///
/// ```
/// use keel_di::{DependencySource, FactorySource};
///
/// let mut next = 0u32;
/// let mut ids = FactorySource::new(move || {
///     next += 1;
///     next
/// });
/// assert_eq!(ids.get().unwrap().downcast_ref::<u32>(), Some(&1));
/// assert_eq!(ids.get().unwrap().downcast_ref::<u32>(), Some(&2));
/// assert!(ids.has());
/// ```
pub struct FactorySource {
	getter: Getter,
	tester: Option<Tester>,
	get_all: Option<GetAll>,
}

impl FactorySource {
	/// Creates a source whose getter cannot fail.
	pub fn new<T, F>(mut getter: F) -> Self
	where
		T: Any + Send + Sync,
		F: FnMut() -> T + Send + 'static,
	{
		Self::try_new(move || Ok(Value::new(getter())))
	}

	/// Creates a source whose getter reports its own errors.
	pub fn try_new<F>(getter: F) -> Self
	where
		F: FnMut() -> DiResult<Value> + Send + 'static,
	{
		Self {
			getter: Box::new(getter),
			tester: None,
			get_all: None,
		}
	}

	/// Sets the callback answering `has`.
	pub fn with_tester<F>(mut self, tester: F) -> Self
	where
		F: FnMut() -> bool + Send + 'static,
	{
		self.tester = Some(Box::new(tester));
		self
	}

	/// Sets the callback answering `get_all`.
	pub fn with_get_all<T, F>(mut self, mut get_all: F) -> Self
	where
		T: Any + Send + Sync,
		F: FnMut() -> Vec<T> + Send + 'static,
	{
		self.get_all = Some(Box::new(move || {
			Ok(get_all().into_iter().map(Value::new).collect())
		}));
		self
	}
}

impl DependencySource for FactorySource {
	fn get(&mut self) -> DiResult<Value> {
		(self.getter)()
	}

	fn get_all(&mut self) -> DiResult<Vec<Value>> {
		if let Some(get_all) = self.get_all.as_mut() {
			return get_all();
		}

		if self.tester.is_none() {
			return Ok(vec![self.get()?]);
		}

		let mut values = Vec::new();
		while self.has() {
			values.push(self.get()?);
		}
		Ok(values)
	}

	fn has(&mut self) -> bool {
		match self.tester.as_mut() {
			Some(tester) => tester(),
			None => true,
		}
	}
}

impl std::fmt::Debug for FactorySource {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FactorySource")
			.field("tester", &self.tester.is_some())
			.field("get_all", &self.get_all.is_some())
			.finish()
	}
}
