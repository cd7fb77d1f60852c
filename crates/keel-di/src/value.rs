//! Type-erased dependency values

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A cheap-to-clone, type-erased value handed out by dependency sources and
/// passed as a callable argument.
///
/// A `Value` is either null or holds a shared `Arc<T>`. Cloning shares the
/// underlying allocation.
///
/// # Examples
///
/// ```
/// use keel_di::Value;
///
/// let value = Value::new(42i32);
/// assert_eq!(value.downcast_ref::<i32>(), Some(&42));
/// assert!(value.downcast_ref::<String>().is_none());
///
/// let null = Value::null();
/// assert!(null.is_null());
/// ```
#[derive(Clone)]
pub struct Value {
	inner: Option<Arc<dyn Any + Send + Sync>>,
	type_name: &'static str,
}

impl Value {
	/// Wraps `value`.
	///
	/// Passing a `Value` returns it unchanged instead of nesting it.
	pub fn new<T: Any + Send + Sync>(value: T) -> Self {
		if let Some(value) = (&value as &dyn Any).downcast_ref::<Value>() {
			return value.clone();
		}
		Self::from_arc(Arc::new(value))
	}

	/// Wraps an already shared value without re-allocating.
	pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
		Self {
			inner: Some(value),
			type_name: std::any::type_name::<T>(),
		}
	}

	/// The null value.
	pub fn null() -> Self {
		Self {
			inner: None,
			type_name: "null",
		}
	}

	/// Returns true for the null value.
	pub fn is_null(&self) -> bool {
		self.inner.is_none()
	}

	/// Returns true if the value holds a `T`.
	pub fn is<T: Any>(&self) -> bool {
		self.inner.as_ref().is_some_and(|inner| inner.is::<T>())
	}

	/// Borrows the value as `T`.
	pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
		self.inner.as_ref()?.downcast_ref::<T>()
	}

	/// Returns the shared `Arc<T>` if the value holds a `T`.
	pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
		self.inner.clone()?.downcast::<T>().ok()
	}

	/// Rust type name of the wrapped value (`"null"` for the null value).
	pub fn type_name(&self) -> &'static str {
		self.type_name
	}

	/// Returns true if both values share the same allocation, or both are null.
	pub fn ptr_eq(a: &Value, b: &Value) -> bool {
		match (&a.inner, &b.inner) {
			(Some(a), Some(b)) => Arc::ptr_eq(a, b),
			(None, None) => true,
			_ => false,
		}
	}
}

impl Default for Value {
	fn default() -> Self {
		Self::null()
	}
}

impl fmt::Debug for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Value({})", self.type_name)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_new_wraps_value() {
		let value = Value::new("John".to_string());

		assert!(value.is::<String>());
		assert_eq!(value.downcast_ref::<String>().unwrap(), "John");
		assert_eq!(value.type_name(), "alloc::string::String");
	}

	#[rstest]
	fn test_new_does_not_nest_values() {
		let inner = Value::new(7u8);

		let outer = Value::new(inner.clone());

		assert!(Value::ptr_eq(&inner, &outer));
		assert_eq!(outer.downcast_ref::<u8>(), Some(&7));
	}

	#[rstest]
	fn test_null_value() {
		let value = Value::null();

		assert!(value.is_null());
		assert!(!value.is::<i32>());
		assert!(value.downcast::<i32>().is_none());
		assert_eq!(format!("{:?}", value), "Value(null)");
	}

	#[rstest]
	fn test_clone_shares_allocation() {
		let value = Value::new(vec![1, 2, 3]);

		let copy = value.clone();

		assert!(Value::ptr_eq(&value, &copy));
		assert!(!Value::ptr_eq(&value, &Value::new(vec![1, 2, 3])));
	}

	#[rstest]
	fn test_downcast_returns_shared_arc() {
		let shared = Arc::new(3.5f64);
		let value = Value::from_arc(shared.clone());

		let out = value.downcast::<f64>().unwrap();

		assert!(Arc::ptr_eq(&shared, &out));
	}
}
