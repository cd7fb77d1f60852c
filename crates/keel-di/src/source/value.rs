use super::DependencySource;
use crate::{DiResult, Value};

/// Source that always hands out the same value.
#[derive(Debug, Clone)]
pub struct ValueSource {
	value: Value,
}

impl ValueSource {
	pub fn new(value: Value) -> Self {
		Self { value }
	}
}

impl DependencySource for ValueSource {
	fn get(&mut self) -> DiResult<Value> {
		Ok(self.value.clone())
	}

	fn get_all(&mut self) -> DiResult<Vec<Value>> {
		Ok(vec![self.value.clone()])
	}

	fn has(&mut self) -> bool {
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_value_source_repeats_value() {
		// Arrange
		let value = Value::new("John".to_string());
		let mut source = ValueSource::new(value.clone());

		// Act
		let first = source.get().unwrap();
		let second = source.get().unwrap();

		// Assert
		assert!(Value::ptr_eq(&first, &value));
		assert!(Value::ptr_eq(&second, &value));
		assert!(source.has());
	}

	#[rstest]
	fn test_value_source_get_all_is_single_element() {
		// Arrange
		let mut source = ValueSource::new(Value::new(42i32));

		// Act
		let all = source.get_all().unwrap();

		// Assert
		assert_eq!(all.len(), 1);
		assert_eq!(all[0].downcast_ref::<i32>(), Some(&42));
		assert!(source.has());
	}
}
