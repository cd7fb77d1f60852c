use super::DependencySource;
use crate::{DiError, DiResult, Value};

/// What a [`SequenceSource`] does once its last element has been taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exhaustion {
	/// `has` stays false and `get` fails with [`DiError::SourceExhausted`].
	#[default]
	Fail,
	/// The cursor goes back to the first element, so `has` is true again.
	Wrap,
}

/// Source backed by an ordered list of values and a cursor.
///
/// `get` returns the element under the cursor and advances it; `get_all`
/// drains from the cursor to the end.
///
/// # Examples
///
/// ```
/// use keel_di::{DependencySource, Exhaustion, SequenceSource, Value};
///
/// let mut names = SequenceSource::new(
///     ["John", "Mark"].map(Value::new).to_vec(),
///     Exhaustion::Fail,
/// );
/// assert_eq!(names.get().unwrap().downcast_ref::<&str>(), Some(&"John"));
/// assert!(names.has());
/// assert_eq!(names.get().unwrap().downcast_ref::<&str>(), Some(&"Mark"));
/// assert!(!names.has());
/// assert!(names.get().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct SequenceSource {
	values: Vec<Value>,
	cursor: usize,
	exhaustion: Exhaustion,
}

impl SequenceSource {
	pub fn new(values: Vec<Value>, exhaustion: Exhaustion) -> Self {
		Self {
			values,
			cursor: 0,
			exhaustion,
		}
	}

	/// Number of elements not yet taken in the current pass.
	pub fn remaining(&self) -> usize {
		self.values.len() - self.cursor
	}

	pub fn exhaustion(&self) -> Exhaustion {
		self.exhaustion
	}

	fn rewind_if_wrapping(&mut self) {
		if self.exhaustion == Exhaustion::Wrap && self.cursor >= self.values.len() {
			self.cursor = 0;
		}
	}
}

impl DependencySource for SequenceSource {
	fn get(&mut self) -> DiResult<Value> {
		let value = self
			.values
			.get(self.cursor)
			.cloned()
			.ok_or(DiError::SourceExhausted)?;
		self.cursor += 1;
		self.rewind_if_wrapping();
		Ok(value)
	}

	fn get_all(&mut self) -> DiResult<Vec<Value>> {
		let drained = self.values[self.cursor..].to_vec();
		self.cursor = self.values.len();
		self.rewind_if_wrapping();
		Ok(drained)
	}

	fn has(&mut self) -> bool {
		self.cursor < self.values.len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn floats(exhaustion: Exhaustion) -> SequenceSource {
		SequenceSource::new(
			[0.25f64, 0.5, 0.75].map(Value::new).to_vec(),
			exhaustion,
		)
	}

	fn read(value: Value) -> f64 {
		*value.downcast_ref::<f64>().unwrap()
	}

	#[rstest]
	fn test_fail_mode_yields_in_order_then_stops() {
		// Arrange
		let mut source = floats(Exhaustion::Fail);

		// Act & Assert
		for expected in [0.25, 0.5, 0.75] {
			assert!(source.has());
			assert_eq!(read(source.get().unwrap()), expected);
		}
		assert!(!source.has());
		assert!(matches!(source.get(), Err(DiError::SourceExhausted)));
		assert!(!source.has());
	}

	#[rstest]
	fn test_wrap_mode_returns_to_first_element() {
		// Arrange
		let mut source = floats(Exhaustion::Wrap);

		// Act
		let taken: Vec<f64> = (0..5).map(|_| read(source.get().unwrap())).collect();

		// Assert
		assert_eq!(taken, vec![0.25, 0.5, 0.75, 0.25, 0.5]);
		assert!(source.has());
	}

	#[rstest]
	#[case(Exhaustion::Fail, false, 0)]
	#[case(Exhaustion::Wrap, true, 3)]
	fn test_get_all_drains_remaining(
		#[case] exhaustion: Exhaustion,
		#[case] has_after: bool,
		#[case] remaining_after: usize,
	) {
		// Arrange
		let mut source = floats(exhaustion);
		source.get().unwrap();

		// Act
		let rest: Vec<f64> = source.get_all().unwrap().into_iter().map(read).collect();

		// Assert
		assert_eq!(rest, vec![0.5, 0.75]);
		assert_eq!(source.has(), has_after);
		assert_eq!(source.remaining(), remaining_after);
	}

	#[rstest]
	fn test_empty_wrap_sequence_never_has_values() {
		let mut source = SequenceSource::new(Vec::new(), Exhaustion::Wrap);

		assert!(!source.has());
		assert!(source.get_all().unwrap().is_empty());
		assert!(matches!(source.get(), Err(DiError::SourceExhausted)));
	}
}
