//! Dependency sources
//!
//! A source is the provider registered under one dependency name. Every
//! variant exposes the same three operations:
//!
//! - `get` hands out the next value
//! - `get_all` pulls every pending value at once
//! - `has` reports whether a value is pending
//!
//! The repository owns its sources exclusively and serializes access to each
//! one, so implementations take `&mut self` and need no locking of their own.

mod factory;
mod sequence;
mod value;

pub use factory::FactorySource;
pub use sequence::{Exhaustion, SequenceSource};
pub use value::ValueSource;

use crate::{DiResult, Value};

/// Provider of values for one dependency name.
///
/// Implement this trait for test doubles or advanced providers and register
/// them with [`Repository::set_custom`](crate::Repository::set_custom).
///
/// # Examples
///
/// ```
/// use keel_di::{DependencySource, DiResult, Repository, Value};
///
/// struct Countdown(u32);
///
/// impl DependencySource for Countdown {
///     fn get(&mut self) -> DiResult<Value> {
///         self.0 -= 1;
///         Ok(Value::new(self.0))
///     }
///
///     fn get_all(&mut self) -> DiResult<Vec<Value>> {
///         let mut values = Vec::new();
///         while self.has() {
///             values.push(self.get()?);
///         }
///         Ok(values)
///     }
///
///     fn has(&mut self) -> bool {
///         self.0 > 0
///     }
/// }
///
/// let repo = Repository::new();
/// repo.set_custom("countdown", Countdown(2));
/// assert_eq!(repo.get_value("countdown").unwrap().downcast_ref::<u32>(), Some(&1));
/// assert_eq!(repo.get_values("countdown").unwrap().len(), 1);
/// ```
pub trait DependencySource: Send {
	/// Returns the next value.
	///
	/// Callers check [`has`](Self::has) first; a source may fail when asked
	/// for a value it does not have.
	fn get(&mut self) -> DiResult<Value>;

	/// Returns every pending value, leaving the source drained.
	fn get_all(&mut self) -> DiResult<Vec<Value>>;

	/// Returns true while a value is pending.
	fn has(&mut self) -> bool;
}

impl<S: DependencySource + ?Sized> DependencySource for Box<S> {
	fn get(&mut self) -> DiResult<Value> {
		(**self).get()
	}

	fn get_all(&mut self) -> DiResult<Vec<Value>> {
		(**self).get_all()
	}

	fn has(&mut self) -> bool {
		(**self).has()
	}
}
