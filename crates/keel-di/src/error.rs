//! Error types for dependency lookup and parameter binding.

use crate::cycle_detection::CycleError;
use thiserror::Error;

/// Composite parameter types the resolver refuses to bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeKind {
	/// `A|B`
	Union,
	/// `A&B`
	Intersection,
}

impl std::fmt::Display for CompositeKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			CompositeKind::Union => f.write_str("union"),
			CompositeKind::Intersection => f.write_str("intersection"),
		}
	}
}

/// Errors raised by the repository, the sources it owns and the resolver.
#[derive(Debug, Error)]
pub enum DiError {
	/// No source is registered for the name and none can be reached through
	/// redirect, alias, fallback or rule.
	#[error("Dependency \"{name}\" not found")]
	NotFound {
		/// Requested dependency name
		name: String,
	},

	/// The source exists but reports no pending value.
	#[error("No more values in dependency \"{name}\"")]
	Exhausted {
		/// Requested dependency name
		name: String,
	},

	/// A sequence source was read past its last element.
	#[error("No remaining values in sequence dependency")]
	SourceExhausted,

	/// The parameter is declared with a union or intersection type.
	#[error("Cannot resolve {kind} types (parameter ${parameter})")]
	UnsupportedType {
		/// Parameter name
		parameter: String,
		/// Which composite type was found
		kind: CompositeKind,
	},

	/// A named type has no dependency, no default and is not nullable.
	#[error("Could not resolve parameter ${parameter} of type {type_name}")]
	UnresolvedParameter {
		/// Parameter name
		parameter: String,
		/// Declared type name
		type_name: String,
	},

	/// Name resolution revisited a name or went too deep.
	#[error(transparent)]
	Cycle(#[from] CycleError),

	/// The type is not declared in the catalog.
	#[error("Unknown type: {0}")]
	UnknownType(String),

	/// The type does not declare the requested static method.
	#[error("Unknown method: {type_name}::{method}")]
	UnknownMethod {
		/// Owning type
		type_name: String,
		/// Method name
		method: String,
	},

	/// The type has neither a constructor nor a no-argument instantiator.
	#[error("Type {0} cannot be instantiated")]
	NotInstantiable(String),

	/// A callable body asked for an argument position that was not bound.
	#[error("Missing argument at position {0}")]
	MissingArgument(usize),

	/// A bound argument does not hold the type the callable body expects.
	#[error("Argument at position {index} is not a {expected}")]
	ArgumentMismatch {
		/// Argument position
		index: usize,
		/// Expected Rust type name
		expected: &'static str,
	},

	/// A bound method received a receiver of the wrong type.
	#[error("Method receiver is not a {expected}")]
	ReceiverMismatch {
		/// Expected Rust type name
		expected: &'static str,
	},

	/// Error reported by user code invoked through a callable or a source.
	#[error("Invocation failed: {0}")]
	Invocation(String),
}

/// Result type alias for dependency operations.
pub type DiResult<T> = Result<T, DiError>;

impl DiError {
	pub(crate) fn not_found(name: &str) -> Self {
		DiError::NotFound {
			name: name.to_string(),
		}
	}

	pub(crate) fn exhausted(name: &str) -> Self {
		DiError::Exhausted {
			name: name.to_string(),
		}
	}

	/// Returns true for [`DiError::NotFound`] and [`DiError::Exhausted`], the
	/// two "nothing to hand out" conditions.
	pub fn is_missing_value(&self) -> bool {
		matches!(self, DiError::NotFound { .. } | DiError::Exhausted { .. })
	}
}
