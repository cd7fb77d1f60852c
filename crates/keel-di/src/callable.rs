//! Callables the resolver can bind and invoke
//!
//! A callable pairs a declared parameter list with a body. The body receives
//! the bound [`Arguments`] and reads them back with typed accessors.
//!
//! # Examples
//!
//! ```
//! use keel_di::{CallTarget, Function, Parameter, Repository, Resolver};
//! use std::sync::Arc;
//!
//! let add = Function::new(
//!     vec![Parameter::typed("a", "int"), Parameter::typed("b", "int")],
//!     |args| Ok(args.get::<i64>(0)? + args.get::<i64>(1)?),
//! );
//!
//! let repo = Arc::new(Repository::new());
//! repo.set_iterable("int", [999i64, 999]);
//!
//! let resolver = Resolver::new(repo);
//! let sum = resolver.call(&CallTarget::Function(add)).unwrap();
//! assert_eq!(sum.downcast_ref::<i64>(), Some(&1998));
//! ```

use crate::catalog::TypeCatalog;
use crate::signature::Parameter;
use crate::{DiError, DiResult, Value};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Argument list bound by the resolver, in declaration order.
///
/// A trailing variadic parameter contributes zero or more trailing entries.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
	values: Vec<Value>,
}

impl Arguments {
	pub fn new(values: Vec<Value>) -> Self {
		Self { values }
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// Raw value at `index`.
	pub fn value(&self, index: usize) -> Option<&Value> {
		self.values.get(index)
	}

	/// Borrows the argument at `index` as `T`.
	pub fn get<T: Any>(&self, index: usize) -> DiResult<&T> {
		self.values
			.get(index)
			.ok_or(DiError::MissingArgument(index))?
			.downcast_ref::<T>()
			.ok_or(DiError::ArgumentMismatch {
				index,
				expected: std::any::type_name::<T>(),
			})
	}

	/// Like [`get`](Self::get), but a null or absent argument reads as `None`.
	pub fn optional<T: Any>(&self, index: usize) -> DiResult<Option<&T>> {
		match self.values.get(index) {
			None => Ok(None),
			Some(value) if value.is_null() => Ok(None),
			Some(_) => self.get::<T>(index).map(Some),
		}
	}

	/// Borrows every argument from `start` onward as `T` (variadic tail).
	pub fn rest<T: Any>(&self, start: usize) -> DiResult<Vec<&T>> {
		(start..self.values.len()).map(|i| self.get::<T>(i)).collect()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Value> {
		self.values.iter()
	}

	pub fn into_vec(self) -> Vec<Value> {
		self.values
	}
}

impl From<Vec<Value>> for Arguments {
	fn from(values: Vec<Value>) -> Self {
		Self::new(values)
	}
}

type FunctionBody = Arc<dyn Fn(&Arguments) -> DiResult<Value> + Send + Sync>;
type MethodBody = Arc<dyn Fn(&Value, &Arguments) -> DiResult<Value> + Send + Sync>;

/// Free function, closure or static method: a parameter list plus a body.
#[derive(Clone)]
pub struct Function {
	parameters: Vec<Parameter>,
	body: FunctionBody,
}

impl Function {
	pub fn new<R, F>(parameters: Vec<Parameter>, body: F) -> Self
	where
		R: Any + Send + Sync,
		F: Fn(&Arguments) -> DiResult<R> + Send + Sync + 'static,
	{
		Self {
			parameters,
			body: Arc::new(move |args| body(args).map(Value::new)),
		}
	}

	pub fn parameters(&self) -> &[Parameter] {
		&self.parameters
	}

	pub fn invoke(&self, args: &Arguments) -> DiResult<Value> {
		(self.body)(args)
	}
}

impl fmt::Debug for Function {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Function")
			.field("parameters", &self.parameters)
			.finish_non_exhaustive()
	}
}

/// Instance method: the body receives the receiver as its first argument.
#[derive(Clone)]
pub struct Method {
	parameters: Vec<Parameter>,
	body: MethodBody,
}

impl Method {
	/// Creates a method on receivers of type `S`.
	///
	/// Invoking it with a receiver that does not hold an `S` fails with
	/// [`DiError::ReceiverMismatch`].
	pub fn new<S, R, F>(parameters: Vec<Parameter>, body: F) -> Self
	where
		S: Any + Send + Sync,
		R: Any + Send + Sync,
		F: Fn(&S, &Arguments) -> DiResult<R> + Send + Sync + 'static,
	{
		Self {
			parameters,
			body: Arc::new(move |receiver, args| {
				let receiver = receiver
					.downcast_ref::<S>()
					.ok_or(DiError::ReceiverMismatch {
						expected: std::any::type_name::<S>(),
					})?;
				body(receiver, args).map(Value::new)
			}),
		}
	}

	pub fn parameters(&self) -> &[Parameter] {
		&self.parameters
	}

	pub fn invoke(&self, receiver: &Value, args: &Arguments) -> DiResult<Value> {
		(self.body)(receiver, args)
	}
}

impl fmt::Debug for Method {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Method")
			.field("parameters", &self.parameters)
			.finish_non_exhaustive()
	}
}

/// Anything the resolver can bind parameters for.
#[derive(Debug, Clone)]
pub enum CallTarget {
	/// Free function or closure.
	Function(Function),
	/// Method bound to a receiver; also covers invokable objects.
	BoundMethod {
		/// The object the method is called on
		receiver: Value,
		/// The method
		method: Method,
	},
	/// Two-part `Type::method` reference, looked up in the type catalog.
	StaticMethod {
		/// Catalog type name
		type_name: String,
		/// Static method name
		method: String,
	},
	/// Constructor of a catalog type.
	Constructor(String),
}

impl CallTarget {
	pub fn bound(receiver: Value, method: Method) -> Self {
		CallTarget::BoundMethod { receiver, method }
	}

	pub fn static_method(type_name: impl Into<String>, method: impl Into<String>) -> Self {
		CallTarget::StaticMethod {
			type_name: type_name.into(),
			method: method.into(),
		}
	}

	pub fn constructor(type_name: impl Into<String>) -> Self {
		CallTarget::Constructor(type_name.into())
	}

	/// Declared parameters of the target.
	///
	/// A constructor-less type reports an empty list.
	pub fn parameters<'a>(&'a self, catalog: &'a TypeCatalog) -> DiResult<&'a [Parameter]> {
		match self {
			CallTarget::Function(function) => Ok(function.parameters()),
			CallTarget::BoundMethod { method, .. } => Ok(method.parameters()),
			CallTarget::StaticMethod { type_name, method } => {
				Ok(catalog.static_method(type_name, method)?.parameters())
			}
			CallTarget::Constructor(type_name) => Ok(catalog.require(type_name)?.constructor_parameters()),
		}
	}

	/// Invokes the target with an already bound argument list.
	pub fn invoke(&self, catalog: &TypeCatalog, args: &Arguments) -> DiResult<Value> {
		match self {
			CallTarget::Function(function) => function.invoke(args),
			CallTarget::BoundMethod { receiver, method } => method.invoke(receiver, args),
			CallTarget::StaticMethod { type_name, method } => {
				catalog.static_method(type_name, method)?.invoke(args)
			}
			CallTarget::Constructor(type_name) => catalog.require(type_name)?.construct(args),
		}
	}

	/// Short description used in log events.
	pub fn describe(&self) -> String {
		match self {
			CallTarget::Function(_) => "function".to_string(),
			CallTarget::BoundMethod { receiver, .. } => {
				format!("method on {}", receiver.type_name())
			}
			CallTarget::StaticMethod { type_name, method } => format!("{type_name}::{method}"),
			CallTarget::Constructor(type_name) => format!("new {type_name}"),
		}
	}
}

impl From<Function> for CallTarget {
	fn from(function: Function) -> Self {
		CallTarget::Function(function)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::catalog::TypeDef;
	use rstest::rstest;

	struct Shouter {
		suffix: String,
	}

	fn shout() -> Method {
		Method::new(
			vec![Parameter::typed("subject", "string")],
			|this: &Shouter, args| Ok(format!("{}{}", args.get::<String>(0)?, this.suffix)),
		)
	}

	#[rstest]
	fn test_arguments_typed_access() {
		// Arrange
		let args = Arguments::new(vec![
			Value::new(1i32),
			Value::null(),
			Value::new(2i32),
			Value::new(3i32),
		]);

		// Act & Assert
		assert_eq!(*args.get::<i32>(0).unwrap(), 1);
		assert_eq!(args.optional::<i32>(1).unwrap(), None);
		assert_eq!(args.optional::<i32>(9).unwrap(), None);
		assert_eq!(args.rest::<i32>(2).unwrap(), vec![&2, &3]);
		assert!(matches!(args.get::<i32>(4), Err(DiError::MissingArgument(4))));
		assert!(matches!(
			args.get::<String>(0),
			Err(DiError::ArgumentMismatch { index: 0, .. })
		));
	}

	#[rstest]
	fn test_bound_method_invokes_with_receiver() {
		// Arrange
		let target = CallTarget::bound(
			Value::new(Shouter {
				suffix: "!".to_string(),
			}),
			shout(),
		);
		let catalog = TypeCatalog::new();

		// Act
		let result = target
			.invoke(&catalog, &Arguments::new(vec![Value::new("hey".to_string())]))
			.unwrap();

		// Assert
		assert_eq!(result.downcast_ref::<String>().unwrap(), "hey!");
		assert_eq!(target.parameters(&catalog).unwrap().len(), 1);
	}

	#[rstest]
	fn test_bound_method_rejects_wrong_receiver() {
		let target = CallTarget::bound(Value::new(0u8), shout());

		let result = target.invoke(
			&TypeCatalog::new(),
			&Arguments::new(vec![Value::new("hey".to_string())]),
		);

		assert!(matches!(result, Err(DiError::ReceiverMismatch { .. })));
	}

	#[rstest]
	fn test_static_method_is_looked_up_in_catalog() {
		// Arrange
		let mut catalog = TypeCatalog::new();
		catalog.register(TypeDef::new("Math").static_method(
			"divideByThree",
			Function::new(vec![Parameter::typed("number", "int")], |args| {
				Ok(args.get::<i64>(0)? / 3)
			}),
		));
		let target = CallTarget::static_method("Math", "divideByThree");

		// Act
		let result = target
			.invoke(&catalog, &Arguments::new(vec![Value::new(999i64)]))
			.unwrap();

		// Assert
		assert_eq!(result.downcast_ref::<i64>(), Some(&333));
		assert!(matches!(
			CallTarget::static_method("Math", "cube").parameters(&catalog),
			Err(DiError::UnknownMethod { .. })
		));
	}

	#[rstest]
	fn test_describe() {
		assert_eq!(CallTarget::constructor("Duck").describe(), "new Duck");
		assert_eq!(
			CallTarget::static_method("Math", "abs").describe(),
			"Math::abs"
		);
	}
}
