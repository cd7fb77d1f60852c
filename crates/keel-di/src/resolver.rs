//! Parameter binding
//!
//! The [`Resolver`] walks a callable's declared parameters left to right and
//! binds each one from the [`Repository`]:
//!
//! 1. Untyped: the default value, else null. An untyped variadic binds nothing.
//! 2. Union or intersection: [`DiError::UnsupportedType`], whether or not a
//!    member type is registered.
//! 3. Named type `T`:
//!    - `T` resolves to a source: one value from it, or for a variadic
//!      parameter every pending value (at least one)
//!    - otherwise the default value
//!    - otherwise null if `T` is nullable
//!    - otherwise [`DiError::UnresolvedParameter`]
//!
//! The first failure aborts the whole binding.
//!
//! # Examples
//!
//! ```
//! use keel_di::{CallTarget, Function, Parameter, Repository, Resolver};
//! use std::sync::Arc;
//!
//! let repo = Arc::new(Repository::new());
//! repo.set_iterable("string", ["John", "Mark", "James"]);
//!
//! let greet = CallTarget::Function(Function::new(
//!     vec![Parameter::typed("a", "string"), Parameter::typed("b", "string")],
//!     |args| Ok(format!("{} & {}", args.get::<&str>(0)?, args.get::<&str>(1)?)),
//! ));
//!
//! let resolver = Resolver::new(repo);
//! let first = resolver.call(&greet).unwrap();
//! assert_eq!(first.downcast_ref::<String>().unwrap(), "John & Mark");
//! assert!(resolver.call(&greet).is_err());
//! ```

use crate::callable::{Arguments, CallTarget};
use crate::catalog::Instantiator;
use crate::error::CompositeKind;
use crate::repository::Repository;
use crate::signature::{ParamType, Parameter};
use crate::{DiError, DiResult, Value};
use std::sync::Arc;
use tracing::{debug, trace};

/// Binds callable parameters from a shared [`Repository`].
#[derive(Debug, Clone)]
pub struct Resolver {
	repo: Arc<Repository>,
}

impl Resolver {
	pub fn new(repo: Arc<Repository>) -> Self {
		Self { repo }
	}

	pub fn repository(&self) -> &Arc<Repository> {
		&self.repo
	}

	/// Binds the target's parameters without invoking it.
	pub fn resolve(&self, target: &CallTarget) -> DiResult<Vec<Value>> {
		let parameters = target.parameters(self.repo.catalog())?;
		debug!(target = %target.describe(), parameters = parameters.len(), "Resolving call target");
		self.resolve_parameters(parameters)
	}

	/// Binds the target's parameters and invokes it.
	pub fn call(&self, target: &CallTarget) -> DiResult<Value> {
		let args = Arguments::new(self.resolve(target)?);
		target.invoke(self.repo.catalog(), &args)
	}

	/// Creates an instance of a catalog type.
	///
	/// A type without an explicit constructor is created without arguments.
	pub fn instantiate(&self, type_name: &str) -> DiResult<Value> {
		let def = self.repo.catalog().require(type_name)?;
		match def.instantiator() {
			Some(Instantiator::NoArgs(create)) => {
				debug!(type_name = %type_name, "Instantiating without constructor");
				Ok(create())
			}
			Some(Instantiator::Constructor(constructor)) => {
				debug!(
					type_name = %type_name,
					parameters = constructor.parameters().len(),
					"Instantiating through constructor"
				);
				let args = Arguments::new(self.resolve_parameters(constructor.parameters())?);
				constructor.invoke(&args)
			}
			None => Err(DiError::NotInstantiable(type_name.to_string())),
		}
	}

	/// Binds a bare parameter list.
	pub fn resolve_parameters(&self, parameters: &[Parameter]) -> DiResult<Vec<Value>> {
		let mut args = Vec::with_capacity(parameters.len());
		for parameter in parameters {
			self.bind(parameter, &mut args)?;
		}
		Ok(args)
	}

	fn bind(&self, parameter: &Parameter, args: &mut Vec<Value>) -> DiResult<()> {
		match parameter.ty() {
			ParamType::Untyped => {
				if !parameter.is_variadic() {
					args.push(parameter.default().cloned().unwrap_or_default());
				}
				Ok(())
			}
			ParamType::Union(_) => Err(unsupported(parameter, CompositeKind::Union)),
			ParamType::Intersection(_) => Err(unsupported(parameter, CompositeKind::Intersection)),
			ParamType::Named { name, nullable } => {
				if self.repo.check_dependency(name)? {
					trace!(parameter = %parameter.name(), type_name = %name, "Binding from repository");
					return self.bind_dependency(parameter, name, args);
				}
				if let Some(default) = parameter.default() {
					trace!(parameter = %parameter.name(), "Binding default value");
					args.push(default.clone());
					return Ok(());
				}
				if *nullable {
					trace!(parameter = %parameter.name(), "Binding null");
					args.push(Value::null());
					return Ok(());
				}
				Err(DiError::UnresolvedParameter {
					parameter: parameter.name().to_string(),
					type_name: name.clone(),
				})
			}
		}
	}

	fn bind_dependency(&self, parameter: &Parameter, name: &str, args: &mut Vec<Value>) -> DiResult<()> {
		if !parameter.is_variadic() {
			args.push(self.repo.get_value(name)?);
			return Ok(());
		}

		// A variadic takes everything pending, so a value source contributes
		// one argument and a wrapping sequence one pass.
		if !self.repo.has_value(name)? {
			return Err(DiError::Exhausted {
				name: name.to_string(),
			});
		}
		args.extend(self.repo.get_values(name)?);
		Ok(())
	}
}

fn unsupported(parameter: &Parameter, kind: CompositeKind) -> DiError {
	DiError::UnsupportedType {
		parameter: parameter.name().to_string(),
		kind,
	}
}
