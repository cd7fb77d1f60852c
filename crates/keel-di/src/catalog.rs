//! Type catalog
//!
//! The catalog answers the questions name resolution and instantiation ask
//! about types: does a type exist, is it a subtype of another, how is it
//! constructed and which static methods does it declare. Types are keyed by
//! the same names used as dependency names.
//!
//! # Examples
//!
//! ```
//! use keel_di::{TypeCatalog, TypeDef};
//!
//! let mut catalog = TypeCatalog::new();
//! catalog
//!     .register(TypeDef::new("Animal"))
//!     .register(TypeDef::new("Bird").extends("Animal"))
//!     .register(TypeDef::new("Duck").extends("Bird"));
//!
//! assert!(catalog.is_a("Duck", "Animal"));
//! assert!(!catalog.is_a("Animal", "Duck"));
//! ```

use crate::callable::{Arguments, Function};
use crate::signature::Parameter;
use crate::{DiError, DiResult, Value};
use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// How instances of a type are created.
#[derive(Clone)]
pub enum Instantiator {
	/// No explicit constructor: created without arguments.
	NoArgs(Arc<dyn Fn() -> Value + Send + Sync>),
	/// Explicit constructor whose parameters are resolved.
	Constructor(Function),
}

impl fmt::Debug for Instantiator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Instantiator::NoArgs(_) => f.write_str("NoArgs"),
			Instantiator::Constructor(function) => {
				f.debug_tuple("Constructor").field(function).finish()
			}
		}
	}
}

/// Declaration of one type.
#[derive(Debug, Clone)]
pub struct TypeDef {
	name: String,
	parents: Vec<String>,
	instantiator: Option<Instantiator>,
	static_methods: HashMap<String, Function>,
}

impl TypeDef {
	/// Declares an abstract type (no instantiator).
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			parents: Vec::new(),
			instantiator: None,
			static_methods: HashMap::new(),
		}
	}

	/// Adds a parent class.
	pub fn extends(mut self, parent: impl Into<String>) -> Self {
		self.parents.push(parent.into());
		self
	}

	/// Adds an implemented interface.
	///
	/// Interfaces and parent classes are treated alike by [`TypeCatalog::is_a`].
	pub fn implements(self, interface: impl Into<String>) -> Self {
		self.extends(interface)
	}

	/// Makes the type constructible without arguments.
	pub fn instantiable<T, F>(mut self, create: F) -> Self
	where
		T: Any + Send + Sync,
		F: Fn() -> T + Send + Sync + 'static,
	{
		self.instantiator = Some(Instantiator::NoArgs(Arc::new(move || Value::new(create()))));
		self
	}

	/// Shorthand for [`instantiable`](Self::instantiable) with `T::default`.
	pub fn with_default<T>(self) -> Self
	where
		T: Default + Any + Send + Sync,
	{
		self.instantiable(T::default)
	}

	/// Sets an explicit constructor.
	pub fn constructor(mut self, constructor: Function) -> Self {
		self.instantiator = Some(Instantiator::Constructor(constructor));
		self
	}

	pub fn static_method(mut self, name: impl Into<String>, function: Function) -> Self {
		self.static_methods.insert(name.into(), function);
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn parents(&self) -> &[String] {
		&self.parents
	}

	pub fn instantiator(&self) -> Option<&Instantiator> {
		self.instantiator.as_ref()
	}

	/// Parameters of the explicit constructor; empty when there is none.
	pub fn constructor_parameters(&self) -> &[Parameter] {
		match &self.instantiator {
			Some(Instantiator::Constructor(function)) => function.parameters(),
			_ => &[],
		}
	}

	/// Creates an instance from already bound constructor arguments.
	pub fn construct(&self, args: &Arguments) -> DiResult<Value> {
		match &self.instantiator {
			Some(Instantiator::Constructor(function)) => function.invoke(args),
			Some(Instantiator::NoArgs(create)) => Ok(create()),
			None => Err(DiError::NotInstantiable(self.name.clone())),
		}
	}
}

/// Registry of declared types.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
	types: HashMap<String, TypeDef>,
}

impl TypeCatalog {
	pub fn new() -> Self {
		Self::default()
	}

	/// Declares a type, replacing any earlier declaration with the same name.
	pub fn register(&mut self, def: TypeDef) -> &mut Self {
		self.types.insert(def.name.clone(), def);
		self
	}

	pub fn get(&self, name: &str) -> Option<&TypeDef> {
		self.types.get(name)
	}

	/// Like [`get`](Self::get), failing with [`DiError::UnknownType`].
	pub fn require(&self, name: &str) -> DiResult<&TypeDef> {
		self.get(name)
			.ok_or_else(|| DiError::UnknownType(name.to_string()))
	}

	/// Whether `name` denotes a declared type.
	pub fn exists(&self, name: &str) -> bool {
		self.types.contains_key(name)
	}

	/// Whether `name` is `ancestor` or (transitively) extends or implements it.
	///
	/// Parents that were never declared end the walk along that branch.
	pub fn is_a(&self, name: &str, ancestor: &str) -> bool {
		if name == ancestor {
			return true;
		}

		let mut visited: HashSet<&str> = HashSet::new();
		let mut pending: Vec<&str> = vec![name];
		while let Some(current) = pending.pop() {
			if !visited.insert(current) {
				continue;
			}
			let Some(def) = self.types.get(current) else {
				continue;
			};
			for parent in &def.parents {
				if parent == ancestor {
					return true;
				}
				pending.push(parent);
			}
		}
		false
	}

	pub fn static_method(&self, type_name: &str, method: &str) -> DiResult<&Function> {
		self.require(type_name)?
			.static_methods
			.get(method)
			.ok_or_else(|| DiError::UnknownMethod {
				type_name: type_name.to_string(),
				method: method.to_string(),
			})
	}

	pub fn len(&self) -> usize {
		self.types.len()
	}

	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}
}
