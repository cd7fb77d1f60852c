//! # Keel Dependency Repository
//!
//! Runtime dependency resolution for keel: a [`Repository`] of named value
//! sources and a [`Resolver`] that binds a callable's declared parameters
//! from it.
//!
//! ## Features
//!
//! - **Sources**: fixed values, finite or cycling sequences, factories and
//!   custom [`DependencySource`] implementations
//! - **Name resolution**: redirects to other repositories, aliases,
//!   type-hierarchy fallbacks and custom rules, with cycle detection
//! - **Binding**: defaults, nullable and variadic parameters, with
//!   union and intersection types rejected up front
//!
//! ## Example
//!
//! ```rust
//! use keel_di::{CallTarget, Function, Parameter, Repository, Resolver, Value};
//! use std::sync::Arc;
//!
//! let repo = Arc::new(Repository::new());
//! repo.set_value("int", 42i64);
//!
//! let describe = Function::new(
//!     vec![
//!         Parameter::typed("n", "int"),
//!         Parameter::typed("label", "string").with_default(Value::new("answer")),
//!     ],
//!     |args| Ok(format!("{} = {}", args.get::<&str>(1)?, args.get::<i64>(0)?)),
//! );
//!
//! let resolver = Resolver::new(repo);
//! let text = resolver.call(&CallTarget::Function(describe)).unwrap();
//! assert_eq!(text.downcast_ref::<String>().unwrap(), "answer = 42");
//! ```

pub mod callable;
pub mod catalog;
pub mod config;
pub mod cycle_detection;
pub mod error;
pub mod repository;
pub mod resolver;
mod rules;
pub mod signature;
pub mod source;
pub mod value;

pub use callable::{Arguments, CallTarget, Function, Method};
pub use catalog::{Instantiator, TypeCatalog, TypeDef};
pub use config::RepositoryConfig;
pub use cycle_detection::{CycleError, ResolutionTrail};
pub use error::{CompositeKind, DiError, DiResult};
pub use repository::{Repository, RepositoryBuilder};
pub use resolver::Resolver;
pub use signature::{ParamType, Parameter};
pub use source::{DependencySource, Exhaustion, FactorySource, SequenceSource, ValueSource};
pub use value::Value;
