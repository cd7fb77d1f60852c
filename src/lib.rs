//! # Keel
//!
//! Runtime dependency resolution: register named dependency sources in a
//! repository, then let a resolver bind them onto the declared parameters of
//! functions, methods and constructors.
//!
//! ## Feature Flags
//!
//! - `di` (default) - The repository and resolver from `keel-di`
//!
//! ## Quick Example
//!
//! ```rust
//! use keel::prelude::*;
//! use std::sync::Arc;
//!
//! let repo = Arc::new(Repository::new());
//! repo.set_iterable("string", ["John", "Mark"]);
//!
//! let resolver = Resolver::new(repo);
//! let params = [Parameter::typed("first", "string"), Parameter::typed("second", "string")];
//! let args = resolver.resolve_parameters(&params).unwrap();
//! assert_eq!(args[1].downcast_ref::<&str>(), Some(&"Mark"));
//! ```

#[cfg(feature = "di")]
pub use keel_di::*;

#[cfg(feature = "di")]
pub mod prelude {
	pub use crate::{
		Arguments,
		CallTarget,
		DependencySource,
		DiError,
		DiResult,
		Exhaustion,
		Function,
		Method,
		ParamType,
		Parameter,
		Repository,
		RepositoryConfig,
		Resolver,
		TypeCatalog,
		TypeDef,
		Value,
	};
}
