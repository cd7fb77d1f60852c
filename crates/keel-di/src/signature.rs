//! Declared parameter lists
//!
//! Rust closures carry no runtime parameter metadata, so callables registered
//! with the resolver describe their parameters explicitly. A [`Parameter`]
//! records what the binding algorithm needs: the declared type, the default
//! value, nullability and whether the parameter is variadic.
//!
//! ```
//! use keel_di::{ParamType, Parameter, Value};
//!
//! // fn greet(name: string, greeting: ?string = "Hello", ...extra: int)
//! let params = vec![
//!     Parameter::typed("name", "string"),
//!     Parameter::new("greeting", ParamType::nullable("string"))
//!         .with_default(Value::new("Hello")),
//!     Parameter::typed("extra", "int").variadic(),
//! ];
//! assert!(params[1].has_default());
//! assert!(params[2].is_variadic());
//! ```

use crate::Value;

/// Name used for the null type in unions.
pub const NULL_TYPE: &str = "null";

/// Declared type of a parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
	/// No declared type.
	Untyped,
	/// A single named type.
	Named {
		/// Type name used as the dependency name
		name: String,
		/// Whether the null value is accepted
		nullable: bool,
	},
	/// `A|B|...`
	Union(Vec<String>),
	/// `A&B&...`
	Intersection(Vec<String>),
}

impl ParamType {
	pub fn named(name: impl Into<String>) -> Self {
		ParamType::Named {
			name: name.into(),
			nullable: false,
		}
	}

	/// `?T`
	pub fn nullable(name: impl Into<String>) -> Self {
		ParamType::Named {
			name: name.into(),
			nullable: true,
		}
	}

	/// Builds a union type.
	///
	/// `null` plus exactly one other type is the nullable form of that type,
	/// and a single member is just that type.
	///
	/// ```
	/// use keel_di::ParamType;
	///
	/// assert_eq!(ParamType::union(["null", "array"]), ParamType::nullable("array"));
	/// assert!(matches!(ParamType::union(["float", "int"]), ParamType::Union(_)));
	/// ```
	pub fn union<I, S>(members: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let members: Vec<String> = members.into_iter().map(Into::into).collect();
		let nullable = members.iter().any(|m| m == NULL_TYPE);
		let mut others: Vec<String> = members.iter().filter(|m| *m != NULL_TYPE).cloned().collect();

		if others.len() == 1 {
			let name = others.remove(0);
			return ParamType::Named { name, nullable };
		}
		ParamType::Union(members)
	}

	pub fn intersection<I, S>(members: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		ParamType::Intersection(members.into_iter().map(Into::into).collect())
	}

	/// Whether the null value satisfies this type.
	pub fn allows_null(&self) -> bool {
		match self {
			ParamType::Untyped => true,
			ParamType::Named { nullable, .. } => *nullable,
			ParamType::Union(members) => members.iter().any(|m| m == NULL_TYPE),
			ParamType::Intersection(_) => false,
		}
	}
}

/// One declared parameter of a callable.
#[derive(Debug, Clone)]
pub struct Parameter {
	name: String,
	ty: ParamType,
	default: Option<Value>,
	variadic: bool,
}

impl Parameter {
	pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
		Self {
			name: name.into(),
			ty,
			default: None,
			variadic: false,
		}
	}

	/// Parameter of a single, non-nullable named type.
	pub fn typed(name: impl Into<String>, type_name: impl Into<String>) -> Self {
		Self::new(name, ParamType::named(type_name))
	}

	/// Parameter without a declared type.
	pub fn untyped(name: impl Into<String>) -> Self {
		Self::new(name, ParamType::Untyped)
	}

	pub fn with_default(mut self, default: Value) -> Self {
		self.default = Some(default);
		self
	}

	/// Marks the parameter as variadic (`...$name`).
	pub fn variadic(mut self) -> Self {
		self.variadic = true;
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn ty(&self) -> &ParamType {
		&self.ty
	}

	pub fn default(&self) -> Option<&Value> {
		self.default.as_ref()
	}

	pub fn has_default(&self) -> bool {
		self.default.is_some()
	}

	pub fn is_variadic(&self) -> bool {
		self.variadic
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(vec!["null", "float"], ParamType::nullable("float"))]
	#[case(vec!["array", "null"], ParamType::nullable("array"))]
	#[case(vec!["int"], ParamType::named("int"))]
	#[case(vec!["float", "int"], ParamType::Union(vec!["float".into(), "int".into()]))]
	#[case(
		vec!["float", "int", "null"],
		ParamType::Union(vec!["float".into(), "int".into(), "null".into()])
	)]
	fn test_union_normalization(#[case] members: Vec<&str>, #[case] expected: ParamType) {
		assert_eq!(ParamType::union(members), expected);
	}

	#[rstest]
	#[case(ParamType::Untyped, true)]
	#[case(ParamType::named("int"), false)]
	#[case(ParamType::nullable("int"), true)]
	#[case(ParamType::union(["float", "int", "null"]), true)]
	#[case(ParamType::intersection(["Countable", "Iterator"]), false)]
	fn test_allows_null(#[case] ty: ParamType, #[case] expected: bool) {
		assert_eq!(ty.allows_null(), expected);
	}

	#[rstest]
	fn test_parameter_builders() {
		let param = Parameter::typed("rest", "int")
			.with_default(Value::new(0i32))
			.variadic();

		assert_eq!(param.name(), "rest");
		assert_eq!(param.ty(), &ParamType::named("int"));
		assert!(param.has_default());
		assert!(param.is_variadic());
		assert_eq!(param.default().unwrap().downcast_ref::<i32>(), Some(&0));
	}
}
