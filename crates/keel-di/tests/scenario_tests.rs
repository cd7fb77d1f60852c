//! End-to-end resolution scenarios

use keel_di::{
	CallTarget, DiError, Exhaustion, Function, Parameter, Repository, Resolver, SequenceSource,
	TypeCatalog, TypeDef, Value,
};
use rstest::*;
use std::sync::Arc;

fn names(values: &[Value]) -> Vec<&'static str> {
	values
		.iter()
		.map(|v| *v.downcast_ref::<&'static str>().unwrap())
		.collect()
}

fn ints(values: &[Value]) -> Vec<i64> {
	values.iter().map(|v| *v.downcast_ref::<i64>().unwrap()).collect()
}

/// Test that repeated resolution walks a sequence until it runs dry
#[rstest]
fn test_sequence_feeds_repeated_resolution() {
	let repo = Arc::new(Repository::new());
	repo.set_iterable("string", ["John", "Mark", "James"]);
	let resolver = Resolver::new(repo);
	let pair = CallTarget::Function(Function::new(
		vec![Parameter::typed("a", "string"), Parameter::typed("b", "string")],
		|_| Ok(()),
	));

	let first = resolver.resolve(&pair).unwrap();
	let second = resolver.resolve(&pair);

	assert_eq!(names(&first), vec!["John", "Mark"]);
	assert!(matches!(
		second,
		Err(DiError::Exhausted { ref name }) if name == "string"
	));
}

/// Test that a variadic bound to a value source receives exactly one argument
#[rstest]
fn test_variadic_against_value_source() {
	let repo = Arc::new(Repository::new());
	repo.set_value("int", 42i64);
	let resolver = Resolver::new(repo);
	let params = [
		Parameter::typed("n", "int"),
		Parameter::typed("rest", "int").variadic(),
	];

	let args = resolver.resolve_parameters(&params).unwrap();

	assert_eq!(ints(&args), vec![42, 42]);
	assert_eq!(
		resolver
			.resolve_parameters(&[Parameter::typed("rest", "int").variadic()])
			.unwrap()
			.len(),
		1
	);
}

/// Test variadic binding against three-element sequences in both exhaustion modes
#[rstest]
#[case(Exhaustion::Fail, false)]
#[case(Exhaustion::Wrap, true)]
fn test_variadic_against_sequence(#[case] exhaustion: Exhaustion, #[case] has_after: bool) {
	let repo = Arc::new(Repository::new());
	repo.set_sequence("int", [1i64, 2, 3], exhaustion);
	let resolver = Resolver::new(repo.clone());

	let args = resolver
		.resolve_parameters(&[Parameter::typed("numbers", "int").variadic()])
		.unwrap();

	assert_eq!(ints(&args), vec![1, 2, 3]);
	assert_eq!(repo.has_value("int").unwrap(), has_after);
}

/// Test that a leading single parameter takes from the sequence before the variadic
#[rstest]
fn test_variadic_takes_remainder() {
	let repo = Arc::new(Repository::new());
	repo.set_iterable("int", [10i64, 20, 30]);
	let sum = Function::new(
		vec![
			Parameter::typed("first", "int"),
			Parameter::typed("rest", "int").variadic(),
		],
		|args| {
			let rest: i64 = args.rest::<i64>(1)?.into_iter().sum();
			Ok(*args.get::<i64>(0)? * 100 + rest)
		},
	);

	let result = Resolver::new(repo).call(&sum.into()).unwrap();

	assert_eq!(result.downcast_ref::<i64>(), Some(&1050));
}

/// Test fallback resolution inside a constructor call
#[rstest]
fn test_constructor_receives_fallback_instance() {
	#[derive(Debug, PartialEq)]
	struct Duck;
	struct Zoo {
		resident: Value,
	}

	let mut catalog = TypeCatalog::new();
	catalog
		.register(TypeDef::new("Animal"))
		.register(TypeDef::new("Bird").extends("Animal"))
		.register(TypeDef::new("Duck").extends("Bird"))
		.register(TypeDef::new("Zoo").constructor(Function::new(
			vec![Parameter::typed("resident", "Animal")],
			|args| {
				Ok(Zoo {
					resident: args.value(0).cloned().unwrap_or_default(),
				})
			},
		)));
	let repo = Arc::new(Repository::builder().catalog(Arc::new(catalog)).build());
	repo.set_value("Duck", Duck).fallback("Duck");
	let resolver = Resolver::new(repo);

	let zoo = resolver.instantiate("Zoo").unwrap();

	let zoo = zoo.downcast_ref::<Zoo>().unwrap();
	assert_eq!(zoo.resident.downcast_ref::<Duck>(), Some(&Duck));
}

/// Test rule-built sources keyed on the parameter's type name
#[rstest]
fn test_rules_supply_named_values() {
	let repo = Arc::new(Repository::new());
	repo.set_value("$last_name", "Doe")
		.add_rule(|name| name == "$surname", "$last_name")
		.add_rule_with(
			|name| name.starts_with("$values"),
			|_| {
				SequenceSource::new(
					vec![Value::new(1i64), Value::new(2i64)],
					Exhaustion::Fail,
				)
			},
		);
	let resolver = Resolver::new(repo);
	let params = [
		Parameter::typed("surname", "$surname"),
		Parameter::typed("values", "$values").variadic(),
	];

	let args = resolver.resolve_parameters(&params).unwrap();

	assert_eq!(args[0].downcast_ref::<&str>(), Some(&"Doe"));
	assert_eq!(ints(&args[1..]), vec![1, 2]);
}

/// Test that a redirect lets two resolvers share one sequence
#[rstest]
fn test_redirect_shares_state_between_repositories() {
	let shared = Arc::new(Repository::new());
	shared.set_iterable("ticket", [1i64, 2, 3]);
	let left = Arc::new(Repository::new());
	left.redirect("ticket", shared.clone());
	let right = Arc::new(Repository::new());
	right
		.set_value("ticket", 99i64)
		.redirect("ticket", shared.clone());
	let param = [Parameter::typed("t", "ticket")];

	let a = Resolver::new(left).resolve_parameters(&param).unwrap();
	let b = Resolver::new(right).resolve_parameters(&param).unwrap();

	assert_eq!(ints(&a), vec![1]);
	assert_eq!(ints(&b), vec![2]);
	assert_eq!(ints(&shared.get_values("ticket").unwrap()), vec![3]);
}
