//! Dependency repository
//!
//! The repository maps dependency names to [`DependencySource`]s and resolves
//! a requested name in this order:
//!
//! 1. **Redirect**: the whole lookup is delegated to another repository
//! 2. **Direct**: a source registered under the name
//! 3. **Alias**: the alias target, resolved again from step 2
//! 4. **Fallback**: if the name is a catalog type, the first registered
//!    fallback type that is-a that type
//! 5. **Rule**: the first custom rule whose predicate matches, resolved again
//!    from step 1
//!
//! Every lookup carries a [`ResolutionTrail`], so alias, redirect and rule
//! cycles fail with [`CycleError`](crate::CycleError) instead of looping.
//!
//! # Examples
//!
//! ```
//! use keel_di::Repository;
//!
//! let repo = Repository::new();
//! repo.set_value("int", 42i32)
//!     .set_iterable("string", ["John", "Mark"])
//!     .alias("int", "integer");
//!
//! assert_eq!(repo.get_value("integer").unwrap().downcast_ref::<i32>(), Some(&42));
//! assert_eq!(repo.get_value("string").unwrap().downcast_ref::<&str>(), Some(&"John"));
//! assert_eq!(repo.get_values("string").unwrap().len(), 1);
//! assert!(!repo.has_value("string").unwrap());
//! ```

use crate::catalog::TypeCatalog;
use crate::config::RepositoryConfig;
use crate::cycle_detection::ResolutionTrail;
use crate::rules::{Rule, RuleSource, RuleTarget, SourceBuilder};
use crate::source::{DependencySource, Exhaustion, FactorySource, SequenceSource, ValueSource};
use crate::{DiError, DiResult, Value};
use parking_lot::{Mutex, RwLock};
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace, warn};

type SharedSource = Arc<Mutex<Box<dyn DependencySource>>>;

/// Whether a lookup may keep the rule source it builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
	/// Existence check: nothing is registered.
	Probe,
	/// Value access: a rule source is kept for later lookups.
	Use,
}

/// Registry of named dependency sources.
///
/// All operations take `&self`, so a repository can be shared through an
/// `Arc` with a [`Resolver`](crate::Resolver) and used as a redirect target
/// by other repositories. Each source is locked while it is read; a factory
/// callback must not read the same dependency it is serving.
pub struct Repository {
	dependencies: RwLock<HashMap<String, SharedSource>>,
	aliases: RwLock<HashMap<String, String>>,
	redirects: RwLock<HashMap<String, Arc<Repository>>>,
	fallbacks: RwLock<Vec<String>>,
	rules: RwLock<Vec<Rule>>,
	/// Sources built by rules, keyed by (rule index, requested name)
	rule_sources: RwLock<HashMap<(usize, String), SharedSource>>,
	catalog: Arc<TypeCatalog>,
	config: RepositoryConfig,
}

/// Builder for [`Repository`].
#[derive(Debug, Default)]
pub struct RepositoryBuilder {
	catalog: Option<Arc<TypeCatalog>>,
	config: RepositoryConfig,
}

impl RepositoryBuilder {
	/// Type catalog consulted by fallback resolution and instantiation.
	pub fn catalog(mut self, catalog: Arc<TypeCatalog>) -> Self {
		self.catalog = Some(catalog);
		self
	}

	pub fn config(mut self, config: RepositoryConfig) -> Self {
		self.config = config;
		self
	}

	pub fn build(self) -> Repository {
		Repository {
			dependencies: RwLock::new(HashMap::new()),
			aliases: RwLock::new(HashMap::new()),
			redirects: RwLock::new(HashMap::new()),
			fallbacks: RwLock::new(Vec::new()),
			rules: RwLock::new(Vec::new()),
			rule_sources: RwLock::new(HashMap::new()),
			catalog: self.catalog.unwrap_or_default(),
			config: self.config,
		}
	}
}

impl Repository {
	/// Creates a repository with an empty catalog and default configuration.
	pub fn new() -> Self {
		Self::builder().build()
	}

	pub fn builder() -> RepositoryBuilder {
		RepositoryBuilder::default()
	}

	pub fn catalog(&self) -> &TypeCatalog {
		&self.catalog
	}

	pub fn config(&self) -> &RepositoryConfig {
		&self.config
	}

	// ---------------------------------------------------------------------
	// Registration
	// ---------------------------------------------------------------------

	/// Registers a value that is handed out on every request.
	pub fn set_value<T: Any + Send + Sync>(&self, name: impl Into<String>, value: T) -> &Self {
		self.insert(name.into(), Box::new(ValueSource::new(Value::new(value))))
	}

	/// Registers a sequence using the configured default exhaustion mode.
	pub fn set_iterable<I, T>(&self, name: impl Into<String>, values: I) -> &Self
	where
		I: IntoIterator<Item = T>,
		T: Any + Send + Sync,
	{
		self.set_sequence(name, values, self.config.default_exhaustion)
	}

	/// Registers a sequence that starts over after its last element.
	pub fn set_cycle<I, T>(&self, name: impl Into<String>, values: I) -> &Self
	where
		I: IntoIterator<Item = T>,
		T: Any + Send + Sync,
	{
		self.set_sequence(name, values, Exhaustion::Wrap)
	}

	pub fn set_sequence<I, T>(&self, name: impl Into<String>, values: I, exhaustion: Exhaustion) -> &Self
	where
		I: IntoIterator<Item = T>,
		T: Any + Send + Sync,
	{
		let values = values.into_iter().map(Value::new).collect();
		self.insert(name.into(), Box::new(SequenceSource::new(values, exhaustion)))
	}

	/// Registers a getter invoked on every request.
	pub fn set_factory<T, F>(&self, name: impl Into<String>, getter: F) -> &Self
	where
		T: Any + Send + Sync,
		F: FnMut() -> T + Send + 'static,
	{
		self.insert(name.into(), Box::new(FactorySource::new(getter)))
	}

	/// Registers a getter together with the tester answering `has_value`.
	pub fn set_factory_with_tester<T, F, H>(&self, name: impl Into<String>, getter: F, tester: H) -> &Self
	where
		T: Any + Send + Sync,
		F: FnMut() -> T + Send + 'static,
		H: FnMut() -> bool + Send + 'static,
	{
		self.insert(
			name.into(),
			Box::new(FactorySource::new(getter).with_tester(tester)),
		)
	}

	/// Registers an externally built source.
	pub fn set_custom<S: DependencySource + 'static>(&self, name: impl Into<String>, source: S) -> &Self {
		self.insert(name.into(), Box::new(source))
	}

	/// Unregisters the source stored under `name`.
	pub fn remove_dependency(&self, name: &str) -> &Self {
		if self.dependencies.write().remove(name).is_some() {
			debug!(name = %name, "Removed dependency");
		}
		self
	}

	/// Makes `alias` resolve to whatever `target` resolves to at lookup time.
	pub fn alias(&self, target: impl Into<String>, alias: impl Into<String>) -> &Self {
		let (target, alias) = (target.into(), alias.into());
		debug!(from = %alias, to = %target, "Registered alias");
		self.aliases.write().insert(alias, target);
		self
	}

	/// Delegates every lookup of `name` to `repository`.
	pub fn redirect(&self, name: impl Into<String>, repository: Arc<Repository>) -> &Self {
		let name = name.into();
		debug!(name = %name, "Registered redirect");
		self.redirects.write().insert(name, repository);
		self
	}

	/// Lets the source registered under `type_name` stand in for any of its
	/// ancestor types that have no registration of their own.
	pub fn fallback(&self, type_name: impl Into<String>) -> &Self {
		let type_name = type_name.into();
		debug!(type_name = %type_name, "Registered fallback");
		self.fallbacks.write().push(type_name);
		self
	}

	/// Adds a rule resolving every matching name to `target`.
	pub fn add_rule<P>(&self, test: P, target: impl Into<String>) -> &Self
	where
		P: Fn(&str) -> bool + Send + Sync + 'static,
	{
		self.push_rule(Rule {
			test: Arc::new(test),
			target: RuleTarget::Name(target.into()),
		})
	}

	/// Adds a rule building a source for every matching name.
	///
	/// The builder runs at most once per requested name, on first use.
	pub fn add_rule_with<P, B, S>(&self, test: P, builder: B) -> &Self
	where
		P: Fn(&str) -> bool + Send + Sync + 'static,
		B: Fn(&str) -> S + Send + Sync + 'static,
		S: DependencySource + 'static,
	{
		self.push_rule(Rule {
			test: Arc::new(test),
			target: RuleTarget::Build(Arc::new(move |name: &str| {
				Box::new(builder(name)) as Box<dyn DependencySource>
			})),
		})
	}

	fn push_rule(&self, rule: Rule) -> &Self {
		let mut rules = self.rules.write();
		rules.push(rule);
		debug!(index = rules.len() - 1, "Registered resolution rule");
		self
	}

	fn insert(&self, name: String, source: Box<dyn DependencySource>) -> &Self {
		debug!(name = %name, "Registered dependency");
		self.dependencies
			.write()
			.insert(name, Arc::new(Mutex::new(source)));
		self
	}

	// ---------------------------------------------------------------------
	// Lookup
	// ---------------------------------------------------------------------

	/// Whether `name` resolves to a source. Never consumes sequence state
	/// and never registers anything.
	///
	/// A resolution cycle is logged and reported as `false`; use
	/// [`check_dependency`](Self::check_dependency) to observe it.
	pub fn has_dependency(&self, name: &str) -> bool {
		self.check_dependency(name).unwrap_or_else(|error| {
			warn!(name = %name, error = %error, "Dependency lookup failed");
			false
		})
	}

	/// Like [`has_dependency`](Self::has_dependency), surfacing cycle errors.
	pub fn check_dependency(&self, name: &str) -> DiResult<bool> {
		Ok(self.find(name, Lookup::Probe)?.is_some())
	}

	/// Whether the resolved source has a pending value.
	pub fn has_value(&self, name: &str) -> DiResult<bool> {
		let source = self.require(name)?;
		let mut source = source.lock();
		Ok(source.has())
	}

	/// Takes the next value from the resolved source.
	pub fn get_value(&self, name: &str) -> DiResult<Value> {
		let source = self.require(name)?;
		let mut source = source.lock();
		if !source.has() {
			return Err(DiError::exhausted(name));
		}
		source.get()
	}

	/// Takes every pending value from the resolved source.
	pub fn get_values(&self, name: &str) -> DiResult<Vec<Value>> {
		let source = self.require(name)?;
		let mut source = source.lock();
		source.get_all()
	}

	/// Names with a direct registration, sorted.
	pub fn names(&self) -> Vec<String> {
		let mut names: Vec<String> = self.dependencies.read().keys().cloned().collect();
		names.sort();
		names
	}

	/// Number of direct registrations.
	pub fn len(&self) -> usize {
		self.dependencies.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.dependencies.read().is_empty()
	}

	fn require(&self, name: &str) -> DiResult<SharedSource> {
		self.find(name, Lookup::Use)?
			.ok_or_else(|| DiError::not_found(name))
	}

	fn find(&self, name: &str, lookup: Lookup) -> DiResult<Option<SharedSource>> {
		let mut trail = ResolutionTrail::new(self.config.max_resolution_depth);
		self.resolve(name, &mut trail, lookup)
	}

	fn scope_id(&self) -> usize {
		self as *const Repository as usize
	}

	/// Full resolution chain starting at the redirect check.
	fn resolve(
		&self,
		name: &str,
		trail: &mut ResolutionTrail,
		lookup: Lookup,
	) -> DiResult<Option<SharedSource>> {
		trail.enter(self.scope_id(), name)?;

		let redirect = self.redirects.read().get(name).cloned();
		if let Some(target) = redirect {
			trace!(name = %name, "Following redirect");
			return target.resolve(name, trail, lookup);
		}

		self.resolve_local(name, trail, lookup)
	}

	/// Resolution chain starting at the direct lookup.
	fn resolve_local(
		&self,
		name: &str,
		trail: &mut ResolutionTrail,
		lookup: Lookup,
	) -> DiResult<Option<SharedSource>> {
		if let Some(source) = self.direct(name) {
			return Ok(Some(source));
		}

		let alias = self.aliases.read().get(name).cloned();
		if let Some(target) = alias {
			trace!(from = %name, to = %target, "Following alias");
			trail.enter(self.scope_id(), &target)?;
			return self.resolve_local(&target, trail, lookup);
		}

		if let Some(source) = self.resolve_fallback(name) {
			return Ok(Some(source));
		}

		self.resolve_rule(name, trail, lookup)
	}

	fn direct(&self, name: &str) -> Option<SharedSource> {
		self.dependencies.read().get(name).cloned()
	}

	fn resolve_fallback(&self, name: &str) -> Option<SharedSource> {
		if !self.catalog.exists(name) {
			return None;
		}

		let fallbacks = self.fallbacks.read().clone();
		fallbacks
			.iter()
			.filter(|fallback| self.catalog.is_a(fallback, name))
			.find_map(|fallback| {
				let source = self.direct(fallback)?;
				trace!(name = %name, fallback = %fallback, "Using fallback");
				Some(source)
			})
	}

	fn resolve_rule(
		&self,
		name: &str,
		trail: &mut ResolutionTrail,
		lookup: Lookup,
	) -> DiResult<Option<SharedSource>> {
		let matched = self
			.rules
			.read()
			.iter()
			.enumerate()
			.find(|(_, rule)| rule.matches(name))
			.map(|(index, rule)| (index, rule.target.clone()));

		let Some((index, target)) = matched else {
			return Ok(None);
		};

		match target {
			RuleTarget::Name(target) => {
				trace!(name = %name, rule = index, to = %target, "Rule resolves to name");
				self.resolve(&target, trail, lookup)
			}
			RuleTarget::Build(builder) => {
				trace!(name = %name, rule = index, "Rule resolves to built source");
				Ok(Some(self.rule_source(index, name, builder, lookup)))
			}
		}
	}

	/// Returns the source a builder rule supplies for `name`.
	///
	/// Each (rule, name) pair gets one source, kept apart from the named
	/// registrations. A probe of a pair that has not been used yet gets a
	/// throwaway source; the builder itself only runs on first read.
	fn rule_source(
		&self,
		index: usize,
		name: &str,
		builder: SourceBuilder,
		lookup: Lookup,
	) -> SharedSource {
		let slot = (index, name.to_string());
		if let Some(source) = self.rule_sources.read().get(&slot) {
			return source.clone();
		}

		let fresh = || -> SharedSource {
			let source: Box<dyn DependencySource> = Box::new(RuleSource::new(name, builder));
			Arc::new(Mutex::new(source))
		};
		match lookup {
			Lookup::Probe => fresh(),
			Lookup::Use => {
				debug!(name = %name, rule = index, "Registered rule source");
				self.rule_sources
					.write()
					.entry(slot)
					.or_insert_with(fresh)
					.clone()
			}
		}
	}
}

impl Default for Repository {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for Repository {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Repository")
			.field("dependencies", &self.names())
			.field("aliases", &*self.aliases.read())
			.field("redirects", &self.redirects.read().keys().collect::<Vec<_>>())
			.field("fallbacks", &*self.fallbacks.read())
			.field("rules", &self.rules.read().len())
			.finish()
	}
}
