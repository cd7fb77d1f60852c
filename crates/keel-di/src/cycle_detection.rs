//! Cycle detection for name resolution
//!
//! A single lookup walks redirects, aliases and rules. Each step is recorded
//! in a [`ResolutionTrail`] owned by that lookup, so the state never outlives
//! the call and needs no task-local or thread-local storage.
//!
//! ## Features
//!
//! - **Deterministic**: every step is checked against the visited set
//! - **Cross-repository**: steps are keyed by repository identity, so a
//!   redirect chain that comes back to the same repository and name is caught
//! - **Depth Limiting**: `max_depth` bounds pathological but acyclic chains

use std::collections::HashSet;

/// Default maximum resolution depth
pub const MAX_RESOLUTION_DEPTH: usize = 100;

/// Steps visited during one lookup.
#[derive(Debug)]
pub struct ResolutionTrail {
	/// Visited (repository, name) pairs (O(1) circular detection)
	visited: HashSet<(usize, String)>,
	/// Resolution path (for displaying circular paths)
	path: Vec<String>,
	max_depth: usize,
}

impl ResolutionTrail {
	/// Creates an empty trail bounded by `max_depth` steps.
	pub fn new(max_depth: usize) -> Self {
		Self {
			visited: HashSet::new(),
			path: Vec::new(),
			max_depth,
		}
	}

	/// Records a step, failing if it was already visited or the trail is full.
	///
	/// `scope` identifies the repository performing the step.
	pub fn enter(&mut self, scope: usize, name: &str) -> Result<(), CycleError> {
		if self.path.len() >= self.max_depth {
			return Err(CycleError::MaxDepthExceeded(self.path.len() + 1));
		}

		if !self.visited.insert((scope, name.to_string())) {
			return Err(CycleError::CircularResolution {
				name: name.to_string(),
				path: self.cycle_path(name),
			});
		}

		self.path.push(name.to_string());
		Ok(())
	}

	/// Number of recorded steps.
	pub fn depth(&self) -> usize {
		self.path.len()
	}

	/// Names visited so far, in order.
	pub fn path(&self) -> &[String] {
		&self.path
	}

	fn cycle_path(&self, name: &str) -> String {
		match self.path.iter().rposition(|visited| visited == name) {
			Some(start) => format!("{} -> {}", self.path[start..].join(" -> "), name),
			None => format!("Unknown cycle involving {}", name),
		}
	}
}

/// Circular resolution error
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
	/// A name was reached twice during one lookup
	#[error("Circular dependency resolution: {name}\n  Path: {path}")]
	CircularResolution {
		/// Name that closed the cycle
		name: String,
		/// Circular path (format: a -> b -> a)
		path: String,
	},

	/// Maximum resolution depth exceeded
	#[error(
		"Maximum resolution depth exceeded: {0}\nThis likely indicates an extremely deep alias, redirect or rule chain."
	)]
	MaxDepthExceeded(usize),
}
