//! Repository configuration
//!
//! Every field has a default, so the struct can be embedded in an
//! application's settings file and only the overridden keys need to appear.
//!
//! ```
//! use keel_di::{Exhaustion, RepositoryConfig};
//!
//! let config = RepositoryConfig::default()
//!     .with_max_resolution_depth(16)
//!     .with_default_exhaustion(Exhaustion::Wrap);
//! assert_eq!(config.max_resolution_depth, 16);
//! ```

use crate::cycle_detection::MAX_RESOLUTION_DEPTH;
use crate::source::Exhaustion;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
	/// Maximum number of redirect/alias/rule steps a single lookup may take.
	pub max_resolution_depth: usize,
	/// Exhaustion mode used by [`Repository::set_iterable`](crate::Repository::set_iterable).
	pub default_exhaustion: Exhaustion,
}

impl RepositoryConfig {
	pub fn with_max_resolution_depth(mut self, depth: usize) -> Self {
		self.max_resolution_depth = depth;
		self
	}

	pub fn with_default_exhaustion(mut self, exhaustion: Exhaustion) -> Self {
		self.default_exhaustion = exhaustion;
		self
	}
}

impl Default for RepositoryConfig {
	fn default() -> Self {
		Self {
			max_resolution_depth: MAX_RESOLUTION_DEPTH,
			default_exhaustion: Exhaustion::Fail,
		}
	}
}
