//! Tree configuration.
//!
//! Configurations are JSON objects like:
//! ```json
//! {"max_depth": 32, "wildcard_principal": "everyone"}
//! {"wildcard_principal": null}
//! ```
//! Missing fields take their defaults.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default number of path segments a node may sit below the root.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Upper bound on any configured depth. Rendering, counting, search and
/// dropping a tree all recurse once per level.
pub const MAX_DEPTH_CEILING: usize = 256;

/// Default principal whose grants apply to every principal.
pub const DEFAULT_WILDCARD_PRINCIPAL: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TreeConfig {
    /// Creating a node with more path segments than this fails with
    /// [`Error::DepthLimit`]. Values above [`MAX_DEPTH_CEILING`] act as the
    /// ceiling.
    pub max_depth: usize,

    /// Principal consulted after the requesting one during access checks.
    /// `None` disables the fallback.
    pub wildcard_principal: Option<String>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            wildcard_principal: Some(DEFAULT_WILDCARD_PRINCIPAL.to_string()),
        }
    }
}

impl TreeConfig {
    /// Defaults without a wildcard principal.
    pub fn strict() -> Self {
        Self {
            wildcard_principal: None,
            ..Self::default()
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s).map_err(|e| Error::Config {
            message: e.to_string(),
        })?;
        if config.max_depth > MAX_DEPTH_CEILING {
            return Err(Error::Config {
                message: format!(
                    "max_depth {} exceeds the ceiling of {}",
                    config.max_depth, MAX_DEPTH_CEILING
                ),
            });
        }
        Ok(config)
    }

    /// The depth limit actually enforced.
    pub fn depth_limit(&self) -> usize {
        self.max_depth.min(MAX_DEPTH_CEILING)
    }

    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    #[must_use]
    pub fn with_wildcard_principal(mut self, principal: Option<&str>) -> Self {
        self.wildcard_principal = principal.map(str::to_string);
        self
    }
}
