//! Engine limits.
//!
//! Every operation in this crate is a pure computation; the only tunables are caps on
//! work that could otherwise run for an unbounded time on adversarial inputs. The
//! defaults leave the searches unbounded and only cap iterator expansion, whose
//! cost grows with the literal iteration count.
//!
//! Example
//! ```
//! use hyordinal::config::EngineConfig;
//!
//! let config = EngineConfig::from_toml_str("scan_limit = 1000\n").unwrap();
//! assert_eq!(config.scan_limit, Some(1000));
//! assert_eq!(config.max_lambda_iterations, EngineConfig::default().max_lambda_iterations);
//! ```
use serde::{Deserialize, Serialize};

use crate::error::OrdinalResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Cap on the unbounded initial scan performed by
    /// [`maximize_one`](crate::maximize::maximize_one). `None` scans until a term is found.
    pub scan_limit: Option<u64>,

    /// Largest literal iteration count an iterator may be expanded with.
    pub max_lambda_iterations: u64,

    /// Cap on the number of [`maximize_one`](crate::maximize::maximize_one) rounds
    /// [`maximize`](crate::maximize::maximize) performs. `None` runs to the fixpoint.
    pub max_rounds: Option<u64>,
}

impl EngineConfig {
    pub const DEFAULT_MAX_LAMBDA_ITERATIONS: u64 = 1 << 16;

    /// Parse a configuration from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> OrdinalResult<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Serialize this configuration to TOML.
    pub fn to_toml_string(&self) -> String {
        // Every field is a plain integer or an optional one; serialization cannot fail.
        toml::to_string(self).unwrap_or_default()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scan_limit: None,
            max_lambda_iterations: Self::DEFAULT_MAX_LAMBDA_ITERATIONS,
            max_rounds: None,
        }
    }
}
