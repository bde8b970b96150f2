//! Generation limits read from the environment.

use serde::{Deserialize, Serialize};

use crate::{Result, VariantError};

/// Environment variable holding the combination ceiling.
pub const MAX_COMBINATIONS_ENV: &str = "VARIANT_MAX_COMBINATIONS";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationPolicy {
    /// Largest number of combinations a single generation may produce.
    pub max_combinations: usize,
}

impl GenerationPolicy {
    pub const DEFAULT_MAX_COMBINATIONS: usize = 500;

    pub fn new(max_combinations: usize) -> Self { Self { max_combinations } }

    /// Reads [`MAX_COMBINATIONS_ENV`], falling back to the default when unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var(MAX_COMBINATIONS_ENV) {
            Ok(raw) => Self::parse(&raw),
            Err(std::env::VarError::NotPresent) => Ok(Self::default()),
            Err(e) => Err(VariantError::InvalidConfig(format!("{MAX_COMBINATIONS_ENV}: {e}"))),
        }
    }

    fn parse(raw: &str) -> Result<Self> {
        let max = raw.trim().parse::<usize>().map_err(|e| {
            VariantError::InvalidConfig(format!("{MAX_COMBINATIONS_ENV}={raw:?}: {e}"))
        })?;
        if max == 0 {
            return Err(VariantError::InvalidConfig(format!("{MAX_COMBINATIONS_ENV} must be positive")));
        }
        Ok(Self::new(max))
    }

    pub fn allows(&self, count: u128) -> bool { count <= self.max_combinations as u128 }
}

impl Default for GenerationPolicy {
    fn default() -> Self { Self::new(Self::DEFAULT_MAX_COMBINATIONS) }
}
