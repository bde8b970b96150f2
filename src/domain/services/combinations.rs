//! Cartesian generation of variant combinations.
//!
//! The first definition is the most significant digit: it varies slowest,
//! the last definition varies fastest.

use tracing::warn;

use crate::config::GenerationPolicy;
use crate::{Result, VariantCombination, VariantError, VariantTypeDefinition};

/// Every combination of options across `definitions`, in nested-loop order.
///
/// No definitions yields the single empty combination. A definition without
/// options yields nothing. When two definitions share a name the later one
/// overwrites the earlier in each combination.
pub fn generate(definitions: &[VariantTypeDefinition]) -> Vec<VariantCombination> {
    let mut combinations = vec![VariantCombination::new()];
    for definition in definitions {
        let options = definition.options();
        let key = definition.key();
        let mut next = Vec::with_capacity(combinations.len() * options.len());
        for combination in &combinations {
            for option in options.iter() {
                next.push(combination.clone().with(key, option));
            }
        }
        combinations = next;
    }
    combinations
}

/// Number of combinations [`generate`] would return. Saturates at `u128::MAX`.
pub fn combination_count(definitions: &[VariantTypeDefinition]) -> u128 {
    definitions
        .iter()
        .map(|d| d.options().len() as u128)
        .try_fold(1u128, |acc, n| acc.checked_mul(n))
        .unwrap_or(u128::MAX)
}

/// [`generate`] behind the policy ceiling, checked before anything is built.
pub fn generate_bounded(
    definitions: &[VariantTypeDefinition],
    policy: &GenerationPolicy,
) -> Result<Vec<VariantCombination>> {
    let requested = combination_count(definitions);
    if !policy.allows(requested) {
        warn!(requested = %requested, limit = policy.max_combinations, "variant combination limit exceeded");
        return Err(VariantError::CombinationLimitExceeded { requested, limit: policy.max_combinations });
    }
    Ok(generate(definitions))
}
