//! Storefront Variants
//!
//! Variant engine behind the admin product form.
//!
//! ## Features
//! - Cartesian generation of variant combinations from named option lists
//! - Boundary parsing of loosely-typed form input
//! - Configurable ceiling on generated combinations
//! - Product draft that reconciles variant rows when types change
//! - Submit validation and payload shaping

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use validator::{Validate, ValidationError};

pub mod config;
pub mod domain;

pub use config::GenerationPolicy;
pub use domain::aggregates::{FormError, ProductDraft, ProductSubmission, VariantDraft};
pub use domain::services::{
    combination_count, definitions_from_value, generate, generate_bounded,
};
pub use domain::value_objects::OptionList;

// =============================================================================
// Core Types
// =============================================================================

/// One named axis of customization, as typed into the admin form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct VariantTypeDefinition {
    #[validate(custom = "not_blank")]
    pub name: String,
    /// Comma-separated option labels, e.g. `"S, M, L"`.
    #[serde(rename = "options", alias = "optionsRaw")]
    pub options_raw: String,
}

impl VariantTypeDefinition {
    /// Builds a definition with a trimmed, non-blank name.
    pub fn new(name: impl Into<String>, options_raw: impl Into<String>) -> Result<Self> {
        let name = domain::value_objects::VariantName::new(name)
            .map_err(|e| VariantError::InvalidInput(e.to_string()))?;
        Ok(Self { name: name.into_inner(), options_raw: options_raw.into() })
    }

    /// Key used in combination maps.
    pub fn key(&self) -> &str { self.name.trim() }

    pub fn options(&self) -> OptionList { OptionList::parse(&self.options_raw) }

    /// Both fields carry something other than whitespace.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.options_raw.trim().is_empty()
    }
}

/// One selected option per variant type: a single sellable SKU.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantCombination(BTreeMap<String, String>);

impl VariantCombination {
    pub fn new() -> Self { Self::default() }
    pub fn get(&self, name: &str) -> Option<&str> { self.0.get(name).map(String::as_str) }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Sets `name` to `value`, replacing any earlier value for the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Display label in definition order, e.g. `"M / Red"`.
    pub fn title(&self, definitions: &[VariantTypeDefinition]) -> String {
        definitions
            .iter()
            .filter_map(|d| self.get(d.key()))
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VariantCombination {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum VariantError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Combination limit exceeded: {requested} requested, limit is {limit}")]
    CombinationLimitExceeded { requested: u128, limit: usize },

    #[error("Variant type {0} not found")]
    NoSuchVariantType(usize),

    #[error("Variant {0} not found")]
    NoSuchVariant(usize),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, VariantError>;
