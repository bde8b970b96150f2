//! Product Draft Aggregate
//!
//! Unsaved state of the admin product form. Editing the variant types
//! regenerates the variant rows; rows whose combination survives keep their
//! price, stock and image.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::config::GenerationPolicy;
use crate::domain::events::{DomainEvent, VariantEvent};
use crate::domain::services::generate_bounded;
use crate::domain::value_objects::{Price, Stock};
use crate::{Result, VariantCombination, VariantError, VariantTypeDefinition};

/// One variant row: a combination plus what the admin typed for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariantDraft {
    pub id: Uuid,
    pub variant_map: VariantCombination,
    pub price: Option<Price>,
    pub stock: Stock,
    pub image_url: String,
}

impl VariantDraft {
    fn new(variant_map: VariantCombination, price: Option<Price>) -> Self {
        Self { id: Uuid::now_v7(), variant_map, price, stock: Stock::default(), image_url: String::new() }
    }
}

#[derive(Clone, Debug)]
pub struct ProductDraft {
    id: Uuid,
    name: String,
    description: String,
    price: Option<Price>,
    quantity: Option<i64>,
    category_id: Option<String>,
    has_variants: bool,
    variant_types: Vec<VariantTypeDefinition>,
    variants: Vec<VariantDraft>,
    policy: GenerationPolicy,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    events: Vec<DomainEvent>,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(), name: name.into(), description: String::new(), price: None,
            quantity: None, category_id: None, has_variants: false, variant_types: vec![],
            variants: vec![], policy: GenerationPolicy::default(), created_at: now,
            updated_at: now, events: vec![],
        }
    }

    pub fn with_policy(mut self, policy: GenerationPolicy) -> Self { self.policy = policy; self }

    pub fn id(&self) -> Uuid { self.id }
    pub fn name(&self) -> &str { &self.name }
    pub fn price(&self) -> Option<Price> { self.price }
    pub fn has_variants(&self) -> bool { self.has_variants }
    pub fn variant_types(&self) -> &[VariantTypeDefinition] { &self.variant_types }
    pub fn variants(&self) -> &[VariantDraft] { &self.variants }
    pub fn policy(&self) -> &GenerationPolicy { &self.policy }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }
    pub fn updated_at(&self) -> DateTime<Utc> { self.updated_at }

    pub fn set_name(&mut self, name: impl Into<String>) { self.name = name.into(); self.touch(); }
    pub fn set_description(&mut self, text: impl Into<String>) { self.description = text.into(); self.touch(); }
    pub fn set_price(&mut self, raw: &str) { self.price = Price::parse(raw); self.touch(); }
    pub fn set_quantity(&mut self, raw: &str) { self.quantity = raw.trim().parse().ok(); self.touch(); }

    pub fn set_category(&mut self, category_id: impl Into<String>) {
        let category_id = category_id.into();
        self.category_id = (!category_id.trim().is_empty()).then_some(category_id);
        self.touch();
    }

    /// Turning variants off drops every type and row.
    pub fn set_has_variants(&mut self, enabled: bool) {
        self.has_variants = enabled;
        if !enabled {
            self.variant_types.clear();
            self.variants.clear();
            self.raise_event(DomainEvent::Variant(VariantEvent::Disabled));
        }
        self.touch();
    }

    // -------------------------------------------------------------------------
    // Variant types
    // -------------------------------------------------------------------------

    /// Appends an empty type row and returns its index.
    pub fn add_variant_type(&mut self) -> Result<usize> {
        self.variant_types.push(VariantTypeDefinition::default());
        self.types_changed()?;
        Ok(self.variant_types.len() - 1)
    }

    pub fn set_variant_type_name(&mut self, index: usize, name: impl Into<String>) -> Result<()> {
        self.variant_type_mut(index)?.name = name.into();
        self.types_changed()
    }

    pub fn set_variant_type_options(&mut self, index: usize, options_raw: impl Into<String>) -> Result<()> {
        self.variant_type_mut(index)?.options_raw = options_raw.into();
        self.types_changed()
    }

    pub fn remove_variant_type(&mut self, index: usize) -> Result<VariantTypeDefinition> {
        if index >= self.variant_types.len() { return Err(VariantError::NoSuchVariantType(index)); }
        let removed = self.variant_types.remove(index);
        self.types_changed()?;
        Ok(removed)
    }

    fn variant_type_mut(&mut self, index: usize) -> Result<&mut VariantTypeDefinition> {
        self.variant_types.get_mut(index).ok_or(VariantError::NoSuchVariantType(index))
    }

    fn types_changed(&mut self) -> Result<()> {
        self.touch();
        self.raise_event(DomainEvent::Variant(VariantEvent::TypesChanged { types: self.variant_types.len() }));
        self.regenerate()
    }

    /// Rebuilds the rows from the current types.
    ///
    /// Does nothing while variants are off or no type exists. Any incomplete
    /// type clears the rows. A limit violation leaves the rows as they were.
    pub fn regenerate(&mut self) -> Result<()> {
        if !self.has_variants || self.variant_types.is_empty() { return Ok(()); }
        if !self.variant_types.iter().all(VariantTypeDefinition::is_complete) {
            self.variants.clear();
            self.raise_event(DomainEvent::Variant(VariantEvent::Cleared));
            return Ok(());
        }

        let combinations = generate_bounded(&self.variant_types, &self.policy)?;
        let mut previous = std::mem::take(&mut self.variants);
        let base_price = self.price;
        self.variants = combinations
            .into_iter()
            .map(|variant_map| match previous.iter().position(|v| v.variant_map == variant_map) {
                Some(pos) => {
                    let existing = previous.remove(pos);
                    VariantDraft { price: existing.price.or(base_price), ..existing }
                }
                None => VariantDraft::new(variant_map, base_price),
            })
            .collect();

        debug!(product_id = %self.id, combinations = self.variants.len(), "regenerated variant rows");
        self.raise_event(DomainEvent::Variant(VariantEvent::Regenerated { combinations: self.variants.len() }));
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Variant rows
    // -------------------------------------------------------------------------

    /// Appends a manual row preset to the first option of each type.
    pub fn add_variant(&mut self) -> usize {
        let variant_map = self
            .variant_types
            .iter()
            .filter(|vt| !vt.options_raw.trim().is_empty())
            .map(|vt| (vt.key(), vt.options_raw.split(',').next().map(str::trim).unwrap_or_default()))
            .collect();
        self.variants.push(VariantDraft::new(variant_map, None));
        let index = self.variants.len() - 1;
        self.raise_event(DomainEvent::Variant(VariantEvent::Added { index }));
        self.touch();
        index
    }

    pub fn set_variant_price(&mut self, index: usize, raw: &str) -> Result<()> {
        self.variant_mut(index)?.price = Price::parse(raw);
        Ok(())
    }

    pub fn set_variant_stock(&mut self, index: usize, raw: &str) -> Result<()> {
        self.variant_mut(index)?.stock = Stock::parse(raw);
        Ok(())
    }

    pub fn set_variant_image(&mut self, index: usize, url: impl Into<String>) -> Result<()> {
        self.variant_mut(index)?.image_url = url.into();
        Ok(())
    }

    pub fn set_variant_option(&mut self, index: usize, name: &str, value: impl Into<String>) -> Result<()> {
        self.variant_mut(index)?.variant_map.insert(name, value);
        Ok(())
    }

    pub fn remove_variant(&mut self, index: usize) -> Result<VariantDraft> {
        if index >= self.variants.len() { return Err(VariantError::NoSuchVariant(index)); }
        let removed = self.variants.remove(index);
        self.raise_event(DomainEvent::Variant(VariantEvent::Removed { index }));
        self.touch();
        Ok(removed)
    }

    fn variant_mut(&mut self, index: usize) -> Result<&mut VariantDraft> {
        self.touch();
        self.variants.get_mut(index).ok_or(VariantError::NoSuchVariant(index))
    }

    // -------------------------------------------------------------------------
    // Submit
    // -------------------------------------------------------------------------

    /// Form checks, first failure wins.
    pub fn validate(&self) -> std::result::Result<(), FormError> {
        if self.name.trim().is_empty() { return Err(FormError::MissingName); }
        if !self.price.is_some_and(|p| p.is_positive()) { return Err(FormError::InvalidPrice); }
        if !self.quantity.is_some_and(|q| q >= 0) { return Err(FormError::InvalidQuantity); }
        if self.category_id.is_none() { return Err(FormError::MissingCategory); }
        if !self.has_variants { return Ok(()); }

        if self.variant_types.is_empty() { return Err(FormError::NoVariantTypes); }
        for (i, vt) in self.variant_types.iter().enumerate() {
            if vt.name.trim().is_empty() { return Err(FormError::UnnamedVariantType(i)); }
            if vt.options_raw.trim().is_empty() { return Err(FormError::VariantTypeWithoutOptions(i)); }
        }
        if self.variants.is_empty() { return Err(FormError::NoVariants); }
        for (i, v) in self.variants.iter().enumerate() {
            if !v.price.is_some_and(|p| p.is_positive()) { return Err(FormError::InvalidVariantPrice(i)); }
            if v.stock.is_negative() { return Err(FormError::NegativeVariantStock(i)); }
        }
        Ok(())
    }

    /// Validated payload for the product endpoint.
    pub fn to_submission(&self) -> Result<ProductSubmission> {
        self.validate()?;
        let (variant_types, variants) = if self.has_variants {
            (
                self.variant_types
                    .iter()
                    .map(|vt| SubmittedVariantType { name: vt.key().to_string(), options: vt.options().into_vec() })
                    .collect(),
                self.variants
                    .iter()
                    .map(|v| SubmittedVariant {
                        variant_map: v.variant_map.clone(),
                        price: v.price.map(|p| p.amount()).unwrap_or_default(),
                        stock: v.stock.value(),
                        image_url: v.image_url.clone(),
                    })
                    .collect(),
            )
        } else {
            (vec![], vec![])
        };
        let submission = ProductSubmission {
            name: self.name.trim().to_string(),
            description: self.description.clone(),
            price: self.price.map(|p| p.amount()).unwrap_or_default(),
            quantity: self.quantity.unwrap_or_default(),
            category_id: self.category_id.clone().unwrap_or_default(),
            has_variants: self.has_variants,
            variant_types,
            variants,
        };
        submission.validate()?;
        Ok(submission)
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }
    fn touch(&mut self) { self.updated_at = Utc::now(); }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Product name is required")]
    MissingName,
    #[error("Valid price is required")]
    InvalidPrice,
    #[error("Valid quantity is required")]
    InvalidQuantity,
    #[error("Category is required")]
    MissingCategory,
    #[error("At least one variant type is required when variants are enabled")]
    NoVariantTypes,
    #[error("All variant types must have a name (type {0})")]
    UnnamedVariantType(usize),
    #[error("All variant types must have options (type {0})")]
    VariantTypeWithoutOptions(usize),
    #[error("At least one variant is required when variants are enabled")]
    NoVariants,
    #[error("All variants must have a valid price (variant {0})")]
    InvalidVariantPrice(usize),
    #[error("Variant stock cannot be negative (variant {0})")]
    NegativeVariantStock(usize),
}

// =============================================================================
// Submission payload
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductSubmission {
    #[validate(length(min = 1))]
    pub name: String,
    pub description: String,
    #[validate(custom = "positive_price")]
    pub price: Decimal,
    #[validate(custom = "non_negative")]
    pub quantity: i64,
    #[validate(length(min = 1))]
    pub category_id: String,
    pub has_variants: bool,
    #[validate]
    pub variant_types: Vec<SubmittedVariantType>,
    #[validate]
    pub variants: Vec<SubmittedVariant>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Validate)]
pub struct SubmittedVariantType {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub options: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedVariant {
    pub variant_map: VariantCombination,
    #[validate(custom = "positive_price")]
    pub price: Decimal,
    #[validate(custom = "non_negative")]
    pub stock: i64,
    pub image_url: String,
}

fn positive_price(value: &Decimal) -> std::result::Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(ValidationError::new("price_not_positive"));
    }
    Ok(())
}

fn non_negative(value: i64) -> std::result::Result<(), ValidationError> {
    if value < 0 {
        return Err(ValidationError::new("negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sized_draft() -> ProductDraft {
        let mut p = ProductDraft::new("Tee");
        p.set_price("20");
        p.set_quantity("10");
        p.set_category("7");
        p.set_has_variants(true);
        let size = p.add_variant_type().unwrap();
        p.set_variant_type_name(size, "Size").unwrap();
        p.set_variant_type_options(size, "S, M").unwrap();
        p
    }

    fn p_title(p: &ProductDraft, v: &VariantDraft) -> String {
        v.variant_map.title(p.variant_types())
    }

    fn value(v: &VariantDraft, name: &str) -> String {
        v.variant_map.get(name).unwrap_or_default().to_string()
    }

    #[test]
    fn test_rows_follow_types() {
        let mut p = sized_draft();
        assert_eq!(p.variants().len(), 2);
        let color = p.add_variant_type().unwrap();
        // incomplete type clears the rows
        assert!(p.variants().is_empty());
        p.set_variant_type_name(color, "Color").unwrap();
        p.set_variant_type_options(color, "Red, Blue").unwrap();
        let labels: Vec<String> = p.variants().iter().map(|v| p_title(&p, v)).collect();
        assert_eq!(labels, vec!["S / Red", "S / Blue", "M / Red", "M / Blue"]);
        assert!(p.variants().iter().all(|v| v.price == Price::parse("20")));
    }

    #[test]
    fn test_regeneration_keeps_surviving_rows() {
        let mut p = sized_draft();
        p.set_variant_price(1, "25.50").unwrap();
        p.set_variant_stock(1, "4").unwrap();
        p.set_variant_image(1, "m.jpg").unwrap();
        let kept_id = p.variants()[1].id;

        p.set_variant_type_options(0, "M, L").unwrap();
        let m = &p.variants()[0];
        assert_eq!(value(m, "Size"), "M");
        assert_eq!(m.id, kept_id);
        assert_eq!(m.price, Price::parse("25.50"));
        assert_eq!(m.stock.value(), 4);
        assert_eq!(m.image_url, "m.jpg");
        let l = &p.variants()[1];
        assert_eq!(l.stock.value(), 0);
        assert_eq!(l.price, Price::parse("20"));
    }

    #[test]
    fn test_duplicate_options_get_distinct_rows() {
        let mut p = sized_draft();
        p.set_variant_type_options(0, "S, S").unwrap();
        assert_eq!(p.variants().len(), 2);
        assert_ne!(p.variants()[0].id, p.variants()[1].id);
    }

    #[test]
    fn test_limit_leaves_rows_untouched() {
        let mut p = sized_draft().with_policy(GenerationPolicy::new(3));
        let before = p.variants().to_vec();
        let err = p.set_variant_type_options(0, "S, M, L, XL").unwrap_err();
        assert!(matches!(err, VariantError::CombinationLimitExceeded { requested: 4, limit: 3 }));
        assert_eq!(p.variants(), before.as_slice());
    }

    #[test]
    fn test_disable_clears_everything() {
        let mut p = sized_draft();
        p.take_events();
        p.set_has_variants(false);
        assert!(p.variant_types().is_empty());
        assert!(p.variants().is_empty());
        assert_eq!(p.take_events(), vec![DomainEvent::Variant(VariantEvent::Disabled)]);
    }

    #[test]
    fn test_manual_variant_uses_first_tokens() {
        let mut p = sized_draft();
        let color = p.add_variant_type().unwrap();
        p.set_variant_type_name(color, "Color").unwrap();
        let i = p.add_variant();
        let v = &p.variants()[i];
        assert_eq!(value(v, "Size"), "S");
        assert_eq!(v.variant_map.get("Color"), None);
        assert!(v.price.is_none());
        p.set_variant_option(i, "Size", "M").unwrap();
        assert_eq!(value(&p.variants()[i], "Size"), "M");
    }

    #[test]
    fn test_manual_variant_takes_first_raw_token() {
        let mut p = sized_draft();
        p.set_variant_type_options(0, ", M").unwrap();
        let i = p.add_variant();
        assert_eq!(p.variants()[i].variant_map.get("Size"), Some(""));
    }

    #[test]
    fn test_index_errors() {
        let mut p = sized_draft();
        assert!(matches!(p.remove_variant(9), Err(VariantError::NoSuchVariant(9))));
        assert!(matches!(p.set_variant_type_name(3, "x"), Err(VariantError::NoSuchVariantType(3))));
        assert!(matches!(p.remove_variant_type(3), Err(VariantError::NoSuchVariantType(3))));
    }

    #[test]
    fn test_validation_order() {
        let mut p = ProductDraft::new(" ");
        assert_eq!(p.validate(), Err(FormError::MissingName));
        p.set_name("Tee");
        p.set_price("0");
        assert_eq!(p.validate(), Err(FormError::InvalidPrice));
        p.set_price("9.99");
        assert_eq!(p.validate(), Err(FormError::InvalidQuantity));
        p.set_quantity("-1");
        assert_eq!(p.validate(), Err(FormError::InvalidQuantity));
        p.set_quantity("0");
        assert_eq!(p.validate(), Err(FormError::MissingCategory));
        p.set_category("3");
        assert_eq!(p.validate(), Ok(()));
        p.set_has_variants(true);
        assert_eq!(p.validate(), Err(FormError::NoVariantTypes));
        p.add_variant_type().unwrap();
        assert_eq!(p.validate(), Err(FormError::UnnamedVariantType(0)));
        p.set_variant_type_name(0, "Size").unwrap();
        assert_eq!(p.validate(), Err(FormError::VariantTypeWithoutOptions(0)));
        p.set_variant_type_options(0, "S").unwrap();
        assert_eq!(p.validate(), Ok(()));
        p.set_variant_stock(0, "-2").unwrap();
        assert_eq!(p.validate(), Err(FormError::NegativeVariantStock(0)));
        p.set_variant_price(0, "").unwrap();
        assert_eq!(p.validate(), Err(FormError::InvalidVariantPrice(0)));
        p.remove_variant(0).unwrap();
        assert_eq!(p.validate(), Err(FormError::NoVariants));
    }

    #[test]
    fn test_submission_payload() {
        let mut p = sized_draft();
        p.set_variant_type_name(0, " Size ").unwrap();
        p.set_variant_stock(0, "3").unwrap();
        let payload = serde_json::to_value(p.to_submission().unwrap()).unwrap();
        assert_eq!(payload["categoryId"], "7");
        assert_eq!(payload["hasVariants"], true);
        assert_eq!(payload["variantTypes"], serde_json::json!([{"name": "Size", "options": ["S", "M"]}]));
        assert_eq!(payload["variants"][0]["variantMap"], serde_json::json!({"Size": "S"}));
        assert_eq!(payload["variants"][0]["stock"], 3);
        assert_eq!(payload["variants"][1]["imageUrl"], "");
    }

    #[test]
    fn test_payload_rules_check_counts() {
        assert!(non_negative(0).is_ok());
        assert!(non_negative(-1).is_err());
        let mut payload = sized_draft().to_submission().unwrap();
        payload.variants[0].stock = -1;
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_submission_rejects_invalid_form() {
        let p = ProductDraft::new("Tee");
        assert!(matches!(p.to_submission(), Err(VariantError::Form(FormError::InvalidPrice))));
    }
}
