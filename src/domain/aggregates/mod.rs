//! Aggregates module
pub mod product;

pub use product::{
    FormError, ProductDraft, ProductSubmission, SubmittedVariant, SubmittedVariantType, VariantDraft,
};
