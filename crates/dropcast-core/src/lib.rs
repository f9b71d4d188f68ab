//! Dropcast Core
//!
//! Core types, traits, and utilities shared across Dropcast components.
//!
//! This crate provides:
//! - The 36-field student feature record and its trained column order
//! - Tabular frames and the tagged model input shapes
//! - Outcome metadata for predicted class labels
//! - Error types and result handling

pub mod error;
pub mod fields;
pub mod outcome;
pub mod record;
pub mod types;

pub use error::{Error, Result};
pub use fields::{field_spec, FieldGroup, FieldSpec, FIELD_SPECS};
pub use outcome::Outcome;
pub use record::{FeatureRecord, FEATURE_COUNT, FEATURE_NAMES};
pub use types::{FeatureFrame, ModelInput};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::outcome::Outcome;
    pub use crate::record::{FeatureRecord, FEATURE_NAMES};
    pub use crate::types::{FeatureFrame, ModelInput};
}
