//! Core contracts shared by the chartguard crates.
//!
//! This crate defines the error taxonomy returned by the contrast evaluator,
//! the chart validator and the sanitizers, plus the structured field issues
//! collected during schema validation.

pub mod error;
pub mod issues;

pub use error::{Error, Result};
pub use issues::{FieldError, ValidationReport};
