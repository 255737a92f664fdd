//! Core document model and validation for sref dataset specifications.
//!
//! This crate is the pure half of srefkit: no I/O, no async, no backends.
//! It defines the [`Specification`] document an analysis produces, parses the
//! Midjourney permutation templates its batches carry, and validates both
//! individual batches and whole documents against the dataset recipe.
//!
//! ```
//! use srefkit_core::{parse_template, validate_batch, StyleCode, ValidationRules};
//! # use srefkit_core::{Batch, Priority};
//!
//! let parsed = parse_template("{oil,ink} sketch of {a cat,a fox}").unwrap();
//! assert_eq!(parsed.expansion, 4);
//!
//! let batch = Batch {
//!     sequence_number: 1,
//!     name: "sketches".into(),
//!     category: "animals".into(),
//!     declared_count: 40,
//!     template: "{oil,ink} sketch --sref 1234567890".into(),
//!     priority: Priority::High,
//!     notes: None,
//! };
//! let report = validate_batch(&batch, &StyleCode::new("1234567890"), &ValidationRules::default());
//! assert!(!report.is_clean()); // expands to 2 images, not 40
//! ```

pub mod document;
pub mod permutation;
pub mod validate;

pub use document::{
    Batch, Priority, PromptGuidelines, Specification, StyleAnalysis, StyleCode,
    TrainingRecommendations,
};
pub use permutation::{expansion_count, parse_template, ParsedTemplate, TemplateSyntaxError};
pub use validate::{
    validate_batch, validate_specification, BatchIssue, BatchReport, BatchWarning, SpecReport,
    StructuralIssue, ValidationRules,
};
