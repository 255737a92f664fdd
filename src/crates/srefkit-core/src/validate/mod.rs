//! Validation of batches and whole specifications.
//!
//! Validators never short-circuit: they collect every finding into a report
//! so a document can be repaired in one pass. Hard errors make a document
//! unfit for export; warnings are advice.

mod batch;
mod spec;

pub use batch::{validate_batch, BatchIssue, BatchReport, BatchWarning};
pub use spec::{validate_specification, SpecReport, StructuralIssue};

use std::ops::RangeInclusive;

use crate::document::StyleCode;

/// Style keywords that fight the sref: the reference already carries the
/// style, so restating it in the prompt skews training.
pub const DEFAULT_AVOID_KEYWORDS: &[&str] = &[
    "detailed",
    "high quality",
    "masterpiece",
    "4k",
    "8k",
    "hdr",
    "trending",
];

/// Thresholds the validators check against.
///
/// The defaults encode the house dataset recipe: every batch expands to
/// exactly 40 images, a document carries at least 8 batches, and the declared
/// total lands between 320 and 400 images.
#[derive(Debug, Clone)]
pub struct ValidationRules {
    /// Exact expansion count every batch template must produce.
    pub images_per_batch: u32,
    /// Minimum number of batches a specification must carry.
    pub min_batches: usize,
    /// Acceptable band for the declared image total across all batches.
    pub total_images: RangeInclusive<u32>,
    /// How far the subject distribution may drift from summing to 100.
    pub distribution_tolerance: f64,
    /// Template length beyond which a warning is raised.
    pub max_template_len: usize,
    /// Lowercase keywords that draw a redundant-descriptor warning.
    pub avoid_keywords: Vec<String>,
    /// Style-code length the shape check expects.
    pub expected_code_len: usize,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            images_per_batch: 40,
            min_batches: 8,
            total_images: 320..=400,
            distribution_tolerance: 5.0,
            max_template_len: 300,
            avoid_keywords: DEFAULT_AVOID_KEYWORDS
                .iter()
                .map(|kw| kw.to_string())
                .collect(),
            expected_code_len: StyleCode::EXPECTED_LEN,
        }
    }
}
