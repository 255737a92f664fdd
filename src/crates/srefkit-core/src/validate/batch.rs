//! Per-batch validation.

use thiserror::Error;

use crate::document::{Batch, StyleCode};
use crate::permutation::{parse_template, TemplateSyntaxError};
use crate::validate::ValidationRules;

/// Findings that make a batch unfit for generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchIssue {
    #[error("invalid permutation syntax: {0}")]
    Syntax(#[from] TemplateSyntaxError),
    #[error("template expands to {found} images, expected exactly {expected}")]
    CountMismatch { expected: u32, found: u64 },
    #[error("missing --sref marker carrying the style code")]
    MissingMarker,
    #[error("--sref marker carries \"{found}\", expected \"{expected}\"")]
    MarkerMismatch { expected: String, found: String },
}

/// Advisory findings on a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchWarning {
    #[error("template is {len} chars long (over {max}); long prompts are hard to review")]
    TemplateTooLong { len: usize, max: usize },
    #[error("template restates style keyword \"{keyword}\" the sref already carries")]
    RedundantDescriptor { keyword: String },
}

/// Everything the batch validator found, in one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    pub hard_errors: Vec<BatchIssue>,
    pub warnings: Vec<BatchWarning>,
    /// Actual expansion count of the template; `None` when the syntax was
    /// invalid and no count could be computed.
    pub expansion_count: Option<u64>,
    /// Whether a usable `--sref <code>` marker was found.
    pub has_marker: bool,
    pub syntax_valid: bool,
}

impl BatchReport {
    /// True when the batch carries no hard errors. Warnings do not count.
    pub fn is_clean(&self) -> bool {
        self.hard_errors.is_empty()
    }
}

/// Validates one batch against the expected style code and the rules.
///
/// Always returns a full report; a batch with broken syntax still gets its
/// marker and keyword checks so nothing is hidden behind the first fault.
pub fn validate_batch(batch: &Batch, expected: &StyleCode, rules: &ValidationRules) -> BatchReport {
    let mut hard_errors = Vec::new();
    let mut warnings = Vec::new();

    let (syntax_valid, expansion_count) = match parse_template(&batch.template) {
        Ok(parsed) => {
            if parsed.expansion != u64::from(rules.images_per_batch) {
                hard_errors.push(BatchIssue::CountMismatch {
                    expected: rules.images_per_batch,
                    found: parsed.expansion,
                });
            }
            (true, Some(parsed.expansion))
        }
        Err(err) => {
            hard_errors.push(BatchIssue::Syntax(err));
            (false, None)
        }
    };

    let has_marker = match marker_code(&batch.template) {
        Some(code) => {
            if code != expected.as_str() {
                hard_errors.push(BatchIssue::MarkerMismatch {
                    expected: expected.as_str().to_owned(),
                    found: code.to_owned(),
                });
            }
            true
        }
        None => {
            hard_errors.push(BatchIssue::MissingMarker);
            false
        }
    };

    let len = batch.template.chars().count();
    if len > rules.max_template_len {
        warnings.push(BatchWarning::TemplateTooLong {
            len,
            max: rules.max_template_len,
        });
    }

    let lowered = batch.template.to_lowercase();
    for keyword in &rules.avoid_keywords {
        if lowered.contains(keyword.as_str()) {
            warnings.push(BatchWarning::RedundantDescriptor {
                keyword: keyword.clone(),
            });
        }
    }

    BatchReport {
        hard_errors,
        warnings,
        expansion_count,
        has_marker,
        syntax_valid,
    }
}

/// Extracts the code carried by the last `--sref` marker, if any. A marker
/// with nothing after it counts as absent.
fn marker_code(template: &str) -> Option<&str> {
    let idx = template.rfind("--sref")?;
    let rest = &template[idx + "--sref".len()..];
    rest.split_whitespace().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Priority;

    fn rules() -> ValidationRules {
        ValidationRules::default()
    }

    fn code() -> StyleCode {
        StyleCode::new("1234567890")
    }

    fn batch_with(template: &str) -> Batch {
        Batch {
            sequence_number: 1,
            name: "portraits".to_owned(),
            category: "portraits".to_owned(),
            declared_count: 40,
            template: template.to_owned(),
            priority: Priority::High,
            notes: None,
        }
    }

    // 5 * 8 = 40 options, matching the default per-batch count.
    const CONFORMING: &str = "{man,woman,child,elder,artist} portrait, \
         {standing,seated,profile,close-up,walking,reading,laughing,resting} \
         --sref 1234567890";

    #[test]
    fn conforming_batch_is_clean() {
        let report = validate_batch(&batch_with(CONFORMING), &code(), &rules());
        assert!(report.is_clean(), "unexpected errors: {:?}", report.hard_errors);
        assert_eq!(report.expansion_count, Some(40));
        assert!(report.has_marker);
        assert!(report.syntax_valid);
    }

    #[test]
    fn wrong_expansion_is_a_hard_error() {
        let report = validate_batch(
            &batch_with("{a,b,c} scene --sref 1234567890"),
            &code(),
            &rules(),
        );
        assert_eq!(
            report.hard_errors,
            vec![BatchIssue::CountMismatch {
                expected: 40,
                found: 3
            }]
        );
        assert_eq!(report.expansion_count, Some(3));
    }

    #[test]
    fn broken_syntax_reports_no_expansion_but_still_checks_marker() {
        let report = validate_batch(&batch_with("{a,b scene"), &code(), &rules());
        assert!(!report.syntax_valid);
        assert_eq!(report.expansion_count, None);
        assert!(!report.has_marker);
        assert!(report
            .hard_errors
            .iter()
            .any(|e| matches!(e, BatchIssue::Syntax(_))));
        assert!(report.hard_errors.contains(&BatchIssue::MissingMarker));
    }

    #[test]
    fn marker_with_wrong_code_is_a_hard_error() {
        let report = validate_batch(
            &batch_with("plain scene --sref 0000000000"),
            &code(),
            &rules(),
        );
        assert!(report.has_marker);
        assert!(report.hard_errors.contains(&BatchIssue::MarkerMismatch {
            expected: "1234567890".to_owned(),
            found: "0000000000".to_owned(),
        }));
    }

    #[test]
    fn bare_marker_counts_as_missing() {
        let report = validate_batch(&batch_with("plain scene --sref"), &code(), &rules());
        assert!(!report.has_marker);
        assert!(report.hard_errors.contains(&BatchIssue::MissingMarker));
    }

    #[test]
    fn marker_followed_by_other_params_is_accepted() {
        let report = validate_batch(
            &batch_with("plain scene --sref 1234567890 --ar 1:1"),
            &code(),
            &rules(),
        );
        assert!(report.has_marker);
        assert!(!report
            .hard_errors
            .iter()
            .any(|e| matches!(e, BatchIssue::MarkerMismatch { .. } | BatchIssue::MissingMarker)));
    }

    #[test]
    fn style_keywords_draw_warnings() {
        let report = validate_batch(
            &batch_with("Masterpiece portrait, 4K --sref 1234567890"),
            &code(),
            &rules(),
        );
        let keywords: Vec<&str> = report
            .warnings
            .iter()
            .filter_map(|w| match w {
                BatchWarning::RedundantDescriptor { keyword } => Some(keyword.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(keywords, vec!["masterpiece", "4k"]);
    }

    #[test]
    fn overlong_template_draws_a_warning() {
        let padding = "x".repeat(400);
        let report = validate_batch(
            &batch_with(&format!("{padding} --sref 1234567890")),
            &code(),
            &rules(),
        );
        assert!(report
            .warnings
            .iter()
            .any(|w| matches!(w, BatchWarning::TemplateTooLong { .. })));
    }
}
