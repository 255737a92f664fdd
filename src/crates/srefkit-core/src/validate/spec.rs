//! Whole-document validation.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::document::Specification;
use crate::validate::{validate_batch, ValidationRules};

/// Document-level faults that are not tied to a single batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralIssue {
    #[error("only {found} batches; at least {min} required")]
    TooFewBatches { found: usize, min: usize },
    #[error("duplicate batch number {sequence}")]
    DuplicateSequence { sequence: u32 },
}

/// Aggregated result of validating a whole specification.
///
/// Batch findings are folded in with a `Batch N:` prefix so the report reads
/// as one flat list. `is_valid` reflects hard errors only.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpecReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Validates a specification end to end.
///
/// Checks run in a fixed order so reports stay stable across runs: style-code
/// shape, batch minimum, duplicate numbering, per-batch validation in
/// document order, then distribution and total-count checks.
pub fn validate_specification(spec: &Specification, rules: &ValidationRules) -> SpecReport {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    let code = &spec.style_code;
    if code.is_empty() {
        warnings.push("style code is empty".to_owned());
    } else if code.as_str().chars().count() != rules.expected_code_len {
        warnings.push(format!(
            "style code \"{code}\" is {} chars; sref codes are usually {}",
            code.as_str().chars().count(),
            rules.expected_code_len
        ));
    }

    if spec.batches.len() < rules.min_batches {
        errors.push(
            StructuralIssue::TooFewBatches {
                found: spec.batches.len(),
                min: rules.min_batches,
            }
            .to_string(),
        );
    }

    let mut seen: BTreeMap<u32, usize> = BTreeMap::new();
    for batch in &spec.batches {
        *seen.entry(batch.sequence_number).or_insert(0) += 1;
    }
    for (sequence, count) in seen {
        if count > 1 {
            errors.push(StructuralIssue::DuplicateSequence { sequence }.to_string());
        }
    }

    for batch in &spec.batches {
        let report = validate_batch(batch, code, rules);
        let n = batch.sequence_number;
        errors.extend(
            report
                .hard_errors
                .iter()
                .map(|issue| format!("Batch {n}: {issue}")),
        );
        warnings.extend(
            report
                .warnings
                .iter()
                .map(|warning| format!("Batch {n}: {warning}")),
        );
    }

    let distribution = &spec.recommendations.optimal_subject_distribution;
    if !distribution.is_empty() {
        let sum: f64 = distribution.values().sum();
        if (sum - 100.0).abs() > rules.distribution_tolerance {
            warnings.push(format!(
                "subject distribution sums to {sum:.1}%, expected 100% (±{:.0}%)",
                rules.distribution_tolerance
            ));
        }
    }

    let total = spec.declared_total();
    if !rules.total_images.contains(&total) {
        warnings.push(format!(
            "batches declare {total} images in total, outside the {}-{} target band",
            rules.total_images.start(),
            rules.total_images.end()
        ));
    }

    SpecReport {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Batch, Priority, Specification};

    // 8 * 5 = 40 per batch.
    fn conforming_template(code: &str) -> String {
        format!(
            "{{man,woman,child,elder,artist,dancer,reader,traveler}} in {{spring,summer,autumn,winter,fog}} --sref {code}"
        )
    }

    fn conforming_spec() -> Specification {
        let mut spec = Specification::new("1234567890");
        for i in 0..8 {
            spec.add_batch(Batch {
                sequence_number: 0,
                name: format!("batch {i}"),
                category: "scenes".to_owned(),
                declared_count: 40,
                template: conforming_template("1234567890"),
                priority: Priority::Medium,
                notes: None,
            });
        }
        spec.recommendations
            .optimal_subject_distribution
            .extend([("people".to_owned(), 60.0), ("scenes".to_owned(), 40.0)]);
        spec
    }

    #[test]
    fn conforming_spec_is_valid() {
        let report = validate_specification(&conforming_spec(), &ValidationRules::default());
        assert!(report.is_valid, "errors: {:?}", report.errors);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty(), "warnings: {:?}", report.warnings);
    }

    #[test]
    fn too_few_batches_is_a_hard_error() {
        let mut spec = conforming_spec();
        spec.batches.truncate(5);
        let report = validate_specification(&spec, &ValidationRules::default());
        assert!(!report.is_valid);
        assert!(report
            .errors
            .iter()
            .any(|e| e.contains("only 5 batches; at least 8 required")));
    }

    #[test]
    fn duplicate_numbers_are_a_hard_error() {
        let mut spec = conforming_spec();
        spec.batches[3].sequence_number = 2;
        let report = validate_specification(&spec, &ValidationRules::default());
        assert!(!report.is_valid);
        assert!(report.errors.iter().any(|e| e == "duplicate batch number 2"));
    }

    #[test]
    fn batch_findings_carry_their_number() {
        let mut spec = conforming_spec();
        spec.batches[2].template = "{a,b} broken --sref 1234567890".to_owned();
        let report = validate_specification(&spec, &ValidationRules::default());
        assert!(report
            .errors
            .iter()
            .any(|e| e.starts_with("Batch 3: template expands to 2 images")));
    }

    #[test]
    fn off_distribution_warns_but_stays_valid() {
        let mut spec = conforming_spec();
        spec.recommendations
            .optimal_subject_distribution
            .insert("people".to_owned(), 40.0);
        // Now sums to 80.
        let report = validate_specification(&spec, &ValidationRules::default());
        assert!(report.is_valid);
        assert!(report
            .warnings
            .iter()
            .any(|w| w.contains("sums to 80.0%")));
    }

    #[test]
    fn distribution_within_tolerance_passes() {
        let mut spec = conforming_spec();
        spec.recommendations
            .optimal_subject_distribution
            .insert("people".to_owned(), 63.0);
        // Sums to 103, inside the ±5 band.
        let report = validate_specification(&spec, &ValidationRules::default());
        assert!(report.warnings.is_empty(), "warnings: {:?}", report.warnings);
    }

    #[test]
    fn total_outside_band_warns() {
        let mut spec = conforming_spec();
        for batch in &mut spec.batches {
            batch.declared_count = 39;
        }
        // 8 * 39 = 312, under the 320 floor.
        let report = validate_specification(&spec, &ValidationRules::default());
        assert!(report
            .warnings
            .iter()
            .any(|w| w.contains("312 images in total")));
    }

    #[test]
    fn short_style_code_warns_only() {
        let mut spec = conforming_spec();
        spec.style_code = "123".into();
        for batch in &mut spec.batches {
            batch.template = conforming_template("123");
        }
        let report = validate_specification(&spec, &ValidationRules::default());
        assert!(report.is_valid);
        assert!(report.warnings.iter().any(|w| w.contains("3 chars")));
    }

    #[test]
    fn empty_spec_reports_everything_at_once() {
        let spec = Specification::new("1234567890");
        let report = validate_specification(&spec, &ValidationRules::default());
        assert!(!report.is_valid);
        assert!(report.errors.iter().any(|e| e.contains("only 0 batches")));
        assert!(report
            .warnings
            .iter()
            .any(|w| w.contains("declare 0 images")));
    }
}
