//! Dataset specification document model.
//!
//! A [`Specification`] is the unit of persistence and the unit of analysis
//! output: every backend produces one, the validators consume one, and the
//! project files on disk are serialized copies of one. Field names follow the
//! JSON schema emitted by the vision models, so a saved project round-trips
//! byte-compatible with raw analysis output.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque style reference code identifying the visual style under analysis.
///
/// The code is treated as free text; shape checks (length, emptiness) are the
/// validator's business and never fail construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleCode(String);

impl StyleCode {
    /// Length that style reference codes usually have.
    pub const EXPECTED_LEN: usize = 10;

    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for StyleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StyleCode {
    fn from(code: &str) -> Self {
        Self(code.to_owned())
    }
}

impl From<String> for StyleCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

/// Training priority of a batch. Closed set; anything else in a payload is a
/// deserialization error, not a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => f.write_str("high"),
            Priority::Medium => f.write_str("medium"),
            Priority::Low => f.write_str("low"),
        }
    }
}

/// One generation batch: a permutation prompt template plus bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    /// Position in the document, 1-based and dense. Maintained by
    /// [`Specification::add_batch`] and [`Specification::remove_batch`].
    #[serde(rename = "batch_number")]
    pub sequence_number: u32,
    #[serde(rename = "batch_name")]
    pub name: String,
    /// Subject category the batch covers (e.g. "portraits", "landscapes").
    #[serde(default)]
    pub category: String,
    /// Image count the author claims this batch yields. The validator checks
    /// it against the template's actual expansion.
    #[serde(rename = "image_count")]
    pub declared_count: u32,
    /// Permutation prompt template, e.g. `"{a,b} portrait --sref 1234567890"`.
    #[serde(rename = "prompt")]
    pub template: String,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Qualitative description of the style, as produced by analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleAnalysis {
    #[serde(default)]
    pub primary_style: String,
    #[serde(default)]
    pub era_influence: String,
    #[serde(default)]
    pub color_palette: Vec<String>,
    #[serde(default)]
    pub key_characteristics: Vec<String>,
    #[serde(default)]
    pub best_subjects: Vec<String>,
    #[serde(default)]
    pub avoid_subjects: Vec<String>,
}

/// Dataset sizing advice. The distribution maps subject category to a
/// percentage share; shares are expected to sum to roughly 100.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingRecommendations {
    #[serde(default)]
    pub recommended_dataset_size: u32,
    #[serde(default)]
    pub optimal_subject_distribution: BTreeMap<String, f64>,
}

/// Prompt-writing guidance attached to the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptGuidelines {
    #[serde(default)]
    pub keep_simple: bool,
    #[serde(default)]
    pub avoid_style_keywords: Vec<String>,
    #[serde(default)]
    pub recommended_additions: Vec<String>,
}

/// A complete dataset specification for one style code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specification {
    #[serde(rename = "sref_code")]
    pub style_code: StyleCode,
    #[serde(default)]
    pub style_analysis: StyleAnalysis,
    #[serde(rename = "training_recommendations", default)]
    pub recommendations: TrainingRecommendations,
    #[serde(rename = "permutation_batches", default)]
    pub batches: Vec<Batch>,
    #[serde(default)]
    pub prompt_guidelines: PromptGuidelines,
}

impl Specification {
    /// Empty specification for the given style code.
    pub fn new(style_code: impl Into<StyleCode>) -> Self {
        Self {
            style_code: style_code.into(),
            style_analysis: StyleAnalysis::default(),
            recommendations: TrainingRecommendations::default(),
            batches: Vec::new(),
            prompt_guidelines: PromptGuidelines::default(),
        }
    }

    /// Looks up a batch by its sequence number.
    pub fn batch(&self, sequence_number: u32) -> Option<&Batch> {
        self.batches
            .iter()
            .find(|b| b.sequence_number == sequence_number)
    }

    /// Appends a batch, assigning it the next sequence number. Returns the
    /// number assigned.
    pub fn add_batch(&mut self, mut batch: Batch) -> u32 {
        let assigned = self.batches.len() as u32 + 1;
        batch.sequence_number = assigned;
        self.batches.push(batch);
        assigned
    }

    /// Removes the batch with the given sequence number and renumbers the
    /// remainder so numbering stays dense (1..=len). Returns the removed
    /// batch, or `None` if no batch carried that number.
    pub fn remove_batch(&mut self, sequence_number: u32) -> Option<Batch> {
        let idx = self
            .batches
            .iter()
            .position(|b| b.sequence_number == sequence_number)?;
        let removed = self.batches.remove(idx);
        self.renumber();
        Some(removed)
    }

    fn renumber(&mut self) {
        for (idx, batch) in self.batches.iter_mut().enumerate() {
            batch.sequence_number = idx as u32 + 1;
        }
    }

    /// Total image count the batches declare, before any validation.
    pub fn declared_total(&self) -> u32 {
        self.batches.iter().map(|b| b.declared_count).sum()
    }

    /// Parses a specification from a JSON string.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serializes the specification as pretty-printed JSON, the on-disk
    /// project format.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(name: &str) -> Batch {
        Batch {
            sequence_number: 0,
            name: name.to_owned(),
            category: "portraits".to_owned(),
            declared_count: 40,
            template: format!("{{a,b}} {name} --sref 1234567890"),
            priority: Priority::High,
            notes: None,
        }
    }

    #[test]
    fn add_batch_assigns_dense_sequence_numbers() {
        let mut spec = Specification::new("1234567890");
        assert_eq!(spec.add_batch(batch("one")), 1);
        assert_eq!(spec.add_batch(batch("two")), 2);
        assert_eq!(spec.add_batch(batch("three")), 3);
        let numbers: Vec<u32> = spec.batches.iter().map(|b| b.sequence_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn remove_batch_renumbers_remainder() {
        let mut spec = Specification::new("1234567890");
        for name in ["one", "two", "three", "four"] {
            spec.add_batch(batch(name));
        }

        let removed = spec.remove_batch(2).unwrap();
        assert_eq!(removed.name, "two");

        let numbers: Vec<u32> = spec.batches.iter().map(|b| b.sequence_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(spec.batch(2).unwrap().name, "three");
    }

    #[test]
    fn remove_batch_unknown_number_is_none() {
        let mut spec = Specification::new("1234567890");
        spec.add_batch(batch("one"));
        assert!(spec.remove_batch(9).is_none());
        assert_eq!(spec.batches.len(), 1);
    }

    #[test]
    fn priority_rejects_unknown_values() {
        let err = serde_json::from_str::<Priority>("\"urgent\"");
        assert!(err.is_err());
    }

    #[test]
    fn document_round_trips_with_schema_field_names() {
        let mut spec = Specification::new("2847561923");
        spec.style_analysis.primary_style = "art nouveau".to_owned();
        spec.recommendations.recommended_dataset_size = 360;
        spec.recommendations
            .optimal_subject_distribution
            .insert("portraits".to_owned(), 30.0);
        spec.add_batch(batch("portraits"));

        let json = spec.to_json_pretty().unwrap();
        assert!(json.contains("\"sref_code\""));
        assert!(json.contains("\"permutation_batches\""));
        assert!(json.contains("\"batch_number\""));
        assert!(json.contains("\"image_count\""));
        assert!(json.contains("\"prompt\""));

        let back = Specification::from_json(&json).unwrap();
        assert_eq!(back, spec);
    }

    #[test]
    fn missing_optional_sections_default() {
        let json = r#"{
            "sref_code": "1234567890",
            "permutation_batches": []
        }"#;
        let spec = Specification::from_json(json).unwrap();
        assert!(spec.batches.is_empty());
        assert!(spec.style_analysis.primary_style.is_empty());
        assert!(spec.recommendations.optimal_subject_distribution.is_empty());
    }
}
