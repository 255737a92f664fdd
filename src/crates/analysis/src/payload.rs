//! Turning raw model output into a typed [`Specification`].

use srefkit_core::Specification;

use crate::error::{AnalysisError, Result};

/// Strips Markdown code fences from model output, if present.
///
/// Models are told to return bare JSON but regularly fence it anyway, with
/// or without a `json` language tag. Returns the inner slice, trimmed.
pub fn extract_json(raw: &str) -> &str {
    let candidate = if raw.contains("```json") {
        raw.split("```json")
            .nth(1)
            .and_then(|rest| rest.split("```").next())
            .unwrap_or(raw)
    } else if raw.contains("```") {
        raw.split("```")
            .nth(1)
            .and_then(|rest| rest.split("```").next())
            .unwrap_or(raw)
    } else {
        raw
    };
    candidate.trim()
}

/// Parses a backend's raw text output into a specification.
///
/// Fence scrubbing happens first; anything that then fails typed parsing
/// (including out-of-enum priorities) is an [`AnalysisError::InvalidResponse`].
pub fn parse_specification(raw: &str) -> Result<Specification> {
    let json = extract_json(raw);
    Specification::from_json(json)
        .map_err(|e| AnalysisError::InvalidResponse(format!("not a valid specification: {e}")))
}
