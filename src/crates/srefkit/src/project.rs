//! Project file persistence and export.
//!
//! A project file is the specification document serialized as pretty JSON.
//! Validation issues never block saving or loading; export is the one gate
//! that refuses documents with hard errors.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use srefkit_core::{validate_specification, Specification, ValidationRules};
use tracing::info;

use crate::error::{Result, SrefkitError};

/// Output format for `export_specification`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl FromStr for ExportFormat {
    type Err = SrefkitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "md" | "markdown" => Ok(Self::Markdown),
            other => Err(SrefkitError::Export(format!(
                "Unknown export format: {other} (expected json or markdown)"
            ))),
        }
    }
}

/// Save a specification to a project file, creating parent directories.
pub fn save_project(path: &Path, spec: &Specification) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            SrefkitError::Project(format!(
                "Failed to create directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    let json = spec.to_json_pretty()?;
    fs::write(path, json).map_err(|e| {
        SrefkitError::Project(format!("Failed to write project file {}: {e}", path.display()))
    })?;

    info!(path = %path.display(), "saved project");
    Ok(())
}

/// Load a specification from a project file.
pub fn load_project(path: &Path) -> Result<Specification> {
    if !path.exists() {
        return Err(SrefkitError::Project(format!(
            "Project file does not exist: {}",
            path.display()
        )));
    }

    let data = fs::read_to_string(path).map_err(|e| {
        SrefkitError::Project(format!("Failed to read project file {}: {e}", path.display()))
    })?;

    Specification::from_json(&data)
        .map_err(|e| SrefkitError::Project(format!("Project file is not a valid specification: {e}")))
}

/// Export a specification to disk in the requested format.
///
/// Documents carrying hard validation errors are refused; warnings pass.
pub fn export_specification(
    path: &Path,
    spec: &Specification,
    format: ExportFormat,
    rules: &ValidationRules,
) -> Result<()> {
    let report = validate_specification(spec, rules);
    if !report.is_valid {
        return Err(SrefkitError::Export(format!(
            "Specification has {} validation error(s); fix them before exporting",
            report.errors.len()
        )));
    }

    let content = match format {
        ExportFormat::Json => spec.to_json_pretty()?,
        ExportFormat::Markdown => render_markdown(spec),
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            SrefkitError::Export(format!(
                "Failed to create directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    fs::write(path, content).map_err(|e| {
        SrefkitError::Export(format!("Failed to write export {}: {e}", path.display()))
    })?;

    info!(path = %path.display(), format = ?format, "exported specification");
    Ok(())
}

/// Render a specification as a Markdown document.
pub fn render_markdown(spec: &Specification) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Dataset Specification: {}\n", spec.style_code);

    let analysis = &spec.style_analysis;
    if !analysis.primary_style.is_empty() {
        let _ = writeln!(out, "## Style Analysis\n");
        let _ = writeln!(out, "**Primary style:** {}\n", analysis.primary_style);
        if !analysis.era_influence.is_empty() {
            let _ = writeln!(out, "**Era influence:** {}\n", analysis.era_influence);
        }
        if !analysis.color_palette.is_empty() {
            let _ = writeln!(out, "**Color palette:** {}\n", analysis.color_palette.join(", "));
        }
        if !analysis.key_characteristics.is_empty() {
            let _ = writeln!(out, "**Key characteristics:**\n");
            for item in &analysis.key_characteristics {
                let _ = writeln!(out, "- {item}");
            }
            let _ = writeln!(out);
        }
    }

    let recs = &spec.recommendations;
    if !recs.optimal_subject_distribution.is_empty() {
        let _ = writeln!(out, "## Training Distribution\n");
        if recs.recommended_dataset_size > 0 {
            let _ = writeln!(
                out,
                "Recommended dataset size: {} images\n",
                recs.recommended_dataset_size
            );
        }
        let _ = writeln!(out, "| Subject | Share |");
        let _ = writeln!(out, "|---------|-------|");
        for (subject, percent) in &recs.optimal_subject_distribution {
            let _ = writeln!(out, "| {subject} | {percent:.1}% |");
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "## Permutation Batches\n");
    let _ = writeln!(
        out,
        "Total declared images: {}\n",
        spec.declared_total()
    );
    for batch in &spec.batches {
        let _ = writeln!(
            out,
            "### Batch {}: {} ({} images, {} priority)\n",
            batch.sequence_number, batch.name, batch.declared_count, batch.priority
        );
        if !batch.category.is_empty() {
            let _ = writeln!(out, "Category: {}\n", batch.category);
        }
        let _ = writeln!(out, "```\n{}\n```\n", batch.template);
        if let Some(notes) = &batch.notes {
            let _ = writeln!(out, "> {notes}\n");
        }
    }

    let guidelines = &spec.prompt_guidelines;
    if !guidelines.avoid_style_keywords.is_empty() || !guidelines.recommended_additions.is_empty() {
        let _ = writeln!(out, "## Prompt Guidelines\n");
        if guidelines.keep_simple {
            let _ = writeln!(out, "Keep prompts simple; the style code carries the look.\n");
        }
        if !guidelines.avoid_style_keywords.is_empty() {
            let _ = writeln!(
                out,
                "**Avoid keywords:** {}\n",
                guidelines.avoid_style_keywords.join(", ")
            );
        }
        if !guidelines.recommended_additions.is_empty() {
            let _ = writeln!(
                out,
                "**Recommended additions:** {}\n",
                guidelines.recommended_additions.join(", ")
            );
        }
    }

    out
}
