//! Style analysis command handler

use std::path::PathBuf;

use colored::Colorize;
use srefkit_core::{validate_specification, StyleCode, ValidationRules};
use tracing::info;

use crate::cli::{build_orchestrator, open_settings};
use crate::cli::validate::print_report;
use crate::error::{Result, SrefkitError};
use crate::images::{collect_images, encode_all};
use crate::orchestrator::AnalysisResult;
use crate::project::save_project;

/// Handle the analyze command
pub async fn handle_analyze(
    code: String,
    inputs: Vec<String>,
    output: Option<String>,
    mode: Option<String>,
) -> Result<()> {
    let (_, mut settings) = open_settings()?;
    if let Some(mode) = mode {
        settings.mode = mode.parse()?;
    }

    let style_code = StyleCode::new(code);
    let paths: Vec<PathBuf> = inputs.into_iter().map(PathBuf::from).collect();

    let found = collect_images(&paths)?;
    println!(
        "Analyzing {} reference image(s) for sref {} ({} mode)...",
        found.len(),
        style_code,
        settings.mode
    );
    let images = encode_all(&found)?;

    info!(sref = %style_code, images = images.len(), mode = %settings.mode, "starting analysis");
    let orchestrator = build_orchestrator(&settings);
    let result = orchestrator
        .run(&images, &style_code, &settings)
        .await
        .map_err(|e| SrefkitError::Analysis(e.to_string()))?;

    report_outcome(&result);

    let report = validate_specification(&result.specification, &ValidationRules::default());
    print_report(&report);

    let out_path = output
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(format!("{}.sref.json", style_code)));
    save_project(&out_path, &result.specification)?;
    println!(
        "{} Specification saved to {}",
        "✓".green().bold(),
        out_path.display()
    );

    Ok(())
}

fn report_outcome(result: &AnalysisResult) {
    if result.fallback_occurred {
        println!(
            "{}",
            "⚠ Remote analysis failed; fell back to the local engine".yellow()
        );
    }
    println!(
        "{} Analysis complete via {} backend ({} batches)",
        "✓".green().bold(),
        result.backend,
        result.specification.batches.len()
    );
}
