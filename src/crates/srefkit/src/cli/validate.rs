//! Validation and export command handlers

use std::path::PathBuf;

use colored::Colorize;
use srefkit_core::{validate_specification, SpecReport, ValidationRules};

use crate::error::{Result, SrefkitError};
use crate::project::{export_specification, load_project, ExportFormat};

/// Render a validation report to the terminal.
pub fn print_report(report: &SpecReport) {
    for error in &report.errors {
        println!("  {} {}", "✗".red().bold(), error);
    }
    for warning in &report.warnings {
        println!("  {} {}", "⚠".yellow(), warning);
    }

    if report.is_valid && report.warnings.is_empty() {
        println!("{}", "✓ Specification is valid".green().bold());
    } else if report.is_valid {
        println!(
            "{} Specification is valid with {} warning(s)",
            "✓".green().bold(),
            report.warnings.len()
        );
    } else {
        println!(
            "{} Specification has {} error(s) and {} warning(s)",
            "✗".red().bold(),
            report.errors.len(),
            report.warnings.len()
        );
    }
}

/// Handle the validate command
pub fn handle_validate(file: String, format: String) -> Result<()> {
    let spec = load_project(&PathBuf::from(&file))?;
    let report = validate_specification(&spec, &ValidationRules::default());

    match format.as_str() {
        "text" => print_report(&report),
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        other => {
            return Err(SrefkitError::Other(format!(
                "Invalid format: {}. Must be one of: text, json",
                other
            )));
        }
    }

    if !report.is_valid {
        return Err(SrefkitError::Other(format!(
            "{} failed validation",
            file
        )));
    }

    Ok(())
}

/// Handle the export command
pub fn handle_export(file: String, output: Option<String>, format: String) -> Result<()> {
    let spec = load_project(&PathBuf::from(&file))?;
    let format: ExportFormat = format.parse()?;

    let out_path = output.map(PathBuf::from).unwrap_or_else(|| {
        let extension = match format {
            ExportFormat::Json => "export.json",
            ExportFormat::Markdown => "md",
        };
        PathBuf::from(&file).with_extension(extension)
    });

    export_specification(&out_path, &spec, format, &ValidationRules::default())?;

    println!(
        "{} Exported specification to {}",
        "✓".green().bold(),
        out_path.display()
    );

    Ok(())
}
