//! Local model management command handlers

use std::sync::Arc;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tabled::{Table, Tabled};

use crate::cli::{build_provisioner, open_settings};
use crate::error::Result;
use crate::preflight::{required_memory_gb, ResourceProbe, SystemProbe};
use crate::provision::{
    ArtifactManifest, DownloadProgress, ModelProvisioner, ModelStatus, ProgressFn,
};
use crate::settings::ModelVariant;

/// Model display row for table output
#[derive(Tabled)]
struct ModelRow {
    #[tabled(rename = "Variant")]
    variant: String,
    #[tabled(rename = "Download")]
    download: String,
    #[tabled(rename = "Min memory")]
    memory: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Selected")]
    selected: String,
}

/// Handle model status command
pub fn handle_status() -> Result<()> {
    let (_, settings) = open_settings()?;
    let provisioner = build_provisioner(&settings);

    let rows: Vec<ModelRow> = ModelVariant::ALL
        .iter()
        .map(|&variant| {
            let manifest = ArtifactManifest::for_variant(variant);
            ModelRow {
                variant: variant.to_string(),
                download: format_gb(manifest.total_size_bytes),
                memory: format!("{:.1} GB", required_memory_gb(variant)),
                status: provisioner.status(variant).to_string(),
                selected: if variant == settings.local_variant {
                    "✓"
                } else {
                    ""
                }
                .to_string(),
            }
        })
        .collect();

    println!("{}", Table::new(rows));
    println!("\nCache: {}", provisioner.cache_root()?.display());
    println!(
        "Available memory: {:.1} GB",
        SystemProbe.available_memory_gb()
    );

    Ok(())
}

/// Handle model download command
pub async fn handle_download(variant: Option<String>) -> Result<()> {
    let (_, settings) = open_settings()?;
    let variant = match variant {
        Some(v) => v.parse::<ModelVariant>()?,
        None => settings.local_variant,
    };

    let manifest = ArtifactManifest::for_variant(variant);
    let provisioner = build_provisioner(&settings);
    if provisioner.status(variant) == ModelStatus::Ready {
        println!(
            "{} Model {} is already downloaded",
            "✓".green().bold(),
            variant
        );
        return Ok(());
    }

    println!(
        "Downloading {} (~{}) from {}...",
        variant,
        format_gb(manifest.total_size_bytes),
        manifest.hf_repo
    );

    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template("[{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let bar_handle = bar.clone();
    let progress: ProgressFn = Arc::new(move |p: DownloadProgress| {
        let done_files = p.current_file.saturating_sub(1) * 100;
        let overall = (done_files + p.progress_percent as usize) / p.total_files.max(1);
        bar_handle.set_position(overall as u64);
        bar_handle.set_message(format!(
            "{} ({}/{})",
            p.file_name, p.current_file, p.total_files
        ));
    });

    let provisioner = provisioner.with_progress(progress);
    provisioner.download(variant).await?;
    bar.finish_and_clear();

    println!("{} Model {} is ready", "✓".green().bold(), variant);
    Ok(())
}

/// Handle model clear-cache command
pub fn handle_clear_cache() -> Result<()> {
    let (_, settings) = open_settings()?;
    let provisioner = build_provisioner(&settings);

    let freed = provisioner.clear_cache()?;
    println!(
        "{} Cleared model cache ({} freed)",
        "✓".green().bold(),
        format_gb(freed)
    );

    Ok(())
}

fn format_gb(bytes: u64) -> String {
    format!("{:.1} GB", bytes as f64 / 1e9)
}
