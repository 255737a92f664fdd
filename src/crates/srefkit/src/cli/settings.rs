//! Settings command handlers

use colored::Colorize;

use crate::cli::open_settings;
use crate::error::{Result, SrefkitError};

/// Handle settings show command
pub fn handle_show() -> Result<()> {
    let (store, settings) = open_settings()?;

    println!("Settings ({})", store.path().display());
    println!("  Mode:           {}", settings.mode);
    println!("  Local variant:  {}", settings.local_variant);
    println!(
        "  Fallback:       {}",
        if settings.fallback_enabled {
            "enabled"
        } else {
            "disabled"
        }
    );
    println!(
        "  Cache dir:      {}",
        settings
            .model_cache_dir
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(default)".to_string())
    );
    println!(
        "  Local endpoint: {}",
        settings
            .local_endpoint
            .as_deref()
            .unwrap_or("(default)")
    );

    Ok(())
}

/// Handle settings set command
pub fn handle_set(
    mode: Option<String>,
    variant: Option<String>,
    fallback: Option<String>,
    cache_dir: Option<String>,
    endpoint: Option<String>,
) -> Result<()> {
    if mode.is_none()
        && variant.is_none()
        && fallback.is_none()
        && cache_dir.is_none()
        && endpoint.is_none()
    {
        return Err(SrefkitError::Settings(
            "nothing to change; pass --mode, --variant, --fallback, --cache-dir, or --endpoint"
                .to_string(),
        ));
    }

    let (store, mut settings) = open_settings()?;

    if let Some(mode) = mode {
        settings.mode = mode.parse()?;
    }
    if let Some(variant) = variant {
        settings.local_variant = variant.parse()?;
    }
    if let Some(fallback) = fallback {
        settings.fallback_enabled = match fallback.as_str() {
            "true" => true,
            "false" => false,
            other => {
                return Err(SrefkitError::Settings(format!(
                    "invalid fallback value \"{other}\" (expected true or false)"
                )));
            }
        };
    }
    // An empty string clears an override back to the default.
    if let Some(dir) = cache_dir {
        settings.model_cache_dir = if dir.is_empty() {
            None
        } else {
            Some(dir.into())
        };
    }
    if let Some(endpoint) = endpoint {
        settings.local_endpoint = if endpoint.is_empty() {
            None
        } else {
            Some(endpoint)
        };
    }

    store.save(&settings)?;
    println!("{}", "✓ Settings updated".green().bold());

    handle_show()
}
