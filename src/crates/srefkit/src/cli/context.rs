//! Shared assembly for CLI command handlers.
//!
//! Loads persisted settings and wires the orchestrator's collaborators
//! together so every command sees the same construction path.

use std::sync::Arc;

use analysis::local::{LlamaServerEngine, LocalBackend};
use analysis::remote::ClaudeBackend;
use analysis::{AnalysisBackend, LocalEngineConfig};
use tracing::debug;

use crate::error::Result;
use crate::orchestrator::Orchestrator;
use crate::preflight::SystemProbe;
use crate::provision::HubProvisioner;
use crate::settings::{Settings, SettingsStore};

/// Load persisted settings together with the store they came from.
pub fn open_settings() -> Result<(SettingsStore, Settings)> {
    let store = SettingsStore::open()?;
    let settings = store.load()?;
    Ok((store, settings))
}

/// Provisioner honoring the settings' cache directory override.
pub fn build_provisioner(settings: &Settings) -> HubProvisioner {
    let mut provisioner = HubProvisioner::new();
    if let Some(dir) = &settings.model_cache_dir {
        provisioner = provisioner.with_cache_dir(dir);
    }
    provisioner
}

/// Local engine configuration for the selected variant, honoring the
/// endpoint override.
pub fn local_engine_config(settings: &Settings) -> LocalEngineConfig {
    let defaults = LocalEngineConfig::default();
    let base_url = settings
        .local_endpoint
        .clone()
        .unwrap_or(defaults.base_url);
    LocalEngineConfig::new(base_url, settings.local_variant.dir_name())
}

/// Assemble an orchestrator from a settings snapshot.
///
/// The remote backend is present only when a credential is configured; its
/// absence drives the Auto-mode local choice.
pub fn build_orchestrator(settings: &Settings) -> Orchestrator {
    let remote: Option<Arc<dyn AnalysisBackend>> = match ClaudeBackend::from_env() {
        Ok(backend) => Some(Arc::new(backend)),
        Err(e) => {
            debug!(error = %e, "remote backend not configured");
            None
        }
    };

    let engine = LlamaServerEngine::new(local_engine_config(settings));
    let local: Arc<dyn AnalysisBackend> = Arc::new(LocalBackend::new(engine));

    Orchestrator::new(
        remote,
        local,
        Arc::new(build_provisioner(settings)),
        Arc::new(SystemProbe),
    )
}
