//! Analysis orchestration.
//!
//! One run picks a backend from the settings snapshot, gates the local path
//! on pre-flight checks, executes, and applies at most one remote-to-local
//! fallback. The flow is an explicit phase machine rather than nested error
//! branches, so every transition below maps to one `match` arm:
//!
//! ```text
//! SelectingBackend -> RemoteAttempt -> Completed
//!                  |               \-> LocalAttempt (fallback)
//!                  \-> LocalAttempt -> Completed | Failed
//! ```
//!
//! Exactly one terminal outcome leaves [`Orchestrator::run`]. Cancellation is
//! dropping the returned future; a dropped run never falls back.

use std::sync::Arc;

use analysis::{AnalysisBackend, AnalysisError, BackendKind, EncodedImage};
use serde::Serialize;
use srefkit_core::{Specification, StyleCode};
use thiserror::Error;
use tracing::{info, warn};

use crate::preflight::{required_memory_gb, ResourceProbe};
use crate::provision::{ModelProvisioner, ModelStatus};
use crate::settings::{AnalysisMode, ModelVariant, Settings};

/// Terminal failure of one orchestration run.
#[derive(Debug, Error)]
pub enum OrchestrateError {
    /// Remote mode requested but no credential is configured and fallback
    /// is off.
    #[error("no remote API credential available (set CLAUDE_API_KEY or ANTHROPIC_API_KEY)")]
    MissingCredential,

    /// Local pre-flight: not enough free memory for the selected variant.
    #[error(
        "insufficient memory for {variant}: requires {required_gb:.1} GB, {available_gb:.1} GB available"
    )]
    InsufficientResources {
        variant: ModelVariant,
        required_gb: f32,
        available_gb: f32,
    },

    /// Local pre-flight: the variant's artifacts are not ready.
    #[error("local model {variant} is not ready: {status}")]
    ModelNotReady {
        variant: ModelVariant,
        status: ModelStatus,
    },

    /// The remote attempt failed and no fallback was taken.
    #[error("remote analysis failed: {0}")]
    Remote(#[source] AnalysisError),

    /// The local attempt failed on a run that never touched remote.
    #[error("local analysis failed: {0}")]
    Local(#[source] AnalysisError),

    /// Remote failed, fallback ran, and the local side failed too. Both
    /// causes are kept.
    #[error("remote analysis failed ({remote}); local fallback also failed ({local})")]
    FallbackFailed {
        remote: AnalysisError,
        local: Box<OrchestrateError>,
    },
}

/// What a successful run produced, tagged with where it ran.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub specification: Specification,
    pub backend: BackendKind,
    /// True whenever the local result exists because remote failed first,
    /// regardless of why remote failed.
    pub fallback_occurred: bool,
}

/// Phases of one run. `SelectingBackend` is entered once; the attempt phases
/// are each entered at most once.
enum Phase {
    SelectingBackend,
    RemoteAttempt(Arc<dyn AnalysisBackend>),
    LocalAttempt {
        remote_failure: Option<AnalysisError>,
    },
}

/// Chooses and drives the analysis backends for one run at a time.
///
/// Callers enforce single-flight per specification; the orchestrator itself
/// is stateless between runs and holds no interior mutability.
pub struct Orchestrator {
    remote: Option<Arc<dyn AnalysisBackend>>,
    local: Arc<dyn AnalysisBackend>,
    provisioner: Arc<dyn ModelProvisioner>,
    probe: Arc<dyn ResourceProbe>,
}

impl Orchestrator {
    /// Assemble an orchestrator. `remote` is `None` when no credential is
    /// configured; that absence is what drives the Auto-mode local choice.
    pub fn new(
        remote: Option<Arc<dyn AnalysisBackend>>,
        local: Arc<dyn AnalysisBackend>,
        provisioner: Arc<dyn ModelProvisioner>,
        probe: Arc<dyn ResourceProbe>,
    ) -> Self {
        Self {
            remote,
            local,
            provisioner,
            probe,
        }
    }

    /// Run one analysis to its single terminal outcome.
    ///
    /// The settings snapshot is read once here and never re-consulted, so a
    /// concurrent settings edit cannot change a run midway. Dropping the
    /// future abandons whichever attempt is in flight without falling back.
    pub async fn run(
        &self,
        images: &[EncodedImage],
        style_code: &StyleCode,
        settings: &Settings,
    ) -> Result<AnalysisResult, OrchestrateError> {
        let mut phase = Phase::SelectingBackend;

        loop {
            phase = match phase {
                Phase::SelectingBackend => self.select_backend(settings)?,

                Phase::RemoteAttempt(backend) => {
                    info!(style_code = %style_code, "attempting remote analysis");
                    match backend.analyze(images, style_code).await {
                        Ok(specification) => {
                            info!(batches = specification.batches.len(), "remote analysis succeeded");
                            return Ok(AnalysisResult {
                                specification,
                                backend: BackendKind::Remote,
                                fallback_occurred: false,
                            });
                        }
                        Err(remote_err) if settings.fallback_enabled => {
                            warn!(error = %remote_err, "remote analysis failed, falling back to local");
                            Phase::LocalAttempt {
                                remote_failure: Some(remote_err),
                            }
                        }
                        Err(remote_err) => return Err(OrchestrateError::Remote(remote_err)),
                    }
                }

                Phase::LocalAttempt { remote_failure } => {
                    return self
                        .local_attempt(images, style_code, settings, remote_failure)
                        .await;
                }
            };
        }
    }

    /// One transition out of `SelectingBackend`.
    fn select_backend(&self, settings: &Settings) -> Result<Phase, OrchestrateError> {
        match settings.mode {
            AnalysisMode::Local => Ok(Phase::LocalAttempt {
                remote_failure: None,
            }),
            AnalysisMode::Remote | AnalysisMode::Auto => match &self.remote {
                Some(backend) => Ok(Phase::RemoteAttempt(backend.clone())),
                None if settings.mode == AnalysisMode::Auto => {
                    info!("no remote credential, selecting local backend");
                    Ok(Phase::LocalAttempt {
                        remote_failure: None,
                    })
                }
                None => Err(OrchestrateError::MissingCredential),
            },
        }
    }

    /// The terminal local attempt: pre-flight gates, then inference.
    async fn local_attempt(
        &self,
        images: &[EncodedImage],
        style_code: &StyleCode,
        settings: &Settings,
        remote_failure: Option<AnalysisError>,
    ) -> Result<AnalysisResult, OrchestrateError> {
        let fallback_occurred = remote_failure.is_some();

        if let Err(gate) = self.preflight(settings) {
            return Err(wrap_after_remote(remote_failure, gate));
        }

        info!(
            style_code = %style_code,
            variant = %settings.local_variant,
            fallback = fallback_occurred,
            "attempting local analysis"
        );

        match self.local.analyze(images, style_code).await {
            Ok(specification) => {
                info!(batches = specification.batches.len(), "local analysis succeeded");
                Ok(AnalysisResult {
                    specification,
                    backend: BackendKind::Local,
                    fallback_occurred,
                })
            }
            Err(local_err) => Err(wrap_after_remote(
                remote_failure,
                OrchestrateError::Local(local_err),
            )),
        }
    }

    /// Pre-flight gates, in order: resource sufficiency, then artifact
    /// readiness. Both run before any engine call and fail the attempt
    /// without retry.
    fn preflight(&self, settings: &Settings) -> Result<(), OrchestrateError> {
        let variant = settings.local_variant;

        let required_gb = required_memory_gb(variant);
        let available_gb = self.probe.available_memory_gb();
        if available_gb < required_gb {
            return Err(OrchestrateError::InsufficientResources {
                variant,
                required_gb,
                available_gb,
            });
        }

        let status = self.provisioner.status(variant);
        if status != ModelStatus::Ready {
            return Err(OrchestrateError::ModelNotReady { variant, status });
        }

        Ok(())
    }
}

/// Attach the earlier remote failure to a local-side failure, when there was
/// one. A pure local run passes its error through untouched.
fn wrap_after_remote(
    remote_failure: Option<AnalysisError>,
    local: OrchestrateError,
) -> OrchestrateError {
    match remote_failure {
        Some(remote) => OrchestrateError::FallbackFailed {
            remote,
            local: Box::new(local),
        },
        None => local,
    }
}
