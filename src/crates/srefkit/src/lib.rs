//! # Srefkit - Sref Dataset Specification Toolkit
//!
//! Generates LoRA training dataset specifications from Midjourney sref codes
//! by running reference images through a vision model, then validates the
//! resulting permutation batches before export.
//!
//! ## Features
//!
//! - **Remote or local analysis** - Claude via API key, or a llama.cpp
//!   server running Qwen2-VL, chosen per run
//! - **Automatic fallback** - A failed remote run can retry locally when
//!   enabled in settings
//! - **Pre-flight checks** - Memory and model-artifact gates run before any
//!   local inference starts
//! - **Batch validation** - Permutation templates are expanded and checked
//!   against the dataset recipe (40 images per batch, 8+ batches)
//! - **Model provisioning** - GGUF artifacts pulled from the Hugging Face
//!   Hub into a per-variant cache
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use srefkit::{SettingsStore, AnalysisMode};
//!
//! # fn example() -> srefkit::Result<()> {
//! let store = SettingsStore::open()?;
//! let mut settings = store.load()?;
//! settings.mode = AnalysisMode::Auto;
//! settings.fallback_enabled = true;
//! store.save(&settings)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The document model and validators live in `srefkit-core`; the two
//! analysis backends live in `analysis`. This crate owns everything around
//! them: settings, orchestration, model provisioning, project files, and
//! the CLI.

// Core modules
pub mod cli;
pub mod images;
pub mod orchestrator;
pub mod preflight;
pub mod project;
pub mod provision;
pub mod settings;
pub mod version;

// Error types and utilities
mod error;

// Re-export key types for convenience
pub use orchestrator::{AnalysisResult, OrchestrateError, Orchestrator};
pub use settings::{AnalysisMode, ModelVariant, Settings, SettingsStore};
pub use provision::{
    ArtifactManifest, DownloadProgress, HubProvisioner, ModelProvisioner, ModelStatus, ProgressFn,
};
pub use preflight::{required_memory_gb, ResourceProbe, SystemProbe};
pub use project::{export_specification, load_project, render_markdown, save_project, ExportFormat};
pub use images::{collect_images, encode_all, encode_image};

// Error types
pub use error::{Result, SrefkitError};

// Re-export version utilities
pub use version::{full_version as version_info, short_version};
