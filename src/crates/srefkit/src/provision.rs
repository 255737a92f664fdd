//! Local model artifact provisioning.
//!
//! Each variant maps to a fixed manifest of GGUF artifacts (quantized weights
//! plus the multimodal projector) pulled from the Hugging Face Hub into a
//! per-variant cache directory. Status is judged by file presence, so a
//! half-finished download reads as an error, not as ready.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, SrefkitError};
use crate::settings::ModelVariant;

/// Status of a model variant's artifacts on this machine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModelStatus {
    NotDownloaded,
    Downloading { progress_percent: u8 },
    Ready,
    Error { message: String },
}

impl fmt::Display for ModelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelStatus::NotDownloaded => f.write_str("not downloaded"),
            ModelStatus::Downloading { progress_percent } => {
                write!(f, "downloading ({progress_percent}%)")
            }
            ModelStatus::Ready => f.write_str("ready"),
            ModelStatus::Error { message } => write!(f, "error: {message}"),
        }
    }
}

/// Progress of a running download, reported at file boundaries.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadProgress {
    pub current_file: usize,
    pub total_files: usize,
    pub file_name: String,
    /// Percent complete within the current file.
    pub progress_percent: u8,
}

/// Callback invoked as a download advances.
pub type ProgressFn = Arc<dyn Fn(DownloadProgress) + Send + Sync>;

/// The artifacts one variant needs on disk.
pub struct ArtifactManifest {
    pub variant: ModelVariant,
    pub hf_repo: &'static str,
    pub files: &'static [&'static str],
    pub total_size_bytes: u64,
}

impl ArtifactManifest {
    /// Manifest for the given variant.
    pub fn for_variant(variant: ModelVariant) -> Self {
        match variant {
            ModelVariant::Qwen2Vl2B => Self {
                variant,
                hf_repo: "bartowski/Qwen2-VL-2B-Instruct-GGUF",
                files: &[
                    "Qwen2-VL-2B-Instruct-Q4_K_M.gguf",
                    "mmproj-Qwen2-VL-2B-Instruct-f16.gguf",
                ],
                total_size_bytes: 1_700_000_000, // ~1.7 GB
            },
            ModelVariant::Qwen2Vl7B => Self {
                variant,
                hf_repo: "bartowski/Qwen2-VL-7B-Instruct-GGUF",
                files: &[
                    "Qwen2-VL-7B-Instruct-Q4_K_M.gguf",
                    "mmproj-Qwen2-VL-7B-Instruct-f16.gguf",
                ],
                total_size_bytes: 6_200_000_000, // ~6.2 GB
            },
            ModelVariant::Qwen2Vl72B => Self {
                variant,
                hf_repo: "bartowski/Qwen2-VL-72B-Instruct-GGUF",
                files: &[
                    "Qwen2-VL-72B-Instruct-Q4_K_M.gguf",
                    "mmproj-Qwen2-VL-72B-Instruct-f16.gguf",
                ],
                total_size_bytes: 47_000_000_000, // ~47 GB
            },
        }
    }
}

/// Manages local model artifacts: status, download, cache clearing.
#[async_trait]
pub trait ModelProvisioner: Send + Sync {
    /// Status of one variant, judged from the cache directory.
    fn status(&self, variant: ModelVariant) -> ModelStatus;

    /// Download one variant's artifacts into the cache.
    async fn download(&self, variant: ModelVariant) -> Result<()>;

    /// Remove the whole model cache. Returns the number of bytes freed.
    fn clear_cache(&self) -> Result<u64>;
}

/// [`ModelProvisioner`] backed by the Hugging Face Hub.
#[derive(Clone, Default)]
pub struct HubProvisioner {
    cache_dir: Option<PathBuf>,
    progress: Option<ProgressFn>,
}

impl HubProvisioner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit cache directory instead of the platform default.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Report per-file download progress through the callback.
    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Root of the model cache, created on first use.
    pub fn cache_root(&self) -> Result<PathBuf> {
        let root = match &self.cache_dir {
            Some(dir) => dir.clone(),
            None => dirs::cache_dir()
                .ok_or_else(|| {
                    SrefkitError::Config("Failed to get cache directory".to_string())
                })?
                .join("srefkit")
                .join("models"),
        };
        fs::create_dir_all(&root)?;
        Ok(root)
    }

    /// Directory one variant's artifacts live in.
    pub fn model_path(&self, variant: ModelVariant) -> Result<PathBuf> {
        Ok(self.cache_root()?.join(variant.dir_name()))
    }
}

#[async_trait]
impl ModelProvisioner for HubProvisioner {
    fn status(&self, variant: ModelVariant) -> ModelStatus {
        let model_path = match self.model_path(variant) {
            Ok(path) => path,
            Err(e) => {
                return ModelStatus::Error {
                    message: format!("Failed to determine model path: {e}"),
                }
            }
        };

        if !model_path.exists() {
            return ModelStatus::NotDownloaded;
        }

        let manifest = ArtifactManifest::for_variant(variant);
        for file in manifest.files {
            if !model_path.join(file).exists() {
                return ModelStatus::Error {
                    message: format!("Missing required file: {file}"),
                };
            }
        }

        ModelStatus::Ready
    }

    async fn download(&self, variant: ModelVariant) -> Result<()> {
        let model_path = self.model_path(variant)?;
        let manifest = ArtifactManifest::for_variant(variant);

        fs::create_dir_all(&model_path)?;

        info!(
            variant = %variant,
            repo = manifest.hf_repo,
            path = %model_path.display(),
            "downloading model artifacts"
        );

        let progress = self.progress.clone();
        let total_files = manifest.files.len();

        // hf-hub's API is synchronous; keep it off the async runtime.
        tokio::task::spawn_blocking(move || {
            let api = hf_hub::api::sync::ApiBuilder::new()
                .with_progress(false)
                .build()
                .map_err(|e| {
                    SrefkitError::Download(format!("Failed to initialize Hugging Face API: {e}"))
                })?;

            let repo = api.model(manifest.hf_repo.to_string());

            for (index, file) in manifest.files.iter().enumerate() {
                let current_file = index + 1;
                info!(file = file, current_file, total_files, "downloading file");

                let report_file = |percent: u8| {
                    if let Some(report) = &progress {
                        report(DownloadProgress {
                            current_file,
                            total_files,
                            file_name: (*file).to_string(),
                            progress_percent: percent,
                        });
                    }
                };

                report_file(0);

                let downloaded_path = repo.get(file).map_err(|e| {
                    SrefkitError::Download(format!("Failed to download {file}: {e}"))
                })?;

                let target_path = model_path.join(file);
                fs::copy(&downloaded_path, &target_path).map_err(|e| {
                    SrefkitError::Download(format!("Failed to copy {file} into cache: {e}"))
                })?;

                report_file(100);
            }

            Ok::<(), SrefkitError>(())
        })
        .await
        .map_err(|e| SrefkitError::Download(format!("Download task failed: {e}")))??;

        info!(variant = %variant, "model download complete");
        Ok(())
    }

    fn clear_cache(&self) -> Result<u64> {
        let root = self.cache_root()?;

        if !root.exists() {
            return Ok(0);
        }

        let bytes_freed = dir_size(&root)?;
        fs::remove_dir_all(&root)?;

        info!(path = %root.display(), bytes_freed, "model cache cleared");
        Ok(bytes_freed)
    }
}

/// Recursive directory size in bytes.
fn dir_size(path: &Path) -> std::io::Result<u64> {
    let mut total = 0;

    if path.is_dir() {
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let metadata = entry.metadata()?;

            if metadata.is_dir() {
                total += dir_size(&entry.path())?;
            } else {
                total += metadata.len();
            }
        }
    } else if path.is_file() {
        total = path.metadata()?.len();
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn manifest_names_weights_and_projector() {
        for variant in ModelVariant::ALL {
            let manifest = ArtifactManifest::for_variant(variant);
            assert_eq!(manifest.files.len(), 2);
            assert!(manifest.files[0].ends_with(".gguf"));
            assert!(manifest.files[1].starts_with("mmproj-"));
            assert!(manifest.total_size_bytes > 0);
        }
    }

    #[test]
    fn status_without_cache_dir_is_not_downloaded() {
        let temp_dir = TempDir::new().unwrap();
        let provisioner = HubProvisioner::new().with_cache_dir(temp_dir.path());

        let status = provisioner.status(ModelVariant::Qwen2Vl2B);
        assert_eq!(status, ModelStatus::NotDownloaded);
    }

    #[test]
    fn partial_artifacts_read_as_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let provisioner = HubProvisioner::new().with_cache_dir(temp_dir.path());

        let manifest = ArtifactManifest::for_variant(ModelVariant::Qwen2Vl2B);
        let model_dir = provisioner.model_path(ModelVariant::Qwen2Vl2B).unwrap();
        fs::create_dir_all(&model_dir).unwrap();
        fs::write(model_dir.join(manifest.files[0]), b"weights").unwrap();

        match provisioner.status(ModelVariant::Qwen2Vl2B) {
            ModelStatus::Error { message } => assert!(message.contains("mmproj-")),
            other => panic!("expected Error status, got {other:?}"),
        }
    }

    #[test]
    fn complete_artifacts_read_as_ready() {
        let temp_dir = TempDir::new().unwrap();
        let provisioner = HubProvisioner::new().with_cache_dir(temp_dir.path());

        let manifest = ArtifactManifest::for_variant(ModelVariant::Qwen2Vl2B);
        let model_dir = provisioner.model_path(ModelVariant::Qwen2Vl2B).unwrap();
        fs::create_dir_all(&model_dir).unwrap();
        for file in manifest.files {
            fs::write(model_dir.join(file), b"artifact").unwrap();
        }

        assert_eq!(provisioner.status(ModelVariant::Qwen2Vl2B), ModelStatus::Ready);
    }

    #[test]
    fn clear_cache_reports_bytes_freed() {
        let temp_dir = TempDir::new().unwrap();
        let cache = temp_dir.path().join("models");
        let provisioner = HubProvisioner::new().with_cache_dir(&cache);

        let model_dir = provisioner.model_path(ModelVariant::Qwen2Vl2B).unwrap();
        fs::create_dir_all(&model_dir).unwrap();
        fs::write(model_dir.join("weights.gguf"), vec![0u8; 1024]).unwrap();

        let freed = provisioner.clear_cache().unwrap();
        assert_eq!(freed, 1024);
        assert!(!cache.exists());
    }

    #[test]
    fn status_serializes_with_snake_case_tag() {
        let status = ModelStatus::Downloading {
            progress_percent: 42,
        };
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, r#"{"status":"downloading","progress_percent":42}"#);

        let json = serde_json::to_string(&ModelStatus::NotDownloaded).unwrap();
        assert_eq!(json, r#"{"status":"not_downloaded"}"#);
    }
}
