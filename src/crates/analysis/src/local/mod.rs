//! Local analysis provider.
//!
//! The local side is split in two: [`LocalBackend`] implements the
//! [`AnalysisBackend`] contract (availability check, prompt construction,
//! payload parsing), while everything inference-related hides behind the
//! [`VisionEngine`] trait. The shipped engine talks to a llama.cpp-compatible
//! server; tests substitute scripted engines.

pub mod engine;
pub mod llama_server;

pub use engine::VisionEngine;
pub use llama_server::LlamaServerEngine;

use std::sync::Arc;

use async_trait::async_trait;
use srefkit_core::{Specification, StyleCode};
use tracing::debug;

use crate::backend::{AnalysisBackend, BackendKind, EncodedImage};
use crate::error::{AnalysisError, Result};
use crate::payload;
use crate::prompt::build_analysis_prompt;

/// Analysis backend running against a local vision engine.
#[derive(Clone)]
pub struct LocalBackend {
    engine: Arc<dyn VisionEngine>,
}

impl LocalBackend {
    /// Create a backend over the given engine.
    pub fn new(engine: impl VisionEngine + 'static) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Create a backend over an already shared engine.
    pub fn from_arc(engine: Arc<dyn VisionEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl AnalysisBackend for LocalBackend {
    async fn analyze(
        &self,
        images: &[EncodedImage],
        style_code: &StyleCode,
    ) -> Result<Specification> {
        if !self.engine.is_available().await {
            return Err(AnalysisError::ServiceUnavailable(
                "local inference engine is not reachable".to_string(),
            ));
        }

        let prompt = build_analysis_prompt(style_code.as_str(), images.len());
        debug!(images = images.len(), "running local analysis");

        let raw = self
            .engine
            .generate(images, &prompt)
            .await
            .map_err(|e| AnalysisError::InferenceFailed(format!("{e:#}")))?;

        payload::parse_specification(&raw)
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }
}
