//! Common test utilities and setup

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use analysis::{AnalysisBackend, AnalysisError, BackendKind, EncodedImage};
use async_trait::async_trait;
use srefkit::preflight::ResourceProbe;
use srefkit::provision::{ModelProvisioner, ModelStatus};
use srefkit::settings::{AnalysisMode, ModelVariant, Settings};
use srefkit_core::{Batch, Priority, Specification, StyleCode};

/// Style code shared by the orchestrator tests.
pub const TEST_CODE: &str = "1234567890";

/// A conforming eight-batch specification for [`TEST_CODE`].
pub fn sample_specification() -> Specification {
    let mut spec = Specification::new(TEST_CODE);
    let categories = [
        "portraits",
        "landscapes",
        "animals",
        "interiors",
        "still life",
        "street",
        "architecture",
        "night",
    ];
    for category in categories {
        spec.add_batch(Batch {
            sequence_number: 0,
            name: format!("{category} studies"),
            category: category.to_string(),
            declared_count: 40,
            template: format!(
                "{{man,woman,child,elder,artist,dancer,reader,traveler}} {category} \
                 in {{spring,summer,autumn,winter,fog}} --sref {TEST_CODE}"
            ),
            priority: Priority::Medium,
            notes: None,
        });
    }
    spec
}

/// One placeholder reference image.
pub fn test_images() -> Vec<EncodedImage> {
    vec![EncodedImage::new("aGVsbG8=", "image/png")]
}

/// Settings snapshot for a test run. Everything else stays at defaults.
pub fn test_settings(mode: AnalysisMode, fallback_enabled: bool) -> Settings {
    Settings {
        mode,
        fallback_enabled,
        ..Settings::default()
    }
}

/// Backend double returning scripted outcomes and counting invocations.
pub struct MockBackend {
    kind: BackendKind,
    outcomes: Mutex<VecDeque<Result<Specification, AnalysisError>>>,
    calls: Arc<AtomicUsize>,
}

impl MockBackend {
    pub fn scripted(
        kind: BackendKind,
        outcomes: Vec<Result<Specification, AnalysisError>>,
    ) -> Self {
        Self {
            kind,
            outcomes: Mutex::new(outcomes.into()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn succeeding(kind: BackendKind) -> Self {
        Self::scripted(kind, vec![Ok(sample_specification())])
    }

    pub fn failing(kind: BackendKind, error: AnalysisError) -> Self {
        Self::scripted(kind, vec![Err(error)])
    }

    /// Counter handle that stays valid after the backend moves into the
    /// orchestrator.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl AnalysisBackend for MockBackend {
    async fn analyze(
        &self,
        _images: &[EncodedImage],
        _style_code: &StyleCode,
    ) -> analysis::Result<Specification> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(sample_specification()))
    }

    fn kind(&self) -> BackendKind {
        self.kind
    }
}

/// Provisioner double reporting a fixed status for every variant.
pub struct MockProvisioner {
    status: ModelStatus,
}

impl MockProvisioner {
    pub fn with_status(status: ModelStatus) -> Self {
        Self { status }
    }

    pub fn ready() -> Self {
        Self::with_status(ModelStatus::Ready)
    }
}

#[async_trait]
impl ModelProvisioner for MockProvisioner {
    fn status(&self, _variant: ModelVariant) -> ModelStatus {
        self.status.clone()
    }

    async fn download(&self, _variant: ModelVariant) -> srefkit::Result<()> {
        Ok(())
    }

    fn clear_cache(&self) -> srefkit::Result<u64> {
        Ok(0)
    }
}

/// Probe double reporting a fixed amount of free memory.
pub struct FixedProbe(pub f32);

impl ResourceProbe for FixedProbe {
    fn available_memory_gb(&self) -> f32 {
        self.0
    }
}
