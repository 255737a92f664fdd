//! The seam between the local backend and whatever runs the model.

use async_trait::async_trait;

use crate::backend::EncodedImage;

/// A local vision-language engine able to answer one prompt about a set of
/// images.
///
/// Implementations own every inference detail (server, weights, sampling);
/// the backend only needs raw text back. Errors are `anyhow` because the
/// engine's failure modes are its own business; the backend folds them into
/// its inference-failure classification.
#[async_trait]
pub trait VisionEngine: Send + Sync {
    /// Cheap reachability check, consulted before any generation.
    async fn is_available(&self) -> bool;

    /// Run one generation over the images and return the raw model output.
    async fn generate(&self, images: &[EncodedImage], prompt: &str) -> anyhow::Result<String>;
}
