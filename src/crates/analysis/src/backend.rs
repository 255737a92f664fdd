//! Backend abstraction shared by the remote and local providers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use srefkit_core::{Specification, StyleCode};
use std::fmt;

use crate::error::Result;

/// Which side executed an analysis. Carried through to the result envelope
/// so callers always know where a specification came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Remote,
    Local,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Remote => f.write_str("remote"),
            BackendKind::Local => f.write_str("local"),
        }
    }
}

/// A reference image ready to ship to a backend: base64 payload plus the
/// MIME type the encoder detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub data: String,
    pub media_type: String,
}

impl EncodedImage {
    pub fn new(data: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            media_type: media_type.into(),
        }
    }
}

/// An analysis provider: takes reference images and a style code, returns a
/// complete dataset specification.
///
/// Both implementations return the same typed document; callers cannot tell
/// from the payload which side produced it. Dropping the returned future
/// abandons the request.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Run one analysis over the images.
    async fn analyze(
        &self,
        images: &[EncodedImage],
        style_code: &StyleCode,
    ) -> Result<Specification>;

    /// Which side this backend runs on.
    fn kind(&self) -> BackendKind;
}
