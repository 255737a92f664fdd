//! Analysis backend implementations for srefkit.
//!
//! This crate provides the two implementations of the [`AnalysisBackend`]
//! trait the orchestrator chooses between, plus the pieces they share: the
//! instruction prompt and the payload scrubbing/parsing that turns raw model
//! text into a typed `Specification`.
//!
//! # Remote
//!
//! [`remote::ClaudeBackend`] sends the images to Anthropic's Messages API.
//! Requires an API key (`CLAUDE_API_KEY` or `ANTHROPIC_API_KEY`).
//!
//! # Local
//!
//! [`local::LocalBackend`] runs against anything implementing
//! [`local::VisionEngine`]. The shipped engine, [`local::LlamaServerEngine`],
//! speaks to a llama.cpp-compatible server on localhost.
//!
//! # Example
//!
//! ```rust,ignore
//! use analysis::remote::ClaudeBackend;
//! use analysis::{AnalysisBackend, EncodedImage};
//! use srefkit_core::StyleCode;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = ClaudeBackend::from_env()?;
//!     let images = vec![EncodedImage::new(base64_jpeg, "image/jpeg")];
//!
//!     let spec = backend.analyze(&images, &StyleCode::new("2847561923")).await?;
//!     println!("{} batches", spec.batches.len());
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod payload;
pub mod prompt;

#[cfg(feature = "local")]
pub mod local;

#[cfg(feature = "remote")]
pub mod remote;

// Re-export commonly used types
pub use backend::{AnalysisBackend, BackendKind, EncodedImage};
pub use config::{LocalEngineConfig, RemoteConfig};
pub use error::{AnalysisError, Result};
