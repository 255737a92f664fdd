//! Remote analysis provider.
//!
//! Cloud-hosted vision models behind an API key. Remote analysis needs no
//! local hardware but fails without network access or a credential, which is
//! exactly what the orchestrator's fallback path is for.

pub mod claude;

pub use claude::ClaudeBackend;
