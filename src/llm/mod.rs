//! # LLM Module
//!
//! The text-generation boundary. The game treats generation as an opaque
//! request/response seam: a fully built prompt goes out, raw generated text
//! comes back, and every transport or extraction failure is mapped onto the
//! pipeline's typed errors.

pub mod gemini;

pub use gemini::*;

use crate::generation::GenerationError;
use async_trait::async_trait;

/// The opaque text-generation boundary.
///
/// Implementations own their wire format and credentials; callers see only
/// prompt text in and generated text out. A call is not cancellable once
/// issued and is never retried internally.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates text for the given prompt.
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError>;
}
