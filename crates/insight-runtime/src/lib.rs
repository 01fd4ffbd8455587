//! # insight-runtime
//!
//! Runtime providers for the banking insights dashboard.
//!
//! ## Providers
//!
//! - **Ollama** (default): local text generation via Ollama
//!
//! ## Usage
//!
//! ```rust,ignore
//! use insight_runtime::OllamaProvider;
//!
//! let provider = Arc::new(OllamaProvider::from_config(OllamaConfig::default()));
//! let narrator = NarrativeGenerator::new(provider, NarrativeConfig::default());
//! ```

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "ollama")]
pub use ollama::{OllamaConfig, OllamaProvider};

// Re-export core types for convenience
pub use insight_core::{CoreError, GenerationOptions, LlmProvider, Message, Result, Role};
