//! # insight-core
//!
//! Provider-agnostic text generation for the banking insights dashboard.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     NarrativeGenerator                        │
//! │  ┌──────────────┐   ┌──────────────┐   ┌─────────────────┐   │
//! │  │ Prompt       │──▶│  Messages    │──▶│  LlmProvider    │   │
//! │  │ template     │   │              │   │  (Strategy)     │   │
//! │  └──────────────┘   └──────────────┘   └─────────────────┘   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait lets the dashboard swap Ollama for any other
//! backend, or for a canned test double, without touching the rules layer.

pub mod error;
pub mod message;
pub mod provider;

pub use error::{CoreError, Result};
pub use message::{Message, Role};
pub use provider::{Completion, GenerationOptions, LlmProvider};
