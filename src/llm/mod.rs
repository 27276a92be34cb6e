//! Line providers for the workout coach.
//!
//! This module provides:
//! * [`LineProvider`]: async trait implemented by every line source.
//! * [`ApiLineProvider`]: OpenAI-compatible REST API provider.
//! * [`OfflineLineProvider`]: phrase-bank provider, no network.
//! * [`FallbackLineProvider`]: wraps any provider; substitutes an offline
//!   line on failure, timeout, blank output or filtered content.
//! * [`PromptBuilder`]: builds one-liner and chat prompts.
//! * [`LlmError`]: error variants for provider calls.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use workout_coach::config::{AppConfig, CoachStyle};
//! use workout_coach::llm::{ApiLineProvider, FallbackLineProvider, LineProvider, OfflineLineProvider};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let offline = Arc::new(OfflineLineProvider::new());
//!
//!     // A provider that never fails (falls back to offline phrases).
//!     let ai = FallbackLineProvider::new(ApiLineProvider::from_config(&config.llm), offline);
//!
//!     let line = ai
//!         .generate_one_liner("phase=main trigger=MIDWAY", CoachStyle::Hype)
//!         .await
//!         .unwrap();
//!     println!("{}", line);
//! }
//! ```

pub mod fallback;
pub mod offline;
pub mod prompt;
pub mod provider;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use fallback::FallbackLineProvider;
pub use offline::OfflineLineProvider;
pub use prompt::PromptBuilder;
pub use provider::{ApiLineProvider, LineProvider, LlmError};
