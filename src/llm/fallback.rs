//! Fallback provider: wraps any [`LineProvider`] and substitutes an offline
//! line whenever the wrapped one cannot be trusted.
//!
//! The substitution happens on any `Err` (`Request`, `Timeout`, `Parse`,
//! `EmptyResponse`, `MissingApiKey`, `Disabled`), when the call exceeds the
//! configured timeout, when the text is blank, and when it trips the
//! banned-content filter.  The orchestrator relies on this: the AI provider
//! it is handed must never fail.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::coach::sanitizer::is_banned;
use crate::config::CoachStyle;
use crate::llm::offline::OfflineLineProvider;
use crate::llm::provider::{LineProvider, LlmError};

// ---------------------------------------------------------------------------
// FallbackLineProvider
// ---------------------------------------------------------------------------

/// A wrapper around any [`LineProvider`] that never returns an error.
///
/// # Example
/// ```rust
/// use std::sync::Arc;
/// use workout_coach::config::LlmConfig;
/// use workout_coach::llm::{ApiLineProvider, FallbackLineProvider, OfflineLineProvider};
///
/// let offline = Arc::new(OfflineLineProvider::new());
/// let inner = ApiLineProvider::from_config(&LlmConfig::default());
/// let provider = FallbackLineProvider::new(inner, offline);
/// // `provider` is safe to use even when the LLM backend is unavailable.
/// ```
pub struct FallbackLineProvider<P: LineProvider> {
    inner: P,
    offline: Arc<OfflineLineProvider>,
    timeout: Duration,
}

impl<P: LineProvider> FallbackLineProvider<P> {
    const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Wrap `inner` with fallback behaviour and the default timeout.
    pub fn new(inner: P, offline: Arc<OfflineLineProvider>) -> Self {
        Self {
            inner,
            offline,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Return a reference to the wrapped provider.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Collapse a bounded call result into usable text, or `None`.
    fn accept(
        &self,
        what: &str,
        result: Result<Result<String, LlmError>, tokio::time::error::Elapsed>,
    ) -> Option<String> {
        match result {
            Ok(Ok(text)) if text.trim().is_empty() => {
                log::warn!("{what}: provider returned blank text, using offline line");
                None
            }
            Ok(Ok(text)) if is_banned(&text) => {
                log::warn!("{what}: provider text hit the content filter, using offline line");
                None
            }
            Ok(Ok(text)) => Some(text),
            Ok(Err(e)) => {
                log::warn!("{what}: provider failed ({e}), using offline line");
                None
            }
            Err(_) => {
                log::warn!(
                    "{what}: provider exceeded {:?}, using offline line",
                    self.timeout
                );
                None
            }
        }
    }
}

#[async_trait]
impl<P: LineProvider> LineProvider for FallbackLineProvider<P> {
    /// This implementation **never** returns `Err(_)`.
    async fn generate_one_liner(
        &self,
        context: &str,
        style: CoachStyle,
    ) -> Result<String, LlmError> {
        let result =
            tokio::time::timeout(self.timeout, self.inner.generate_one_liner(context, style)).await;
        Ok(self
            .accept("one-liner", result)
            .unwrap_or_else(|| self.offline.pick_line(style)))
    }

    /// This implementation **never** returns `Err(_)`.
    async fn send_message(&self, user_text: &str, context: &str) -> Result<String, LlmError> {
        let result =
            tokio::time::timeout(self.timeout, self.inner.send_message(user_text, context)).await;
        Ok(self
            .accept("chat", result)
            .unwrap_or_else(|| self.offline.reply_to(user_text)))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
