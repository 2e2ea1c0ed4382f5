pub mod openai;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::{PolicyText, Res};

// Traits.

/// Generic LLM client trait that clients must implement.
///
/// This trait defines the question-answering seam between the event handlers and the
/// completion provider.  Implementing it allows different providers (or mocks) to be used.
#[async_trait]
pub trait GenericLlmClient: Send + Sync + 'static {
    /// Answer a question using only the given policy text as context.
    ///
    /// Every call issues a fresh request; answers are never cached.  The error's `Display`
    /// is the human-readable message that should be shown to the user.
    async fn answer(&self, policy: &PolicyText, question: &str) -> Res<String>;
}

// Structs.

/// LLM client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct LlmClient {
    inner: Arc<dyn GenericLlmClient>,
}

impl Deref for LlmClient {
    type Target = dyn GenericLlmClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl LlmClient {
    pub fn new(inner: Arc<dyn GenericLlmClient>) -> Self {
        Self { inner }
    }
}
