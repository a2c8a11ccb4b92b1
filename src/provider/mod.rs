use async_trait::async_trait;
use std::time::Instant;
use thiserror::Error;
use tracing::debug;

use crate::config::{ModelRoute, ProviderKind};
use crate::error::AiCommitError;

mod genai_backend;

pub use genai_backend::GenAIBackend;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("AI request failed: {0}")]
    GenAIError(#[from] genai::Error),

    #[error("No completion content in response")]
    NoCompletionChoice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Message {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Message {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// One completion request.
#[derive(Debug, Clone)]
pub struct ModelInvocation {
    pub provider: ProviderKind,
    /// Model identifier as given by the user.
    pub model: String,
    /// Model name sent to the provider.
    pub wire_model: String,
    pub messages: Vec<Message>,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
}

impl ModelInvocation {
    pub fn new(route: ModelRoute, messages: Vec<Message>, api_key: Option<String>) -> Self {
        ModelInvocation {
            provider: route.provider,
            model: route.model,
            wire_model: route.wire_model,
            messages,
            endpoint: route.endpoint,
            api_key,
        }
    }
}

#[async_trait]
pub trait ChatBackend {
    async fn complete(&self, invocation: &ModelInvocation) -> Result<String, ProviderError>;
}

/// Sends the invocation once. Failures are only detailed in the debug log.
pub async fn dispatch(
    backend: &dyn ChatBackend,
    invocation: &ModelInvocation,
) -> Result<String, AiCommitError> {
    debug!(
        "sending {} message(s) to {} ({}){}",
        invocation.messages.len(),
        invocation.model,
        invocation.provider,
        invocation
            .endpoint
            .as_deref()
            .map(|e| format!(" at {e}"))
            .unwrap_or_default()
    );

    let start = Instant::now();
    let result = backend.complete(invocation).await;
    debug!("Query took {:.2} seconds", start.elapsed().as_secs_f64());

    result.map_err(|e| {
        debug!("Error calling model API: {}", e);
        AiCommitError::CompletionFailed {
            model: invocation.model.clone(),
        }
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Records invocations and answers with a canned response.
    #[derive(Default)]
    pub struct FakeChat {
        pub response: Option<String>,
        pub calls: Mutex<Vec<ModelInvocation>>,
    }

    impl FakeChat {
        pub fn answering(response: &str) -> Self {
            FakeChat {
                response: Some(response.to_string()),
                ..Default::default()
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
        }

        pub fn last_call(&self) -> Option<ModelInvocation> {
            self.calls.lock().ok().and_then(|calls| calls.last().cloned())
        }
    }

    #[async_trait]
    impl ChatBackend for FakeChat {
        async fn complete(&self, invocation: &ModelInvocation) -> Result<String, ProviderError> {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(invocation.clone());
            }
            self.response.clone().ok_or(ProviderError::NoCompletionChoice)
        }
    }
}
