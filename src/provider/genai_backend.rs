use async_trait::async_trait;
use genai::adapter::AdapterKind;
use genai::chat::{ChatMessage, ChatRequest};
use genai::resolver::{AuthData, Endpoint, ServiceTargetResolver};
use genai::{Client, ClientBuilder, ModelIden, ServiceTarget};

use super::{ChatBackend, Message, ModelInvocation, ProviderError, Role};
use crate::config::ProviderKind;

fn adapter_kind(provider: ProviderKind) -> AdapterKind {
    match provider {
        ProviderKind::OpenAI => AdapterKind::OpenAI,
        ProviderKind::Anthropic => AdapterKind::Anthropic,
        ProviderKind::Gemini => AdapterKind::Gemini,
        ProviderKind::DeepSeek => AdapterKind::DeepSeek,
        ProviderKind::Xai => AdapterKind::Xai,
        ProviderKind::Ollama => AdapterKind::Ollama,
    }
}

fn chat_message(message: &Message) -> ChatMessage {
    match message.role {
        Role::System => ChatMessage::system(message.content.clone()),
        Role::User => ChatMessage::user(message.content.clone()),
    }
}

/// The response text as returned. Blank responses count as no completion.
fn completion_text(text: Option<&str>) -> Result<String, ProviderError> {
    text.filter(|text| !text.trim().is_empty())
        .map(String::from)
        .ok_or(ProviderError::NoCompletionChoice)
}

/// Completion backend built on the `genai` client.
pub struct GenAIBackend;

impl GenAIBackend {
    /// Client pinned to the invocation's provider, endpoint and key, whatever the model name
    /// would otherwise suggest. Keyless providers get their placeholder credential so genai
    /// never falls back to another provider's environment variable.
    fn client_for(invocation: &ModelInvocation) -> Client {
        let adapter_kind = adapter_kind(invocation.provider);
        let endpoint = invocation
            .endpoint
            .clone()
            .unwrap_or_else(|| invocation.provider.info().default_endpoint.to_string());
        let api_key = invocation
            .api_key
            .clone()
            .or_else(|| invocation.provider.info().keyless_auth.map(String::from));

        let target_resolver = ServiceTargetResolver::from_resolver_fn(
            move |service_target: ServiceTarget| -> Result<ServiceTarget, genai::resolver::Error> {
                let ServiceTarget { auth, model, .. } = service_target;
                Ok(ServiceTarget {
                    endpoint: Endpoint::from_owned(endpoint.clone()),
                    auth: match &api_key {
                        Some(key) => AuthData::from_single(key.clone()),
                        None => auth,
                    },
                    model: ModelIden::new(adapter_kind, model.model_name),
                })
            },
        );

        ClientBuilder::default()
            .with_service_target_resolver(target_resolver)
            .build()
    }
}

#[async_trait]
impl ChatBackend for GenAIBackend {
    async fn complete(&self, invocation: &ModelInvocation) -> Result<String, ProviderError> {
        let client = Self::client_for(invocation);
        let chat_req = ChatRequest::new(invocation.messages.iter().map(chat_message).collect());

        let response = client
            .exec_chat(&invocation.wire_model, chat_req, None)
            .await?;

        completion_text(response.first_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_follows_provider_not_model_name() {
        assert_eq!(adapter_kind(ProviderKind::Ollama), AdapterKind::Ollama);
        assert_eq!(adapter_kind(ProviderKind::Anthropic), AdapterKind::Anthropic);
        assert_eq!(adapter_kind(ProviderKind::Xai), AdapterKind::Xai);
    }

    #[test]
    fn test_completion_text_is_not_trimmed() {
        let text = completion_text(Some("\nAdd parser\n\n- handle tabs\n")).unwrap();
        assert_eq!(text, "\nAdd parser\n\n- handle tabs\n");
    }

    #[test]
    fn test_blank_completion_is_no_choice() {
        assert!(matches!(
            completion_text(Some(" \n ")),
            Err(ProviderError::NoCompletionChoice)
        ));
        assert!(matches!(
            completion_text(None),
            Err(ProviderError::NoCompletionChoice)
        ));
    }

    fn local_invocation(wire_model: &str) -> ModelInvocation {
        ModelInvocation {
            provider: ProviderKind::Ollama,
            model: format!("ollama/{wire_model}"),
            wire_model: wire_model.to_string(),
            messages: vec![Message::user("diff")],
            // Nothing listens on the discard port.
            endpoint: Some("http://127.0.0.1:9/v1/".to_string()),
            api_key: None,
        }
    }

    #[tokio::test]
    async fn test_local_model_named_like_hosted_needs_no_key() {
        for wire_model in ["command-r", "claude-local", "gpt-oss"] {
            let err = GenAIBackend
                .complete(&local_invocation(wire_model))
                .await
                .unwrap_err();
            assert!(
                !matches!(err, ProviderError::GenAIError(genai::Error::Resolver { .. })),
                "{wire_model} failed to resolve: {err}"
            );
        }
    }
}
