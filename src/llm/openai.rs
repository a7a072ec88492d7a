//! OpenAI chat completion implementation.

use super::ChatModel;
use crate::config::{RagSettings, SummarySettings};
use crate::error::{PdfChatError, Result};
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// OpenAI chat model with fixed sampling parameters.
pub struct OpenAIChatModel {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: Option<f32>,
    presence_penalty: Option<f32>,
    frequency_penalty: Option<f32>,
    max_tokens: Option<u32>,
}

impl OpenAIChatModel {
    /// Create a chat model using the API's default sampling parameters.
    pub fn new(client: Client<OpenAIConfig>, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
            temperature: None,
            presence_penalty: None,
            frequency_penalty: None,
            max_tokens: None,
        }
    }

    /// Chat model used for answering questions.
    pub fn for_answers(client: Client<OpenAIConfig>, settings: &RagSettings) -> Self {
        let mut model = Self::new(client, &settings.model).with_max_tokens(settings.max_tokens);
        model.temperature = Some(settings.temperature);
        model.presence_penalty = Some(settings.presence_penalty);
        model.frequency_penalty = Some(settings.frequency_penalty);
        model
    }

    /// Chat model used for whole-document summaries.
    pub fn for_summaries(client: Client<OpenAIConfig>, settings: &SummarySettings) -> Self {
        Self::new(client, &settings.model).with_max_tokens(settings.max_tokens)
    }

    /// Cap the number of generated tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

#[async_trait]
impl ChatModel for OpenAIChatModel {
    #[allow(deprecated)]
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| PdfChatError::Rag(e.to_string()))?
                .into(),
        ];

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&self.model).messages(messages);
        if let Some(temperature) = self.temperature {
            args.temperature(temperature);
        }
        if let Some(penalty) = self.presence_penalty {
            args.presence_penalty(penalty);
        }
        if let Some(penalty) = self.frequency_penalty {
            args.frequency_penalty(penalty);
        }
        if let Some(max_tokens) = self.max_tokens {
            // gpt-4 does not accept max_completion_tokens
            args.max_tokens(max_tokens);
        }

        let request = args.build().map_err(|e| PdfChatError::Rag(e.to_string()))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            PdfChatError::OpenAI(format!("Failed to generate response: {}", e))
        })?;

        let answer = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| PdfChatError::Rag("Empty response from LLM".to_string()))?
            .trim()
            .to_string();

        debug!("Received {} characters from {}", answer.len(), self.model);
        Ok(answer)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
