use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;

use crate::configuration::ExtractorSettings;

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error(transparent)]
    OpenAI(#[from] OpenAIError),
    #[error("No choices in Openai response")]
    NoChoices,
    #[error("No content in Openai response")]
    NoContent,
}

#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, CompletionError>;
}

pub struct OpenaiClient {
    client: Client<OpenAIConfig>,
    settings: ExtractorSettings,
}

impl OpenaiClient {
    pub fn new(api_key: String, settings: ExtractorSettings) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        OpenaiClient {
            client: Client::with_config(config),
            settings,
        }
    }
}

#[async_trait]
impl ChatCompletion for OpenaiClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, CompletionError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(self.settings.model.as_str())
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system)
                    .build()?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt)
                    .build()?
                    .into(),
            ])
            .max_tokens(self.settings.max_tokens)
            .temperature(self.settings.temperature)
            .build()?;

        let response = self.client.chat().create(request).await?;
        log::debug!("Response: {:?}", response);

        let first_choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(CompletionError::NoChoices)?
            .message
            .content
            .ok_or(CompletionError::NoContent)?;

        Ok(first_choice)
    }
}
