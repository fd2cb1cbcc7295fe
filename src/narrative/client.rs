//! Completion client for hosted LLM endpoints.

use super::{NarrativeRequest, NarrativeResult, NarrativeService};
use crate::error::NarrativeError;
use crate::url_validator::validate_endpoint_url;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionProvider {
    /// `POST {base}/chat/completions`, OpenAI-compatible
    OpenAi,
    /// `POST {base}/api/generate`
    Ollama,
}

impl CompletionProvider {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            CompletionProvider::OpenAi => "https://api.openai.com/v1",
            CompletionProvider::Ollama => "http://localhost:11434",
        }
    }
}

pub struct CompletionClient {
    client: Client,
    provider: CompletionProvider,
    api_base_url: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl CompletionClient {
    pub fn new(
        provider: CompletionProvider,
        api_base_url: Option<&str>,
        model: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> NarrativeResult<Self> {
        let base = api_base_url.unwrap_or(provider.default_base_url());
        let url = validate_endpoint_url(base).map_err(|e| NarrativeError::Unavailable(e.to_string()))?;

        if provider == CompletionProvider::OpenAi && api_key.is_none() {
            return Err(NarrativeError::Unavailable(
                "OpenAI-compatible endpoints require an API key".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NarrativeError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            provider,
            api_base_url: url.as_str().trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
            timeout,
        })
    }

    fn map_send_error(&self, e: reqwest::Error) -> NarrativeError {
        if e.is_timeout() {
            NarrativeError::Timeout(self.timeout)
        } else {
            NarrativeError::Network(e.to_string())
        }
    }

    async fn openai_chat(&self, prompt: &str) -> NarrativeResult<String> {
        #[derive(Serialize)]
        struct Message<'a> {
            role: &'a str,
            content: &'a str,
        }

        #[derive(Serialize)]
        struct Request<'a> {
            model: &'a str,
            messages: Vec<Message<'a>>,
            temperature: f32,
        }

        #[derive(Deserialize)]
        struct Response {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: MessageContent,
        }

        #[derive(Deserialize)]
        struct MessageContent {
            content: Option<String>,
        }

        let api_key = self.api_key.as_deref().unwrap_or_default();
        let url = format!("{}/chat/completions", self.api_base_url);
        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&Request {
                model: &self.model,
                messages: vec![Message {
                    role: "user",
                    content: prompt,
                }],
                temperature: 0.2,
            })
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !resp.status().is_success() {
            return Err(NarrativeError::Api(format!("HTTP {}", resp.status())));
        }

        let result: Response = resp
            .json()
            .await
            .map_err(|e| NarrativeError::Malformed(e.to_string()))?;

        result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| NarrativeError::Malformed("no choices in response".to_string()))
    }

    async fn ollama_generate(&self, prompt: &str) -> NarrativeResult<String> {
        #[derive(Serialize)]
        struct Request<'a> {
            model: &'a str,
            prompt: &'a str,
            stream: bool,
        }

        #[derive(Deserialize)]
        struct Response {
            response: String,
        }

        let url = format!("{}/api/generate", self.api_base_url);
        let resp = self
            .client
            .post(&url)
            .json(&Request {
                model: &self.model,
                prompt,
                stream: false,
            })
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !resp.status().is_success() {
            return Err(NarrativeError::Api(format!("HTTP {}", resp.status())));
        }

        let result: Response = resp
            .json()
            .await
            .map_err(|e| NarrativeError::Malformed(e.to_string()))?;
        Ok(result.response)
    }
}

#[async_trait]
impl NarrativeService for CompletionClient {
    fn name(&self) -> &str {
        match self.provider {
            CompletionProvider::OpenAi => "openai",
            CompletionProvider::Ollama => "ollama",
        }
    }

    fn is_remote(&self) -> bool {
        true
    }

    async fn complete(&self, request: &NarrativeRequest) -> NarrativeResult<String> {
        match self.provider {
            CompletionProvider::OpenAi => self.openai_chat(&request.prompt).await,
            CompletionProvider::Ollama => self.ollama_generate(&request.prompt).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_requires_key() {
        let result = CompletionClient::new(
            CompletionProvider::OpenAi,
            None,
            "gpt-4o-mini",
            None,
            Duration::from_secs(5),
        );
        assert!(matches!(result, Err(NarrativeError::Unavailable(_))));
    }

    #[test]
    fn test_rejects_insecure_remote_endpoint() {
        let result = CompletionClient::new(
            CompletionProvider::Ollama,
            Some("http://models.example.com"),
            "llama3",
            None,
            Duration::from_secs(5),
        );
        assert!(matches!(result, Err(NarrativeError::Unavailable(_))));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = CompletionClient::new(
            CompletionProvider::Ollama,
            None,
            "llama3",
            None,
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(client.api_base_url, "http://localhost:11434");
        assert_eq!(client.name(), "ollama");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        // Port 9 (discard) on loopback is not expected to serve HTTP.
        let client = CompletionClient::new(
            CompletionProvider::Ollama,
            Some("http://127.0.0.1:9"),
            "llama3",
            None,
            Duration::from_secs(2),
        )
        .unwrap();
        let request = NarrativeRequest {
            prompt: "hi".into(),
            local_summary: "local".into(),
        };
        assert!(client.complete(&request).await.is_err());
    }
}
