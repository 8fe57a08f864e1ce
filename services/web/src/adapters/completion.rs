//! services/web/src/adapters/completion.rs
//!
//! Adapter for the DeepSeek-style chat-completions API, implementing the
//! `CompletionService` port. Every call resolves to exactly one
//! `CompletionOutcome`; nothing here returns an error or panics.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use deepchat_core::completion::CompletionOutcome;
use deepchat_core::ports::CompletionService;
use deepchat_core::validate::ValidatedPrompt;

//=========================================================================================
// Wire Types
//=========================================================================================

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Deserialize, Default)]
struct ErrorResponse {
    #[serde(default)]
    error: ErrorBody,
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    message: Option<String>,
}

//=========================================================================================
// The Adapter
//=========================================================================================

/// Client for the external completions endpoint.
pub struct DeepSeekClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl DeepSeekClient {
    /// Builds a client with a fixed request timeout so no call can hang
    /// indefinitely.
    pub fn new(
        endpoint: String,
        model: String,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint,
            model,
            api_key,
        })
    }
}

/// Renders completion markdown into display HTML.
fn render_markdown(content: &str) -> String {
    let parser = pulldown_cmark::Parser::new(content);
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    html
}

#[async_trait]
impl CompletionService for DeepSeekClient {
    async fn complete(&self, prompt: &ValidatedPrompt) -> CompletionOutcome {
        let body = CompletionRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user",
                content: prompt.as_str(),
            }],
        };

        let response = match self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return CompletionOutcome::TransportError(e.to_string()),
        };

        let status = response.status();
        debug!(status = status.as_u16(), "completion API responded");

        if status.is_success() {
            match response.json::<CompletionResponse>().await {
                Ok(parsed) => match parsed.choices.into_iter().next() {
                    Some(choice) => {
                        CompletionOutcome::Success(render_markdown(&choice.message.content))
                    }
                    None => CompletionOutcome::TransportError(
                        "response contained no choices".to_string(),
                    ),
                },
                Err(e) => CompletionOutcome::TransportError(e.to_string()),
            }
        } else {
            let message = response
                .json::<ErrorResponse>()
                .await
                .ok()
                .and_then(|e| e.error.message)
                .unwrap_or_else(|| "Unknown error".to_string());
            CompletionOutcome::ApiError {
                status: status.as_u16(),
                message,
            }
        }
    }
}
