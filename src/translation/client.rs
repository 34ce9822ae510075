use std::borrow::Cow;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::prompt::build_user_prompt;
use crate::debug;
use crate::output;
use crate::error::{Error, Result};

/// Something that can translate an ordered list of single-line texts.
///
/// Implementations must return exactly one output per input, in the same
/// order, or fail.
#[async_trait]
pub trait TranslationCall: Send + Sync {
    async fn translate(
        &self,
        texts: &[String],
        target_language: &str,
        system_instructions: &str,
        model: &str,
    ) -> Result<Vec<String>>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Cow<'a, str>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Chat-completions client for OpenAI-compatible endpoints.
pub struct TranslationClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl TranslationClient {
    /// `endpoint` is the API base URL, e.g. `https://api.openai.com/v1`.
    pub fn new(endpoint: String, api_key: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::TranslationCallFailure(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint.trim_end_matches('/'))
    }
}

#[async_trait]
impl TranslationCall for TranslationClient {
    async fn translate(
        &self,
        texts: &[String],
        target_language: &str,
        system_instructions: &str,
        model: &str,
    ) -> Result<Vec<String>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.completions_url();
        let chat_request = ChatCompletionRequest {
            model,
            messages: vec![
                Message {
                    role: "system",
                    content: Cow::Borrowed(system_instructions),
                },
                Message {
                    role: "user",
                    content: Cow::Owned(build_user_prompt(texts, target_language)),
                },
            ],
        };

        debug!(
            "POST {url} (model: {model}, {} texts, {} system prompt bytes)",
            texts.len(),
            system_instructions.len()
        );
        if output::is_verbose()
            && let Ok(body) = serde_json::to_string(&chat_request)
        {
            debug!("Request body: {body}");
        }

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&chat_request)
            .send()
            .await
            .map_err(|e| {
                Error::TranslationCallFailure(format!(
                    "Failed to connect to API endpoint {url}: {e}"
                ))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            Error::TranslationCallFailure(format!("Failed to read response body: {e}"))
        })?;

        debug!("Response {status}: {body}");

        if !status.is_success() {
            return Err(Error::TranslationCallFailure(format!(
                "API request failed with status {status}: {body}"
            )));
        }

        let content = parse_completion(&body)?;
        split_lines(&content, texts.len())
    }
}

fn parse_completion(body: &str) -> Result<String> {
    let response: ChatCompletionResponse = serde_json::from_str(body).map_err(|e| {
        Error::TranslationCallFailure(format!("Unexpected response from API: {e}"))
    })?;

    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.unwrap_or_default())
        .ok_or_else(|| Error::TranslationCallFailure("API returned no choices".to_string()))
}

/// Splits a completion into lines, insisting on one line per text sent.
fn split_lines(content: &str, expected: usize) -> Result<Vec<String>> {
    let lines: Vec<String> = content.split('\n').map(str::to_string).collect();
    if lines.len() != expected {
        return Err(Error::TranslationMismatch {
            expected,
            actual: lines.len(),
        });
    }
    Ok(lines)
}
