//! Chat-completion scoring client using a forced function call.
//!
//! The request pins `tool_choice` to a single callback whose arguments carry
//! the integer score and the reviewer comment, so the reply never has to be
//! parsed out of free text.

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::evaluation::{
    domain::{Assessment, ResolvedScoringSettings, Score, ScoringSettings},
    ports::{DocumentScorer, ScoringError, ScoringResult},
};

/// Name of the function the service is forced to call.
pub const CALLBACK_NAME: &str = "callback_score";

const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Scoring client for OpenAI-compatible chat-completion endpoints.
#[derive(Debug, Clone)]
pub struct OpenAiScorer {
    client: reqwest::Client,
}

impl OpenAiScorer {
    /// Creates a scorer on top of a shared HTTP client.
    #[must_use]
    pub const fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

/// One chat message in the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    /// Author role.
    pub role: &'static str,
    /// Message text.
    pub content: String,
}

/// Request body for `POST /v1/chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    /// Model identifier.
    pub model: String,
    /// System prompt followed by the document text.
    pub messages: Vec<ChatMessage>,
    /// Forced callback selection.
    pub tool_choice: Value,
    /// Callback declarations.
    pub tools: Vec<Value>,
}

impl ChatCompletionRequest {
    /// Builds the grading request for already normalised document text.
    #[must_use]
    pub fn new(settings: &ResolvedScoringSettings, document: String) -> Self {
        Self {
            model: settings.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: settings.prompt.clone(),
                },
                ChatMessage {
                    role: "user",
                    content: document,
                },
            ],
            tool_choice: json!({
                "type": "function",
                "function": { "name": CALLBACK_NAME },
            }),
            tools: vec![callback_definition()],
        }
    }
}

fn callback_definition() -> Value {
    json!({
        "type": "function",
        "function": {
            "name": CALLBACK_NAME,
            "description": "Submits a score and a comment for a document, must be called after the document has been reviewed.",
            "parameters": {
                "type": "object",
                "properties": {
                    "score": {
                        "type": "integer",
                        "format": "int32",
                        "description": "Score of the document between 0 to 100.",
                        "minimum": 0,
                        "maximum": 100
                    },
                    "comment": {
                        "type": "string",
                        "maxLength": 1000,
                        "description": "Comment about the document, in Chinese."
                    }
                },
                "required": ["score", "comment"]
            }
        }
    })
}

/// Response body of `POST /v1/chat/completions`, reduced to what is read.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    /// Generated choices.
    pub choices: Vec<ChatChoice>,
}

/// One generated choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    /// Assistant message.
    pub message: AssistantMessage,
}

/// Assistant message carrying tool invocations.
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantMessage {
    /// Tool invocations, absent when the model answered in text.
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCall>>,
}

/// One tool invocation.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCall {
    /// Invoked function, absent for non-function tools.
    #[serde(default)]
    pub function: Option<FunctionCall>,
}

/// Function name and JSON-encoded arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct FunctionCall {
    /// Function name.
    pub name: String,
    /// JSON-encoded arguments.
    pub arguments: String,
}

#[derive(Debug, Deserialize)]
struct CallbackArguments {
    score: i64,
    comment: String,
}

/// Collapses whitespace runs to single spaces and trims both ends.
#[must_use]
pub fn collapse_whitespace(document: &str) -> String {
    document.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Joins the endpoint base URL and the completions path.
#[must_use]
pub fn completions_url(endpoint: &str) -> String {
    format!("{}{COMPLETIONS_PATH}", endpoint.trim_end_matches('/'))
}

/// Finds the first score callback and decodes its arguments.
///
/// Returns `Ok(None)` when the first choice holds no score callback.
///
/// # Errors
///
/// Returns [`ScoringError::MalformedResponse`] when there is no choice, when
/// the callback arguments are not valid JSON, or when the score is out of
/// range.
pub fn extract_assessment(response: &ChatCompletionResponse) -> ScoringResult<Option<Assessment>> {
    let choice = response
        .choices
        .first()
        .ok_or_else(|| ScoringError::MalformedResponse("response has no choices".to_owned()))?;
    let Some(calls) = choice.message.tool_calls.as_deref() else {
        return Ok(None);
    };
    let Some(callback) = calls
        .iter()
        .filter_map(|call| call.function.as_ref())
        .find(|function| function.name == CALLBACK_NAME)
    else {
        return Ok(None);
    };

    let arguments: CallbackArguments = serde_json::from_str(&callback.arguments)
        .map_err(|err| ScoringError::MalformedResponse(format!("callback arguments: {err}")))?;
    let score = Score::new(arguments.score)
        .map_err(|err| ScoringError::MalformedResponse(err.to_string()))?;
    Ok(Some(Assessment::new(score, arguments.comment)))
}

#[async_trait]
impl DocumentScorer for OpenAiScorer {
    async fn score(
        &self,
        document: &str,
        settings: &ScoringSettings,
    ) -> ScoringResult<Option<Assessment>> {
        let resolved = settings.resolve();
        let request = ChatCompletionRequest::new(&resolved, collapse_whitespace(document));
        let url = completions_url(&resolved.endpoint);
        debug!(url, model = %resolved.model, "requesting document score");

        let response = self
            .client
            .post(&url)
            .bearer_auth(resolved.secret_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        if status != StatusCode::OK {
            return Err(ScoringError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|err| ScoringError::MalformedResponse(err.to_string()))?;
        extract_assessment(&parsed)
    }
}

fn transport_error(err: reqwest::Error) -> ScoringError {
    if err.is_timeout() {
        ScoringError::Timeout
    } else {
        ScoringError::unreachable(err)
    }
}
