//! AI assistant transcript.
//!
//! The user's message is appended as soon as it is sent; the assistant reply
//! (or an `Error: ...` line) follows when the request settles. The transcript
//! only grows and lives for the session.

use serde::{Deserialize, Serialize};

use super::{ToolInputError, begin_unless_loading};
use crate::api::{ApiClient, ApiError, Endpoint, Method};
use crate::request_state::{RequestState, Ticket};

pub const NO_RESPONSE_MESSAGE: &str = "I couldn't generate a response.";
pub const FAILED_MESSAGE: &str = "Sorry, I couldn't process your request.";
const QUOTA_HINT: &str = "Please wait a few minutes and try again.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub quota_error: bool,
}

impl ChatReply {
    /// Text appended to the transcript for this reply.
    pub fn transcript_text(&self) -> String {
        if let Some(error) = self.error.as_deref().filter(|e| !e.trim().is_empty()) {
            if self.quota_error {
                return format!("Error: {error}. {QUOTA_HINT}");
            }
            return format!("Error: {error}");
        }
        self.response
            .as_deref()
            .filter(|text| !text.trim().is_empty())
            .unwrap_or(NO_RESPONSE_MESSAGE)
            .to_string()
    }
}

/// `POST /chat`
pub struct Chat;

impl Endpoint for Chat {
    const METHOD: Method = Method::Post;
    const PATH: &'static str = "/chat";
    type Request = ChatRequest;
    type Response = ChatReply;
}

pub fn send(api: &ApiClient, request: &ChatRequest) -> Result<ChatReply, ApiError> {
    api.call::<Chat>(request)
}

#[derive(Debug, Default)]
pub struct ChatTool {
    pub draft: String,
    transcript: Vec<ChatMessage>,
    pub reply: RequestState<ChatReply>,
}

impl ChatTool {
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Send the draft. Returns `Ok(None)` when the draft is blank.
    pub fn begin(&mut self, loading: bool) -> Result<Option<(Ticket, ChatRequest)>, ToolInputError> {
        let message = self.draft.trim().to_string();
        if message.is_empty() {
            return Ok(None);
        }
        let ticket = begin_unless_loading(loading, &mut self.reply)?;
        self.draft.clear();
        self.transcript.push(ChatMessage {
            role: ChatRole::User,
            content: message.clone(),
        });
        Ok(Some((ticket, ChatRequest { message })))
    }

    /// Settle the outstanding message.
    ///
    /// Returns the error text to show as a notification, if the call failed.
    pub fn finish(&mut self, ticket: Ticket, outcome: Result<ChatReply, ApiError>) -> Option<String> {
        let (line, failure) = match &outcome {
            Ok(reply) => (reply.transcript_text(), None),
            Err(err) => {
                let message = err.user_message(FAILED_MESSAGE);
                (format!("Error: {message}"), Some(message))
            }
        };
        let outcome = outcome.map_err(|err| err.user_message(FAILED_MESSAGE));
        if !self.reply.resolve(ticket, outcome).is_applied() {
            return None;
        }
        self.transcript.push(ChatMessage {
            role: ChatRole::Assistant,
            content: line,
        });
        failure
    }
}
