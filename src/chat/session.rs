use chrono::Utc;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use tracing::{info, warn};

use super::message::{
    Author, ChatMessage, APOLOGY_MESSAGE, VOICE_PLACEHOLDER, WELCOME_MESSAGE,
};
use crate::api::ApiClient;
use crate::error::ClientError;

const TITLE_MAX_CHARS: usize = 50;

/// One tutoring conversation about one analyzed problem
///
/// The transcript is append-only and appends happen only at the tail, in
/// call-completion order. Every successful or failed text turn leaves the
/// transcript with a reply; voice turns that fail before their user message
/// would be committed append nothing.
pub struct ChatSession {
    problem_id: String,
    api: Arc<ApiClient>,
    transcript: StdMutex<Vec<ChatMessage>>,
    problem_title: StdMutex<Option<String>>,
    next_id: AtomicU64,
}

impl ChatSession {
    pub fn new(api: Arc<ApiClient>, problem_id: impl Into<String>) -> Self {
        Self {
            problem_id: problem_id.into(),
            api,
            transcript: StdMutex::new(Vec::new()),
            problem_title: StdMutex::new(None),
            next_id: AtomicU64::new(0),
        }
    }

    pub fn problem_id(&self) -> &str {
        &self.problem_id
    }

    /// Title derived from the problem's OCR text, once loaded
    pub fn problem_title(&self) -> Option<String> {
        self.problem_title
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Snapshot of the transcript in display order
    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.transcript
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Load the problem context and greet the user.
    ///
    /// Failure is logged and leaves the transcript empty; the user can
    /// still send messages.
    pub async fn initialize(&self) {
        match self.api.fetch_problem(&self.problem_id).await {
            Ok(problem) => {
                let title: String = problem.ocr_text.chars().take(TITLE_MAX_CHARS).collect();
                {
                    let mut slot = self.problem_title.lock().unwrap_or_else(|e| e.into_inner());
                    *slot = Some(title);
                }
                self.append(Author::Assistant, WELCOME_MESSAGE.to_string(), None);
                info!("Chat initialized for problem {}", self.problem_id);
            }
            Err(e) => {
                warn!("Failed to load problem context: {}", e);
            }
        }
    }

    /// Send one text turn.
    ///
    /// Empty or whitespace-only input is a no-op issuing no request. The
    /// user message is appended before the network call; any failure
    /// appends the fixed apology instead of a reply, so the transcript
    /// always answers every user turn. Returns the assistant message, or
    /// `None` for a no-op.
    pub async fn send_text(&self, content: &str) -> Option<ChatMessage> {
        let content = content.trim();
        if content.is_empty() {
            return None;
        }

        self.append(Author::User, content.to_string(), None);

        let reply = match self.api.send_chat_message(&self.problem_id, content).await {
            Ok(reply) => self.append(Author::Assistant, reply.content, reply.audio_url),
            Err(e) => {
                warn!("Chat turn failed: {}", e);
                self.append(Author::Assistant, APOLOGY_MESSAGE.to_string(), None)
            }
        };

        Some(reply)
    }

    /// Send one voice turn from a recorded file.
    ///
    /// The clip is uploaded, then interpreted. On success a user
    /// placeholder and the assistant reply are appended, after anything
    /// that completed in the meantime. On failure nothing is appended and
    /// the error surfaces to the caller, out-of-band of the transcript.
    pub async fn send_audio(&self, local_path: &Path) -> Result<ChatMessage, ClientError> {
        let uploaded = self.api.upload_audio(local_path).await?;
        let reply = self
            .api
            .send_chat_audio(&self.problem_id, &uploaded.audio_url)
            .await?;

        self.append(Author::User, VOICE_PLACEHOLDER.to_string(), None);
        Ok(self.append(Author::Assistant, reply.content, reply.audio_url))
    }

    fn append(&self, author: Author, content: String, audio_url: Option<String>) -> ChatMessage {
        let message = ChatMessage {
            id: format!("msg-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1),
            author,
            content,
            created_at: Utc::now(),
            audio_url,
        };

        let mut transcript = self.transcript.lock().unwrap_or_else(|e| e.into_inner());
        transcript.push(message.clone());
        message
    }
}
