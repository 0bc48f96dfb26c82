use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Synthetic assistant greeting appended after the problem context loads
pub const WELCOME_MESSAGE: &str =
    "Hi! I'm your homework tutor. What would you like to know about this problem?";

/// Fixed assistant reply appended when a text turn fails for any reason
pub const APOLOGY_MESSAGE: &str =
    "Sorry, I can't answer that right now. Please try again later.";

/// Transcript stand-in for the content of a voice turn
pub const VOICE_PLACEHOLDER: &str = "[voice message]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    User,
    Assistant,
}

/// One immutable turn of the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub author: Author,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub audio_url: Option<String>,
}
