//! Tutoring conversation
//!
//! An append-only transcript of user and assistant turns for one problem.
//! Messages are immutable once appended and only ever added at the tail.

mod message;
mod session;

pub use message::{Author, ChatMessage, APOLOGY_MESSAGE, VOICE_PLACEHOLDER, WELCOME_MESSAGE};
pub use session::ChatSession;
