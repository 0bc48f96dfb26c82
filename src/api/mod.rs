//! Backend API surface
//!
//! Every request to the tutoring backend flows through the
//! [`RequestGateway`], which attaches credentials, applies timeouts, and
//! unwraps the uniform response envelope. [`ApiClient`] layers the typed
//! endpoint methods on top.

mod client;
mod envelope;
mod gateway;
mod types;

pub use client::ApiClient;
pub use envelope::{Envelope, CODE_AUTH_EXPIRED, CODE_OK};
pub use gateway::RequestGateway;
pub use types::{
    ChatReply, MistakePage, MistakeProblem, Problem, TtsAudio, UploadedAudio, UploadedPhoto,
    UserStats,
};
