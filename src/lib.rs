pub mod api;
pub mod audio;
pub mod capture;
pub mod chat;
pub mod config;
pub mod error;
pub mod mistakes;
pub mod platform;
pub mod session;

pub use api::{ApiClient, ChatReply, Envelope, Problem, RequestGateway, UploadedAudio, UploadedPhoto};
pub use audio::{AudioSessionController, PlaybackState, RecordedAudio, RecordingState};
pub use capture::{CaptureState, MediaAsset, MediaCaptureController, UploadState};
pub use chat::{Author, ChatMessage, ChatSession};
pub use config::Config;
pub use error::ClientError;
pub use mistakes::MistakeBook;
pub use platform::{
    AudioOutput, Camera, CaptureSettings, FlashMode, Gallery, KeyValueStore, LensFacing,
    PlaybackEnd, Recorder, RecorderSettings,
};
pub use session::{Session, SessionStore, UserProfile};
