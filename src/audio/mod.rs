//! Voice recording and playback
//!
//! Two state machines, one physical audio channel: at most one of
//! {recording, playback} is active process-wide at any instant.

mod controller;

pub use controller::{AudioSessionController, PlaybackState, RecordedAudio, RecordingState};
