//! Platform capability interfaces
//!
//! The client core never talks to a concrete platform API. Camera,
//! microphone, audio output, and the persistent key-value store are each
//! abstracted behind a trait here, with one implementation per target:
//! - real device integrations live with the embedding application
//! - `memory` / `fixture` variants back tests and batch processing

pub mod capability;
pub mod fixture;
pub mod memory;

pub use capability::{
    AudioOutput, Camera, CaptureSettings, FlashMode, Gallery, KeyValueStore, LensFacing,
    PhotoQuality, PlaybackEnd, Recorder, RecorderSettings,
};
pub use fixture::{FixtureAudioOutput, FixtureCamera, FixtureGallery, FixtureRecorder, PlaybackProbe};
pub use memory::MemoryStore;
