use anyhow::Result;
use std::path::PathBuf;
use tokio::sync::oneshot;

use crate::config::{AudioConfig, CaptureConfig};

/// Flash behavior for the next photo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashMode {
    Off,
    On,
    Auto,
}

impl FlashMode {
    /// Cycle off -> on -> auto -> off
    pub fn next(self) -> Self {
        match self {
            FlashMode::Off => FlashMode::On,
            FlashMode::On => FlashMode::Auto,
            FlashMode::Auto => FlashMode::Off,
        }
    }
}

/// Which physical camera is selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LensFacing {
    Back,
    Front,
}

impl LensFacing {
    pub fn toggled(self) -> Self {
        match self {
            LensFacing::Back => LensFacing::Front,
            LensFacing::Front => LensFacing::Back,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoQuality {
    Low,
    Normal,
    High,
}

impl PhotoQuality {
    pub fn parse(s: &str) -> Self {
        match s {
            "low" => PhotoQuality::Low,
            "normal" => PhotoQuality::Normal,
            _ => PhotoQuality::High,
        }
    }
}

/// Settings handed to the camera for a single shot
#[derive(Debug, Clone)]
pub struct CaptureSettings {
    pub quality: PhotoQuality,
    pub flash: FlashMode,
    pub lens: LensFacing,
}

impl CaptureSettings {
    pub fn from_config(cfg: &CaptureConfig) -> Self {
        Self {
            quality: PhotoQuality::parse(&cfg.photo_quality),
            flash: FlashMode::Off,
            lens: LensFacing::Back,
        }
    }
}

/// Settings handed to the microphone recorder
#[derive(Debug, Clone)]
pub struct RecorderSettings {
    pub max_duration_ms: u64,
    pub sample_rate: u32,
    pub channels: u16,
    pub encode_bit_rate: u32,
    pub format: String,
}

impl Default for RecorderSettings {
    fn default() -> Self {
        Self {
            max_duration_ms: 60_000,
            sample_rate: 16_000,
            channels: 1,
            encode_bit_rate: 96_000,
            format: "mp3".to_string(),
        }
    }
}

impl RecorderSettings {
    pub fn from_config(cfg: &AudioConfig) -> Self {
        Self {
            max_duration_ms: cfg.max_duration_ms,
            sample_rate: cfg.sample_rate,
            channels: cfg.channels,
            encode_bit_rate: cfg.encode_bit_rate,
            format: cfg.format.clone(),
        }
    }
}

/// How a playback clip ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEnd {
    /// The clip played to its natural end
    Finished,
    /// `stop` was called before the clip ended
    Stopped,
    /// The platform player reported an error mid-clip
    Failed,
}

/// Persistent key-value storage
///
/// Pure pass-through to a platform store; the client uses exactly two keys
/// (session token and cached user profile). Values are opaque strings.
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;
}

#[async_trait::async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key).await
    }
}

/// Camera device
///
/// Platform-specific implementations wrap callback-style capture APIs as
/// operations that resolve exactly once. Acquisition is exclusive: one
/// holder of the device at a time, and `release` is mandatory on every exit
/// path, including failure.
#[async_trait::async_trait]
pub trait Camera: Send + Sync {
    /// Take a single photo, resolving with the captured file path
    async fn take_photo(&mut self, settings: &CaptureSettings) -> Result<PathBuf>;

    /// Release the camera device. Must be safe to call repeatedly.
    async fn release(&mut self) -> Result<()>;

    /// Get camera name for logging
    fn name(&self) -> &str;
}

/// System image picker
#[async_trait::async_trait]
pub trait Gallery: Send + Sync {
    /// Let the user pick one image; `None` when the picker is dismissed
    async fn pick_image(&mut self) -> Result<Option<PathBuf>>;
}

/// Microphone recorder
///
/// Wraps onStart/onStop/onError callback APIs: `start` resolves once the
/// device is actually recording, `stop` resolves once the file is finalized.
#[async_trait::async_trait]
pub trait Recorder: Send + Sync {
    async fn start(&mut self, settings: &RecorderSettings) -> Result<()>;

    /// Stop and finalize, resolving with the recorded file path
    async fn stop(&mut self) -> Result<PathBuf>;

    /// Check if the device is currently recording
    fn is_recording(&self) -> bool;
}

/// Audio output channel
#[async_trait::async_trait]
pub trait AudioOutput: Send + Sync {
    /// Start playing the clip at `url`.
    ///
    /// The returned receiver resolves exactly once, when the clip finishes,
    /// is stopped, or fails.
    async fn play(&mut self, url: &str) -> Result<oneshot::Receiver<PlaybackEnd>>;

    /// Stop the current clip. No-op when nothing is playing.
    async fn stop(&mut self) -> Result<()>;
}
