//! File-backed capability implementations for tests and batch processing.
//!
//! No real hardware: the camera serves queued image paths, the recorder
//! writes placeholder files, and the audio output tracks clip lifecycles
//! through a [`PlaybackProbe`] so callers can observe and drive completions.

use anyhow::Result;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{oneshot, Mutex};
use tracing::info;

use super::capability::{
    AudioOutput, Camera, CaptureSettings, Gallery, PlaybackEnd, Recorder, RecorderSettings,
};

/// Camera that serves a queue of prepared image files
pub struct FixtureCamera {
    shots: Mutex<VecDeque<PathBuf>>,
    releases: Arc<AtomicUsize>,
    deny: bool,
}

impl FixtureCamera {
    pub fn new(shots: Vec<PathBuf>) -> Self {
        Self {
            shots: Mutex::new(shots.into()),
            releases: Arc::new(AtomicUsize::new(0)),
            deny: false,
        }
    }

    /// Camera whose every capture fails, as if permission were denied
    pub fn denied() -> Self {
        Self {
            shots: Mutex::new(VecDeque::new()),
            releases: Arc::new(AtomicUsize::new(0)),
            deny: true,
        }
    }

    /// Counter incremented on every `release` call; clone before boxing
    pub fn release_probe(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.releases)
    }
}

#[async_trait::async_trait]
impl Camera for FixtureCamera {
    async fn take_photo(&mut self, _settings: &CaptureSettings) -> Result<PathBuf> {
        if self.deny {
            anyhow::bail!("camera permission denied");
        }

        let mut shots = self.shots.lock().await;
        shots
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("no fixture shots left"))
    }

    async fn release(&mut self) -> Result<()> {
        self.releases.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &str {
        "fixture"
    }
}

/// Gallery that always offers the same selection
pub struct FixtureGallery {
    selection: Option<PathBuf>,
}

impl FixtureGallery {
    pub fn new(selection: Option<PathBuf>) -> Self {
        Self { selection }
    }
}

#[async_trait::async_trait]
impl Gallery for FixtureGallery {
    async fn pick_image(&mut self) -> Result<Option<PathBuf>> {
        Ok(self.selection.clone())
    }
}

/// Recorder that writes placeholder audio files into a directory
pub struct FixtureRecorder {
    dir: PathBuf,
    active: Mutex<Option<PathBuf>>,
    recording: AtomicBool,
}

impl FixtureRecorder {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            active: Mutex::new(None),
            recording: AtomicBool::new(false),
        }
    }
}

#[async_trait::async_trait]
impl Recorder for FixtureRecorder {
    async fn start(&mut self, settings: &RecorderSettings) -> Result<()> {
        let mut active = self.active.lock().await;
        if active.is_some() {
            anyhow::bail!("recorder already started");
        }

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self
            .dir
            .join(format!("recording-{}.{}", uuid::Uuid::new_v4(), settings.format));
        tokio::fs::write(&path, b"fixture-audio").await?;

        info!("Fixture recorder started: {}", path.display());

        *active = Some(path);
        self.recording.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&mut self) -> Result<PathBuf> {
        let mut active = self.active.lock().await;
        self.recording.store(false, Ordering::SeqCst);
        active
            .take()
            .ok_or_else(|| anyhow::anyhow!("recorder is not active"))
    }

    fn is_recording(&self) -> bool {
        self.recording.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
struct PlaybackInner {
    now_playing: Option<String>,
    ender: Option<oneshot::Sender<PlaybackEnd>>,
    stops: usize,
}

/// Audio output that never touches a speaker
///
/// Clips stay "playing" until the probe finishes them or `stop` is called.
pub struct FixtureAudioOutput {
    inner: Arc<Mutex<PlaybackInner>>,
}

/// Observer/driver handle onto a [`FixtureAudioOutput`]
#[derive(Clone)]
pub struct PlaybackProbe {
    inner: Arc<Mutex<PlaybackInner>>,
}

impl FixtureAudioOutput {
    pub fn new() -> (Self, PlaybackProbe) {
        let inner = Arc::new(Mutex::new(PlaybackInner::default()));
        (
            Self {
                inner: Arc::clone(&inner),
            },
            PlaybackProbe { inner },
        )
    }
}

impl PlaybackProbe {
    pub async fn now_playing(&self) -> Option<String> {
        self.inner.lock().await.now_playing.clone()
    }

    pub async fn stop_count(&self) -> usize {
        self.inner.lock().await.stops
    }

    /// Let the current clip reach its natural end
    pub async fn finish_current(&self) {
        let mut inner = self.inner.lock().await;
        inner.now_playing = None;
        if let Some(ender) = inner.ender.take() {
            let _ = ender.send(PlaybackEnd::Finished);
        }
    }

    /// Make the current clip fail mid-play
    pub async fn fail_current(&self) {
        let mut inner = self.inner.lock().await;
        inner.now_playing = None;
        if let Some(ender) = inner.ender.take() {
            let _ = ender.send(PlaybackEnd::Failed);
        }
    }
}

#[async_trait::async_trait]
impl AudioOutput for FixtureAudioOutput {
    async fn play(&mut self, url: &str) -> Result<oneshot::Receiver<PlaybackEnd>> {
        let mut inner = self.inner.lock().await;

        // A replaced clip resolves as stopped before the new one starts
        if let Some(ender) = inner.ender.take() {
            let _ = ender.send(PlaybackEnd::Stopped);
        }

        let (tx, rx) = oneshot::channel();
        inner.now_playing = Some(url.to_string());
        inner.ender = Some(tx);
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        let mut inner = self.inner.lock().await;
        inner.stops += 1;
        inner.now_playing = None;
        if let Some(ender) = inner.ender.take() {
            let _ = ender.send(PlaybackEnd::Stopped);
        }
        Ok(())
    }
}
