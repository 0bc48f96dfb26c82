use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::{oneshot, Mutex};
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::platform::{AudioOutput, PlaybackEnd, Recorder, RecorderSettings};

/// Microphone sub-machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordingState {
    Idle,
    Active,
    Stopping,
    Error(String),
}

/// Speaker sub-machine, keyed by the message currently sounding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Active { message_id: String },
    Stopping,
    Error(String),
}

impl PlaybackState {
    fn is_active_message(&self, message_id: &str) -> bool {
        matches!(self, PlaybackState::Active { message_id: id } if id == message_id)
    }
}

/// A finished voice recording
///
/// `remote_url` is `None` when the automatic upload failed; the local file
/// is still available for a retry-by-resend at the call site.
#[derive(Debug, Clone)]
pub struct RecordedAudio {
    pub local_path: PathBuf,
    pub remote_url: Option<String>,
}

/// Owner of the microphone and the audio output channel
///
/// Both devices share one physical channel, so starting a recording first
/// silences playback, and playback requests fail fast while the microphone
/// is open.
pub struct AudioSessionController {
    recorder: Mutex<Box<dyn Recorder>>,
    output: Mutex<Box<dyn AudioOutput>>,
    api: Arc<ApiClient>,
    settings: RecorderSettings,
    recording: Arc<StdMutex<RecordingState>>,
    playback: Arc<StdMutex<PlaybackState>>,
    /// Bumped on every playback transition so a stale end-of-clip
    /// notification cannot reset a newer clip's state
    playback_epoch: Arc<AtomicU64>,
}

impl AudioSessionController {
    pub fn new(
        recorder: Box<dyn Recorder>,
        output: Box<dyn AudioOutput>,
        api: Arc<ApiClient>,
        settings: RecorderSettings,
    ) -> Self {
        Self {
            recorder: Mutex::new(recorder),
            output: Mutex::new(output),
            api,
            settings,
            recording: Arc::new(StdMutex::new(RecordingState::Idle)),
            playback: Arc::new(StdMutex::new(PlaybackState::Idle)),
            playback_epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn recording_state(&self) -> RecordingState {
        self.recording
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.playback
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Open the microphone.
    ///
    /// Active playback is stopped first (one physical channel). Calling
    /// while already recording is a no-op.
    pub async fn start_recording(&self) -> Result<(), ClientError> {
        if matches!(
            self.recording_state(),
            RecordingState::Active | RecordingState::Stopping
        ) {
            warn!("Recording already active, ignoring");
            return Ok(());
        }

        self.stop_playback().await;

        let started = {
            let mut recorder = self.recorder.lock().await;
            recorder.start(&self.settings).await
        };

        match started {
            Ok(()) => {
                self.set_recording(RecordingState::Active);
                info!("Recording started");
                Ok(())
            }
            Err(e) => {
                self.set_recording(RecordingState::Error(e.to_string()));
                Err(ClientError::resource(e))
            }
        }
    }

    /// Close the microphone, finalize the file, and upload it.
    ///
    /// Returns `Ok(None)` when no recording was active. The state returns
    /// to Idle regardless of the upload outcome; a failed upload leaves
    /// `remote_url` empty.
    pub async fn finish_recording(&self) -> Result<Option<RecordedAudio>, ClientError> {
        {
            let mut recording = self.recording.lock().unwrap_or_else(|e| e.into_inner());
            if *recording != RecordingState::Active {
                return Ok(None);
            }
            *recording = RecordingState::Stopping;
        }

        let stopped = {
            let mut recorder = self.recorder.lock().await;
            recorder.stop().await
        };

        let local_path = match stopped {
            Ok(path) => path,
            Err(e) => {
                self.set_recording(RecordingState::Error(e.to_string()));
                return Err(ClientError::resource(e));
            }
        };

        info!("Recording finished: {}", local_path.display());

        let remote_url = match self.api.upload_audio(&local_path).await {
            Ok(uploaded) => Some(uploaded.audio_url),
            Err(e) => {
                warn!("Voice upload failed: {}", e);
                None
            }
        };

        self.set_recording(RecordingState::Idle);
        Ok(Some(RecordedAudio {
            local_path,
            remote_url,
        }))
    }

    /// Start, switch, or stop playback for a message.
    ///
    /// Requesting the message already sounding stops it. Requesting a
    /// different message stops the current clip first; the last request
    /// wins. Fails fast while the microphone is open.
    pub async fn toggle_playback(
        &self,
        message_id: &str,
        url: &str,
    ) -> Result<PlaybackState, ClientError> {
        if self.playback_state().is_active_message(message_id) {
            self.stop_playback().await;
            return Ok(PlaybackState::Idle);
        }

        if matches!(
            self.recording_state(),
            RecordingState::Active | RecordingState::Stopping
        ) {
            return Err(ClientError::Resource(
                "cannot play audio while recording".to_string(),
            ));
        }

        // Last request wins over whatever was sounding before
        self.stop_playback().await;

        let played = {
            let mut output = self.output.lock().await;
            output.play(url).await
        };

        match played {
            Ok(done) => {
                let next = PlaybackState::Active {
                    message_id: message_id.to_string(),
                };
                self.set_playback(next.clone());
                let epoch = self.playback_epoch.fetch_add(1, Ordering::SeqCst) + 1;
                self.watch_clip_end(done, epoch);
                info!("Playback started: {}", message_id);
                Ok(next)
            }
            Err(e) => {
                self.set_playback(PlaybackState::Error(e.to_string()));
                Err(ClientError::resource(e))
            }
        }
    }

    /// Stop whatever is sounding. No-op when already Idle.
    pub async fn stop_playback(&self) {
        {
            let mut playback = self.playback.lock().unwrap_or_else(|e| e.into_inner());
            if *playback == PlaybackState::Idle {
                return;
            }
            *playback = PlaybackState::Stopping;
        }

        // Supersede any pending end-of-clip notification
        self.playback_epoch.fetch_add(1, Ordering::SeqCst);

        let stopped = {
            let mut output = self.output.lock().await;
            output.stop().await
        };
        if let Err(e) = stopped {
            warn!("Failed to stop playback: {}", e);
        }

        self.set_playback(PlaybackState::Idle);
    }

    /// Component teardown: silence both machines.
    ///
    /// An in-flight recording is stopped and its file discarded without
    /// upload.
    pub async fn shutdown(&self) {
        let was_recording = {
            let mut recording = self.recording.lock().unwrap_or_else(|e| e.into_inner());
            let active = *recording == RecordingState::Active;
            *recording = RecordingState::Idle;
            active
        };

        if was_recording {
            let mut recorder = self.recorder.lock().await;
            match recorder.stop().await {
                Ok(path) => info!("Recording discarded on teardown: {}", path.display()),
                Err(e) => warn!("Failed to stop recorder on teardown: {}", e),
            }
        }

        self.stop_playback().await;
    }

    fn set_recording(&self, next: RecordingState) {
        let mut recording = self.recording.lock().unwrap_or_else(|e| e.into_inner());
        *recording = next;
    }

    fn set_playback(&self, next: PlaybackState) {
        let mut playback = self.playback.lock().unwrap_or_else(|e| e.into_inner());
        *playback = next;
    }

    fn watch_clip_end(&self, done: oneshot::Receiver<PlaybackEnd>, epoch: u64) {
        let playback = Arc::clone(&self.playback);
        let epochs = Arc::clone(&self.playback_epoch);

        tokio::spawn(async move {
            // A dropped sender counts as a stop
            let end = done.await.unwrap_or(PlaybackEnd::Stopped);

            if epochs.load(Ordering::SeqCst) != epoch {
                return; // superseded by a newer clip or an explicit stop
            }

            let mut state = playback.lock().unwrap_or_else(|e| e.into_inner());
            match end {
                PlaybackEnd::Finished | PlaybackEnd::Stopped => {
                    *state = PlaybackState::Idle;
                }
                PlaybackEnd::Failed => {
                    warn!("Playback failed mid-clip");
                    *state = PlaybackState::Error("playback failed".to_string());
                }
            }
        });
    }
}
