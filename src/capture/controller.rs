use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::asset::MediaAsset;
use crate::api::ApiClient;
use crate::platform::{Camera, CaptureSettings, FlashMode, Gallery, LensFacing};

/// Pipeline state of the capture controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Capturing,
    Uploading,
    Analyzed { problem_id: String },
    Failed { message: String },
}

impl CaptureState {
    /// A second capture/upload must not start while this is true
    pub fn is_busy(&self) -> bool {
        matches!(self, CaptureState::Capturing | CaptureState::Uploading)
    }
}

/// Owner of the camera device and the capture pipeline
///
/// `capture_photo` and `pick_from_gallery` are alternative entries into the
/// same acquire -> upload -> analyze pipeline. A call while the pipeline is
/// busy is a no-op returning the current state, so no second upload can
/// start. The camera is released on every exit path, including failures.
pub struct MediaCaptureController {
    camera: Mutex<Box<dyn Camera>>,
    gallery: Mutex<Box<dyn Gallery>>,
    api: Arc<ApiClient>,
    state: StdMutex<CaptureState>,
    device: StdMutex<CaptureSettings>,
    last_asset: StdMutex<Option<MediaAsset>>,
}

impl MediaCaptureController {
    pub fn new(
        camera: Box<dyn Camera>,
        gallery: Box<dyn Gallery>,
        api: Arc<ApiClient>,
        settings: CaptureSettings,
    ) -> Self {
        Self {
            camera: Mutex::new(camera),
            gallery: Mutex::new(gallery),
            api,
            state: StdMutex::new(CaptureState::Idle),
            device: StdMutex::new(settings),
            last_asset: StdMutex::new(None),
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// The asset most recently run through the pipeline
    pub fn last_asset(&self) -> Option<MediaAsset> {
        self.last_asset
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Problem id of the latest successful analysis, for navigation
    pub fn analyzed_problem_id(&self) -> Option<String> {
        match self.state() {
            CaptureState::Analyzed { problem_id } => Some(problem_id),
            _ => None,
        }
    }

    pub fn flash_mode(&self) -> FlashMode {
        self.device.lock().unwrap_or_else(|e| e.into_inner()).flash
    }

    /// Cycle the flash; local state only, no capture is triggered
    pub fn toggle_flash(&self) -> FlashMode {
        let mut device = self.device.lock().unwrap_or_else(|e| e.into_inner());
        device.flash = device.flash.next();
        device.flash
    }

    pub fn lens_facing(&self) -> LensFacing {
        self.device.lock().unwrap_or_else(|e| e.into_inner()).lens
    }

    /// Flip between front and back camera; local state only
    pub fn switch_camera(&self) -> LensFacing {
        let mut device = self.device.lock().unwrap_or_else(|e| e.into_inner());
        device.lens = device.lens.toggled();
        device.lens
    }

    /// Take a photo and run it through the pipeline
    pub async fn capture_photo(&self) -> CaptureState {
        if !self.try_begin() {
            warn!("Capture already in progress, ignoring");
            return self.state();
        }

        let settings = self.device.lock().unwrap_or_else(|e| e.into_inner()).clone();
        let shot = {
            let mut camera = self.camera.lock().await;
            camera.take_photo(&settings).await
        };

        match shot {
            Ok(path) => self.run_pipeline(MediaAsset::new(path)).await,
            Err(e) => {
                self.release_camera().await;
                self.finish(CaptureState::Failed {
                    message: format!("photo capture failed: {e}"),
                })
            }
        }
    }

    /// Pick an image from the gallery and run it through the pipeline
    pub async fn pick_from_gallery(&self) -> CaptureState {
        if !self.try_begin() {
            warn!("Capture already in progress, ignoring");
            return self.state();
        }

        let picked = {
            let mut gallery = self.gallery.lock().await;
            gallery.pick_image().await
        };

        match picked {
            Ok(Some(path)) => self.run_pipeline(MediaAsset::new(path)).await,
            Ok(None) => {
                info!("Image picker dismissed");
                self.finish(CaptureState::Idle)
            }
            Err(e) => self.finish(CaptureState::Failed {
                message: format!("image selection failed: {e}"),
            }),
        }
    }

    /// Upload an already-acquired asset and wait for its analysis
    pub async fn upload_and_analyze(&self, asset: MediaAsset) -> CaptureState {
        if !self.try_begin() {
            warn!("Capture already in progress, ignoring");
            return self.state();
        }
        self.run_pipeline(asset).await
    }

    /// Release the camera; mandatory on component teardown
    pub async fn shutdown(&self) {
        self.release_camera().await;
    }

    async fn run_pipeline(&self, mut asset: MediaAsset) -> CaptureState {
        {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            *state = CaptureState::Uploading;
        }
        asset.begin_upload();

        let result = self.api.upload_photo(&asset.local_path).await;

        // The camera must be free again whatever the upload outcome
        self.release_camera().await;

        let next = match result {
            Ok(uploaded) => {
                asset.complete(uploaded.problem_id.clone());
                info!("Problem analyzed: {}", uploaded.problem_id);
                CaptureState::Analyzed {
                    problem_id: uploaded.problem_id,
                }
            }
            Err(e) => {
                asset.fail();
                warn!("Upload failed: {}", e);
                CaptureState::Failed {
                    message: e.to_string(),
                }
            }
        };

        {
            let mut last = self.last_asset.lock().unwrap_or_else(|e| e.into_inner());
            *last = Some(asset);
        }
        self.finish(next)
    }

    /// Atomically claim the pipeline; false when a run is already active
    fn try_begin(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.is_busy() {
            return false;
        }
        *state = CaptureState::Capturing;
        true
    }

    fn finish(&self, next: CaptureState) -> CaptureState {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        *state = next.clone();
        next
    }

    async fn release_camera(&self) {
        let mut camera = self.camera.lock().await;
        if let Err(e) = camera.release().await {
            warn!("Failed to release camera: {}", e);
        }
    }
}
