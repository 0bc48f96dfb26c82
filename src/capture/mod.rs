//! Photo capture pipeline
//!
//! Camera shots and gallery picks feed one pipeline: acquire asset, upload,
//! obtain the analyzed problem id. One pipeline run at a time; the camera is
//! released on every exit path.

mod asset;
mod controller;

pub use asset::{MediaAsset, UploadState};
pub use controller::{CaptureState, MediaCaptureController};
