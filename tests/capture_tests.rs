// Capture pipeline: photo/gallery entry points, single-flight, camera
// release on every exit path, and the forward-only asset lifecycle.

mod common;

use axum::routing::post;
use axum::Router;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tutor_client::platform::{CaptureSettings, FixtureCamera, FixtureGallery, FlashMode, LensFacing, PhotoQuality};
use tutor_client::{ApiClient, CaptureState, MediaCaptureController, UploadState};

fn settings() -> CaptureSettings {
    CaptureSettings {
        quality: PhotoQuality::High,
        flash: FlashMode::Off,
        lens: LensFacing::Back,
    }
}

async fn temp_photo(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    tokio::fs::write(&path, b"jpeg-bytes").await.unwrap();
    path
}

fn controller(
    camera: FixtureCamera,
    gallery: FixtureGallery,
    api: Arc<ApiClient>,
) -> MediaCaptureController {
    MediaCaptureController::new(Box::new(camera), Box::new(gallery), api, settings())
}

#[tokio::test]
async fn photo_upload_transitions_to_analyzed() {
    let dir = tempfile::tempdir().unwrap();
    let shot = temp_photo(&dir, "shot.jpg").await;

    let app = Router::new().route(
        "/api/homework/upload",
        post(|| async { common::ok(json!({ "problemId": "p1" })) }),
    );
    let base = common::serve(app).await;
    let (_session, api) = common::authed_stack(&base, "tok-1").await;

    let camera = FixtureCamera::new(vec![shot]);
    let releases = camera.release_probe();
    let capture = controller(camera, FixtureGallery::new(None), api);

    let state = capture.capture_photo().await;

    assert_eq!(
        state,
        CaptureState::Analyzed {
            problem_id: "p1".to_string()
        }
    );
    assert_eq!(capture.analyzed_problem_id(), Some("p1".to_string()));
    assert_eq!(releases.load(std::sync::atomic::Ordering::SeqCst), 1);

    let asset = capture.last_asset().unwrap();
    assert_eq!(asset.upload_state(), UploadState::Done);
    assert_eq!(asset.remote_problem_id(), Some("p1"));
}

#[tokio::test]
async fn upload_failure_transitions_to_failed_and_releases_camera() {
    let dir = tempfile::tempdir().unwrap();
    let shot = temp_photo(&dir, "shot.jpg").await;

    let app = Router::new().route(
        "/api/homework/upload",
        post(|| async { common::fail(1001, "unrecognized image") }),
    );
    let base = common::serve(app).await;
    let (_session, api) = common::authed_stack(&base, "tok-1").await;

    let camera = FixtureCamera::new(vec![shot]);
    let releases = camera.release_probe();
    let capture = controller(camera, FixtureGallery::new(None), api);

    let state = capture.capture_photo().await;

    match state {
        CaptureState::Failed { message } => assert_eq!(message, "unrecognized image"),
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(releases.load(std::sync::atomic::Ordering::SeqCst), 1);

    let asset = capture.last_asset().unwrap();
    assert_eq!(asset.upload_state(), UploadState::Failed);
    assert!(asset.remote_problem_id().is_none());
}

#[tokio::test]
async fn denied_camera_fails_locally_and_still_releases() {
    let (_session, api) = common::authed_stack(common::UNREACHABLE, "tok-1").await;

    let camera = FixtureCamera::denied();
    let releases = camera.release_probe();
    let capture = controller(camera, FixtureGallery::new(None), api);

    let state = capture.capture_photo().await;

    assert!(matches!(state, CaptureState::Failed { .. }));
    assert_eq!(releases.load(std::sync::atomic::Ordering::SeqCst), 1);
    // A hardware failure never produces an asset
    assert!(capture.last_asset().is_none());
}

#[tokio::test]
async fn gallery_pick_feeds_the_same_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let picked = temp_photo(&dir, "picked.jpg").await;

    let app = Router::new().route(
        "/api/homework/upload",
        post(|| async { common::ok(json!({ "problemId": "p2" })) }),
    );
    let base = common::serve(app).await;
    let (_session, api) = common::authed_stack(&base, "tok-1").await;

    let capture = controller(
        FixtureCamera::new(vec![]),
        FixtureGallery::new(Some(picked)),
        api,
    );

    let state = capture.pick_from_gallery().await;

    assert_eq!(
        state,
        CaptureState::Analyzed {
            problem_id: "p2".to_string()
        }
    );
}

#[tokio::test]
async fn dismissed_picker_returns_to_idle() {
    let (_session, api) = common::authed_stack(common::UNREACHABLE, "tok-1").await;
    let capture = controller(FixtureCamera::new(vec![]), FixtureGallery::new(None), api);

    let state = capture.pick_from_gallery().await;

    assert_eq!(state, CaptureState::Idle);
    assert!(capture.last_asset().is_none());
}

#[tokio::test]
async fn second_capture_while_busy_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let first = temp_photo(&dir, "first.jpg").await;
    let second = temp_photo(&dir, "second.jpg").await;

    // Slow upload keeps the pipeline busy while the second call arrives
    let app = Router::new().route(
        "/api/homework/upload",
        post(|| async {
            tokio::time::sleep(Duration::from_millis(300)).await;
            common::ok(json!({ "problemId": "p1" }))
        }),
    );
    let base = common::serve(app).await;
    let (_session, api) = common::authed_stack(&base, "tok-1").await;

    let camera = FixtureCamera::new(vec![first, second]);
    let releases = camera.release_probe();
    let capture = Arc::new(controller(camera, FixtureGallery::new(None), api));

    let runner = Arc::clone(&capture);
    let pipeline = tokio::spawn(async move { runner.capture_photo().await });

    common::wait_until(|| capture.state().is_busy()).await;
    let state = capture.capture_photo().await;
    assert!(state.is_busy(), "second call must not start a second upload");

    let final_state = pipeline.await.unwrap();
    assert_eq!(
        final_state,
        CaptureState::Analyzed {
            problem_id: "p1".to_string()
        }
    );
    // Exactly one pipeline ran: one shot taken, one release
    assert_eq!(releases.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test]
async fn flash_and_lens_toggles_are_local_state() {
    let (_session, api) = common::authed_stack(common::UNREACHABLE, "tok-1").await;
    let capture = controller(FixtureCamera::new(vec![]), FixtureGallery::new(None), api);

    assert_eq!(capture.flash_mode(), FlashMode::Off);
    assert_eq!(capture.toggle_flash(), FlashMode::On);
    assert_eq!(capture.toggle_flash(), FlashMode::Auto);
    assert_eq!(capture.toggle_flash(), FlashMode::Off);

    assert_eq!(capture.lens_facing(), LensFacing::Back);
    assert_eq!(capture.switch_camera(), LensFacing::Front);
    assert_eq!(capture.switch_camera(), LensFacing::Back);

    // No capture was triggered, no network was touched
    assert_eq!(capture.state(), CaptureState::Idle);
}
