use std::path::PathBuf;

/// Upload lifecycle of a captured asset
///
/// Transitions are forward-only: Idle -> Uploading -> {Done, Failed}.
/// Done and Failed are terminal; an asset never re-enters Uploading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    Uploading,
    Done,
    Failed,
}

/// A locally captured or selected image on its way to analysis
#[derive(Debug, Clone)]
pub struct MediaAsset {
    pub local_path: PathBuf,
    upload_state: UploadState,
    remote_problem_id: Option<String>,
}

impl MediaAsset {
    pub fn new(local_path: impl Into<PathBuf>) -> Self {
        Self {
            local_path: local_path.into(),
            upload_state: UploadState::Idle,
            remote_problem_id: None,
        }
    }

    pub fn upload_state(&self) -> UploadState {
        self.upload_state
    }

    pub fn remote_problem_id(&self) -> Option<&str> {
        self.remote_problem_id.as_deref()
    }

    pub(crate) fn begin_upload(&mut self) {
        debug_assert_eq!(self.upload_state, UploadState::Idle);
        self.upload_state = UploadState::Uploading;
    }

    pub(crate) fn complete(&mut self, problem_id: String) {
        debug_assert_eq!(self.upload_state, UploadState::Uploading);
        self.upload_state = UploadState::Done;
        self.remote_problem_id = Some(problem_id);
    }

    pub(crate) fn fail(&mut self) {
        debug_assert_eq!(self.upload_state, UploadState::Uploading);
        self.upload_state = UploadState::Failed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_moves_forward_only() {
        let mut asset = MediaAsset::new("/tmp/shot.jpg");
        assert_eq!(asset.upload_state(), UploadState::Idle);
        assert!(asset.remote_problem_id().is_none());

        asset.begin_upload();
        assert_eq!(asset.upload_state(), UploadState::Uploading);

        asset.complete("p1".to_string());
        assert_eq!(asset.upload_state(), UploadState::Done);
        assert_eq!(asset.remote_problem_id(), Some("p1"));
    }

    #[test]
    fn failed_is_terminal_without_problem_id() {
        let mut asset = MediaAsset::new("/tmp/shot.jpg");
        asset.begin_upload();
        asset.fail();

        assert_eq!(asset.upload_state(), UploadState::Failed);
        assert!(asset.remote_problem_id().is_none());
    }
}
