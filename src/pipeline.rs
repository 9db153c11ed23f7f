/// Asynchronous halves of the upload and magic-edit actions
///
/// These run as background tasks and only produce values. Applying them to
/// the gallery happens back on the UI loop in `GalleryState`.

use std::path::PathBuf;
use std::sync::Arc;

use crate::ai::{AnalysisResult, Gateway};
use crate::encode::{read_image_file, ImageData};
use crate::error::{EncodeError, GatewayError};
use crate::state::gallery::EditRequest;
use crate::state::PhotoId;

/// An encoded upload plus whatever the gateway said about it
///
/// The image is kept whether or not the analysis succeeded, so a failed
/// analysis never needs the file again.
#[derive(Debug, Clone)]
pub struct PreparedUpload {
    pub image: ImageData,
    pub analysis: Result<AnalysisResult, GatewayError>,
}

/// Result of a magic edit, tagged with the photo and instruction it was for
#[derive(Debug, Clone)]
pub struct EditCompletion {
    pub id: PhotoId,
    pub instruction: String,
    pub result: Result<Option<ImageData>, GatewayError>,
}

/// Encode the selected file, then ask the gateway to describe it.
///
/// Only an encode failure is an error; gateway failures travel inside
/// the returned upload.
pub async fn prepare_upload(
    gateway: Arc<dyn Gateway>,
    path: PathBuf,
) -> Result<PreparedUpload, EncodeError> {
    let image = read_image_file(path).await?;
    let analysis = gateway.analyze(&image).await;

    if let Err(err) = &analysis {
        tracing::warn!("⚠️  Analysis failed: {}", err);
    }

    Ok(PreparedUpload { image, analysis })
}

/// Send an edit request to the gateway
pub async fn run_edit(gateway: Arc<dyn Gateway>, request: EditRequest) -> EditCompletion {
    let result = gateway.edit(&request.image, &request.instruction).await;

    if let Err(err) = &result {
        tracing::warn!("⚠️  Edit of {} failed: {}", request.id, err);
    }

    EditCompletion {
        id: request.id,
        instruction: request.instruction,
        result,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::ai::Analysis;
    use async_trait::async_trait;
    use std::io::Write;
    use std::sync::Mutex;

    /// Gateway that replays canned answers and records what it was sent
    pub(crate) struct FakeGateway {
        pub analysis: Result<AnalysisResult, GatewayError>,
        pub edit: Result<Option<ImageData>, GatewayError>,
        pub seen: Mutex<Vec<ImageData>>,
    }

    impl FakeGateway {
        pub(crate) fn new(
            analysis: Result<AnalysisResult, GatewayError>,
            edit: Result<Option<ImageData>, GatewayError>,
        ) -> Self {
            Self {
                analysis,
                edit,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Gateway for FakeGateway {
        async fn analyze(&self, image: &ImageData) -> Result<AnalysisResult, GatewayError> {
            self.seen.lock().unwrap().push(image.clone());
            self.analysis.clone()
        }

        async fn edit(
            &self,
            image: &ImageData,
            _instruction: &str,
        ) -> Result<Option<ImageData>, GatewayError> {
            self.seen.lock().unwrap().push(image.clone());
            self.edit.clone()
        }
    }

    pub(crate) fn analysis() -> Analysis {
        Analysis {
            title: "Morning Mist".to_string(),
            description: "Fog over the peaks".to_string(),
            tags: vec!["nature".to_string(), "fog".to_string()],
            category: "Nature".to_string(),
        }
    }

    fn jpeg_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        file.write_all(&[0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3]).unwrap();
        file
    }

    #[tokio::test]
    async fn test_upload_sends_encoded_image_to_gateway() {
        let gateway = Arc::new(FakeGateway::new(
            Ok(AnalysisResult::Valid(analysis())),
            Ok(None),
        ));
        let file = jpeg_file();

        let upload = prepare_upload(gateway.clone(), file.path().to_path_buf())
            .await
            .unwrap();

        assert_eq!(upload.image.mime_type(), "image/jpeg");
        assert_eq!(upload.analysis, Ok(AnalysisResult::Valid(analysis())));
        assert_eq!(gateway.seen.lock().unwrap().as_slice(), &[upload.image.clone()]);
    }

    #[tokio::test]
    async fn test_upload_keeps_image_when_analysis_fails() {
        let failure = GatewayError::Transport("connection reset".to_string());
        let gateway = Arc::new(FakeGateway::new(Err(failure.clone()), Ok(None)));
        let file = jpeg_file();

        let upload = prepare_upload(gateway, file.path().to_path_buf())
            .await
            .unwrap();

        assert_eq!(upload.analysis, Err(failure));
        assert_eq!(upload.image.bytes(), &[0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_unreadable_file_never_reaches_gateway() {
        let gateway = Arc::new(FakeGateway::new(
            Ok(AnalysisResult::Valid(analysis())),
            Ok(None),
        ));
        let dir = tempfile::tempdir().unwrap();

        let result = prepare_upload(gateway.clone(), dir.path().join("missing.jpg")).await;

        assert!(matches!(result, Err(EncodeError::Read { .. })));
        assert!(gateway.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_edit_completion_carries_request() {
        let replacement = crate::encode::encode(vec![7, 7], "image/png");
        let gateway = Arc::new(FakeGateway::new(
            Ok(AnalysisResult::Malformed),
            Ok(Some(replacement.clone())),
        ));
        let request = EditRequest {
            id: PhotoId::from("a"),
            image: crate::encode::encode(vec![1], "image/jpeg"),
            instruction: "add snow".to_string(),
        };

        let completion = run_edit(gateway, request).await;

        assert_eq!(completion.id, PhotoId::from("a"));
        assert_eq!(completion.instruction, "add snow");
        assert_eq!(completion.result, Ok(Some(replacement)));
    }
}
