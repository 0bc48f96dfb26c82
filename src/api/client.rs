use serde::Serialize;
use serde_json::Value;
use std::path::Path;

use super::gateway::RequestGateway;
use super::types::{
    ChatReply, MistakePage, Problem, TtsAudio, UploadedAudio, UploadedPhoto, UserStats,
};
use crate::error::ClientError;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatMessageBody<'a> {
    problem_id: &'a str,
    message: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatAudioBody<'a> {
    problem_id: &'a str,
    audio_url: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TtsBody<'a> {
    text: &'a str,
    problem_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OcrUpdateBody<'a> {
    ocr_text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddMistakeBody<'a> {
    problem_id: &'a str,
    subject: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MistakeQuery<'a> {
    subject: &'a str,
    page: u32,
    page_size: u32,
}

/// Typed endpoint methods over the [`RequestGateway`]
pub struct ApiClient {
    gateway: RequestGateway,
}

impl ApiClient {
    pub fn new(gateway: RequestGateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &RequestGateway {
        &self.gateway
    }

    /// Fetch a problem with its OCR text and analysis
    pub async fn fetch_problem(&self, problem_id: &str) -> Result<Problem, ClientError> {
        self.gateway
            .get::<Problem>(&format!("/api/homework/problems/{problem_id}"))
            .await?
            .require_data()
    }

    /// Recompute the analysis for an existing problem
    pub async fn regenerate_analysis(&self, problem_id: &str) -> Result<Problem, ClientError> {
        self.gateway
            .post::<Problem, _>(
                &format!("/api/homework/problems/{problem_id}/regenerate"),
                &Value::Null,
            )
            .await?
            .require_data()
    }

    /// Correct the OCR text of a problem
    pub async fn update_ocr_text(
        &self,
        problem_id: &str,
        ocr_text: &str,
    ) -> Result<(), ClientError> {
        self.gateway
            .put::<Value, _>(
                &format!("/api/homework/problems/{problem_id}/ocr"),
                &OcrUpdateBody { ocr_text },
            )
            .await?;
        Ok(())
    }

    /// Upload a homework photo, yielding the analyzed problem id
    pub async fn upload_photo(&self, file: &Path) -> Result<UploadedPhoto, ClientError> {
        self.gateway
            .upload::<UploadedPhoto>("/api/homework/upload", "image", file)
            .await?
            .require_data()
    }

    /// Upload a recorded audio clip, yielding its remote URL
    pub async fn upload_audio(&self, file: &Path) -> Result<UploadedAudio, ClientError> {
        self.gateway
            .upload::<UploadedAudio>("/api/upload/audio", "audio", file)
            .await?
            .require_data()
    }

    /// Send one text turn of the tutoring conversation
    pub async fn send_chat_message(
        &self,
        problem_id: &str,
        message: &str,
    ) -> Result<ChatReply, ClientError> {
        self.gateway
            .post::<ChatReply, _>(
                "/api/chat/message",
                &ChatMessageBody {
                    problem_id,
                    message,
                },
            )
            .await?
            .require_data()
    }

    /// Send one voice turn by its uploaded URL
    pub async fn send_chat_audio(
        &self,
        problem_id: &str,
        audio_url: &str,
    ) -> Result<ChatReply, ClientError> {
        self.gateway
            .post::<ChatReply, _>(
                "/api/chat/audio",
                &ChatAudioBody {
                    problem_id,
                    audio_url,
                },
            )
            .await?
            .require_data()
    }

    /// Synthesize speech for the given text
    pub async fn generate_tts(
        &self,
        problem_id: &str,
        text: &str,
    ) -> Result<TtsAudio, ClientError> {
        self.gateway
            .post::<TtsAudio, _>("/api/tts/generate", &TtsBody { text, problem_id })
            .await?
            .require_data()
    }

    /// List one page of the mistake book for a subject
    pub async fn list_mistakes(
        &self,
        subject: &str,
        page: u32,
        page_size: u32,
    ) -> Result<MistakePage, ClientError> {
        self.gateway
            .get_query::<MistakePage, _>(
                "/api/mistake-book/problems",
                &MistakeQuery {
                    subject,
                    page,
                    page_size,
                },
            )
            .await?
            .require_data()
    }

    /// Save a problem into the mistake book
    pub async fn add_mistake(&self, problem_id: &str, subject: &str) -> Result<(), ClientError> {
        self.gateway
            .post::<Value, _>(
                "/api/mistake-book/problems",
                &AddMistakeBody {
                    problem_id,
                    subject,
                },
            )
            .await?;
        Ok(())
    }

    /// Remove a saved problem from the mistake book
    pub async fn remove_mistake(&self, entry_id: &str) -> Result<(), ClientError> {
        self.gateway
            .delete::<Value>(&format!("/api/mistake-book/problems/{entry_id}"))
            .await?;
        Ok(())
    }

    /// Fetch the signed-in user's study statistics
    pub async fn user_stats(&self) -> Result<UserStats, ClientError> {
        self.gateway
            .get::<UserStats>("/api/user/stats")
            .await?
            .require_data()
    }
}
