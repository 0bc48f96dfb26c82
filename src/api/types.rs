use serde::{Deserialize, Serialize};

/// A captured homework problem with its analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub id: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub ocr_text: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub knowledge_points: Vec<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub difficulty: String,
}

/// Result of a photo upload: the server-side problem record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedPhoto {
    pub problem_id: String,
}

/// Result of an audio upload: a remote reference to the clip
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedAudio {
    pub audio_url: String,
}

/// One assistant turn, optionally with synthesized speech
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub content: String,
    #[serde(default)]
    pub audio_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TtsAudio {
    pub audio_url: String,
}

/// A saved problem in the mistake book
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MistakeProblem {
    pub id: String,
    pub problem_id: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub added_at: String,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub last_reviewed_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MistakePage {
    #[serde(default)]
    pub problems: Vec<MistakeProblem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    #[serde(default)]
    pub total_problems: u64,
    #[serde(default)]
    pub total_mistakes: u64,
    #[serde(default)]
    pub study_time: u64,
    #[serde(default)]
    pub streak_days: u32,
}
