use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeechResponseFormat {
    Mp3,
    Opus,
    Aac,
    Flac,
    Wav,
    Pcm,
}

impl SpeechResponseFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            SpeechResponseFormat::Mp3 => "audio/mpeg",
            SpeechResponseFormat::Opus => "audio/opus",
            SpeechResponseFormat::Aac => "audio/aac",
            SpeechResponseFormat::Flac => "audio/flac",
            SpeechResponseFormat::Wav => "audio/wav",
            SpeechResponseFormat::Pcm => "audio/L16",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateSpeechRequestBody {
    pub model: String,
    pub input: String,
    pub voice: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<SpeechResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Range 0.25..=4.0 (not enforced here).
    pub speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_format: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateSpeechRequest {
    pub body: CreateSpeechRequestBody,
}
