use bytes::Bytes;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptionResponseFormat {
    Json,
    Text,
    Srt,
    VerboseJson,
    Vtt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampGranularity {
    Word,
    Segment,
}

/// Arrives as `multipart/form-data`; `ParseBody` (not JSON-decode) reads this
/// directly off the multipart fields instead of through `MakeRequest` +
/// serde.
#[derive(Debug, Clone)]
pub struct CreateTranscriptionRequest {
    pub file: Bytes,
    pub file_name: String,
    pub model: String,
    pub language: Option<String>,
    pub prompt: Option<String>,
    pub response_format: Option<TranscriptionResponseFormat>,
    pub temperature: Option<f64>,
    pub timestamp_granularities: Option<Vec<TimestampGranularity>>,
}
