use bytes::Bytes;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilePurpose {
    Assistants,
    AssistantsOutput,
    Batch,
    BatchOutput,
    FineTune,
    FineTuneResults,
    Vision,
    UserData,
}

/// Arrives as `multipart/form-data`; see `CreateTranscriptionRequest` for the
/// same parsing rationale.
#[derive(Debug, Clone)]
pub struct CreateFileRequest {
    pub file: Bytes,
    pub file_name: String,
    pub purpose: FilePurpose,
}

#[derive(Debug, Clone)]
pub struct GetFileRequest {
    pub file_id: String,
}

#[derive(Debug, Clone)]
pub struct GetFileContentRequest {
    pub file_id: String,
}

#[derive(Debug, Clone)]
pub struct DeleteFileRequest {
    pub file_id: String,
}

#[derive(Debug, Clone, Default)]
pub struct ListFilesRequest {
    pub purpose: Option<FilePurpose>,
    pub after: Option<String>,
    pub limit: Option<i64>,
}
