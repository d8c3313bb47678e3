use bytes::Bytes;

use crate::claude::types::AnthropicHeaders;

pub type FileHeaders = AnthropicHeaders;

/// Arrives as `multipart/form-data`; see `CreateTranscriptionRequest` (the
/// OpenAI transcription DTO) for the same parsing rationale.
#[derive(Debug, Clone)]
pub struct CreateFileRequest {
    pub file: Bytes,
    pub file_name: String,
    pub media_type: Option<String>,
    pub headers: FileHeaders,
}

#[derive(Debug, Clone)]
pub struct GetFileRequest {
    pub file_id: String,
    pub headers: FileHeaders,
}

#[derive(Debug, Clone)]
pub struct GetFileContentRequest {
    pub file_id: String,
    pub headers: FileHeaders,
}

#[derive(Debug, Clone)]
pub struct DeleteFileRequest {
    pub file_id: String,
    pub headers: FileHeaders,
}

#[derive(Debug, Clone, Default)]
pub struct ListFilesRequest {
    pub before_id: Option<String>,
    pub after_id: Option<String>,
    pub limit: Option<i64>,
    pub headers: FileHeaders,
}
