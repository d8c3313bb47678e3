use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::request::FilePurpose;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Uploaded,
    Processed,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileObject {
    pub id: String,
    pub object: String,
    pub bytes: i64,
    pub created_at: i64,
    pub filename: String,
    pub purpose: FilePurpose,
    #[serde(default)]
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

impl Default for FileStatus {
    fn default() -> Self {
        FileStatus::Processed
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteFileResponse {
    pub id: String,
    pub object: String,
    pub deleted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListFilesResponse {
    pub object: String,
    pub data: Vec<FileObject>,
    pub first_id: Option<String>,
    pub last_id: Option<String>,
    pub has_more: bool,
}

/// `GET /files/{id}/content` returns the raw bytes with the file's own
/// content-type: object responses are JSON-encoded, raw-byte responses are
/// written verbatim.
#[derive(Debug, Clone)]
pub struct FileContent {
    pub bytes: Bytes,
    pub content_type: String,
}
