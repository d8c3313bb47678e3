use bytes::Bytes;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateContainerRequestBody {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_after: Option<ContainerExpiresAfter>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerExpiresAfter {
    pub anchor: String,
    pub minutes: i64,
}

#[derive(Debug, Clone)]
pub struct CreateContainerRequest {
    pub body: CreateContainerRequestBody,
}

#[derive(Debug, Clone)]
pub struct GetContainerRequest {
    pub container_id: String,
}

#[derive(Debug, Clone)]
pub struct DeleteContainerRequest {
    pub container_id: String,
}

#[derive(Debug, Clone, Default)]
pub struct ListContainersRequest {
    pub after: Option<String>,
    pub limit: Option<i64>,
}

/// Arrives as `multipart/form-data`.
#[derive(Debug, Clone)]
pub struct CreateContainerFileRequest {
    pub container_id: String,
    pub file: Option<Bytes>,
    pub file_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GetContainerFileRequest {
    pub container_id: String,
    pub file_id: String,
}

#[derive(Debug, Clone)]
pub struct GetContainerFileContentRequest {
    pub container_id: String,
    pub file_id: String,
}

#[derive(Debug, Clone)]
pub struct DeleteContainerFileRequest {
    pub container_id: String,
    pub file_id: String,
}

#[derive(Debug, Clone)]
pub struct ListContainerFilesRequest {
    pub container_id: String,
    pub after: Option<String>,
    pub limit: Option<i64>,
}
