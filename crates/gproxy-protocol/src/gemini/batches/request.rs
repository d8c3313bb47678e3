use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlinedRequest {
    pub request: JsonValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlinedRequests {
    pub requests: Vec<InlinedRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchInputConfig {
    pub requests: InlinedRequests,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub input_config: BatchInputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBatchRequestBody {
    pub batch: BatchSpec,
}

#[derive(Debug, Clone)]
pub struct CreateBatchPath {
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct CreateBatchRequest {
    pub path: CreateBatchPath,
    pub body: CreateBatchRequestBody,
}

#[derive(Debug, Clone)]
pub struct GetBatchRequest {
    /// canonical `batches-XYZ`; decoded back to `batches/XYZ` before being
    /// sent upstream.
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct CancelBatchRequest {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct DeleteBatchRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct ListBatchesRequest {
    pub page_size: Option<i64>,
    pub page_token: Option<String>,
}
