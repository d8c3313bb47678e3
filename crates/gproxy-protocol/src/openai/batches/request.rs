use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateBatchRequestBody {
    pub input_file_id: String,
    pub endpoint: String,
    pub completion_window: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone)]
pub struct CreateBatchRequest {
    pub body: CreateBatchRequestBody,
}

#[derive(Debug, Clone)]
pub struct GetBatchRequest {
    pub batch_id: String,
}

#[derive(Debug, Clone)]
pub struct CancelBatchRequest {
    pub batch_id: String,
}

#[derive(Debug, Clone, Default)]
pub struct ListBatchesRequest {
    pub after: Option<String>,
    pub limit: Option<i64>,
}
