use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::claude::types::AnthropicHeaders;

pub type MessageBatchHeaders = AnthropicHeaders;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequestItem {
    pub custom_id: String,
    pub params: JsonValue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMessageBatchRequestBody {
    pub requests: Vec<BatchRequestItem>,
}

#[derive(Debug, Clone)]
pub struct CreateMessageBatchRequest {
    pub body: CreateMessageBatchRequestBody,
    pub headers: MessageBatchHeaders,
}

#[derive(Debug, Clone)]
pub struct GetMessageBatchRequest {
    pub batch_id: String,
    pub headers: MessageBatchHeaders,
}

#[derive(Debug, Clone)]
pub struct CancelMessageBatchRequest {
    pub batch_id: String,
    pub headers: MessageBatchHeaders,
}

#[derive(Debug, Clone, Default)]
pub struct ListMessageBatchesRequest {
    pub before_id: Option<String>,
    pub after_id: Option<String>,
    pub limit: Option<i64>,
    pub headers: MessageBatchHeaders,
}
