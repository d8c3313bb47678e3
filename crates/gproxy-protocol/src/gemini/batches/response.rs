use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Gemini's Batch API is Operation-shaped: `name` is `batches/{id}`, `done`
/// flips once the batch finishes, and `response`/`error` are populated
/// mutually exclusively at that point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOperation {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<JsonValue>,
    #[serde(default)]
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<JsonValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListBatchesResponse {
    #[serde(default)]
    pub operations: Vec<BatchOperation>,
    #[serde(rename = "nextPageToken", skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}
