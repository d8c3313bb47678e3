use serde::{Deserialize, Serialize};

use crate::gemini::count_tokens::types::Content;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedContentPath {
    /// Format: models/{model}. It takes the form models/{model}.
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedContentRequestBody {
    pub content: Content,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dimensionality: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct EmbedContentRequest {
    pub path: EmbedContentPath,
    pub body: EmbedContentRequestBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchEmbedContentsRequestBody {
    pub requests: Vec<EmbedContentRequestBody>,
}

#[derive(Debug, Clone)]
pub struct BatchEmbedContentsRequest {
    pub path: EmbedContentPath,
    pub body: BatchEmbedContentsRequestBody,
}
