use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictPath {
    /// Format: models/{model}. It takes the form models/{model}.
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictInstance {
    pub prompt: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    #[serde(flatten)]
    pub extra: std::collections::HashMap<String, JsonValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictRequestBody {
    pub instances: Vec<PredictInstance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<PredictParameters>,
}

#[derive(Debug, Clone)]
pub struct PredictRequest {
    pub path: PredictPath,
    pub body: PredictRequestBody,
}
