use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CohereInputType {
    SearchDocument,
    SearchQuery,
    Classification,
    Clustering,
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CohereEmbeddingType {
    Float,
    Int8,
    Uint8,
    Binary,
    Ubinary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EmbedRequestBody {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texts: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    pub input_type: CohereInputType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding_types: Option<Vec<CohereEmbeddingType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncate: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EmbedRequest {
    pub body: EmbedRequestBody,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingsByType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub float: Option<Vec<Vec<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub int8: Option<Vec<Vec<i64>>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedBilledUnits {
    #[serde(default)]
    pub input_tokens: i64,
    #[serde(default)]
    pub images: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbedMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billed_units: Option<EmbedBilledUnits>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedResponse {
    pub id: String,
    pub embeddings: EmbeddingsByType,
    pub texts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<EmbedMeta>,
}
