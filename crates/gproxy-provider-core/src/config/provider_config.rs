use serde::{Deserialize, Serialize};

use crate::Proto;

use super::{DispatchTable, ModelTable};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "channel_settings", rename_all = "lowercase")]
pub enum ProviderConfig {
    OpenAI(OpenAIConfig),
    Claude(ClaudeConfig),
    AIStudio(AIStudioConfig),
    VertexExpress(VertexExpressConfig),
    Vertex(VertexConfig),
    Bedrock(BedrockConfig),
    Cohere(CohereConfig),
    Mistral(MistralConfig),
    AzureOpenAI(AzureOpenAIConfig),
    Custom(CustomProviderConfig),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAIConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClaudeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AIStudioConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VertexExpressConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VertexConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oauth_token_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BedrockConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// S3 bucket gproxy's file/batch surface reads and writes through;
    /// `/bedrock/{bucket}/{key:*}` paths default to it when the caller
    /// omits `{bucket}`.
    pub default_bucket: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CohereConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MistralConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AzureOpenAIConfig {
    pub endpoint: String,
    pub api_version: String,
    /// deployment name -> backing model id; path `{deployment-id}` is
    /// resolved through this map before dispatch — the deployment always
    /// wins over a `model` field present in the request body.
    #[serde(default)]
    pub deployments: std::collections::HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomProviderConfig {
    pub id: String,
    pub enabled: bool,
    pub proto: Proto,
    pub base_url: String,
    pub dispatch: DispatchTable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_table: Option<ModelTable>,
    #[serde(default)]
    pub count_tokens: CountTokensMode,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub json_param_mask: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum CountTokensMode {
    #[default]
    Upstream,
    Tokenizers,
    Tiktoken,
}
