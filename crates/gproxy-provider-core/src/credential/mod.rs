mod model_unavailable_queue;
mod pool;
mod state;
mod unavailable_queue;

pub use pool::{AcquireError, CredentialPool};
pub use state::{CredentialId, CredentialState, UnavailableReason};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Credential {
    OpenAI(ApiKeyCredential),
    Claude(ApiKeyCredential),
    AIStudio(ApiKeyCredential),
    VertexExpress(ApiKeyCredential),
    Vertex(ServiceAccountCredential),
    Bedrock(BedrockCredential),
    Cohere(ApiKeyCredential),
    Mistral(ApiKeyCredential),
    AzureOpenAI(AzureOpenAICredential),
    Custom(ApiKeyCredential),
}

/// Bedrock accepts either a Bedrock API key or a classic AWS SigV4
/// access/secret pair. Either form can also be minted per-request from
/// `x-gproxy-bedrock-*` headers (`x-gproxy-bedrock-api-key`, or
/// `x-gproxy-bedrock-access-key` + `x-gproxy-bedrock-secret-key` +
/// optional `x-gproxy-bedrock-session-token`, plus `x-gproxy-bedrock-region`)
/// instead of coming from the stored credential pool — see
/// `gproxy_router::proxy::extract_direct_key`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BedrockCredential {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
    pub region: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureOpenAICredential {
    pub api_key: String,
    pub endpoint: String,
    #[serde(default)]
    pub deployments: std::collections::HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyCredential {
    pub api_key: String,
}

/// Google Service Account JSON fields used by Vertex.
/// Extra metadata fields are kept for round-trip compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceAccountCredential {
    pub project_id: String,
    pub client_email: String,
    pub private_key: String,
    pub private_key_id: String,
    pub client_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_provider_x509_cert_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_x509_cert_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub universe_domain: Option<String>,
    pub access_token: String,
    pub expires_at: i64,
}
