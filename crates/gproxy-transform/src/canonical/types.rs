//! The provider-agnostic request/response/stream/error types.
//!
//! `Chat`/`Responses`/`ListModels`/`CountTokens` wrap the existing pairwise
//! dialect matrix (`crate::middleware::{Request,Response}`) rather than
//! re-deriving a flat struct, since that matrix already carries the
//! behaviour those kinds need. `Embedding`/`Speech`/`Transcription`/
//! `ImageGeneration`/`TextCompletion` have no precedent in that matrix and
//! get real conversions in `crate::canonical::embedding` et al.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::middleware::{
    CountTokensRequest, CountTokensResponse, GenerateContentRequest, GenerateContentResponse,
    ModelListRequest, ModelListResponse,
};

/// The closed provider enumeration: the logical provider tag a canonical
/// request or `provider/model` prefix resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    OpenAI,
    Anthropic,
    Gemini,
    Bedrock,
    Cohere,
    Mistral,
    AzureOpenAI,
    Vertex,
}

impl Provider {
    /// Splits a `provider/model` string into `(Some(provider), model)`, or
    /// `(None, model)` when there is no recognised prefix.
    pub fn split_model(model: &str) -> (Option<Provider>, &str) {
        if let Some((prefix, rest)) = model.split_once('/') {
            if let Some(p) = Provider::from_prefix(prefix) {
                return (Some(p), rest);
            }
        }
        (None, model)
    }

    pub fn from_prefix(prefix: &str) -> Option<Provider> {
        match prefix {
            "openai" => Some(Provider::OpenAI),
            "anthropic" | "claude" => Some(Provider::Anthropic),
            "gemini" | "genai" => Some(Provider::Gemini),
            "bedrock" => Some(Provider::Bedrock),
            "cohere" => Some(Provider::Cohere),
            "mistral" => Some(Provider::Mistral),
            "azure" | "azure-openai" => Some(Provider::AzureOpenAI),
            "vertex" => Some(Provider::Vertex),
            _ => None,
        }
    }

    pub fn as_prefix(self) -> &'static str {
        match self {
            Provider::OpenAI => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Gemini => "gemini",
            Provider::Bedrock => "bedrock",
            Provider::Cohere => "cohere",
            Provider::Mistral => "mistral",
            Provider::AzureOpenAI => "azure",
            Provider::Vertex => "vertex",
        }
    }
}

/// Ordered fallback chain: `(provider, model)` pairs tried on upstream
/// failure. The core only forwards this list; the retry chain itself lives
/// in the `Client`/`UpstreamProvider` layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fallback {
    pub provider: Provider,
    pub model: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtraParams(pub HashMap<String, JsonValue>);

impl ExtraParams {
    pub fn insert(&mut self, key: impl Into<String>, value: JsonValue) {
        self.0.insert(key.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextCompletionRequest {
    pub provider: Provider,
    pub model: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    pub extra_params: ExtraParams,
}

#[derive(Debug, Clone)]
pub struct EmbeddingRequest {
    pub provider: Provider,
    pub model: String,
    pub texts: Vec<String>,
    pub encoding_format: Option<String>,
    pub dimensions: Option<i64>,
    pub extra_params: ExtraParams,
}

#[derive(Debug, Clone)]
pub struct SpeechRequest {
    pub provider: Provider,
    pub model: String,
    pub input: String,
    pub voice: String,
    pub response_format: Option<String>,
    pub extra_params: ExtraParams,
}

#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    pub provider: Provider,
    pub model: String,
    pub audio: bytes::Bytes,
    pub language: Option<String>,
    pub prompt: Option<String>,
    pub extra_params: ExtraParams,
}

#[derive(Debug, Clone)]
pub struct ImageGenerationRequest {
    pub provider: Provider,
    pub model: Option<String>,
    pub prompt: String,
    pub n: Option<i64>,
    pub size: Option<String>,
    pub response_format: Option<String>,
    pub extra_params: ExtraParams,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ListModelsFanoutMode {
    pub all_providers: bool,
}

/// The dialect-agnostic request hub. At most one variant is populated per
/// request; the enum discriminant enforces that at the type level instead
/// of relying on a set of mutually-exclusive optional fields.
#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone)]
pub enum CanonicalRequest {
    TextCompletion(TextCompletionRequest),
    Chat(GenerateContentRequest),
    Responses(GenerateContentRequest),
    Embedding(EmbeddingRequest),
    Speech(SpeechRequest),
    Transcription(TranscriptionRequest),
    ImageGeneration(ImageGenerationRequest),
    ListModels(ModelListRequest),
    CountTokens(CountTokensRequest),
}

/// Attaches the fallback chain alongside the canonical request it was
/// parsed from.
#[derive(Debug, Clone)]
pub struct CanonicalRequestEnvelope {
    pub request: CanonicalRequest,
    pub fallbacks: Vec<Fallback>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    TextCompletion,
    Chat,
    Responses,
    Embedding,
    Speech,
    Transcription,
    ImageGeneration,
    ListModels,
    CountTokens,
    Batch,
    File,
    Container,
}

/// The sidecar every canonical response carries.
#[derive(Debug, Clone, Default)]
pub struct ExtraFields {
    pub provider: Option<Provider>,
    pub model_requested: Option<String>,
    pub model_deployment: Option<String>,
    pub request_type: Option<RequestType>,
    /// Populated only when the caller asked for the raw upstream body to be
    /// passed through untouched alongside the canonical response.
    pub raw_response: Option<JsonValue>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: i64,
    pub output_tokens: i64,
    pub total_tokens: i64,
}

#[derive(Debug, Clone)]
pub struct EmbeddingResponse {
    pub model: String,
    pub embeddings: Vec<Vec<f64>>,
    pub usage: Usage,
    pub extra_fields: ExtraFields,
}

#[derive(Debug, Clone)]
pub struct SpeechResponse {
    pub audio: bytes::Bytes,
    pub content_type: String,
    pub extra_fields: ExtraFields,
}

#[derive(Debug, Clone)]
pub struct TranscriptionResponse {
    pub text: String,
    pub extra_fields: ExtraFields,
}

#[derive(Debug, Clone)]
pub struct ImageGenerationResponse {
    pub images: Vec<ImageDatum>,
    pub extra_fields: ExtraFields,
}

#[derive(Debug, Clone)]
pub struct ImageDatum {
    pub url: Option<String>,
    pub b64_json: Option<String>,
    pub revised_prompt: Option<String>,
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone)]
pub enum CanonicalResponse {
    TextCompletion(String, ExtraFields),
    Chat(GenerateContentResponse, ExtraFields),
    Responses(GenerateContentResponse, ExtraFields),
    Embedding(EmbeddingResponse),
    Speech(SpeechResponse),
    Transcription(TranscriptionResponse),
    ImageGeneration(ImageGenerationResponse),
    ListModels(ModelListResponse, ExtraFields),
    CountTokens(CountTokensResponse, ExtraFields),
}

#[derive(Debug, Clone)]
pub enum CanonicalStreamEvent {
    TextChunk(String),
    ChatChunk(crate::middleware::StreamEvent),
    ResponsesChunk(crate::middleware::StreamEvent),
    SpeechChunk(bytes::Bytes),
    TranscriptionChunk(String),
    ImageChunk(ImageDatum),
    Error(CanonicalError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalErrorKind {
    BadRequest,
    ConversionFailure,
    UpstreamRejected,
    UpstreamTimeout,
    UpstreamTransport,
    ClientDisconnect,
    InternalBug,
}

#[derive(Debug, Clone)]
pub struct CanonicalError {
    pub kind: CanonicalErrorKind,
    pub message: String,
    /// HTTP status to preserve when the kind is `UpstreamRejected` and the
    /// provider supplied one.
    pub status: Option<u16>,
}

impl CanonicalError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        CanonicalError {
            kind: CanonicalErrorKind::BadRequest,
            message: message.into(),
            status: Some(400),
        }
    }

    pub fn conversion_failure(message: impl Into<String>) -> Self {
        CanonicalError {
            kind: CanonicalErrorKind::ConversionFailure,
            message: message.into(),
            status: Some(422),
        }
    }

    pub fn internal_bug(message: impl Into<String>) -> Self {
        CanonicalError {
            kind: CanonicalErrorKind::InternalBug,
            message: message.into(),
            status: Some(500),
        }
    }

    pub fn default_status(&self) -> u16 {
        self.status.unwrap_or(match self.kind {
            CanonicalErrorKind::BadRequest | CanonicalErrorKind::ConversionFailure => 400,
            CanonicalErrorKind::UpstreamTimeout => 504,
            CanonicalErrorKind::UpstreamTransport => 502,
            CanonicalErrorKind::UpstreamRejected => 500,
            CanonicalErrorKind::ClientDisconnect | CanonicalErrorKind::InternalBug => 500,
        })
    }
}
