use async_trait::async_trait;
use bytes::Bytes;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use gproxy_protocol::{bedrock, claude, cohere, gemini, openai};

use crate::headers::{Headers, header_get};
use crate::{
    Credential, DispatchTable, Op, Proto, ProviderConfig, ProviderError, ProviderResult, Request,
    UnavailableReason,
};

pub type ByteStream = tokio::sync::mpsc::Receiver<Bytes>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    pub fn parse(method: &str) -> Option<Self> {
        if method.eq_ignore_ascii_case("GET") {
            Some(HttpMethod::Get)
        } else if method.eq_ignore_ascii_case("POST") {
            Some(HttpMethod::Post)
        } else if method.eq_ignore_ascii_case("PUT") {
            Some(HttpMethod::Put)
        } else if method.eq_ignore_ascii_case("PATCH") {
            Some(HttpMethod::Patch)
        } else if method.eq_ignore_ascii_case("DELETE") {
            Some(HttpMethod::Delete)
        } else {
            None
        }
    }
}

#[derive(Debug)]
pub enum UpstreamBody {
    Bytes(Bytes),
    Stream(ByteStream),
}

#[derive(Debug)]
pub struct UpstreamHttpResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: UpstreamBody,
}

#[derive(Debug, Clone)]
pub struct UpstreamHttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Headers,
    pub body: Option<Bytes>,
    pub is_stream: bool,
}

/// Downstream request for provider-managed OAuth start.
///
/// This is *not* part of protocol transform; it is a provider internal ability.
#[derive(Debug, Clone)]
pub struct OAuthStartRequest {
    pub query: Option<String>,
    pub headers: Headers,
}

/// Downstream request for provider-managed OAuth callback.
///
/// This is *not* part of protocol transform; it is a provider internal ability.
#[derive(Debug, Clone)]
pub struct OAuthCallbackRequest {
    pub query: Option<String>,
    pub headers: Headers,
}

/// Raw downstream request for the OpenAI Responses-API surface
/// (`/v1/responses/*`, `/v1/responses/{id}/input_items`, memory traces).
///
/// These endpoints are forwarded byte-for-byte rather than decoded into a
/// typed `Request` — the wire shape downstream and upstream is identical, so
/// there is nothing to transform.
#[derive(Debug, Clone)]
pub struct OpenAIResponsesPassthroughRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Option<String>,
    pub headers: Headers,
    pub body: Option<Bytes>,
    pub is_stream: bool,
}

/// The OpenAI "resource" surface (embeddings, speech, transcriptions, images,
/// batches, files, containers): typed request DTOs decoded from the inbound
/// body, one variant per upstream build hook on `UpstreamProvider`.
///
/// Unlike the chat/responses families, these ops have no cross-dialect
/// transform today: whatever dialect accepts the request speaks it natively,
/// so the response is forwarded to the caller unmodified.
#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone)]
pub enum OpenAIResourceRequest {
    Embeddings(openai::embeddings::CreateEmbeddingRequest),
    Speech(openai::speech::CreateSpeechRequest),
    Transcription(openai::transcriptions::CreateTranscriptionRequest),
    ImageGeneration(openai::images::CreateImageRequest),
    ImageEdit(openai::images::CreateImageEditRequest),
    BatchCreate(openai::batches::request::CreateBatchRequest),
    BatchGet(openai::batches::request::GetBatchRequest),
    BatchCancel(openai::batches::request::CancelBatchRequest),
    BatchList(openai::batches::request::ListBatchesRequest),
    FileCreate(openai::files::CreateFileRequest),
    FileGet(openai::files::request::GetFileRequest),
    FileGetContent(openai::files::request::GetFileContentRequest),
    FileDelete(openai::files::request::DeleteFileRequest),
    FileList(openai::files::request::ListFilesRequest),
    ContainerCreate(openai::containers::request::CreateContainerRequest),
    ContainerGet(openai::containers::request::GetContainerRequest),
    ContainerDelete(openai::containers::request::DeleteContainerRequest),
    ContainerList(openai::containers::request::ListContainersRequest),
    ContainerFileCreate(openai::containers::request::CreateContainerFileRequest),
    ContainerFileGet(openai::containers::request::GetContainerFileRequest),
    ContainerFileGetContent(openai::containers::request::GetContainerFileContentRequest),
    ContainerFileDelete(openai::containers::request::DeleteContainerFileRequest),
    ContainerFileList(openai::containers::request::ListContainerFilesRequest),
}

impl OpenAIResourceRequest {
    /// Stable label for event/logging purposes (mirrors the `Unsupported` tags
    /// on the matching `build_openai_*` hooks).
    pub fn label(&self) -> &'static str {
        match self {
            OpenAIResourceRequest::Embeddings(_) => "Embeddings",
            OpenAIResourceRequest::Speech(_) => "Speech",
            OpenAIResourceRequest::Transcription(_) => "Transcription",
            OpenAIResourceRequest::ImageGeneration(_) => "ImageGeneration",
            OpenAIResourceRequest::ImageEdit(_) => "ImageEdit",
            OpenAIResourceRequest::BatchCreate(_) => "BatchCreate",
            OpenAIResourceRequest::BatchGet(_) => "BatchGet",
            OpenAIResourceRequest::BatchCancel(_) => "BatchCancel",
            OpenAIResourceRequest::BatchList(_) => "BatchList",
            OpenAIResourceRequest::FileCreate(_) => "FileCreate",
            OpenAIResourceRequest::FileGet(_) => "FileGet",
            OpenAIResourceRequest::FileGetContent(_) => "FileGetContent",
            OpenAIResourceRequest::FileDelete(_) => "FileDelete",
            OpenAIResourceRequest::FileList(_) => "FileList",
            OpenAIResourceRequest::ContainerCreate(_) => "ContainerCreate",
            OpenAIResourceRequest::ContainerGet(_) => "ContainerGet",
            OpenAIResourceRequest::ContainerDelete(_) => "ContainerDelete",
            OpenAIResourceRequest::ContainerList(_) => "ContainerList",
            OpenAIResourceRequest::ContainerFileCreate(_) => "ContainerFileCreate",
            OpenAIResourceRequest::ContainerFileGet(_) => "ContainerFileGet",
            OpenAIResourceRequest::ContainerFileGetContent(_) => "ContainerFileGetContent",
            OpenAIResourceRequest::ContainerFileDelete(_) => "ContainerFileDelete",
            OpenAIResourceRequest::ContainerFileList(_) => "ContainerFileList",
        }
    }
}

/// Cohere's native surface (chat, embed, rerank, tokenize): typed request
/// DTOs decoded from the inbound body, one variant per `build_cohere_*` hook.
///
/// Cohere has no cross-dialect transform of its own, so like
/// [`OpenAIResourceRequest`] the response is forwarded unmodified; chat's
/// `stream` flag is carried through to the upstream body and the SSE
/// response is passed through as-is.
#[derive(Debug, Clone)]
pub enum CohereRequest {
    Chat(CohereChatRequest),
    Embed(CohereEmbedRequest),
    Rerank(CohereRerankRequest),
    Tokenize(CohereTokenizeRequest),
}

impl CohereRequest {
    pub fn label(&self) -> &'static str {
        match self {
            CohereRequest::Chat(_) => "Chat",
            CohereRequest::Embed(_) => "Embed",
            CohereRequest::Rerank(_) => "Rerank",
            CohereRequest::Tokenize(_) => "Tokenize",
        }
    }
}

/// AWS Bedrock's native surface: Converse/ConverseStream, the raw InvokeModel
/// passthrough, the S3-compatible object store, and model-invocation batch
/// jobs. One variant per `build_bedrock_*` hook.
///
/// `build_bedrock_*` builds requests against the real Bedrock/S3 endpoints,
/// so the upstream response is already in the exact wire shape these types
/// model; like [`OpenAIResourceRequest`] and [`CohereRequest`], the response
/// is forwarded unmodified.
#[derive(Debug, Clone)]
pub enum BedrockRequest {
    Converse(BedrockConverseRequest),
    ConverseStream(BedrockConverseStreamRequest),
    InvokeModel(BedrockInvokeModelRequest),
    InvokeModelWithResponseStream(BedrockInvokeModelWithResponseStreamRequest),
    PutObject(BedrockPutObjectRequest),
    GetObject(BedrockGetObjectRequest),
    HeadObject(BedrockHeadObjectRequest),
    DeleteObject(BedrockDeleteObjectRequest),
    ListObjects(BedrockListObjectsRequest),
    CreateModelInvocationJob(BedrockCreateModelInvocationJobRequest),
    GetModelInvocationJob(BedrockGetModelInvocationJobRequest),
    StopModelInvocationJob(BedrockStopModelInvocationJobRequest),
    ListModelInvocationJobs(BedrockListModelInvocationJobsRequest),
}

impl BedrockRequest {
    pub fn label(&self) -> &'static str {
        match self {
            BedrockRequest::Converse(_) => "Converse",
            BedrockRequest::ConverseStream(_) => "ConverseStream",
            BedrockRequest::InvokeModel(_) => "InvokeModel",
            BedrockRequest::InvokeModelWithResponseStream(_) => "InvokeModelWithResponseStream",
            BedrockRequest::PutObject(_) => "PutObject",
            BedrockRequest::GetObject(_) => "GetObject",
            BedrockRequest::HeadObject(_) => "HeadObject",
            BedrockRequest::DeleteObject(_) => "DeleteObject",
            BedrockRequest::ListObjects(_) => "ListObjects",
            BedrockRequest::CreateModelInvocationJob(_) => "CreateModelInvocationJob",
            BedrockRequest::GetModelInvocationJob(_) => "GetModelInvocationJob",
            BedrockRequest::StopModelInvocationJob(_) => "StopModelInvocationJob",
            BedrockRequest::ListModelInvocationJobs(_) => "ListModelInvocationJobs",
        }
    }
}

/// Claude's native Message Batches and Files surface: typed request DTOs
/// decoded from the inbound body, one variant per `build_claude_batch_*`/
/// `build_claude_file_*` hook.
///
/// Neither surface has an OpenAI-resource-shape precedent to convert through,
/// so like [`CohereRequest`] and [`BedrockRequest`] the response is forwarded
/// unmodified.
#[derive(Debug, Clone)]
pub enum ClaudeResourceRequest {
    BatchCreate(ClaudeCreateBatchRequest),
    BatchGet(ClaudeGetBatchRequest),
    BatchCancel(ClaudeCancelBatchRequest),
    BatchList(ClaudeListBatchesRequest),
    FileCreate(ClaudeCreateFileRequest),
    FileGet(ClaudeGetFileRequest),
    FileGetContent(ClaudeGetFileContentRequest),
    FileDelete(ClaudeDeleteFileRequest),
    FileList(ClaudeListFilesRequest),
}

impl ClaudeResourceRequest {
    pub fn label(&self) -> &'static str {
        match self {
            ClaudeResourceRequest::BatchCreate(_) => "BatchCreate",
            ClaudeResourceRequest::BatchGet(_) => "BatchGet",
            ClaudeResourceRequest::BatchCancel(_) => "BatchCancel",
            ClaudeResourceRequest::BatchList(_) => "BatchList",
            ClaudeResourceRequest::FileCreate(_) => "FileCreate",
            ClaudeResourceRequest::FileGet(_) => "FileGet",
            ClaudeResourceRequest::FileGetContent(_) => "FileGetContent",
            ClaudeResourceRequest::FileDelete(_) => "FileDelete",
            ClaudeResourceRequest::FileList(_) => "FileList",
        }
    }
}

/// Gemini's native Batch and Files surface: typed request DTOs decoded from
/// the inbound body, one variant per `build_gemini_batch_*`/
/// `build_gemini_file_*` hook.
///
/// Like [`ClaudeResourceRequest`], neither surface converts through a
/// cross-dialect transform, so the upstream response is forwarded unmodified.
#[derive(Debug, Clone)]
pub enum GeminiResourceRequest {
    BatchCreate(GeminiCreateBatchRequest),
    BatchGet(GeminiGetBatchRequest),
    BatchCancel(GeminiCancelBatchRequest),
    BatchDelete(GeminiDeleteBatchRequest),
    BatchList(GeminiListBatchesRequest),
    FileCreate(GeminiCreateFileRequest),
    FileGet(GeminiGetFileRequest),
    FileDelete(GeminiDeleteFileRequest),
    FileList(GeminiListFilesRequest),
}

impl GeminiResourceRequest {
    pub fn label(&self) -> &'static str {
        match self {
            GeminiResourceRequest::BatchCreate(_) => "BatchCreate",
            GeminiResourceRequest::BatchGet(_) => "BatchGet",
            GeminiResourceRequest::BatchCancel(_) => "BatchCancel",
            GeminiResourceRequest::BatchDelete(_) => "BatchDelete",
            GeminiResourceRequest::BatchList(_) => "BatchList",
            GeminiResourceRequest::FileCreate(_) => "FileCreate",
            GeminiResourceRequest::FileGet(_) => "FileGet",
            GeminiResourceRequest::FileDelete(_) => "FileDelete",
            GeminiResourceRequest::FileList(_) => "FileList",
        }
    }
}

#[derive(Debug, Clone)]
pub struct OAuthCredential {
    pub name: Option<String>,
    pub settings_json: Option<serde_json::Value>,
    pub credential: Credential,
}

#[derive(Debug)]
pub struct OAuthCallbackResult {
    pub response: UpstreamHttpResponse,
    pub credential: Option<OAuthCredential>,
}

#[derive(Debug, Clone)]
pub struct UpstreamCtx {
    pub trace_id: Option<String>,
    pub user_id: Option<i64>,
    pub user_key_id: Option<i64>,
    pub user_agent: Option<String>,
    pub outbound_proxy: Option<String>,
    pub provider: String,
    pub credential_id: Option<i64>,
    pub op: Op,
    pub internal: bool,
    pub attempt_no: u32,
    /// Caller asked for the downstream request body to be forwarded upstream
    /// verbatim rather than decoded into a typed DTO (raw passthrough mode).
    pub use_raw_request_body: bool,
    /// Caller asked for the upstream response body to be forwarded back
    /// verbatim rather than normalized into the ingress dialect's shape.
    pub send_back_raw_response: bool,
    /// Unknown/provider-specific request fields should be forwarded upstream
    /// unchanged rather than dropped during dialect conversion.
    pub passthrough_extra_params: bool,
    /// A `direct_key` is already present; skip the credential pool's
    /// acquire/rotate/unavailable-tracking machinery entirely.
    pub skip_key_selection: bool,
    /// A credential minted per-request from caller-supplied headers
    /// (`DownstreamContext::direct_key`), bypassing the stored credential
    /// pool. `Some` implies `skip_key_selection`.
    pub direct_key: Option<Credential>,
}

/// Request-scoped facts gathered from the downstream HTTP request before
/// dispatch, independent of which provider ends up servicing it. Route
/// handlers populate this once per request; its `direct_key` (if any) is
/// copied into `UpstreamCtx::direct_key` when a provider call is built.
#[derive(Debug, Clone, Default)]
pub struct DownstreamContext {
    pub trace_id: Option<String>,
    pub user_id: Option<i64>,
    pub user_key_id: Option<i64>,
    pub user_agent: Option<String>,
    /// A credential minted from `x-gproxy-*` direct-key headers on this
    /// request, if the caller supplied one, bypassing the stored pool.
    pub direct_key: Option<Credential>,
    pub use_raw_request_body: bool,
    pub send_back_raw_response: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum UpstreamTransportErrorKind {
    Timeout,
    ReadTimeout,
    Connect,
    Dns,
    Tls,
    Other,
}

#[derive(Debug, Clone)]
pub enum UpstreamFailure {
    /// Transport-level failures (no HTTP response).
    Transport {
        kind: UpstreamTransportErrorKind,
        message: String,
    },
    /// HTTP error response captured as bytes (usually non-2xx).
    Http {
        status: u16,
        headers: Headers,
        body: Bytes,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnavailableDecision {
    pub duration: Duration,
    pub reason: UnavailableReason,
}

#[derive(Debug)]
pub enum AuthRetryAction {
    None,
    RetrySame,
    UpdateCredential(Box<Credential>),
}

const RATE_LIMIT_FALLBACK_SECS: u64 = 30;
const SHORT_COOLDOWN_SECS: u64 = 10;
const AUTH_INVALID_YEARS: u64 = 9_999;

pub fn default_decide_unavailable(failure: &UpstreamFailure) -> Option<UnavailableDecision> {
    match failure {
        UpstreamFailure::Http {
            status, headers, ..
        } => {
            if *status == 404 {
                return None;
            }
            if *status == 429 {
                let duration = parse_retry_after(headers)
                    .unwrap_or_else(|| Duration::from_secs(RATE_LIMIT_FALLBACK_SECS));
                return Some(UnavailableDecision {
                    duration,
                    reason: UnavailableReason::RateLimit,
                });
            }
            if *status == 401 || *status == 403 {
                return Some(UnavailableDecision {
                    duration: auth_invalid_duration(),
                    reason: UnavailableReason::AuthInvalid,
                });
            }
            if (500..600).contains(status) {
                return Some(UnavailableDecision {
                    duration: Duration::from_secs(SHORT_COOLDOWN_SECS),
                    reason: UnavailableReason::Upstream5xx,
                });
            }
            None
        }
        UpstreamFailure::Transport { kind, .. } => match kind {
            UpstreamTransportErrorKind::Timeout
            | UpstreamTransportErrorKind::ReadTimeout
            | UpstreamTransportErrorKind::Connect
            | UpstreamTransportErrorKind::Dns
            | UpstreamTransportErrorKind::Tls => Some(UnavailableDecision {
                duration: Duration::from_secs(SHORT_COOLDOWN_SECS),
                reason: UnavailableReason::Timeout,
            }),
            _ => None,
        },
    }
}

fn parse_retry_after(headers: &Headers) -> Option<Duration> {
    let value = header_get(headers, "retry-after")?;
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let secs = value.parse::<u64>().ok()?;
    Some(Duration::from_secs(secs))
}

fn auth_invalid_duration() -> Duration {
    Duration::from_secs(AUTH_INVALID_YEARS * 365 * 24 * 60 * 60)
}

type ClaudeMessagesRequest = claude::create_message::request::CreateMessageRequest;
type ClaudeCountTokensRequest = claude::count_tokens::request::CountTokensRequest;
type ClaudeModelsListRequest = claude::list_models::request::ListModelsRequest;
type ClaudeModelsGetRequest = claude::get_model::request::GetModelRequest;

type GeminiGenerateContentRequest = gemini::generate_content::request::GenerateContentRequest;
type GeminiStreamGenerateContentRequest =
    gemini::stream_content::request::StreamGenerateContentRequest;
type GeminiCountTokensRequest = gemini::count_tokens::request::CountTokensRequest;
type GeminiModelsListRequest = gemini::list_models::request::ListModelsRequest;
type GeminiModelsGetRequest = gemini::get_model::request::GetModelRequest;

type OpenAIChatCompletionRequest =
    openai::create_chat_completions::request::CreateChatCompletionRequest;
type OpenAIResponseRequest = openai::create_response::request::CreateResponseRequest;
type OpenAIResponseGetRequest = openai::get_response::request::GetResponseRequest;
type OpenAIResponseDeleteRequest = openai::delete_response::request::DeleteResponseRequest;
type OpenAIResponseCancelRequest = openai::cancel_response::request::CancelResponseRequest;
type OpenAIResponseListInputItemsRequest = openai::list_input_items::request::ListInputItemsRequest;
type OpenAIResponseCompactRequest = openai::compact_response::request::CompactResponseRequest;
type OpenAIMemoryTraceSummarizeRequest = openai::trace_summarize::request::TraceSummarizeRequest;
type OpenAIInputTokensRequest = openai::count_tokens::request::InputTokenCountRequest;
type OpenAIModelsListRequest = openai::list_models::request::ListModelsRequest;
type OpenAIModelsGetRequest = openai::get_model::request::GetModelRequest;

type OpenAIEmbeddingRequest = openai::embeddings::CreateEmbeddingRequest;
type OpenAISpeechRequest = openai::speech::CreateSpeechRequest;
type OpenAITranscriptionRequest = openai::transcriptions::CreateTranscriptionRequest;
type OpenAIImageRequest = openai::images::CreateImageRequest;
type OpenAIImageEditRequest = openai::images::CreateImageEditRequest;

type OpenAICreateBatchRequest = openai::batches::request::CreateBatchRequest;
type OpenAIGetBatchRequest = openai::batches::request::GetBatchRequest;
type OpenAICancelBatchRequest = openai::batches::request::CancelBatchRequest;
type OpenAIListBatchesRequest = openai::batches::request::ListBatchesRequest;

type OpenAICreateFileRequest = openai::files::CreateFileRequest;
type OpenAIGetFileRequest = openai::files::request::GetFileRequest;
type OpenAIGetFileContentRequest = openai::files::request::GetFileContentRequest;
type OpenAIDeleteFileRequest = openai::files::request::DeleteFileRequest;
type OpenAIListFilesRequest = openai::files::request::ListFilesRequest;

type OpenAICreateContainerRequest = openai::containers::request::CreateContainerRequest;
type OpenAIGetContainerRequest = openai::containers::request::GetContainerRequest;
type OpenAIDeleteContainerRequest = openai::containers::request::DeleteContainerRequest;
type OpenAIListContainersRequest = openai::containers::request::ListContainersRequest;
type OpenAICreateContainerFileRequest = openai::containers::request::CreateContainerFileRequest;
type OpenAIGetContainerFileRequest = openai::containers::request::GetContainerFileRequest;
type OpenAIGetContainerFileContentRequest =
    openai::containers::request::GetContainerFileContentRequest;
type OpenAIDeleteContainerFileRequest = openai::containers::request::DeleteContainerFileRequest;
type OpenAIListContainerFilesRequest = openai::containers::request::ListContainerFilesRequest;

type ClaudeCreateBatchRequest = claude::batches::request::CreateMessageBatchRequest;
type ClaudeGetBatchRequest = claude::batches::request::GetMessageBatchRequest;
type ClaudeCancelBatchRequest = claude::batches::request::CancelMessageBatchRequest;
type ClaudeListBatchesRequest = claude::batches::request::ListMessageBatchesRequest;

type ClaudeCreateFileRequest = claude::files::request::CreateFileRequest;
type ClaudeGetFileRequest = claude::files::request::GetFileRequest;
type ClaudeGetFileContentRequest = claude::files::request::GetFileContentRequest;
type ClaudeDeleteFileRequest = claude::files::request::DeleteFileRequest;
type ClaudeListFilesRequest = claude::files::request::ListFilesRequest;

type GeminiCreateBatchRequest = gemini::batches::request::CreateBatchRequest;
type GeminiGetBatchRequest = gemini::batches::request::GetBatchRequest;
type GeminiCancelBatchRequest = gemini::batches::request::CancelBatchRequest;
type GeminiDeleteBatchRequest = gemini::batches::request::DeleteBatchRequest;
type GeminiListBatchesRequest = gemini::batches::request::ListBatchesRequest;

type GeminiCreateFileRequest = gemini::files::request::CreateFileRequest;
type GeminiGetFileRequest = gemini::files::request::GetFileRequest;
type GeminiDeleteFileRequest = gemini::files::request::DeleteFileRequest;
type GeminiListFilesRequest = gemini::files::request::ListFilesRequest;

type BedrockConverseRequest = bedrock::converse::ConverseRequest;
type BedrockConverseStreamRequest = bedrock::converse::ConverseStreamRequest;
type BedrockInvokeModelRequest = bedrock::invoke::InvokeModelRequest;
type BedrockInvokeModelWithResponseStreamRequest =
    bedrock::invoke::InvokeModelWithResponseStreamRequest;
type BedrockPutObjectRequest = bedrock::object_store::PutObjectRequest;
type BedrockGetObjectRequest = bedrock::object_store::GetObjectRequest;
type BedrockHeadObjectRequest = bedrock::object_store::HeadObjectRequest;
type BedrockDeleteObjectRequest = bedrock::object_store::DeleteObjectRequest;
type BedrockListObjectsRequest = bedrock::object_store::ListObjectsRequest;

type BedrockCreateModelInvocationJobRequest =
    bedrock::model_invocation_job::CreateModelInvocationJobRequest;
type BedrockGetModelInvocationJobRequest =
    bedrock::model_invocation_job::GetModelInvocationJobRequest;
type BedrockStopModelInvocationJobRequest =
    bedrock::model_invocation_job::StopModelInvocationJobRequest;
type BedrockListModelInvocationJobsRequest =
    bedrock::model_invocation_job::ListModelInvocationJobsRequest;

type CohereChatRequest = cohere::chat::ChatRequest;
type CohereEmbedRequest = cohere::embed::EmbedRequest;
type CohereRerankRequest = cohere::rerank::RerankRequest;
type CohereTokenizeRequest = cohere::tokenize::TokenizeRequest;

#[async_trait]
pub trait UpstreamProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Provider "ability table": a dispatch table that tells core whether a given
    /// inbound request shape is handled natively or needs a protocol transform.
    ///
    /// The actual transform execution is performed in core (not provider-impl).
    fn dispatch_table(&self, config: &ProviderConfig) -> DispatchTable;

    // ---- Fine-grained build hooks (per request variant) ----
    // The engine/upstream layer should call these directly after classifying
    // the inbound request into a typed `Request` variant.

    async fn build_claude_messages(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &ClaudeMessagesRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("claude.messages"))
    }

    async fn build_claude_count_tokens(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &ClaudeCountTokensRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("claude.count_tokens"))
    }

    async fn build_claude_models_list(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &ClaudeModelsListRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("claude.models_list"))
    }

    async fn build_claude_models_get(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &ClaudeModelsGetRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("claude.models_get"))
    }

    async fn build_gemini_generate(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &GeminiGenerateContentRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("gemini.generate_content"))
    }

    async fn build_gemini_generate_stream(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &GeminiStreamGenerateContentRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("gemini.stream_generate_content"))
    }

    async fn build_gemini_count_tokens(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &GeminiCountTokensRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("gemini.count_tokens"))
    }

    async fn build_gemini_models_list(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &GeminiModelsListRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("gemini.models_list"))
    }

    async fn build_gemini_models_get(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &GeminiModelsGetRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("gemini.models_get"))
    }

    // ---- Claude batches/files (native Message Batches / Files API) ----

    async fn build_claude_batch_create(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &ClaudeCreateBatchRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("claude.batches_create"))
    }

    async fn build_claude_batch_get(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &ClaudeGetBatchRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("claude.batches_get"))
    }

    async fn build_claude_batch_cancel(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &ClaudeCancelBatchRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("claude.batches_cancel"))
    }

    async fn build_claude_batch_list(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &ClaudeListBatchesRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("claude.batches_list"))
    }

    async fn build_claude_file_create(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &ClaudeCreateFileRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("claude.files_create"))
    }

    async fn build_claude_file_get(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &ClaudeGetFileRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("claude.files_get"))
    }

    async fn build_claude_file_get_content(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &ClaudeGetFileContentRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("claude.files_get_content"))
    }

    async fn build_claude_file_delete(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &ClaudeDeleteFileRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("claude.files_delete"))
    }

    async fn build_claude_file_list(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &ClaudeListFilesRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("claude.files_list"))
    }

    // ---- Gemini batches/files (native Batch / Files API) ----

    async fn build_gemini_batch_create(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &GeminiCreateBatchRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("gemini.batches_create"))
    }

    async fn build_gemini_batch_get(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &GeminiGetBatchRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("gemini.batches_get"))
    }

    async fn build_gemini_batch_cancel(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &GeminiCancelBatchRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("gemini.batches_cancel"))
    }

    async fn build_gemini_batch_delete(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &GeminiDeleteBatchRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("gemini.batches_delete"))
    }

    async fn build_gemini_batch_list(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &GeminiListBatchesRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("gemini.batches_list"))
    }

    async fn build_gemini_file_create(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &GeminiCreateFileRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("gemini.files_create"))
    }

    async fn build_gemini_file_get(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &GeminiGetFileRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("gemini.files_get"))
    }

    async fn build_gemini_file_delete(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &GeminiDeleteFileRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("gemini.files_delete"))
    }

    async fn build_gemini_file_list(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &GeminiListFilesRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("gemini.files_list"))
    }

    async fn build_openai_chat(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &OpenAIChatCompletionRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("openai.chat_completions"))
    }

    async fn build_openai_responses(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &OpenAIResponseRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("openai.responses"))
    }

    async fn build_openai_response_get(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &OpenAIResponseGetRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("openai.responses_get"))
    }

    async fn build_openai_response_delete(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &OpenAIResponseDeleteRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("openai.responses_delete"))
    }

    async fn build_openai_response_cancel(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &OpenAIResponseCancelRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("openai.responses_cancel"))
    }

    async fn build_openai_response_list_input_items(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &OpenAIResponseListInputItemsRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported(
            "openai.responses_list_input_items",
        ))
    }

    async fn build_openai_response_compact(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &OpenAIResponseCompactRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("openai.responses_compact"))
    }

    async fn build_openai_memory_trace_summarize(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &OpenAIMemoryTraceSummarizeRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported(
            "openai.memories_trace_summarize",
        ))
    }

    async fn build_openai_input_tokens(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &OpenAIInputTokensRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("openai.input_tokens"))
    }

    async fn build_openai_models_list(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &OpenAIModelsListRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("openai.models_list"))
    }

    async fn build_openai_models_get(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &OpenAIModelsGetRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("openai.models_get"))
    }

    // ---- Embedding / speech / transcription / image generation ----

    async fn build_openai_embeddings(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &OpenAIEmbeddingRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("openai.embeddings"))
    }

    async fn build_openai_speech(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &OpenAISpeechRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("openai.speech"))
    }

    async fn build_openai_transcription(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &OpenAITranscriptionRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("openai.transcriptions"))
    }

    async fn build_openai_image_generation(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &OpenAIImageRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("openai.images_generations"))
    }

    async fn build_openai_image_edit(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &OpenAIImageEditRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("openai.images_edits"))
    }

    // ---- Batches ----

    async fn build_openai_batch_create(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &OpenAICreateBatchRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("openai.batches_create"))
    }

    async fn build_openai_batch_get(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &OpenAIGetBatchRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("openai.batches_get"))
    }

    async fn build_openai_batch_cancel(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &OpenAICancelBatchRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("openai.batches_cancel"))
    }

    async fn build_openai_batch_list(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &OpenAIListBatchesRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("openai.batches_list"))
    }

    // ---- Files ----

    async fn build_openai_file_create(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &OpenAICreateFileRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("openai.files_create"))
    }

    async fn build_openai_file_get(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &OpenAIGetFileRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("openai.files_get"))
    }

    async fn build_openai_file_get_content(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &OpenAIGetFileContentRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("openai.files_get_content"))
    }

    async fn build_openai_file_delete(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &OpenAIDeleteFileRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("openai.files_delete"))
    }

    async fn build_openai_file_list(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &OpenAIListFilesRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("openai.files_list"))
    }

    // ---- Containers ----

    async fn build_openai_container_create(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &OpenAICreateContainerRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("openai.containers_create"))
    }

    async fn build_openai_container_get(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &OpenAIGetContainerRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("openai.containers_get"))
    }

    async fn build_openai_container_delete(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &OpenAIDeleteContainerRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("openai.containers_delete"))
    }

    async fn build_openai_container_list(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &OpenAIListContainersRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("openai.containers_list"))
    }

    async fn build_openai_container_file_create(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &OpenAICreateContainerFileRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("openai.containers_files_create"))
    }

    async fn build_openai_container_file_get(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &OpenAIGetContainerFileRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("openai.containers_files_get"))
    }

    async fn build_openai_container_file_get_content(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &OpenAIGetContainerFileContentRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported(
            "openai.containers_files_get_content",
        ))
    }

    async fn build_openai_container_file_delete(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &OpenAIDeleteContainerFileRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("openai.containers_files_delete"))
    }

    async fn build_openai_container_file_list(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &OpenAIListContainerFilesRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("openai.containers_files_list"))
    }

    // ---- AWS Bedrock ----

    async fn build_bedrock_converse(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &BedrockConverseRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("bedrock.converse"))
    }

    async fn build_bedrock_converse_stream(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &BedrockConverseStreamRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("bedrock.converse_stream"))
    }

    async fn build_bedrock_invoke_model(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &BedrockInvokeModelRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("bedrock.invoke_model"))
    }

    async fn build_bedrock_invoke_model_with_response_stream(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &BedrockInvokeModelWithResponseStreamRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported(
            "bedrock.invoke_model_with_response_stream",
        ))
    }

    async fn build_bedrock_put_object(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &BedrockPutObjectRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("bedrock.put_object"))
    }

    async fn build_bedrock_get_object(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &BedrockGetObjectRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("bedrock.get_object"))
    }

    async fn build_bedrock_head_object(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &BedrockHeadObjectRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("bedrock.head_object"))
    }

    async fn build_bedrock_delete_object(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &BedrockDeleteObjectRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("bedrock.delete_object"))
    }

    async fn build_bedrock_list_objects(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &BedrockListObjectsRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("bedrock.list_objects"))
    }

    async fn build_bedrock_create_model_invocation_job(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &BedrockCreateModelInvocationJobRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported(
            "bedrock.create_model_invocation_job",
        ))
    }

    async fn build_bedrock_get_model_invocation_job(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &BedrockGetModelInvocationJobRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported(
            "bedrock.get_model_invocation_job",
        ))
    }

    async fn build_bedrock_stop_model_invocation_job(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &BedrockStopModelInvocationJobRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported(
            "bedrock.stop_model_invocation_job",
        ))
    }

    async fn build_bedrock_list_model_invocation_jobs(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &BedrockListModelInvocationJobsRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported(
            "bedrock.list_model_invocation_jobs",
        ))
    }

    // ---- Cohere ----

    async fn build_cohere_chat(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &CohereChatRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("cohere.chat"))
    }

    async fn build_cohere_embed(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &CohereEmbedRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("cohere.embed"))
    }

    async fn build_cohere_rerank(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &CohereRerankRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("cohere.rerank"))
    }

    async fn build_cohere_tokenize(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &CohereTokenizeRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("cohere.tokenize"))
    }

    /// Provider-managed OAuth start (downstream endpoint).
    ///
    /// Providers that support OAuth (e.g. codex/claudecode/antigravity) should override this.
    fn oauth_start(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _req: &OAuthStartRequest,
    ) -> ProviderResult<UpstreamHttpResponse> {
        Err(ProviderError::Unsupported("oauth_start"))
    }

    /// Provider-managed OAuth callback (downstream endpoint).
    ///
    /// Providers that support OAuth (e.g. codex/claudecode/antigravity) should override this.
    fn oauth_callback(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _req: &OAuthCallbackRequest,
    ) -> ProviderResult<OAuthCallbackResult> {
        Err(ProviderError::Unsupported("oauth_callback"))
    }

    /// Classify an upstream failure into a credential "unavailable" decision.
    ///
    /// This is provider-specific because upstream status codes / error bodies may differ.
    /// Core will call this hook on failures; if it returns `Some`, core should call
    /// `CredentialPool::mark_unavailable(...)`.
    fn decide_unavailable(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &Request,
        _failure: &UpstreamFailure,
    ) -> Option<UnavailableDecision> {
        default_decide_unavailable(_failure)
    }

    fn on_auth_failure<'a>(
        &'a self,
        _ctx: &'a UpstreamCtx,
        _config: &'a ProviderConfig,
        _credential: &'a Credential,
        _req: &'a Request,
        _failure: &'a UpstreamFailure,
    ) -> Pin<Box<dyn Future<Output = ProviderResult<AuthRetryAction>> + Send + 'a>> {
        Box::pin(async { Ok(AuthRetryAction::None) })
    }

    /// Optional hook for non-auth upstream failures.
    ///
    /// Typical use-case: provider-specific fallback decisions (e.g. disable a beta
    /// capability on one credential and retry with downgraded headers).
    fn on_upstream_failure<'a>(
        &'a self,
        _ctx: &'a UpstreamCtx,
        _config: &'a ProviderConfig,
        _credential: &'a Credential,
        _req: &'a Request,
        _failure: &'a UpstreamFailure,
    ) -> Pin<Box<dyn Future<Output = ProviderResult<AuthRetryAction>> + Send + 'a>> {
        Box::pin(async { Ok(AuthRetryAction::None) })
    }

    /// Optional hook for upstream success.
    ///
    /// Typical use-case: persist provider capability learning into credential meta.
    fn on_upstream_success<'a>(
        &'a self,
        _ctx: &'a UpstreamCtx,
        _config: &'a ProviderConfig,
        _credential: &'a Credential,
        _req: &'a Request,
        _response: &'a UpstreamHttpResponse,
    ) -> Pin<Box<dyn Future<Output = ProviderResult<Option<Credential>>> + Send + 'a>> {
        Box::pin(async { Ok(None) })
    }

    /// Optional credential upgrade hook (e.g. exchange session_key for OAuth tokens).
    ///
    /// If this returns `Some(credential)`, core will persist it into the pool and
    /// use the returned credential for the current request.
    fn upgrade_credential<'a>(
        &'a self,
        _ctx: &'a UpstreamCtx,
        _config: &'a ProviderConfig,
        _credential: &'a Credential,
        _req: &'a Request,
    ) -> Pin<Box<dyn Future<Output = ProviderResult<Option<Credential>>> + Send + 'a>> {
        Box::pin(async { Ok(None) })
    }

    /// Optional local response hook for provider-specific endpoints (e.g. local models list/get).
    ///
    /// When this returns `Some`, core should bypass upstream IO and treat the response
    /// as if it were returned from upstream.
    fn local_response(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &Request,
    ) -> ProviderResult<Option<UpstreamHttpResponse>> {
        Ok(None)
    }

    /// Optional non-stream response normalization hook.
    ///
    /// Providers can rewrite upstream JSON body shapes before core decodes
    /// into protocol structs. This is useful for provider-specific REST
    /// envelopes that differ from protocol DTOs.
    #[allow(clippy::too_many_arguments)]
    fn normalize_nonstream_response(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _proto: Proto,
        _op: Op,
        _req: &Request,
        body: Bytes,
    ) -> ProviderResult<Bytes> {
        Ok(body)
    }

    async fn build_upstream_usage(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Other(
            "upstream_usage not supported by this provider".to_string(),
        ))
    }

    /// Build a raw, byte-for-byte forward of an OpenAI Responses-API request.
    ///
    /// Only dialects that speak the OpenAI Responses wire format directly
    /// (OpenAI itself, Azure OpenAI) need to implement this.
    async fn build_openai_responses_passthrough(
        &self,
        _ctx: &UpstreamCtx,
        _config: &ProviderConfig,
        _credential: &Credential,
        _req: &OpenAIResponsesPassthroughRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        Err(ProviderError::Unsupported("openai.responses_passthrough"))
    }

    /// Dispatch an `OpenAIResourceRequest` to its matching `build_openai_*` hook.
    ///
    /// A default forwarding impl so core doesn't need a 23-arm match of its own;
    /// providers only ever override the individual `build_openai_*` methods.
    async fn build_openai_resource(
        &self,
        ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &OpenAIResourceRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        match req {
            OpenAIResourceRequest::Embeddings(r) => {
                self.build_openai_embeddings(ctx, config, credential, r).await
            }
            OpenAIResourceRequest::Speech(r) => {
                self.build_openai_speech(ctx, config, credential, r).await
            }
            OpenAIResourceRequest::Transcription(r) => {
                self.build_openai_transcription(ctx, config, credential, r)
                    .await
            }
            OpenAIResourceRequest::ImageGeneration(r) => {
                self.build_openai_image_generation(ctx, config, credential, r)
                    .await
            }
            OpenAIResourceRequest::ImageEdit(r) => {
                self.build_openai_image_edit(ctx, config, credential, r)
                    .await
            }
            OpenAIResourceRequest::BatchCreate(r) => {
                self.build_openai_batch_create(ctx, config, credential, r)
                    .await
            }
            OpenAIResourceRequest::BatchGet(r) => {
                self.build_openai_batch_get(ctx, config, credential, r).await
            }
            OpenAIResourceRequest::BatchCancel(r) => {
                self.build_openai_batch_cancel(ctx, config, credential, r)
                    .await
            }
            OpenAIResourceRequest::BatchList(r) => {
                self.build_openai_batch_list(ctx, config, credential, r)
                    .await
            }
            OpenAIResourceRequest::FileCreate(r) => {
                self.build_openai_file_create(ctx, config, credential, r)
                    .await
            }
            OpenAIResourceRequest::FileGet(r) => {
                self.build_openai_file_get(ctx, config, credential, r).await
            }
            OpenAIResourceRequest::FileGetContent(r) => {
                self.build_openai_file_get_content(ctx, config, credential, r)
                    .await
            }
            OpenAIResourceRequest::FileDelete(r) => {
                self.build_openai_file_delete(ctx, config, credential, r)
                    .await
            }
            OpenAIResourceRequest::FileList(r) => {
                self.build_openai_file_list(ctx, config, credential, r)
                    .await
            }
            OpenAIResourceRequest::ContainerCreate(r) => {
                self.build_openai_container_create(ctx, config, credential, r)
                    .await
            }
            OpenAIResourceRequest::ContainerGet(r) => {
                self.build_openai_container_get(ctx, config, credential, r)
                    .await
            }
            OpenAIResourceRequest::ContainerDelete(r) => {
                self.build_openai_container_delete(ctx, config, credential, r)
                    .await
            }
            OpenAIResourceRequest::ContainerList(r) => {
                self.build_openai_container_list(ctx, config, credential, r)
                    .await
            }
            OpenAIResourceRequest::ContainerFileCreate(r) => {
                self.build_openai_container_file_create(ctx, config, credential, r)
                    .await
            }
            OpenAIResourceRequest::ContainerFileGet(r) => {
                self.build_openai_container_file_get(ctx, config, credential, r)
                    .await
            }
            OpenAIResourceRequest::ContainerFileGetContent(r) => {
                self.build_openai_container_file_get_content(ctx, config, credential, r)
                    .await
            }
            OpenAIResourceRequest::ContainerFileDelete(r) => {
                self.build_openai_container_file_delete(ctx, config, credential, r)
                    .await
            }
            OpenAIResourceRequest::ContainerFileList(r) => {
                self.build_openai_container_file_list(ctx, config, credential, r)
                    .await
            }
        }
    }

    /// Dispatch a `CohereRequest` to its matching `build_cohere_*` hook.
    async fn build_cohere_request(
        &self,
        ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &CohereRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        match req {
            CohereRequest::Chat(r) => self.build_cohere_chat(ctx, config, credential, r).await,
            CohereRequest::Embed(r) => self.build_cohere_embed(ctx, config, credential, r).await,
            CohereRequest::Rerank(r) => self.build_cohere_rerank(ctx, config, credential, r).await,
            CohereRequest::Tokenize(r) => {
                self.build_cohere_tokenize(ctx, config, credential, r).await
            }
        }
    }

    /// Dispatch a `BedrockRequest` to its matching `build_bedrock_*` hook.
    async fn build_bedrock_request(
        &self,
        ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &BedrockRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        match req {
            BedrockRequest::Converse(r) => {
                self.build_bedrock_converse(ctx, config, credential, r).await
            }
            BedrockRequest::ConverseStream(r) => {
                self.build_bedrock_converse_stream(ctx, config, credential, r)
                    .await
            }
            BedrockRequest::InvokeModel(r) => {
                self.build_bedrock_invoke_model(ctx, config, credential, r)
                    .await
            }
            BedrockRequest::InvokeModelWithResponseStream(r) => {
                self.build_bedrock_invoke_model_with_response_stream(ctx, config, credential, r)
                    .await
            }
            BedrockRequest::PutObject(r) => {
                self.build_bedrock_put_object(ctx, config, credential, r)
                    .await
            }
            BedrockRequest::GetObject(r) => {
                self.build_bedrock_get_object(ctx, config, credential, r)
                    .await
            }
            BedrockRequest::HeadObject(r) => {
                self.build_bedrock_head_object(ctx, config, credential, r)
                    .await
            }
            BedrockRequest::DeleteObject(r) => {
                self.build_bedrock_delete_object(ctx, config, credential, r)
                    .await
            }
            BedrockRequest::ListObjects(r) => {
                self.build_bedrock_list_objects(ctx, config, credential, r)
                    .await
            }
            BedrockRequest::CreateModelInvocationJob(r) => {
                self.build_bedrock_create_model_invocation_job(ctx, config, credential, r)
                    .await
            }
            BedrockRequest::GetModelInvocationJob(r) => {
                self.build_bedrock_get_model_invocation_job(ctx, config, credential, r)
                    .await
            }
            BedrockRequest::StopModelInvocationJob(r) => {
                self.build_bedrock_stop_model_invocation_job(ctx, config, credential, r)
                    .await
            }
            BedrockRequest::ListModelInvocationJobs(r) => {
                self.build_bedrock_list_model_invocation_jobs(ctx, config, credential, r)
                    .await
            }
        }
    }

    /// Dispatch a `ClaudeResourceRequest` to its matching `build_claude_*` hook.
    async fn build_claude_resource(
        &self,
        ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &ClaudeResourceRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        match req {
            ClaudeResourceRequest::BatchCreate(r) => {
                self.build_claude_batch_create(ctx, config, credential, r)
                    .await
            }
            ClaudeResourceRequest::BatchGet(r) => {
                self.build_claude_batch_get(ctx, config, credential, r)
                    .await
            }
            ClaudeResourceRequest::BatchCancel(r) => {
                self.build_claude_batch_cancel(ctx, config, credential, r)
                    .await
            }
            ClaudeResourceRequest::BatchList(r) => {
                self.build_claude_batch_list(ctx, config, credential, r)
                    .await
            }
            ClaudeResourceRequest::FileCreate(r) => {
                self.build_claude_file_create(ctx, config, credential, r)
                    .await
            }
            ClaudeResourceRequest::FileGet(r) => {
                self.build_claude_file_get(ctx, config, credential, r).await
            }
            ClaudeResourceRequest::FileGetContent(r) => {
                self.build_claude_file_get_content(ctx, config, credential, r)
                    .await
            }
            ClaudeResourceRequest::FileDelete(r) => {
                self.build_claude_file_delete(ctx, config, credential, r)
                    .await
            }
            ClaudeResourceRequest::FileList(r) => {
                self.build_claude_file_list(ctx, config, credential, r)
                    .await
            }
        }
    }

    /// Dispatch a `GeminiResourceRequest` to its matching `build_gemini_*` hook.
    async fn build_gemini_resource(
        &self,
        ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &GeminiResourceRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        match req {
            GeminiResourceRequest::BatchCreate(r) => {
                self.build_gemini_batch_create(ctx, config, credential, r)
                    .await
            }
            GeminiResourceRequest::BatchGet(r) => {
                self.build_gemini_batch_get(ctx, config, credential, r)
                    .await
            }
            GeminiResourceRequest::BatchCancel(r) => {
                self.build_gemini_batch_cancel(ctx, config, credential, r)
                    .await
            }
            GeminiResourceRequest::BatchDelete(r) => {
                self.build_gemini_batch_delete(ctx, config, credential, r)
                    .await
            }
            GeminiResourceRequest::BatchList(r) => {
                self.build_gemini_batch_list(ctx, config, credential, r)
                    .await
            }
            GeminiResourceRequest::FileCreate(r) => {
                self.build_gemini_file_create(ctx, config, credential, r)
                    .await
            }
            GeminiResourceRequest::FileGet(r) => {
                self.build_gemini_file_get(ctx, config, credential, r).await
            }
            GeminiResourceRequest::FileDelete(r) => {
                self.build_gemini_file_delete(ctx, config, credential, r)
                    .await
            }
            GeminiResourceRequest::FileList(r) => {
                self.build_gemini_file_list(ctx, config, credential, r)
                    .await
            }
        }
    }
}
