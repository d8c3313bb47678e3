use gproxy_provider_core::{
    BedrockRequest, ClaudeResourceRequest, CohereRequest, DownstreamContext, GeminiResourceRequest,
    OAuthCallbackRequest, OAuthStartRequest, Op, OpenAIResourceRequest,
    OpenAIResponsesPassthroughRequest, Proto, Request,
};
use gproxy_transform::canonical::CanonicalRequest;

/// Which dialect-specific wire shape a `CanonicalResponse` produced by
/// `ProxyCall::Canonical` gets re-encoded into. The canonical hub itself is
/// dialect-agnostic; the caller (the route that built the `CanonicalRequest`)
/// is the only place that knows what shape the response needs to come back
/// as, so it picks one of these when it issues the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalReencode {
    GeminiEmbedContent,
    GeminiBatchEmbedContents,
    GeminiPredict,
}

#[derive(Debug, Clone)]
pub struct ProxyAuth {
    pub user_id: i64,
    pub user_key_id: i64,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone)]
pub enum ProxyCall {
    Protocol {
        trace_id: Option<String>,
        auth: ProxyAuth,
        provider: String,
        response_model_prefix_provider: Option<String>,
        user_proto: Proto,
        user_op: Op,
        req: Box<Request>,
    },
    OpenAIResponsesPassthrough {
        trace_id: Option<String>,
        auth: ProxyAuth,
        provider: String,
        req: OpenAIResponsesPassthroughRequest,
    },
    OpenAIResource {
        trace_id: Option<String>,
        auth: ProxyAuth,
        provider: String,
        req: OpenAIResourceRequest,
    },
    CohereCall {
        trace_id: Option<String>,
        auth: ProxyAuth,
        provider: String,
        req: CohereRequest,
    },
    BedrockCall {
        trace_id: Option<String>,
        auth: ProxyAuth,
        provider: String,
        req: BedrockRequest,
        downstream: DownstreamContext,
    },
    ClaudeResource {
        trace_id: Option<String>,
        auth: ProxyAuth,
        provider: String,
        req: ClaudeResourceRequest,
    },
    GeminiResource {
        trace_id: Option<String>,
        auth: ProxyAuth,
        provider: String,
        req: GeminiResourceRequest,
    },
    OAuthStart {
        trace_id: Option<String>,
        auth: ProxyAuth,
        provider: String,
        req: OAuthStartRequest,
    },
    OAuthCallback {
        trace_id: Option<String>,
        auth: ProxyAuth,
        provider: String,
        req: OAuthCallbackRequest,
    },
    UpstreamUsage {
        trace_id: Option<String>,
        auth: ProxyAuth,
        provider: String,
        credential_id: i64,
    },
    /// Routes a request through the dialect-agnostic canonical hub
    /// (`gproxy_transform::canonical`) rather than a native per-dialect
    /// pipeline. Used by surfaces that have no pairwise dialect precedent,
    /// e.g. Gemini's `embedContent`/`batchEmbedContents`/`:predict` actions,
    /// which reuse the OpenAI-shaped embedding/image-generation adapters.
    Canonical {
        trace_id: Option<String>,
        auth: ProxyAuth,
        provider: String,
        req: CanonicalRequest,
        reencode: CanonicalReencode,
    },
}
