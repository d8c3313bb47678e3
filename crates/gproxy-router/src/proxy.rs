use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use axum::body::Body;
use axum::extract::{Extension, Multipart, Path, Query, RawQuery, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::{any, delete, get, head, post, put};
use axum::{Json, Router};
use bytes::Bytes;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::ReceiverStream;

use gproxy_core::proxy_engine::{ProxyAuth, ProxyCall, ProxyEngine};
use gproxy_protocol::bedrock;
use gproxy_protocol::claude;
use gproxy_protocol::cohere;
use gproxy_protocol::gemini;
use gproxy_protocol::openai;
use gproxy_provider_core::{
    BedrockCredential, BedrockRequest, ClaudeResourceRequest, CohereRequest,
    CountTokensRequest as MwCountTokensRequest, Credential, DownstreamContext, DownstreamEvent,
    Event, GenerateContentRequest as MwGenerateContentRequest, GeminiResourceRequest, Headers,
    ModelGetRequest as MwModelGetRequest, ModelListRequest as MwModelListRequest,
    OAuthCallbackRequest, OAuthStartRequest, Op, OpenAIResourceRequest,
    OpenAIResponsesPassthroughRequest, Proto, Request, UpstreamBody, UpstreamHttpResponse,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DownstreamKeySource {
    AuthorizationBearer,
    XApiKey,
    XGoogApiKey,
    QueryKey,
}

#[derive(Clone)]
pub struct ProxyState {
    pub engine: Arc<ProxyEngine>,
}

#[derive(Clone)]
struct RequestTraceId(String);

#[derive(Debug, Clone)]
struct ProviderRouteCtx {
    provider: String,
    response_model_prefix_provider: Option<String>,
}

const SSE_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);
const SSE_HEARTBEAT_FRAME: &[u8] = b": keep-alive\n\n";
const MAX_DOWNSTREAM_LOG_BODY_BYTES: usize = 50 * 1024 * 1024;

pub fn proxy_router(engine: Arc<ProxyEngine>) -> Router {
    let state = ProxyState { engine };

    Router::new()
        // Aggregate routes without provider prefix
        .route("/v1/messages", post(claude_messages_aggregate))
        .route(
            "/v1/messages/count_tokens",
            post(claude_count_tokens_aggregate),
        )
        .route(
            "/v1/chat/completions",
            post(openai_chat_completions_aggregate),
        )
        .route("/v1/responses", post(openai_responses_aggregate))
        .route(
            "/v1/responses/compact",
            post(openai_responses_compact_aggregate),
        )
        .route(
            "/v1/responses/input_tokens",
            post(openai_input_tokens_aggregate),
        )
        .route("/v1/models/{*model}", get(models_get_v1_aggregate))
        .route("/v1/models/{*model}", post(gemini_post_aggregate))
        .route("/v1beta/models", get(gemini_models_list_aggregate))
        .route("/v1beta/models/{*name}", get(gemini_models_get_aggregate))
        .route("/v1beta/models/{*name}", post(gemini_post_aggregate))
        // Claude
        .route("/{provider}/v1/messages", post(claude_messages))
        .route(
            "/{provider}/v1/messages/count_tokens",
            post(claude_count_tokens),
        )
        // Claude native ops: message batches, files
        .route(
            "/{provider}/v1/messages/batches",
            post(claude_batches_create).get(claude_batches_list),
        )
        .route(
            "/{provider}/v1/messages/batches/{id}",
            get(claude_batches_get),
        )
        .route(
            "/{provider}/v1/messages/batches/{id}/cancel",
            post(claude_batches_cancel),
        )
        // OpenAI
        .route(
            "/{provider}/v1/chat/completions",
            post(openai_chat_completions),
        )
        .route(
            "/{provider}/v1/responses",
            any(openai_responses_passthrough),
        )
        .route(
            "/{provider}/v1/responses/input_tokens",
            post(openai_input_tokens),
        )
        .route(
            "/{provider}/v1/responses/{*rest}",
            any(openai_responses_passthrough_rest),
        )
        // OpenAI resource ops: embeddings/speech/transcriptions/images/batches/files/containers
        .route("/{provider}/v1/embeddings", post(openai_embeddings))
        .route("/{provider}/v1/audio/speech", post(openai_speech))
        .route(
            "/{provider}/v1/audio/transcriptions",
            post(openai_transcriptions),
        )
        .route(
            "/{provider}/v1/images/generations",
            post(openai_images_generations),
        )
        .route("/{provider}/v1/images/edits", post(openai_images_edits))
        .route(
            "/{provider}/v1/batches",
            post(openai_batches_create).get(openai_batches_list),
        )
        .route("/{provider}/v1/batches/{id}", get(openai_batches_get))
        .route(
            "/{provider}/v1/batches/{id}/cancel",
            post(openai_batches_cancel),
        )
        .route(
            "/{provider}/v1/files",
            post(openai_files_create).get(openai_files_list),
        )
        .route(
            "/{provider}/v1/files/{id}",
            get(openai_files_get).delete(openai_files_delete),
        )
        .route(
            "/{provider}/v1/files/{id}/content",
            get(openai_files_get_content),
        )
        .route(
            "/{provider}/v1/containers",
            post(openai_containers_create).get(openai_containers_list),
        )
        .route(
            "/{provider}/v1/containers/{id}",
            get(openai_containers_get).delete(openai_containers_delete),
        )
        .route(
            "/{provider}/v1/containers/{id}/files",
            post(openai_container_files_create).get(openai_container_files_list),
        )
        .route(
            "/{provider}/v1/containers/{id}/files/{file_id}",
            get(openai_container_files_get).delete(openai_container_files_delete),
        )
        .route(
            "/{provider}/v1/containers/{id}/files/{file_id}/content",
            get(openai_container_files_get_content),
        )
        // Cohere native ops: chat/embed/rerank/tokenize
        .route("/{provider}/v2/chat", post(cohere_chat))
        .route("/{provider}/v2/embed", post(cohere_embed))
        .route("/{provider}/v2/rerank", post(cohere_rerank))
        .route("/{provider}/v1/tokenize", post(cohere_tokenize))
        // Bedrock native ops: converse/invoke, model-invocation jobs, S3-compatible object store
        .route("/{provider}/model/{model_id}/converse", post(bedrock_converse))
        .route(
            "/{provider}/model/{model_id}/converse-stream",
            post(bedrock_converse_stream),
        )
        .route("/{provider}/model/{model_id}/invoke", post(bedrock_invoke))
        .route(
            "/{provider}/model/{model_id}/invoke-with-response-stream",
            post(bedrock_invoke_with_response_stream),
        )
        .route(
            "/{provider}/model-invocation-job",
            post(bedrock_create_model_invocation_job),
        )
        .route(
            "/{provider}/model-invocation-jobs",
            get(bedrock_list_model_invocation_jobs),
        )
        .route(
            "/{provider}/model-invocation-job/{job_id}",
            get(bedrock_get_model_invocation_job),
        )
        .route(
            "/{provider}/model-invocation-job/{job_id}/stop",
            post(bedrock_stop_model_invocation_job),
        )
        .route(
            "/{provider}/{bucket}/{*key}",
            put(bedrock_put_object)
                .get(bedrock_get_object)
                .head(bedrock_head_object)
                .delete(bedrock_delete_object),
        )
        .route("/{provider}/{bucket}", get(bedrock_list_objects))
        // Shared OpenAI/Claude models endpoints (disambiguate by `anthropic-version` header).
        .route("/{provider}/v1/models", get(models_list_v1))
        .route("/{provider}/v1/models/{*model}", get(models_get_v1))
        // Gemini v1/v1beta POST endpoints (generateContent/streamGenerateContent/countTokens).
        .route("/{provider}/v1/models/{*model}", post(gemini_post))
        .route("/{provider}/v1beta/models", get(gemini_models_list))
        .route("/{provider}/v1beta/models/{*name}", get(gemini_models_get))
        .route("/{provider}/v1beta/models/{*name}", post(gemini_post))
        // Gemini native ops: batches, files
        .route("/{provider}/v1beta/batches", get(gemini_batches_list))
        .route(
            "/{provider}/v1beta/batches/{id}",
            get(gemini_batches_get).delete(gemini_batches_delete),
        )
        .route(
            "/{provider}/v1beta/batches/{id}/cancel",
            post(gemini_batches_cancel),
        )
        .route("/{provider}/upload/v1beta/files", post(gemini_files_create))
        .route("/{provider}/v1beta/files", get(gemini_files_list))
        .route(
            "/{provider}/v1beta/files/{id}",
            get(gemini_files_get).delete(gemini_files_delete),
        )
        // Provider-internal downstream abilities
        .route("/{provider}/oauth", get(oauth_start))
        .route("/{provider}/oauth/callback", get(oauth_callback))
        .route("/{provider}/usage", get(upstream_usage))
        .layer(middleware::from_fn_with_state(state.clone(), proxy_auth))
        .with_state(state)
}

async fn proxy_auth(
    State(state): State<ProxyState>,
    mut req: axum::http::Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let trace_id = uuid::Uuid::now_v7().to_string();
    let trace_id_opt = Some(trace_id.clone());
    let request_method = req.method().as_str().to_string();
    let redact_sensitive = state.engine.event_redact_sensitive();
    let request_headers = maybe_redact_headers(headers_to_vec(req.headers()), redact_sensitive);
    let request_path = req.uri().path().to_string();
    let request_query = maybe_redact_query(req.uri().query(), redact_sensitive);

    // Extract before stripping.
    let key = extract_user_key(req.headers(), req.uri().query());
    let direct_key = extract_direct_key(req.headers());

    // Defense-in-depth: don't forward downstream auth material to handlers/providers/logs.
    // Do this for both success/failure to avoid accidental propagation.
    strip_downstream_auth_headers(req.headers_mut());
    strip_downstream_auth_query(req.uri_mut());
    req.extensions_mut()
        .insert(RequestTraceId(trace_id.clone()));
    req.extensions_mut().insert(DownstreamContext {
        trace_id: trace_id_opt.clone(),
        user_id: None,
        user_key_id: None,
        user_agent: None,
        direct_key,
        use_raw_request_body: false,
        send_back_raw_response: false,
    });

    let Some(key) = key else {
        state
            .engine
            .events()
            .emit(Event::Downstream(DownstreamEvent {
                trace_id: trace_id_opt.clone(),
                at: SystemTime::now(),
                user_id: None,
                user_key_id: None,
                request_method,
                request_headers,
                request_path,
                request_query,
                request_body: None,
                response_status: Some(StatusCode::UNAUTHORIZED.as_u16()),
                response_headers: Vec::new(),
                response_body: None,
            }))
            .await;
        return Err(StatusCode::UNAUTHORIZED);
    };

    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    let Some(mut auth) = state.engine.authenticate_user_key(&key.0) else {
        state
            .engine
            .events()
            .emit(Event::Downstream(DownstreamEvent {
                trace_id: trace_id_opt.clone(),
                at: SystemTime::now(),
                user_id: None,
                user_key_id: None,
                request_method,
                request_headers,
                request_path,
                request_query,
                request_body: None,
                response_status: Some(StatusCode::UNAUTHORIZED.as_u16()),
                response_headers: Vec::new(),
                response_body: None,
            }))
            .await;
        return Err(StatusCode::UNAUTHORIZED);
    };

    auth.user_agent = user_agent;
    req.extensions_mut().insert(auth);
    req.extensions_mut().insert(key.1);
    let auth = req.extensions().get::<ProxyAuth>().cloned().unwrap();

    let resp = next.run(req).await;
    let status = resp.status().as_u16();
    let response_headers = maybe_redact_headers(headers_to_vec(resp.headers()), redact_sensitive);

    if redact_sensitive {
        state
            .engine
            .events()
            .emit(Event::Downstream(DownstreamEvent {
                trace_id: trace_id_opt,
                at: SystemTime::now(),
                user_id: Some(auth.user_id),
                user_key_id: Some(auth.user_key_id),
                request_method,
                request_headers,
                request_path,
                request_query,
                request_body: None,
                response_status: Some(status),
                response_headers,
                response_body: None,
            }))
            .await;
        return Ok(resp);
    }

    let (parts, body) = resp.into_parts();
    let (tx_out, rx_out) = tokio::sync::mpsc::channel::<Bytes>(32);
    let events = state.engine.events();

    tokio::spawn(async move {
        let mut stream = body.into_data_stream();
        let mut response_body = Vec::new();
        while let Some(item) = stream.next().await {
            let chunk = match item {
                Ok(chunk) => chunk,
                Err(_) => break,
            };
            append_capped(
                &mut response_body,
                chunk.as_ref(),
                MAX_DOWNSTREAM_LOG_BODY_BYTES,
            );
            if tx_out.send(chunk).await.is_err() {
                break;
            }
        }

        events
            .emit(Event::Downstream(DownstreamEvent {
                trace_id: trace_id_opt,
                at: SystemTime::now(),
                user_id: Some(auth.user_id),
                user_key_id: Some(auth.user_key_id),
                request_method,
                request_headers,
                request_path,
                request_query,
                request_body: None,
                response_status: Some(status),
                response_headers,
                response_body: Some(response_body),
            }))
            .await;
    });

    let stream = ReceiverStream::new(rx_out).map(Ok::<_, Infallible>);
    let resp = Response::from_parts(parts, Body::from_stream(stream));
    Ok(resp)
}

fn append_capped(buf: &mut Vec<u8>, chunk: &[u8], cap: usize) -> bool {
    if buf.len() >= cap {
        return true;
    }
    let remaining = cap.saturating_sub(buf.len());
    let take = remaining.min(chunk.len());
    buf.extend_from_slice(&chunk[..take]);
    take < chunk.len()
}

fn strip_downstream_auth_headers(headers: &mut HeaderMap) {
    headers.remove(header::AUTHORIZATION);
    headers.remove("x-api-key");
    headers.remove("x-goog-api-key");
    for name in DIRECT_KEY_HEADERS {
        headers.remove(*name);
    }
}

fn strip_downstream_auth_query(uri: &mut axum::http::Uri) {
    let Some(q) = uri.query() else { return };

    let Ok(pairs) = serde_urlencoded::from_str::<Vec<(String, String)>>(q) else {
        return;
    };

    let filtered: Vec<(String, String)> = pairs.into_iter().filter(|(k, _)| k != "key").collect();

    let new_q = match serde_urlencoded::to_string(&filtered) {
        Ok(s) => s,
        Err(_) => return,
    };

    let path = uri.path();
    let new_uri_str = if new_q.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{new_q}")
    };
    if let Ok(new_uri) = new_uri_str.parse() {
        *uri = new_uri;
    }
}

fn extract_user_key(
    headers: &HeaderMap,
    query: Option<&str>,
) -> Option<(String, DownstreamKeySource)> {
    // 1) Authorization: Bearer <token>
    if let Some(value) = headers.get(header::AUTHORIZATION)
        && let Ok(s) = value.to_str()
    {
        let s = s.trim();
        let prefix = "Bearer ";
        if s.len() > prefix.len() && s[..prefix.len()].eq_ignore_ascii_case(prefix) {
            let token = s[prefix.len()..].trim();
            if !token.is_empty() {
                return Some((token.to_string(), DownstreamKeySource::AuthorizationBearer));
            }
        }
    }

    // 2) x-api-key
    if let Some(value) = headers.get("x-api-key")
        && let Ok(s) = value.to_str()
    {
        let s = s.trim();
        if !s.is_empty() {
            return Some((s.to_string(), DownstreamKeySource::XApiKey));
        }
    }

    // 3) x-goog-api-key
    if let Some(value) = headers.get("x-goog-api-key")
        && let Ok(s) = value.to_str()
    {
        let s = s.trim();
        if !s.is_empty() {
            return Some((s.to_string(), DownstreamKeySource::XGoogApiKey));
        }
    }

    // 4) query: ?key=...
    let q = query?;
    let pairs = serde_urlencoded::from_str::<Vec<(String, String)>>(q).ok()?;
    pairs
        .into_iter()
        .find(|(k, _)| k == "key")
        .map(|(_, v)| v)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(|v| (v, DownstreamKeySource::QueryKey))
}

fn header_trim(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `x-gproxy-list-models-provider: all` switches a models-list route from
/// the single path-provider to a fan-out across every enabled provider.
fn list_models_fanout_mode(headers: &HeaderMap) -> gproxy_transform::canonical::ListModelsFanoutMode {
    let all_providers = header_trim(headers, "x-gproxy-list-models-provider")
        .map(|v| v.eq_ignore_ascii_case("all"))
        .unwrap_or(false);
    gproxy_transform::canonical::ListModelsFanoutMode { all_providers }
}

/// Mint a per-request `Credential` from `x-gproxy-bedrock-*` headers, letting
/// a caller supply an ad-hoc Bedrock key instead of relying on the stored
/// credential pool. Returns `None` if no direct-key headers are present.
pub(crate) fn extract_direct_key(headers: &HeaderMap) -> Option<Credential> {
    let region = header_trim(headers, "x-gproxy-bedrock-region")?;
    let api_key = header_trim(headers, "x-gproxy-bedrock-api-key");
    let access_key = header_trim(headers, "x-gproxy-bedrock-access-key");
    let secret_key = header_trim(headers, "x-gproxy-bedrock-secret-key");
    let session_token = header_trim(headers, "x-gproxy-bedrock-session-token");

    if api_key.is_none() && (access_key.is_none() || secret_key.is_none()) {
        return None;
    }

    Some(Credential::Bedrock(BedrockCredential {
        api_key,
        access_key,
        secret_key,
        session_token,
        region,
    }))
}

const DIRECT_KEY_HEADERS: &[&str] = &[
    "x-gproxy-bedrock-api-key",
    "x-gproxy-bedrock-access-key",
    "x-gproxy-bedrock-secret-key",
    "x-gproxy-bedrock-session-token",
    "x-gproxy-bedrock-region",
];

#[derive(Debug, Clone, Serialize)]
struct AggregateErrorItem {
    provider: String,
    status: u16,
    error: String,
    detail: serde_json::Value,
}

// ---- Aggregate (no provider prefix) ----

async fn claude_messages_aggregate(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    headers: HeaderMap,
    Json(mut body): Json<claude::create_message::request::CreateMessageRequestBody>,
) -> Response {
    let model = claude_model_to_string_for_route(&body.model);
    let Some((provider, model)) = split_provider_model(&model) else {
        return (StatusCode::BAD_REQUEST, "missing_provider_prefix").into_response();
    };
    body.model = claude::count_tokens::types::Model::Custom(model);

    let anthropic_headers = parse_anthropic_headers(&headers);
    let stream = body.stream.unwrap_or(false);
    let op = if stream {
        Op::StreamGenerateContent
    } else {
        Op::GenerateContent
    };
    let req = claude::create_message::request::CreateMessageRequest {
        headers: anthropic_headers,
        body,
    };
    let call = ProxyCall::Protocol {
        trace_id: Some(trace_id.0.clone()),
        auth,
        provider: provider.clone(),
        response_model_prefix_provider: Some(provider),
        user_proto: Proto::Claude,
        user_op: op,
        req: Box::new(Request::GenerateContent(MwGenerateContentRequest::Claude(
            req,
        ))),
    };
    to_axum_response(state.engine.handle(call).await)
}

async fn claude_count_tokens_aggregate(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    headers: HeaderMap,
    Json(mut body): Json<claude::count_tokens::request::CountTokensRequestBody>,
) -> Response {
    let model = claude_model_to_string_for_route(&body.model);
    let Some((provider, model)) = split_provider_model(&model) else {
        return (StatusCode::BAD_REQUEST, "missing_provider_prefix").into_response();
    };
    body.model = claude::count_tokens::types::Model::Custom(model);

    let anthropic_headers = parse_anthropic_headers(&headers);
    let req = claude::count_tokens::request::CountTokensRequest {
        headers: anthropic_headers,
        body,
    };
    let call = ProxyCall::Protocol {
        trace_id: Some(trace_id.0.clone()),
        auth,
        provider: provider.clone(),
        response_model_prefix_provider: Some(provider),
        user_proto: Proto::Claude,
        user_op: Op::CountTokens,
        req: Box::new(Request::CountTokens(MwCountTokensRequest::Claude(req))),
    };
    to_axum_response(state.engine.handle(call).await)
}

async fn openai_chat_completions_aggregate(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Json(mut body): Json<openai::create_chat_completions::request::CreateChatCompletionRequestBody>,
) -> Response {
    let Some((provider, model)) = split_provider_model(&body.model) else {
        return (StatusCode::BAD_REQUEST, "missing_provider_prefix").into_response();
    };
    body.model = model;
    apply_openai_chat_stream_defaults(&mut body);
    let stream = body.stream.unwrap_or(false);
    let op = if stream {
        Op::StreamGenerateContent
    } else {
        Op::GenerateContent
    };
    let req = openai::create_chat_completions::request::CreateChatCompletionRequest { body };
    let call = ProxyCall::Protocol {
        trace_id: Some(trace_id.0.clone()),
        auth,
        provider: provider.clone(),
        response_model_prefix_provider: Some(provider),
        user_proto: Proto::OpenAIChat,
        user_op: op,
        req: Box::new(Request::GenerateContent(
            MwGenerateContentRequest::OpenAIChat(req),
        )),
    };
    to_axum_response(state.engine.handle(call).await)
}

async fn openai_responses_aggregate(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some((provider, body)) = split_provider_and_rewrite_model_from_openai_body(&body) else {
        return (StatusCode::BAD_REQUEST, "missing_provider_prefix").into_response();
    };
    forward_openai_responses_passthrough(
        state,
        auth,
        trace_id.0,
        provider,
        "/v1/responses".to_string(),
        method,
        query,
        headers,
        body,
    )
    .await
}

async fn openai_responses_compact_aggregate(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some((provider, body)) = split_provider_and_rewrite_model_from_openai_body(&body) else {
        return (StatusCode::BAD_REQUEST, "missing_provider_prefix").into_response();
    };
    if provider != "codex" {
        return (StatusCode::NOT_IMPLEMENTED, "unsupported_operation").into_response();
    }
    forward_openai_responses_passthrough(
        state,
        auth,
        trace_id.0,
        provider,
        "/v1/responses/compact".to_string(),
        method,
        query,
        headers,
        body,
    )
    .await
}

async fn openai_input_tokens_aggregate(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Json(mut body): Json<openai::count_tokens::request::InputTokenCountRequestBody>,
) -> Response {
    let Some((provider, model)) = split_provider_model(&body.model) else {
        return (StatusCode::BAD_REQUEST, "missing_provider_prefix").into_response();
    };
    body.model = model;
    let req = openai::count_tokens::request::InputTokenCountRequest { body };
    let call = ProxyCall::Protocol {
        trace_id: Some(trace_id.0.clone()),
        auth,
        provider: provider.clone(),
        response_model_prefix_provider: Some(provider),
        user_proto: Proto::OpenAI,
        user_op: Op::CountTokens,
        req: Box::new(Request::CountTokens(MwCountTokensRequest::OpenAI(req))),
    };
    to_axum_response(state.engine.handle(call).await)
}

/// Fans a models-list request out across every enabled provider and merges
/// the results, deduplicated by `provider/model`. Reached from
/// `models_list_v1` when the caller sets `x-gproxy-list-models-provider: all`
/// on the per-provider route, not via a route of its own.
async fn models_list_fanout_all(
    state: ProxyState,
    auth: ProxyAuth,
    trace_id: RequestTraceId,
    key_source: DownstreamKeySource,
    query: Option<String>,
    headers: HeaderMap,
) -> Response {
    let user_proto = if headers.contains_key("anthropic-version") {
        Proto::Claude
    } else if matches!(
        key_source,
        DownstreamKeySource::XGoogApiKey | DownstreamKeySource::QueryKey
    ) {
        Proto::Gemini
    } else {
        Proto::OpenAI
    };

    let providers = state.engine.enabled_provider_names();
    let anthropic_headers = parse_anthropic_headers(&headers);
    let claude_query: claude::list_models::request::ListModelsQuery = query
        .as_deref()
        .and_then(|q| serde_urlencoded::from_str(q).ok())
        .unwrap_or_default();
    let gemini_query: gemini::list_models::request::ListModelsQuery = query
        .as_deref()
        .and_then(|q| serde_urlencoded::from_str(q).ok())
        .unwrap_or_default();

    let mut errors: Vec<AggregateErrorItem> = Vec::new();
    let mut out_items: Vec<serde_json::Value> = Vec::new();

    for provider in providers {
        let req = match user_proto {
            Proto::Claude => Request::ModelList(MwModelListRequest::Claude(
                claude::list_models::request::ListModelsRequest {
                    headers: anthropic_headers.clone(),
                    query: claude_query.clone(),
                },
            )),
            Proto::Gemini => Request::ModelList(MwModelListRequest::Gemini(
                gemini::list_models::request::ListModelsRequest {
                    query: gemini_query.clone(),
                },
            )),
            Proto::OpenAI => Request::ModelList(MwModelListRequest::OpenAI(
                openai::list_models::request::ListModelsRequest,
            )),
            _ => return (StatusCode::BAD_REQUEST, "unsupported_operation").into_response(),
        };

        let call = ProxyCall::Protocol {
            trace_id: Some(trace_id.0.clone()),
            auth: auth.clone(),
            provider: provider.clone(),
            response_model_prefix_provider: Some(provider.clone()),
            user_proto,
            user_op: Op::ModelList,
            req: Box::new(req),
        };
        let resp = state.engine.handle(call).await;
        if (200..300).contains(&resp.status) {
            let Some(bytes) = response_body_bytes(&resp.body) else {
                errors.push(AggregateErrorItem {
                    provider,
                    status: 502,
                    error: "upstream_body_missing".to_string(),
                    detail: serde_json::Value::Null,
                });
                continue;
            };
            match user_proto {
                Proto::Claude => {
                    match serde_json::from_slice::<claude::list_models::response::ListModelsResponse>(
                        &bytes,
                    ) {
                        Ok(list) => {
                            for item in list.data {
                                out_items.push(
                                    serde_json::to_value(item).unwrap_or(serde_json::Value::Null),
                                );
                            }
                        }
                        Err(err) => errors.push(AggregateErrorItem {
                            provider,
                            status: 502,
                            error: "decode_response_failed".to_string(),
                            detail: serde_json::Value::String(err.to_string()),
                        }),
                    }
                }
                Proto::Gemini => {
                    match serde_json::from_slice::<gemini::list_models::response::ListModelsResponse>(
                        &bytes,
                    ) {
                        Ok(list) => {
                            for item in list.models {
                                out_items.push(
                                    serde_json::to_value(item).unwrap_or(serde_json::Value::Null),
                                );
                            }
                        }
                        Err(err) => errors.push(AggregateErrorItem {
                            provider,
                            status: 502,
                            error: "decode_response_failed".to_string(),
                            detail: serde_json::Value::String(err.to_string()),
                        }),
                    }
                }
                Proto::OpenAI => {
                    match serde_json::from_slice::<openai::list_models::response::ListModelsResponse>(
                        &bytes,
                    ) {
                        Ok(list) => {
                            for item in list.data {
                                out_items.push(
                                    serde_json::to_value(item).unwrap_or(serde_json::Value::Null),
                                );
                            }
                        }
                        Err(err) => errors.push(AggregateErrorItem {
                            provider,
                            status: 502,
                            error: "decode_response_failed".to_string(),
                            detail: serde_json::Value::String(err.to_string()),
                        }),
                    }
                }
                _ => {}
            }
            continue;
        }

        let (error, detail) = parse_upstream_error(&resp);
        if is_silent_aggregate_error(&error) {
            continue;
        }
        errors.push(AggregateErrorItem {
            provider,
            status: resp.status,
            error,
            detail,
        });
    }

    let partial = !errors.is_empty();
    let out_items = dedup_model_items(out_items, if user_proto == Proto::Gemini { "name" } else { "id" });
    let payload = match user_proto {
        Proto::Claude => serde_json::json!({
            "data": out_items,
            "first_id": serde_json::Value::Null,
            "has_more": false,
            "last_id": serde_json::Value::Null,
            "partial": partial,
        }),
        Proto::Gemini => serde_json::json!({
            "models": out_items,
            "nextPageToken": serde_json::Value::Null,
            "partial": partial,
        }),
        Proto::OpenAI => serde_json::json!({
            "object": "list",
            "data": out_items,
            "partial": partial,
        }),
        _ => serde_json::json!({
            "error": "unsupported_operation"
        }),
    };
    (StatusCode::OK, Json(payload)).into_response()
}

async fn models_get_v1_aggregate(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Extension(key_source): Extension<DownstreamKeySource>,
    Path(model): Path<String>,
    headers: HeaderMap,
) -> Response {
    let Some((provider, model)) = split_provider_model(&model) else {
        return (StatusCode::BAD_REQUEST, "missing_provider_prefix").into_response();
    };
    models_get_v1_inner(
        state,
        auth,
        key_source,
        ProviderRouteCtx {
            provider: provider.clone(),
            response_model_prefix_provider: Some(provider),
        },
        model,
        trace_id.0,
        headers,
    )
    .await
}

async fn gemini_models_list_aggregate(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Query(query): Query<gemini::list_models::request::ListModelsQuery>,
) -> Response {
    let providers = state.engine.enabled_provider_names();
    let mut errors: Vec<AggregateErrorItem> = Vec::new();
    let mut out_items: Vec<serde_json::Value> = Vec::new();

    for provider in providers {
        let req = Request::ModelList(MwModelListRequest::Gemini(
            gemini::list_models::request::ListModelsRequest {
                query: query.clone(),
            },
        ));
        let call = ProxyCall::Protocol {
            trace_id: Some(trace_id.0.clone()),
            auth: auth.clone(),
            provider: provider.clone(),
            response_model_prefix_provider: Some(provider.clone()),
            user_proto: Proto::Gemini,
            user_op: Op::ModelList,
            req: Box::new(req),
        };
        let resp = state.engine.handle(call).await;
        if (200..300).contains(&resp.status) {
            let Some(bytes) = response_body_bytes(&resp.body) else {
                errors.push(AggregateErrorItem {
                    provider,
                    status: 502,
                    error: "upstream_body_missing".to_string(),
                    detail: serde_json::Value::Null,
                });
                continue;
            };
            match serde_json::from_slice::<gemini::list_models::response::ListModelsResponse>(
                &bytes,
            ) {
                Ok(list) => {
                    for item in list.models {
                        out_items
                            .push(serde_json::to_value(item).unwrap_or(serde_json::Value::Null));
                    }
                }
                Err(err) => errors.push(AggregateErrorItem {
                    provider,
                    status: 502,
                    error: "decode_response_failed".to_string(),
                    detail: serde_json::Value::String(err.to_string()),
                }),
            }
            continue;
        }

        let (error, detail) = parse_upstream_error(&resp);
        if is_silent_aggregate_error(&error) {
            continue;
        }
        errors.push(AggregateErrorItem {
            provider,
            status: resp.status,
            error,
            detail,
        });
    }

    let out_items = dedup_model_items(out_items, "name");
    let payload = serde_json::json!({
        "models": out_items,
        "nextPageToken": serde_json::Value::Null,
        "partial": !errors.is_empty(),
    });
    (StatusCode::OK, Json(payload)).into_response()
}

async fn gemini_models_get_aggregate(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path(name): Path<String>,
) -> Response {
    let Some((provider, name)) = split_provider_model(&name) else {
        return (StatusCode::BAD_REQUEST, "missing_provider_prefix").into_response();
    };
    let req = gemini::get_model::request::GetModelRequest {
        path: gemini::get_model::request::GetModelPath {
            name: format!("models/{name}"),
        },
    };
    let call = ProxyCall::Protocol {
        trace_id: Some(trace_id.0.clone()),
        auth,
        provider: provider.clone(),
        response_model_prefix_provider: Some(provider),
        user_proto: Proto::Gemini,
        user_op: Op::ModelGet,
        req: Box::new(Request::ModelGet(MwModelGetRequest::Gemini(req))),
    };
    to_axum_response(state.engine.handle(call).await)
}

async fn gemini_post_aggregate(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path(model_action): Path<String>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Response {
    let Some((provider, model, action)) = split_provider_model_action(&model_action) else {
        return (StatusCode::BAD_REQUEST, "missing_provider_prefix").into_response();
    };
    gemini_post_impl(
        state,
        auth,
        ProviderRouteCtx {
            provider: provider.clone(),
            response_model_prefix_provider: Some(provider),
        },
        format!("{model}:{action}"),
        trace_id.0,
        query,
        body,
    )
    .await
}

fn split_provider_model(input: &str) -> Option<(String, String)> {
    let raw = input.trim().trim_start_matches('/');
    let raw = raw.strip_prefix("models/").unwrap_or(raw);
    let (provider, model) = raw.split_once('/')?;
    let provider = provider.trim();
    let model = model.trim();
    if provider.is_empty() || model.is_empty() {
        return None;
    }
    Some((provider.to_string(), model.to_string()))
}

fn split_provider_model_action(input: &str) -> Option<(String, String, String)> {
    let raw = input.trim().trim_start_matches('/');
    let (model, action) = raw.split_once(':')?;
    let (provider, model) = split_provider_model(model)?;
    let action = action.trim();
    if action.is_empty() {
        return None;
    }
    Some((provider, model, action.to_string()))
}

fn claude_model_to_string_for_route(model: &claude::count_tokens::types::Model) -> String {
    match model {
        claude::count_tokens::types::Model::Custom(v) => v.clone(),
        claude::count_tokens::types::Model::Known(v) => serde_json::to_string(v)
            .unwrap_or_else(|_| format!("{v:?}"))
            .trim_matches('"')
            .to_string(),
    }
}

fn response_body_bytes(body: &UpstreamBody) -> Option<Bytes> {
    match body {
        UpstreamBody::Bytes(b) => Some(b.clone()),
        UpstreamBody::Stream(_) => None,
    }
}

fn parse_upstream_error(resp: &UpstreamHttpResponse) -> (String, serde_json::Value) {
    let Some(bytes) = response_body_bytes(&resp.body) else {
        return ("upstream_error".to_string(), serde_json::Value::Null);
    };
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(&bytes) else {
        return ("upstream_error".to_string(), serde_json::Value::Null);
    };
    let error = value
        .get("error")
        .and_then(|v| v.as_str())
        .unwrap_or("upstream_error")
        .to_string();
    let detail = value
        .get("detail")
        .cloned()
        .unwrap_or(serde_json::Value::Null);
    (error, detail)
}

fn is_silent_aggregate_error(error: &str) -> bool {
    matches!(
        error,
        "no_active_credentials" | "unsupported_operation" | "provider_disabled"
    )
}

/// Dedup a fanned-out model list by `id_key` (`"id"` for Claude/OpenAI,
/// `"name"` for Gemini), keeping the first occurrence seen across providers.
fn dedup_model_items(items: Vec<serde_json::Value>, id_key: &str) -> Vec<serde_json::Value> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| match item.get(id_key).and_then(|v| v.as_str()) {
            Some(id) => seen.insert(id.to_string()),
            None => true,
        })
        .collect()
}

// ---- Internal: oauth ----

async fn oauth_start(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path(provider): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let call = ProxyCall::OAuthStart {
        trace_id: Some(trace_id.0.clone()),
        auth,
        provider,
        req: OAuthStartRequest {
            query,
            headers: headers_to_vec(&headers),
        },
    };
    to_axum_response(state.engine.handle(call).await)
}

async fn oauth_callback(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path(provider): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let call = ProxyCall::OAuthCallback {
        trace_id: Some(trace_id.0.clone()),
        auth,
        provider,
        req: OAuthCallbackRequest {
            query,
            headers: headers_to_vec(&headers),
        },
    };
    to_axum_response(state.engine.handle(call).await)
}

async fn upstream_usage(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path(provider): Path<String>,
    Query(query): Query<UpstreamUsageQuery>,
) -> Response {
    let call = ProxyCall::UpstreamUsage {
        trace_id: Some(trace_id.0.clone()),
        auth,
        provider,
        credential_id: query.credential_id,
    };
    to_axum_response(state.engine.handle(call).await)
}

#[derive(Debug, Clone, Deserialize)]
struct UpstreamUsageQuery {
    credential_id: i64,
}

// ---- Claude ----

async fn claude_messages(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path(provider): Path<String>,
    headers: HeaderMap,
    Json(body): Json<claude::create_message::request::CreateMessageRequestBody>,
) -> Response {
    let anthropic_headers = parse_anthropic_headers(&headers);
    let stream = body.stream.unwrap_or(false);
    let op = if stream {
        Op::StreamGenerateContent
    } else {
        Op::GenerateContent
    };
    let req = claude::create_message::request::CreateMessageRequest {
        headers: anthropic_headers,
        body,
    };
    let call = ProxyCall::Protocol {
        trace_id: Some(trace_id.0.clone()),
        auth,
        provider,
        response_model_prefix_provider: None,
        user_proto: Proto::Claude,
        user_op: op,
        req: Box::new(Request::GenerateContent(MwGenerateContentRequest::Claude(
            req,
        ))),
    };
    to_axum_response(state.engine.handle(call).await)
}

async fn claude_count_tokens(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path(provider): Path<String>,
    headers: HeaderMap,
    Json(body): Json<claude::count_tokens::request::CountTokensRequestBody>,
) -> Response {
    let anthropic_headers = parse_anthropic_headers(&headers);
    let req = claude::count_tokens::request::CountTokensRequest {
        headers: anthropic_headers,
        body,
    };
    let call = ProxyCall::Protocol {
        trace_id: Some(trace_id.0.clone()),
        auth,
        provider,
        response_model_prefix_provider: None,
        user_proto: Proto::Claude,
        user_op: Op::CountTokens,
        req: Box::new(Request::CountTokens(MwCountTokensRequest::Claude(req))),
    };
    to_axum_response(state.engine.handle(call).await)
}

// ---- Claude native ops (message batches, files) ----
//
// Same passthrough shape as the OpenAI resource ops: no cross-dialect
// transform, so the upstream response goes back unmodified.

async fn claude_batches_create(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path(provider): Path<String>,
    headers: HeaderMap,
    Json(body): Json<claude::batches::request::CreateMessageBatchRequestBody>,
) -> Response {
    let req = ClaudeResourceRequest::BatchCreate(claude::batches::request::CreateMessageBatchRequest {
        body,
        headers: parse_anthropic_headers(&headers),
    });
    claude_resource_call(state, auth, trace_id.0, provider, req).await
}

#[derive(Debug, Clone, Deserialize, Default)]
struct ListMessageBatchesQuery {
    before_id: Option<String>,
    after_id: Option<String>,
    limit: Option<i64>,
}

async fn claude_batches_list(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path(provider): Path<String>,
    Query(query): Query<ListMessageBatchesQuery>,
    headers: HeaderMap,
) -> Response {
    let req = ClaudeResourceRequest::BatchList(claude::batches::request::ListMessageBatchesRequest {
        before_id: query.before_id,
        after_id: query.after_id,
        limit: query.limit,
        headers: parse_anthropic_headers(&headers),
    });
    claude_resource_call(state, auth, trace_id.0, provider, req).await
}

async fn claude_batches_get(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path((provider, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    let req = ClaudeResourceRequest::BatchGet(claude::batches::request::GetMessageBatchRequest {
        batch_id: id,
        headers: parse_anthropic_headers(&headers),
    });
    claude_resource_call(state, auth, trace_id.0, provider, req).await
}

async fn claude_batches_cancel(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path((provider, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    let req =
        ClaudeResourceRequest::BatchCancel(claude::batches::request::CancelMessageBatchRequest {
            batch_id: id,
            headers: parse_anthropic_headers(&headers),
        });
    claude_resource_call(state, auth, trace_id.0, provider, req).await
}

// ---- Gemini native ops (batches, files) ----
//
// The wire-native `/v1beta/{name=batches/*}` shape isn't path-segment-safe
// for a flat `{id}` route, so these expose the same flattened
// `batches-XYZ`/`files-XYZ` id as the response canonicalizer produces; see
// `canonicalize_gemini_resource_names`.

#[derive(Debug, Clone, Deserialize, Default)]
struct ListGeminiBatchesQuery {
    page_size: Option<i64>,
    page_token: Option<String>,
}

async fn gemini_batches_list(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path(provider): Path<String>,
    Query(query): Query<ListGeminiBatchesQuery>,
) -> Response {
    let req = GeminiResourceRequest::BatchList(gemini::batches::request::ListBatchesRequest {
        page_size: query.page_size,
        page_token: query.page_token,
    });
    gemini_resource_call(state, auth, trace_id.0, provider, req).await
}

async fn gemini_batches_get(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path((provider, id)): Path<(String, String)>,
) -> Response {
    let req = GeminiResourceRequest::BatchGet(gemini::batches::request::GetBatchRequest {
        name: format!("batches-{id}"),
    });
    gemini_resource_call(state, auth, trace_id.0, provider, req).await
}

async fn gemini_batches_delete(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path((provider, id)): Path<(String, String)>,
) -> Response {
    let req = GeminiResourceRequest::BatchDelete(gemini::batches::request::DeleteBatchRequest {
        name: format!("batches-{id}"),
    });
    gemini_resource_call(state, auth, trace_id.0, provider, req).await
}

async fn gemini_batches_cancel(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path((provider, id)): Path<(String, String)>,
) -> Response {
    let req = GeminiResourceRequest::BatchCancel(gemini::batches::request::CancelBatchRequest {
        name: format!("batches-{id}"),
    });
    gemini_resource_call(state, auth, trace_id.0, provider, req).await
}

async fn gemini_files_create(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path(provider): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mime_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();
    let display_name = headers
        .get("x-goog-upload-file-name")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    let req = GeminiResourceRequest::FileCreate(gemini::files::request::CreateFileRequest {
        file: body,
        display_name,
        mime_type,
    });
    gemini_resource_call(state, auth, trace_id.0, provider, req).await
}

#[derive(Debug, Clone, Deserialize, Default)]
struct ListGeminiFilesQuery {
    page_size: Option<i64>,
    page_token: Option<String>,
}

async fn gemini_files_list(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path(provider): Path<String>,
    Query(query): Query<ListGeminiFilesQuery>,
) -> Response {
    let req = GeminiResourceRequest::FileList(gemini::files::request::ListFilesRequest {
        page_size: query.page_size,
        page_token: query.page_token,
    });
    gemini_resource_call(state, auth, trace_id.0, provider, req).await
}

async fn gemini_files_get(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path((provider, id)): Path<(String, String)>,
) -> Response {
    let req = GeminiResourceRequest::FileGet(gemini::files::request::GetFileRequest {
        name: format!("files-{id}"),
    });
    gemini_resource_call(state, auth, trace_id.0, provider, req).await
}

async fn gemini_files_delete(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path((provider, id)): Path<(String, String)>,
) -> Response {
    let req = GeminiResourceRequest::FileDelete(gemini::files::request::DeleteFileRequest {
        name: format!("files-{id}"),
    });
    gemini_resource_call(state, auth, trace_id.0, provider, req).await
}

async fn models_list_v1(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Extension(key_source): Extension<DownstreamKeySource>,
    Path(provider): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    if list_models_fanout_mode(&headers).all_providers {
        return models_list_fanout_all(state, auth, trace_id, key_source, query, headers).await;
    }

    if headers.contains_key("anthropic-version") {
        let anthropic_headers = parse_anthropic_headers(&headers);
        let claude_query: claude::list_models::request::ListModelsQuery = query
            .as_deref()
            .and_then(|q| serde_urlencoded::from_str(q).ok())
            .unwrap_or_default();
        let req = claude::list_models::request::ListModelsRequest {
            headers: anthropic_headers,
            query: claude_query,
        };
        let call = ProxyCall::Protocol {
            trace_id: Some(trace_id.0.clone()),
            auth,
            provider,
            response_model_prefix_provider: None,
            user_proto: Proto::Claude,
            user_op: Op::ModelList,
            req: Box::new(Request::ModelList(MwModelListRequest::Claude(req))),
        };
        return to_axum_response(state.engine.handle(call).await);
    }

    // Gemini v1 models list (disambiguate by downstream auth style).
    if matches!(
        key_source,
        DownstreamKeySource::XGoogApiKey | DownstreamKeySource::QueryKey
    ) {
        let gemini_query: gemini::list_models::request::ListModelsQuery = query
            .as_deref()
            .and_then(|q| serde_urlencoded::from_str(q).ok())
            .unwrap_or_default();
        let req = gemini::list_models::request::ListModelsRequest {
            query: gemini_query,
        };
        let call = ProxyCall::Protocol {
            trace_id: Some(trace_id.0.clone()),
            auth,
            provider,
            response_model_prefix_provider: None,
            user_proto: Proto::Gemini,
            user_op: Op::ModelList,
            req: Box::new(Request::ModelList(MwModelListRequest::Gemini(req))),
        };
        return to_axum_response(state.engine.handle(call).await);
    }

    // Default: OpenAI models list.
    let req = openai::list_models::request::ListModelsRequest;
    let call = ProxyCall::Protocol {
        trace_id: Some(trace_id.0.clone()),
        auth,
        provider,
        response_model_prefix_provider: None,
        user_proto: Proto::OpenAI,
        user_op: Op::ModelList,
        req: Box::new(Request::ModelList(MwModelListRequest::OpenAI(req))),
    };
    to_axum_response(state.engine.handle(call).await)
}

async fn models_get_v1(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Extension(key_source): Extension<DownstreamKeySource>,
    Path((provider, model)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    models_get_v1_inner(
        state,
        auth,
        key_source,
        ProviderRouteCtx {
            provider,
            response_model_prefix_provider: None,
        },
        model.trim_start_matches('/').to_string(),
        trace_id.0,
        headers,
    )
    .await
}

async fn models_get_v1_inner(
    state: ProxyState,
    auth: ProxyAuth,
    key_source: DownstreamKeySource,
    route_ctx: ProviderRouteCtx,
    model: String,
    trace_id: String,
    headers: HeaderMap,
) -> Response {
    let provider = route_ctx.provider;
    let response_model_prefix_provider = route_ctx.response_model_prefix_provider;
    if headers.contains_key("anthropic-version") {
        let anthropic_headers = parse_anthropic_headers(&headers);
        let req = claude::get_model::request::GetModelRequest {
            headers: anthropic_headers,
            path: claude::get_model::request::GetModelPath { model_id: model },
        };
        let call = ProxyCall::Protocol {
            trace_id: Some(trace_id.clone()),
            auth,
            provider,
            response_model_prefix_provider,
            user_proto: Proto::Claude,
            user_op: Op::ModelGet,
            req: Box::new(Request::ModelGet(MwModelGetRequest::Claude(req))),
        };
        return to_axum_response(state.engine.handle(call).await);
    }

    // Gemini v1 getModel (disambiguate by downstream auth style).
    if matches!(
        key_source,
        DownstreamKeySource::XGoogApiKey | DownstreamKeySource::QueryKey
    ) {
        let req = gemini::get_model::request::GetModelRequest {
            path: gemini::get_model::request::GetModelPath {
                name: format!("models/{model}"),
            },
        };
        let call = ProxyCall::Protocol {
            trace_id: Some(trace_id.clone()),
            auth,
            provider,
            response_model_prefix_provider,
            user_proto: Proto::Gemini,
            user_op: Op::ModelGet,
            req: Box::new(Request::ModelGet(MwModelGetRequest::Gemini(req))),
        };
        return to_axum_response(state.engine.handle(call).await);
    }

    let req = openai::get_model::request::GetModelRequest {
        path: openai::get_model::request::GetModelPath { model },
    };
    let call = ProxyCall::Protocol {
        trace_id: Some(trace_id),
        auth,
        provider,
        response_model_prefix_provider,
        user_proto: Proto::OpenAI,
        user_op: Op::ModelGet,
        req: Box::new(Request::ModelGet(MwModelGetRequest::OpenAI(req))),
    };
    to_axum_response(state.engine.handle(call).await)
}

// ---- OpenAI ----

async fn openai_chat_completions(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path(provider): Path<String>,
    Json(mut body): Json<openai::create_chat_completions::request::CreateChatCompletionRequestBody>,
) -> Response {
    apply_openai_chat_stream_defaults(&mut body);
    let stream = body.stream.unwrap_or(false);
    let op = if stream {
        Op::StreamGenerateContent
    } else {
        Op::GenerateContent
    };
    let req = openai::create_chat_completions::request::CreateChatCompletionRequest { body };
    let call = ProxyCall::Protocol {
        trace_id: Some(trace_id.0.clone()),
        auth,
        provider,
        response_model_prefix_provider: None,
        user_proto: Proto::OpenAIChat,
        user_op: op,
        req: Box::new(Request::GenerateContent(
            MwGenerateContentRequest::OpenAIChat(req),
        )),
    };
    to_axum_response(state.engine.handle(call).await)
}

fn apply_openai_chat_stream_defaults(
    body: &mut openai::create_chat_completions::request::CreateChatCompletionRequestBody,
) {
    if !body.stream.unwrap_or(false) {
        return;
    }
    let opts = body.stream_options.get_or_insert(
        openai::create_chat_completions::types::ChatCompletionStreamOptions {
            include_usage: None,
            include_obfuscation: None,
        },
    );
    if opts.include_usage.is_none() {
        opts.include_usage = Some(true);
    }
}

#[allow(clippy::too_many_arguments)]
async fn forward_openai_responses_passthrough(
    state: ProxyState,
    auth: ProxyAuth,
    trace_id: String,
    provider: String,
    path: String,
    method: Method,
    query: Option<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(method) = gproxy_provider_core::HttpMethod::parse(method.as_str()) else {
        return (StatusCode::METHOD_NOT_ALLOWED, "method_not_allowed").into_response();
    };
    let is_stream = openai_responses_stream_hint(method, &headers, &body);
    let req = OpenAIResponsesPassthroughRequest {
        method,
        path,
        query,
        headers: headers_to_vec(&headers),
        body: if body.is_empty() { None } else { Some(body) },
        is_stream,
    };
    let call = ProxyCall::OpenAIResponsesPassthrough {
        trace_id: Some(trace_id),
        auth,
        provider,
        req,
    };
    to_axum_response(state.engine.handle(call).await)
}

fn split_provider_and_rewrite_model_from_openai_body(body: &Bytes) -> Option<(String, Bytes)> {
    let mut value = serde_json::from_slice::<serde_json::Value>(body).ok()?;
    let obj = value.as_object_mut()?;
    let model = obj.get("model")?.as_str()?;
    let (provider, model) = split_provider_model(model)?;
    obj.insert("model".to_string(), serde_json::Value::String(model));
    let body = serde_json::to_vec(&value).ok()?;
    Some((provider, Bytes::from(body)))
}

fn openai_responses_stream_hint(
    method: gproxy_provider_core::HttpMethod,
    headers: &HeaderMap,
    body: &Bytes,
) -> bool {
    if matches!(
        method,
        gproxy_provider_core::HttpMethod::Get | gproxy_provider_core::HttpMethod::Delete
    ) {
        return false;
    }
    if headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase().contains("text/event-stream"))
        .unwrap_or(false)
    {
        return true;
    }
    if body.is_empty() {
        return false;
    }
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("stream").and_then(|s| s.as_bool()))
        .unwrap_or(false)
}

#[allow(clippy::too_many_arguments)]
async fn openai_responses_passthrough(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path(provider): Path<String>,
    method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    forward_openai_responses_passthrough(
        state,
        auth,
        trace_id.0,
        provider,
        "/v1/responses".to_string(),
        method,
        query,
        headers,
        body,
    )
    .await
}

#[allow(clippy::too_many_arguments)]
async fn openai_responses_passthrough_rest(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path((provider, rest)): Path<(String, String)>,
    method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = format!("/v1/responses/{}", rest.trim_start_matches('/'));
    forward_openai_responses_passthrough(
        state, auth, trace_id.0, provider, path, method, query, headers, body,
    )
    .await
}

async fn openai_input_tokens(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path(provider): Path<String>,
    Json(body): Json<openai::count_tokens::request::InputTokenCountRequestBody>,
) -> Response {
    let req = openai::count_tokens::request::InputTokenCountRequest { body };
    let call = ProxyCall::Protocol {
        trace_id: Some(trace_id.0.clone()),
        auth,
        provider,
        response_model_prefix_provider: None,
        user_proto: Proto::OpenAI,
        user_op: Op::CountTokens,
        req: Box::new(Request::CountTokens(MwCountTokensRequest::OpenAI(req))),
    };
    to_axum_response(state.engine.handle(call).await)
}

// ---- OpenAI resource ops (embeddings/speech/transcriptions/images/batches/files/containers) ----
//
// None of these have a cross-dialect transform today, so the response is
// forwarded to the caller unmodified via `to_axum_response`.

async fn openai_resource_call(
    state: ProxyState,
    auth: ProxyAuth,
    trace_id: String,
    provider: String,
    req: OpenAIResourceRequest,
) -> Response {
    let call = ProxyCall::OpenAIResource {
        trace_id: Some(trace_id),
        auth,
        provider,
        req,
    };
    to_axum_response(state.engine.handle(call).await)
}

async fn claude_resource_call(
    state: ProxyState,
    auth: ProxyAuth,
    trace_id: String,
    provider: String,
    req: ClaudeResourceRequest,
) -> Response {
    let call = ProxyCall::ClaudeResource {
        trace_id: Some(trace_id),
        auth,
        provider,
        req,
    };
    to_axum_response(state.engine.handle(call).await)
}

async fn gemini_resource_call(
    state: ProxyState,
    auth: ProxyAuth,
    trace_id: String,
    provider: String,
    req: GeminiResourceRequest,
) -> Response {
    let call = ProxyCall::GeminiResource {
        trace_id: Some(trace_id),
        auth,
        provider,
        req,
    };
    to_axum_response(canonicalize_gemini_resource_names(
        state.engine.handle(call).await,
    ))
}

/// Rewrite native Gemini `batches/XYZ`/`files/XYZ` resource names in a
/// response body back to the flat `batches-XYZ`/`files-XYZ` form used on the
/// client-facing routes, mirroring `canonicalize_bedrock_job_arns`.
fn canonicalize_gemini_resource_names(resp: UpstreamHttpResponse) -> UpstreamHttpResponse {
    let UpstreamBody::Bytes(bytes) = &resp.body else {
        return resp;
    };
    let Ok(mut value) = serde_json::from_slice::<serde_json::Value>(bytes) else {
        return resp;
    };
    fn canonicalize_name(s: &str) -> Option<String> {
        if s.starts_with("batches/") {
            Some(gproxy_transform::canonical::ids::gemini_batch_id_to_canonical(s))
        } else if s.starts_with("files/") {
            Some(gproxy_transform::canonical::ids::gemini_file_id_to_canonical(s))
        } else {
            None
        }
    }
    fn walk(value: &mut serde_json::Value) {
        match value {
            serde_json::Value::Object(map) => {
                if let Some(name) = map.get_mut("name") {
                    if let Some(s) = name.as_str() {
                        if let Some(canonical) = canonicalize_name(s) {
                            *name = serde_json::Value::String(canonical);
                        }
                    }
                }
                for v in map.values_mut() {
                    walk(v);
                }
            }
            serde_json::Value::Array(items) => {
                for v in items {
                    walk(v);
                }
            }
            _ => {}
        }
    }
    walk(&mut value);
    let Ok(body) = serde_json::to_vec(&value) else {
        return resp;
    };
    UpstreamHttpResponse {
        status: resp.status,
        headers: resp.headers,
        body: UpstreamBody::Bytes(Bytes::from(body)),
    }
}

fn parse_enum_field<T: serde::de::DeserializeOwned>(value: &str) -> Option<T> {
    serde_json::from_value(serde_json::Value::String(value.to_string())).ok()
}

async fn read_multipart_fields(
    mut multipart: Multipart,
) -> Result<Vec<(String, Option<String>, Bytes)>, Response> {
    let mut fields = Vec::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => return Err((StatusCode::BAD_REQUEST, err.to_string()).into_response()),
        };
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(|s| s.to_string());
        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(err) => return Err((StatusCode::BAD_REQUEST, err.to_string()).into_response()),
        };
        fields.push((name, file_name, bytes));
    }
    Ok(fields)
}

fn multipart_text(fields: &[(String, Option<String>, Bytes)], name: &str) -> Option<String> {
    fields
        .iter()
        .find(|(field_name, _, _)| field_name == name)
        .map(|(_, _, bytes)| String::from_utf8_lossy(bytes).into_owned())
}

fn multipart_text_all(fields: &[(String, Option<String>, Bytes)], name: &str) -> Vec<String> {
    fields
        .iter()
        .filter(|(field_name, _, _)| field_name == name)
        .map(|(_, _, bytes)| String::from_utf8_lossy(bytes).into_owned())
        .collect()
}

fn multipart_file(fields: &[(String, Option<String>, Bytes)], name: &str) -> Option<(String, Bytes)> {
    fields
        .iter()
        .find(|(field_name, _, _)| field_name == name)
        .map(|(_, file_name, bytes)| {
            (
                file_name.clone().unwrap_or_else(|| "file".to_string()),
                bytes.clone(),
            )
        })
}

async fn openai_embeddings(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path(provider): Path<String>,
    Json(body): Json<openai::embeddings::CreateEmbeddingRequestBody>,
) -> Response {
    let req =
        OpenAIResourceRequest::Embeddings(openai::embeddings::CreateEmbeddingRequest { body });
    openai_resource_call(state, auth, trace_id.0, provider, req).await
}

async fn openai_speech(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path(provider): Path<String>,
    Json(body): Json<openai::speech::CreateSpeechRequestBody>,
) -> Response {
    let req = OpenAIResourceRequest::Speech(openai::speech::CreateSpeechRequest { body });
    openai_resource_call(state, auth, trace_id.0, provider, req).await
}

async fn openai_transcriptions(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path(provider): Path<String>,
    multipart: Multipart,
) -> Response {
    let fields = match read_multipart_fields(multipart).await {
        Ok(fields) => fields,
        Err(resp) => return resp,
    };
    let Some((file_name, file)) = multipart_file(&fields, "file") else {
        return (StatusCode::BAD_REQUEST, "missing_file").into_response();
    };
    let Some(model) = multipart_text(&fields, "model") else {
        return (StatusCode::BAD_REQUEST, "missing_model").into_response();
    };
    let granularities: Vec<_> = multipart_text_all(&fields, "timestamp_granularities[]")
        .iter()
        .filter_map(|v| parse_enum_field(v))
        .collect();
    let req = OpenAIResourceRequest::Transcription(
        openai::transcriptions::CreateTranscriptionRequest {
            file,
            file_name,
            model,
            language: multipart_text(&fields, "language"),
            prompt: multipart_text(&fields, "prompt"),
            response_format: multipart_text(&fields, "response_format")
                .and_then(|v| parse_enum_field(&v)),
            temperature: multipart_text(&fields, "temperature").and_then(|v| v.parse().ok()),
            timestamp_granularities: if granularities.is_empty() {
                None
            } else {
                Some(granularities)
            },
        },
    );
    openai_resource_call(state, auth, trace_id.0, provider, req).await
}

async fn openai_images_generations(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path(provider): Path<String>,
    Json(body): Json<openai::images::CreateImageRequestBody>,
) -> Response {
    let req =
        OpenAIResourceRequest::ImageGeneration(openai::images::CreateImageRequest { body });
    openai_resource_call(state, auth, trace_id.0, provider, req).await
}

async fn openai_images_edits(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path(provider): Path<String>,
    multipart: Multipart,
) -> Response {
    let fields = match read_multipart_fields(multipart).await {
        Ok(fields) => fields,
        Err(resp) => return resp,
    };
    let image: Vec<Bytes> = fields
        .iter()
        .filter(|(name, _, _)| name == "image" || name == "image[]")
        .map(|(_, _, bytes)| bytes.clone())
        .collect();
    if image.is_empty() {
        return (StatusCode::BAD_REQUEST, "missing_image").into_response();
    }
    let Some(prompt) = multipart_text(&fields, "prompt") else {
        return (StatusCode::BAD_REQUEST, "missing_prompt").into_response();
    };
    let mask = multipart_file(&fields, "mask").map(|(_, bytes)| bytes);
    let body = openai::images::CreateImageRequestBody {
        prompt,
        model: multipart_text(&fields, "model"),
        n: multipart_text(&fields, "n").and_then(|v| v.parse().ok()),
        quality: multipart_text(&fields, "quality"),
        response_format: multipart_text(&fields, "response_format")
            .and_then(|v| parse_enum_field(&v)),
        background: multipart_text(&fields, "background").and_then(|v| parse_enum_field(&v)),
        moderation: multipart_text(&fields, "moderation").and_then(|v| parse_enum_field(&v)),
        output_compression: multipart_text(&fields, "output_compression")
            .and_then(|v| v.parse().ok()),
        output_format: multipart_text(&fields, "output_format"),
        size: multipart_text(&fields, "size"),
        style: multipart_text(&fields, "style"),
        stream: multipart_text(&fields, "stream").and_then(|v| v.parse().ok()),
        user: multipart_text(&fields, "user"),
    };
    let req =
        OpenAIResourceRequest::ImageEdit(openai::images::CreateImageEditRequest { image, mask, body });
    openai_resource_call(state, auth, trace_id.0, provider, req).await
}

async fn openai_batches_create(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path(provider): Path<String>,
    Json(body): Json<openai::batches::request::CreateBatchRequestBody>,
) -> Response {
    let req =
        OpenAIResourceRequest::BatchCreate(openai::batches::request::CreateBatchRequest { body });
    openai_resource_call(state, auth, trace_id.0, provider, req).await
}

#[derive(Debug, Clone, Deserialize, Default)]
struct ListBatchesQuery {
    after: Option<String>,
    limit: Option<i64>,
}

async fn openai_batches_list(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path(provider): Path<String>,
    Query(query): Query<ListBatchesQuery>,
) -> Response {
    let req = OpenAIResourceRequest::BatchList(openai::batches::request::ListBatchesRequest {
        after: query.after,
        limit: query.limit,
    });
    openai_resource_call(state, auth, trace_id.0, provider, req).await
}

async fn openai_batches_get(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path((provider, id)): Path<(String, String)>,
) -> Response {
    let req =
        OpenAIResourceRequest::BatchGet(openai::batches::request::GetBatchRequest { batch_id: id });
    openai_resource_call(state, auth, trace_id.0, provider, req).await
}

async fn openai_batches_cancel(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path((provider, id)): Path<(String, String)>,
) -> Response {
    let req = OpenAIResourceRequest::BatchCancel(openai::batches::request::CancelBatchRequest {
        batch_id: id,
    });
    openai_resource_call(state, auth, trace_id.0, provider, req).await
}

// OpenAI and Claude both expose a `/v1/files` surface; the same route
// disambiguates by the `anthropic-version` header the way `models_list_v1`
// does for models.

async fn openai_files_create(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path(provider): Path<String>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    let fields = match read_multipart_fields(multipart).await {
        Ok(fields) => fields,
        Err(resp) => return resp,
    };
    let Some((file_name, file)) = multipart_file(&fields, "file") else {
        return (StatusCode::BAD_REQUEST, "missing_file").into_response();
    };

    if headers.contains_key("anthropic-version") {
        let media_type = multipart_text(&fields, "media_type")
            .or_else(|| multipart_text(&fields, "content_type"));
        let req = ClaudeResourceRequest::FileCreate(claude::files::request::CreateFileRequest {
            file,
            file_name,
            media_type,
            headers: parse_anthropic_headers(&headers),
        });
        return claude_resource_call(state, auth, trace_id.0, provider, req).await;
    }

    let Some(purpose) = multipart_text(&fields, "purpose").and_then(|v| parse_enum_field(&v))
    else {
        return (StatusCode::BAD_REQUEST, "missing_purpose").into_response();
    };
    let req = OpenAIResourceRequest::FileCreate(openai::files::CreateFileRequest {
        file,
        file_name,
        purpose,
    });
    openai_resource_call(state, auth, trace_id.0, provider, req).await
}

#[derive(Debug, Clone, Deserialize, Default)]
struct ListFilesQuery {
    purpose: Option<openai::files::FilePurpose>,
    before_id: Option<String>,
    after: Option<String>,
    limit: Option<i64>,
}

async fn openai_files_list(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path(provider): Path<String>,
    Query(query): Query<ListFilesQuery>,
    headers: HeaderMap,
) -> Response {
    if headers.contains_key("anthropic-version") {
        let req = ClaudeResourceRequest::FileList(claude::files::request::ListFilesRequest {
            before_id: query.before_id,
            after_id: query.after,
            limit: query.limit,
            headers: parse_anthropic_headers(&headers),
        });
        return claude_resource_call(state, auth, trace_id.0, provider, req).await;
    }
    let req = OpenAIResourceRequest::FileList(openai::files::request::ListFilesRequest {
        purpose: query.purpose,
        after: query.after,
        limit: query.limit,
    });
    openai_resource_call(state, auth, trace_id.0, provider, req).await
}

async fn openai_files_get(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path((provider, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if headers.contains_key("anthropic-version") {
        let req = ClaudeResourceRequest::FileGet(claude::files::request::GetFileRequest {
            file_id: id,
            headers: parse_anthropic_headers(&headers),
        });
        return claude_resource_call(state, auth, trace_id.0, provider, req).await;
    }
    let req =
        OpenAIResourceRequest::FileGet(openai::files::request::GetFileRequest { file_id: id });
    openai_resource_call(state, auth, trace_id.0, provider, req).await
}

async fn openai_files_get_content(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path((provider, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if headers.contains_key("anthropic-version") {
        let req =
            ClaudeResourceRequest::FileGetContent(claude::files::request::GetFileContentRequest {
                file_id: id,
                headers: parse_anthropic_headers(&headers),
            });
        return claude_resource_call(state, auth, trace_id.0, provider, req).await;
    }
    let req = OpenAIResourceRequest::FileGetContent(
        openai::files::request::GetFileContentRequest { file_id: id },
    );
    openai_resource_call(state, auth, trace_id.0, provider, req).await
}

async fn openai_files_delete(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path((provider, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if headers.contains_key("anthropic-version") {
        let req = ClaudeResourceRequest::FileDelete(claude::files::request::DeleteFileRequest {
            file_id: id,
            headers: parse_anthropic_headers(&headers),
        });
        return claude_resource_call(state, auth, trace_id.0, provider, req).await;
    }
    let req = OpenAIResourceRequest::FileDelete(openai::files::request::DeleteFileRequest {
        file_id: id,
    });
    openai_resource_call(state, auth, trace_id.0, provider, req).await
}

async fn openai_containers_create(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path(provider): Path<String>,
    Json(body): Json<openai::containers::request::CreateContainerRequestBody>,
) -> Response {
    let req = OpenAIResourceRequest::ContainerCreate(
        openai::containers::request::CreateContainerRequest { body },
    );
    openai_resource_call(state, auth, trace_id.0, provider, req).await
}

#[derive(Debug, Clone, Deserialize, Default)]
struct ListContainersQuery {
    after: Option<String>,
    limit: Option<i64>,
}

async fn openai_containers_list(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path(provider): Path<String>,
    Query(query): Query<ListContainersQuery>,
) -> Response {
    let req = OpenAIResourceRequest::ContainerList(
        openai::containers::request::ListContainersRequest {
            after: query.after,
            limit: query.limit,
        },
    );
    openai_resource_call(state, auth, trace_id.0, provider, req).await
}

async fn openai_containers_get(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path((provider, id)): Path<(String, String)>,
) -> Response {
    let req = OpenAIResourceRequest::ContainerGet(
        openai::containers::request::GetContainerRequest { container_id: id },
    );
    openai_resource_call(state, auth, trace_id.0, provider, req).await
}

async fn openai_containers_delete(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path((provider, id)): Path<(String, String)>,
) -> Response {
    let req = OpenAIResourceRequest::ContainerDelete(
        openai::containers::request::DeleteContainerRequest { container_id: id },
    );
    openai_resource_call(state, auth, trace_id.0, provider, req).await
}

async fn openai_container_files_create(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path((provider, container_id)): Path<(String, String)>,
    multipart: Multipart,
) -> Response {
    let fields = match read_multipart_fields(multipart).await {
        Ok(fields) => fields,
        Err(resp) => return resp,
    };
    let file = multipart_file(&fields, "file").map(|(_, bytes)| bytes);
    let file_id = multipart_text(&fields, "file_id");
    let req = OpenAIResourceRequest::ContainerFileCreate(
        openai::containers::request::CreateContainerFileRequest {
            container_id,
            file,
            file_id,
        },
    );
    openai_resource_call(state, auth, trace_id.0, provider, req).await
}

#[derive(Debug, Clone, Deserialize, Default)]
struct ListContainerFilesQuery {
    after: Option<String>,
    limit: Option<i64>,
}

async fn openai_container_files_list(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path((provider, container_id)): Path<(String, String)>,
    Query(query): Query<ListContainerFilesQuery>,
) -> Response {
    let req = OpenAIResourceRequest::ContainerFileList(
        openai::containers::request::ListContainerFilesRequest {
            container_id,
            after: query.after,
            limit: query.limit,
        },
    );
    openai_resource_call(state, auth, trace_id.0, provider, req).await
}

async fn openai_container_files_get(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path((provider, container_id, file_id)): Path<(String, String, String)>,
) -> Response {
    let req = OpenAIResourceRequest::ContainerFileGet(
        openai::containers::request::GetContainerFileRequest {
            container_id,
            file_id,
        },
    );
    openai_resource_call(state, auth, trace_id.0, provider, req).await
}

async fn openai_container_files_get_content(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path((provider, container_id, file_id)): Path<(String, String, String)>,
) -> Response {
    let req = OpenAIResourceRequest::ContainerFileGetContent(
        openai::containers::request::GetContainerFileContentRequest {
            container_id,
            file_id,
        },
    );
    openai_resource_call(state, auth, trace_id.0, provider, req).await
}

async fn openai_container_files_delete(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path((provider, container_id, file_id)): Path<(String, String, String)>,
) -> Response {
    let req = OpenAIResourceRequest::ContainerFileDelete(
        openai::containers::request::DeleteContainerFileRequest {
            container_id,
            file_id,
        },
    );
    openai_resource_call(state, auth, trace_id.0, provider, req).await
}

// ---- Cohere native ops (chat/embed/rerank/tokenize) ----
//
// No cross-dialect transform, same passthrough shape as the OpenAI resource
// ops above; chat's SSE stream flows through `to_axum_response` unchanged.

async fn cohere_call(
    state: ProxyState,
    auth: ProxyAuth,
    trace_id: String,
    provider: String,
    req: CohereRequest,
) -> Response {
    let call = ProxyCall::CohereCall {
        trace_id: Some(trace_id),
        auth,
        provider,
        req,
    };
    to_axum_response(state.engine.handle(call).await)
}

async fn cohere_chat(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path(provider): Path<String>,
    Json(body): Json<cohere::chat::ChatRequestBody>,
) -> Response {
    let req = CohereRequest::Chat(cohere::chat::ChatRequest { body });
    cohere_call(state, auth, trace_id.0, provider, req).await
}

async fn cohere_embed(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path(provider): Path<String>,
    Json(body): Json<cohere::embed::EmbedRequestBody>,
) -> Response {
    let req = CohereRequest::Embed(cohere::embed::EmbedRequest { body });
    cohere_call(state, auth, trace_id.0, provider, req).await
}

async fn cohere_rerank(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path(provider): Path<String>,
    Json(body): Json<cohere::rerank::RerankRequestBody>,
) -> Response {
    let req = CohereRequest::Rerank(cohere::rerank::RerankRequest { body });
    cohere_call(state, auth, trace_id.0, provider, req).await
}

async fn cohere_tokenize(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path(provider): Path<String>,
    Json(body): Json<cohere::tokenize::TokenizeRequestBody>,
) -> Response {
    let req = CohereRequest::Tokenize(cohere::tokenize::TokenizeRequest { body });
    cohere_call(state, auth, trace_id.0, provider, req).await
}

// ---- Bedrock (converse/invoke, model-invocation jobs, S3-compatible object store) ----
//
// `build_bedrock_*` talks to the real Bedrock/S3 endpoints, so the response
// is already the native wire shape the caller expects; forwarded unmodified
// the same way the OpenAI resource ops and Cohere ops are.

async fn bedrock_call(
    state: ProxyState,
    auth: ProxyAuth,
    trace_id: String,
    provider: String,
    req: BedrockRequest,
    downstream: DownstreamContext,
) -> Response {
    let call = ProxyCall::BedrockCall {
        trace_id: Some(trace_id),
        auth,
        provider,
        req,
        downstream,
    };
    to_axum_response(state.engine.handle(call).await)
}

fn header_str(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn bedrock_converse(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Extension(downstream): Extension<DownstreamContext>,
    Path((provider, model_id)): Path<(String, String)>,
    Json(body): Json<bedrock::converse::ConverseRequestBody>,
) -> Response {
    let req = BedrockRequest::Converse(bedrock::converse::ConverseRequest { model_id, body });
    bedrock_call(state, auth, trace_id.0, provider, req, downstream).await
}

async fn bedrock_converse_stream(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Extension(downstream): Extension<DownstreamContext>,
    Path((provider, model_id)): Path<(String, String)>,
    Json(body): Json<bedrock::converse::ConverseRequestBody>,
) -> Response {
    let req = BedrockRequest::ConverseStream(bedrock::converse::ConverseStreamRequest {
        model_id,
        body,
    });
    bedrock_call(state, auth, trace_id.0, provider, req, downstream).await
}

async fn bedrock_invoke(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Extension(downstream): Extension<DownstreamContext>,
    Path((provider, model_id)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let req = BedrockRequest::InvokeModel(bedrock::invoke::InvokeModelRequest {
        model_id,
        body,
        content_type: header_str(&headers, "content-type"),
        accept: header_str(&headers, "accept"),
    });
    bedrock_call(state, auth, trace_id.0, provider, req, downstream).await
}

async fn bedrock_invoke_with_response_stream(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Extension(downstream): Extension<DownstreamContext>,
    Path((provider, model_id)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let req = BedrockRequest::InvokeModelWithResponseStream(
        bedrock::invoke::InvokeModelWithResponseStreamRequest {
            model_id,
            body,
            content_type: header_str(&headers, "content-type"),
            accept: header_str(&headers, "accept"),
        },
    );
    bedrock_call(state, auth, trace_id.0, provider, req, downstream).await
}

/// Rewrites every `jobArn` string value in a JSON response body into its
/// canonical base64 form, so a client never sees a raw Bedrock ARN. No-op on
/// stream bodies (job endpoints never stream) and on non-JSON bodies.
fn canonicalize_bedrock_job_arns(resp: UpstreamHttpResponse) -> UpstreamHttpResponse {
    let UpstreamBody::Bytes(bytes) = &resp.body else {
        return resp;
    };
    let Ok(mut value) = serde_json::from_slice::<serde_json::Value>(bytes) else {
        return resp;
    };
    fn walk(value: &mut serde_json::Value) {
        match value {
            serde_json::Value::Object(map) => {
                if let Some(arn) = map.get_mut("jobArn") {
                    if let Some(s) = arn.as_str() {
                        *arn = serde_json::Value::String(
                            gproxy_transform::canonical::ids::bedrock_arn_to_canonical(s),
                        );
                    }
                }
                for v in map.values_mut() {
                    walk(v);
                }
            }
            serde_json::Value::Array(items) => {
                for v in items {
                    walk(v);
                }
            }
            _ => {}
        }
    }
    walk(&mut value);
    let Ok(body) = serde_json::to_vec(&value) else {
        return resp;
    };
    UpstreamHttpResponse {
        status: resp.status,
        headers: resp.headers,
        body: UpstreamBody::Bytes(Bytes::from(body)),
    }
}

async fn bedrock_create_model_invocation_job(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Extension(downstream): Extension<DownstreamContext>,
    Path(provider): Path<String>,
    Json(body): Json<bedrock::model_invocation_job::CreateModelInvocationJobRequestBody>,
) -> Response {
    let req = BedrockRequest::CreateModelInvocationJob(
        bedrock::model_invocation_job::CreateModelInvocationJobRequest { body },
    );
    let call = ProxyCall::BedrockCall {
        trace_id: Some(trace_id.0),
        auth,
        provider,
        req,
        downstream,
    };
    to_axum_response(canonicalize_bedrock_job_arns(state.engine.handle(call).await))
}

async fn bedrock_get_model_invocation_job(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Extension(downstream): Extension<DownstreamContext>,
    Path((provider, job_id)): Path<(String, String)>,
) -> Response {
    let job_identifier =
        match gproxy_transform::canonical::ids::bedrock_arn_from_canonical(&job_id) {
            Ok(arn) => arn,
            Err(_) => return (StatusCode::BAD_REQUEST, "bad_job_identifier").into_response(),
        };
    let req = BedrockRequest::GetModelInvocationJob(
        bedrock::model_invocation_job::GetModelInvocationJobRequest { job_identifier },
    );
    let call = ProxyCall::BedrockCall {
        trace_id: Some(trace_id.0),
        auth,
        provider,
        req,
        downstream,
    };
    to_axum_response(canonicalize_bedrock_job_arns(state.engine.handle(call).await))
}

async fn bedrock_stop_model_invocation_job(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Extension(downstream): Extension<DownstreamContext>,
    Path((provider, job_id)): Path<(String, String)>,
) -> Response {
    let job_identifier =
        match gproxy_transform::canonical::ids::bedrock_arn_from_canonical(&job_id) {
            Ok(arn) => arn,
            Err(_) => return (StatusCode::BAD_REQUEST, "bad_job_identifier").into_response(),
        };
    let req = BedrockRequest::StopModelInvocationJob(
        bedrock::model_invocation_job::StopModelInvocationJobRequest { job_identifier },
    );
    bedrock_call(state, auth, trace_id.0, provider, req, downstream).await
}

#[derive(Debug, Clone, Deserialize, Default)]
struct ListModelInvocationJobsQuery {
    #[serde(rename = "statusEquals")]
    status_equals: Option<bedrock::model_invocation_job::ModelInvocationJobStatus>,
    #[serde(rename = "nextToken")]
    next_token: Option<String>,
    #[serde(rename = "maxResults")]
    max_results: Option<i64>,
}

async fn bedrock_list_model_invocation_jobs(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Extension(downstream): Extension<DownstreamContext>,
    Path(provider): Path<String>,
    Query(query): Query<ListModelInvocationJobsQuery>,
) -> Response {
    let req = BedrockRequest::ListModelInvocationJobs(
        bedrock::model_invocation_job::ListModelInvocationJobsRequest {
            status_equals: query.status_equals,
            next_token: query.next_token,
            max_results: query.max_results,
        },
    );
    let call = ProxyCall::BedrockCall {
        trace_id: Some(trace_id.0),
        auth,
        provider,
        req,
        downstream,
    };
    to_axum_response(canonicalize_bedrock_job_arns(state.engine.handle(call).await))
}

async fn bedrock_put_object(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Extension(downstream): Extension<DownstreamContext>,
    Path((provider, bucket, key)): Path<(String, String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());
    let req = BedrockRequest::PutObject(bedrock::object_store::PutObjectRequest {
        bucket,
        key,
        body,
        content_type,
    });
    bedrock_call(state, auth, trace_id.0, provider, req, downstream).await
}

async fn bedrock_get_object(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Extension(downstream): Extension<DownstreamContext>,
    Path((provider, bucket, key)): Path<(String, String, String)>,
) -> Response {
    let req = BedrockRequest::GetObject(bedrock::object_store::GetObjectRequest { bucket, key });
    bedrock_call(state, auth, trace_id.0, provider, req, downstream).await
}

async fn bedrock_head_object(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Extension(downstream): Extension<DownstreamContext>,
    Path((provider, bucket, key)): Path<(String, String, String)>,
) -> Response {
    let req = BedrockRequest::HeadObject(bedrock::object_store::HeadObjectRequest { bucket, key });
    bedrock_call(state, auth, trace_id.0, provider, req, downstream).await
}

async fn bedrock_delete_object(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Extension(downstream): Extension<DownstreamContext>,
    Path((provider, bucket, key)): Path<(String, String, String)>,
) -> Response {
    let req =
        BedrockRequest::DeleteObject(bedrock::object_store::DeleteObjectRequest { bucket, key });
    bedrock_call(state, auth, trace_id.0, provider, req, downstream).await
}

#[derive(Debug, Clone, Deserialize, Default)]
struct ListObjectsQuery {
    prefix: Option<String>,
}

async fn bedrock_list_objects(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Extension(downstream): Extension<DownstreamContext>,
    Path((provider, bucket)): Path<(String, String)>,
    Query(query): Query<ListObjectsQuery>,
) -> Response {
    let req = BedrockRequest::ListObjects(bedrock::object_store::ListObjectsRequest {
        bucket,
        prefix: query.prefix,
    });
    bedrock_call(state, auth, trace_id.0, provider, req, downstream).await
}

// ---- Gemini ----

async fn gemini_models_list(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path(provider): Path<String>,
    Query(query): Query<gemini::list_models::request::ListModelsQuery>,
) -> Response {
    let req = gemini::list_models::request::ListModelsRequest { query };
    let call = ProxyCall::Protocol {
        trace_id: Some(trace_id.0.clone()),
        auth,
        provider,
        response_model_prefix_provider: None,
        user_proto: Proto::Gemini,
        user_op: Op::ModelList,
        req: Box::new(Request::ModelList(MwModelListRequest::Gemini(req))),
    };
    to_axum_response(state.engine.handle(call).await)
}

async fn gemini_models_get(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path((provider, name)): Path<(String, String)>,
) -> Response {
    let name = name.trim_start_matches('/');
    let req = gemini::get_model::request::GetModelRequest {
        path: gemini::get_model::request::GetModelPath {
            name: format!("models/{name}"),
        },
    };
    let call = ProxyCall::Protocol {
        trace_id: Some(trace_id.0.clone()),
        auth,
        provider,
        response_model_prefix_provider: None,
        user_proto: Proto::Gemini,
        user_op: Op::ModelGet,
        req: Box::new(Request::ModelGet(MwModelGetRequest::Gemini(req))),
    };
    to_axum_response(state.engine.handle(call).await)
}

async fn gemini_post(
    State(state): State<ProxyState>,
    Extension(auth): Extension<ProxyAuth>,
    Extension(trace_id): Extension<RequestTraceId>,
    Path((provider, model_action)): Path<(String, String)>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Response {
    gemini_post_impl(
        state,
        auth,
        ProviderRouteCtx {
            provider,
            response_model_prefix_provider: None,
        },
        model_action.trim_start_matches('/').to_string(),
        trace_id.0,
        query,
        body,
    )
    .await
}

async fn gemini_post_impl(
    state: ProxyState,
    auth: ProxyAuth,
    route_ctx: ProviderRouteCtx,
    model_action: String,
    trace_id: String,
    query: Option<String>,
    body: Bytes,
) -> Response {
    let provider = route_ctx.provider;
    let response_model_prefix_provider = route_ctx.response_model_prefix_provider;
    let Some((model, action)) = model_action.split_once(':') else {
        return (StatusCode::BAD_REQUEST, "bad_gemini_model_action").into_response();
    };
    let model = model.trim();
    let action = action.trim();
    if model.is_empty() || action.is_empty() {
        return (StatusCode::BAD_REQUEST, "bad_gemini_model_action").into_response();
    }

    match action {
        "generateContent" => {
            let body: gemini::generate_content::request::GenerateContentRequestBody =
                match serde_json::from_slice(&body) {
                    Ok(v) => v,
                    Err(_) => {
                        return (StatusCode::BAD_REQUEST, "bad_gemini_body").into_response();
                    }
                };
            let req = gemini::generate_content::request::GenerateContentRequest {
                path: gemini::generate_content::request::GenerateContentPath {
                    model: format!("models/{model}"),
                },
                body,
            };
            let call = ProxyCall::Protocol {
                trace_id: Some(trace_id.clone()),
                auth,
                provider,
                response_model_prefix_provider,
                user_proto: Proto::Gemini,
                user_op: Op::GenerateContent,
                req: Box::new(Request::GenerateContent(MwGenerateContentRequest::Gemini(
                    req,
                ))),
            };
            to_axum_response(state.engine.handle(call).await)
        }
        "streamGenerateContent" => {
            let body: gemini::generate_content::request::GenerateContentRequestBody =
                match serde_json::from_slice(&body) {
                    Ok(v) => v,
                    Err(_) => {
                        return (StatusCode::BAD_REQUEST, "bad_gemini_body").into_response();
                    }
                };
            let req = gemini::stream_content::request::StreamGenerateContentRequest {
                path: gemini::generate_content::request::GenerateContentPath {
                    model: format!("models/{model}"),
                },
                body,
                query,
            };
            let call = ProxyCall::Protocol {
                trace_id: Some(trace_id.clone()),
                auth,
                provider,
                response_model_prefix_provider,
                user_proto: Proto::Gemini,
                user_op: Op::StreamGenerateContent,
                req: Box::new(Request::GenerateContent(
                    MwGenerateContentRequest::GeminiStream(req),
                )),
            };
            to_axum_response(state.engine.handle(call).await)
        }
        "countTokens" => {
            let body: gemini::count_tokens::request::CountTokensRequestBody =
                match serde_json::from_slice(&body) {
                    Ok(v) => v,
                    Err(_) => {
                        return (StatusCode::BAD_REQUEST, "bad_gemini_body").into_response();
                    }
                };
            let req = gemini::count_tokens::request::CountTokensRequest {
                path: gemini::count_tokens::request::CountTokensPath {
                    model: format!("models/{model}"),
                },
                body,
            };
            let call = ProxyCall::Protocol {
                trace_id: Some(trace_id),
                auth,
                provider,
                response_model_prefix_provider,
                user_proto: Proto::Gemini,
                user_op: Op::CountTokens,
                req: Box::new(Request::CountTokens(MwCountTokensRequest::Gemini(req))),
            };
            to_axum_response(state.engine.handle(call).await)
        }
        "embedContent" => {
            let body: gemini::embed_content::request::EmbedContentRequestBody =
                match serde_json::from_slice(&body) {
                    Ok(v) => v,
                    Err(_) => {
                        return (StatusCode::BAD_REQUEST, "bad_gemini_body").into_response();
                    }
                };
            let canonical_req = match gproxy_transform::canonical::embedding::gemini_embed_to_canonical(
                model, &body,
            ) {
                Ok(v) => v,
                Err(err) => return (StatusCode::UNPROCESSABLE_ENTITY, err.message).into_response(),
            };
            let call = ProxyCall::Canonical {
                trace_id: Some(trace_id),
                auth,
                provider,
                req: gproxy_transform::canonical::CanonicalRequest::Embedding(canonical_req),
                reencode: gproxy_core::proxy_engine::CanonicalReencode::GeminiEmbedContent,
            };
            to_axum_response(state.engine.handle(call).await)
        }
        "batchEmbedContents" => {
            let body: gemini::embed_content::request::BatchEmbedContentsRequestBody =
                match serde_json::from_slice(&body) {
                    Ok(v) => v,
                    Err(_) => {
                        return (StatusCode::BAD_REQUEST, "bad_gemini_body").into_response();
                    }
                };
            let canonical_req =
                match gproxy_transform::canonical::embedding::gemini_batch_embed_to_canonical(
                    model, &body,
                ) {
                    Ok(v) => v,
                    Err(err) => return (StatusCode::UNPROCESSABLE_ENTITY, err.message).into_response(),
                };
            let call = ProxyCall::Canonical {
                trace_id: Some(trace_id),
                auth,
                provider,
                req: gproxy_transform::canonical::CanonicalRequest::Embedding(canonical_req),
                reencode: gproxy_core::proxy_engine::CanonicalReencode::GeminiBatchEmbedContents,
            };
            to_axum_response(state.engine.handle(call).await)
        }
        "predict" => {
            let body: gemini::predict::request::PredictRequestBody =
                match serde_json::from_slice(&body) {
                    Ok(v) => v,
                    Err(_) => {
                        return (StatusCode::BAD_REQUEST, "bad_gemini_body").into_response();
                    }
                };
            let canonical_req =
                match gproxy_transform::canonical::image::gemini_predict_to_canonical(model, &body) {
                    Ok(v) => v,
                    Err(err) => return (StatusCode::UNPROCESSABLE_ENTITY, err.message).into_response(),
                };
            let call = ProxyCall::Canonical {
                trace_id: Some(trace_id),
                auth,
                provider,
                req: gproxy_transform::canonical::CanonicalRequest::ImageGeneration(canonical_req),
                reencode: gproxy_core::proxy_engine::CanonicalReencode::GeminiPredict,
            };
            to_axum_response(state.engine.handle(call).await)
        }
        "batchGenerateContent" => {
            let body: gemini::batches::request::CreateBatchRequestBody =
                match serde_json::from_slice(&body) {
                    Ok(v) => v,
                    Err(_) => {
                        return (StatusCode::BAD_REQUEST, "bad_gemini_body").into_response();
                    }
                };
            let req = GeminiResourceRequest::BatchCreate(gemini::batches::request::CreateBatchRequest {
                path: gemini::batches::request::CreateBatchPath {
                    model: format!("models/{model}"),
                },
                body,
            });
            gemini_resource_call(state, auth, trace_id, provider, req).await
        }
        _ => (StatusCode::NOT_FOUND, "unknown_gemini_action").into_response(),
    }
}

// ---- Helpers ----

fn to_axum_response(resp: UpstreamHttpResponse) -> Response {
    let sse_stream =
        has_sse_content_type(&resp.headers) && matches!(&resp.body, UpstreamBody::Stream(_));
    let mut builder = Response::builder().status(resp.status);
    if let Some(h) = builder.headers_mut() {
        for (k, v) in resp.headers {
            // Drop hop-by-hop and framing headers. Hyper sets framing itself.
            if is_hop_by_hop_or_framing_header(&k) {
                continue;
            }
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(k.as_bytes()),
                HeaderValue::from_str(&v),
            ) {
                h.append(name, value);
            }
        }
        if sse_stream {
            // Hint common reverse proxies to avoid buffering SSE responses.
            h.entry(header::CACHE_CONTROL)
                .or_insert(HeaderValue::from_static("no-cache"));
            h.entry(HeaderName::from_static("x-accel-buffering"))
                .or_insert(HeaderValue::from_static("no"));
        }
    }

    let body = match resp.body {
        UpstreamBody::Bytes(b) => Body::from(b),
        UpstreamBody::Stream(rx) => {
            let rx = if sse_stream {
                wrap_sse_stream_with_heartbeat(rx)
            } else {
                rx
            };
            let stream = ReceiverStream::new(rx).map(Ok::<_, Infallible>);
            Body::from_stream(stream)
        }
    };

    builder.body(body).unwrap_or_else(|_| {
        (StatusCode::INTERNAL_SERVER_ERROR, "response_build_failed").into_response()
    })
}

fn has_sse_content_type(headers: &Headers) -> bool {
    headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
        .map(|(_, value)| value.to_ascii_lowercase().contains("text/event-stream"))
        .unwrap_or(false)
}

fn wrap_sse_stream_with_heartbeat(
    mut upstream_rx: tokio::sync::mpsc::Receiver<Bytes>,
) -> tokio::sync::mpsc::Receiver<Bytes> {
    let (tx, rx) = tokio::sync::mpsc::channel::<Bytes>(32);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SSE_HEARTBEAT_INTERVAL);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // Skip immediate tick; first heartbeat should be sent after the interval.
        ticker.tick().await;

        loop {
            tokio::select! {
                maybe_chunk = upstream_rx.recv() => {
                    let Some(chunk) = maybe_chunk else {
                        break;
                    };
                    if tx.send(chunk).await.is_err() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    if tx.send(Bytes::from_static(SSE_HEARTBEAT_FRAME)).await.is_err() {
                        break;
                    }
                }
            }
        }
    });
    rx
}

fn is_hop_by_hop_or_framing_header(name: &str) -> bool {
    name.eq_ignore_ascii_case("content-length")
        || name.eq_ignore_ascii_case("transfer-encoding")
        || name.eq_ignore_ascii_case("connection")
        || name.eq_ignore_ascii_case("keep-alive")
        || name.eq_ignore_ascii_case("proxy-authenticate")
        || name.eq_ignore_ascii_case("proxy-authorization")
        || name.eq_ignore_ascii_case("te")
        || name.eq_ignore_ascii_case("trailer")
        || name.eq_ignore_ascii_case("upgrade")
}

fn headers_to_vec(headers: &HeaderMap) -> Headers {
    let mut out: Headers = Vec::new();
    for (name, value) in headers {
        if let Ok(v) = value.to_str() {
            out.push((name.as_str().to_string(), v.to_string()));
        }
    }
    out
}

fn maybe_redact_headers(mut headers: Headers, redact: bool) -> Headers {
    if !redact {
        return headers;
    }
    for (k, v) in &mut headers {
        let key = k.to_ascii_lowercase();
        if matches!(
            key.as_str(),
            "authorization" | "x-api-key" | "x-goog-api-key" | "cookie" | "set-cookie"
        ) {
            *v = "***".to_string();
        }
    }
    headers
}

fn maybe_redact_query(query: Option<&str>, redact: bool) -> Option<String> {
    let q = query?;
    if !redact {
        return Some(q.to_string());
    }
    let Ok(mut pairs) = serde_urlencoded::from_str::<Vec<(String, String)>>(q) else {
        return Some(q.to_string());
    };
    for (k, v) in &mut pairs {
        let key = k.to_ascii_lowercase();
        if matches!(
            key.as_str(),
            "key"
                | "api_key"
                | "access_token"
                | "refresh_token"
                | "authorization"
                | "session_key"
                | "code"
        ) {
            *v = "***".to_string();
        }
    }
    serde_urlencoded::to_string(pairs).ok()
}

fn parse_anthropic_headers(headers: &HeaderMap) -> claude::types::AnthropicHeaders {
    let mut map = serde_json::Map::new();
    if let Some(v) = headers
        .get("anthropic-version")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        map.insert(
            "anthropic-version".to_string(),
            serde_json::Value::String(v.to_string()),
        );
    }

    if let Some(beta) = headers
        .get("anthropic-beta")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        let parts: Vec<_> = beta
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| serde_json::Value::String(s.to_string()))
            .collect();
        if parts.len() == 1 {
            map.insert("anthropic-beta".to_string(), parts[0].clone());
        } else if !parts.is_empty() {
            map.insert(
                "anthropic-beta".to_string(),
                serde_json::Value::Array(parts),
            );
        }
    }

    serde_json::from_value(serde_json::Value::Object(map)).unwrap_or_default()
}
