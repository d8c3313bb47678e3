use bytes::Bytes;

use gproxy_provider_core::{
    Credential, DispatchTable, HttpMethod, ProviderConfig, ProviderError, ProviderResult,
    UpstreamCtx, UpstreamHttpRequest, UpstreamProvider, credential::ApiKeyCredential,
};

use crate::auth_extractor;

const PROVIDER_NAME: &str = "mistral";
const DEFAULT_BASE_URL: &str = "https://api.mistral.ai";

/// Mistral speaks the OpenAI chat-completions wire format natively, so the
/// only new surface this provider needs is auth + base URL plumbing; the
/// request/response bodies pass through `openai::create_chat_completions`.
#[derive(Debug, Default)]
pub struct MistralProvider;

impl MistralProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl UpstreamProvider for MistralProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn dispatch_table(&self, _config: &ProviderConfig) -> DispatchTable {
        DispatchTable::default()
    }

    async fn build_openai_chat(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::openai::create_chat_completions::request::CreateChatCompletionRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let base_url = mistral_base_url(config)?;
        let api_key = mistral_api_key(credential)?;
        let url = format!("{}/v1/chat/completions", base_url.trim_end_matches('/'));
        let is_stream = req.body.stream.unwrap_or(false);
        let body =
            serde_json::to_vec(&req.body).map_err(|err| ProviderError::Other(err.to_string()))?;
        let mut headers = Vec::new();
        auth_extractor::set_bearer(&mut headers, api_key);
        auth_extractor::set_accept_json(&mut headers);
        auth_extractor::set_content_type_json(&mut headers);
        Ok(UpstreamHttpRequest {
            method: HttpMethod::Post,
            url,
            headers,
            body: Some(Bytes::from(body)),
            is_stream,
        })
    }

    async fn build_openai_embeddings(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::openai::embeddings::CreateEmbeddingRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let base_url = mistral_base_url(config)?;
        let api_key = mistral_api_key(credential)?;
        let url = format!("{}/v1/embeddings", base_url.trim_end_matches('/'));
        let body =
            serde_json::to_vec(&req.body).map_err(|err| ProviderError::Other(err.to_string()))?;
        let mut headers = Vec::new();
        auth_extractor::set_bearer(&mut headers, api_key);
        auth_extractor::set_accept_json(&mut headers);
        auth_extractor::set_content_type_json(&mut headers);
        Ok(UpstreamHttpRequest {
            method: HttpMethod::Post,
            url,
            headers,
            body: Some(Bytes::from(body)),
            is_stream: false,
        })
    }
}

fn mistral_base_url(config: &ProviderConfig) -> ProviderResult<&str> {
    match config {
        ProviderConfig::Mistral(cfg) => Ok(cfg.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)),
        _ => Err(ProviderError::InvalidConfig(
            "expected ProviderConfig::Mistral".to_string(),
        )),
    }
}

fn mistral_api_key(credential: &Credential) -> ProviderResult<&str> {
    match credential {
        Credential::Mistral(ApiKeyCredential { api_key }) => Ok(api_key.as_str()),
        _ => Err(ProviderError::InvalidConfig(
            "expected Credential::Mistral".to_string(),
        )),
    }
}
