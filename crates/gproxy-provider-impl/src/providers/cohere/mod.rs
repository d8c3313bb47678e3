use bytes::Bytes;

use gproxy_provider_core::{
    Credential, DispatchTable, HttpMethod, ProviderConfig, ProviderError, ProviderResult,
    UpstreamCtx, UpstreamHttpRequest, UpstreamProvider, credential::ApiKeyCredential,
};

use crate::auth_extractor;

const PROVIDER_NAME: &str = "cohere";
const DEFAULT_BASE_URL: &str = "https://api.cohere.com";

#[derive(Debug, Default)]
pub struct CohereProvider;

impl CohereProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl UpstreamProvider for CohereProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn dispatch_table(&self, _config: &ProviderConfig) -> DispatchTable {
        DispatchTable::default()
    }

    async fn build_cohere_chat(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::cohere::chat::ChatRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let base_url = cohere_base_url(config)?;
        let api_key = cohere_api_key(credential)?;
        let url = build_url(base_url, "/v2/chat");
        let is_stream = req.body.stream.unwrap_or(false);
        json_request(&req.body, api_key, url, is_stream)
    }

    async fn build_cohere_embed(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::cohere::embed::EmbedRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let base_url = cohere_base_url(config)?;
        let api_key = cohere_api_key(credential)?;
        let url = build_url(base_url, "/v2/embed");
        json_request(&req.body, api_key, url, false)
    }

    async fn build_cohere_rerank(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::cohere::rerank::RerankRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let base_url = cohere_base_url(config)?;
        let api_key = cohere_api_key(credential)?;
        let url = build_url(base_url, "/v2/rerank");
        json_request(&req.body, api_key, url, false)
    }

    async fn build_cohere_tokenize(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::cohere::tokenize::TokenizeRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let base_url = cohere_base_url(config)?;
        let api_key = cohere_api_key(credential)?;
        let url = build_url(base_url, "/v1/tokenize");
        json_request(&req.body, api_key, url, false)
    }
}

fn cohere_base_url(config: &ProviderConfig) -> ProviderResult<&str> {
    match config {
        ProviderConfig::Cohere(cfg) => Ok(cfg.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)),
        _ => Err(ProviderError::InvalidConfig(
            "expected ProviderConfig::Cohere".to_string(),
        )),
    }
}

fn cohere_api_key(credential: &Credential) -> ProviderResult<&str> {
    match credential {
        Credential::Cohere(ApiKeyCredential { api_key }) => Ok(api_key.as_str()),
        _ => Err(ProviderError::InvalidConfig(
            "expected Credential::Cohere".to_string(),
        )),
    }
}

fn build_url(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

fn json_request(
    body: &impl serde::Serialize,
    api_key: &str,
    url: String,
    is_stream: bool,
) -> ProviderResult<UpstreamHttpRequest> {
    let body =
        serde_json::to_vec(body).map_err(|err| ProviderError::Other(err.to_string()))?;
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
