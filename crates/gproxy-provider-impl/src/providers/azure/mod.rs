use bytes::Bytes;

use gproxy_provider_core::{
    Credential, DispatchTable, HttpMethod, ProviderConfig, ProviderError, ProviderResult,
    UpstreamCtx, UpstreamHttpRequest, UpstreamProvider, credential::AzureOpenAICredential,
};

use crate::auth_extractor;

const PROVIDER_NAME: &str = "azure_openai";

/// Azure OpenAI reuses the OpenAI chat-completions/embeddings bodies but
/// routes by `{deployment-id}` instead of `model` and carries the API
/// version as a query parameter; `config.deployments`/`credential.deployments`
/// resolve the deployment name to the model the caller asked for. The
/// deployment name always wins when both are present.
#[derive(Debug, Default)]
pub struct AzureOpenAIProvider;

impl AzureOpenAIProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl UpstreamProvider for AzureOpenAIProvider {
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
        let (endpoint, api_version) = azure_config(config)?;
        let api_key = azure_api_key(credential)?;
        let deployment = resolve_deployment(config, credential, &req.body.model)?;
        let url = format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            endpoint.trim_end_matches('/'),
            deployment,
            api_version,
        );
        let is_stream = req.body.stream.unwrap_or(false);
        let body =
            serde_json::to_vec(&req.body).map_err(|err| ProviderError::Other(err.to_string()))?;
        let mut headers = Vec::new();
        auth_extractor::set_header(&mut headers, "api-key", api_key);
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
        let (endpoint, api_version) = azure_config(config)?;
        let api_key = azure_api_key(credential)?;
        let deployment = resolve_deployment(config, credential, &req.body.model)?;
        let url = format!(
            "{}/openai/deployments/{}/embeddings?api-version={}",
            endpoint.trim_end_matches('/'),
            deployment,
            api_version,
        );
        let body =
            serde_json::to_vec(&req.body).map_err(|err| ProviderError::Other(err.to_string()))?;
        let mut headers = Vec::new();
        auth_extractor::set_header(&mut headers, "api-key", api_key);
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

fn azure_config(config: &ProviderConfig) -> ProviderResult<(&str, &str)> {
    match config {
        ProviderConfig::AzureOpenAI(cfg) => Ok((cfg.endpoint.as_str(), cfg.api_version.as_str())),
        _ => Err(ProviderError::InvalidConfig(
            "expected ProviderConfig::AzureOpenAI".to_string(),
        )),
    }
}

fn azure_api_key(credential: &Credential) -> ProviderResult<&str> {
    match credential {
        Credential::AzureOpenAI(AzureOpenAICredential { api_key, .. }) => Ok(api_key.as_str()),
        _ => Err(ProviderError::InvalidConfig(
            "expected Credential::AzureOpenAI".to_string(),
        )),
    }
}

fn resolve_deployment<'a>(
    config: &'a ProviderConfig,
    credential: &'a Credential,
    model: &'a str,
) -> ProviderResult<&'a str> {
    if let ProviderConfig::AzureOpenAI(cfg) = config {
        if let Some(deployment) = cfg.deployments.get(model) {
            return Ok(deployment.as_str());
        }
    }
    if let Credential::AzureOpenAI(cred) = credential {
        if let Some(deployment) = cred.deployments.get(model) {
            return Ok(deployment.as_str());
        }
    }
    Ok(model)
}
