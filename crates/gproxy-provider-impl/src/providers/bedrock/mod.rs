use bytes::Bytes;

use gproxy_provider_core::{
    Credential, DispatchRule, DispatchTable, HttpMethod, Proto, ProviderConfig, ProviderError,
    ProviderResult, UpstreamCtx, UpstreamHttpRequest, UpstreamProvider, credential::BedrockCredential,
};

use crate::auth_extractor;

const PROVIDER_NAME: &str = "bedrock";

// Bedrock's own wire shape is Converse, which is not one of the dialects a
// downstream client speaks. Claude and OpenAI chat-completions requests are
// transformed into a Converse request/response pair (see
// `gproxy-transform::generate_content::{claude2bedrock,
// openai_chat_completions2bedrock}`) and dispatched through the same
// `build_bedrock_converse` hook the native `/model/.../converse` route uses.
// Streaming generate requests have no Converse-stream conversion wired up,
// so they fall back to the engine's non-stream-then-streamify path rather
// than 501ing outright. Gemini and OpenAI Responses have no Bedrock
// conversion (same gap as Cohere) and stay unsupported.
const DISPATCH_TABLE: DispatchTable = DispatchTable::new([
    // Claude
    DispatchRule::Transform {
        target: Proto::Bedrock,
    },
    DispatchRule::Unsupported,
    DispatchRule::Unsupported,
    DispatchRule::Unsupported,
    DispatchRule::Unsupported,
    // Gemini
    DispatchRule::Unsupported,
    DispatchRule::Unsupported,
    DispatchRule::Unsupported,
    DispatchRule::Unsupported,
    DispatchRule::Unsupported,
    // OpenAI chat completions
    DispatchRule::Transform {
        target: Proto::Bedrock,
    },
    DispatchRule::Unsupported,
    // OpenAI Responses
    DispatchRule::Unsupported,
    DispatchRule::Unsupported,
    // OpenAI basic ops
    DispatchRule::Unsupported,
    DispatchRule::Unsupported,
    DispatchRule::Unsupported,
    // OAuth / usage
    DispatchRule::Unsupported,
    DispatchRule::Unsupported,
    DispatchRule::Unsupported,
]);

/// AWS Bedrock routes by region rather than a fixed base URL, and splits
/// across a runtime host (`Converse`/`InvokeModel`) and a control-plane host
/// (model-invocation batch jobs); object-store requests go straight to S3.
/// Auth supports a Bedrock API key (sent as a bearer token) today; the
/// classic access/secret/session-token triple requires full SigV4 request
/// signing, which this provider does not implement yet — it surfaces
/// `ProviderError::Unsupported` for that credential shape rather than
/// sending an unsigned request.
#[derive(Debug, Default)]
pub struct BedrockProvider;

impl BedrockProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl UpstreamProvider for BedrockProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn dispatch_table(&self, _config: &ProviderConfig) -> DispatchTable {
        DISPATCH_TABLE
    }

    async fn build_bedrock_converse(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::bedrock::converse::ConverseRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let region = bedrock_region(config, credential)?;
        let api_key = bedrock_api_key(credential)?;
        let url = format!(
            "{}/model/{}/converse",
            runtime_base_url(region),
            req.model_id
        );
        json_request(&req.body, api_key, url, false)
    }

    async fn build_bedrock_converse_stream(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::bedrock::converse::ConverseStreamRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let region = bedrock_region(config, credential)?;
        let api_key = bedrock_api_key(credential)?;
        let url = format!(
            "{}/model/{}/converse-stream",
            runtime_base_url(region),
            req.model_id
        );
        json_request(&req.body, api_key, url, true)
    }

    async fn build_bedrock_invoke_model(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::bedrock::invoke::InvokeModelRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let region = bedrock_region(config, credential)?;
        let api_key = bedrock_api_key(credential)?;
        let url = format!("{}/model/{}/invoke", runtime_base_url(region), req.model_id);
        raw_request(
            req.body.clone(),
            &req.content_type,
            &req.accept,
            api_key,
            url,
            false,
        )
    }

    async fn build_bedrock_invoke_model_with_response_stream(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::bedrock::invoke::InvokeModelWithResponseStreamRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let region = bedrock_region(config, credential)?;
        let api_key = bedrock_api_key(credential)?;
        let url = format!(
            "{}/model/{}/invoke-with-response-stream",
            runtime_base_url(region),
            req.model_id
        );
        raw_request(
            req.body.clone(),
            &req.content_type,
            &req.accept,
            api_key,
            url,
            true,
        )
    }

    async fn build_bedrock_put_object(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::bedrock::object_store::PutObjectRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let region = bedrock_region(config, credential)?;
        let api_key = bedrock_api_key(credential)?;
        let url = s3_object_url(region, &req.bucket, &req.key);
        let mut headers = Vec::new();
        auth_extractor::set_bearer(&mut headers, api_key);
        if let Some(content_type) = &req.content_type {
            auth_extractor::set_header(&mut headers, "Content-Type", content_type);
        }
        Ok(UpstreamHttpRequest {
            method: HttpMethod::Put,
            url,
            headers,
            body: Some(req.body.clone()),
            is_stream: false,
        })
    }

    async fn build_bedrock_get_object(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::bedrock::object_store::GetObjectRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let region = bedrock_region(config, credential)?;
        let api_key = bedrock_api_key(credential)?;
        let url = s3_object_url(region, &req.bucket, &req.key);
        empty_request(HttpMethod::Get, api_key, url)
    }

    async fn build_bedrock_head_object(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::bedrock::object_store::HeadObjectRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let region = bedrock_region(config, credential)?;
        let api_key = bedrock_api_key(credential)?;
        let url = s3_object_url(region, &req.bucket, &req.key);
        empty_request(HttpMethod::Get, api_key, url)
    }

    async fn build_bedrock_delete_object(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::bedrock::object_store::DeleteObjectRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let region = bedrock_region(config, credential)?;
        let api_key = bedrock_api_key(credential)?;
        let url = s3_object_url(region, &req.bucket, &req.key);
        empty_request(HttpMethod::Delete, api_key, url)
    }

    async fn build_bedrock_list_objects(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::bedrock::object_store::ListObjectsRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let region = bedrock_region(config, credential)?;
        let api_key = bedrock_api_key(credential)?;
        let mut url = format!("{}/{}?list-type=2", s3_base_url(region), req.bucket);
        if let Some(prefix) = &req.prefix {
            url.push_str("&prefix=");
            url.push_str(&urlencoding::encode(prefix));
        }
        empty_request(HttpMethod::Get, api_key, url)
    }

    async fn build_bedrock_create_model_invocation_job(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::bedrock::model_invocation_job::CreateModelInvocationJobRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let region = bedrock_region(config, credential)?;
        let api_key = bedrock_api_key(credential)?;
        let url = format!("{}/model-invocation-job", control_base_url(region));
        json_request(&req.body, api_key, url, false)
    }

    async fn build_bedrock_get_model_invocation_job(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::bedrock::model_invocation_job::GetModelInvocationJobRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let region = bedrock_region(config, credential)?;
        let api_key = bedrock_api_key(credential)?;
        let url = format!(
            "{}/model-invocation-job/{}",
            control_base_url(region),
            req.job_identifier
        );
        empty_request(HttpMethod::Get, api_key, url)
    }

    async fn build_bedrock_stop_model_invocation_job(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::bedrock::model_invocation_job::StopModelInvocationJobRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let region = bedrock_region(config, credential)?;
        let api_key = bedrock_api_key(credential)?;
        let url = format!(
            "{}/model-invocation-job/{}/stop",
            control_base_url(region),
            req.job_identifier
        );
        empty_request(HttpMethod::Post, api_key, url)
    }

    async fn build_bedrock_list_model_invocation_jobs(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::bedrock::model_invocation_job::ListModelInvocationJobsRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let region = bedrock_region(config, credential)?;
        let api_key = bedrock_api_key(credential)?;
        let mut url = format!("{}/model-invocation-jobs", control_base_url(region));
        let mut sep = '?';
        if let Some(status) = &req.status_equals {
            url.push(sep);
            sep = '&';
            url.push_str("statusEquals=");
            url.push_str(
                &serde_json::to_value(status)
                    .map_err(|err| ProviderError::Other(err.to_string()))?
                    .as_str()
                    .unwrap_or_default()
                    .to_string(),
            );
        }
        if let Some(token) = &req.next_token {
            url.push(sep);
            sep = '&';
            url.push_str("nextToken=");
            url.push_str(&urlencoding::encode(token));
        }
        if let Some(max_results) = req.max_results {
            url.push(sep);
            url.push_str("maxResults=");
            url.push_str(&max_results.to_string());
        }
        empty_request(HttpMethod::Get, api_key, url)
    }
}

fn bedrock_region<'a>(config: &'a ProviderConfig, credential: &'a Credential) -> ProviderResult<&'a str> {
    if let Credential::Bedrock(BedrockCredential { region, .. }) = credential {
        if !region.is_empty() {
            return Ok(region.as_str());
        }
    }
    if let ProviderConfig::Bedrock(cfg) = config {
        if let Some(region) = cfg.region.as_deref() {
            return Ok(region);
        }
    }
    Err(ProviderError::MissingCredentialField("region"))
}

fn bedrock_api_key(credential: &Credential) -> ProviderResult<&str> {
    match credential {
        Credential::Bedrock(BedrockCredential {
            api_key: Some(api_key),
            ..
        }) => Ok(api_key.as_str()),
        Credential::Bedrock(BedrockCredential {
            access_key: Some(_),
            ..
        }) => Err(ProviderError::Unsupported(
            "bedrock.sigv4_credentials",
        )),
        Credential::Bedrock(_) => Err(ProviderError::MissingCredentialField("api_key")),
        _ => Err(ProviderError::InvalidConfig(
            "expected Credential::Bedrock".to_string(),
        )),
    }
}

fn runtime_base_url(region: &str) -> String {
    format!("https://bedrock-runtime.{region}.amazonaws.com")
}

fn control_base_url(region: &str) -> String {
    format!("https://bedrock.{region}.amazonaws.com")
}

fn s3_base_url(region: &str) -> String {
    format!("https://s3.{region}.amazonaws.com")
}

fn s3_object_url(region: &str, bucket: &str, key: &str) -> String {
    format!("{}/{}/{}", s3_base_url(region), bucket, key.trim_start_matches('/'))
}

fn json_request(
    body: &impl serde::Serialize,
    api_key: &str,
    url: String,
    is_stream: bool,
) -> ProviderResult<UpstreamHttpRequest> {
    let body = serde_json::to_vec(body).map_err(|err| ProviderError::Other(err.to_string()))?;
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

fn raw_request(
    body: Bytes,
    content_type: &str,
    accept: &str,
    api_key: &str,
    url: String,
    is_stream: bool,
) -> ProviderResult<UpstreamHttpRequest> {
    let mut headers = Vec::new();
    auth_extractor::set_bearer(&mut headers, api_key);
    auth_extractor::set_header(&mut headers, "Content-Type", content_type);
    auth_extractor::set_header(&mut headers, "Accept", accept);
    Ok(UpstreamHttpRequest {
        method: HttpMethod::Post,
        url,
        headers,
        body: Some(body),
        is_stream,
    })
}

fn empty_request(
    method: HttpMethod,
    api_key: &str,
    url: String,
) -> ProviderResult<UpstreamHttpRequest> {
    let mut headers = Vec::new();
    auth_extractor::set_bearer(&mut headers, api_key);
    Ok(UpstreamHttpRequest {
        method,
        url,
        headers,
        body: None,
        is_stream: false,
    })
}
