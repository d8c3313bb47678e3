use bytes::Bytes;

use gproxy_provider_core::{
    Credential, DispatchRule, DispatchTable, HttpMethod, Proto, ProviderConfig, ProviderError,
    ProviderResult, UpstreamCtx, UpstreamHttpRequest, UpstreamProvider,
    credential::ApiKeyCredential,
};

use crate::auth_extractor;
use crate::multipart::{self, MultipartPart};

const PROVIDER_NAME: &str = "openai";
const DEFAULT_BASE_URL: &str = "https://api.openai.com";

const DISPATCH_TABLE: DispatchTable = DispatchTable::new([
    // Claude
    DispatchRule::Transform {
        target: Proto::OpenAIResponse,
    },
    DispatchRule::Transform {
        target: Proto::OpenAIResponse,
    },
    DispatchRule::Transform {
        target: Proto::OpenAI,
    },
    DispatchRule::Transform {
        target: Proto::OpenAI,
    },
    DispatchRule::Transform {
        target: Proto::OpenAI,
    },
    // Gemini
    DispatchRule::Transform {
        target: Proto::OpenAIResponse,
    },
    DispatchRule::Transform {
        target: Proto::OpenAIResponse,
    },
    DispatchRule::Transform {
        target: Proto::OpenAI,
    },
    DispatchRule::Transform {
        target: Proto::OpenAI,
    },
    DispatchRule::Transform {
        target: Proto::OpenAI,
    },
    // OpenAI chat completions
    DispatchRule::Native,
    DispatchRule::Native,
    // OpenAI Responses
    DispatchRule::Native,
    DispatchRule::Native,
    // OpenAI basic ops
    DispatchRule::Native,
    DispatchRule::Native,
    DispatchRule::Native,
    // OAuth / usage (not implemented for this provider)
    DispatchRule::Unsupported,
    DispatchRule::Unsupported,
    DispatchRule::Unsupported,
]);

#[derive(Debug, Default)]
pub struct OpenAIProvider;

impl OpenAIProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl UpstreamProvider for OpenAIProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn dispatch_table(&self, _config: &ProviderConfig) -> DispatchTable {
        DISPATCH_TABLE
    }

    async fn build_openai_models_list(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        _req: &gproxy_protocol::openai::list_models::request::ListModelsRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let base_url = match config {
            ProviderConfig::OpenAI(cfg) => cfg.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL),
            _ => {
                return Err(ProviderError::InvalidConfig(
                    "expected ProviderConfig::OpenAI".to_string(),
                ));
            }
        };
        let base_url = base_url.trim_end_matches('/');

        let api_key = match credential {
            Credential::OpenAI(ApiKeyCredential { api_key }) => api_key.as_str(),
            _ => {
                return Err(ProviderError::InvalidConfig(
                    "expected Credential::OpenAI".to_string(),
                ));
            }
        };

        let url = build_url(Some(base_url), DEFAULT_BASE_URL, "/v1/models");
        let mut headers = Vec::new();
        auth_extractor::set_bearer(&mut headers, api_key);
        auth_extractor::set_accept_json(&mut headers);
        Ok(UpstreamHttpRequest {
            method: HttpMethod::Get,
            url,
            headers,
            body: None,
            is_stream: false,
        })
    }

    async fn build_openai_models_get(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::openai::get_model::request::GetModelRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let base_url = match config {
            ProviderConfig::OpenAI(cfg) => cfg.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL),
            _ => {
                return Err(ProviderError::InvalidConfig(
                    "expected ProviderConfig::OpenAI".to_string(),
                ));
            }
        };
        let base_url = base_url.trim_end_matches('/');

        let api_key = match credential {
            Credential::OpenAI(ApiKeyCredential { api_key }) => api_key.as_str(),
            _ => {
                return Err(ProviderError::InvalidConfig(
                    "expected Credential::OpenAI".to_string(),
                ));
            }
        };

        let url = build_url(
            Some(base_url),
            DEFAULT_BASE_URL,
            &format!("/v1/models/{}", req.path.model),
        );
        let mut headers = Vec::new();
        auth_extractor::set_bearer(&mut headers, api_key);
        auth_extractor::set_accept_json(&mut headers);
        Ok(UpstreamHttpRequest {
            method: HttpMethod::Get,
            url,
            headers,
            body: None,
            is_stream: false,
        })
    }

    async fn build_openai_input_tokens(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::openai::count_tokens::request::InputTokenCountRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let base_url = match config {
            ProviderConfig::OpenAI(cfg) => cfg.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL),
            _ => {
                return Err(ProviderError::InvalidConfig(
                    "expected ProviderConfig::OpenAI".to_string(),
                ));
            }
        };
        let base_url = base_url.trim_end_matches('/');

        let api_key = match credential {
            Credential::OpenAI(ApiKeyCredential { api_key }) => api_key.as_str(),
            _ => {
                return Err(ProviderError::InvalidConfig(
                    "expected Credential::OpenAI".to_string(),
                ));
            }
        };

        let url = build_url(
            Some(base_url),
            DEFAULT_BASE_URL,
            "/v1/responses/input_tokens",
        );
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

    async fn build_openai_chat(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::openai::create_chat_completions::request::CreateChatCompletionRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let base_url = match config {
            ProviderConfig::OpenAI(cfg) => cfg.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL),
            _ => {
                return Err(ProviderError::InvalidConfig(
                    "expected ProviderConfig::OpenAI".to_string(),
                ));
            }
        };
        let base_url = base_url.trim_end_matches('/');

        let api_key = match credential {
            Credential::OpenAI(ApiKeyCredential { api_key }) => api_key.as_str(),
            _ => {
                return Err(ProviderError::InvalidConfig(
                    "expected Credential::OpenAI".to_string(),
                ));
            }
        };

        let url = build_url(Some(base_url), DEFAULT_BASE_URL, "/v1/chat/completions");
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

    async fn build_openai_responses(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::openai::create_response::request::CreateResponseRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let base_url = match config {
            ProviderConfig::OpenAI(cfg) => cfg.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL),
            _ => {
                return Err(ProviderError::InvalidConfig(
                    "expected ProviderConfig::OpenAI".to_string(),
                ));
            }
        };
        let base_url = base_url.trim_end_matches('/');

        let api_key = match credential {
            Credential::OpenAI(ApiKeyCredential { api_key }) => api_key.as_str(),
            _ => {
                return Err(ProviderError::InvalidConfig(
                    "expected Credential::OpenAI".to_string(),
                ));
            }
        };

        let url = build_url(Some(base_url), DEFAULT_BASE_URL, "/v1/responses");
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

    async fn build_openai_responses_passthrough(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_provider_core::OpenAIResponsesPassthroughRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let base_url = match config {
            ProviderConfig::OpenAI(cfg) => cfg.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL),
            _ => {
                return Err(ProviderError::InvalidConfig(
                    "expected ProviderConfig::OpenAI".to_string(),
                ));
            }
        };
        let base_url = base_url.trim_end_matches('/');

        let api_key = match credential {
            Credential::OpenAI(ApiKeyCredential { api_key }) => api_key.as_str(),
            _ => {
                return Err(ProviderError::InvalidConfig(
                    "expected Credential::OpenAI".to_string(),
                ));
            }
        };

        let mut url = build_url(Some(base_url), DEFAULT_BASE_URL, &req.path);
        if let Some(query) = req.query.as_deref().filter(|q| !q.is_empty()) {
            url.push('?');
            url.push_str(query);
        }
        let mut headers = Vec::new();
        auth_extractor::set_bearer(&mut headers, api_key);
        auth_extractor::set_accept_json(&mut headers);
        if req.body.is_some() {
            auth_extractor::set_content_type_json(&mut headers);
        }
        Ok(UpstreamHttpRequest {
            method: req.method,
            url,
            headers,
            body: req.body.clone(),
            is_stream: req.is_stream,
        })
    }

    async fn build_openai_embeddings(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::openai::embeddings::CreateEmbeddingRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let (base_url, api_key) = base_and_key(config, credential)?;
        let url = build_url(Some(base_url), DEFAULT_BASE_URL, "/v1/embeddings");
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

    async fn build_openai_speech(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::openai::speech::CreateSpeechRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let (base_url, api_key) = base_and_key(config, credential)?;
        let url = build_url(Some(base_url), DEFAULT_BASE_URL, "/v1/audio/speech");
        let body =
            serde_json::to_vec(&req.body).map_err(|err| ProviderError::Other(err.to_string()))?;
        let mut headers = Vec::new();
        auth_extractor::set_bearer(&mut headers, api_key);
        auth_extractor::set_content_type_json(&mut headers);
        Ok(UpstreamHttpRequest {
            method: HttpMethod::Post,
            url,
            headers,
            body: Some(Bytes::from(body)),
            is_stream: false,
        })
    }

    async fn build_openai_transcription(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::openai::transcriptions::CreateTranscriptionRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let (base_url, api_key) = base_and_key(config, credential)?;
        let url = build_url(Some(base_url), DEFAULT_BASE_URL, "/v1/audio/transcriptions");
        let mut parts = vec![
            MultipartPart::File {
                name: "file",
                filename: &req.file_name,
                content_type: "application/octet-stream",
                data: req.file.clone(),
            },
            MultipartPart::Text {
                name: "model",
                value: req.model.clone(),
            },
        ];
        if let Some(language) = &req.language {
            parts.push(MultipartPart::Text {
                name: "language",
                value: language.clone(),
            });
        }
        if let Some(prompt) = &req.prompt {
            parts.push(MultipartPart::Text {
                name: "prompt",
                value: prompt.clone(),
            });
        }
        if let Some(response_format) = req.response_format {
            let value = serde_json::to_value(response_format)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();
            parts.push(MultipartPart::Text {
                name: "response_format",
                value,
            });
        }
        if let Some(temperature) = req.temperature {
            parts.push(MultipartPart::Text {
                name: "temperature",
                value: temperature.to_string(),
            });
        }
        if let Some(granularities) = &req.timestamp_granularities {
            for granularity in granularities {
                let value = serde_json::to_value(granularity)
                    .ok()
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_default();
                parts.push(MultipartPart::Text {
                    name: "timestamp_granularities[]",
                    value,
                });
            }
        }
        let (content_type, body) = multipart::encode(&parts);
        let mut headers = Vec::new();
        auth_extractor::set_bearer(&mut headers, api_key);
        auth_extractor::set_accept_json(&mut headers);
        auth_extractor::set_header(&mut headers, "Content-Type", &content_type);
        Ok(UpstreamHttpRequest {
            method: HttpMethod::Post,
            url,
            headers,
            body: Some(body),
            is_stream: false,
        })
    }

    async fn build_openai_image_generation(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::openai::images::CreateImageRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let (base_url, api_key) = base_and_key(config, credential)?;
        let url = build_url(Some(base_url), DEFAULT_BASE_URL, "/v1/images/generations");
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

    async fn build_openai_image_edit(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::openai::images::CreateImageEditRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let (base_url, api_key) = base_and_key(config, credential)?;
        let url = build_url(Some(base_url), DEFAULT_BASE_URL, "/v1/images/edits");
        let image_names: Vec<String> = (0..req.image.len())
            .map(|idx| format!("image-{idx}.png"))
            .collect();
        let mut parts = Vec::new();
        for (image, filename) in req.image.iter().zip(image_names.iter()) {
            parts.push(MultipartPart::File {
                name: "image[]",
                filename: filename.as_str(),
                content_type: "application/octet-stream",
                data: image.clone(),
            });
        }
        parts.push(MultipartPart::Text {
            name: "prompt",
            value: req.body.prompt.clone(),
        });
        if let Some(mask) = &req.mask {
            parts.push(MultipartPart::File {
                name: "mask",
                filename: "mask.png",
                content_type: "application/octet-stream",
                data: mask.clone(),
            });
        }
        if let Some(model) = &req.body.model {
            parts.push(MultipartPart::Text {
                name: "model",
                value: model.clone(),
            });
        }
        if let Some(n) = req.body.n {
            parts.push(MultipartPart::Text {
                name: "n",
                value: n.to_string(),
            });
        }
        if let Some(size) = &req.body.size {
            parts.push(MultipartPart::Text {
                name: "size",
                value: size.clone(),
            });
        }
        let (content_type, body) = multipart::encode(&parts);
        let mut headers = Vec::new();
        auth_extractor::set_bearer(&mut headers, api_key);
        auth_extractor::set_accept_json(&mut headers);
        auth_extractor::set_header(&mut headers, "Content-Type", &content_type);
        Ok(UpstreamHttpRequest {
            method: HttpMethod::Post,
            url,
            headers,
            body: Some(body),
            is_stream: false,
        })
    }

    async fn build_openai_batch_create(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::openai::batches::request::CreateBatchRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let (base_url, api_key) = base_and_key(config, credential)?;
        let url = build_url(Some(base_url), DEFAULT_BASE_URL, "/v1/batches");
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

    async fn build_openai_batch_get(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::openai::batches::request::GetBatchRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let (base_url, api_key) = base_and_key(config, credential)?;
        let url = build_url(
            Some(base_url),
            DEFAULT_BASE_URL,
            &format!("/v1/batches/{}", req.batch_id),
        );
        let mut headers = Vec::new();
        auth_extractor::set_bearer(&mut headers, api_key);
        auth_extractor::set_accept_json(&mut headers);
        Ok(UpstreamHttpRequest {
            method: HttpMethod::Get,
            url,
            headers,
            body: None,
            is_stream: false,
        })
    }

    async fn build_openai_batch_cancel(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::openai::batches::request::CancelBatchRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let (base_url, api_key) = base_and_key(config, credential)?;
        let url = build_url(
            Some(base_url),
            DEFAULT_BASE_URL,
            &format!("/v1/batches/{}/cancel", req.batch_id),
        );
        let mut headers = Vec::new();
        auth_extractor::set_bearer(&mut headers, api_key);
        auth_extractor::set_accept_json(&mut headers);
        Ok(UpstreamHttpRequest {
            method: HttpMethod::Post,
            url,
            headers,
            body: None,
            is_stream: false,
        })
    }

    async fn build_openai_batch_list(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::openai::batches::request::ListBatchesRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let (base_url, api_key) = base_and_key(config, credential)?;
        let mut url = build_url(Some(base_url), DEFAULT_BASE_URL, "/v1/batches");
        let mut parts = Vec::new();
        if let Some(after) = &req.after {
            parts.push(format!("after={after}"));
        }
        if let Some(limit) = req.limit {
            parts.push(format!("limit={limit}"));
        }
        if !parts.is_empty() {
            url.push('?');
            url.push_str(&parts.join("&"));
        }
        let mut headers = Vec::new();
        auth_extractor::set_bearer(&mut headers, api_key);
        auth_extractor::set_accept_json(&mut headers);
        Ok(UpstreamHttpRequest {
            method: HttpMethod::Get,
            url,
            headers,
            body: None,
            is_stream: false,
        })
    }

    async fn build_openai_file_create(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::openai::files::CreateFileRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let (base_url, api_key) = base_and_key(config, credential)?;
        let url = build_url(Some(base_url), DEFAULT_BASE_URL, "/v1/files");
        let purpose = serde_json::to_value(req.purpose)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        let parts = vec![
            MultipartPart::File {
                name: "file",
                filename: &req.file_name,
                content_type: "application/octet-stream",
                data: req.file.clone(),
            },
            MultipartPart::Text {
                name: "purpose",
                value: purpose,
            },
        ];
        let (content_type, body) = multipart::encode(&parts);
        let mut headers = Vec::new();
        auth_extractor::set_bearer(&mut headers, api_key);
        auth_extractor::set_accept_json(&mut headers);
        auth_extractor::set_header(&mut headers, "Content-Type", &content_type);
        Ok(UpstreamHttpRequest {
            method: HttpMethod::Post,
            url,
            headers,
            body: Some(body),
            is_stream: false,
        })
    }

    async fn build_openai_file_get(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::openai::files::GetFileRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let (base_url, api_key) = base_and_key(config, credential)?;
        let url = build_url(
            Some(base_url),
            DEFAULT_BASE_URL,
            &format!("/v1/files/{}", req.file_id),
        );
        let mut headers = Vec::new();
        auth_extractor::set_bearer(&mut headers, api_key);
        auth_extractor::set_accept_json(&mut headers);
        Ok(UpstreamHttpRequest {
            method: HttpMethod::Get,
            url,
            headers,
            body: None,
            is_stream: false,
        })
    }

    async fn build_openai_file_get_content(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::openai::files::GetFileContentRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let (base_url, api_key) = base_and_key(config, credential)?;
        let url = build_url(
            Some(base_url),
            DEFAULT_BASE_URL,
            &format!("/v1/files/{}/content", req.file_id),
        );
        let mut headers = Vec::new();
        auth_extractor::set_bearer(&mut headers, api_key);
        Ok(UpstreamHttpRequest {
            method: HttpMethod::Get,
            url,
            headers,
            body: None,
            is_stream: false,
        })
    }

    async fn build_openai_file_delete(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::openai::files::DeleteFileRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let (base_url, api_key) = base_and_key(config, credential)?;
        let url = build_url(
            Some(base_url),
            DEFAULT_BASE_URL,
            &format!("/v1/files/{}", req.file_id),
        );
        let mut headers = Vec::new();
        auth_extractor::set_bearer(&mut headers, api_key);
        auth_extractor::set_accept_json(&mut headers);
        Ok(UpstreamHttpRequest {
            method: HttpMethod::Delete,
            url,
            headers,
            body: None,
            is_stream: false,
        })
    }

    async fn build_openai_file_list(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::openai::files::ListFilesRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let (base_url, api_key) = base_and_key(config, credential)?;
        let mut url = build_url(Some(base_url), DEFAULT_BASE_URL, "/v1/files");
        let mut parts = Vec::new();
        if let Some(purpose) = req.purpose {
            if let Some(value) = serde_json::to_value(purpose)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
            {
                parts.push(format!("purpose={value}"));
            }
        }
        if let Some(after) = &req.after {
            parts.push(format!("after={after}"));
        }
        if let Some(limit) = req.limit {
            parts.push(format!("limit={limit}"));
        }
        if !parts.is_empty() {
            url.push('?');
            url.push_str(&parts.join("&"));
        }
        let mut headers = Vec::new();
        auth_extractor::set_bearer(&mut headers, api_key);
        auth_extractor::set_accept_json(&mut headers);
        Ok(UpstreamHttpRequest {
            method: HttpMethod::Get,
            url,
            headers,
            body: None,
            is_stream: false,
        })
    }

    async fn build_openai_container_create(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::openai::containers::request::CreateContainerRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let (base_url, api_key) = base_and_key(config, credential)?;
        let url = build_url(Some(base_url), DEFAULT_BASE_URL, "/v1/containers");
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

    async fn build_openai_container_get(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::openai::containers::request::GetContainerRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let (base_url, api_key) = base_and_key(config, credential)?;
        let url = build_url(
            Some(base_url),
            DEFAULT_BASE_URL,
            &format!("/v1/containers/{}", req.container_id),
        );
        let mut headers = Vec::new();
        auth_extractor::set_bearer(&mut headers, api_key);
        auth_extractor::set_accept_json(&mut headers);
        Ok(UpstreamHttpRequest {
            method: HttpMethod::Get,
            url,
            headers,
            body: None,
            is_stream: false,
        })
    }

    async fn build_openai_container_delete(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::openai::containers::request::DeleteContainerRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let (base_url, api_key) = base_and_key(config, credential)?;
        let url = build_url(
            Some(base_url),
            DEFAULT_BASE_URL,
            &format!("/v1/containers/{}", req.container_id),
        );
        let mut headers = Vec::new();
        auth_extractor::set_bearer(&mut headers, api_key);
        auth_extractor::set_accept_json(&mut headers);
        Ok(UpstreamHttpRequest {
            method: HttpMethod::Delete,
            url,
            headers,
            body: None,
            is_stream: false,
        })
    }

    async fn build_openai_container_list(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::openai::containers::request::ListContainersRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let (base_url, api_key) = base_and_key(config, credential)?;
        let mut url = build_url(Some(base_url), DEFAULT_BASE_URL, "/v1/containers");
        let mut parts = Vec::new();
        if let Some(after) = &req.after {
            parts.push(format!("after={after}"));
        }
        if let Some(limit) = req.limit {
            parts.push(format!("limit={limit}"));
        }
        if !parts.is_empty() {
            url.push('?');
            url.push_str(&parts.join("&"));
        }
        let mut headers = Vec::new();
        auth_extractor::set_bearer(&mut headers, api_key);
        auth_extractor::set_accept_json(&mut headers);
        Ok(UpstreamHttpRequest {
            method: HttpMethod::Get,
            url,
            headers,
            body: None,
            is_stream: false,
        })
    }

    async fn build_openai_container_file_create(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::openai::containers::request::CreateContainerFileRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let (base_url, api_key) = base_and_key(config, credential)?;
        let url = build_url(
            Some(base_url),
            DEFAULT_BASE_URL,
            &format!("/v1/containers/{}/files", req.container_id),
        );
        let mut parts = Vec::new();
        if let Some(file) = &req.file {
            parts.push(MultipartPart::File {
                name: "file",
                filename: "upload",
                content_type: "application/octet-stream",
                data: file.clone(),
            });
        }
        if let Some(file_id) = &req.file_id {
            parts.push(MultipartPart::Text {
                name: "file_id",
                value: file_id.clone(),
            });
        }
        let (content_type, body) = multipart::encode(&parts);
        let mut headers = Vec::new();
        auth_extractor::set_bearer(&mut headers, api_key);
        auth_extractor::set_accept_json(&mut headers);
        auth_extractor::set_header(&mut headers, "Content-Type", &content_type);
        Ok(UpstreamHttpRequest {
            method: HttpMethod::Post,
            url,
            headers,
            body: Some(body),
            is_stream: false,
        })
    }

    async fn build_openai_container_file_get(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::openai::containers::request::GetContainerFileRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let (base_url, api_key) = base_and_key(config, credential)?;
        let url = build_url(
            Some(base_url),
            DEFAULT_BASE_URL,
            &format!(
                "/v1/containers/{}/files/{}",
                req.container_id, req.file_id
            ),
        );
        let mut headers = Vec::new();
        auth_extractor::set_bearer(&mut headers, api_key);
        auth_extractor::set_accept_json(&mut headers);
        Ok(UpstreamHttpRequest {
            method: HttpMethod::Get,
            url,
            headers,
            body: None,
            is_stream: false,
        })
    }

    async fn build_openai_container_file_get_content(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::openai::containers::request::GetContainerFileContentRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let (base_url, api_key) = base_and_key(config, credential)?;
        let url = build_url(
            Some(base_url),
            DEFAULT_BASE_URL,
            &format!(
                "/v1/containers/{}/files/{}/content",
                req.container_id, req.file_id
            ),
        );
        let mut headers = Vec::new();
        auth_extractor::set_bearer(&mut headers, api_key);
        Ok(UpstreamHttpRequest {
            method: HttpMethod::Get,
            url,
            headers,
            body: None,
            is_stream: false,
        })
    }

    async fn build_openai_container_file_delete(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::openai::containers::request::DeleteContainerFileRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let (base_url, api_key) = base_and_key(config, credential)?;
        let url = build_url(
            Some(base_url),
            DEFAULT_BASE_URL,
            &format!(
                "/v1/containers/{}/files/{}",
                req.container_id, req.file_id
            ),
        );
        let mut headers = Vec::new();
        auth_extractor::set_bearer(&mut headers, api_key);
        auth_extractor::set_accept_json(&mut headers);
        Ok(UpstreamHttpRequest {
            method: HttpMethod::Delete,
            url,
            headers,
            body: None,
            is_stream: false,
        })
    }

    async fn build_openai_container_file_list(
        &self,
        _ctx: &UpstreamCtx,
        config: &ProviderConfig,
        credential: &Credential,
        req: &gproxy_protocol::openai::containers::request::ListContainerFilesRequest,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let (base_url, api_key) = base_and_key(config, credential)?;
        let mut url = build_url(
            Some(base_url),
            DEFAULT_BASE_URL,
            &format!("/v1/containers/{}/files", req.container_id),
        );
        let mut parts = Vec::new();
        if let Some(after) = &req.after {
            parts.push(format!("after={after}"));
        }
        if let Some(limit) = req.limit {
            parts.push(format!("limit={limit}"));
        }
        if !parts.is_empty() {
            url.push('?');
            url.push_str(&parts.join("&"));
        }
        let mut headers = Vec::new();
        auth_extractor::set_bearer(&mut headers, api_key);
        auth_extractor::set_accept_json(&mut headers);
        Ok(UpstreamHttpRequest {
            method: HttpMethod::Get,
            url,
            headers,
            body: None,
            is_stream: false,
        })
    }
}

fn base_and_key<'a>(
    config: &'a ProviderConfig,
    credential: &'a Credential,
) -> ProviderResult<(&'a str, &'a str)> {
    let base_url = match config {
        ProviderConfig::OpenAI(cfg) => cfg.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL),
        _ => {
            return Err(ProviderError::InvalidConfig(
                "expected ProviderConfig::OpenAI".to_string(),
            ));
        }
    };
    let api_key = match credential {
        Credential::OpenAI(ApiKeyCredential { api_key }) => api_key.as_str(),
        _ => {
            return Err(ProviderError::InvalidConfig(
                "expected Credential::OpenAI".to_string(),
            ));
        }
    };
    Ok((base_url.trim_end_matches('/'), api_key))
}

fn build_url(base_url: Option<&str>, default_base: &str, path: &str) -> String {
    let base = base_url.unwrap_or(default_base).trim_end_matches('/');
    let mut path = path.trim_start_matches('/');
    if base.ends_with("/v1") && (path == "v1" || path.starts_with("v1/")) {
        path = path.trim_start_matches("v1/").trim_start_matches("v1");
    }
    format!("{base}/{path}")
}
