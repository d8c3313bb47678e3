//! OpenAI `embeddings` <-> canonical. Gemini's `embedContent`/
//! `batchEmbedContents` reuse the same canonical shape; their adapters are
//! `gemini_embed_to_canonical`/`gemini_batch_embed_to_canonical` and the
//! matching `canonical_to_gemini_*_response` functions below.

use gproxy_protocol::gemini::count_tokens::types::Content;
use gproxy_protocol::gemini::embed_content::request::{
    BatchEmbedContentsRequestBody, EmbedContentRequestBody,
};
use gproxy_protocol::gemini::embed_content::response::{
    BatchEmbedContentsResponse, ContentEmbedding, EmbedContentResponse,
};
use gproxy_protocol::openai::embeddings::request::{CreateEmbeddingRequestBody, EmbeddingInput};
use gproxy_protocol::openai::embeddings::response::{
    CreateEmbeddingResponse, Embedding, EmbeddingListObjectType, EmbeddingObjectType,
    EmbeddingUsage, EmbeddingVector,
};
use gproxy_protocol::openai::embeddings::{CreateEmbeddingRequest, EmbeddingEncodingFormat};

use super::types::{CanonicalError, EmbeddingRequest, EmbeddingResponse, ExtraFields, Provider, Usage};

pub fn openai_to_canonical(req: &CreateEmbeddingRequest) -> Result<EmbeddingRequest, CanonicalError> {
    let (provider, model) = Provider::split_model(&req.body.model);
    let texts = match &req.body.input {
        EmbeddingInput::Text(s) => vec![s.clone()],
        EmbeddingInput::Texts(v) => v.clone(),
        EmbeddingInput::Tokens(_) | EmbeddingInput::TokenBatches(_) => {
            return Err(CanonicalError::conversion_failure(
                "token-array embedding input has no canonical text slot",
            ));
        }
    };
    let encoding_format = req.body.encoding_format.map(|f| match f {
        EmbeddingEncodingFormat::Float => "float".to_string(),
        EmbeddingEncodingFormat::Base64 => "base64".to_string(),
    });
    let mut extra_params = super::types::ExtraParams::default();
    if let Some(user) = &req.body.user {
        extra_params.insert("user", serde_json::Value::String(user.clone()));
    }
    Ok(EmbeddingRequest {
        provider: provider.unwrap_or(Provider::OpenAI),
        model: model.to_string(),
        texts,
        encoding_format,
        dimensions: req.body.dimensions,
        extra_params,
    })
}

pub fn canonical_to_openai(
    req: &EmbeddingRequest,
) -> Result<CreateEmbeddingRequestBody, CanonicalError> {
    let input = if req.texts.len() == 1 {
        EmbeddingInput::Text(req.texts[0].clone())
    } else {
        EmbeddingInput::Texts(req.texts.clone())
    };
    Ok(CreateEmbeddingRequestBody {
        input,
        model: req.model.clone(),
        encoding_format: req.encoding_format.as_deref().map(|f| match f {
            "base64" => EmbeddingEncodingFormat::Base64,
            _ => EmbeddingEncodingFormat::Float,
        }),
        dimensions: req.dimensions,
        user: req
            .extra_params
            .0
            .get("user")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()),
    })
}

pub fn canonical_from_openai_response(
    resp: &CreateEmbeddingResponse,
    extra_fields: ExtraFields,
) -> Result<EmbeddingResponse, CanonicalError> {
    let mut embeddings = Vec::with_capacity(resp.data.len());
    for item in &resp.data {
        match &item.embedding {
            EmbeddingVector::Float(v) => embeddings.push(v.clone()),
            EmbeddingVector::Base64(_) => {
                return Err(CanonicalError::conversion_failure(
                    "base64-encoded embedding vector is not decoded by the canonical hub",
                ));
            }
        }
    }
    Ok(EmbeddingResponse {
        model: resp.model.clone(),
        embeddings,
        usage: Usage {
            input_tokens: resp.usage.prompt_tokens,
            output_tokens: 0,
            total_tokens: resp.usage.total_tokens,
        },
        extra_fields,
    })
}

pub fn openai_response_from_canonical(
    resp: &EmbeddingResponse,
) -> Result<CreateEmbeddingResponse, CanonicalError> {
    let data = resp
        .embeddings
        .iter()
        .enumerate()
        .map(|(i, v)| Embedding {
            object: EmbeddingObjectType::Embedding,
            embedding: EmbeddingVector::Float(v.clone()),
            index: i as i64,
        })
        .collect();
    Ok(CreateEmbeddingResponse {
        object: EmbeddingListObjectType::List,
        data,
        model: resp.model.clone(),
        usage: EmbeddingUsage {
            prompt_tokens: resp.usage.input_tokens,
            total_tokens: resp.usage.total_tokens,
        },
    })
}

/// Gemini `embedContent`/`batchEmbedContents` carry `content.parts[].text`
/// rather than a flat string list; only text parts have a canonical slot.
pub fn gemini_contents_to_texts(contents: &[Content]) -> Vec<String> {
    contents
        .iter()
        .flat_map(|c| c.parts.iter().filter_map(|p| p.text.clone()))
        .collect()
}

pub fn gemini_embed_to_canonical(
    model: &str,
    body: &EmbedContentRequestBody,
) -> Result<EmbeddingRequest, CanonicalError> {
    let (provider, model) = Provider::split_model(model);
    let texts = gemini_contents_to_texts(std::slice::from_ref(&body.content));
    if texts.is_empty() {
        return Err(CanonicalError::conversion_failure(
            "embedContent request carries no text part",
        ));
    }
    Ok(EmbeddingRequest {
        provider: provider.unwrap_or(Provider::Gemini),
        model: model.to_string(),
        texts,
        encoding_format: None,
        dimensions: body.output_dimensionality,
        extra_params: super::types::ExtraParams::default(),
    })
}

pub fn gemini_batch_embed_to_canonical(
    model: &str,
    body: &BatchEmbedContentsRequestBody,
) -> Result<EmbeddingRequest, CanonicalError> {
    let (provider, model) = Provider::split_model(model);
    let contents: Vec<Content> = body.requests.iter().map(|r| r.content.clone()).collect();
    let texts = gemini_contents_to_texts(&contents);
    if texts.is_empty() {
        return Err(CanonicalError::conversion_failure(
            "batchEmbedContents request carries no text parts",
        ));
    }
    let dimensions = body.requests.first().and_then(|r| r.output_dimensionality);
    Ok(EmbeddingRequest {
        provider: provider.unwrap_or(Provider::Gemini),
        model: model.to_string(),
        texts,
        encoding_format: None,
        dimensions,
        extra_params: super::types::ExtraParams::default(),
    })
}

pub fn canonical_to_gemini_embed_response(
    resp: &EmbeddingResponse,
) -> Result<EmbedContentResponse, CanonicalError> {
    let values = resp
        .embeddings
        .first()
        .ok_or_else(|| CanonicalError::conversion_failure("embedding response has no vectors"))?
        .clone();
    Ok(EmbedContentResponse {
        embedding: ContentEmbedding { values },
    })
}

pub fn canonical_to_gemini_batch_embed_response(
    resp: &EmbeddingResponse,
) -> BatchEmbedContentsResponse {
    BatchEmbedContentsResponse {
        embeddings: resp
            .embeddings
            .iter()
            .map(|values| ContentEmbedding {
                values: values.clone(),
            })
            .collect(),
    }
}
