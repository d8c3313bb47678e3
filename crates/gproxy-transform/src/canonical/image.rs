//! OpenAI `images/generations` <-> canonical. Gemini's `:predict` action is
//! treated as image generation unconditionally: in the upstream Gemini API
//! `:predict` is exclusively an Imagen call, so there is no other
//! predict-shaped surface to disambiguate against.

use gproxy_protocol::gemini::predict::request::PredictRequestBody;
use gproxy_protocol::gemini::predict::response::{PredictPrediction, PredictResponse};
use gproxy_protocol::openai::images::request::ImageResponseFormat;
use gproxy_protocol::openai::images::{CreateImageRequest, CreateImageRequestBody, ImagesResponse};

use super::types::{
    CanonicalError, ExtraFields, ImageDatum, ImageGenerationRequest, ImageGenerationResponse,
    Provider,
};

pub fn openai_to_canonical(
    req: &CreateImageRequest,
) -> Result<ImageGenerationRequest, CanonicalError> {
    let (provider, model) = req
        .body
        .model
        .as_deref()
        .map(|m| {
            let (p, m) = Provider::split_model(m);
            (p, Some(m.to_string()))
        })
        .unwrap_or((None, None));
    Ok(ImageGenerationRequest {
        provider: provider.unwrap_or(Provider::OpenAI),
        model,
        prompt: req.body.prompt.clone(),
        n: req.body.n,
        size: req.body.size.clone(),
        response_format: req.body.response_format.map(|f| match f {
            ImageResponseFormat::Url => "url".to_string(),
            ImageResponseFormat::B64Json => "b64_json".to_string(),
        }),
        extra_params: super::types::ExtraParams::default(),
    })
}

pub fn canonical_to_openai(req: &ImageGenerationRequest) -> CreateImageRequestBody {
    CreateImageRequestBody {
        prompt: req.prompt.clone(),
        model: req.model.clone(),
        n: req.n,
        quality: None,
        response_format: req.response_format.as_deref().and_then(|f| match f {
            "url" => Some(ImageResponseFormat::Url),
            "b64_json" => Some(ImageResponseFormat::B64Json),
            _ => None,
        }),
        background: None,
        moderation: None,
        output_compression: None,
        output_format: None,
        size: req.size.clone(),
        style: None,
        stream: None,
        user: None,
    }
}

pub fn canonical_from_openai_response(
    resp: ImagesResponse,
    extra_fields: ExtraFields,
) -> ImageGenerationResponse {
    ImageGenerationResponse {
        images: resp
            .data
            .into_iter()
            .map(|d| ImageDatum {
                url: d.url,
                b64_json: d.b64_json,
                revised_prompt: d.revised_prompt,
            })
            .collect(),
        extra_fields,
    }
}

pub fn gemini_predict_to_canonical(
    model: &str,
    body: &PredictRequestBody,
) -> Result<ImageGenerationRequest, CanonicalError> {
    let (provider, model) = Provider::split_model(model);
    let prompt = body
        .instances
        .first()
        .map(|i| i.prompt.clone())
        .ok_or_else(|| CanonicalError::conversion_failure("predict request has no instances"))?;
    let n = body.parameters.as_ref().and_then(|p| p.sample_count);
    Ok(ImageGenerationRequest {
        provider: provider.unwrap_or(Provider::Gemini),
        model: Some(model.to_string()),
        prompt,
        n,
        size: None,
        response_format: Some("b64_json".to_string()),
        extra_params: super::types::ExtraParams::default(),
    })
}

pub fn canonical_to_gemini_predict_response(resp: &ImageGenerationResponse) -> PredictResponse {
    PredictResponse {
        predictions: resp
            .images
            .iter()
            .filter_map(|img| {
                img.b64_json.clone().map(|bytes_base64_encoded| PredictPrediction {
                    bytes_base64_encoded,
                    mime_type: Some("image/png".to_string()),
                })
            })
            .collect(),
    }
}
