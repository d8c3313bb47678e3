//! OpenAI `audio/transcriptions` <-> canonical.

use gproxy_protocol::openai::transcriptions::{
    CreateTranscriptionRequest, CreateTranscriptionResponse,
};

use super::types::{CanonicalError, ExtraFields, Provider, TranscriptionRequest, TranscriptionResponse};

pub fn openai_to_canonical(
    req: &CreateTranscriptionRequest,
) -> Result<TranscriptionRequest, CanonicalError> {
    let (provider, model) = Provider::split_model(&req.model);
    Ok(TranscriptionRequest {
        provider: provider.unwrap_or(Provider::OpenAI),
        model: model.to_string(),
        audio: req.file.clone(),
        language: req.language.clone(),
        prompt: req.prompt.clone(),
        extra_params: super::types::ExtraParams::default(),
    })
}

pub fn canonical_from_openai_response(
    resp: CreateTranscriptionResponse,
    extra_fields: ExtraFields,
) -> TranscriptionResponse {
    TranscriptionResponse {
        text: resp.text,
        extra_fields,
    }
}
