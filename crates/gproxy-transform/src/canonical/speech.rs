//! OpenAI `audio/speech` <-> canonical. No other dialect exposes a
//! speech-synthesis surface, so this hub has a single adapter.

use gproxy_protocol::openai::speech::request::SpeechResponseFormat;
use gproxy_protocol::openai::speech::{
    CreateSpeechRequest, CreateSpeechRequestBody, CreateSpeechResponse,
};

use super::types::{CanonicalError, ExtraFields, Provider, SpeechRequest, SpeechResponse};

pub fn openai_to_canonical(req: &CreateSpeechRequest) -> Result<SpeechRequest, CanonicalError> {
    let (provider, model) = Provider::split_model(&req.body.model);
    let mut extra_params = super::types::ExtraParams::default();
    if let Some(speed) = req.body.speed {
        extra_params.insert("speed", serde_json::json!(speed));
    }
    if let Some(instructions) = &req.body.instructions {
        extra_params.insert("instructions", serde_json::Value::String(instructions.clone()));
    }
    Ok(SpeechRequest {
        provider: provider.unwrap_or(Provider::OpenAI),
        model: model.to_string(),
        input: req.body.input.clone(),
        voice: req.body.voice.clone(),
        response_format: req.body.response_format.map(|f| format!("{f:?}").to_lowercase()),
        extra_params,
    })
}

pub fn canonical_to_openai(req: &SpeechRequest) -> CreateSpeechRequestBody {
    CreateSpeechRequestBody {
        model: req.model.clone(),
        input: req.input.clone(),
        voice: req.voice.clone(),
        response_format: req.response_format.as_deref().and_then(parse_response_format),
        speed: req
            .extra_params
            .0
            .get("speed")
            .and_then(|v| v.as_f64()),
        instructions: req
            .extra_params
            .0
            .get("instructions")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()),
        stream_format: None,
    }
}

fn parse_response_format(s: &str) -> Option<SpeechResponseFormat> {
    match s {
        "mp3" => Some(SpeechResponseFormat::Mp3),
        "opus" => Some(SpeechResponseFormat::Opus),
        "aac" => Some(SpeechResponseFormat::Aac),
        "flac" => Some(SpeechResponseFormat::Flac),
        "wav" => Some(SpeechResponseFormat::Wav),
        "pcm" => Some(SpeechResponseFormat::Pcm),
        _ => None,
    }
}

pub fn canonical_from_openai_response(
    resp: CreateSpeechResponse,
    extra_fields: ExtraFields,
) -> SpeechResponse {
    SpeechResponse {
        content_type: resp.content_type().to_string(),
        audio: resp.audio,
        extra_fields,
    }
}
