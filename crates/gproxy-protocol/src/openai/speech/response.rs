use bytes::Bytes;

use super::request::SpeechResponseFormat;

/// Speech synthesis has no JSON response shape: the wire body is the raw
/// audio bytes, written with a `Content-Type` derived from the request's
/// `response_format` (defaulting to `audio/mpeg`) and a `Content-Disposition`
/// attachment header, per the pipeline's "no converter configured" default.
#[derive(Debug, Clone)]
pub struct CreateSpeechResponse {
    pub audio: Bytes,
    pub format: SpeechResponseFormat,
}

impl CreateSpeechResponse {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}
