use bytes::Bytes;

/// `InvokeModel`/`InvokeModelWithResponseStream` pass the model-native JSON
/// body straight through to Bedrock (each model family defines its own
/// schema, e.g. Anthropic Claude's `messages` shape or Amazon Titan's
/// `inputText`); the core never parses it, it only routes by `{modelId}`
/// and re-frames the response/stream.
#[derive(Debug, Clone)]
pub struct InvokeModelRequest {
    pub model_id: String,
    pub body: Bytes,
    pub content_type: String,
    pub accept: String,
}

#[derive(Debug, Clone)]
pub struct InvokeModelResponse {
    pub body: Bytes,
    pub content_type: String,
}

#[derive(Debug, Clone)]
pub struct InvokeModelWithResponseStreamRequest {
    pub model_id: String,
    pub body: Bytes,
    pub content_type: String,
    pub accept: String,
}
