use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenizeRequestBody {
    pub text: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct TokenizeRequest {
    pub body: TokenizeRequestBody,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizeMeta {
    // Reserved for API-version metadata Cohere echoes back; unused by gproxy.
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenizeResponse {
    pub tokens: Vec<i64>,
    pub token_strings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<TokenizeMeta>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetokenizeRequestBody {
    pub tokens: Vec<i64>,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct DetokenizeRequest {
    pub body: DetokenizeRequestBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetokenizeResponse {
    pub text: String,
}
