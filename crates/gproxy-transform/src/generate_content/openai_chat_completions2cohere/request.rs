use gproxy_protocol::cohere::chat::request::ChatRequest;
use gproxy_protocol::openai::create_chat_completions::request::CreateChatCompletionRequest as OpenAIChatCompletionRequest;

use crate::generate_content::{claude2cohere, openai_chat_completions2claude};

/// Convert an OpenAI chat-completion request into a Cohere chat request, via the same
/// Claude intermediate representation used for the other cross-dialect conversions.
pub fn transform_request(request: OpenAIChatCompletionRequest) -> ChatRequest {
    let claude_request = openai_chat_completions2claude::request::transform_request(request);
    claude2cohere::request::transform_request(claude_request)
}
