use gproxy_protocol::cohere::chat::response::ChatResponse;
use gproxy_protocol::openai::create_chat_completions::response::CreateChatCompletionResponse;

use crate::generate_content::{claude2cohere, openai_chat_completions2claude};

/// Convert a Cohere chat response into an OpenAI chat-completion response.
pub fn transform_response(response: ChatResponse) -> CreateChatCompletionResponse {
    let claude_response = claude2cohere::response::transform_response(response);
    openai_chat_completions2claude::response::transform_response(claude_response)
}
