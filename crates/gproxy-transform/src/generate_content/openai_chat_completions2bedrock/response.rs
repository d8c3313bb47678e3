use gproxy_protocol::bedrock::converse::types::ConverseResponse;
use gproxy_protocol::openai::create_chat_completions::response::CreateChatCompletionResponse;

use crate::generate_content::{claude2bedrock, openai_chat_completions2claude};

/// Convert an AWS Bedrock Converse response into an OpenAI chat-completion response.
pub fn transform_response(response: ConverseResponse) -> CreateChatCompletionResponse {
    let claude_response = claude2bedrock::response::transform_response(response);
    openai_chat_completions2claude::response::transform_response(claude_response)
}
