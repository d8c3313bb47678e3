use gproxy_protocol::bedrock::converse::types::ConverseRequest;
use gproxy_protocol::openai::create_chat_completions::request::CreateChatCompletionRequest as OpenAIChatCompletionRequest;

use crate::generate_content::{claude2bedrock, openai_chat_completions2claude};

/// Convert an OpenAI chat-completion request into an AWS Bedrock Converse request, via the
/// same Claude intermediate representation used for the other cross-dialect conversions.
pub fn transform_request(request: OpenAIChatCompletionRequest) -> ConverseRequest {
    let claude_request = openai_chat_completions2claude::request::transform_request(request);
    claude2bedrock::request::transform_request(claude_request)
}
