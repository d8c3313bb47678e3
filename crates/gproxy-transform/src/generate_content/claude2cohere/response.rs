use gproxy_protocol::claude::create_message::response::CreateMessageResponse as ClaudeCreateMessageResponse;
use gproxy_protocol::claude::create_message::types::{
    BetaCacheCreation, BetaContentBlock, BetaMessage, BetaMessageRole, BetaMessageType,
    BetaServiceTierUsed, BetaStopReason, BetaTextBlock, BetaTextBlockType, BetaToolUseBlock,
    BetaToolUseBlockType, BetaUsage,
};
use gproxy_protocol::cohere::chat::request::{CohereContent, CohereContentBlock, CohereToolCall};
use gproxy_protocol::cohere::chat::response::{ChatResponse, CohereFinishReason};

/// Convert a Cohere chat response into a Claude create-message response.
pub fn transform_response(response: ChatResponse) -> ClaudeCreateMessageResponse {
    let mut content = Vec::new();
    if let Some(text) = text_content(response.message.content) {
        content.push(BetaContentBlock::Text(BetaTextBlock {
            citations: None,
            text,
            r#type: BetaTextBlockType::Text,
        }));
    }
    for tool_call in response.message.tool_calls.into_iter().flatten() {
        content.push(map_tool_call(tool_call));
    }

    let billed_units = response.usage.billed_units.unwrap_or_default();
    let usage = BetaUsage {
        cache_creation: BetaCacheCreation {
            ephemeral_1h_input_tokens: 0,
            ephemeral_5m_input_tokens: 0,
        },
        cache_creation_input_tokens: 0,
        cache_read_input_tokens: 0,
        input_tokens: billed_units.input_tokens.max(0) as u32,
        output_tokens: billed_units.output_tokens.max(0) as u32,
        server_tool_use: None,
        service_tier: BetaServiceTierUsed::Standard,
    };

    BetaMessage {
        id: response.id,
        container: None,
        content,
        context_management: None,
        model: gproxy_protocol::claude::count_tokens::types::Model::Custom("unknown".to_string()),
        role: BetaMessageRole::Assistant,
        stop_reason: Some(map_finish_reason(response.finish_reason)),
        stop_sequence: None,
        r#type: BetaMessageType::Message,
        usage,
    }
}

fn text_content(content: Option<CohereContent>) -> Option<String> {
    match content? {
        CohereContent::Text(text) => Some(text),
        CohereContent::Blocks(blocks) => {
            let text = blocks
                .into_iter()
                .filter_map(|block| match block {
                    CohereContentBlock::Text { text } => Some(text),
                    CohereContentBlock::ImageUrl { .. } => None,
                })
                .collect::<Vec<_>>()
                .join("\n");
            if text.is_empty() { None } else { Some(text) }
        }
    }
}

fn map_tool_call(tool_call: CohereToolCall) -> BetaContentBlock {
    let value: serde_json::Value =
        serde_json::from_str(&tool_call.function.arguments).unwrap_or(serde_json::Value::Null);
    BetaContentBlock::ToolUse(BetaToolUseBlock {
        id: tool_call.id,
        input: json_object(&value),
        name: tool_call.function.name,
        r#type: BetaToolUseBlockType::ToolUse,
        caller: None,
    })
}

fn json_object(value: &serde_json::Value) -> std::collections::BTreeMap<String, serde_json::Value> {
    value
        .as_object()
        .map(|map| map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        .unwrap_or_default()
}

fn map_finish_reason(reason: CohereFinishReason) -> BetaStopReason {
    match reason {
        CohereFinishReason::Complete => BetaStopReason::EndTurn,
        CohereFinishReason::StopSequence => BetaStopReason::StopSequence,
        CohereFinishReason::MaxTokens => BetaStopReason::MaxTokens,
        CohereFinishReason::ToolCall => BetaStopReason::ToolUse,
        CohereFinishReason::Error => BetaStopReason::Refusal,
    }
}
