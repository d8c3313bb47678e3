use std::collections::BTreeMap;

use gproxy_protocol::bedrock::converse::types::{
    ContentBlock as BedrockContentBlock, ConverseResponse, StopReason as BedrockStopReason,
};
use gproxy_protocol::claude::create_message::response::CreateMessageResponse as ClaudeCreateMessageResponse;
use gproxy_protocol::claude::create_message::types::{
    BetaCacheCreation, BetaContentBlock, BetaMessage, BetaMessageRole, BetaMessageType,
    BetaServiceTierUsed, BetaStopReason, BetaTextBlock, BetaTextBlockType, BetaToolUseBlock,
    BetaToolUseBlockType, BetaUsage,
};

/// Convert an AWS Bedrock Converse response into a Claude create-message response.
pub fn transform_response(response: ConverseResponse) -> ClaudeCreateMessageResponse {
    let content = response
        .output
        .message
        .content
        .iter()
        .map(map_content_block)
        .collect();

    let usage = BetaUsage {
        cache_creation: BetaCacheCreation {
            ephemeral_1h_input_tokens: 0,
            ephemeral_5m_input_tokens: 0,
        },
        cache_creation_input_tokens: 0,
        cache_read_input_tokens: 0,
        input_tokens: response.usage.input_tokens.max(0) as u32,
        output_tokens: response.usage.output_tokens.max(0) as u32,
        server_tool_use: None,
        service_tier: BetaServiceTierUsed::Standard,
    };

    BetaMessage {
        id: "bedrock-converse".to_string(),
        container: None,
        content,
        context_management: None,
        model: gproxy_protocol::claude::count_tokens::types::Model::Custom("unknown".to_string()),
        role: BetaMessageRole::Assistant,
        stop_reason: Some(map_stop_reason(response.stop_reason)),
        stop_sequence: None,
        r#type: BetaMessageType::Message,
        usage,
    }
}

fn map_content_block(block: &BedrockContentBlock) -> BetaContentBlock {
    match block {
        BedrockContentBlock::Text(text) => BetaContentBlock::Text(BetaTextBlock {
            citations: None,
            text: text.clone(),
            r#type: BetaTextBlockType::Text,
        }),
        BedrockContentBlock::ToolUse(tool_use) => BetaContentBlock::ToolUse(BetaToolUseBlock {
            id: tool_use.tool_use_id.clone(),
            input: json_object(&tool_use.input),
            name: tool_use.name.clone(),
            r#type: BetaToolUseBlockType::ToolUse,
            caller: None,
        }),
        BedrockContentBlock::Image(_) | BedrockContentBlock::ToolResult(_) => {
            BetaContentBlock::Text(BetaTextBlock {
                citations: None,
                text: String::new(),
                r#type: BetaTextBlockType::Text,
            })
        }
    }
}

fn json_object(value: &serde_json::Value) -> BTreeMap<String, serde_json::Value> {
    value
        .as_object()
        .map(|map| map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        .unwrap_or_default()
}

fn map_stop_reason(reason: BedrockStopReason) -> BetaStopReason {
    match reason {
        BedrockStopReason::EndTurn => BetaStopReason::EndTurn,
        BedrockStopReason::ToolUse => BetaStopReason::ToolUse,
        BedrockStopReason::MaxTokens => BetaStopReason::MaxTokens,
        BedrockStopReason::StopSequence => BetaStopReason::StopSequence,
        BedrockStopReason::GuardrailIntervened => BetaStopReason::Refusal,
        BedrockStopReason::ContentFiltered => BetaStopReason::Refusal,
    }
}
