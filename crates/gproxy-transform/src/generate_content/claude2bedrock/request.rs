use gproxy_protocol::bedrock::converse::types::{
    ContentBlock as BedrockContentBlock, ConverseRequest, ConverseRequestBody, ImageBlock,
    ImageSource, InferenceConfiguration, Message as BedrockMessage, Role as BedrockRole,
    SystemContentBlock, Tool as BedrockTool, ToolChoice as BedrockToolChoice,
    ToolConfiguration, ToolInputSchema, ToolResultBlock as BedrockToolResultBlock,
    ToolResultContentBlock, ToolResultStatus, ToolSpecification, ToolUseBlock as BedrockToolUseBlock,
};
use gproxy_protocol::claude::count_tokens::types::{
    BetaContentBlockParam as ClaudeContentBlockParam, BetaImageMediaType as ClaudeImageMediaType,
    BetaImageSource as ClaudeImageSource,
    BetaMessageContent as ClaudeMessageContent, BetaMessageParam as ClaudeMessageParam,
    BetaMessageRole as ClaudeMessageRole, BetaSystemParam as ClaudeSystemParam,
    BetaTool as ClaudeTool, BetaToolChoice as ClaudeToolChoice,
    BetaToolResultBlockParam as ClaudeToolResultBlock,
    BetaToolResultContent as ClaudeToolResultContent,
    BetaToolResultContentBlockParam as ClaudeToolResultContentBlock,
    BetaToolUseBlockParam as ClaudeToolUseBlock, Model as ClaudeModel,
};
use gproxy_protocol::claude::create_message::request::CreateMessageRequest as ClaudeCreateMessageRequest;

/// Convert a Claude create-message request into an AWS Bedrock Converse request.
///
/// Anthropic-only request shapes (builtin tools, thinking, MCP, containers) have no
/// Converse equivalent and are dropped; custom tools and the common content-block
/// kinds (text, image, tool_use, tool_result) carry over.
pub fn transform_request(request: ClaudeCreateMessageRequest) -> ConverseRequest {
    let model_id = map_model(&request.body.model);

    let system = request.body.system.map(map_system).filter(|s| !s.is_empty());

    let messages = request.body.messages.iter().map(map_message).collect();

    let inference_config = Some(InferenceConfiguration {
        max_tokens: Some(request.body.max_tokens as i64),
        temperature: request.body.temperature,
        top_p: request.body.top_p,
        stop_sequences: request.body.stop_sequences.clone(),
    });

    let tool_config = map_tool_config(request.body.tools, request.body.tool_choice);

    ConverseRequest {
        model_id,
        body: ConverseRequestBody {
            messages,
            system,
            inference_config,
            tool_config,
            guardrail_config: None,
            additional_model_request_fields: None,
            request_metadata: None,
        },
    }
}

fn map_model(model: &ClaudeModel) -> String {
    match model {
        ClaudeModel::Custom(value) => value.clone(),
        ClaudeModel::Known(known) => serde_json::to_value(known)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_else(|| "unknown".to_string()),
    }
}

fn map_system(system: ClaudeSystemParam) -> Vec<SystemContentBlock> {
    match system {
        ClaudeSystemParam::Text(text) => vec![SystemContentBlock::Text { text }],
        ClaudeSystemParam::Blocks(blocks) => blocks
            .into_iter()
            .map(|block| SystemContentBlock::Text { text: block.text })
            .collect(),
    }
}

fn map_message(message: &ClaudeMessageParam) -> BedrockMessage {
    let role = match message.role {
        ClaudeMessageRole::User => BedrockRole::User,
        ClaudeMessageRole::Assistant => BedrockRole::Assistant,
    };
    let content = match &message.content {
        ClaudeMessageContent::Text(text) => vec![BedrockContentBlock::Text(text.clone())],
        ClaudeMessageContent::Blocks(blocks) => {
            blocks.iter().filter_map(map_content_block).collect()
        }
    };
    BedrockMessage { role, content }
}

fn map_content_block(block: &ClaudeContentBlockParam) -> Option<BedrockContentBlock> {
    match block {
        ClaudeContentBlockParam::Text(text) => {
            Some(BedrockContentBlock::Text(text.text.clone()))
        }
        ClaudeContentBlockParam::Image(image) => map_image_block(&image.source),
        ClaudeContentBlockParam::ToolUse(tool_use) => {
            Some(map_tool_use_block(tool_use))
        }
        ClaudeContentBlockParam::ToolResult(tool_result) => {
            Some(map_tool_result_block(tool_result))
        }
        _ => None,
    }
}

fn map_image_block(source: &ClaudeImageSource) -> Option<BedrockContentBlock> {
    match source {
        ClaudeImageSource::Base64 { data, media_type } => {
            let format = match media_type {
                ClaudeImageMediaType::ImageJpeg => "jpeg",
                ClaudeImageMediaType::ImagePng => "png",
                ClaudeImageMediaType::ImageGif => "gif",
                ClaudeImageMediaType::ImageWebp => "webp",
            }
            .to_string();
            Some(BedrockContentBlock::Image(ImageBlock {
                format,
                source: ImageSource {
                    bytes: data.clone(),
                },
            }))
        }
        ClaudeImageSource::Url { .. } | ClaudeImageSource::File { .. } => None,
    }
}

fn map_tool_use_block(tool_use: &ClaudeToolUseBlock) -> BedrockContentBlock {
    BedrockContentBlock::ToolUse(BedrockToolUseBlock {
        tool_use_id: tool_use.id.clone(),
        name: tool_use.name.clone(),
        input: serde_json::to_value(&tool_use.input).unwrap_or(serde_json::Value::Null),
    })
}

fn map_tool_result_block(tool_result: &ClaudeToolResultBlock) -> BedrockContentBlock {
    let content = match &tool_result.content {
        Some(ClaudeToolResultContent::Text(text)) => {
            vec![ToolResultContentBlock::Text { text: text.clone() }]
        }
        Some(ClaudeToolResultContent::Blocks(blocks)) => blocks
            .iter()
            .map(|block| match block {
                ClaudeToolResultContentBlock::Text(text) => {
                    ToolResultContentBlock::Text { text: text.text.clone() }
                }
                other => ToolResultContentBlock::Json {
                    json: serde_json::to_value(other).unwrap_or(serde_json::Value::Null),
                },
            })
            .collect(),
        None => Vec::new(),
    };
    let status = tool_result.is_error.map(|is_error| {
        if is_error {
            ToolResultStatus::Error
        } else {
            ToolResultStatus::Success
        }
    });
    BedrockContentBlock::ToolResult(BedrockToolResultBlock {
        tool_use_id: tool_result.tool_use_id.clone(),
        content,
        status,
    })
}

fn map_tool_config(
    tools: Option<Vec<ClaudeTool>>,
    tool_choice: Option<ClaudeToolChoice>,
) -> Option<ToolConfiguration> {
    let tools: Vec<BedrockTool> = tools
        .unwrap_or_default()
        .into_iter()
        .filter_map(|tool| match tool {
            ClaudeTool::Custom(custom) => Some(BedrockTool {
                tool_spec: ToolSpecification {
                    name: custom.name,
                    description: custom.description,
                    input_schema: Some(ToolInputSchema::Json(serde_json::json!({
                        "type": "object",
                        "properties": custom.input_schema.properties,
                        "required": custom.input_schema.required,
                    }))),
                },
            }),
            ClaudeTool::Builtin(_) => None,
        })
        .collect();

    if tools.is_empty() {
        return None;
    }

    let tool_choice = tool_choice.map(|choice| match choice {
        ClaudeToolChoice::Auto { .. } => BedrockToolChoice::Auto,
        ClaudeToolChoice::Any { .. } => BedrockToolChoice::Any,
        ClaudeToolChoice::Tool { name, .. } => BedrockToolChoice::Tool { name },
        ClaudeToolChoice::None => BedrockToolChoice::Auto,
    });

    Some(ToolConfiguration {
        tools,
        tool_choice,
    })
}
