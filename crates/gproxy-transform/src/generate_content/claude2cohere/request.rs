use gproxy_protocol::claude::count_tokens::types::{
    BetaContentBlockParam as ClaudeContentBlockParam, BetaImageMediaType as ClaudeImageMediaType,
    BetaImageSource as ClaudeImageSource,
    BetaMessageContent as ClaudeMessageContent, BetaMessageParam as ClaudeMessageParam,
    BetaMessageRole as ClaudeMessageRole, BetaSystemParam as ClaudeSystemParam,
    BetaTool as ClaudeTool, BetaToolResultBlockParam as ClaudeToolResultBlock,
    BetaToolResultContent as ClaudeToolResultContent, Model as ClaudeModel,
};
use gproxy_protocol::claude::create_message::request::CreateMessageRequest as ClaudeCreateMessageRequest;
use gproxy_protocol::cohere::chat::request::{
    ChatRequest, ChatRequestBody, CohereContent, CohereContentBlock, CohereImageUrl,
    CohereMessage, CohereRole, CohereTool, CohereToolCall, CohereToolCallFunction,
    CohereToolFunction,
};

/// Convert a Claude create-message request into a Cohere chat request.
pub fn transform_request(request: ClaudeCreateMessageRequest) -> ChatRequest {
    let model = map_model(&request.body.model);

    let mut messages = Vec::new();
    if let Some(system) = request.body.system {
        messages.push(CohereMessage {
            role: CohereRole::System,
            content: Some(CohereContent::Text(system_text(system))),
            tool_calls: None,
            tool_call_id: None,
        });
    }
    for message in &request.body.messages {
        messages.extend(map_message(message));
    }

    let tools = map_tools(request.body.tools);

    ChatRequest {
        body: ChatRequestBody {
            model,
            messages,
            tools,
            temperature: request.body.temperature,
            p: request.body.top_p,
            k: request.body.top_k.map(|k| k as i64),
            max_tokens: Some(request.body.max_tokens as i64),
            stop_sequences: request.body.stop_sequences.clone(),
            stream: request.body.stream,
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

fn system_text(system: ClaudeSystemParam) -> String {
    match system {
        ClaudeSystemParam::Text(text) => text,
        ClaudeSystemParam::Blocks(blocks) => blocks
            .into_iter()
            .map(|block| block.text)
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn map_message(message: &ClaudeMessageParam) -> Vec<CohereMessage> {
    match &message.content {
        ClaudeMessageContent::Text(text) => vec![CohereMessage {
            role: map_role(message.role),
            content: Some(CohereContent::Text(text.clone())),
            tool_calls: None,
            tool_call_id: None,
        }],
        ClaudeMessageContent::Blocks(blocks) => map_blocks(message.role, blocks),
    }
}

fn map_role(role: ClaudeMessageRole) -> CohereRole {
    match role {
        ClaudeMessageRole::User => CohereRole::User,
        ClaudeMessageRole::Assistant => CohereRole::Assistant,
    }
}

fn map_blocks(role: ClaudeMessageRole, blocks: &[ClaudeContentBlockParam]) -> Vec<CohereMessage> {
    let mut content_blocks = Vec::new();
    let mut tool_calls = Vec::new();
    let mut tool_messages = Vec::new();

    for block in blocks {
        match block {
            ClaudeContentBlockParam::Text(text) => {
                content_blocks.push(CohereContentBlock::Text {
                    text: text.text.clone(),
                });
            }
            ClaudeContentBlockParam::Image(image) => {
                if let Some(url) = image_url(&image.source) {
                    content_blocks.push(CohereContentBlock::ImageUrl {
                        image_url: CohereImageUrl { url },
                    });
                }
            }
            ClaudeContentBlockParam::ToolUse(tool_use) => {
                tool_calls.push(CohereToolCall {
                    id: tool_use.id.clone(),
                    r#type: "function".to_string(),
                    function: CohereToolCallFunction {
                        name: tool_use.name.clone(),
                        arguments: serde_json::to_string(&tool_use.input).unwrap_or_default(),
                    },
                });
            }
            ClaudeContentBlockParam::ToolResult(tool_result) => {
                tool_messages.push(map_tool_result(tool_result));
            }
            _ => {}
        }
    }

    let mut out = Vec::new();
    if !content_blocks.is_empty() || !tool_calls.is_empty() {
        out.push(CohereMessage {
            role: map_role(role),
            content: if content_blocks.is_empty() {
                None
            } else {
                Some(CohereContent::Blocks(content_blocks))
            },
            tool_calls: if tool_calls.is_empty() {
                None
            } else {
                Some(tool_calls)
            },
            tool_call_id: None,
        });
    }
    out.extend(tool_messages);
    out
}

fn image_url(source: &ClaudeImageSource) -> Option<String> {
    match source {
        ClaudeImageSource::Url { url } => Some(url.clone()),
        ClaudeImageSource::Base64 { data, media_type } => {
            let mime = match media_type {
                ClaudeImageMediaType::ImageJpeg => "image/jpeg",
                ClaudeImageMediaType::ImagePng => "image/png",
                ClaudeImageMediaType::ImageGif => "image/gif",
                ClaudeImageMediaType::ImageWebp => "image/webp",
            };
            Some(format!("data:{mime};base64,{data}"))
        }
        ClaudeImageSource::File { .. } => None,
    }
}

fn map_tool_result(tool_result: &ClaudeToolResultBlock) -> CohereMessage {
    let text = match &tool_result.content {
        Some(ClaudeToolResultContent::Text(text)) => text.clone(),
        Some(ClaudeToolResultContent::Blocks(blocks)) => serde_json::to_string(blocks)
            .unwrap_or_default(),
        None => String::new(),
    };
    CohereMessage {
        role: CohereRole::Tool,
        content: Some(CohereContent::Text(text)),
        tool_calls: None,
        tool_call_id: Some(tool_result.tool_use_id.clone()),
    }
}

fn map_tools(tools: Option<Vec<ClaudeTool>>) -> Option<Vec<CohereTool>> {
    let tools: Vec<CohereTool> = tools
        .unwrap_or_default()
        .into_iter()
        .filter_map(|tool| match tool {
            ClaudeTool::Custom(custom) => Some(CohereTool {
                r#type: "function".to_string(),
                function: CohereToolFunction {
                    name: custom.name,
                    description: custom.description,
                    parameters: Some(serde_json::json!({
                        "type": "object",
                        "properties": custom.input_schema.properties,
                        "required": custom.input_schema.required,
                    })),
                },
            }),
            ClaudeTool::Builtin(_) => None,
        })
        .collect();
    if tools.is_empty() { None } else { Some(tools) }
}
