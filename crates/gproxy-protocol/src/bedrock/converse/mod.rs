pub mod stream;
pub mod types;

pub use stream::ConverseStreamOutput;
pub use types::{
    ContentBlock, ConverseErrorResponse, ConverseRequest, ConverseRequestBody, ConverseResponse,
    Message, Role, StopReason,
};

#[derive(Debug, Clone)]
pub struct ConverseStreamRequest {
    pub model_id: String,
    pub body: ConverseRequestBody,
}
