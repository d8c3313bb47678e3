pub mod request;
pub mod response;

pub use request::{ChatRequest, ChatRequestBody, CohereContent, CohereMessage, CohereRole};
pub use response::{ChatResponse, CohereFinishReason};
