pub mod request;
pub mod response;

pub use request::{
    BatchRequestItem, CancelMessageBatchRequest, CreateMessageBatchRequest,
    CreateMessageBatchRequestBody, GetMessageBatchRequest, ListMessageBatchesRequest,
};
pub use response::{
    ListMessageBatchesResponse, MessageBatch, MessageBatchProcessingStatus,
    MessageBatchRequestCounts,
};
