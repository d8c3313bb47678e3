pub mod request;
pub mod response;

pub use request::{
    BatchInputConfig, BatchSpec, CancelBatchRequest, CreateBatchPath, CreateBatchRequest,
    CreateBatchRequestBody, DeleteBatchRequest, GetBatchRequest, InlinedRequest, InlinedRequests,
    ListBatchesRequest,
};
pub use response::{BatchOperation, ListBatchesResponse};
