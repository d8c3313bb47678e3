pub mod request;
pub mod response;

pub use request::{CancelBatchRequest, CreateBatchRequest, GetBatchRequest, ListBatchesRequest};
pub use response::{Batch, BatchStatus, ListBatchesResponse};
