pub mod request;
pub mod response;

pub use request::{
    BatchEmbedContentsRequest, BatchEmbedContentsRequestBody, EmbedContentPath,
    EmbedContentRequest, EmbedContentRequestBody,
};
pub use response::{BatchEmbedContentsResponse, ContentEmbedding, EmbedContentResponse};
