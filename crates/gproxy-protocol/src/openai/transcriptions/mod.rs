pub mod request;
pub mod response;

pub use request::{CreateTranscriptionRequest, TimestampGranularity, TranscriptionResponseFormat};
pub use response::CreateTranscriptionResponse;
