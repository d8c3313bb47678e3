pub mod request;
pub mod response;

pub use request::{CreateSpeechRequest, CreateSpeechRequestBody, SpeechResponseFormat};
pub use response::CreateSpeechResponse;
