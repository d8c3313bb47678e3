pub mod request;
pub mod response;
pub mod stream;
pub mod types;

pub use request::{CreateResponseRequest, CreateResponseRequestBody};
pub use response::Response;
pub use stream::ResponseStreamEvent;
