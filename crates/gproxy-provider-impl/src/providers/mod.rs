//! Concrete `UpstreamProvider` implementations, one module per dialect/vendor.

pub mod http_client;
pub mod oauth_common;

pub mod aistudio;
pub mod azure;
pub mod bedrock;
pub mod claude;
pub mod cohere;
pub mod custom;
pub mod mistral;
pub mod openai;
pub mod vertex;
pub mod vertexexpress;

pub use aistudio::AIStudioProvider;
pub use azure::AzureOpenAIProvider;
pub use bedrock::BedrockProvider;
pub use claude::ClaudeProvider;
pub use cohere::CohereProvider;
pub use custom::CustomProvider;
pub use mistral::MistralProvider;
pub use openai::OpenAIProvider;
pub use vertex::VertexProvider;
pub use vertexexpress::VertexExpressProvider;
