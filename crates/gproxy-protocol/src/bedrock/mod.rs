//! AWS Bedrock native wire shapes: Converse/ConverseStream, the raw
//! InvokeModel passthrough surface, batch jobs, and the S3-compatible
//! object store used for Bedrock file/batch inputs and outputs.

pub mod converse;
pub mod invoke;
pub mod model_invocation_job;
pub mod object_store;
