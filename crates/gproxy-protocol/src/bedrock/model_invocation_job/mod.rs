use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModelInvocationJobStatus {
    Submitted,
    InProgress,
    Completed,
    Failed,
    Stopping,
    Stopped,
    PartiallyCompleted,
    Expired,
    Validating,
    Scheduled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct S3InputDataConfig {
    #[serde(rename = "s3InputFormat", skip_serializing_if = "Option::is_none")]
    pub s3_input_format: Option<String>,
    #[serde(rename = "s3Uri")]
    pub s3_uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputDataConfig {
    #[serde(rename = "s3InputDataConfig")]
    pub s3_input_data_config: S3InputDataConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct S3OutputDataConfig {
    #[serde(rename = "s3Uri")]
    pub s3_uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputDataConfig {
    #[serde(rename = "s3OutputDataConfig")]
    pub s3_output_data_config: S3OutputDataConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateModelInvocationJobRequestBody {
    pub job_name: String,
    pub model_id: String,
    pub role_arn: String,
    pub input_data_config: InputDataConfig,
    pub output_data_config: OutputDataConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_duration_in_hours: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct CreateModelInvocationJobRequest {
    pub body: CreateModelInvocationJobRequestBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateModelInvocationJobResponse {
    #[serde(rename = "jobArn")]
    pub job_arn: String,
}

#[derive(Debug, Clone)]
pub struct GetModelInvocationJobRequest {
    /// canonical base64(ARN); decoded back to the ARN before being sent to
    /// Bedrock.
    pub job_identifier: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInvocationJobSummary {
    #[serde(rename = "jobArn")]
    pub job_arn: String,
    pub job_name: String,
    pub model_id: String,
    pub status: ModelInvocationJobStatus,
    pub submit_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    pub input_data_config: InputDataConfig,
    pub output_data_config: OutputDataConfig,
}

#[derive(Debug, Clone)]
pub struct StopModelInvocationJobRequest {
    pub job_identifier: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopModelInvocationJobResponse {}

#[derive(Debug, Clone, Default)]
pub struct ListModelInvocationJobsRequest {
    pub status_equals: Option<ModelInvocationJobStatus>,
    pub next_token: Option<String>,
    pub max_results: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListModelInvocationJobsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    pub invocation_job_summaries: Vec<ModelInvocationJobSummary>,
}
