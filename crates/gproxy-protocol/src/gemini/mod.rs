pub mod batches;
pub mod count_tokens;
pub mod embed_content;
pub mod files;
pub mod generate_content;
pub mod get_model;
pub mod list_models;
pub mod predict;
pub mod stream_content;
pub mod types;
