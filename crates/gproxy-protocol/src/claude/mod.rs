pub mod batches;
pub mod count_tokens;
pub mod create_message;
pub mod error;
pub mod files;
pub mod get_model;
pub mod list_models;
pub mod types;
