//! Protocol-to-protocol transforms between the native dialects gproxy speaks,
//! plus the canonical hub (`canonical`) used for request kinds no pairwise
//! dialect pair ever needed to convert directly.

pub mod canonical;
pub mod count_tokens;
pub mod generate_content;
pub mod get_model;
pub mod list_models;
pub mod middleware;
pub mod stream2nostream;
