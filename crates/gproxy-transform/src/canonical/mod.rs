//! The dialect-agnostic request/response hub. Most kinds just wrap the
//! existing pairwise dialect matrix (see `crate::generate_content`,
//! `crate::list_models`, `crate::count_tokens`); kinds with no pairwise
//! precedent (embedding/speech/transcription/image generation) get real
//! `ToCanonical`/`FromCanonical` conversions here instead.

pub mod embedding;
pub mod ids;
pub mod image;
pub mod speech;
pub mod transcription;
pub mod types;

#[cfg(test)]
mod tests;

pub use types::*;
