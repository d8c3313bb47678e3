//! Cohere v2 chat/embed/rerank and v1 tokenize wire shapes.

pub mod chat;
pub mod embed;
pub mod rerank;
pub mod tokenize;
