//! Cadence LLM - Comment Generation
//!
//! This crate turns a post description into comment text:
//! - Generator: `CommentGenerator` trait, prompt building, output cleanup
//! - OpenAI-compatible: chat-completions client for OpenAI-style APIs
//! - Mock: queued responses for tests and offline runs

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod generator;
pub mod mock;
pub mod openai_compat;
pub mod util;

pub use error::{Error, Result};
pub use generator::{
    build_prompt, clean_comment, CommentGenerator, PostDescription, PromptMessage, Role,
    MAX_COMMENT_CHARS,
};
pub use mock::MockGenerator;
pub use openai_compat::{OpenAiCompatConfig, OpenAiCompatGenerator};
