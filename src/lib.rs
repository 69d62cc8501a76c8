//! Promptr - prompt template pipeline with structured response parsing
//!
//! Promptr loads a prompt template from a file, substitutes `{name}`
//! placeholders with caller-supplied values, sends the rendered prompt to a
//! chat endpoint, and parses the raw response into a "think" segment and a
//! "data" payload.

pub mod error;
pub mod llm;
pub mod response;
pub mod service;
pub mod template;

pub use error::{PromptrError, Result};
