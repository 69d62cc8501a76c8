//! Chat Client Layer - Anthropic API integration
//!
//! This module provides:
//! - Message types for chat communication
//! - ChatClient trait for API abstraction
//! - AnthropicClient implementation

pub mod anthropic;
pub mod client;
pub mod types;

pub use anthropic::{AnthropicClient, AnthropicConfig};
pub use client::ChatClient;
pub use types::{ChatRequest, ChatResponse, Message, Role, Usage};
