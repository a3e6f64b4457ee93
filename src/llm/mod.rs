// src/llm/mod.rs

//! Outbound calls to the chat-completion API used to rewrite questions.

pub mod client;
pub mod envelope;
pub mod prompt;

pub use client::{ChatCompletion, ChatMessage, CompletionClient};
