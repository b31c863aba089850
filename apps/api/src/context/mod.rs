//! Prompt context: what the model is told about a user, and the prompt text
//! rendered from it.

pub mod builder;
pub mod peers;
pub mod prompts;

pub use builder::{ContextLimits, ContextSources, PromptContext, PromptContextBuilder};
