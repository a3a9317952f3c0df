//! LLM module - chat backend used by the translator

pub mod openai;
pub mod traits;

pub use openai::OpenAiClient;
pub use traits::{ChatProvider, GenerateOptions, LLMResponse, TokenUsage};
