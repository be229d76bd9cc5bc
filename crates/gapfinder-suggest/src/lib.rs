//! Text generation adapter: prompt building, an OpenAI-compatible
//! chat-completions client, and tolerant parsing of the answers.

pub mod client;
pub mod error;
pub mod parse;
pub mod prompt;

pub use client::LlmClient;
pub use error::SuggestError;
pub use parse::{extract_json, parse_competition_analysis, parse_suggestions};
pub use prompt::{build_competition_prompt, build_suggestion_prompt, SYSTEM_PROMPT};
