//! LLM-backed stages.
//!
//! An [`LlmStage`] fills a prompt template from its declared input fields,
//! optionally appends web research, asks the provider and returns the reply
//! as the value of its output field.

mod llm_stage;
mod prompt;

pub use llm_stage::LlmStage;
pub use prompt::render_prompt;
