//! Model clients. Every generative-model call in the service goes through a
//! `ModelClient` implementation from this module.
//!
//! Clients wrap exactly one network round trip per `invoke` and never retry.
//! Failure handling (fallback to canned content) belongs to the orchestrator.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::profile::Profile;
use crate::prompting;

pub mod anthropic;
pub mod gemini;
pub mod mock;
pub mod openai;
pub mod prompts;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("{service} did not answer within {}s", .timeout.as_secs())]
    Timeout { service: String, timeout: Duration },

    #[error("model returned empty content")]
    EmptyContent,

    #[error("prompt could not be built: {0}")]
    Prompt(#[from] prompting::PromptError),
}

/// A generative model reached over the network: `text -> text`.
///
/// `health_check` performs a real throwaway invocation. It is slow and counts
/// against rate limits, so callers should not poll it.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn invoke(&self, prompt: &str) -> Result<String, ModelError>;

    fn name(&self) -> &str;

    async fn health_check(&self) -> Result<(), ModelError> {
        self.invoke(prompts::HEALTH_CHECK_PROMPT).await.map(|_| ())
    }
}

/// Secondary model capable of free-form analysis of a candidate's skills.
#[async_trait]
pub trait SkillAnalyzer: ModelClient {
    async fn analyze_tech_skills(&self, profile: &Profile) -> Result<String, ModelError> {
        let prompt = prompting::skill_analysis_prompt(profile)?;
        self.invoke(&prompt).await
    }
}

/// Secondary model that drafts learning paths and summarizes documents.
#[async_trait]
pub trait PathDrafter: ModelClient {
    /// Returns a snake_case learning-path JSON draft built from `analysis`.
    async fn draft_learning_path(&self, analysis: &str) -> Result<String, ModelError> {
        let prompt = prompting::path_draft_prompt(analysis)?;
        self.invoke(&prompt).await
    }

    async fn summarize_document(&self, document: &str) -> Result<String, ModelError> {
        let prompt = prompting::document_summary_prompt(document)?;
        self.invoke(&prompt).await
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
/// Prose before the opening fence or after the closing fence is dropped.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(open) = text.find("```") else {
        return text;
    };

    let after_open = &text[open + 3..];
    // Skip an info string such as `json` up to the end of the fence line.
    let body = match after_open.find('\n') {
        Some(nl) if after_open[..nl].trim().chars().all(|c| c.is_ascii_alphanumeric()) => {
            &after_open[nl + 1..]
        }
        _ => after_open
            .strip_prefix("json")
            .or_else(|| after_open.strip_prefix("JSON"))
            .unwrap_or(after_open),
    };

    match body.rfind("```") {
        Some(close) => body[..close].trim(),
        None => body.trim(),
    }
}
