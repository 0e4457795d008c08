// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Turn the rendered digest into a short bullet summary via an OpenAI-compatible chat endpoint
// role: collaborator/summarizer
// inputs: ActivityDigest (rendered text + window labels), optional Summarizer
// outputs: Composed message text; a recorded failure when the summarizer was unusable
// side_effects: One HTTP POST per run when a summarizer is configured
// invariants:
// - any failure or empty reply falls back to the raw digest text
// - the prompt is built only from the digest; no other run state leaks in
// errors: SummarizationUnavailable (recorded, never propagated)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::time::Duration;

use serde_json::{json, Value};

use crate::config::SummarizerConfig;
use crate::digest::ActivityDigest;
use crate::error::{ActivityError, RunError, Stage};
use crate::ext::serde_json::JsonFetch;

pub const NO_ACTIVITY_REPLY: &str = "No activity in this period.";

const SYSTEM_PROMPT: &str = "You write short engineering activity updates for a team chat channel.";

/// Prompt pair sent to the summarizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
  pub system: String,
  pub user: String,
}

pub fn build_prompt(digest: &ActivityDigest) -> Prompt {
  let user = format!(
    "Summarize the activity between {since} and {until}.\n\
     Rules:\n\
     - Reply with 3 to 6 bullet lines, each starting with \"- \".\n\
     - Mention merge requests by title; group related commits into one bullet.\n\
     - If there is no activity, reply exactly: {NO_ACTIVITY_REPLY}\n\
     \n\
     Activity:\n\
     {body}",
    since = digest.window.since_display(),
    until = digest.window.until_display(),
    body = digest.render(),
  );
  Prompt {
    system: SYSTEM_PROMPT.to_string(),
    user,
  }
}

pub trait Summarizer: Sync {
  fn summarize(&self, prompt: &Prompt) -> Result<String, ActivityError>;
}

pub struct HttpSummarizer {
  endpoint: String,
  api_key: String,
  model: String,
  agent: ureq::Agent,
}

impl HttpSummarizer {
  pub fn new(cfg: &SummarizerConfig, timeout: Duration) -> Self {
    let agent: ureq::Agent = ureq::Agent::config_builder()
      .timeout_global(Some(timeout))
      .build()
      .into();
    Self {
      endpoint: format!("{}/chat/completions", cfg.url.trim_end_matches('/')),
      api_key: cfg.api_key.clone(),
      model: cfg.model.clone(),
      agent,
    }
  }
}

impl Summarizer for HttpSummarizer {
  fn summarize(&self, prompt: &Prompt) -> Result<String, ActivityError> {
    let body = json!({
      "model": self.model,
      "temperature": 0.2,
      "messages": [
        { "role": "system", "content": prompt.system },
        { "role": "user", "content": prompt.user },
      ],
    });
    tracing::debug!(endpoint = %self.endpoint, model = %self.model, "summarizer request");

    let mut resp = self
      .agent
      .post(&self.endpoint)
      .header("Authorization", &format!("Bearer {}", self.api_key))
      .send_json(&body)
      .map_err(|e| ActivityError::SummarizationUnavailable(e.to_string()))?;
    let reply: Value = resp
      .body_mut()
      .read_json()
      .map_err(|e| ActivityError::SummarizationUnavailable(format!("unreadable reply: {e}")))?;

    reply
      .fetch("choices.0.message.content")
      .to_text()
      .ok_or_else(|| ActivityError::SummarizationUnavailable("empty reply".into()))
  }
}

/// Final message text plus the recorded failure, if the summarizer could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composed {
  pub text: String,
  pub summarized: bool,
  pub error: Option<RunError>,
}

pub fn summarize_or_fallback(summarizer: Option<&dyn Summarizer>, digest: &ActivityDigest) -> Composed {
  let raw = digest.render();
  let Some(summarizer) = summarizer else {
    return Composed {
      text: raw,
      summarized: false,
      error: None,
    };
  };

  match summarizer.summarize(&build_prompt(digest)) {
    Ok(text) if !text.trim().is_empty() => Composed {
      text: text.trim().to_string(),
      summarized: true,
      error: None,
    },
    Ok(_) => fallback(raw, ActivityError::SummarizationUnavailable("empty reply".into())),
    Err(e) => fallback(raw, e),
  }
}

fn fallback(raw: String, err: ActivityError) -> Composed {
  tracing::warn!(error = %err, "using raw digest instead of summary");
  Composed {
    text: raw,
    summarized: false,
    error: Some(RunError {
      stage: Stage::Summarize,
      target: None,
      message: err.to_string(),
    }),
  }
}
