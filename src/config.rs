// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Explicit run configuration (host credentials, identity, collaborators) passed into every stage
// role: configuration
// outputs: Settings and its parts; identity author-filter precedence
// invariants:
// - Settings is built once by cli::normalize; nothing downstream reads process env
// - author filter prefers email over username; at least one is present
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::time::Duration;

use serde::Serialize;

pub const DEFAULT_GITLAB_URL: &str = "https://gitlab.com";
pub const DEFAULT_CHAT_URL: &str = "https://slack.com/api/chat.postMessage";
pub const DEFAULT_SUMMARIZER_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_RECENCY_DAYS: i64 = 7;
/// Upper bound accepted for the recency margin (about a century).
pub const MAX_RECENCY_DAYS: i64 = 36_500;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize)]
pub struct HostConfig {
  /// Instance root, e.g. `https://gitlab.example.com` (no `/api/v4`).
  pub base_url: String,
  #[serde(skip_serializing)]
  pub token: String,
  /// Numeric id or `group/project` path.
  pub project: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Identity {
  pub user_id: u64,
  pub email: Option<String>,
  pub username: Option<String>,
}

impl Identity {
  /// Author filter for commit queries: email when configured, else username.
  pub fn author_filter(&self) -> &str {
    self
      .email
      .as_deref()
      .or(self.username.as_deref())
      .unwrap_or_default()
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct SummarizerConfig {
  /// Base URL of an OpenAI-compatible API; `/chat/completions` is appended.
  pub url: String,
  #[serde(skip_serializing)]
  pub api_key: String,
  pub model: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatConfig {
  pub url: String,
  #[serde(skip_serializing)]
  pub token: String,
  pub channel: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Settings {
  pub host: HostConfig,
  pub identity: Identity,
  pub recency_margin_days: i64,
  pub summarizer: Option<SummarizerConfig>,
  pub chat: Option<ChatConfig>,
  pub http_timeout: Duration,
}

impl Settings {
  pub fn recency_margin(&self) -> chrono::Duration {
    chrono::Duration::try_days(self.recency_margin_days).unwrap_or(chrono::Duration::MAX)
  }
}
