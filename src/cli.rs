// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Command-line surface (flags with env fallbacks) and its normalization into explicit Settings
// role: cli/config
// inputs: argv and process environment (via clap `env`)
// outputs: Cli; EffectiveConfig (mode, date, now override, Settings)
// invariants:
// - blank values count as absent, except --date
// - notify mode requires a chat channel and token
// - the summarizer is configured iff a summarizer URL is given
// errors: Config for missing or contradictory settings
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::time::Duration;

use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use serde::Serialize;

use crate::config::{
  ChatConfig, HostConfig, Identity, Settings, SummarizerConfig, DEFAULT_CHAT_URL, DEFAULT_GITLAB_URL,
  DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_RECENCY_DAYS, DEFAULT_SUMMARIZER_MODEL, MAX_RECENCY_DAYS,
};
use crate::error::{ActivityError, Result};
use crate::window;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
  /// Print the full debug report as JSON
  Debug,
  /// Print the final chat message without sending it
  Preview,
  /// Summarize and post to the chat channel
  Notify,
}

#[derive(Parser, Debug)]
#[command(
    name = "activity-digest",
    version,
    about = "Summarize a developer's GitLab activity (commits and merge requests) for a day",
    long_about = None
)]
pub struct Cli {
  /// What to do with the collected activity
  #[arg(long, value_enum, default_value_t = Mode::Debug)]
  pub mode: Mode,

  /// Civil day to report (YYYY-MM-DD, +05:30); default: the trailing 24 hours
  #[arg(long)]
  pub date: Option<String>,

  /// GitLab instance root
  #[arg(long, env = "GITLAB_URL", default_value = DEFAULT_GITLAB_URL)]
  pub gitlab_url: String,

  /// GitLab access token
  #[arg(long, env = "GITLAB_TOKEN", hide_env_values = true)]
  pub token: Option<String>,

  /// Project id or `group/project` path
  #[arg(long, env = "GITLAB_PROJECT_ID")]
  pub project: Option<String>,

  /// Numeric id of the user whose activity is reported
  #[arg(long, env = "GITLAB_USER_ID")]
  pub user_id: Option<u64>,

  /// Commit author filter (preferred over --username)
  #[arg(long, env = "GITLAB_AUTHOR_EMAIL")]
  pub author_email: Option<String>,

  /// Commit author filter used when no email is given
  #[arg(long, env = "GITLAB_USERNAME")]
  pub username: Option<String>,

  /// Branches with a head commit within this many days of the window end are scanned
  #[arg(long, default_value_t = DEFAULT_RECENCY_DAYS)]
  pub recency_days: i64,

  /// Base URL of an OpenAI-compatible API (enables summarization)
  #[arg(long, env = "SUMMARIZER_URL")]
  pub summarizer_url: Option<String>,

  #[arg(long, env = "SUMMARIZER_API_KEY", hide_env_values = true)]
  pub summarizer_api_key: Option<String>,

  #[arg(long, env = "SUMMARIZER_MODEL", default_value = DEFAULT_SUMMARIZER_MODEL)]
  pub summarizer_model: String,

  /// Slack-compatible chat.postMessage endpoint
  #[arg(long, env = "SLACK_API_URL", default_value = DEFAULT_CHAT_URL)]
  pub slack_url: String,

  #[arg(long, env = "SLACK_BOT_TOKEN", hide_env_values = true)]
  pub slack_token: Option<String>,

  #[arg(long, env = "SLACK_CHANNEL")]
  pub slack_channel: Option<String>,

  /// Per-request HTTP timeout in seconds
  #[arg(long, default_value_t = DEFAULT_HTTP_TIMEOUT_SECS)]
  pub timeout_secs: u64,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,

  /// Override the "now" instant (hidden; tests only)
  #[arg(long = "now-override", hide = true)]
  pub now_override: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EffectiveConfig {
  pub mode: Mode,
  pub date: Option<String>,
  pub now_override: Option<DateTime<Utc>>,
  pub settings: Settings,
}

fn present(v: Option<String>) -> Option<String> {
  v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn required(v: Option<String>, what: &str) -> Result<String> {
  present(v).ok_or_else(|| ActivityError::Config(format!("{what} is required")))
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  // Phase 1: host + identity
  let host = HostConfig {
    base_url: cli.gitlab_url.trim().trim_end_matches('/').to_string(),
    token: required(cli.token, "GitLab token (--token / GITLAB_TOKEN)")?,
    project: required(cli.project, "project (--project / GITLAB_PROJECT_ID)")?,
  };
  let user_id = cli
    .user_id
    .ok_or_else(|| ActivityError::Config("user id (--user-id / GITLAB_USER_ID) is required".into()))?;
  let identity = Identity {
    user_id,
    email: present(cli.author_email),
    username: present(cli.username),
  };
  if identity.email.is_none() && identity.username.is_none() {
    return Err(ActivityError::Config(
      "an author email (GITLAB_AUTHOR_EMAIL) or username (GITLAB_USERNAME) is required".into(),
    ));
  }
  if !(0..=MAX_RECENCY_DAYS).contains(&cli.recency_days) {
    return Err(ActivityError::Config(format!(
      "--recency-days must be between 0 and {MAX_RECENCY_DAYS}, got {}",
      cli.recency_days
    )));
  }

  // Phase 2: optional collaborators
  let summarizer = present(cli.summarizer_url).map(|url| SummarizerConfig {
    url,
    api_key: present(cli.summarizer_api_key).unwrap_or_default(),
    model: cli.summarizer_model,
  });
  let chat = match (present(cli.slack_token), present(cli.slack_channel)) {
    (Some(token), Some(channel)) => Some(ChatConfig {
      url: cli.slack_url,
      token,
      channel,
    }),
    (None, None) => None,
    _ => {
      return Err(ActivityError::Config(
        "SLACK_BOT_TOKEN and SLACK_CHANNEL must be given together".into(),
      ))
    }
  };
  if cli.mode == Mode::Notify && chat.is_none() {
    return Err(ActivityError::Config("--mode notify needs SLACK_BOT_TOKEN and SLACK_CHANNEL".into()));
  }

  // Phase 3: clock override
  let now_override = match cli.now_override.as_deref() {
    None => None,
    Some(raw) => Some(
      window::parse_now_override(Some(raw))
        .ok_or_else(|| ActivityError::Config(format!("unparseable --now-override {raw:?}")))?,
    ),
  };

  Ok(EffectiveConfig {
    mode: cli.mode,
    // A blank --date is still a date and must fail window resolution.
    date: cli.date,
    now_override,
    settings: Settings {
      host,
      identity,
      recency_margin_days: cli.recency_days,
      summarizer,
      chat,
      http_timeout: Duration::from_secs(cli.timeout_secs),
    },
  })
}
