// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Error taxonomy for the activity pipeline and the host API seam
// role: errors
// outputs: ActivityError (run-level), HostError (per-request), RunError (recorded, non-fatal)
// invariants:
// - UpstreamFetchFailed and SummarizationUnavailable are recorded, never returned from run_activity
// - Only InvalidDateFormat, Config, Cancelled and DeliveryFailed reach main
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ActivityError>;

#[derive(Error, Debug)]
pub enum ActivityError {
  #[error("invalid date {0:?}, expected YYYY-MM-DD")]
  InvalidDateFormat(String),
  #[error("upstream fetch failed ({stage}): {source}")]
  UpstreamFetchFailed {
    stage: Stage,
    #[source]
    source: HostError,
  },
  #[error("summarizer unavailable: {0}")]
  SummarizationUnavailable(String),
  #[error("delivery failed: {0}")]
  DeliveryFailed(String),
  #[error("run cancelled")]
  Cancelled,
  #[error("configuration error: {0}")]
  Config(String),
}

/// Failure of a single request against the source-control host.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
  #[error("not found: {0}")]
  NotFound(String),
  #[error("HTTP {code} from {path}")]
  Status { code: u16, path: String },
  #[error("transport error: {0}")]
  Transport(String),
  #[error("unexpected response shape: {0}")]
  Decode(String),
  #[error("cancelled")]
  Cancelled,
}

impl HostError {
  pub fn is_not_found(&self) -> bool {
    matches!(self, HostError::NotFound(_))
  }
}

/// Pipeline stage a recorded failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
  Branches,
  BranchMergeRequests,
  Commits,
  AuthoredMergeRequests,
  ReviewedMergeRequests,
  Summarize,
}

impl std::fmt::Display for Stage {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let s = match self {
      Stage::Branches => "branches",
      Stage::BranchMergeRequests => "branch_merge_requests",
      Stage::Commits => "commits",
      Stage::AuthoredMergeRequests => "authored_merge_requests",
      Stage::ReviewedMergeRequests => "reviewed_merge_requests",
      Stage::Summarize => "summarize",
    };
    f.write_str(s)
  }
}

/// A non-fatal failure accumulated during a run and surfaced in the debug report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunError {
  pub stage: Stage,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub target: Option<String>,
  pub message: String,
}

impl RunError {
  pub fn upstream(stage: Stage, target: Option<&str>, source: HostError) -> Self {
    let err = ActivityError::UpstreamFetchFailed { stage, source };
    Self {
      stage,
      target: target.map(str::to_string),
      message: err.to_string(),
    }
  }
}
