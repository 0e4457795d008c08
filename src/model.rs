// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Typed records for branches, commits, merge requests and the per-run debug report
// role: model/types
// outputs: Serializable structs with fixed field names; no open-ended maps
// invariants: Debug report fields are always present; failed sub-fetches serialize as empty arrays
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{HostError, RunError};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct BranchRef {
  pub name: String,
}

impl BranchRef {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into() }
  }
}

/// A branch as listed by the host, with the instant of its head commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchInfo {
  pub name: String,
  pub latest_commit_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRecord {
  pub id: String,
  pub short_id: String,
  pub title: String,
  pub author_name: String,
  pub author_email: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub created_at: Option<DateTime<Utc>>,
  pub web_url: String,
  pub branch: BranchRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeRequestRecord {
  pub iid: i64,
  pub title: String,
  pub source_branch: String,
  pub author: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  pub state: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub created_at: Option<DateTime<Utc>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub updated_at: Option<DateTime<Utc>>,
  pub web_url: String,
}

/// Per-branch partial result of commit collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchCommits {
  pub branch: BranchRef,
  pub result: Result<Vec<CommitRecord>, HostError>,
}

impl BranchCommits {
  pub fn commit_count(&self) -> usize {
    self.result.as_ref().map(Vec::len).unwrap_or(0)
  }
}

// --- Debug report (fixed shape) ---

#[derive(Debug, Serialize)]
pub struct WindowView {
  pub since: String,
  pub until: String,
  pub since_display: String,
  pub until_display: String,
}

#[derive(Debug, Serialize)]
pub struct IdentityView {
  pub user_id: u64,
  pub author_filter: String,
}

#[derive(Debug, Serialize)]
pub struct BranchSelectionView {
  pub scanned: usize,
  pub active: usize,
  pub from_merge_requests: usize,
  pub selected: Vec<BranchRef>,
}

#[derive(Debug, Serialize)]
pub struct BranchBreakdown {
  pub branch: BranchRef,
  pub commit_count: usize,
  pub commits: Vec<CommitSummary>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CommitSummary {
  pub short_id: String,
  pub title: String,
  pub web_url: String,
}

#[derive(Debug, Serialize)]
pub struct MergeRequestSummary {
  pub iid: i64,
  pub title: String,
  pub source_branch: String,
  pub state: String,
  pub web_url: String,
}

#[derive(Debug, Serialize)]
pub struct DebugReport {
  pub window: WindowView,
  pub identity: IdentityView,
  pub branch_selection: BranchSelectionView,
  pub branches: Vec<BranchBreakdown>,
  pub commit_count: usize,
  pub commits: Vec<CommitRecord>,
  pub created_merge_requests: Vec<MergeRequestSummary>,
  pub reviewed_merge_requests: Vec<MergeRequestSummary>,
  pub digest_text: String,
  pub errors: Vec<RunError>,
}

impl From<&CommitRecord> for CommitSummary {
  fn from(c: &CommitRecord) -> Self {
    Self {
      short_id: c.short_id.clone(),
      title: c.title.clone(),
      web_url: c.web_url.clone(),
    }
  }
}

impl From<&MergeRequestRecord> for MergeRequestSummary {
  fn from(mr: &MergeRequestRecord) -> Self {
    Self {
      iid: mr.iid,
      title: mr.title.clone(),
      source_branch: mr.source_branch.clone(),
      state: mr.state.clone(),
      web_url: mr.web_url.clone(),
    }
  }
}
