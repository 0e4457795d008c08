// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Choose the branches to scan: recently active branches unioned with source branches of MRs touched in the window
// role: collection/branch-selection
// inputs: GitlabApi, TimeWindow, recency margin, CancellationToken
// outputs: BranchSelection (sorted unique names, statistics, recorded failures)
// invariants:
// - active iff latest commit instant > window.until - margin (strict)
// - result is a set in sorted order; empty names never appear
// - a failed branch listing or MR listing degrades to an empty contribution, never an error
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};

use crate::cancel::{self, CancellationToken};
use crate::error::{RunError, Stage};
use crate::host::gitlab_api::{self as gl, GitlabApi, MergeRequestQuery, MergeRequestScope};
use crate::model::{BranchInfo, BranchRef};
use crate::window::TimeWindow;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchSelection {
  pub branches: Vec<BranchRef>,
  /// Branches returned by the listing.
  pub scanned: usize,
  /// Branches that passed the recency test.
  pub active: usize,
  /// Distinct source branches of merge requests updated in the window.
  pub from_merge_requests: usize,
  pub errors: Vec<RunError>,
}

pub fn select_branches(
  api: &dyn GitlabApi,
  window: &TimeWindow,
  recency_margin: Duration,
  cancel: &CancellationToken,
) -> BranchSelection {
  let mut errors = Vec::new();

  // Phase 1: recently active branches
  let listed: Vec<BranchInfo> = match cancel::check(cancel)
    .and_then(|_| api.list_branches_json(gl::BRANCH_PAGE_SIZE))
    .and_then(|v| gl::items(&v, "branches").map(|arr| arr.iter().filter_map(gl::decode_branch).collect::<Vec<_>>()))
  {
    Ok(list) => list,
    Err(e) => {
      tracing::warn!(error = %e, "branch listing failed; continuing without active branches");
      errors.push(RunError::upstream(Stage::Branches, None, e));
      Vec::new()
    }
  };
  let active = active_branches(&listed, window.until, recency_margin);

  // Phase 2: source branches of merge requests touched in the window
  let query = MergeRequestQuery::updated_between(window.since_param(), window.until_param());
  let mr_branches = match cancel::check(cancel)
    .and_then(|_| api.list_merge_requests_json(MergeRequestScope::Project, &query))
    .and_then(|v| gl::items(&v, "merge_requests").map(|arr| source_branches(arr)))
  {
    Ok(set) => set,
    Err(e) => {
      tracing::warn!(error = %e, "merge request listing failed; continuing without MR branches");
      errors.push(RunError::upstream(Stage::BranchMergeRequests, None, e));
      BTreeSet::new()
    }
  };

  let union: BTreeSet<&String> = active.iter().chain(mr_branches.iter()).collect();
  tracing::info!(
    scanned = listed.len(),
    active = active.len(),
    from_merge_requests = mr_branches.len(),
    selected = union.len(),
    "branch selection"
  );

  BranchSelection {
    branches: union.into_iter().map(|name| BranchRef::new(name.as_str())).collect(),
    scanned: listed.len(),
    active: active.len(),
    from_merge_requests: mr_branches.len(),
    errors,
  }
}

/// Names of branches whose head commit is strictly newer than `until - margin`.
///
/// A margin reaching past the earliest representable instant makes every dated branch active.
pub fn active_branches(branches: &[BranchInfo], until: DateTime<Utc>, margin: Duration) -> BTreeSet<String> {
  let cutoff = until.checked_sub_signed(margin);
  branches
    .iter()
    .filter(|b| match (b.latest_commit_at, cutoff) {
      (Some(at), Some(cutoff)) => at > cutoff,
      (Some(_), None) => true,
      (None, _) => false,
    })
    .map(|b| b.name.trim().to_string())
    .filter(|name| !name.is_empty())
    .collect()
}

fn source_branches(items: &[serde_json::Value]) -> BTreeSet<String> {
  items
    .iter()
    .filter_map(gl::decode_merge_request)
    .map(|mr| mr.source_branch.trim().to_string())
    .filter(|name| !name.is_empty())
    .collect()
}
