// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Fetch the identity's commits per selected branch, isolating failures to the branch that produced them
// role: collection/commits
// inputs: GitlabApi, selected branches, TimeWindow, author filter, CancellationToken
// outputs: Vec<BranchCommits> in branch order (one entry per branch)
// side_effects: One host request per branch, run on the rayon pool
// invariants:
// - a branch that is gone (host 404) yields Ok(empty)
// - any other failure is confined to its own BranchCommits entry
// - output order equals input branch order regardless of completion order
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use rayon::prelude::*;

use crate::cancel::{self, CancellationToken};
use crate::error::{RunError, Stage};
use crate::host::gitlab_api::{self as gl, CommitQuery, GitlabApi};
use crate::model::{BranchCommits, BranchRef, CommitRecord};
use crate::window::TimeWindow;

pub fn collect_commits(
  api: &dyn GitlabApi,
  branches: &[BranchRef],
  window: &TimeWindow,
  author: &str,
  cancel: &CancellationToken,
) -> Vec<BranchCommits> {
  branches
    .par_iter()
    .map(|branch| collect_branch(api, branch, window, author, cancel))
    .collect()
}

fn collect_branch(
  api: &dyn GitlabApi,
  branch: &BranchRef,
  window: &TimeWindow,
  author: &str,
  cancel: &CancellationToken,
) -> BranchCommits {
  let query = CommitQuery {
    ref_name: branch.name.clone(),
    author: author.to_string(),
    since: window.since_param(),
    until: window.until_param(),
    per_page: gl::COMMIT_PAGE_SIZE,
  };

  let fetched = cancel::check(cancel).and_then(|_| api.list_commits_json(&query)).and_then(|v| {
    gl::items(&v, "commits").map(|arr| {
      arr
        .iter()
        .filter_map(|item| gl::decode_commit(item, branch))
        .collect::<Vec<_>>()
    })
  });

  let result = match fetched {
    Err(e) if e.is_not_found() => {
      tracing::debug!(branch = %branch.name, "branch disappeared before commit query; skipping");
      Ok(Vec::new())
    }
    Err(e) => {
      tracing::warn!(branch = %branch.name, error = %e, "commit query failed for branch");
      Err(e)
    }
    Ok(commits) => {
      tracing::debug!(branch = %branch.name, count = commits.len(), "commits fetched");
      Ok(commits)
    }
  };

  BranchCommits {
    branch: branch.clone(),
    result,
  }
}

/// Concatenate successful per-branch results in branch order.
pub fn concat_commits(per_branch: &[BranchCommits]) -> Vec<CommitRecord> {
  per_branch
    .iter()
    .filter_map(|b| b.result.as_ref().ok())
    .flatten()
    .cloned()
    .collect()
}

pub fn branch_errors(per_branch: &[BranchCommits]) -> Vec<RunError> {
  per_branch
    .iter()
    .filter_map(|b| {
      b.result
        .as_ref()
        .err()
        .map(|e| RunError::upstream(Stage::Commits, Some(&b.branch.name), e.clone()))
    })
    .collect()
}
