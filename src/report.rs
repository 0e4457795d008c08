// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Run the collection pipeline for one window and shape its outputs (debug report, chat message)
// role: orchestration
// inputs: GitlabApi, Settings, TimeWindow, CancellationToken; optional Summarizer/Notifier
// outputs: ActivityRun (selection, per-branch results, digest, ordered run errors); DebugReport; Composed text
// side_effects: Host requests via collectors; one summarizer call and one chat post in notify mode
// invariants:
// - collector failures are recorded in pipeline order and never abort the run
// - cancellation observed after any stage aborts with Cancelled instead of partial data
// - the debug report has every field present; failed parts are empty arrays
// errors: Cancelled (run), DeliveryFailed (deliver)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use crate::cancel::CancellationToken;
use crate::collect::{branches, commits, dedupe, merge_requests};
use crate::config::{Identity, Settings};
use crate::digest::{self, ActivityDigest};
use crate::error::{ActivityError, Result, RunError};
use crate::host::gitlab_api::GitlabApi;
use crate::model::{
  BranchBreakdown, BranchCommits, BranchSelectionView, CommitSummary, DebugReport, IdentityView, MergeRequestSummary,
  WindowView,
};
use crate::notify::Notifier;
use crate::summarize::{self, Composed, Summarizer};
use crate::window::TimeWindow;

/// Everything one pipeline run gathered, including what failed along the way.
#[derive(Debug, Clone)]
pub struct ActivityRun {
  pub selection: branches::BranchSelection,
  pub per_branch: Vec<BranchCommits>,
  pub digest: ActivityDigest,
  pub errors: Vec<RunError>,
}

pub fn run_activity(
  api: &dyn GitlabApi,
  settings: &Settings,
  window: TimeWindow,
  cancel: &CancellationToken,
) -> Result<ActivityRun> {
  let identity = &settings.identity;
  let mut errors = Vec::new();

  // Phase 1: branch selection
  let mut selection = branches::select_branches(api, &window, settings.recency_margin(), cancel);
  errors.append(&mut selection.errors);
  bail_if_cancelled(cancel)?;

  // Phase 2: per-branch commits, then first-seen dedup
  let per_branch = commits::collect_commits(api, &selection.branches, &window, identity.author_filter(), cancel);
  errors.extend(commits::branch_errors(&per_branch));
  bail_if_cancelled(cancel)?;
  let unique = dedupe::dedupe(commits::concat_commits(&per_branch));

  // Phase 3: merge requests (independent of commits and of each other)
  let authored = merge_requests::fetch_authored(api, identity.user_id, &window, cancel);
  let reviewed = merge_requests::fetch_reviewed(api, identity.user_id, &window, cancel);
  errors.extend(authored.error);
  errors.extend(reviewed.error);
  bail_if_cancelled(cancel)?;

  tracing::info!(
    branches = selection.branches.len(),
    commits = unique.len(),
    created_mrs = authored.items.len(),
    reviewed_mrs = reviewed.items.len(),
    errors = errors.len(),
    "activity collected"
  );

  Ok(ActivityRun {
    selection,
    per_branch,
    digest: digest::build(window, unique, authored.items, reviewed.items),
    errors,
  })
}

fn bail_if_cancelled(cancel: &CancellationToken) -> Result<()> {
  if cancel.is_cancelled() {
    tracing::warn!("run cancelled; discarding partial results");
    return Err(ActivityError::Cancelled);
  }
  Ok(())
}

pub fn debug_report(run: &ActivityRun, identity: &Identity) -> DebugReport {
  let window = &run.digest.window;
  DebugReport {
    window: WindowView {
      since: window.since_param(),
      until: window.until_param(),
      since_display: window.since_display(),
      until_display: window.until_display(),
    },
    identity: IdentityView {
      user_id: identity.user_id,
      author_filter: identity.author_filter().to_string(),
    },
    branch_selection: BranchSelectionView {
      scanned: run.selection.scanned,
      active: run.selection.active,
      from_merge_requests: run.selection.from_merge_requests,
      selected: run.selection.branches.clone(),
    },
    branches: run.per_branch.iter().map(breakdown).collect(),
    commit_count: run.digest.commits.len(),
    commits: run.digest.commits.clone(),
    created_merge_requests: run.digest.created_mrs.iter().map(MergeRequestSummary::from).collect(),
    reviewed_merge_requests: run.digest.reviewed_mrs.iter().map(MergeRequestSummary::from).collect(),
    digest_text: run.digest.render(),
    errors: run.errors.clone(),
  }
}

fn breakdown(bc: &BranchCommits) -> BranchBreakdown {
  let (commits, error) = match &bc.result {
    Ok(list) => (list.iter().map(CommitSummary::from).collect(), None),
    Err(e) => (Vec::new(), Some(e.to_string())),
  };
  BranchBreakdown {
    branch: bc.branch.clone(),
    commit_count: bc.commit_count(),
    commits,
    error,
  }
}

/// Summarize the run's digest, recording a summarizer failure on the run.
pub fn compose_message(run: &mut ActivityRun, summarizer: Option<&dyn Summarizer>) -> Composed {
  let composed = summarize::summarize_or_fallback(summarizer, &run.digest);
  if let Some(err) = &composed.error {
    run.errors.push(err.clone());
  }
  composed
}

pub fn deliver(notifier: &dyn Notifier, composed: &Composed) -> Result<()> {
  notifier.notify(&composed.text)
}
