// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Fetch merge requests authored by the identity (project scope) and reviewed by it (instance scope)
// role: collection/merge-requests
// inputs: GitlabApi, user id, TimeWindow, CancellationToken
// outputs: MergeRequestList (records plus an optional recorded failure)
// invariants:
// - both collectors are independent; a failure degrades only that list to empty
// - window filter is updated_after=since, updated_before=until
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use crate::cancel::{self, CancellationToken};
use crate::error::{RunError, Stage};
use crate::host::gitlab_api::{self as gl, GitlabApi, MergeRequestQuery, MergeRequestScope};
use crate::model::MergeRequestRecord;
use crate::window::TimeWindow;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeRequestList {
  pub items: Vec<MergeRequestRecord>,
  pub error: Option<RunError>,
}

pub fn fetch_authored(api: &dyn GitlabApi, user_id: u64, window: &TimeWindow, cancel: &CancellationToken) -> MergeRequestList {
  let mut query = MergeRequestQuery::updated_between(window.since_param(), window.until_param());
  query.author_id = Some(user_id);
  fetch(api, MergeRequestScope::Project, &query, Stage::AuthoredMergeRequests, cancel)
}

/// Reviewer assignments span projects, so this queries the instance-wide listing.
pub fn fetch_reviewed(api: &dyn GitlabApi, user_id: u64, window: &TimeWindow, cancel: &CancellationToken) -> MergeRequestList {
  let mut query = MergeRequestQuery::updated_between(window.since_param(), window.until_param());
  query.reviewer_id = Some(user_id);
  fetch(api, MergeRequestScope::Instance, &query, Stage::ReviewedMergeRequests, cancel)
}

fn fetch(
  api: &dyn GitlabApi,
  scope: MergeRequestScope,
  query: &MergeRequestQuery,
  stage: Stage,
  cancel: &CancellationToken,
) -> MergeRequestList {
  let fetched = cancel::check(cancel)
    .and_then(|_| api.list_merge_requests_json(scope, query))
    .and_then(|v| {
      gl::items(&v, "merge_requests").map(|arr| arr.iter().filter_map(gl::decode_merge_request).collect::<Vec<_>>())
    });

  match fetched {
    Ok(items) => {
      tracing::debug!(%stage, count = items.len(), "merge requests fetched");
      MergeRequestList { items, error: None }
    }
    Err(e) => {
      tracing::warn!(%stage, error = %e, "merge request query failed; reporting none");
      MergeRequestList {
        items: Vec::new(),
        error: Some(RunError::upstream(stage, None, e)),
      }
    }
  }
}
