// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: GitLab REST seam (branches, merge requests, commits) and decoding of its JSON into typed records
// role: host/gitlab-api
// inputs: HostConfig (base URL, token, project); typed query structs
// outputs: raw JSON per endpoint; BranchInfo / CommitRecord / MergeRequestRecord decoders
// side_effects: Network calls to the configured GitLab instance
// invariants:
// - 404 maps to HostError::NotFound; other non-2xx to HostError::Status; never panics
// - decoders skip items without an identity instead of failing the whole list
// errors: HostError per request; callers decide whether a failure is fatal
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::time::Duration;

use serde_json::Value;

use crate::config::HostConfig;
use crate::error::HostError;
use crate::ext::serde_json::JsonFetch;
use crate::model::{BranchInfo, BranchRef, CommitRecord, MergeRequestRecord};

pub const BRANCH_PAGE_SIZE: u32 = 200;
pub const COMMIT_PAGE_SIZE: u32 = 100;
pub const MERGE_REQUEST_PAGE_SIZE: u32 = 100;

/// Where a merge-request listing is scoped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeRequestScope {
  /// `/projects/:id/merge_requests`
  Project,
  /// `/merge_requests?scope=all` (every project the token can see)
  Instance,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequestQuery {
  pub updated_after: String,
  pub updated_before: String,
  pub author_id: Option<u64>,
  pub reviewer_id: Option<u64>,
  pub per_page: u32,
}

impl MergeRequestQuery {
  pub fn updated_between(updated_after: String, updated_before: String) -> Self {
    Self {
      updated_after,
      updated_before,
      author_id: None,
      reviewer_id: None,
      per_page: MERGE_REQUEST_PAGE_SIZE,
    }
  }

  pub fn pairs(&self, scope: MergeRequestScope) -> Vec<(&'static str, String)> {
    let mut out = vec![
      ("updated_after", self.updated_after.clone()),
      ("updated_before", self.updated_before.clone()),
      ("per_page", self.per_page.to_string()),
    ];
    if scope == MergeRequestScope::Instance {
      out.push(("scope", "all".into()));
    }
    if let Some(id) = self.author_id {
      out.push(("author_id", id.to_string()));
    }
    if let Some(id) = self.reviewer_id {
      out.push(("reviewer_id", id.to_string()));
    }
    out
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitQuery {
  pub ref_name: String,
  pub author: String,
  pub since: String,
  pub until: String,
  pub per_page: u32,
}

impl CommitQuery {
  pub fn pairs(&self) -> Vec<(&'static str, String)> {
    vec![
      ("ref_name", self.ref_name.clone()),
      ("author", self.author.clone()),
      ("since", self.since.clone()),
      ("until", self.until.clone()),
      ("per_page", self.per_page.to_string()),
    ]
  }
}

// --- Trait seam for the GitLab API ---
pub trait GitlabApi: Sync {
  fn list_branches_json(&self, per_page: u32) -> Result<Value, HostError>;
  fn list_merge_requests_json(&self, scope: MergeRequestScope, query: &MergeRequestQuery) -> Result<Value, HostError>;
  fn list_commits_json(&self, query: &CommitQuery) -> Result<Value, HostError>;
}

pub struct GitlabHttpApi {
  api_root: String,
  project: String,
  token: String,
  agent: ureq::Agent,
}

impl GitlabHttpApi {
  pub fn new(cfg: &HostConfig, timeout: Duration) -> Self {
    let agent: ureq::Agent = ureq::Agent::config_builder()
      .timeout_global(Some(timeout))
      .build()
      .into();

    Self {
      api_root: format!("{}/api/v4", cfg.base_url.trim_end_matches('/')),
      project: encode_project(&cfg.project),
      token: cfg.token.clone(),
      agent,
    }
  }

  fn get_json(&self, path: &str, query: &[(&'static str, String)]) -> Result<Value, HostError> {
    let url = format!("{}{}", self.api_root, path);
    tracing::debug!(%path, ?query, "gitlab request");

    let resp = self
      .agent
      .get(&url)
      .header("Accept", "application/json")
      .header("User-Agent", "activity-digest")
      .header("Authorization", &format!("Bearer {}", self.token))
      .query_pairs(query.iter().map(|(k, v)| (*k, v.as_str())))
      .call();

    match resp {
      Ok(mut r) => r
        .body_mut()
        .read_json::<Value>()
        .map_err(|e| HostError::Decode(format!("{path}: {e}"))),
      Err(ureq::Error::StatusCode(404)) => Err(HostError::NotFound(path.to_string())),
      Err(ureq::Error::StatusCode(code)) => Err(HostError::Status {
        code,
        path: path.to_string(),
      }),
      Err(e) => Err(HostError::Transport(e.to_string())),
    }
  }
}

impl GitlabApi for GitlabHttpApi {
  fn list_branches_json(&self, per_page: u32) -> Result<Value, HostError> {
    let path = format!("/projects/{}/repository/branches", self.project);
    self.get_json(&path, &[("per_page", per_page.to_string())])
  }

  fn list_merge_requests_json(&self, scope: MergeRequestScope, query: &MergeRequestQuery) -> Result<Value, HostError> {
    let path = match scope {
      MergeRequestScope::Project => format!("/projects/{}/merge_requests", self.project),
      MergeRequestScope::Instance => "/merge_requests".to_string(),
    };
    self.get_json(&path, &query.pairs(scope))
  }

  fn list_commits_json(&self, query: &CommitQuery) -> Result<Value, HostError> {
    let path = format!("/projects/{}/repository/commits", self.project);
    self.get_json(&path, &query.pairs())
  }
}

/// Project ids may be numeric or a namespaced path; paths must be URL-encoded.
fn encode_project(project: &str) -> String {
  project.trim().replace('/', "%2F")
}

// --- Decoding ---

/// The top-level value must be an array of objects.
pub fn items<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>, HostError> {
  value
    .as_array()
    .ok_or_else(|| HostError::Decode(format!("{what}: expected a JSON array")))
}

pub fn decode_branch(item: &Value) -> Option<BranchInfo> {
  let name = item.fetch("name").to_text()?;
  Some(BranchInfo {
    name,
    latest_commit_at: item.fetch("commit.committed_date").to_instant(),
  })
}

pub fn decode_commit(item: &Value, branch: &BranchRef) -> Option<CommitRecord> {
  let id = item.fetch("id").to_text()?;
  let short_id = item
    .fetch("short_id")
    .to_text()
    .unwrap_or_else(|| id.chars().take(8).collect());
  let title = item
    .fetch("title")
    .to_text()
    .or_else(|| {
      item
        .fetch("message")
        .to::<String>()
        .and_then(|m| m.lines().next().map(str::to_string))
    })
    .unwrap_or_default();

  Some(CommitRecord {
    id,
    short_id,
    title,
    author_name: item.fetch("author_name").to_or_default(),
    author_email: item.fetch("author_email").to_or_default(),
    created_at: item
      .fetch("created_at")
      .to_instant()
      .or_else(|| item.fetch("committed_date").to_instant()),
    web_url: item.fetch("web_url").to_or_default(),
    branch: branch.clone(),
  })
}

pub fn decode_merge_request(item: &Value) -> Option<MergeRequestRecord> {
  let iid = item.fetch("iid").to::<i64>()?;
  let author = item
    .fetch("author.username")
    .to_text()
    .or_else(|| item.fetch("author.name").to_text())
    .unwrap_or_default();

  Some(MergeRequestRecord {
    iid,
    title: item.fetch("title").to_or_default(),
    source_branch: item.fetch("source_branch").to_or_default(),
    author,
    description: item.fetch("description").to_text(),
    state: item.fetch("state").to_or_default(),
    created_at: item.fetch("created_at").to_instant(),
    updated_at: item.fetch("updated_at").to_instant(),
    web_url: item.fetch("web_url").to_or_default(),
  })
}
