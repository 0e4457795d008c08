use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use crate::error::HostError;
use crate::host::gitlab_api::{CommitQuery, GitlabApi, MergeRequestQuery, MergeRequestScope};

/// In-memory GitlabApi with canned responses; records every call it receives.
pub(crate) struct FakeGitlab {
  pub branches: Result<Value, HostError>,
  pub project_mrs: Result<Value, HostError>,
  pub instance_mrs: Result<Value, HostError>,
  pub commits: HashMap<String, Result<Value, HostError>>,
  pub calls: Mutex<Vec<String>>,
}

impl FakeGitlab {
  pub fn empty() -> Self {
    Self {
      branches: Ok(serde_json::json!([])),
      project_mrs: Ok(serde_json::json!([])),
      instance_mrs: Ok(serde_json::json!([])),
      commits: HashMap::new(),
      calls: Mutex::new(Vec::new()),
    }
  }

  pub fn with_commits(mut self, branch: &str, resp: Result<Value, HostError>) -> Self {
    self.commits.insert(branch.to_string(), resp);
    self
  }

  pub fn calls(&self) -> Vec<String> {
    self.calls.lock().map(|c| c.clone()).unwrap_or_default()
  }

  fn record(&self, call: String) {
    if let Ok(mut calls) = self.calls.lock() {
      calls.push(call);
    }
  }
}

impl GitlabApi for FakeGitlab {
  fn list_branches_json(&self, per_page: u32) -> Result<Value, HostError> {
    self.record(format!("branches per_page={per_page}"));
    self.branches.clone()
  }

  fn list_merge_requests_json(&self, scope: MergeRequestScope, query: &MergeRequestQuery) -> Result<Value, HostError> {
    self.record(format!(
      "merge_requests {:?} author={:?} reviewer={:?}",
      scope, query.author_id, query.reviewer_id
    ));
    match scope {
      MergeRequestScope::Project => self.project_mrs.clone(),
      MergeRequestScope::Instance => self.instance_mrs.clone(),
    }
  }

  fn list_commits_json(&self, query: &CommitQuery) -> Result<Value, HostError> {
    self.record(format!("commits ref={} author={}", query.ref_name, query.author));
    self
      .commits
      .get(&query.ref_name)
      .cloned()
      .unwrap_or_else(|| Err(HostError::NotFound(format!("/commits?ref_name={}", query.ref_name))))
  }
}
