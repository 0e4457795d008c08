use serde_json::Value;
use test_support::StubServer;

use crate::common::{commits_route, digest_cmd, gitlab_routes, reviewed_mrs_route, stdout_json, PROJECT_PREFIX};

fn names(v: &Value) -> Vec<&str> {
  v.as_array().unwrap().iter().map(|x| x.as_str().unwrap()).collect()
}

#[test]
fn debug_report_counts_shared_commit_once() {
  let server = StubServer::start(gitlab_routes());
  let out = digest_cmd(&server).args(["--date", "2024-01-10"]).output().unwrap();
  let v = stdout_json(&out);

  assert_eq!(v["window"]["since"], "2024-01-09T18:30:00Z");
  assert_eq!(v["window"]["until"], "2024-01-10T18:30:00Z");
  assert_eq!(v["window"]["since_display"], "10 Jan 2024, 00:00 IST");
  assert_eq!(names(&v["branch_selection"]["selected"]), vec!["feature-x", "main"]);

  let per_branch: Vec<(&str, u64)> = v["branches"]
    .as_array()
    .unwrap()
    .iter()
    .map(|b| (b["branch"].as_str().unwrap(), b["commit_count"].as_u64().unwrap()))
    .collect();
  assert_eq!(per_branch, vec![("feature-x", 1), ("main", 2)]);

  assert_eq!(v["commit_count"], 2);
  assert_eq!(v["commits"][0]["branch"], "feature-x");
  assert_eq!(v["created_merge_requests"][0]["iid"], 14);
  assert_eq!(v["reviewed_merge_requests"][0]["title"], "Cache project settings");
  assert_eq!(v["errors"], serde_json::json!([]));
  assert!(v["digest_text"].as_str().unwrap().contains("Commits: 2"));
}

#[test]
fn branch_selection_snapshot() {
  test_support::init_insta();
  let server = StubServer::start(gitlab_routes());
  let out = digest_cmd(&server).args(["--date", "2024-01-10"]).output().unwrap();
  let v = stdout_json(&out);

  insta::with_settings!({ sort_maps => true }, {
    insta::assert_json_snapshot!(v["branch_selection"], @r#"
    {
      "active": 2,
      "from_merge_requests": 1,
      "scanned": 3,
      "selected": [
        "feature-x",
        "main"
      ]
    }
    "#);
  });
}

#[test]
fn requests_carry_token_window_and_identity() {
  let server = StubServer::start(gitlab_routes());
  let out = digest_cmd(&server).args(["--date", "2024-01-10"]).output().unwrap();
  stdout_json(&out);

  let commits = server.requests_to(&format!("{PROJECT_PREFIX}/repository/commits"));
  assert_eq!(commits.len(), 2, "stale branch must not be queried");
  for req in &commits {
    assert_eq!(req.header("authorization"), Some("Bearer glpat-test"));
    assert!(req.target.contains("author=dev"), "{}", req.target);
    assert!(req.target.contains("per_page=100"), "{}", req.target);
  }

  let reviewed = server.requests_to("/api/v4/merge_requests");
  assert_eq!(reviewed.len(), 1);
  assert!(reviewed[0].target.contains("scope=all"));
  assert!(reviewed[0].target.contains("reviewer_id=7"));

  let authored = server
    .requests_to(&format!("{PROJECT_PREFIX}/merge_requests"))
    .into_iter()
    .filter(|r| r.target.contains("author_id=7"))
    .count();
  assert_eq!(authored, 1);
}

#[test]
fn forbidden_review_listing_keeps_everything_else() {
  let mut routes = gitlab_routes();
  routes[4] = reviewed_mrs_route(403, r#"{"message":"403 Forbidden"}"#);
  let server = StubServer::start(routes);
  let out = digest_cmd(&server).args(["--date", "2024-01-10"]).output().unwrap();
  let v = stdout_json(&out);

  assert_eq!(v["commit_count"], 2);
  assert_eq!(v["created_merge_requests"].as_array().unwrap().len(), 1);
  assert_eq!(v["reviewed_merge_requests"], serde_json::json!([]));
  assert_eq!(v["errors"].as_array().unwrap().len(), 1);
  assert_eq!(v["errors"][0]["stage"], "reviewed_merge_requests");
  assert!(v["digest_text"].as_str().unwrap().contains("Merge requests reviewed:\nNone"));
}

#[test]
fn failing_branch_is_isolated() {
  let mut routes = gitlab_routes();
  routes[2] = commits_route("feature-x", 500, r#"{"message":"500 Internal Server Error"}"#);
  let server = StubServer::start(routes);

  let out = digest_cmd(&server).args(["--date", "2024-01-10"]).output().unwrap();
  let v = stdout_json(&out);

  assert_eq!(v["commit_count"], 2);
  let fx = &v["branches"][0];
  assert_eq!(fx["branch"], "feature-x");
  assert_eq!(fx["commit_count"], 0);
  assert!(fx["error"].as_str().unwrap().contains("HTTP 500"));
  assert_eq!(v["errors"][0]["stage"], "commits");
  assert_eq!(v["errors"][0]["target"], "feature-x");
}

#[test]
fn host_answering_404_everywhere_still_reports() {
  let server = StubServer::start(vec![]);
  let out = digest_cmd(&server).args(["--date", "2024-01-10"]).output().unwrap();
  let v = stdout_json(&out);

  assert_eq!(v["commit_count"], 0);
  assert_eq!(v["branch_selection"]["selected"], serde_json::json!([]));
  let digest = v["digest_text"].as_str().unwrap();
  assert!(digest.contains("Commits: 0"));
  assert!(digest.contains("Merge requests created:\nNone"));
  // branch listing, MR branches, authored, reviewed
  assert_eq!(v["errors"].as_array().unwrap().len(), 4);
}

#[test]
fn trailing_window_follows_now_override() {
  let server = StubServer::start(gitlab_routes());
  let out = digest_cmd(&server)
    .args(["--now-override", "2024-01-10T12:00:00Z"])
    .output()
    .unwrap();
  let v = stdout_json(&out);

  assert_eq!(v["window"]["since"], "2024-01-09T12:00:00Z");
  assert_eq!(v["window"]["until"], "2024-01-10T12:00:00Z");
}
