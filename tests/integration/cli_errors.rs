use predicates::prelude::*;
use test_support::StubServer;

use crate::common::{digest_cmd, gitlab_routes};

#[test]
fn malformed_date_fails_before_any_request() {
  let server = StubServer::start(gitlab_routes());
  digest_cmd(&server)
    .args(["--date", "10-01-2024"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid date"));
  assert!(server.requests().is_empty());
}

#[test]
fn impossible_calendar_day_fails() {
  let server = StubServer::start(gitlab_routes());
  digest_cmd(&server)
    .args(["--date", "2024-02-30"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("2024-02-30"));
}

#[test]
fn missing_token_is_a_configuration_error() {
  let server = StubServer::start(gitlab_routes());
  digest_cmd(&server)
    .env_remove("GITLAB_TOKEN")
    .assert()
    .failure()
    .stderr(predicate::str::contains("GitLab token"));
}

#[test]
fn missing_author_filter_is_a_configuration_error() {
  let server = StubServer::start(gitlab_routes());
  digest_cmd(&server)
    .env_remove("GITLAB_AUTHOR_EMAIL")
    .assert()
    .failure()
    .stderr(predicate::str::contains("GITLAB_USERNAME"));
}

#[test]
fn notify_without_chat_settings_fails() {
  let server = StubServer::start(gitlab_routes());
  digest_cmd(&server)
    .args(["--mode", "notify"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("SLACK_CHANNEL"));
  assert!(server.requests().is_empty());
}
