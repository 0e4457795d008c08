use predicates::prelude::*;
use serde_json::Value;
use test_support::{Route, StubServer};

use crate::common::{digest_cmd, gitlab_routes};

const CHAT_PATH: &str = "/api/chat.postMessage";
const COMPLETIONS_PATH: &str = "/v1/chat/completions";

fn with(extra: Vec<Route>) -> StubServer {
  let mut routes = gitlab_routes();
  routes.extend(extra);
  StubServer::start(routes)
}

#[test]
fn preview_without_summarizer_prints_raw_digest() {
  let server = with(vec![]);
  digest_cmd(&server)
    .args(["--mode", "preview", "--date", "2024-01-10"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Commits: 2"))
    .stdout(predicate::str::contains("- Fix login redirect [feature-x]"))
    .stdout(predicate::str::contains("Merge requests reviewed:\n- Cache project settings"));
}

#[test]
fn preview_uses_summary_when_available() {
  let server = with(vec![Route::post(
    COMPLETIONS_PATH,
    200,
    r#"{"choices":[{"message":{"role":"assistant","content":"- Fixed the login redirect loop\n- Reviewed settings caching"}}]}"#,
  )]);
  let out = digest_cmd(&server)
    .env("SUMMARIZER_URL", format!("{}/v1", server.url()))
    .env("SUMMARIZER_API_KEY", "sk-test")
    .args(["--mode", "preview", "--date", "2024-01-10"])
    .output()
    .unwrap();

  assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
  let stdout = String::from_utf8_lossy(&out.stdout);
  assert_eq!(stdout.trim(), "- Fixed the login redirect loop\n- Reviewed settings caching");

  let sent = server.requests_to(COMPLETIONS_PATH);
  assert_eq!(sent.len(), 1);
  assert_eq!(sent[0].header("authorization"), Some("Bearer sk-test"));
  let body: Value = serde_json::from_str(&sent[0].body).unwrap();
  let prompt = body["messages"][1]["content"].as_str().unwrap();
  assert!(prompt.contains("10 Jan 2024, 00:00 IST"));
  assert!(prompt.contains("Fix login redirect [feature-x]"));
}

#[test]
fn summarizer_outage_falls_back_to_digest() {
  let server = with(vec![Route::post(COMPLETIONS_PATH, 503, r#"{"error":"overloaded"}"#)]);
  digest_cmd(&server)
    .env("SUMMARIZER_URL", format!("{}/v1", server.url()))
    .args(["--mode", "preview", "--date", "2024-01-10"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Commits: 2"));
}

#[test]
fn notify_posts_message_to_channel() {
  let server = with(vec![Route::post(CHAT_PATH, 200, r#"{"ok":true,"channel":"C1","ts":"1704873600.000100"}"#)]);
  digest_cmd(&server)
    .env("SLACK_API_URL", format!("{}{CHAT_PATH}", server.url()))
    .env("SLACK_BOT_TOKEN", "xoxb-test")
    .env("SLACK_CHANNEL", "#eng-updates")
    .args(["--mode", "notify", "--date", "2024-01-10"])
    .assert()
    .success();

  let posts = server.requests_to(CHAT_PATH);
  assert_eq!(posts.len(), 1);
  assert_eq!(posts[0].header("authorization"), Some("Bearer xoxb-test"));
  let body: Value = serde_json::from_str(&posts[0].body).unwrap();
  assert_eq!(body["channel"], "#eng-updates");
  assert!(body["text"].as_str().unwrap().contains("Commits: 2"));
}

#[test]
fn rejected_delivery_fails_the_run() {
  let server = with(vec![Route::post(CHAT_PATH, 200, r#"{"ok":false,"error":"not_in_channel"}"#)]);
  digest_cmd(&server)
    .env("SLACK_API_URL", format!("{}{CHAT_PATH}", server.url()))
    .env("SLACK_BOT_TOKEN", "xoxb-test")
    .env("SLACK_CHANNEL", "#eng-updates")
    .args(["--mode", "notify", "--date", "2024-01-10"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("not_in_channel"));
}
