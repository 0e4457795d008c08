use crate::common::BIN;

#[test]
fn cli_generates_man_page() {
  let out = test_support::cmd_bin(BIN).args(["--gen-man"]).output().unwrap();
  assert!(out.status.success());
  let s = String::from_utf8_lossy(&out.stdout);
  // clap_mangen emits a roff manpage starting with .TH
  assert!(s.contains(".TH"));
  assert!(s.contains("activity"));
}

#[test]
fn gen_man_needs_no_gitlab_settings() {
  let out = test_support::cmd_bin(BIN)
    .env_remove("GITLAB_TOKEN")
    .env_remove("GITLAB_PROJECT_ID")
    .args(["--gen-man"])
    .output()
    .unwrap();
  assert!(out.status.success());
}
