use jsonschema::validator_for;
use test_support::StubServer;

use crate::common::{digest_cmd, gitlab_routes, stdout_json};

fn compile_schema(name: &str) -> jsonschema::Validator {
  let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
  let path = manifest_dir.join("tests").join("schemas").join(name);
  let data = std::fs::read(&path).expect("schema file");
  let schema: serde_json::Value = serde_json::from_slice(&data).expect("valid schema JSON");
  validator_for(&schema).expect("compile schema")
}

#[test]
fn debug_report_conforms_to_schema() {
  let server = StubServer::start(gitlab_routes());
  let out = digest_cmd(&server).args(["--date", "2024-01-10"]).output().unwrap();
  let v = stdout_json(&out);

  let compiled = compile_schema("debug-report.schema.json");
  compiled.validate(&v).expect("schema validation failed for debug report");
}

#[test]
fn degraded_debug_report_keeps_its_shape() {
  let server = StubServer::start(vec![]);
  let out = digest_cmd(&server).args(["--date", "2024-01-10"]).output().unwrap();
  let v = stdout_json(&out);

  let compiled = compile_schema("debug-report.schema.json");
  compiled.validate(&v).expect("schema validation failed for degraded report");
}
