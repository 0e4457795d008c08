// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Library root for the GitLab activity digest pipeline
// role: crate/root
// outputs: Public modules used by the binary and integration tests
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod cancel;
pub mod cli;
pub mod collect;
pub mod config;
pub mod digest;
pub mod error;
pub mod ext;
pub mod host;
pub mod model;
pub mod notify;
pub mod report;
pub mod summarize;
pub mod util;
pub mod window;
