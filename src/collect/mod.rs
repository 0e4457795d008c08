// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Namespace for the activity collectors (branches, commits, dedup, merge requests)
// role: collection/namespace
// outputs: Public submodules, one per pipeline stage
// invariants: Collectors never return errors; failures are recorded beside partial results
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod branches;
pub mod commits;
pub mod dedupe;
pub mod merge_requests;
