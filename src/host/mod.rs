// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Namespace for the source-control host integration
// role: host/namespace
// outputs: GitlabApi seam, HTTP backend, response decoders; in-memory fake for unit tests
// invariants: Every request is isolated; callers own the fallback policy
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod gitlab_api;

#[cfg(test)]
pub(crate) mod fake;
#[cfg(test)]
pub(crate) mod stub;
