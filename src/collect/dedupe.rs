use std::collections::HashSet;

use crate::model::CommitRecord;

/// Keep the first record for each commit id, preserving input order.
///
/// The same commit is routinely reachable from several branches (a feature branch merged into
/// an integration branch); the branch that yielded the first occurrence keeps the attribution.
pub fn dedupe(commits: Vec<CommitRecord>) -> Vec<CommitRecord> {
  let mut seen: HashSet<String> = HashSet::with_capacity(commits.len());
  commits.into_iter().filter(|c| seen.insert(c.id.clone())).collect()
}
