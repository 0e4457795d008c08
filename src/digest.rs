// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Assemble the deduplicated commits and both MR lists into one digest and render it as stable text
// role: digest/render
// inputs: TimeWindow, deduplicated commits, created MRs, reviewed MRs
// outputs: ActivityDigest; deterministic plain-text rendering
// invariants:
// - rendering depends only on the digest contents (no clock, no env)
// - commit lines keep collector order; MR lists keep host order
// - an empty MR list renders the literal "None"
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt::Write as _;

use serde::Serialize;

use crate::model::{CommitRecord, MergeRequestRecord};
use crate::window::TimeWindow;

/// Longest description excerpt rendered per merge request, in characters.
pub const DESCRIPTION_EXCERPT_CHARS: usize = 280;

pub const EMPTY_SECTION: &str = "None";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityDigest {
  pub window: TimeWindow,
  pub commits: Vec<CommitRecord>,
  pub created_mrs: Vec<MergeRequestRecord>,
  pub reviewed_mrs: Vec<MergeRequestRecord>,
}

pub fn build(
  window: TimeWindow,
  commits: Vec<CommitRecord>,
  created_mrs: Vec<MergeRequestRecord>,
  reviewed_mrs: Vec<MergeRequestRecord>,
) -> ActivityDigest {
  ActivityDigest {
    window,
    commits,
    created_mrs,
    reviewed_mrs,
  }
}

impl ActivityDigest {
  pub fn is_empty(&self) -> bool {
    self.commits.is_empty() && self.created_mrs.is_empty() && self.reviewed_mrs.is_empty()
  }

  /// Plain-text rendering handed to the summarizer and used verbatim as its fallback.
  pub fn render(&self) -> String {
    let mut out = String::new();
    let _ = writeln!(
      out,
      "Activity from {} to {}",
      self.window.since_display(),
      self.window.until_display()
    );
    out.push('\n');

    let _ = writeln!(out, "Commits: {}", self.commits.len());
    for c in &self.commits {
      let _ = writeln!(out, "- {} [{}] {}", c.title, c.branch.name, c.web_url);
    }

    out.push('\n');
    render_mrs(&mut out, "Merge requests created", &self.created_mrs);
    out.push('\n');
    render_mrs(&mut out, "Merge requests reviewed", &self.reviewed_mrs);

    out.trim_end().to_string()
  }
}

fn render_mrs(out: &mut String, heading: &str, mrs: &[MergeRequestRecord]) {
  let _ = writeln!(out, "{heading}:");
  if mrs.is_empty() {
    let _ = writeln!(out, "{EMPTY_SECTION}");
    return;
  }
  for mr in mrs {
    let _ = writeln!(out, "- {}", mr.title);
    let _ = writeln!(
      out,
      "  Description: {}",
      mr.description.as_deref().map(excerpt).unwrap_or_else(|| EMPTY_SECTION.to_string())
    );
    let _ = writeln!(out, "  Link: {}", mr.web_url);
  }
}

/// Collapse whitespace to single spaces and cap the length on a char boundary.
fn excerpt(text: &str) -> String {
  let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
  if flat.chars().count() <= DESCRIPTION_EXCERPT_CHARS {
    return flat;
  }
  let mut cut: String = flat.chars().take(DESCRIPTION_EXCERPT_CHARS).collect();
  cut.push('…');
  cut
}
