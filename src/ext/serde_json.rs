// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Dotted-path access and typed extraction for loosely shaped host JSON (branches, commits, MRs)
// role: extension/serde_json
// outputs: JsonFetch trait and JsonFetched wrapper (typed, defaulted, and timestamp extraction)
// invariants: No panics; missing paths or wrong types yield None / Default
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

/// A location inside a JSON document, resolved lazily into a typed value.
pub struct JsonFetched<'a> {
  inner: Option<&'a serde_json::Value>,
}

impl<'a> JsonFetched<'a> {
  pub fn to<T>(&self) -> Option<T>
  where
    T: DeserializeOwned,
  {
    self.inner.and_then(|v| T::deserialize(v).ok())
  }

  pub fn to_or_default<T>(&self) -> T
  where
    T: DeserializeOwned + Default,
  {
    self.to::<T>().unwrap_or_default()
  }

  /// Non-empty string, trimmed of surrounding whitespace.
  pub fn to_text(&self) -> Option<String> {
    self
      .inner
      .and_then(|v| v.as_str())
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(str::to_string)
  }

  /// RFC 3339 timestamp (any offset) normalized to UTC.
  pub fn to_instant(&self) -> Option<DateTime<Utc>> {
    let raw = self.inner.and_then(|v| v.as_str())?;
    DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.with_timezone(&Utc))
  }
}

/// Fetch nested values via dotted paths like `"commit.committed_date"`.
/// Numeric segments index into arrays (`"choices.0.message.content"`).
pub trait JsonFetch {
  fn fetch(&self, path: &str) -> JsonFetched<'_>;
}

impl JsonFetch for serde_json::Value {
  fn fetch(&self, path: &str) -> JsonFetched<'_> {
    if path.is_empty() {
      return JsonFetched { inner: Some(self) };
    }

    let mut cur = self;

    for key in path.split('.') {
      let next = match (cur, key.parse::<usize>()) {
        (serde_json::Value::Array(items), Ok(idx)) => items.get(idx),
        _ => cur.get(key),
      };
      match next {
        Some(next) if !next.is_null() => cur = next,
        _ => return JsonFetched { inner: None },
      }
    }

    JsonFetched { inner: Some(cur) }
  }
}
