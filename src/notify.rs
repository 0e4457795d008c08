// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Deliver the composed message to a Slack-compatible chat.postMessage endpoint
// role: collaborator/notifier
// inputs: ChatConfig, message text
// side_effects: One HTTP POST per delivery
// invariants: A delivery is successful only on 2xx with a body whose "ok" is not false
// errors: DeliveryFailed (propagates to the caller as the run's failure)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::time::Duration;

use serde_json::{json, Value};

use crate::config::ChatConfig;
use crate::error::{ActivityError, Result};
use crate::ext::serde_json::JsonFetch;

pub trait Notifier {
  fn notify(&self, text: &str) -> Result<()>;
}

pub struct SlackNotifier {
  url: String,
  token: String,
  channel: String,
  agent: ureq::Agent,
}

impl SlackNotifier {
  pub fn new(cfg: &ChatConfig, timeout: Duration) -> Self {
    let agent: ureq::Agent = ureq::Agent::config_builder()
      .timeout_global(Some(timeout))
      .build()
      .into();
    Self {
      url: cfg.url.clone(),
      token: cfg.token.clone(),
      channel: cfg.channel.clone(),
      agent,
    }
  }
}

impl Notifier for SlackNotifier {
  fn notify(&self, text: &str) -> Result<()> {
    let payload = json!({ "channel": self.channel, "text": text });

    let mut resp = self
      .agent
      .post(&self.url)
      .header("Authorization", &format!("Bearer {}", self.token))
      .send_json(&payload)
      .map_err(|e| ActivityError::DeliveryFailed(e.to_string()))?;

    // Slack answers 200 with {"ok": false, "error": ...} for most API-level failures.
    let reply: Value = resp.body_mut().read_json().unwrap_or(Value::Null);
    if reply.fetch("ok").to::<bool>() == Some(false) {
      let reason: String = reply.fetch("error").to_text().unwrap_or_else(|| "unknown error".into());
      return Err(ActivityError::DeliveryFailed(reason));
    }

    tracing::info!(channel = %self.channel, chars = text.len(), "message delivered");
    Ok(())
  }
}
