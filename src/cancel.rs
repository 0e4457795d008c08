//! Cooperative cancellation for one run.
//!
//! Every collector call takes the same `CancellationToken`; it is checked before each upstream
//! request, so requests already in flight complete.

pub use tokio_util::sync::CancellationToken;

use crate::error::HostError;

/// `Err(Cancelled)` once the token has fired.
pub fn check(token: &CancellationToken) -> Result<(), HostError> {
  if token.is_cancelled() {
    Err(HostError::Cancelled)
  } else {
    Ok(())
  }
}

/// Cancel `token` on Ctrl-C. A second handler cannot be installed; that case is logged and ignored.
pub fn cancel_on_ctrlc(token: CancellationToken) {
  if let Err(e) = ctrlc::set_handler(move || {
    tracing::warn!("interrupt received; cancelling run");
    token.cancel();
  }) {
    tracing::debug!(error = %e, "ctrl-c handler not installed");
  }
}
