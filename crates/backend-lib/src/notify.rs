// ============================
// crates/backend-lib/src/notify.rs
// ============================
//! Push-notification seam. The coordinator fires a notification when an
//! invitation goes out; delivery is best-effort and must never gate the
//! invite, so the call is spawned and failures are only logged.

use async_trait::async_trait;
use consult_common::{AppointmentId, SpecialistId};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

/// External push/email sender consumed as a black box.
#[async_trait]
pub trait CallNotifier: Send + Sync {
    async fn notify_incoming_call(
        &self,
        specialist_id: &SpecialistId,
        appointment_id: &AppointmentId,
    ) -> Result<(), NotifyError>;
}

/// Default notifier for deployments without a push gateway configured.
pub struct NoopNotifier;

#[async_trait]
impl CallNotifier for NoopNotifier {
    async fn notify_incoming_call(
        &self,
        specialist_id: &SpecialistId,
        appointment_id: &AppointmentId,
    ) -> Result<(), NotifyError> {
        debug!(%specialist_id, %appointment_id, "push notification skipped (noop notifier)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_notifier_always_succeeds() {
        let notifier = NoopNotifier;
        let result = notifier
            .notify_incoming_call(&SpecialistId::new("s1"), &AppointmentId::new("apt-1"))
            .await;
        assert!(result.is_ok());
    }
}
