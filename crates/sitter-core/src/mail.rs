//! Outbound mail — the external collaborator notified of account events.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("mail delivery failed: {0}")]
pub struct MailError(pub String);

/// Minimal outbound-mail capability.
///
/// Delivery is best-effort at every call site: a failed send is logged by
/// the caller and never turned into a request error.
#[async_trait]
pub trait Mailer: Send + Sync {
  async fn send(
    &self,
    to: &str,
    subject: &str,
    body: &str,
  ) -> Result<(), MailError>;
}
