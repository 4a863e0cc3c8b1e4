//! SMTP mailer over lettre's async transport.
//!
//! With no SMTP host configured the mailer runs in no-op mode and only logs
//! — useful in development, and harmless in production where every call site
//! treats delivery as best-effort.

use anyhow::Context as _;
use async_trait::async_trait;
use lettre::{
  AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
  message::Mailbox, transport::smtp::authentication::Credentials,
};
use serde::Deserialize;
use sitter_core::mail::{MailError, Mailer};

fn default_port() -> u16 {
  587
}

fn default_from() -> String {
  "Sitter <noreply@sitter.example>".to_owned()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
  /// Relay host; empty disables outbound mail entirely.
  #[serde(default)]
  pub host:     String,
  #[serde(default = "default_port")]
  pub port:     u16,
  #[serde(default)]
  pub username: Option<String>,
  #[serde(default)]
  pub password: Option<String>,
  #[serde(default = "default_from")]
  pub from:     String,
}

impl Default for SmtpConfig {
  fn default() -> Self {
    Self {
      host:     String::new(),
      port:     default_port(),
      username: None,
      password: None,
      from:     default_from(),
    }
  }
}

pub struct SmtpMailer {
  transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
  from:      Mailbox,
}

impl SmtpMailer {
  pub fn from_config(config: &SmtpConfig) -> anyhow::Result<Self> {
    let from = config
      .from
      .parse::<Mailbox>()
      .context("invalid smtp.from address")?;

    let transport = if config.host.trim().is_empty() {
      tracing::warn!("no SMTP host configured; outbound mail is disabled");
      None
    } else {
      let mut builder =
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
          .context("cannot configure SMTP transport")?
          .port(config.port);
      if let (Some(username), Some(password)) =
        (&config.username, &config.password)
      {
        builder = builder
          .credentials(Credentials::new(username.clone(), password.clone()));
      }
      Some(builder.build())
    };

    Ok(Self { transport, from })
  }
}

#[async_trait]
impl Mailer for SmtpMailer {
  async fn send(
    &self,
    to: &str,
    subject: &str,
    body: &str,
  ) -> Result<(), MailError> {
    let Some(transport) = &self.transport else {
      tracing::info!(to, subject, "mail suppressed (no-op mode)");
      return Ok(());
    };

    let message = Message::builder()
      .from(self.from.clone())
      .to(
        to.parse()
          .map_err(|e| MailError(format!("invalid recipient: {e}")))?,
      )
      .subject(subject)
      .body(body.to_owned())
      .map_err(|e| MailError(e.to_string()))?;

    transport
      .send(message)
      .await
      .map_err(|e| MailError(e.to_string()))?;

    tracing::debug!(to, subject, "mail sent");
    Ok(())
  }
}
