//! Best-effort alerting. A failed alert must never take the run down with it.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::MailConfig;

#[derive(Debug, Serialize)]
pub struct OutboundMessage<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub subject: &'a str,
    pub text: &'a str,
}

#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, message: &OutboundMessage<'_>) -> Result<()>;
}

/// Posts messages to an HTTP mail API.
pub struct HttpMailer {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpMailer {
    pub fn new(http: reqwest::Client, cfg: &MailConfig) -> Self {
        Self {
            http,
            endpoint: cfg.endpoint.clone(),
            api_key: cfg.api_key.clone(),
        }
    }
}

impl Transport for HttpMailer {
    async fn send(&self, message: &OutboundMessage<'_>) -> Result<()> {
        self.http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(message)
            .send()
            .await?
            .error_for_status()
            .context("Mail API rejected the message")?;
        Ok(())
    }
}

pub struct Notifier<T: Transport> {
    transport: T,
    from: String,
    to: String,
}

impl<T: Transport> Notifier<T> {
    pub fn new(transport: T, cfg: &MailConfig) -> Self {
        Self {
            transport,
            from: cfg.from.clone(),
            to: cfg.to.clone(),
        }
    }

    /// Fire-and-forget: transport failures are logged and swallowed.
    pub async fn notify(&self, subject: &str, text: &str) {
        let message = OutboundMessage {
            from: &self.from,
            to: &self.to,
            subject,
            text,
        };
        match self.transport.send(&message).await {
            Ok(()) => info!("Alert sent to {}", self.to),
            Err(e) => warn!("Failed to send alert: {:#}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn mail_cfg() -> MailConfig {
        MailConfig {
            endpoint: "http://localhost/send".into(),
            api_key: "key".into(),
            from: "bot@example.com".into(),
            to: "me@example.com".into(),
        }
    }

    struct FailingTransport;

    impl Transport for FailingTransport {
        async fn send(&self, _: &OutboundMessage<'_>) -> Result<()> {
            anyhow::bail!("connection refused")
        }
    }

    struct RecordingTransport {
        sent: AtomicUsize,
    }

    impl Transport for RecordingTransport {
        async fn send(&self, message: &OutboundMessage<'_>) -> Result<()> {
            assert_eq!(message.to, "me@example.com");
            self.sent.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn transport_failure_is_swallowed() {
        let notifier = Notifier::new(FailingTransport, &mail_cfg());
        // must not panic or propagate
        notifier.notify("subject", "body").await;
    }

    #[tokio::test]
    async fn messages_carry_configured_addresses() {
        let transport = RecordingTransport { sent: AtomicUsize::new(0) };
        let notifier = Notifier::new(transport, &mail_cfg());
        notifier.notify("subject", "body").await;
        assert_eq!(notifier.transport.sent.load(Ordering::SeqCst), 1);
    }
}
