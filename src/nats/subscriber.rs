use crate::ingress::{ControllerReport, UpdateIngress};
use anyhow::{Context, Result};
use futures::StreamExt;
use tracing::{info, warn};

/// Feeds one controller's state reports into the ingress
pub struct ControllerSubscriber {
    controller: String,
    subject: String,
    subscriber: async_nats::Subscriber,
    ingress: UpdateIngress,
}

impl ControllerSubscriber {
    /// Subscribe to a controller's state subject
    pub async fn subscribe(
        client: &async_nats::Client,
        controller: impl Into<String>,
        subject: impl Into<String>,
        ingress: UpdateIngress,
    ) -> Result<Self> {
        let controller = controller.into();
        let subject = subject.into();

        let subscriber = client
            .subscribe(subject.clone())
            .await
            .with_context(|| format!("Failed to subscribe to '{}'", subject))?;

        info!(controller = %controller, subject = %subject, "Subscribed to controller state");

        Ok(Self {
            controller,
            subject,
            subscriber,
            ingress,
        })
    }

    /// Process reports until the subscription ends
    ///
    /// Malformed payloads are logged and skipped.
    pub async fn run(mut self) {
        while let Some(msg) = self.subscriber.next().await {
            match parse_report(&msg.payload) {
                Ok(report) => self.ingress.on_report(&self.controller, report),
                Err(e) => {
                    warn!(
                        controller = %self.controller,
                        subject = %self.subject,
                        error = %e,
                        "Failed to deserialize controller report, skipping"
                    );
                }
            }
        }

        warn!(controller = %self.controller, "Controller subscription ended");
    }
}

/// Decode a JSON controller report
pub fn parse_report(payload: &[u8]) -> Result<ControllerReport> {
    serde_json::from_slice(payload).context("Invalid controller report")
}
