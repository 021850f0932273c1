use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

/// NATS configuration
#[derive(Clone, Debug, Deserialize)]
pub struct NatsConfig {
    #[serde(default = "default_url")]
    pub url: String,

    /// Controller reports arrive on `{prefix}.{controller}.state`
    #[serde(default = "default_state_subject_prefix")]
    pub state_subject_prefix: String,

    /// Subject the composite snapshot is published on
    #[serde(default = "default_output_subject")]
    pub output_subject: String,
}

fn default_url() -> String {
    std::env::var("NATS_URL").unwrap_or_else(|_| "nats://localhost:4222".to_string())
}

fn default_state_subject_prefix() -> String {
    "dynamixel".to_string()
}

fn default_output_subject() -> String {
    "joint_states".to_string()
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            state_subject_prefix: default_state_subject_prefix(),
            output_subject: default_output_subject(),
        }
    }
}

impl NatsConfig {
    /// Subject carrying one controller's state reports
    pub fn state_subject(&self, controller: &str) -> String {
        format!("{}.{}.state", self.state_subject_prefix, controller)
    }
}

/// Connected NATS client
pub struct NatsClient {
    client: async_nats::Client,
}

impl NatsClient {
    /// Connect to NATS
    pub async fn connect(config: NatsConfig) -> Result<Self> {
        info!("Connecting to NATS at {}", config.url);

        let client = async_nats::connect(&config.url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS");

        Ok(Self { client })
    }

    /// Get underlying NATS client
    pub fn client(&self) -> &async_nats::Client {
        &self.client
    }

    /// Flush pending publishes
    pub async fn flush(&self) -> Result<()> {
        self.client
            .flush()
            .await
            .context("Failed to flush NATS connection")
    }
}
