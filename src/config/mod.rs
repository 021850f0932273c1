use crate::error::AggregatorError;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use tracing::warn;

// Re-export existing config types
pub use crate::nats::NatsConfig;

/// Complete aggregator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AggregatorConfig {
    /// Snapshot publish frequency (Hz)
    #[serde(default = "default_rate")]
    pub rate: f64,

    /// Frame label stamped on every snapshot
    #[serde(default = "default_frame_id")]
    pub frame_id: String,

    /// Joint controllers to aggregate
    #[serde(default)]
    pub joint_controllers: Vec<String>,

    /// Per-controller parameters (controller name -> parameters)
    #[serde(default)]
    pub controllers: HashMap<String, ControllerConfig>,

    #[serde(default)]
    pub nats: NatsConfig,
}

/// Parameters of one joint controller
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ControllerConfig {
    /// Joint driven by the controller
    #[serde(default)]
    pub joint_name: String,
}

/// Controller paired with the joint it reports on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedController {
    pub controller: String,
    pub joint_name: String,
}

fn default_rate() -> f64 {
    20.0
}

fn default_frame_id() -> String {
    "base_link".to_string()
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            rate: default_rate(),
            frame_id: default_frame_id(),
            joint_controllers: Vec::new(),
            controllers: HashMap::new(),
            nats: NatsConfig::default(),
        }
    }
}

impl AggregatorConfig {
    /// Resolve the controller list into (controller, joint) pairs
    ///
    /// Controllers are sorted and deduplicated. An empty list, or a controller
    /// without a joint name, is a configuration error.
    pub fn resolve_controllers(&self) -> Result<Vec<ResolvedController>, AggregatorError> {
        if self.joint_controllers.is_empty() {
            return Err(AggregatorError::Configuration(
                "no joint controllers configured; set `joint_controllers` to a list of controller names"
                    .to_string(),
            ));
        }

        let sorted: BTreeSet<&String> = self.joint_controllers.iter().collect();

        sorted
            .into_iter()
            .map(|controller| {
                let joint_name = self
                    .controllers
                    .get(controller)
                    .map(|c| c.joint_name.trim())
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| {
                        AggregatorError::Configuration(format!(
                            "controller '{}' has no joint_name",
                            controller
                        ))
                    })?;

                Ok(ResolvedController {
                    controller: controller.clone(),
                    joint_name: joint_name.to_string(),
                })
            })
            .collect()
    }

    /// Override fields from environment variables
    ///
    /// `JSA_RATE`, `JSA_FRAME_ID` and `NATS_URL` take precedence over the file.
    /// Unparsable or empty values are ignored.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("JSA_RATE") {
            match v.parse::<f64>() {
                Ok(rate) => self.rate = rate,
                Err(_) => warn!(value = %v, "Ignoring unparsable JSA_RATE"),
            }
        }
        if let Some(v) = lookup("JSA_FRAME_ID") {
            if !v.is_empty() {
                self.frame_id = v;
            }
        }
        if let Some(v) = lookup("NATS_URL") {
            if !v.is_empty() {
                self.nats.url = v;
            }
        }
    }
}

/// Load configuration from TOML file
pub fn load_config(path: &str) -> Result<AggregatorConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path))?;
    let config: AggregatorConfig =
        toml::from_str(&contents).with_context(|| format!("Failed to parse config file '{}'", path))?;
    Ok(config)
}
