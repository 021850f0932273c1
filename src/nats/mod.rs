// NATS transport: controller subscriptions and snapshot output

mod client;
mod publisher;
mod subscriber;

pub use client::{NatsClient, NatsConfig};
pub use publisher::NatsSink;
pub use subscriber::{parse_report, ControllerSubscriber};
