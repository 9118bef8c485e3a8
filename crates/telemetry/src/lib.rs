//! Internal telemetry: tracing setup and component health.

pub mod health;
pub mod tracing_setup;

pub use health::{health, ComponentHealth, HealthRegistry};
pub use tracing_setup::{init_tracing, init_tracing_from_env, TracingConfig};
