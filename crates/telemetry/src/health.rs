//! Component health tracking.

use parking_lot::RwLock;

/// Health state for one component: `Ok` when healthy, otherwise the reason.
///
/// Starts unhealthy; something has to probe the component and say so.
#[derive(Debug)]
pub struct ComponentHealth {
    name: &'static str,
    state: RwLock<Result<(), String>>,
}

impl ComponentHealth {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            state: RwLock::new(Err(String::new())),
        }
    }

    pub fn set_healthy(&self) {
        *self.state.write() = Ok(());
    }

    pub fn set_unhealthy(&self, msg: impl Into<String>) {
        *self.state.write() = Err(msg.into());
    }

    pub fn is_healthy(&self) -> bool {
        self.state.read().is_ok()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The unhealthy reason, when one has been recorded.
    pub fn message(&self) -> Option<String> {
        match &*self.state.read() {
            Ok(()) => None,
            Err(msg) if msg.is_empty() => None,
            Err(msg) => Some(msg.clone()),
        }
    }
}

/// Global health registry.
///
/// The pipeline has one external dependency worth watching: the event sink.
pub struct HealthRegistry {
    pub sink: ComponentHealth,
}

impl HealthRegistry {
    pub const fn new() -> Self {
        Self {
            sink: ComponentHealth::new("sink"),
        }
    }

    /// Tracking degrades gracefully without the sink, but the dashboard is
    /// useless; readiness follows the sink.
    pub fn is_ready(&self) -> bool {
        self.sink.is_healthy()
    }
}

impl Default for HealthRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static HEALTH: std::sync::LazyLock<HealthRegistry> = std::sync::LazyLock::new(HealthRegistry::new);

/// Get the global health registry.
pub fn health() -> &'static HealthRegistry {
    &HEALTH
}
