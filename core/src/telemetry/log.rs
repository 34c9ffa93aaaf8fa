use log::{debug, info, warn};

/// Thin wrapper over the `log` facade that tags every line with the
/// component that emitted it.
#[derive(Debug, Clone, Copy)]
pub struct LogManager {
    component: &'static str,
}

impl LogManager {
    pub fn for_component(component: &'static str) -> Self {
        Self { component }
    }

    pub fn record(&self, message: &str) {
        info!(target: "scoutcore", "[{}] {}", self.component, message);
    }

    pub fn trace(&self, message: &str) {
        debug!(target: "scoutcore", "[{}] {}", self.component, message);
    }

    pub fn warn(&self, message: &str) {
        warn!(target: "scoutcore", "[{}] {}", self.component, message);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::for_component("core")
    }
}
