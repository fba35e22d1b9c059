use tracing_appender::non_blocking::WorkerGuard;

use crate::{channel::address::PageOrigin, infra::config::AppConfig};

#[derive(Debug)]
pub struct AppContext {
    pub config: AppConfig,
    pub origin: PageOrigin,
    /// Flushes file logs on drop; held for the whole run.
    log_guard: Option<WorkerGuard>,
}

impl AppContext {
    pub fn new(config: AppConfig, origin: PageOrigin) -> Self {
        Self {
            config,
            origin,
            log_guard: None,
        }
    }

    pub fn with_log_guard(mut self, guard: Option<WorkerGuard>) -> Self {
        self.log_guard = guard;
        self
    }

    pub fn logs_to_file(&self) -> bool {
        self.log_guard.is_some()
    }
}
