//! Use case layer: application workflows and orchestration.

pub mod bootstrap;
pub mod chat_transport;
pub mod context;
pub mod contracts;
pub mod shell;
pub mod transcript_renderer;

/// Returns the usecases module name for smoke checks.
pub fn module_name() -> &'static str {
    "usecases"
}
