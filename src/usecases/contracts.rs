use anyhow::Result;

use crate::domain::{
    events::AppEvent, message_input_state::MessageInputState, shell_state::ShellState,
};

pub trait AppEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>>;

    /// True once no further events can ever arrive.
    fn is_exhausted(&self) -> bool {
        false
    }
}

pub trait ShellOrchestrator {
    fn state(&self) -> &ShellState;
    fn input(&self) -> &MessageInputState;
    fn handle_event(&mut self, event: AppEvent) -> Result<()>;
}
