use anyhow::Result;

use crate::{
    domain::{message_input_state::MessageInputState, shell_state::ShellState},
    usecases::{
        context::AppContext,
        contracts::{AppEventSource, ShellOrchestrator},
    },
};

use super::{terminal::TerminalSession, view};

pub fn start(
    context: &AppContext,
    event_source: &mut dyn AppEventSource,
    orchestrator: &mut dyn ShellOrchestrator,
) -> Result<()> {
    tracing::info!(
        log_level = %context.config.logging.level,
        origin = %context.config.chat.origin,
        "starting chat shell"
    );

    let mut terminal = TerminalSession::new()?;
    drive(event_source, orchestrator, |state, input| {
        terminal.draw(|frame| view::render(frame, state, input))
    })?;

    tracing::info!("chat shell stopped");
    Ok(())
}

/// Redraws and dispatches events until the orchestrator stops running or the
/// source runs dry.
fn drive<D>(
    event_source: &mut dyn AppEventSource,
    orchestrator: &mut dyn ShellOrchestrator,
    mut draw: D,
) -> Result<()>
where
    D: FnMut(&ShellState, &MessageInputState) -> Result<()>,
{
    while orchestrator.state().is_running() {
        draw(orchestrator.state(), orchestrator.input())?;

        match event_source.next_event()? {
            Some(event) => orchestrator.handle_event(event)?,
            None if event_source.is_exhausted() => break,
            None => {}
        }
    }

    Ok(())
}
