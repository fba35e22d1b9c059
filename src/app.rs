use std::{io, time::Duration};

use anyhow::Result;

use crate::{
    channel,
    cli::{Cli, Command},
    domain, infra,
    ui::{
        self,
        pipe::{self, PipeOptions},
        CrosstermEventSource,
    },
    usecases::{self, bootstrap, shell::DefaultShellOrchestrator},
};

pub fn run(cli: Cli) -> Result<()> {
    let context = bootstrap::bootstrap(cli.config.as_deref(), cli.origin.as_deref())?;

    tracing::debug!(
        ui = ui::module_name(),
        domain = domain::module_name(),
        channel = channel::module_name(),
        usecases = usecases::module_name(),
        infra = infra::module_name(),
        "module boundaries loaded"
    );

    match cli.command_or_default() {
        Command::Run => {
            let session = bootstrap::open_session(&context)?;
            let mut event_source = CrosstermEventSource::new(session.channel_events);
            let mut orchestrator = DefaultShellOrchestrator::new(session.transport);

            ui::shell::start(&context, &mut event_source, &mut orchestrator)?;
        }
        Command::Pipe { format, linger_ms } => {
            let session = bootstrap::open_session(&context)?;
            let lines = pipe::spawn_stdin_reader();
            let mut stdout = io::stdout().lock();

            pipe::run(
                session.transport,
                &session.channel_events,
                &lines,
                &mut stdout,
                PipeOptions {
                    format,
                    linger: Duration::from_millis(linger_ms),
                },
            )?;
        }
    }

    Ok(())
}
