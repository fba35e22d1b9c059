use std::{path::Path, sync::mpsc};

use tokio::runtime::{Builder, Runtime};

use crate::{
    channel::{
        address::PageOrigin,
        reconnecting::{ReconnectPolicy, ReconnectingChannel},
    },
    domain::events::ChannelEvent,
    infra::{
        self, config::FileConfigAdapter, contracts::ConfigAdapter, error::AppError,
        storage_layout::StorageLayout,
    },
    usecases::{chat_transport::ChatTransport, context::AppContext},
};

const NETWORK_THREAD_NAME: &str = "air-chat-net";

/// Transport wired to a live socket plus the stream of its channel events.
///
/// The runtime is owned here; move the transport out and keep the session
/// alive until it is dropped so the channel is told to stop first.
pub struct ChatSession {
    pub transport: ChatTransport<ReconnectingChannel>,
    pub channel_events: mpsc::Receiver<ChannelEvent>,
    _runtime: Runtime,
}

pub fn bootstrap(
    config_path: Option<&Path>,
    origin_override: Option<&str>,
) -> Result<AppContext, AppError> {
    let adapter = FileConfigAdapter::new(config_path).with_origin_override(origin_override);
    let context = build_context(&adapter)?;

    let layout = StorageLayout::resolve()?;
    let guard = infra::logging::init(&context.config.logging, &layout)?;

    Ok(context.with_log_guard(guard))
}

fn build_context(adapter: &dyn ConfigAdapter) -> Result<AppContext, AppError> {
    let config = adapter.load().map_err(AppError::Other)?;
    let origin = PageOrigin::parse(&config.chat.origin)?;

    Ok(AppContext::new(config, origin))
}

pub fn build_runtime() -> Result<Runtime, AppError> {
    Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name(NETWORK_THREAD_NAME)
        .enable_all()
        .build()
        .map_err(AppError::Runtime)
}

pub fn open_session(context: &AppContext) -> Result<ChatSession, AppError> {
    let runtime = build_runtime()?;
    let (event_tx, channel_events) = mpsc::channel();
    let policy = ReconnectPolicy::from(&context.config.reconnect);

    let transport = ChatTransport::connect(
        &context.origin,
        &context.config.chat.endpoint_path,
        |address| ReconnectingChannel::start(&runtime, address.clone(), policy, event_tx),
    )?;

    Ok(ChatSession {
        transport,
        channel_events,
        _runtime: runtime,
    })
}
