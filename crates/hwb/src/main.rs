use std::{future::Future, io, sync::Arc};

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use hwb_core::{
    config::Config, domain::Cursor, messaging::notifier::Notifier, poller::PollLoop,
};
use hwb_practicum::PracticumClient;
use hwb_telegram::TelegramMessenger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load config first so `.env` can also set RUST_LOG / LOG_FILE.
    let loaded = Config::load();
    hwb_core::logging::init("hwb")?;

    let cfg = match loaded {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            tracing::error!(error = %e, "bot cannot start without its credentials");
            return Err(e).context("startup aborted");
        }
    };

    let source = Arc::new(
        PracticumClient::new(
            cfg.practicum_token.clone(),
            cfg.endpoint.clone(),
            cfg.request_timeout,
        )
        .context("failed to build review API client")?,
    );
    let messenger = Arc::new(TelegramMessenger::new(cfg.telegram_token.clone()));
    let notifier = Notifier::new(messenger, cfg.telegram_chat_id.clone());

    let poll_loop = PollLoop::new(source, notifier, cfg.retry_interval, Cursor::now());

    let cancel = CancellationToken::new();
    tokio::spawn(shutdown_on_signal(cancel.clone()));

    tracing::info!(endpoint = %cfg.endpoint, "homework bot started");
    poll_loop.run(cancel).await;
    tracing::info!("homework bot stopped");

    Ok(())
}

async fn shutdown_on_signal(cancel: CancellationToken) {
    cancel_on(wait_for_signal(), cancel).await;
}

/// Cancel once `signal` resolves. If signals cannot be received the bot keeps
/// running until killed.
async fn cancel_on(signal: impl Future<Output = io::Result<()>>, cancel: CancellationToken) {
    if let Err(e) = signal.await {
        tracing::error!(error = %e, "cannot listen for shutdown signals");
        std::future::pending::<()>().await;
    }

    tracing::info!("shutdown requested, finishing current cycle");
    cancel.cancel();
}

#[cfg(unix)]
async fn wait_for_signal() -> io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, "cannot listen for SIGTERM, only Ctrl-C stops the bot");
            return tokio::signal::ctrl_c().await;
        }
    };
    tokio::select! {
        res = tokio::signal::ctrl_c() => res,
        _ = term.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> io::Result<()> {
    tokio::signal::ctrl_c().await
}
