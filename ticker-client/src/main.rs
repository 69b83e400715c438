//! Точка входа `ticker-client`.
//!
//! Жизненный цикл:
//! - парсинг CLI и загрузка списка каналов
//! - handshake и открытие websocket-сессии (heartbeat запускается внутри)
//! - connect к endpoint'ам и подписка на каналы
//! - приём сообщений в отдельном потоке
//! - корректная остановка по `Ctrl+C`

mod cli;
mod stream;
mod subscriptions;

use std::sync::{Arc, atomic::AtomicBool, atomic::Ordering};
use std::thread;

use anyhow::Context;
use clap::Parser;
use crossbeam_channel::RecvTimeoutError;
use log::{info, warn};
use ticker_client::Session;
use ticker_client::config::SHUTDOWN_TICK;

fn main() -> anyhow::Result<()> {
    // Логи через RUST_LOG=info/debug
    env_logger::init();

    let shutdown = Arc::new(AtomicBool::new(false));

    // Ctrl+C => ставим shutdown=true
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || {
            shutdown.store(true, Ordering::Relaxed);
            info!("shutting down...");
        })?;
    }

    let args = cli::Args::parse();
    args.validate()?;

    let subs = subscriptions::load_subscriptions(&args)?;

    info!(
        "Starting ticker-client: uri={}, endpoint={:?}, subscriptions={}",
        args.uri,
        args.endpoint(),
        subs.len()
    );

    let session = Arc::new(
        Session::open(&args.uri).with_context(|| format!("open session {}", args.uri))?,
    );

    for msg in subscriptions::opening_messages(&subs, args.endpoint()) {
        session.send(&msg)?;
    }

    let (done_tx, done_rx) = crossbeam_channel::bounded(1);
    let reader = {
        let session = session.clone();
        thread::Builder::new()
            .name("receiver".into())
            .spawn(move || {
                let _ = done_tx.send(stream::run_receiver(&session));
            })?
    };

    let result = loop {
        if shutdown.load(Ordering::Relaxed) {
            break Ok(());
        }

        match done_rx.recv_timeout(SHUTDOWN_TICK) {
            Ok(res) => break res,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break Ok(()),
        }
    };

    session.close();
    if let Err(panic) = reader.join() {
        warn!("receiver thread panicked: {:?}", panic);
    }

    result
}
