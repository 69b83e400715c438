use std::fmt;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use log::{debug, warn};

/// Фоновый поток keep-alive.
///
/// Каждый тик вызывает `emit`, потом спит `period`. Остановка: флаг +
/// сообщение в канал `wake`, чтобы не досыпать период до конца.
pub(crate) struct Heartbeat {
    stop: Arc<AtomicBool>,
    wake: Sender<()>,
    handle: JoinHandle<()>,
}

impl Heartbeat {
    pub(crate) fn spawn<F, E>(period: Duration, emit: F) -> io::Result<Self>
    where
        F: FnMut() -> Result<(), E> + Send + 'static,
        E: fmt::Display,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let (wake, woken) = crossbeam_channel::bounded(1);

        let sd = stop.clone();
        let handle = thread::Builder::new()
            .name("heartbeat".into())
            .spawn(move || run_heartbeat(period, emit, &sd, &woken))?;

        Ok(Self { stop, wake, handle })
    }

    /// Останавливает поток и ждёт его завершения
    pub(crate) fn stop(self) {
        self.stop.store(true, Ordering::Release);
        // канал на 1 сообщение: если там уже лежит wake, второй не нужен
        let _ = self.wake.try_send(());

        if let Err(panic) = self.handle.join() {
            warn!("heartbeat thread panicked: {:?}", panic);
        }
    }
}

fn run_heartbeat<F, E>(period: Duration, mut emit: F, stop: &AtomicBool, woken: &Receiver<()>)
where
    F: FnMut() -> Result<(), E>,
    E: fmt::Display,
{
    while !stop.load(Ordering::Acquire) {
        if let Err(e) = emit() {
            if stop.load(Ordering::Acquire) {
                debug!("heartbeat failed during shutdown: {e}");
            } else {
                warn!("heartbeat failed: {e}");
            }
            return;
        }
        debug!("heartbeat");

        match woken.recv_timeout(period) {
            Err(RecvTimeoutError::Timeout) => {}
            // разбудили: флаг проверит while
            Ok(()) => {}
            Err(RecvTimeoutError::Disconnected) => return,
        }
    }
}
