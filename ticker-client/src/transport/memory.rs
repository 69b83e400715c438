//! Транспорт в памяти для тестов сессии.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;

use super::Transport;
use crate::error::TransportError;

const TICK: Duration = Duration::from_millis(10);

pub(crate) struct MemoryTransport {
    incoming: Receiver<Option<String>>,
    remote: Remote,
}

/// Сторона "сервера": кормит входящие фреймы и видит отправленные
#[derive(Clone)]
pub(crate) struct Remote {
    pub(crate) feed: Sender<Option<String>>,
    pub(crate) sent: Arc<Mutex<Vec<String>>>,
    pub(crate) closed: Arc<AtomicBool>,
    pub(crate) fail_sends: Arc<AtomicBool>,
}

impl Remote {
    pub(crate) fn push(&self, frame: &str) {
        self.feed.send(Some(frame.to_string())).unwrap();
    }

    pub(crate) fn end_of_stream(&self) {
        self.feed.send(None).unwrap();
    }

    pub(crate) fn sent(&self) -> Vec<String> {
        self.sent.lock().clone()
    }

    pub(crate) fn count_sent(&self, frame: &str) -> usize {
        self.sent.lock().iter().filter(|f| *f == frame).count()
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

pub(crate) fn pair() -> (MemoryTransport, Remote) {
    let (feed, incoming) = crossbeam_channel::unbounded();
    let remote = Remote {
        feed,
        sent: Arc::new(Mutex::new(Vec::new())),
        closed: Arc::new(AtomicBool::new(false)),
        fail_sends: Arc::new(AtomicBool::new(false)),
    };

    (
        MemoryTransport {
            incoming,
            remote: remote.clone(),
        },
        remote,
    )
}

impl Transport for MemoryTransport {
    fn send_raw(&self, frame: &str) -> Result<(), TransportError> {
        if self.remote.fail_sends.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "send failed").into());
        }
        if self.remote.is_closed() {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "transport closed").into());
        }

        self.remote.sent.lock().push(frame.to_string());
        Ok(())
    }

    fn receive_raw(&self) -> Result<Option<String>, TransportError> {
        loop {
            if self.remote.is_closed() {
                return Ok(None);
            }

            match self.incoming.recv_timeout(TICK) {
                Ok(frame) => return Ok(frame),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return Ok(None),
            }
        }
    }

    fn close_raw(&self) -> Result<(), TransportError> {
        self.remote.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
