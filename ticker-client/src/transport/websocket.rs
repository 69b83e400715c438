use std::io;
use std::net::TcpStream;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use log::debug;
use parking_lot::{Mutex, MutexGuard};
use tungstenite::error::ProtocolError;
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket};

use super::{Connector, Transport};
use crate::config::READ_TICK;
use crate::error::TransportError;

type Socket = WebSocket<MaybeTlsStream<TcpStream>>;

/// Websocket поверх tungstenite.
///
/// У tungstenite один объект на оба направления, поэтому сокет лежит под
/// мьютексом, а чтение идёт тиками по [`READ_TICK`]: между тиками мьютекс
/// честно (`unlock_fair`) отдаётся ждущему отправителю.
pub struct WebSocketTransport {
    socket: Mutex<Socket>,
    closed: AtomicBool,
}

impl WebSocketTransport {
    pub fn connect(url: &str, read_tick: Duration) -> Result<Self, TransportError> {
        let (socket, response) = tungstenite::connect(url)?;
        debug!("websocket {url} connected, status {}", response.status());

        set_read_timeout(&socket, read_tick)?;

        Ok(Self {
            socket: Mutex::new(socket),
            closed: AtomicBool::new(false),
        })
    }
}

fn set_read_timeout(socket: &Socket, tick: Duration) -> io::Result<()> {
    match socket.get_ref() {
        MaybeTlsStream::Plain(s) => s.set_read_timeout(Some(tick)),
        MaybeTlsStream::Rustls(s) => s.get_ref().set_read_timeout(Some(tick)),
        _ => Ok(()),
    }
}

/// Соединение закончилось, пусть и без закрывающего handshake
fn is_end_of_stream(e: &tungstenite::Error) -> bool {
    matches!(
        e,
        tungstenite::Error::ConnectionClosed
            | tungstenite::Error::AlreadyClosed
            | tungstenite::Error::Protocol(ProtocolError::ResetWithoutClosingHandshake)
    )
}

fn is_tick(e: &tungstenite::Error) -> bool {
    matches!(
        e,
        tungstenite::Error::Io(err) if err.kind() == io::ErrorKind::WouldBlock
            || err.kind() == io::ErrorKind::TimedOut
    )
}

impl Transport for WebSocketTransport {
    fn send_raw(&self, frame: &str) -> Result<(), TransportError> {
        let mut socket = self.socket.lock();
        socket.send(Message::text(frame.to_owned()))?;
        Ok(())
    }

    fn receive_raw(&self) -> Result<Option<String>, TransportError> {
        loop {
            if self.closed.load(Ordering::Acquire) {
                return Ok(None);
            }

            let read = {
                let mut socket = self.socket.lock();
                // close_raw мог пройти, пока ждали мьютекс
                if self.closed.load(Ordering::Acquire) {
                    return Ok(None);
                }
                let read = socket.read();
                MutexGuard::unlock_fair(socket);
                read
            };

            match read {
                Ok(Message::Text(text)) => return Ok(Some(text.as_str().to_owned())),
                Ok(Message::Binary(bytes)) => {
                    return String::from_utf8(bytes.to_vec())
                        .map(Some)
                        .map_err(|_| TransportError::NonUtf8Frame);
                }
                Ok(Message::Close(frame)) => {
                    debug!("websocket closed by server: {frame:?}");
                    return Ok(None);
                }
                // ping/pong отвечает сам tungstenite
                Ok(_) => continue,
                Err(e) if is_tick(&e) => continue,
                // после close_raw любая ошибка чтения это просто конец потока
                Err(e) if is_end_of_stream(&e) || self.closed.load(Ordering::Acquire) => {
                    debug!("websocket read finished: {e}");
                    return Ok(None);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn close_raw(&self) -> Result<(), TransportError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        let mut socket = self.socket.lock();
        match socket.close(None) {
            Ok(()) => Ok(()),
            Err(e) if is_tick(&e) || is_end_of_stream(&e) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Подключение websocket-транспорта
#[derive(Debug, Clone)]
pub struct WebSocketConnector {
    pub read_tick: Duration,
}

impl Default for WebSocketConnector {
    fn default() -> Self {
        Self {
            read_tick: READ_TICK,
        }
    }
}

impl Connector for WebSocketConnector {
    fn connect(&self, url: &str) -> Result<Box<dyn Transport>, TransportError> {
        Ok(Box::new(WebSocketTransport::connect(url, self.read_tick)?))
    }
}
