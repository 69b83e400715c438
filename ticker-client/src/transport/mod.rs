//! Сырой двунаправленный канал для фреймов.
//!
//! Всё, что знает транспорт: отправить строку, принять строку, закрыться.
//! Кодек и фильтрация служебных фреймов живут выше, в [`crate::session`].

use log::info;
use ticker_core::Handshake;
use ticker_core::handshake::websocket_url;
use url::Url;

use crate::error::{SessionError, TransportError};

mod websocket;
pub use websocket::{WebSocketConnector, WebSocketTransport};

#[cfg(test)]
pub(crate) mod memory;

/// Транспорт принадлежит ровно одной сессии. Методы берут `&self`:
/// сессия сама разводит входящее и исходящее направления по разным
/// блокировкам, так что чтение и запись могут идти одновременно.
pub trait Transport: Send + Sync {
    /// Отправить один фрейм
    fn send_raw(&self, frame: &str) -> Result<(), TransportError>;

    /// Принять один фрейм; `None` означает конец потока
    fn receive_raw(&self) -> Result<Option<String>, TransportError>;

    /// Закрыть соединение. Ждущий `receive_raw` должен вернуть `None`.
    fn close_raw(&self) -> Result<(), TransportError>;
}

/// Фабрика транспорта по готовому адресу
pub trait Connector {
    fn connect(&self, url: &str) -> Result<Box<dyn Transport>, TransportError>;
}

/// Выбирает транспорт из поддерживаемых сервером. Пока реализован только websocket.
pub fn select<C: Connector + ?Sized>(
    handshake: &Handshake,
    base: &Url,
    connector: &C,
) -> Result<Box<dyn Transport>, SessionError> {
    if !handshake.supports_websocket() {
        return Err(SessionError::UnsupportedTransport(
            handshake.transports_list(),
        ));
    }

    let url = websocket_url(base, &handshake.session_id)
        .map_err(|e| SessionError::connection(base.as_str(), e))?;
    info!("opening websocket transport {url}");

    connector
        .connect(&url)
        .map_err(|source| SessionError::connection(url.as_str(), source))
}
