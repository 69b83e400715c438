use thiserror::Error;
use ticker_core::{ConfigError, ProtocolError, UriError};

/// Ошибки сырого транспорта (HTTP handshake и websocket)
#[derive(Debug, Error)]
pub enum TransportError {
    /// Ошибка websocket
    #[error("websocket error: {0}")]
    WebSocket(Box<tungstenite::Error>),

    /// Ошибка HTTP-клиента
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Ошибка ввода-вывода
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Бинарный фрейм, который не является UTF-8 текстом
    #[error("received non-utf8 frame")]
    NonUtf8Frame,

    /// Handshake вернул неуспешный HTTP-статус
    #[error("response status: {0}")]
    Status(u16),

    /// Адрес, по которому нельзя подключиться
    #[error(transparent)]
    InvalidUri(#[from] UriError),
}

impl From<tungstenite::Error> for TransportError {
    fn from(e: tungstenite::Error) -> Self {
        TransportError::WebSocket(Box::new(e))
    }
}

/// Ошибки сессии
#[derive(Debug, Error)]
pub enum SessionError {
    /// Не удалось подключиться: неверный адрес, HTTP-ошибка или неуспешный
    /// статус handshake, отказ websocket
    #[error("can not connect to {uri}: {source}")]
    Connection {
        uri: String,
        #[source]
        source: TransportError,
    },

    /// Битый ответ handshake или фрейм
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Среди транспортов сервера нет реализованного
    #[error("server supports following transports: {0:?}; but none of them are implemented")]
    UnsupportedTransport(String),

    /// Сервер требует невыполнимый heartbeat
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    /// Операция над закрытой (или закрывающейся) сессией
    #[error("closed stream")]
    ClosedStream,

    /// Ошибка транспорта во время send/receive (в т.ч. упавший heartbeat)
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Не удалось запустить поток heartbeat
    #[error("failed to spawn heartbeat thread: {0}")]
    HeartbeatSpawn(#[source] std::io::Error),
}

impl SessionError {
    pub(crate) fn connection(uri: impl Into<String>, source: impl Into<TransportError>) -> Self {
        SessionError::Connection {
            uri: uri.into(),
            source: source.into(),
        }
    }
}
