use std::time::Duration;

use thiserror::Error;

/// Ошибки протокола
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Пустой фрейм
    #[error("empty frame")]
    EmptyFrame,

    /// Фрейм не делится на type:id:endpoint[:data]
    #[error("malformed frame: {0:?}")]
    MalformedFrame(String),

    /// Тело handshake не делится ровно на 4 поля
    #[error("malformed handshake response: {0:?}")]
    MalformedHandshake(String),

    /// Пустой session id в handshake
    #[error("handshake response has empty session id")]
    MissingSessionId,

    /// Таймаут в handshake не является целым числом секунд
    #[error("invalid {field} in handshake response: {value:?}")]
    InvalidTimeout {
        /// Какое поле
        field: &'static str,
        /// Что пришло
        value: String,
    },
}

/// Ошибки конфигурации
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Сервер просит слишком частый heartbeat
    #[error("server requests too frequent heartbeat: {}s", .timeout.as_secs())]
    HeartbeatTooFrequent {
        /// Таймаут сервера
        timeout: Duration,
    },

    /// Нулевой период heartbeat
    #[error("heartbeat period must be positive")]
    ZeroHeartbeatPeriod,
}

/// Ошибки списка подписок
#[derive(Debug, Error)]
pub enum SubscriptionError {
    /// Не удалось прочитать источник
    #[error("failed to read subscriptions: {0}")]
    Io(#[from] std::io::Error),

    /// Endpoint не начинается с `/`
    #[error("line {line}: endpoint must start with '/' (got: {endpoint:?})")]
    BadEndpoint {
        /// Номер строки, с 1
        line: usize,
        /// Что было написано
        endpoint: String,
    },

    /// Больше двух полей в строке
    #[error("line {line}: expected `<channel> [<endpoint>]`, got {text:?}")]
    TooManyFields {
        /// Номер строки, с 1
        line: usize,
        /// Строка без комментария
        text: String,
    },
}

/// Ошибки адреса сервера
#[derive(Debug, Error)]
pub enum UriError {
    /// Адрес не парсится
    #[error("invalid uri {uri:?}: {source}")]
    Invalid {
        /// Исходная строка
        uri: String,
        /// Причина
        #[source]
        source: url::ParseError,
    },

    /// Схема, для которой нет websocket-аналога
    #[error("{0:?} scheme is not supported")]
    UnsupportedScheme(String),
}
