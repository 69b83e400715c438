use std::time::Duration;

/// Таймаут HTTP-запроса handshake
pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Сколько websocket-чтение держит сокет, прежде чем отпустить его отправителю
pub const READ_TICK: Duration = Duration::from_millis(50);

/// Как часто главный поток CLI проверяет Ctrl+C
pub const SHUTDOWN_TICK: Duration = Duration::from_millis(200);

pub const DEFAULT_URI: &str = "https://socketio.mtgox.com/socket.io";

/// Переменная окружения с адресом сервера
pub const URI_ENV: &str = "TICKER_FEED_URI";
