use std::time::Duration;

/// Версия протокола, участвует в путях handshake и транспорта
pub const PROTOCOL_VERSION: &str = "1";

/// Heartbeat шлём на столько раньше таймаута, объявленного сервером
pub const HEARTBEAT_MARGIN: Duration = Duration::from_secs(2);

/// Имя websocket-транспорта в списке из handshake
pub const WEBSOCKET_TRANSPORT: &str = "websocket";
