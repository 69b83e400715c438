use std::collections::BTreeSet;
use std::time::Duration;

use url::Url;

use crate::constants::{HEARTBEAT_MARGIN, PROTOCOL_VERSION, WEBSOCKET_TRANSPORT};
use crate::error::{ConfigError, ProtocolError, UriError};

/// Результат handshake. Живёт недолго: сразу расходуется на выбор транспорта.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handshake {
    /// id сессии, идёт в адрес транспорта
    pub session_id: String,
    /// `None`, если сервер не требует heartbeat
    pub heartbeat_timeout: Option<Duration>,
    /// Таймаут соединения (только для информации)
    pub connection_timeout: Option<Duration>,
    /// Транспорты, которые предлагает сервер
    pub supported_transports: BTreeSet<String>,
}

impl Handshake {
    /// Парсит тело ответа вида:
    /// "session_id:heartbeat_timeout:connection_timeout:websocket,xhr-polling"
    pub fn parse(body: &str) -> Result<Self, ProtocolError> {
        let body = body.trim_end();
        let fields: Vec<&str> = body.split(':').collect();

        let [session_id, heartbeat, connection, transports] = fields.as_slice() else {
            return Err(ProtocolError::MalformedHandshake(body.to_string()));
        };

        if session_id.is_empty() {
            return Err(ProtocolError::MissingSessionId);
        }

        Ok(Self {
            session_id: (*session_id).to_string(),
            heartbeat_timeout: parse_timeout("heartbeat timeout", heartbeat)?,
            connection_timeout: parse_timeout("connection timeout", connection)?,
            supported_transports: transports
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        })
    }

    /// Период heartbeat, если сервер его требует
    pub fn heartbeat_period(&self) -> Result<Option<Duration>, ConfigError> {
        self.heartbeat_timeout.map(heartbeat_period).transpose()
    }

    /// Есть ли websocket среди транспортов сервера
    pub fn supports_websocket(&self) -> bool {
        self.supported_transports.contains(WEBSOCKET_TRANSPORT)
    }

    /// Список транспортов через запятую (для сообщений об ошибках)
    pub fn transports_list(&self) -> String {
        self.supported_transports
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn parse_timeout(field: &'static str, raw: &str) -> Result<Option<Duration>, ProtocolError> {
    if raw.is_empty() {
        return Ok(None);
    }

    raw.parse::<u64>()
        .map(|secs| Some(Duration::from_secs(secs)))
        .map_err(|_| ProtocolError::InvalidTimeout {
            field,
            value: raw.to_string(),
        })
}

/// heartbeat шлём за [`HEARTBEAT_MARGIN`] до таймаута сервера
pub fn heartbeat_period(server_timeout: Duration) -> Result<Duration, ConfigError> {
    match server_timeout.checked_sub(HEARTBEAT_MARGIN) {
        Some(period) if !period.is_zero() => Ok(period),
        _ => Err(ConfigError::HeartbeatTooFrequent {
            timeout: server_timeout,
        }),
    }
}

/// Базовый адрес сервера без завершающего `/`
pub fn parse_base_uri(uri: &str) -> Result<Url, UriError> {
    let trimmed = uri.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|source| UriError::Invalid {
        uri: uri.to_string(),
        source,
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(UriError::UnsupportedScheme(other.to_string())),
    }
}

/// `<base>/1/`: сюда отправляется POST handshake
pub fn handshake_url(base: &Url) -> String {
    format!("{}/{PROTOCOL_VERSION}/", base_without_query(base))
}

/// `http -> ws`, `https -> wss`, к пути добавляется `/1/websocket/<session_id>`
pub fn websocket_url(base: &Url, session_id: &str) -> Result<String, UriError> {
    let scheme = match base.scheme() {
        "http" => "ws",
        "https" => "wss",
        other => return Err(UriError::UnsupportedScheme(other.to_string())),
    };

    let rest = base_without_query(base);
    let rest = rest
        .strip_prefix(base.scheme())
        .unwrap_or(rest.as_str());

    Ok(format!(
        "{scheme}{rest}/{PROTOCOL_VERSION}/{WEBSOCKET_TRANSPORT}/{session_id}"
    ))
}

fn base_without_query(base: &Url) -> String {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.as_str().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_handshake() {
        let hs = Handshake::parse("abc123:15:30:websocket,xhr-polling\n").unwrap();
        assert_eq!(hs.session_id, "abc123");
        assert_eq!(hs.heartbeat_timeout, Some(Duration::from_secs(15)));
        assert_eq!(hs.connection_timeout, Some(Duration::from_secs(30)));
        assert!(hs.supports_websocket());
        assert_eq!(hs.transports_list(), "websocket,xhr-polling");
        assert_eq!(hs.heartbeat_period().unwrap(), Some(Duration::from_secs(13)));
    }

    #[test]
    fn empty_heartbeat_means_no_heartbeat() {
        let hs = Handshake::parse("sid::60:websocket").unwrap();
        assert_eq!(hs.heartbeat_timeout, None);
        assert_eq!(hs.heartbeat_period().unwrap(), None);
    }

    #[test]
    fn wrong_field_count_is_rejected() {
        for body in ["", "sid:15:30", "sid:15:30:websocket:extra"] {
            assert!(
                matches!(
                    Handshake::parse(body),
                    Err(ProtocolError::MalformedHandshake(_))
                ),
                "body {body:?} must be rejected"
            );
        }
    }

    #[test]
    fn bad_timeouts_are_rejected() {
        assert!(matches!(
            Handshake::parse("sid:-1:30:websocket"),
            Err(ProtocolError::InvalidTimeout { field: "heartbeat timeout", .. })
        ));
        assert!(matches!(
            Handshake::parse("sid:15:soon:websocket"),
            Err(ProtocolError::InvalidTimeout { field: "connection timeout", .. })
        ));
        assert!(matches!(
            Handshake::parse(":15:30:websocket"),
            Err(ProtocolError::MissingSessionId)
        ));
    }

    #[test]
    fn heartbeat_period_subtracts_margin() {
        assert_eq!(
            heartbeat_period(Duration::from_secs(10)).unwrap(),
            Duration::from_secs(8)
        );
        assert_eq!(
            heartbeat_period(Duration::from_secs(3)).unwrap(),
            Duration::from_secs(1)
        );
    }

    #[test]
    fn too_short_heartbeat_timeout_is_config_error() {
        for secs in [0, 1, 2] {
            assert!(matches!(
                heartbeat_period(Duration::from_secs(secs)),
                Err(ConfigError::HeartbeatTooFrequent { .. })
            ));
        }
    }

    #[test]
    fn urls_are_built_from_base() {
        let base = parse_base_uri("https://x.test/socket.io/").unwrap();
        assert_eq!(handshake_url(&base), "https://x.test/socket.io/1/");
        assert_eq!(
            websocket_url(&base, "abc123").unwrap(),
            "wss://x.test/socket.io/1/websocket/abc123"
        );

        let base = parse_base_uri("http://127.0.0.1:8080/socket.io?x=1").unwrap();
        assert_eq!(
            websocket_url(&base, "s").unwrap(),
            "ws://127.0.0.1:8080/socket.io/1/websocket/s"
        );
        assert_eq!(handshake_url(&base), "http://127.0.0.1:8080/socket.io/1/");
    }

    #[test]
    fn base_uri_must_be_http() {
        assert!(matches!(
            parse_base_uri("ftp://x.test/socket.io"),
            Err(UriError::UnsupportedScheme(s)) if s == "ftp"
        ));
        assert!(matches!(
            parse_base_uri("not a uri"),
            Err(UriError::Invalid { .. })
        ));
    }
}
