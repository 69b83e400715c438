use std::time::Duration;

use log::{debug, info};
use ticker_core::Handshake;
use ticker_core::handshake::handshake_url;
use url::Url;

use crate::error::{SessionError, TransportError};

/// Ответ на POST handshake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

/// HTTP POST, которым делается handshake
pub trait HttpPost {
    fn post(&self, url: &str) -> Result<HttpReply, TransportError>;
}

/// Блокирующий reqwest-клиент
pub struct ReqwestHttp {
    client: reqwest::blocking::Client,
}

impl ReqwestHttp {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl HttpPost for ReqwestHttp {
    fn post(&self, url: &str) -> Result<HttpReply, TransportError> {
        let resp = self.client.post(url).send()?;
        let status = resp.status().as_u16();
        let body = resp.text()?;
        Ok(HttpReply { status, body })
    }
}

/// POST `<base>/1/` и разбор ответа `sid:heartbeat:timeout:transports`
pub fn negotiate<H: HttpPost + ?Sized>(http: &H, base: &Url) -> Result<Handshake, SessionError> {
    let url = handshake_url(base);
    debug!("handshake: POST {url}");

    let reply = http
        .post(&url)
        .map_err(|source| SessionError::connection(url.as_str(), source))?;

    if !(200..300).contains(&reply.status) {
        return Err(SessionError::connection(
            url,
            TransportError::Status(reply.status),
        ));
    }

    let handshake = Handshake::parse(&reply.body)?;
    info!(
        "handshake ok: session={}, heartbeat={:?}, transports={}",
        handshake.session_id,
        handshake.heartbeat_timeout,
        handshake.transports_list()
    );

    Ok(handshake)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use ticker_core::ProtocolError;
    use ticker_core::handshake::parse_base_uri;

    struct StaticHttp(Result<HttpReply, io::ErrorKind>);

    impl HttpPost for StaticHttp {
        fn post(&self, _url: &str) -> Result<HttpReply, TransportError> {
            self.0
                .clone()
                .map_err(|kind| io::Error::new(kind, "refused").into())
        }
    }

    fn reply(status: u16, body: &str) -> StaticHttp {
        StaticHttp(Ok(HttpReply {
            status,
            body: body.to_string(),
        }))
    }

    fn base() -> Url {
        parse_base_uri("http://x.test/socket.io").unwrap()
    }

    #[test]
    fn negotiate_parses_successful_reply() {
        let hs = negotiate(&reply(200, "sid:20:25:websocket,flashsocket"), &base()).unwrap();
        assert_eq!(hs.session_id, "sid");
        assert_eq!(hs.heartbeat_timeout, Some(Duration::from_secs(20)));
        assert!(hs.supports_websocket());
    }

    #[test]
    fn negotiate_fails_on_bad_status() {
        let err = negotiate(&reply(503, "busy"), &base()).unwrap_err();
        match err {
            SessionError::Connection {
                uri,
                source: TransportError::Status(status),
            } => {
                assert_eq!(uri, "http://x.test/socket.io/1/");
                assert_eq!(status, 503);
            }
            other => panic!("expected Connection with status, got {other:?}"),
        }
    }

    #[test]
    fn negotiate_fails_when_post_fails() {
        let err = negotiate(
            &StaticHttp(Err(io::ErrorKind::ConnectionRefused)),
            &base(),
        )
        .unwrap_err();
        assert!(matches!(err, SessionError::Connection { .. }));
    }

    #[test]
    fn negotiate_fails_on_malformed_body() {
        let err = negotiate(&reply(200, "garbage"), &base()).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Protocol(ProtocolError::MalformedHandshake(_))
        ));
    }
}
