//! Сессия: handshake + транспорт + heartbeat за фасадом `send`/`receive`/`close`.
//!
//! Входящее и исходящее направления защищены независимыми reentrant-мьютексами:
//! `receive`, висящий на чтении, не мешает `send` и heartbeat. Если нужны оба,
//! порядок всегда inbound -> outbound.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use parking_lot::{Mutex, ReentrantMutex};
use ticker_core::handshake::parse_base_uri;
use ticker_core::{ConfigError, Message, Payload};

use crate::config::HANDSHAKE_TIMEOUT;
use crate::error::{SessionError, TransportError};
use crate::handshake::{HttpPost, ReqwestHttp, negotiate};
use crate::heartbeat::Heartbeat;
use crate::transport::{self, Connector, Transport, WebSocketConnector};

/// Жизненный цикл сессии, только вперёд: Open -> Closing -> Closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Closing,
    Closed,
}

/// То, что делим с потоком heartbeat
struct Shared {
    transport: Box<dyn Transport>,
    state: Mutex<SessionState>,
    inbound: ReentrantMutex<()>,
    outbound: ReentrantMutex<()>,
    /// ошибка heartbeat, которую отдадим следующему send/receive
    heartbeat_failure: Mutex<Option<TransportError>>,
}

impl Shared {
    fn state(&self) -> SessionState {
        *self.state.lock()
    }

    fn is_open(&self) -> bool {
        self.state() == SessionState::Open
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if !self.is_open() {
            return Err(SessionError::ClosedStream);
        }
        match self.heartbeat_failure.lock().take() {
            Some(e) => Err(SessionError::Transport(e)),
            None => Ok(()),
        }
    }

    /// Единственная точка записи в транспорт
    fn write_frame(&self, frame: &str) -> Result<(), TransportError> {
        let _out = self.outbound.lock();
        self.transport.send_raw(frame)
    }

    fn emit_heartbeat(&self) -> Result<(), String> {
        let _out = self.outbound.lock();
        if !self.is_open() {
            return Ok(());
        }

        self.write_frame(&Message::heartbeat().encode())
            .map_err(|e| {
                let msg = e.to_string();
                *self.heartbeat_failure.lock() = Some(e);
                msg
            })
    }
}

/// Клиентская сессия.
///
/// Потокобезопасна: `send` и `receive` можно звать из разных потоков
/// (например, через `Arc<Session>`). Heartbeat отправляется автоматически.
pub struct Session {
    shared: Arc<Shared>,
    heartbeat: Mutex<Option<Heartbeat>>,
    heartbeat_period: Option<Duration>,
}

impl Session {
    /// Handshake по HTTP + websocket.
    ///
    /// `uri`: базовый адрес вида `https://host/socket.io`.
    pub fn open(uri: &str) -> Result<Self, SessionError> {
        let http = ReqwestHttp::new(HANDSHAKE_TIMEOUT)?;
        Self::open_with(uri, &http, &WebSocketConnector::default())
    }

    /// То же, что [`Session::open`], но с явными HTTP и транспортом
    pub fn open_with<H, C>(uri: &str, http: &H, connector: &C) -> Result<Self, SessionError>
    where
        H: HttpPost + ?Sized,
        C: Connector + ?Sized,
    {
        let base = parse_base_uri(uri).map_err(|e| SessionError::connection(uri, e))?;
        let handshake = negotiate(http, &base)?;
        // период проверяем до того, как открыть транспорт
        let period = handshake.heartbeat_period()?;
        let transport = transport::select(&handshake, &base, connector)?;

        Self::from_transport(transport, period)
    }

    /// Сессия поверх уже открытого транспорта. Нулевой период heartbeat
    /// отклоняется, транспорт при этом закрывается.
    pub fn from_transport(
        transport: Box<dyn Transport>,
        heartbeat_period: Option<Duration>,
    ) -> Result<Self, SessionError> {
        if heartbeat_period.is_some_and(|p| p.is_zero()) {
            let _ = transport.close_raw();
            return Err(ConfigError::ZeroHeartbeatPeriod.into());
        }

        let shared = Arc::new(Shared {
            transport,
            state: Mutex::new(SessionState::Open),
            inbound: ReentrantMutex::new(()),
            outbound: ReentrantMutex::new(()),
            heartbeat_failure: Mutex::new(None),
        });

        let heartbeat = match heartbeat_period {
            Some(period) => {
                let emitter = shared.clone();
                match Heartbeat::spawn(period, move || emitter.emit_heartbeat()) {
                    Ok(hb) => Some(hb),
                    Err(e) => {
                        let _ = shared.transport.close_raw();
                        return Err(SessionError::HeartbeatSpawn(e));
                    }
                }
            }
            None => None,
        };

        info!("session open, heartbeat period {heartbeat_period:?}");

        Ok(Self {
            shared,
            heartbeat: Mutex::new(heartbeat),
            heartbeat_period,
        })
    }

    pub fn state(&self) -> SessionState {
        self.shared.state()
    }

    pub fn is_closed(&self) -> bool {
        !self.shared.is_open()
    }

    /// Период heartbeat, согласованный при handshake
    pub fn heartbeat_period(&self) -> Option<Duration> {
        self.heartbeat_period
    }

    /// Кодирует и отправляет сообщение. Ошибка записи не закрывает сессию.
    pub fn send(&self, message: &Message) -> Result<(), SessionError> {
        let _out = self.shared.outbound.lock();
        self.shared.ensure_open()?;
        self.shared.write_frame(&message.encode())?;
        Ok(())
    }

    /// Следующее сообщение для приложения.
    ///
    /// Heartbeat проглатывается. Конец потока и disconnect без endpoint
    /// закрывают сессию, после чего вызов возвращает [`SessionError::ClosedStream`].
    pub fn receive(&self) -> Result<Message, SessionError> {
        let _in = self.shared.inbound.lock();

        loop {
            self.shared.ensure_open()?;

            let Some(frame) = self.shared.transport.receive_raw()? else {
                debug!("transport reached end of stream");
                self.close();
                continue;
            };

            let message = Message::decode(&frame)?;
            match message.payload() {
                Payload::Heartbeat(_) => {
                    debug!("heartbeat from server");
                    continue;
                }
                Payload::Disconnect(_) if message.endpoint().is_empty() => {
                    info!("server disconnected the socket");
                    self.close();
                    continue;
                }
                _ => return Ok(message),
            }
        }
    }

    /// Закрывает сессию. Повторный вызов ничего не делает.
    pub fn close(&self) {
        {
            let mut state = self.shared.state.lock();
            if *state != SessionState::Open {
                return;
            }
            *state = SessionState::Closing;
        }

        // heartbeat берёт только outbound, так что останавливаем его без блокировок
        let heartbeat = self.heartbeat.lock().take();
        if let Some(hb) = heartbeat {
            hb.stop();
        }

        {
            let _out = self.shared.outbound.lock();
            // сокета может уже не быть
            if let Err(e) = self.shared.write_frame(&Message::disconnect().encode()) {
                debug!("disconnect frame not sent: {e}");
            }
            // закрытие транспорта будит receive, ждущий на чтении
            if let Err(e) = self.shared.transport.close_raw() {
                warn!("transport close failed: {e}");
            }
        }

        let _in = self.shared.inbound.lock();
        let _out = self.shared.outbound.lock();
        *self.shared.state.lock() = SessionState::Closed;
        info!("session closed");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}
