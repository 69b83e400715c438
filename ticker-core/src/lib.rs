//! # ticker-core
//!
//! Протокол и базовые типы для клиента потока тикеров.
//!
//! Этот крейт содержит:
//!
//! - [`message`] — типизированные сообщения и их кодек
//! - [`frame`] — разбиение фрейма `type:id:endpoint:data` на поля
//! - [`handshake`] — разбор ответа handshake, период heartbeat, адреса транспорта
//! - [`subscriptions`] — подписки `<channel> [<endpoint>]` из файла или строки
//! - [`ticker`] — извлечение тикера из сообщений канала
//! - [`error`] — типы ошибок `ticker-core`
//!
//! ## Быстрый пример: декодирование фрейма
//!
//! ```rust
//! use ticker_core::{Message, MessageKind, Payload};
//!
//! let msg = Message::decode("3:1:/feed:hello: world").unwrap();
//! assert_eq!(msg.kind(), MessageKind::Text);
//! assert_eq!(msg.endpoint(), "/feed");
//! assert_eq!(msg.payload(), &Payload::Text("hello: world".to_string()));
//! assert_eq!(msg.encode(), "3:1:/feed:hello: world");
//! ```
//!
//! ## Пример: handshake
//!
//! ```rust
//! use std::time::Duration;
//! use ticker_core::handshake::{parse_base_uri, websocket_url, Handshake};
//!
//! let hs = Handshake::parse("abc123:15:30:websocket").unwrap();
//! assert_eq!(hs.heartbeat_period().unwrap(), Some(Duration::from_secs(13)));
//!
//! let base = parse_base_uri("https://x.test/socket.io").unwrap();
//! assert_eq!(
//!     websocket_url(&base, &hs.session_id).unwrap(),
//!     "wss://x.test/socket.io/1/websocket/abc123"
//! );
//! ```
//!
//! ## Пример: подписка на канал
//!
//! ```rust
//! use ticker_core::Message;
//!
//! let msg = Message::subscribe("d5f06780-30a8-4a48-a2f8-7ed181b4a13f");
//! let frame = msg.encode();
//! assert!(frame.starts_with("4:::{"));
//!
//! let back = Message::decode(&frame).unwrap();
//! assert_eq!(back.get("op").and_then(|v| v.as_str()), Some("subscribe"));
//! ```
//!
//! ## Дизайн
//!
//! Как и раньше, core без runtime и без I/O (кроме чтения файла подписок):
//! сеть, потоки и блокировки живут в `ticker-client`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Сообщения протокола и их кодек.
pub mod message;

/// Разбиение фрейма на поля.
pub mod frame;

/// Handshake: разбор ответа, heartbeat, адреса.
pub mod handshake;

/// Подписки на каналы.
pub mod subscriptions;

/// Тикер рынка.
pub mod ticker;

/// Ошибки `ticker-core`.
pub mod error;

/// Общие константы
mod constants;
pub use constants::{HEARTBEAT_MARGIN, PROTOCOL_VERSION, WEBSOCKET_TRANSPORT};

// --- Re-exports (публичный фасад API) ---

pub use crate::error::{ConfigError, ProtocolError, SubscriptionError, UriError};
pub use crate::handshake::Handshake;
pub use crate::message::{Ack, Event, Message, MessageKind, Payload};
pub use crate::subscriptions::Subscription;
pub use crate::ticker::Ticker;
