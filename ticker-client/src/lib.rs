//! # ticker-client
//!
//! Клиент realtime-протокола поверх websocket: handshake по HTTP, затем
//! долгоживущий транспорт, по которому идут фреймы `type:id:endpoint:data`.
//!
//! - [`session`] — фасад `open` / `send` / `receive` / `close`
//! - [`transport`] — сырой транспорт и websocket-реализация
//! - [`handshake`] — HTTP-часть handshake
//! - [`config`] — константы клиента
//! - [`error`] — ошибки клиента
//!
//! ```rust,no_run
//! use ticker_client::Session;
//! use ticker_core::{Message, Ticker};
//!
//! let session = Session::open("https://socketio.mtgox.com/socket.io")?;
//! session.send(&Message::subscribe("d5f06780-30a8-4a48-a2f8-7ed181b4a13f"))?;
//!
//! loop {
//!     let msg = session.receive()?;
//!     if let Some(ticker) = Ticker::from_message(&msg) {
//!         println!("{ticker}");
//!     }
//! }
//! # Ok::<(), ticker_client::SessionError>(())
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod handshake;
mod heartbeat;
pub mod session;
pub mod transport;

pub use crate::error::{SessionError, TransportError};
pub use crate::session::{Session, SessionState};
