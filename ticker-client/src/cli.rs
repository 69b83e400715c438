use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use ticker_client::config;
use ticker_core::handshake::parse_base_uri;

/// Ticker Client - поток тикеров по realtime-протоколу.
///
/// Handshake по HTTP, дальше websocket: подписываемся на каналы и пишем
/// тикеры в лог, пока не нажат Ctrl+C.
#[derive(Parser, Debug, Clone)]
#[command(name = "ticker-client", version, about)]
pub(crate) struct Args {
    /// Базовый адрес сервера, например https://socketio.mtgox.com/socket.io
    #[arg(long, env = config::URI_ENV, default_value = config::DEFAULT_URI)]
    pub(crate) uri: String,

    /// Endpoint (namespace) по умолчанию, например /mtgox.
    /// На него уходят подписки без своего endpoint
    #[arg(long)]
    pub(crate) endpoint: Option<String>,

    /// Файл подписок, строка `<channel> [<endpoint>]`. Нельзя вместе с --channels
    #[arg(long, conflicts_with = "channels")]
    pub(crate) channels_file: Option<PathBuf>,

    /// Список каналов строкой, например: "id1,id2"
    /// Нельзя вместе с --channels-file
    #[arg(long, conflicts_with = "channels_file")]
    pub(crate) channels: Option<String>,
}

impl Args {
    /// Валидация аргументов (схема адреса, файл каналов существует и т.д.)
    pub(crate) fn validate(&self) -> Result<()> {
        parse_base_uri(&self.uri).with_context(|| format!("--uri is invalid: {}", self.uri))?;

        if let Some(endpoint) = &self.endpoint {
            if !endpoint.starts_with('/') {
                bail!("--endpoint must start with '/' (got: {endpoint})");
            }
        }

        if let Some(path) = &self.channels_file {
            let md = std::fs::metadata(path)
                .with_context(|| format!("channels file not found: {:?}", path))?;
            if !md.is_file() {
                bail!("--channels-file must point to a file: {:?}", path);
            }
        }

        Ok(())
    }

    pub(crate) fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or("")
    }
}
