use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::SubscriptionError;

/// Подписка на канал. `endpoint == None` значит "endpoint по умолчанию",
/// который выбирает вызывающий код.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    /// id канала, регистр важен
    pub channel: String,
    /// endpoint (namespace), на котором отправляется подписка
    pub endpoint: Option<String>,
}

impl Subscription {
    /// Подписка без явного endpoint
    pub fn channel(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            endpoint: None,
        }
    }

    /// Endpoint подписки или `default`, если он не задан
    pub fn endpoint_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.endpoint.as_deref().unwrap_or(default)
    }
}

/// Читает подписки, по одной на строку: `<channel> [<endpoint>]`.
///
/// `#` начинает комментарий, пустые строки пропускаются. Повторы
/// (тот же канал на том же endpoint) выкидываются, порядок сохраняется:
/// в нём же уйдут подписки.
pub fn read_subscriptions<R: io::Read>(reader: R) -> Result<Vec<Subscription>, SubscriptionError> {
    let mut out: Vec<Subscription> = Vec::new();

    for (idx, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        if let Some(sub) = parse_line(&line, idx + 1)? {
            if !out.contains(&sub) {
                out.push(sub);
            }
        }
    }

    Ok(out)
}

/// То же, что [`read_subscriptions`], из файла
pub fn read_subscriptions_from_path(
    path: impl AsRef<Path>,
) -> Result<Vec<Subscription>, SubscriptionError> {
    read_subscriptions(File::open(path)?)
}

/// Каналы из строки вида `"a, b, ,c"`: без endpoint, порядок сохраняется
pub fn parse_channels_csv(raw: &str) -> Vec<Subscription> {
    let mut out: Vec<Subscription> = Vec::new();
    for channel in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let sub = Subscription::channel(channel);
        if !out.contains(&sub) {
            out.push(sub);
        }
    }
    out
}

fn parse_line(line: &str, line_no: usize) -> Result<Option<Subscription>, SubscriptionError> {
    let content = line.split('#').next().unwrap_or("");
    let mut fields = content.split_whitespace();

    let Some(channel) = fields.next() else {
        return Ok(None);
    };
    let endpoint = fields.next();

    if fields.next().is_some() {
        return Err(SubscriptionError::TooManyFields {
            line: line_no,
            text: content.trim().to_string(),
        });
    }

    if let Some(endpoint) = endpoint {
        if !endpoint.starts_with('/') {
            return Err(SubscriptionError::BadEndpoint {
                line: line_no,
                endpoint: endpoint.to_string(),
            });
        }
    }

    Ok(Some(Subscription {
        channel: channel.to_string(),
        endpoint: endpoint.map(str::to_string),
    }))
}
