use anyhow::{Context, Result, bail};
use ticker_core::subscriptions::{parse_channels_csv, read_subscriptions_from_path};
use ticker_core::{Message, Subscription};

use crate::cli::Args;

/// Подписки из источника, выбранного в CLI. Без источника список пуст:
/// клиент просто слушает поток.
pub(crate) fn load_subscriptions(args: &Args) -> Result<Vec<Subscription>> {
    let subs = if let Some(path) = &args.channels_file {
        read_subscriptions_from_path(path)
            .with_context(|| format!("failed to load subscriptions from {path:?}"))?
    } else if let Some(raw) = &args.channels {
        parse_channels_csv(raw)
    } else {
        return Ok(Vec::new());
    };

    if subs.is_empty() {
        bail!("subscription list is empty");
    }

    Ok(subs)
}

/// Фреймы, которые уходят сразу после открытия сессии.
///
/// Сначала по одному `connect` на каждый endpoint (в порядке первого
/// упоминания, `default_endpoint` первым), потом подписки. На пустой
/// endpoint connect не нужен: сокет уже подключён.
pub(crate) fn opening_messages(subs: &[Subscription], default_endpoint: &str) -> Vec<Message> {
    let mut endpoints: Vec<&str> = Vec::new();
    let mentioned = std::iter::once(default_endpoint)
        .chain(subs.iter().map(|s| s.endpoint_or(default_endpoint)));
    for endpoint in mentioned {
        if !endpoint.is_empty() && !endpoints.contains(&endpoint) {
            endpoints.push(endpoint);
        }
    }

    let connects = endpoints
        .into_iter()
        .map(|e| Message::connect().with_endpoint(e));
    let subscribes = subs
        .iter()
        .map(|s| {
            Message::subscribe(&s.channel).with_endpoint(s.endpoint_or(default_endpoint))
        });

    connects.chain(subscribes).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;
    use std::io::Write;
    use ticker_core::MessageKind;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["ticker-client", "--uri", "http://x.test/socket.io"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    fn frames(msgs: &[Message]) -> Vec<(MessageKind, String, Option<String>)> {
        msgs.iter()
            .map(|m| {
                let channel = m
                    .get("channel")
                    .and_then(|c| c.as_str())
                    .map(str::to_string);
                (m.kind(), m.endpoint().to_string(), channel)
            })
            .collect()
    }

    #[test]
    fn no_source_means_no_subscriptions() {
        assert!(load_subscriptions(&args(&[])).unwrap().is_empty());
    }

    #[test]
    fn empty_channels_arg_is_an_error() {
        let err = load_subscriptions(&args(&["--channels", " , "])).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn file_lines_carry_endpoints() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# ticker\nd5f06780 /mtgox\n24e67e0d").unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let got = load_subscriptions(&args(&["--channels-file", &path])).unwrap();
        assert_eq!(got[0].endpoint.as_deref(), Some("/mtgox"));
        assert_eq!(got[1], Subscription::channel("24e67e0d"));
    }

    #[test]
    fn bad_file_line_reports_line_number() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "a\nb mtgox").unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let err = load_subscriptions(&args(&["--channels-file", &path])).unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn connects_once_per_endpoint_before_subscribing() {
        let subs = vec![
            Subscription {
                channel: "a".into(),
                endpoint: Some("/depth".into()),
            },
            Subscription::channel("b"),
            Subscription {
                channel: "c".into(),
                endpoint: Some("/depth".into()),
            },
        ];

        let got = frames(&opening_messages(&subs, "/mtgox"));
        assert_eq!(
            got,
            vec![
                (MessageKind::Connect, "/mtgox".into(), None),
                (MessageKind::Connect, "/depth".into(), None),
                (MessageKind::Json, "/depth".into(), Some("a".into())),
                (MessageKind::Json, "/mtgox".into(), Some("b".into())),
                (MessageKind::Json, "/depth".into(), Some("c".into())),
            ]
        );
    }

    #[test]
    fn socket_level_subscriptions_need_no_connect() {
        let msgs = opening_messages(&[Subscription::channel("a")], "");
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].endpoint(), "");
        assert_eq!(msgs[0].get("op"), Some(&json!("subscribe")));
    }

    #[test]
    fn default_endpoint_is_connected_even_without_subscriptions() {
        let got = frames(&opening_messages(&[], "/mtgox"));
        assert_eq!(got, vec![(MessageKind::Connect, "/mtgox".into(), None)]);
    }
}
