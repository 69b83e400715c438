use std::fmt;

use serde_json::Value;

use crate::message::Message;

/// Текущие цены рынка. Значения хранятся в том виде, в каком их прислал
/// сервер: форматирование чисел не наша забота.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticker {
    /// цена продажи, валюта за единицу товара
    pub sell: String,
    /// цена покупки
    pub buy: String,
}

impl Ticker {
    /// Достаёт тикер из JSON-сообщения канала:
    /// `{"op":"private","private":"ticker","ticker":{"sell":{"value":..},"buy":{"value":..}}}`
    pub fn from_message(message: &Message) -> Option<Self> {
        if message.get("private")?.as_str()? != "ticker" {
            return None;
        }

        let ticker = message.get("ticker")?;
        Some(Self {
            sell: price_value(ticker.get("sell")?)?,
            buy: price_value(ticker.get("buy")?)?,
        })
    }
}

fn price_value(price: &Value) -> Option<String> {
    match price.get("value")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sell: {} Buy: {}", self.sell, self.buy)
    }
}
