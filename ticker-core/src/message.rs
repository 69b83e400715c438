use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::ProtocolError;
use crate::frame::{encode_frame, split_frame};

/// Вид сообщения. Набор закрыт: всё, что не входит в таблицу кодов 0..=8,
/// декодируется в [`MessageKind::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// `0`: отключение сокета или endpoint
    Disconnect,
    /// `1`: подключение к endpoint
    Connect,
    /// `2`: keep-alive
    Heartbeat,
    /// `3`: текст
    Text,
    /// `4`: JSON
    Json,
    /// `5`: событие `{name, args}`
    Event,
    /// `6`: подтверждение
    Ack,
    /// `7`: ошибка
    Error,
    /// `8`: пустая операция
    Noop,
    /// Тег вне таблицы
    Unknown,
}

impl MessageKind {
    /// Числовой код вида на проводе (`None` для `Unknown`)
    pub fn code(self) -> Option<u8> {
        let code = match self {
            MessageKind::Disconnect => 0,
            MessageKind::Connect => 1,
            MessageKind::Heartbeat => 2,
            MessageKind::Text => 3,
            MessageKind::Json => 4,
            MessageKind::Event => 5,
            MessageKind::Ack => 6,
            MessageKind::Error => 7,
            MessageKind::Noop => 8,
            MessageKind::Unknown => return None,
        };
        Some(code)
    }

    /// Вид по тегу из фрейма. Тег сравнивается буквально: `"03"` это не `3`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let kind = match tag {
            "0" => MessageKind::Disconnect,
            "1" => MessageKind::Connect,
            "2" => MessageKind::Heartbeat,
            "3" => MessageKind::Text,
            "4" => MessageKind::Json,
            "5" => MessageKind::Event,
            "6" => MessageKind::Ack,
            "7" => MessageKind::Error,
            "8" => MessageKind::Noop,
            _ => return None,
        };
        Some(kind)
    }
}

/// Payload события: обязательные `name` и `args`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Имя события
    pub name: String,
    /// Аргументы как есть
    pub args: Vec<Value>,
}

/// Подтверждение: id исходного сообщения, `+` для подтверждения события
/// и опциональные JSON-аргументы после `+`.
#[derive(Debug, Clone, PartialEq)]
pub struct Ack {
    /// id подтверждаемого сообщения
    pub message_id: String,
    /// `true`, если подтверждается событие (`+` во фрейме)
    pub event: bool,
    /// JSON после `+`
    pub args: Option<Value>,
}

impl Ack {
    fn parse(data: &str) -> Option<Self> {
        match data.split_once('+') {
            None => Some(Self {
                message_id: data.to_string(),
                event: false,
                args: None,
            }),
            Some((id, "")) => Some(Self {
                message_id: id.to_string(),
                event: true,
                args: None,
            }),
            Some((id, rest)) => serde_json::from_str(rest).ok().map(|args| Self {
                message_id: id.to_string(),
                event: true,
                args: Some(args),
            }),
        }
    }

    fn encode(&self) -> String {
        let mut out = self.message_id.clone();
        if self.event {
            out.push('+');
            if let Some(args) = &self.args {
                out.push_str(&args.to_string());
            }
        }
        out
    }
}

/// Типизированное содержимое сообщения.
///
/// Строковые варианты хранят поле `data` как пришло, даже если для вида
/// оно обычно пустое: `0::/x:reason` кодируется обратно без потерь.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Отключение; данные обычно пусты
    Disconnect(String),
    /// Данные connect (например query-строка), чаще всего пусто
    Connect(String),
    /// Keep-alive; данные обычно пусты
    Heartbeat(String),
    /// Текст как есть
    Text(String),
    /// JSON декодируется сразу при приёме, кодируется в текст только при отправке
    Json(Value),
    /// Событие
    Event(Event),
    /// Подтверждение
    Ack(Ack),
    /// Причина ошибки
    Error(String),
    /// Пустая операция; данные обычно пусты
    Noop(String),
    /// Неизвестный тег или битый payload известного вида
    Unknown {
        /// Тег как был во фрейме
        type_tag: String,
        /// Сырые данные
        data: String,
    },
}

impl Payload {
    fn decode(type_tag: &str, data: &str) -> Self {
        let unknown = || Payload::Unknown {
            type_tag: type_tag.to_string(),
            data: data.to_string(),
        };

        match MessageKind::from_tag(type_tag) {
            Some(MessageKind::Disconnect) => Payload::Disconnect(data.to_string()),
            Some(MessageKind::Connect) => Payload::Connect(data.to_string()),
            Some(MessageKind::Heartbeat) => Payload::Heartbeat(data.to_string()),
            Some(MessageKind::Text) => Payload::Text(data.to_string()),
            Some(MessageKind::Json) => serde_json::from_str(data)
                .map(Payload::Json)
                .unwrap_or_else(|_| unknown()),
            Some(MessageKind::Event) => serde_json::from_str(data)
                .map(Payload::Event)
                .unwrap_or_else(|_| unknown()),
            Some(MessageKind::Ack) => Ack::parse(data).map(Payload::Ack).unwrap_or_else(unknown),
            Some(MessageKind::Error) => Payload::Error(data.to_string()),
            Some(MessageKind::Noop) => Payload::Noop(data.to_string()),
            Some(MessageKind::Unknown) | None => unknown(),
        }
    }

    /// Вид payload
    pub fn kind(&self) -> MessageKind {
        match self {
            Payload::Disconnect(_) => MessageKind::Disconnect,
            Payload::Connect(_) => MessageKind::Connect,
            Payload::Heartbeat(_) => MessageKind::Heartbeat,
            Payload::Text(_) => MessageKind::Text,
            Payload::Json(_) => MessageKind::Json,
            Payload::Event(_) => MessageKind::Event,
            Payload::Ack(_) => MessageKind::Ack,
            Payload::Error(_) => MessageKind::Error,
            Payload::Noop(_) => MessageKind::Noop,
            Payload::Unknown { .. } => MessageKind::Unknown,
        }
    }

    fn type_tag(&self) -> Cow<'_, str> {
        match (self, self.kind().code()) {
            (Payload::Unknown { type_tag, .. }, _) => Cow::Borrowed(type_tag.as_str()),
            (_, Some(code)) => Cow::Owned(code.to_string()),
            (_, None) => Cow::Borrowed(""),
        }
    }

    fn data(&self) -> Cow<'_, str> {
        match self {
            Payload::Disconnect(s)
            | Payload::Connect(s)
            | Payload::Heartbeat(s)
            | Payload::Text(s)
            | Payload::Error(s)
            | Payload::Noop(s) => Cow::Borrowed(s.as_str()),
            Payload::Unknown { data, .. } => Cow::Borrowed(data.as_str()),
            Payload::Json(v) => Cow::Owned(v.to_string()),
            Payload::Event(e) => Cow::Owned(json!({ "name": e.name, "args": e.args }).to_string()),
            Payload::Ack(a) => Cow::Owned(a.encode()),
        }
    }
}

/// Сообщение протокола: `type:id:endpoint:data`.
///
/// После создания не меняется; `with_id` / `with_endpoint` возвращают новое значение.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    id: String,
    endpoint: String,
    payload: Payload,
}

impl Message {
    /// Сообщение без id и endpoint
    pub fn new(payload: Payload) -> Self {
        Self {
            id: String::new(),
            endpoint: String::new(),
            payload,
        }
    }

    /// `0:::`
    pub fn disconnect() -> Self {
        Self::new(Payload::Disconnect(String::new()))
    }

    /// `1:::`, endpoint задаётся через [`Message::with_endpoint`]
    pub fn connect() -> Self {
        Self::new(Payload::Connect(String::new()))
    }

    /// `2:::`
    pub fn heartbeat() -> Self {
        Self::new(Payload::Heartbeat(String::new()))
    }

    /// Текстовое сообщение
    pub fn text(data: impl Into<String>) -> Self {
        Self::new(Payload::Text(data.into()))
    }

    /// JSON-сообщение
    pub fn json(data: Value) -> Self {
        Self::new(Payload::Json(data))
    }

    /// Событие с аргументами
    pub fn event(name: impl Into<String>, args: Vec<Value>) -> Self {
        Self::new(Payload::Event(Event {
            name: name.into(),
            args,
        }))
    }

    /// Подтверждение сообщения `message_id`
    pub fn ack(message_id: impl Into<String>, event: bool) -> Self {
        Self::new(Payload::Ack(Ack {
            message_id: message_id.into(),
            event,
            args: None,
        }))
    }

    /// Ошибка с причиной
    pub fn error(reason: impl Into<String>) -> Self {
        Self::new(Payload::Error(reason.into()))
    }

    /// `8:::`
    pub fn noop() -> Self {
        Self::new(Payload::Noop(String::new()))
    }

    /// JSON-сообщение подписки на канал: `{"op":"subscribe","channel":...}`
    pub fn subscribe(channel: &str) -> Self {
        Self::json(json!({ "op": "subscribe", "channel": channel }))
    }

    /// Копия с другим id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Копия с другим endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// id сообщения, пустая строка если его нет
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Endpoint (namespace), пустая строка для всего сокета
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Содержимое
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Вид сообщения
    pub fn kind(&self) -> MessageKind {
        self.payload.kind()
    }

    /// Поле JSON-payload по ключу (только для [`Payload::Json`])
    pub fn get(&self, key: &str) -> Option<&Value> {
        match &self.payload {
            Payload::Json(v) => v.get(key),
            _ => None,
        }
    }

    /// Декодирует фрейм. Ошибка только если фрейм не делится на поля,
    /// всё остальное превращается в [`Payload::Unknown`].
    pub fn decode(frame: &str) -> Result<Self, ProtocolError> {
        let raw = split_frame(frame)?;
        Ok(Self {
            id: raw.id.to_string(),
            endpoint: raw.endpoint.to_string(),
            payload: Payload::decode(raw.type_tag, raw.data),
        })
    }

    /// Фрейм `type:id:endpoint:data`
    pub fn encode(&self) -> String {
        encode_frame(
            &self.payload.type_tag(),
            &self.id,
            &self.endpoint,
            &self.payload.data(),
        )
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
