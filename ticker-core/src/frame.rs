use crate::error::ProtocolError;

/// Фрейм, разобранный на поля `type:id:endpoint:data`.
///
/// Поля заимствуются из исходной строки, типизация происходит уровнем выше
/// (см. [`crate::message::Message::decode`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFrame<'a> {
    /// Тег вида, как есть
    pub type_tag: &'a str,
    /// id сообщения
    pub id: &'a str,
    /// endpoint (namespace)
    pub endpoint: &'a str,
    /// Всё после третьего `:`
    pub data: &'a str,
}

/// Делит фрейм максимум на 4 части: `data` может содержать `:` и не режется.
///
/// Хвост `:data` необязателен (`2::` это валидный heartbeat), а вот
/// `type:id:endpoint` должны быть всегда.
pub fn split_frame(frame: &str) -> Result<RawFrame<'_>, ProtocolError> {
    if frame.is_empty() {
        return Err(ProtocolError::EmptyFrame);
    }

    let mut parts = frame.splitn(4, ':');
    let (Some(type_tag), Some(id), Some(endpoint)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(ProtocolError::MalformedFrame(frame.to_string()));
    };

    Ok(RawFrame {
        type_tag,
        id,
        endpoint,
        data: parts.next().unwrap_or(""),
    })
}

/// Обратная операция к [`split_frame`]
pub fn encode_frame(type_tag: &str, id: &str, endpoint: &str, data: &str) -> String {
    format!("{type_tag}:{id}:{endpoint}:{data}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_keeps_colons_in_data() {
        let f = split_frame("3:7:/feed:a:b::c").unwrap();
        assert_eq!(f.type_tag, "3");
        assert_eq!(f.id, "7");
        assert_eq!(f.endpoint, "/feed");
        assert_eq!(f.data, "a:b::c");
    }

    #[test]
    fn split_allows_missing_data_field() {
        let f = split_frame("2::").unwrap();
        assert_eq!(
            f,
            RawFrame {
                type_tag: "2",
                id: "",
                endpoint: "",
                data: ""
            }
        );
    }

    #[test]
    fn split_rejects_empty_and_short_frames() {
        assert!(matches!(split_frame(""), Err(ProtocolError::EmptyFrame)));
        assert!(matches!(
            split_frame("2"),
            Err(ProtocolError::MalformedFrame(_))
        ));
        assert!(matches!(
            split_frame("2:"),
            Err(ProtocolError::MalformedFrame(_))
        ));
    }

    #[test]
    fn encode_is_inverse_of_split() {
        let s = encode_frame("4", "1+", "/x", r#"{"a":"b:c"}"#);
        assert_eq!(s, r#"4:1+:/x:{"a":"b:c"}"#);

        let f = split_frame(&s).unwrap();
        assert_eq!(encode_frame(f.type_tag, f.id, f.endpoint, f.data), s);
    }
}
