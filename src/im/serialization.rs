use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;

/// 扩展字段（用户、会话、消息共用的字符串键值对）
pub type Ext = HashMap<String, String>;

/// 消息 ID：服务端既可能返回数字也可能返回字符串
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageId {
    Number(i64),
    Text(String),
}

impl MessageId {
    /// 转换为 int64，字符串形式必须是合法整数
    pub fn to_i64(&self) -> anyhow::Result<i64> {
        match self {
            MessageId::Number(id) => Ok(*id),
            MessageId::Text(s) => s
                .parse::<i64>()
                .map_err(|_| anyhow::anyhow!("MessageId must be a valid integer: {:?}", s)),
        }
    }
}

impl From<i64> for MessageId {
    fn from(id: i64) -> Self {
        MessageId::Number(id)
    }
}

impl From<&str> for MessageId {
    fn from(id: &str) -> Self {
        MessageId::Text(id.to_string())
    }
}

impl From<String> for MessageId {
    fn from(id: String) -> Self {
        MessageId::Text(id)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageId::Number(id) => write!(f, "{}", id),
            MessageId::Text(s) => f.write_str(s),
        }
    }
}

/// 反序列化数组字段，处理 null 值
pub(crate) fn deserialize_vec_or_null<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let opt = Option::<Vec<T>>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

/// 宽松解析 Ext：只保留字符串值，非字符串值被丢弃，null 视为缺失
pub(crate) fn deserialize_lenient_ext<'de, D>(deserializer: D) -> Result<Option<Ext>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Object(obj)) => Ok(Some(
            obj.into_iter()
                .filter_map(|(k, v)| match v {
                    serde_json::Value::String(s) => Some((k, s)),
                    _ => None,
                })
                .collect(),
        )),
        Some(other) => Err(serde::de::Error::custom(format!(
            "Ext must be an object, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_id_accepts_number_or_string() {
        let n: MessageId = serde_json::from_value(json!(987654321)).unwrap();
        assert_eq!(n, MessageId::Number(987654321));
        assert_eq!(n.to_i64().unwrap(), 987654321);

        let s: MessageId = serde_json::from_value(json!("7283947293847293847")).unwrap();
        assert_eq!(s.to_i64().unwrap(), 7283947293847293847);
        assert_eq!(s.to_string(), "7283947293847293847");
        assert_eq!(serde_json::to_value(&s).unwrap(), json!("7283947293847293847"));
    }

    #[test]
    fn message_id_rejects_non_integer_text() {
        let err = MessageId::from("abc").to_i64().unwrap_err();
        assert!(err.to_string().contains("MessageId must be a valid integer"));
        assert!(serde_json::from_value::<MessageId>(json!(true)).is_err());
        // 与 ParseInt 一致，不容忍空白
        assert!(MessageId::from(" 123 ").to_i64().is_err());
        assert!(MessageId::from("").to_i64().is_err());
    }

    #[derive(Debug, Deserialize)]
    struct WithExt {
        #[serde(default, deserialize_with = "deserialize_lenient_ext")]
        ext: Option<Ext>,
    }

    #[test]
    fn ext_keeps_only_string_values() {
        let w: WithExt = serde_json::from_value(json!({"ext": {"a": "1", "b": 2, "c": "x"}})).unwrap();
        let ext = w.ext.unwrap();
        assert_eq!(ext.len(), 2);
        assert_eq!(ext["a"], "1");

        let missing: WithExt = serde_json::from_value(json!({})).unwrap();
        assert!(missing.ext.is_none());
        assert!(serde_json::from_value::<WithExt>(json!({"ext": [1, 2]})).is_err());
    }
}
