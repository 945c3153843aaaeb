use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

/// 成功状态码
pub const CODE_SUCCESS: i64 = 0;

/// 服务端返回了错误但没有给出数字错误码时使用
pub const CODE_UNKNOWN_ERROR: i64 = -1;

/// 成功时的结果消息
pub const MESSAGE_SUCCESS: &str = "success";

/// OpenAPI Action 名称
pub mod action {
    pub const REGISTER_USERS: &str = "RegisterUsers";
    pub const BATCH_GET_USER: &str = "BatchGetUser";
    pub const UNREGISTER_USERS: &str = "UnRegisterUsers";
    pub const BATCH_UPDATE_USER: &str = "BatchUpdateUser";
    pub const CREATE_CONVERSATION: &str = "CreateConversation";
    pub const MODIFY_CONVERSATION: &str = "ModifyConversation";
    pub const IS_USER_IN_CONVERSATION: &str = "IsUserInConversation";
    pub const DESTROY_CONVERSATION: &str = "DestroyConversation";
    pub const SEND_MESSAGE: &str = "SendMessage";
    pub const RECALL_MESSAGE: &str = "RecallMessage";
    pub const DELETE_CONVERSATION_MESSAGE: &str = "DeleteConversationMessage";
    pub const GET_CONVERSATION_MESSAGES: &str = "GetConversationMessages";
    pub const GET_MESSAGES: &str = "GetMessages";
}

/// 统一的响应包装结构体（Code、Message、Data）
///
/// 所有操作共用。Data 在失败时缺失，缺失或 null 都反序列化为 None。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImResponse<T> {
    /// 结果状态码，0 表示成功
    pub code: i64,
    /// 结果消息
    pub message: String,
    /// 响应数据，缺失或 null 时为 None
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// 修改/撤回/删除/销毁等操作的响应数据（任意键值）
pub type EmptyData = serde_json::Map<String, serde_json::Value>;

impl<T> ImResponse<T> {
    pub fn ok(data: Option<T>) -> Self {
        Self {
            code: CODE_SUCCESS,
            message: MESSAGE_SUCCESS.to_string(),
            data,
        }
    }

    pub fn error(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == CODE_SUCCESS
    }

    /// 非 0 状态码转换为 [`ApiError`]，成功时返回 Data（可能为 None）
    pub fn into_result(self) -> Result<Option<T>, ApiError> {
        if self.is_success() {
            Ok(self.data)
        } else {
            Err(ApiError {
                code: self.code,
                message: self.message,
            })
        }
    }
}

/// 服务端定义的业务错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("服务器错误 {code}: {message}")]
pub struct ApiError {
    pub code: i64,
    pub message: String,
}

macro_rules! int_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "i32", into = "i32")]
        #[repr(i32)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $value,)+
        }

        impl TryFrom<i32> for $name {
            type Error = String;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                match value {
                    $($value => Ok(Self::$variant),)+
                    other => Err(format!(
                        "{} 不支持的取值: {}",
                        stringify!($name),
                        other
                    )),
                }
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> i32 {
                value as i32
            }
        }
    };
}

int_enum! {
    /// 会话类型
    ConversationType {
        /// 单聊
        Single = 1,
        /// 群聊
        Group = 2,
        /// 直播群
        Broadcast = 100,
    }
}

int_enum! {
    /// 会话状态
    ConversationStatus {
        /// 正常
        Active = 0,
        /// 已解散
        Dissolved = 1,
    }
}

int_enum! {
    /// 消息类型
    MessageType {
        Text = 10001,
        Image = 10003,
        Video = 10004,
        File = 10005,
        Audio = 10006,
        /// 自定义消息
        Custom = 10012,
    }
}

int_enum! {
    /// 消息优先级
    MessagePriority {
        Low = 0,
        Normal = 1,
        High = 2,
    }
}

int_enum! {
    /// 消息查询方向（Reverse 字段），直播群只能取 Backward
    QueryDirection {
        /// 正向查询
        Forward = 0,
        /// 反向查询
        Backward = 1,
    }
}

/// OpenAPI 原始响应
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OpenApiResponse<T> {
    #[serde(default)]
    pub response_metadata: ResponseMetadata,
    pub result: Option<T>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ResponseMetadata {
    pub request_id: String,
    pub action: String,
    pub version: String,
    pub service: String,
    pub region: String,
    pub error: Option<OpenApiError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct OpenApiError {
    pub code_n: i64,
    pub code: String,
    pub message: String,
}

impl OpenApiError {
    fn into_envelope<T>(self) -> ImResponse<T> {
        let code = if self.code_n != 0 {
            self.code_n
        } else {
            CODE_UNKNOWN_ERROR
        };
        let message = if self.code.is_empty() {
            self.message
        } else {
            format!("{}: {}", self.code, self.message)
        };
        ImResponse::error(code, message)
    }
}

/// 通用 HTTP 响应处理函数：将 OpenAPI 响应转换为统一的 [`ImResponse`]
pub async fn handle_http_response<T: DeserializeOwned>(
    response: reqwest::Response,
    action: &str,
) -> anyhow::Result<ImResponse<T>> {
    use anyhow::Context;

    let status = response.status();
    // 读取 body bytes（只能读取一次）
    let body_bytes = response.bytes().await.context("读取响应 body 失败")?;
    parse_open_api_body(status, &body_bytes, action)
}

/// 解析 OpenAPI 响应 body
///
/// 带 `ResponseMetadata.Error` 的响应无论 HTTP 状态如何都折叠为失败的包装结构；
/// 无法解析的非 2xx 响应作为传输错误返回。
pub fn parse_open_api_body<T: DeserializeOwned>(
    status: reqwest::StatusCode,
    body: &[u8],
    action: &str,
) -> anyhow::Result<ImResponse<T>> {
    let body_str = String::from_utf8_lossy(body);
    debug!("[ImAPI] {} 响应 Body: {}", action, body_str);

    let raw: OpenApiResponse<serde_json::Value> = match serde_json::from_slice(body) {
        Ok(raw) => raw,
        Err(e) => {
            if !status.is_success() {
                error!(
                    "[ImAPI] {} 请求失败，HTTP状态: {}, 响应: {}",
                    action, status, body_str
                );
                return Err(anyhow::anyhow!("HTTP 错误 {}: {}", status, body_str));
            }
            error!(
                "[ImAPI] {} 反序列化失败: {:?}\n原始响应: {}",
                action, e, body_str
            );
            return Err(anyhow::anyhow!("反序列化响应失败: {:?}", e));
        }
    };

    let metadata = raw.response_metadata;
    if let Some(err) = metadata.error {
        warn!(
            "[ImAPI] {} 服务器错误，RequestId: {}, 错误码: {}/{}, 错误信息: {}",
            action, metadata.request_id, err.code_n, err.code, err.message
        );
        return Ok(err.into_envelope());
    }

    if !status.is_success() {
        error!(
            "[ImAPI] {} 请求失败，HTTP状态: {}, 响应: {}",
            action, status, body_str
        );
        return Err(anyhow::anyhow!("HTTP 错误 {}: {}", status, body_str));
    }

    let data = match raw.result {
        None | Some(serde_json::Value::Null) => None,
        Some(value) => Some(serde_json::from_value::<T>(value).map_err(|e| {
            error!(
                "[ImAPI] {} Result 反序列化失败: {:?}\n原始响应: {}",
                action, e, body_str
            );
            anyhow::anyhow!("反序列化响应失败: {:?}", e)
        })?),
    };

    debug!(
        "[ImAPI] {} 请求成功，RequestId: {}",
        action, metadata.request_id
    );
    Ok(ImResponse::ok(data))
}
