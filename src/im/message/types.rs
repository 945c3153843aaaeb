//! 消息 API DTO（请求和响应结构体）

use crate::im::serialization::{deserialize_lenient_ext, MessageId, Ext};
use crate::im::types::{
    ConversationType, EmptyData, ImResponse, MessagePriority, MessageType, QueryDirection,
};
use serde::{Deserialize, Serialize};

/// 发送消息时的引用信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RefMsgInfo {
    /// 被引用的消息ID
    pub referenced_message_id: i64,
    /// 消息引用时展示的文本内容
    #[serde(default)]
    pub hint: String,
}

/// sendMessage 的参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendMessageParams {
    pub conversation_short_id: i64,
    pub sender_user_id: i64,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_type: Option<MessageType>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_lenient_ext"
    )]
    pub ext: Option<Ext>,
    /// @ 的用户
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentioned_users: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_users: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invisible_users: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<MessagePriority>,
    /// 客户端消息ID，用于幂等
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_msg_id: Option<String>,
    /// 消息时间戳（毫秒）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_msg_info: Option<RefMsgInfo>,
}

impl SendMessageParams {
    pub fn new(conversation_short_id: i64, sender_user_id: i64, content: impl Into<String>) -> Self {
        Self {
            conversation_short_id,
            sender_user_id,
            content: content.into(),
            message_type: None,
            ext: None,
            mentioned_users: None,
            visible_users: None,
            invisible_users: None,
            priority: None,
            client_msg_id: None,
            create_time: None,
            ref_msg_info: None,
        }
    }

    pub fn with_message_type(mut self, message_type: MessageType) -> Self {
        self.message_type = Some(message_type);
        self
    }

    pub fn with_ref_msg(mut self, referenced_message_id: i64, hint: impl Into<String>) -> Self {
        self.ref_msg_info = Some(RefMsgInfo {
            referenced_message_id,
            hint: hint.into(),
        });
        self
    }
}

/// sendMessage 的响应数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendMessageData {
    pub message_id: MessageId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_message_id: Option<i64>,
}

/// recallMessage 的参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecallMessageParams {
    pub conversation_short_id: i64,
    pub message_id: MessageId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant_user_id: Option<i64>,
}

/// deleteConversationMessage 的参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteConversationMessageParams {
    pub conversation_short_id: i64,
    pub message_id: MessageId,
}

/// getConversationMessages 的参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetConversationMessagesParams {
    pub conversation_short_id: i64,
    /// 查询起始位置
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    /// 查询方向，直播群只能取 1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverse: Option<QueryDirection>,
    /// 指定消息ID时按ID查询，不再分页
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_ids: Option<Vec<MessageId>>,
}

impl GetConversationMessagesParams {
    pub fn new(conversation_short_id: i64) -> Self {
        Self {
            conversation_short_id,
            cursor: None,
            limit: None,
            reverse: None,
            message_ids: None,
        }
    }
}

/// 被引用消息的反规范化副本
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReferencedMessage {
    pub referenced_message_id: i64,
    #[serde(default)]
    pub conversation_short_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_type: Option<ConversationType>,
    #[serde(default)]
    pub create_time: i64,
    #[serde(default)]
    pub hint: String,
    #[serde(default, alias = "MsgType", skip_serializing_if = "Option::is_none")]
    pub message_type: Option<MessageType>,
    #[serde(default, alias = "Sender")]
    pub sender_user_id: i64,
}

/// 会话中的一条消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Message {
    #[serde(default)]
    pub app_id: i64,
    pub message_id: MessageId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_message_id: Option<i64>,
    pub conversation_short_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_type: Option<ConversationType>,
    #[serde(alias = "Sender")]
    pub sender_user_id: i64,
    #[serde(default)]
    pub content: String,
    /// 严格解析：服务端返回未登记的类型时整页解析失败（返回 Err），
    /// 而不是静默丢弃或改写该消息
    #[serde(alias = "MsgType")]
    pub message_type: MessageType,
    #[serde(default)]
    pub create_time: i64,
    #[serde(default)]
    pub is_recalled: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_lenient_ext"
    )]
    pub ext: Option<Ext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentioned_users: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_users: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invisible_users: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_msg_info: Option<ReferencedMessage>,
}

/// getConversationMessages 的响应数据
///
/// 按ID查询时服务端不返回 HasMore/NewCursor，按缺省值处理。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetConversationMessagesData {
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub new_cursor: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<Message>>,
}

pub type SendMessageResponse = ImResponse<SendMessageData>;
pub type RecallMessageResponse = ImResponse<EmptyData>;
pub type DeleteConversationMessageResponse = ImResponse<EmptyData>;
pub type GetConversationMessagesResponse = ImResponse<GetConversationMessagesData>;

// ========== 发往 OpenAPI 的请求体 ==========

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct SendMessageBody<'a> {
    pub app_id: i64,
    pub conversation_short_id: i64,
    pub sender: i64,
    pub content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg_type: Option<MessageType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<&'a Ext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentioned_users: Option<&'a [i64]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_users: Option<&'a [i64]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invisible_users: Option<&'a [i64]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<MessagePriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_msg_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_msg_info: Option<&'a RefMsgInfo>,
}

impl<'a> SendMessageBody<'a> {
    pub fn new(app_id: i64, params: &'a SendMessageParams) -> Self {
        Self {
            app_id,
            conversation_short_id: params.conversation_short_id,
            sender: params.sender_user_id,
            content: &params.content,
            msg_type: params.message_type,
            ext: params.ext.as_ref(),
            mentioned_users: params.mentioned_users.as_deref(),
            visible_users: params.visible_users.as_deref(),
            invisible_users: params.invisible_users.as_deref(),
            priority: params.priority,
            client_msg_id: params.client_msg_id.as_deref(),
            create_time: params.create_time,
            ref_msg_info: params.ref_msg_info.as_ref(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RecallMessageBody {
    pub app_id: i64,
    pub conversation_short_id: i64,
    pub message_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant_user_id: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct DeleteConversationMessageBody {
    pub app_id: i64,
    pub conversation_short_id: i64,
    pub message_id: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct GetConversationMessagesBody {
    pub app_id: i64,
    pub conversation_short_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse: Option<QueryDirection>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct GetMessagesBody {
    pub app_id: i64,
    pub conversation_short_id: i64,
    pub message_ids: Vec<i64>,
}
