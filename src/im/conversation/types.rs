//! 会话 API DTO（请求和响应结构体）

use crate::im::serialization::{deserialize_lenient_ext, Ext};
use crate::im::types::{ConversationStatus, ConversationType, EmptyData, ImResponse};
use serde::{Deserialize, Serialize};

/// createConversation 的参数，全部可选
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateConversationParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_type: Option<ConversationType>,
    /// 群主用户ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_lenient_ext"
    )]
    pub ext: Option<Ext>,
    /// 单聊时另一个成员的用户ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_user_id: Option<i64>,
    /// 幂等ID，防止重复创建
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idempotent_id: Option<String>,
    /// 信箱类型，用于逻辑隔离，默认值为0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inbox_type: Option<i32>,
}

/// 会话详情
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConversationInfo {
    pub app_id: i64,
    pub conversation_short_id: i64,
    pub conversation_id: String,
    pub conversation_type: ConversationType,
    pub create_time: i64,
    pub creator_user_id: i64,
    pub inbox_type: i32,
    pub modify_time: i64,
    pub owner_user_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_lenient_ext"
    )]
    pub ext: Option<Ext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    /// 直播群在线人数
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub online_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ConversationStatus>,
}

/// createConversation 的响应数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateConversationData {
    pub conversation_short_id: i64,
    pub conversation_id: String,
    /// 是否已存在（幂等命中或单聊已存在）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exist: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_info: Option<ConversationInfo>,
}

/// modifyConversation 的参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModifyConversationParams {
    pub conversation_short_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_lenient_ext"
    )]
    pub ext: Option<Ext>,
}

impl ModifyConversationParams {
    pub fn new(conversation_short_id: i64) -> Self {
        Self {
            conversation_short_id,
            name: None,
            description: None,
            notice: None,
            avatar_url: None,
            ext: None,
        }
    }
}

/// isUserInConversation 的参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IsUserInConversationParams {
    pub conversation_short_id: i64,
    pub user_id: i64,
    /// 参与者用户ID，优先于 UserId
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant_user_id: Option<i64>,
}

impl IsUserInConversationParams {
    /// 实际被检查的用户
    pub fn participant(&self) -> i64 {
        self.participant_user_id.unwrap_or(self.user_id)
    }
}

/// isUserInConversation 的响应数据
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IsUserInConversationData {
    #[serde(alias = "IsUserInConversation")]
    pub is_in_conversation: bool,
}

/// destroyConversation 的参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DestroyConversationParams {
    pub conversation_short_id: i64,
}

pub type CreateConversationResponse = ImResponse<CreateConversationData>;
pub type ModifyConversationResponse = ImResponse<EmptyData>;
pub type IsUserInConversationResponse = ImResponse<IsUserInConversationData>;
pub type DestroyConversationResponse = ImResponse<EmptyData>;

// ========== 发往 OpenAPI 的请求体 ==========

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ConversationCoreInfo<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_short_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_type: Option<ConversationType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<&'a Ext>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct CreateConversationBody<'a> {
    pub app_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_user_id: Option<i64>,
    pub conversation_core_info: ConversationCoreInfo<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotent_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inbox_type: Option<i32>,
}

impl<'a> CreateConversationBody<'a> {
    pub fn new(app_id: i64, params: &'a CreateConversationParams) -> Self {
        Self {
            app_id,
            owner_user_id: params.owner,
            conversation_core_info: ConversationCoreInfo {
                conversation_short_id: None,
                conversation_type: params.conversation_type,
                name: params.name.as_deref(),
                description: params.description.as_deref(),
                avatar_url: params.avatar_url.as_deref(),
                notice: params.notice.as_deref(),
                ext: params.ext.as_ref(),
            },
            other_user_id: params.other_user_id,
            idempotent_id: params.idempotent_id.as_deref(),
            inbox_type: params.inbox_type,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ModifyConversationBody<'a> {
    pub app_id: i64,
    pub conversation_core_info: ConversationCoreInfo<'a>,
}

impl<'a> ModifyConversationBody<'a> {
    pub fn new(app_id: i64, params: &'a ModifyConversationParams) -> Self {
        Self {
            app_id,
            conversation_core_info: ConversationCoreInfo {
                conversation_short_id: Some(params.conversation_short_id),
                conversation_type: None,
                name: params.name.as_deref(),
                description: params.description.as_deref(),
                avatar_url: params.avatar_url.as_deref(),
                notice: params.notice.as_deref(),
                ext: params.ext.as_ref(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct IsUserInConversationBody {
    pub app_id: i64,
    pub conversation_short_id: i64,
    pub participant_user_id: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct DestroyConversationBody {
    pub app_id: i64,
    pub conversation_short_id: i64,
}
