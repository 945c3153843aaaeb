//! 会话 HTTP API 客户端
//!
//! 负责所有会话相关的 OpenAPI 请求

use crate::im::client::ImClient;
use crate::im::conversation::types::{
    CreateConversationBody, CreateConversationParams, CreateConversationResponse,
    DestroyConversationBody, DestroyConversationParams, DestroyConversationResponse,
    IsUserInConversationBody, IsUserInConversationParams, IsUserInConversationResponse,
    ModifyConversationBody, ModifyConversationParams, ModifyConversationResponse,
};
use crate::im::types::action;
use anyhow::Result;
use tracing::{debug, info};

/// 会话相关的 HTTP API 客户端
pub struct ConversationApi {
    client: ImClient,
}

impl ConversationApi {
    pub fn new(client: ImClient) -> Self {
        Self { client }
    }

    /// 创建会话（单聊、群聊或直播群）
    ///
    /// 接口文档: https://www.volcengine.com/docs/6348/337013
    pub async fn create_conversation(
        &self,
        params: &CreateConversationParams,
    ) -> Result<CreateConversationResponse> {
        info!(
            "[ConvAPI] 📡 创建会话，类型: {:?}, 群主: {:?}",
            params.conversation_type, params.owner
        );
        debug!(
            "[ConvAPI]   名称: {:?}, 幂等ID: {:?}",
            params.name, params.idempotent_id
        );

        let body = CreateConversationBody::new(self.client.app_id(), params);
        let resp: CreateConversationResponse =
            self.client.call(action::CREATE_CONVERSATION, &body).await?;
        if let Some(data) = &resp.data {
            info!(
                "[ConvAPI] ✅ 会话已创建: shortId={}, conversationId={}, exist={:?}",
                data.conversation_short_id, data.conversation_id, data.exist
            );
        }
        Ok(resp)
    }

    /// 修改会话资料
    ///
    /// 接口文档: https://www.volcengine.com/docs/6348/337017
    pub async fn modify_conversation(
        &self,
        params: &ModifyConversationParams,
    ) -> Result<ModifyConversationResponse> {
        info!("[ConvAPI] 📡 修改会话: {}", params.conversation_short_id);
        let body = ModifyConversationBody::new(self.client.app_id(), params);
        self.client.call(action::MODIFY_CONVERSATION, &body).await
    }

    /// 查询用户是否在会话中
    ///
    /// 同时传入 ParticipantUserId 与 UserId 时以 ParticipantUserId 为准。
    pub async fn is_user_in_conversation(
        &self,
        params: &IsUserInConversationParams,
    ) -> Result<IsUserInConversationResponse> {
        let participant = params.participant();
        info!(
            "[ConvAPI] 📡 检查用户 {} 是否在会话 {} 中",
            participant, params.conversation_short_id
        );

        let body = IsUserInConversationBody {
            app_id: self.client.app_id(),
            conversation_short_id: params.conversation_short_id,
            participant_user_id: participant,
        };
        let resp: IsUserInConversationResponse = self
            .client
            .call(action::IS_USER_IN_CONVERSATION, &body)
            .await?;
        if let Some(data) = &resp.data {
            debug!("[ConvAPI]   结果: {}", data.is_in_conversation);
        }
        Ok(resp)
    }

    /// 销毁会话（解散群聊）
    ///
    /// 接口文档: https://www.volcengine.com/docs/6348/337016
    pub async fn destroy_conversation(
        &self,
        params: &DestroyConversationParams,
    ) -> Result<DestroyConversationResponse> {
        info!("[ConvAPI] 📡 销毁会话: {}", params.conversation_short_id);
        let body = DestroyConversationBody {
            app_id: self.client.app_id(),
            conversation_short_id: params.conversation_short_id,
        };
        self.client.call(action::DESTROY_CONVERSATION, &body).await
    }
}
