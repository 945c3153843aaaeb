//! 消息 HTTP API 客户端
//!
//! 负责所有消息相关的 OpenAPI 请求

use crate::im::client::ImClient;
use crate::im::message::types::{
    DeleteConversationMessageBody, DeleteConversationMessageParams,
    DeleteConversationMessageResponse, GetConversationMessagesBody, GetConversationMessagesParams,
    GetConversationMessagesResponse, GetMessagesBody, RecallMessageBody, RecallMessageParams,
    RecallMessageResponse, SendMessageBody, SendMessageParams, SendMessageResponse,
};
use crate::im::types::action;
use anyhow::Result;
use tracing::{debug, info, warn};

/// 消息相关的 HTTP API 客户端
pub struct MessageApi {
    client: ImClient,
}

impl MessageApi {
    pub fn new(client: ImClient) -> Self {
        Self { client }
    }

    /// 发送消息（文本、图片、视频、文件、音频、自定义）
    ///
    /// 接口文档: https://www.volcengine.com/docs/6348/337135
    pub async fn send_message(&self, params: &SendMessageParams) -> Result<SendMessageResponse> {
        info!(
            "[MsgAPI] 📡 发送消息: 会话={}, 发送者={}, 类型={:?}",
            params.conversation_short_id, params.sender_user_id, params.message_type
        );
        debug!("[MsgAPI]   内容长度: {}", params.content.len());

        let body = SendMessageBody::new(self.client.app_id(), params);
        let resp: SendMessageResponse = self.client.call(action::SEND_MESSAGE, &body).await?;
        if let Some(data) = &resp.data {
            info!("[MsgAPI] ✅ 消息已发送: messageId={}", data.message_id);
        }
        Ok(resp)
    }

    /// 撤回消息
    ///
    /// 接口文档: https://www.volcengine.com/docs/6348/337141
    pub async fn recall_message(&self, params: &RecallMessageParams) -> Result<RecallMessageResponse> {
        let message_id = params.message_id.to_i64()?;
        info!(
            "[MsgAPI] 📡 撤回消息: 会话={}, 消息={}",
            params.conversation_short_id, message_id
        );

        let body = RecallMessageBody {
            app_id: self.client.app_id(),
            conversation_short_id: params.conversation_short_id,
            message_id,
            participant_user_id: params.participant_user_id,
        };
        self.client.call(action::RECALL_MESSAGE, &body).await
    }

    /// 删除会话消息
    ///
    /// 接口文档: https://www.volcengine.com/docs/6348/337140
    pub async fn delete_conversation_message(
        &self,
        params: &DeleteConversationMessageParams,
    ) -> Result<DeleteConversationMessageResponse> {
        let message_id = params.message_id.to_i64()?;
        info!(
            "[MsgAPI] 📡 删除消息: 会话={}, 消息={}",
            params.conversation_short_id, message_id
        );

        let body = DeleteConversationMessageBody {
            app_id: self.client.app_id(),
            conversation_short_id: params.conversation_short_id,
            message_id,
        };
        self.client
            .call(action::DELETE_CONVERSATION_MESSAGE, &body)
            .await
    }

    /// 获取会话消息
    ///
    /// MessageIds 非空时按ID查询（GetMessages），无法解析为整数的ID会被跳过；
    /// 否则按 Cursor/Limit/Reverse 分页查询。
    ///
    /// 接口文档: https://www.volcengine.com/docs/6348/337138
    pub async fn get_conversation_messages(
        &self,
        params: &GetConversationMessagesParams,
    ) -> Result<GetConversationMessagesResponse> {
        let message_ids: Vec<i64> = params
            .message_ids
            .iter()
            .flatten()
            .filter_map(|id| match id.to_i64() {
                Ok(id) => Some(id),
                Err(_) => {
                    warn!("[MsgAPI] ⚠️ 跳过无效的消息ID: {}", id);
                    None
                }
            })
            .collect();

        let resp: GetConversationMessagesResponse = if message_ids.is_empty() {
            info!(
                "[MsgAPI] 📡 分页获取会话消息: 会话={}, cursor={:?}, limit={:?}, reverse={:?}",
                params.conversation_short_id, params.cursor, params.limit, params.reverse
            );
            let body = GetConversationMessagesBody {
                app_id: self.client.app_id(),
                conversation_short_id: params.conversation_short_id,
                cursor: params.cursor,
                limit: params.limit,
                reverse: params.reverse,
            };
            self.client
                .call(action::GET_CONVERSATION_MESSAGES, &body)
                .await?
        } else {
            info!(
                "[MsgAPI] 📡 按ID获取消息: 会话={}, 数量={}",
                params.conversation_short_id,
                message_ids.len()
            );
            let body = GetMessagesBody {
                app_id: self.client.app_id(),
                conversation_short_id: params.conversation_short_id,
                message_ids,
            };
            self.client.call(action::GET_MESSAGES, &body).await?
        };

        if let Some(data) = &resp.data {
            info!(
                "[MsgAPI] ✅ 获取到 {} 条消息，hasMore={}, newCursor={}",
                data.messages.as_ref().map_or(0, Vec::len),
                data.has_more,
                data.new_cursor
            );
        }
        Ok(resp)
    }
}
