//! 消息模块
//!
//! 发送、撤回、删除与查询会话消息

pub mod api;
pub mod types;

// 重新导出主要类型
pub use api::MessageApi;
pub use types::{
    DeleteConversationMessageParams, DeleteConversationMessageResponse,
    GetConversationMessagesData, GetConversationMessagesParams, GetConversationMessagesResponse,
    Message, RecallMessageParams, RecallMessageResponse, RefMsgInfo, ReferencedMessage,
    SendMessageData, SendMessageParams, SendMessageResponse,
};
