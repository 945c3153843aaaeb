//! 会话模块
//!
//! 会话的创建、修改、成员检查与销毁

pub mod api;
pub mod types;

// 重新导出主要类型
pub use api::ConversationApi;
pub use types::{
    ConversationInfo, CreateConversationData, CreateConversationParams,
    CreateConversationResponse, DestroyConversationParams, DestroyConversationResponse,
    IsUserInConversationData, IsUserInConversationParams, IsUserInConversationResponse,
    ModifyConversationParams, ModifyConversationResponse,
};
