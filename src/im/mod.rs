//! 火山引擎 IM 服务端 SDK
//!
//! 用户、会话、消息三类 OpenAPI，外加 AppToken 签发与按名称分发的处理器。

pub mod auth;
pub mod client;
pub mod config;
pub mod conversation;
pub mod message;
pub mod process;
pub mod serialization;
pub mod sign;
pub mod types;
pub mod user;

// 重新导出常用类型
pub use auth::{AppToken, AppTokenParams};
pub use client::{ClientConfig, ImClient};
pub use config::VolcConfig;
pub use serialization::{Ext, MessageId};
pub use types::{
    ApiError, ConversationStatus, ConversationType, ImResponse, MessagePriority, MessageType,
    QueryDirection,
};
