//! 用户模块
//!
//! 用户注册、查询、更新与注销

pub mod api;
pub mod types;

// 重新导出主要类型
pub use api::UserApi;
pub use types::{
    BatchGetUserData, BatchGetUserResponse, FailedUser, FailedUsersData, RegisterUsersParams,
    RegisterUsersResponse, UserIdsParams, UserInfo, UsersChangeResponse,
};
