//! 用户 HTTP API 客户端
//!
//! 负责所有用户相关的 OpenAPI 请求

use crate::im::client::ImClient;
use crate::im::types::action;
use crate::im::user::types::{
    BatchGetUserResponse, RegisterUsersParams, RegisterUsersResponse, UserIdsBody, UserIdsParams,
    UsersBody, UsersChangeResponse,
};
use anyhow::Result;
use tracing::{debug, info, warn};

/// 用户相关的 HTTP API 客户端
pub struct UserApi {
    client: ImClient,
}

impl UserApi {
    pub fn new(client: ImClient) -> Self {
        Self { client }
    }

    /// 注册用户到IM系统，支持批量注册
    ///
    /// 接口文档: https://www.volcengine.com/docs/6348/1125993
    pub async fn register_users(&self, params: &RegisterUsersParams) -> Result<RegisterUsersResponse> {
        info!("[UserAPI] 📡 注册用户，数量: {}", params.users.len());
        debug!(
            "[UserAPI]   用户ID: {:?}",
            params.users.iter().map(|u| u.user_id).collect::<Vec<_>>()
        );

        let body = UsersBody {
            app_id: self.client.app_id(),
            users: &params.users,
        };
        let resp: RegisterUsersResponse = self.client.call(action::REGISTER_USERS, &body).await?;
        log_failed_users("注册", &resp);
        Ok(resp)
    }

    /// 批量获取用户信息
    ///
    /// 接口文档: https://www.volcengine.com/docs/6348/1125995
    pub async fn batch_get_user(&self, params: &UserIdsParams) -> Result<BatchGetUserResponse> {
        info!("[UserAPI] 📡 批量获取用户，数量: {}", params.user_ids.len());
        let body = UserIdsBody {
            app_id: self.client.app_id(),
            user_ids: &params.user_ids,
        };
        let resp: BatchGetUserResponse = self.client.call(action::BATCH_GET_USER, &body).await?;
        if let Some(data) = &resp.data {
            info!(
                "[UserAPI] ✅ 获取到 {} 个用户，未找到 {} 个",
                data.users.len(),
                data.not_found_users.len()
            );
        }
        Ok(resp)
    }

    /// 批量更新用户信息
    ///
    /// 接口文档: https://www.volcengine.com/docs/6348/1125996
    pub async fn batch_update_user(&self, params: &RegisterUsersParams) -> Result<UsersChangeResponse> {
        info!("[UserAPI] 📡 批量更新用户，数量: {}", params.users.len());
        let body = UsersBody {
            app_id: self.client.app_id(),
            users: &params.users,
        };
        let resp: UsersChangeResponse = self.client.call(action::BATCH_UPDATE_USER, &body).await?;
        log_failed_users("更新", &resp);
        Ok(resp)
    }

    /// 注销用户
    ///
    /// 接口文档: https://www.volcengine.com/docs/6348/1125994
    pub async fn unregister_users(&self, params: &UserIdsParams) -> Result<UsersChangeResponse> {
        info!("[UserAPI] 📡 注销用户，数量: {}", params.user_ids.len());
        let body = UserIdsBody {
            app_id: self.client.app_id(),
            user_ids: &params.user_ids,
        };
        let resp: UsersChangeResponse = self.client.call(action::UNREGISTER_USERS, &body).await?;
        log_failed_users("注销", &resp);
        Ok(resp)
    }
}

fn log_failed_users(op: &str, resp: &UsersChangeResponse) {
    let failed = resp
        .data
        .as_ref()
        .and_then(|d| d.failed_users.as_ref())
        .map(|f| f.as_slice())
        .unwrap_or_default();
    for user in failed {
        warn!(
            "[UserAPI] ⚠️ {}失败: userId={}, code={}, reason={}, message={}",
            op, user.user_id, user.code, user.reason, user.message
        );
    }
}
