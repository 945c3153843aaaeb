//! 用户 API DTO（请求和响应结构体）

use crate::im::serialization::{deserialize_lenient_ext, deserialize_vec_or_null, Ext};
use crate::im::types::ImResponse;
use serde::{Deserialize, Serialize};

/// 用户信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserInfo {
    /// 用户ID
    pub user_id: i64,
    /// 用户昵称，长度不能超过100字符
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nick_name: Option<String>,
    /// 用户标签，用于全员广播
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// 头像URL，长度不能超过500字符
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portrait: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_lenient_ext"
    )]
    pub ext: Option<Ext>,
}

impl UserInfo {
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            nick_name: None,
            tags: None,
            portrait: None,
            ext: None,
        }
    }

    pub fn with_nick_name(mut self, nick_name: impl Into<String>) -> Self {
        self.nick_name = Some(nick_name.into());
        self
    }

    pub fn with_portrait(mut self, portrait: impl Into<String>) -> Self {
        self.portrait = Some(portrait.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }
}

/// registerUsers / batchUpdateUser 的参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegisterUsersParams {
    pub users: Vec<UserInfo>,
}

/// batchGetUser / unRegisterUsers 的参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserIdsParams {
    pub user_ids: Vec<i64>,
}

/// 操作失败的用户
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FailedUser {
    pub user_id: i64,
    /// 失败原因
    #[serde(default)]
    pub reason: String,
    /// 错误码（字符串）
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// 注册/更新/注销的响应数据
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FailedUsersData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_users: Option<Vec<FailedUser>>,
}

/// batchGetUser 的响应数据
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchGetUserData {
    #[serde(default, deserialize_with = "deserialize_vec_or_null")]
    pub users: Vec<UserInfo>,
    #[serde(default, deserialize_with = "deserialize_vec_or_null")]
    pub not_found_users: Vec<i64>,
}

pub type RegisterUsersResponse = ImResponse<FailedUsersData>;
/// batchUpdateUser / unRegisterUsers 的响应
pub type UsersChangeResponse = ImResponse<FailedUsersData>;
pub type BatchGetUserResponse = ImResponse<BatchGetUserData>;

// ========== 发往 OpenAPI 的请求体 ==========

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct UsersBody<'a> {
    pub app_id: i64,
    pub users: &'a [UserInfo],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct UserIdsBody<'a> {
    pub app_id: i64,
    pub user_ids: &'a [i64],
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn register_params_use_pascal_case_and_omit_absent_fields() {
        let params = RegisterUsersParams {
            users: vec![
                UserInfo::new(10001)
                    .with_nick_name("alice")
                    .with_tags(vec!["vip".to_string()]),
                UserInfo::new(10002),
            ],
        };
        let v = serde_json::to_value(&params).unwrap();
        assert_eq!(
            v,
            json!({"Users": [
                {"UserId": 10001, "NickName": "alice", "Tags": ["vip"]},
                {"UserId": 10002}
            ]})
        );
        let back: RegisterUsersParams = serde_json::from_value(v).unwrap();
        assert_eq!(back, params);
    }

    #[test]
    fn user_id_is_required() {
        let err = serde_json::from_value::<RegisterUsersParams>(json!({"Users": [{"NickName": "x"}]}))
            .unwrap_err();
        assert!(err.to_string().contains("UserId"));
        assert!(serde_json::from_value::<RegisterUsersParams>(json!({})).is_err());
    }

    #[test]
    fn failed_users_response() {
        let resp: RegisterUsersResponse = serde_json::from_value(json!({
            "Code": 0,
            "Message": "success",
            "Data": {"FailedUsers": [
                {"UserId": 3, "Reason": "duplicated", "Code": "UserExist", "Message": "user exist"}
            ]}
        }))
        .unwrap();
        let failed = resp.data.unwrap().failed_users.unwrap();
        assert_eq!(failed[0].user_id, 3);
        assert_eq!(failed[0].code, "UserExist");

        let bare: RegisterUsersResponse =
            serde_json::from_value(json!({"Code": 0, "Message": "success", "Data": {}})).unwrap();
        assert_eq!(bare.data, Some(FailedUsersData::default()));
    }

    #[test]
    fn batch_get_tolerates_null_lists() {
        let data: BatchGetUserData =
            serde_json::from_value(json!({"Users": null, "NotFoundUsers": [9]})).unwrap();
        assert!(data.users.is_empty());
        assert_eq!(data.not_found_users, vec![9]);
    }

    #[test]
    fn body_carries_app_id() {
        let users = vec![UserInfo::new(1)];
        let body = UsersBody {
            app_id: 600,
            users: &users,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"AppId": 600, "Users": [{"UserId": 1}]})
        );
    }
}
