//! 按名称分发的处理器（`volc.im.<method>`）
//!
//! 入参与返回值都是 JSON，方便脚本或 CLI 直接调用。

use crate::im::auth::AppTokenParams;
use crate::im::client::ImClient;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

/// 处理器分组名
pub const GROUP: &str = "volc.im";

/// 已注册的方法
pub const METHODS: &[&str] = &[
    "registerUsers",
    "batchGetUser",
    "unRegisterUsers",
    "batchUpdateUser",
    "createConversation",
    "modifyConversation",
    "isUserInConversation",
    "sendMessage",
    "recallMessage",
    "deleteConversationMessage",
    "getConversationMessages",
    "destroyConversation",
    "getAppToken",
];

/// 执行一个处理器
///
/// `method` 可以带或不带 `volc.im.` 前缀。远端业务错误以 `{Code, Message}` 返回，
/// 参数错误、网络错误等本地失败返回 `Err`。
pub async fn run(client: &ImClient, method: &str, args: Value) -> Result<Value> {
    let name = method
        .strip_prefix(GROUP)
        .and_then(|rest| rest.strip_prefix('.'))
        .unwrap_or(method);

    info!("[Process] ▶️ {}.{}", GROUP, name);
    debug!("[Process]   参数: {}", args);

    match name {
        "registerUsers" => respond(client.users().register_users(&parse_args(name, args)?).await?),
        "batchGetUser" => respond(client.users().batch_get_user(&parse_args(name, args)?).await?),
        "unRegisterUsers" => {
            respond(client.users().unregister_users(&parse_args(name, args)?).await?)
        }
        "batchUpdateUser" => {
            respond(client.users().batch_update_user(&parse_args(name, args)?).await?)
        }
        "createConversation" => respond(
            client
                .conversations()
                .create_conversation(&parse_args(name, args)?)
                .await?,
        ),
        "modifyConversation" => respond(
            client
                .conversations()
                .modify_conversation(&parse_args(name, args)?)
                .await?,
        ),
        "isUserInConversation" => respond(
            client
                .conversations()
                .is_user_in_conversation(&parse_args(name, args)?)
                .await?,
        ),
        "destroyConversation" => respond(
            client
                .conversations()
                .destroy_conversation(&parse_args(name, args)?)
                .await?,
        ),
        "sendMessage" => respond(client.messages().send_message(&parse_args(name, args)?).await?),
        "recallMessage" => {
            respond(client.messages().recall_message(&parse_args(name, args)?).await?)
        }
        "deleteConversationMessage" => respond(
            client
                .messages()
                .delete_conversation_message(&parse_args(name, args)?)
                .await?,
        ),
        "getConversationMessages" => respond(
            client
                .messages()
                .get_conversation_messages(&parse_args(name, args)?)
                .await?,
        ),
        "getAppToken" => {
            let params: AppTokenParams = parse_args(name, args)?;
            respond(client.app_token(params.user_id, params.expire_time)?)
        }
        _ => Err(anyhow::anyhow!("未注册的方法: {}.{}", GROUP, name)),
    }
}

fn parse_args<T: DeserializeOwned>(method: &str, args: Value) -> Result<T> {
    serde_json::from_value(args).with_context(|| format!("{}.{} 参数无效", GROUP, method))
}

fn respond<T: Serialize>(value: T) -> Result<Value> {
    serde_json::to_value(value).context("序列化响应失败")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::im::client::ClientConfig;
    use serde_json::json;

    fn client() -> ImClient {
        ImClient::new(
            ClientConfig::new(600, "ak", "sk")
                .with_endpoint("http://127.0.0.1:9")
                .with_app_key("MDEyMzQ1Njc4OWFiY2RlZg=="),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn unknown_method_is_rejected() {
        let err = run(&client(), "volc.im.nope", json!({})).await.unwrap_err();
        assert_eq!(err.to_string(), "未注册的方法: volc.im.nope");
    }

    #[tokio::test]
    async fn invalid_args_fail_before_any_request() {
        let err = run(&client(), "sendMessage", json!({"ConversationShortId": 1}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("volc.im.sendMessage"));

        let err = run(
            &client(),
            "recallMessage",
            json!({"ConversationShortId": 1, "MessageId": "abc"}),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("MessageId must be a valid integer"));
    }

    #[tokio::test]
    async fn app_token_is_issued_locally() {
        let value = run(
            &client(),
            "volc.im.getAppToken",
            json!({"UserId": 10001, "ExpireTime": 30}),
        )
        .await
        .unwrap();
        assert_eq!(value["UserId"], 10001);
        assert_eq!(value["AppId"], 600);
        assert!(!value["Token"].as_str().unwrap().is_empty());
        assert!(value["ExpireTime"].as_i64().unwrap() > chrono::Utc::now().timestamp_millis());
    }

    #[test]
    fn every_method_is_listed_once() {
        let mut names = METHODS.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 13);
    }
}
