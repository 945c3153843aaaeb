//! 针对模拟 OpenAPI 服务的端到端测试

use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Once;
use volc_im_sdk::im::conversation::IsUserInConversationParams;
use volc_im_sdk::im::message::{GetConversationMessagesParams, SendMessageParams};
use volc_im_sdk::im::types::MessageType;
use volc_im_sdk::im::user::{RegisterUsersParams, UserInfo};
use volc_im_sdk::im::MessageId;
use volc_im_sdk::{process, ClientConfig, ImClient, ImResponse};
use wiremock::matchers::{body_partial_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

static INIT_LOGGER: Once = Once::new();

fn parse_bare_envelope<T: serde::de::DeserializeOwned>() -> ImResponse<T> {
    serde_json::from_value(json!({"Code": 1, "Message": "x"})).unwrap()
}

#[test]
fn every_response_accepts_envelope_without_data() {
    use volc_im_sdk::im::conversation::{
        CreateConversationResponse, DestroyConversationResponse, IsUserInConversationResponse,
        ModifyConversationResponse,
    };
    use volc_im_sdk::im::message::{
        DeleteConversationMessageResponse, GetConversationMessagesResponse,
        RecallMessageResponse, SendMessageResponse,
    };
    use volc_im_sdk::im::user::RegisterUsersResponse;

    let r: RegisterUsersResponse = parse_bare_envelope();
    assert!(r.data.is_none());
    let r: CreateConversationResponse = parse_bare_envelope();
    assert!(r.data.is_none());
    let r: ModifyConversationResponse = parse_bare_envelope();
    assert!(r.data.is_none());
    let r: IsUserInConversationResponse = parse_bare_envelope();
    assert!(r.data.is_none());
    let r: SendMessageResponse = parse_bare_envelope();
    assert!(r.data.is_none());
    let r: RecallMessageResponse = parse_bare_envelope();
    assert!(r.data.is_none());
    let r: DeleteConversationMessageResponse = parse_bare_envelope();
    assert!(r.data.is_none());
    let r: GetConversationMessagesResponse = parse_bare_envelope();
    assert!(r.data.is_none());
    let r: DestroyConversationResponse = parse_bare_envelope();
    assert_eq!(r.code, 1);
    assert_eq!(r.message, "x");
    assert!(r.data.is_none());
}

fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("volc_im_sdk=debug")
            .with_test_writer()
            .try_init();
    });
}

fn client_for(server: &MockServer) -> ImClient {
    init_test_logger();
    ImClient::new(ClientConfig::new(600123, "AKLT-test", "c2VjcmV0").with_endpoint(server.uri()))
        .unwrap()
}

fn ok_reply(action: &str, result: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "ResponseMetadata": {
            "RequestId": "20240101000000",
            "Action": action,
            "Version": "2020-12-01",
            "Service": "im",
            "Region": "cn-north-1"
        },
        "Result": result
    }))
}

#[tokio::test]
async fn register_users_is_signed_and_wrapped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .and(query_param("Action", "RegisterUsers"))
        .and(query_param("Version", "2020-12-01"))
        .and(header_exists("authorization"))
        .and(header_exists("x-date"))
        .and(header_exists("x-content-sha256"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "AppId": 600123,
            "Users": [{"UserId": 10001, "NickName": "alice"}]
        })))
        .respond_with(ok_reply(
            "RegisterUsers",
            json!({"FailedUsers": [
                {"UserId": 10002, "Reason": "exist", "Code": "UserExist", "Message": "user exist"}
            ]}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let params = RegisterUsersParams {
        users: vec![
            UserInfo::new(10001).with_nick_name("alice"),
            UserInfo::new(10002),
        ],
    };
    let resp = client_for(&server)
        .users()
        .register_users(&params)
        .await
        .unwrap();

    assert!(resp.is_success());
    assert_eq!(resp.message, "success");
    let failed = resp.data.unwrap().failed_users.unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].code, "UserExist");
}

#[tokio::test]
async fn remote_error_becomes_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(query_param("Action", "DestroyConversation"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "ResponseMetadata": {
                "RequestId": "r-1",
                "Action": "DestroyConversation",
                "Error": {"CodeN": 100009, "Code": "InvalidParameter", "Message": "conversation not found"}
            }
        })))
        .mount(&server)
        .await;

    let value = process::run(
        &client_for(&server),
        "volc.im.destroyConversation",
        json!({"ConversationShortId": 42}),
    )
    .await
    .unwrap();

    assert_eq!(
        value,
        json!({"Code": 100009, "Message": "InvalidParameter: conversation not found"})
    );
}

#[tokio::test]
async fn unparseable_failure_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .conversations()
        .destroy_conversation(&serde_json::from_value(json!({"ConversationShortId": 1})).unwrap())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("502"));
}

#[tokio::test]
async fn message_ids_switch_to_get_messages() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(query_param("Action", "GetMessages"))
        .and(body_partial_json(json!({
            "AppId": 600123,
            "ConversationShortId": 7,
            "MessageIds": [1, 2]
        })))
        .respond_with(ok_reply(
            "GetMessages",
            json!({"Messages": [{
                "MessageId": 1,
                "ConversationShortId": 7,
                "Sender": 10001,
                "Content": "hi",
                "MsgType": 10001
            }]}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let mut params = GetConversationMessagesParams::new(7);
    params.message_ids = Some(vec![
        MessageId::from(1),
        MessageId::from("2"),
        MessageId::from("not-a-number"),
    ]);
    let resp = client_for(&server)
        .messages()
        .get_conversation_messages(&params)
        .await
        .unwrap();

    let data = resp.data.unwrap();
    assert!(!data.has_more);
    let messages = data.messages.unwrap();
    assert_eq!(messages[0].sender_user_id, 10001);
    assert_eq!(messages[0].message_type, MessageType::Text);
}

#[tokio::test]
async fn paging_query_without_ids() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(query_param("Action", "GetConversationMessages"))
        .and(body_partial_json(json!({"ConversationShortId": 7, "Limit": 20, "Reverse": 1})))
        .respond_with(ok_reply(
            "GetConversationMessages",
            json!({"HasMore": true, "NewCursor": 123, "Messages": null}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let value = process::run(
        &client_for(&server),
        "getConversationMessages",
        json!({"ConversationShortId": 7, "Limit": 20, "Reverse": 1, "MessageIds": []}),
    )
    .await
    .unwrap();
    assert_eq!(
        value,
        json!({"Code": 0, "Message": "success", "Data": {"HasMore": true, "NewCursor": 123}})
    );
}

#[tokio::test]
async fn participant_user_id_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(query_param("Action", "IsUserInConversation"))
        .and(body_partial_json(json!({"ConversationShortId": 5, "ParticipantUserId": 3})))
        .respond_with(ok_reply(
            "IsUserInConversation",
            json!({"IsUserInConversation": true}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let params = IsUserInConversationParams {
        conversation_short_id: 5,
        user_id: 2,
        participant_user_id: Some(3),
    };
    let resp = client_for(&server)
        .conversations()
        .is_user_in_conversation(&params)
        .await
        .unwrap();
    assert!(resp.data.unwrap().is_in_conversation);
}

#[tokio::test]
async fn send_message_maps_sender_and_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(query_param("Action", "SendMessage"))
        .and(body_partial_json(json!({
            "AppId": 600123,
            "ConversationShortId": 9,
            "Sender": 10001,
            "Content": "{\"text\":\"hello\"}",
            "MsgType": 10001
        })))
        .respond_with(ok_reply(
            "SendMessage",
            json!({"MessageId": 7300000000000000001i64}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let params = SendMessageParams::new(9, 10001, "{\"text\":\"hello\"}")
        .with_message_type(MessageType::Text);
    let resp = client_for(&server)
        .messages()
        .send_message(&params)
        .await
        .unwrap();
    assert_eq!(
        resp.data.unwrap().message_id,
        MessageId::Number(7300000000000000001)
    );
}

#[tokio::test]
async fn recall_converts_string_message_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(query_param("Action", "RecallMessage"))
        .and(body_partial_json(json!({"ConversationShortId": 1, "MessageId": 7012})))
        .respond_with(ok_reply("RecallMessage", json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let value = process::run(
        &client_for(&server),
        "recallMessage",
        json!({"ConversationShortId": 1, "MessageId": "7012"}),
    )
    .await
    .unwrap();
    assert_eq!(value, json!({"Code": 0, "Message": "success", "Data": {}}));
}
