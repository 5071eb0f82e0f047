//! End-to-end tests against a mock push provider over real HTTP.

use assert_matches::assert_matches;
use mipush_client::MiPushClient;
use mipush_core::{Message, PushError, TopicOp};
use mipush_settings::PushSettings;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(server: &MockServer) -> PushSettings {
    PushSettings::new("s3cret", vec!["com.example.app".into()]).with_host(server.uri())
}

fn ok_send(id: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "result": "ok",
        "trace_id": "Xcm1",
        "code": 0,
        "data": {"id": id},
        "description": "成功",
        "info": "Received push messages for 1 REGID"
    }))
}

#[tokio::test]
async fn send_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/message/regid"))
        .and(header("authorization", "key=s3cret"))
        .and(header(
            "content-type",
            "application/x-www-form-urlencoded;charset=UTF-8",
        ))
        .and(body_string_contains("restricted_package_name=com.example.app"))
        .and(body_string_contains("registration_id=abc"))
        .respond_with(ok_send("slm001"))
        .expect(1)
        .mount(&server)
        .await;

    let client = MiPushClient::new(&settings(&server)).unwrap();
    let result = client
        .send(
            &Message::android("Hi", "There").with_payload("{\"k\":1}"),
            "abc",
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert!(result.is_ok());
    assert_eq!(result.message_id(), Some("slm001"));
    assert_eq!(result.trace_id, "Xcm1");
}

#[tokio::test]
async fn server_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .expect(1)
        .mount(&server)
        .await;

    let client = MiPushClient::new(&settings(&server)).unwrap();
    let err = client
        .broadcast_all(&Message::android("t", "d"), &CancellationToken::new())
        .await
        .unwrap_err();
    assert_matches!(err, PushError::Provider { status: 500, ref body } if body == "internal");
}

#[tokio::test]
async fn provider_error_envelope_decodes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/message/multi_topic"))
        .and(body_string_contains("topic_op=UNION"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "error",
            "code": 10017,
            "reason": "topic limit",
            "description": "bad request"
        })))
        .mount(&server)
        .await;

    let client = MiPushClient::new(&settings(&server)).unwrap();
    let topics = vec!["a".to_string(), "b".to_string()];
    let result = client
        .multi_topic_broadcast(
            &Message::android("t", "d"),
            &topics,
            TopicOp::Union,
            &CancellationToken::new(),
        )
        .await
        .unwrap();
    assert!(!result.is_ok());
    assert_eq!(result.code, 10017);
    assert_eq!(result.message_id(), None);
}

#[tokio::test]
async fn stats_query_decodes_counters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/stats/message/counters"))
        .and(query_param("start_date", "20240101"))
        .and(query_param("end_date", "20240102"))
        .and(query_param("restricted_package_name", "com.example.app"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "ok",
            "code": 0,
            "data": {"data": [
                {"date": "20240101", "received": 10, "click": 2, "useraccount_recipients": 4},
                {"date": "20240102", "received": 7}
            ]}
        })))
        .mount(&server)
        .await;

    let client = MiPushClient::new(&settings(&server)).unwrap();
    let result = client
        .stats("20240101", "20240102", "com.example.app", &CancellationToken::new())
        .await
        .unwrap();
    let days = result.data.unwrap().data;
    assert_eq!(days.len(), 2);
    assert_eq!(days[0].received, 10);
    assert_eq!(days[0].user_account_recipients, 4);
    assert_eq!(days[1].click, 0);
}

#[tokio::test]
async fn message_status_decodes_trace() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/trace/message/status"))
        .and(query_param("msg_id", "m1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "ok",
            "code": 0,
            "data": {"data": {"id": "m1", "delivered": 9, "delivery_rate": "90%", "msg_type": "Common"}}
        })))
        .mount(&server)
        .await;

    let client = MiPushClient::new(&settings(&server)).unwrap();
    let result = client
        .message_status("m1", &CancellationToken::new())
        .await
        .unwrap();
    let status = result.data.unwrap().data;
    assert_eq!(status.id, "m1");
    assert_eq!(status.delivered, 9);
    assert_eq!(status.delivery_rate, "90%");
}

#[tokio::test]
async fn unreachable_host_exhausts_attempts() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let settings =
        PushSettings::new("s", vec!["com.a".into()]).with_host(format!("http://{addr}"));
    let client = MiPushClient::new(&settings).unwrap();

    let err = client
        .aliases_of("r1", &CancellationToken::new())
        .await
        .unwrap_err();
    assert_matches!(err, PushError::Transport { attempts: 3, .. });
}

#[tokio::test]
async fn unreachable_host_with_cancelled_token() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let settings =
        PushSettings::new("s", vec!["com.a".into()]).with_host(format!("http://{addr}"));
    let client = MiPushClient::new(&settings).unwrap();

    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = client.topics_of("r1", &cancel).await.unwrap_err();
    assert_matches!(err, PushError::Cancelled { attempts: 1 });
}
