use std::time::Duration;

use chrono::{TimeZone, Utc};
use helix_sms::{Credentials, GatewayOutcome, Message, SmsClient, SmsError};
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> SmsClient {
    SmsClient::builder(Credentials::new("test", "rmJmnjZigiMXzNKtulP2"))
        .endpoint(format!("{}/smsservice/sendsms.php", server.uri()))
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

#[tokio::test]
async fn posts_utf8_form_in_gateway_field_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/smsservice/sendsms.php"))
        .and(header(
            "content-type",
            "application/x-www-form-urlencoded; charset=UTF-8",
        ))
        .and(body_string(
            "message=Hej+%C3%A5%C3%A4%C3%B6&extension=%2B46700634607%2C%2B46700634608\
             &key_name=test&key_value=rmJmnjZigiMXzNKtulP2&flash=&postpone=00%3A30+030624",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string("Message was sent."))
        .expect(1)
        .mount(&server)
        .await;

    let mut message = Message::new();
    message
        .set_message("Hej åäö")
        .set_recipients(["+46700634607", "+46700634608"])
        .unwrap()
        .postpone(Utc.with_ymd_and_hms(2024, 3, 5, 22, 30, 0).unwrap());

    let response = client_for(&server).send_as_flash(message).await.unwrap();
    assert_eq!(response.outcome, GatewayOutcome::Sent);
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn refusal_text_is_returned_not_raised() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Message was not sent."))
        .mount(&server)
        .await;

    let client = SmsClient::builder(Credentials::new("foo32", "0x0003b"))
        .endpoint(format!("{}/smsservice/sendsms.php", server.uri()))
        .build()
        .unwrap();

    let mut message = Message::new();
    message
        .set_message("This message should not be delivered.")
        .set_recipient("+46700634607")
        .unwrap();

    let response = client.send(message).await.unwrap();
    assert_eq!(response.outcome, GatewayOutcome::NotSent);
}

#[tokio::test]
async fn server_error_maps_to_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = client_for(&server).send(Message::new()).await.unwrap_err();
    match err {
        SmsError::HttpStatus { status, body } => {
            assert_eq!(status, 502);
            assert_eq!(body.as_deref(), Some("bad gateway"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_gateway_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = format!(
        "http://{}/smsservice/sendsms.php",
        listener.local_addr().unwrap()
    );
    drop(listener);

    let client = SmsClient::builder(Credentials::new("test", "key"))
        .endpoint(endpoint)
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();

    let err = client.send(Message::new()).await.unwrap_err();
    assert!(matches!(err, SmsError::Transport(_)));
}

#[tokio::test]
async fn slow_gateway_hits_configured_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("Message was sent.")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = SmsClient::builder(Credentials::new("test", "key"))
        .endpoint(format!("{}/smsservice/sendsms.php", server.uri()))
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();

    let err = client.send(Message::new()).await.unwrap_err();
    assert!(matches!(err, SmsError::Transport(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn spawned_send_can_be_bounded_by_caller_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("Message was sent.")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = SmsClient::builder(Credentials::new("test", "key"))
        .endpoint(format!("{}/smsservice/sendsms.php", server.uri()))
        .build()
        .unwrap();

    let handle = client.spawn_send(Message::new());
    let abort = handle.abort_handle();
    let outcome = tokio::time::timeout(Duration::from_millis(100), handle).await;
    assert!(outcome.is_err());
    abort.abort();
}
