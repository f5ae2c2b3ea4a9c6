//! Integration tests against a mock mailer service.

use httpmock::prelude::*;
use mailer_client::{Client, Error, Url};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

const TOKEN: &str = "sekrit";

fn client_for(server: &MockServer, auth_token: &str) -> Client {
    let base = Url::parse(&server.base_url()).unwrap();
    Client::new(base, auth_token)
}

#[tokio::test]
async fn send_enqueues_mail_with_exact_form_fields() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/send")
                .header("cookie", "auth=sekrit")
                .x_www_form_urlencoded_tuple("mailing_list", "list1")
                .x_www_form_urlencoded_tuple("template", "tmpl")
                .x_www_form_urlencoded_tuple("data", r#"{"k":"v"}"#)
                .x_www_form_urlencoded_tuple("email", "a@example.com")
                .x_www_form_urlencoded_tuple("subject", "Hi");
            then.status(202);
        })
        .await;

    let client = client_for(&server, TOKEN);
    let data = BTreeMap::from([("k", "v")]);
    client
        .send("list1", "tmpl", &data, "a@example.com", "Hi")
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn send_without_token_fails_before_any_request() {
    let server = MockServer::start_async().await;
    // Matches any request; the test fails if the client reaches the network.
    let any = server
        .mock_async(|_when, then| {
            then.status(202);
        })
        .await;

    let client = client_for(&server, "");
    let err = client
        .send("list1", "tmpl", &BTreeMap::from([("k", "v")]), "a@example.com", "Hi")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::AuthTokenRequired));
    any.assert_hits_async(0).await;
}

#[tokio::test]
async fn send_rejects_unexpected_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/send");
            then.status(500);
        })
        .await;

    let client = client_for(&server, TOKEN);
    let err = client
        .send("list1", "tmpl", &BTreeMap::from([("k", "v")]), "a@example.com", "Hi")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidServiceBehavior(s) if s.as_u16() == 500));
}

#[tokio::test]
async fn send_with_unencodable_data_fails_locally() {
    let server = MockServer::start_async().await;
    let any = server
        .mock_async(|_when, then| {
            then.status(202);
        })
        .await;

    let client = client_for(&server, TOKEN);
    // JSON object keys must be strings; a byte-vector key cannot be encoded.
    let data = HashMap::from([(vec![0u8], "v")]);
    let err = client
        .send("list1", "tmpl", &data, "a@example.com", "Hi")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Json(_)));
    any.assert_hits_async(0).await;
}

#[tokio::test]
async fn send_does_not_replay_server_cookies() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/send")
                .header("cookie", "auth=sekrit");
            then.status(202).header("set-cookie", "auth=evil; Path=/");
        })
        .await;

    let client = client_for(&server, TOKEN);
    for _ in 0..2 {
        client
            .send("list1", "tmpl", &BTreeMap::from([("k", "v")]), "a@example.com", "Hi")
            .await
            .unwrap();
    }

    // Both requests carried the configured token, untouched by the
    // server-set cookie in between.
    mock.assert_hits_async(2).await;
}

#[tokio::test]
async fn status_ok_on_no_content() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/status");
            then.status(204);
        })
        .await;

    let client = client_for(&server, "");
    client.status().await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn status_rejects_unexpected_status() {
    for status in [200u16, 503] {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/status");
                then.status(status);
            })
            .await;

        let client = client_for(&server, "");
        let err = client.status().await.unwrap_err();

        assert!(matches!(err, Error::InvalidServiceBehavior(s) if s.as_u16() == status));
    }
}

#[tokio::test]
async fn status_sends_no_cookie() {
    let server = MockServer::start_async().await;
    let with_cookie = server
        .mock_async(|when, then| {
            when.method(GET).path("/status").header_exists("cookie");
            then.status(204);
        })
        .await;
    let bare = server
        .mock_async(|when, then| {
            when.method(GET).path("/status");
            then.status(204);
        })
        .await;

    // Even a client holding a token keeps it off unauthenticated calls.
    let client = client_for(&server, TOKEN);
    client.status().await.unwrap();

    with_cookie.assert_hits_async(0).await;
    bare.assert_hits_async(1).await;
}

#[tokio::test]
async fn status_is_idempotent() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/status");
            then.status(204);
        })
        .await;

    let client = client_for(&server, "");
    for _ in 0..3 {
        client.status().await.unwrap();
    }

    mock.assert_hits_async(3).await;
}

#[tokio::test]
async fn unsubscribe_posts_to_list_path() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/unsubscribe/42")
                .x_www_form_urlencoded_tuple("email", "a@example.com");
            then.status(200);
        })
        .await;

    let client = client_for(&server, "");
    client.unsubscribe(42, "a@example.com").await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn unsubscribe_rejects_unexpected_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/unsubscribe/42");
            then.status(404);
        })
        .await;

    let client = client_for(&server, "");
    let err = client.unsubscribe(42, "a@example.com").await.unwrap_err();

    assert!(matches!(err, Error::InvalidServiceBehavior(s) if s.as_u16() == 404));
}

#[tokio::test]
async fn elapsed_timeout_is_a_transport_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/status");
            then.status(204).delay(Duration::from_secs(2));
        })
        .await;

    let mut client = client_for(&server, "");
    client.set_timeout(Duration::from_millis(100));
    let err = client.status().await.unwrap_err();

    match err {
        Error::Request(e) => assert!(e.is_timeout()),
        other => panic!("expected a transport error, got {other:?}"),
    }
}
