use serde_json::{Value, json};
use serp_http::{Auth, HttpClient, HttpError, RequestOpts};
use std::borrow::Cow;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> HttpClient {
    HttpClient::new(&format!("{}/search", server.uri())).expect("valid base")
}

#[tokio::test]
async fn appends_query_and_auth_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "rust lang"))
        .and(query_param("api_key", "k-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let opts = RequestOpts {
        query: Some(vec![("q", Cow::Borrowed("rust lang"))]),
        auth: Some(Auth {
            name: "api_key",
            value: Cow::Borrowed("k-123"),
        }),
    };
    let got: Value = client.get_json("", opts).await.expect("success");
    assert_eq!(got, json!({"ok": true}));
}

#[tokio::test]
async fn non_success_status_maps_to_api_error_with_upstream_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid API key."})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .get_json::<Value>("", RequestOpts::default())
        .await
        .unwrap_err();

    assert_eq!(err.status().map(|s| s.as_u16()), Some(401));
    match err {
        HttpError::Api { message, .. } => assert_eq!(message, "Invalid API key."),
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn invalid_json_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .get_json::<Value>("", RequestOpts::default())
        .await
        .unwrap_err();

    match err {
        HttpError::Decode(_, snippet) => assert!(snippet.contains("nope")),
        other => panic!("expected Decode error, got {other:?}"),
    }
}

#[tokio::test]
async fn connection_refused_is_a_network_error_without_secret() {
    // Bind and immediately release a port so nothing listens there.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let base = format!("http://127.0.0.1:{port}/search");

    let client = HttpClient::new(&base).unwrap();
    let opts = RequestOpts {
        auth: Some(Auth {
            name: "api_key",
            value: Cow::Borrowed("do-not-leak"),
        }),
        query: None,
    };
    let err = client.get_json::<Value>("", opts).await.unwrap_err();

    assert!(matches!(err, HttpError::Network(_)));
    let text = err.to_string();
    assert!(!text.contains("do-not-leak"));
    // The connect failure itself, not just reqwest's top-level summary.
    assert!(text.to_lowercase().contains("connect"), "{text}");
}

#[tokio::test]
async fn non_string_error_field_reports_body_snippet() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(429).set_body_json(json!({"error": {"code": 429}})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .get_json::<Value>("", RequestOpts::default())
        .await
        .unwrap_err();

    match err {
        HttpError::Api { status, message } => {
            assert_eq!(status.as_u16(), 429);
            assert!(message.contains("\"code\":429"), "{message}");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[test]
fn rejects_unparseable_base() {
    assert!(matches!(HttpClient::new("not a url"), Err(HttpError::Url(_))));
}
