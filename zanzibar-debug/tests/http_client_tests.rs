//! HTTP expansion client tests against a mock authorization API

use mockito::Matcher;
use serde_json::json;
use zanzibar_debug::*;

const STORE: &str = "01HVB8GBE194NYZR9W3QP0VP05";

fn client_for(server: &mockito::ServerGuard) -> HttpExpandClient {
    HttpExpandClient::new(ClientConfig::new(&server.url(), STORE).with_request_timeout(5)).unwrap()
}

#[tokio::test]
async fn test_expand_posts_tuple_key_and_decodes_tree() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", format!("/stores/{}/expand", STORE).as_str())
        .match_body(Matcher::Json(json!({
            "tuple_key": {"object": "document:1", "relation": "viewer"}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "tree": {
                    "root": {
                        "name": "document:1#viewer",
                        "leaf": {"users": {"users": ["user:anne"]}}
                    }
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let tree = client_for(&server)
        .expand("document:1", "viewer")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(tree.name, "document:1#viewer");
    assert_eq!(tree.leaf, Some(Leaf::users(["user:anne"])));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_null_body_means_no_tree() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("null")
        .create_async()
        .await;

    let tree = client_for(&server).expand("user:anne", "viewer").await.unwrap();
    assert!(tree.is_none());
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", Matcher::Any)
        .with_status(400)
        .with_body(r#"{"code":"validation_error"}"#)
        .create_async()
        .await;

    let result = client_for(&server).expand("document:1", "nope").await;
    match result {
        Err(DebugError::Service { status, body }) => {
            assert_eq!(status, 400);
            assert!(body.contains("validation_error"));
        }
        other => panic!("expected service error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_garbage_body_is_a_decode_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", Matcher::Any)
        .with_status(200)
        .with_body("<html>proxy error</html>")
        .create_async()
        .await;

    let result = client_for(&server).expand("document:1", "viewer").await;
    assert!(matches!(result, Err(DebugError::Decode(_))));
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .match_header("authorization", "Bearer s3cret")
        .with_status(200)
        .with_body("null")
        .create_async()
        .await;

    let client = HttpExpandClient::new(
        ClientConfig::new(&server.url(), STORE).with_api_token(Some("s3cret".to_string())),
    )
    .unwrap();

    client.expand("document:1", "viewer").await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_service_degrades_to_fallback() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let debugger = PermissionDebugger::connect(
        ClientConfig::new(&server.url(), STORE).with_request_timeout(5),
        ExpanderConfig::default(),
    )
    .unwrap();

    let explanation = debugger.explain("document:1", "viewer", "user:anne").await;
    assert!(!explanation.found());
    assert_eq!(explanation.path.color, NEUTRAL_COLOR);
    assert!(explanation.graph.has_node("document:1#viewer"));
    assert!(explanation.graph.has_node("user:anne"));
}
