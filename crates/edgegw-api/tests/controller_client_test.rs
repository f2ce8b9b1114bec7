#![allow(clippy::unwrap_used)]
// Integration tests for `ControllerClient` using wiremock.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use edgegw_api::{ControllerClient, EdgePlatformInterface, Error, UpdateEdgeGatewayRequest};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ControllerClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ControllerClient::with_client(reqwest::Client::new(), base_url);
    client.set_cid(SecretString::from("cid-123".to_string()));
    (server, client)
}

fn lan() -> EdgePlatformInterface {
    EdgePlatformInterface {
        ifname: "eth1".into(),
        if_type: "LAN".into(),
        ipaddr: "10.10.0.1/24".into(),
        admin_state: "enabled".into(),
        ..EdgePlatformInterface::default()
    }
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn test_login_stores_cid() {
    let server = MockServer::start().await;
    let client =
        ControllerClient::with_client(reqwest::Client::new(), Url::parse(&server.uri()).unwrap());

    Mock::given(method("POST"))
        .and(path("/v1/api"))
        .and(body_string_contains("action=login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "return": true, "results": "ok", "CID": "fresh" })),
        )
        .mount(&server)
        .await;

    assert!(!client.is_authenticated());
    let secret = SecretString::from("pw".to_string());
    client.login("admin", &secret).await.unwrap();
    assert!(client.is_authenticated());
}

#[tokio::test]
async fn test_login_rejected() {
    let server = MockServer::start().await;
    let client =
        ControllerClient::with_client(reqwest::Client::new(), Url::parse(&server.uri()).unwrap());

    Mock::given(method("POST"))
        .and(path("/v1/api"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "return": false, "reason": "Invalid username or password" })),
        )
        .mount(&server)
        .await;

    let secret = SecretString::from("wrong".to_string());
    let result = client.login("admin", &secret).await;
    match result {
        Err(Error::Authentication { ref message }) => {
            assert!(message.contains("Invalid username"), "got: {message}");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_action_without_cid_fails_locally() {
    let server = MockServer::start().await;
    let client =
        ControllerClient::with_client(reqwest::Client::new(), Url::parse(&server.uri()).unwrap());

    let result = client.get_gateway_info("edge-1").await;
    assert!(matches!(result, Err(Error::NotAuthenticated)), "got: {result:?}");
}

// ── Read ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_gateway_info() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/api"))
        .and(query_param("action", "get_gateway_info"))
        .and(query_param("CID", "cid-123"))
        .and(query_param("gateway_name", "edge-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "return": true,
            "results": {
                "name": "edge-1",
                "vpc_id": "site-a",
                "vpc_state": "up",
                "status": "running"
            }
        })))
        .mount(&server)
        .await;

    let info = client.get_gateway_info("edge-1").await.unwrap();
    assert_eq!(info.name, "edge-1");
    assert_eq!(info.vpc_id.as_deref(), Some("site-a"));
    assert_eq!(info.site_id, None);
    assert_eq!(info.status.as_deref(), Some("running"));
}

#[tokio::test]
async fn test_missing_gateway_is_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "return": false,
            "reason": "Gateway edge-1 does not exist"
        })))
        .mount(&server)
        .await;

    let err = client.get_gateway_info("edge-1").await.unwrap_err();
    assert!(err.is_not_found(), "expected not-found, got: {err:?}");
}

#[tokio::test]
async fn test_endpoint_404_is_not_an_absent_gateway() {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/wrong-prefix", server.uri())).unwrap();
    let client = ControllerClient::with_client(reqwest::Client::new(), base_url);
    client.set_cid(SecretString::from("cid-123".to_string()));

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(404).set_body_string("<html>404 Not Found nginx</html>"),
        )
        .mount(&server)
        .await;

    let err = client.get_gateway_info("edge-1").await.unwrap_err();
    assert!(matches!(err, Error::Http { status: 404, .. }), "got: {err:?}");
    assert!(!err.is_not_found(), "a bare 404 must not read as absence: {err:?}");
}

#[tokio::test]
async fn test_malformed_body_is_transient() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/api"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway timeout</html>"))
        .mount(&server)
        .await;

    let err = client.get_gateway_info("edge-1").await.unwrap_err();
    assert!(matches!(err, Error::Deserialization { .. }), "got: {err:?}");
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_expired_cid() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "return": false,
            "reason": "CID is invalid or expired."
        })))
        .mount(&server)
        .await;

    let err = client.get_gateway_info("edge-1").await.unwrap_err();
    assert!(matches!(err, Error::SessionExpired), "got: {err:?}");
}

// ── Mutations ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_update_sends_encoded_interfaces() {
    let (server, client) = setup().await;

    let expected = UpdateEdgeGatewayRequest::new("edge-1", &[lan()]).unwrap();
    let blob = expected.interfaces.clone().unwrap();

    Mock::given(method("POST"))
        .and(path("/v2/api"))
        .and(body_partial_json(json!({
            "action": "update_edge_gateway",
            "CID": "cid-123",
            "name": "edge-1",
            "interfaces": blob,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "return": true })))
        .expect(1)
        .mount(&server)
        .await;

    client.update_edge_gateway("edge-1", &[lan()]).await.unwrap();
}

#[tokio::test]
async fn test_delete_forwards_key_fields() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v2/api"))
        .and(body_partial_json(json!({
            "action": "delete_edge_csp_gateway",
            "project_id": "proj-1",
            "device_id": "dev-1",
            "name": "edge-1",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "return": true })))
        .expect(1)
        .mount(&server)
        .await;

    client
        .delete_edge_gateway("proj-1", "dev-1", "edge-1")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_rejected_mutation_names_action() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v2/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "return": false,
            "reason": "Device dev-1 is already bound"
        })))
        .mount(&server)
        .await;

    let err = client
        .delete_edge_gateway("proj-1", "dev-1", "edge-1")
        .await
        .unwrap_err();
    match err {
        Error::Api { ref action, ref reason } => {
            assert_eq!(action, "delete_edge_csp_gateway");
            assert!(reason.contains("already bound"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_maps_to_http() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v2/api"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = client
        .update_edge_gateway("edge-1", &[lan()])
        .await
        .unwrap_err();
    assert!(
        matches!(err, Error::Http { status: 503, .. }),
        "expected HTTP 503, got: {err:?}"
    );
}
