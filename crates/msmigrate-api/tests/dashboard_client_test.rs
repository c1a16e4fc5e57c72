#![allow(clippy::unwrap_used)]
// Integration tests for `DashboardClient` using wiremock.

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use msmigrate_api::{DashboardClient, DeviceUpdate, Error, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, DashboardClient) {
    let server = MockServer::start().await;
    let transport = TransportConfig::default().with_retry_backoff(Duration::ZERO);
    let key = SecretString::from("test-key".to_string());
    let client =
        DashboardClient::from_api_key(&format!("{}/api/v1", server.uri()), &key, &transport)
            .unwrap();
    (server, client)
}

fn api_path(suffix: &str) -> String {
    format!("/api/v1/{suffix}")
}

// ── Device tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_device_sends_bearer_key() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("devices/Q2AA-AAAA-AAAA")))
        .and(header("Authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "serial": "Q2AA-AAAA-AAAA",
            "name": "closet-1",
            "model": "MS120-8",
            "mac": "00:18:0a:00:00:01",
            "tags": ["floor-2"],
            "address": "1 Main St"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let device = client.get_device("Q2AA-AAAA-AAAA").await.unwrap();

    assert_eq!(device.serial, "Q2AA-AAAA-AAAA");
    assert_eq!(device.name.as_deref(), Some("closet-1"));
    assert_eq!(device.tags, vec!["floor-2".to_string()]);
    assert!(device.has_tag("floor-2"));
}

#[tokio::test]
async fn test_update_device_sends_only_set_fields() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path(api_path("devices/Q2AA-AAAA-AAAA")))
        .and(body_json(json!({"tags": ["a", "undeployed"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "serial": "Q2AA-AAAA-AAAA",
            "tags": ["a", "undeployed"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let update = DeviceUpdate {
        tags: Some(vec!["a".into(), "undeployed".into()]),
        ..DeviceUpdate::default()
    };
    let device = client
        .update_device("Q2AA-AAAA-AAAA", &update)
        .await
        .unwrap()
        .unwrap();
    assert!(device.has_tag("undeployed"));
}

// ── Switch tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_switch_ports_preserves_order() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("devices/Q2AA-AAAA-AAAA/switch/ports")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"portId": "1", "vlan": 10, "type": "access"},
            {"portId": "2", "vlan": 20, "type": "access"},
            {"portId": "3", "type": "trunk", "allowedVlans": "all"}
        ])))
        .mount(&server)
        .await;

    let ports = client.get_switch_ports("Q2AA-AAAA-AAAA").await.unwrap();
    let ids: Vec<&str> = ports.iter().map(|p| p.port_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(ports[2].get("allowedVlans"), Some(&json!("all")));
}

#[tokio::test]
async fn test_clone_switch_devices_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("organizations/123/switch/devices/clone")))
        .and(body_json(json!({
            "sourceSerial": "Q2AA-AAAA-AAAA",
            "targetSerials": ["Q2BB-BBBB-BBBB"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sourceSerial": "Q2AA-AAAA-AAAA",
            "targetSerials": ["Q2BB-BBBB-BBBB"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client
        .clone_switch_devices("123", "Q2AA-AAAA-AAAA", &["Q2BB-BBBB-BBBB"])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(result.target_serials, vec!["Q2BB-BBBB-BBBB".to_string()]);
}

#[tokio::test]
async fn test_writes_accept_empty_acknowledgement() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let device = client
        .update_device("Q2AA-AAAA-AAAA", &DeviceUpdate::default())
        .await
        .unwrap();
    assert_eq!(device, None);

    let port = client
        .update_switch_port("Q2AA-AAAA-AAAA", "1", &serde_json::Map::new())
        .await
        .unwrap();
    assert_eq!(port, None);

    let cloned = client
        .clone_switch_devices("123", "Q2AA-AAAA-AAAA", &["Q2BB-BBBB-BBBB"])
        .await
        .unwrap();
    assert_eq!(cloned, None);
}

#[tokio::test]
async fn test_read_with_empty_body_is_an_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let err = client.get_device("Q2AA-AAAA-AAAA").await.unwrap_err();
    assert!(matches!(err, Error::Deserialization { .. }), "got: {err:?}");
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_invalid_api_key() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.get_device("Q2AA-AAAA-AAAA").await;
    assert!(
        matches!(result, Err(Error::InvalidApiKey)),
        "expected InvalidApiKey, got: {result:?}"
    );
}

#[tokio::test]
async fn test_device_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"errors": ["Not found"]})))
        .mount(&server)
        .await;

    let err = client.get_device("Q2ZZ-ZZZZ-ZZZZ").await.unwrap_err();
    assert!(err.is_not_found(), "expected NotFound, got: {err:?}");
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_error_body_is_decoded() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": ["'vlan' must be an integer", "'type' is invalid"]
        })))
        .mount(&server)
        .await;

    let err = client
        .update_switch_port("Q2AA-AAAA-AAAA", "1", &serde_json::Map::new())
        .await
        .unwrap_err();

    match err {
        Error::Api { status, ref message } => {
            assert_eq!(status, 400);
            assert!(message.contains("'vlan' must be an integer"), "got: {message}");
            assert!(message.contains("'type' is invalid"), "got: {message}");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

// ── Retry policy ────────────────────────────────────────────────────

#[tokio::test]
async fn test_read_is_retried_once_after_server_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("devices/Q2AA-AAAA-AAAA")))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(api_path("devices/Q2AA-AAAA-AAAA")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"serial": "Q2AA-AAAA-AAAA"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let device = client.get_device("Q2AA-AAAA-AAAA").await.unwrap();
    assert_eq!(device.serial, "Q2AA-AAAA-AAAA");
}

#[tokio::test]
async fn test_read_gives_up_after_retry_budget() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .expect(2)
        .mount(&server)
        .await;

    let err = client.get_device("Q2AA-AAAA-AAAA").await.unwrap_err();
    assert!(matches!(err, Error::RateLimited { retry_after_secs: 0 }), "got: {err:?}");
}

#[tokio::test]
async fn test_write_is_never_retried() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let err = client
        .update_device("Q2AA-AAAA-AAAA", &DeviceUpdate::default())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(503));
}
