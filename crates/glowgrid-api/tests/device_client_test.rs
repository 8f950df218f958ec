// Integration tests for `DeviceClient` using wiremock.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use glowgrid_api::device::models::{
    AppAction, AudioUpdate, BrightnessMode, ChartFrame, DeviceMode, DisplayUpdate, Frame, GoalData,
    GoalFrame, Icon, Notification, NotificationModel, SimpleFrame,
};
use glowgrid_api::{DecodeKind, DeviceClient, Error, RetryPolicy, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

fn test_config() -> TransportConfig {
    TransportConfig {
        retry: RetryPolicy {
            initial_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(100),
            ..RetryPolicy::default()
        },
        ..TransportConfig::default()
    }
}

async fn setup() -> (MockServer, DeviceClient) {
    let server = MockServer::start().await;
    let client = DeviceClient::new(&server.uri(), "abc", &test_config())
        .expect("client should build against the mock server");
    (server, client)
}

fn device_body(rssi: serde_json::Value) -> serde_json::Value {
    json!({
        "id": "12345",
        "name": "Kitchen display",
        "serial_number": "SA110405124500W00BS9",
        "model": "GG-37X8",
        "os_version": "2.3.0",
        "mode": "auto",
        "audio": {
            "volume": 53,
            "volume_range": { "min": 0, "max": 100 },
            "volume_limit": { "min": 0, "max": 70 },
            "available": true,
        },
        "bluetooth": {
            "active": false,
            "mac": "AA:BB:CC:DD:EE:00",
            "available": true,
            "discoverable": true,
            "name": "GG1234",
            "pairable": true,
        },
        "display": {
            "brightness": 100,
            "brightness_mode": "auto",
            "width": 37,
            "height": 8,
            "type": "mixed",
            "screensaver": { "enabled": false },
        },
        "wifi": {
            "active": true,
            "available": true,
            "encryption": "WPA",
            "address": "AA:BB:CC:DD:EE:FF",
            "essid": "attic",
            "ipv4": "192.168.1.21",
            "mode": "dhcp",
            "netmask": "255.255.255.0",
            "rssi": rssi,
        },
    })
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_get_device() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/device"))
        .and(header("authorization", "Basic ZGV2OmFiYw=="))
        .respond_with(ResponseTemplate::new(200).set_body_json(device_body(json!(21))))
        .mount(&server)
        .await;

    let device = client.get_device().await.expect("device should decode");

    assert_eq!(device.device_id, "12345");
    assert_eq!(device.mode, DeviceMode::Auto);
    assert_eq!(device.display.brightness, 100);
    assert_eq!(device.display.brightness_mode, BrightnessMode::Auto);
    assert_eq!(device.wifi.rssi, Some(21));
    assert_eq!(device.wifi.ssid, "attic");
    assert_eq!(device.wifi.mac, "AA:BB:CC:DD:EE:FF");
    assert!(device.update.is_none());
}

#[tokio::test]
async fn test_get_device_null_rssi_is_unset() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/device"))
        .respond_with(ResponseTemplate::new(200).set_body_json(device_body(json!(null))))
        .mount(&server)
        .await;

    let device = client.get_device().await.expect("device should decode");
    assert_eq!(device.wifi.rssi, None);
}

#[tokio::test]
async fn test_set_audio_sends_only_volume() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/v2/device/audio"))
        .and(body_json(json!({ "volume": 100 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": {
                "data": { "volume": 100 },
            }
        })))
        .mount(&server)
        .await;

    let audio = client
        .set_audio(&AudioUpdate {
            volume: Some(100),
        })
        .await
        .expect("setter should succeed");

    assert_eq!(audio.volume, 100);
}

#[tokio::test]
async fn test_empty_update_fetches_current_state() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/device/audio"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "volume": 53 })))
        .mount(&server)
        .await;

    let audio = client
        .set_audio(&AudioUpdate::default())
        .await
        .expect("empty update should fall back to a fetch");

    assert_eq!(audio.volume, 53);

    let requests = server
        .received_requests()
        .await
        .expect("request recording enabled");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method.as_str(), "GET");
}

#[tokio::test]
async fn test_set_display_refetches_on_bare_ack() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/v2/device/display"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": {} })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/device/display"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "brightness": 40,
            "brightness_mode": "manual",
            "width": 37,
            "height": 8,
        })))
        .mount(&server)
        .await;

    let display = client
        .set_display(&DisplayUpdate {
            brightness: Some(40),
            brightness_mode: Some(BrightnessMode::Manual),
        })
        .await
        .expect("setter should fall back to a fetch");

    assert_eq!(display.brightness, 40);
    assert_eq!(display.brightness_mode, BrightnessMode::Manual);
}

#[tokio::test]
async fn test_notify_posts_frames_in_order() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/device/notifications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": { "id": 4 }
        })))
        .mount(&server)
        .await;

    let notification = Notification::new(NotificationModel::new(vec![
        Frame::Simple(SimpleFrame {
            icon: Some(Icon::Id(18_815)),
            text: "Yeah".to_owned(),
        }),
        Frame::Goal(GoalFrame {
            icon: Some(Icon::Id(7956)),
            data: GoalData {
                start: 0,
                current: 65,
                end: 100,
                unit: None,
                color: None,
                background: None,
            },
        }),
        Frame::Chart(ChartFrame {
            data: vec![1, 2, 3, 4, 5, 4, 3, 2, 1],
        }),
    ]));

    let id = client
        .notify(&notification)
        .await
        .expect("notify should succeed");
    assert_eq!(id, 4);

    let requests = server
        .received_requests()
        .await
        .expect("request recording enabled");
    assert_eq!(requests.len(), 1);

    let body: serde_json::Value =
        serde_json::from_slice(&requests[0].body).expect("request body is JSON");
    let frames = body["model"]["frames"]
        .as_array()
        .expect("frames should be an array");
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0]["type"], "simple");
    assert_eq!(frames[1]["type"], "goal");
    assert_eq!(frames[1]["goalData"]["current"], 65);
    assert_eq!(frames[2]["type"], "chart");
    assert!(
        body.as_object()
            .is_some_and(|o| !o.contains_key("id") && !o.contains_key("created")),
        "server-assigned fields must not be posted: {body}"
    );
}

#[tokio::test]
async fn test_notify_rejects_empty_frames() {
    let (server, client) = setup().await;

    let notification = Notification::new(NotificationModel::new(vec![]));
    let result = client.notify(&notification).await;

    assert!(
        matches!(result, Err(Error::InvalidRequest(_))),
        "expected InvalidRequest, got: {result:?}"
    );

    let requests = server
        .received_requests()
        .await
        .expect("request recording enabled");
    assert!(requests.is_empty(), "nothing should have been sent");
}

#[tokio::test]
async fn test_notification_queue_and_current() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/device/notifications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 1,
                "type": "external",
                "priority": "info",
                "created": "2024-05-01 10:00:00",
                "model": {
                    "cycles": 1,
                    "frames": [ { "type": "simple", "text": "first", "icon": 18_815 } ],
                },
            },
            {
                "id": 2,
                "model": {
                    "frames": [ { "type": "chart", "chartData": [1, 2, 3] } ],
                },
            },
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/device/notifications/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let queue = client
        .list_notifications()
        .await
        .expect("queue should decode");
    assert_eq!(queue.len(), 2);
    assert_eq!(queue[0].notification_id, Some(1));
    assert_eq!(queue[1].model.cycles, 1, "cycles should default to 1");
    assert_eq!(
        queue[1].model.frames,
        vec![Frame::Chart(ChartFrame {
            data: vec![1, 2, 3]
        })]
    );

    let current = client
        .current_notification()
        .await
        .expect("empty object should decode");
    assert!(current.is_none(), "device reported nothing on screen");
}

#[tokio::test]
async fn test_unknown_frame_discriminator_in_queue() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/device/notifications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 9,
                "model": { "frames": [ { "type": "hologram", "depth": 3 } ] },
            },
        ])))
        .mount(&server)
        .await;

    let result = client.list_notifications().await;

    match result {
        Err(Error::Decode { kind, .. }) => assert_eq!(kind, DecodeKind::UnknownVariant),
        other => panic!("expected UnknownVariant decode error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_dismiss_notification() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v2/device/notifications/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    client
        .dismiss_notification(4)
        .await
        .expect("dismiss should succeed");
}

#[tokio::test]
async fn test_app_action_payload() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/device/apps/com.glowgrid.clock/actions"))
        .and(body_json(json!({
            "id": "clock.clockface",
            "params": { "type": "weather" },
            "activate": true,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    let mut action = AppAction::new("clock.clockface");
    let mut params = serde_json::Map::new();
    params.insert("type".to_owned(), json!("weather"));
    action.params = Some(params);
    action.activate = Some(true);

    client
        .app_action("com.glowgrid.clock", &action)
        .await
        .expect("action should succeed");
}

#[tokio::test]
async fn test_app_action_rejects_nested_params() {
    let (server, client) = setup().await;

    let mut action = AppAction::new("clock.clockface");
    let mut params = serde_json::Map::new();
    params.insert("nested".to_owned(), json!({ "a": 1 }));
    action.params = Some(params);

    let result = client.app_action("com.glowgrid.clock", &action).await;
    assert!(
        matches!(result, Err(Error::InvalidRequest(_))),
        "expected InvalidRequest, got: {result:?}"
    );

    let requests = server
        .received_requests()
        .await
        .expect("request recording enabled");
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_get_app_and_switching() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/device/apps/com.glowgrid.clock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "package": "com.glowgrid.clock",
            "title": "Clock",
            "vendor": "Glowgrid",
            "version": "1.0.19",
            "widgets": {
                "08b8eac21074f8f7e5a29f2855ba8060": {
                    "package": "com.glowgrid.clock",
                    "index": 0,
                    "visible": true,
                },
            },
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/v2/device/apps/next"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    let app = client
        .get_app("com.glowgrid.clock")
        .await
        .expect("app should decode");
    assert_eq!(app.title, "Clock");
    assert_eq!(app.vendor.as_deref(), Some("Glowgrid"));
    assert_eq!(app.widgets.len(), 1);

    client.next_app().await.expect("switch should succeed");
}

// ── Error and retry tests ───────────────────────────────────────────

#[tokio::test]
async fn test_retry_bound_on_transient_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/device"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = client.get_device().await;
    assert!(
        matches!(result, Err(Error::Connection { .. })),
        "expected Connection after exhausted retries, got: {result:?}"
    );

    let requests = server
        .received_requests()
        .await
        .expect("request recording enabled");
    assert_eq!(requests.len(), 3, "default policy allows 3 attempts total");
}

#[tokio::test]
async fn test_retry_bound_on_timeout() {
    let server = MockServer::start().await;
    let config = TransportConfig {
        timeout: Duration::from_millis(100),
        ..test_config()
    };
    let client =
        DeviceClient::new(&server.uri(), "abc", &config).expect("client should build");

    Mock::given(method("GET"))
        .and(path("/api/v2/device"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(device_body(json!(21)))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let result = client.get_device().await;
    assert!(
        matches!(result, Err(Error::Connection { .. })),
        "expected Connection after timeouts, got: {result:?}"
    );

    let requests = server
        .received_requests()
        .await
        .expect("request recording enabled");
    assert_eq!(requests.len(), 3);
}

#[tokio::test]
async fn test_no_retry_on_404() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v2/device/notifications/99"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({ "errors": [ { "message": "Not found" } ] })),
        )
        .mount(&server)
        .await;

    let result = client.dismiss_notification(99).await;

    match result {
        Err(Error::NotFound { ref message }) => assert_eq!(message, "Not found"),
        other => panic!("expected NotFound, got: {other:?}"),
    }

    let requests = server
        .received_requests()
        .await
        .expect("request recording enabled");
    assert_eq!(requests.len(), 1, "4xx must short-circuit on first attempt");
}

#[tokio::test]
async fn test_authentication_error_on_401() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.get_device().await;
    assert!(
        matches!(result, Err(ref e) if e.is_auth_error()),
        "expected Authentication, got: {result:?}"
    );
}

#[tokio::test]
async fn test_bad_request_on_other_4xx() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/v2/device/audio"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({ "errors": [ { "message": "volume above limit" } ] })),
        )
        .mount(&server)
        .await;

    let result = client
        .set_audio(&AudioUpdate {
            volume: Some(9000),
        })
        .await;

    match result {
        Err(Error::BadRequest { status, ref message }) => {
            assert_eq!(status, 422);
            assert_eq!(message, "volume above limit");
        }
        other => panic!("expected BadRequest, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_non_retryable_5xx_is_fatal() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(501))
        .mount(&server)
        .await;

    let result = client.get_device().await;
    match result {
        Err(Error::Device { status, .. }) => assert_eq!(status, 501),
        other => panic!("expected Device error, got: {other:?}"),
    }

    let requests = server
        .received_requests()
        .await
        .expect("request recording enabled");
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_malformed_body_is_fatal_decode_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/device"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let result = client.get_device().await;
    match result {
        Err(Error::Decode { kind, ref body, .. }) => {
            assert_eq!(kind, DecodeKind::Shape);
            assert_eq!(body, "not json at all");
        }
        other => panic!("expected Decode error, got: {other:?}"),
    }

    let requests = server
        .received_requests()
        .await
        .expect("request recording enabled");
    assert_eq!(requests.len(), 1, "decode failures must not be retried");
}

#[tokio::test]
async fn test_closed_client_fails_fast() {
    let (server, client) = setup().await;

    client.close();
    assert!(client.is_closed());

    let result = client.get_device().await;
    assert!(
        matches!(result, Err(Error::Closed)),
        "expected Closed, got: {result:?}"
    );

    let requests = server
        .received_requests()
        .await
        .expect("request recording enabled");
    assert!(requests.is_empty(), "closed client must not touch the wire");
}
