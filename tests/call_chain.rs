//! Call-sequence propagation across a chain of relays.

use service_http::config::{AppConfig, Configuration, HelperSettings, SharedConfiguration};
use service_http::http::HttpServer;
use service_http::{register_http_helper, CALL_SEQUENCE_HEADER};

mod common;

async fn start_relay(name: &str, downstream: std::net::SocketAddr) -> std::net::SocketAddr {
    let mut settings = HelperSettings::default();
    settings.application_name = name.to_string();
    let values = Configuration::from_pairs([("Relay:BaseUrl", format!("http://{}/relay", downstream))]);
    let helper = register_http_helper(&settings, SharedConfiguration::new(values)).unwrap();

    let mut app = AppConfig::default();
    app.helper = settings;
    let server = HttpServer::new(app, &helper);

    common::serve(server.router()).await
}

#[tokio::test]
async fn test_sequence_grows_hop_by_hop() {
    let backend = common::start_echo_backend().await;

    // Relay B forwards to the echo backend; the echo path gets a "/relay"
    // prefix from B's base URL, which the backend ignores.
    let relay_b = start_relay("B", backend).await;
    let relay_a = start_relay("A", relay_b).await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("http://{}/relay/items?x=1", relay_a))
        .header(CALL_SEQUENCE_HEADER, "Front:/checkout")
        .send()
        .await
        .expect("Relay unreachable");

    assert_eq!(res.status(), 200);
    let echo: serde_json::Value = res.json().await.unwrap();

    assert_eq!(echo["path"], "/relay/items");
    assert_eq!(echo["query"], "x=1");
    assert_eq!(
        echo["callsec"],
        serde_json::json!(["Front:/checkout;A:/relay/items;B:/relay/items"])
    );
}

#[tokio::test]
async fn test_revisited_hop_is_recorded_twice() {
    let backend = common::start_echo_backend().await;
    let relay = start_relay("A", backend).await;

    let res = reqwest::Client::new()
        .get(format!("http://{}/relay/x", relay))
        .header(CALL_SEQUENCE_HEADER, "A:/relay/x;B:/y;A:/relay/x")
        .send()
        .await
        .unwrap();

    let echo: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        echo["callsec"],
        serde_json::json!(["A:/relay/x;B:/y;A:/relay/x"])
    );
}

#[tokio::test]
async fn test_downstream_status_passed_through() {
    let backend = common::start_failing_backend(404, "no such item").await;
    let relay = start_relay("A", backend).await;

    let res = reqwest::Client::new()
        .get(format!("http://{}/relay/items/9", relay))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 404);
    assert_eq!(res.text().await.unwrap(), "no such item");
}

#[tokio::test]
async fn test_encoded_path_forwarded_verbatim() {
    let backend = common::start_echo_backend().await;
    let relay = start_relay("A", backend).await;

    let res = reqwest::Client::new()
        .get(format!("http://{}/relay/files/a%3Fb%23c", relay))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let echo: serde_json::Value = res.json().await.unwrap();
    assert_eq!(echo["path"], "/relay/files/a%3Fb%23c");
    assert_eq!(echo["query"], serde_json::Value::Null);
}
