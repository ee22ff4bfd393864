//! End-to-end tests for a sink assembled from configuration
//!
//! A single wiremock server stands in for both the metadata service and the
//! bus; credentials come from a token file on disk.

use std::io::Write;

use kube_eventbridge_core::EventSink;
use kube_eventbridge_domain::{BridgeError, EventBatch, KubeEvent, SinkConfig};
use kube_eventbridge_infra::{connect_with_factory, HttpClientFactory};
use serde_json::{json, Value};
use tempfile::NamedTempFile;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

async fn mount_metadata(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/latest/meta-data/region-id"))
        .respond_with(ResponseTemplate::new(200).set_body_string("cn-hangzhou"))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/latest/meta-data/owner-account-id"))
        .respond_with(ResponseTemplate::new(200).set_body_string("1888"))
        .mount(server)
        .await;
}

fn token_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    let token = json!({
        "AccessKeyId": "STS.e2e",
        "AccessKeySecret": "secret",
        "SecurityToken": "token",
        "Expiration": "2099-01-01T00:00:00Z",
    });
    file.write_all(token.to_string().as_bytes()).expect("write");
    file
}

fn config(server: &MockServer, token: &NamedTempFile) -> SinkConfig {
    let mut config = SinkConfig::new("c1234");
    config.metadata_endpoint = Some(format!("{}/latest/meta-data", server.uri()));
    config.credentials_path = Some(token.path().to_path_buf());
    config.auto_retry = false;
    config
}

fn factory(config: &SinkConfig, server: &MockServer) -> HttpClientFactory {
    HttpClientFactory::from_config(config)
        .expect("factory")
        .with_endpoint_override(Url::parse(&server.uri()).expect("url"))
}

fn events(count: usize) -> Vec<KubeEvent> {
    (0..count)
        .map(|i| {
            KubeEvent::new("apps/v1", "Deployment", "kube-system", format!("coredns-{i}"))
                .with_field("reason", json!("ScalingReplicaSet"))
        })
        .collect()
}

fn posted_batches(requests: &[Request]) -> Vec<Vec<Value>> {
    requests
        .iter()
        .filter(|r| r.url.path() == "/openapi/putEvents")
        .map(|r| serde_json::from_slice::<Vec<Value>>(&r.body).expect("batch body"))
        .collect()
}

#[tokio::test]
async fn exports_batch_in_chunks_to_the_bus() {
    let server = MockServer::start().await;
    mount_metadata(&server).await;
    Mock::given(method("POST"))
        .and(path("/openapi/putEvents"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;
    let token = token_file();
    let config = config(&server, &token);

    let sink = connect_with_factory(&config, factory(&config, &server)).await.expect("sink");
    sink.export_events(&EventBatch::new(events(20))).await;

    let batches = posted_batches(&server.received_requests().await.expect("requests"));
    assert_eq!(batches.iter().map(Vec::len).collect::<Vec<_>>(), vec![16, 4]);

    let first = &batches[0][0];
    assert_eq!(first["source"], "acs.cs");
    assert_eq!(first["type"], "cs:k8s:K8s-event-via-npd");
    assert_eq!(first["aliyuneventbusname"], "default");
    assert_eq!(
        first["subject"],
        "acs:cs:cn-hangzhou:1888:c1234/apis/apps/v1/namespaces/kube-system/deployments/coredns-0"
    );
    assert_eq!(first["data"]["reason"], "ScalingReplicaSet");
}

#[tokio::test]
async fn rejected_chunk_does_not_stop_later_chunks() {
    let server = MockServer::start().await;
    mount_metadata(&server).await;
    Mock::given(method("POST"))
        .and(path("/openapi/putEvents"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/openapi/putEvents"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let token = token_file();
    let config = config(&server, &token);

    let sink = connect_with_factory(&config, factory(&config, &server)).await.expect("sink");
    let summary = sink.export(&events(40)).await;

    assert_eq!(summary.chunks, 3);
    assert_eq!(summary.failed_chunks, 1);
    assert_eq!(summary.dispatched_chunks, 2);
    assert_eq!(posted_batches(&server.received_requests().await.expect("requests")).len(), 3);
}

#[tokio::test]
async fn missing_token_file_fails_export_but_not_construction() {
    let server = MockServer::start().await;
    mount_metadata(&server).await;
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;
    let token = token_file();
    let mut config = config(&server, &token);
    config.credentials_path = Some("/nonexistent/token-config".into());

    let sink = connect_with_factory(&config, factory(&config, &server)).await.expect("sink");
    let summary = sink.export(&events(3)).await;

    assert_eq!(summary.failed_chunks, 1);
    assert!(!sink.clients().has_client().await);
}

#[tokio::test]
async fn unreachable_metadata_fails_construction() {
    let server = MockServer::start().await;
    Mock::given(method("GET")).respond_with(ResponseTemplate::new(503)).mount(&server).await;
    let token = token_file();
    let config = config(&server, &token);

    let result = connect_with_factory(&config, factory(&config, &server)).await;

    assert!(matches!(result, Err(BridgeError::Network(_))));
}

#[tokio::test]
async fn pinned_identity_skips_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("GET")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;
    let token = token_file();
    let mut config = config(&server, &token);
    config.region = Some("cn-beijing".to_string());
    config.account_id = Some("4242".to_string());

    let sink = connect_with_factory(&config, factory(&config, &server)).await.expect("sink");

    assert_eq!(sink.clients().endpoint(), "4242.eventbridge.cn-beijing-vpc.aliyuncs.com");
}

#[tokio::test]
async fn missing_cluster_id_is_rejected_before_any_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("GET")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;
    let token = token_file();
    let mut config = config(&server, &token);
    config.cluster_id = String::new();

    let result = connect_with_factory(&config, factory(&config, &server)).await;

    assert!(matches!(result, Err(BridgeError::Configuration(_))));
}
