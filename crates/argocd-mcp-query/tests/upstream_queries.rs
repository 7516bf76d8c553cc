//! Query operations against a mocked Argo CD API server.

use argocd_mcp_core::config::ArgoCdConfig;
use argocd_mcp_core::error::{QueryError, TransportError};
use argocd_mcp_query::applications::unhealthy_applications;
use argocd_mcp_query::client::{ArgoCdClient, CallContext};
use argocd_mcp_query::resources::unhealthy_application_resources;
use serde_json::json;
use std::path::PathBuf;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "secure-token";

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../testdata/fixtures/argocd")
        .join(name);
    std::fs::read_to_string(&path).expect("fixture must exist")
}

fn client_for(server: &MockServer) -> ArgoCdClient {
    let config = ArgoCdConfig::from_raw(&server.uri(), TOKEN, "false").unwrap();
    ArgoCdClient::new(&config).unwrap()
}

async fn mount_applications(server: &MockServer, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path("/api/v1/applications"))
        .and(header("authorization", "Bearer secure-token"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn fetch_sends_bearer_token_and_returns_raw_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/applications"))
        .and(header("authorization", "Bearer secure-token"))
        .respond_with(ResponseTemplate::new(418).set_body_string("teapot"))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .fetch("api/v1/applications", &[], &CallContext::background())
        .await
        .unwrap();

    assert_eq!(response.status, 418);
    assert_eq!(response.body_text(), "teapot");
}

#[tokio::test]
async fn fetch_encodes_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/applications"))
        .and(query_param("name", "needs encoding&more"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .fetch(
            "/api/v1/applications",
            &[("name", "needs encoding&more")],
            &CallContext::background(),
        )
        .await
        .unwrap();

    assert!(response.is_ok());
}

#[tokio::test]
async fn unhealthy_applications_classifies_the_upstream_list() {
    let server = MockServer::start().await;
    mount_applications(&server, 200, fixture("applications.json")).await;

    let result = unhealthy_applications(&client_for(&server), &CallContext::background())
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({
            "degraded": ["a-degraded-application", "another-degraded-application"],
            "progressing": ["a-progressing-application", "another-progressing-application"],
            "missing": ["a-missing-application"],
            "unknown": ["an-unknown-application"],
            "suspended": ["a-suspended-application"],
            "outOfSync": ["an-out-of-sync-application", "another-out-of-sync-application"],
        })
    );
}

#[tokio::test]
async fn unhealthy_applications_is_idempotent() {
    let server = MockServer::start().await;
    mount_applications(&server, 200, fixture("applications.json")).await;
    let client = client_for(&server);

    let first = unhealthy_applications(&client, &CallContext::background())
        .await
        .unwrap();
    let second = unhealthy_applications(&client, &CallContext::background())
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
}

#[tokio::test]
async fn null_items_mean_nothing_is_unhealthy() {
    let server = MockServer::start().await;
    mount_applications(&server, 200, fixture("no-applications.json")).await;

    let result = unhealthy_applications(&client_for(&server), &CallContext::background())
        .await
        .unwrap();

    assert!(result.is_empty());
}

#[tokio::test]
async fn non_200_is_an_upstream_status_error() {
    let server = MockServer::start().await;
    mount_applications(&server, 503, "argocd-server is restarting".into()).await;

    let err = unhealthy_applications(&client_for(&server), &CallContext::background())
        .await
        .unwrap_err();

    match err {
        QueryError::UpstreamStatus { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "argocd-server is restarting");
        }
        other => panic!("expected upstream status error, got {other:?}"),
    }
}

#[tokio::test]
async fn wrong_token_surfaces_as_upstream_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/applications"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let config = ArgoCdConfig::from_raw(&server.uri(), "wrong-token", "false").unwrap();
    let client = ArgoCdClient::new(&config).unwrap();

    let err = unhealthy_applications(&client, &CallContext::background())
        .await
        .unwrap_err();

    assert!(matches!(err, QueryError::UpstreamStatus { status: 401, .. }));
}

#[tokio::test]
async fn unparseable_body_is_a_parse_error() {
    let server = MockServer::start().await;
    mount_applications(&server, 200, "not json".into()).await;

    let err = unhealthy_applications(&client_for(&server), &CallContext::background())
        .await
        .unwrap_err();

    assert!(matches!(err, QueryError::Parse(_)));
}

#[tokio::test]
async fn unreachable_upstream_is_a_transport_error() {
    let server = MockServer::builder().start().await;
    let client = client_for(&server);
    drop(server);

    let err = unhealthy_applications(&client, &CallContext::background())
        .await
        .unwrap_err();

    assert!(matches!(err, QueryError::Transport(TransportError::Request(_))));
}

#[tokio::test]
async fn unhealthy_resources_of_named_application() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/applications"))
        .and(query_param("name", "example"))
        .and(header("authorization", "Bearer secure-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(fixture("example-application.json")))
        .mount(&server)
        .await;

    let result = unhealthy_application_resources(
        &client_for(&server),
        "example",
        &CallContext::background(),
    )
    .await
    .unwrap();

    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({"resources": [
            {
                "group": "apps",
                "version": "v1",
                "kind": "StatefulSet",
                "namespace": "example-ns",
                "name": "example",
                "status": "Synced",
                "health": {"status": "Progressing", "message": "Waiting for 1 pods to be ready..."}
            },
            {
                "group": "external-secrets.io",
                "version": "v1beta1",
                "kind": "ExternalSecret",
                "namespace": "example-ns",
                "name": "example-secret",
                "status": "OutOfSync",
                "health": {"status": "Missing"}
            }
        ]})
    );
}

#[tokio::test]
async fn unknown_application_is_not_found_and_500_is_upstream_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/applications"))
        .and(query_param("name", "missing-app"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"metadata":{},"items":[]}"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/applications"))
        .and(query_param("name", "example-error"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let client = client_for(&server);

    let missing =
        unhealthy_application_resources(&client, "missing-app", &CallContext::background())
            .await
            .unwrap_err();
    let broken =
        unhealthy_application_resources(&client, "example-error", &CallContext::background())
            .await
            .unwrap_err();

    assert!(matches!(missing, QueryError::NotFound { ref name } if name == "missing-app"));
    assert!(matches!(broken, QueryError::UpstreamStatus { status: 500, .. }));
    assert_ne!(missing.code(), broken.code());
}
