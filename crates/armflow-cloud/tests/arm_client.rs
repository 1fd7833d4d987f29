//! ArmClient against a mocked Resource Manager endpoint

use armflow_cloud::{ArmClient, RemoteError};
use serde_json::{Value, json};
use wiremock::matchers::{bearer_token, body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_VERSION: &str = "2023-04-01";
const ID: &str = "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Maintenance/maintenanceConfigurations/config1";

#[tokio::test]
async fn test_get_sends_token_and_api_version() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ID))
        .and(query_param("api-version", API_VERSION))
        .and(bearer_token("test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": ID, "name": "config1"})))
        .mount(&server)
        .await;

    let client = ArmClient::with_endpoint(server.uri(), "test-token");
    let body: Value = client.get(ID, API_VERSION).await.unwrap();
    assert_eq!(body["name"], "config1");
}

#[tokio::test]
async fn test_not_found_decodes_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ID))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": "ResourceNotFound", "message": "The Resource was not found."}
        })))
        .mount(&server)
        .await;

    let client = ArmClient::with_endpoint(server.uri(), "test-token");
    let err: RemoteError = client.get::<Value>(ID, API_VERSION).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.code.as_deref(), Some("ResourceNotFound"));
}

#[tokio::test]
async fn test_put_sends_body() {
    let server = MockServer::start().await;
    let payload = json!({"location": "westeurope", "properties": {"maintenanceScope": "InGuestPatch"}});

    Mock::given(method("PUT"))
        .and(path(ID))
        .and(body_json(&payload))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": ID})))
        .expect(1)
        .mount(&server)
        .await;

    let client = ArmClient::with_endpoint(server.uri(), "test-token");
    let created: Value = client.put(ID, API_VERSION, &payload).await.unwrap();
    assert_eq!(created["id"], ID);
}

#[tokio::test]
async fn test_conflict_keeps_message() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(ID))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error": {"code": "Conflict", "message": "Another operation is in progress"}
        })))
        .mount(&server)
        .await;

    let client = ArmClient::with_endpoint(server.uri(), "test-token");
    let err = client.put::<_, Value>(ID, API_VERSION, &json!({})).await.unwrap_err();
    assert_eq!(err.status, Some(409));
    assert!(err.message.contains("in progress"));
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn test_delete_accepts_no_content() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(ID))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = ArmClient::with_endpoint(server.uri(), "test-token");
    client.delete(ID, API_VERSION).await.unwrap();
}

#[tokio::test]
async fn test_list_follows_next_link() {
    let server = MockServer::start().await;
    let collection = "/subscriptions/sub/providers/Microsoft.Maintenance/configurationAssignments";

    Mock::given(method("GET"))
        .and(path(collection))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": [{"name": "b"}]})))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(collection))
        .and(query_param("api-version", API_VERSION))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"name": "a"}],
            "nextLink": format!("{}{}?page=2", server.uri(), collection)
        })))
        .mount(&server)
        .await;

    let client = ArmClient::with_endpoint(server.uri(), "test-token");
    let items: Vec<Value> = client.list(collection, API_VERSION).await.unwrap();
    let names: Vec<&str> = items.iter().filter_map(|i| i["name"].as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
}
