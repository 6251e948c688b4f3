//! Server handler integration tests

use gitlab_gateway::auth::PatProvider;
use gitlab_gateway::config::{AppConfig, GitLabConfig};
use gitlab_gateway::gitlab::GitLabClient;
use gitlab_gateway::server::GatewayHandler;
use rmcp::handler::server::ServerHandler;
use rmcp::model::{ErrorCode, RawContent};
use serde_json::{Map, Value, json};
use std::collections::BTreeSet;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_handler(mock_server: &MockServer, read_only: bool) -> GatewayHandler {
    let mut config = AppConfig::default();
    config.server.name = "test-gateway".to_string();
    config.server.read_only = read_only;
    config.gitlab = GitLabConfig {
        url: mock_server.uri(),
        ..Default::default()
    };

    let auth = PatProvider::new("test-token").unwrap();
    let gitlab = GitLabClient::new(&config.gitlab, Box::new(auth)).unwrap();
    GatewayHandler::new(&config, gitlab)
}

fn args(value: Value) -> Option<Map<String, Value>> {
    value.as_object().cloned()
}

fn first_text(content: &[rmcp::model::Content]) -> String {
    match &content[0].raw {
        RawContent::Text(text) => text.text.clone(),
        other => panic!("expected text content, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_info() {
    let mock_server = MockServer::start().await;
    let handler = create_test_handler(&mock_server, false);

    let info = handler.get_info();
    assert_eq!(info.server_info.name, "test-gateway");
    assert!(info.capabilities.tools.is_some());
    assert_eq!(handler.tool_count(), 8);
}

#[tokio::test]
async fn test_tool_schemas_are_objects() {
    let mock_server = MockServer::start().await;
    let handler = create_test_handler(&mock_server, false);

    for tool in handler.mcp_tools() {
        assert_eq!(tool.input_schema.get("type"), Some(&json!("object")));
        assert!(tool.input_schema.get("properties").is_some(), "{}", tool.name);
    }
}

#[tokio::test]
async fn test_successful_call_returns_json_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "billing", "path_with_namespace": "acme/billing"}
        ])))
        .mount(&mock_server)
        .await;

    let handler = create_test_handler(&mock_server, false);
    let result = handler
        .execute_tool("search_repositories", args(json!({"search": "billing"})))
        .await
        .unwrap();

    assert_eq!(result.is_error, Some(false));
    let body: Value = serde_json::from_str(&first_text(&result.content)).unwrap();
    assert_eq!(body["projects"][0]["path"], "acme/billing");
}

#[tokio::test]
async fn test_gitlab_failure_is_error_result() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v4/projects/5/issues"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "message": "403 Forbidden"
        })))
        .mount(&mock_server)
        .await;

    let handler = create_test_handler(&mock_server, false);
    let result = handler
        .execute_tool("create_issue", args(json!({"project_id": "5", "title": "x"})))
        .await
        .unwrap();

    assert_eq!(result.is_error, Some(true));
    let body: Value = serde_json::from_str(&first_text(&result.content)).unwrap();
    assert!(body["message"].as_str().unwrap().contains("403 Forbidden"));
}

#[tokio::test]
async fn test_invalid_arguments_are_protocol_errors() {
    let mock_server = MockServer::start().await;
    let handler = create_test_handler(&mock_server, false);

    let err = handler
        .execute_tool("create_issue", args(json!({"title": "no project"})))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
}

#[tokio::test]
async fn test_read_only_lists_and_refuses_write_tools() {
    let mock_server = MockServer::start().await;
    let handler = create_test_handler(&mock_server, true);

    let unavailable: BTreeSet<String> = handler
        .mcp_tools()
        .into_iter()
        .filter(|t| {
            t.description
                .as_deref()
                .is_some_and(|d| d.starts_with("UNAVAILABLE: "))
        })
        .map(|t| t.name.to_string())
        .collect();
    let expected: BTreeSet<String> = [
        "create_repository",
        "create_or_update_file",
        "create_merge_request",
        "create_issue",
        "create_merge_request_line_comment",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    assert_eq!(unavailable, expected);

    let result = handler
        .execute_tool(
            "create_or_update_file",
            args(json!({
                "project_id": "5",
                "file_path": "a.txt",
                "content": "x",
                "commit_message": "m",
                "branch": "main"
            })),
        )
        .await
        .unwrap();
    assert_eq!(result.is_error, Some(true));
}
