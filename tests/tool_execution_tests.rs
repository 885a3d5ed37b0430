//! Tool execution integration tests
//!
//! Tests individual tools with mocked GitLab API responses.

use gitlab_mcp::config::GitLabConfig;
use gitlab_mcp::error::ToolError;
use gitlab_mcp::gitlab::GitLabClient;
use gitlab_mcp::tools::{ContentBlock, ToolContext, ToolRegistry};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Create a test GitLab client pointed at the mock server
fn create_test_gitlab(mock_server: &MockServer) -> Arc<GitLabClient> {
    let config = GitLabConfig {
        url: mock_server.uri(),
        token: Some("test-token".to_string()),
        api_version: "v4".to_string(),
        timeout_secs: 30,
    };
    Arc::new(GitLabClient::new(&config).unwrap())
}

fn create_test_context(gitlab: Arc<GitLabClient>) -> ToolContext {
    ToolContext::new(gitlab, "test-request-123")
}

fn text_of(content: &ContentBlock) -> &str {
    match content {
        ContentBlock::Text { text } => text,
    }
}

// ============================================================================
// Project Tools Tests
// ============================================================================

#[tokio::test]
async fn test_list_projects() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects"))
        .and(query_param("membership", "true"))
        .and(query_param("per_page", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "path_with_namespace": "group/alpha"},
            {"id": 2, "path_with_namespace": "group/beta"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let ctx = create_test_context(create_test_gitlab(&mock_server));
    let registry = ToolRegistry::with_all_tools();

    // No arguments at all: per_page defaults to 20
    let result = registry.execute("list_projects", &ctx, json!({})).await.unwrap();

    assert!(!result.is_error);
    let text = text_of(&result.content[0]);
    assert!(text.contains("group/alpha"));
    assert!(text.contains("group/beta"));
}

#[tokio::test]
async fn test_list_projects_custom_per_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects"))
        .and(query_param("membership", "true"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let ctx = create_test_context(create_test_gitlab(&mock_server));
    let registry = ToolRegistry::with_all_tools();

    let result = registry
        .execute("list_projects", &ctx, json!({"per_page": 100}))
        .await
        .unwrap();
    assert!(!result.is_error);
}

#[tokio::test]
async fn test_get_project() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects/test%2Fproject"))
        .and(header("PRIVATE-TOKEN", "test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "name": "project",
            "path_with_namespace": "test/project",
            "default_branch": "main"
        })))
        .mount(&mock_server)
        .await;

    let ctx = create_test_context(create_test_gitlab(&mock_server));
    let registry = ToolRegistry::with_all_tools();

    let args = json!({"project_id": "test/project"});
    let result = registry.execute("get_project", &ctx, args).await.unwrap();

    assert!(!result.is_error);
    let text = text_of(&result.content[0]);
    assert!(text.contains("path_with_namespace"));
    assert!(text.contains("test/project"));
}

#[tokio::test]
async fn test_get_project_numeric_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "name": "project"
        })))
        .mount(&mock_server)
        .await;

    let ctx = create_test_context(create_test_gitlab(&mock_server));
    let registry = ToolRegistry::with_all_tools();

    let result = registry
        .execute("get_project", &ctx, json!({"project_id": "42"}))
        .await
        .unwrap();
    assert!(!result.is_error);
}

// ============================================================================
// Issue Tools Tests
// ============================================================================

#[tokio::test]
async fn test_list_issues() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects/test%2Fproject/issues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 1,
                "iid": 1,
                "title": "First Issue",
                "state": "opened",
                "author": {"username": "alice"}
            },
            {
                "id": 2,
                "iid": 2,
                "title": "Second Issue",
                "state": "closed",
                "author": {"username": "bob"}
            }
        ])))
        .mount(&mock_server)
        .await;

    let ctx = create_test_context(create_test_gitlab(&mock_server));
    let registry = ToolRegistry::with_all_tools();

    let args = json!({"project_id": "test/project"});
    let result = registry.execute("list_issues", &ctx, args).await.unwrap();

    assert!(!result.is_error);
    let text = text_of(&result.content[0]);
    assert!(text.contains("First Issue"));
    assert!(text.contains("Second Issue"));
}

#[tokio::test]
async fn test_list_issues_forwards_state_filter() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects/test%2Fproject/issues"))
        .and(query_param("state", "closed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let ctx = create_test_context(create_test_gitlab(&mock_server));
    let registry = ToolRegistry::with_all_tools();

    let args = json!({"project_id": "test/project", "state": "closed"});
    let result = registry.execute("list_issues", &ctx, args).await.unwrap();
    assert!(!result.is_error);
}

#[tokio::test]
async fn test_list_issues_omits_state_when_absent() {
    let mock_server = MockServer::start().await;

    // The mock only matches requests without a state parameter; a stray
    // state= in the URL would fall through to a 404.
    Mock::given(method("GET"))
        .and(path("/api/v4/projects/test%2Fproject/issues"))
        .respond_with(move |req: &wiremock::Request| {
            if req.url.query().unwrap_or("").contains("state") {
                ResponseTemplate::new(404)
            } else {
                ResponseTemplate::new(200).set_body_json(json!([]))
            }
        })
        .mount(&mock_server)
        .await;

    let ctx = create_test_context(create_test_gitlab(&mock_server));
    let registry = ToolRegistry::with_all_tools();

    let args = json!({"project_id": "test/project"});
    let result = registry.execute("list_issues", &ctx, args).await.unwrap();
    assert!(!result.is_error);
}

#[tokio::test]
async fn test_create_issue_splits_labels() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v4/projects/test%2Fproject/issues"))
        .and(body_json(json!({
            "title": "New Issue",
            "description": "Issue body",
            "labels": ["bug", "urgent"]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 123,
            "iid": 5,
            "title": "New Issue",
            "state": "opened",
            "web_url": "https://gitlab.example.com/test/project/-/issues/5"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let ctx = create_test_context(create_test_gitlab(&mock_server));
    let registry = ToolRegistry::with_all_tools();

    let args = json!({
        "project_id": "test/project",
        "title": "New Issue",
        "description": "Issue body",
        "labels": "bug,urgent"
    });
    let result = registry.execute("create_issue", &ctx, args).await.unwrap();

    assert!(!result.is_error);
    assert!(text_of(&result.content[0]).contains("web_url"));
}

#[tokio::test]
async fn test_create_issue_title_only() {
    let mock_server = MockServer::start().await;

    // No description or labels keys in the body when they were not given
    Mock::given(method("POST"))
        .and(path("/api/v4/projects/test%2Fproject/issues"))
        .and(body_json(json!({"title": "Just a title"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "iid": 6,
            "title": "Just a title"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let ctx = create_test_context(create_test_gitlab(&mock_server));
    let registry = ToolRegistry::with_all_tools();

    let args = json!({"project_id": "test/project", "title": "Just a title"});
    let result = registry.execute("create_issue", &ctx, args).await.unwrap();
    assert!(!result.is_error);
}

// ============================================================================
// Merge Request Tools Tests
// ============================================================================

#[tokio::test]
async fn test_list_merge_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects/test%2Fproject/merge_requests"))
        .and(query_param("state", "merged"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"iid": 10, "title": "Merged MR", "state": "merged"}
        ])))
        .mount(&mock_server)
        .await;

    let ctx = create_test_context(create_test_gitlab(&mock_server));
    let registry = ToolRegistry::with_all_tools();

    let args = json!({"project_id": "test/project", "state": "merged"});
    let result = registry
        .execute("list_merge_requests", &ctx, args)
        .await
        .unwrap();

    assert!(!result.is_error);
    assert!(text_of(&result.content[0]).contains("Merged MR"));
}

#[tokio::test]
async fn test_create_merge_request_single_post() {
    let mock_server = MockServer::start().await;

    // Exactly one POST, whose body has the three required fields and no
    // description key.
    Mock::given(method("POST"))
        .and(path("/api/v4/projects/test%2Fproject/merge_requests"))
        .and(body_json(json!({
            "source_branch": "feature/login",
            "target_branch": "main",
            "title": "Add login"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "iid": 7,
            "title": "Add login",
            "state": "opened",
            "web_url": "https://gitlab.example.com/test/project/-/merge_requests/7"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let ctx = create_test_context(create_test_gitlab(&mock_server));
    let registry = ToolRegistry::with_all_tools();

    let args = json!({
        "project_id": "test/project",
        "source_branch": "feature/login",
        "target_branch": "main",
        "title": "Add login"
    });
    let result = registry
        .execute("create_merge_request", &ctx, args)
        .await
        .unwrap();

    assert!(!result.is_error);
    assert!(text_of(&result.content[0]).contains("merge_requests/7"));
}

// ============================================================================
// Repository Tools Tests
// ============================================================================

#[tokio::test]
async fn test_get_file_content_decodes_base64() {
    let mock_server = MockServer::start().await;

    // "fn main() {}" base64-encoded
    Mock::given(method("GET"))
        .and(path("/api/v4/projects/test%2Fproject/repository/files/src%2Fmain.rs"))
        .and(query_param("ref", "main"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "file_name": "main.rs",
            "file_path": "src/main.rs",
            "encoding": "base64",
            "content": "Zm4gbWFpbigpIHt9",
            "ref": "main"
        })))
        .mount(&mock_server)
        .await;

    let ctx = create_test_context(create_test_gitlab(&mock_server));
    let registry = ToolRegistry::with_all_tools();

    let args = json!({"project_id": "test/project", "file_path": "src/main.rs"});
    let result = registry
        .execute("get_file_content", &ctx, args)
        .await
        .unwrap();

    assert!(!result.is_error);
    assert_eq!(text_of(&result.content[0]), "fn main() {}");
}

#[tokio::test]
async fn test_get_file_content_ref_defaults_to_main() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects/test%2Fproject/repository/files/README.md"))
        .and(query_param("ref", "main"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "encoding": "base64",
            "content": "aGVsbG8="
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let ctx = create_test_context(create_test_gitlab(&mock_server));
    let registry = ToolRegistry::with_all_tools();

    let args = json!({"project_id": "test/project", "file_path": "README.md"});
    let result = registry
        .execute("get_file_content", &ctx, args)
        .await
        .unwrap();
    assert_eq!(text_of(&result.content[0]), "hello");
}

#[tokio::test]
async fn test_get_file_content_explicit_ref() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects/test%2Fproject/repository/files/README.md"))
        .and(query_param("ref", "develop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "encoding": "base64",
            "content": "ZGV2"
        })))
        .mount(&mock_server)
        .await;

    let ctx = create_test_context(create_test_gitlab(&mock_server));
    let registry = ToolRegistry::with_all_tools();

    let args = json!({
        "project_id": "test/project",
        "file_path": "README.md",
        "ref": "develop"
    });
    let result = registry
        .execute("get_file_content", &ctx, args)
        .await
        .unwrap();
    assert_eq!(text_of(&result.content[0]), "dev");
}

// ============================================================================
// Branch and Commit Tools Tests
// ============================================================================

#[tokio::test]
async fn test_list_branches() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects/test%2Fproject/repository/branches"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "main", "default": true},
            {"name": "develop", "default": false}
        ])))
        .mount(&mock_server)
        .await;

    let ctx = create_test_context(create_test_gitlab(&mock_server));
    let registry = ToolRegistry::with_all_tools();

    let args = json!({"project_id": "test/project"});
    let result = registry.execute("list_branches", &ctx, args).await.unwrap();

    assert!(!result.is_error);
    let text = text_of(&result.content[0]);
    assert!(text.contains("main"));
    assert!(text.contains("develop"));
}

#[tokio::test]
async fn test_list_commits_with_ref_name() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects/test%2Fproject/repository/commits"))
        .and(query_param("ref_name", "develop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "abc123", "title": "Fix bug", "author_name": "alice"}
        ])))
        .mount(&mock_server)
        .await;

    let ctx = create_test_context(create_test_gitlab(&mock_server));
    let registry = ToolRegistry::with_all_tools();

    let args = json!({"project_id": "test/project", "ref_name": "develop"});
    let result = registry.execute("list_commits", &ctx, args).await.unwrap();

    assert!(!result.is_error);
    assert!(text_of(&result.content[0]).contains("Fix bug"));
}

// ============================================================================
// Error Handling Tests
// ============================================================================

#[tokio::test]
async fn test_missing_required_param_makes_no_request() {
    let mock_server = MockServer::start().await;

    // Argument validation must fail before any HTTP call happens
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let ctx = create_test_context(create_test_gitlab(&mock_server));
    let registry = ToolRegistry::with_all_tools();

    let err = registry
        .execute("list_issues", &ctx, json!({"state": "opened"}))
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::Validation(_)));
}

#[tokio::test]
async fn test_every_tool_validates_before_network() {
    let mock_server = MockServer::start().await;

    // Every tool with required parameters must reject an empty argument
    // object without touching the network. list_projects is the one tool
    // with no required parameters, so it is not part of this sweep.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let ctx = create_test_context(create_test_gitlab(&mock_server));
    let registry = ToolRegistry::with_all_tools();

    for name in [
        "get_project",
        "list_issues",
        "create_issue",
        "list_merge_requests",
        "create_merge_request",
        "get_file_content",
        "list_branches",
        "list_commits",
    ] {
        let err = registry.execute(name, &ctx, json!({})).await.unwrap_err();
        assert!(
            matches!(err, ToolError::Validation(_)),
            "{} accepted empty arguments: {:?}",
            name,
            err
        );
    }
}

#[tokio::test]
async fn test_upstream_404_preserves_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects/missing%2Fproject"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"message": "404 Project Not Found"})),
        )
        .mount(&mock_server)
        .await;

    let ctx = create_test_context(create_test_gitlab(&mock_server));
    let registry = ToolRegistry::with_all_tools();

    let err = registry
        .execute("get_project", &ctx, json!({"project_id": "missing/project"}))
        .await
        .unwrap_err();

    match err {
        ToolError::GitLab(gitlab_err) => {
            assert_eq!(gitlab_err.status(), Some(404));
            assert!(gitlab_err.to_string().contains("404 Project Not Found"));
        }
        other => panic!("expected GitLab error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unknown_tool() {
    let mock_server = MockServer::start().await;
    let ctx = create_test_context(create_test_gitlab(&mock_server));
    let registry = ToolRegistry::with_all_tools();

    let err = registry
        .execute("delete_everything", &ctx, json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::NotFound(_)));
}
