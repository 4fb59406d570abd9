use rmcp::handler::server::wrapper::Parameters;
use serde_json::json;
use sqlid::mcp::{SqlidMcpServer, types::GetConfigParams};

use crate::{McpTestFixture, extract_tool_result_json};

// ============================================================================
// get_config tests
// ============================================================================

#[tokio::test]
async fn test_get_config_defaults() {
    let fixture = McpTestFixture::new().unwrap();
    let server = SqlidMcpServer::new();

    let params = Parameters(GetConfigParams {
        project_root_path: fixture.root(),
    });

    let result = server.get_config(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["fromFile"], false);
    assert_eq!(json_result["config"]["fileSuffix"], "Service.java");
    assert_eq!(json_result["config"]["classMarker"], "@Service");
    assert_eq!(json_result["config"]["receiver"], "sqlSession");
    assert_eq!(json_result["config"]["readTimeoutMs"], 30000);
    assert!(json_result["config"]["ignores"].is_array());
}

#[tokio::test]
async fn test_get_config_from_sqlidrc() {
    let fixture = McpTestFixture::new().unwrap();
    fixture
        .write_config(&json!({
            "fileSuffix": "Dao.java",
            "receiver": "template",
            "readTimeoutMs": null
        }))
        .unwrap();
    let server = SqlidMcpServer::new();

    let params = Parameters(GetConfigParams {
        project_root_path: fixture.root(),
    });

    let result = server.get_config(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["fromFile"], true);
    assert_eq!(json_result["config"]["fileSuffix"], "Dao.java");
    assert_eq!(json_result["config"]["receiver"], "template");
    assert_eq!(json_result["config"]["readTimeoutMs"], json!(null));
}

#[tokio::test]
async fn test_get_config_invalid_file_is_error() {
    let fixture = McpTestFixture::new().unwrap();
    fixture.write_file(".sqlidrc.json", "{ broken").unwrap();
    let server = SqlidMcpServer::new();

    let params = Parameters(GetConfigParams {
        project_root_path: fixture.root(),
    });

    let err = server.get_config(params).await.unwrap_err();
    assert!(err.message.contains("Failed to parse config file"));
}
