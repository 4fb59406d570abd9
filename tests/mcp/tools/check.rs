use pretty_assertions::assert_eq;
use rmcp::handler::server::wrapper::Parameters;
use serde_json::json;
use sqlid::mcp::{SqlidMcpServer, types::CheckSqlIdsParams};

use crate::{McpTestFixture, extract_tool_result_json, fixture_board_project};

// ============================================================================
// check_sql_ids tests
// ============================================================================

#[tokio::test]
async fn test_check_reports_undefined_and_unused() {
    let fixture = fixture_board_project().unwrap();
    let server = SqlidMcpServer::new();

    let params = Parameters(CheckSqlIdsParams {
        project_root_path: fixture.root(),
        defined_path: Some("mapper".to_string()),
    });

    let result = server.check_sql_ids(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["inventory"], "mapper");
    assert_eq!(
        json_result["summary"],
        json!({ "used": 4, "defined": 3, "undefined": 2, "unused": 1 })
    );
    assert_eq!(
        json_result["undefined"],
        json!([
            {
                "identifier": "audit.write",
                "namespace": "audit",
                "status": "missing-namespace",
                "references": [
                    { "file": "src/board/BoardService.java", "line": 6, "method": "insert" }
                ]
            },
            {
                "identifier": "board.remove",
                "namespace": "board",
                "status": "missing-id",
                "references": [
                    { "file": "src/board/BoardService.java", "line": 5, "method": "delete" }
                ]
            }
        ])
    );
    assert_eq!(
        json_result["unused"],
        json!([{ "id": "board.count", "kind": "select", "source": "BoardMapper.xml" }])
    );
}

#[tokio::test]
async fn test_check_uses_defined_path_from_config() {
    let fixture = fixture_board_project().unwrap();
    fixture
        .write_config(&json!({ "definedPath": "mapper/BoardMapper.xml" }))
        .unwrap();
    let server = SqlidMcpServer::new();

    let params = Parameters(CheckSqlIdsParams {
        project_root_path: fixture.root(),
        defined_path: None,
    });

    let result = server.check_sql_ids(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["summary"]["defined"], 3);
}

#[tokio::test]
async fn test_check_absolute_inventory_path() {
    let fixture = fixture_board_project().unwrap();
    let list = McpTestFixture::new().unwrap();
    list.write_file(
        "defined.txt",
        "board.list\nboard.get\nboard.remove\naudit.write\n",
    )
    .unwrap();
    let server = SqlidMcpServer::new();

    let params = Parameters(CheckSqlIdsParams {
        project_root_path: fixture.root(),
        defined_path: Some(list.root_path().join("defined.txt").to_string_lossy().to_string()),
    });

    let result = server.check_sql_ids(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["summary"]["undefined"], 0);
    assert_eq!(json_result["unused"], json!([]));
}

#[tokio::test]
async fn test_check_without_inventory_is_error() {
    let fixture = fixture_board_project().unwrap();
    let server = SqlidMcpServer::new();

    let params = Parameters(CheckSqlIdsParams {
        project_root_path: fixture.root(),
        defined_path: None,
    });

    let err = server.check_sql_ids(params).await.unwrap_err();
    assert!(err.message.contains("No inventory given"));
}

#[tokio::test]
async fn test_check_missing_inventory_is_error() {
    let fixture = fixture_board_project().unwrap();
    let server = SqlidMcpServer::new();

    let params = Parameters(CheckSqlIdsParams {
        project_root_path: fixture.root(),
        defined_path: Some("nope".to_string()),
    });

    let err = server.check_sql_ids(params).await.unwrap_err();
    assert!(err.message.contains("Inventory not found"));
}
