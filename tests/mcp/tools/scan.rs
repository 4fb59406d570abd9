use pretty_assertions::assert_eq;
use rmcp::handler::server::wrapper::Parameters;
use serde_json::json;
use sqlid::mcp::{SqlidMcpServer, types::ScanSqlIdsParams};

use crate::{
    McpTestFixture, extract_tool_result_json, fixture_board_project, fixture_many_services,
};

fn params(root: String) -> ScanSqlIdsParams {
    ScanSqlIdsParams {
        project_root_path: root,
        backrefs: None,
        offset: None,
        limit: None,
    }
}

// ============================================================================
// scan_sql_ids tests
// ============================================================================

#[tokio::test]
async fn test_scan_lists_sorted_identifiers() {
    let fixture = fixture_board_project().unwrap();
    let server = SqlidMcpServer::new();

    let result = server
        .scan_sql_ids(Parameters(params(fixture.root())))
        .await
        .unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["totalCount"], 4);
    assert_eq!(json_result["filesScanned"], 1);
    assert_eq!(json_result["candidateFiles"], 1);
    let ids: Vec<&str> = json_result["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["audit.write", "board.get", "board.list", "board.remove"]);
    assert_eq!(json_result["items"][0].get("files"), None);
    assert_eq!(json_result["pagination"]["hasMore"], false);
}

#[tokio::test]
async fn test_scan_with_backrefs() {
    let fixture = fixture_board_project().unwrap();
    let server = SqlidMcpServer::new();

    let mut p = params(fixture.root());
    p.backrefs = Some(true);
    let result = server.scan_sql_ids(Parameters(p)).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(
        json_result["items"][2],
        json!({
            "id": "board.list",
            "occurrences": 1,
            "files": ["src/board/BoardService.java"],
            "references": [
                { "file": "src/board/BoardService.java", "line": 3, "method": "selectList" }
            ]
        })
    );
}

#[tokio::test]
async fn test_scan_pagination() {
    let fixture = fixture_many_services(30).unwrap();
    let server = SqlidMcpServer::new();

    let mut p = params(fixture.root());
    p.offset = Some(10);
    p.limit = Some(5);
    let result = server.scan_sql_ids(Parameters(p)).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    // 30 own statements plus the shared one.
    assert_eq!(json_result["totalCount"], 31);
    assert_eq!(json_result["items"].as_array().unwrap().len(), 5);
    assert_eq!(json_result["items"][0]["id"], "s009.get");
    assert_eq!(
        json_result["pagination"],
        json!({ "offset": 10, "limit": 5, "hasMore": true })
    );
}

#[tokio::test]
async fn test_scan_counts_shared_identifier() {
    let fixture = fixture_many_services(12).unwrap();
    let server = SqlidMcpServer::new();

    let result = server
        .scan_sql_ids(Parameters(params(fixture.root())))
        .await
        .unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["items"][0]["id"], "common.code");
    assert_eq!(json_result["items"][0]["occurrences"], 12);
}

#[tokio::test]
async fn test_scan_empty_project() {
    let fixture = McpTestFixture::new().unwrap();
    let server = SqlidMcpServer::new();

    let result = server
        .scan_sql_ids(Parameters(params(fixture.root())))
        .await
        .unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["totalCount"], 0);
    assert_eq!(json_result["items"], json!([]));
}

#[tokio::test]
async fn test_scan_missing_root_is_error() {
    let fixture = McpTestFixture::new().unwrap();
    let server = SqlidMcpServer::new();

    let missing = fixture.root_path().join("missing");
    let result = server
        .scan_sql_ids(Parameters(params(missing.to_string_lossy().to_string())))
        .await;

    let err = result.unwrap_err();
    assert!(err.message.contains("Root path not found"));
}

#[tokio::test]
async fn test_scan_respects_config() {
    let fixture = fixture_board_project().unwrap();
    fixture
        .write_config(&json!({ "ignores": ["src/board"] }))
        .unwrap();
    let server = SqlidMcpServer::new();

    let result = server
        .scan_sql_ids(Parameters(params(fixture.root())))
        .await
        .unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["totalCount"], 0);
    assert_eq!(json_result["filesScanned"], 0);
}
