use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde_json::Value;
use tempfile::TempDir;


/// Temporary project holding service sources and mapper files.
pub struct McpTestFixture {
    _temp_dir: TempDir,
    project_root: PathBuf,
}

impl McpTestFixture {
    /// Empty project; the `.git` marker keeps config lookup inside it.
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_root = temp_dir.path().canonicalize()?;
        fs::create_dir(project_root.join(".git"))?;

        Ok(Self {
            _temp_dir: temp_dir,
            project_root,
        })
    }

    /// Write a file relative to the project root, creating parents.
    pub fn write_file(&self, relative_path: &str, content: &str) -> Result<()> {
        let path = self.project_root.join(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        Ok(())
    }

    /// Write a .sqlidrc.json config file
    pub fn write_config(&self, content: &Value) -> Result<()> {
        let json_str = serde_json::to_string_pretty(content)?;
        self.write_file(".sqlidrc.json", &format!("{}\n", json_str))
    }

    /// Project root as the string MCP parameters expect.
    pub fn root(&self) -> String {
        self.project_root.to_string_lossy().to_string()
    }

    pub fn root_path(&self) -> &Path {
        &self.project_root
    }
}

// ============================================================================
// Fixture Generators
// ============================================================================

/// A project with one service class and one mapper.
///
/// Used: board.list, board.get, board.remove (undefined), audit.write (no namespace).
/// Defined: board.list, board.get, board.count (unused).
pub fn fixture_board_project() -> Result<McpTestFixture> {
    let fixture = McpTestFixture::new()?;
    fixture.write_file(
        "src/board/BoardService.java",
        r#"@Service
public class BoardService {
    public List<BoardVO> list() { return sqlSession.selectList("board.list"); }
    public BoardVO get(String id) { return sqlSession.selectOne("board.get", id); }
    public void remove(String id) { sqlSession.delete("board.remove", id); }
    public void audit() { sqlSession.insert("audit.write"); }
}
"#,
    )?;
    fixture.write_file(
        "mapper/BoardMapper.xml",
        r#"<?xml version="1.0" encoding="UTF-8"?>
<mapper namespace="board">
    <select id="list" resultType="BoardVO">SELECT * FROM board</select>
    <select id="get" parameterType="String" resultType="BoardVO">SELECT * FROM board WHERE id = #{id}</select>
    <select id="count" resultType="int">SELECT COUNT(*) FROM board</select>
</mapper>
"#,
    )?;
    Ok(fixture)
}

/// A project with `count` service classes each calling `common.code` and one
/// statement of their own.
pub fn fixture_many_services(count: usize) -> Result<McpTestFixture> {
    let fixture = McpTestFixture::new()?;
    for i in 0..count {
        fixture.write_file(
            &format!("src/s{i:03}/S{i:03}Service.java"),
            &format!(
                "@Service\nclass S{i:03}Service {{\n  void a() {{ sqlSession.selectOne(\"common.code\"); }}\n  void b() {{ sqlSession.selectOne(\"s{i:03}.get\"); }}\n}}\n"
            ),
        )?;
    }
    Ok(fixture)
}

/// Parse the JSON text content of a successful tool result.
pub fn extract_tool_result_json(result: &rmcp::model::CallToolResult) -> Value {
    assert_ne!(result.is_error, Some(true), "tool reported an error: {:?}", result);

    let text = result
        .content
        .first()
        .and_then(|content| content.as_text())
        .expect("tool result carries a text item");

    serde_json::from_str(&text.text).expect("tool result text is JSON")
}
