use anyhow::{Context, Result};
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::{CliTest, run};

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let result = run(test.command().arg("init"))?;

    assert_eq!(result.code, Some(0));
    assert_eq!(result.stdout, "✓ Created .sqlidrc.json\n");

    let content = test.read_file(".sqlidrc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    assert_eq!(parsed["fileSuffix"], "Service.java");
    assert_eq!(parsed["classMarker"], "@Service");
    assert_eq!(parsed["receiver"], "sqlSession");
    assert_eq!(parsed["readTimeoutMs"], 30000);
    assert!(content.contains("  "), "Config should use 2-space indentation");
    Ok(())
}

#[test]
fn test_init_refuses_to_overwrite() -> Result<()> {
    let test = CliTest::with_file(".sqlidrc.json", "{}")?;

    let result = run(test.command().arg("init"))?;

    assert_eq!(result.code, Some(2));
    assert!(result.stderr.contains(".sqlidrc.json already exists"));
    assert_eq!(test.read_file(".sqlidrc.json")?, "{}");
    Ok(())
}

#[test]
fn test_created_config_is_picked_up() -> Result<()> {
    let test = CliTest::with_file(
        "UserService.java",
        r#"@Service class UserService { sqlSession.selectOne("user.getUser"); }"#,
    )?;
    run(test.command().arg("init"))?;

    let result = run(&mut test.scan_command())?;

    assert_eq!(result.code, Some(0));
    assert_eq!(result.stdout, "user.getUser\n");
    Ok(())
}

#[test]
fn test_no_command_prints_help() -> Result<()> {
    let test = CliTest::new()?;

    let result = run(&mut test.command())?;

    assert_eq!(result.code, Some(0));
    assert!(result.stdout.contains("Usage:"));
    Ok(())
}
