use anyhow::Result;
use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use crate::{CliTest, USER_SERVICE, run};

#[test]
fn test_scan_plain_output() -> Result<()> {
    let test = CliTest::with_file("src/main/java/com/example/user/UserService.java", USER_SERVICE)?;

    let result = run(&mut test.scan_command())?;

    assert_eq!(result.code, Some(0));
    assert_snapshot!(result.stdout.trim_end(), @r"
    user.deleteUser
    user.getUser
    user.listUsers
    ");
    assert_eq!(result.stderr, "");
    Ok(())
}

#[test]
fn test_scan_example_from_one_line_class() -> Result<()> {
    let test = CliTest::with_file(
        "XService.java",
        r#"@Service class X { sqlSession.selectOne("getUser"); sqlSession.selectList("getAllUsers"); sqlSession.selectOne("getUser"); }"#,
    )?;

    let result = run(&mut test.scan_command())?;

    assert_eq!(result.stdout, "getAllUsers\ngetUser\n");
    Ok(())
}

#[test]
fn test_scan_skips_non_service_files() -> Result<()> {
    let test = CliTest::new()?;
    // Marker missing.
    test.write_file(
        "HelperService.java",
        r#"@Component class HelperService { sqlSession.selectOne("helper.get"); }"#,
    )?;
    // Suffix does not match.
    test.write_file(
        "UserServiceImpl.java",
        r#"@Service class UserServiceImpl { sqlSession.selectOne("impl.get"); }"#,
    )?;

    let result = run(&mut test.scan_command())?;

    assert_eq!(result.code, Some(0));
    assert_eq!(result.stdout, "");
    Ok(())
}

#[test]
fn test_scan_json_with_backrefs() -> Result<()> {
    let test = CliTest::with_file("user/UserService.java", USER_SERVICE)?;

    let result = run(test
        .scan_command()
        .args(["--format", "json", "--backrefs"]))?;

    assert_eq!(result.code, Some(0));
    let report: Value = serde_json::from_str(&result.stdout)?;
    assert_eq!(report["count"], 3);
    assert_eq!(report["filesScanned"], 1);
    assert_eq!(report["candidateFiles"], 1);
    assert_eq!(
        report["identifiers"][1],
        json!({
            "id": "user.getUser",
            "occurrences": 2,
            "files": ["user/UserService.java"],
            "references": [
                { "file": "user/UserService.java", "line": 6, "method": "selectOne" },
                { "file": "user/UserService.java", "line": 14, "method": "selectOne" }
            ]
        })
    );
    assert_eq!(report["warnings"], json!([]));
    Ok(())
}

#[test]
fn test_scan_json_without_backrefs_has_counts_only() -> Result<()> {
    let test = CliTest::with_file("UserService.java", USER_SERVICE)?;

    let result = run(test.scan_command().args(["--format", "json"]))?;

    let report: Value = serde_json::from_str(&result.stdout)?;
    assert_eq!(
        report["identifiers"][0],
        json!({ "id": "user.deleteUser", "occurrences": 1 })
    );
    Ok(())
}

#[test]
fn test_scan_unreadable_file_is_warning() -> Result<()> {
    let test = CliTest::with_file("UserService.java", USER_SERVICE)?;
    test.write_bytes("BrokenService.java", &[0xff, 0xfe, 0xfd])?;

    let result = run(&mut test.scan_command())?;

    assert_eq!(result.code, Some(0));
    assert_eq!(result.stdout.lines().count(), 3);
    assert!(result.stderr.contains("warning: cannot read file:"));
    assert!(result.stderr.contains("--> BrokenService.java"));
    Ok(())
}

#[test]
fn test_scan_missing_root_is_fatal() -> Result<()> {
    let test = CliTest::new()?;

    let result = run(test.command().args(["scan", "does-not-exist"]))?;

    assert_eq!(result.code, Some(2));
    assert_eq!(result.stdout, "");
    assert_snapshot!(result.stderr.trim_end(), @"Error: Root path not found or not a directory: does-not-exist");
    Ok(())
}

#[test]
fn test_scan_invalid_marker_is_fatal() -> Result<()> {
    let test = CliTest::with_file("UserService.java", USER_SERVICE)?;

    let result = run(test.scan_command().args(["--marker", "@Service("]))?;

    assert_eq!(result.code, Some(2));
    assert_eq!(result.stdout, "");
    assert!(result.stderr.contains("Invalid pattern in 'classMarker'"));
    Ok(())
}

#[test]
fn test_scan_custom_receiver_and_suffix() -> Result<()> {
    let test = CliTest::with_file(
        "UserDao.java",
        r#"@Service class UserDao { template.queryForObject("dao.find"); sqlSession.selectOne("ignored"); }"#,
    )?;

    let result = run(test
        .scan_command()
        .args(["--suffix", "Dao.java", "--receiver", "template"]))?;

    assert_eq!(result.stdout, "dao.find\n");
    Ok(())
}

#[test]
fn test_scan_ignores_from_config() -> Result<()> {
    let test = CliTest::with_file("UserService.java", USER_SERVICE)?;
    test.write_file(
        "build/generated/GenService.java",
        r#"@Service class GenService { sqlSession.selectOne("gen.get"); }"#,
    )?;
    test.write_file(".sqlidrc.json", r#"{ "ignores": ["build"] }"#)?;

    let result = run(&mut test.scan_command())?;

    assert!(!result.stdout.contains("gen.get"));
    assert_eq!(result.stdout.lines().count(), 3);
    Ok(())
}

#[test]
fn test_scan_invalid_config_is_fatal() -> Result<()> {
    let test = CliTest::with_file("UserService.java", USER_SERVICE)?;
    test.write_file(".sqlidrc.json", "{ not json")?;

    let result = run(&mut test.scan_command())?;

    assert_eq!(result.code, Some(2));
    assert!(result.stderr.contains("Failed to parse config file"));
    Ok(())
}

#[test]
fn test_scan_is_deterministic() -> Result<()> {
    let test = CliTest::new()?;
    for i in 0..50 {
        test.write_file(
            &format!("pkg{}/S{}Service.java", i % 5, i),
            &format!(
                "@Service class S{i} {{ sqlSession.selectOne(\"ns{}.q{}\"); }}",
                i % 4,
                i % 9
            ),
        )?;
    }

    let first = run(&mut test.scan_command())?;
    let second = run(test.scan_command().args(["--jobs", "1"]))?;

    assert_eq!(first.stdout, second.stdout);
    Ok(())
}
