use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, run};

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let (code, stdout, _) = run(test.command().arg("init"))?;
    assert_eq!(code, 0);
    assert_eq!(stdout, "✓ Created .lingorc.json\n");

    let content = test.read_file(".lingorc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    assert_eq!(parsed["includes"], serde_json::json!(["src"]));
    assert_eq!(parsed["hashLength"], 10);
    assert_eq!(parsed["argMode"], "named");
    assert_eq!(parsed["json"]["output"], "i18n/messages.json");
    assert!(content.contains("\n  \"includes\""), "2-space indentation");

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".lingorc.json", "{}")?;

    let (code, _, stderr) = run(test.command().arg("init"))?;
    assert_eq!(code, 1);
    assert_eq!(stderr, "Error: .lingorc.json already exists\n");
    assert_eq!(test.read_file(".lingorc.json")?, "{}");

    Ok(())
}
