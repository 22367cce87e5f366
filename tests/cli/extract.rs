use anyhow::Result;
use insta::assert_snapshot;
use serde_json::Value;

use crate::{CliTest, run};

const MESSAGES: &str = r#"export const messages = {
  greeting: (): string => "Hello",
  welcome: (name: string): string => "Welcome back, {{name}}!",
  /** @notranslate */
  debugInfo: (): string => "Debug: mounted",
};
"#;

#[test]
fn test_extract_writes_dictionary() -> Result<()> {
    let test = CliTest::with_file("src/messages.ts", MESSAGES)?;

    let (code, stdout, _) = run(&mut test.extract_command())?;
    assert_eq!(code, 0);
    assert!(stdout.starts_with("✓ Extracted 2 messages from 1 of 1 source file\n"));
    assert!(stdout.contains("1 function marked @notranslate"));

    assert_snapshot!(test.read_file("i18n/messages.json")?, @r#"
    {
      "185f8db322": "Hello",
      "8ee14abac6": "Welcome back, {{name}}!"
    }
    "#);

    // Sources are only rewritten into an output directory.
    assert_eq!(test.read_file("src/messages.ts")?, MESSAGES);

    Ok(())
}

#[test]
fn test_extract_out_dir_and_source_map() -> Result<()> {
    let test = CliTest::with_file("src/messages.ts", MESSAGES)?;

    let (code, _, _) = run(test.extract_command().args(["--out-dir", "dist"]))?;
    assert_eq!(code, 0);

    let code_out = test.read_file("dist/src/messages.ts")?;
    assert!(code_out.starts_with("import i18next from \"i18next\";\n"));
    assert!(code_out.contains(r#"greeting: (): string => i18next.t("185f8db322"),"#));
    assert!(code_out.contains(r#"welcome: (name: string): string => i18next.t("8ee14abac6", { name }),"#));
    assert!(code_out.contains(r#"debugInfo: (): string => "Debug: mounted","#));
    assert!(code_out.ends_with("//# sourceMappingURL=messages.ts.map\n"));

    let map: Value = serde_json::from_str(&test.read_file("dist/src/messages.ts.map")?)?;
    assert_eq!(map["version"], 3);
    assert_eq!(map["sources"][0], "src/messages.ts");

    Ok(())
}

#[test]
fn test_extract_flags_override_config() -> Result<()> {
    let test = CliTest::with_file(
        "app/menu.ts",
        r#"export const menu = {
  /** @context file-menu */
  close() { return "Close"; },
  home: () => "Home",
};
"#,
    )?;
    test.write_file(
        ".lingorc.json",
        r#"{ "includes": ["app"], "json": { "output": "locales/en.json", "topLevelKey": "translation" } }"#,
    )?;

    let (code, _, _) = run(test
        .extract_command()
        .args(["--default-value", "--arg-mode", "indexed", "--out-dir", "out"]))?;
    assert_eq!(code, 0);

    let out = test.read_file("out/app/menu.ts")?;
    assert!(out.contains(r#"close() { return i18next.t("157c286a50", { defaultValue: "Close" }); },"#));
    assert!(out.contains(r#"home: () => i18next.t("3a78695388", { defaultValue: "Home" }),"#));

    let json: Value = serde_json::from_str(&test.read_file("locales/en.json")?)?;
    assert_eq!(json["translation"]["157c286a50"], "Close");
    assert_eq!(json["translation"]["3a78695388"], "Home");

    Ok(())
}

#[test]
fn test_extract_writes_pot() -> Result<()> {
    let test = CliTest::with_file("src/messages.ts", MESSAGES)?;

    let (code, stdout, _) = run(test.extract_command().args(["--pot", "i18n/messages.pot"]))?;
    assert_eq!(code, 0);
    assert!(stdout.contains("wrote ./i18n/messages.pot"));

    let pot = test.read_file("i18n/messages.pot")?;
    assert!(pot.contains("msgid \"\"\nmsgstr \"\"\n"));
    assert!(pot.contains(
        "#. name: string\n#: src/messages.ts:3:3\nmsgctxt \"8ee14abac6\"\nmsgid \"Welcome back, {{name}}!\"\nmsgstr \"\"\n"
    ));
    assert!(!pot.contains("Debug: mounted"));

    Ok(())
}

#[test]
fn test_extract_skips_test_files_and_unparsable_files() -> Result<()> {
    let test = CliTest::with_file("src/messages.ts", MESSAGES)?;
    test.write_file("src/messages.test.ts", r#"const t = { x: () => "Test only" };"#)?;
    test.write_file("src/broken.ts", "const broken = {\n  a: () => \"Open\",\n")?;

    let (code, stdout, _) = run(&mut test.extract_command())?;
    assert_eq!(code, 0);
    assert!(stdout.starts_with("✓ Extracted 2 messages from 1 of 2 source files\n"));

    let json = test.read_file("i18n/messages.json")?;
    assert!(!json.contains("Test only"));
    assert!(!json.contains("Open"));

    Ok(())
}

#[test]
fn test_extract_invalid_config_is_fatal() -> Result<()> {
    let test = CliTest::with_file("src/messages.ts", MESSAGES)?;
    test.write_file(".lingorc.json", r#"{ "hashLength": 2 }"#)?;

    let (code, _, stderr) = run(&mut test.extract_command())?;
    assert_eq!(code, 2);
    assert!(stderr.starts_with("Error: Invalid 'hashLength': 2"));
    assert!(!test.root().join("i18n/messages.json").exists());

    Ok(())
}

#[test]
fn test_help() -> Result<()> {
    let test = CliTest::new()?;

    let (code, stdout, _) = run(test.command().arg("--help"))?;
    assert_eq!(code, 0);
    assert!(stdout.contains("extract"));
    assert!(stdout.contains("init"));

    Ok(())
}
