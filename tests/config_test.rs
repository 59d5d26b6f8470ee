use serde_json::json;
use std::io::Write;
use std::path::PathBuf;
use stencil::config::{load_plan, parse_plan, ConfigSource, GenerationPlan};
use stencil::error::Error;
use tempfile::TempDir;

#[test]
fn test_parse_json_plan() {
    let plan = parse_plan(
        r#"{
            "global": {"proj": "demo", "version": 2},
            "files": [
                {"name": "README.md", "path": "", "template": "readme.tmpl", "local": {}},
                {"name": "main.go", "path": "cmd/demo", "template": "main.tmpl", "local": {"pkg": "main"}}
            ],
            "commands": [{"name": "go", "args": ["mod", "init", "demo"]}]
        }"#,
    )
    .unwrap();

    assert_eq!(plan.global["proj"], json!("demo"));
    assert_eq!(plan.global["version"], json!(2));
    assert_eq!(plan.files.len(), 2);
    assert_eq!(plan.files[1].path, "cmd/demo");
    assert_eq!(plan.files[1].local["pkg"], json!("main"));
    assert_eq!(plan.commands[0].name, "go");
    assert_eq!(plan.commands[0].args, vec!["mod", "init", "demo"]);
}

#[test]
fn test_optional_sections_default_to_empty() {
    let plan = parse_plan(r#"{"files": [{"name": "a", "template": "a.tmpl"}]}"#).unwrap();

    assert!(plan.global.is_empty());
    assert!(plan.commands.is_empty());
    assert_eq!(plan.files[0].path, "");
    assert!(plan.files[0].local.is_empty());

    assert_eq!(parse_plan("{}").unwrap(), GenerationPlan::default());
}

#[test]
fn test_null_sections_are_empty() {
    let plan = parse_plan(
        r#"{"global": null, "files": [{"name": "a", "template": "a.tmpl", "local": null}], "commands": null}"#,
    )
    .unwrap();
    assert!(plan.global.is_empty());
    assert!(plan.files[0].local.is_empty());
    assert!(plan.commands.is_empty());
}

#[test]
fn test_global_preserves_declaration_order() {
    let plan = parse_plan(r#"{"global": {"zeta": 1, "alpha": 2, "mid": 3}}"#).unwrap();
    let keys: Vec<&str> = plan.global.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_parse_yaml_plan() {
    let plan = parse_plan(
        "global:\n  proj: demo\nfiles:\n  - name: README.md\n    template: readme.tmpl\n    local:\n      tags: [a, b]\n",
    )
    .unwrap();

    assert_eq!(plan.global["proj"], json!("demo"));
    assert_eq!(plan.files[0].name, "README.md");
    assert_eq!(plan.files[0].local["tags"], json!(["a", "b"]));
}

#[test]
fn test_missing_required_field() {
    let result = parse_plan(r#"{"files": [{"name": "README.md"}]}"#);
    assert!(matches!(result, Err(Error::ConfigError(_))));
}

#[test]
fn test_malformed_document() {
    let result = parse_plan(r#"{"global": {"proj": "demo""#);
    assert!(matches!(result, Err(Error::ConfigError(_))));
}

#[test]
fn test_load_plan_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("plan.json");
    let mut file = std::fs::File::create(&path).unwrap();
    write!(file, r#"{{"global": {{"proj": "demo"}}}}"#).unwrap();

    let plan = load_plan(&ConfigSource::File(path)).unwrap();
    assert_eq!(plan.global["proj"], json!("demo"));
}

#[test]
fn test_load_plan_missing_file() {
    let result = load_plan(&ConfigSource::File(PathBuf::from("/nonexistent/plan.json")));
    match result {
        Err(Error::ConfigError(msg)) => assert!(msg.contains("/nonexistent/plan.json")),
        other => panic!("Expected ConfigError, got {other:?}"),
    }
}

#[test]
fn test_detect_config_source() {
    assert_eq!(
        ConfigSource::detect(Some(PathBuf::from("plan.json")), true).unwrap(),
        ConfigSource::File(PathBuf::from("plan.json"))
    );
    assert_eq!(ConfigSource::detect(None, false).unwrap(), ConfigSource::Stdin);
    assert!(matches!(ConfigSource::detect(None, true), Err(Error::UsageError(_))));
}
