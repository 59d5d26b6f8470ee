use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use stencil::cli::Args;
use stencil::config::ConfigSource;
use stencil::error::Error;
use stencil::processor::OutputMode;

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("stencil")];
    res.extend(args.iter().map(OsString::from));
    res
}

#[test]
fn test_basic_args() {
    let parsed = Args::try_parse_from(make_args(&[])).unwrap();

    assert_eq!(parsed.config, None);
    assert_eq!(parsed.templates, None);
    assert_eq!(parsed.output, None);
    assert!(!parsed.separator);
    assert!(!parsed.verbose);
}

#[test]
fn test_long_flags() {
    let args = make_args(&[
        "--configuration",
        "plan.json",
        "--templates",
        "./templates",
        "--output",
        "./out",
        "--project-name",
        "demo",
        "--verbose",
    ]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.config, Some(PathBuf::from("plan.json")));
    assert_eq!(parsed.templates, Some(PathBuf::from("./templates")));
    assert_eq!(parsed.output, Some(PathBuf::from("./out")));
    assert_eq!(parsed.project_name.as_deref(), Some("demo"));
    assert!(parsed.verbose);
}

#[test]
fn test_short_flags() {
    let args = make_args(&["-c", "plan.json", "-t", "tpl", "-s", "-v"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.config, Some(PathBuf::from("plan.json")));
    assert_eq!(parsed.templates, Some(PathBuf::from("tpl")));
    assert!(parsed.separator);
    assert!(parsed.verbose);
}

#[test]
fn test_separator_with_output_is_rejected() {
    let parsed = Args::try_parse_from(make_args(&["-s", "-o", "out", "-c", "plan.json"])).unwrap();
    assert!(matches!(parsed.validate(), Err(Error::UsageError(_))));
    assert!(matches!(parsed.settings(false), Err(Error::UsageError(_))));
}

#[test]
fn test_project_name_requires_output() {
    let parsed = Args::try_parse_from(make_args(&["-p", "demo", "-c", "plan.json"])).unwrap();
    assert!(matches!(parsed.validate(), Err(Error::UsageError(_))));
}

#[test]
fn test_missing_config_on_terminal_is_rejected() {
    let parsed = Args::try_parse_from(make_args(&["-t", "tpl"])).unwrap();
    assert!(matches!(parsed.settings(true), Err(Error::UsageError(_))));
}

#[test]
fn test_settings_stream_mode() {
    let parsed = Args::try_parse_from(make_args(&["-t", "tpl", "-s"])).unwrap();
    let settings = parsed.settings(false).unwrap();

    assert_eq!(settings.config, ConfigSource::Stdin);
    assert_eq!(settings.templates_dir, PathBuf::from("tpl"));
    assert_eq!(settings.output, OutputMode::Stream { separator: true });
}

#[test]
fn test_settings_tree_mode() {
    let parsed =
        Args::try_parse_from(make_args(&["-c", "plan.json", "-o", "out", "-p", "demo"])).unwrap();
    let settings = parsed.settings(true).unwrap();

    assert_eq!(settings.config, ConfigSource::File(PathBuf::from("plan.json")));
    assert_eq!(settings.templates_dir, std::env::current_dir().unwrap());
    assert_eq!(
        settings.output,
        OutputMode::Tree { root: PathBuf::from("out"), project_name: Some("demo".to_string()) }
    );
}

#[test]
fn test_unknown_flag() {
    assert!(Args::try_parse_from(make_args(&["--force"])).is_err());
}
