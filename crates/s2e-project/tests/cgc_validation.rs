//! Configuration rules applied to CGC (Decree) projects.

use s2e_project::{keys, ProjectConfig, ProjectError, ProjectKind};
use serde_json::{json, Value};

fn config(value: Value) -> ProjectConfig {
    serde_json::from_value(value).unwrap()
}

#[test]
fn arguments_are_fatal_and_nothing_is_forced() {
    let mut cfg = config(json!({
        "target_args": ["-x"],
        "use_seeds": false,
        "use_recipes": false,
    }));

    let err = ProjectKind::Cgc.validate_configuration(&mut cfg).unwrap_err();
    match err {
        ProjectError::Configuration(msg) => {
            assert_eq!(msg, "Command line arguments for Decree binaries not supported")
        }
        other => panic!("Expected Configuration error, got {:?}", other),
    }
    assert_eq!(cfg.get(keys::USE_SEEDS), Some(&json!(false)));
    assert_eq!(cfg.get(keys::USE_RECIPES), Some(&json!(false)));
    assert!(cfg.get(keys::WARN_INPUT_FILE).is_none());
    assert!(cfg.get(keys::WARN_SEEDS).is_none());
}

#[test]
fn missing_seeds_and_recipes_are_forced_on_with_two_warnings() {
    let mut cfg = config(json!({
        "target_args": [],
        "use_seeds": false,
        "use_recipes": false,
    }));

    let report = ProjectKind::Cgc.validate_configuration(&mut cfg).unwrap();

    assert_eq!(cfg.get(keys::USE_SEEDS), Some(&json!(true)));
    assert_eq!(cfg.get(keys::USE_RECIPES), Some(&json!(true)));
    assert_eq!(cfg.get(keys::WARN_INPUT_FILE), Some(&json!(false)));
    assert_eq!(cfg.get(keys::WARN_SEEDS), Some(&json!(false)));
    assert_eq!(
        report.warnings,
        vec![
            "CGC requires seeds, forcing seed option on".to_string(),
            "CGC requires recipes, forcing recipe option on".to_string(),
        ]
    );
}

#[test]
fn absent_options_default_to_off_and_get_forced() {
    let mut cfg = ProjectConfig::new();

    let report = ProjectKind::Cgc.validate_configuration(&mut cfg).unwrap();

    assert_eq!(report.warnings.len(), 2);
    assert!(cfg.bool_or(keys::USE_SEEDS, false).unwrap());
    assert!(cfg.bool_or(keys::USE_RECIPES, false).unwrap());
}

#[test]
fn enabled_options_produce_no_warnings_but_still_silence_input_warnings() {
    let mut cfg = config(json!({
        "use_seeds": true,
        "use_recipes": true,
        "warn_input_file": true,
        "warn_seeds": true,
    }));

    let report = ProjectKind::Cgc.validate_configuration(&mut cfg).unwrap();

    assert!(report.is_clean());
    assert_eq!(cfg.get(keys::WARN_INPUT_FILE), Some(&json!(false)));
    assert_eq!(cfg.get(keys::WARN_SEEDS), Some(&json!(false)));
}

#[test]
fn only_seeds_missing_warns_once() {
    let mut cfg = config(json!({ "use_seeds": false, "use_recipes": true }));

    let report = ProjectKind::Cgc.validate_configuration(&mut cfg).unwrap();

    assert_eq!(
        report.warnings,
        vec!["CGC requires seeds, forcing seed option on".to_string()]
    );
}

#[test]
fn null_arguments_count_as_none() {
    let mut cfg = config(json!({ "target_args": null }));
    assert!(ProjectKind::Cgc.validate_configuration(&mut cfg).is_ok());
}

#[test]
fn second_pass_is_a_no_op() {
    let mut cfg = config(json!({ "target_path": "/bin/cgc-bin", "target_args": [] }));
    ProjectKind::Cgc.validate_configuration(&mut cfg).unwrap();
    let after_first = cfg.clone();

    let report = ProjectKind::Cgc.validate_configuration(&mut cfg).unwrap();

    assert!(report.is_clean());
    assert_eq!(cfg, after_first);
}

#[test]
fn other_kinds_leave_configuration_alone() {
    for kind in [ProjectKind::Windows, ProjectKind::Linux] {
        let mut cfg = config(json!({ "target_args": ["-x"], "use_seeds": false }));
        let before = cfg.clone();

        let report = kind.validate_configuration(&mut cfg).unwrap();

        assert!(report.is_clean());
        assert_eq!(cfg, before);
    }
}
