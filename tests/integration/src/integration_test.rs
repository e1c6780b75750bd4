//! End-to-end integration tests over the shared cfg fixtures
//!
//! These tests exercise the complete flow: import inlining -> template
//! expansion -> section selection -> argument merging -> binding.

use cfgtree_core::{
    Error, ParamSet, ParamTree, ParamValue, ProcessOptions, SettingsLayer, process, process_json,
};
use cfgtree_fs::NormalizedPath;
use cfgtree_sections::SectionIndex;
use cfgtree_test_utils::TestCfgDir;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::path::PathBuf;

/// Directory of the checked-in cfg fixtures
fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../test-fixtures/cfg")
}

fn fixture_text(relative: &str) -> String {
    std::fs::read_to_string(fixtures().join(relative)).expect("Should read fixture")
}

/// Options reading the fixtures in place, without writing caches next to them
fn fixture_options(cfg: &[&str], args: &[&str]) -> ProcessOptions {
    let mut options = ProcessOptions::new(cfg, args);
    options.overrides = SettingsLayer {
        cfg_root: Some(fixtures().to_string_lossy().into_owned()),
        cache: Some(false),
        ..SettingsLayer::default()
    };
    options
}

fn defaults() -> Value {
    json!({
        "seed": 1,
        "tags": [],
        "model": "",
        "epochs": 1,
        "optim": {"name": "", "lr": 0.0}
    })
}

fn strs(items: &[&str]) -> ParamValue {
    ParamValue::Seq(items.iter().map(|s| ParamValue::Str(s.to_string())).collect())
}

#[test]
fn test_fixture_section_tree() {
    let path = NormalizedPath::new(fixtures().join("experiment.cfg"));
    let index = SectionIndex::build(&path).unwrap();

    let names: Vec<(usize, &str)> = index
        .tree
        .iter()
        .map(|(_, node)| (node.level, node.name.as_str()))
        .collect();
    assert_eq!(
        names,
        vec![
            (1, "__common__"),
            (1, "sgd"),
            (1, "adam"),
            (1, "small"),
            (2, "long"),
            (1, "large"),
            (2, "long")
        ]
    );
    assert_eq!(index.tree.find_full_name("largelong").len(), 1);
    assert_eq!(index.imports.len(), 1);
}

#[test]
fn test_imported_and_template_sections_resolve() {
    let (resolved, _) =
        process_json(&defaults(), &fixture_options(&["experiment:adam:large"], &[])).unwrap();

    assert_eq!(
        resolved,
        json!({
            "seed": 0,
            "tags": ["base", "large"],
            "model": "large",
            "epochs": 1,
            "optim": {"name": "adam", "lr": 0.001}
        })
    );
}

#[test]
fn test_nested_section_follows_its_parent() {
    let mut params = ParamSet::from_json(&defaults()).unwrap();
    process(&mut params, &fixture_options(&["experiment:sgd:small:long"], &[])).unwrap();

    assert_eq!(params.value_of("model"), Some(ParamValue::Str("small".into())));
    assert_eq!(params.value_of("epochs"), Some(ParamValue::Int(100)));
    assert_eq!(params.value_of("optim.lr"), Some(ParamValue::Float(0.1)));
}

#[test]
fn test_command_line_extends_cfg_values() {
    let mut params = ParamSet::from_json(&defaults()).unwrap();
    let outcome = process(
        &mut params,
        &fixture_options(&["experiment:sgd:small"], &["optim.lr=0.05", "tags+=cli"]),
    )
    .unwrap();

    assert!(outcome.unknown.is_empty());
    assert_eq!(params.value_of("optim.lr"), Some(ParamValue::Float(0.05)));
    assert_eq!(params.value_of("tags"), Some(strs(&["base", "small", "cli"])));
}

#[test]
fn test_unknown_section_is_reported() {
    let err = process_json(&defaults(), &fixture_options(&["experiment:medium"], &[])).unwrap_err();
    assert!(matches!(
        err,
        Error::SectionNotFound { .. } | Error::InvalidSections { .. }
    ));
}

#[test]
fn test_cache_follows_imported_file_changes() {
    let dir = TestCfgDir::new();
    dir.write("cfg/experiment.cfg", &fixture_text("experiment.cfg"));
    dir.write("cfg/common/optim.cfg", &fixture_text("common/optim.cfg"));

    let mut options = ProcessOptions::new(&["experiment:adam"], &[]);
    options.overrides.cfg_root = Some(dir.cfg_root().to_string());

    let (first, _) = process_json(&defaults(), &options).unwrap();
    assert_eq!(first["optim"]["lr"], json!(0.001));
    dir.assert_cache_exists("experiment");

    dir.write(
        "cfg/common/optim.cfg",
        "## sgd\noptim.name=sgd\n## adam\noptim.name=adam\noptim.lr=0.002\n",
    );
    dir.touch_ahead("cfg/common/optim.cfg", 60);

    let (second, _) = process_json(&defaults(), &options).unwrap();
    assert_eq!(second["optim"]["lr"], json!(0.002));
}
