//! Reading, importing and caching cfg files on disk

use cfgtree_fs::NormalizedPath;
use cfgtree_sections::{Error, SectionIndex, load_cached, read_or_load};
use cfgtree_test_utils::TestCfgDir;
use pretty_assertions::assert_eq;

fn path(dir: &TestCfgDir, name: &str) -> NormalizedPath {
    dir.cfg_path(name)
}

#[test]
fn missing_file_is_fatal() {
    let dir = TestCfgDir::new();
    let result = read_or_load(&path(&dir, "absent"), true);
    assert!(matches!(result, Err(Error::FileNotFound { .. })));
    dir.assert_no_cache("absent");
}

#[test]
fn imports_are_inlined_relative_to_the_importer() {
    let dir = TestCfgDir::new();
    dir.write_cfg("shared/base", "## base\nx=1\n");
    dir.write_cfg("main", "## a\n%import% shared/base.cfg\ny=2\n");

    let index = SectionIndex::build(&path(&dir, "main")).unwrap();
    assert_eq!(index.lines, vec!["## a", "## base", "x=1", "y=2"]);
    assert_eq!(index.imports.len(), 1);
    assert!(index.imports[0].as_str().ends_with("shared/base.cfg"));
}

#[test]
fn diamond_imports_are_allowed() {
    let dir = TestCfgDir::new();
    dir.write_cfg("leaf", "z=0\n");
    dir.write_cfg("left", "%import% leaf.cfg\n");
    dir.write_cfg("right", "%import% leaf.cfg\n");
    dir.write_cfg("top", "## t\n%import% left.cfg\n%import% right.cfg\n");

    let index = SectionIndex::build(&path(&dir, "top")).unwrap();
    assert_eq!(index.lines, vec!["## t", "z=0", "z=0"]);
    assert_eq!(index.imports.len(), 3);
}

#[test]
fn circular_import_is_fatal() {
    let dir = TestCfgDir::new();
    dir.write_cfg("a", "## a\n%import% b.cfg\n");
    dir.write_cfg("b", "%import% a.cfg\n");

    let result = SectionIndex::build(&path(&dir, "a"));
    assert!(matches!(result, Err(Error::CircularImport { .. })));
}

#[test]
fn cache_is_written_and_reused() {
    let dir = TestCfgDir::new();
    dir.write_cfg("train", "## a\nx=1\n## (1,2)\ny=%N%\n");

    let fresh = read_or_load(&path(&dir, "train"), true).unwrap();
    dir.assert_cache_exists("train");

    let cached = load_cached(&path(&dir, "train")).expect("cache should be valid");
    assert_eq!(cached, fresh);
}

#[test]
fn cache_disabled_writes_nothing() {
    let dir = TestCfgDir::new();
    dir.write_cfg("train", "## a\nx=1\n");
    read_or_load(&path(&dir, "train"), false).unwrap();
    dir.assert_no_cache("train");
}

#[test]
fn newer_source_invalidates_cache() {
    let dir = TestCfgDir::new();
    dir.write_cfg("train", "## a\nx=1\n");
    read_or_load(&path(&dir, "train"), true).unwrap();

    dir.write_cfg("train", "## b\nx=2\n");
    dir.touch_ahead("cfg/train.cfg", 60);
    assert!(load_cached(&path(&dir, "train")).is_none());

    let index = read_or_load(&path(&dir, "train"), true).unwrap();
    assert_eq!(index.sections[0].name, "b");
}

#[test]
fn newer_import_invalidates_cache() {
    let dir = TestCfgDir::new();
    dir.write_cfg("base", "x=1\n");
    dir.write_cfg("main", "## m\n%import% base.cfg\n");
    read_or_load(&path(&dir, "main"), true).unwrap();
    assert!(load_cached(&path(&dir, "main")).is_some());

    dir.touch_ahead("cfg/base.cfg", 60);
    assert!(load_cached(&path(&dir, "main")).is_none());
}

#[test]
fn corrupt_cache_falls_back_to_parsing() {
    let dir = TestCfgDir::new();
    dir.write_cfg("train", "## a\nx=1\n");
    dir.write("cfg/.cache/train.cfg.cache", "not json");
    dir.touch_ahead("cfg/.cache/train.cfg.cache", 60);

    assert!(load_cached(&path(&dir, "train")).is_none());
    dir.assert_no_cache("train");

    let index = read_or_load(&path(&dir, "train"), true).unwrap();
    assert_eq!(index.sections[0].name, "a");
    dir.assert_cache_exists("train");
}
