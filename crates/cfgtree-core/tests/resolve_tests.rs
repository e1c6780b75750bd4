//! Tests for section selection, placeholders and the section report

use cfgtree_core::{Error, Resolution, resolve_sections};
use cfgtree_fs::NormalizedPath;
use cfgtree_sections::SectionIndex;
use pretty_assertions::assert_eq;

fn index(text: &str) -> SectionIndex {
    let lines = text.lines().map(|l| l.trim().to_string()).collect();
    SectionIndex::from_lines(&NormalizedPath::new("cfg/demo.cfg"), lines, Vec::new())
        .expect("Should index cfg text")
}

fn resolve(text: &str, requested: &[&str]) -> cfgtree_core::Result<Resolution> {
    let requested: Vec<String> = requested.iter().map(|s| s.to_string()).collect();
    resolve_sections(&index(text), &requested, false)
}

fn args(text: &str, requested: &[&str]) -> Vec<String> {
    resolve(text, requested).expect("Should resolve").args
}

mod selection_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const AB: &str = "## a\nx=1\n## b\nx=2\n";

    #[test]
    fn test_single_section_is_selected() {
        assert_eq!(args(AB, &["b"]), vec!["--x=2"]);
        assert_eq!(args(AB, &["a"]), vec!["--x=1"]);
    }

    #[test]
    fn test_no_request_and_no_common_sections_yields_nothing() {
        assert!(args(AB, &[]).is_empty());
    }

    #[test]
    fn test_sections_follow_document_order() {
        assert_eq!(args(AB, &["b", "a"]), vec!["--x=1", "--x=2"]);
    }

    const TUNING: &str = "## tuning\nlr=1\n## model\n### tuning\nlr=2\n";

    #[test]
    fn test_nested_section_needs_its_parent() {
        assert_eq!(args(TUNING, &["tuning"]), vec!["--lr=1"]);
        assert_eq!(args(TUNING, &["model", "tuning"]), vec!["--lr=1", "--lr=2"]);
    }

    #[test]
    fn test_full_path_request_pins_one_occurrence() {
        let resolution = resolve(TUNING, &["model-tuning"]).unwrap();
        assert_eq!(resolution.args, vec!["--lr=2"]);
        assert_eq!(resolution.report.paths(), vec!["model:tuning"]);
    }

    #[test]
    fn test_unknown_section_is_fatal() {
        let err = resolve(AB, &["c"]).unwrap_err();
        assert!(matches!(err, Error::SectionNotFound { ref section, .. } if section == "c"));
    }

    #[test]
    fn test_orphaned_section_is_reported_invalid() {
        let err = resolve(TUNING, &["tuning", "nested"]).unwrap_err();
        assert!(matches!(err, Error::SectionNotFound { .. }));

        let text = "## mode\n### fast\nsteps=1\n";
        let err = resolve(text, &["fast"]).unwrap_err();
        match err {
            Error::InvalidSections { sections, .. } => assert_eq!(sections, vec!["fast"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_comment_only_section_is_invalid() {
        let text = "## a\n# nothing here\n## b\nx=1\n";
        assert!(matches!(
            resolve(text, &["a"]),
            Err(Error::InvalidEmptySection { .. })
        ));
        assert_eq!(args(text, &["b"]), vec!["--x=1"]);
    }

    #[test]
    fn test_blank_only_section_is_invalid() {
        let text = "## a\n\n## b\nx=1\n";
        assert!(matches!(
            resolve(text, &["a"]),
            Err(Error::InvalidEmptySection { ref section, .. }) if section == "a"
        ));
    }

    #[test]
    fn test_heading_directly_followed_by_heading_is_tolerated() {
        let text = "## a\n## b\nx=1\n";
        assert!(args(text, &["a"]).is_empty());
    }

    #[test]
    fn test_blank_and_comment_edges_are_trimmed() {
        let text = "## a\n\n# lead\nx=1\n# mid\ny=2\n\n# tail\n";
        assert_eq!(args(text, &["a"]), vec!["--x=1", "--y=2"]);
    }
}

mod common_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const WITH_COMMON: &str = "seed=1\n## a\nx=1\n## __extra__\nz=0\n";

    #[test]
    fn test_common_sections_are_always_included() {
        assert_eq!(args(WITH_COMMON, &[]), vec!["--seed=1", "--z=0"]);
        assert_eq!(args(WITH_COMMON, &["a"]), vec!["--seed=1", "--x=1", "--z=0"]);
    }

    #[test]
    fn test_exclusion_removes_common_sections() {
        assert_eq!(
            args(WITH_COMMON, &["!__common__", "a"]),
            vec!["--x=1", "--z=0"]
        );
    }

    #[test]
    fn test_exclude_common_flag() {
        let requested = vec!["a".to_string()];
        let resolution = resolve_sections(&index(WITH_COMMON), &requested, true).unwrap();
        assert_eq!(resolution.args, vec!["--x=1"]);
    }

    #[test]
    fn test_empty_common_section_is_skipped() {
        let text = "## __empty__\n# nothing\n## a\nx=1\n";
        assert_eq!(args(text, &["a"]), vec!["--x=1"]);
    }
}

mod exclusive_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MODE: &str = "## mode\n### fast\nsteps=1\n### __exc__\nsteps=100\n";

    #[test]
    fn test_exclusive_section_applies_without_siblings() {
        assert_eq!(args(MODE, &["mode"]), vec!["--steps=100"]);
    }

    #[test]
    fn test_exclusive_section_yields_to_selected_sibling() {
        assert_eq!(args(MODE, &["mode", "fast"]), vec!["--steps=1"]);
    }

    #[test]
    fn test_first_of_two_exclusive_siblings_wins() {
        let text = "## mode\n### __exc__\na=1\n### __exc__\na=2\n";
        assert_eq!(args(text, &["mode"]), vec!["--a=1"]);
    }

    #[test]
    fn test_exclusive_section_yields_to_later_selected_sibling() {
        let text = "## mode\n### __exc__\nsteps=100\n### slow\nsteps=5\n";
        assert_eq!(args(text, &["mode", "slow"]), vec!["--steps=5"]);
    }
}

mod substitution_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SUB: &str = "## __sub__\n### small\nwidth=8\nname=%N%\n";

    #[test]
    fn test_substitution_renames_section() {
        let resolution = resolve(SUB, &["small-large"]).unwrap();
        assert_eq!(resolution.args, vec!["--width=8", "--name=large"]);
        assert_eq!(resolution.report.paths(), vec!["large"]);
    }

    #[test]
    fn test_substitute_wrapping_is_stripped() {
        assert_eq!(
            args(SUB, &["small-__tiny__"]),
            vec!["--width=8", "--name=tiny"]
        );
    }

    #[test]
    fn test_substitution_leaves_the_index_untouched() {
        let index = index(SUB);
        let requested = vec!["small-large".to_string()];
        resolve_sections(&index, &requested, false).unwrap();
        assert_eq!(index.sections[1].name, "small");
    }

    #[test]
    fn test_missing_substitution_source() {
        assert!(matches!(
            resolve(SUB, &["big-large"]),
            Err(Error::SectionNotFound { .. })
        ));
    }
}

mod placeholder_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_template_sections_carry_their_identity() {
        let text = "## 10,20\nlr=%RI%\ntag=__name__\n";
        assert_eq!(args(text, &["20"]), vec!["--lr=0.2", "--tag=20"]);
    }

    #[test]
    fn test_numeric_placeholder_on_text_name_is_fatal() {
        let text = "## fast\nlr=%RI%\n";
        assert!(matches!(
            resolve(text, &["fast"]),
            Err(Error::Placeholder { .. })
        ));
    }

    #[test]
    fn test_parent_placeholders() {
        let text = "## lr\n### 5_n10\nvalues=%PL%:%LRI%\n";
        assert_eq!(
            args(text, &["lr", "5_n10"]),
            vec!["--values=lr:0.05,-0.1"]
        );
    }
}

mod report_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_report_lists_paths_and_common_lines() {
        let text = "seed=1\n## model\n### tuning\nlr=2\ndropout=0.1\n";
        let resolution = resolve(text, &["model", "tuning"]).unwrap();

        assert_eq!(
            resolution.args,
            vec!["--seed=1", "--lr=2", "--dropout=0.1"]
        );
        insta::assert_snapshot!(resolution.report.to_string(), @r"
        model:tuning: 4 -> 5
        common: 1
        ");
    }
}
