//! Text snapshots of parameter values
//!
//! A snapshot has one `name=value` line per member, in the argument syntax,
//! so reading it back goes through the same merge and bind steps as a cfg
//! file.
//!
//! Text values starting with `#` are written single-quoted so the merge does
//! not drop them as comments. Text that itself begins or ends with a quote
//! character or whitespace does not survive a round trip: argument values
//! lose surrounding quotes and whitespace when read.

use crate::bind::bind;
use crate::merge::merge_args;
use crate::params::{ParamTree, ParamValue};
use crate::Result;
use cfgtree_fs::{NormalizedPath, io};

/// Write every member that has a value, optionally under `prefix.`.
pub fn write_params(tree: &dyn ParamTree, path: &NormalizedPath, prefix: Option<&str>) -> Result<()> {
    let mut content = String::new();
    for leaf in tree.leaves() {
        let Some(value) = leaf.value else {
            continue;
        };
        match prefix {
            Some(prefix) => content.push_str(&format!("{prefix}.{}", leaf.name)),
            None => content.push_str(&leaf.name),
        }
        content.push('=');
        content.push_str(&snapshot_text(&value));
        content.push('\n');
    }
    io::write_atomic(path, content.as_bytes())?;
    tracing::debug!(path = %path, "wrote parameter snapshot");
    Ok(())
}

fn snapshot_text(value: &ParamValue) -> String {
    match value {
        ParamValue::Str(s) | ParamValue::MultiPath(s) | ParamValue::MultiCfg(s)
            if s.starts_with('#') =>
        {
            format!("'{s}'")
        }
        other => other.to_arg_text(),
    }
}

/// Read a snapshot into `tree`; with a prefix only `prefix.` lines are used.
///
/// Returns the lines that named no member in allow-unknown mode.
pub fn read_params(
    tree: &mut dyn ParamTree,
    path: &NormalizedPath,
    prefix: Option<&str>,
    allow_unknown: bool,
) -> Result<Vec<String>> {
    let lines = io::read_lines(path)?;
    let args: Vec<String> = lines
        .iter()
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| match prefix {
            Some(prefix) => line
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix('.'))
                .map(str::to_string),
            None => Some(line.clone()),
        })
        .collect();

    let merged = merge_args(tree, &args, allow_unknown)?;
    bind(tree, &merged.args, allow_unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamSet;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn tree() -> ParamSet {
        let nested = ParamSet::new().with("depth", ParamValue::Int(3));
        ParamSet::new()
            .with("lr", ParamValue::Float(0.5))
            .with("name", ParamValue::Str(String::new()))
            .with(
                "ids",
                ParamValue::Seq(vec![ParamValue::Int(1), ParamValue::Str("b".into())]),
            )
            .with("net", ParamValue::Nested(nested))
    }

    #[test]
    fn snapshot_lines_use_argument_syntax() {
        let dir = TempDir::new().unwrap();
        let path = NormalizedPath::new(dir.path().join("params.txt"));
        write_params(&tree(), &path, Some("train")).unwrap();

        let text = std::fs::read_to_string(path.to_native()).unwrap();
        insta::assert_snapshot!(text, @r"
        train.ids=(1,'b',)
        train.lr=0.5
        train.name=__n__
        train.net.depth=3
        ");
    }

    #[test]
    fn snapshot_reads_back_into_a_fresh_tree() {
        let dir = TempDir::new().unwrap();
        let path = NormalizedPath::new(dir.path().join("params.txt"));
        let mut source = tree();
        source.assign("net.depth", ParamValue::Int(7)).unwrap();
        write_params(&source, &path, None).unwrap();

        let mut target = tree();
        target.assign("lr", ParamValue::Float(0.0)).unwrap();
        let unknown = read_params(&mut target, &path, None, false).unwrap();

        assert!(unknown.is_empty());
        assert_eq!(target, source);
    }

    #[test]
    fn hash_leading_text_survives_a_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = NormalizedPath::new(dir.path().join("params.txt"));
        let mut source = tree();
        source.assign("name", ParamValue::Str("#tag".into())).unwrap();
        write_params(&source, &path, None).unwrap();

        let text = std::fs::read_to_string(path.to_native()).unwrap();
        assert!(text.contains("name='#tag'\n"));

        let mut target = tree();
        read_params(&mut target, &path, None, false).unwrap();
        assert_eq!(target.value_of("name"), Some(ParamValue::Str("#tag".into())));
    }

    #[test]
    fn prefix_filters_foreign_lines() {
        let dir = TempDir::new().unwrap();
        let path = NormalizedPath::new(dir.path().join("params.txt"));
        std::fs::write(path.to_native(), "train.lr=2\neval.lr=3\n").unwrap();

        let mut target = tree();
        read_params(&mut target, &path, Some("train"), false).unwrap();
        assert_eq!(target.value_of("lr"), Some(ParamValue::Float(2.0)));
    }
}
