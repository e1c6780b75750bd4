//! Resolve command implementation

use std::path::Path;

use cfgtree_core::{ParamSet, ParamTree, process};
use cfgtree_fs::{NormalizedPath, SettingsStore};
use colored::Colorize;
use serde_json::Value;

use crate::context::CliContext;
use crate::error::{CliError, Result};

/// Load a TOML, JSON or YAML defaults document as a parameter tree.
pub fn load_defaults(path: &Path) -> Result<ParamSet> {
    let path = NormalizedPath::new(path);
    if !path.is_file() {
        return Err(CliError::user(format!("defaults file not found: {path}")));
    }
    let document: Value = SettingsStore::new().load(&path)?;
    Ok(ParamSet::from_json(&document)?)
}

/// Run the resolve command
pub fn run_resolve(
    context: &CliContext,
    defaults: &Path,
    specs: &[String],
    json: bool,
    args: &[String],
) -> Result<()> {
    let mut tree = load_defaults(defaults)?;
    let outcome = process(&mut tree, &context.options(specs, args))?;

    if let Some(help) = outcome.help {
        println!("{help}");
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&tree.to_json())?);
    } else {
        for line in value_lines(&tree) {
            println!("{line}");
        }
    }

    if !outcome.unknown.is_empty() {
        eprintln!(
            "{} ignored unknown arguments: {}",
            "warning:".yellow().bold(),
            outcome.unknown.join(" ")
        );
    }
    Ok(())
}

/// `name=value` for every member that has a value.
pub fn value_lines(tree: &dyn ParamTree) -> Vec<String> {
    tree.leaves()
        .into_iter()
        .filter_map(|leaf| {
            let value = leaf.value?;
            Some(format!("{}={}", leaf.name, value.to_arg_text()))
        })
        .collect()
}
