//! Args command implementation

use std::path::Path;

use cfgtree_core::{ParamSet, build_args};

use super::resolve::load_defaults;
use crate::context::CliContext;
use crate::error::Result;

/// Run the args command
///
/// Without a defaults document nothing is known about parameter kinds, so
/// `+=` targets are passed through as unknown.
pub fn run_args(
    context: &CliContext,
    specs: &[String],
    defaults: Option<&Path>,
    args: &[String],
) -> Result<()> {
    let tree = match defaults {
        Some(path) => load_defaults(path)?,
        None => ParamSet::new(),
    };
    let mut options = context.options(specs, args);
    if defaults.is_none() {
        options.overrides.allow_unknown = Some(true);
    }

    let stream = build_args(&tree, &options)?;
    for arg in &stream.merged.args {
        println!("{arg}");
    }
    Ok(())
}
