//! Flag binder: assigns merged arguments to members of a [`ParamTree`]

use crate::merge::split_arg;
use crate::params::{ParamKind, ParamTree, ParamValue, coerce, is_reset_marker};
use crate::{Error, Result};

/// Assign every `--name=value` argument, in order.
///
/// Returns the arguments that name no member; those are an error unless
/// `allow_unknown` is set. Every argument is checked and coerced before
/// the first assignment, so a failing call leaves `tree` untouched.
pub fn bind(tree: &mut dyn ParamTree, args: &[String], allow_unknown: bool) -> Result<Vec<String>> {
    let mut unknown = Vec::new();
    let mut values: Vec<(&str, ParamValue)> = Vec::with_capacity(args.len());

    for arg in args {
        let (name, raw) =
            split_arg(arg).ok_or_else(|| Error::invalid_argument(arg, "expected --name=value"))?;

        let Some(kind) = tree.kind_of(name) else {
            if allow_unknown {
                unknown.push(arg.clone());
                continue;
            }
            return Err(Error::UnknownParam {
                name: name.to_string(),
                arg: arg.clone(),
            });
        };

        if kind == ParamKind::Nested {
            return Err(Error::invalid_argument(
                arg,
                "cannot assign a value to a parameter group",
            ));
        }
        if is_reset_marker(raw) && ParamValue::empty(kind).is_none() {
            tracing::debug!(name, %kind, "ignoring reset marker for scalar member");
            continue;
        }

        values.push((name, coerce(name, kind, raw)?));
    }

    for (name, value) in values {
        tree.assign(name, value)?;
    }

    if !unknown.is_empty() {
        tracing::warn!("Unknown arguments found: {}", unknown.join(" "));
    }
    Ok(unknown)
}

/// One line per member: flag, kind, help and current value.
pub fn help_text(tree: &dyn ParamTree) -> String {
    let leaves = tree.leaves();
    let width = leaves.iter().map(|l| l.name.len()).max().unwrap_or(0) + 2;

    let mut lines = vec!["options:".to_string()];
    for leaf in leaves {
        let mut line = format!("  --{:<width$} {:<10}", leaf.name, leaf.kind.as_str());
        if let Some(help) = &leaf.help {
            line.push(' ');
            line.push_str(help);
        }
        if let Some(value) = &leaf.value {
            line.push_str(&format!(" (default: {})", value.to_arg_text()));
        }
        lines.push(line.trim_end().to_string());
    }
    lines.join("\n")
}
