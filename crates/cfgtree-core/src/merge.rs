//! Argument merge pipeline
//!
//! Turns the concatenated file and command-line arguments into a flat list
//! of `--name=value` arguments: prefix scopes are applied, comma groups in
//! names fanned out, `+=` values accumulated and commented-out values
//! dropped.

use crate::params::ParamTree;
use crate::{Error, Result};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Arguments that switch to help mode wherever they appear.
pub const HELP_FLAGS: [&str; 3] = ["-h", "--h", "--help"];

/// `name=value` or `name+=value`, split at the first `=`.
static ARG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>[^=]*?)(?P<acc>\+)?=(?P<value>.*)$").expect("Invalid argument regex")
});

/// Output of [`merge_args`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedArgs {
    /// `--name=value` arguments, later ones overriding earlier ones.
    pub args: Vec<String>,
    /// A help flag was present.
    pub help: bool,
}

/// Split `--name=value` into name and value.
pub fn split_arg(arg: &str) -> Option<(&str, &str)> {
    arg.strip_prefix("--").unwrap_or(arg).split_once('=')
}

fn join_prefix(prefix: &str, name: &str) -> String {
    match (prefix.is_empty(), name.is_empty()) {
        (true, _) => name.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{prefix}.{name}"),
    }
}

fn pop_level(prefix: &str) -> &str {
    prefix.rsplit_once('.').map_or("", |(head, _)| head)
}

fn pop_levels(prefix: &str, levels: usize) -> &str {
    (0..levels).fold(prefix, |pf, _| pop_level(pf))
}

/// New prefix after a prefix argument; `op` is the text after its first `@`.
///
/// `@name` sets the prefix, every further `@` pops one level before `name`
/// is appended. A bare `@` resets.
fn change_prefix(op: &str, prefix: &str) -> String {
    let pops = op.chars().take_while(|&c| c == '@').count();
    let name = op[pops..].trim();
    if pops == 0 {
        return name.to_string();
    }
    join_prefix(pop_levels(prefix, pops), name)
}

/// Prefix of a one-shot `@...name=value` argument with `ats` leading `@`.
fn one_shot_prefix(ats: usize, prefix: &str) -> &str {
    match ats {
        0 | 1 => "",
        n => pop_levels(prefix, n - 2),
    }
}

/// Every name of the cartesian product of the comma alternatives of each
/// dotted segment: `a,b.c` gives `a.c` and `b.c`.
fn fan_out(name: &str) -> Vec<String> {
    name.split('.').fold(vec![String::new()], |heads, segment| {
        heads
            .iter()
            .flat_map(|head| {
                segment
                    .split(',')
                    .map(move |alternative| join_prefix(head, alternative))
            })
            .collect()
    })
}

fn accumulate(
    tree: &dyn ParamTree,
    name: &str,
    arg: &str,
    value: &str,
    seen: &HashMap<String, String>,
    allow_unknown: bool,
) -> Result<String> {
    let Some(kind) = tree.kind_of(name) else {
        if allow_unknown {
            tracing::warn!("Invalid param name {name} in argument {arg}");
            return Ok(value.to_string());
        }
        return Err(Error::UnknownParam {
            name: name.to_string(),
            arg: arg.to_string(),
        });
    };
    let sep = kind.accumulator().ok_or_else(|| Error::AccumulateScalar {
        name: name.to_string(),
        kind: kind.to_string(),
    })?;
    Ok(match seen.get(name) {
        Some(old) => format!("{old}{sep}{value}"),
        None => value.to_string(),
    })
}

/// Merge an argument stream in order.
///
/// `tree` is consulted for the kind of `+=` targets only.
pub fn merge_args(tree: &dyn ParamTree, args: &[String], allow_unknown: bool) -> Result<MergedArgs> {
    let mut prefix = String::new();
    let mut seen: HashMap<String, String> = HashMap::new();
    let mut merged: Vec<(String, String)> = Vec::new();
    let mut help = false;

    for raw in args {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        if HELP_FLAGS.contains(&raw) {
            help = true;
            continue;
        }

        let arg = raw.strip_prefix("--").unwrap_or(raw);
        let (arg, scoped) = match arg.strip_prefix('@') {
            Some(op) if !op.contains('=') => {
                prefix = change_prefix(op, &prefix);
                tracing::trace!(prefix = %prefix, "prefix changed");
                continue;
            }
            Some(op) => {
                let ats = 1 + op.chars().take_while(|&c| c == '@').count();
                let pf = one_shot_prefix(ats, &prefix);
                (join_prefix(pf, op.trim_start_matches('@')), false)
            }
            None => (arg.to_string(), true),
        };

        let caps = ARG_REGEX
            .captures(&arg)
            .ok_or_else(|| Error::invalid_argument(raw, "expected name=value"))?;
        let name = caps["name"].trim();
        if name.is_empty() {
            return Err(Error::invalid_argument(raw, "missing parameter name"));
        }
        let name = if scoped {
            join_prefix(&prefix, name)
        } else {
            name.to_string()
        };
        let value = &caps["value"];

        for target in fan_out(&name) {
            let value = if caps.name("acc").is_some() {
                accumulate(tree, &target, raw, value, &seen, allow_unknown)?
            } else {
                value.to_string()
            };
            seen.insert(target.clone(), value.clone());
            merged.push((target, value));
        }
    }

    let args = merged
        .into_iter()
        .filter(|(_, value)| !value.is_empty() && (value == "#" || !value.starts_with('#')))
        .map(|(name, value)| format!("--{name}={value}"))
        .collect();
    Ok(MergedArgs { args, help })
}
