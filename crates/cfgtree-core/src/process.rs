//! Top-level entry point: cfg files and command-line arguments into a tree

use crate::bind::{bind, help_text};
use crate::config::{ResolverSettings, SettingsLayer};
use crate::merge::{MergedArgs, merge_args};
use crate::params::{ParamKind, ParamSet, ParamTree, ParamValue, coerce};
use crate::resolve::{SectionReport, plan_passes, resolve_sections, split_cfg_list};
use crate::Result;
use cfgtree_sections::{SectionIndex, read_or_load};
use serde_json::Value;

/// Inputs of one [`process`] call besides the tree.
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    /// Cfg list; when empty, the `cfg` member of the tree is used.
    pub cfg: Vec<String>,
    /// Command-line arguments, highest precedence.
    pub args: Vec<String>,
    /// Settings below the ones carried by the tree, usually from
    /// [`SettingsResolver`](crate::config::SettingsResolver).
    pub base: SettingsLayer,
    /// Settings above everything else.
    pub overrides: SettingsLayer,
}

impl ProcessOptions {
    pub fn new<S: AsRef<str>>(cfg: &[S], args: &[S]) -> Self {
        let owned = |items: &[S]| items.iter().map(|s| s.as_ref().to_string()).collect();
        Self {
            cfg: owned(cfg),
            args: owned(args),
            ..Self::default()
        }
    }
}

/// The merged argument stream before binding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgStream {
    pub merged: MergedArgs,
    pub reports: Vec<SectionReport>,
    pub settings: ResolverSettings,
    /// Cfg list the stream was built from.
    pub cfg: Vec<String>,
    /// Cfg list taken from a leading `--cfg=` argument.
    pub cfg_from_cmd: Option<String>,
}

/// Result of a [`process`] call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessOutcome {
    /// Arguments handed to the binder.
    pub args: Vec<String>,
    pub reports: Vec<SectionReport>,
    /// Help text when a help flag was given; nothing was bound then.
    pub help: Option<String>,
    /// Arguments naming no member, kept in allow-unknown mode.
    pub unknown: Vec<String>,
    pub cfg: Vec<String>,
}

fn cfg_from_tree(tree: &dyn ParamTree) -> Vec<String> {
    match tree.value_of("cfg") {
        Some(ParamValue::Str(s) | ParamValue::MultiCfg(s)) if !s.is_empty() => vec![s],
        Some(ParamValue::Seq(items)) => items.iter().map(ToString::to_string).collect(),
        _ => Vec::new(),
    }
}

/// A leading `--cfg=<spec>` or `cfg=<spec>` argument.
fn leading_cfg(args: &[String]) -> Option<String> {
    let first = args.first()?;
    let first = first.strip_prefix("--").unwrap_or(first);
    first.strip_prefix("cfg=").map(str::to_string)
}

/// Resolve every cfg file and merge the result with the command line.
pub fn build_args(tree: &dyn ParamTree, options: &ProcessOptions) -> Result<ArgStream> {
    let mut cmd_args = options.args.as_slice();
    let cfg_from_cmd = leading_cfg(cmd_args);
    if cfg_from_cmd.is_some() {
        cmd_args = &cmd_args[1..];
    }

    let cfg = match &cfg_from_cmd {
        Some(spec) => vec![spec.clone()],
        None if !options.cfg.is_empty() => options.cfg.clone(),
        None => cfg_from_tree(tree),
    };
    let cfg = split_cfg_list(&cfg);

    let mut settings = ResolverSettings::default();
    settings.apply(&options.base);
    settings.apply(&SettingsLayer::from_tree(tree));
    settings.apply(&options.overrides);

    let mut stream: Vec<String> = Vec::new();
    let mut reports = Vec::new();
    let mut previous: Option<SectionIndex> = None;

    for pass in plan_passes(&cfg, &settings)? {
        let index = match previous.take() {
            Some(index) if pass.repeat => {
                let scope = if pass.exclude_common {
                    " without common sections"
                } else {
                    ""
                };
                tracing::info!("Processing repeat parameters from {}{scope}", pass.path);
                index
            }
            _ => read_or_load(&pass.path, settings.cache)?,
        };

        let resolution = resolve_sections(&index, &pass.sections, pass.exclude_common)?;
        if !resolution.report.is_empty() {
            tracing::info!("{}", resolution.report);
        }
        stream.extend(resolution.args);
        stream.push("@".to_string());
        reports.push(resolution.report);
        previous = Some(index);
    }

    stream.push("@".to_string());
    stream.extend(cmd_args.iter().cloned());

    let merged = merge_args(tree, &stream, settings.allow_unknown)?;
    Ok(ArgStream {
        merged,
        reports,
        settings,
        cfg,
        cfg_from_cmd,
    })
}

/// Resolve and bind into `tree`.
pub fn process(tree: &mut dyn ParamTree, options: &ProcessOptions) -> Result<ProcessOutcome> {
    let ArgStream {
        merged,
        reports,
        settings,
        cfg,
        cfg_from_cmd,
    } = build_args(tree, options)?;

    if merged.help {
        return Ok(ProcessOutcome {
            args: merged.args,
            reports,
            help: Some(help_text(tree)),
            unknown: Vec::new(),
            cfg,
        });
    }

    let unknown = bind(tree, &merged.args, settings.allow_unknown)?;

    if let Some(spec) = cfg_from_cmd {
        let kind = tree.kind_of("cfg").filter(|&kind| kind != ParamKind::Nested);
        if let Some(kind) = kind {
            tree.assign("cfg", coerce("cfg", kind, &spec)?)?;
        }
    }

    Ok(ProcessOutcome {
        args: merged.args,
        reports,
        help: None,
        unknown,
        cfg,
    })
}

/// [`process`] a plain JSON document; returns the updated document.
pub fn process_json(defaults: &Value, options: &ProcessOptions) -> Result<(Value, ProcessOutcome)> {
    let mut tree = ParamSet::from_json(defaults)?;
    let outcome = process(&mut tree, options)?;
    Ok((tree.to_json(), outcome))
}
