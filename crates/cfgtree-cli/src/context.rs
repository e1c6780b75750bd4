//! Resolver settings for one invocation
//!
//! Combines the settings files found from the working directory with the
//! global command-line flags.

use std::path::Path;

use cfgtree_core::{ProcessOptions, SettingsLayer, SettingsResolver};
use cfgtree_fs::NormalizedPath;

use crate::cli::Cli;
use crate::error::Result;

/// Settings shared by every command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliContext {
    /// Global and project settings files.
    pub files: SettingsLayer,
    /// Global flags.
    pub flags: SettingsLayer,
}

impl CliContext {
    /// Load settings files relative to `project_dir` and capture the flags.
    pub fn load(cli: &Cli, project_dir: &Path) -> Result<Self> {
        let resolver = SettingsResolver::new(NormalizedPath::new(project_dir));
        Ok(Self {
            files: resolver.layer()?,
            flags: flags_layer(cli),
        })
    }

    /// Options for resolving `specs` with trailing command-line `args`.
    pub fn options(&self, specs: &[String], args: &[String]) -> ProcessOptions {
        ProcessOptions {
            cfg: specs.to_vec(),
            args: args.to_vec(),
            base: self.files.clone(),
            overrides: self.flags.clone(),
        }
    }
}

/// Only flags that were given override lower layers.
pub fn flags_layer(cli: &Cli) -> SettingsLayer {
    SettingsLayer {
        cfg_root: cli.root.clone(),
        cfg_ext: cli.ext.clone(),
        cfg_prefix: None,
        cfg_suffix: None,
        cache: cli.no_cache.then_some(false),
        allow_unknown: cli.allow_unknown.then_some(true),
    }
}
