//! Hierarchical resolution of [`ResolverSettings`]

use crate::Result;
use crate::params::{ParamTree, ParamValue};
use cfgtree_fs::{NormalizedPath, SettingsStore};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name of the project-level settings file.
pub const PROJECT_SETTINGS_FILE: &str = "cfgtree.toml";

/// The effective settings after merging all layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    /// Directory holding the cfg files.
    pub cfg_root: String,
    /// Extension of cfg files, without the dot.
    pub cfg_ext: String,
    /// Prepended to every cfg file name as `<prefix>-`.
    pub cfg_prefix: String,
    /// Appended to every cfg file name as `-<suffix>`.
    pub cfg_suffix: String,
    /// Reuse section indexes persisted next to the cfg files.
    pub cache: bool,
    /// Log and return unknown flags instead of failing.
    pub allow_unknown: bool,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            cfg_root: "cfg".to_string(),
            cfg_ext: "cfg".to_string(),
            cfg_prefix: String::new(),
            cfg_suffix: String::new(),
            cache: true,
            allow_unknown: false,
        }
    }
}

impl ResolverSettings {
    /// Override every field the layer sets.
    pub fn apply(&mut self, layer: &SettingsLayer) {
        if let Some(v) = &layer.cfg_root {
            self.cfg_root = v.clone();
        }
        if let Some(v) = &layer.cfg_ext {
            self.cfg_ext = v.clone();
        }
        if let Some(v) = &layer.cfg_prefix {
            self.cfg_prefix = v.clone();
        }
        if let Some(v) = &layer.cfg_suffix {
            self.cfg_suffix = v.clone();
        }
        if let Some(v) = layer.cache {
            self.cache = v;
        }
        if let Some(v) = layer.allow_unknown {
            self.allow_unknown = v;
        }
    }

    /// Path of the cfg file called `name`:
    /// `<cfg_root>/<cfg_prefix>-<name>-<cfg_suffix>.<cfg_ext>`, each
    /// decoration only when set.
    pub fn cfg_path(&self, name: &str) -> NormalizedPath {
        let mut file = name.to_string();
        if !self.cfg_prefix.is_empty() {
            file = format!("{}-{file}", self.cfg_prefix);
        }
        if !self.cfg_suffix.is_empty() {
            file = format!("{file}-{}", self.cfg_suffix);
        }
        if !self.cfg_ext.is_empty() {
            file = format!("{file}.{}", self.cfg_ext.trim_start_matches('.'));
        }
        NormalizedPath::new(&self.cfg_root).join(&file)
    }
}

/// One partial source of settings; unset fields leave lower layers alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsLayer {
    pub cfg_root: Option<String>,
    pub cfg_ext: Option<String>,
    pub cfg_prefix: Option<String>,
    pub cfg_suffix: Option<String>,
    pub cache: Option<bool>,
    pub allow_unknown: Option<bool>,
}

impl SettingsLayer {
    /// Overlay `other` on top of this layer.
    pub fn merge(&mut self, other: &SettingsLayer) {
        let SettingsLayer {
            cfg_root,
            cfg_ext,
            cfg_prefix,
            cfg_suffix,
            cache,
            allow_unknown,
        } = other.clone();
        self.cfg_root = cfg_root.or(self.cfg_root.take());
        self.cfg_ext = cfg_ext.or(self.cfg_ext.take());
        self.cfg_prefix = cfg_prefix.or(self.cfg_prefix.take());
        self.cfg_suffix = cfg_suffix.or(self.cfg_suffix.take());
        self.cache = cache.or(self.cache);
        self.allow_unknown = allow_unknown.or(self.allow_unknown);
    }

    /// String members of the object tree that name a setting.
    pub fn from_tree(tree: &dyn ParamTree) -> Self {
        let text = |name: &str| match tree.value_of(name) {
            Some(ParamValue::Str(s)) => Some(s),
            _ => None,
        };
        Self {
            cfg_root: text("cfg_root"),
            cfg_ext: text("cfg_ext"),
            cfg_prefix: text("cfg_prefix"),
            cfg_suffix: text("cfg_suffix"),
            cache: None,
            allow_unknown: None,
        }
    }
}

/// Loads and merges the settings files.
pub struct SettingsResolver {
    project_dir: NormalizedPath,

    /// Replaces `dirs::config_dir()/cfgtree` when set.
    global_config_dir_override: Option<PathBuf>,
}

impl SettingsResolver {
    /// Resolver for a project directory, using the platform config
    /// directory for global settings:
    /// - Linux: `~/.config/cfgtree/`
    /// - macOS: `~/Library/Application Support/cfgtree/`
    /// - Windows: `%APPDATA%\cfgtree\`
    pub fn new(project_dir: NormalizedPath) -> Self {
        Self {
            project_dir,
            global_config_dir_override: None,
        }
    }

    /// Resolver with a custom global settings directory.
    pub fn with_global_config_dir(project_dir: NormalizedPath, global_config_dir: PathBuf) -> Self {
        Self {
            project_dir,
            global_config_dir_override: Some(global_config_dir),
        }
    }

    fn global_config_dir(&self) -> Option<PathBuf> {
        if let Some(ref override_dir) = self.global_config_dir_override {
            return Some(override_dir.clone());
        }
        dirs::config_dir().map(|d| d.join("cfgtree"))
    }

    /// Merge of the global and project settings files.
    ///
    /// Missing files are skipped, a malformed one is an error.
    pub fn layer(&self) -> Result<SettingsLayer> {
        let store = SettingsStore::new();
        let mut layer = SettingsLayer::default();

        if let Some(global_dir) = self.global_config_dir() {
            let global_path = NormalizedPath::new(global_dir.join("settings.toml"));
            if let Some(global) = store.load_optional::<SettingsLayer>(&global_path)? {
                tracing::debug!(path = %global_path, "loaded global settings");
                layer.merge(&global);
            }
        }

        let project_path = self.project_dir.join(PROJECT_SETTINGS_FILE);
        if let Some(project) = store.load_optional::<SettingsLayer>(&project_path)? {
            tracing::debug!(path = %project_path, "loaded project settings");
            layer.merge(&project);
        }

        Ok(layer)
    }

    /// Defaults with both settings files applied.
    pub fn resolve(&self) -> Result<ResolverSettings> {
        let mut settings = ResolverSettings::default();
        settings.apply(&self.layer()?);
        Ok(settings)
    }

    pub fn project_dir(&self) -> &NormalizedPath {
        &self.project_dir
    }

    /// Check if a project settings file exists
    pub fn has_project_settings(&self) -> bool {
        self.project_dir.join(PROJECT_SETTINGS_FILE).is_file()
    }
}
