//! Settings of the resolver itself
//!
//! Where cfg files live and how their names are decorated is resolved from
//! several sources that are merged in a defined order.
//!
//! # Settings Hierarchy
//!
//! Later sources override earlier ones:
//!
//! 1. **Built-in defaults** - `cfg/<name>.cfg`, caching on, unknown flags fatal
//! 2. **Global settings** - `<config_dir>/cfgtree/settings.toml`
//! 3. **Project settings** - `cfgtree.toml` in the project directory
//! 4. **Object tree** - members named `cfg_root`, `cfg_ext`, `cfg_prefix`, `cfg_suffix`
//! 5. **Explicit overrides** - `ProcessOptions` or command-line flags
//!
//! # Example
//!
//! ```ignore
//! use cfgtree_core::config::SettingsResolver;
//! use cfgtree_fs::NormalizedPath;
//!
//! let resolver = SettingsResolver::new(NormalizedPath::new("."));
//! let settings = resolver.resolve()?;
//! println!("cfg files under {}", settings.cfg_root);
//! ```

mod settings;

pub use settings::{ResolverSettings, SettingsLayer, SettingsResolver};
