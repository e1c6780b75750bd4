//! Shared test fixtures for the cfgtree workspace.
//!
//! Dev-dependency only, never published.
//!
//! - [`cfg_dir`]: [`TestCfgDir`] builder for temporary cfg trees

pub mod cfg_dir;

pub use cfg_dir::TestCfgDir;
