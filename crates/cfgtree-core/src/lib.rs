//! Section resolution, argument merging and parameter binding for cfgtree
//!
//! This crate sits on top of `cfgtree-sections` and turns section indexes
//! into parameter values:
//!
//! - **Selection**: which sections of a cfg file apply to a request, with
//!   exclusions, full-path lookups, substitutions and exclusive siblings
//! - **Placeholders**: section identity substituted into section lines
//! - **Merge pipeline**: prefix scopes, comma fan-out and `+=` accumulation
//!   over the concatenated file and command-line arguments
//! - **Binding**: typed assignment into a [`ParamTree`]
//!
//! # Architecture
//!
//! ```text
//!                   cfgtree-cli
//!                        |
//!                  cfgtree-core
//!                        |
//!            +-----------+-----------+
//!            |                       |
//!     cfgtree-sections          cfgtree-fs
//! ```
//!
//! # Example
//!
//! ```ignore
//! use cfgtree_core::{ParamSet, ParamValue, ProcessOptions, process};
//!
//! let mut params = ParamSet::new().with("lr", ParamValue::Float(0.1));
//! let options = ProcessOptions::new(&["train:fast"], &["--lr=0.5"]);
//! let outcome = process(&mut params, &options)?;
//! for report in &outcome.reports {
//!     println!("{report}");
//! }
//! ```

pub mod bind;
pub mod config;
pub mod error;
pub mod merge;
pub mod params;
pub mod process;
pub mod resolve;
pub mod snapshot;

pub use bind::{bind, help_text};
pub use config::{ResolverSettings, SettingsLayer, SettingsResolver};
pub use error::{Error, Result};
pub use merge::{HELP_FLAGS, MergedArgs, merge_args, split_arg};
pub use params::{Leaf, Param, ParamKind, ParamSet, ParamTree, ParamValue};
pub use process::{ArgStream, ProcessOptions, ProcessOutcome, build_args, process, process_json};
pub use resolve::{CfgPass, ReportEntry, Resolution, SectionReport, resolve_sections};
pub use snapshot::{read_params, write_params};
