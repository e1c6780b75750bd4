//! Command implementations for cfgtree-cli

pub mod args;
pub mod resolve;
pub mod sections;

pub use args::run_args;
pub use resolve::run_resolve;
pub use sections::run_sections;
