//! Subcommand implementations

pub mod find;
pub mod install;
pub mod list;
pub mod url;
