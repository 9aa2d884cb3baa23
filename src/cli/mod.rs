//! Command-line interface

pub mod args;
pub mod commands;

pub use args::{CacheAction, CacheArgs, Cli, Commands, ResolveArgs};
