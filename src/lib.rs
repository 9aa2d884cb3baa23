//! Badger - package badge resolution with a content-addressed cache
//!
//! Resolves named badge artifacts for versioned packages: a configured
//! badge picks a generator, package metadata pins the version, and the
//! resulting artifact is cached so repeat requests skip regeneration.

pub mod badge;
pub mod cli;
pub mod config;
pub mod error;
pub mod metadata;
pub mod resolver;
pub mod store;

pub use error::{BadgerError, BadgerResult};
pub use resolver::ArtifactResolver;
