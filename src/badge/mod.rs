//! Badge generators and artifact synthesis
//!
//! A badge maps a requested artifact name to a generator and its options.
//! Generators are resolved by id from a [`GeneratorRegistry`] and treated
//! as pure functions from package metadata to artifact bytes; this module
//! also owns the well-formedness gate and the error fallback artifact.

pub mod registry;
pub mod svg;

pub use registry::{
    generator_id, Generator, GeneratorOptions, GeneratorRegistry, StaticRegistry,
};
pub use svg::{error_badge, flat_badge, is_well_formed};
