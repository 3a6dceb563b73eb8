//! Digest rendering modules.

pub mod generator;

pub use generator::generate_digest;
