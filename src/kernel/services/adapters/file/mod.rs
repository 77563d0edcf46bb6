//! Filesystem gateway adapters.

pub mod local;

pub use local::LocalGateway;
