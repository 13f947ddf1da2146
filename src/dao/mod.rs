//! Seams to the managed backend: trait definitions and the bundled adapters.

pub mod backend;
pub mod memory;
pub mod realtime;
#[cfg(feature = "rest-backend")]
pub mod rest;
