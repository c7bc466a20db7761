//! quiztake-core — Attempt flow engine, data model, and traits.
//!
//! This crate defines the fundamental data model, capability traits, and the
//! session-by-session attempt flow that the entire quiztake system builds on.

pub mod engine;
pub mod error;
pub mod flow;
pub mod model;
pub mod snapshot;
pub mod timer;
pub mod traits;
