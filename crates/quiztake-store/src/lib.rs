//! quiztake-store — Local key-value persistence.
//!
//! Implementations of the `KeyValueStore` trait from `quiztake-core`: an
//! in-memory store for tests and short-lived commands, and a file-backed
//! store that keeps one file per key under a data directory, mirroring how
//! the web client keeps tokens and progress in localStorage.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;
