//! Test support: builders for managed module images.
//!
//! Resolution is exercised against real bytes, so every scenario builds the modules it needs
//! with [`ModuleBuilder`] and, for multi-module cases, writes them into a temporary directory.


pub use builder::*;
