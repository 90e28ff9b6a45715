// Test Helper Modules
//
// In-memory collaborators and a data factory shared by the flow tests.
//
// Usage:
//   #[path = "../helpers/mod.rs"]
//   mod helpers;
//   use helpers::*;

#![allow(dead_code)]


pub use in_memory::*;
pub use test_data::*;
