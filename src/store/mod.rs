// ABOUTME: Typed document store module: index catalog, schema bindings, in-memory engine
// ABOUTME: The only query surface is equality lookup on declared indexes
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Entity Store
//!
//! The store exposes exactly the surface the application is allowed to
//! rely on: `insert`, point `patch`, and equality `find` against indexes
//! declared in the [`catalog`]. No range scans, no cross-collection
//! predicates, no deletes. Unique indexes are enforced on every write;
//! querying an undeclared index is an error, not an empty result.

pub mod catalog;
pub mod memory;
pub mod schema;

pub use catalog::{EntityKind, IndexDef, IndexKey, IndexValue};
pub use memory::MemoryStore;
pub use schema::Record;
