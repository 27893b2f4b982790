// ABOUTME: Main library entry point for the pulseboard coaching backend
// ABOUTME: Wires the entity store, reconciliation engine, and dashboard reads
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![deny(unsafe_code)]

//! # Pulseboard
//!
//! Storage and reconciliation core for a fitness-coaching application.
//! The backing store is a typed document store that supports exactly three
//! operations per collection: insert, point-patch, and equality lookups on
//! declared indexes. Everything a relational database would normally give
//! us for free (uniqueness, referential integrity, upserts) is built by
//! hand on top of that surface.
//!
//! ## Architecture
//!
//! - **Store**: typed collections with a static index catalog
//!   ([`store::MemoryStore`]). Unique indexes are enforced on write;
//!   lookups against undeclared indexes are rejected.
//! - **Reconciliation**: idempotent `ensure` operations, one per entity
//!   kind ([`recon::Reconciler`]). Re-running a seed batch never
//!   duplicates rows and always converges to the same state.
//! - **Ordering**: an explicit dependency graph over entity groups
//!   ([`recon::batch`]) guarantees referenced entities exist before
//!   anything references them.
//! - **Dashboards**: read-side aggregation that reconstructs denormalized
//!   coach and client views from chained indexed point lookups
//!   ([`dashboard`]).
//!
//! ## Example
//!
//! ```rust,no_run
//! use pulseboard::recon::batch::reconcile_batch;
//! use pulseboard::store::MemoryStore;
//!
//! # async fn run(batch: pulseboard::recon::seed::SeedBatch) -> anyhow::Result<()> {
//! let store = MemoryStore::new();
//! let outcome = reconcile_batch(&store, &batch).await?;
//! println!("coach account: {}", outcome.coach_id());
//! # Ok(())
//! # }
//! ```

/// Sign-in point lookup against the (phone, pin) compound index
pub mod auth;

/// Read-side dashboard aggregation for coach and client views
pub mod dashboard;

/// Error taxonomy for store and reconciliation failures
pub mod errors;

/// Entity models shared by the store, engine, and dashboards
pub mod models;

/// Idempotent reconciliation engine and the batch dependency orderer
pub mod recon;

/// Typed document store with a declared index catalog
pub mod store;
