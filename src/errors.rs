// ABOUTME: Error taxonomy for the entity store and the reconciliation engine
// ABOUTME: Store-level errors propagate unchanged; absence is never an error on reads
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Error Handling
//!
//! Two typed error enums cover the whole crate:
//!
//! - [`StoreError`]: violations of the store contract. Undeclared
//!   indexes, unique-constraint collisions, a one-to-one relation that
//!   unexpectedly holds more than one row.
//! - [`ReconcileError`]: reconciliation failures. The only variant of
//!   its own is [`ReconcileError::ReferenceMissing`]; store errors pass
//!   through unchanged.
//!
//! Absence on a read path (`find_unique` returning nothing, a client
//! without a profile) is represented as `Option::None`, never as an
//! error. A reconciliation batch is not transactional: a failure leaves
//! earlier ensures committed, and the error names the entity kind and
//! key that failed so the caller can re-run the batch safely.

use thiserror::Error;

use crate::models::RecordId;
use crate::store::catalog::EntityKind;

/// Violations of the entity-store contract.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A lookup named an index the catalog does not declare for this entity.
    #[error("{entity} has no declared index named `{index}`")]
    UnknownIndex { entity: EntityKind, index: String },

    /// `find_unique` was issued against an index not declared unique.
    #[error("index `{index}` on {entity} is not declared unique")]
    IndexNotUnique {
        entity: EntityKind,
        index: &'static str,
    },

    /// A write would place a second row under a unique index key.
    #[error("unique index `{index}` on {entity} already holds key {key}")]
    UniqueViolation {
        entity: EntityKind,
        index: &'static str,
        key: String,
    },

    /// A unique index slot holds more than one row. This is a
    /// data-integrity error and is never resolved by picking one.
    #[error("unique index `{index}` on {entity} holds {count} rows for key {key}")]
    DuplicateAmbiguity {
        entity: EntityKind,
        index: &'static str,
        key: String,
        count: usize,
    },

    /// A patch targeted a row id that does not exist.
    #[error("{entity} row {id} does not exist")]
    RowMissing { entity: EntityKind, id: RecordId },

    /// An insert reused a row id already present in the collection.
    #[error("{entity} row {id} already exists")]
    DuplicateId { entity: EntityKind, id: RecordId },
}

/// Reconciliation failures surfaced to batch callers.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A dependent entity was ensured before its referent existed.
    /// The dependency orderer exists precisely to prevent this; hitting
    /// it means the caller bypassed the orderer.
    #[error("cannot reconcile {entity}: referenced {referent} {id} does not exist")]
    ReferenceMissing {
        entity: EntityKind,
        referent: EntityKind,
        id: RecordId,
    },

    /// Store-level failure, propagated unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),
}
