// ABOUTME: Static index catalog: which attribute tuples are indexed per entity
// ABOUTME: Defines index keys as equality-comparable value tuples
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Index Catalog
//!
//! Every queryable access path is declared here as an [`IndexDef`]: the
//! attribute tuple it covers and whether the store enforces uniqueness
//! over it. The catalog is consulted twice: by the store to validate
//! `find` calls, and by the reconciliation engine to pick the lookup
//! that decides insert-vs-patch. There is no runtime mutation.

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::models::RecordId;

/// The stored collections. Used in error messages and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Account,
    AccountProfile,
    ClientMetrics,
    CoachMetrics,
    TrainingPlan,
    WorkoutLog,
    WorkoutDetail,
    DietLog,
    WeightLog,
    ExerciseName,
}

impl EntityKind {
    /// Collection name as it appears in logs and errors.
    #[must_use]
    pub const fn table_name(self) -> &'static str {
        match self {
            Self::Account => "accounts",
            Self::AccountProfile => "profiles",
            Self::ClientMetrics => "client_metrics",
            Self::CoachMetrics => "coach_metrics",
            Self::TrainingPlan => "training_plans",
            Self::WorkoutLog => "workout_logs",
            Self::WorkoutDetail => "workout_details",
            Self::DietLog => "diet_logs",
            Self::WeightLog => "weight_logs",
            Self::ExerciseName => "exercise_names",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.table_name())
    }
}

/// Declaration of one index: a name, the attribute tuple it covers, and
/// whether the store enforces at-most-one row per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexDef {
    pub name: &'static str,
    pub fields: &'static [&'static str],
    pub unique: bool,
}

/// One component of an index key. Only equality is ever evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndexValue {
    Text(String),
    Int(i64),
    Id(RecordId),
}

impl From<&str> for IndexValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for IndexValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for IndexValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<RecordId> for IndexValue {
    fn from(value: RecordId) -> Self {
        Self::Id(value)
    }
}

impl Display for IndexValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Text(text) => write!(f, "{text:?}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}

/// Equality predicate over an index: an ordered tuple of components
/// matching the index's declared attribute tuple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexKey(Vec<IndexValue>);

impl IndexKey {
    /// Key over a single-attribute index.
    pub fn one(value: impl Into<IndexValue>) -> Self {
        Self(vec![value.into()])
    }

    /// Key over a two-attribute compound index.
    pub fn pair(first: impl Into<IndexValue>, second: impl Into<IndexValue>) -> Self {
        Self(vec![first.into(), second.into()])
    }

    /// Number of components; must match the index's field count.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.0.len()
    }
}

impl Display for IndexKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "(")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, ")")
    }
}
