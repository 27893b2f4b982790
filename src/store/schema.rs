// ABOUTME: Binds each entity model to its collection kind and declared indexes
// ABOUTME: Record trait extracts index keys from rows for the store to maintain
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Schema Bindings
//!
//! [`Record`] is the seam between the models and the store: it names the
//! entity's collection, lists its declared indexes, and extracts the key
//! a given row contributes to each index. A row whose optional indexed
//! attribute is unset (a coach's own `coach_id`, say) is simply absent
//! from that index.
//!
//! Index declarations mirror the frontend schema one-to-one. Note what
//! is deliberately missing: there is no (creator, name) compound index
//! on training plans and no (account, time) compound index on the log
//! collections; reconciliation resolves those keys with a bounded
//! per-owner scan instead.

use crate::errors::StoreError;
use crate::models::{
    Account, AccountProfile, ClientMetrics, CoachMetrics, DietLog, ExerciseName, RecordId,
    TrainingPlan, WeightLog, WorkoutDetail, WorkoutLog,
};
use crate::store::catalog::{EntityKind, IndexDef, IndexKey};

/// A row type stored in its own collection.
pub trait Record: Clone + Send + Sync + 'static {
    /// Which collection this row belongs to.
    const KIND: EntityKind;

    /// The static index declarations for this collection.
    fn indexes() -> &'static [IndexDef];

    /// Row identity.
    fn id(&self) -> RecordId;

    /// Key this row contributes to `index`, or `None` when an optional
    /// indexed attribute is unset.
    fn index_key(&self, index: &IndexDef) -> Option<IndexKey>;
}

/// Resolve a declared index by name, or fail with [`StoreError::UnknownIndex`].
pub fn resolve_index<T: Record>(name: &str) -> Result<&'static IndexDef, StoreError> {
    T::indexes()
        .iter()
        .find(|index| index.name == name)
        .ok_or_else(|| StoreError::UnknownIndex {
            entity: T::KIND,
            index: name.to_owned(),
        })
}

const ACCOUNT_INDEXES: &[IndexDef] = &[
    IndexDef {
        name: "by_phone",
        fields: &["phone_number"],
        unique: true,
    },
    IndexDef {
        name: "by_phone_pin",
        fields: &["phone_number", "pin"],
        unique: true,
    },
    IndexDef {
        name: "by_coach",
        fields: &["coach_id"],
        unique: false,
    },
    IndexDef {
        name: "by_plan",
        fields: &["plan_id"],
        unique: false,
    },
];

impl Record for Account {
    const KIND: EntityKind = EntityKind::Account;

    fn indexes() -> &'static [IndexDef] {
        ACCOUNT_INDEXES
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn index_key(&self, index: &IndexDef) -> Option<IndexKey> {
        match index.name {
            "by_phone" => Some(IndexKey::one(self.phone_number.as_str())),
            "by_phone_pin" => Some(IndexKey::pair(
                self.phone_number.as_str(),
                self.pin.as_str(),
            )),
            "by_coach" => self.coach_id.map(IndexKey::one),
            "by_plan" => self.plan_id.map(IndexKey::one),
            _ => None,
        }
    }
}

const PROFILE_INDEXES: &[IndexDef] = &[IndexDef {
    name: "by_account",
    fields: &["account_id"],
    unique: true,
}];

impl Record for AccountProfile {
    const KIND: EntityKind = EntityKind::AccountProfile;

    fn indexes() -> &'static [IndexDef] {
        PROFILE_INDEXES
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn index_key(&self, index: &IndexDef) -> Option<IndexKey> {
        match index.name {
            "by_account" => Some(IndexKey::one(self.account_id)),
            _ => None,
        }
    }
}

const CLIENT_METRICS_INDEXES: &[IndexDef] = &[IndexDef {
    name: "by_account",
    fields: &["account_id"],
    unique: true,
}];

impl Record for ClientMetrics {
    const KIND: EntityKind = EntityKind::ClientMetrics;

    fn indexes() -> &'static [IndexDef] {
        CLIENT_METRICS_INDEXES
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn index_key(&self, index: &IndexDef) -> Option<IndexKey> {
        match index.name {
            "by_account" => Some(IndexKey::one(self.account_id)),
            _ => None,
        }
    }
}

const COACH_METRICS_INDEXES: &[IndexDef] = &[IndexDef {
    name: "by_coach",
    fields: &["coach_id"],
    unique: true,
}];

impl Record for CoachMetrics {
    const KIND: EntityKind = EntityKind::CoachMetrics;

    fn indexes() -> &'static [IndexDef] {
        COACH_METRICS_INDEXES
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn index_key(&self, index: &IndexDef) -> Option<IndexKey> {
        match index.name {
            "by_coach" => Some(IndexKey::one(self.coach_id)),
            _ => None,
        }
    }
}

const TRAINING_PLAN_INDEXES: &[IndexDef] = &[IndexDef {
    name: "by_creator",
    fields: &["created_by"],
    unique: false,
}];

impl Record for TrainingPlan {
    const KIND: EntityKind = EntityKind::TrainingPlan;

    fn indexes() -> &'static [IndexDef] {
        TRAINING_PLAN_INDEXES
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn index_key(&self, index: &IndexDef) -> Option<IndexKey> {
        match index.name {
            "by_creator" => Some(IndexKey::one(self.created_by)),
            _ => None,
        }
    }
}

const WORKOUT_LOG_INDEXES: &[IndexDef] = &[IndexDef {
    name: "by_account",
    fields: &["account_id"],
    unique: false,
}];

impl Record for WorkoutLog {
    const KIND: EntityKind = EntityKind::WorkoutLog;

    fn indexes() -> &'static [IndexDef] {
        WORKOUT_LOG_INDEXES
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn index_key(&self, index: &IndexDef) -> Option<IndexKey> {
        match index.name {
            "by_account" => Some(IndexKey::one(self.account_id)),
            _ => None,
        }
    }
}

const WORKOUT_DETAIL_INDEXES: &[IndexDef] = &[IndexDef {
    name: "by_workout_log",
    fields: &["workout_log_id"],
    unique: true,
}];

impl Record for WorkoutDetail {
    const KIND: EntityKind = EntityKind::WorkoutDetail;

    fn indexes() -> &'static [IndexDef] {
        WORKOUT_DETAIL_INDEXES
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn index_key(&self, index: &IndexDef) -> Option<IndexKey> {
        match index.name {
            "by_workout_log" => Some(IndexKey::one(self.workout_log_id)),
            _ => None,
        }
    }
}

const DIET_LOG_INDEXES: &[IndexDef] = &[IndexDef {
    name: "by_account",
    fields: &["account_id"],
    unique: false,
}];

impl Record for DietLog {
    const KIND: EntityKind = EntityKind::DietLog;

    fn indexes() -> &'static [IndexDef] {
        DIET_LOG_INDEXES
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn index_key(&self, index: &IndexDef) -> Option<IndexKey> {
        match index.name {
            "by_account" => Some(IndexKey::one(self.account_id)),
            _ => None,
        }
    }
}

const WEIGHT_LOG_INDEXES: &[IndexDef] = &[IndexDef {
    name: "by_account",
    fields: &["account_id"],
    unique: false,
}];

impl Record for WeightLog {
    const KIND: EntityKind = EntityKind::WeightLog;

    fn indexes() -> &'static [IndexDef] {
        WEIGHT_LOG_INDEXES
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn index_key(&self, index: &IndexDef) -> Option<IndexKey> {
        match index.name {
            "by_account" => Some(IndexKey::one(self.account_id)),
            _ => None,
        }
    }
}

const EXERCISE_NAME_INDEXES: &[IndexDef] = &[IndexDef {
    name: "by_name",
    fields: &["name"],
    unique: true,
}];

impl Record for ExerciseName {
    const KIND: EntityKind = EntityKind::ExerciseName;

    fn indexes() -> &'static [IndexDef] {
        EXERCISE_NAME_INDEXES
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn index_key(&self, index: &IndexDef) -> Option<IndexKey> {
        match index.name {
            "by_name" => Some(IndexKey::one(self.name.as_str())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Goal, Role};
    use chrono::Utc;

    fn account(coach_id: Option<RecordId>) -> Account {
        Account {
            id: RecordId::new(),
            name: "Test".into(),
            phone_number: "+15550000001".into(),
            email: None,
            pin: "111111".into(),
            role: Role::ManagedClient,
            goal: Goal::GeneralFitness,
            coach_id,
            plan_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn resolve_index_rejects_undeclared_names() {
        let err = resolve_index::<Account>("by_email").unwrap_err();
        assert!(matches!(err, StoreError::UnknownIndex { .. }));
        assert!(resolve_index::<Account>("by_phone").is_ok());
    }

    #[test]
    fn unset_optional_reference_is_absent_from_the_index() {
        let by_coach = resolve_index::<Account>("by_coach").unwrap();
        assert!(account(None).index_key(by_coach).is_none());

        let coach = RecordId::new();
        assert_eq!(
            account(Some(coach)).index_key(by_coach),
            Some(IndexKey::one(coach))
        );
    }

    #[test]
    fn compound_sign_in_key_covers_both_attributes() {
        let row = account(None);
        let by_phone_pin = resolve_index::<Account>("by_phone_pin").unwrap();
        let key = row.index_key(by_phone_pin).unwrap();
        assert_eq!(key.arity(), 2);
        assert_eq!(key, IndexKey::pair("+15550000001", "111111"));
    }
}
