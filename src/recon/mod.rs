// ABOUTME: Idempotent reconciliation engine: one ensure operation per entity kind
// ABOUTME: Lookup by uniqueness key, then patch-or-insert; never duplicates rows
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Reconciliation Engine
//!
//! Every entity kind gets one `ensure` operation with the same shape:
//! compute the kind's uniqueness key, look up an existing row through
//! the declared index, then either patch the new payload over the
//! existing row (preserving its id and original creation timestamp) or
//! insert a fresh row. The tagged [`Ensured`] result localizes the
//! idempotence contract: callers learn whether the row was created or
//! reused, and re-running with the same payload converges with no
//! duplicate rows; only `updated_at` is refreshed.
//!
//! Two kinds have no usable unique index and fall back to a bounded
//! per-owner scan: training plans, unique per (creator, name), scan the
//! creator's plans; the log kinds, unique per (owner, timestamp), scan
//! the owner's entries. Both scans are bounded by one owner's row count.
//!
//! Dependent entities are only written after their referent is verified
//! to exist; a missing referent is a [`ReconcileError::ReferenceMissing`],
//! never a silently created orphan.

pub mod batch;
pub mod seed;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::errors::ReconcileError;
use crate::models::{
    Account, AccountProfile, ClientMetrics, CoachMetrics, DietLog, ExerciseName, RecordId,
    TrainingPlan, WeightLog, WorkoutDetail, WorkoutExercise, WorkoutLog,
};
use crate::store::catalog::EntityKind;
use crate::store::memory::Stored;
use crate::store::{IndexKey, MemoryStore};

use self::seed::{
    AccountSeed, ClientMetricsSeed, CoachMetricsSeed, DietLogSeed, PlanSeed, ProfileSeed,
    WeightLogSeed, WorkoutLogSeed,
};

/// Tagged outcome of an ensure operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ensured {
    /// A new row was inserted.
    Created(RecordId),
    /// An existing row was found under the uniqueness key and reconciled
    /// in place (for write-once kinds, merely reused).
    Updated(RecordId),
}

impl Ensured {
    /// The row's identity, regardless of outcome.
    #[must_use]
    pub const fn id(&self) -> RecordId {
        match self {
            Self::Created(id) | Self::Updated(id) => *id,
        }
    }

    #[must_use]
    pub const fn was_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Applies ensure operations against one store with a fixed batch clock.
///
/// All timestamps written during one reconciler's lifetime carry the
/// same instant, which keeps repeated runs comparable in tests.
pub struct Reconciler<'a> {
    store: &'a MemoryStore,
    now: DateTime<Utc>,
}

impl<'a> Reconciler<'a> {
    #[must_use]
    pub fn new(store: &'a MemoryStore) -> Self {
        Self::with_clock(store, Utc::now())
    }

    /// Pin the batch clock; tests use this to make `updated_at` visible.
    #[must_use]
    pub const fn with_clock(store: &'a MemoryStore, now: DateTime<Utc>) -> Self {
        Self { store, now }
    }

    /// Verify that a referent row exists before writing a dependent.
    async fn require<T: Stored>(
        &self,
        dependent: EntityKind,
        id: RecordId,
    ) -> Result<T, ReconcileError> {
        self.store
            .get::<T>(id)
            .await?
            .ok_or(ReconcileError::ReferenceMissing {
                entity: dependent,
                referent: T::KIND,
                id,
            })
    }

    /// Ensure an account by phone number. The current-plan reference is
    /// not part of the payload; it is assigned separately once the plan
    /// exists, so a patch preserves it.
    pub async fn ensure_account(
        &self,
        seed: &AccountSeed,
        coach_id: Option<RecordId>,
    ) -> Result<Ensured, ReconcileError> {
        if let Some(coach) = coach_id {
            self.require::<Account>(EntityKind::Account, coach).await?;
        }

        let key = IndexKey::one(seed.phone_number.as_str());
        let outcome = match self.store.find_unique::<Account>("by_phone", &key).await? {
            Some(existing) => {
                self.store
                    .patch::<Account, _>(existing.id, |row| {
                        row.name = seed.name.clone();
                        row.email = seed.email.clone();
                        row.pin = seed.pin.clone();
                        row.role = seed.role;
                        row.goal = seed.goal;
                        row.coach_id = coach_id;
                        row.updated_at = self.now;
                    })
                    .await?;
                Ensured::Updated(existing.id)
            }
            None => {
                let id = self
                    .store
                    .insert(Account {
                        id: RecordId::new(),
                        name: seed.name.clone(),
                        phone_number: seed.phone_number.clone(),
                        email: seed.email.clone(),
                        pin: seed.pin.clone(),
                        role: seed.role,
                        goal: seed.goal,
                        coach_id,
                        plan_id: None,
                        created_at: self.now,
                        updated_at: self.now,
                    })
                    .await?;
                Ensured::Created(id)
            }
        };
        debug!(phone = %seed.phone_number, created = outcome.was_created(), "ensured account");
        Ok(outcome)
    }

    /// Point the account's current-plan reference at an ensured plan.
    /// Both sides are checked up front, so a dangling id on either end
    /// is a [`ReconcileError::ReferenceMissing`].
    pub async fn assign_plan(
        &self,
        account_id: RecordId,
        plan_id: RecordId,
    ) -> Result<(), ReconcileError> {
        self.require::<Account>(EntityKind::Account, account_id)
            .await?;
        self.require::<TrainingPlan>(EntityKind::Account, plan_id)
            .await?;
        self.store
            .patch::<Account, _>(account_id, |row| {
                row.plan_id = Some(plan_id);
                row.updated_at = self.now;
            })
            .await?;
        Ok(())
    }

    /// Ensure the one-to-one profile row for an account. The payload is
    /// complete, not a diff: unset optionals overwrite previous values.
    pub async fn ensure_profile(
        &self,
        account_id: RecordId,
        seed: &ProfileSeed,
    ) -> Result<Ensured, ReconcileError> {
        self.require::<Account>(EntityKind::AccountProfile, account_id)
            .await?;

        let key = IndexKey::one(account_id);
        let outcome = match self
            .store
            .find_unique::<AccountProfile>("by_account", &key)
            .await?
        {
            Some(existing) => {
                self.store
                    .patch::<AccountProfile, _>(existing.id, |row| {
                        row.age = seed.age;
                        row.address = seed.address.clone();
                        row.gender = seed.gender.clone();
                        row.height = seed.height;
                        row.focus_area = seed.focus_area.clone();
                        row.readiness_note = seed.readiness_note.clone();
                        row.progress_percent = seed.progress_percent;
                        row.accent_color = seed.accent_color.clone();
                        row.emergency_contact_name = seed.emergency_contact_name.clone();
                        row.emergency_contact_phone = seed.emergency_contact_phone.clone();
                        row.updated_at = self.now;
                    })
                    .await?;
                Ensured::Updated(existing.id)
            }
            None => {
                let id = self
                    .store
                    .insert(AccountProfile {
                        id: RecordId::new(),
                        account_id,
                        age: seed.age,
                        address: seed.address.clone(),
                        gender: seed.gender.clone(),
                        height: seed.height,
                        focus_area: seed.focus_area.clone(),
                        readiness_note: seed.readiness_note.clone(),
                        progress_percent: seed.progress_percent,
                        accent_color: seed.accent_color.clone(),
                        emergency_contact_name: seed.emergency_contact_name.clone(),
                        emergency_contact_phone: seed.emergency_contact_phone.clone(),
                        created_at: self.now,
                        updated_at: self.now,
                    })
                    .await?;
                Ensured::Created(id)
            }
        };
        debug!(%account_id, created = outcome.was_created(), "ensured profile");
        Ok(outcome)
    }

    /// Ensure the client's denormalized dashboard snapshot.
    pub async fn ensure_client_metrics(
        &self,
        account_id: RecordId,
        seed: &ClientMetricsSeed,
    ) -> Result<Ensured, ReconcileError> {
        self.require::<Account>(EntityKind::ClientMetrics, account_id)
            .await?;

        let key = IndexKey::one(account_id);
        let outcome = match self
            .store
            .find_unique::<ClientMetrics>("by_account", &key)
            .await?
        {
            Some(existing) => {
                self.store
                    .patch::<ClientMetrics, _>(existing.id, |row| {
                        row.plan_name = seed.plan_name.clone();
                        row.goal_progress = seed.goal_progress;
                        row.goal_quote = seed.goal_quote.clone();
                        row.calories_remaining = seed.calories_remaining;
                        row.macros = seed.macros.clone();
                        row.activity_series = seed.activity_series.clone();
                        row.duration_minutes = seed.duration_minutes;
                        row.calories_burned = seed.calories_burned;
                        row.habits = seed.habits.clone();
                        row.sunlight_minutes = seed.sunlight_minutes;
                        row.updated_at = self.now;
                    })
                    .await?;
                Ensured::Updated(existing.id)
            }
            None => {
                let id = self
                    .store
                    .insert(ClientMetrics {
                        id: RecordId::new(),
                        account_id,
                        plan_name: seed.plan_name.clone(),
                        goal_progress: seed.goal_progress,
                        goal_quote: seed.goal_quote.clone(),
                        calories_remaining: seed.calories_remaining,
                        macros: seed.macros.clone(),
                        activity_series: seed.activity_series.clone(),
                        duration_minutes: seed.duration_minutes,
                        calories_burned: seed.calories_burned,
                        habits: seed.habits.clone(),
                        sunlight_minutes: seed.sunlight_minutes,
                        created_at: self.now,
                        updated_at: self.now,
                    })
                    .await?;
                Ensured::Created(id)
            }
        };
        debug!(%account_id, created = outcome.was_created(), "ensured client metrics");
        Ok(outcome)
    }

    /// Ensure the coach's dashboard snapshot. `clients_total` comes from
    /// the orderer after every client has been reconciled.
    pub async fn ensure_coach_metrics(
        &self,
        coach_id: RecordId,
        seed: &CoachMetricsSeed,
        clients_total: u32,
    ) -> Result<Ensured, ReconcileError> {
        self.require::<Account>(EntityKind::CoachMetrics, coach_id)
            .await?;

        let key = IndexKey::one(coach_id);
        let outcome = match self
            .store
            .find_unique::<CoachMetrics>("by_coach", &key)
            .await?
        {
            Some(existing) => {
                self.store
                    .patch::<CoachMetrics, _>(existing.id, |row| {
                        row.overall_progress = seed.overall_progress;
                        row.trend_delta = seed.trend_delta;
                        row.clients_total = clients_total;
                        row.micro_stats = seed.micro_stats.clone();
                        row.quick_actions = seed.quick_actions.clone();
                        row.upcoming_sessions = seed.upcoming_sessions.clone();
                        row.updated_at = self.now;
                    })
                    .await?;
                Ensured::Updated(existing.id)
            }
            None => {
                let id = self
                    .store
                    .insert(CoachMetrics {
                        id: RecordId::new(),
                        coach_id,
                        overall_progress: seed.overall_progress,
                        trend_delta: seed.trend_delta,
                        clients_total,
                        micro_stats: seed.micro_stats.clone(),
                        quick_actions: seed.quick_actions.clone(),
                        upcoming_sessions: seed.upcoming_sessions.clone(),
                        created_at: self.now,
                        updated_at: self.now,
                    })
                    .await?;
                Ensured::Created(id)
            }
        };
        debug!(%coach_id, created = outcome.was_created(), "ensured coach metrics");
        Ok(outcome)
    }

    /// Ensure a training plan, unique per (creator, name). No compound
    /// index covers that pair, so this fetches the creator's plans and
    /// scans for the name; the scan is bounded by a single coach's plan
    /// count.
    pub async fn ensure_training_plan(
        &self,
        creator_id: RecordId,
        seed: &PlanSeed,
    ) -> Result<Ensured, ReconcileError> {
        self.require::<Account>(EntityKind::TrainingPlan, creator_id)
            .await?;

        let plans: Vec<TrainingPlan> = self
            .store
            .find_all("by_creator", &IndexKey::one(creator_id))
            .await?;
        let existing = plans.iter().find(|plan| plan.name == seed.name);

        let outcome = match existing {
            Some(plan) => {
                self.store
                    .patch::<TrainingPlan, _>(plan.id, |row| {
                        row.name = seed.name.clone();
                        row.description = seed.description.clone();
                        row.duration_weeks = seed.duration_weeks;
                        row.days = seed.days.clone();
                        row.updated_at = self.now;
                    })
                    .await?;
                Ensured::Updated(plan.id)
            }
            None => {
                let id = self
                    .store
                    .insert(TrainingPlan {
                        id: RecordId::new(),
                        name: seed.name.clone(),
                        description: seed.description.clone(),
                        duration_weeks: seed.duration_weeks,
                        days: seed.days.clone(),
                        created_by: creator_id,
                        created_at: self.now,
                        updated_at: self.now,
                    })
                    .await?;
                Ensured::Created(id)
            }
        };
        debug!(%creator_id, plan = %seed.name, created = outcome.was_created(), "ensured training plan");
        Ok(outcome)
    }

    /// Ensure a workout log, unique per (account, start time). Scans the
    /// owner's logs via `by_account`; a created row's `created_at` is the
    /// session's start time, not the reconciliation instant.
    pub async fn ensure_workout_log(
        &self,
        account_id: RecordId,
        seed: &WorkoutLogSeed,
    ) -> Result<Ensured, ReconcileError> {
        self.require::<Account>(EntityKind::WorkoutLog, account_id)
            .await?;

        let logs: Vec<WorkoutLog> = self
            .store
            .find_all("by_account", &IndexKey::one(account_id))
            .await?;
        let existing = logs.iter().find(|log| log.start_time == seed.start_time);

        let outcome = match existing {
            Some(log) => {
                self.store
                    .patch::<WorkoutLog, _>(log.id, |row| {
                        row.end_time = seed.end_time;
                        row.status = seed.status;
                        row.workout_type = seed.workout_type;
                        row.duration_minutes = seed.duration_minutes;
                        row.calories_burned = seed.calories_burned;
                        row.updated_at = self.now;
                    })
                    .await?;
                Ensured::Updated(log.id)
            }
            None => {
                let id = self
                    .store
                    .insert(WorkoutLog {
                        id: RecordId::new(),
                        account_id,
                        start_time: seed.start_time,
                        end_time: seed.end_time,
                        status: seed.status,
                        workout_type: seed.workout_type,
                        duration_minutes: seed.duration_minutes,
                        calories_burned: seed.calories_burned,
                        created_at: seed.start_time,
                        updated_at: self.now,
                    })
                    .await?;
                Ensured::Created(id)
            }
        };
        debug!(%account_id, start = %seed.start_time, created = outcome.was_created(), "ensured workout log");
        Ok(outcome)
    }

    /// Ensure the exercise breakdown for a workout log, keyed on the
    /// log's row id. An empty exercise list writes nothing.
    pub async fn ensure_workout_detail(
        &self,
        workout_log_id: RecordId,
        exercises: &[WorkoutExercise],
    ) -> Result<Option<Ensured>, ReconcileError> {
        if exercises.is_empty() {
            return Ok(None);
        }
        self.require::<WorkoutLog>(EntityKind::WorkoutDetail, workout_log_id)
            .await?;

        let key = IndexKey::one(workout_log_id);
        let outcome = match self
            .store
            .find_unique::<WorkoutDetail>("by_workout_log", &key)
            .await?
        {
            Some(existing) => {
                self.store
                    .patch::<WorkoutDetail, _>(existing.id, |row| {
                        row.exercises = exercises.to_vec();
                        row.updated_at = self.now;
                    })
                    .await?;
                Ensured::Updated(existing.id)
            }
            None => {
                let id = self
                    .store
                    .insert(WorkoutDetail {
                        id: RecordId::new(),
                        workout_log_id,
                        exercises: exercises.to_vec(),
                        created_at: self.now,
                        updated_at: self.now,
                    })
                    .await?;
                Ensured::Created(id)
            }
        };
        Ok(Some(outcome))
    }

    /// Ensure a diet log entry, unique per (account, timestamp).
    pub async fn ensure_diet_log(
        &self,
        account_id: RecordId,
        seed: &DietLogSeed,
    ) -> Result<Ensured, ReconcileError> {
        self.require::<Account>(EntityKind::DietLog, account_id)
            .await?;

        let entries: Vec<DietLog> = self
            .store
            .find_all("by_account", &IndexKey::one(account_id))
            .await?;
        let existing = entries
            .iter()
            .find(|entry| entry.logged_at == seed.logged_at);

        let outcome = match existing {
            Some(entry) => {
                self.store
                    .patch::<DietLog, _>(entry.id, |row| {
                        row.meal_type = seed.meal_type;
                        row.description = seed.description.clone();
                        row.calories = seed.calories;
                    })
                    .await?;
                Ensured::Updated(entry.id)
            }
            None => {
                let id = self
                    .store
                    .insert(DietLog {
                        id: RecordId::new(),
                        account_id,
                        logged_at: seed.logged_at,
                        meal_type: seed.meal_type,
                        description: seed.description.clone(),
                        calories: seed.calories,
                    })
                    .await?;
                Ensured::Created(id)
            }
        };
        Ok(outcome)
    }

    /// Ensure a weight log entry, unique per (account, timestamp).
    pub async fn ensure_weight_log(
        &self,
        account_id: RecordId,
        seed: &WeightLogSeed,
    ) -> Result<Ensured, ReconcileError> {
        self.require::<Account>(EntityKind::WeightLog, account_id)
            .await?;

        let entries: Vec<WeightLog> = self
            .store
            .find_all("by_account", &IndexKey::one(account_id))
            .await?;
        let existing = entries
            .iter()
            .find(|entry| entry.logged_at == seed.logged_at);

        let outcome = match existing {
            Some(entry) => {
                self.store
                    .patch::<WeightLog, _>(entry.id, |row| {
                        row.weight = seed.weight;
                    })
                    .await?;
                Ensured::Updated(entry.id)
            }
            None => {
                let id = self
                    .store
                    .insert(WeightLog {
                        id: RecordId::new(),
                        account_id,
                        logged_at: seed.logged_at,
                        weight: seed.weight,
                    })
                    .await?;
                Ensured::Created(id)
            }
        };
        Ok(outcome)
    }

    /// Ensure a catalog entry for an exercise name. Write-once: an
    /// existing entry is reused untouched, never patched.
    pub async fn ensure_exercise_name(&self, name: &str) -> Result<Ensured, ReconcileError> {
        let key = IndexKey::one(name);
        match self
            .store
            .find_unique::<ExerciseName>("by_name", &key)
            .await?
        {
            Some(existing) => Ok(Ensured::Updated(existing.id)),
            None => {
                let id = self
                    .store
                    .insert(ExerciseName {
                        id: RecordId::new(),
                        name: name.to_owned(),
                    })
                    .await?;
                Ok(Ensured::Created(id))
            }
        }
    }
}
