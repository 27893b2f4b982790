// ABOUTME: Core data models for the pulseboard coaching backend
// ABOUTME: Defines Account, TrainingPlan, log entries, metrics snapshots and their enums
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Data Models
//!
//! One struct per stored collection, plus the embedded value objects
//! (plan days, exercise prescriptions, dashboard stat rows) that live
//! inside them. Wire spellings follow the frontend's existing JSON
//! contract (`trainerManagedCustomer`, `mon`..`sun`, camelCase fields),
//! so serde renames are explicit throughout.
//!
//! Timestamps (`created_at` / `updated_at`) are owned by the
//! reconciliation engine: the store never stamps them.

use std::fmt::{Display, Formatter, Result as FmtResult};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of a stored row. Assigned once at creation and stable across
/// reconciliation runs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Mint a fresh identity.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        self.0.fmt(f)
    }
}

/// Account role. Coaches and administrators are "privileged": they never
/// appear in a coach's active-client list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Coaching account; owns training plans and a metrics snapshot.
    #[serde(rename = "trainer")]
    Coach,
    /// Client whose programming is managed by a coach.
    #[serde(rename = "trainerManagedCustomer")]
    ManagedClient,
    /// Client who self-manages but may still reference a coach.
    #[serde(rename = "selfManagedCustomer")]
    SelfManagedClient,
    /// Administrative account.
    #[serde(rename = "admin")]
    Admin,
}

impl Role {
    /// Coaching/administrative roles are filtered out of client listings.
    #[must_use]
    pub const fn is_privileged(self) -> bool {
        matches!(self, Self::Coach | Self::Admin)
    }
}

/// Fitness goal attached to every account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Goal {
    WeightLoss,
    MuscleGain,
    Endurance,
    Flexibility,
    GeneralFitness,
}

impl Display for Goal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let text = match self {
            Self::WeightLoss => "weightLoss",
            Self::MuscleGain => "muscleGain",
            Self::Endurance => "endurance",
            Self::Flexibility => "flexibility",
            Self::GeneralFitness => "generalFitness",
        };
        write!(f, "{text}")
    }
}

/// Lifecycle state of a workout log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutStatus {
    Ongoing,
    Completed,
    Cancelled,
}

/// Broad classification of a workout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
    Cardio,
    Strength,
    Flexibility,
    Balance,
}

/// Meal slot for diet log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

/// Day-of-week tag used by training plan day entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

/// Identity row. Phone number is globally unique; (phone, pin) is the
/// sign-in lookup key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: RecordId,
    pub name: String,
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Six-digit PIN, stored as-is (explicitly insecure, matching the
    /// frontend's contract).
    pub pin: String,
    pub role: Role,
    pub goal: Goal,
    /// Coach this account reports to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coach_id: Option<RecordId>,
    /// Training plan currently assigned to this account, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<RecordId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Optional demographic / readiness fields, one-to-one with an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    pub id: RecordId,
    pub account_id: RecordId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Height in centimeters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus_area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readiness_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_percent: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact_phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Macro breakdown row on the client dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroStat {
    pub label: String,
    pub amount: String,
    pub remaining: String,
    pub accent_from: String,
    pub accent_to: String,
}

/// One day of activity minutes in the weekly series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityPoint {
    pub day: String,
    pub minutes: u32,
}

/// Habit tile (hydration, sleep, ...) on the client dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitStat {
    pub label: String,
    pub value: String,
    pub helper: String,
    pub icon_key: String,
    pub accent_color: String,
}

/// Denormalized per-client dashboard payload, one-to-one with an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientMetrics {
    pub id: RecordId,
    pub account_id: RecordId,
    pub plan_name: String,
    pub goal_progress: u32,
    pub goal_quote: String,
    pub calories_remaining: u32,
    pub macros: Vec<MacroStat>,
    pub activity_series: Vec<ActivityPoint>,
    pub duration_minutes: u32,
    pub calories_burned: u32,
    pub habits: Vec<HabitStat>,
    pub sunlight_minutes: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Small stat row on the coach dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MicroStat {
    pub label: String,
    pub value: String,
    pub helper: String,
}

/// Quick-action tile on the coach dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickAction {
    pub label: String,
    pub description: String,
    pub icon_key: String,
}

/// Upcoming session row on the coach dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingSession {
    pub name: String,
    pub time: String,
    pub status: String,
}

/// Denormalized per-coach dashboard payload, one-to-one with a coach
/// account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachMetrics {
    pub id: RecordId,
    pub coach_id: RecordId,
    pub overall_progress: u32,
    pub trend_delta: i32,
    pub clients_total: u32,
    pub micro_stats: Vec<MicroStat>,
    pub quick_actions: Vec<QuickAction>,
    pub upcoming_sessions: Vec<UpcomingSession>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Exercise prescription inside a training plan day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExercisePrescription {
    pub exercise_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sets: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One day entry in a training plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanDay {
    pub day: DayOfWeek,
    pub exercises: Vec<ExercisePrescription>,
}

/// Training plan owned by exactly one coach. Name is unique per creator,
/// not globally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPlan {
    pub id: RecordId,
    pub name: String,
    pub description: String,
    pub duration_weeks: u32,
    pub days: Vec<PlanDay>,
    pub created_by: RecordId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Workout session log. Reconciliation key is (account, start time).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLog {
    pub id: RecordId,
    pub account_id: RecordId,
    pub start_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub status: WorkoutStatus,
    pub workout_type: WorkoutType,
    /// Duration in minutes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories_burned: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One logged exercise within a workout detail row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutExercise {
    pub logged_at: DateTime<Utc>,
    pub exercise_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sets: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Exercise-level breakdown, one-to-one with a workout log. Keyed on the
/// log's row id rather than a natural key of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDetail {
    pub id: RecordId,
    pub workout_log_id: RecordId,
    pub exercises: Vec<WorkoutExercise>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Diet log entry. Reconciliation key is (account, logged_at).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietLog {
    pub id: RecordId,
    pub account_id: RecordId,
    pub logged_at: DateTime<Utc>,
    pub meal_type: MealType,
    pub description: String,
    pub calories: u32,
}

/// Weight log entry. Reconciliation key is (account, logged_at).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightLog {
    pub id: RecordId,
    pub account_id: RecordId,
    pub logged_at: DateTime<Utc>,
    pub weight: f64,
}

/// Globally deduplicated exercise catalog entry. Write-once: inserted if
/// absent, never patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseName {
    pub id: RecordId,
    pub name: String,
}
