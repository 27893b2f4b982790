// ABOUTME: Seed payload types for reconciliation batches
// ABOUTME: Mirrors the external seed JSON contract; ids are never part of a payload
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Seed Payloads
//!
//! A batch describes one coach, one administrator, and a list of
//! clients, each client carrying its profile and metrics fields, an
//! optional embedded training plan, and workout/diet/weight log entries.
//! Payloads carry natural keys only (phone numbers, timestamps, names);
//! row identities are resolved or minted by the engine.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{
    ActivityPoint, Goal, HabitStat, MacroStat, MealType, MicroStat, PlanDay, QuickAction, Role,
    UpcomingSession, WorkoutExercise, WorkoutStatus, WorkoutType,
};

/// Identity fields shared by every seeded account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSeed {
    pub name: String,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub pin: String,
    pub role: Role,
    pub goal: Goal,
}

/// Profile payload. Callers supply the complete payload: absent optional
/// fields are reconciled to unset, not left at their previous value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSeed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readiness_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_percent: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact_phone: Option<String>,
}

/// Client dashboard metrics payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientMetricsSeed {
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
}

/// Coach dashboard metrics payload. The client count is not part of the
/// payload: the orderer fills it in after every client is reconciled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachMetricsSeed {
    pub overall_progress: u32,
    pub trend_delta: i32,
    pub micro_stats: Vec<MicroStat>,
    pub quick_actions: Vec<QuickAction>,
    pub upcoming_sessions: Vec<UpcomingSession>,
}

/// Embedded training plan payload; the creator is the batch's coach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSeed {
    pub name: String,
    pub description: String,
    pub duration_weeks: u32,
    pub days: Vec<PlanDay>,
}

/// Workout log payload with its embedded exercise breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLogSeed {
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub status: WorkoutStatus,
    pub workout_type: WorkoutType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories_burned: Option<u32>,
    #[serde(default)]
    pub exercises: Vec<WorkoutExercise>,
}

/// Diet log payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietLogSeed {
    pub logged_at: DateTime<Utc>,
    pub meal_type: MealType,
    pub description: String,
    pub calories: u32,
}

/// Weight log payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightLogSeed {
    pub logged_at: DateTime<Utc>,
    pub weight: f64,
}

/// One client: identity plus everything hanging off it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSeed {
    #[serde(flatten)]
    pub account: AccountSeed,
    pub profile: ProfileSeed,
    pub metrics: ClientMetricsSeed,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_plan: Option<PlanSeed>,
    #[serde(default)]
    pub workout_logs: Vec<WorkoutLogSeed>,
    #[serde(default)]
    pub diet_logs: Vec<DietLogSeed>,
    #[serde(default)]
    pub weight_logs: Vec<WeightLogSeed>,
}

/// The coach: identity plus dashboard metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachSeed {
    #[serde(flatten)]
    pub account: AccountSeed,
    pub metrics: CoachMetricsSeed,
}

/// A full reconciliation batch: one coach, one administrator, N clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedBatch {
    pub coach: CoachSeed,
    pub admin: AccountSeed,
    #[serde(default)]
    pub clients: Vec<ClientSeed>,
}

impl SeedBatch {
    /// Every exercise name referenced by any plan or workout log in the
    /// batch, deduplicated, in deterministic order. Gathered before any
    /// catalog write.
    #[must_use]
    pub fn exercise_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        for client in &self.clients {
            if let Some(plan) = &client.training_plan {
                for day in &plan.days {
                    for exercise in &day.exercises {
                        names.insert(exercise.exercise_name.clone());
                    }
                }
            }
            for log in &client.workout_logs {
                for exercise in &log.exercises {
                    names.insert(exercise.exercise_name.clone());
                }
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DayOfWeek, ExercisePrescription};

    fn minimal_client(plan_exercises: &[&str], log_exercises: &[&str]) -> ClientSeed {
        ClientSeed {
            account: AccountSeed {
                name: "A".into(),
                phone_number: "+1000000001".into(),
                email: None,
                pin: "111111".into(),
                role: Role::ManagedClient,
                goal: Goal::GeneralFitness,
            },
            profile: ProfileSeed::default(),
            metrics: ClientMetricsSeed {
                plan_name: "P1".into(),
                goal_progress: 0,
                goal_quote: String::new(),
                calories_remaining: 0,
                macros: vec![],
                activity_series: vec![],
                duration_minutes: 0,
                calories_burned: 0,
                habits: vec![],
                sunlight_minutes: 0,
            },
            training_plan: Some(PlanSeed {
                name: "P1".into(),
                description: String::new(),
                duration_weeks: 4,
                days: vec![PlanDay {
                    day: DayOfWeek::Mon,
                    exercises: plan_exercises
                        .iter()
                        .map(|name| ExercisePrescription {
                            exercise_name: (*name).into(),
                            sets: None,
                            reps: None,
                            weight: None,
                            notes: None,
                        })
                        .collect(),
                }],
            }),
            workout_logs: vec![WorkoutLogSeed {
                start_time: Utc::now(),
                end_time: None,
                status: WorkoutStatus::Completed,
                workout_type: WorkoutType::Strength,
                duration_minutes: None,
                calories_burned: None,
                exercises: log_exercises
                    .iter()
                    .map(|name| WorkoutExercise {
                        logged_at: Utc::now(),
                        exercise_name: (*name).into(),
                        sets: None,
                        reps: None,
                        weight: None,
                        notes: None,
                    })
                    .collect(),
            }],
            diet_logs: vec![],
            weight_logs: vec![],
        }
    }

    #[test]
    fn exercise_names_are_deduplicated_across_plans_and_logs() {
        let batch = SeedBatch {
            coach: CoachSeed {
                account: AccountSeed {
                    name: "C".into(),
                    phone_number: "+1000000000".into(),
                    email: None,
                    pin: "123123".into(),
                    role: Role::Coach,
                    goal: Goal::GeneralFitness,
                },
                metrics: CoachMetricsSeed {
                    overall_progress: 0,
                    trend_delta: 0,
                    micro_stats: vec![],
                    quick_actions: vec![],
                    upcoming_sessions: vec![],
                },
            },
            admin: AccountSeed {
                name: "Admin".into(),
                phone_number: "+1000000009".into(),
                email: None,
                pin: "999999".into(),
                role: Role::Admin,
                goal: Goal::GeneralFitness,
            },
            clients: vec![minimal_client(&["Squat", "Row"], &["Squat", "Press"])],
        };

        let names: Vec<String> = batch.exercise_names().into_iter().collect();
        assert_eq!(names, vec!["Press", "Row", "Squat"]);
    }

    #[test]
    fn client_seed_flattens_identity_fields() {
        let json = serde_json::json!({
            "name": "A",
            "phoneNumber": "+1000000001",
            "pin": "111111",
            "role": "trainerManagedCustomer",
            "goal": "generalFitness",
            "profile": {},
            "metrics": {
                "planName": "P1",
                "goalProgress": 10,
                "goalQuote": "q",
                "caloriesRemaining": 100,
                "macros": [],
                "activitySeries": [],
                "durationMinutes": 0,
                "caloriesBurned": 0,
                "habits": [],
                "sunlightMinutes": 0
            }
        });
        let client: ClientSeed = serde_json::from_value(json).unwrap();
        assert_eq!(client.account.phone_number, "+1000000001");
        assert!(client.training_plan.is_none());
        assert!(client.workout_logs.is_empty());
    }
}
