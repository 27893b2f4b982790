// ABOUTME: Seeds a demo coaching roster and proves the batch converges
// ABOUTME: Runs the same batch N times; every pass after the first must create nothing
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Demo seeding tool.
//!
//! Loads a seed batch (a built-in roster, or a JSON file given on the
//! command line) and reconciles it repeatedly against a fresh in-memory
//! store. Pass one creates everything; later passes must reuse every
//! row. Finishes by printing per-collection counts and the assembled
//! coach dashboard.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{TimeZone, Utc};
use clap::Parser;
use tracing::info;

use pulseboard::dashboard::coach_dashboard;
use pulseboard::models::{
    Account, AccountProfile, ActivityPoint, ClientMetrics, CoachMetrics, DayOfWeek, DietLog,
    ExerciseName, ExercisePrescription, Goal, HabitStat, MacroStat, MealType, MicroStat, PlanDay,
    QuickAction, Role, TrainingPlan, UpcomingSession, WeightLog, WorkoutDetail, WorkoutExercise,
    WorkoutLog, WorkoutStatus, WorkoutType,
};
use pulseboard::recon::batch::reconcile_batch;
use pulseboard::recon::seed::{
    AccountSeed, ClientMetricsSeed, ClientSeed, CoachMetricsSeed, CoachSeed, DietLogSeed,
    PlanSeed, ProfileSeed, SeedBatch, WeightLogSeed, WorkoutLogSeed,
};
use pulseboard::store::MemoryStore;

#[derive(Parser)]
#[command(name = "seed-demo")]
#[command(about = "Seed a demo coaching roster and verify reconciliation convergence")]
struct Args {
    /// JSON seed batch file; the built-in demo roster when omitted
    input: Option<PathBuf>,

    /// Number of reconciliation passes to run
    #[arg(long, default_value_t = 2)]
    passes: u32,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    if args.passes == 0 {
        bail!("--passes must be at least 1");
    }

    let batch = match &args.input {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading seed batch from {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("parsing seed batch from {}", path.display()))?
        }
        None => demo_batch(),
    };

    let store = MemoryStore::new();

    let mut coach_id = None;
    for pass in 1..=args.passes {
        info!(pass, "reconciling seed batch");
        let outcome = reconcile_batch(&store, &batch)
            .await
            .with_context(|| format!("reconciliation pass {pass}"))?;

        let created = usize::from(outcome.admin.was_created())
            + usize::from(outcome.coach.was_created())
            + outcome
                .clients
                .iter()
                .filter(|c| c.account.was_created())
                .count()
            + outcome.exercise_names_created;
        info!(pass, created, "pass complete");

        if pass > 1 && created > 0 {
            bail!("pass {pass} created {created} rows; reconciliation did not converge");
        }
        if let Some(previous) = coach_id {
            if previous != outcome.coach_id() {
                bail!("pass {pass} resolved a different coach identity");
            }
        }
        coach_id = Some(outcome.coach_id());
    }

    print_summary(&store).await;

    if let Some(coach_id) = coach_id {
        match coach_dashboard(&store, coach_id).await? {
            Some(view) => {
                println!("\nCoach dashboard:");
                println!(
                    "  overall progress {}%, trend {:+}, {} clients",
                    view.summary.overall_progress,
                    view.summary.trend_delta,
                    view.summary.clients_total
                );
                for client in &view.active_clients {
                    println!(
                        "  - {} | {} | {}% | {}",
                        client.name, client.focus, client.progress, client.status
                    );
                }
            }
            None => println!("\nCoach dashboard: no metrics snapshot"),
        }
    }

    Ok(())
}

async fn print_summary(store: &MemoryStore) {
    println!("\nSeeded collections:");
    println!("  accounts:        {}", store.len::<Account>().await);
    println!("  profiles:        {}", store.len::<AccountProfile>().await);
    println!("  client metrics:  {}", store.len::<ClientMetrics>().await);
    println!("  coach metrics:   {}", store.len::<CoachMetrics>().await);
    println!("  training plans:  {}", store.len::<TrainingPlan>().await);
    println!("  workout logs:    {}", store.len::<WorkoutLog>().await);
    println!("  workout details: {}", store.len::<WorkoutDetail>().await);
    println!("  diet logs:       {}", store.len::<DietLog>().await);
    println!("  weight logs:     {}", store.len::<WeightLog>().await);
    println!("  exercise names:  {}", store.len::<ExerciseName>().await);
}

/// The built-in roster: one coach, one administrator, three clients with
/// plans, logs, and dashboard snapshots.
fn demo_batch() -> SeedBatch {
    let session = Utc.with_ymd_and_hms(2025, 11, 3, 6, 30, 0).unwrap();
    let meal = Utc.with_ymd_and_hms(2025, 11, 3, 8, 0, 0).unwrap();
    let weigh_in = Utc.with_ymd_and_hms(2025, 11, 3, 6, 0, 0).unwrap();

    SeedBatch {
        coach: CoachSeed {
            account: AccountSeed {
                name: "Alex Varma".into(),
                phone_number: "+15551230000".into(),
                email: Some("alex@pulseboard.fit".into()),
                pin: "123123".into(),
                role: Role::Coach,
                goal: Goal::GeneralFitness,
            },
            metrics: CoachMetricsSeed {
                overall_progress: 72,
                trend_delta: 4,
                micro_stats: vec![
                    MicroStat {
                        label: "Sessions this week".into(),
                        value: "18".into(),
                        helper: "3 more than last week".into(),
                    },
                    MicroStat {
                        label: "Check-ins pending".into(),
                        value: "2".into(),
                        helper: "due today".into(),
                    },
                ],
                quick_actions: vec![QuickAction {
                    label: "Add client".into(),
                    description: "Onboard a new client".into(),
                    icon_key: "user-plus".into(),
                }],
                upcoming_sessions: vec![UpcomingSession {
                    name: "Karthik Raja".into(),
                    time: "Today, 6:30 AM".into(),
                    status: "confirmed".into(),
                }],
            },
        },
        admin: AccountSeed {
            name: "Priya Admin".into(),
            phone_number: "+15551239999".into(),
            email: None,
            pin: "999999".into(),
            role: Role::Admin,
            goal: Goal::GeneralFitness,
        },
        clients: vec![
            ClientSeed {
                account: AccountSeed {
                    name: "Karthik Raja".into(),
                    phone_number: "+15550000001".into(),
                    email: Some("karthik@example.com".into()),
                    pin: "111111".into(),
                    role: Role::ManagedClient,
                    goal: Goal::MuscleGain,
                },
                profile: ProfileSeed {
                    age: Some(29),
                    gender: Some("male".into()),
                    height: Some(178.0),
                    focus_area: Some("Hypertrophy".into()),
                    readiness_note: Some("Ready for progression".into()),
                    progress_percent: Some(64),
                    accent_color: Some("#a78bfa".into()),
                    ..ProfileSeed::default()
                },
                metrics: client_metrics("Push / Pull Split", 64),
                training_plan: Some(PlanSeed {
                    name: "Push / Pull Split".into(),
                    description: "Four-day push/pull block with progressive overload".into(),
                    duration_weeks: 8,
                    days: vec![
                        PlanDay {
                            day: DayOfWeek::Mon,
                            exercises: vec![
                                prescription("Bench Press", 4, 8),
                                prescription("Overhead Press", 3, 10),
                            ],
                        },
                        PlanDay {
                            day: DayOfWeek::Wed,
                            exercises: vec![
                                prescription("Deadlift", 3, 5),
                                prescription("Barbell Row", 4, 8),
                            ],
                        },
                    ],
                }),
                workout_logs: vec![WorkoutLogSeed {
                    start_time: session,
                    end_time: Some(session + chrono::Duration::minutes(55)),
                    status: WorkoutStatus::Completed,
                    workout_type: WorkoutType::Strength,
                    duration_minutes: Some(55),
                    calories_burned: Some(420),
                    exercises: vec![WorkoutExercise {
                        logged_at: session,
                        exercise_name: "Bench Press".into(),
                        sets: Some(4),
                        reps: Some(8),
                        weight: Some(80.0),
                        notes: None,
                    }],
                }],
                diet_logs: vec![DietLogSeed {
                    logged_at: meal,
                    meal_type: MealType::Breakfast,
                    description: "Oats, eggs, banana".into(),
                    calories: 640,
                }],
                weight_logs: vec![WeightLogSeed {
                    logged_at: weigh_in,
                    weight: 76.4,
                }],
            },
            ClientSeed {
                account: AccountSeed {
                    name: "Priya Darshini".into(),
                    phone_number: "+15550000002".into(),
                    email: None,
                    pin: "222222".into(),
                    role: Role::ManagedClient,
                    goal: Goal::WeightLoss,
                },
                profile: ProfileSeed {
                    age: Some(34),
                    gender: Some("female".into()),
                    focus_area: Some("Conditioning".into()),
                    progress_percent: Some(48),
                    ..ProfileSeed::default()
                },
                metrics: client_metrics("Metcon Builder", 48),
                training_plan: Some(PlanSeed {
                    name: "Metcon Builder".into(),
                    description: "Three-day conditioning circuit".into(),
                    duration_weeks: 6,
                    days: vec![PlanDay {
                        day: DayOfWeek::Tue,
                        exercises: vec![
                            prescription("Kettlebell Swing", 5, 15),
                            prescription("Burpee", 5, 12),
                        ],
                    }],
                }),
                workout_logs: vec![],
                diet_logs: vec![],
                weight_logs: vec![WeightLogSeed {
                    logged_at: weigh_in,
                    weight: 61.8,
                }],
            },
            ClientSeed {
                account: AccountSeed {
                    name: "Vijay Kumar".into(),
                    phone_number: "+15550000003".into(),
                    email: None,
                    pin: "333333".into(),
                    role: Role::SelfManagedClient,
                    goal: Goal::Endurance,
                },
                profile: ProfileSeed::default(),
                metrics: client_metrics("Base Mileage", 30),
                training_plan: None,
                workout_logs: vec![WorkoutLogSeed {
                    start_time: session - chrono::Duration::days(1),
                    end_time: None,
                    status: WorkoutStatus::Ongoing,
                    workout_type: WorkoutType::Cardio,
                    duration_minutes: None,
                    calories_burned: None,
                    exercises: vec![],
                }],
                diet_logs: vec![],
                weight_logs: vec![],
            },
        ],
    }
}

fn client_metrics(plan_name: &str, progress: u32) -> ClientMetricsSeed {
    ClientMetricsSeed {
        plan_name: plan_name.into(),
        goal_progress: progress,
        goal_quote: "Consistency beats intensity".into(),
        calories_remaining: 820,
        macros: vec![MacroStat {
            label: "Protein".into(),
            amount: "92g".into(),
            remaining: "48g left".into(),
            accent_from: "#f97316".into(),
            accent_to: "#fb923c".into(),
        }],
        activity_series: vec![
            ActivityPoint {
                day: "Mon".into(),
                minutes: 45,
            },
            ActivityPoint {
                day: "Tue".into(),
                minutes: 30,
            },
        ],
        duration_minutes: 55,
        calories_burned: 420,
        habits: vec![HabitStat {
            label: "Hydration".into(),
            value: "2.1L".into(),
            helper: "of 3L target".into(),
            icon_key: "droplet".into(),
            accent_color: "#38bdf8".into(),
        }],
        sunlight_minutes: 25,
    }
}

fn prescription(name: &str, sets: u32, reps: u32) -> ExercisePrescription {
    ExercisePrescription {
        exercise_name: name.into(),
        sets: Some(sets),
        reps: Some(reps),
        weight: None,
        notes: None,
    }
}
