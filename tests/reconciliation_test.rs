// ABOUTME: End-to-end reconciliation tests over full seed batches
// ABOUTME: Covers convergence, uniqueness keys, reference checks, and catalog dedup

use chrono::{DateTime, Duration, TimeZone, Utc};

use pulseboard::errors::ReconcileError;
use pulseboard::models::{
    Account, AccountProfile, ClientMetrics, CoachMetrics, DayOfWeek, DietLog, ExerciseName,
    ExercisePrescription, Goal, MealType, PlanDay, RecordId, Role, TrainingPlan, WeightLog,
    WorkoutDetail, WorkoutExercise, WorkoutLog, WorkoutStatus, WorkoutType,
};
use pulseboard::recon::batch::reconcile_batch;
use pulseboard::recon::seed::{
    AccountSeed, ClientMetricsSeed, ClientSeed, CoachMetricsSeed, CoachSeed, DietLogSeed,
    PlanSeed, ProfileSeed, SeedBatch, WeightLogSeed, WorkoutLogSeed,
};
use pulseboard::recon::Reconciler;
use pulseboard::store::{IndexKey, MemoryStore};

fn session_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 3, 6, 30, 0).unwrap()
}

fn account_seed(name: &str, phone: &str, pin: &str, role: Role) -> AccountSeed {
    AccountSeed {
        name: name.into(),
        phone_number: phone.into(),
        email: None,
        pin: pin.into(),
        role,
        goal: Goal::GeneralFitness,
    }
}

fn empty_metrics(plan_name: &str) -> ClientMetricsSeed {
    ClientMetricsSeed {
        plan_name: plan_name.into(),
        goal_progress: 10,
        goal_quote: "q".into(),
        calories_remaining: 500,
        macros: vec![],
        activity_series: vec![],
        duration_minutes: 0,
        calories_burned: 0,
        habits: vec![],
        sunlight_minutes: 0,
    }
}

fn exercise(name: &str) -> WorkoutExercise {
    WorkoutExercise {
        logged_at: session_time(),
        exercise_name: name.into(),
        sets: Some(3),
        reps: Some(10),
        weight: None,
        notes: None,
    }
}

fn workout_log(start: DateTime<Utc>, exercises: Vec<WorkoutExercise>) -> WorkoutLogSeed {
    WorkoutLogSeed {
        start_time: start,
        end_time: Some(start + Duration::minutes(45)),
        status: WorkoutStatus::Completed,
        workout_type: WorkoutType::Strength,
        duration_minutes: Some(45),
        calories_burned: Some(300),
        exercises,
    }
}

fn client(name: &str, phone: &str, pin: &str, plan: Option<PlanSeed>) -> ClientSeed {
    ClientSeed {
        account: account_seed(name, phone, pin, Role::ManagedClient),
        profile: ProfileSeed::default(),
        metrics: empty_metrics("P1"),
        training_plan: plan,
        workout_logs: vec![],
        diet_logs: vec![],
        weight_logs: vec![],
    }
}

fn plan(name: &str, exercises: &[&str]) -> PlanSeed {
    PlanSeed {
        name: name.into(),
        description: String::new(),
        duration_weeks: 4,
        days: vec![PlanDay {
            day: DayOfWeek::Mon,
            exercises: exercises
                .iter()
                .map(|n| ExercisePrescription {
                    exercise_name: (*n).into(),
                    sets: Some(3),
                    reps: Some(8),
                    weight: None,
                    notes: None,
                })
                .collect(),
        }],
    }
}

fn batch(clients: Vec<ClientSeed>) -> SeedBatch {
    SeedBatch {
        coach: CoachSeed {
            account: account_seed("C", "+15551230000", "123123", Role::Coach),
            metrics: CoachMetricsSeed {
                overall_progress: 70,
                trend_delta: 3,
                micro_stats: vec![],
                quick_actions: vec![],
                upcoming_sessions: vec![],
            },
        },
        admin: account_seed("Admin", "+15551239999", "999999", Role::Admin),
        clients,
    }
}

#[tokio::test]
async fn repeated_batches_converge_to_identical_state() {
    let store = MemoryStore::new();
    let mut client = client("A", "+1000000001", "111111", Some(plan("P1", &["Squat"])));
    client.workout_logs = vec![workout_log(session_time(), vec![exercise("Squat")])];
    let seed = batch(vec![client]);

    let first = reconcile_batch(&store, &seed).await.unwrap();
    assert!(first.coach.was_created());
    assert!(first.clients[0].account.was_created());

    let second = reconcile_batch(&store, &seed).await.unwrap();
    assert!(!second.coach.was_created());
    assert!(!second.admin.was_created());
    assert!(!second.clients[0].account.was_created());
    assert_eq!(second.exercise_names_created, 0);

    // Identities are stable across runs.
    assert_eq!(first.coach_id(), second.coach_id());
    assert_eq!(
        first.clients[0].account.id(),
        second.clients[0].account.id()
    );
    assert_eq!(
        first.clients[0].plan.unwrap().id(),
        second.clients[0].plan.unwrap().id()
    );

    // No duplicate rows anywhere.
    assert_eq!(store.len::<Account>().await, 3);
    assert_eq!(store.len::<AccountProfile>().await, 1);
    assert_eq!(store.len::<ClientMetrics>().await, 1);
    assert_eq!(store.len::<CoachMetrics>().await, 1);
    assert_eq!(store.len::<TrainingPlan>().await, 1);
    assert_eq!(store.len::<WorkoutLog>().await, 1);
    assert_eq!(store.len::<WorkoutDetail>().await, 1);
    assert_eq!(store.len::<ExerciseName>().await, 1);
}

#[tokio::test]
async fn second_run_preserves_id_and_created_at_but_refreshes_updated_at() {
    let store = MemoryStore::new();
    let seed = batch(vec![client("A", "+1000000001", "111111", None)]);

    reconcile_batch(&store, &seed).await.unwrap();
    let before: Account = store
        .find_unique("by_phone", &IndexKey::one("+1000000001"))
        .await
        .unwrap()
        .unwrap();

    reconcile_batch(&store, &seed).await.unwrap();
    let after: Account = store
        .find_unique("by_phone", &IndexKey::one("+1000000001"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(before.id, after.id);
    assert_eq!(before.created_at, after.created_at);
    assert!(after.updated_at >= before.updated_at);
    assert_ne!(after.updated_at, before.updated_at);
}

#[tokio::test]
async fn changed_payload_wins_for_same_workout_start_time() {
    let store = MemoryStore::new();
    let start = session_time();

    let mut first_client = client("A", "+1000000001", "111111", None);
    first_client.workout_logs = vec![workout_log(start, vec![exercise("Squat")])];
    reconcile_batch(&store, &batch(vec![first_client])).await.unwrap();

    let mut second_client = client("A", "+1000000001", "111111", None);
    let mut updated = workout_log(start, vec![exercise("Squat"), exercise("Press")]);
    updated.calories_burned = Some(500);
    second_client.workout_logs = vec![updated];
    reconcile_batch(&store, &batch(vec![second_client])).await.unwrap();

    assert_eq!(store.len::<WorkoutLog>().await, 1);
    let account: Account = store
        .find_unique("by_phone", &IndexKey::one("+1000000001"))
        .await
        .unwrap()
        .unwrap();
    let logs: Vec<WorkoutLog> = store
        .find_all("by_account", &IndexKey::one(account.id))
        .await
        .unwrap();
    assert_eq!(logs[0].calories_burned, Some(500));
    // Creation timestamp tracks the session start, not the run instant.
    assert_eq!(logs[0].created_at, start);

    let detail: WorkoutDetail = store
        .find_unique("by_workout_log", &IndexKey::one(logs[0].id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.exercises.len(), 2);
}

#[tokio::test]
async fn diet_and_weight_logs_reconcile_in_place_by_timestamp() {
    let store = MemoryStore::new();
    let meal = session_time() + Duration::hours(2);
    let weigh_in = session_time() - Duration::minutes(30);

    let mut first = client("A", "+1000000001", "111111", None);
    first.diet_logs = vec![DietLogSeed {
        logged_at: meal,
        meal_type: MealType::Breakfast,
        description: "Oats".into(),
        calories: 400,
    }];
    first.weight_logs = vec![WeightLogSeed {
        logged_at: weigh_in,
        weight: 80.0,
    }];
    reconcile_batch(&store, &batch(vec![first])).await.unwrap();

    // Same timestamps, changed payloads: reconcile in place.
    let mut second = client("A", "+1000000001", "111111", None);
    second.diet_logs = vec![DietLogSeed {
        logged_at: meal,
        meal_type: MealType::Lunch,
        description: "Oats and eggs".into(),
        calories: 500,
    }];
    second.weight_logs = vec![WeightLogSeed {
        logged_at: weigh_in,
        weight: 79.5,
    }];
    reconcile_batch(&store, &batch(vec![second])).await.unwrap();

    assert_eq!(store.len::<DietLog>().await, 1);
    assert_eq!(store.len::<WeightLog>().await, 1);

    let account: Account = store
        .find_unique("by_phone", &IndexKey::one("+1000000001"))
        .await
        .unwrap()
        .unwrap();
    let diets: Vec<DietLog> = store
        .find_all("by_account", &IndexKey::one(account.id))
        .await
        .unwrap();
    assert_eq!(diets[0].logged_at, meal);
    assert_eq!(diets[0].meal_type, MealType::Lunch);
    assert_eq!(diets[0].description, "Oats and eggs");
    assert_eq!(diets[0].calories, 500);

    let weights: Vec<WeightLog> = store
        .find_all("by_account", &IndexKey::one(account.id))
        .await
        .unwrap();
    assert_eq!(weights[0].logged_at, weigh_in);
    assert!((weights[0].weight - 79.5).abs() < f64::EPSILON);

    // A new timestamp is a new entry, not an update.
    let mut third = client("A", "+1000000001", "111111", None);
    third.weight_logs = vec![WeightLogSeed {
        logged_at: weigh_in + Duration::days(1),
        weight: 79.1,
    }];
    reconcile_batch(&store, &batch(vec![third])).await.unwrap();
    assert_eq!(store.len::<WeightLog>().await, 2);
}

#[tokio::test]
async fn exercise_catalog_is_union_of_plans_and_logs() {
    let store = MemoryStore::new();
    let mut client = client(
        "A",
        "+1000000001",
        "111111",
        Some(plan("P1", &["Squat", "Row"])),
    );
    client.workout_logs = vec![workout_log(
        session_time(),
        vec![exercise("Squat"), exercise("Press")],
    )];

    let outcome = reconcile_batch(&store, &batch(vec![client])).await.unwrap();
    assert_eq!(outcome.exercise_names_created, 3);
    assert_eq!(store.len::<ExerciseName>().await, 3);

    for name in ["Squat", "Row", "Press"] {
        let hit: Option<ExerciseName> = store
            .find_unique("by_name", &IndexKey::one(name))
            .await
            .unwrap();
        assert!(hit.is_some(), "missing catalog entry for {name}");
    }
}

#[tokio::test]
async fn client_account_references_the_ensured_plan() {
    let store = MemoryStore::new();
    let seed = batch(vec![client(
        "A",
        "+1000000001",
        "111111",
        Some(plan("P1", &[])),
    )]);

    let outcome = reconcile_batch(&store, &seed).await.unwrap();
    let plan_id = outcome.clients[0].plan.unwrap().id();

    let account: Account = store
        .find_unique("by_phone", &IndexKey::one("+1000000001"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account.plan_id, Some(plan_id));
    assert_eq!(account.coach_id, Some(outcome.coach_id()));

    let stored_plan: TrainingPlan = store.get(plan_id).await.unwrap().unwrap();
    assert_eq!(stored_plan.created_by, outcome.coach_id());
}

#[tokio::test]
async fn dependent_write_without_owner_is_rejected() {
    let store = MemoryStore::new();
    let recon = Reconciler::new(&store);

    let missing = RecordId::new();
    let err = recon
        .ensure_client_metrics(missing, &empty_metrics("P1"))
        .await
        .unwrap_err();
    match err {
        ReconcileError::ReferenceMissing { id, .. } => assert_eq!(id, missing),
        other => panic!("expected ReferenceMissing, got {other:?}"),
    }
    assert_eq!(store.len::<ClientMetrics>().await, 0);
}

#[tokio::test]
async fn phone_number_is_the_account_identity() {
    let store = MemoryStore::new();

    // Same phone, different name: reconciles the existing row in place.
    reconcile_batch(&store, &batch(vec![client("A", "+1000000001", "111111", None)]))
        .await
        .unwrap();
    reconcile_batch(
        &store,
        &batch(vec![client("A renamed", "+1000000001", "111111", None)]),
    )
    .await
    .unwrap();

    assert_eq!(store.len::<Account>().await, 3);
    let account: Account = store
        .find_unique("by_phone", &IndexKey::one("+1000000001"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account.name, "A renamed");
}
