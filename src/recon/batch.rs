// ABOUTME: Dependency orderer for reconciliation batches
// ABOUTME: Explicit stages replace ad-hoc call ordering; referents always land first
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Batch Orderer
//!
//! A seed batch touches every collection, and most rows reference rows
//! written earlier in the same run. Rather than trusting call order,
//! the orderer names each write phase as a [`Stage`] with declared
//! dependencies, and [`stage_order`] is checked (by a unit test and a
//! debug assertion) to be a valid topological order. Adding a stage in
//! the wrong place fails fast instead of producing orphan references.
//!
//! The run itself is [`reconcile_batch`]: sequential, not transactional.
//! A failure partway leaves earlier ensures committed; because every
//! ensure is idempotent, re-running the same batch converges.

use tracing::info;

use crate::errors::ReconcileError;
use crate::models::RecordId;
use crate::store::MemoryStore;

use super::seed::SeedBatch;
use super::{Ensured, Reconciler};

/// One write phase of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CoachAccount,
    AdminAccount,
    ClientAccounts,
    TrainingPlans,
    PlanAssignments,
    Profiles,
    ClientMetrics,
    WorkoutLogs,
    WorkoutDetails,
    DietLogs,
    WeightLogs,
    ExerciseCatalog,
    CoachMetrics,
}

impl Stage {
    /// Stages that must have completed before this one runs.
    #[must_use]
    pub const fn depends_on(self) -> &'static [Self] {
        match self {
            Self::CoachAccount | Self::AdminAccount | Self::ExerciseCatalog => &[],
            Self::ClientAccounts => &[Self::CoachAccount],
            Self::TrainingPlans => &[Self::CoachAccount],
            Self::PlanAssignments => &[Self::ClientAccounts, Self::TrainingPlans],
            Self::Profiles | Self::ClientMetrics => &[Self::ClientAccounts],
            Self::WorkoutLogs | Self::DietLogs | Self::WeightLogs => &[Self::ClientAccounts],
            Self::WorkoutDetails => &[Self::WorkoutLogs],
            // The coach snapshot embeds the final client count.
            Self::CoachMetrics => &[Self::CoachAccount, Self::ClientAccounts],
        }
    }
}

/// The fixed execution order of a batch run. Must be a topological order
/// of [`Stage::depends_on`].
#[must_use]
pub const fn stage_order() -> [Stage; 13] {
    [
        Stage::CoachAccount,
        Stage::AdminAccount,
        Stage::ClientAccounts,
        Stage::TrainingPlans,
        Stage::PlanAssignments,
        Stage::Profiles,
        Stage::ClientMetrics,
        Stage::WorkoutLogs,
        Stage::WorkoutDetails,
        Stage::DietLogs,
        Stage::WeightLogs,
        Stage::ExerciseCatalog,
        Stage::CoachMetrics,
    ]
}

fn order_is_topological(order: &[Stage]) -> bool {
    order.iter().enumerate().all(|(position, stage)| {
        stage
            .depends_on()
            .iter()
            .all(|dep| order[..position].contains(dep))
    })
}

/// Per-client outcome of a batch run.
#[derive(Debug, Clone)]
pub struct ClientOutcome {
    pub account: Ensured,
    pub plan: Option<Ensured>,
}

/// What a batch run touched, keyed by the stable row identities.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub coach: Ensured,
    pub admin: Ensured,
    pub clients: Vec<ClientOutcome>,
    /// Catalog entries newly created by this run.
    pub exercise_names_created: usize,
}

impl BatchOutcome {
    #[must_use]
    pub fn coach_id(&self) -> RecordId {
        self.coach.id()
    }
}

/// Run one seed batch to completion in [`stage_order`].
pub async fn reconcile_batch(
    store: &MemoryStore,
    batch: &SeedBatch,
) -> Result<BatchOutcome, ReconcileError> {
    debug_assert!(order_is_topological(&stage_order()));

    let recon = Reconciler::new(store);

    let coach = recon.ensure_account(&batch.coach.account, None).await?;
    let coach_id = coach.id();
    let admin = recon.ensure_account(&batch.admin, None).await?;

    let mut clients = Vec::with_capacity(batch.clients.len());
    for client in &batch.clients {
        let account = recon
            .ensure_account(&client.account, Some(coach_id))
            .await?;
        clients.push(ClientOutcome {
            account,
            plan: None,
        });
    }

    for (client, outcome) in batch.clients.iter().zip(&mut clients) {
        if let Some(plan_seed) = &client.training_plan {
            let plan = recon.ensure_training_plan(coach_id, plan_seed).await?;
            recon.assign_plan(outcome.account.id(), plan.id()).await?;
            outcome.plan = Some(plan);
        }
    }

    for (client, outcome) in batch.clients.iter().zip(&clients) {
        let account_id = outcome.account.id();
        recon.ensure_profile(account_id, &client.profile).await?;
        recon
            .ensure_client_metrics(account_id, &client.metrics)
            .await?;
    }

    for (client, outcome) in batch.clients.iter().zip(&clients) {
        let account_id = outcome.account.id();
        for log_seed in &client.workout_logs {
            let log = recon.ensure_workout_log(account_id, log_seed).await?;
            recon
                .ensure_workout_detail(log.id(), &log_seed.exercises)
                .await?;
        }
        for diet_seed in &client.diet_logs {
            recon.ensure_diet_log(account_id, diet_seed).await?;
        }
        for weight_seed in &client.weight_logs {
            recon.ensure_weight_log(account_id, weight_seed).await?;
        }
    }

    let mut exercise_names_created = 0;
    for name in batch.exercise_names() {
        if recon.ensure_exercise_name(&name).await?.was_created() {
            exercise_names_created += 1;
        }
    }

    let clients_total = u32::try_from(batch.clients.len()).unwrap_or(u32::MAX);
    recon
        .ensure_coach_metrics(coach_id, &batch.coach.metrics, clients_total)
        .await?;

    info!(
        %coach_id,
        clients = clients.len(),
        catalog_created = exercise_names_created,
        "reconciled batch"
    );

    Ok(BatchOutcome {
        coach,
        admin,
        clients,
        exercise_names_created,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_order_is_topological() {
        assert!(order_is_topological(&stage_order()));
    }

    #[test]
    fn stage_order_covers_every_stage_once() {
        let order = stage_order();
        for (i, stage) in order.iter().enumerate() {
            assert!(
                !order[..i].contains(stage),
                "stage {stage:?} appears more than once"
            );
        }
    }

    #[test]
    fn misordered_stages_are_rejected() {
        let bad = [Stage::PlanAssignments, Stage::ClientAccounts];
        assert!(!order_is_topological(&bad));
    }
}
