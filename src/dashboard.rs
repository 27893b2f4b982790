// ABOUTME: Read-side dashboard aggregation for coach and client views
// ABOUTME: Chained indexed point lookups; absence surfaces as None, never an error
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Dashboard Aggregation
//!
//! The write side stores denormalized snapshots; the read side stitches
//! them back together with chained point lookups. Assembly never fails
//! on missing data: a coach without a metrics snapshot, or a client
//! without one, yields `None` for the whole view, and a client missing
//! a profile gets presentation fallbacks field by field. Errors are
//! reserved for broken infrastructure (undeclared indexes, ambiguous
//! unique lookups).

use serde::Serialize;

use crate::errors::StoreError;
use crate::models::{
    Account, AccountProfile, ClientMetrics, CoachMetrics, MicroStat, QuickAction, RecordId,
    UpcomingSession,
};
use crate::store::{IndexKey, MemoryStore};

/// Status shown for a client whose profile carries no readiness note.
pub const FALLBACK_STATUS: &str = "On program";

/// Accent used for a client whose profile carries no accent color.
pub const FALLBACK_ACCENT: &str = "#bef264";

/// One row in the coach's active-client list. Every field is always
/// populated; gaps in the underlying profile are papered over with
/// fallbacks at assembly time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveClient {
    pub id: RecordId,
    pub name: String,
    /// Profile focus area, falling back to the account's goal.
    pub focus: String,
    pub progress: u32,
    pub status: String,
    pub accent_color: String,
}

/// Headline numbers lifted from the coach's metrics snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub overall_progress: u32,
    pub trend_delta: i32,
    pub clients_total: u32,
}

/// The assembled coach view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachDashboard {
    pub summary: DashboardSummary,
    pub micro_stats: Vec<MicroStat>,
    pub quick_actions: Vec<QuickAction>,
    pub upcoming_sessions: Vec<UpcomingSession>,
    pub active_clients: Vec<ActiveClient>,
}

fn active_client(account: &Account, profile: Option<&AccountProfile>) -> ActiveClient {
    let focus = profile
        .and_then(|p| p.focus_area.clone())
        .unwrap_or_else(|| account.goal.to_string());
    let progress = profile.and_then(|p| p.progress_percent).unwrap_or(0);
    let status = profile
        .and_then(|p| p.readiness_note.clone())
        .unwrap_or_else(|| FALLBACK_STATUS.to_owned());
    let accent_color = profile
        .and_then(|p| p.accent_color.clone())
        .unwrap_or_else(|| FALLBACK_ACCENT.to_owned());

    ActiveClient {
        id: account.id,
        name: account.name.clone(),
        focus,
        progress,
        status,
        accent_color,
    }
}

/// Assemble the coach view. `None` when the coach has no metrics
/// snapshot yet; clients with coaching or administrative roles are
/// filtered out of the active list.
pub async fn coach_dashboard(
    store: &MemoryStore,
    coach_id: RecordId,
) -> Result<Option<CoachDashboard>, StoreError> {
    let key = IndexKey::one(coach_id);
    let Some(metrics) = store
        .find_unique::<CoachMetrics>("by_coach", &key)
        .await?
    else {
        return Ok(None);
    };

    let accounts: Vec<Account> = store.find_all("by_coach", &key).await?;
    let mut active_clients = Vec::with_capacity(accounts.len());
    for account in &accounts {
        if account.role.is_privileged() {
            continue;
        }
        let profile = store
            .find_unique::<AccountProfile>("by_account", &IndexKey::one(account.id))
            .await?;
        active_clients.push(active_client(account, profile.as_ref()));
    }

    Ok(Some(CoachDashboard {
        summary: DashboardSummary {
            overall_progress: metrics.overall_progress,
            trend_delta: metrics.trend_delta,
            clients_total: metrics.clients_total,
        },
        micro_stats: metrics.micro_stats,
        quick_actions: metrics.quick_actions,
        upcoming_sessions: metrics.upcoming_sessions,
        active_clients,
    }))
}

/// The client view is the stored snapshot verbatim; `None` when the
/// client has none yet.
pub async fn client_dashboard(
    store: &MemoryStore,
    account_id: RecordId,
) -> Result<Option<ClientMetrics>, StoreError> {
    store
        .find_unique::<ClientMetrics>("by_account", &IndexKey::one(account_id))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Goal;
    use chrono::Utc;

    fn account(goal: Goal) -> Account {
        Account {
            id: RecordId::new(),
            name: "Client".into(),
            phone_number: "+15550000001".into(),
            email: None,
            pin: "111111".into(),
            role: crate::models::Role::ManagedClient,
            goal,
            coach_id: None,
            plan_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn missing_profile_gets_full_fallbacks() {
        let row = active_client(&account(Goal::MuscleGain), None);
        assert_eq!(row.focus, "muscleGain");
        assert_eq!(row.progress, 0);
        assert_eq!(row.status, FALLBACK_STATUS);
        assert_eq!(row.accent_color, FALLBACK_ACCENT);
    }

    #[test]
    fn fallbacks_apply_field_by_field() {
        let acct = account(Goal::Endurance);
        let profile = AccountProfile {
            id: RecordId::new(),
            account_id: acct.id,
            age: None,
            address: None,
            gender: None,
            height: None,
            focus_area: Some("Conditioning".into()),
            readiness_note: None,
            progress_percent: Some(42),
            accent_color: None,
            emergency_contact_name: None,
            emergency_contact_phone: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let row = active_client(&acct, Some(&profile));
        assert_eq!(row.focus, "Conditioning");
        assert_eq!(row.progress, 42);
        assert_eq!(row.status, FALLBACK_STATUS);
        assert_eq!(row.accent_color, FALLBACK_ACCENT);
    }
}
