use chrono::NaiveDate;
use rusqlite::Connection;

use crate::db::{membership_repo, pod_repo};
use crate::engine::lifecycle;
use crate::error::AjoResult;
use crate::model::{Account, Id, PodStatus};

#[derive(Debug, Clone)]
pub struct AjoStats {
    pub total_pods: usize,
    pub filling_pods: usize,
    pub active_pods: usize,
    pub completed_pods: usize,
    pub total_members: usize,
    pub placeholder_slots: usize,
    pub total_contributed: i64,
    /// The account's soonest upcoming payout: pod display name and date.
    pub next_payout: Option<(String, NaiveDate)>,
}

pub fn stats(conn: &Connection, account_id: Id<Account>, as_of: NaiveDate) -> AjoResult<AjoStats> {
    let pods = pod_repo::find_all(conn)?;
    let filling = pods
        .iter()
        .filter(|p| {
            matches!(
                p.status,
                PodStatus::Pending | PodStatus::Open | PodStatus::Grace
            )
        })
        .count();
    let active = pods.iter().filter(|p| p.status == PodStatus::Active).count();
    let completed = pods
        .iter()
        .filter(|p| p.status == PodStatus::Completed)
        .count();

    let mut total_members = 0usize;
    let mut placeholder_slots = 0usize;
    let mut total_contributed = 0i64;
    let mut next_payout: Option<(String, NaiveDate)> = None;

    for pod in &pods {
        let members = membership_repo::find_by_pod(conn, pod.id)?;
        total_members += members.len();
        placeholder_slots += members.iter().filter(|m| m.is_placeholder()).count();
        total_contributed += members.iter().map(|m| m.total_contributed).sum::<i64>();

        let is_mine = members.iter().any(|m| m.account_id == Some(account_id));
        if is_mine {
            if let Some(date) = lifecycle::next_payout_date(&members, as_of) {
                if next_payout.as_ref().map_or(true, |(_, d)| date < *d) {
                    next_payout = Some((pod.display_name(), date));
                }
            }
        }
    }

    Ok(AjoStats {
        total_pods: pods.len(),
        filling_pods: filling,
        active_pods: active,
        completed_pods: completed,
        total_members,
        placeholder_slots,
        total_contributed,
        next_payout,
    })
}
