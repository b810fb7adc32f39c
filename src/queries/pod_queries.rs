use rusqlite::Connection;

use crate::db::{membership_repo, pod_repo};
use crate::engine::ordering::{self, QueueView};
use crate::engine::payout;
use crate::error::AjoResult;
use crate::model::{Account, Id, Membership, Pod};

/// Everything the pod screen shows one member.
#[derive(Debug, Clone)]
pub struct PodDetail {
    pub pod: Pod,
    /// Payout order once locked, join order before.
    pub members: Vec<Membership>,
    pub my_membership: Option<Membership>,
    /// Ahead/behind view; None before lock or for non-members.
    pub queue: Option<QueueView>,
    pub cycles_total: i32,
    pub contribution_target: i64,
    pub my_progress: Option<f64>,
}

pub fn pod_detail(
    conn: &Connection,
    pod_id: Id<Pod>,
    account_id: Id<Account>,
) -> AjoResult<Option<PodDetail>> {
    let pod = match pod_repo::find_by_id(conn, pod_id)? {
        Some(p) => p,
        None => return Ok(None),
    };

    let mut members = membership_repo::find_by_pod(conn, pod.id)?;
    if pod.is_locked() {
        members.sort_by_key(|m| m.final_order);
    }

    let my_membership = members
        .iter()
        .find(|m| m.account_id == Some(account_id))
        .cloned();
    let queue = ordering::queue_position(&members, account_id);

    let contribution_target = payout::contribution_target(&pod);
    let my_progress = my_membership
        .as_ref()
        .map(|m| payout::contribution_progress(m.total_contributed, contribution_target));

    Ok(Some(PodDetail {
        cycles_total: payout::cycle_count(pod.lifecycle_weeks),
        contribution_target,
        pod,
        members,
        my_membership,
        queue,
        my_progress,
    }))
}

pub fn pods_for_account(conn: &Connection, account_id: Id<Account>) -> AjoResult<Vec<Pod>> {
    pod_repo::find_for_account(conn, account_id)
}
