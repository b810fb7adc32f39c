use chrono::NaiveDate;
use rusqlite::Connection;

use crate::db::{membership_repo, pod_repo};
use crate::engine::payout::{self, PayoutBreakdown};
use crate::error::{AjoError, AjoResult};
use crate::model::{Id, Membership, Pod};

/// Payout figures for one membership, as shown before and after lock.
#[derive(Debug, Clone)]
pub struct PayoutPreview {
    pub membership: Membership,
    pub position: Option<i32>,
    pub member_count: i32,
    pub breakdown: PayoutBreakdown,
    pub payout_date: Option<NaiveDate>,
}

pub fn payout_preview(
    conn: &Connection,
    membership_id: Id<Membership>,
) -> AjoResult<Option<PayoutPreview>> {
    let membership = match membership_repo::find_by_id(conn, membership_id)? {
        Some(m) => m,
        None => return Ok(None),
    };

    let pod = pod_repo::find_by_id(conn, membership.pod_id)?.ok_or_else(|| AjoError::NotFound {
        entity_type: "Pod".into(),
        id: membership.pod_id.to_string(),
    })?;

    let member_count = membership_repo::count_by_pod(conn, pod.id)?;
    let breakdown = payout::breakdown(&membership, &pod, Some(member_count));

    Ok(Some(PayoutPreview {
        position: membership.final_order,
        payout_date: membership.payout_date,
        member_count,
        breakdown,
        membership,
    }))
}

/// The whole pod's payout schedule, in payout order where it exists.
pub fn pod_schedule(conn: &Connection, pod_id: Id<Pod>) -> AjoResult<Vec<PayoutPreview>> {
    let pod = pod_repo::find_by_id(conn, pod_id)?.ok_or_else(|| AjoError::NotFound {
        entity_type: "Pod".into(),
        id: pod_id.to_string(),
    })?;

    let mut members = membership_repo::find_by_pod(conn, pod.id)?;
    if pod.is_locked() {
        members.sort_by_key(|m| m.final_order);
    }
    let member_count = members.len() as i32;

    Ok(members
        .into_iter()
        .map(|membership| PayoutPreview {
            position: membership.final_order,
            payout_date: membership.payout_date,
            member_count,
            breakdown: payout::breakdown(&membership, &pod, Some(member_count)),
            membership,
        })
        .collect())
}
