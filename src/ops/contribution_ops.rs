use chrono::NaiveDate;
use rusqlite::Connection;

use crate::db::{membership_repo, notification_repo, pod_repo};
use crate::engine::payout::{self, PayoutBreakdown};
use crate::error::{AjoError, AjoResult};
use crate::model::{Id, Membership, Notification, PodStatus};

/// Record one contribution into an active pod.
pub fn record_contribution(
    conn: &Connection,
    membership_id: Id<Membership>,
    amount: i64,
) -> AjoResult<Membership> {
    let amount = crate::validation::positive_amount(amount, "amount")?;

    let mut membership =
        membership_repo::find_by_id(conn, membership_id)?.ok_or_else(|| AjoError::NotFound {
            entity_type: "Membership".into(),
            id: membership_id.to_string(),
        })?;

    let pod = pod_repo::find_by_id(conn, membership.pod_id)?.ok_or_else(|| AjoError::NotFound {
        entity_type: "Pod".into(),
        id: membership.pod_id.to_string(),
    })?;

    if pod.status != PodStatus::Active {
        return Err(AjoError::PodNotActive);
    }

    membership.total_contributed += amount;
    membership_repo::update(conn, &membership)?;

    if let Some(account) = membership.account_id {
        let target = payout::contribution_target(&pod);
        let progress = payout::contribution_progress(membership.total_contributed, target);
        notification_repo::insert(
            conn,
            &Notification::create(
                account,
                "Contribution received".into(),
                format!(
                    "{} received into {}. You are at {:.2}% of your target.",
                    amount,
                    pod.display_name(),
                    progress
                ),
            ),
        )?;
    }

    Ok(membership)
}

/// Mark a due membership as paid out, once. Returns the payout figures.
pub fn record_payout(
    conn: &Connection,
    membership_id: Id<Membership>,
    today: NaiveDate,
) -> AjoResult<(Membership, PayoutBreakdown)> {
    let mut membership =
        membership_repo::find_by_id(conn, membership_id)?.ok_or_else(|| AjoError::NotFound {
            entity_type: "Membership".into(),
            id: membership_id.to_string(),
        })?;

    let pod = pod_repo::find_by_id(conn, membership.pod_id)?.ok_or_else(|| AjoError::NotFound {
        entity_type: "Pod".into(),
        id: membership.pod_id.to_string(),
    })?;

    // settlement is allowed while the pod is active and, for the final
    // position, just after it completed
    if !matches!(pod.status, PodStatus::Active | PodStatus::Completed) {
        return Err(AjoError::PodNotActive);
    }
    if membership.paid_out {
        return Err(AjoError::AlreadyPaidOut);
    }
    match membership.payout_date {
        Some(due) if due <= today => {}
        _ => return Err(AjoError::PayoutNotDue),
    }

    let member_count = membership_repo::count_by_pod(conn, pod.id)?;
    let breakdown = payout::breakdown(&membership, &pod, Some(member_count));

    membership.paid_out = true;
    membership_repo::update(conn, &membership)?;

    if let Some(account) = membership.account_id {
        notification_repo::insert(
            conn,
            &Notification::create(
                account,
                "Payout sent".into(),
                format!(
                    "Your payout from {} is on its way: {:.2} after a {:.1}% fee on {}.",
                    pod.display_name(),
                    breakdown.net,
                    breakdown.deduction_rate * 100.0,
                    breakdown.gross
                ),
            ),
        )?;
    }

    Ok((membership, breakdown))
}
