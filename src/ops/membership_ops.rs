use chrono::NaiveDate;
use rusqlite::Connection;

use crate::db::{membership_repo, notification_repo, pod_repo};
use crate::engine::{lifecycle, schedule};
use crate::error::{AjoError, AjoResult};
use crate::model::{Account, GoalType, Id, Membership, Notification, Pod, PodStatus};
use crate::validation::trim_optional;

/// Shared join path for plan joins, invite accepts and placeholder
/// backfills. Assigns the provisional join order and fixes the pod's start
/// date once the start threshold is reached.
pub fn join_pod(
    conn: &Connection,
    account_id: Option<Id<Account>>,
    pod_id: Id<Pod>,
    goal_type: GoalType,
    goal_note: Option<&str>,
    today: NaiveDate,
) -> AjoResult<Membership> {
    let mut pod = pod_repo::find_by_id(conn, pod_id)?.ok_or_else(|| AjoError::NotFound {
        entity_type: "Pod".into(),
        id: pod_id.to_string(),
    })?;

    if pod.status == PodStatus::Completed {
        return Err(AjoError::PodCompleted);
    }
    if !pod.accepts_members() {
        return Err(AjoError::JoinClosed);
    }

    let members = membership_repo::find_by_pod(conn, pod.id)?;
    if members.len() as i32 >= pod.max_members {
        return Err(AjoError::PodFull {
            capacity: pod.max_members,
        });
    }
    if let Some(account) = account_id {
        if members.iter().any(|m| m.account_id == Some(account)) {
            return Err(AjoError::AlreadyMember);
        }
    }

    let note = trim_optional(goal_note);
    if goal_type.requires_note() && note.is_none() {
        return Err(AjoError::GoalNoteRequired);
    }

    let membership = Membership::create(
        pod.id,
        account_id,
        members.len() as i32 + 1,
        today,
        goal_type,
        note,
    );
    membership_repo::insert(conn, &membership)?;

    let count = members.len() as i32 + 1;
    let mut pod_changed = false;

    // a custom pod opens once someone besides the creator joins
    if pod.status == PodStatus::Pending && count > 1 {
        pod.status = PodStatus::Open;
        pod_changed = true;
    }

    if pod.scheduled_start_date.is_none() && count >= pod.start_threshold() {
        pod.scheduled_start_date = Some(schedule::next_canonical_start(today));
        pod_changed = true;
    }

    if pod_changed {
        pod_repo::update(conn, &pod)?;
    }

    if let Some(account) = account_id {
        let body = match pod.scheduled_start_date {
            Some(start) => format!(
                "You joined {} in position {}. The pod is set to start on {}.",
                pod.display_name(),
                membership.join_order,
                start
            ),
            None => format!(
                "You joined {} in position {}. It starts once {} members are in.",
                pod.display_name(),
                membership.join_order,
                pod.start_threshold()
            ),
        };
        notification_repo::insert(
            conn,
            &Notification::create(account, "Welcome to your pod".into(), body),
        )?;
    }

    Ok(membership)
}

/// Back-office backfill of an unclaimed slot while the pod still accepts
/// members.
pub fn add_placeholder(
    conn: &Connection,
    pod_id: Id<Pod>,
    today: NaiveDate,
) -> AjoResult<Membership> {
    join_pod(conn, None, pod_id, GoalType::Savings, None, today)
}

/// Update what a member is saving toward. Allowed until the member has been
/// paid out.
pub fn set_goal(
    conn: &Connection,
    membership_id: Id<Membership>,
    goal_type: GoalType,
    goal_note: Option<&str>,
) -> AjoResult<Membership> {
    let mut membership =
        membership_repo::find_by_id(conn, membership_id)?.ok_or_else(|| AjoError::NotFound {
            entity_type: "Membership".into(),
            id: membership_id.to_string(),
        })?;

    let pod = pod_repo::find_by_id(conn, membership.pod_id)?.ok_or_else(|| AjoError::NotFound {
        entity_type: "Pod".into(),
        id: membership.pod_id.to_string(),
    })?;
    lifecycle::ensure_mutable(&pod)?;

    if membership.paid_out {
        return Err(AjoError::AlreadyPaidOut);
    }

    let note = trim_optional(goal_note);
    if goal_type.requires_note() && note.is_none() {
        return Err(AjoError::GoalNoteRequired);
    }

    membership.goal_type = goal_type;
    membership.goal_note = note;
    membership_repo::update(conn, &membership)?;
    Ok(membership)
}
