use chrono::NaiveDate;
use rusqlite::Connection;

use crate::db::{membership_repo, plan_repo, pod_repo};
use crate::error::{AjoError, AjoResult};
use crate::model::{Account, Cadence, GoalType, Id, Membership, Pod};
use crate::ops::membership_ops;
use crate::validation::{self, optional_positive};

/// Join the open system pod for a plan, creating a fresh one from the
/// catalog when none has room.
pub fn join_plan(
    conn: &Connection,
    account_id: Id<Account>,
    plan_code: &str,
    goal_type: GoalType,
    goal_note: Option<&str>,
    today: NaiveDate,
) -> AjoResult<(Pod, Membership)> {
    let plan = plan_repo::find_by_code(conn, plan_code)?
        .filter(|p| p.active)
        .ok_or_else(|| AjoError::NotFound {
            entity_type: "Plan".into(),
            id: plan_code.to_string(),
        })?;

    let pod = match find_pod_with_room(conn, &plan.code)? {
        Some(pod) => pod,
        None => {
            let pod = Pod::from_plan(&plan);
            pod_repo::insert(conn, &pod)?;
            pod
        }
    };

    let membership = membership_ops::join_pod(
        conn,
        Some(account_id),
        pod.id,
        goal_type,
        goal_note,
        today,
    )?;

    // re-read: the join may have fixed the start date
    let pod = pod_repo::find_by_id(conn, pod.id)?.ok_or_else(|| AjoError::NotFound {
        entity_type: "Pod".into(),
        id: pod.id.to_string(),
    })?;

    Ok((pod, membership))
}

fn find_pod_with_room(conn: &Connection, plan_code: &str) -> AjoResult<Option<Pod>> {
    for pod in pod_repo::find_joinable_system_pods(conn, plan_code)? {
        if membership_repo::count_by_pod(conn, pod.id)? < pod.max_members {
            return Ok(Some(pod));
        }
    }
    Ok(None)
}

/// Create an invite-only custom pod; the creator takes the first slot.
pub fn create_custom_pod(
    conn: &Connection,
    creator: Id<Account>,
    name: &str,
    amount: i64,
    lifecycle_weeks: i32,
    max_members: i32,
    cadence: Cadence,
    expected_member_count: Option<i32>,
    randomize_payout_order: bool,
    goal_type: GoalType,
    goal_note: Option<&str>,
    today: NaiveDate,
) -> AjoResult<(Pod, Membership)> {
    let valid_name = validation::non_blank(name, "name")?;
    let amount = validation::positive_amount(amount, "amount")?;
    let lifecycle_weeks = validation::positive_count(lifecycle_weeks, "lifecycle_weeks")?;
    let max_members = validation::positive_count(max_members, "max_members")?;
    let expected = optional_positive(expected_member_count, "expected_member_count")?;
    if expected.is_some_and(|e| e > max_members) {
        return Err(AjoError::ExpectedCountExceedsCapacity);
    }

    let pod = Pod::create_custom(
        valid_name,
        amount,
        lifecycle_weeks,
        max_members,
        cadence,
        expected,
        randomize_payout_order,
    );
    pod_repo::insert(conn, &pod)?;

    let membership =
        membership_ops::join_pod(conn, Some(creator), pod.id, goal_type, goal_note, today)?;

    Ok((pod, membership))
}

/// Join a custom pod by its invite code.
pub fn accept_invite(
    conn: &Connection,
    account_id: Id<Account>,
    invite_code: &str,
    goal_type: GoalType,
    goal_note: Option<&str>,
    today: NaiveDate,
) -> AjoResult<(Pod, Membership)> {
    let code = invite_code.trim().to_uppercase();
    let pod = pod_repo::find_by_invite_code(conn, &code)?
        .ok_or_else(|| AjoError::InvalidInviteCode(code.clone()))?;

    if !pod.accepts_members() {
        return Err(AjoError::InvalidInviteCode(code));
    }

    let membership =
        membership_ops::join_pod(conn, Some(account_id), pod.id, goal_type, goal_note, today)?;

    let pod = pod_repo::find_by_id(conn, pod.id)?.ok_or_else(|| AjoError::NotFound {
        entity_type: "Pod".into(),
        id: pod.id.to_string(),
    })?;

    Ok((pod, membership))
}
