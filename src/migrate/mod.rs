use std::path::Path;

use rusqlite::Connection;
use serde_json::Value;

use crate::db::{account_repo, membership_repo, plan_repo, pod_repo, schema};
use crate::error::{AjoError, AjoResult};
use crate::model::*;

/// Imports a legacy backend JSON export into a SQLite database.
pub fn import_json(json_path: &Path, db_path: &Path) -> AjoResult<ImportStats> {
    let json_str = std::fs::read_to_string(json_path)?;
    let json: Value = serde_json::from_str(&json_str)?;

    let conn = Connection::open(db_path)?;
    schema::initialize(&conn)?;
    plan_repo::seed_defaults(&conn)?;

    import_export(&conn, &json)
}

#[derive(Debug)]
pub struct ImportStats {
    pub accounts: usize,
    pub pods: usize,
    pub memberships: usize,
}

fn import_export(conn: &Connection, json: &Value) -> AjoResult<ImportStats> {
    let mut account_count = 0;
    if let Some(accounts) = json["accounts"].as_array() {
        for account_val in accounts {
            let account = Account {
                id: parse_id(account_val["id"].as_str().unwrap_or(""))?,
                name: account_val["name"].as_str().unwrap_or("").to_string(),
                email: account_val["email"].as_str().unwrap_or("").to_string(),
            };
            account_repo::insert(conn, &account)?;
            account_count += 1;
        }
    }

    let mut pod_count = 0;
    let mut membership_count = 0;
    if let Some(pods) = json["pods"].as_array() {
        for pod_val in pods {
            let pod = parse_pod(pod_val)?;
            pod_repo::insert(conn, &pod)?;
            pod_count += 1;

            if let Some(members) = pod_val["members"].as_array() {
                for member_val in members {
                    let membership = parse_membership(pod.id, member_val)?;
                    membership_repo::insert(conn, &membership)?;
                    membership_count += 1;
                }
            }
        }
    }

    Ok(ImportStats {
        accounts: account_count,
        pods: pod_count,
        memberships: membership_count,
    })
}

fn parse_pod(val: &Value) -> AjoResult<Pod> {
    let status_str = val["status"].as_str().unwrap_or("Open");
    let status = PodStatus::from_db_str(status_str)
        .ok_or_else(|| AjoError::Other(format!("Unknown pod status in export: {}", status_str)))?;
    let type_str = val["podType"].as_str().unwrap_or("System");
    let pod_type = PodType::from_db_str(type_str)
        .ok_or_else(|| AjoError::Other(format!("Unknown pod type in export: {}", type_str)))?;
    let cadence = val["cadence"].as_str().and_then(Cadence::from_db_str);

    Ok(Pod {
        id: parse_id(val["id"].as_str().unwrap_or(""))?,
        plan_code: val["planCode"].as_str().map(|s| s.to_string()),
        name: val["name"].as_str().map(|s| s.to_string()),
        amount: val["amount"].as_i64().unwrap_or(0),
        lifecycle_weeks: val["lifecycleWeeks"].as_i64().unwrap_or(0) as i32,
        max_members: val["maxMembers"].as_i64().unwrap_or(0) as i32,
        status,
        pod_type,
        cadence,
        randomize_payout_order: val["randomizePayoutOrder"].as_bool().unwrap_or(false),
        expected_member_count: val["expectedMemberCount"].as_i64().map(|n| n as i32),
        invite_code: val["inviteCode"].as_str().map(|s| s.to_string()),
        scheduled_start_date: parse_date_field(val, "scheduledStartDate"),
        start_date: parse_date_field(val, "startDate"),
        grace_ends_at: parse_date_field(val, "graceEndsAt"),
        locked_at: parse_date_field(val, "lockedAt"),
        completed_at: parse_date_field(val, "completedAt"),
        cycles_completed: val["cyclesCompleted"].as_i64().unwrap_or(0) as i32,
        next_contribution_date: parse_date_field(val, "nextContributionDate"),
        next_payout_date: parse_date_field(val, "nextPayoutDate"),
    })
}

fn parse_membership(pod_id: Id<Pod>, val: &Value) -> AjoResult<Membership> {
    let goal_str = val["goalType"].as_str().unwrap_or("Savings");
    let goal_type = GoalType::from_db_str(goal_str)
        .ok_or_else(|| AjoError::Other(format!("Unknown goal type in export: {}", goal_str)))?;

    let account_id = match val["accountId"].as_str() {
        Some(s) if !s.is_empty() => Some(parse_id(s)?),
        _ => None,
    };

    let joined_at = parse_date_field(val, "joinedAt")
        .ok_or_else(|| AjoError::Other("Membership missing joinedAt".into()))?;

    Ok(Membership {
        id: parse_id(val["id"].as_str().unwrap_or(""))?,
        pod_id,
        account_id,
        public_id: val["publicId"].as_str().unwrap_or("").to_string(),
        join_order: val["joinOrder"].as_i64().unwrap_or(0) as i32,
        final_order: val["finalOrder"].as_i64().map(|n| n as i32),
        payout_date: parse_date_field(val, "payoutDate"),
        payout_amount: val["payoutAmount"].as_i64(),
        joined_at,
        paid_out: val["paidOut"].as_bool().unwrap_or(false),
        total_contributed: val["totalContributed"].as_i64().unwrap_or(0),
        goal_type,
        goal_note: val["goalNote"].as_str().map(|s| s.to_string()),
    })
}

fn parse_date_field(val: &Value, key: &str) -> Option<chrono::NaiveDate> {
    val[key]
        .as_str()
        .and_then(|s| chrono::NaiveDate::parse_from_str(&s[..s.len().min(10)], "%Y-%m-%d").ok())
}

fn parse_id<T>(s: &str) -> AjoResult<Id<T>> {
    Id::parse(s).map_err(|e| AjoError::Other(format!("Invalid UUID in export: {}", e)))
}
