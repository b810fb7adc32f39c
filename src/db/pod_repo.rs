use rusqlite::{params, Connection, Row};

use crate::db::{parse_id, parse_opt_date};
use crate::error::{AjoError, AjoResult};
use crate::model::{Account, Cadence, Id, Pod, PodStatus, PodType};

const POD_COLUMNS: &str = "id, plan_code, name, amount, lifecycle_weeks, max_members, status, \
     pod_type, cadence, randomize_payout_order, expected_member_count, invite_code, \
     scheduled_start_date, start_date, grace_ends_at, locked_at, completed_at, \
     cycles_completed, next_contribution_date, next_payout_date";

/// Raw row as stored; ids, dates and enums still string-encoded.
struct PodRow {
    id: String,
    plan_code: Option<String>,
    name: Option<String>,
    amount: i64,
    lifecycle_weeks: i32,
    max_members: i32,
    status: String,
    pod_type: String,
    cadence: Option<String>,
    randomize_payout_order: i32,
    expected_member_count: Option<i32>,
    invite_code: Option<String>,
    scheduled_start_date: Option<String>,
    start_date: Option<String>,
    grace_ends_at: Option<String>,
    locked_at: Option<String>,
    completed_at: Option<String>,
    cycles_completed: i32,
    next_contribution_date: Option<String>,
    next_payout_date: Option<String>,
}

fn read_row(row: &Row) -> rusqlite::Result<PodRow> {
    Ok(PodRow {
        id: row.get(0)?,
        plan_code: row.get(1)?,
        name: row.get(2)?,
        amount: row.get(3)?,
        lifecycle_weeks: row.get(4)?,
        max_members: row.get(5)?,
        status: row.get(6)?,
        pod_type: row.get(7)?,
        cadence: row.get(8)?,
        randomize_payout_order: row.get(9)?,
        expected_member_count: row.get(10)?,
        invite_code: row.get(11)?,
        scheduled_start_date: row.get(12)?,
        start_date: row.get(13)?,
        grace_ends_at: row.get(14)?,
        locked_at: row.get(15)?,
        completed_at: row.get(16)?,
        cycles_completed: row.get(17)?,
        next_contribution_date: row.get(18)?,
        next_payout_date: row.get(19)?,
    })
}

fn to_pod(raw: PodRow) -> AjoResult<Pod> {
    let status = PodStatus::from_db_str(&raw.status)
        .ok_or_else(|| AjoError::Other(format!("Unknown pod status: {}", raw.status)))?;
    let pod_type = PodType::from_db_str(&raw.pod_type)
        .ok_or_else(|| AjoError::Other(format!("Unknown pod type: {}", raw.pod_type)))?;
    let cadence = match raw.cadence {
        Some(c) => Some(
            Cadence::from_db_str(&c)
                .ok_or_else(|| AjoError::Other(format!("Unknown cadence: {}", c)))?,
        ),
        None => None,
    };

    Ok(Pod {
        id: parse_id(&raw.id)?,
        plan_code: raw.plan_code,
        name: raw.name,
        amount: raw.amount,
        lifecycle_weeks: raw.lifecycle_weeks,
        max_members: raw.max_members,
        status,
        pod_type,
        cadence,
        randomize_payout_order: raw.randomize_payout_order != 0,
        expected_member_count: raw.expected_member_count,
        invite_code: raw.invite_code,
        scheduled_start_date: parse_opt_date(raw.scheduled_start_date)?,
        start_date: parse_opt_date(raw.start_date)?,
        grace_ends_at: parse_opt_date(raw.grace_ends_at)?,
        locked_at: parse_opt_date(raw.locked_at)?,
        completed_at: parse_opt_date(raw.completed_at)?,
        cycles_completed: raw.cycles_completed,
        next_contribution_date: parse_opt_date(raw.next_contribution_date)?,
        next_payout_date: parse_opt_date(raw.next_payout_date)?,
    })
}

pub fn insert(conn: &Connection, pod: &Pod) -> AjoResult<()> {
    conn.execute(
        "INSERT INTO pods (id, plan_code, name, amount, lifecycle_weeks, max_members, status,
             pod_type, cadence, randomize_payout_order, expected_member_count, invite_code,
             scheduled_start_date, start_date, grace_ends_at, locked_at, completed_at,
             cycles_completed, next_contribution_date, next_payout_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)",
        params![
            pod.id.value.to_string(),
            pod.plan_code,
            pod.name,
            pod.amount,
            pod.lifecycle_weeks,
            pod.max_members,
            pod.status.to_db_str(),
            pod.pod_type.to_db_str(),
            pod.cadence.map(|c| c.to_db_str()),
            pod.randomize_payout_order as i32,
            pod.expected_member_count,
            pod.invite_code,
            pod.scheduled_start_date.map(|d| d.to_string()),
            pod.start_date.map(|d| d.to_string()),
            pod.grace_ends_at.map(|d| d.to_string()),
            pod.locked_at.map(|d| d.to_string()),
            pod.completed_at.map(|d| d.to_string()),
            pod.cycles_completed,
            pod.next_contribution_date.map(|d| d.to_string()),
            pod.next_payout_date.map(|d| d.to_string()),
        ],
    )?;
    Ok(())
}

pub fn update(conn: &Connection, pod: &Pod) -> AjoResult<()> {
    conn.execute(
        "UPDATE pods SET status = ?1, scheduled_start_date = ?2, start_date = ?3,
             grace_ends_at = ?4, locked_at = ?5, completed_at = ?6, cycles_completed = ?7,
             next_contribution_date = ?8, next_payout_date = ?9, name = ?10,
             expected_member_count = ?11
         WHERE id = ?12",
        params![
            pod.status.to_db_str(),
            pod.scheduled_start_date.map(|d| d.to_string()),
            pod.start_date.map(|d| d.to_string()),
            pod.grace_ends_at.map(|d| d.to_string()),
            pod.locked_at.map(|d| d.to_string()),
            pod.completed_at.map(|d| d.to_string()),
            pod.cycles_completed,
            pod.next_contribution_date.map(|d| d.to_string()),
            pod.next_payout_date.map(|d| d.to_string()),
            pod.name,
            pod.expected_member_count,
            pod.id.value.to_string(),
        ],
    )?;
    Ok(())
}

pub fn delete(conn: &Connection, pod_id: Id<Pod>) -> AjoResult<()> {
    conn.execute(
        "DELETE FROM memberships WHERE pod_id = ?1",
        params![pod_id.value.to_string()],
    )?;
    conn.execute(
        "DELETE FROM pods WHERE id = ?1",
        params![pod_id.value.to_string()],
    )?;
    Ok(())
}

pub fn find_by_id(conn: &Connection, id: Id<Pod>) -> AjoResult<Option<Pod>> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM pods WHERE id = ?1", POD_COLUMNS))?;

    match stmt.query_row(params![id.value.to_string()], read_row) {
        Ok(raw) => Ok(Some(to_pod(raw)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn find_by_invite_code(conn: &Connection, code: &str) -> AjoResult<Option<Pod>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM pods WHERE invite_code = ?1",
        POD_COLUMNS
    ))?;

    match stmt.query_row(params![code], read_row) {
        Ok(raw) => Ok(Some(to_pod(raw)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn find_all(conn: &Connection) -> AjoResult<Vec<Pod>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM pods ORDER BY created_at",
        POD_COLUMNS
    ))?;

    let raws = stmt
        .query_map([], read_row)?
        .collect::<Result<Vec<_>, _>>()?;

    raws.into_iter().map(to_pod).collect()
}

/// Every pod the periodic sweep still has to look at.
pub fn find_non_terminal(conn: &Connection) -> AjoResult<Vec<Pod>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM pods WHERE status != 'Completed' ORDER BY created_at",
        POD_COLUMNS
    ))?;

    let raws = stmt
        .query_map([], read_row)?
        .collect::<Result<Vec<_>, _>>()?;

    raws.into_iter().map(to_pod).collect()
}

/// System pods for a plan that are still accepting members.
pub fn find_joinable_system_pods(conn: &Connection, plan_code: &str) -> AjoResult<Vec<Pod>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM pods
         WHERE plan_code = ?1 AND pod_type = 'System'
           AND status IN ('Pending', 'Open', 'Grace')
         ORDER BY created_at",
        POD_COLUMNS
    ))?;

    let raws = stmt
        .query_map(params![plan_code], read_row)?
        .collect::<Result<Vec<_>, _>>()?;

    raws.into_iter().map(to_pod).collect()
}

pub fn find_for_account(conn: &Connection, account_id: Id<Account>) -> AjoResult<Vec<Pod>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM pods
         WHERE id IN (SELECT pod_id FROM memberships WHERE account_id = ?1)
         ORDER BY created_at",
        POD_COLUMNS
    ))?;

    let raws = stmt
        .query_map(params![account_id.value.to_string()], read_row)?
        .collect::<Result<Vec<_>, _>>()?;

    raws.into_iter().map(to_pod).collect()
}
