use rusqlite::{params, Connection, Row};

use crate::db::{parse_date, parse_id, parse_opt_date, parse_opt_id};
use crate::error::{AjoError, AjoResult};
use crate::model::{Account, GoalType, Id, Membership, Pod};

const MEMBERSHIP_COLUMNS: &str = "id, pod_id, account_id, public_id, join_order, final_order, \
     payout_date, payout_amount, joined_at, paid_out, total_contributed, goal_type, goal_note";

struct MembershipRow {
    id: String,
    pod_id: String,
    account_id: Option<String>,
    public_id: String,
    join_order: i32,
    final_order: Option<i32>,
    payout_date: Option<String>,
    payout_amount: Option<i64>,
    joined_at: String,
    paid_out: i32,
    total_contributed: i64,
    goal_type: String,
    goal_note: Option<String>,
}

fn read_row(row: &Row) -> rusqlite::Result<MembershipRow> {
    Ok(MembershipRow {
        id: row.get(0)?,
        pod_id: row.get(1)?,
        account_id: row.get(2)?,
        public_id: row.get(3)?,
        join_order: row.get(4)?,
        final_order: row.get(5)?,
        payout_date: row.get(6)?,
        payout_amount: row.get(7)?,
        joined_at: row.get(8)?,
        paid_out: row.get(9)?,
        total_contributed: row.get(10)?,
        goal_type: row.get(11)?,
        goal_note: row.get(12)?,
    })
}

fn to_membership(raw: MembershipRow) -> AjoResult<Membership> {
    let goal_type = GoalType::from_db_str(&raw.goal_type)
        .ok_or_else(|| AjoError::Other(format!("Unknown goal type: {}", raw.goal_type)))?;

    Ok(Membership {
        id: parse_id(&raw.id)?,
        pod_id: parse_id(&raw.pod_id)?,
        account_id: parse_opt_id(raw.account_id)?,
        public_id: raw.public_id,
        join_order: raw.join_order,
        final_order: raw.final_order,
        payout_date: parse_opt_date(raw.payout_date)?,
        payout_amount: raw.payout_amount,
        joined_at: parse_date(&raw.joined_at)?,
        paid_out: raw.paid_out != 0,
        total_contributed: raw.total_contributed,
        goal_type,
        goal_note: raw.goal_note,
    })
}

pub fn insert(conn: &Connection, membership: &Membership) -> AjoResult<()> {
    conn.execute(
        "INSERT INTO memberships (id, pod_id, account_id, public_id, join_order, final_order,
             payout_date, payout_amount, joined_at, paid_out, total_contributed, goal_type, goal_note)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            membership.id.value.to_string(),
            membership.pod_id.value.to_string(),
            membership.account_id.map(|a| a.value.to_string()),
            membership.public_id,
            membership.join_order,
            membership.final_order,
            membership.payout_date.map(|d| d.to_string()),
            membership.payout_amount,
            membership.joined_at.to_string(),
            membership.paid_out as i32,
            membership.total_contributed,
            membership.goal_type.to_db_str(),
            membership.goal_note,
        ],
    )?;
    Ok(())
}

pub fn update(conn: &Connection, membership: &Membership) -> AjoResult<()> {
    conn.execute(
        "UPDATE memberships SET final_order = ?1, payout_date = ?2, payout_amount = ?3,
             paid_out = ?4, total_contributed = ?5, goal_type = ?6, goal_note = ?7
         WHERE id = ?8",
        params![
            membership.final_order,
            membership.payout_date.map(|d| d.to_string()),
            membership.payout_amount,
            membership.paid_out as i32,
            membership.total_contributed,
            membership.goal_type.to_db_str(),
            membership.goal_note,
            membership.id.value.to_string(),
        ],
    )?;
    Ok(())
}

pub fn find_by_id(conn: &Connection, id: Id<Membership>) -> AjoResult<Option<Membership>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM memberships WHERE id = ?1",
        MEMBERSHIP_COLUMNS
    ))?;

    match stmt.query_row(params![id.value.to_string()], read_row) {
        Ok(raw) => Ok(Some(to_membership(raw)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// All memberships of a pod in join order.
pub fn find_by_pod(conn: &Connection, pod_id: Id<Pod>) -> AjoResult<Vec<Membership>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM memberships WHERE pod_id = ?1 ORDER BY join_order",
        MEMBERSHIP_COLUMNS
    ))?;

    let raws = stmt
        .query_map(params![pod_id.value.to_string()], read_row)?
        .collect::<Result<Vec<_>, _>>()?;

    raws.into_iter().map(to_membership).collect()
}

pub fn find_by_pod_and_account(
    conn: &Connection,
    pod_id: Id<Pod>,
    account_id: Id<Account>,
) -> AjoResult<Option<Membership>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM memberships WHERE pod_id = ?1 AND account_id = ?2",
        MEMBERSHIP_COLUMNS
    ))?;

    match stmt.query_row(
        params![pod_id.value.to_string(), account_id.value.to_string()],
        read_row,
    ) {
        Ok(raw) => Ok(Some(to_membership(raw)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn find_by_account(conn: &Connection, account_id: Id<Account>) -> AjoResult<Vec<Membership>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM memberships WHERE account_id = ?1 ORDER BY joined_at",
        MEMBERSHIP_COLUMNS
    ))?;

    let raws = stmt
        .query_map(params![account_id.value.to_string()], read_row)?
        .collect::<Result<Vec<_>, _>>()?;

    raws.into_iter().map(to_membership).collect()
}

pub fn count_by_pod(conn: &Connection, pod_id: Id<Pod>) -> AjoResult<i32> {
    let count: i32 = conn.query_row(
        "SELECT COUNT(*) FROM memberships WHERE pod_id = ?1",
        params![pod_id.value.to_string()],
        |row| row.get(0),
    )?;
    Ok(count)
}
