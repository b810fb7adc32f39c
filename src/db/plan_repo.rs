use rusqlite::{params, Connection};

use crate::error::AjoResult;
use crate::model::Plan;

pub fn insert(conn: &Connection, plan: &Plan) -> AjoResult<()> {
    conn.execute(
        "INSERT INTO plans (code, amount, lifecycle_weeks, max_members, active)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            plan.code,
            plan.amount,
            plan.lifecycle_weeks,
            plan.max_members,
            plan.active as i32,
        ],
    )?;
    Ok(())
}

/// Seed the default catalog. Safe to call repeatedly.
pub fn seed_defaults(conn: &Connection) -> AjoResult<()> {
    for plan in Plan::defaults() {
        conn.execute(
            "INSERT OR IGNORE INTO plans (code, amount, lifecycle_weeks, max_members, active)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                plan.code,
                plan.amount,
                plan.lifecycle_weeks,
                plan.max_members,
                plan.active as i32,
            ],
        )?;
    }
    Ok(())
}

pub fn find_by_code(conn: &Connection, code: &str) -> AjoResult<Option<Plan>> {
    let mut stmt = conn.prepare(
        "SELECT code, amount, lifecycle_weeks, max_members, active FROM plans WHERE code = ?1",
    )?;

    let result = stmt.query_row(params![code], |row| {
        Ok(Plan {
            code: row.get(0)?,
            amount: row.get(1)?,
            lifecycle_weeks: row.get(2)?,
            max_members: row.get(3)?,
            active: row.get::<_, i32>(4)? != 0,
        })
    });

    match result {
        Ok(plan) => Ok(Some(plan)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn find_active(conn: &Connection) -> AjoResult<Vec<Plan>> {
    let mut stmt = conn.prepare(
        "SELECT code, amount, lifecycle_weeks, max_members, active
         FROM plans WHERE active = 1 ORDER BY amount",
    )?;

    let plans = stmt
        .query_map([], |row| {
            Ok(Plan {
                code: row.get(0)?,
                amount: row.get(1)?,
                lifecycle_weeks: row.get(2)?,
                max_members: row.get(3)?,
                active: row.get::<_, i32>(4)? != 0,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(plans)
}

pub fn set_active(conn: &Connection, code: &str, active: bool) -> AjoResult<()> {
    conn.execute(
        "UPDATE plans SET active = ?1 WHERE code = ?2",
        params![active as i32, code],
    )?;
    Ok(())
}
