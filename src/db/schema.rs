use rusqlite::Connection;

use crate::error::AjoResult;

/// Initialize the database schema. Creates all tables if they don't exist.
pub fn initialize(conn: &Connection) -> AjoResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS accounts (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            email TEXT NOT NULL DEFAULT ''
        );

        CREATE TABLE IF NOT EXISTS plans (
            code TEXT PRIMARY KEY NOT NULL,
            amount INTEGER NOT NULL,
            lifecycle_weeks INTEGER NOT NULL,
            max_members INTEGER NOT NULL,
            active INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS pods (
            id TEXT PRIMARY KEY NOT NULL,
            plan_code TEXT REFERENCES plans(code),
            name TEXT,
            amount INTEGER NOT NULL,
            lifecycle_weeks INTEGER NOT NULL,
            max_members INTEGER NOT NULL,
            status TEXT NOT NULL,
            pod_type TEXT NOT NULL,
            cadence TEXT,
            randomize_payout_order INTEGER NOT NULL DEFAULT 0,
            expected_member_count INTEGER,
            invite_code TEXT UNIQUE,
            scheduled_start_date TEXT,
            start_date TEXT,
            grace_ends_at TEXT,
            locked_at TEXT,
            completed_at TEXT,
            cycles_completed INTEGER NOT NULL DEFAULT 0,
            next_contribution_date TEXT,
            next_payout_date TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS memberships (
            id TEXT PRIMARY KEY NOT NULL,
            pod_id TEXT NOT NULL REFERENCES pods(id) ON DELETE CASCADE,
            account_id TEXT REFERENCES accounts(id) ON DELETE SET NULL,
            public_id TEXT NOT NULL UNIQUE,
            join_order INTEGER NOT NULL,
            final_order INTEGER,
            payout_date TEXT,
            payout_amount INTEGER,
            joined_at TEXT NOT NULL,
            paid_out INTEGER NOT NULL DEFAULT 0,
            total_contributed INTEGER NOT NULL DEFAULT 0,
            goal_type TEXT NOT NULL,
            goal_note TEXT,
            UNIQUE(pod_id, join_order)
        );

        CREATE TABLE IF NOT EXISTS notifications (
            id TEXT PRIMARY KEY NOT NULL,
            account_id TEXT NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            body TEXT NOT NULL,
            read INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        PRAGMA foreign_keys = ON;
        ",
    )?;
    Ok(())
}

/// Create an in-memory connection for testing. Available in test builds.
pub fn test_connection() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    initialize(&conn).unwrap();
    conn
}
