use rusqlite::{params, Connection};

use crate::db::parse_id;
use crate::error::AjoResult;
use crate::model::{Account, Id, Notification};

pub fn insert(conn: &Connection, notification: &Notification) -> AjoResult<()> {
    conn.execute(
        "INSERT INTO notifications (id, account_id, title, body, read)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            notification.id.value.to_string(),
            notification.account_id.value.to_string(),
            notification.title,
            notification.body,
            notification.read as i32,
        ],
    )?;
    Ok(())
}

/// Most recent first.
pub fn find_by_account(conn: &Connection, account_id: Id<Account>) -> AjoResult<Vec<Notification>> {
    let mut stmt = conn.prepare(
        "SELECT id, account_id, title, body, read FROM notifications
         WHERE account_id = ?1 ORDER BY created_at DESC, rowid DESC",
    )?;

    let rows: Vec<(String, String, String, String, i32)> = stmt
        .query_map(params![account_id.value.to_string()], |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut notifications = Vec::new();
    for (id_str, account_str, title, body, read) in rows {
        notifications.push(Notification {
            id: parse_id(&id_str)?,
            account_id: parse_id(&account_str)?,
            title,
            body,
            read: read != 0,
        });
    }

    Ok(notifications)
}

pub fn unread_count(conn: &Connection, account_id: Id<Account>) -> AjoResult<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM notifications WHERE account_id = ?1 AND read = 0",
        params![account_id.value.to_string()],
        |row| row.get(0),
    )?;
    Ok(count)
}

pub fn mark_all_read(conn: &Connection, account_id: Id<Account>) -> AjoResult<usize> {
    let changed = conn.execute(
        "UPDATE notifications SET read = 1 WHERE account_id = ?1 AND read = 0",
        params![account_id.value.to_string()],
    )?;
    Ok(changed)
}
