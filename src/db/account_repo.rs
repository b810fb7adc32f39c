use rusqlite::{params, Connection};

use crate::db::parse_id;
use crate::error::AjoResult;
use crate::model::{Account, Id};

pub fn insert(conn: &Connection, account: &Account) -> AjoResult<()> {
    conn.execute(
        "INSERT INTO accounts (id, name, email) VALUES (?1, ?2, ?3)",
        params![
            account.id.value.to_string(),
            account.name,
            account.email,
        ],
    )?;
    Ok(())
}

pub fn update(conn: &Connection, account: &Account) -> AjoResult<()> {
    conn.execute(
        "UPDATE accounts SET name = ?1, email = ?2 WHERE id = ?3",
        params![account.name, account.email, account.id.value.to_string()],
    )?;
    Ok(())
}

pub fn find_by_id(conn: &Connection, id: Id<Account>) -> AjoResult<Option<Account>> {
    let mut stmt = conn.prepare("SELECT id, name, email FROM accounts WHERE id = ?1")?;

    let result = stmt.query_row(params![id.value.to_string()], |row| {
        let id_str: String = row.get(0)?;
        let name: String = row.get(1)?;
        let email: String = row.get(2)?;
        Ok((id_str, name, email))
    });

    match result {
        Ok((id_str, name, email)) => Ok(Some(Account {
            id: parse_id(&id_str)?,
            name,
            email,
        })),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn find_by_email(conn: &Connection, email: &str) -> AjoResult<Option<Account>> {
    Ok(find_all(conn)?
        .into_iter()
        .find(|a| a.email.eq_ignore_ascii_case(email)))
}

/// The first account by insertion order; the CLI treats it as the signed-in user.
pub fn find_first(conn: &Connection) -> AjoResult<Option<Account>> {
    let mut stmt = conn.prepare("SELECT id, name, email FROM accounts LIMIT 1")?;

    let result = stmt.query_row([], |row| {
        let id_str: String = row.get(0)?;
        let name: String = row.get(1)?;
        let email: String = row.get(2)?;
        Ok((id_str, name, email))
    });

    match result {
        Ok((id_str, name, email)) => Ok(Some(Account {
            id: parse_id(&id_str)?,
            name,
            email,
        })),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn find_all(conn: &Connection) -> AjoResult<Vec<Account>> {
    let mut stmt = conn.prepare("SELECT id, name, email FROM accounts ORDER BY name")?;

    let rows: Vec<(String, String, String)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut accounts = Vec::new();
    for (id_str, name, email) in rows {
        accounts.push(Account {
            id: parse_id(&id_str)?,
            name,
            email,
        });
    }

    Ok(accounts)
}
