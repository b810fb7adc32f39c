use rusqlite::Connection;

use crate::db::account_repo;
use crate::error::{AjoError, AjoResult};
use crate::model::Account;
use crate::validation;

pub fn register(conn: &Connection, name: &str, email: &str) -> AjoResult<Account> {
    let valid_name = validation::non_blank(name, "name")?;
    let email = email.trim().to_string();

    if !email.is_empty() && account_repo::find_by_email(conn, &email)?.is_some() {
        return Err(AjoError::AlreadyExists {
            entity_type: "Account".into(),
            identifier: email,
        });
    }

    let account = Account::create(valid_name, email);
    account_repo::insert(conn, &account)?;
    Ok(account)
}
