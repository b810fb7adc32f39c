use serde::{Deserialize, Serialize};

use super::account::Account;
use super::ids::Id;

/// An in-app notification record, written as lifecycle events fire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Id<Notification>,
    pub account_id: Id<Account>,
    pub title: String,
    pub body: String,
    pub read: bool,
}

impl Notification {
    pub fn create(account_id: Id<Account>, title: String, body: String) -> Self {
        Self {
            id: Id::generate(),
            account_id,
            title,
            body,
            read: false,
        }
    }
}
