use serde::{Deserialize, Serialize};

use super::ids::Id;

/// An account holding memberships in savings pods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Id<Account>,
    pub name: String,
    pub email: String,
}

impl Account {
    pub fn create(name: String, email: String) -> Self {
        Self {
            id: Id::generate(),
            name,
            email,
        }
    }
}
