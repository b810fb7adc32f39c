use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::Account;
use super::ids::Id;
use super::pod::Pod;

/// What the member is saving toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalType {
    Savings,
    Rent,
    Tuition,
    Business,
    Travel,
    Other,
}

impl GoalType {
    pub const ALL: &'static [GoalType] = &[
        GoalType::Savings,
        GoalType::Rent,
        GoalType::Tuition,
        GoalType::Business,
        GoalType::Travel,
        GoalType::Other,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            GoalType::Savings => "Savings",
            GoalType::Rent => "Rent",
            GoalType::Tuition => "Tuition",
            GoalType::Business => "Business",
            GoalType::Travel => "Travel",
            GoalType::Other => "Other",
        }
    }

    /// Parse from database string representation.
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "Savings" => Some(GoalType::Savings),
            "Rent" => Some(GoalType::Rent),
            "Tuition" => Some(GoalType::Tuition),
            "Business" => Some(GoalType::Business),
            "Travel" => Some(GoalType::Travel),
            "Other" => Some(GoalType::Other),
            _ => None,
        }
    }

    /// Convert to database string representation.
    pub fn to_db_str(&self) -> &'static str {
        self.display_name()
    }

    /// "Other" carries no meaning on its own; a note must spell it out.
    pub fn requires_note(&self) -> bool {
        matches!(self, GoalType::Other)
    }
}

/// One account's participation slot in one pod. A null account marks a
/// placeholder slot backfilled by the back office.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    pub id: Id<Membership>,
    pub pod_id: Id<Pod>,
    pub account_id: Option<Id<Account>>,
    pub public_id: String,
    pub join_order: i32,
    pub final_order: Option<i32>,
    pub payout_date: Option<NaiveDate>,
    pub payout_amount: Option<i64>,
    pub joined_at: NaiveDate,
    pub paid_out: bool,
    pub total_contributed: i64,
    pub goal_type: GoalType,
    pub goal_note: Option<String>,
}

impl Membership {
    pub fn create(
        pod_id: Id<Pod>,
        account_id: Option<Id<Account>>,
        join_order: i32,
        joined_at: NaiveDate,
        goal_type: GoalType,
        goal_note: Option<String>,
    ) -> Self {
        Self {
            id: Id::generate(),
            pod_id,
            account_id,
            public_id: Uuid::new_v4().simple().to_string(),
            join_order,
            final_order: None,
            payout_date: None,
            payout_amount: None,
            joined_at,
            paid_out: false,
            total_contributed: 0,
            goal_type,
            goal_note,
        }
    }

    /// A backfilled slot with no account behind it.
    pub fn placeholder(pod_id: Id<Pod>, join_order: i32, joined_at: NaiveDate) -> Self {
        Self::create(pod_id, None, join_order, joined_at, GoalType::Savings, None)
    }

    pub fn is_placeholder(&self) -> bool {
        self.account_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_leaves_order_unfinalized() {
        let pod_id = Id::generate();
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let m = Membership::create(pod_id, None, 1, date, GoalType::Savings, None);
        assert_eq!(m.join_order, 1);
        assert!(m.final_order.is_none());
        assert!(m.payout_date.is_none());
        assert!(!m.paid_out);
    }

    #[test]
    fn placeholder_has_no_account() {
        let pod_id = Id::generate();
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let m = Membership::placeholder(pod_id, 3, date);
        assert!(m.is_placeholder());
    }

    #[test]
    fn only_other_requires_note() {
        for goal in GoalType::ALL {
            assert_eq!(goal.requires_note(), *goal == GoalType::Other);
        }
    }

    #[test]
    fn goal_db_str_roundtrips() {
        for goal in GoalType::ALL {
            assert_eq!(GoalType::from_db_str(goal.to_db_str()), Some(*goal));
        }
    }
}
