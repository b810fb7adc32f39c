use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ids::Id;
use super::plan::Plan;

/// Where a pod is in its life. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PodStatus {
    Pending,
    Open,
    Grace,
    Active,
    Completed,
}

impl PodStatus {
    pub const ALL: &'static [PodStatus] = &[
        PodStatus::Pending,
        PodStatus::Open,
        PodStatus::Grace,
        PodStatus::Active,
        PodStatus::Completed,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            PodStatus::Pending => "Pending",
            PodStatus::Open => "Open",
            PodStatus::Grace => "Grace",
            PodStatus::Active => "Active",
            PodStatus::Completed => "Completed",
        }
    }

    /// Parse from database string representation.
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(PodStatus::Pending),
            "Open" => Some(PodStatus::Open),
            "Grace" => Some(PodStatus::Grace),
            "Active" => Some(PodStatus::Active),
            "Completed" => Some(PodStatus::Completed),
            _ => None,
        }
    }

    /// Convert to database string representation.
    pub fn to_db_str(&self) -> &'static str {
        match self {
            PodStatus::Pending => "Pending",
            PodStatus::Open => "Open",
            PodStatus::Grace => "Grace",
            PodStatus::Active => "Active",
            PodStatus::Completed => "Completed",
        }
    }
}

/// Whether the pod came from the plan catalog or was created by a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PodType {
    System,
    Custom,
}

impl PodType {
    pub fn display_name(&self) -> &'static str {
        match self {
            PodType::System => "System",
            PodType::Custom => "Custom",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "System" => Some(PodType::System),
            "Custom" => Some(PodType::Custom),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            PodType::System => "System",
            PodType::Custom => "Custom",
        }
    }
}

/// Payout cadence for custom pods. System pods follow the canonical
/// 15th/30th-of-month slots instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cadence {
    BiWeekly,
    Monthly,
}

impl Cadence {
    pub const ALL: &'static [Cadence] = &[Cadence::BiWeekly, Cadence::Monthly];

    pub fn display_name(&self) -> &'static str {
        match self {
            Cadence::BiWeekly => "Bi-weekly",
            Cadence::Monthly => "Monthly",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "BiWeekly" => Some(Cadence::BiWeekly),
            "Monthly" => Some(Cadence::Monthly),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            Cadence::BiWeekly => "BiWeekly",
            Cadence::Monthly => "Monthly",
        }
    }
}

/// One rotating-savings pod: a fixed contribution amount, a member capacity
/// and a payout rotation over its lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pod {
    pub id: Id<Pod>,
    pub plan_code: Option<String>,
    pub name: Option<String>,
    pub amount: i64,
    pub lifecycle_weeks: i32,
    pub max_members: i32,
    pub status: PodStatus,
    pub pod_type: PodType,
    pub cadence: Option<Cadence>,
    pub randomize_payout_order: bool,
    pub expected_member_count: Option<i32>,
    pub invite_code: Option<String>,
    pub scheduled_start_date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub grace_ends_at: Option<NaiveDate>,
    pub locked_at: Option<NaiveDate>,
    pub completed_at: Option<NaiveDate>,
    pub cycles_completed: i32,
    pub next_contribution_date: Option<NaiveDate>,
    pub next_payout_date: Option<NaiveDate>,
}

impl Pod {
    /// Creates a system pod from a catalog plan. Opens immediately.
    pub fn from_plan(plan: &Plan) -> Self {
        Self {
            id: Id::generate(),
            plan_code: Some(plan.code.clone()),
            name: None,
            amount: plan.amount,
            lifecycle_weeks: plan.lifecycle_weeks,
            max_members: plan.max_members,
            status: PodStatus::Open,
            pod_type: PodType::System,
            cadence: None,
            randomize_payout_order: true,
            expected_member_count: None,
            invite_code: None,
            scheduled_start_date: None,
            start_date: None,
            grace_ends_at: None,
            locked_at: None,
            completed_at: None,
            cycles_completed: 0,
            next_contribution_date: None,
            next_payout_date: None,
        }
    }

    /// Creates a custom, invite-only pod. Stays pending until someone
    /// besides the creator joins.
    pub fn create_custom(
        name: String,
        amount: i64,
        lifecycle_weeks: i32,
        max_members: i32,
        cadence: Cadence,
        expected_member_count: Option<i32>,
        randomize_payout_order: bool,
    ) -> Self {
        Self {
            id: Id::generate(),
            plan_code: None,
            name: Some(name),
            amount,
            lifecycle_weeks,
            max_members,
            status: PodStatus::Pending,
            pod_type: PodType::Custom,
            cadence: Some(cadence),
            randomize_payout_order,
            expected_member_count,
            invite_code: Some(generate_invite_code()),
            scheduled_start_date: None,
            start_date: None,
            grace_ends_at: None,
            locked_at: None,
            completed_at: None,
            cycles_completed: 0,
            next_contribution_date: None,
            next_payout_date: None,
        }
    }

    /// Member count at which the start date gets fixed. System pods wait for
    /// full capacity; custom pods start at the creator's expected size, with
    /// grace-period backfills still possible up to `max_members`.
    pub fn start_threshold(&self) -> i32 {
        match self.pod_type {
            PodType::System => self.max_members,
            PodType::Custom => self
                .expected_member_count
                .unwrap_or(self.max_members)
                .min(self.max_members),
        }
    }

    /// Whether new memberships are still accepted (capacity permitting).
    pub fn accepts_members(&self) -> bool {
        matches!(
            self.status,
            PodStatus::Pending | PodStatus::Open | PodStatus::Grace
        )
    }

    pub fn is_locked(&self) -> bool {
        self.locked_at.is_some()
    }

    /// Name shown in listings: explicit name, plan code, or short id.
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        if let Some(code) = &self.plan_code {
            return format!("{} pod", code);
        }
        format!("pod {}", self.id.short())
    }
}

fn generate_invite_code() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_uppercase()
}
