use serde::{Deserialize, Serialize};

/// A reusable pod template: fixed contribution amount, duration and capacity.
/// Seeded once at schema initialization and rarely mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub code: String,
    pub amount: i64,
    pub lifecycle_weeks: i32,
    pub max_members: i32,
    pub active: bool,
}

impl Plan {
    pub fn new(code: &str, amount: i64, lifecycle_weeks: i32, max_members: i32) -> Self {
        Self {
            code: code.to_string(),
            amount,
            lifecycle_weeks,
            max_members,
            active: true,
        }
    }

    /// The plans offered out of the box. Capacity equals the cycle count so
    /// every member collects exactly one payout over the pod's life.
    pub fn defaults() -> Vec<Plan> {
        vec![
            Plan::new("starter", 5_000, 12, 6),
            Plan::new("standard", 10_000, 12, 6),
            Plan::new("plus", 20_000, 20, 10),
            Plan::new("premium", 50_000, 24, 12),
        ]
    }
}
