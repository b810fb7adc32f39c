use crate::model::{Membership, Pod, PodType};

/// Fee charged on most payout positions. Early recipients draw an
/// interest-free advance from later contributors.
pub const DEFAULT_DEDUCTION_RATE: f64 = 0.025;

/// Reduced fee for the second-to-last payout position.
pub const SECOND_TO_LAST_DEDUCTION_RATE: f64 = 0.015;

/// The last position waited the full lifecycle and pays no fee.
pub const LAST_DEDUCTION_RATE: f64 = 0.0;

/// Number of contribution/payout cycles a pod runs: one roughly every two
/// weeks, never fewer than one.
pub fn cycle_count(lifecycle_weeks: i32) -> i32 {
    ((lifecycle_weeks + 1) / 2).max(1)
}

/// Fee tier keyed by payout position relative to pod size. Unknown position
/// or size falls back to the default rate.
pub fn deduction_rate(position: Option<i32>, member_count: Option<i32>) -> f64 {
    match (position, member_count) {
        (Some(p), Some(n)) if p == n => LAST_DEDUCTION_RATE,
        (Some(p), Some(n)) if p == n - 1 => SECOND_TO_LAST_DEDUCTION_RATE,
        _ => DEFAULT_DEDUCTION_RATE,
    }
}

/// Gross payout: an explicit per-membership override wins, otherwise the
/// contribution amount accumulated over the full cycle count.
pub fn gross_payout(membership: &Membership, pod: &Pod) -> i64 {
    membership
        .payout_amount
        .unwrap_or(pod.amount * cycle_count(pod.lifecycle_weeks) as i64)
}

/// Half-up rounding to 2 decimal places for currency display.
pub fn round_currency(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct PayoutBreakdown {
    pub gross: i64,
    pub deduction_rate: f64,
    pub fee: f64,
    pub net: f64,
}

/// Full payout figures for one membership.
pub fn breakdown(membership: &Membership, pod: &Pod, member_count: Option<i32>) -> PayoutBreakdown {
    let gross = gross_payout(membership, pod);
    let rate = deduction_rate(membership.final_order, member_count);
    PayoutBreakdown {
        gross,
        deduction_rate: rate,
        fee: round_currency(gross as f64 * rate),
        net: round_currency(gross as f64 * (1.0 - rate)),
    }
}

/// Total a member is expected to contribute over the pod's life.
pub fn contribution_target(pod: &Pod) -> i64 {
    match pod.pod_type {
        PodType::System => pod.amount * cycle_count(pod.lifecycle_weeks) as i64,
        PodType::Custom => pod.amount * i64::from(pod.expected_member_count.unwrap_or(0)),
    }
}

/// Contribution progress in percent, clamped to [0, 100]. A zero or missing
/// target reads as no progress.
pub fn contribution_progress(contributed: i64, target: i64) -> f64 {
    if target <= 0 {
        return 0.0;
    }
    let pct = contributed as f64 / target as f64 * 100.0;
    round_currency(pct.clamp(0.0, 100.0))
}
