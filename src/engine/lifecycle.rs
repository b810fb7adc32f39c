use chrono::{Duration, NaiveDate};
use rand::Rng;

use crate::error::{AjoError, AjoResult};
use crate::model::{Membership, Pod, PodStatus};

use super::{ordering, payout, schedule};

/// Days, inclusive of the scheduled start day, during which late joins and
/// backfills are still accepted. A pod scheduled for the 1st is in grace on
/// the 1st and 2nd and locks on the 3rd.
pub const GRACE_PERIOD_DAYS: i64 = 2;

/// What changed during one lifecycle evaluation of a pod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    StartScheduled(NaiveDate),
    EnteredGrace,
    Locked,
    CyclesAdvanced { completed: i32 },
    Completed,
}

/// Re-evaluates one pod against `today`, applying every transition that has
/// become due. Transitions only move forward. Evaluating a pod already in
/// its settled state produces no events, so the periodic sweep can re-run
/// with at-least-once semantics.
pub fn evaluate<R: Rng>(
    pod: &mut Pod,
    memberships: &mut [Membership],
    today: NaiveDate,
    rng: &mut R,
) -> AjoResult<Vec<LifecycleEvent>> {
    let mut events = Vec::new();

    if pod.status == PodStatus::Completed {
        return Ok(events);
    }

    // pending/open: fix the start date once the start threshold is reached
    if matches!(pod.status, PodStatus::Pending | PodStatus::Open)
        && pod.scheduled_start_date.is_none()
        && memberships.len() as i32 >= pod.start_threshold()
    {
        let start = schedule::next_canonical_start(today);
        pod.scheduled_start_date = Some(start);
        events.push(LifecycleEvent::StartScheduled(start));
    }

    // open -> grace, once the scheduled start day arrives
    if matches!(pod.status, PodStatus::Pending | PodStatus::Open) {
        if let Some(scheduled) = pod.scheduled_start_date {
            if today >= scheduled {
                pod.status = PodStatus::Grace;
                pod.grace_ends_at = Some(scheduled + Duration::days(GRACE_PERIOD_DAYS - 1));
                events.push(LifecycleEvent::EnteredGrace);
            }
        }
    }

    // grace -> active: the grace window elapsed, lock the payout order
    if pod.status == PodStatus::Grace {
        if let Some(grace_end) = pod.grace_ends_at {
            if today > grace_end {
                lock(pod, memberships, today, rng)?;
                events.push(LifecycleEvent::Locked);
            }
        }
    }

    // active: advance the cycle counter, then complete when the last cycle
    // has elapsed
    if pod.status == PodStatus::Active {
        let total = payout::cycle_count(pod.lifecycle_weeks);
        let elapsed = memberships
            .iter()
            .filter(|m| m.payout_date.is_some_and(|d| d <= today))
            .count() as i32;
        let completed_cycles = elapsed.min(total);
        if completed_cycles != pod.cycles_completed {
            pod.cycles_completed = completed_cycles;
            events.push(LifecycleEvent::CyclesAdvanced {
                completed: completed_cycles,
            });
        }

        refresh_next_dates(pod, memberships, today);

        if pod.cycles_completed >= total {
            pod.status = PodStatus::Completed;
            pod.completed_at = Some(today);
            pod.next_contribution_date = None;
            pod.next_payout_date = None;
            events.push(LifecycleEvent::Completed);
        }
    }

    Ok(events)
}

/// Guard for explicit mutations: a completed pod accepts none.
pub fn ensure_mutable(pod: &Pod) -> AjoResult<()> {
    if pod.status == PodStatus::Completed {
        return Err(AjoError::PodCompleted);
    }
    Ok(())
}

/// The grace -> active transition: payout order becomes permanent,
/// contributions begin.
fn lock<R: Rng>(
    pod: &mut Pod,
    memberships: &mut [Membership],
    today: NaiveDate,
    rng: &mut R,
) -> AjoResult<()> {
    if pod.locked_at.is_some() {
        return Err(AjoError::OrderAlreadyFinalized);
    }

    ordering::finalize_payout_order(memberships, pod.randomize_payout_order, rng)?;

    let slots = schedule::payout_slots(pod.pod_type, pod.cadence, today, memberships.len());
    for membership in memberships.iter_mut() {
        if let Some(order) = membership.final_order {
            membership.payout_date = slots.get(order as usize - 1).copied();
        }
    }

    pod.status = PodStatus::Active;
    pod.start_date = Some(today);
    pod.locked_at = Some(today);
    refresh_next_dates(pod, memberships, today);

    Ok(())
}

/// Read-model date fields: the smallest future payout date among the pod's
/// memberships, or none when the rotation has run out. A cycle's
/// contribution falls due on the slot its payout is distributed.
fn refresh_next_dates(pod: &mut Pod, memberships: &[Membership], today: NaiveDate) {
    let next = memberships
        .iter()
        .filter_map(|m| m.payout_date)
        .filter(|d| *d > today)
        .min();
    pod.next_payout_date = next;
    pod.next_contribution_date = next;
}

/// Next payout date across a set of memberships, used by read models that
/// don't go through a full evaluation.
pub fn next_payout_date(memberships: &[Membership], today: NaiveDate) -> Option<NaiveDate> {
    memberships
        .iter()
        .filter_map(|m| m.payout_date)
        .filter(|d| *d > today)
        .min()
}
