use chrono::NaiveDate;
use rand::Rng;
use rusqlite::Connection;

use crate::db::{membership_repo, notification_repo, pod_repo};
use crate::engine::lifecycle::{self, LifecycleEvent};
use crate::engine::payout;
use crate::error::AjoResult;
use crate::model::{Membership, Notification, Pod};

/// What one sweep pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    pub evaluated: usize,
    pub starts_scheduled: usize,
    pub entered_grace: usize,
    pub locked: usize,
    pub completed: usize,
}

impl SweepOutcome {
    pub fn is_quiet(&self) -> bool {
        self.starts_scheduled == 0
            && self.entered_grace == 0
            && self.locked == 0
            && self.completed == 0
    }
}

/// The periodic "evaluate pods" trigger. Re-runs are safe: a pod already in
/// its settled state produces no events and no writes.
pub fn run_sweep<R: Rng>(
    conn: &Connection,
    today: NaiveDate,
    rng: &mut R,
) -> AjoResult<SweepOutcome> {
    let mut outcome = SweepOutcome::default();

    for mut pod in pod_repo::find_non_terminal(conn)? {
        let mut members = membership_repo::find_by_pod(conn, pod.id)?;
        let events = lifecycle::evaluate(&mut pod, &mut members, today, rng)?;
        outcome.evaluated += 1;

        if events.is_empty() {
            continue;
        }

        pod_repo::update(conn, &pod)?;
        for membership in &members {
            membership_repo::update(conn, membership)?;
        }

        for event in &events {
            match event {
                LifecycleEvent::StartScheduled(_) => outcome.starts_scheduled += 1,
                LifecycleEvent::EnteredGrace => outcome.entered_grace += 1,
                LifecycleEvent::Locked => {
                    outcome.locked += 1;
                    notify_locked(conn, &pod, &members)?;
                }
                LifecycleEvent::CyclesAdvanced { .. } => {}
                LifecycleEvent::Completed => {
                    outcome.completed += 1;
                    notify_completed(conn, &pod, &members)?;
                }
            }
        }
    }

    Ok(outcome)
}

fn notify_locked(conn: &Connection, pod: &Pod, members: &[Membership]) -> AjoResult<()> {
    let count = members.len() as i32;
    for membership in members {
        let Some(account) = membership.account_id else {
            continue;
        };
        let breakdown = payout::breakdown(membership, pod, Some(count));
        let body = match (membership.final_order, membership.payout_date) {
            (Some(order), Some(date)) => format!(
                "{} is locked in. You collect {} of {} on {} ({:.2} after fees).",
                pod.display_name(),
                order,
                count,
                date,
                breakdown.net
            ),
            _ => format!("{} is locked in.", pod.display_name()),
        };
        notification_repo::insert(
            conn,
            &Notification::create(account, "Payout scheduled".into(), body),
        )?;
    }
    Ok(())
}

fn notify_completed(conn: &Connection, pod: &Pod, members: &[Membership]) -> AjoResult<()> {
    for membership in members {
        let Some(account) = membership.account_id else {
            continue;
        };
        notification_repo::insert(
            conn,
            &Notification::create(
                account,
                "Pod completed".into(),
                format!(
                    "{} has finished its full rotation. Thanks for saving together.",
                    pod.display_name()
                ),
            ),
        )?;
    }
    Ok(())
}
