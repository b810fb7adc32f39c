use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;

use ajopod::db::*;
use ajopod::model::*;
use ajopod::ops::*;
use ajopod::queries::*;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn setup() -> (rusqlite::Connection, Account) {
    let conn = schema::test_connection();
    plan_repo::seed_defaults(&conn).unwrap();
    let account = account_ops::register(&conn, "Ada", "ada@example.com").unwrap();
    (conn, account)
}

fn new_account(conn: &rusqlite::Connection, name: &str) -> Account {
    account_ops::register(conn, name, "").unwrap()
}

/// Ada plus five others fill the starter pod; sweep to the given date.
fn active_starter_pod(conn: &rusqlite::Connection, ada: &Account, sweep_to: NaiveDate) -> Pod {
    let today = d(2025, 1, 2);
    let (pod, _) =
        pod_ops::join_plan(conn, ada.id, "starter", GoalType::Savings, None, today).unwrap();
    for i in 2..=6 {
        let account = new_account(conn, &format!("Member {}", i));
        pod_ops::join_plan(conn, account.id, "starter", GoalType::Savings, None, today).unwrap();
    }
    let mut rng = StdRng::seed_from_u64(1);
    lifecycle_ops::run_sweep(conn, sweep_to, &mut rng).unwrap();
    pod_repo::find_by_id(conn, pod.id).unwrap().unwrap()
}

// ==========================================================================
// POD DETAIL
// ==========================================================================

#[test]
fn detail_has_no_queue_before_lock() {
    let (conn, ada) = setup();
    let (pod, _) =
        pod_ops::join_plan(&conn, ada.id, "starter", GoalType::Savings, None, d(2025, 1, 2))
            .unwrap();

    let detail = pod_queries::pod_detail(&conn, pod.id, ada.id).unwrap().unwrap();
    assert!(detail.queue.is_none());
    assert!(detail.my_membership.is_some());
    assert_eq!(detail.cycles_total, 6);
    assert_eq!(detail.contribution_target, 30_000);
}

#[test]
fn detail_queue_splits_ahead_and_behind_after_lock() {
    let (conn, ada) = setup();
    let pod = active_starter_pod(&conn, &ada, d(2025, 1, 18));
    assert_eq!(pod.status, PodStatus::Active);

    let detail = pod_queries::pod_detail(&conn, pod.id, ada.id).unwrap().unwrap();
    let queue = detail.queue.expect("order is fixed after lock");

    assert_eq!(
        queue.ahead_of_you.len() + queue.behind_you.len(),
        5,
        "everyone else is either ahead or behind"
    );
    assert!(queue
        .ahead_of_you
        .iter()
        .all(|m| m.final_order.unwrap() < queue.my_position));
    assert!(queue
        .behind_you
        .iter()
        .all(|m| m.final_order.unwrap() > queue.my_position));
}

#[test]
fn detail_members_are_listed_in_payout_order_after_lock() {
    let (conn, ada) = setup();
    let pod = active_starter_pod(&conn, &ada, d(2025, 1, 18));

    let detail = pod_queries::pod_detail(&conn, pod.id, ada.id).unwrap().unwrap();
    let orders: Vec<i32> = detail.members.iter().filter_map(|m| m.final_order).collect();
    assert_eq!(orders, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn detail_progress_tracks_contributions() {
    let (conn, ada) = setup();
    let pod = active_starter_pod(&conn, &ada, d(2025, 1, 18));
    let membership = membership_repo::find_by_pod_and_account(&conn, pod.id, ada.id)
        .unwrap()
        .unwrap();

    contribution_ops::record_contribution(&conn, membership.id, 15_000).unwrap();

    let detail = pod_queries::pod_detail(&conn, pod.id, ada.id).unwrap().unwrap();
    assert_eq!(detail.my_progress, Some(50.0));
}

#[test]
fn detail_for_missing_pod_is_none() {
    let (conn, ada) = setup();
    let ghost: Id<Pod> = Id::generate();
    assert!(pod_queries::pod_detail(&conn, ghost, ada.id).unwrap().is_none());
}

// ==========================================================================
// PAYOUT PREVIEWS
// ==========================================================================

#[test]
fn preview_before_lock_has_no_position() {
    let (conn, ada) = setup();
    let (_, membership) =
        pod_ops::join_plan(&conn, ada.id, "starter", GoalType::Savings, None, d(2025, 1, 2))
            .unwrap();

    let preview = payout_queries::payout_preview(&conn, membership.id)
        .unwrap()
        .unwrap();
    assert_eq!(preview.position, None);
    assert_eq!(preview.payout_date, None);
    assert_eq!(preview.breakdown.gross, 30_000);
    // unknown position falls back to the default fee
    assert_eq!(preview.breakdown.deduction_rate, 0.025);
}

#[test]
fn schedule_covers_every_member_with_fee_tiers() {
    let (conn, ada) = setup();
    let pod = active_starter_pod(&conn, &ada, d(2025, 1, 18));

    let schedule = payout_queries::pod_schedule(&conn, pod.id).unwrap();
    assert_eq!(schedule.len(), 6);

    for preview in &schedule {
        let expected = match preview.position.unwrap() {
            6 => 0.0,
            5 => 0.015,
            _ => 0.025,
        };
        assert_eq!(preview.breakdown.deduction_rate, expected);
    }

    // successive positions collect on successive slots
    let dates: Vec<_> = schedule.iter().filter_map(|p| p.payout_date).collect();
    let mut sorted = dates.clone();
    sorted.sort();
    assert_eq!(dates, sorted);
}

// ==========================================================================
// STATS
// ==========================================================================

#[test]
fn stats_count_pods_by_phase() {
    let (conn, ada) = setup();
    active_starter_pod(&conn, &ada, d(2025, 1, 18));
    let bob = new_account(&conn, "Bob");
    pod_ops::join_plan(&conn, bob.id, "plus", GoalType::Savings, None, d(2025, 1, 20)).unwrap();

    let stats = stats_queries::stats(&conn, ada.id, d(2025, 1, 20)).unwrap();
    assert_eq!(stats.total_pods, 2);
    assert_eq!(stats.active_pods, 1);
    assert_eq!(stats.filling_pods, 1);
    assert_eq!(stats.completed_pods, 0);
    assert_eq!(stats.total_members, 7);
}

#[test]
fn stats_track_contributions_and_next_payout() {
    let (conn, ada) = setup();
    let pod = active_starter_pod(&conn, &ada, d(2025, 1, 18));
    let membership = membership_repo::find_by_pod_and_account(&conn, pod.id, ada.id)
        .unwrap()
        .unwrap();
    contribution_ops::record_contribution(&conn, membership.id, 5_000).unwrap();

    let stats = stats_queries::stats(&conn, ada.id, d(2025, 1, 20)).unwrap();
    assert_eq!(stats.total_contributed, 5_000);

    // first system slot after lock on Jan 18 is Jan 30
    let (_, date) = stats.next_payout.expect("ada has an upcoming payout");
    assert_eq!(date, d(2025, 1, 30));
}

#[test]
fn stats_next_payout_ignores_other_accounts_pods() {
    let (conn, ada) = setup();
    let bob = new_account(&conn, "Bob");
    // only bob's pod exists and it never locks
    pod_ops::join_plan(&conn, bob.id, "starter", GoalType::Savings, None, d(2025, 1, 2)).unwrap();

    let stats = stats_queries::stats(&conn, ada.id, d(2025, 1, 20)).unwrap();
    assert_eq!(stats.next_payout, None);
}
