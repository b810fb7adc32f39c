use chrono::{Datelike, Duration, Months, NaiveDate};

use crate::model::{Cadence, PodType};

/// Canonical pod start days: the 1st and 16th of each month.
pub const CANONICAL_START_DAYS: [u32; 2] = [1, 16];

/// Canonical system payout days: the 15th and 30th of each month.
pub const SYSTEM_PAYOUT_DAYS: [u32; 2] = [15, 30];

/// Interval between bi-weekly payout slots.
pub const BIWEEKLY_INTERVAL_DAYS: i64 = 14;

/// The next canonical start day (1st or 16th) strictly after `after`.
/// Never returns a past date, even when scheduling runs late.
pub fn next_canonical_start(after: NaiveDate) -> NaiveDate {
    next_monthly_slot(after, &CANONICAL_START_DAYS)
}

/// The next system payout slot (15th or 30th, clamped to the month's last
/// day) strictly after `after`.
pub fn next_system_payout_slot(after: NaiveDate) -> NaiveDate {
    next_monthly_slot(after, &SYSTEM_PAYOUT_DAYS)
}

/// The first `count` system payout slots strictly after `start`.
pub fn system_payout_slots(start: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut slots = Vec::with_capacity(count);
    let mut cursor = start;
    for _ in 0..count {
        cursor = next_system_payout_slot(cursor);
        slots.push(cursor);
    }
    slots
}

/// The first `count` custom-pod payout slots after `start`: every 14 days
/// for bi-weekly pods, calendar-monthly (day-clamped) otherwise.
pub fn custom_payout_slots(start: NaiveDate, cadence: Cadence, count: usize) -> Vec<NaiveDate> {
    (1..=count)
        .map(|i| match cadence {
            Cadence::BiWeekly => start + Duration::days(BIWEEKLY_INTERVAL_DAYS * i as i64),
            Cadence::Monthly => start + Months::new(i as u32),
        })
        .collect()
}

/// Payout slots for a pod of the given type. Custom pods without an explicit
/// cadence fall back to bi-weekly.
pub fn payout_slots(
    pod_type: PodType,
    cadence: Option<Cadence>,
    start: NaiveDate,
    count: usize,
) -> Vec<NaiveDate> {
    match pod_type {
        PodType::System => system_payout_slots(start, count),
        PodType::Custom => {
            custom_payout_slots(start, cadence.unwrap_or(Cadence::BiWeekly), count)
        }
    }
}

fn next_monthly_slot(after: NaiveDate, days: &[u32]) -> NaiveDate {
    let mut month = first_of_month(after);
    loop {
        for &day in days {
            let slot = clamp_to_month(month, day);
            if slot > after {
                return slot;
            }
        }
        month = month + Months::new(1);
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    // day 1 exists in every month
    date.with_day(1).expect("valid first of month")
}

/// `day` clamped to the length of `month_start`'s month (e.g. the 30th slot
/// lands on Feb 28/29).
fn clamp_to_month(month_start: NaiveDate, day: u32) -> NaiveDate {
    month_start
        .with_day(day)
        .unwrap_or_else(|| next_month_start(month_start) - Duration::days(1))
}

fn next_month_start(month_start: NaiveDate) -> NaiveDate {
    month_start + Months::new(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn canonical_start_picks_sixteenth_mid_month() {
        assert_eq!(next_canonical_start(d(2025, 1, 5)), d(2025, 1, 16));
    }

    #[test]
    fn canonical_start_rolls_into_next_month() {
        assert_eq!(next_canonical_start(d(2025, 1, 20)), d(2025, 2, 1));
    }

    #[test]
    fn canonical_start_is_strictly_future() {
        assert_eq!(next_canonical_start(d(2025, 1, 16)), d(2025, 2, 1));
        assert_eq!(next_canonical_start(d(2025, 1, 1)), d(2025, 1, 16));
    }

    #[test]
    fn system_slot_clamps_in_february() {
        assert_eq!(next_system_payout_slot(d(2025, 2, 16)), d(2025, 2, 28));
        assert_eq!(next_system_payout_slot(d(2024, 2, 16)), d(2024, 2, 29));
    }

    #[test]
    fn system_slots_alternate_without_duplicates() {
        let slots = system_payout_slots(d(2025, 1, 1), 4);
        assert_eq!(
            slots,
            vec![d(2025, 1, 15), d(2025, 1, 30), d(2025, 2, 15), d(2025, 2, 28)]
        );
    }

    #[test]
    fn biweekly_slots_step_fourteen_days() {
        let slots = custom_payout_slots(d(2025, 3, 3), Cadence::BiWeekly, 3);
        assert_eq!(slots, vec![d(2025, 3, 17), d(2025, 3, 31), d(2025, 4, 14)]);
    }

    #[test]
    fn monthly_slots_clamp_short_months() {
        let slots = custom_payout_slots(d(2025, 1, 31), Cadence::Monthly, 3);
        assert_eq!(slots, vec![d(2025, 2, 28), d(2025, 3, 31), d(2025, 4, 30)]);
    }
}
