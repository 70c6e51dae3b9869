//! Temporal scheduling queries.
//!
//! Pure derived views over the reminder and prescription collections: which
//! reminders fall on a reference date, which one-off events are still ahead,
//! and how close a prescription is to its refill date. Nothing here caches or
//! mutates; the same inputs always produce the same output.

use chrono::NaiveDate;

use crate::models::{Reminder, Weekday};

/// Days within which a pending refill counts as urgent.
pub const REFILL_URGENCY_DAYS: i64 = 7;

/// Reminders that occur on `today`.
///
/// A one-off reminder qualifies when its date equals `today`; a recurring
/// reminder qualifies when `today`'s weekday code is in its day set.
pub fn todays_reminders(reminders: &[Reminder], today: NaiveDate) -> Vec<Reminder> {
    let weekday = Weekday::from_date(today);
    reminders
        .iter()
        .filter(|r| {
            if r.recurring {
                r.days.contains(&weekday)
            } else {
                r.date == Some(today)
            }
        })
        .cloned()
        .collect()
}

/// One-off reminders on or after `today`, ascending by date.
///
/// The sort is stable, so reminders sharing a date keep their insertion order.
pub fn upcoming_one_time(reminders: &[Reminder], today: NaiveDate) -> Vec<Reminder> {
    let mut upcoming: Vec<Reminder> = reminders
        .iter()
        .filter(|r| !r.recurring && r.date.is_some_and(|d| d >= today))
        .cloned()
        .collect();
    upcoming.sort_by_key(|r| r.date);
    upcoming
}

/// Whole days from `today` until the refill date. Negative means past due,
/// zero means due today.
pub fn days_remaining(refill_date: NaiveDate, today: NaiveDate) -> i64 {
    (refill_date - today).num_days()
}

/// A refill is urgent once it is within [`REFILL_URGENCY_DAYS`] days.
pub fn is_urgent(days_remaining: i64) -> bool {
    days_remaining <= REFILL_URGENCY_DAYS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn recurring(id: u64, days: Vec<Weekday>) -> Reminder {
        Reminder {
            id,
            title: format!("recurring {id}"),
            description: None,
            time: "08:00".to_string(),
            recurring: true,
            days,
            date: None,
        }
    }

    fn one_off(id: u64, on: NaiveDate) -> Reminder {
        Reminder {
            id,
            title: format!("one-off {id}"),
            description: None,
            time: "14:30".to_string(),
            recurring: false,
            days: Vec::new(),
            date: Some(on),
        }
    }

    #[test]
    fn one_off_matches_only_its_exact_date() {
        let today = date(2025, 5, 15);
        let reminders = vec![one_off(1, today), one_off(2, date(2025, 5, 16))];
        let ids: Vec<_> = todays_reminders(&reminders, today).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn recurring_matches_by_weekday_membership() {
        // 2025-05-14 is a Wednesday.
        let wednesday = date(2025, 5, 14);
        let reminders = vec![
            recurring(1, vec![Weekday::Mon, Weekday::Wed, Weekday::Fri]),
            recurring(2, vec![Weekday::Tue, Weekday::Thu]),
        ];
        let ids: Vec<_> = todays_reminders(&reminders, wednesday).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn wednesday_scenario_splits_today_and_upcoming() {
        // A weekday-recurring reminder fires today while the one-off sits in
        // the upcoming list for tomorrow.
        let today = date(2025, 5, 14); // Wednesday
        let reminders = vec![
            recurring(1, vec![Weekday::Wed]),
            one_off(2, date(2025, 5, 15)),
        ];

        let today_ids: Vec<_> = todays_reminders(&reminders, today).iter().map(|r| r.id).collect();
        assert_eq!(today_ids, vec![1]);

        let upcoming_ids: Vec<_> =
            upcoming_one_time(&reminders, today).iter().map(|r| r.id).collect();
        assert_eq!(upcoming_ids, vec![2]);
    }

    #[test]
    fn upcoming_excludes_past_and_sorts_ascending() {
        let today = date(2025, 5, 14);
        let reminders = vec![
            one_off(1, date(2025, 6, 10)),
            one_off(2, date(2025, 5, 13)), // already past
            one_off(3, date(2025, 5, 15)),
            one_off(4, today), // due today still counts
        ];
        let ids: Vec<_> = upcoming_one_time(&reminders, today).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![4, 3, 1]);
    }

    #[test]
    fn upcoming_tie_break_keeps_insertion_order() {
        let today = date(2025, 5, 14);
        let shared = date(2025, 5, 20);
        let reminders = vec![one_off(9, shared), one_off(3, shared)];
        let ids: Vec<_> = upcoming_one_time(&reminders, today).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![9, 3]);
    }

    #[test]
    fn recurring_reminders_never_appear_in_upcoming() {
        let today = date(2025, 5, 14);
        let reminders = vec![recurring(1, vec![Weekday::Wed])];
        assert!(upcoming_one_time(&reminders, today).is_empty());
    }

    #[test]
    fn days_remaining_counts_signed_whole_days() {
        let today = date(2025, 5, 12);
        assert_eq!(days_remaining(date(2025, 5, 15), today), 3);
        assert_eq!(days_remaining(today, today), 0);
        assert_eq!(days_remaining(date(2025, 5, 10), today), -2);
    }

    #[test]
    fn days_remaining_strictly_decreases_as_today_advances() {
        let refill = date(2025, 5, 20);
        let mut today = date(2025, 5, 10);
        let mut prev = days_remaining(refill, today);
        for _ in 0..15 {
            today = today.succ_opt().unwrap();
            let next = days_remaining(refill, today);
            assert_eq!(next, prev - 1);
            prev = next;
        }
    }

    #[test]
    fn urgency_threshold_is_seven_days() {
        assert!(is_urgent(7));
        assert!(is_urgent(3));
        assert!(is_urgent(0));
        assert!(is_urgent(-2));
        assert!(!is_urgent(8));
    }
}
