//! Deadline urgency
//!
//! Urgency is a 0-10 value derived from a due date relative to an explicit
//! `today`. Dates are compared at day granularity.

use chrono::NaiveDate;

/// Urgency of a task with no deadline
pub const NO_DEADLINE_URGENCY: f64 = 3.0;

/// Urgency of an overdue task
pub const OVERDUE_URGENCY: f64 = 10.0;

/// Urgency of a task due today
pub const DUE_TODAY_URGENCY: f64 = 9.0;

/// Days ahead at which urgency reaches zero
const HORIZON_DAYS: i64 = 10;

/// Signed number of days from `today` until `due` (negative if overdue)
pub fn days_until(due: NaiveDate, today: NaiveDate) -> i64 {
    (due - today).num_days()
}

/// Maps a due date to urgency in [0, 10]
///
/// - no due date: 3
/// - overdue: 10
/// - due today: 9
/// - due in N days: `10 - min(N, 10)`, so 9 at one day out and 0 from ten days
pub fn urgency(due_date: Option<NaiveDate>, today: NaiveDate) -> f64 {
    let Some(due) = due_date else {
        return NO_DEADLINE_URGENCY;
    };

    match days_until(due, today) {
        d if d < 0 => OVERDUE_URGENCY,
        0 => DUE_TODAY_URGENCY,
        d => (10 - d.min(HORIZON_DAYS)).max(0) as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn ahead(days: u64) -> Option<NaiveDate> {
        today().checked_add_days(Days::new(days))
    }

    #[test]
    fn no_due_date() {
        assert_eq!(urgency(None, today()), 3.0);
    }

    #[test]
    fn overdue_is_maximal() {
        let yesterday = today().checked_sub_days(Days::new(1));
        assert_eq!(urgency(yesterday, today()), 10.0);

        let last_year = today().checked_sub_days(Days::new(365));
        assert_eq!(urgency(last_year, today()), 10.0);
    }

    #[test]
    fn due_today() {
        assert_eq!(urgency(Some(today()), today()), 9.0);
    }

    #[test]
    fn linear_decay() {
        assert_eq!(urgency(ahead(1), today()), 9.0);
        assert_eq!(urgency(ahead(2), today()), 8.0);
        assert_eq!(urgency(ahead(5), today()), 5.0);
        assert_eq!(urgency(ahead(9), today()), 1.0);
    }

    #[test]
    fn beyond_horizon_is_zero() {
        assert_eq!(urgency(ahead(10), today()), 0.0);
        assert_eq!(urgency(ahead(11), today()), 0.0);
        assert_eq!(urgency(ahead(400), today()), 0.0);
    }

    #[test]
    fn days_until_is_signed() {
        assert_eq!(days_until(ahead(3).unwrap(), today()), 3);
        assert_eq!(days_until(today(), ahead(3).unwrap()), -3);
    }
}
