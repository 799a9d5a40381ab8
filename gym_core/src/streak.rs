//! Daily challenge streaks computed from completed challenge dates.

use chrono::{Duration, NaiveDate};
use std::collections::HashSet;

/// Consecutive completed days ending today.
///
/// A day that is not complete yet does not break the streak: if `today` is
/// missing, counting starts from yesterday.
pub fn current_streak(completed: &[NaiveDate], today: NaiveDate) -> u32 {
    let days: HashSet<NaiveDate> = completed.iter().copied().collect();

    let mut cursor = if days.contains(&today) {
        today
    } else {
        today - Duration::days(1)
    };

    let mut streak = 0;
    while days.contains(&cursor) {
        streak += 1;
        match cursor.pred_opt() {
            Some(previous) => cursor = previous,
            None => break,
        }
    }
    streak
}

/// Longest run of consecutive completed days
pub fn longest_streak(completed: &[NaiveDate]) -> u32 {
    let mut days: Vec<NaiveDate> = completed.to_vec();
    days.sort_unstable();
    days.dedup();

    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;
    for day in days {
        run = match previous {
            Some(prev) if day - prev == Duration::days(1) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(day);
    }
    longest
}
