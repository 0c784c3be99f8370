use crate::calendar::CalendarWindow;
use crate::models::CompletionLog;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompletionStats {
    pub total_days: u32,
    pub completed_days: u32,
    pub completion_percentage: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HabitStats {
    #[serde(flatten)]
    pub completion: CompletionStats,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub completed_today: bool,
}

pub fn habit_stats(log: &CompletionLog, window: &CalendarWindow) -> HabitStats {
    let completed_today = window
        .days()
        .last()
        .is_some_and(|day| log.is_completed(&day.key));

    HabitStats {
        completion: completion_stats(log, window),
        current_streak: current_streak(log, window),
        longest_streak: longest_streak(log, window),
        completed_today,
    }
}

pub fn completion_stats(log: &CompletionLog, window: &CalendarWindow) -> CompletionStats {
    let total_days = window.len() as u32;
    let completed_days = window
        .days()
        .iter()
        .filter(|day| log.is_completed(&day.key))
        .count() as u32;

    CompletionStats {
        total_days,
        completed_days,
        completion_percentage: percentage(completed_days, total_days),
    }
}

/// Completed days in an unbroken run ending at the most recent window day.
pub fn current_streak(log: &CompletionLog, window: &CalendarWindow) -> u32 {
    window
        .days()
        .iter()
        .rev()
        .take_while(|day| log.is_completed(&day.key))
        .count() as u32
}

/// Best run of consecutive completed days anywhere in the window.
pub fn longest_streak(log: &CompletionLog, window: &CalendarWindow) -> u32 {
    let (_, best) = window
        .days()
        .iter()
        .fold((0u32, 0u32), |(running, best), day| {
            if log.is_completed(&day.key) {
                let running = running + 1;
                (running, best.max(running))
            } else {
                (0, best)
            }
        });
    best
}

/// Integer percentage rounded half up.
pub fn percentage(completed: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = u64::from(completed.min(total));
    let total = u64::from(total);
    ((completed * 200 + total) / (total * 2)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{Day, WINDOW_DAYS};
    use chrono::NaiveDate;

    fn window() -> CalendarWindow {
        CalendarWindow::ending_at(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()).unwrap()
    }

    /// Log with `true` for the given window positions (0 = oldest).
    fn log_with(
        window: &CalendarWindow,
        positions: impl IntoIterator<Item = usize>,
    ) -> CompletionLog {
        let days: &[Day] = window.days();
        positions
            .into_iter()
            .map(|idx| (days[idx].key.to_string(), true))
            .collect()
    }

    #[test]
    fn empty_log_has_no_progress() {
        let window = window();
        let stats = habit_stats(&CompletionLog::new(), &window);

        assert_eq!(
            stats.completion,
            CompletionStats { total_days: 30, completed_days: 0, completion_percentage: 0 }
        );
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.longest_streak, 0);
        assert!(!stats.completed_today);
    }

    #[test]
    fn fully_completed_window() {
        let window = window();
        let log = log_with(&window, 0..WINDOW_DAYS);
        let stats = habit_stats(&log, &window);

        assert_eq!(stats.completion.completed_days, 30);
        assert_eq!(stats.completion.completion_percentage, 100);
        assert_eq!(stats.current_streak, 30);
        assert_eq!(stats.longest_streak, 30);
        assert!(stats.completed_today);
    }

    #[test]
    fn trailing_five_days() {
        let window = window();
        let log = log_with(&window, 25..30);
        let stats = habit_stats(&log, &window);

        assert_eq!(stats.current_streak, 5);
        assert_eq!(stats.longest_streak, 5);
        assert_eq!(stats.completion.completed_days, 5);
        assert_eq!(stats.completion.completion_percentage, 17);
    }

    #[test]
    fn runs_at_both_ends_of_the_window() {
        let window = window();
        let log = log_with(&window, [0, 1, 2, 27, 28, 29]);
        let stats = habit_stats(&log, &window);

        assert_eq!(stats.longest_streak, 3);
        assert_eq!(stats.current_streak, 3);
        assert_eq!(stats.completion.completed_days, 6);
        assert_eq!(stats.completion.completion_percentage, 20);
    }

    #[test]
    fn explicit_false_yesterday_breaks_the_streak() {
        let window = window();
        let log: CompletionLog = [(26, true), (28, false), (29, true)]
            .into_iter()
            .map(|(idx, done)| (window.days()[idx].key.to_string(), done))
            .collect();

        assert_eq!(current_streak(&log, &window), 1);
        assert_eq!(longest_streak(&log, &window), 1);
    }

    #[test]
    fn isolated_day_in_the_middle() {
        let window = window();
        let log = log_with(&window, [14]);

        assert_eq!(longest_streak(&log, &window), 1);
        assert_eq!(current_streak(&log, &window), 0);
    }

    #[test]
    fn longest_run_in_the_past_outlasts_current_streak() {
        let window = window();
        let log = log_with(&window, (3..10).chain(28..30));

        assert_eq!(longest_streak(&log, &window), 7);
        assert_eq!(current_streak(&log, &window), 2);
    }

    #[test]
    fn days_outside_the_window_are_ignored() {
        let window = window();
        let log: CompletionLog = [
            ("2025-12-06".to_string(), true),
            ("2026-01-06".to_string(), true),
            ("2026-01-05".to_string(), true),
        ]
        .into_iter()
        .collect();

        let stats = completion_stats(&log, &window);
        assert_eq!(stats.completed_days, 1);
        assert_eq!(current_streak(&log, &window), 1);
    }

    #[test]
    fn current_streak_never_exceeds_longest() {
        let window = window();
        for mask in [0b1u32, 0b1011, 0xFFFF_0000, 0x3FFF_FFFF, 0x2AAA_AAAA, 0x3000_0001] {
            let log = log_with(&window, (0..WINDOW_DAYS).filter(|idx| mask & (1u32 << *idx) != 0));
            let stats = habit_stats(&log, &window);

            assert!(stats.current_streak <= stats.longest_streak, "{mask:#x}");
            assert!(stats.completion.completed_days <= stats.completion.total_days);
            assert!(stats.completion.completion_percentage <= 100);
            assert_eq!(stats, habit_stats(&log, &window));
        }
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(percentage(0, 30), 0);
        assert_eq!(percentage(1, 30), 3);
        assert_eq!(percentage(2, 30), 7);
        assert_eq!(percentage(30, 30), 100);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(1, 200), 1);
        assert_eq!(percentage(0, 0), 0);
    }
}
