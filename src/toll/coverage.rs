//! Travel-window completeness check per location pair.

use std::collections::BTreeMap;

use chrono::Duration;
use tracing::{debug, instrument, trace};

use crate::models::{NodeId, ScheduledTollRow};

/// Flags location pairs whose records do not each cover a full day.
///
/// For every `(id_start, id_end)` pair, each record's window length is
/// measured by [`TravelWindow::span`](crate::models::TravelWindow::span):
/// on the weekly clock, or as a calendar difference when both ends carry
/// dates. A pair maps to
/// `true` when any of its records spans less than one day or more than seven
/// days. Pairs are returned in ascending order.
///
/// # Examples
///
/// ```
/// use u_toll::models::{Edge, ScheduledTollRow, TravelWindow, WeekTime};
/// use u_toll::toll::{incorrect_timestamps, TollRateEngine};
///
/// let toll = TollRateEngine::default().price(Edge::new(1, 2, 5.0).unwrap());
/// let full = TravelWindow::new(
///     WeekTime::parse("Monday", "00:00:00").unwrap(),
///     WeekTime::parse("Sunday", "23:59:59").unwrap(),
/// );
/// let short = TravelWindow::new(
///     WeekTime::parse("Monday", "08:00:00").unwrap(),
///     WeekTime::parse("Monday", "09:00:00").unwrap(),
/// );
/// let rows = vec![
///     ScheduledTollRow::new(toll, full),
///     ScheduledTollRow::new(toll, short),
/// ];
/// assert!(!incorrect_timestamps(&rows[..1])[&(1, 2)]);
/// assert!(incorrect_timestamps(&rows)[&(1, 2)]);
/// ```
#[instrument(level = "debug", skip_all, fields(rows = rows.len()))]
pub fn incorrect_timestamps(rows: &[ScheduledTollRow]) -> BTreeMap<(NodeId, NodeId), bool> {
    let min = Duration::days(1);
    let max = Duration::days(7);
    let mut flags: BTreeMap<(NodeId, NodeId), bool> = BTreeMap::new();
    for row in rows {
        let pair = (row.toll.edge.id_start(), row.toll.edge.id_end());
        let span = row.window().span();
        let bad = span < min || span > max;
        if bad {
            trace!(?pair, span_secs = span.num_seconds(), "incomplete travel window");
        }
        *flags.entry(pair).or_insert(false) |= bad;
    }
    debug!(
        pairs = flags.len(),
        incorrect = flags.values().filter(|&&b| b).count(),
        "checked timestamp coverage"
    );
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TollConfig;
    use crate::models::{Edge, ScheduleRecord, TravelWindow, WeekTime};
    use crate::pipeline::time_based_toll_rates;
    use crate::toll::TollRateEngine;

    fn row(s: u64, e: u64, start: (&str, &str), end: (&str, &str)) -> ScheduledTollRow {
        let toll = TollRateEngine::default().price(Edge::new(s, e, 1.0).expect("valid"));
        ScheduledTollRow::new(
            toll,
            TravelWindow::new(
                WeekTime::parse(start.0, start.1).expect("start"),
                WeekTime::parse(end.0, end.1).expect("end"),
            ),
        )
    }

    #[test]
    fn test_pairs_flagged_independently() {
        let rows = vec![
            row(1, 2, ("Monday", "00:00:00"), ("Friday", "23:59:59")),
            row(1, 2, ("Saturday", "00:00:00"), ("Sunday", "23:59:59")),
            row(3, 4, ("Monday", "00:00:00"), ("Monday", "10:00:00")),
            row(3, 4, ("Tuesday", "00:00:00"), ("Sunday", "23:59:59")),
        ];
        let flags = incorrect_timestamps(&rows);
        assert_eq!(flags.len(), 2);
        assert!(!flags[&(1, 2)]);
        assert!(flags[&(3, 4)]);
    }

    #[test]
    fn test_exactly_one_day_is_complete() {
        let rows = vec![row(1, 2, ("Monday", "06:00:00"), ("Tuesday", "06:00:00"))];
        assert!(!incorrect_timestamps(&rows)[&(1, 2)]);
    }

    #[test]
    fn test_wrapping_window() {
        let rows = vec![row(5, 6, ("Thursday", "12:00:00"), ("Tuesday", "12:00:00"))];
        assert!(!incorrect_timestamps(&rows)[&(5, 6)]);
    }

    #[test]
    fn test_pair_direction_matters() {
        let rows = vec![
            row(1, 2, ("Monday", "00:00:00"), ("Sunday", "23:59:59")),
            row(2, 1, ("Monday", "00:00:00"), ("Monday", "01:00:00")),
        ];
        let flags = incorrect_timestamps(&rows);
        assert!(!flags[&(1, 2)]);
        assert!(flags[&(2, 1)]);
    }

    #[test]
    fn test_dated_window_longer_than_a_week() {
        let records = vec![
            ScheduleRecord::new(1, 2, 10.0, ("2023-10-16", "00:00:00"), ("2023-10-24", "00:00:00")),
            ScheduleRecord::new(3, 4, 10.0, ("2023-10-16", "00:00:00"), ("2023-10-22", "23:59:59")),
        ];
        let rows = time_based_toll_rates(&records, &TollConfig::default()).expect("valid");
        let flags = incorrect_timestamps(&rows);
        assert!(flags[&(1, 2)]);
        assert!(!flags[&(3, 4)]);
    }

    #[test]
    fn test_dated_end_before_start() {
        let rows = vec![row(1, 2, ("2023-10-24", "00:00:00"), ("2023-10-16", "00:00:00"))];
        assert!(incorrect_timestamps(&rows)[&(1, 2)]);
    }

    #[test]
    fn test_empty() {
        assert!(incorrect_timestamps(&[]).is_empty());
    }
}
