//! Weekly travel windows and scheduled toll rows.

use std::cmp::Ordering;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use super::{Edge, NodeId, TollRow};
use crate::error::TollError;

/// A point on the weekly clock: a day of the week and a time of day.
///
/// Ordered Monday 00:00:00 first, Sunday 23:59:59 last. A point parsed from a
/// calendar date also keeps that date.
///
/// # Examples
///
/// ```
/// use chrono::{NaiveTime, Weekday};
/// use u_toll::models::WeekTime;
///
/// let a = WeekTime::parse("Monday", "23:00:00").unwrap();
/// let b = WeekTime::parse("Tuesday", "01:00:00").unwrap();
/// assert!(a < b);
/// assert_eq!(b.day(), Weekday::Tue);
/// assert_eq!(b.time(), NaiveTime::from_hms_opt(1, 0, 0).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekTime {
    day: Weekday,
    time: NaiveTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<NaiveDate>,
}

impl WeekTime {
    /// Creates a point on the weekly clock.
    pub fn new(day: Weekday, time: NaiveTime) -> Self {
        Self {
            day,
            time,
            date: None,
        }
    }

    /// Creates a point on a calendar date.
    pub fn on_date(date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            day: date.weekday(),
            time,
            date: Some(date),
        }
    }

    /// Parses a day label and a time label.
    ///
    /// The day is either a weekday name ("Monday", "mon") or a calendar date
    /// (`YYYY-MM-DD`), which is kept alongside its weekday. The time is `HH:MM:SS` or
    /// `HH:MM`. Returns `None` if either label does not parse.
    pub fn parse(day: &str, time: &str) -> Option<Self> {
        let time = parse_time(time)?;
        let day = day.trim();
        if let Ok(weekday) = day.parse::<Weekday>() {
            return Some(Self::new(weekday, time));
        }
        let date = NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()?;
        Some(Self::on_date(date, time))
    }

    /// Day of the week.
    pub fn day(&self) -> Weekday {
        self.day
    }

    /// Time of day.
    pub fn time(&self) -> NaiveTime {
        self.time
    }

    /// Calendar date, if the day label was one.
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Calendar date and time, if the day label was a date.
    pub fn datetime(&self) -> Option<NaiveDateTime> {
        self.date.map(|d| d.and_time(self.time))
    }

    /// Elapsed time since Monday 00:00:00.
    pub fn since_week_start(&self) -> Duration {
        let days = i64::from(self.day.num_days_from_monday());
        Duration::days(days)
            + Duration::seconds(i64::from(self.time.num_seconds_from_midnight()))
            + Duration::nanoseconds(i64::from(self.time.nanosecond()))
    }
}

impl Ord for WeekTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.day
            .num_days_from_monday()
            .cmp(&other.day.num_days_from_monday())
            .then_with(|| self.time.cmp(&other.time))
            .then_with(|| self.date.cmp(&other.date))
    }
}

impl PartialOrd for WeekTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn parse_time(label: &str) -> Option<NaiveTime> {
    let label = label.trim();
    NaiveTime::parse_from_str(label, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(label, "%H:%M"))
        .ok()
}

/// The interval a toll record covers, on the weekly clock or between dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelWindow {
    /// When the window opens.
    pub start: WeekTime,
    /// When the window closes.
    pub end: WeekTime,
}

impl TravelWindow {
    /// Creates a window.
    pub fn new(start: WeekTime, end: WeekTime) -> Self {
        Self { start, end }
    }

    /// Length of the window.
    ///
    /// When both ends carry calendar dates the span is the plain datetime
    /// difference, which may exceed a week or be negative. Otherwise it is
    /// measured on the weekly clock, and an end that precedes its start is
    /// read as falling in the following week.
    pub fn span(&self) -> Duration {
        if let (Some(start), Some(end)) = (self.start.datetime(), self.end.datetime()) {
            return end - start;
        }
        let span = self.end.since_week_start() - self.start.since_week_start();
        if span < Duration::zero() {
            span + Duration::weeks(1)
        } else {
            span
        }
    }
}

/// One row of a time-windowed toll table as produced by an external loader.
///
/// Column names follow the source dataset (`startDay`, `startTime`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    /// Origin location.
    pub id_start: Option<NodeId>,
    /// Destination location.
    pub id_end: Option<NodeId>,
    /// Distance between the two locations.
    pub distance: Option<f64>,
    /// Weekday name or `YYYY-MM-DD` date the window opens on.
    #[serde(rename = "startDay")]
    pub start_day: Option<String>,
    /// `HH:MM:SS` or `HH:MM` time the window opens at.
    #[serde(rename = "startTime")]
    pub start_time: Option<String>,
    /// Weekday name or `YYYY-MM-DD` date the window closes on.
    #[serde(rename = "endDay")]
    pub end_day: Option<String>,
    /// `HH:MM:SS` or `HH:MM` time the window closes at.
    #[serde(rename = "endTime")]
    pub end_time: Option<String>,
}

impl ScheduleRecord {
    /// Creates a complete record.
    pub fn new(
        id_start: NodeId,
        id_end: NodeId,
        distance: f64,
        start: (&str, &str),
        end: (&str, &str),
    ) -> Self {
        Self {
            id_start: Some(id_start),
            id_end: Some(id_end),
            distance: Some(distance),
            start_day: Some(start.0.to_string()),
            start_time: Some(start.1.to_string()),
            end_day: Some(end.0.to_string()),
            end_time: Some(end.1.to_string()),
        }
    }

    /// Validates the pair, distance, and both timestamps of this record.
    pub fn validate(&self, row: usize) -> Result<(Edge, TravelWindow), TollError> {
        let edge = super::EdgeRecord {
            id_start: self.id_start,
            id_end: self.id_end,
            distance: self.distance,
        }
        .validate(row)?;

        let start = week_time(row, "start", &self.start_day, &self.start_time)?;
        let end = week_time(row, "end", &self.end_day, &self.end_time)?;
        Ok((edge, TravelWindow::new(start, end)))
    }
}

fn week_time(
    row: usize,
    which: &str,
    day: &Option<String>,
    time: &Option<String>,
) -> Result<WeekTime, TollError> {
    let day = day
        .as_deref()
        .ok_or_else(|| TollError::malformed_row(row, format!("missing {which} day")))?;
    let time = time
        .as_deref()
        .ok_or_else(|| TollError::malformed_row(row, format!("missing {which} time")))?;
    WeekTime::parse(day, time).ok_or_else(|| {
        TollError::malformed_row(row, format!("unparseable {which} timestamp '{day} {time}'"))
    })
}

/// A toll row tagged with its travel window.
///
/// Toll columns are rescaled at most once; `discount` records the factor
/// that was applied, if any.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScheduledTollRow {
    /// Edge and per-class tolls, discounted in place.
    #[serde(flatten)]
    pub toll: TollRow,
    /// Day the window opens on.
    pub start_day: Weekday,
    /// Time the window opens at.
    pub start_time: NaiveTime,
    /// Calendar date the window opens on, if the record gave one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Day the window closes on.
    pub end_day: Weekday,
    /// Time the window closes at.
    pub end_time: NaiveTime,
    /// Calendar date the window closes on, if the record gave one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    discount: Option<f64>,
}

impl ScheduledTollRow {
    /// Attaches a travel window to a toll row. No discount is applied yet.
    pub fn new(toll: TollRow, window: TravelWindow) -> Self {
        Self {
            toll,
            start_day: window.start.day(),
            start_time: window.start.time(),
            start_date: window.start.date(),
            end_day: window.end.day(),
            end_time: window.end.time(),
            end_date: window.end.date(),
            discount: None,
        }
    }

    /// Start of the travel window.
    pub fn start(&self) -> WeekTime {
        week_point(self.start_day, self.start_time, self.start_date)
    }

    /// End of the travel window.
    pub fn end(&self) -> WeekTime {
        week_point(self.end_day, self.end_time, self.end_date)
    }

    /// The travel window this row covers.
    pub fn window(&self) -> TravelWindow {
        TravelWindow::new(self.start(), self.end())
    }

    /// The discount factor applied to this row, if one was.
    pub fn discount(&self) -> Option<f64> {
        self.discount
    }

    pub(crate) fn mark_discounted(&mut self, factor: f64) {
        self.discount = Some(factor);
    }
}

fn week_point(day: Weekday, time: NaiveTime, date: Option<NaiveDate>) -> WeekTime {
    match date {
        Some(date) => WeekTime::on_date(date, time),
        None => WeekTime::new(day, time),
    }
}
