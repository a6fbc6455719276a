//! Closed time windows used to count and filter appointments.
//!
//! Dashboard windows (`today`, `this_week`, `this_month`) are derived from a
//! calendar date in the server's time zone and never include the first
//! instant of the following period: each ends one microsecond (the storage
//! precision) before the next boundary. Export windows are built from two
//! user-chosen calendar days and run from `00:00:00.000` of the first day to
//! `23:59:59.999` of the last, both inclusive.
//!
//! A local midnight skipped by a daylight-saving change resolves to the first
//! instant after the gap, so every day still has a start.

use std::str::FromStr;

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime,
    Offset, TimeZone, Utc,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::Appointment;

/// Errors raised while building a window.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateWindowError {
    /// The end lies before the start.
    #[error("window end {end} is before start {start}")]
    Inverted {
        /// Requested start.
        start: DateTime<Utc>,
        /// Requested end.
        end: DateTime<Utc>,
    },
    /// The last calendar day precedes the first.
    #[error("last day {last} is before first day {first}")]
    InvertedDays {
        /// Requested first day.
        first: NaiveDate,
        /// Requested last day.
        last: NaiveDate,
    },
    /// The date is outside the supported calendar range.
    #[error("date out of range")]
    OutOfRange,
}

/// Closed interval `[start, end]` of UTC instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

fn resolve_local<Tz: TimeZone>(
    tz: &Tz,
    local: NaiveDateTime,
) -> Result<DateTime<Utc>, DateWindowError> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(instant) | LocalResult::Ambiguous(instant, _) => {
            Ok(instant.with_timezone(&Utc))
        }
        LocalResult::None => after_gap(tz, local),
    }
}

/// Read `local` with the offset in force a day earlier. For a wall-clock time
/// inside a forward gap this lands on or after the end of the gap.
fn after_gap<Tz: TimeZone>(
    tz: &Tz,
    local: NaiveDateTime,
) -> Result<DateTime<Utc>, DateWindowError> {
    let day_before = local
        .checked_sub_signed(Duration::days(1))
        .ok_or(DateWindowError::OutOfRange)?;
    let offset = tz.offset_from_utc_datetime(&day_before).fix();
    local
        .checked_sub_signed(Duration::seconds(i64::from(offset.local_minus_utc())))
        .map(|utc| utc.and_utc())
        .ok_or(DateWindowError::OutOfRange)
}

fn midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Result<DateTime<Utc>, DateWindowError> {
    resolve_local(tz, date.and_time(NaiveTime::MIN))
}

fn just_before<Tz: TimeZone>(
    tz: &Tz,
    boundary: NaiveDate,
) -> Result<DateTime<Utc>, DateWindowError> {
    Ok(midnight(tz, boundary)? - Duration::microseconds(1))
}

impl DateWindow {
    /// Build a window, rejecting an end that precedes the start.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, DateWindowError> {
        if end < start {
            return Err(DateWindowError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// First instant of the window.
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Last instant of the window.
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Whether `start <= instant <= end`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// The calendar day `date`, from local midnight up to (not including) the
    /// next local midnight.
    pub fn today<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Result<Self, DateWindowError> {
        let next = date.succ_opt().ok_or(DateWindowError::OutOfRange)?;
        Self::new(midnight(tz, date)?, just_before(tz, next)?)
    }

    /// Seven days starting at the most recent Sunday on or before `date`.
    pub fn this_week<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Result<Self, DateWindowError> {
        let back = i64::from(date.weekday().num_days_from_sunday());
        let sunday = date
            .checked_sub_signed(Duration::days(back))
            .ok_or(DateWindowError::OutOfRange)?;
        let next_sunday = sunday
            .checked_add_signed(Duration::days(7))
            .ok_or(DateWindowError::OutOfRange)?;
        Self::new(midnight(tz, sunday)?, just_before(tz, next_sunday)?)
    }

    /// First through last calendar day of the month containing `date`.
    pub fn this_month<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Result<Self, DateWindowError> {
        let first = date.with_day(1).ok_or(DateWindowError::OutOfRange)?;
        let next_first = if date.month() == 12 {
            NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
        }
        .ok_or(DateWindowError::OutOfRange)?;
        Self::new(midnight(tz, first)?, just_before(tz, next_first)?)
    }

    /// Export window over whole calendar days: `00:00:00.000` of `first`
    /// through `23:59:59.999` of `last`.
    ///
    /// # Examples
    /// ```
    /// use chrono::{NaiveDate, TimeZone, Utc};
    /// use clinic_backend::domain::DateWindow;
    ///
    /// let day = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
    /// let window = DateWindow::calendar_days(day, day, &Utc).unwrap();
    /// let last = Utc.with_ymd_and_hms(2024, 3, 4, 23, 59, 59).unwrap()
    ///     + chrono::Duration::milliseconds(999);
    /// assert!(window.contains(last));
    /// assert_eq!(window.end(), last);
    /// ```
    pub fn calendar_days<Tz: TimeZone>(
        first: NaiveDate,
        last: NaiveDate,
        tz: &Tz,
    ) -> Result<Self, DateWindowError> {
        if last < first {
            return Err(DateWindowError::InvertedDays { first, last });
        }
        let end_of_day = last
            .and_hms_milli_opt(23, 59, 59, 999)
            .ok_or(DateWindowError::OutOfRange)?;
        Self::new(midnight(tz, first)?, resolve_local(tz, end_of_day)?)
    }
}

/// A calendar day named either directly or by an instant that falls on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarDay {
    /// `YYYY-MM-DD`.
    Date(NaiveDate),
    /// An RFC 3339 timestamp; its day depends on the zone it is read in.
    Containing(DateTime<FixedOffset>),
}

impl CalendarDay {
    /// The calendar date in `tz`.
    pub fn date_in<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        match self {
            Self::Date(date) => *date,
            Self::Containing(instant) => instant.with_timezone(tz).date_naive(),
        }
    }
}

/// Input that is neither a `YYYY-MM-DD` date nor an RFC 3339 timestamp.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected a YYYY-MM-DD date or an RFC 3339 timestamp")]
pub struct InvalidCalendarDay;

impl FromStr for CalendarDay {
    type Err = InvalidCalendarDay;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Ok(Self::Date(date));
        }
        DateTime::parse_from_rfc3339(trimmed)
            .map(Self::Containing)
            .map_err(|_| InvalidCalendarDay)
    }
}

/// Number of records whose slot lies inside `window`.
pub fn count_in_range(records: &[Appointment], window: &DateWindow) -> usize {
    records
        .iter()
        .filter(|record| window.contains(record.scheduled_at()))
        .count()
}

/// Records whose slot lies inside `window`, in their original order.
pub fn filter_in_range(records: &[Appointment], window: &DateWindow) -> Vec<Appointment> {
    records
        .iter()
        .filter(|record| window.contains(record.scheduled_at()))
        .cloned()
        .collect()
}

/// The three dashboard windows for one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardWindows {
    /// The date itself.
    pub today: DateWindow,
    /// Sunday-based week containing the date.
    pub week: DateWindow,
    /// Calendar month containing the date.
    pub month: DateWindow,
}

impl DashboardWindows {
    /// Derive all three windows for `date` in `tz`.
    pub fn for_date<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Result<Self, DateWindowError> {
        Ok(Self {
            today: DateWindow::today(date, tz)?,
            week: DateWindow::this_week(date, tz)?,
            month: DateWindow::this_month(date, tz)?,
        })
    }

    /// Count `records` into each window.
    pub fn count(&self, records: &[Appointment]) -> DashboardStats {
        DashboardStats {
            today: count_in_range(records, &self.today),
            week: count_in_range(records, &self.week),
            month: count_in_range(records, &self.month),
        }
    }
}

/// Appointment counts shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct DashboardStats {
    /// Appointments scheduled today.
    pub today: usize,
    /// Appointments scheduled this week.
    pub week: usize,
    /// Appointments scheduled this month.
    pub month: usize,
}

#[cfg(test)]
mod tests {
    //! Window construction and boundary coverage.

    use super::*;
    use crate::domain::{AppointmentDraft, AppointmentId, NewAppointment};
    use rstest::{fixture, rstest};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn at(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw)
            .expect("fixture timestamp")
            .with_timezone(&Utc)
    }

    fn record(scheduled_at: &str) -> Appointment {
        let draft = AppointmentDraft {
            patient_name: "Ana Pop".to_owned(),
            email: "ana@example.com".to_owned(),
            phone: "0712345678".to_owned(),
            scheduled_at: scheduled_at.to_owned(),
            service: "Consult".to_owned(),
            message: None,
        };
        Appointment::create(
            AppointmentId::random(),
            NewAppointment::try_from(draft).expect("valid draft"),
            at("2024-01-01T00:00:00Z"),
        )
    }

    #[fixture]
    fn records() -> Vec<Appointment> {
        vec![
            record("2024-03-04T10:00:00Z"),
            record("2024-03-10T09:00:00Z"),
            record("2024-02-20T10:00:00Z"),
        ]
    }

    #[rstest]
    fn counts_fixture_windows(records: Vec<Appointment>) {
        let today = DateWindow::today(date(2024, 3, 4), &Utc).expect("today");
        let march_4_to_10 =
            DateWindow::calendar_days(date(2024, 3, 4), date(2024, 3, 10), &Utc).expect("week");
        let march = DateWindow::this_month(date(2024, 3, 4), &Utc).expect("month");

        assert_eq!(count_in_range(&records, &today), 1);
        assert_eq!(count_in_range(&records, &march_4_to_10), 2);
        assert_eq!(count_in_range(&records, &march), 2);
    }

    #[rstest]
    fn dashboard_week_starts_on_sunday(records: Vec<Appointment>) {
        let windows = DashboardWindows::for_date(date(2024, 3, 4), &Utc).expect("windows");
        assert_eq!(windows.week.start(), at("2024-03-03T00:00:00Z"));
        assert_eq!(windows.week.end(), at("2024-03-09T23:59:59.999999Z"));
        // 2024-03-10 belongs to the following Sunday-based week.
        assert_eq!(
            windows.count(&records),
            DashboardStats {
                today: 1,
                week: 1,
                month: 2,
            }
        );
    }

    #[test]
    fn sunday_is_its_own_week_start() {
        let week = DateWindow::this_week(date(2024, 3, 10), &Utc).expect("week");
        assert_eq!(week.start(), at("2024-03-10T00:00:00Z"));
    }

    #[test]
    fn next_midnight_belongs_only_to_the_next_day() {
        let midnight = at("2024-03-05T00:00:00Z");
        let monday = DateWindow::today(date(2024, 3, 4), &Utc).expect("today");
        let tuesday = DateWindow::today(date(2024, 3, 5), &Utc).expect("today");
        assert!(!monday.contains(midnight));
        assert!(tuesday.contains(midnight));
        assert!(monday.contains(at("2024-03-04T23:59:59.999999Z")));
    }

    #[rstest]
    #[case(date(2024, 2, 10), "2024-02-29T23:59:59.999999Z")]
    #[case(date(2023, 2, 10), "2023-02-28T23:59:59.999999Z")]
    #[case(date(2024, 12, 31), "2024-12-31T23:59:59.999999Z")]
    fn month_includes_the_whole_last_day(#[case] day: NaiveDate, #[case] end: &str) {
        let month = DateWindow::this_month(day, &Utc).expect("month");
        assert_eq!(month.end(), at(end));
        assert_eq!(month.start().day(), 1);
    }

    #[test]
    fn windows_follow_the_configured_offset() {
        let bucharest = FixedOffset::east_opt(2 * 3600).expect("offset");
        let today = DateWindow::today(date(2024, 3, 4), &bucharest).expect("today");
        assert_eq!(today.start(), at("2024-03-03T22:00:00Z"));
        assert!(today.contains(at("2024-03-04T21:30:00Z")));
        assert!(!today.contains(at("2024-03-04T22:00:00Z")));
    }

    #[test]
    fn export_window_spans_whole_days_inclusive() {
        let window =
            DateWindow::calendar_days(date(2024, 3, 1), date(2024, 3, 4), &Utc).expect("window");
        assert!(window.contains(at("2024-03-01T00:00:00Z")));
        assert!(window.contains(at("2024-03-04T23:59:59.999Z")));
        assert!(!window.contains(at("2024-03-05T00:00:00Z")));
        assert!(!window.contains(at("2024-02-29T23:59:59.999Z")));
    }

    #[test]
    fn inverted_export_window_is_rejected() {
        let err = DateWindow::calendar_days(date(2024, 3, 5), date(2024, 3, 4), &Utc)
            .expect_err("inverted");
        assert_eq!(
            err,
            DateWindowError::InvertedDays {
                first: date(2024, 3, 5),
                last: date(2024, 3, 4),
            }
        );
    }

    #[test]
    fn sub_microsecond_slot_is_counted_on_its_day() {
        let late = [record("2024-03-04T23:59:59.9999995Z")];
        let monday = DateWindow::today(date(2024, 3, 4), &Utc).expect("today");
        let tuesday = DateWindow::today(date(2024, 3, 5), &Utc).expect("today");
        assert_eq!(count_in_range(&late, &monday), 1);
        assert_eq!(count_in_range(&late, &tuesday), 0);
    }

    /// Zone at UTC-4 that springs forward to UTC-3 at local midnight on
    /// 2024-09-08, so `00:00..01:00` that day never happens.
    #[derive(Debug, Clone, Copy)]
    struct MidnightGap;

    impl MidnightGap {
        fn gap_start() -> NaiveDateTime {
            date(2024, 9, 8).and_time(NaiveTime::MIN)
        }

        fn before() -> FixedOffset {
            FixedOffset::west_opt(4 * 3600).expect("offset")
        }

        fn after() -> FixedOffset {
            FixedOffset::west_opt(3 * 3600).expect("offset")
        }
    }

    impl TimeZone for MidnightGap {
        type Offset = FixedOffset;

        fn from_offset(_offset: &FixedOffset) -> Self {
            Self
        }

        fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
            self.offset_from_local_datetime(&local.and_time(NaiveTime::MIN))
        }

        fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
            let start = Self::gap_start();
            if *local < start {
                LocalResult::Single(Self::before())
            } else if *local < start + Duration::hours(1) {
                LocalResult::None
            } else {
                LocalResult::Single(Self::after())
            }
        }

        fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
            self.offset_from_utc_datetime(&utc.and_time(NaiveTime::MIN))
        }

        fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
            if *utc < Self::gap_start() + Duration::hours(4) {
                Self::before()
            } else {
                Self::after()
            }
        }
    }

    #[test]
    fn skipped_midnight_starts_the_day_after_the_gap() {
        let windows = DashboardWindows::for_date(date(2024, 9, 10), &MidnightGap).expect("windows");
        assert_eq!(windows.week.start(), at("2024-09-08T04:00:00Z"));

        let saturday = DateWindow::today(date(2024, 9, 7), &MidnightGap).expect("today");
        assert_eq!(saturday.end(), at("2024-09-08T03:59:59.999999Z"));

        let sunday = DateWindow::today(date(2024, 9, 8), &MidnightGap).expect("today");
        assert_eq!(sunday.start(), at("2024-09-08T04:00:00Z"));
        assert_eq!(sunday.end(), at("2024-09-09T02:59:59.999999Z"));
    }

    #[rstest]
    #[case("2024-03-04", date(2024, 3, 4))]
    #[case(" 2024-03-04 ", date(2024, 3, 4))]
    #[case("2024-03-04T23:30:00-02:00", date(2024, 3, 5))]
    fn calendar_days_parse_from_dates_and_timestamps(
        #[case] raw: &str,
        #[case] expected: NaiveDate,
    ) {
        let day: CalendarDay = raw.parse().expect("parses");
        assert_eq!(day.date_in(&Utc), expected);
    }

    #[test]
    fn timestamp_days_depend_on_the_zone() {
        let day: CalendarDay = "2024-03-04T23:30:00Z".parse().expect("parses");
        let plus_two = FixedOffset::east_opt(2 * 3600).expect("offset");
        assert_eq!(day.date_in(&Utc), date(2024, 3, 4));
        assert_eq!(day.date_in(&plus_two), date(2024, 3, 5));
    }

    #[rstest]
    #[case("04/03/2024")]
    #[case("2024-02-30")]
    #[case("")]
    fn malformed_days_are_rejected(#[case] raw: &str) {
        assert_eq!(raw.parse::<CalendarDay>(), Err(InvalidCalendarDay));
    }

    #[rstest]
    fn filter_keeps_input_order(records: Vec<Appointment>) {
        let window =
            DateWindow::calendar_days(date(2024, 2, 1), date(2024, 3, 4), &Utc).expect("window");
        let kept = filter_in_range(&records, &window);
        let slots: Vec<_> = kept.iter().map(Appointment::scheduled_at).collect();
        assert_eq!(
            slots,
            vec![at("2024-03-04T10:00:00Z"), at("2024-02-20T10:00:00Z")]
        );
    }
}
