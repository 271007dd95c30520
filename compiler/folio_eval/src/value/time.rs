//! Dates, times and durations.

use std::cmp::Ordering;
use std::fmt::{self, Write};

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// A calendar date, a time of day, or both.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Datetime {
    Date(NaiveDate),
    Time(NaiveTime),
    Datetime(NaiveDateTime),
}

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

impl Datetime {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Datetime::Date)
    }

    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, second).map(Datetime::Time)
    }

    pub fn from_ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Option<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        let time = NaiveTime::from_hms_opt(hour, minute, second)?;
        Some(Datetime::Datetime(date.and_time(time)))
    }

    fn date(self) -> Option<NaiveDate> {
        match self {
            Datetime::Date(date) => Some(date),
            Datetime::Datetime(dt) => Some(dt.date()),
            Datetime::Time(_) => None,
        }
    }

    fn time(self) -> Option<NaiveTime> {
        match self {
            Datetime::Time(time) => Some(time),
            Datetime::Datetime(dt) => Some(dt.time()),
            Datetime::Date(_) => None,
        }
    }

    pub fn year(self) -> Option<i64> {
        self.date().map(|d| i64::from(d.year()))
    }

    pub fn month(self) -> Option<i64> {
        self.date().map(|d| i64::from(d.month()))
    }

    pub fn day(self) -> Option<i64> {
        self.date().map(|d| i64::from(d.day()))
    }

    /// Day of the week, Monday being 1.
    pub fn weekday(self) -> Option<i64> {
        self.date()
            .map(|d| i64::from(d.weekday().number_from_monday()))
    }

    /// Day of the year, starting at 1.
    pub fn ordinal(self) -> Option<i64> {
        self.date().map(|d| i64::from(d.ordinal()))
    }

    pub fn hour(self) -> Option<i64> {
        self.time().map(|t| i64::from(t.hour()))
    }

    pub fn minute(self) -> Option<i64> {
        self.time().map(|t| i64::from(t.minute()))
    }

    pub fn second(self) -> Option<i64> {
        self.time().map(|t| i64::from(t.second()))
    }

    /// Compare two datetimes of the same kind.
    pub fn try_cmp(self, other: Datetime) -> Option<Ordering> {
        match (self, other) {
            (Datetime::Date(a), Datetime::Date(b)) => Some(a.cmp(&b)),
            (Datetime::Time(a), Datetime::Time(b)) => Some(a.cmp(&b)),
            (Datetime::Datetime(a), Datetime::Datetime(b)) => Some(a.cmp(&b)),
            _ => None,
        }
    }

    /// Move the date part by whole days; a bare time is unchanged.
    pub fn shift_days(self, days: i32) -> Option<Datetime> {
        let magnitude = Days::new(u64::from(days.unsigned_abs()));
        let shift = |date: NaiveDate| {
            if days < 0 {
                date.checked_sub_days(magnitude)
            } else {
                date.checked_add_days(magnitude)
            }
        };
        match self {
            Datetime::Date(date) => shift(date).map(Datetime::Date),
            Datetime::Time(_) => Some(self),
            Datetime::Datetime(dt) => {
                shift(dt.date()).map(|date| Datetime::Datetime(date.and_time(dt.time())))
            }
        }
    }

    /// Shift by a duration; times wrap around midnight.
    pub fn checked_add(self, duration: Duration) -> Option<Datetime> {
        match self {
            Datetime::Date(date) => date.checked_add_signed(duration.0).map(Datetime::Date),
            Datetime::Time(time) => Some(Datetime::Time(time.overflowing_add_signed(duration.0).0)),
            Datetime::Datetime(dt) => dt.checked_add_signed(duration.0).map(Datetime::Datetime),
        }
    }

    /// The duration from `other` to `self`; both must be of the same kind.
    pub fn since(self, other: Datetime) -> Option<Duration> {
        match (self, other) {
            (Datetime::Date(a), Datetime::Date(b)) => Some(Duration(a.signed_duration_since(b))),
            (Datetime::Time(a), Datetime::Time(b)) => Some(Duration(a.signed_duration_since(b))),
            (Datetime::Datetime(a), Datetime::Datetime(b)) => {
                Some(Duration(a.signed_duration_since(b)))
            }
            _ => None,
        }
    }

    /// Render with a pattern of bracketed components such as
    /// `[year]-[month]-[day]` or `[month repr:long] [day padding:none]`.
    pub fn display(self, pattern: Option<&str>) -> Result<String, String> {
        let pattern = pattern.unwrap_or(match self {
            Datetime::Date(_) => "[year]-[month]-[day]",
            Datetime::Time(_) => "[hour]:[minute]:[second]",
            Datetime::Datetime(_) => "[year]-[month]-[day] [hour]:[minute]:[second]",
        });

        let mut out = String::new();
        let mut rest = pattern;
        while let Some(open) = rest.find('[') {
            out.push_str(&rest[..open]);
            let Some(close) = rest[open..].find(']') else {
                return Err("unclosed component in datetime pattern".into());
            };
            let component = &rest[open + 1..open + close];
            self.write_component(&mut out, component)?;
            rest = &rest[open + close + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }

    fn write_component(self, out: &mut String, component: &str) -> Result<(), String> {
        let mut words = component.split_whitespace();
        let name = words.next().unwrap_or_default();
        let mut long = false;
        let mut short = false;
        let mut padded = true;
        for modifier in words {
            match modifier {
                "repr:long" => long = true,
                "repr:short" => short = true,
                "repr:numerical" => {}
                "padding:none" => padded = false,
                "padding:zero" => padded = true,
                other => return Err(format!("unsupported datetime modifier: {other}")),
            }
        }

        let missing = || format!("cannot display `{name}` of this datetime");
        let number = |value: Option<i64>, out: &mut String| -> Result<(), String> {
            let value = value.ok_or_else(missing)?;
            if padded {
                let _ = write!(out, "{value:02}");
            } else {
                let _ = write!(out, "{value}");
            }
            Ok(())
        };

        match name {
            "year" => {
                let year = self.year().ok_or_else(missing)?;
                let _ = write!(out, "{year}");
                Ok(())
            }
            "month" if long || short => {
                let month = self.month().ok_or_else(missing)?;
                let name = MONTHS[(month - 1) as usize];
                out.push_str(if short { &name[..3] } else { name });
                Ok(())
            }
            "weekday" => {
                let day = self.weekday().ok_or_else(missing)?;
                let name = WEEKDAYS[(day - 1) as usize];
                out.push_str(if short { &name[..3] } else { name });
                Ok(())
            }
            "month" => number(self.month(), out),
            "day" => number(self.day(), out),
            "hour" => number(self.hour(), out),
            "minute" => number(self.minute(), out),
            "second" => number(self.second(), out),
            "ordinal" => number(self.ordinal(), out),
            other => Err(format!("unknown datetime component: {other}")),
        }
    }
}

impl fmt::Display for Datetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        let fields = [
            ("year", self.year()),
            ("month", self.month()),
            ("day", self.day()),
            ("hour", self.hour()),
            ("minute", self.minute()),
            ("second", self.second()),
        ];
        for (name, value) in fields {
            if let Some(value) = value {
                parts.push(format!("{name}: {value}"));
            }
        }
        write!(f, "datetime({})", parts.join(", "))
    }
}

/// A signed span of time with millisecond precision.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Duration(pub chrono::Duration);

impl Duration {
    /// Sum the given parts; `None` on overflow.
    pub fn from_parts(weeks: i64, days: i64, hours: i64, minutes: i64, seconds: i64) -> Option<Self> {
        let parts = [
            chrono::Duration::try_weeks(weeks)?,
            chrono::Duration::try_days(days)?,
            chrono::Duration::try_hours(hours)?,
            chrono::Duration::try_minutes(minutes)?,
            chrono::Duration::try_seconds(seconds)?,
        ];
        parts
            .iter()
            .try_fold(chrono::Duration::zero(), |acc, part| acc.checked_add(part))
            .map(Duration)
    }

    pub fn seconds(self) -> f64 {
        self.0.num_milliseconds() as f64 / 1000.0
    }

    pub fn minutes(self) -> f64 {
        self.seconds() / 60.0
    }

    pub fn hours(self) -> f64 {
        self.seconds() / 3600.0
    }

    pub fn days(self) -> f64 {
        self.seconds() / 86_400.0
    }

    pub fn weeks(self) -> f64 {
        self.seconds() / 604_800.0
    }

    pub fn checked_add(self, other: Duration) -> Option<Duration> {
        self.0.checked_add(&other.0).map(Duration)
    }

    pub fn checked_sub(self, other: Duration) -> Option<Duration> {
        self.0.checked_sub(&other.0).map(Duration)
    }

    /// Scale by a factor, rounding to whole milliseconds.
    pub fn scale(self, factor: f64) -> Option<Duration> {
        let millis = (self.0.num_milliseconds() as f64 * factor).round();
        if !millis.is_finite() || millis.abs() > i64::MAX as f64 / 2.0 {
            return None;
        }
        chrono::Duration::try_milliseconds(millis as i64).map(Duration)
    }

    #[must_use]
    pub fn neg(self) -> Duration {
        Duration(-self.0)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rest = self.0.num_seconds();
        let mut parts = Vec::new();
        for (name, unit) in [
            ("weeks", 604_800),
            ("days", 86_400),
            ("hours", 3600),
            ("minutes", 60),
        ] {
            let n = rest / unit;
            if n != 0 {
                parts.push(format!("{name}: {n}"));
            }
            rest %= unit;
        }
        if rest != 0 || parts.is_empty() {
            parts.push(format!("seconds: {rest}"));
        }
        write!(f, "duration({})", parts.join(", "))
    }
}
