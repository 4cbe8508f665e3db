// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::str::FromStr;

use jiff::civil::{Date, DateTime, Time};
use jiff::tz::TimeZone;
use jiff::{Timestamp, Zoned};

use crate::LayoutError;
use crate::datetime::Moment;

/// A date and time that may be in different formats, such as date only, floating time, or
/// an exact instant with or without its time zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LooseDateTime {
    /// Date only without time.
    DateOnly(Date),

    /// Floating date and time without timezone, read as wall-clock time of the view.
    Floating(DateTime),

    /// Date and time with its own timezone.
    Zoned(Zoned),

    /// An exact instant with only an offset (or `Z`), such as an RFC 3339 string.
    Instant(Timestamp),
}

impl LooseDateTime {
    /// Returns true if there is no time component.
    pub fn is_date_only(&self) -> bool {
        matches!(self, LooseDateTime::DateOnly(_))
    }

    /// Returns the date part, as seen in its own timezone.
    pub fn date(&self) -> Date {
        match self {
            LooseDateTime::DateOnly(d) => *d,
            LooseDateTime::Floating(dt) => dt.date(),
            LooseDateTime::Zoned(zdt) => zdt.date(),
            LooseDateTime::Instant(ts) => ts.to_zoned(TimeZone::UTC).date(),
        }
    }

    /// Returns the time part, if available.
    pub fn time(&self) -> Option<Time> {
        match self {
            LooseDateTime::DateOnly(_) => None,
            LooseDateTime::Floating(dt) => Some(dt.time()),
            LooseDateTime::Zoned(zdt) => Some(zdt.time()),
            LooseDateTime::Instant(ts) => Some(ts.to_zoned(TimeZone::UTC).time()),
        }
    }

    /// Wall-clock reading of this value in the view timezone.
    ///
    /// Date only values start at midnight, floating values are taken as-is.
    pub fn to_moment(&self, tz: &TimeZone) -> Moment {
        let dt = match self {
            LooseDateTime::DateOnly(d) => d.to_datetime(Time::midnight()),
            LooseDateTime::Floating(dt) => *dt,
            LooseDateTime::Zoned(zdt) => zdt.with_time_zone(tz.clone()).datetime(),
            LooseDateTime::Instant(ts) => ts.to_zoned(tz.clone()).datetime(),
        };
        Moment::new(dt)
    }
}

impl FromStr for LooseDateTime {
    type Err = LayoutError;

    /// Accepts, in order of precedence:
    ///
    /// - `2006-01-02[...]` style zoned strings with a bracketed time zone
    /// - RFC 3339 strings with an offset or `Z`
    /// - `2006-01-02T15:04:05` floating date-times
    /// - `2006-01-02` dates
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(LayoutError::temporal(s, "empty string"));
        }

        let has_time = s.contains(['T', 't', ' ']);
        if !has_time {
            return s
                .parse::<Date>()
                .map(LooseDateTime::DateOnly)
                .map_err(|e| LayoutError::temporal(s, e));
        }

        if s.contains('[') {
            return s
                .parse::<Zoned>()
                .map(LooseDateTime::Zoned)
                .map_err(|e| LayoutError::temporal(s, e));
        }

        if let Ok(ts) = s.parse::<Timestamp>() {
            return Ok(LooseDateTime::Instant(ts));
        }

        s.parse::<DateTime>()
            .map(LooseDateTime::Floating)
            .map_err(|e| LayoutError::temporal(s, e))
    }
}

impl fmt::Display for LooseDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LooseDateTime::DateOnly(d) => write!(f, "{d}"),
            LooseDateTime::Floating(dt) => write!(f, "{dt}"),
            LooseDateTime::Zoned(zdt) => write!(f, "{zdt}"),
            LooseDateTime::Instant(ts) => write!(f, "{ts}"),
        }
    }
}

impl From<Date> for LooseDateTime {
    fn from(d: Date) -> Self {
        LooseDateTime::DateOnly(d)
    }
}

impl From<DateTime> for LooseDateTime {
    fn from(dt: DateTime) -> Self {
        LooseDateTime::Floating(dt)
    }
}

impl From<Zoned> for LooseDateTime {
    fn from(zdt: Zoned) -> Self {
        LooseDateTime::Zoned(zdt)
    }
}

impl From<Timestamp> for LooseDateTime {
    fn from(ts: Timestamp) -> Self {
        LooseDateTime::Instant(ts)
    }
}
