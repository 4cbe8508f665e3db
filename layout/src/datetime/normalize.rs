// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use jiff::civil::{Date, DateTime};
use jiff::tz::TimeZone;
use jiff::{Timestamp, Zoned};
use serde::de;

use crate::LayoutError;
use crate::datetime::{LooseDateTime, Moment};

/// An event boundary as handed over by the host application.
///
/// Hosts hand over whatever they have: typed values, strings read from storage,
/// or epoch milliseconds from legacy date objects. Parsing is deferred to
/// [`normalize`] so one bad value only affects its own event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventTime {
    /// An already typed value.
    Loose(LooseDateTime),

    /// An unparsed textual value.
    Text(String),

    /// Milliseconds since the Unix epoch.
    EpochMillis(i64),
}

impl EventTime {
    /// Returns true if the value is a plain date without time component.
    ///
    /// Text that cannot be parsed is not date only.
    pub fn is_date_only(&self) -> bool {
        match self {
            EventTime::Loose(v) => v.is_date_only(),
            EventTime::Text(s) => s
                .parse::<LooseDateTime>()
                .is_ok_and(|v| v.is_date_only()),
            EventTime::EpochMillis(_) => false,
        }
    }

    /// Resolves the value into a typed date-time.
    ///
    /// # Errors
    ///
    /// Fails with [`LayoutError::InvalidTemporalValue`] when the value cannot be read.
    pub fn resolve(&self) -> Result<LooseDateTime, LayoutError> {
        match self {
            EventTime::Loose(v) => Ok(v.clone()),
            EventTime::Text(s) => s.parse(),
            EventTime::EpochMillis(ms) => Timestamp::from_millisecond(*ms)
                .map(LooseDateTime::Instant)
                .map_err(|e| LayoutError::temporal(ms.to_string(), e)),
        }
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTime::Loose(v) => write!(f, "{v}"),
            EventTime::Text(s) => write!(f, "{s}"),
            EventTime::EpochMillis(ms) => write!(f, "{ms}"),
        }
    }
}

impl From<LooseDateTime> for EventTime {
    fn from(v: LooseDateTime) -> Self {
        EventTime::Loose(v)
    }
}

impl From<Date> for EventTime {
    fn from(d: Date) -> Self {
        EventTime::Loose(d.into())
    }
}

impl From<DateTime> for EventTime {
    fn from(dt: DateTime) -> Self {
        EventTime::Loose(dt.into())
    }
}

impl From<Zoned> for EventTime {
    fn from(zdt: Zoned) -> Self {
        EventTime::Loose(zdt.into())
    }
}

impl From<Timestamp> for EventTime {
    fn from(ts: Timestamp) -> Self {
        EventTime::Loose(ts.into())
    }
}

impl From<&str> for EventTime {
    fn from(s: &str) -> Self {
        EventTime::Text(s.to_owned())
    }
}

impl From<String> for EventTime {
    fn from(s: String) -> Self {
        EventTime::Text(s)
    }
}

impl serde::Serialize for EventTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EventTime::EpochMillis(ms) => serializer.serialize_i64(*ms),
            _ => serializer.collect_str(self),
        }
    }
}

impl<'de> serde::Deserialize<'de> for EventTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct EventTimeVisitor;

        impl de::Visitor<'_> for EventTimeVisitor {
            type Value = EventTime;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str(
                    "a date string like \"2006-01-02\", \"2006-01-02T15:04:05\", an RFC 3339 \
                     string, or milliseconds since the Unix epoch",
                )
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(EventTime::Text(value.to_owned()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(EventTime::Text(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(EventTime::EpochMillis(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                i64::try_from(value)
                    .map(EventTime::EpochMillis)
                    .map_err(|_| E::custom(format!("epoch milliseconds out of range: {value}")))
            }
        }

        deserializer.deserialize_any(EventTimeVisitor)
    }
}

/// Converts any supported representation into a comparable [`Moment`] in the view timezone.
///
/// # Errors
///
/// Fails with [`LayoutError::InvalidTemporalValue`]; it never substitutes the current
/// time or the epoch for an unreadable value.
pub fn normalize(value: &EventTime, tz: &TimeZone) -> Result<Moment, LayoutError> {
    value.resolve().map(|v| v.to_moment(tz))
}

/// Returns true if both boundaries are date only, whatever the event's all-day flag says.
pub fn is_all_day_equivalent(start: &EventTime, end: &EventTime) -> bool {
    start.is_date_only() && end.is_date_only()
}

/// Fractional hour of the day in `[0, 24)`; date only values read as midnight, so 0.
pub fn extract_hour_of_day(moment: &Moment) -> f64 {
    moment.hour_of_day()
}
