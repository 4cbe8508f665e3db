// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::ops::Sub;

use jiff::SignedDuration;
use jiff::civil::{Date, DateTime, Time};

use crate::datetime::util::{day_number, hour_of_time};

/// A normalized, totally ordered instant: the wall-clock reading of an event
/// boundary in the view timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct Moment(DateTime);

impl Moment {
    /// Wraps a wall-clock date-time.
    #[must_use]
    pub const fn new(dt: DateTime) -> Self {
        Self(dt)
    }

    /// The underlying civil date-time.
    #[must_use]
    pub const fn datetime(&self) -> DateTime {
        self.0
    }

    /// The calendar date.
    #[must_use]
    pub fn date(&self) -> Date {
        self.0.date()
    }

    /// Absolute day number, see [`crate::day_number`].
    #[must_use]
    pub fn day_number(&self) -> i64 {
        day_number(self.0.date())
    }

    /// Fractional hour of the day in `[0, 24)`.
    #[must_use]
    pub fn hour_of_day(&self) -> f64 {
        hour_of_time(self.0.time())
    }

    /// True if the moment sits exactly on midnight.
    #[must_use]
    pub fn is_start_of_day(&self) -> bool {
        self.0.time() == Time::midnight()
    }
}

impl Sub for Moment {
    type Output = SignedDuration;

    fn sub(self, rhs: Self) -> Self::Output {
        self.0.duration_since(rhs.0)
    }
}

impl From<DateTime> for Moment {
    fn from(dt: DateTime) -> Self {
        Self(dt)
    }
}

impl fmt::Display for Moment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
