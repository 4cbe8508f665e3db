// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::Span;
use jiff::civil::{Date, Time, date};

use crate::LayoutError;

pub const HOURS_PER_DAY: f64 = 24.0;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Day zero of the absolute day numbering.
const EPOCH: Date = date(1970, 1, 1);

/// The number of days between 1970-01-01 and the given date.
///
/// Day numbers are only meaningful relative to each other; they let the
/// segmentation code do interval arithmetic on plain integers.
#[must_use]
pub fn day_number(d: Date) -> i64 {
    d.duration_since(EPOCH).as_secs().div_euclid(SECONDS_PER_DAY)
}

/// Inverse of [`day_number`].
///
/// # Errors
///
/// Fails if the day number lies outside the supported date range.
pub fn date_from_day_number(n: i64) -> Result<Date, LayoutError> {
    Span::new()
        .try_days(n)
        .and_then(|span| EPOCH.checked_add(span))
        .map_err(|e| LayoutError::temporal(format!("day #{n}"), e))
}

/// The first day of the week containing `d`, with `start_of_week` counted
/// from Sunday (0) to Saturday (6).
#[must_use]
pub fn week_start_of(d: Date, start_of_week: u8) -> i64 {
    let weekday = i64::from(d.weekday().to_sunday_zero_offset());
    let offset = (weekday - i64::from(start_of_week)).rem_euclid(7);
    day_number(d) - offset
}

/// Fractional hour of the day, e.g. 09:45 is 9.75.
pub fn hour_of_time(t: Time) -> f64 {
    f64::from(t.hour())
        + f64::from(t.minute()) / 60.0
        + f64::from(t.second()) / 3_600.0
        + f64::from(t.subsec_nanosecond()) / 3_600_000_000_000.0
}
