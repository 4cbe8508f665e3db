// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::civil::Date;

use crate::LayoutError;
use crate::datetime::{date_from_day_number, day_number, week_start_of};

/// Days per week row in week, month and year grids.
pub const DAYS_PER_WEEK: usize = 7;

/// The kind of calendar view a window belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    /// A single day with a time grid.
    Day,

    /// A run of days with a time grid, usually a week.
    Week,

    /// A month grid of whole weeks.
    Month,

    /// A year grid of whole weeks.
    Year,
}

impl ViewKind {
    /// Returns true for views that show a time grid.
    #[must_use]
    pub fn has_time_grid(self) -> bool {
        matches!(self, ViewKind::Day | ViewKind::Week)
    }
}

/// The date range a layout is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub struct ViewWindow {
    /// What kind of view this is.
    pub kind: ViewKind,

    /// The first day shown.
    pub start: Date,

    /// Number of days shown, at least one.
    pub length: usize,
}

impl ViewWindow {
    /// A single day.
    #[must_use]
    pub fn day(day: Date) -> Self {
        Self {
            kind: ViewKind::Day,
            start: day,
            length: 1,
        }
    }

    /// The week containing `day`, showing `days_to_show` days from the start of week.
    ///
    /// # Errors
    ///
    /// Fails if the aligned start falls outside the supported date range.
    pub fn week(day: Date, days_to_show: usize, start_of_week: u8) -> Result<Self, LayoutError> {
        let start = date_from_day_number(week_start_of(day, start_of_week))?;
        Ok(Self {
            kind: ViewKind::Week,
            start,
            length: capped_length(start, days_to_show),
        })
    }

    /// An arbitrary run of days starting exactly at `start`, ending at the
    /// last supported date at the latest.
    #[must_use]
    pub fn days(start: Date, length: usize) -> Self {
        Self {
            kind: ViewKind::Week,
            start,
            length: capped_length(start, length),
        }
    }

    /// The whole weeks covering the month that contains `day`.
    ///
    /// # Errors
    ///
    /// Fails if the grid falls outside the supported date range.
    pub fn month(day: Date, start_of_week: u8) -> Result<Self, LayoutError> {
        Self::grid(
            ViewKind::Month,
            day.first_of_month(),
            day.last_of_month(),
            start_of_week,
        )
    }

    /// The whole weeks covering the given year.
    ///
    /// # Errors
    ///
    /// Fails if the grid falls outside the supported date range.
    pub fn year(year: i16, start_of_week: u8) -> Result<Self, LayoutError> {
        let first = Date::new(year, 1, 1).map_err(|e| LayoutError::temporal(year.to_string(), e))?;
        Self::grid(ViewKind::Year, first, first.last_of_year(), start_of_week)
    }

    fn grid(kind: ViewKind, first: Date, last: Date, start_of_week: u8) -> Result<Self, LayoutError> {
        let start = week_start_of(first, start_of_week);
        let end = week_start_of(last, start_of_week) + 6;
        Ok(Self {
            kind,
            start: date_from_day_number(start)?,
            length: usize::try_from(end - start + 1).unwrap_or(DAYS_PER_WEEK),
        })
    }

    /// Absolute day number of the first day.
    #[must_use]
    pub fn first_day(&self) -> i64 {
        day_number(self.start)
    }

    /// Absolute day number of the last day, inclusive.
    #[must_use]
    pub fn last_day(&self) -> i64 {
        self.first_day().saturating_add(self.length_i64() - 1)
    }

    /// Number of days per bar row: whole weeks, or the whole window if shorter.
    #[must_use]
    pub fn row_length(&self) -> usize {
        self.length.clamp(1, DAYS_PER_WEEK)
    }

    /// Number of bar rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.length.div_ceil(self.row_length())
    }

    /// Returns true if the inclusive day range intersects the window.
    #[must_use]
    pub fn intersects(&self, first_day: i64, last_day: i64) -> bool {
        first_day <= self.last_day() && last_day >= self.first_day()
    }

    /// The date of the given window-relative day index.
    ///
    /// # Errors
    ///
    /// Fails if the date falls outside the supported date range.
    pub fn date_of(&self, day_index: usize) -> Result<Date, LayoutError> {
        let offset = i64::try_from(day_index)
            .map_err(|e| LayoutError::temporal(day_index.to_string(), e))?;
        date_from_day_number(self.first_day() + offset)
    }

    pub(crate) fn length_i64(&self) -> i64 {
        i64::try_from(self.length).unwrap_or(i64::MAX)
    }
}

/// Clamps a length to `1..` and to the days left before [`Date::MAX`].
fn capped_length(start: Date, length: usize) -> usize {
    let left = usize::try_from(day_number(Date::MAX) - day_number(start) + 1).unwrap_or(1);
    length.clamp(1, left.max(1))
}
