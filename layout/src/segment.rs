// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Decomposition of events into the per-day and per-week slices of a view.

use jiff::civil::Date;

use crate::config::ResolvedConfig;
use crate::datetime::{HOURS_PER_DAY, Moment};
use crate::event::NormalizedEvent;
use crate::window::ViewWindow;
use crate::{Event, LayoutConfig, LayoutError};

/// Where a segment sits within the full span of its event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentPosition {
    /// The segment holds the whole event.
    Single,

    /// The event starts in this segment and continues after it.
    First,

    /// The event started before and continues after this segment.
    Middle,

    /// The event started before and ends in this segment.
    Last,
}

impl SegmentPosition {
    /// Position of a segment given whether the event extends past either edge.
    #[must_use]
    pub fn from_continuation(continues_before: bool, continues_after: bool) -> Self {
        match (continues_before, continues_after) {
            (false, false) => SegmentPosition::Single,
            (false, true) => SegmentPosition::First,
            (true, true) => SegmentPosition::Middle,
            (true, false) => SegmentPosition::Last,
        }
    }
}

/// The portion of an event visible within one slice of a view.
///
/// Segments are derived data: they are rebuilt on every layout pass and only
/// refer back to their event by id.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Segment {
    /// Id of the source event.
    pub event_id: String,

    /// Calendar of the source event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_id: Option<String>,

    /// Day index for day slices, week row index for bar slices.
    pub slice_index: usize,

    /// First window-relative day covered by this segment.
    pub start_day_index: usize,

    /// Last window-relative day covered by this segment, inclusive.
    pub end_day_index: usize,

    /// Start within the first covered day, in fractional hours.
    pub start_offset: f64,

    /// End within the last covered day, in fractional hours, at most 24.
    pub end_offset: f64,

    /// Whether the segment belongs to the all-day area.
    pub all_day: bool,

    /// Rendering hint for edges and continuation marks.
    pub position: SegmentPosition,

    /// The event started before this segment, e.g. before the window.
    pub continues_before: bool,

    /// The event goes on after this segment.
    pub continues_after: bool,

    /// Normalized start of the whole event, used for ordering.
    pub event_start: Moment,

    /// Number of days the whole event occupies.
    pub event_days: usize,

    /// Stacking row, set by all-day row stacking.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
}

impl Segment {
    /// Number of days this segment covers.
    #[must_use]
    pub fn day_span(&self) -> usize {
        self.end_day_index - self.start_day_index + 1
    }

    /// Duration of the segment in hours, for single-day slices.
    #[must_use]
    pub fn duration_hours(&self) -> f64 {
        self.end_offset - self.start_offset
    }
}

/// Splits an event into one segment per visible day of the window.
///
/// Timed segments are clamped to the hours of their own day, never wrapped.
/// A zero-length event yields a single segment of the minimum event duration.
///
/// # Errors
///
/// Fails if the configuration is invalid or the event cannot be normalized.
pub fn segment_for_window(
    event: &Event,
    window_start: Date,
    window_length: usize,
    config: &LayoutConfig,
) -> Result<Vec<Segment>, LayoutError> {
    let resolved = config.resolve()?;
    let normalized = NormalizedEvent::from_event(event, &resolved)?;
    let window = ViewWindow::days(window_start, window_length);
    Ok(day_segments(&normalized, &window, &resolved))
}

/// Splits an event into one bar segment per week row of the window.
///
/// Windows of up to seven days form a single row; longer windows, such as
/// month and year grids, are cut into rows of seven days from the window start.
///
/// # Errors
///
/// Fails if the configuration is invalid or the event cannot be normalized.
pub fn segment_multi_day_event(
    event: &Event,
    window_start: Date,
    window_length: usize,
    config: &LayoutConfig,
) -> Result<Vec<Segment>, LayoutError> {
    let resolved = config.resolve()?;
    let normalized = NormalizedEvent::from_event(event, &resolved)?;
    let window = ViewWindow::days(window_start, window_length);
    Ok(bar_segments(&normalized, &window, &resolved))
}

pub(crate) fn day_segments(
    event: &NormalizedEvent,
    window: &ViewWindow,
    config: &ResolvedConfig,
) -> Vec<Segment> {
    let first = event.first_day();
    let last = event.last_day(config.config.end_policy);
    let origin = window.first_day();
    let from = first.max(origin);
    let to = last.min(window.last_day());

    (from..=to)
        .map(|day| {
            let (start_offset, end_offset) = if event.all_day {
                (0.0, HOURS_PER_DAY)
            } else {
                timed_offsets(event, day, first, last, config.min_duration_hours)
            };
            let index = day_index(day, origin);
            let continues_before = day > first;
            let continues_after = day < last;
            Segment {
                event_id: event.id.to_owned(),
                calendar_id: event.calendar_id.map(ToOwned::to_owned),
                slice_index: index,
                start_day_index: index,
                end_day_index: index,
                start_offset,
                end_offset,
                all_day: event.all_day,
                position: SegmentPosition::from_continuation(continues_before, continues_after),
                continues_before,
                continues_after,
                event_start: event.start,
                event_days: event.day_count(config.config.end_policy),
                row: None,
            }
        })
        .collect()
}

pub(crate) fn bar_segments(
    event: &NormalizedEvent,
    window: &ViewWindow,
    config: &ResolvedConfig,
) -> Vec<Segment> {
    let first = event.first_day();
    let last = event.last_day(config.config.end_policy);
    if !window.intersects(first, last) {
        return Vec::new();
    }

    let origin = window.first_day();
    let row_length = i64::try_from(window.row_length()).unwrap_or(1);
    let mut segments = Vec::new();
    for row in 0..window.row_count() {
        let row_first = origin + i64::try_from(row).unwrap_or(0) * row_length;
        let row_last = (row_first + row_length - 1).min(window.last_day());
        let from = first.max(row_first);
        let to = last.min(row_last);
        if from > to {
            continue;
        }

        let continues_before = from > first;
        let continues_after = to < last;
        let (start_offset, end_offset) = if event.all_day {
            (0.0, HOURS_PER_DAY)
        } else {
            (
                if continues_before { 0.0 } else { event.start.hour_of_day() },
                if continues_after { HOURS_PER_DAY } else { end_hour(event, to) },
            )
        };

        segments.push(Segment {
            event_id: event.id.to_owned(),
            calendar_id: event.calendar_id.map(ToOwned::to_owned),
            slice_index: row,
            start_day_index: day_index(from, origin),
            end_day_index: day_index(to, origin),
            start_offset,
            end_offset,
            all_day: event.all_day,
            position: SegmentPosition::from_continuation(continues_before, continues_after),
            continues_before,
            continues_after,
            event_start: event.start,
            event_days: event.day_count(config.config.end_policy),
            row: None,
        });
    }
    segments
}

/// Offsets of a timed event within one of its days, widened to the minimum duration.
fn timed_offsets(
    event: &NormalizedEvent,
    day: i64,
    first: i64,
    last: i64,
    min_hours: f64,
) -> (f64, f64) {
    let mut start = if day == first {
        event.start.hour_of_day()
    } else {
        0.0
    };
    let mut end = if day == last {
        end_hour(event, day)
    } else {
        HOURS_PER_DAY
    };

    if end - start < min_hours {
        end = (start + min_hours).min(HOURS_PER_DAY);
        start = (end - min_hours).max(0.0);
    }
    (start, end)
}

/// Hour at which the event ends on its last day; 24 when it ends on a later midnight.
fn end_hour(event: &NormalizedEvent, last: i64) -> f64 {
    if event.end.day_number() > last {
        HOURS_PER_DAY
    } else {
        event.end.hour_of_day()
    }
}

fn day_index(day: i64, origin: i64) -> usize {
    usize::try_from(day - origin).unwrap_or(0)
}
