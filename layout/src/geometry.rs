// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Mapping of abstract layout units into relative placement for rendering.

#![allow(clippy::cast_precision_loss)]

use crate::collision::Placement;
use crate::datetime::HOURS_PER_DAY;

/// Rendering units for projected geometry.
///
/// Horizontal values are always percentages of the day column (timed) or the
/// week row (bars). Vertical values are `hour_height` units per hour and
/// `row_height` units per bar row; the defaults yield percentages of the day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical units per hour.
    pub hour_height: f64,

    /// Vertical units per bar row.
    pub row_height: f64,

    /// First visible hour of the time grid.
    pub day_start_hour: f64,

    /// Last visible hour of the time grid.
    pub day_end_hour: f64,

    /// Mirror horizontal placement for right-to-left locales.
    pub rtl: bool,

    /// Gap subtracted from the width of every timed segment, in percent.
    pub margin_between_percent: f64,

    /// Floor for the width of a timed segment, in percent.
    pub min_column_width_percent: f64,

    /// Horizontal offset per nesting level, in percent.
    pub indent_step_percent: f64,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            hour_height: 100.0 / HOURS_PER_DAY,
            row_height: 1.0,
            day_start_hour: 0.0,
            day_end_hour: HOURS_PER_DAY,
            rtl: false,
            margin_between_percent: 1.0,
            min_column_width_percent: 10.0,
            indent_step_percent: 8.0,
        }
    }
}

/// Placement instructions for one segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize)]
pub struct Geometry {
    /// Horizontal offset, 0 to 100.
    pub left_percent: f64,

    /// Horizontal extent, 0 to 100.
    pub width_percent: f64,

    /// Vertical offset in projection units.
    pub top: f64,

    /// Vertical extent in projection units.
    pub height: f64,
}

impl Geometry {
    fn mirrored(self, rtl: bool) -> Self {
        if rtl {
            Self {
                left_percent: 100.0 - self.left_percent - self.width_percent,
                ..self
            }
        } else {
            self
        }
    }
}

/// Projects a timed segment of a day column.
///
/// The segment is drawn over `visual_span` of `visual_count` columns, shifted
/// right by one indent step per nesting level and narrowed by the margin. The
/// width never drops below the configured minimum, and the segment is kept
/// inside the day column.
#[must_use]
pub fn project_timed(
    placement: &Placement,
    start_hour: f64,
    end_hour: f64,
    projection: &Projection,
) -> Geometry {
    let column_width = 100.0 / placement.visual_count.max(1) as f64;
    let indent = placement.nest_depth as f64 * projection.indent_step_percent;

    let width = (placement.visual_span.max(1) as f64 * column_width
        - indent
        - projection.margin_between_percent)
        .max(projection.min_column_width_percent)
        .min(100.0);
    let left = (placement.visual_column as f64 * column_width + indent)
        .min(100.0 - width)
        .max(0.0);

    let clamp = |hour: f64| hour.clamp(projection.day_start_hour, projection.day_end_hour);
    let top = clamp(start_hour);
    let bottom = clamp(end_hour).max(top);

    Geometry {
        left_percent: left,
        width_percent: width,
        top: (top - projection.day_start_hour) * projection.hour_height,
        height: (bottom - top) * projection.hour_height,
    }
    .mirrored(projection.rtl)
}

/// Projects a bar covering `start_day..=end_day` of a row of `days_in_row` days.
#[must_use]
pub fn project_bar(
    row: usize,
    start_day: usize,
    end_day: usize,
    days_in_row: usize,
    projection: &Projection,
) -> Geometry {
    let day_width = 100.0 / days_in_row.max(1) as f64;
    let days = end_day.saturating_sub(start_day) + 1;

    Geometry {
        left_percent: start_day as f64 * day_width,
        width_percent: days as f64 * day_width,
        top: row as f64 * projection.row_height,
        height: projection.row_height,
    }
    .mirrored(projection.rtl)
}
