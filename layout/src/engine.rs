// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use jiff::civil::Date;

use crate::collision::{BarItem, NestingRule, TimedItem, pack_timed, stack_rows};
use crate::config::ResolvedConfig;
use crate::event::{NormalizedEvent, normalize_events};
use crate::geometry::{Geometry, Projection, project_bar, project_timed};
use crate::segment::{Segment, SegmentPosition, bar_segments, day_segments};
use crate::window::ViewWindow;
use crate::{Computed, Diagnostics, Event, LayoutConfig, LayoutError};

/// Layout of one timed segment in a day column.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct LayoutEntry {
    /// Id of the source event.
    pub event_id: String,

    /// Window-relative day index.
    pub day_index: usize,

    /// Structural column, distinct for every pair of overlapping segments.
    pub column: usize,

    /// One more than the highest column among segments overlapping this one.
    pub column_count: usize,

    /// Adjacent columns within `column_count` this segment extends over.
    pub column_span: usize,

    /// Nesting level of a short overlap, 0 if laid out side by side.
    pub nest_depth: usize,

    /// Start within the day, in fractional hours.
    pub start_offset: f64,

    /// End within the day, in fractional hours.
    pub end_offset: f64,

    /// Horizontal offset, 0 to 100.
    pub left_percent: f64,

    /// Horizontal extent, 0 to 100.
    pub width_percent: f64,

    /// Vertical offset in projection units.
    pub top: f64,

    /// Vertical extent in projection units.
    pub height: f64,

    /// Stacking order; the active event is always on top.
    pub z_index: usize,

    /// Where the segment sits within its event.
    pub position: SegmentPosition,
}

/// Timed layout of a window: day index to event id to entry.
pub type WeekLayout = BTreeMap<usize, BTreeMap<String, LayoutEntry>>;

/// Bar rows of a month or year grid.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct GridRows {
    /// Every bar segment with its row, ordered by week row, row, then day.
    pub bars: Vec<Segment>,

    /// Row limit per week, if any.
    pub max_rows: Option<usize>,

    /// Number of bars beyond the row limit, per day index. Days without hidden
    /// bars are absent.
    pub overflow: BTreeMap<usize, usize>,
}

impl GridRows {
    /// Returns true if the bar is beyond the row limit and only counted in the overflow.
    #[must_use]
    pub fn is_hidden(&self, bar: &Segment) -> bool {
        match (bar.row, self.max_rows) {
            (Some(row), Some(max)) => row >= max,
            _ => false,
        }
    }

    /// Bars within the row limit.
    pub fn visible(&self) -> impl Iterator<Item = &Segment> {
        self.bars.iter().filter(|bar| !self.is_hidden(bar))
    }
}

/// A bar segment with its projected geometry.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct BarEntry {
    /// The segment, with its row.
    #[serde(flatten)]
    pub segment: Segment,

    /// Placement within its week row.
    #[serde(flatten)]
    pub geometry: Geometry,

    /// Beyond the row limit of a grid view.
    pub hidden: bool,
}

/// Complete layout of a view window.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ViewLayout {
    /// The window laid out.
    pub window: ViewWindow,

    /// Timed entries per day, empty for month and year grids.
    pub timed: WeekLayout,

    /// All-day bars; in month and year grids every event is a bar.
    pub bars: Vec<BarEntry>,

    /// Hidden bars per day index of a grid view.
    pub overflow: BTreeMap<usize, usize>,
}

/// Lays out the timed events of a single day.
///
/// All-day events are left to [`compute_all_day_rows`].
///
/// # Errors
///
/// Fails only for an invalid configuration; bad events are reported in the
/// diagnostics.
#[tracing::instrument(level = "debug", skip_all, fields(events = events.len(), %day))]
pub fn compute_day_layout(
    events: &[Event],
    day: Date,
    config: &LayoutConfig,
) -> Result<Computed<BTreeMap<String, LayoutEntry>>, LayoutError> {
    let pass = Pass::new(events, config)?;
    let mut days = pass.timed(&ViewWindow::day(day));
    let layout = days.remove(&0).unwrap_or_default();
    Ok(pass.finish(layout))
}

/// Lays out the timed events of `days_to_show` days from `week_start`.
///
/// Every day index of the window is present, days without events map to an
/// empty layout.
///
/// # Errors
///
/// Fails only for an invalid configuration; bad events are reported in the
/// diagnostics.
#[tracing::instrument(level = "debug", skip_all, fields(events = events.len(), %week_start, days_to_show))]
pub fn compute_week_layout(
    events: &[Event],
    week_start: Date,
    days_to_show: usize,
    config: &LayoutConfig,
) -> Result<Computed<WeekLayout>, LayoutError> {
    let pass = Pass::new(events, config)?;
    let layout = pass.timed(&ViewWindow::days(week_start, days_to_show));
    Ok(pass.finish(layout))
}

/// Stacks the all-day events of a window into rows.
///
/// Returns one bar per event and week row, each carrying its `row`.
///
/// # Errors
///
/// Fails only for an invalid configuration; bad events are reported in the
/// diagnostics.
#[tracing::instrument(level = "debug", skip_all, fields(events = events.len(), %window_start, window_length))]
pub fn compute_all_day_rows(
    events: &[Event],
    window_start: Date,
    window_length: usize,
    config: &LayoutConfig,
) -> Result<Computed<Vec<Segment>>, LayoutError> {
    let pass = Pass::new(events, config)?;
    let layout = pass.bars(&ViewWindow::days(window_start, window_length), |e| e.all_day);
    Ok(pass.finish(layout))
}

/// Lays out a month or year grid, where every event is shown as a bar.
///
/// With `max_grid_rows` set, bars beyond the limit stay in the result but are
/// counted per day in the overflow.
///
/// # Errors
///
/// Fails only for an invalid configuration; bad events are reported in the
/// diagnostics.
#[tracing::instrument(level = "debug", skip_all, fields(events = events.len(), ?window))]
pub fn compute_grid_rows(
    events: &[Event],
    window: &ViewWindow,
    config: &LayoutConfig,
) -> Result<Computed<GridRows>, LayoutError> {
    let pass = Pass::new(events, config)?;
    let layout = pass.grid(window);
    Ok(pass.finish(layout))
}

/// Computes the complete layout of a view window.
///
/// Day and week windows get timed columns plus all-day bars; month and year
/// windows get grid bars with overflow counts.
///
/// # Errors
///
/// Fails only for an invalid configuration; bad events are reported in the
/// diagnostics.
#[tracing::instrument(level = "debug", skip_all, fields(events = events.len(), ?window))]
pub fn compute_view(
    events: &[Event],
    window: &ViewWindow,
    config: &LayoutConfig,
) -> Result<Computed<ViewLayout>, LayoutError> {
    let pass = Pass::new(events, config)?;
    let projection = config.projection();
    let row_length = window.row_length();

    let (timed, grid) = if window.kind.has_time_grid() {
        let bars = pass.bars(window, |e| e.all_day);
        let grid = GridRows {
            bars,
            ..GridRows::default()
        };
        (pass.timed(window), grid)
    } else {
        (WeekLayout::new(), pass.grid(window))
    };

    let bars = grid
        .bars
        .iter()
        .map(|segment| {
            let row_first = segment.slice_index * row_length;
            BarEntry {
                geometry: project_bar(
                    segment.row.unwrap_or(0),
                    segment.start_day_index - row_first,
                    segment.end_day_index - row_first,
                    row_length,
                    &projection,
                ),
                hidden: grid.is_hidden(segment),
                segment: segment.clone(),
            }
        })
        .collect();

    let layout = ViewLayout {
        window: *window,
        timed,
        bars,
        overflow: grid.overflow,
    };
    Ok(pass.finish(layout))
}

/// State of one layout pass over a batch of events.
struct Pass<'a> {
    config: ResolvedConfig<'a>,
    events: Vec<NormalizedEvent<'a>>,
    diagnostics: Diagnostics,
}

impl<'a> Pass<'a> {
    fn new(events: &'a [Event], config: &'a LayoutConfig) -> Result<Self, LayoutError> {
        let config = config.resolve()?;
        let mut diagnostics = Diagnostics::default();
        let events = normalize_events(events, &config, &mut diagnostics);
        Ok(Self {
            config,
            events,
            diagnostics,
        })
    }

    fn finish<T>(self, layout: T) -> Computed<T> {
        tracing::debug!(
            events = self.events.len(),
            skipped = self.diagnostics.skipped.len(),
            warnings = self.diagnostics.warnings.len(),
            "layout computed"
        );
        Computed {
            layout,
            diagnostics: self.diagnostics,
        }
    }

    fn nesting_rule(&self) -> NestingRule {
        NestingRule {
            parallel_hours: self.config.parallel_hours,
            nested_hours: self.config.nested_hours,
        }
    }

    fn timed(&self, window: &ViewWindow) -> WeekLayout {
        let mut days: BTreeMap<usize, Vec<Segment>> =
            (0..window.length).map(|day| (day, Vec::new())).collect();
        for event in self.events.iter().filter(|e| !e.all_day) {
            for segment in day_segments(event, window, &self.config) {
                days.entry(segment.slice_index).or_default().push(segment);
            }
        }

        let rule = self.nesting_rule();
        let projection = self.config.config.projection();
        let active = self.config.config.active_event_id.as_deref();
        days.into_iter()
            .map(|(day, segments)| (day, layout_day(day, &segments, rule, &projection, active)))
            .collect()
    }

    fn bars(&self, window: &ViewWindow, include: impl Fn(&NormalizedEvent<'_>) -> bool) -> Vec<Segment> {
        let mut rows: BTreeMap<usize, Vec<Segment>> = BTreeMap::new();
        for event in self.events.iter().filter(|e| include(e)) {
            for segment in bar_segments(event, window, &self.config) {
                rows.entry(segment.slice_index).or_default().push(segment);
            }
        }

        let mut out = Vec::new();
        for mut segments in rows.into_values() {
            let items: Vec<_> = segments
                .iter()
                .map(|s| BarItem {
                    id: &s.event_id,
                    start_day: s.start_day_index,
                    end_day: s.end_day_index,
                    event_start: s.event_start,
                    event_days: s.event_days,
                })
                .collect();
            let stacked = stack_rows(&items);
            for (segment, row) in segments.iter_mut().zip(stacked) {
                segment.row = Some(row);
            }

            segments.sort_by(|a, b| {
                a.row
                    .cmp(&b.row)
                    .then(a.start_day_index.cmp(&b.start_day_index))
                    .then_with(|| a.event_id.cmp(&b.event_id))
            });
            out.extend(segments);
        }
        out
    }

    fn grid(&self, window: &ViewWindow) -> GridRows {
        let bars = self.bars(window, |_| true);
        let max_rows = self.config.config.max_grid_rows;
        let mut grid = GridRows {
            bars,
            max_rows,
            overflow: BTreeMap::new(),
        };

        let mut overflow = BTreeMap::new();
        for bar in grid.bars.iter().filter(|bar| grid.is_hidden(bar)) {
            for day in bar.start_day_index..=bar.end_day_index {
                *overflow.entry(day).or_insert(0) += 1;
            }
        }
        grid.overflow = overflow;
        grid
    }
}

fn layout_day(
    day_index: usize,
    segments: &[Segment],
    rule: NestingRule,
    projection: &Projection,
    active: Option<&str>,
) -> BTreeMap<String, LayoutEntry> {
    let items: Vec<_> = segments
        .iter()
        .map(|s| TimedItem {
            id: &s.event_id,
            start: s.start_offset,
            end: s.end_offset,
        })
        .collect();
    let placements = pack_timed(&items, rule);

    let top = segments.len() + 1;
    segments
        .iter()
        .zip(placements)
        .map(|(segment, placement)| {
            let geometry = project_timed(
                &placement,
                segment.start_offset,
                segment.end_offset,
                projection,
            );
            let z_index = if active == Some(segment.event_id.as_str()) {
                top
            } else {
                placement.z_index
            };
            let entry = LayoutEntry {
                event_id: segment.event_id.clone(),
                day_index,
                column: placement.column,
                column_count: placement.column_count,
                column_span: placement.column_span,
                nest_depth: placement.nest_depth,
                start_offset: segment.start_offset,
                end_offset: segment.end_offset,
                left_percent: geometry.left_percent,
                width_percent: geometry.width_percent,
                top: geometry.top,
                height: geometry.height,
                z_index,
                position: segment.position,
            };
            (segment.event_id.clone(), entry)
        })
        .collect()
}
