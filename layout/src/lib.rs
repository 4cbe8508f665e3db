// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Event layout engine for AIM calendar views.
//!
//! Turns a set of calendar events and a view window into placement
//! instructions for rendering:
//!
//! - timed events are split per day and packed into side-by-side columns,
//! - all-day and multi-day events become bars stacked into rows per week,
//! - month and year grids show every event as a bar, with overflow counts.
//!
//! Every entry point is a pure function of its inputs. Problems with single
//! events never abort a pass; they are collected into [`Diagnostics`] next to
//! the best-effort layout. [`LayoutCache`] memoizes view layouts for hosts that
//! re-render often.
//!
//! ```
//! use aimcal_layout::{Event, LayoutConfig, compute_day_layout};
//! use jiff::civil::{date, datetime};
//!
//! let events = [
//!     Event::new("a", datetime(2025, 1, 15, 9, 0, 0, 0), datetime(2025, 1, 15, 10, 0, 0, 0)),
//!     Event::new("b", datetime(2025, 1, 15, 9, 0, 0, 0), datetime(2025, 1, 15, 10, 0, 0, 0)),
//! ];
//! let out = compute_day_layout(&events, date(2025, 1, 15), &LayoutConfig::default()).unwrap();
//! assert_eq!(out.layout["a"].column_count, 2);
//! assert!(out.diagnostics.is_clean());
//! ```

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
// Allow certain clippy lints that are too restrictive for this crate
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::single_match_else
)]

mod cache;
mod collision;
mod config;
mod datetime;
mod engine;
mod error;
mod event;
mod geometry;
mod segment;
mod window;

pub use crate::cache::{LayoutCache, SharedLayout};
pub use crate::collision::{BarItem, NestingRule, Placement, TimedItem, pack_timed, stack_rows};
pub use crate::config::{ConfigDuration, EndPolicy, LayoutConfig};
pub use crate::datetime::{
    EventTime, LooseDateTime, Moment, date_from_day_number, day_number, extract_hour_of_day,
    is_all_day_equivalent, normalize, week_start_of,
};
pub use crate::engine::{
    BarEntry, GridRows, LayoutEntry, ViewLayout, WeekLayout, compute_all_day_rows,
    compute_day_layout, compute_grid_rows, compute_view, compute_week_layout,
};
pub use crate::error::{Computed, Diagnostics, LayoutError, LayoutWarning, SkippedEvent};
pub use crate::event::Event;
pub use crate::geometry::{Geometry, Projection, project_bar, project_timed};
pub use crate::segment::{Segment, SegmentPosition, segment_for_window, segment_multi_day_event};
pub use crate::window::{DAYS_PER_WEEK, ViewKind, ViewWindow};
