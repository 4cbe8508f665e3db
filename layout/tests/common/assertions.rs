// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Custom assertion helpers for integration tests.
//!
//! This module provides checks for the invariants every layout must hold,
//! independent of the concrete input.

use std::collections::BTreeMap;

use aimcal_layout::{LayoutConfig, LayoutEntry, Segment};

const EPSILON: f64 = 1e-9;

/// Asserts that two floating point values are equal up to rounding.
///
/// # Panics
///
/// Panics if the values differ by more than a tiny epsilon.
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "expected {expected}, got {actual}"
    );
}

fn overlaps(a: &LayoutEntry, b: &LayoutEntry) -> bool {
    a.start_offset < b.end_offset && b.start_offset < a.end_offset
}

/// Asserts that no two overlapping entries of a day share a column.
///
/// # Panics
///
/// Panics if two overlapping entries have the same structural column.
pub fn assert_no_column_collisions(day: &BTreeMap<String, LayoutEntry>) {
    let entries: Vec<_> = day.values().collect();
    for (i, a) in entries.iter().enumerate() {
        for b in entries.iter().skip(i + 1) {
            if overlaps(a, b) {
                assert_ne!(
                    a.column, b.column,
                    "'{}' and '{}' overlap but share column {}",
                    a.event_id, b.event_id, a.column
                );
            }
        }
    }
}

/// Asserts that entries overlapping in time are drawn side by side.
///
/// Two kinds of pairs may share horizontal space: a nested entry with an
/// earlier entry it overlaps for less than the nesting threshold, and entries
/// held at the minimum width.
///
/// # Panics
///
/// Panics if any other pair of overlapping entries covers the same part of
/// the day column.
pub fn assert_no_visual_collisions(day: &BTreeMap<String, LayoutEntry>, config: &LayoutConfig) {
    let nested_hours = config.nested_threshold.hours();
    let floored =
        |e: &LayoutEntry| (e.width_percent - config.min_column_width_percent).abs() < EPSILON;

    let mut entries: Vec<_> = day.values().collect();
    entries.sort_by(|a, b| {
        a.start_offset
            .total_cmp(&b.start_offset)
            .then_with(|| b.end_offset.total_cmp(&a.end_offset))
            .then_with(|| a.event_id.cmp(&b.event_id))
    });
    for (i, a) in entries.iter().enumerate() {
        for b in entries.iter().skip(i + 1) {
            if !overlaps(a, b) || floored(a) || floored(b) {
                continue;
            }
            let overlap = a.end_offset.min(b.end_offset) - b.start_offset;
            if b.nest_depth > 0 && overlap < nested_hours {
                continue;
            }
            let apart = a.left_percent + a.width_percent <= b.left_percent + EPSILON
                || b.left_percent + b.width_percent <= a.left_percent + EPSILON;
            assert!(
                apart,
                "'{}' ({}..{}) and '{}' ({}..{}) are drawn over each other",
                a.event_id,
                a.left_percent,
                a.left_percent + a.width_percent,
                b.event_id,
                b.left_percent,
                b.left_percent + b.width_percent,
            );
        }
    }
}

/// Asserts that a day uses exactly as many columns as its largest set of
/// mutually overlapping entries.
///
/// # Panics
///
/// Panics if the day uses more or fewer columns than necessary.
pub fn assert_column_minimality(day: &BTreeMap<String, LayoutEntry>) {
    let clique = day
        .values()
        .map(|a| {
            day.values()
                .filter(|b| b.start_offset <= a.start_offset && a.start_offset < b.end_offset)
                .count()
        })
        .max()
        .unwrap_or(0);
    let used = day.values().map(|e| e.column + 1).max().unwrap_or(0);
    assert_eq!(used, clique, "column count is not minimal");

    for entry in day.values() {
        assert!(
            entry.column < entry.column_count,
            "'{}' is outside its cluster",
            entry.event_id
        );
        assert!(entry.column + entry.column_span <= entry.column_count);
    }
}

/// Asserts that every entry is drawn inside its day column.
///
/// # Panics
///
/// Panics if an entry has a negative offset, spills over the right edge, or
/// has a non-positive width.
pub fn assert_within_day_column(day: &BTreeMap<String, LayoutEntry>) {
    for entry in day.values() {
        assert!(entry.left_percent >= -EPSILON, "{entry:?}");
        assert!(entry.width_percent > 0.0, "{entry:?}");
        assert!(
            entry.left_percent + entry.width_percent <= 100.0 + EPSILON,
            "{entry:?}"
        );
        assert!(entry.start_offset >= 0.0 && entry.end_offset <= 24.0, "{entry:?}");
    }
}

/// Asserts that bars sharing a week row and a stacking row never share a day.
///
/// # Panics
///
/// Panics if a bar has no row, or two bars collide.
pub fn assert_rows_disjoint(bars: &[Segment]) {
    for (i, a) in bars.iter().enumerate() {
        assert!(a.row.is_some(), "'{}' has no row", a.event_id);
        for b in bars.iter().skip(i + 1) {
            if a.slice_index == b.slice_index && a.row == b.row {
                assert!(
                    a.end_day_index < b.start_day_index || b.end_day_index < a.start_day_index,
                    "'{}' and '{}' collide in row {:?}",
                    a.event_id,
                    b.event_id,
                    a.row
                );
            }
        }
    }
}
