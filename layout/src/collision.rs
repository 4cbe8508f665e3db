// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Overlap resolution: column packing for timed segments of one day and row
//! stacking for all-day bars of one week row.
//!
//! Both algorithms are pure and deterministic. The input order never matters,
//! every tie is broken by event id.

#![allow(clippy::indexing_slicing)]

use std::cmp::Ordering;

use crate::datetime::Moment;

/// A timed interval of one day, in fractional hours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedItem<'a> {
    /// Event id, the final tie-breaker.
    pub id: &'a str,

    /// Start hour within the day.
    pub start: f64,

    /// End hour within the day, exclusive.
    pub end: f64,
}

impl TimedItem<'_> {
    fn overlaps(&self, other: &TimedItem<'_>) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Thresholds of the short-overlap nesting heuristic, in hours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NestingRule {
    /// Events starting at most this long after an overlapping event are never nested.
    pub parallel_hours: f64,

    /// Events overlapping a predecessor by this long or more are never nested.
    pub nested_hours: f64,
}

impl NestingRule {
    /// A rule under which nothing nests.
    pub const DISABLED: NestingRule = NestingRule {
        parallel_hours: 0.0,
        nested_hours: 0.0,
    };
}

/// Column assignment of one timed segment.
///
/// `column`, `column_count` and `column_span` describe the structural packing.
/// Overlapping segments always get different columns, and the number of
/// columns used equals the largest set of mutually overlapping segments.
/// `column_count` is local. It is one more than the highest column of any
/// segment overlapping this one in time, so a segment away from the busy part
/// of a chain reports fewer columns than its neighbours.
///
/// The `visual_*` fields are what gets drawn. They count columns over the whole
/// overlap cluster, so neighbours with different local counts never cover each
/// other. A nested segment is drawn in the visual column of its anchor, and
/// that column stays reserved until the last segment nested on it has ended.
/// Extending a segment over free columns to its right (`column_span`,
/// `visual_span`) goes beyond the plain `100 / column_count` width rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Placement {
    /// Structural column index.
    pub column: usize,

    /// One more than the highest column among segments overlapping this one.
    pub column_count: usize,

    /// Adjacent columns within `column_count` this segment can extend over, at
    /// least one.
    pub column_span: usize,

    /// Nesting level, 0 for segments laid out side by side.
    pub nest_depth: usize,

    /// Column drawn, shared with the anchor for nested segments.
    pub visual_column: usize,

    /// Columns drawn in the overlap cluster.
    pub visual_count: usize,

    /// Columns drawn for this segment.
    pub visual_span: usize,

    /// Stacking order, 1-based; later segments are drawn on top.
    pub z_index: usize,
}

/// Packs the timed segments of one day into columns.
///
/// Segments are sorted by start ascending, end descending, then id, and placed
/// greedily into the first column free at their start. The result is indexed
/// like `items`.
pub fn pack_timed(items: &[TimedItem<'_>], rule: NestingRule) -> Vec<Placement> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| compare_timed(&items[a], &items[b]));

    let columns = assign_columns(items, &order);
    let local = local_columns(items, &order, &columns);

    let mut depth = vec![0; items.len()];
    let mut anchor: Vec<Option<usize>> = vec![None; items.len()];
    if rule.nested_hours > 0.0 {
        for (rank, &i) in order.iter().enumerate() {
            if let Some(parent) = nesting_parent(items, &order[..rank], i, rule, &depth) {
                depth[i] = depth[parent] + 1;
                anchor[i] = Some(anchor[parent].unwrap_or(parent));
            }
        }
    }

    // An anchor holds its visual column until everything nested on it ends.
    let mut reach = items.to_vec();
    for (i, root) in anchor.iter().enumerate() {
        if let Some(root) = *root {
            reach[root].end = reach[root].end.max(items[i].end);
        }
    }
    let roots: Vec<usize> = order.iter().copied().filter(|&i| anchor[i].is_none()).collect();
    let visual_columns = assign_columns(&reach, &roots);
    let visual = cluster_columns(&reach, &roots, &visual_columns);

    let mut placements = vec![Placement::default(); items.len()];
    for (rank, &i) in order.iter().enumerate() {
        let root = anchor[i].unwrap_or(i);
        placements[i] = Placement {
            column: columns[i],
            column_count: local[i].count,
            column_span: local[i].span,
            nest_depth: depth[i],
            visual_column: visual_columns[root],
            visual_count: visual[root].count,
            visual_span: visual[root].span,
            z_index: rank + 1,
        };
    }
    placements
}

fn compare_timed(a: &TimedItem<'_>, b: &TimedItem<'_>) -> Ordering {
    a.start
        .total_cmp(&b.start)
        .then_with(|| b.end.total_cmp(&a.end))
        .then_with(|| a.id.cmp(b.id))
}

/// The predecessor a segment nests on, if it only briefly overlaps all of them.
fn nesting_parent(
    items: &[TimedItem<'_>],
    earlier: &[usize],
    i: usize,
    rule: NestingRule,
    depth: &[usize],
) -> Option<usize> {
    let item = &items[i];
    let mut parent: Option<usize> = None;
    for &p in earlier.iter().filter(|&&p| items[p].overlaps(item)) {
        let prev = &items[p];
        let gap = item.start - prev.start;
        let overlap = prev.end.min(item.end) - item.start;
        if gap <= rule.parallel_hours || overlap >= rule.nested_hours {
            return None;
        }

        let deeper = parent.is_none_or(|q| {
            (depth[p], prev.start, items[q].id) >= (depth[q], items[q].start, prev.id)
        });
        if deeper {
            parent = Some(p);
        }
    }
    parent
}

#[derive(Debug, Clone, Copy, Default)]
struct Columns {
    count: usize,
    span: usize,
}

/// Greedy first-fit over the given items in order; other items stay in column 0.
fn assign_columns(items: &[TimedItem<'_>], order: &[usize]) -> Vec<usize> {
    let mut out = vec![0; items.len()];
    let mut column_ends: Vec<f64> = Vec::new();
    for &i in order {
        let item = &items[i];
        out[i] = match column_ends.iter().position(|&end| end <= item.start) {
            Some(column) => {
                column_ends[column] = item.end;
                column
            }
            None => {
                column_ends.push(item.end);
                column_ends.len() - 1
            }
        };
    }
    out
}

/// Counts and spans over the segments overlapping each segment in time.
fn local_columns(items: &[TimedItem<'_>], order: &[usize], columns: &[usize]) -> Vec<Columns> {
    let mut out = vec![Columns::default(); items.len()];
    for &i in order {
        let neighbours: Vec<usize> = order
            .iter()
            .copied()
            .filter(|&j| j != i && items[j].overlaps(&items[i]))
            .collect();
        let count = neighbours
            .iter()
            .map(|&j| columns[j])
            .chain([columns[i]])
            .max()
            .unwrap_or(0)
            + 1;
        let blocked = |c: usize| neighbours.iter().any(|&j| columns[j] == c);
        out[i] = Columns {
            count,
            span: 1 + (columns[i] + 1..count).take_while(|&c| !blocked(c)).count(),
        };
    }
    out
}

/// Counts and spans over whole overlap clusters.
///
/// Clusters are maximal runs connected by overlap; `order` is sorted by start.
fn cluster_columns(items: &[TimedItem<'_>], order: &[usize], columns: &[usize]) -> Vec<Columns> {
    let mut out = vec![Columns::default(); items.len()];
    let mut cluster: Vec<usize> = Vec::new();
    let mut cluster_end = f64::NEG_INFINITY;
    for &i in order {
        if !cluster.is_empty() && items[i].start >= cluster_end {
            finish_cluster(items, &cluster, columns, &mut out);
            cluster.clear();
        }
        cluster_end = if cluster.is_empty() {
            items[i].end
        } else {
            cluster_end.max(items[i].end)
        };
        cluster.push(i);
    }
    finish_cluster(items, &cluster, columns, &mut out);
    out
}

fn finish_cluster(
    items: &[TimedItem<'_>],
    cluster: &[usize],
    columns: &[usize],
    out: &mut [Columns],
) {
    let count = cluster.iter().map(|&i| columns[i] + 1).max().unwrap_or(1);
    for &i in cluster {
        let blocked = |c: usize| {
            cluster
                .iter()
                .any(|&j| columns[j] == c && items[j].overlaps(&items[i]))
        };
        out[i] = Columns {
            count,
            span: 1 + (columns[i] + 1..count).take_while(|&c| !blocked(c)).count(),
        };
    }
}

/// A bar of one week row, by day index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarItem<'a> {
    /// Event id, the final tie-breaker.
    pub id: &'a str,

    /// First covered day index, inclusive.
    pub start_day: usize,

    /// Last covered day index, inclusive.
    pub end_day: usize,

    /// Start of the whole event.
    pub event_start: Moment,

    /// Days covered by the whole event.
    pub event_days: usize,
}

/// Stacks bars into rows: earlier events first, longer events first on ties.
///
/// Each bar takes the lowest row free over all of its days. The result is
/// indexed like `items`.
pub fn stack_rows(items: &[BarItem<'_>]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| {
        let (a, b) = (&items[a], &items[b]);
        a.event_start
            .cmp(&b.event_start)
            .then_with(|| b.event_days.cmp(&a.event_days))
            .then_with(|| a.id.cmp(b.id))
    });

    let mut rows: Vec<Vec<(usize, usize)>> = Vec::new();
    let mut out = vec![0; items.len()];
    for i in order {
        let item = &items[i];
        let free = |row: &Vec<(usize, usize)>| {
            row.iter()
                .all(|&(from, to)| item.end_day < from || to < item.start_day)
        };
        let row = match rows.iter().position(free) {
            Some(row) => row,
            None => {
                rows.push(Vec::new());
                rows.len() - 1
            }
        };
        rows[row].push((item.start_day, item.end_day));
        out[i] = row;
    }
    out
}
