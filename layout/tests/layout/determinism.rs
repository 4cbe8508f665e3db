// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Layouts must not depend on the order events are handed over in.

use aimcal_layout::{Event, ViewWindow, compute_view, compute_week_layout};
use jiff::civil::date;

use crate::common::{
    MONDAY, WEDNESDAY, all_day_event, busy_day, day, spanning_event, test_config,
};

fn mixed_week() -> Vec<Event> {
    let mut events = busy_day(MONDAY, 15, 21);
    events.extend(busy_day(WEDNESDAY, 15, 22));
    events.push(spanning_event("overnight", (MONDAY, 20, 0), (day(MONDAY, 1), 8, 0)));
    events.push(all_day_event("off-1", MONDAY, day(MONDAY, 3)));
    events.push(all_day_event("off-2", MONDAY, day(MONDAY, 3)));
    events.push(all_day_event("off-3", day(MONDAY, 2), day(MONDAY, 9)));
    events
}

/// Rotates and interleaves the input, keeping the same set of events.
fn shuffled(events: &[Event], step: usize) -> Vec<Event> {
    let n = events.len();
    (0..n).map(|i| events[(i * step + 3) % n].clone()).collect()
}

#[test]
fn week_layout_is_independent_of_input_order() {
    // Arrange
    let events = mixed_week();
    let config = test_config();
    let expected = compute_week_layout(&events, MONDAY, 7, &config).unwrap();
    let expected = serde_json::to_string(&expected.layout).unwrap();

    for step in [1, 7, 11, 13] {
        // Act
        let reordered = shuffled(&events, step);
        let actual = compute_week_layout(&reordered, MONDAY, 7, &config).unwrap();

        // Assert
        assert_eq!(serde_json::to_string(&actual.layout).unwrap(), expected);
    }
}

#[test]
fn view_layout_is_byte_identical_across_runs() {
    let events = mixed_week();
    let config = test_config();
    let window = ViewWindow::week(WEDNESDAY, 7, 1).unwrap();

    let a = compute_view(&events, &window, &config).unwrap();
    let b = compute_view(&events.iter().rev().cloned().collect::<Vec<_>>(), &window, &config)
        .unwrap();

    assert_eq!(
        serde_json::to_string(&a.layout).unwrap(),
        serde_json::to_string(&b.layout).unwrap()
    );
}

#[test]
fn month_grid_is_independent_of_input_order() {
    let events = mixed_week();
    let config = test_config();
    let window = ViewWindow::month(date(2025, 1, 1), 1).unwrap();

    let a = compute_view(&events, &window, &config).unwrap();
    let b = compute_view(&shuffled(&events, 7), &window, &config).unwrap();

    assert_eq!(
        serde_json::to_string(&a.layout).unwrap(),
        serde_json::to_string(&b.layout).unwrap()
    );
}
