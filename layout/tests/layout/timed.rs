// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Timed column layout across days and weeks.

use aimcal_layout::{
    Event, EventTime, LayoutError, SegmentPosition, ViewWindow, compute_day_layout,
    compute_view, compute_week_layout,
};

use crate::common::{
    MONDAY, TestConfigBuilder, WEDNESDAY, assert_close, assert_column_minimality,
    assert_no_column_collisions, assert_no_visual_collisions, assert_within_day_column,
    busy_day, day, spanning_event, test_config, timed_event,
};

#[test]
fn busy_days_hold_layout_invariants() {
    for seed in 1..=8 {
        // Arrange
        let events = busy_day(WEDNESDAY, 40, seed);

        // Act
        let out = compute_day_layout(&events, WEDNESDAY, &test_config()).unwrap();

        // Assert
        assert_eq!(out.layout.len(), events.len(), "seed {seed}");
        assert_no_column_collisions(&out.layout);
        assert_no_visual_collisions(&out.layout, &test_config());
        assert_column_minimality(&out.layout);
        assert_within_day_column(&out.layout);
    }
}

#[test]
fn busy_days_hold_invariants_without_nesting() {
    let config = TestConfigBuilder::new().with_nested_threshold(0).build();
    for seed in 11..=14 {
        let events = busy_day(WEDNESDAY, 30, seed);
        let out = compute_day_layout(&events, WEDNESDAY, &config).unwrap();
        assert!(out.layout.values().all(|e| e.nest_depth == 0));
        assert_no_column_collisions(&out.layout);
        assert_no_visual_collisions(&out.layout, &config);
        assert_column_minimality(&out.layout);
        assert_within_day_column(&out.layout);
    }
}

#[test]
fn overnight_event_splits_at_midnight() {
    // Arrange
    let events = [spanning_event(
        "night-shift",
        (day(MONDAY, 1), 22, 0),
        (day(MONDAY, 2), 6, 0),
    )];

    // Act
    let out = compute_week_layout(&events, MONDAY, 7, &test_config()).unwrap();

    // Assert
    let first = &out.layout[&1]["night-shift"];
    assert_close(first.start_offset, 22.0);
    assert_close(first.end_offset, 24.0);
    assert_eq!(first.position, SegmentPosition::First);

    let last = &out.layout[&2]["night-shift"];
    assert_close(last.start_offset, 0.0);
    assert_close(last.end_offset, 6.0);
    assert_eq!(last.position, SegmentPosition::Last);

    assert!(out.layout[&3].is_empty());
}

#[test]
fn event_ending_at_midnight_stays_on_its_day() {
    let events = [spanning_event(
        "late",
        (WEDNESDAY, 22, 0),
        (day(WEDNESDAY, 1), 0, 0),
    )];

    let out = compute_week_layout(&events, MONDAY, 7, &test_config()).unwrap();

    assert_eq!(out.layout[&2]["late"].position, SegmentPosition::Single);
    assert_close(out.layout[&2]["late"].end_offset, 24.0);
    assert!(out.layout[&3].is_empty());
}

#[test]
fn zero_duration_event_is_visible() {
    let at = WEDNESDAY.at(12, 0, 0, 0);
    let events = [Event::new("reminder", at, at)];

    let out = compute_day_layout(&events, WEDNESDAY, &test_config()).unwrap();

    let entry = &out.layout["reminder"];
    assert_close(entry.end_offset - entry.start_offset, 0.25);
    assert!(entry.height > 0.0);
}

#[test]
fn inverted_event_is_clamped_and_reported() {
    let events = [
        timed_event("inverted", WEDNESDAY, (11, 0), (10, 0)),
        timed_event("ok", WEDNESDAY, (9, 0), (10, 0)),
    ];

    let out = compute_day_layout(&events, WEDNESDAY, &test_config()).unwrap();

    assert_eq!(out.layout.len(), 2);
    assert_close(out.layout["inverted"].start_offset, 11.0);
    assert_eq!(out.diagnostics.warnings.len(), 1);
    assert!(out.diagnostics.skipped.is_empty());
}

#[test]
fn bad_events_do_not_blank_the_day() {
    // Arrange
    let mut events = busy_day(WEDNESDAY, 10, 3);
    events.push(Event::new("garbled", "yesterday-ish", "2025-01-15T10:00:00"));
    events.push(Event {
        id: "  ".into(),
        ..timed_event("x", WEDNESDAY, (9, 0), (10, 0))
    });
    events.push(Event::new("overflow", EventTime::EpochMillis(i64::MAX), "2025-01-15"));

    // Act
    let out = compute_day_layout(&events, WEDNESDAY, &test_config()).unwrap();

    // Assert
    assert_eq!(out.layout.len(), 10);
    assert_eq!(out.diagnostics.skipped.len(), 3);
    assert_eq!(
        out.diagnostics.skipped_ids().collect::<Vec<_>>(),
        vec!["garbled", "overflow"]
    );
    assert!(matches!(
        out.diagnostics.skipped[0].error,
        LayoutError::InvalidTemporalValue { .. }
    ));
    assert!(matches!(
        out.diagnostics.skipped[1].error,
        LayoutError::MalformedEvent { id: None, .. }
    ));
}

#[test]
fn converts_into_view_time_zone() {
    // 23:30 UTC is 07:30 the next day in Shanghai.
    let events = [Event::new(
        "call",
        "2025-01-14T23:30:00Z",
        "2025-01-15T00:30:00Z",
    )];
    let config = TestConfigBuilder::new()
        .with_time_zone("Asia/Shanghai")
        .build();

    let out = compute_week_layout(&events, MONDAY, 7, &config).unwrap();

    assert!(out.layout[&1].is_empty());
    let entry = &out.layout[&2]["call"];
    assert_close(entry.start_offset, 7.5);
    assert_close(entry.end_offset, 8.5);
}

#[test]
fn floating_times_ignore_view_time_zone() {
    let events = [timed_event("local", WEDNESDAY, (9, 0), (10, 0))];
    let config = TestConfigBuilder::new()
        .with_time_zone("America/New_York")
        .build();

    let out = compute_day_layout(&events, WEDNESDAY, &config).unwrap();

    assert_close(out.layout["local"].start_offset, 9.0);
}

#[test]
fn nests_brief_overlaps() {
    // Arrange: "wrap-up" starts 50 minutes into "review" and overlaps it for 10.
    let events = [
        timed_event("review", WEDNESDAY, (9, 0), (10, 0)),
        timed_event("wrap-up", WEDNESDAY, (9, 50), (10, 30)),
    ];

    // Act
    let out = compute_day_layout(&events, WEDNESDAY, &test_config()).unwrap();

    // Assert
    let review = &out.layout["review"];
    let wrap_up = &out.layout["wrap-up"];
    assert_eq!(wrap_up.nest_depth, 1);
    assert_ne!(review.column, wrap_up.column);
    assert_close(review.width_percent, 99.0);
    assert_close(wrap_up.left_percent, 8.0);
    assert_close(wrap_up.width_percent, 91.0);
    assert!(wrap_up.z_index > review.z_index);
}

#[test]
fn nested_event_is_not_covered_by_later_events() {
    // Arrange: "wrap-up" nests on "review"; "sync" starts when "review" ends.
    let events = [
        timed_event("review", WEDNESDAY, (9, 0), (10, 0)),
        timed_event("wrap-up", WEDNESDAY, (9, 50), (11, 0)),
        timed_event("sync", WEDNESDAY, (10, 0), (10, 30)),
    ];

    // Act
    let out = compute_day_layout(&events, WEDNESDAY, &test_config()).unwrap();

    // Assert
    let wrap_up = &out.layout["wrap-up"];
    let sync = &out.layout["sync"];
    assert_eq!(wrap_up.nest_depth, 1);
    assert_eq!(sync.nest_depth, 0);
    assert_close(wrap_up.left_percent, 8.0);
    assert_close(wrap_up.width_percent, 41.0);
    assert_close(sync.left_percent, 50.0);
    assert_close(sync.width_percent, 49.0);
    assert_no_visual_collisions(&out.layout, &test_config());
}

#[test]
fn column_count_is_local_along_a_chain() {
    let events = [
        timed_event("a", WEDNESDAY, (9, 0), (10, 0)),
        timed_event("b", WEDNESDAY, (9, 0), (10, 0)),
        timed_event("c", WEDNESDAY, (9, 30), (10, 30)),
        timed_event("d", WEDNESDAY, (10, 15), (11, 0)),
        timed_event("e", WEDNESDAY, (10, 45), (12, 0)),
    ];
    let config = TestConfigBuilder::new().with_nested_threshold(0).build();

    let out = compute_day_layout(&events, WEDNESDAY, &config).unwrap();

    let e = &out.layout["e"];
    assert_eq!((e.column, e.column_count, e.column_span), (1, 2, 1));
    assert_eq!(out.layout["d"].column_count, 3);
    assert_column_minimality(&out.layout);
    assert_no_visual_collisions(&out.layout, &config);
}

#[test]
fn active_event_is_on_top() {
    let events = [
        timed_event("a", WEDNESDAY, (9, 0), (11, 0)),
        timed_event("b", WEDNESDAY, (9, 15), (10, 0)),
        timed_event("c", WEDNESDAY, (9, 30), (10, 30)),
    ];
    let config = TestConfigBuilder::new().with_active_event("a").build();

    let out = compute_day_layout(&events, WEDNESDAY, &config).unwrap();

    let top = out.layout.values().map(|e| e.z_index).max().unwrap();
    assert_eq!(out.layout["a"].z_index, top);
    assert!(out.layout.values().filter(|e| e.z_index == top).count() == 1);
}

#[test]
fn multi_day_timed_events_can_become_bars() {
    let events = [
        spanning_event("conference", (MONDAY, 9, 0), (day(MONDAY, 2), 17, 0)),
        timed_event("lunch", MONDAY, (12, 0), (13, 0)),
    ];
    let config = TestConfigBuilder::new().with_multi_day_as_all_day().build();
    let window = ViewWindow::week(MONDAY, 7, 1).unwrap();

    let out = compute_view(&events, &window, &config).unwrap();

    assert_eq!(out.layout.timed[&0].len(), 1);
    assert!(out.layout.timed[&0].contains_key("lunch"));
    assert_eq!(out.layout.bars.len(), 1);
    assert_eq!(out.layout.bars[0].segment.event_id, "conference");
    assert_eq!(out.layout.bars[0].segment.end_day_index, 2);
}

#[test]
fn visible_hours_scale_geometry() {
    let events = [timed_event("a", WEDNESDAY, (9, 0), (12, 0))];
    let out = compute_day_layout(&events, WEDNESDAY, &test_config()).unwrap();

    let entry = &out.layout["a"];
    assert_close(entry.top, 9.0 * 100.0 / 24.0);
    assert_close(entry.height, 12.5);
}
