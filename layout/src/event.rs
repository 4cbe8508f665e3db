// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;

use crate::config::{EndPolicy, ResolvedConfig};
use crate::datetime::{EventTime, Moment, is_all_day_equivalent, normalize};
use crate::error::{Diagnostics, LayoutError, LayoutWarning};

/// A calendar event as owned by the host application.
///
/// The engine only reads events; it never mutates them.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Event {
    /// Unique, stable identifier. Blank ids are rejected at layout time.
    #[serde(default)]
    pub id: String,

    /// The start of the event.
    pub start: EventTime,

    /// The end of the event.
    pub end: EventTime,

    /// Whether the event is an all-day event.
    #[serde(default, alias = "allDay")]
    pub all_day: bool,

    /// The owning calendar, only used to break ties; color is up to the renderer.
    #[serde(default, alias = "calendarId", skip_serializing_if = "Option::is_none")]
    pub calendar_id: Option<String>,
}

impl Event {
    /// Creates a timed event.
    pub fn new(id: impl Into<String>, start: impl Into<EventTime>, end: impl Into<EventTime>) -> Self {
        Self {
            id: id.into(),
            start: start.into(),
            end: end.into(),
            all_day: false,
            calendar_id: None,
        }
    }

    /// Creates an all-day event.
    pub fn all_day(
        id: impl Into<String>,
        start: impl Into<EventTime>,
        end: impl Into<EventTime>,
    ) -> Self {
        Self {
            all_day: true,
            ..Self::new(id, start, end)
        }
    }

    /// Sets the owning calendar.
    #[must_use]
    pub fn with_calendar(mut self, calendar_id: impl Into<String>) -> Self {
        self.calendar_id = Some(calendar_id.into());
        self
    }
}

/// An event with both boundaries normalized into the view timezone.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NormalizedEvent<'a> {
    pub id: &'a str,
    pub calendar_id: Option<&'a str>,
    pub start: Moment,
    pub end: Moment,
    pub all_day: bool,
    pub inverted: bool,
}

impl<'a> NormalizedEvent<'a> {
    /// Normalizes one event, clamping an inverted range to zero duration.
    pub fn from_event(event: &'a Event, config: &ResolvedConfig) -> Result<Self, LayoutError> {
        let id = event.id.trim();
        if id.is_empty() {
            return Err(LayoutError::malformed(None, "missing id"));
        }

        let start = normalize(&event.start, &config.tz)?;
        let end = normalize(&event.end, &config.tz)?;
        let inverted = end < start;

        let mut normalized = NormalizedEvent {
            id,
            calendar_id: event.calendar_id.as_deref(),
            start,
            end: if inverted { start } else { end },
            all_day: event.all_day || is_all_day_equivalent(&event.start, &event.end),
            inverted,
        };

        if !normalized.all_day && config.config.multi_day_timed_as_all_day {
            normalized.all_day = normalized.first_day() != normalized.last_day(config.config.end_policy);
        }

        Ok(normalized)
    }

    /// Absolute day number of the first day the event occupies.
    pub fn first_day(&self) -> i64 {
        self.start.day_number()
    }

    /// Absolute day number of the last day the event occupies, inclusive.
    ///
    /// All-day events ending at midnight follow the end policy. A timed event
    /// ending exactly at midnight does not occupy the following day.
    pub fn last_day(&self, policy: EndPolicy) -> i64 {
        let first = self.first_day();
        let end = self.end.day_number();
        let last = if self.all_day && self.end.is_start_of_day() {
            match policy {
                EndPolicy::Exclusive => end - 1,
                EndPolicy::Inclusive => end,
            }
        } else if self.end > self.start && self.end.is_start_of_day() {
            end - 1
        } else {
            end
        };
        last.max(first)
    }

    /// Ordering among events sharing an id; the smallest is laid out.
    fn precedence(&self) -> (Moment, Moment, bool, bool, Option<&'a str>) {
        (
            self.start,
            self.end,
            self.all_day,
            self.inverted,
            self.calendar_id,
        )
    }

    /// Number of days the event occupies.
    pub fn day_count(&self, policy: EndPolicy) -> usize {
        usize::try_from(self.last_day(policy) - self.first_day() + 1).unwrap_or(1)
    }
}

/// Normalizes a batch of events, isolating failures per event.
///
/// Invalid events are reported in the diagnostics and left out. Of several
/// events sharing an id, the one with the earliest boundaries is kept and the
/// others are reported, so the choice never depends on input order.
pub(crate) fn normalize_events<'a>(
    events: &'a [Event],
    config: &ResolvedConfig,
    diagnostics: &mut Diagnostics,
) -> Vec<NormalizedEvent<'a>> {
    let mut slots: HashMap<&str, usize> = HashMap::with_capacity(events.len());
    let mut out: Vec<NormalizedEvent<'a>> = Vec::with_capacity(events.len());
    for event in events {
        let id = Some(event.id.trim()).filter(|a| !a.is_empty());
        match NormalizedEvent::from_event(event, config) {
            Ok(normalized) => {
                let Some(&slot) = slots.get(normalized.id) else {
                    slots.insert(normalized.id, out.len());
                    out.push(normalized);
                    continue;
                };
                diagnostics.skip(id, LayoutError::malformed(id, "duplicate id"));
                if let Some(kept) = out
                    .get_mut(slot)
                    .filter(|kept| normalized.precedence() < kept.precedence())
                {
                    *kept = normalized;
                }
            }
            Err(err) => diagnostics.skip(id, err),
        }
    }

    for normalized in out.iter().filter(|n| n.inverted) {
        diagnostics.warn(LayoutWarning::InvertedRange {
            id: normalized.id.to_owned(),
        });
    }
    out
}
