// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::ResolvedConfig;
use crate::engine::{ViewLayout, compute_view};
use crate::event::NormalizedEvent;
use crate::window::ViewWindow;
use crate::{Computed, Event, LayoutConfig, LayoutError};

/// A cached layout, shared between readers.
pub type SharedLayout = Arc<Computed<ViewLayout>>;

/// Memoized view layouts over a mutable event set.
///
/// Readers get a shared, complete layout: a layout is computed outside the
/// lock and published in one step, so a reader sees either the previous or
/// the new result. Mutations bump a version stamp and drop only the windows
/// that can show the affected event.
#[derive(Debug)]
pub struct LayoutCache {
    state: RwLock<State>,
}

#[derive(Debug)]
struct State {
    events: Arc<Vec<Event>>,
    config: Arc<LayoutConfig>,
    version: u64,
    layouts: HashMap<ViewWindow, SharedLayout>,
}

/// The inputs of one computation, taken under the read lock.
#[derive(Debug, Clone)]
struct Snapshot {
    events: Arc<Vec<Event>>,
    config: Arc<LayoutConfig>,
    version: u64,
}

impl LayoutCache {
    /// Creates an empty cache.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid.
    pub fn new(config: LayoutConfig) -> Result<Self, LayoutError> {
        config.validate()?;
        Ok(Self {
            state: RwLock::new(State {
                events: Arc::new(Vec::new()),
                config: Arc::new(config),
                version: 0,
                layouts: HashMap::new(),
            }),
        })
    }

    /// The layout of a window, computed on first use.
    ///
    /// # Errors
    ///
    /// Fails only if the configuration is invalid, which [`LayoutCache::new`] and
    /// [`LayoutCache::set_config`] already rule out.
    pub fn get_layout(&self, window: &ViewWindow) -> Result<SharedLayout, LayoutError> {
        let snapshot = {
            let state = self.read();
            if let Some(layout) = state.layouts.get(window) {
                tracing::trace!(?window, "layout cache hit");
                return Ok(Arc::clone(layout));
            }
            state.snapshot()
        };

        tracing::debug!(?window, version = snapshot.version, "computing layout");
        let layout = Arc::new(compute_view(&snapshot.events, window, &snapshot.config)?);
        self.publish(*window, snapshot.version, &layout);
        Ok(layout)
    }

    /// Replaces the whole event set.
    pub fn set_events(&self, events: Vec<Event>) {
        let mut state = self.write();
        state.events = Arc::new(events);
        state.version += 1;
        state.layouts.clear();
    }

    /// Inserts an event, or replaces the first event with the same id.
    pub fn upsert_event(&self, event: Event) {
        let mut state = self.write();
        let id = event.id.trim().to_owned();

        // Every copy sharing the id can change which one is shown.
        let mut affected = state.sharing_id(&id);
        affected.push(event.clone());

        let events = Arc::make_mut(&mut state.events);
        match events.iter_mut().find(|e| e.id.trim() == id) {
            Some(slot) => *slot = event,
            None => events.push(event),
        }

        state.invalidate(&affected);
    }

    /// Removes the first event with the given id, returning it.
    pub fn remove_event(&self, id: &str) -> Option<Event> {
        let mut state = self.write();
        let id = id.trim();
        let affected = state.sharing_id(id);

        let events = Arc::make_mut(&mut state.events);
        let index = events.iter().position(|e| e.id.trim() == id)?;
        let removed = events.remove(index);

        state.invalidate(&affected);
        Some(removed)
    }

    /// Replaces the configuration, dropping every cached layout.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid; the cache is left unchanged.
    pub fn set_config(&self, config: LayoutConfig) -> Result<(), LayoutError> {
        config.validate()?;
        let mut state = self.write();
        state.config = Arc::new(config);
        state.version += 1;
        state.layouts.clear();
        Ok(())
    }

    /// Drops every cached layout, keeping events and configuration.
    pub fn clear(&self) {
        let mut state = self.write();
        state.version += 1;
        state.layouts.clear();
    }

    /// The version stamp, bumped by every mutation.
    pub fn version(&self) -> u64 {
        self.read().version
    }

    /// The current event set.
    pub fn events(&self) -> Arc<Vec<Event>> {
        Arc::clone(&self.read().events)
    }

    /// The current configuration.
    pub fn config(&self) -> Arc<LayoutConfig> {
        Arc::clone(&self.read().config)
    }

    /// Returns true if a layout for the window is cached.
    pub fn is_cached(&self, window: &ViewWindow) -> bool {
        self.read().layouts.contains_key(window)
    }

    /// Stores a layout unless the inputs changed while it was computed.
    fn publish(&self, window: ViewWindow, version: u64, layout: &SharedLayout) {
        let mut state = self.write();
        if state.version == version {
            state.layouts.insert(window, Arc::clone(layout));
        } else {
            tracing::debug!(
                ?window,
                computed = version,
                current = state.version,
                "discarding stale layout"
            );
        }
    }

    // The state is only ever replaced as a whole, so a poisoned lock still holds
    // a consistent value.
    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl State {
    fn snapshot(&self) -> Snapshot {
        Snapshot {
            events: Arc::clone(&self.events),
            config: Arc::clone(&self.config),
            version: self.version,
        }
    }

    fn sharing_id(&self, id: &str) -> Vec<Event> {
        self.events
            .iter()
            .filter(|e| e.id.trim() == id)
            .cloned()
            .collect()
    }

    /// Bumps the version and drops the windows showing any of the given events.
    fn invalidate(&mut self, affected: &[Event]) {
        self.version += 1;

        let spans = match self.config.resolve() {
            Ok(resolved) => affected
                .iter()
                .map(|event| day_span(event, &resolved))
                .collect::<Option<Vec<_>>>(),
            Err(_) => None,
        };

        match spans {
            Some(spans) => {
                let before = self.layouts.len();
                self.layouts.retain(|window, _| {
                    !spans
                        .iter()
                        .any(|&(first, last)| window.intersects(first, last))
                });
                tracing::debug!(
                    version = self.version,
                    dropped = before - self.layouts.len(),
                    "invalidated layouts"
                );
            }
            // An event that cannot be normalized has no span; drop everything.
            None => self.layouts.clear(),
        }
    }
}

fn day_span(event: &Event, config: &ResolvedConfig<'_>) -> Option<(i64, i64)> {
    let normalized = NormalizedEvent::from_event(event, config).ok()?;
    Some((
        normalized.first_day(),
        normalized.last_day(config.config.end_policy),
    ))
}
