// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

/// Errors raised while turning events into layout geometry.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// The value could not be read as any supported date representation.
    #[error("Invalid temporal value '{value}': {reason}")]
    InvalidTemporalValue {
        /// The offending input, as given.
        value: String,

        /// Why parsing failed.
        reason: String,
    },

    /// The event is structurally invalid, e.g. it has no id.
    #[error("Malformed event {}: {reason}", DisplayId(.id))]
    MalformedEvent {
        /// The id of the event, when it has one.
        id: Option<String>,

        /// What is wrong with the event.
        reason: String,
    },

    /// The layout configuration was rejected.
    #[error("Invalid layout configuration: {0}")]
    InvalidConfig(String),
}

impl LayoutError {
    pub(crate) fn temporal(value: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::InvalidTemporalValue {
            value: value.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn malformed(id: Option<&str>, reason: impl Into<String>) -> Self {
        Self::MalformedEvent {
            id: id.map(ToOwned::to_owned),
            reason: reason.into(),
        }
    }
}

impl From<toml::de::Error> for LayoutError {
    fn from(e: toml::de::Error) -> Self {
        Self::InvalidConfig(e.to_string())
    }
}

struct DisplayId<'a>(&'a Option<String>);

impl fmt::Display for DisplayId<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(id) => write!(f, "'{id}'"),
            None => write!(f, "<no id>"),
        }
    }
}

/// Non-fatal findings about an event that was still laid out.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutWarning {
    /// The event ends before it starts; it was clamped to zero duration.
    InvertedRange {
        /// The id of the event.
        id: String,
    },
}

impl fmt::Display for LayoutWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvertedRange { id } => {
                write!(f, "Event '{id}' ends before it starts, clamped to zero duration")
            }
        }
    }
}

/// An event excluded from a layout pass, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEvent {
    /// The id of the event, when it has one.
    pub id: Option<String>,

    /// Why the event was skipped.
    pub error: LayoutError,
}

/// Per-event problems collected during one layout pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Events left out of the layout.
    pub skipped: Vec<SkippedEvent>,

    /// Events laid out after an automatic correction.
    pub warnings: Vec<LayoutWarning>,
}

impl Diagnostics {
    /// Returns true if nothing was skipped or corrected.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.warnings.is_empty()
    }

    /// Ids of the skipped events that had one.
    pub fn skipped_ids(&self) -> impl Iterator<Item = &str> {
        self.skipped.iter().filter_map(|s| s.id.as_deref())
    }

    pub(crate) fn skip(&mut self, id: Option<&str>, error: LayoutError) {
        tracing::warn!(id, %error, "skipping event");
        self.skipped.push(SkippedEvent {
            id: id.map(ToOwned::to_owned),
            error,
        });
    }

    pub(crate) fn warn(&mut self, warning: LayoutWarning) {
        tracing::warn!(%warning, "corrected event");
        self.warnings.push(warning);
    }
}

/// A best-effort layout result together with the diagnostics of its pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Computed<T> {
    /// The layout of every event that could be laid out.
    pub layout: T,

    /// What was skipped or corrected on the way.
    pub diagnostics: Diagnostics,
}

impl<T> Computed<T> {
    /// Transforms the layout, keeping the diagnostics.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Computed<U> {
        Computed {
            layout: f(self.layout),
            diagnostics: self.diagnostics,
        }
    }
}
