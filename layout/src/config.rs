// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::fmt;
use std::str::FromStr;

use jiff::SignedDuration;
use jiff::tz::TimeZone;
use serde::de;

use crate::LayoutError;
use crate::geometry::Projection;

/// How the end of an all-day event is read.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum EndPolicy {
    /// An all-day event ending on day N does not occupy day N.
    #[default]
    Exclusive,

    /// An all-day event ending on day N occupies day N.
    Inclusive,
}

/// Options accepted by every layout entry point.
///
/// All fields have defaults, so an empty TOML document is a valid configuration.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// First day of the week, 0 for Sunday up to 6 for Saturday.
    pub start_of_week: u8,

    /// Events starting within this long of an overlapping event are always laid
    /// out side by side.
    pub parallel_threshold: ConfigDuration,

    /// Events overlapping a predecessor by less than this are indented on top of
    /// it instead of taking a column of their own. Zero disables nesting.
    pub nested_threshold: ConfigDuration,

    /// Minimum visual duration of a timed segment, e.g. for zero-length events.
    pub min_event_duration: ConfigDuration,

    /// Floor for the width of a timed segment, in percent of the day column.
    pub min_column_width_percent: f64,

    /// Gap subtracted from the width of every timed segment, in percent.
    pub margin_between_percent: f64,

    /// Horizontal offset per nesting level, in percent.
    pub indent_step_percent: f64,

    /// How all-day end dates are read.
    pub end_policy: EndPolicy,

    /// IANA name of the view timezone. Defaults to UTC.
    pub time_zone: Option<String>,

    /// If true, timed events spanning more than one day are shown as all-day bars.
    pub multi_day_timed_as_all_day: bool,

    /// Maximum number of bar rows per week in month and year grids.
    pub max_grid_rows: Option<usize>,

    /// The selected or dragged event, always stacked on top.
    pub active_event_id: Option<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            start_of_week: 1,
            parallel_threshold: ConfigDuration(SignedDuration::from_mins(30)),
            nested_threshold: ConfigDuration(SignedDuration::from_mins(15)),
            min_event_duration: ConfigDuration(SignedDuration::from_mins(15)),
            min_column_width_percent: 10.0,
            margin_between_percent: 1.0,
            indent_step_percent: 8.0,
            end_policy: EndPolicy::default(),
            time_zone: None,
            multi_day_timed_as_all_day: false,
            max_grid_rows: None,
            active_event_id: None,
        }
    }
}

impl LayoutConfig {
    /// Check the configuration and resolve its timezone.
    ///
    /// # Errors
    ///
    /// Fails with [`LayoutError::InvalidConfig`] if any option is out of range or the
    /// timezone is unknown.
    pub fn validate(&self) -> Result<(), LayoutError> {
        self.resolve().map(|_| ())
    }

    /// The view timezone.
    ///
    /// # Errors
    ///
    /// Fails with [`LayoutError::InvalidConfig`] if the timezone is unknown.
    pub fn time_zone(&self) -> Result<TimeZone, LayoutError> {
        match &self.time_zone {
            Some(name) => TimeZone::get(name).map_err(|e| {
                LayoutError::InvalidConfig(format!("unknown time zone '{name}': {e}"))
            }),
            None => Ok(TimeZone::UTC),
        }
    }

    /// Projection parameters for percent-based placement with this configuration.
    #[must_use]
    pub fn projection(&self) -> Projection {
        Projection {
            margin_between_percent: self.margin_between_percent,
            min_column_width_percent: self.min_column_width_percent,
            indent_step_percent: self.indent_step_percent,
            ..Projection::default()
        }
    }

    pub(crate) fn resolve(&self) -> Result<ResolvedConfig<'_>, LayoutError> {
        if self.start_of_week > 6 {
            return Err(LayoutError::InvalidConfig(format!(
                "start_of_week must be within 0..=6, got {}",
                self.start_of_week
            )));
        }

        for (name, value) in [
            ("min_column_width_percent", self.min_column_width_percent),
            ("margin_between_percent", self.margin_between_percent),
            ("indent_step_percent", self.indent_step_percent),
        ] {
            if !(0.0..100.0).contains(&value) {
                return Err(LayoutError::InvalidConfig(format!(
                    "{name} must be within [0, 100), got {value}"
                )));
            }
        }

        for (name, value) in [
            ("parallel_threshold", self.parallel_threshold),
            ("nested_threshold", self.nested_threshold),
            ("min_event_duration", self.min_event_duration),
        ] {
            if value.0.is_negative() {
                return Err(LayoutError::InvalidConfig(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }

        Ok(ResolvedConfig {
            config: self,
            tz: self.time_zone()?,
            parallel_hours: self.parallel_threshold.hours(),
            nested_hours: self.nested_threshold.hours(),
            min_duration_hours: self.min_event_duration.hours(),
        })
    }
}

impl FromStr for LayoutConfig {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: LayoutConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

/// A validated configuration with derived values, used for one layout pass.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedConfig<'a> {
    pub config: &'a LayoutConfig,
    pub tz: TimeZone,
    pub parallel_hours: f64,
    pub nested_hours: f64,
    pub min_duration_hours: f64,
}

/// A duration option, written as minutes or as a string like "HH:MM", "1h", "15m", "90s".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigDuration(pub SignedDuration);

impl ConfigDuration {
    /// Builds a duration from whole minutes.
    #[must_use]
    pub fn minutes(minutes: i64) -> Self {
        Self(SignedDuration::from_mins(minutes))
    }

    /// The duration in fractional hours.
    #[must_use]
    pub fn hours(&self) -> f64 {
        self.0.as_secs_f64() / 3_600.0
    }
}

impl fmt::Display for ConfigDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0.as_secs())
    }
}

impl<'de> serde::Deserialize<'de> for ConfigDuration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct DurationVisitor;

        impl de::Visitor<'_> for DurationVisitor {
            type Value = ConfigDuration;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str(
                    r#"a number of minutes or a duration string like "HH:MM", "1h", "15m", or "90s""#,
                )
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                parse_duration(value)
                    .map(ConfigDuration)
                    .map_err(|e| de::Error::custom(e.to_string()))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                value
                    .checked_mul(60)
                    .map(|secs| ConfigDuration(SignedDuration::from_secs(secs)))
                    .ok_or_else(|| de::Error::custom(format!("duration too large: {value}")))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let value = i64::try_from(value)
                    .map_err(|_| de::Error::custom(format!("duration too large: {value}")))?;
                self.visit_i64(value)
            }
        }

        deserializer.deserialize_any(DurationVisitor)
    }
}

/// Parse a duration string in the format "HH:MM" / "1h" / "60m" / "1800s".
fn parse_duration(s: &str) -> Result<SignedDuration, Box<dyn Error>> {
    let secs = if let Some((h, m)) = s.split_once(':') {
        let hours: i64 = h.trim().parse()?;
        let minutes: i64 = m.trim().parse()?;
        hours
            .checked_mul(60)
            .and_then(|a| a.checked_add(minutes))
            .and_then(|a| a.checked_mul(60))
    } else if let Some(rest) = s.strip_suffix('h') {
        rest.trim().parse::<i64>()?.checked_mul(3_600)
    } else if let Some(rest) = s.strip_suffix('m') {
        rest.trim().parse::<i64>()?.checked_mul(60)
    } else if let Some(rest) = s.strip_suffix('s') {
        Some(rest.trim().parse::<i64>()?)
    } else {
        return Err(format!("Invalid duration format: {s}").into());
    };

    secs.map(SignedDuration::from_secs)
        .ok_or_else(|| format!("Duration too large: {s}").into())
}
