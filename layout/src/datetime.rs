// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Temporal normalization: heterogeneous date inputs to one comparable instant.

mod loose;
mod moment;
mod normalize;
mod util;

pub use loose::LooseDateTime;
pub use moment::Moment;
pub use normalize::{EventTime, extract_hour_of_day, is_all_day_equivalent, normalize};
pub use util::{date_from_day_number, day_number, week_start_of};
pub(crate) use util::HOURS_PER_DAY;
