// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! End-to-end tests for the aimcal-layout crate.
//!
//! These tests drive the public entry points with realistic event sets and
//! check the invariants renderers rely on.

mod determinism;
mod timed;
