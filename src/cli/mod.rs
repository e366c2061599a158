// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI subsystem for the region codec

pub mod diff;
pub mod reporter;
pub mod compare;

pub use diff::{values_match, ComparisonResult, RegionDiff};
pub use reporter::Reporter;
pub use compare::{round_trip_file, round_trip_manifest};
