// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Auxiliary tree - the generic tagged metadata carried by GDML documents

mod entry;
mod record;

pub use entry::{
    LimitField, LimitValue, LimitsEntry, RegionEntry, UnknownLimitTag, LIMITS_TAG, REGION_TAG,
    VOLUME_TAG,
};
pub use record::{AuxRecord, AuxSink, AuxTree};
