// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - volumes, regions and export naming

mod naming;
mod region;
mod store;

pub use naming::{strip_name, stripped, NameGenerator, NameOwner, ReferenceNames, REFERENCE_MARKER};
pub use region::{
    is_default_region, ParticleKind, ProductionCuts, Region, StepLimits, DEFAULT_CUT_VALUE,
    UNLIMITED,
};
pub use store::{GeometryStore, LogicalVolume, VolumeId, REFLECTED_SUFFIX};
