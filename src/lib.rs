// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! GDML Region Codec
//!
//! Reads and writes the region metadata of GDML geometry files: which volumes
//! form a region, the per-particle production cuts of each region and its
//! user step limits. On disk this lives in the untyped `<userinfo>` auxiliary
//! tree; in memory it is a typed [`GeometryStore`] with values resolved to
//! internal units (mm, ns, MeV).

pub mod auxtree;
pub mod cli;
pub mod codec;
pub mod config;
pub mod geometry;
pub mod io;
pub mod units;

pub use auxtree::{AuxRecord, AuxSink, AuxTree, RegionEntry};
pub use codec::{
    export_regions, import_regions, CodecError, ErrorKind, ImportReport, ImportWarning,
    RegionExporter, RegionImporter,
};
pub use config::CodecConfig;
pub use geometry::{GeometryStore, ParticleKind, ProductionCuts, Region, StepLimits, VolumeId};
pub use io::{import_gdml_file, read_userinfo, write_userinfo, StoreManifest};
pub use units::Evaluator;

use anyhow::Result;

/// Import the regions of a GDML file using the configuration from
/// [`CodecConfig::load`]
pub fn load_regions(path: &str) -> Result<GeometryStore> {
    let config = CodecConfig::load()?;
    let (store, _report) = import_gdml_file(path, &config)?;
    Ok(store)
}
