// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - GDML userinfo, store manifests, file import and export

mod exporter;
mod importer;
mod manifest;
mod userinfo;

pub use exporter::{export_into_gdml_file, export_region_tree, export_userinfo_file};
pub use importer::{evaluator_from_gdml, import_gdml_file, import_gdml_regions, store_from_gdml};
pub use manifest::{CutsSpec, LimitsSpec, ManifestError, RegionSpec, StoreManifest, VolumeSpec};
pub use userinfo::{
    embed_userinfo, read_defines, read_userinfo, read_volume_names, write_userinfo, Definition,
};
