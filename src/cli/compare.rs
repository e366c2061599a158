// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Export/import round trip of a store's regions

use super::{ComparisonResult, RegionDiff, Reporter};
use crate::codec::RegionImporter;
use crate::config::CodecConfig;
use crate::io::{export_region_tree, read_userinfo, write_userinfo, StoreManifest};
use crate::units::Evaluator;
use anyhow::{Context, Result};
use std::path::Path;

/// Export the regions of a manifest's store to XML, import them into a fresh
/// store with the same volumes and compare the two
pub fn round_trip_manifest(
    manifest: &StoreManifest,
    config: &CodecConfig,
    verbose: bool,
) -> Result<ComparisonResult> {
    let original = manifest.build_store()?;

    let tree = export_region_tree(&original, config);
    let xml = write_userinfo(&tree, config.pretty_xml).context("Failed to render userinfo")?;
    if verbose {
        Reporter::progress(&format!("Exported {} region record(s)", tree.len()));
        println!("{}", xml);
    }

    let parsed = read_userinfo(&xml).context("Failed to parse exported userinfo")?;
    let mut imported = manifest.build_volumes();
    let evaluator = Evaluator::new();
    // Volume suffixes are only stripped when references were written.
    RegionImporter::new(&evaluator)
        .strip_names(config.store_references)
        .import(&parsed, &mut imported)
        .context("Failed to import exported regions")?;

    Ok(RegionDiff::compare(&original, &imported))
}

/// Round trip the manifest stored at `path`
pub fn round_trip_file(path: &Path, config: &CodecConfig, verbose: bool) -> Result<ComparisonResult> {
    let manifest = StoreManifest::from_file(path)
        .with_context(|| format!("Failed to load manifest: {}", path.display()))?;
    round_trip_manifest(&manifest, config, verbose)
}
