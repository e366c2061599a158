// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! GDML region exporters

use super::{embed_userinfo, read_userinfo, write_userinfo};
use crate::auxtree::{AuxTree, REGION_TAG};
use crate::codec::RegionExporter;
use crate::config::CodecConfig;
use crate::geometry::{GeometryStore, ReferenceNames};
use crate::units::Evaluator;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Export the store's regions as an auxiliary tree
pub fn export_region_tree(store: &GeometryStore, config: &CodecConfig) -> AuxTree {
    let evaluator = Evaluator::new();
    let names = ReferenceNames::new(config.store_references);
    RegionExporter::new(&evaluator, &names).export(store, config.store_references)
}

/// Write the store's regions as a standalone `<userinfo>` fragment
pub fn export_userinfo_file(
    store: &GeometryStore,
    path: impl AsRef<Path>,
    config: &CodecConfig,
) -> Result<()> {
    let path = path.as_ref();
    let tree = export_region_tree(store, config);
    let xml = write_userinfo(&tree, config.pretty_xml).context("Failed to render userinfo")?;
    fs::write(path, xml).with_context(|| format!("Failed to write: {}", path.display()))?;
    Ok(())
}

/// Rewrite the regions of an existing GDML file in place.
///
/// Non-region auxiliaries of the document's `<userinfo>` are kept ahead of
/// the exported regions. With `export_regions` disabled the file is left
/// untouched.
pub fn export_into_gdml_file(
    store: &GeometryStore,
    path: impl AsRef<Path>,
    config: &CodecConfig,
) -> Result<()> {
    if !config.export_regions {
        tracing::info!("Region export disabled, leaving document unchanged");
        return Ok(());
    }

    let path = path.as_ref();
    let document = fs::read_to_string(path)
        .with_context(|| format!("Failed to read GDML file: {}", path.display()))?;

    let mut tree: AuxTree = read_userinfo(&document)
        .context("Failed to read GDML userinfo")?
        .into_records()
        .into_iter()
        .filter(|r| r.tag != REGION_TAG)
        .collect();
    for record in export_region_tree(store, config).into_records() {
        tree.push(record);
    }

    let updated = embed_userinfo(&document, &tree).context("Failed to write GDML userinfo")?;
    fs::write(path, updated).with_context(|| format!("Failed to write: {}", path.display()))?;
    Ok(())
}
