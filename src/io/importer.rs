// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! GDML file importer

use super::{read_defines, read_userinfo, read_volume_names};
use crate::codec::{ImportReport, RegionImporter};
use crate::config::CodecConfig;
use crate::geometry::{stripped, GeometryStore, REFLECTED_SUFFIX};
use crate::units::Evaluator;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Seed a store with the volumes declared in a GDML document.
///
/// Volumes named `<name>_refl` become the reflected counterpart of `<name>`
/// when that original exists.
pub fn store_from_gdml(xml: &str, strip_names: bool) -> Result<GeometryStore> {
    let names: Vec<String> = read_volume_names(xml)
        .context("Failed to read GDML structure")?
        .into_iter()
        .map(|n| if strip_names { stripped(&n) } else { n })
        .collect();

    let mut store = GeometryStore::new();
    let (reflected, originals): (Vec<&String>, Vec<&String>) =
        names.iter().partition(|n| is_reflected_name(n, &names));
    for name in originals {
        store.add_volume(name.as_str());
    }
    for name in reflected {
        let base = &name[..name.len() - REFLECTED_SUFFIX.len()];
        for id in store.find_by_name(base).to_vec() {
            store.reflect_volume(id);
        }
    }
    Ok(store)
}

fn is_reflected_name(name: &str, all: &[String]) -> bool {
    name.strip_suffix(REFLECTED_SUFFIX)
        .map(|base| all.iter().any(|n| n == base))
        .unwrap_or(false)
}

/// An evaluator holding the document's `<define>` constants, variables and
/// quantities, each resolved in document order
pub fn evaluator_from_gdml(xml: &str) -> Result<Evaluator> {
    let mut evaluator = Evaluator::new();
    for define in read_defines(xml).context("Failed to read GDML defines")? {
        let mut value = evaluator
            .evaluate(&define.value)
            .with_context(|| format!("Failed to evaluate define '{}'", define.name))?;
        if !define.unit.trim().is_empty() {
            value *= evaluator
                .evaluate(&define.unit)
                .with_context(|| format!("Failed to evaluate unit of define '{}'", define.name))?;
        }
        tracing::debug!("Defined '{}' = {}", define.name, value);
        evaluator.define_constant(define.name, value);
    }
    Ok(evaluator)
}

/// Import the regions of a GDML document into `store`
pub fn import_gdml_regions(
    xml: &str,
    store: &mut GeometryStore,
    config: &CodecConfig,
) -> Result<ImportReport> {
    let tree = read_userinfo(xml).context("Failed to read GDML userinfo")?;
    let evaluator = evaluator_from_gdml(xml)?;
    let report = RegionImporter::new(&evaluator)
        .strip_names(config.strip_names)
        .import(&tree, store)?;
    Ok(report)
}

/// Read a GDML file: seed a store from its structure and import its regions
pub fn import_gdml_file(
    path: impl AsRef<Path>,
    config: &CodecConfig,
) -> Result<(GeometryStore, ImportReport)> {
    let path = path.as_ref();
    let xml = fs::read_to_string(path)
        .with_context(|| format!("Failed to read GDML file: {}", path.display()))?;

    let mut store = store_from_gdml(&xml, config.strip_names)?;
    let report = import_gdml_regions(&xml, &mut store, config)
        .with_context(|| format!("Failed to import regions from: {}", path.display()))?;
    Ok((store, report))
}
