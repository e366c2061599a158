// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Region metadata codec
//!
//! Translates between "Region" auxiliary records and [`Region`] objects held
//! by a [`GeometryStore`]. The exporter always writes all four production
//! cuts while the importer accepts any subset of them, so a partial file
//! comes back from a round trip with the missing cuts filled in.
//!
//! [`Region`]: crate::geometry::Region

mod error;
mod exporter;
mod importer;

pub use error::{CodecError, CodecResult, ErrorKind, ImportReport, ImportWarning};
pub use exporter::{RegionExporter, EXPORT_UNIT};
pub use importer::RegionImporter;

use crate::auxtree::AuxTree;
use crate::geometry::{GeometryStore, ReferenceNames};
use crate::units::Evaluator;

/// Import regions with a default evaluator
pub fn import_regions(
    tree: &AuxTree,
    store: &mut GeometryStore,
    strip_names: bool,
) -> CodecResult<ImportReport> {
    let evaluator = Evaluator::new();
    RegionImporter::new(&evaluator)
        .strip_names(strip_names)
        .import(tree, store)
}

/// Export regions with a default evaluator; `store_references` also controls
/// whether generated names carry a reference suffix
pub fn export_regions(store: &GeometryStore, store_references: bool) -> AuxTree {
    let evaluator = Evaluator::new();
    let names = ReferenceNames::new(store_references);
    RegionExporter::new(&evaluator, &names).export(store, store_references)
}
