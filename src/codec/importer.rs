// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Region importer: auxiliary tree to regions

use super::error::{CodecError, CodecResult, ImportReport, ImportWarning};
use crate::auxtree::{AuxRecord, AuxTree, LimitsEntry, RegionEntry, REGION_TAG};
use crate::geometry::{
    is_default_region, stripped, GeometryStore, ParticleKind, Region, StepLimits,
};
use crate::units::{EvalError, Evaluator, UnitCategory};

/// Builds regions from "Region" auxiliary records and registers them in a store
pub struct RegionImporter<'e> {
    evaluator: &'e Evaluator,
    strip_names: bool,
}

impl<'e> RegionImporter<'e> {
    pub fn new(evaluator: &'e Evaluator) -> Self {
        Self {
            evaluator,
            strip_names: true,
        }
    }

    /// Remove reference suffixes from region and volume names (default: on)
    pub fn strip_names(mut self, strip: bool) -> Self {
        self.strip_names = strip;
        self
    }

    /// Import every "Region" record of `tree` into `store`.
    ///
    /// A malformed region aborts the import; regions registered before it
    /// stay in the store.
    pub fn import(&self, tree: &AuxTree, store: &mut GeometryStore) -> CodecResult<ImportReport> {
        let mut report = ImportReport::default();

        for record in tree.with_tag(REGION_TAG) {
            let name = self.resolve_name(&record.value);
            if is_default_region(&name) {
                tracing::debug!("Skipping default region '{}'", name);
                report.skipped += 1;
                continue;
            }
            if !record.has_children() {
                return Err(CodecError::MissingChildren { region: name });
            }

            let region = self.build_region(name, record, store, &mut report.warnings)?;
            tracing::debug!(
                "Imported region '{}' with {} root volume(s)",
                region.name(),
                region.root_volumes().len()
            );
            let name = region.name().to_string();
            if store.register_region(region) {
                report.regions.push(name);
            } else {
                let warning = ImportWarning::DuplicateRegion { region: name };
                tracing::warn!("{}", warning);
                report.warnings.push(warning);
            }
        }

        tracing::info!(
            "Imported {} region(s), {} warning(s)",
            report.regions.len(),
            report.warnings.len()
        );
        Ok(report)
    }

    fn resolve_name(&self, name: &str) -> String {
        if self.strip_names {
            stripped(name)
        } else {
            name.to_string()
        }
    }

    fn build_region(
        &self,
        name: String,
        record: &AuxRecord,
        store: &GeometryStore,
        warnings: &mut Vec<ImportWarning>,
    ) -> CodecResult<Region> {
        let mut region = Region::new(name);

        for child in record.children() {
            let entry =
                RegionEntry::from_record(child).map_err(|e| CodecError::UnknownLimitTag {
                    region: region.name().to_string(),
                    tag: e.0,
                })?;

            match entry {
                RegionEntry::Volume { name } => {
                    let volume = self.resolve_name(&name);
                    if let Some(warning) = attach_volumes(&mut region, &volume, store) {
                        tracing::warn!("{}", warning);
                        warnings.push(warning);
                    }
                }
                RegionEntry::Cut { kind, value, unit } => {
                    let cut = self.resolve_cut(&region, kind, &value, &unit)?;
                    region.production_cuts_mut().set(kind, cut);
                }
                RegionEntry::Limits(limits) => {
                    let limits = self.resolve_limits(&region, limits)?;
                    region.set_step_limits(limits);
                }
                RegionEntry::Unknown(other) => {
                    tracing::debug!("Ignoring '{}' in region '{}'", other.tag, region.name());
                }
            }
        }

        Ok(region)
    }

    fn resolve_cut(
        &self,
        region: &Region,
        kind: ParticleKind,
        value: &str,
        unit: &str,
    ) -> CodecResult<f64> {
        if self.evaluator.unit_category(unit) != Some(UnitCategory::Length) {
            return Err(CodecError::InvalidUnitCategory {
                region: region.name().to_string(),
                tag: kind.cut_tag().to_string(),
                unit: unit.to_string(),
            });
        }
        self.evaluator
            .resolve(value, unit)
            .map_err(|source| expression_error(region, source))
    }

    fn resolve_limits(&self, region: &Region, entry: LimitsEntry) -> CodecResult<StepLimits> {
        let mut limits = StepLimits::new(entry.label);

        for field in entry.fields {
            let scale_expr = if field.unit.trim().is_empty() {
                entry.unit.as_str()
            } else {
                field.unit.as_str()
            };
            let value = self
                .scale(&field.value, scale_expr)
                .map_err(|source| expression_error(region, source))?;
            field.field.set(&mut limits, value);
        }

        Ok(limits)
    }

    /// `value * scale`, where both sides are full expressions
    fn scale(&self, value: &str, scale_expr: &str) -> Result<f64, EvalError> {
        let scale = if scale_expr.trim().is_empty() {
            1.0
        } else {
            self.evaluator.evaluate(scale_expr)?
        };
        Ok(self.evaluator.evaluate(value)? * scale)
    }
}

/// Add every volume named `volume` (and its reflected copy) as a root volume
fn attach_volumes(
    region: &mut Region,
    volume: &str,
    store: &GeometryStore,
) -> Option<ImportWarning> {
    let matches = store.find_by_name(volume);

    for id in matches {
        region.add_root_volume(*id);
        if let Some(reflected) = store.reflection(*id) {
            region.add_root_volume(reflected);
        }
    }

    match matches.len() {
        0 => Some(ImportWarning::VolumeNotFound {
            region: region.name().to_string(),
            volume: volume.to_string(),
        }),
        1 => None,
        n => Some(ImportWarning::AmbiguousVolumeName {
            region: region.name().to_string(),
            volume: volume.to_string(),
            matches: n,
        }),
    }
}

fn expression_error(region: &Region, source: EvalError) -> CodecError {
    CodecError::Expression {
        region: region.name().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{DEFAULT_CUT_VALUE, UNLIMITED};
    use crate::codec::ErrorKind;
    use approx::assert_relative_eq;

    fn region(name: &str, children: Vec<AuxRecord>) -> AuxRecord {
        AuxRecord::new("Region", name).with_children(children)
    }

    fn import(tree: &AuxTree, store: &mut GeometryStore) -> CodecResult<ImportReport> {
        let evaluator = Evaluator::new();
        RegionImporter::new(&evaluator).import(tree, store)
    }

    #[test]
    fn test_import_cuts_in_any_order() {
        let mut store = GeometryStore::new();
        store.add_volume("Tracker");
        let tree = AuxTree::from(vec![region(
            "TrackerRegion",
            vec![
                AuxRecord::new("pcut", "2").with_unit("cm"),
                AuxRecord::new("volume", "Tracker"),
                AuxRecord::new("gamcut", "0.5*2").with_unit("mm"),
            ],
        )]);

        let report = import(&tree, &mut store).unwrap();
        assert_eq!(report.regions, ["TrackerRegion"]);
        assert!(!report.has_warnings());

        let imported = store.find_region("TrackerRegion").unwrap();
        let cuts = imported.production_cuts().unwrap();
        assert_relative_eq!(cuts.get(ParticleKind::Proton), 20.0);
        assert_relative_eq!(cuts.get(ParticleKind::Gamma), 1.0);
        assert_relative_eq!(cuts.get(ParticleKind::Electron), DEFAULT_CUT_VALUE);
        assert_eq!(imported.root_volumes().len(), 1);
        assert!(imported.step_limits().is_none());
    }

    #[test]
    fn test_cuts_stay_absent_without_cut_tags() {
        let mut store = GeometryStore::new();
        store.add_volume("Box");
        let tree = AuxTree::from(vec![region("R", vec![AuxRecord::new("volume", "Box")])]);
        import(&tree, &mut store).unwrap();
        assert!(store.find_region("R").unwrap().production_cuts().is_none());
    }

    #[test]
    fn test_strip_names_on_regions_and_volumes() {
        let mut store = GeometryStore::new();
        let id = store.add_volume("Box");
        let tree = AuxTree::from(vec![region(
            "Calo0x80000000",
            vec![AuxRecord::new("volume", "Box0x00000000")],
        )]);
        import(&tree, &mut store).unwrap();
        assert_eq!(store.find_region("Calo").unwrap().root_volumes(), &[id]);
    }

    #[test]
    fn test_no_stripping_keeps_suffix() {
        let mut store = GeometryStore::new();
        store.add_volume("Box");
        let tree = AuxTree::from(vec![region(
            "Calo0x1",
            vec![AuxRecord::new("volume", "Box0x2")],
        )]);
        let evaluator = Evaluator::new();
        let report = RegionImporter::new(&evaluator)
            .strip_names(false)
            .import(&tree, &mut store)
            .unwrap();
        assert_eq!(report.regions, ["Calo0x1"]);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_reflected_counterpart_is_attached() {
        let mut store = GeometryStore::new();
        let arm = store.add_volume("Arm");
        let mirrored = store.reflect_volume(arm).unwrap();
        let tree = AuxTree::from(vec![region("Arms", vec![AuxRecord::new("volume", "Arm")])]);
        import(&tree, &mut store).unwrap();
        assert_eq!(store.find_region("Arms").unwrap().root_volumes(), &[arm, mirrored]);
    }

    #[test]
    fn test_limits_defaults_and_child_units() {
        let mut store = GeometryStore::new();
        let tree = AuxTree::from(vec![region(
            "Slow",
            vec![AuxRecord::new("ulimits", "slow").with_unit("mm").with_children(vec![
                AuxRecord::new("ustepMax", "3").with_unit("cm"),
                AuxRecord::new("uekinMin", "2").with_unit("keV"),
            ])],
        )]);
        import(&tree, &mut store).unwrap();

        let limits = store.find_region("Slow").unwrap().step_limits().unwrap().clone();
        assert_eq!(limits.label, "slow");
        assert_relative_eq!(limits.max_step, 30.0);
        assert_relative_eq!(limits.min_kinetic_energy, 0.002);
        assert_eq!(limits.max_track, UNLIMITED);
        assert_eq!(limits.max_time, UNLIMITED);
        assert_eq!(limits.min_range, 0.0);
    }

    #[test]
    fn test_limits_fall_back_to_compound_scale_expression() {
        let mut store = GeometryStore::new();
        let tree = AuxTree::from(vec![region(
            "Fine",
            vec![AuxRecord::new("ulimits", "fine").with_unit("0.1*cm").with_children(vec![
                AuxRecord::new("ustepMax", "5"),
                AuxRecord::new("urangMin", "2*2"),
            ])],
        )]);
        import(&tree, &mut store).unwrap();

        let limits = store.find_region("Fine").unwrap().step_limits().unwrap().clone();
        assert_relative_eq!(limits.max_step, 5.0);
        assert_relative_eq!(limits.min_range, 4.0);
    }

    #[test]
    fn test_unknown_region_tags_are_ignored() {
        let mut store = GeometryStore::new();
        let tree = AuxTree::from(vec![
            AuxRecord::new("SensDet", "ignored"),
            region("R", vec![AuxRecord::new("colour", "red")]),
        ]);
        let report = import(&tree, &mut store).unwrap();
        assert_eq!(report.regions, ["R"]);
        assert_eq!(store.regions().len(), 1);
    }

    #[test]
    fn test_bad_expression_is_a_unit_error() {
        let mut store = GeometryStore::new();
        let tree = AuxTree::from(vec![region(
            "R",
            vec![AuxRecord::new("ecut", "1+").with_unit("mm")],
        )]);
        let err = import(&tree, &mut store).unwrap_err();
        assert!(matches!(err, CodecError::Expression { .. }));
        assert_eq!(err.kind(), ErrorKind::Unit);
    }

    #[test]
    fn test_regions_before_failure_stay_registered() {
        let mut store = GeometryStore::new();
        let tree = AuxTree::from(vec![
            region("Good", vec![AuxRecord::new("ecut", "1").with_unit("mm")]),
            AuxRecord::new("Region", "Bad"),
        ]);
        let err = import(&tree, &mut store).unwrap_err();
        assert!(matches!(err, CodecError::MissingChildren { ref region } if region == "Bad"));
        assert!(store.find_region("Good").is_some());
    }
}
