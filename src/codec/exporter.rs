// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Region exporter: regions to auxiliary tree

use crate::auxtree::{
    AuxRecord, AuxSink, AuxTree, LimitField, LimitValue, LimitsEntry, RegionEntry, REGION_TAG,
};
use crate::geometry::{
    is_default_region, strip_name, GeometryStore, NameGenerator, NameOwner, ProductionCuts,
    Region,
};
use crate::units::Evaluator;

/// Unit written on every exported cut and limit
pub const EXPORT_UNIT: &str = "mm";

/// Writes one "Region" record per region of a store
pub struct RegionExporter<'a, N: NameGenerator> {
    evaluator: &'a Evaluator,
    names: &'a N,
}

impl<'a, N: NameGenerator> RegionExporter<'a, N> {
    pub fn new(evaluator: &'a Evaluator, names: &'a N) -> Self {
        Self { evaluator, names }
    }

    /// Export into a fresh tree
    pub fn export(&self, store: &GeometryStore, store_references: bool) -> AuxTree {
        let mut tree = AuxTree::new();
        self.export_into(store, store_references, &mut tree);
        tree
    }

    /// Append the exported records to `sink`, in store order
    pub fn export_into<S: AuxSink + ?Sized>(
        &self,
        store: &GeometryStore,
        store_references: bool,
        sink: &mut S,
    ) {
        let mut exported = 0usize;
        for (index, region) in store.regions().iter().enumerate() {
            if is_default_region(region.name()) {
                continue;
            }
            let record = self.region_record(store, index, region, store_references);
            tracing::debug!(
                "Exporting region '{}' as '{}'",
                region.name(),
                record.value
            );
            sink.add_auxiliary(record);
            exported += 1;
        }
        tracing::info!("Exported {} region(s)", exported);
    }

    fn region_record(
        &self,
        store: &GeometryStore,
        index: usize,
        region: &Region,
        store_references: bool,
    ) -> AuxRecord {
        let name = self.names.generate(region.name(), NameOwner::Region(index));
        let mut entries = Vec::new();

        for volume in region.root_volumes() {
            if store.is_reflected(*volume) {
                continue;
            }
            let mut name = self
                .names
                .generate(store.volume_name(*volume), NameOwner::Volume(*volume));
            if !store_references {
                strip_name(&mut name);
            }
            entries.push(RegionEntry::Volume { name });
        }

        // Regions without explicit cuts export the defaults.
        let cuts = region.production_cuts().copied().unwrap_or_default();
        entries.extend(self.cut_entries(&cuts));

        if let Some(limits) = region.step_limits() {
            let fields = LimitField::ALL
                .iter()
                .map(|field| LimitValue {
                    field: *field,
                    value: self.evaluator.to_string(field.get(limits)),
                    unit: EXPORT_UNIT.to_string(),
                })
                .collect();
            entries.push(RegionEntry::Limits(LimitsEntry {
                label: limits.label.clone(),
                unit: EXPORT_UNIT.to_string(),
                fields,
            }));
        }

        AuxRecord::new(REGION_TAG, name)
            .with_children(entries.into_iter().map(RegionEntry::into_record).collect())
    }

    fn cut_entries(&self, cuts: &ProductionCuts) -> Vec<RegionEntry> {
        cuts.iter()
            .map(|(kind, value)| RegionEntry::Cut {
                kind,
                value: self.evaluator.to_string(value),
                unit: EXPORT_UNIT.to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{ParticleKind, ReferenceNames, StepLimits};

    fn tags(record: &AuxRecord) -> Vec<&str> {
        record.children().iter().map(|c| c.tag.as_str()).collect()
    }

    #[test]
    fn test_fixed_child_order() {
        let mut store = GeometryStore::new();
        let a = store.add_volume("A");
        let b = store.add_volume("B");
        let mut region = Region::new("R");
        region.add_root_volume(b);
        region.add_root_volume(a);
        region.set_step_limits(StepLimits::new("lim"));
        store.register_region(region);

        let evaluator = Evaluator::new();
        let names = ReferenceNames::new(false);
        let tree = RegionExporter::new(&evaluator, &names).export(&store, false);

        let record = &tree.records()[0];
        assert_eq!(record.tag, "Region");
        assert_eq!(record.value, "R");
        assert_eq!(
            tags(record),
            ["volume", "volume", "gamcut", "ecut", "poscut", "pcut", "ulimits"]
        );
        assert_eq!(record.children()[0].value, "B");
        assert_eq!(record.children()[1].value, "A");

        let limits = &record.children()[6];
        assert_eq!(limits.value, "lim");
        assert_eq!(limits.unit, "mm");
        assert_eq!(tags(limits), ["ustepMax", "utrakMax", "utimeMax", "uekinMin", "urangMin"]);
        assert_eq!(limits.children()[0].value, "1.7976931348623157e308");
        assert_eq!(limits.children()[4].value, "0");
    }

    #[test]
    fn test_cut_values_and_defaults() {
        let mut store = GeometryStore::new();
        let mut with_cuts = Region::new("WithCuts");
        with_cuts.set_production_cuts(ProductionCuts::uniform(1.5).with(ParticleKind::Proton, 20.0));
        store.register_region(with_cuts);
        store.register_region(Region::new("NoCuts"));

        let evaluator = Evaluator::new();
        let names = ReferenceNames::new(false);
        let tree = RegionExporter::new(&evaluator, &names).export(&store, false);

        let values: Vec<_> = tree.records()[0].children().iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, ["1.5", "1.5", "1.5", "20"]);
        let defaults: Vec<_> = tree.records()[1].children().iter().map(|c| c.value.as_str()).collect();
        assert_eq!(defaults, ["0.7", "0.7", "0.7", "0.7"]);
        assert!(tree.records()[1].children().iter().all(|c| c.unit == "mm"));
    }

    #[test]
    fn test_reflected_volumes_and_default_regions_are_skipped() {
        let mut store = GeometryStore::new();
        let arm = store.add_volume("Arm");
        let mirrored = store.reflect_volume(arm).unwrap();
        let mut arms = Region::new("Arms");
        arms.add_root_volume(arm);
        arms.add_root_volume(mirrored);
        store.register_region(Region::new("DefaultRegionForTheWorld"));
        store.register_region(Region::new("DefaultRegionForParallelWorld"));
        store.register_region(arms);

        let evaluator = Evaluator::new();
        let names = ReferenceNames::new(false);
        let tree = RegionExporter::new(&evaluator, &names).export(&store, false);

        assert_eq!(tree.len(), 1);
        let volumes: Vec<_> = tree.records()[0]
            .children()
            .iter()
            .filter(|c| c.tag == "volume")
            .map(|c| c.value.as_str())
            .collect();
        assert_eq!(volumes, ["Arm"]);
    }

    #[test]
    fn test_reference_names() {
        let mut store = GeometryStore::new();
        let id = store.add_volume("Box");
        let mut region = Region::new("R");
        region.add_root_volume(id);
        store.register_region(region);

        let evaluator = Evaluator::new();
        let names = ReferenceNames::new(true);
        let exporter = RegionExporter::new(&evaluator, &names);

        let with_refs = exporter.export(&store, true);
        assert_eq!(with_refs.records()[0].value, "R0x80000000");
        assert_eq!(with_refs.records()[0].children()[0].value, "Box0x00000000");

        // Volume suffixes are stripped, region names keep theirs.
        let without_refs = exporter.export(&store, false);
        assert_eq!(without_refs.records()[0].value, "R0x80000000");
        assert_eq!(without_refs.records()[0].children()[0].value, "Box");
    }

    #[test]
    fn test_export_into_existing_sink() {
        let mut store = GeometryStore::new();
        store.register_region(Region::new("R"));
        let evaluator = Evaluator::new();
        let names = ReferenceNames::new(false);

        let mut sink = vec![AuxRecord::new("Property", "kept")];
        RegionExporter::new(&evaluator, &names).export_into(&store, false, &mut sink);
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[1].value, "R");
    }
}
