// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Region import/export behavior through the public codec API

use anyhow::Result;
use approx::assert_relative_eq;
use gdml_regions::{
    export_regions, import_regions, AuxRecord, AuxTree, ErrorKind, GeometryStore, ImportWarning,
    ParticleKind, ProductionCuts, Region, StepLimits,
};
use gdml_regions::geometry::UNLIMITED;

fn region_record(name: &str, children: Vec<AuxRecord>) -> AuxTree {
    AuxTree::from(vec![AuxRecord::new("Region", name).with_children(children)])
}

fn calo_store() -> GeometryStore {
    let mut store = GeometryStore::new();
    let calo = store.add_volume("Calo");
    store.add_volume("Tracker");

    let mut region = Region::new("CaloRegion");
    region.add_root_volume(calo);
    region.set_production_cuts(
        ProductionCuts::default()
            .with(ParticleKind::Gamma, 0.1)
            .with(ParticleKind::Electron, 1.0 / 3.0)
            .with(ParticleKind::Proton, 12.5),
    );
    let mut limits = StepLimits::new("calo");
    limits.max_step = 2.0;
    limits.max_time = 750.0;
    limits.min_kinetic_energy = 0.001;
    region.set_step_limits(limits);
    store.register_region(region);
    store
}

#[test]
fn test_round_trip_preserves_cuts_and_limits() -> Result<()> {
    for store_references in [true, false] {
        let original = calo_store();
        let tree = export_regions(&original, store_references);

        let mut imported = GeometryStore::new();
        imported.add_volume("Calo");
        imported.add_volume("Tracker");
        let report = import_regions(&tree, &mut imported, store_references)?;
        assert_eq!(report.regions, ["CaloRegion"]);
        assert!(!report.has_warnings(), "{:?}", report.warnings);

        let region = imported.find_region("CaloRegion").unwrap();
        assert_eq!(region.root_volumes().len(), 1);
        assert_eq!(imported.volume_name(region.root_volumes()[0]), "Calo");

        let cuts = region.production_cuts().unwrap();
        assert_relative_eq!(cuts.get(ParticleKind::Gamma), 0.1);
        assert_relative_eq!(cuts.get(ParticleKind::Electron), 1.0 / 3.0, max_relative = 1e-12);
        assert_relative_eq!(cuts.get(ParticleKind::Positron), 0.7);
        assert_relative_eq!(cuts.get(ParticleKind::Proton), 12.5);

        let limits = region.step_limits().unwrap();
        assert_eq!(limits.label, "calo");
        assert_relative_eq!(limits.max_step, 2.0);
        assert_eq!(limits.max_track, UNLIMITED);
        assert_relative_eq!(limits.max_time, 750.0);
        assert_relative_eq!(limits.min_kinetic_energy, 0.001);
        assert_eq!(limits.min_range, 0.0);
    }
    Ok(())
}

#[test]
fn test_region_without_cuts_exports_defaults() -> Result<()> {
    let mut store = GeometryStore::new();
    store.register_region(Region::new("Bare"));

    let tree = export_regions(&store, false);
    let record = &tree.records()[0];
    let cut_tags: Vec<&str> = record.children().iter().map(|c| c.tag.as_str()).collect();
    assert_eq!(cut_tags, ["gamcut", "ecut", "poscut", "pcut"]);
    for child in record.children() {
        assert_eq!(child.unit, "mm");
    }

    let mut imported = GeometryStore::new();
    import_regions(&tree, &mut imported, true)?;
    let cuts = imported.find_region("Bare").unwrap().production_cuts().unwrap();
    for kind in ParticleKind::ALL {
        assert_relative_eq!(cuts.get(kind), 0.7);
    }
    Ok(())
}

#[test]
fn test_duplicate_volume_names_all_attached() -> Result<()> {
    let mut store = GeometryStore::new();
    let first = store.add_volume("Foo");
    let second = store.add_volume("Foo");

    let tree = region_record("R", vec![AuxRecord::new("volume", "Foo")]);
    let report = import_regions(&tree, &mut store, true)?;

    let region = store.find_region("R").unwrap();
    assert_eq!(region.root_volumes(), [first, second]);
    assert!(matches!(
        report.warnings.as_slice(),
        [ImportWarning::AmbiguousVolumeName { matches: 2, .. }]
    ));
    Ok(())
}

#[test]
fn test_reflected_volume_follows_original() -> Result<()> {
    let mut store = GeometryStore::new();
    let arm = store.add_volume("Arm");
    let mirrored = store.reflect_volume(arm).unwrap();

    let tree = region_record("R", vec![AuxRecord::new("volume", "Arm0x00000000")]);
    import_regions(&tree, &mut store, true)?;
    assert_eq!(store.find_region("R").unwrap().root_volumes(), [arm, mirrored]);

    let exported = export_regions(&store, false);
    let volumes: Vec<&str> = exported.records()[0]
        .children()
        .iter()
        .filter(|c| c.tag == "volume")
        .map(|c| c.value.as_str())
        .collect();
    assert_eq!(volumes, ["Arm"]);
    Ok(())
}

#[test]
fn test_missing_volume_warns_and_keeps_region() -> Result<()> {
    let mut store = GeometryStore::new();
    let tree = region_record("R", vec![AuxRecord::new("volume", "Ghost")]);

    let report = import_regions(&tree, &mut store, true)?;
    assert!(matches!(
        report.warnings.as_slice(),
        [ImportWarning::VolumeNotFound { volume, .. }] if volume == "Ghost"
    ));
    assert!(store.find_region("R").unwrap().root_volumes().is_empty());
    Ok(())
}

#[test]
fn test_cut_with_time_unit_rejected() {
    let mut store = GeometryStore::new();
    let tree = region_record("R", vec![AuxRecord::new("pcut", "1").with_unit("ns")]);

    let err = import_regions(&tree, &mut store, true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unit);
    assert!(store.find_region("R").is_none());
}

#[test]
fn test_default_regions_skipped_both_ways() -> Result<()> {
    let tree = AuxTree::from(vec![
        AuxRecord::new("Region", "DefaultRegionForTheWorld0x80000000")
            .with_children(vec![AuxRecord::new("gamcut", "1").with_unit("mm")]),
        AuxRecord::new("Region", "DefaultRegionForParallelWorld")
            .with_children(vec![AuxRecord::new("gamcut", "1").with_unit("mm")]),
    ]);
    let mut store = GeometryStore::new();
    let report = import_regions(&tree, &mut store, true)?;
    assert!(report.regions.is_empty());
    assert_eq!(report.skipped, 2);
    assert!(store.regions().is_empty());

    store.register_region(Region::new("DefaultRegionForTheWorld"));
    store.register_region(Region::new("Kept"));
    let exported = export_regions(&store, false);
    assert_eq!(exported.len(), 1);
    assert_eq!(exported.records()[0].value, "Kept");
    Ok(())
}

#[test]
fn test_unknown_limit_tag_is_structural() {
    let limits = AuxRecord::new("ulimits", "l")
        .with_unit("mm")
        .with_children(vec![AuxRecord::new("bogus", "1").with_unit("mm")]);
    let tree = region_record("R", vec![limits]);

    let err = import_regions(&tree, &mut GeometryStore::new(), true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
}

#[test]
fn test_region_without_children_is_structural() {
    let tree = AuxTree::from(vec![AuxRecord::new("Region", "Empty")]);
    let err = import_regions(&tree, &mut GeometryStore::new(), true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
}

#[test]
fn test_limit_values_scale_by_unit_expression() -> Result<()> {
    let limits = AuxRecord::new("ulimits", "scaled").with_unit("mm").with_children(vec![
        AuxRecord::new("ustepMax", "2*cm"),
        AuxRecord::new("utrakMax", "3").with_unit("2*mm"),
        AuxRecord::new("utimeMax", "5").with_unit("us"),
    ]);
    let tree = region_record("R", vec![limits]);

    let mut store = GeometryStore::new();
    import_regions(&tree, &mut store, true)?;
    let limits = store.find_region("R").unwrap().step_limits().unwrap();
    assert_relative_eq!(limits.max_step, 20.0);
    assert_relative_eq!(limits.max_track, 6.0);
    assert_relative_eq!(limits.max_time, 5000.0);
    assert_eq!(limits.min_range, 0.0);
    Ok(())
}

#[test]
fn test_region_with_empty_child_list_is_structural() {
    let tree = region_record("Hollow", Vec::new());
    assert_eq!(tree.records()[0].children, Some(Vec::new()));

    let err = import_regions(&tree, &mut GeometryStore::new(), true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
}

#[test]
fn test_duplicate_region_names_keep_first() -> Result<()> {
    let tree = AuxTree::from(vec![
        AuxRecord::new("Region", "Calo0x1")
            .with_children(vec![AuxRecord::new("ecut", "1").with_unit("mm")]),
        AuxRecord::new("Region", "Calo0x2")
            .with_children(vec![AuxRecord::new("ecut", "2").with_unit("mm")]),
    ]);

    let mut store = GeometryStore::new();
    let report = import_regions(&tree, &mut store, true)?;
    assert_eq!(report.regions, ["Calo"]);
    assert!(matches!(
        report.warnings.as_slice(),
        [ImportWarning::DuplicateRegion { region }] if region == "Calo"
    ));

    assert_eq!(store.regions().len(), 1);
    let cuts = store.find_region("Calo").unwrap().production_cuts().unwrap();
    assert_relative_eq!(cuts.get(ParticleKind::Electron), 1.0);

    let exported = export_regions(&store, false);
    let names: Vec<&str> = exported.iter().map(|r| r.value.as_str()).collect();
    assert_eq!(names, ["Calo"]);
    Ok(())
}
