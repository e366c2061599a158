// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Region comparison and diff utilities

use crate::geometry::{GeometryStore, ParticleKind, ProductionCuts, Region};
use crate::auxtree::LimitField;
use serde::{Deserialize, Serialize};

/// Relative tolerance used when comparing resolved values
pub const VALUE_TOLERANCE: f64 = 1e-12;

/// Result of comparing the regions of two stores
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub passed: bool,
    pub regions_a: usize,
    pub regions_b: usize,
    pub mismatches: Vec<String>,
}

impl ComparisonResult {
    pub fn summary(&self) -> String {
        format!(
            "Regions: {} vs {}, {} mismatch(es)",
            self.regions_a,
            self.regions_b,
            self.mismatches.len()
        )
    }
}

/// Region diff utilities
pub struct RegionDiff;

impl RegionDiff {
    /// Compare every region of `a` with the region of the same name in `b`.
    ///
    /// Regions without cuts compare as if they carried the default cuts, since
    /// the exporter always writes them.
    pub fn compare(a: &GeometryStore, b: &GeometryStore) -> ComparisonResult {
        let mut mismatches = Vec::new();

        for region in a.regions() {
            match b.find_region(region.name()) {
                Some(other) => Self::compare_region(a, region, b, other, &mut mismatches),
                None => mismatches.push(format!("region '{}' missing", region.name())),
            }
        }
        for region in b.regions() {
            if a.find_region(region.name()).is_none() {
                mismatches.push(format!("unexpected region '{}'", region.name()));
            }
        }

        ComparisonResult {
            passed: mismatches.is_empty(),
            regions_a: a.regions().len(),
            regions_b: b.regions().len(),
            mismatches,
        }
    }

    fn compare_region(
        store_a: &GeometryStore,
        a: &Region,
        store_b: &GeometryStore,
        b: &Region,
        mismatches: &mut Vec<String>,
    ) {
        let name = a.name();

        let volumes = |store: &GeometryStore, region: &Region| -> Vec<String> {
            let mut names: Vec<String> = region
                .root_volumes()
                .iter()
                .map(|id| store.volume_name(*id).to_string())
                .collect();
            names.sort();
            names
        };
        if volumes(store_a, a) != volumes(store_b, b) {
            mismatches.push(format!("region '{}': root volumes differ", name));
        }

        let cuts_a = a.production_cuts().copied().unwrap_or_default();
        let cuts_b = b.production_cuts().copied().unwrap_or_default();
        for kind in ParticleKind::ALL {
            Self::compare_cut(name, kind, &cuts_a, &cuts_b, mismatches);
        }

        match (a.step_limits(), b.step_limits()) {
            (Some(la), Some(lb)) => {
                if la.label != lb.label {
                    mismatches.push(format!("region '{}': limit label differs", name));
                }
                for field in LimitField::ALL {
                    if !values_match(field.get(la), field.get(lb)) {
                        mismatches.push(format!(
                            "region '{}': {} {} vs {}",
                            name,
                            field.tag(),
                            field.get(la),
                            field.get(lb)
                        ));
                    }
                }
            }
            (None, None) => {}
            _ => mismatches.push(format!("region '{}': step limits present on one side only", name)),
        }
    }

    fn compare_cut(
        name: &str,
        kind: ParticleKind,
        a: &ProductionCuts,
        b: &ProductionCuts,
        mismatches: &mut Vec<String>,
    ) {
        if !values_match(a.get(kind), b.get(kind)) {
            mismatches.push(format!(
                "region '{}': {} cut {} vs {}",
                name,
                kind,
                a.get(kind),
                b.get(kind)
            ));
        }
    }
}

/// Equal within [`VALUE_TOLERANCE`], relative to the larger magnitude
pub fn values_match(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    let scale = a.abs().max(b.abs());
    (a - b).abs() <= VALUE_TOLERANCE * scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::StepLimits;

    fn store_with(region: Region) -> GeometryStore {
        let mut store = GeometryStore::new();
        store.register_region(region);
        store
    }

    #[test]
    fn test_identical_stores_pass() {
        let mut region = Region::new("R");
        region.set_step_limits(StepLimits::new("l"));
        let result = RegionDiff::compare(&store_with(region.clone()), &store_with(region));
        assert!(result.passed, "{:?}", result.mismatches);
    }

    #[test]
    fn test_missing_cuts_equal_defaults() {
        let mut explicit = Region::new("R");
        explicit.set_production_cuts(ProductionCuts::default());
        let result = RegionDiff::compare(&store_with(explicit), &store_with(Region::new("R")));
        assert!(result.passed);
    }

    #[test]
    fn test_cut_and_region_mismatches() {
        let mut a = Region::new("R");
        a.set_production_cuts(ProductionCuts::uniform(1.0));
        let result = RegionDiff::compare(&store_with(a), &store_with(Region::new("S")));
        assert!(!result.passed);
        assert_eq!(result.mismatches.len(), 2);
    }

    #[test]
    fn test_values_match() {
        assert!(values_match(f64::MAX, f64::MAX));
        assert!(values_match(0.1 + 0.2, 0.3));
        assert!(!values_match(1.0, 1.001));
    }
}
