// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Regions, production cuts and step limits

use super::VolumeId;
use crate::units::MILLIMETER;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Range cut applied to every particle kind when none was configured
pub const DEFAULT_CUT_VALUE: f64 = 0.7 * MILLIMETER;

/// Sentinel for an unbounded step, track or time limit
pub const UNLIMITED: f64 = f64::MAX;

/// Particle kinds that carry a production cut
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleKind {
    Gamma,
    Electron,
    Positron,
    Proton,
}

impl ParticleKind {
    /// Export order of cut records
    pub const ALL: [ParticleKind; 4] = [
        ParticleKind::Gamma,
        ParticleKind::Electron,
        ParticleKind::Positron,
        ParticleKind::Proton,
    ];

    /// Auxiliary tag carrying this particle's cut
    pub fn cut_tag(&self) -> &'static str {
        match self {
            ParticleKind::Gamma => "gamcut",
            ParticleKind::Electron => "ecut",
            ParticleKind::Positron => "poscut",
            ParticleKind::Proton => "pcut",
        }
    }

    pub fn from_cut_tag(tag: &str) -> Option<Self> {
        match tag {
            "gamcut" => Some(ParticleKind::Gamma),
            "ecut" => Some(ParticleKind::Electron),
            "poscut" => Some(ParticleKind::Positron),
            "pcut" => Some(ParticleKind::Proton),
            _ => None,
        }
    }

    /// Particle name as used by the simulation toolkit
    pub fn particle_name(&self) -> &'static str {
        match self {
            ParticleKind::Gamma => "gamma",
            ParticleKind::Electron => "e-",
            ParticleKind::Positron => "e+",
            ParticleKind::Proton => "proton",
        }
    }

    fn index(&self) -> usize {
        match self {
            ParticleKind::Gamma => 0,
            ParticleKind::Electron => 1,
            ParticleKind::Positron => 2,
            ParticleKind::Proton => 3,
        }
    }
}

impl fmt::Display for ParticleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.particle_name())
    }
}

/// Per-particle production cut lengths, in internal units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProductionCuts {
    cuts: [f64; 4],
}

impl ProductionCuts {
    /// All four particle kinds share `value`
    pub fn uniform(value: f64) -> Self {
        Self { cuts: [value; 4] }
    }

    pub fn get(&self, kind: ParticleKind) -> f64 {
        self.cuts[kind.index()]
    }

    pub fn set(&mut self, kind: ParticleKind, value: f64) {
        self.cuts[kind.index()] = value;
    }

    pub fn with(mut self, kind: ParticleKind, value: f64) -> Self {
        self.set(kind, value);
        self
    }

    /// Iterate in export order
    pub fn iter(&self) -> impl Iterator<Item = (ParticleKind, f64)> + '_ {
        ParticleKind::ALL.iter().map(move |k| (*k, self.get(*k)))
    }
}

impl Default for ProductionCuts {
    fn default() -> Self {
        Self::uniform(DEFAULT_CUT_VALUE)
    }
}

/// User step limits attached to a region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepLimits {
    /// Free-form label of the limit set
    pub label: String,
    pub max_step: f64,
    pub max_track: f64,
    pub max_time: f64,
    pub min_kinetic_energy: f64,
    pub min_range: f64,
}

impl StepLimits {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            max_step: UNLIMITED,
            max_track: UNLIMITED,
            max_time: UNLIMITED,
            min_kinetic_energy: 0.0,
            min_range: 0.0,
        }
    }
}

impl Default for StepLimits {
    fn default() -> Self {
        Self::new("")
    }
}

/// A named group of root volumes sharing cuts and limits
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    name: String,
    root_volumes: Vec<VolumeId>,
    production_cuts: Option<ProductionCuts>,
    step_limits: Option<StepLimits>,
}

impl Region {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root_volumes: Vec::new(),
            production_cuts: None,
            step_limits: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a root volume; returns false if it was already present
    pub fn add_root_volume(&mut self, volume: VolumeId) -> bool {
        if self.root_volumes.contains(&volume) {
            return false;
        }
        self.root_volumes.push(volume);
        true
    }

    pub fn root_volumes(&self) -> &[VolumeId] {
        &self.root_volumes
    }

    pub fn production_cuts(&self) -> Option<&ProductionCuts> {
        self.production_cuts.as_ref()
    }

    /// Cuts attached to the region, attaching defaults first if there are none
    pub fn production_cuts_mut(&mut self) -> &mut ProductionCuts {
        self.production_cuts.get_or_insert_with(ProductionCuts::default)
    }

    pub fn set_production_cuts(&mut self, cuts: ProductionCuts) {
        self.production_cuts = Some(cuts);
    }

    pub fn step_limits(&self) -> Option<&StepLimits> {
        self.step_limits.as_ref()
    }

    pub fn set_step_limits(&mut self, limits: StepLimits) {
        self.step_limits = Some(limits);
    }
}

/// True for the regions the toolkit synthesizes for world volumes
pub fn is_default_region(name: &str) -> bool {
    name.contains("DefaultRegionForTheWorld") || name.contains("DefaultRegionForParallelWorld")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cut_tags_round_trip() {
        for kind in ParticleKind::ALL {
            assert_eq!(ParticleKind::from_cut_tag(kind.cut_tag()), Some(kind));
        }
        assert_eq!(ParticleKind::from_cut_tag("ncut"), None);
        assert_eq!(ParticleKind::Positron.to_string(), "e+");
    }

    #[test]
    fn test_production_cuts_defaults_and_set() {
        let cuts = ProductionCuts::default().with(ParticleKind::Proton, 2.0);
        assert_eq!(cuts.get(ParticleKind::Proton), 2.0);
        assert_eq!(cuts.get(ParticleKind::Gamma), DEFAULT_CUT_VALUE);
        let order: Vec<_> = cuts.iter().map(|(k, _)| k.cut_tag()).collect();
        assert_eq!(order, ["gamcut", "ecut", "poscut", "pcut"]);
    }

    #[test]
    fn test_step_limit_defaults() {
        let limits = StepLimits::new("tracker");
        assert_eq!(limits.max_step, UNLIMITED);
        assert_eq!(limits.max_time, UNLIMITED);
        assert_eq!(limits.min_range, 0.0);
    }

    #[test]
    fn test_region_root_volumes_are_a_set() {
        let mut region = Region::new("Calo");
        assert!(region.add_root_volume(VolumeId(3)));
        assert!(!region.add_root_volume(VolumeId(3)));
        assert!(region.add_root_volume(VolumeId(1)));
        assert_eq!(region.root_volumes(), &[VolumeId(3), VolumeId(1)]);
        assert!(region.production_cuts().is_none());
        region.production_cuts_mut().set(ParticleKind::Electron, 1.0);
        assert_eq!(region.production_cuts().map(|c| c.get(ParticleKind::Gamma)), Some(0.7));
    }

    #[test]
    fn test_default_region_names() {
        assert!(is_default_region("DefaultRegionForTheWorld"));
        assert!(is_default_region("DefaultRegionForParallelWorld0x1234"));
        assert!(!is_default_region("TrackerRegion"));
    }
}
