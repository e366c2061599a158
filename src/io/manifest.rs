// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Store manifests: a TOML/JSON description of volumes and regions
//!
//! ```toml
//! [[volumes]]
//! name = "Tracker"
//!
//! [[volumes]]
//! name = "Arm"
//! reflect = true
//!
//! [[regions]]
//! name = "TrackerRegion"
//! volumes = ["Tracker", "Arm"]
//! cuts = { electron = 1.5, proton = 20.0 }
//! limits = { label = "tracker", max_step = 10.0 }
//! ```
//!
//! Lengths are in mm, times in ns and energies in MeV.

use crate::geometry::{GeometryStore, ParticleKind, ProductionCuts, Region, StepLimits, UNLIMITED};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid TOML manifest: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported manifest format: {0}")]
    UnsupportedFormat(String),

    #[error("region '{region}' refers to unknown volume '{volume}'")]
    UnknownVolume { region: String, volume: String },

    #[error("region '{0}' is declared more than once")]
    DuplicateRegion(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreManifest {
    #[serde(default)]
    pub volumes: Vec<VolumeSpec>,
    #[serde(default)]
    pub regions: Vec<RegionSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeSpec {
    pub name: String,
    /// Also create the reflected counterpart `<name>_refl`
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub reflect: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSpec {
    pub name: String,
    #[serde(default)]
    pub volumes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuts: Option<CutsSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<LimitsSpec>,
}

/// Production cuts in mm; missing particles get the default cut
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CutsSpec {
    pub gamma: Option<f64>,
    pub electron: Option<f64>,
    pub positron: Option<f64>,
    pub proton: Option<f64>,
}

impl CutsSpec {
    fn slot(&mut self, kind: ParticleKind) -> &mut Option<f64> {
        match kind {
            ParticleKind::Gamma => &mut self.gamma,
            ParticleKind::Electron => &mut self.electron,
            ParticleKind::Positron => &mut self.positron,
            ParticleKind::Proton => &mut self.proton,
        }
    }

    pub fn to_cuts(mut self) -> ProductionCuts {
        let mut cuts = ProductionCuts::default();
        for kind in ParticleKind::ALL {
            if let Some(value) = *self.slot(kind) {
                cuts.set(kind, value);
            }
        }
        cuts
    }

    pub fn from_cuts(cuts: &ProductionCuts) -> Self {
        let mut spec = Self::default();
        for (kind, value) in cuts.iter() {
            *spec.slot(kind) = Some(value);
        }
        spec
    }
}

/// Step limits; missing maxima are unlimited, missing minima are zero
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LimitsSpec {
    #[serde(default)]
    pub label: String,
    pub max_step: Option<f64>,
    pub max_track: Option<f64>,
    pub max_time: Option<f64>,
    pub min_kinetic_energy: Option<f64>,
    pub min_range: Option<f64>,
}

impl LimitsSpec {
    pub fn to_limits(&self) -> StepLimits {
        StepLimits {
            label: self.label.clone(),
            max_step: self.max_step.unwrap_or(UNLIMITED),
            max_track: self.max_track.unwrap_or(UNLIMITED),
            max_time: self.max_time.unwrap_or(UNLIMITED),
            min_kinetic_energy: self.min_kinetic_energy.unwrap_or(0.0),
            min_range: self.min_range.unwrap_or(0.0),
        }
    }

    /// Unlimited maxima are left out
    pub fn from_limits(limits: &StepLimits) -> Self {
        let bounded = |v: f64| (v < UNLIMITED).then_some(v);
        Self {
            label: limits.label.clone(),
            max_step: bounded(limits.max_step),
            max_track: bounded(limits.max_track),
            max_time: bounded(limits.max_time),
            min_kinetic_energy: Some(limits.min_kinetic_energy),
            min_range: Some(limits.min_range),
        }
    }
}

impl RegionSpec {
    /// Describe a region of `store`
    pub fn from_region(region: &Region, store: &GeometryStore) -> Self {
        Self {
            name: region.name().to_string(),
            volumes: region
                .root_volumes()
                .iter()
                .map(|id| store.volume_name(*id).to_string())
                .collect(),
            cuts: region.production_cuts().map(CutsSpec::from_cuts),
            limits: region.step_limits().map(LimitsSpec::from_limits),
        }
    }
}

impl StoreManifest {
    /// Load a `.toml` or `.json` manifest
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&content),
            Some("json") => Ok(serde_json::from_str(&content)?),
            _ => Err(ManifestError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, ManifestError> {
        Ok(toml::from_str(content)?)
    }

    /// Describe every volume and region of `store`; reflected copies are
    /// folded into their original's `reflect` flag
    pub fn from_store(store: &GeometryStore) -> Self {
        let volumes = store
            .volumes()
            .filter(|(id, _)| !store.is_reflected(*id))
            .map(|(id, v)| VolumeSpec {
                name: v.name.clone(),
                reflect: store.reflection(id).is_some(),
            })
            .collect();
        let regions = store
            .regions()
            .iter()
            .map(|r| RegionSpec::from_region(r, store))
            .collect();
        Self { volumes, regions }
    }

    /// Volumes only, without regions
    pub fn build_volumes(&self) -> GeometryStore {
        let mut store = GeometryStore::new();
        for spec in &self.volumes {
            let id = store.add_volume(spec.name.clone());
            if spec.reflect {
                store.reflect_volume(id);
            }
        }
        store
    }

    /// Volumes and regions; a region naming a reflected original also
    /// gets its reflected copy
    pub fn build_store(&self) -> Result<GeometryStore, ManifestError> {
        let mut store = self.build_volumes();

        for spec in &self.regions {
            let mut region = Region::new(spec.name.clone());
            for volume in &spec.volumes {
                let matches = store.find_by_name(volume);
                if matches.is_empty() {
                    return Err(ManifestError::UnknownVolume {
                        region: spec.name.clone(),
                        volume: volume.clone(),
                    });
                }
                for id in matches {
                    region.add_root_volume(*id);
                    if let Some(reflected) = store.reflection(*id) {
                        region.add_root_volume(reflected);
                    }
                }
            }
            if let Some(cuts) = spec.cuts {
                region.set_production_cuts(cuts.to_cuts());
            }
            if let Some(limits) = &spec.limits {
                region.set_step_limits(limits.to_limits());
            }
            if !store.register_region(region) {
                return Err(ManifestError::DuplicateRegion(spec.name.clone()));
            }
        }

        Ok(store)
    }
}
