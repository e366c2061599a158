// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry store: logical volumes and regions
//!
//! Volumes live in an arena and are addressed through [`VolumeId`] handles, so
//! regions record membership without borrowing from the store. Names are not
//! unique: the name index maps each name to every volume carrying it, in
//! insertion order.

use super::Region;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle of a logical volume inside a [`GeometryStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VolumeId(pub(crate) usize);

impl VolumeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for VolumeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A logical volume as far as regions are concerned
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalVolume {
    pub name: String,
    /// Set on a reflected copy: the original it mirrors
    pub reflected_of: Option<VolumeId>,
    /// Set on an original that has a reflected copy
    pub reflection: Option<VolumeId>,
}

/// Suffix given to reflected copies of a volume
pub const REFLECTED_SUFFIX: &str = "_refl";

#[derive(Debug, Default)]
pub struct GeometryStore {
    volumes: Vec<LogicalVolume>,
    by_name: AHashMap<String, Vec<VolumeId>>,
    regions: Vec<Region>,
}

impl GeometryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a volume; names may repeat
    pub fn add_volume(&mut self, name: impl Into<String>) -> VolumeId {
        self.push_volume(LogicalVolume {
            name: name.into(),
            reflected_of: None,
            reflection: None,
        })
    }

    /// Create (or return) the reflected counterpart of `original`; `None`
    /// for a handle from another store
    pub fn reflect_volume(&mut self, original: VolumeId) -> Option<VolumeId> {
        let volume = self.volumes.get(original.0)?;
        if let Some(existing) = volume.reflection {
            return Some(existing);
        }
        let name = format!("{}{}", volume.name, REFLECTED_SUFFIX);
        let reflected = self.push_volume(LogicalVolume {
            name,
            reflected_of: Some(original),
            reflection: None,
        });
        if let Some(volume) = self.volumes.get_mut(original.0) {
            volume.reflection = Some(reflected);
        }
        Some(reflected)
    }

    fn push_volume(&mut self, volume: LogicalVolume) -> VolumeId {
        let id = VolumeId(self.volumes.len());
        self.by_name.entry(volume.name.clone()).or_default().push(id);
        self.volumes.push(volume);
        id
    }

    pub fn volume(&self, id: VolumeId) -> Option<&LogicalVolume> {
        self.volumes.get(id.0)
    }

    /// Name of a volume; empty for a foreign handle
    pub fn volume_name(&self, id: VolumeId) -> &str {
        self.volume(id).map(|v| v.name.as_str()).unwrap_or_default()
    }

    pub fn volume_count(&self) -> usize {
        self.volumes.len()
    }

    pub fn volumes(&self) -> impl Iterator<Item = (VolumeId, &LogicalVolume)> {
        self.volumes.iter().enumerate().map(|(i, v)| (VolumeId(i), v))
    }

    /// Every volume carrying `name`
    pub fn find_by_name(&self, name: &str) -> &[VolumeId] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// The original volume if `id` is a reflected copy
    pub fn reflected_of(&self, id: VolumeId) -> Option<VolumeId> {
        self.volume(id).and_then(|v| v.reflected_of)
    }

    /// The reflected copy of `id`, if one exists
    pub fn reflection(&self, id: VolumeId) -> Option<VolumeId> {
        self.volume(id).and_then(|v| v.reflection)
    }

    pub fn is_reflected(&self, id: VolumeId) -> bool {
        self.reflected_of(id).is_some()
    }

    /// Register `region` unless one with the same name exists; returns
    /// whether it was added
    pub fn register_region(&mut self, region: Region) -> bool {
        if self.find_region(region.name()).is_some() {
            return false;
        }
        self.regions.push(region);
        true
    }

    /// Regions in registration order
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn find_region(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.name() == name)
    }

    pub fn find_region_mut(&mut self, name: &str) -> Option<&mut Region> {
        self.regions.iter_mut().find(|r| r.name() == name)
    }
}
