// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Export names and reference suffixes

use super::VolumeId;

/// Marker that starts a reference suffix
pub const REFERENCE_MARKER: &str = "0x";

/// Entity an exported name is generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameOwner {
    Volume(VolumeId),
    /// Region at this position of the store's region list
    Region(usize),
}

impl NameOwner {
    /// Serial encoded into the reference suffix; volumes and regions never
    /// collide. Indices wrap modulo 2^31.
    pub fn serial(&self) -> u32 {
        match self {
            NameOwner::Volume(id) => low_bits(id.index()),
            NameOwner::Region(index) => REGION_BIT | low_bits(*index),
        }
    }
}

const REGION_BIT: u32 = 0x8000_0000;
const SERIAL_MASK: usize = 0x7fff_ffff;

fn low_bits(index: usize) -> u32 {
    u32::try_from(index & SERIAL_MASK).unwrap_or_default()
}

/// Produces export-stable identifiers
pub trait NameGenerator {
    fn generate(&self, base: &str, owner: NameOwner) -> String;
}

/// Appends a `0x`-prefixed serial to every name when references are enabled
#[derive(Debug, Clone, Copy)]
pub struct ReferenceNames {
    pub add_references: bool,
}

impl ReferenceNames {
    pub fn new(add_references: bool) -> Self {
        Self { add_references }
    }
}

impl Default for ReferenceNames {
    fn default() -> Self {
        Self::new(true)
    }
}

impl NameGenerator for ReferenceNames {
    fn generate(&self, base: &str, owner: NameOwner) -> String {
        if self.add_references {
            format!("{}{}{:08x}", base, REFERENCE_MARKER, owner.serial())
        } else {
            base.to_string()
        }
    }
}

/// Remove a reference suffix in place
pub fn strip_name(name: &mut String) {
    if let Some(idx) = name.find(REFERENCE_MARKER) {
        name.truncate(idx);
    }
}

/// Copy of `name` without its reference suffix
pub fn stripped(name: &str) -> String {
    let mut owned = name.to_string();
    strip_name(&mut owned);
    owned
}
