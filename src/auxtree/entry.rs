// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Typed view of the children of a "Region" record
//!
//! Known tags map onto closed variants; anything else is kept verbatim in
//! [`RegionEntry::Unknown`] so readers can skip it and writers can pass it on.

use super::AuxRecord;
use crate::geometry::{ParticleKind, StepLimits};
use thiserror::Error;

pub const REGION_TAG: &str = "Region";
pub const VOLUME_TAG: &str = "volume";
pub const LIMITS_TAG: &str = "ulimits";

/// A child of "ulimits" whose tag is not a limit field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown user-limit tag '{0}'")]
pub struct UnknownLimitTag(pub String);

/// One field of a user-limit set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitField {
    MaxStep,
    MaxTrack,
    MaxTime,
    MinKineticEnergy,
    MinRange,
}

impl LimitField {
    /// Export order
    pub const ALL: [LimitField; 5] = [
        LimitField::MaxStep,
        LimitField::MaxTrack,
        LimitField::MaxTime,
        LimitField::MinKineticEnergy,
        LimitField::MinRange,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            LimitField::MaxStep => "ustepMax",
            LimitField::MaxTrack => "utrakMax",
            LimitField::MaxTime => "utimeMax",
            LimitField::MinKineticEnergy => "uekinMin",
            LimitField::MinRange => "urangMin",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.tag() == tag)
    }

    pub fn get(&self, limits: &StepLimits) -> f64 {
        match self {
            LimitField::MaxStep => limits.max_step,
            LimitField::MaxTrack => limits.max_track,
            LimitField::MaxTime => limits.max_time,
            LimitField::MinKineticEnergy => limits.min_kinetic_energy,
            LimitField::MinRange => limits.min_range,
        }
    }

    pub fn set(&self, limits: &mut StepLimits, value: f64) {
        match self {
            LimitField::MaxStep => limits.max_step = value,
            LimitField::MaxTrack => limits.max_track = value,
            LimitField::MaxTime => limits.max_time = value,
            LimitField::MinKineticEnergy => limits.min_kinetic_energy = value,
            LimitField::MinRange => limits.min_range = value,
        }
    }
}

/// Unresolved value of one limit field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitValue {
    pub field: LimitField,
    pub value: String,
    pub unit: String,
}

/// Unresolved "ulimits" record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitsEntry {
    pub label: String,
    /// Scale expression for children that carry no unit of their own
    pub unit: String,
    pub fields: Vec<LimitValue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionEntry {
    Volume {
        name: String,
    },
    Cut {
        kind: ParticleKind,
        value: String,
        unit: String,
    },
    Limits(LimitsEntry),
    Unknown(AuxRecord),
}

impl RegionEntry {
    /// Classify a child record of a "Region"
    pub fn from_record(record: &AuxRecord) -> Result<Self, UnknownLimitTag> {
        if record.tag == VOLUME_TAG {
            return Ok(RegionEntry::Volume {
                name: record.value.clone(),
            });
        }
        if let Some(kind) = ParticleKind::from_cut_tag(&record.tag) {
            return Ok(RegionEntry::Cut {
                kind,
                value: record.value.clone(),
                unit: record.unit.clone(),
            });
        }
        if record.tag == LIMITS_TAG {
            let fields = record
                .children()
                .iter()
                .map(|child| {
                    LimitField::from_tag(&child.tag)
                        .map(|field| LimitValue {
                            field,
                            value: child.value.clone(),
                            unit: child.unit.clone(),
                        })
                        .ok_or_else(|| UnknownLimitTag(child.tag.clone()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(RegionEntry::Limits(LimitsEntry {
                label: record.value.clone(),
                unit: record.unit.clone(),
                fields,
            }));
        }
        Ok(RegionEntry::Unknown(record.clone()))
    }

    pub fn into_record(self) -> AuxRecord {
        match self {
            RegionEntry::Volume { name } => AuxRecord::new(VOLUME_TAG, name),
            RegionEntry::Cut { kind, value, unit } => {
                AuxRecord::new(kind.cut_tag(), value).with_unit(unit)
            }
            RegionEntry::Limits(limits) => {
                let children = limits
                    .fields
                    .into_iter()
                    .map(|f| AuxRecord::new(f.field.tag(), f.value).with_unit(f.unit))
                    .collect();
                AuxRecord::new(LIMITS_TAG, limits.label)
                    .with_unit(limits.unit)
                    .with_children(children)
            }
            RegionEntry::Unknown(record) => record,
        }
    }
}
