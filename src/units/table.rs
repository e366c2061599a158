// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Unit definitions in the internal unit system (mm, ns, MeV, rad)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical category of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitCategory {
    Length,
    Time,
    Energy,
    Angle,
    Mass,
}

impl UnitCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitCategory::Length => "Length",
            UnitCategory::Time => "Time",
            UnitCategory::Energy => "Energy",
            UnitCategory::Angle => "Angle",
            UnitCategory::Mass => "Mass",
        }
    }
}

impl fmt::Display for UnitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named unit with its value in internal units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitDefinition {
    pub name: &'static str,
    pub symbol: &'static str,
    pub category: UnitCategory,
    pub value: f64,
}

pub const MILLIMETER: f64 = 1.0;
pub const NANOSECOND: f64 = 1.0;
pub const MEGAELECTRONVOLT: f64 = 1.0;
pub const RADIAN: f64 = 1.0;

const METER: f64 = 1000.0 * MILLIMETER;
const SECOND: f64 = 1.0e9 * NANOSECOND;
const ELECTRONVOLT: f64 = 1.0e-6 * MEGAELECTRONVOLT;
const E_SI: f64 = 1.602176634e-19;
const JOULE: f64 = ELECTRONVOLT / E_SI;
const KILOGRAM: f64 = JOULE * SECOND * SECOND / (METER * METER);

static UNITS: &[UnitDefinition] = &[
    // Length
    unit("parsec", "pc", UnitCategory::Length, 3.0856775807e16 * METER),
    unit("kilometer", "km", UnitCategory::Length, 1000.0 * METER),
    unit("meter", "m", UnitCategory::Length, METER),
    unit("centimeter", "cm", UnitCategory::Length, 10.0 * MILLIMETER),
    unit("millimeter", "mm", UnitCategory::Length, MILLIMETER),
    unit("micrometer", "um", UnitCategory::Length, 1.0e-3 * MILLIMETER),
    unit("nanometer", "nm", UnitCategory::Length, 1.0e-6 * MILLIMETER),
    unit("angstrom", "Ang", UnitCategory::Length, 1.0e-7 * MILLIMETER),
    unit("fermi", "fm", UnitCategory::Length, 1.0e-12 * MILLIMETER),
    // Time
    unit("year", "y", UnitCategory::Time, 365.0 * 24.0 * 3600.0 * SECOND),
    unit("day", "d", UnitCategory::Time, 24.0 * 3600.0 * SECOND),
    unit("hour", "h", UnitCategory::Time, 3600.0 * SECOND),
    unit("minute", "min", UnitCategory::Time, 60.0 * SECOND),
    unit("second", "s", UnitCategory::Time, SECOND),
    unit("millisecond", "ms", UnitCategory::Time, 1.0e6 * NANOSECOND),
    unit("microsecond", "us", UnitCategory::Time, 1.0e3 * NANOSECOND),
    unit("nanosecond", "ns", UnitCategory::Time, NANOSECOND),
    unit("picosecond", "ps", UnitCategory::Time, 1.0e-3 * NANOSECOND),
    // Energy
    unit("petaelectronvolt", "PeV", UnitCategory::Energy, 1.0e9 * MEGAELECTRONVOLT),
    unit("teraelectronvolt", "TeV", UnitCategory::Energy, 1.0e6 * MEGAELECTRONVOLT),
    unit("gigaelectronvolt", "GeV", UnitCategory::Energy, 1.0e3 * MEGAELECTRONVOLT),
    unit("megaelectronvolt", "MeV", UnitCategory::Energy, MEGAELECTRONVOLT),
    unit("kiloelectronvolt", "keV", UnitCategory::Energy, 1.0e-3 * MEGAELECTRONVOLT),
    unit("electronvolt", "eV", UnitCategory::Energy, ELECTRONVOLT),
    unit("joule", "J", UnitCategory::Energy, JOULE),
    // Angle
    unit("radian", "rad", UnitCategory::Angle, RADIAN),
    unit("milliradian", "mrad", UnitCategory::Angle, 1.0e-3 * RADIAN),
    unit("degree", "deg", UnitCategory::Angle, std::f64::consts::PI / 180.0 * RADIAN),
    unit("steradian", "sr", UnitCategory::Angle, 1.0),
    // Mass
    unit("kilogram", "kg", UnitCategory::Mass, KILOGRAM),
    unit("gram", "g", UnitCategory::Mass, 1.0e-3 * KILOGRAM),
    unit("milligram", "mg", UnitCategory::Mass, 1.0e-6 * KILOGRAM),
];

const fn unit(
    name: &'static str,
    symbol: &'static str,
    category: UnitCategory,
    value: f64,
) -> UnitDefinition {
    UnitDefinition {
        name,
        symbol,
        category,
        value,
    }
}

/// Look up a unit by full name or symbol
pub fn lookup(name: &str) -> Option<&'static UnitDefinition> {
    UNITS.iter().find(|u| u.symbol == name || u.name == name)
}

/// All known unit definitions
#[cfg(test)]
fn all() -> &'static [UnitDefinition] {
    UNITS
}
