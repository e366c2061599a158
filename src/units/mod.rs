// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Units and expressions
//!
//! Every numeric value read from or written to a GDML document passes through
//! the [`Evaluator`], which resolves literals and unit expressions into the
//! internal unit system (millimeter, nanosecond, MeV, radian).

mod evaluator;
mod table;

pub use evaluator::{format_value, EvalError, EvalResult, Evaluator};
pub use table::{lookup as lookup_unit, UnitCategory, UnitDefinition, MEGAELECTRONVOLT, MILLIMETER, NANOSECOND};
