// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Codec errors and lookup warnings

use crate::units::EvalError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Fatal failures of an import or export call
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid definition of region '{region}': no attributes")]
    MissingChildren { region: String },

    #[error("invalid user-limits in region '{region}': unknown tag '{tag}'")]
    UnknownLimitTag { region: String, tag: String },

    #[error("invalid unit '{unit}' for '{tag}' in region '{region}': expected a length")]
    InvalidUnitCategory {
        region: String,
        tag: String,
        unit: String,
    },

    #[error("invalid expression in region '{region}': {source}")]
    Expression {
        region: String,
        #[source]
        source: EvalError,
    },

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of a [`CodecError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or missing records
    Structural,
    /// Wrong unit category or unparseable value
    Unit,
    /// The underlying document could not be read or written
    Io,
}

impl CodecError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::MissingChildren { .. } | CodecError::UnknownLimitTag { .. } => {
                ErrorKind::Structural
            }
            CodecError::InvalidUnitCategory { .. } | CodecError::Expression { .. } => {
                ErrorKind::Unit
            }
            CodecError::Xml(_) | CodecError::Io(_) => ErrorKind::Io,
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for CodecError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        CodecError::Xml(err.into())
    }
}

pub type CodecResult<T> = Result<T, CodecError>;

/// Non-fatal problems found while linking regions to volumes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImportWarning {
    VolumeNotFound {
        region: String,
        volume: String,
    },
    AmbiguousVolumeName {
        region: String,
        volume: String,
        matches: usize,
    },
    /// A region of the same name is already registered; the later one is dropped
    DuplicateRegion {
        region: String,
    },
}

impl fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportWarning::VolumeNotFound { region, volume } => write!(
                f,
                "volume '{}' not found in store; no root volume set for region '{}'",
                volume, region
            ),
            ImportWarning::AmbiguousVolumeName {
                region,
                volume,
                matches,
            } => write!(
                f,
                "{} logical volumes named '{}'; assigning all as root volumes of region '{}'",
                matches, volume, region
            ),
            ImportWarning::DuplicateRegion { region } => write!(
                f,
                "region '{}' already exists; keeping the first definition",
                region
            ),
        }
    }
}

/// Outcome of a successful import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Names of the regions registered, in order
    pub regions: Vec<String>,
    /// Default regions that were skipped
    pub skipped: usize,
    pub warnings: Vec<ImportWarning>,
}

impl ImportReport {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
