// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Codec configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file looked up in the working directory
pub const CONFIG_FILE: &str = "gdml-regions.toml";

/// Codec configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Strip reference suffixes from names on import
    pub strip_names: bool,
    /// Keep reference suffixes on exported names
    pub store_references: bool,
    /// Export regions when writing a document
    pub export_regions: bool,
    /// Indent written XML
    pub pretty_xml: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            strip_names: true,
            store_references: true,
            export_regions: true,
            pretty_xml: true,
        }
    }
}

impl CodecConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: CodecConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn load() -> Result<Self> {
        let mut config = if PathBuf::from(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply `GDML_REGIONS_*` overrides; unparseable values are ignored
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        let flag = |key: &str| var(key).and_then(|v| parse_flag(&v));

        if let Some(strip) = flag("GDML_REGIONS_STRIP_NAMES") {
            self.strip_names = strip;
        }
        if let Some(refs) = flag("GDML_REGIONS_STORE_REFERENCES") {
            self.store_references = refs;
        }
        if let Some(export) = flag("GDML_REGIONS_EXPORT") {
            self.export_regions = export;
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
