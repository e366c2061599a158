// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Raw auxiliary records

use serde::{Deserialize, Serialize};

/// One tagged node of the auxiliary tree
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuxRecord {
    pub tag: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub unit: String,
    /// `None` when the record has no child list at all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<AuxRecord>>,
}

impl AuxRecord {
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            value: value.into(),
            unit: String::new(),
            children: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn with_children(mut self, children: Vec<AuxRecord>) -> Self {
        self.children = Some(children);
        self
    }

    /// Append a child, creating the child list if needed
    pub fn push_child(&mut self, child: AuxRecord) {
        self.children.get_or_insert_with(Vec::new).push(child);
    }

    /// Children, empty when absent
    pub fn children(&self) -> &[AuxRecord] {
        self.children.as_deref().unwrap_or_default()
    }

    pub fn has_children(&self) -> bool {
        !self.children().is_empty()
    }
}

/// Receives top-level records produced by an exporter
pub trait AuxSink {
    fn add_auxiliary(&mut self, record: AuxRecord);
}

/// Ordered list of top-level auxiliary records
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuxTree {
    records: Vec<AuxRecord>,
}

impl AuxTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: AuxRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[AuxRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AuxRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Top-level records with the given tag
    pub fn with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a AuxRecord> + 'a {
        self.records.iter().filter(move |r| r.tag == tag)
    }

    pub fn into_records(self) -> Vec<AuxRecord> {
        self.records
    }
}

impl AuxSink for AuxTree {
    fn add_auxiliary(&mut self, record: AuxRecord) {
        self.push(record);
    }
}

impl AuxSink for Vec<AuxRecord> {
    fn add_auxiliary(&mut self, record: AuxRecord) {
        self.push(record);
    }
}

impl From<Vec<AuxRecord>> for AuxTree {
    fn from(records: Vec<AuxRecord>) -> Self {
        Self { records }
    }
}

impl FromIterator<AuxRecord> for AuxTree {
    fn from_iter<I: IntoIterator<Item = AuxRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a AuxTree {
    type Item = &'a AuxRecord;
    type IntoIter = std::slice::Iter<'a, AuxRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
