//! Data models for the repository layer

use rulecraft_core::{Attribute, AttributeId, Rule, RuleId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::{RepositoryError, RepositoryResult};

/// Name of the snapshot file inside a file system repository
pub const SNAPSHOT_FILE: &str = "rules.json";

/// Everything the engine needs to resume: the attribute catalog, the
/// rule store and both id counters.
///
/// Counters are persisted rather than derived so ids are never reused,
/// even for rules that no longer exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub attributes: Vec<Attribute>,
    pub rules: Vec<Rule>,
    pub next_attribute_id: AttributeId,
    pub next_rule_id: RuleId,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            attributes: Vec::new(),
            rules: Vec::new(),
            next_attribute_id: 1,
            next_rule_id: 1,
        }
    }
}

impl Snapshot {
    /// Check the invariants a loaded snapshot must satisfy before the
    /// engine trusts it
    pub fn validate(&self) -> RepositoryResult<()> {
        let mut attribute_ids = HashSet::new();
        let mut attribute_names = HashSet::new();
        for attribute in &self.attributes {
            if attribute.id >= self.next_attribute_id {
                return Err(RepositoryError::Corrupt(format!(
                    "attribute id {} is not below next_attribute_id {}",
                    attribute.id, self.next_attribute_id
                )));
            }
            if !attribute_ids.insert(attribute.id) {
                return Err(RepositoryError::Corrupt(format!(
                    "duplicate attribute id {}",
                    attribute.id
                )));
            }
            if !attribute_names.insert(attribute.attribute_name.as_str()) {
                return Err(RepositoryError::Corrupt(format!(
                    "duplicate attribute name '{}'",
                    attribute.attribute_name
                )));
            }
        }

        let mut rule_ids = HashSet::new();
        for rule in &self.rules {
            if rule.id >= self.next_rule_id {
                return Err(RepositoryError::Corrupt(format!(
                    "rule id {} is not below next_rule_id {}",
                    rule.id, self.next_rule_id
                )));
            }
            if !rule_ids.insert(rule.id) {
                return Err(RepositoryError::Corrupt(format!("duplicate rule id {}", rule.id)));
            }
            if !rule.is_well_formed() {
                return Err(RepositoryError::Corrupt(format!(
                    "rule {} has a malformed tree",
                    rule.id
                )));
            }
        }

        Ok(())
    }
}
