//! Rule store
//!
//! Holds every rule behind an `Arc` so readers can keep a rule alive while
//! a writer replaces it. Edits never happen in place: the rule is cloned,
//! changed and swapped in as a whole.

use crate::catalog::AttributeCatalog;
use crate::error::{EngineError, Result};
use crate::modification::NodeModification;
use rulecraft_core::{Expr, Rule, RuleId, RuleSummary};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Rule store
#[derive(Debug, Clone)]
pub struct RuleStore {
    /// Ids only ever grow, so key order is insertion order
    rules: BTreeMap<RuleId, Arc<Rule>>,
    next_id: RuleId,
}

impl Default for RuleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleStore {
    pub fn new() -> Self {
        Self {
            rules: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Rebuild a store from persisted rules
    pub fn from_parts(rules: Vec<Rule>, next_id: RuleId) -> Self {
        Self {
            rules: rules.into_iter().map(|r| (r.id, Arc::new(r))).collect(),
            next_id,
        }
    }

    /// Store a new rule; node ids are assigned 1.. in pre-order
    pub fn create(&mut self, name: &str, expr: &Expr, rule_string: &str) -> Arc<Rule> {
        let id = self.next_id;
        self.next_id += 1;
        let rule = Arc::new(Rule::new(id, name, expr, rule_string));
        self.rules.insert(id, Arc::clone(&rule));
        rule
    }

    pub fn get(&self, rule_id: RuleId) -> Result<Arc<Rule>> {
        self.rules
            .get(&rule_id)
            .cloned()
            .ok_or_else(|| EngineError::NotFound(format!("rule {}", rule_id)))
    }

    /// `{id, name}` of every rule, in creation order
    pub fn list(&self) -> Vec<RuleSummary> {
        self.rules.values().map(|r| r.summary()).collect()
    }

    /// Rules in creation order
    pub fn rules(&self) -> impl Iterator<Item = &Arc<Rule>> {
        self.rules.values()
    }

    /// Apply a node modification, replacing the stored rule on success
    pub fn modify(
        &mut self,
        rule_id: RuleId,
        modification: &NodeModification,
        catalog: &AttributeCatalog,
        strict: bool,
    ) -> Result<Arc<Rule>> {
        let mut rule = Rule::clone(&*self.get(rule_id)?);
        modification.apply(&mut rule, catalog, strict)?;
        let rule = Arc::new(rule);
        self.rules.insert(rule_id, Arc::clone(&rule));
        Ok(rule)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn next_id(&self) -> RuleId {
        self.next_id
    }
}
