//! Rule engine service context
//!
//! `RuleEngine` owns the attribute catalog and rule store behind one
//! `RwLock` and persists every change through a [`Repository`]. Cloning it
//! is cheap; all clones share the same state.
//!
//! Writers run under the write lock: they build the next state on a copy,
//! save it, and only then swap it in. A failed validation or a failed save
//! leaves the visible state untouched. Readers take the read lock and so
//! never observe a half-applied change.

use crate::catalog::{AttributeCatalog, DEFAULT_ATTRIBUTES};
use crate::combiner;
use crate::error::{EngineError, Result};
use crate::evaluator::{Bindings, Evaluator};
use crate::modification::NodeModification;
use crate::optimizer;
use crate::store::RuleStore;
use rulecraft_core::{Attribute, DataType, LogicalOperator, Rule, RuleId, RuleSummary};
use rulecraft_parser::ExpressionParser;
use rulecraft_repository::{Repository, Snapshot};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, instrument};

/// Engine behaviour switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// Reject rules and edits that reference attributes missing from the
    /// catalog, instead of failing later at evaluation
    pub strict_attributes: bool,
}

/// Catalog and store, cloned as a unit for copy-on-write updates
#[derive(Debug, Clone, Default)]
pub(crate) struct EngineState {
    pub(crate) catalog: AttributeCatalog,
    pub(crate) store: RuleStore,
}

impl EngineState {
    pub(crate) fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            catalog: AttributeCatalog::from_parts(snapshot.attributes, snapshot.next_attribute_id),
            store: RuleStore::from_parts(snapshot.rules, snapshot.next_rule_id),
        }
    }

    fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            attributes: self.catalog.list().to_vec(),
            rules: self.store.rules().map(|r| Rule::clone(r)).collect(),
            next_attribute_id: self.catalog.next_id(),
            next_rule_id: self.store.next_id(),
        }
    }
}

/// Rule engine
#[derive(Clone)]
pub struct RuleEngine {
    state: Arc<RwLock<EngineState>>,
    repository: Arc<dyn Repository>,
    options: EngineOptions,
}

impl RuleEngine {
    pub(crate) fn from_parts(
        state: EngineState,
        repository: Arc<dyn Repository>,
        options: EngineOptions,
    ) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
            repository,
            options,
        }
    }

    pub fn options(&self) -> EngineOptions {
        self.options
    }

    /// Run `change` on a copy of the state, persist the copy, then publish it
    async fn write<T>(&self, change: impl FnOnce(&mut EngineState) -> Result<T>) -> Result<T> {
        let mut guard = self.state.write().await;
        let mut next = EngineState::clone(&guard);
        let output = change(&mut next)?;

        if let Err(e) = self.repository.save(&next.to_snapshot()).await {
            error!(backend = self.repository.name(), "Failed to persist engine state: {}", e);
            return Err(e.into());
        }

        *guard = next;
        Ok(output)
    }

    // ========== Attribute Catalog ==========

    /// Register an attribute; duplicates and invalid names are rejected
    #[instrument(skip(self))]
    pub async fn add_attribute(&self, name: &str, data_type: DataType) -> Result<Attribute> {
        let attribute = self
            .write(|state| {
                let id = state.catalog.add(name, data_type)?;
                Ok(Attribute::new(id, name.trim(), data_type))
            })
            .await?;
        info!(id = attribute.id, "Attribute '{}' registered", attribute.attribute_name);
        Ok(attribute)
    }

    /// Attributes in registration order
    pub async fn list_attributes(&self) -> Vec<Attribute> {
        self.state.read().await.catalog.list().to_vec()
    }

    /// Register the default attributes if the catalog is empty.
    ///
    /// Returns how many were added.
    pub async fn seed_default_attributes(&self) -> Result<usize> {
        let added = self
            .write(|state| {
                if !state.catalog.is_empty() {
                    return Ok(0);
                }
                for (name, data_type) in DEFAULT_ATTRIBUTES {
                    state.catalog.add(name, data_type)?;
                }
                Ok(DEFAULT_ATTRIBUTES.len())
            })
            .await?;
        if added > 0 {
            info!("Seeded {} default attributes", added);
        }
        Ok(added)
    }

    // ========== Rules ==========

    /// Parse `rule_string` and store it as a new rule
    #[instrument(skip(self))]
    pub async fn create_rule(&self, name: &str, rule_string: &str) -> Result<Arc<Rule>> {
        let name = validate_name(name)?;
        let expr = ExpressionParser::parse(rule_string)?;
        let strict = self.options.strict_attributes;

        let rule = self
            .write(|state| {
                if strict {
                    state.catalog.require_all(expr.attributes())?;
                }
                Ok(state.store.create(name, &expr, rule_string.trim()))
            })
            .await?;

        info!(rule_id = rule.id, nodes = rule.len(), "Rule '{}' created", rule.name);
        Ok(rule)
    }

    pub async fn get_rule(&self, rule_id: RuleId) -> Result<Arc<Rule>> {
        self.state.read().await.store.get(rule_id)
    }

    /// `{id, name}` of every rule, in creation order
    pub async fn list_rules(&self) -> Vec<RuleSummary> {
        self.state.read().await.store.list()
    }

    /// Fold existing rules into a new one.
    ///
    /// Fewer than two ids, or an id that does not resolve, is a validation
    /// error. With `simplify` the combined tree is optimized before it is
    /// stored.
    #[instrument(skip(self))]
    pub async fn combine_rules(
        &self,
        rule_ids: &[RuleId],
        name: &str,
        operator: LogicalOperator,
        simplify: bool,
    ) -> Result<Arc<Rule>> {
        let name = validate_name(name)?;
        if rule_ids.len() < combiner::MIN_COMBINE_RULES {
            return Err(EngineError::Validation(format!(
                "At least {} rule ids are required to combine, got {}",
                combiner::MIN_COMBINE_RULES,
                rule_ids.len()
            )));
        }
        let strict = self.options.strict_attributes;

        let rule = self
            .write(|state| {
                let sources = rule_ids
                    .iter()
                    .map(|&id| {
                        state.store.get(id).map_err(|_| {
                            EngineError::Validation(format!("Rule {} does not exist", id))
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;

                let mut expr = combiner::combine(&sources, operator)?;
                if simplify {
                    expr = optimizer::simplify(expr, &state.catalog);
                }
                if strict {
                    state.catalog.require_all(expr.attributes())?;
                }

                let rule_string = expr.to_string();
                Ok(state.store.create(name, &expr, &rule_string))
            })
            .await?;

        info!(
            rule_id = rule.id,
            sources = rule_ids.len(),
            %operator,
            "Combined rule '{}' created",
            rule.name
        );
        Ok(rule)
    }

    /// Apply a node-level edit; the rule keeps its id
    #[instrument(skip(self))]
    pub async fn modify_rule(
        &self,
        rule_id: RuleId,
        modification: &NodeModification,
    ) -> Result<Arc<Rule>> {
        let strict = self.options.strict_attributes;
        let rule = self
            .write(|state| {
                let EngineState { catalog, store } = state;
                store.modify(rule_id, modification, catalog, strict)
            })
            .await?;

        info!(rule_id, node_id = modification.node_id, "Rule modified: {}", rule.rule_string);
        Ok(rule)
    }

    /// Evaluate a stored rule against attribute bindings
    pub async fn evaluate_rule(&self, rule_id: RuleId, bindings: &Bindings) -> Result<bool> {
        let state = self.state.read().await;
        let rule = state.store.get(rule_id)?;
        Evaluator::new(&state.catalog).evaluate(&rule, bindings)
    }

    /// Rule and attribute counts, for health reporting
    pub async fn stats(&self) -> (usize, usize) {
        let state = self.state.read().await;
        (state.store.len(), state.catalog.len())
    }
}

fn validate_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(
            "Rule name must not be empty".to_string(),
        ));
    }
    Ok(trimmed)
}
