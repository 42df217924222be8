//! Request and response types for the REST API

use super::conversions::{deserialize_id, deserialize_ids};
use chrono::{DateTime, Utc};
use rulecraft_core::{AstNode, Attribute, AttributeId, NodeId, RuleId, RuleSummary};
use rulecraft_runtime::RuleEngine;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub engine: RuleEngine,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub rules: usize,
    pub attributes: usize,
}

// ========== Attributes ==========

#[derive(Debug, Serialize, Deserialize)]
pub struct AttributesResponse {
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddAttributeRequest {
    pub attribute_name: String,
    /// `int`, `float` or `string`
    pub data_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddAttributeResponse {
    pub message: String,
    pub id: AttributeId,
}

// ========== Rules ==========

#[derive(Debug, Serialize, Deserialize)]
pub struct RulesResponse {
    pub rules: Vec<RuleSummary>,
}

/// A stored rule with its nested AST
#[derive(Debug, Serialize, Deserialize)]
pub struct RuleResponse {
    pub id: RuleId,
    pub name: String,
    pub rule_string: String,
    pub ast: AstNode,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateRuleRequest {
    pub name: String,
    pub rule_string: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateRuleResponse {
    pub rule_id: RuleId,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CombineRulesRequest {
    #[serde(deserialize_with = "deserialize_ids")]
    pub rule_ids: Vec<RuleId>,

    /// Name of the new rule (default: "combined_rule")
    #[serde(default, alias = "name")]
    pub combined_rule_name: Option<String>,

    /// `AND` or `OR` (default: `AND`)
    #[serde(default)]
    pub operator: Option<String>,

    /// Merge redundant bounds before storing
    #[serde(default)]
    pub simplify: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CombineRulesResponse {
    pub combined_rule_id: RuleId,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct EvaluateRuleRequest {
    #[serde(deserialize_with = "deserialize_id")]
    pub rule_id: RuleId,

    /// Attribute name to value; strings, numbers and booleans are accepted
    #[serde(default)]
    pub attributes: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EvaluateRuleResponse {
    pub result: bool,
}

#[derive(Debug, Deserialize)]
pub struct ModifyRuleRequest {
    #[serde(deserialize_with = "deserialize_id")]
    pub rule_id: RuleId,
    pub modifications: ModificationPayload,
}

/// Node-level edit as sent by the UI; empty fields are ignored
#[derive(Debug, Deserialize)]
pub struct ModificationPayload {
    #[serde(deserialize_with = "deserialize_id")]
    pub node_id: NodeId,
    #[serde(default)]
    pub new_operator: Option<String>,
    #[serde(default)]
    pub new_attribute: Option<String>,
    #[serde(default)]
    pub new_comparison: Option<String>,
    #[serde(default)]
    pub new_value: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModifyRuleResponse {
    pub message: String,
    /// Canonical rendering of the edited rule
    pub rule_string: String,
}
