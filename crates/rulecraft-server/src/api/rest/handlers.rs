//! API endpoint handlers
//!
//! HTTP request handlers for all REST API endpoints.

use super::conversions::{
    bindings_from_json, modification_from_payload, parse_operator, parse_path_id,
    DEFAULT_COMBINED_RULE_NAME,
};
use super::extractors::JsonExtractor;
use super::types::*;
use crate::error::ServerError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rulecraft_core::DataType;
use rulecraft_runtime::EngineError;
use tracing::info;

/// Health check endpoint
pub(super) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let (rules, attributes) = state.engine.stats().await;
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        rules,
        attributes,
    })
}

// ========== Attributes ==========

pub(super) async fn get_attributes(State(state): State<AppState>) -> Json<AttributesResponse> {
    Json(AttributesResponse {
        attributes: state.engine.list_attributes().await,
    })
}

pub(super) async fn add_attribute(
    State(state): State<AppState>,
    JsonExtractor(payload): JsonExtractor<AddAttributeRequest>,
) -> Result<(StatusCode, Json<AddAttributeResponse>), ServerError> {
    info!(
        "Received add_attribute request: {} ({})",
        payload.attribute_name, payload.data_type
    );

    let data_type: DataType = payload.data_type.parse().map_err(EngineError::from)?;
    let attribute = state
        .engine
        .add_attribute(&payload.attribute_name, data_type)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AddAttributeResponse {
            message: format!("Attribute '{}' added successfully", attribute.attribute_name),
            id: attribute.id,
        }),
    ))
}

// ========== Rules ==========

pub(super) async fn get_rules(State(state): State<AppState>) -> Json<RulesResponse> {
    Json(RulesResponse {
        rules: state.engine.list_rules().await,
    })
}

pub(super) async fn get_rule(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<RuleResponse>, ServerError> {
    let rule_id = parse_path_id(&raw_id).map_err(ServerError::InvalidRequest)?;
    let rule = state.engine.get_rule(rule_id).await?;

    Ok(Json(RuleResponse {
        id: rule.id,
        name: rule.name.clone(),
        rule_string: rule.rule_string.clone(),
        ast: rule.to_tree(),
        created_at: rule.created_at,
        updated_at: rule.updated_at,
    }))
}

pub(super) async fn create_rule(
    State(state): State<AppState>,
    JsonExtractor(payload): JsonExtractor<CreateRuleRequest>,
) -> Result<(StatusCode, Json<CreateRuleResponse>), ServerError> {
    info!("Received create_rule request: '{}'", payload.name);

    let rule = state
        .engine
        .create_rule(&payload.name, &payload.rule_string)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateRuleResponse {
            rule_id: rule.id,
            name: rule.name.clone(),
        }),
    ))
}

pub(super) async fn combine_rules(
    State(state): State<AppState>,
    JsonExtractor(payload): JsonExtractor<CombineRulesRequest>,
) -> Result<(StatusCode, Json<CombineRulesResponse>), ServerError> {
    info!(
        "Received combine_rules request for rules {:?}",
        payload.rule_ids
    );

    let operator =
        parse_operator(payload.operator.as_deref()).map_err(ServerError::InvalidRequest)?;
    let name = payload
        .combined_rule_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_COMBINED_RULE_NAME.to_string());

    let rule = state
        .engine
        .combine_rules(&payload.rule_ids, &name, operator, payload.simplify)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CombineRulesResponse {
            combined_rule_id: rule.id,
            name: rule.name.clone(),
        }),
    ))
}

pub(super) async fn evaluate_rule(
    State(state): State<AppState>,
    JsonExtractor(payload): JsonExtractor<EvaluateRuleRequest>,
) -> Result<Json<EvaluateRuleResponse>, ServerError> {
    let bindings = bindings_from_json(payload.attributes).map_err(ServerError::InvalidRequest)?;
    let result = state.engine.evaluate_rule(payload.rule_id, &bindings).await?;

    info!(
        rule_id = payload.rule_id,
        attributes = bindings.len(),
        result,
        "Rule evaluated"
    );

    Ok(Json(EvaluateRuleResponse { result }))
}

pub(super) async fn modify_rule(
    State(state): State<AppState>,
    JsonExtractor(payload): JsonExtractor<ModifyRuleRequest>,
) -> Result<Json<ModifyRuleResponse>, ServerError> {
    info!(
        "Received modify_rule request for rule {} node {}",
        payload.rule_id, payload.modifications.node_id
    );

    let modification =
        modification_from_payload(payload.modifications).map_err(ServerError::InvalidRequest)?;
    let rule = state
        .engine
        .modify_rule(payload.rule_id, &modification)
        .await?;

    Ok(Json(ModifyRuleResponse {
        message: format!("Rule {} modified successfully", rule.id),
        rule_string: rule.rule_string.clone(),
    }))
}
