//! REST API implementation
//!
//! - types: Request/response type definitions
//! - extractors: JSON body extractor with uniform rejections
//! - conversions: Wire payload to engine type conversions
//! - handlers: API endpoint handlers
//! - router: Router creation and configuration
//! - tests: Unit tests for all components

mod conversions;
mod extractors;
mod handlers;
mod router;
pub mod types;

// Re-export public API
pub use extractors::JsonExtractor;
pub use router::{create_router, create_router_with_timeout, DEFAULT_REQUEST_TIMEOUT};
pub use types::{
    AddAttributeRequest, AddAttributeResponse, AppState, AttributesResponse,
    CombineRulesRequest, CombineRulesResponse, CreateRuleRequest, CreateRuleResponse,
    EvaluateRuleRequest, EvaluateRuleResponse, HealthResponse, ModificationPayload,
    ModifyRuleRequest, ModifyRuleResponse, RuleResponse, RulesResponse,
};
