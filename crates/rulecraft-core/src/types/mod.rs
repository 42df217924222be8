//! Type system for Rulecraft
//!
//! - `Literal`: constants written in rule text
//! - `Value`: coerced runtime values used during comparison
//! - `DataType` / `Attribute`: catalog entries

pub mod attribute;
pub mod value;

pub use attribute::{Attribute, AttributeId, DataType};
pub use value::{Literal, Value};
