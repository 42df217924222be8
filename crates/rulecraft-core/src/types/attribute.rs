//! Attribute catalog entries

use super::value::Value;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Catalog-assigned attribute identifier
pub type AttributeId = u32;

/// Declared scalar type of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Int,
    Float,
    String,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Int => "int",
            DataType::Float => "float",
            DataType::String => "string",
        }
    }

    /// Coerce raw text into a value of this type.
    ///
    /// Numeric parsing ignores surrounding whitespace; strings pass through
    /// untouched.
    pub fn coerce(&self, raw: &str) -> Result<Value, CoreError> {
        match self {
            DataType::Int => raw
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| CoreError::TypeError(format!("'{}' is not a valid int", raw))),
            DataType::Float => raw
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| CoreError::TypeError(format!("'{}' is not a valid float", raw))),
            DataType::String => Ok(Value::String(raw.to_string())),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Int | DataType::Float)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "int" => Ok(DataType::Int),
            "float" => Ok(DataType::Float),
            "string" => Ok(DataType::String),
            _ => Err(CoreError::UnknownDataType(s.to_string())),
        }
    }
}

/// A registered attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub id: AttributeId,
    pub attribute_name: String,
    pub data_type: DataType,
}

impl Attribute {
    pub fn new(id: AttributeId, attribute_name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            id,
            attribute_name: attribute_name.into(),
            data_type,
        }
    }
}
