use crate::value::Value;
use serde::Serialize;

/// A local variable from `-stack-list-variables --simple-values`.
///
/// Aggregates come back without a value under `--simple-values`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variable {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    pub value: Option<String>,
}

impl Variable {
    pub fn from_value(value: &Value) -> Option<Self> {
        let tuple = value.unkeyed().as_tuple()?;
        Some(Variable {
            name: tuple.get_str("name")?.to_string(),
            type_name: tuple.get_str("type").map(str::to_string),
            value: tuple.get_str("value").map(str::to_string),
        })
    }
}
