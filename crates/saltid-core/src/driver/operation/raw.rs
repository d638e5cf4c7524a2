use super::Operation;

use crate::stmt::Value;

#[derive(Debug, Clone)]
pub struct RawOperation {
    pub kind: RawKind,

    /// SQL text with positional placeholders in the driver's flavor
    pub sql: String,

    /// Values bound to the placeholders, in order
    pub params: Vec<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawKind {
    /// Returns a list of row records
    Query,

    /// Returns the number of affected rows as an integer
    Execute,
}

impl From<RawOperation> for Operation {
    fn from(value: RawOperation) -> Self {
        Self::Raw(value)
    }
}
