mod model;
pub use model::{ModelOperation, OperationKind};

mod raw;
pub use raw::{RawKind, RawOperation};

#[derive(Debug, Clone)]
pub enum Operation {
    /// A model operation with a structured argument tree
    Model(ModelOperation),

    /// A SQL statement with positional parameters
    Raw(RawOperation),
}

impl Operation {
    pub fn as_model(&self) -> Option<&ModelOperation> {
        match self {
            Operation::Model(op) => Some(op),
            Operation::Raw(_) => None,
        }
    }

    pub fn as_raw(&self) -> Option<&RawOperation> {
        match self {
            Operation::Raw(op) => Some(op),
            Operation::Model(_) => None,
        }
    }
}
