use super::Operation;

use crate::stmt::Value;

use std::fmt;

#[derive(Debug, Clone)]
pub struct ModelOperation {
    /// Name of the model the operation targets
    pub model: String,

    pub kind: OperationKind,

    /// Argument tree (`where`, `data`, `select`, ...). `Null` when the
    /// operation takes no arguments.
    pub args: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Point read; fails when no record matches
    FindUniqueOrThrow,

    /// Point read; `null` when no record matches
    FindUnique,

    FindFirst,
    FindMany,
    Count,
    Create,
    CreateMany,
    Update,
    UpdateMany,
    Delete,
    DeleteMany,
    Upsert,
}

impl ModelOperation {
    pub fn new(model: impl Into<String>, kind: OperationKind, args: impl Into<Value>) -> Self {
        ModelOperation {
            model: model.into(),
            kind,
            args: args.into(),
        }
    }
}

impl OperationKind {
    /// Operations returning at most one record, addressed by a unique key.
    pub fn is_point_lookup(self) -> bool {
        matches!(
            self,
            OperationKind::FindUnique | OperationKind::FindUniqueOrThrow
        )
    }

    /// Operations that persist a payload.
    pub fn is_write(self) -> bool {
        matches!(
            self,
            OperationKind::Create
                | OperationKind::CreateMany
                | OperationKind::Update
                | OperationKind::UpdateMany
                | OperationKind::Upsert
        )
    }

    /// Operations returning a `{ count }` payload instead of records.
    pub fn returns_count(self) -> bool {
        matches!(
            self,
            OperationKind::CreateMany | OperationKind::UpdateMany | OperationKind::DeleteMany
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::FindUniqueOrThrow => "findUniqueOrThrow",
            OperationKind::FindUnique => "findUnique",
            OperationKind::FindFirst => "findFirst",
            OperationKind::FindMany => "findMany",
            OperationKind::Count => "count",
            OperationKind::Create => "create",
            OperationKind::CreateMany => "createMany",
            OperationKind::Update => "update",
            OperationKind::UpdateMany => "updateMany",
            OperationKind::Delete => "delete",
            OperationKind::DeleteMany => "deleteMany",
            OperationKind::Upsert => "upsert",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ModelOperation> for Operation {
    fn from(value: ModelOperation) -> Self {
        Self::Model(value)
    }
}
