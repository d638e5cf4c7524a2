use super::Db;
use crate::Result;

use saltid_core::{
    driver::operation::{ModelOperation, OperationKind},
    stmt::Value,
};

/// Operations on one model, addressed by name.
#[derive(Debug, Clone)]
pub struct ModelHandle<'a> {
    db: &'a Db,
    name: String,
}

impl<'a> ModelHandle<'a> {
    pub(super) fn new(db: &'a Db, name: String) -> Self {
        ModelHandle { db, name }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fails with a record not found error when nothing matches
    pub async fn find_unique_or_throw(&self, args: impl Into<Value>) -> Result<Value> {
        self.exec(OperationKind::FindUniqueOrThrow, args).await
    }

    pub async fn find_unique(&self, args: impl Into<Value>) -> Result<Value> {
        self.exec(OperationKind::FindUnique, args).await
    }

    pub async fn find_first(&self, args: impl Into<Value>) -> Result<Value> {
        self.exec(OperationKind::FindFirst, args).await
    }

    pub async fn find_many(&self, args: impl Into<Value>) -> Result<Value> {
        self.exec(OperationKind::FindMany, args).await
    }

    pub async fn count(&self, args: impl Into<Value>) -> Result<Value> {
        self.exec(OperationKind::Count, args).await
    }

    pub async fn create(&self, args: impl Into<Value>) -> Result<Value> {
        self.exec(OperationKind::Create, args).await
    }

    pub async fn create_many(&self, args: impl Into<Value>) -> Result<Value> {
        self.exec(OperationKind::CreateMany, args).await
    }

    pub async fn update(&self, args: impl Into<Value>) -> Result<Value> {
        self.exec(OperationKind::Update, args).await
    }

    pub async fn update_many(&self, args: impl Into<Value>) -> Result<Value> {
        self.exec(OperationKind::UpdateMany, args).await
    }

    pub async fn delete(&self, args: impl Into<Value>) -> Result<Value> {
        self.exec(OperationKind::Delete, args).await
    }

    pub async fn delete_many(&self, args: impl Into<Value>) -> Result<Value> {
        self.exec(OperationKind::DeleteMany, args).await
    }

    pub async fn upsert(&self, args: impl Into<Value>) -> Result<Value> {
        self.exec(OperationKind::Upsert, args).await
    }

    async fn exec(&self, kind: OperationKind, args: impl Into<Value>) -> Result<Value> {
        self.db
            .exec(ModelOperation::new(self.name.as_str(), kind, args).into())
            .await
    }
}
