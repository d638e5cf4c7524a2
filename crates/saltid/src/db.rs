mod builder;
pub use builder::Builder;

mod model;
pub use model::ModelHandle;

use crate::{engine, raw::Raw, Config, HijackConfig, Result};

use saltid_core::{
    driver::{
        operation::{RawKind, RawOperation},
        Driver, Operation,
    },
    schema::Descriptor,
    stmt::Value,
    Error, Registry,
};
use saltid_sql::Fragment;

use std::{borrow::Cow, sync::Arc};

/// Handle to the salted-id layer over a driver.
///
/// Cloning is cheap; clones share the driver and the schema registry.
#[derive(Clone, Debug)]
pub struct Db {
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    driver: Box<dyn Driver>,
    config: Config,
    registry: Registry,

    /// Descriptor passed to the builder, if any
    descriptor: Option<Descriptor>,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    pub fn driver(&self) -> &dyn Driver {
        &*self.shared.driver
    }

    /// The schema registry, built on first use from the descriptor given to
    /// the builder or, failing that, from the driver.
    pub fn registry(&self) -> Result<&Registry> {
        let registry = &self.shared.registry;

        if !registry.is_initialized() {
            let descriptor = match &self.shared.descriptor {
                Some(descriptor) => Cow::Borrowed(descriptor),
                None => Cow::Owned(
                    self.shared
                        .driver
                        .schema_descriptor()
                        .ok_or_else(Error::missing_schema_descriptor)?,
                ),
            };

            registry.init(Some(&*descriptor));
        }

        Ok(registry)
    }

    /// Execute an operation through the interception layer
    pub async fn exec(&self, op: Operation) -> Result<Value> {
        engine::exec(self, op).await
    }

    pub fn model(&self, name: impl Into<String>) -> ModelHandle<'_> {
        ModelHandle::new(self, name.into())
    }

    /// Run a query built from fragments. Rows are scanned for salt pairs
    /// unless `raw_result_hijack` is disabled.
    pub async fn query_raw(&self, fragment: &Fragment) -> Result<Value> {
        let query = self.raw().to_unsafe(fragment);
        self.query_raw_unsafe(query.sql, query.params).await
    }

    /// Run a statement built from fragments, returning the affected row count.
    pub async fn execute_raw(&self, fragment: &Fragment) -> Result<u64> {
        let query = self.raw().to_unsafe(fragment);
        self.execute_raw_unsafe(query.sql, query.params).await
    }

    pub async fn query_raw_unsafe(
        &self,
        sql: impl Into<String>,
        params: Vec<Value>,
    ) -> Result<Value> {
        self.exec(
            RawOperation {
                kind: RawKind::Query,
                sql: sql.into(),
                params,
            }
            .into(),
        )
        .await
    }

    pub async fn execute_raw_unsafe(
        &self,
        sql: impl Into<String>,
        params: Vec<Value>,
    ) -> Result<u64> {
        let affected = self
            .exec(
                RawOperation {
                    kind: RawKind::Execute,
                    sql: sql.into(),
                    params,
                }
                .into(),
            )
            .await?;

        match affected {
            Value::I64(count) if count >= 0 => Ok(count as u64),
            other => Err(Error::type_mismatch("affected row count", other.type_name())),
        }
    }

    /// Helpers for writing raw SQL against salted columns.
    pub fn raw(&self) -> Raw<'_> {
        Raw::new(
            &self.shared.config,
            self.shared.driver.capability().sql_flavor,
        )
    }

    pub(crate) fn hijack_config(&self) -> HijackConfig {
        HijackConfig {
            salt_length: self.shared.config.salt_length,
            suffix: self.shared.config.salt_suffix.clone(),
        }
    }
}
