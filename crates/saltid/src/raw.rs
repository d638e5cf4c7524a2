//! Raw SQL helpers bound to a [`Db`](crate::Db)'s configuration.
//!
//! ```ignore
//! let raw = db.raw();
//! let id = raw.col(Some("u"), "id");
//!
//! let mut query = Fragment::raw(r#"SELECT * FROM "User" AS "u" WHERE "#);
//! query.push(raw.filter().eq(&id, 12345)?);
//!
//! let rows = db.query_raw(&query).await?;
//! ```

use crate::Config;

use saltid_core::{stmt::Value, Result};
use saltid_sql::{predicate, Column, Flavor, Fragment, ResultFields, UnsafeQuery};

#[derive(Debug, Clone, Copy)]
pub struct Raw<'a> {
    suffix: &'a str,
    salt_length: usize,
    flavor: Flavor,
}

/// Predicate builders using the configured salt length.
#[derive(Debug, Clone, Copy)]
pub struct Filter {
    salt_length: usize,
}

impl<'a> Raw<'a> {
    pub(crate) fn new(config: &'a Config, flavor: Flavor) -> Raw<'a> {
        Raw {
            suffix: &config.salt_suffix,
            salt_length: config.salt_length,
            flavor,
        }
    }

    pub fn col(&self, alias: Option<&str>, base: &str) -> Column {
        saltid_sql::col(alias, base, self.suffix, self.flavor)
    }

    pub fn filter(&self) -> Filter {
        Filter {
            salt_length: self.salt_length,
        }
    }

    /// Hijack the listed base fields of raw rows.
    pub fn result<I>(&self, fields: I) -> ResultFields
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        ResultFields::new(fields)
            .suffix(self.suffix)
            .salt_length(self.salt_length)
    }

    pub fn result_scan(&self, rows: Value) -> Value {
        saltid_sql::result_scan(rows, self.suffix, self.salt_length)
    }

    pub fn to_unsafe(&self, fragment: &Fragment) -> UnsafeQuery {
        saltid_sql::to_unsafe(fragment, self.flavor)
    }
}

impl Filter {
    pub fn eq(&self, column: &Column, public_id: impl Into<Value>) -> Result<Fragment> {
        predicate::eq(column, public_id, self.salt_length)
    }

    pub fn ne(&self, column: &Column, public_id: impl Into<Value>) -> Result<Fragment> {
        predicate::ne(column, public_id, self.salt_length)
    }

    pub fn in_list<I>(&self, column: &Column, public_ids: I) -> Result<Fragment>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        predicate::in_list(column, public_ids, self.salt_length)
    }

    pub fn gt_real_id(&self, column: &Column, real_id: impl Into<Value>) -> Result<Fragment> {
        predicate::gt_real_id(column, real_id)
    }

    pub fn lt_real_id(&self, column: &Column, real_id: impl Into<Value>) -> Result<Fragment> {
        predicate::lt_real_id(column, real_id)
    }

    pub fn between_real_id(
        &self,
        column: &Column,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> Result<Fragment> {
        predicate::between_real_id(column, low, high)
    }

    pub fn gt_from_salt_id(&self, column: &Column, public_id: impl Into<Value>) -> Result<Fragment> {
        predicate::gt_from_salt_id(column, public_id, self.salt_length)
    }

    pub fn lt_from_salt_id(&self, column: &Column, public_id: impl Into<Value>) -> Result<Fragment> {
        predicate::lt_from_salt_id(column, public_id, self.salt_length)
    }

    pub fn between_from_salt_ids(
        &self,
        column: &Column,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> Result<Fragment> {
        predicate::between_from_salt_ids(column, low, high, self.salt_length)
    }
}
