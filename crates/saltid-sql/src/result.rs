use saltid_core::{
    codec::DEFAULT_SALT_LENGTH,
    schema::DEFAULT_SALT_SUFFIX,
    stmt::{Record, Value},
};

use tracing::debug;

/// Hijack raw result rows for an explicit list of base fields.
///
/// For every listed base `X` present in a row together with `X{suffix}`,
/// the salt is hidden and `X` reads as the composed public id when both
/// values are integers.
#[derive(Debug, Clone)]
pub struct ResultFields {
    fields: Vec<String>,
    suffix: String,
    salt_length: usize,
}

impl ResultFields {
    pub fn new<I>(fields: I) -> ResultFields
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        ResultFields {
            fields: fields.into_iter().map(Into::into).collect(),
            suffix: DEFAULT_SALT_SUFFIX.to_string(),
            salt_length: DEFAULT_SALT_LENGTH,
        }
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> ResultFields {
        self.suffix = suffix.into();
        self
    }

    pub fn salt_length(mut self, salt_length: usize) -> ResultFields {
        self.salt_length = salt_length;
        self
    }

    /// Apply to a list of rows or to a single row. Other values are returned
    /// unchanged.
    pub fn apply(&self, rows: Value) -> Value {
        for_each_row(rows, |row| {
            for base in &self.fields {
                let salt = format!("{base}{}", self.suffix);

                if !row.contains_key(&salt) {
                    debug!(field = %base, "salt column missing from raw row");
                    continue;
                }

                row.hide(&salt);
                row.derive_public_id(base, &salt, self.salt_length);
            }
        })
    }
}

/// Hijack every `X` / `X{suffix}` pair whose values are both integers.
pub fn result_scan(rows: Value, suffix: &str, salt_length: usize) -> Value {
    for_each_row(rows, |row| {
        let pairs: Vec<(String, String)> = row
            .keys()
            .filter_map(|name| {
                let base = name.strip_suffix(suffix).filter(|base| !base.is_empty())?;
                Some((base.to_string(), name.to_string()))
            })
            .filter(|(base, salt)| {
                matches!(row.get_raw(base), Some(Value::I64(_)))
                    && matches!(row.get_raw(salt), Some(Value::I64(_)))
            })
            .collect();

        for (base, salt) in pairs {
            row.hide(&salt);
            row.derive_public_id(&base, &salt, salt_length);
        }
    })
}

fn for_each_row(mut rows: Value, mut f: impl FnMut(&mut Record)) -> Value {
    match &mut rows {
        Value::List(items) => {
            for item in items {
                if let Value::Record(row) = item {
                    f(row);
                }
            }
        }
        Value::Record(row) => f(row),
        _ => {}
    }

    rows
}
