use crate::{
    schema::{Join, Schema},
    store::Store,
};

use saltid_core::{
    bail,
    schema::descriptor::Model,
    stmt::{keyword, Record, Value},
    Result,
};

use std::cmp::Ordering;

/// Evaluates `where` trees against stored rows.
#[derive(Clone, Copy)]
pub(crate) struct Filter<'a> {
    pub(crate) schema: &'a Schema,
    pub(crate) store: &'a Store,
}

impl<'a> Filter<'a> {
    pub(crate) fn matches(&self, model: &Model, row: &Record, filter: &Value) -> Result<bool> {
        match filter {
            Value::Null => Ok(true),
            Value::Record(filter) => self.record(model, row, filter),
            other => bail!("invalid filter: expected an object, got {}", other.type_name()),
        }
    }

    /// Positions of the rows of `model` matching `filter`.
    pub(crate) fn positions(&self, model: &Model, filter: &Value) -> Result<Vec<usize>> {
        let mut ret = vec![];

        for (i, row) in self.store.rows(&model.name).iter().enumerate() {
            if self.matches(model, row, filter)? {
                ret.push(i);
            }
        }

        Ok(ret)
    }

    fn record(&self, model: &Model, row: &Record, filter: &Record) -> Result<bool> {
        for (key, value) in filter.raw_iter() {
            let matched = match key {
                keyword::AND => self.all(model, row, value)?,
                keyword::OR => match value {
                    Value::List(branches) => self.any(model, row, branches)?,
                    other => self.matches(model, row, other)?,
                },
                keyword::NOT => match value {
                    Value::List(branches) => !self.any(model, row, branches)?,
                    other => !self.matches(model, row, other)?,
                },
                _ => match self.schema.join(model, key)? {
                    Some(join) => self.relation(&join, row, value)?,
                    None => field(row.get_raw(key).unwrap_or(&Value::Null), value)?,
                },
            };

            if !matched {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn all(&self, model: &Model, row: &Record, filters: &Value) -> Result<bool> {
        match filters {
            Value::List(filters) => {
                for filter in filters {
                    if !self.matches(model, row, filter)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            other => self.matches(model, row, other),
        }
    }

    fn any(&self, model: &Model, row: &Record, filters: &[Value]) -> Result<bool> {
        for filter in filters {
            if self.matches(model, row, filter)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn relation(&self, join: &Join<'_>, row: &Record, filter: &Value) -> Result<bool> {
        let target = self.schema.model(join.target)?;
        let related = join.related(self.store, row);

        if join.is_list {
            let Value::Record(ops) = filter else {
                bail!("invalid to-many relation filter; expected `some`, `none` or `every`");
            };

            for (op, filter) in ops.raw_iter() {
                let mut hits = 0;
                for related_row in &related {
                    if self.matches(target, related_row, filter)? {
                        hits += 1;
                    }
                }

                let matched = match op {
                    keyword::SOME => hits > 0,
                    keyword::NONE => hits == 0,
                    keyword::EVERY => hits == related.len(),
                    other => bail!("unsupported to-many relation filter `{other}`"),
                };

                if !matched {
                    return Ok(false);
                }
            }

            return Ok(true);
        }

        let related = related.first().copied();

        match filter {
            Value::Null => Ok(related.is_none()),
            Value::Record(ops)
                if ops.contains_key(keyword::IS) || ops.contains_key(keyword::IS_NOT) =>
            {
                for (op, filter) in ops.raw_iter() {
                    let matched = match (op, related) {
                        (keyword::IS, None) => filter.is_null(),
                        (keyword::IS, Some(related)) => {
                            !filter.is_null() && self.matches(target, related, filter)?
                        }
                        (keyword::IS_NOT, None) => !filter.is_null(),
                        (keyword::IS_NOT, Some(related)) => {
                            !filter.is_null() && !self.matches(target, related, filter)?
                        }
                        (other, _) => bail!("unsupported to-one relation filter `{other}`"),
                    };

                    if !matched {
                        return Ok(false);
                    }
                }

                Ok(true)
            }
            _ => match related {
                Some(related) => self.matches(target, related, filter),
                None => Ok(false),
            },
        }
    }
}

/// Match a scalar value against a filter: either a plain value compared for
/// equality, or an operator record.
pub(crate) fn field(value: &Value, filter: &Value) -> Result<bool> {
    let Value::Record(ops) = filter else {
        return Ok(equals(value, filter));
    };

    for (op, operand) in ops.raw_iter() {
        if !operator(value, op, operand)? {
            return Ok(false);
        }
    }

    Ok(true)
}

fn operator(value: &Value, op: &str, operand: &Value) -> Result<bool> {
    Ok(match op {
        keyword::EQUALS => equals(value, operand),
        keyword::IN => list(op, operand)?.iter().any(|item| equals(value, item)),
        keyword::NOT_IN => {
            !value.is_null() && !list(op, operand)?.iter().any(|item| equals(value, item))
        }
        keyword::NOT_OP => match operand {
            Value::Record(_) => !field(value, operand)?,
            Value::Null => !value.is_null(),
            _ => !value.is_null() && !equals(value, operand),
        },
        keyword::GT => compare(value, operand) == Some(Ordering::Greater),
        keyword::GTE => matches!(
            compare(value, operand),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        keyword::LT => compare(value, operand) == Some(Ordering::Less),
        keyword::LTE => matches!(
            compare(value, operand),
            Some(Ordering::Less | Ordering::Equal)
        ),
        other => bail!("unsupported filter operator `{other}`"),
    })
}

fn list<'v>(op: &str, operand: &'v Value) -> Result<&'v [Value]> {
    match operand {
        Value::List(items) => Ok(items),
        other => bail!("`{op}` expects a list, got {}", other.type_name()),
    }
}

fn equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        _ => compare(a, b) == Some(Ordering::Equal),
    }
}

/// Order two scalars of compatible types.
pub(crate) fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::I64(a), Value::I64(b)) => Some(a.cmp(b)),
        (Value::I64(a), Value::F64(b)) => (*a as f64).partial_cmp(b),
        (Value::F64(a), Value::I64(b)) => a.partial_cmp(&(*b as f64)),
        (Value::F64(a), Value::F64(b)) => a.partial_cmp(b),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}
