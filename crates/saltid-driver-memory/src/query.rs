use crate::{
    filter::{self, Filter},
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

/// Read side of the store: filtering, ordering, paging and projection.
#[derive(Clone, Copy)]
pub(crate) struct Reader<'a> {
    schema: &'a Schema,
    store: &'a Store,
}

struct OrderBy<'a> {
    field: &'a str,
    desc: bool,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(schema: &'a Schema, store: &'a Store) -> Reader<'a> {
        Reader { schema, store }
    }

    pub(crate) fn filter(&self) -> Filter<'a> {
        Filter {
            schema: self.schema,
            store: self.store,
        }
    }

    /// Rows of `model` selected by `where`, `orderBy`, `skip` and `take`.
    pub(crate) fn find(&self, model: &Model, args: &Record) -> Result<Vec<&'a Record>> {
        let rows = self.store.rows(&model.name).iter();
        self.select(model, rows, args)
    }

    fn select(
        &self,
        model: &Model,
        rows: impl Iterator<Item = &'a Record>,
        args: &Record,
    ) -> Result<Vec<&'a Record>> {
        let filter = args.get_raw(keyword::WHERE).unwrap_or(&Value::Null);

        let mut matched = vec![];
        for row in rows {
            if self.filter().matches(model, row, filter)? {
                matched.push(row);
            }
        }

        if let Some(order_by) = args.get_raw(keyword::ORDER_BY) {
            let order_by = order_by_clauses(order_by)?;
            matched.sort_by(|a, b| compare_rows(a, b, &order_by));
        }

        let skip = count_arg(args, keyword::SKIP)?.unwrap_or(0);
        let take = count_arg(args, keyword::TAKE)?.unwrap_or(usize::MAX);

        Ok(matched.into_iter().skip(skip).take(take).collect())
    }

    /// Shape a stored row according to `select` / `include`.
    pub(crate) fn project(&self, model: &Model, row: &Record, args: &Record) -> Result<Value> {
        let mut ret = Record::new();

        if let Some(select) = args.get_raw(keyword::SELECT) {
            let Value::Record(select) = select else {
                bail!("`select` expects an object, got {}", select.type_name());
            };

            for (key, selection) in select.raw_iter() {
                if !is_selected(selection) {
                    continue;
                }

                let value = match self.schema.join(model, key)? {
                    Some(join) => self.relation(&join, row, selection)?,
                    None if model.field_by_name(key).is_some() => {
                        row.get_raw(key).cloned().unwrap_or_default()
                    }
                    None => bail!("unknown field `{}.{key}` in select", model.name),
                };

                ret.insert(key, value);
            }

            return Ok(ret.into());
        }

        for (field, _) in model.scalars() {
            let value = row.get_raw(&field.name).cloned().unwrap_or_default();
            ret.insert(&field.name, value);
        }

        if let Some(Value::Record(include)) = args.get_raw(keyword::INCLUDE) {
            for (key, selection) in include.raw_iter() {
                if !is_selected(selection) {
                    continue;
                }

                let Some(join) = self.schema.join(model, key)? else {
                    bail!("`{}.{key}` is not a relation and cannot be included", model.name);
                };

                ret.insert(key, self.relation(&join, row, selection)?);
            }
        }

        Ok(ret.into())
    }

    fn relation(&self, join: &Join<'_>, row: &Record, selection: &Value) -> Result<Value> {
        let target = self.schema.model(join.target)?;
        let nested = match selection {
            Value::Record(nested) => nested.clone(),
            _ => Record::new(),
        };

        let related = join.related(self.store, row).into_iter();

        if join.is_list {
            let rows = self.select(target, related, &nested)?;
            let mut ret = Vec::with_capacity(rows.len());
            for related in rows {
                ret.push(self.project(target, related, &nested)?);
            }
            return Ok(Value::List(ret));
        }

        match related.take(1).next() {
            Some(related) => self.project(target, related, &nested),
            None => Ok(Value::Null),
        }
    }
}

fn is_selected(selection: &Value) -> bool {
    selection.is_true() || selection.is_record()
}

fn order_by_clauses(order_by: &Value) -> Result<Vec<OrderBy<'_>>> {
    let records = match order_by {
        Value::Record(record) => vec![record],
        Value::List(items) => {
            let mut records = vec![];
            for item in items {
                let Value::Record(record) = item else {
                    bail!("`orderBy` entries must be objects, got {}", item.type_name());
                };
                records.push(record);
            }
            records
        }
        other => bail!("`orderBy` expects an object or a list, got {}", other.type_name()),
    };

    let mut ret = vec![];
    for record in records {
        for (field, direction) in record.raw_iter() {
            let desc = match direction.as_str() {
                Some(keyword::ASC) => false,
                Some(keyword::DESC) => true,
                _ => bail!("unsupported sort direction for `{field}`"),
            };
            ret.push(OrderBy { field, desc });
        }
    }

    Ok(ret)
}

/// Nulls sort first in ascending order.
fn compare_rows(a: &Record, b: &Record, order_by: &[OrderBy<'_>]) -> Ordering {
    for clause in order_by {
        let a = a.get_raw(clause.field).unwrap_or(&Value::Null);
        let b = b.get_raw(clause.field).unwrap_or(&Value::Null);

        let ordering = match (a.is_null(), b.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => filter::compare(a, b).unwrap_or(Ordering::Equal),
        };

        let ordering = if clause.desc {
            ordering.reverse()
        } else {
            ordering
        };

        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    Ordering::Equal
}

fn count_arg(args: &Record, name: &str) -> Result<Option<usize>> {
    match args.get_raw(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::I64(n)) if *n >= 0 => Ok(Some(*n as usize)),
        Some(other) => bail!("`{name}` expects a non-negative integer, got {other:?}"),
    }
}
