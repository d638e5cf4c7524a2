use crate::{
    filter::Filter,
    schema::{Join, Schema},
    store::Store,
};

use saltid_core::{
    bail, err,
    schema::descriptor::{FieldDefault, Model},
    stmt::{keyword, Record, Value},
    Error, Result,
};

use tracing::debug;

/// Write side of the store. Nested relation writes are applied in the same
/// pass as the row they belong to.
pub(crate) struct Writer<'a> {
    schema: &'a Schema,
    store: &'a mut Store,
}

impl<'a> Writer<'a> {
    pub(crate) fn new(schema: &'a Schema, store: &'a mut Store) -> Writer<'a> {
        Writer { schema, store }
    }

    fn filter(&self) -> Filter<'_> {
        Filter {
            schema: self.schema,
            store: &*self.store,
        }
    }

    pub(crate) fn positions(&self, model: &Model, filter: &Value) -> Result<Vec<usize>> {
        self.filter().positions(model, filter)
    }

    /// Insert a row built from `data` and return its position.
    pub(crate) fn create(&mut self, model: &Model, data: &Value) -> Result<usize> {
        let schema = self.schema;
        let empty = Record::new();
        let data = match data {
            Value::Record(data) => data,
            Value::Null => &empty,
            other => bail!(
                "create data for `{}` must be an object, got {}",
                model.name,
                other.type_name()
            ),
        };

        check_fields(model, data)?;

        let mut row = Record::new();

        for (field, scalar) in model.scalars() {
            let value = match data.get_raw(&field.name) {
                Some(value) => unwrap_set(value).clone(),
                None => match &scalar.default {
                    Some(FieldDefault::AutoIncrement) => {
                        Value::I64(self.store.next_id(&model.name))
                    }
                    Some(FieldDefault::Value(value)) => value.clone(),
                    None => Value::Null,
                },
            };

            if let (Some(FieldDefault::AutoIncrement), Value::I64(id)) = (&scalar.default, &value) {
                self.store.observe_id(&model.name, *id);
            }

            row.insert(&field.name, value);
        }

        for (field, _) in model.relations() {
            let Some(verbs) = data.get_raw(&field.name) else {
                continue;
            };

            if let Some(join) = schema.join(model, &field.name)? {
                if join.owning {
                    self.owning(&join, &mut row, verbs)?;
                }
            }
        }

        self.check_unique(model, &row, None)?;

        let rows = self.store.rows_mut(&model.name);
        rows.push(row.clone());
        let position = rows.len() - 1;

        debug!(model = %model.name, position, "row created");

        for (field, _) in model.relations() {
            let Some(verbs) = data.get_raw(&field.name) else {
                continue;
            };

            if let Some(join) = schema.join(model, &field.name)? {
                if !join.owning {
                    self.children(&join, &row, verbs)?;
                }
            }
        }

        Ok(position)
    }

    /// Apply `data` to the row at `position`.
    pub(crate) fn update(&mut self, model: &Model, position: usize, data: &Value) -> Result<()> {
        let Value::Record(data) = data else {
            bail!("update data for `{}` must be an object, got {}", model.name, data.type_name());
        };

        check_fields(model, data)?;

        let schema = self.schema;
        let mut row = self.store.rows(&model.name)[position].clone();

        for (key, value) in data.raw_iter() {
            if let Some(join) = schema.join(model, key)? {
                if join.owning {
                    self.owning(&join, &mut row, value)?;
                } else {
                    self.children(&join, &row, value)?;
                }
                continue;
            }

            let current = row.get_raw(key).cloned().unwrap_or_default();
            row.insert(key, scalar_update(key, current, value)?);
        }

        self.check_unique(model, &row, Some(position))?;
        self.store.rows_mut(&model.name)[position] = row;

        Ok(())
    }

    pub(crate) fn delete(&mut self, model: &Model, position: usize) -> Record {
        self.store.rows_mut(&model.name).remove(position)
    }

    /// Relation writes where the foreign key lives on `row`.
    fn owning(&mut self, join: &Join<'_>, row: &mut Record, verbs: &Value) -> Result<()> {
        let schema = self.schema;
        let target = schema.model(join.target)?;

        let Value::Record(verbs) = verbs else {
            bail!("relation write for `{}` must be an object", join.target);
        };

        for (verb, arg) in verbs.raw_iter() {
            let related = match verb {
                keyword::CONNECT => Some(self.find_one(target, arg)?),
                keyword::CREATE => Some(self.create(target, arg)?),
                keyword::CONNECT_OR_CREATE => Some(self.connect_or_create(target, arg)?),
                keyword::DISCONNECT if arg.is_true() => None,
                other => bail!("unsupported relation write `{other}` on `{}`", join.target),
            };

            let related = related.map(|position| self.store.rows(join.target)[position].clone());

            for (local, remote) in join.local.iter().zip(join.remote) {
                let value = related
                    .as_ref()
                    .and_then(|related| related.get_raw(remote).cloned())
                    .unwrap_or_default();
                row.insert(local, value);
            }
        }

        Ok(())
    }

    /// Relation writes where the foreign key lives on the related rows.
    fn children(&mut self, join: &Join<'_>, row: &Record, verbs: &Value) -> Result<()> {
        let schema = self.schema;
        let target = schema.model(join.target)?;

        let Value::Record(verbs) = verbs else {
            bail!("relation write for `{}` must be an object", join.target);
        };

        let Some(key) = join.key(row) else {
            bail!("cannot write `{}` rows for a parent without a key", join.target);
        };

        let linked = |data: &Value| -> Result<Value> {
            let Value::Record(data) = data else {
                bail!("create data for `{}` must be an object", join.target);
            };

            let mut data = data.clone();
            for (remote, value) in join.remote.iter().zip(&key) {
                data.insert(remote, value.clone());
            }
            Ok(data.into())
        };

        for (verb, arg) in verbs.raw_iter() {
            match verb {
                keyword::CREATE => {
                    for data in each(arg) {
                        self.create(target, &linked(data)?)?;
                    }
                }
                keyword::CREATE_MANY => {
                    let data = arg
                        .as_record()
                        .and_then(|create_many| create_many.get_raw(keyword::DATA))
                        .unwrap_or(&Value::Null);

                    for data in each(data) {
                        self.create(target, &linked(data)?)?;
                    }
                }
                keyword::CONNECT => {
                    for filter in each(arg) {
                        let position = self.find_one(target, filter)?;
                        self.link(join, position, Some(key.as_slice()));
                    }
                }
                keyword::CONNECT_OR_CREATE => {
                    for item in each(arg) {
                        let filter = field_of(item, keyword::WHERE);
                        match self.positions(target, filter)?.first() {
                            Some(&position) => self.link(join, position, Some(key.as_slice())),
                            None => {
                                self.create(target, &linked(field_of(item, keyword::CREATE))?)?;
                            }
                        }
                    }
                }
                keyword::DISCONNECT => {
                    for filter in each(arg) {
                        if let Some(&position) = self.positions(target, filter)?.first() {
                            self.link(join, position, None);
                        }
                    }
                }
                other => bail!("unsupported relation write `{other}` on `{}`", join.target),
            }
        }

        Ok(())
    }

    fn link(&mut self, join: &Join<'_>, position: usize, key: Option<&[Value]>) {
        let related = &mut self.store.rows_mut(join.target)[position];

        for (i, remote) in join.remote.iter().enumerate() {
            let value = key.map(|key| key[i].clone()).unwrap_or_default();
            related.insert(remote, value);
        }
    }

    fn find_one(&self, model: &Model, filter: &Value) -> Result<usize> {
        self.positions(model, filter)?
            .first()
            .copied()
            .ok_or_else(|| {
                Error::record_not_found(format!("model={}; no row to connect", model.name))
            })
    }

    fn connect_or_create(&mut self, model: &Model, arg: &Value) -> Result<usize> {
        let filter = field_of(arg, keyword::WHERE);
        match self.positions(model, filter)?.first() {
            Some(&position) => Ok(position),
            None => self.create(model, field_of(arg, keyword::CREATE)),
        }
    }

    fn check_unique(&self, model: &Model, row: &Record, skip: Option<usize>) -> Result<()> {
        for (field, scalar) in model.scalars() {
            if !(scalar.id || scalar.unique) {
                continue;
            }

            let Some(value) = row.get_raw(&field.name).filter(|value| !value.is_null()) else {
                continue;
            };

            let taken = self
                .store
                .rows(&model.name)
                .iter()
                .enumerate()
                .any(|(i, other)| Some(i) != skip && other.get_raw(&field.name) == Some(value));

            if taken {
                return Err(err!(
                    "unique constraint failed on `{}.{}`",
                    model.name,
                    field.name
                ));
            }
        }

        Ok(())
    }
}

fn check_fields(model: &Model, data: &Record) -> Result<()> {
    for key in data.keys() {
        if model.field_by_name(key).is_none() {
            bail!("unknown field `{}.{key}`", model.name);
        }
    }
    Ok(())
}

fn unwrap_set(value: &Value) -> &Value {
    match value {
        Value::Record(ops) if ops.len() == 1 && ops.contains_key(keyword::SET) => {
            ops.get_raw(keyword::SET).unwrap_or(&Value::Null)
        }
        _ => value,
    }
}

fn scalar_update(field: &str, current: Value, update: &Value) -> Result<Value> {
    let Value::Record(ops) = update else {
        return Ok(update.clone());
    };

    let mut value = current;

    for (op, operand) in ops.raw_iter() {
        value = match (op, &value, operand) {
            (keyword::SET, _, operand) => operand.clone(),
            (keyword::INCREMENT, Value::I64(a), Value::I64(b)) => Value::I64(a + b),
            (keyword::INCREMENT, Value::F64(a), Value::F64(b)) => Value::F64(a + b),
            (keyword::INCREMENT, Value::F64(a), Value::I64(b)) => Value::F64(a + *b as f64),
            (keyword::INCREMENT, _, _) => {
                bail!("cannot increment `{field}` holding {}", value.type_name())
            }
            (other, _, _) => bail!("unsupported update operator `{other}` on `{field}`"),
        };
    }

    Ok(value)
}

/// A single item or each item of a list.
fn each(value: &Value) -> impl Iterator<Item = &Value> {
    match value {
        Value::List(items) => items.iter(),
        other => std::slice::from_ref(other).iter(),
    }
}

fn field_of<'v>(value: &'v Value, name: &str) -> &'v Value {
    value
        .as_record()
        .and_then(|record| record.get_raw(name))
        .unwrap_or(&Value::Null)
}
