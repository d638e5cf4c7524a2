use crate::store::Store;

use saltid_core::{
    err,
    schema::descriptor::{Descriptor, Field, Model},
    stmt::{Record, Value},
    Result,
};

#[derive(Debug)]
pub(crate) struct Schema {
    descriptor: Descriptor,
}

/// How rows of a model relate to rows of a relation's target.
///
/// A target row is related when `target[remote[i]] == row[local[i]]` for
/// every `i`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Join<'a> {
    pub(crate) target: &'a str,
    pub(crate) is_list: bool,

    /// The foreign key lives on the source model
    pub(crate) owning: bool,

    pub(crate) local: &'a [String],
    pub(crate) remote: &'a [String],
}

impl Schema {
    pub(crate) fn new(descriptor: Descriptor) -> Schema {
        Schema { descriptor }
    }

    pub(crate) fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    pub(crate) fn model(&self, name: &str) -> Result<&Model> {
        self.descriptor
            .get(name)
            .ok_or_else(|| err!("unknown model `{name}`"))
    }

    /// The join for `field` of `model`, or `None` if the field is not a
    /// relation.
    pub(crate) fn join<'a>(&'a self, model: &'a Model, field: &str) -> Result<Option<Join<'a>>> {
        let Some(relation) = model.field_by_name(field).and_then(Field::as_relation) else {
            return Ok(None);
        };

        if !relation.fields.is_empty() {
            return Ok(Some(Join {
                target: &relation.target,
                is_list: relation.list,
                owning: true,
                local: &relation.fields,
                remote: &relation.references,
            }));
        }

        let target = self.model(&relation.target)?;
        let (_, back) = target
            .relations()
            .find(|(_, back)| back.target == model.name && !back.fields.is_empty())
            .ok_or_else(|| {
                err!(
                    "relation `{}.{field}` has no foreign key on either side",
                    model.name
                )
            })?;

        Ok(Some(Join {
            target: &relation.target,
            is_list: relation.list,
            owning: false,
            local: &back.references,
            remote: &back.fields,
        }))
    }
}

impl Join<'_> {
    /// Values of the local key columns, or `None` when any of them is null.
    pub(crate) fn key(&self, row: &Record) -> Option<Vec<Value>> {
        self.local
            .iter()
            .map(|field| match row.get_raw(field) {
                None | Some(Value::Null) => None,
                Some(value) => Some(value.clone()),
            })
            .collect()
    }

    pub(crate) fn is_related(&self, key: &[Value], target_row: &Record) -> bool {
        self.remote
            .iter()
            .zip(key)
            .all(|(field, value)| target_row.get_raw(field) == Some(value))
    }

    /// Target rows related to `row`.
    pub(crate) fn related<'s>(&self, store: &'s Store, row: &Record) -> Vec<&'s Record> {
        let Some(key) = self.key(row) else {
            return vec![];
        };

        store
            .rows(self.target)
            .iter()
            .filter(|target_row| self.is_related(&key, target_row))
            .collect()
    }
}
