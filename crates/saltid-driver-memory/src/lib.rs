//! An in-memory driver.
//!
//! Rows are stored as records keyed by model name. Filters, ordering, paging,
//! projection and nested relation writes follow the argument conventions of
//! model operations, which makes the driver suitable for tests and examples
//! that exercise the salted-id engine end to end.

mod filter;
mod query;
mod schema;
mod store;
mod write;

use query::Reader;
use schema::Schema;
use store::Store;
use write::Writer;

use saltid_core::{
    async_trait, bail,
    driver::{
        operation::{ModelOperation, OperationKind},
        Capability, Driver, Operation,
    },
    schema::Descriptor,
    stmt::{keyword, Record, Value},
    Error, Result,
};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct MemoryDriver {
    schema: Arc<Schema>,
    store: Arc<Mutex<Store>>,
}

impl MemoryDriver {
    pub fn new(descriptor: Descriptor) -> MemoryDriver {
        MemoryDriver {
            schema: Arc::new(Schema::new(descriptor)),
            store: Arc::default(),
        }
    }

    /// Snapshot of the stored rows of `model`, salts included.
    pub fn rows(&self, model: &str) -> Vec<Value> {
        self.lock()
            .rows(model)
            .iter()
            .cloned()
            .map(Value::Record)
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn exec_model(&self, op: ModelOperation) -> Result<Value> {
        let schema = &*self.schema;
        let model = schema.model(&op.model)?;

        let empty = Record::new();
        let args = match &op.args {
            Value::Record(args) => args,
            Value::Null => &empty,
            other => bail!(
                "arguments of `{}` must be an object, got {}",
                op.kind,
                other.type_name()
            ),
        };

        let filter = arg(args, keyword::WHERE);
        let mut store = self.lock();

        debug!(model = %op.model, kind = %op.kind, "memory driver exec");

        match op.kind {
            OperationKind::FindUnique
            | OperationKind::FindFirst
            | OperationKind::FindUniqueOrThrow => {
                let reader = Reader::new(schema, &store);
                match reader.find(model, args)?.first() {
                    Some(row) => reader.project(model, row, args),
                    None if op.kind == OperationKind::FindUniqueOrThrow => Err(not_found(&op)),
                    None => Ok(Value::Null),
                }
            }
            OperationKind::FindMany => {
                let reader = Reader::new(schema, &store);
                let mut rows = vec![];
                for row in reader.find(model, args)? {
                    rows.push(reader.project(model, row, args)?);
                }
                Ok(Value::List(rows))
            }
            OperationKind::Count => {
                let reader = Reader::new(schema, &store);
                Ok(Value::I64(reader.find(model, args)?.len() as i64))
            }
            OperationKind::Create => {
                let position =
                    Writer::new(schema, &mut store).create(model, arg(args, keyword::DATA))?;
                project_at(schema, &store, model, position, args)
            }
            OperationKind::CreateMany => {
                let mut writer = Writer::new(schema, &mut store);
                let mut count = 0;
                for data in arg(args, keyword::DATA).as_list().unwrap_or_default() {
                    writer.create(model, data)?;
                    count += 1;
                }
                Ok(count_result(count))
            }
            OperationKind::Update => {
                let mut writer = Writer::new(schema, &mut store);
                let Some(&position) = writer.positions(model, filter)?.first() else {
                    return Err(not_found(&op));
                };
                writer.update(model, position, arg(args, keyword::DATA))?;
                project_at(schema, &store, model, position, args)
            }
            OperationKind::UpdateMany => {
                let mut writer = Writer::new(schema, &mut store);
                let positions = writer.positions(model, filter)?;
                for &position in &positions {
                    writer.update(model, position, arg(args, keyword::DATA))?;
                }
                Ok(count_result(positions.len()))
            }
            OperationKind::Upsert => {
                let mut writer = Writer::new(schema, &mut store);
                let position = match writer.positions(model, filter)?.first() {
                    Some(&position) => {
                        writer.update(model, position, arg(args, keyword::UPDATE))?;
                        position
                    }
                    None => writer.create(model, arg(args, keyword::CREATE))?,
                };
                project_at(schema, &store, model, position, args)
            }
            OperationKind::Delete => {
                let Some(&position) = Writer::new(schema, &mut store)
                    .positions(model, filter)?
                    .first()
                else {
                    return Err(not_found(&op));
                };
                let deleted = project_at(schema, &store, model, position, args)?;
                Writer::new(schema, &mut store).delete(model, position);
                Ok(deleted)
            }
            OperationKind::DeleteMany => {
                let mut writer = Writer::new(schema, &mut store);
                let positions = writer.positions(model, filter)?;
                for &position in positions.iter().rev() {
                    writer.delete(model, position);
                }
                Ok(count_result(positions.len()))
            }
        }
    }
}

#[async_trait]
impl Driver for MemoryDriver {
    fn capability(&self) -> &Capability {
        &Capability::POSTGRESQL
    }

    fn schema_descriptor(&self) -> Option<Descriptor> {
        Some(self.schema.descriptor().clone())
    }

    async fn exec(&self, op: Operation) -> Result<Value> {
        match op {
            Operation::Model(op) => self.exec_model(op),
            Operation::Raw(op) => bail!("the memory driver cannot run raw SQL; sql={}", op.sql),
        }
    }
}

fn arg<'a>(args: &'a Record, name: &str) -> &'a Value {
    args.get_raw(name).unwrap_or(&Value::Null)
}

fn project_at(
    schema: &Schema,
    store: &Store,
    model: &saltid_core::schema::descriptor::Model,
    position: usize,
    args: &Record,
) -> Result<Value> {
    let row = &store.rows(&model.name)[position];
    Reader::new(schema, store).project(model, row, args)
}

fn count_result(count: usize) -> Value {
    Value::record_from_iter([(keyword::COUNT, Value::I64(count as i64))])
}

fn not_found(op: &ModelOperation) -> Error {
    Error::record_not_found(format!("model={}; operation={}", op.model, op.kind))
}
