mod hijack;
pub use hijack::{deep_hijack_result, HijackConfig};

mod inject;
mod lookup;

mod transform;
pub use transform::Transformed;

use crate::{Db, Result};

use saltid_core::{
    driver::{
        operation::{ModelOperation, RawKind, RawOperation},
        Operation,
    },
    stmt::Value,
};

use tracing::debug;

/// Decompose public ids in the arguments of a model operation.
///
/// Exposed for callers that drive their own execution.
pub fn transform_args(
    registry: &saltid_core::Registry,
    entity: &str,
    args: &Value,
    salt_len: usize,
) -> Transformed {
    transform::apply(registry, entity, args, salt_len)
}

pub(crate) async fn exec(db: &Db, op: Operation) -> Result<Value> {
    match op {
        Operation::Model(op) => exec_model(db, op).await,
        Operation::Raw(op) => exec_raw(db, op).await,
    }
}

async fn exec_model(db: &Db, op: ModelOperation) -> Result<Value> {
    let registry = db.registry()?;
    let config = db.config();

    let Transformed {
        mut args,
        decomposed,
        salts,
    } = transform::apply(registry, &op.model, &op.args, config.salt_length);

    if op.kind.is_write() {
        inject::apply(registry, &op.model, op.kind, &mut args, config.salt_length);
    }

    let value = if op.kind.is_point_lookup() && decomposed {
        lookup::exec(db.driver(), &op.model, op.kind, args, &salts).await?
    } else {
        debug!(model = %op.model, kind = %op.kind, decomposed, "executing model operation");
        db.driver()
            .exec(ModelOperation::new(op.model.as_str(), op.kind, args).into())
            .await?
    };

    Ok(deep_hijack_result(
        value,
        &db.hijack_config(),
        Some(op.model.as_str()),
        Some(registry),
    ))
}

async fn exec_raw(db: &Db, op: RawOperation) -> Result<Value> {
    let kind = op.kind;
    let rows = db.driver().exec(op.into()).await?;

    if kind == RawKind::Query && db.config().raw_result_hijack {
        let config = db.config();
        return Ok(saltid_sql::result_scan(
            rows,
            &config.salt_suffix,
            config.salt_length,
        ));
    }

    Ok(rows)
}
