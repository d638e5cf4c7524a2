use crate::logging_driver::DriverOp;

use saltid_core::driver::{
    operation::{ModelOperation, OperationKind},
    Operation,
};

use std::sync::{Arc, Mutex};

/// A wrapper around the operations log that provides a clean API for tests
pub struct ExecLog {
    ops: Arc<Mutex<Vec<DriverOp>>>,
}

impl ExecLog {
    pub(crate) fn new(ops: Arc<Mutex<Vec<DriverOp>>>) -> Self {
        Self { ops }
    }

    /// Get the number of logged operations
    pub fn len(&self) -> usize {
        self.ops.lock().unwrap().len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.ops.lock().unwrap().is_empty()
    }

    /// The most recent model operation, as it reached the driver
    pub fn last_model(&self) -> ModelOperation {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find_map(|op| op.operation.as_model().cloned())
            .expect("no model operation was executed")
    }

    /// Arguments of the most recent model operation, as JSON
    pub fn last_args(&self) -> serde_json::Value {
        self.last_model().args.to_json()
    }

    /// Count operations of the given kind
    pub fn count(&self, kind: OperationKind) -> usize {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter(|op| matches!(&op.operation, Operation::Model(op) if op.kind == kind))
            .count()
    }

    /// Clear the log
    pub fn clear(&self) {
        self.ops.lock().unwrap().clear();
    }
}
