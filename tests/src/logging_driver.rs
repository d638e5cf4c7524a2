use saltid_core::{
    async_trait,
    driver::{Capability, Driver, Operation},
    schema::Descriptor,
    stmt::Value,
    Result,
};

use std::sync::{Arc, Mutex};

#[derive(Debug)]
pub struct DriverOp {
    pub operation: Operation,
    pub response: Result<Value>,
}

/// A driver wrapper that logs all operations for testing purposes
#[derive(Debug)]
pub struct LoggingDriver {
    /// The underlying driver that actually executes operations
    inner: Box<dyn Driver>,

    /// Log of all operations executed through this driver
    ops_log: Arc<Mutex<Vec<DriverOp>>>,
}

impl LoggingDriver {
    pub fn new(driver: Box<dyn Driver>) -> Self {
        Self {
            inner: driver,
            ops_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get a handle to access the operations log
    pub fn ops_log_handle(&self) -> Arc<Mutex<Vec<DriverOp>>> {
        self.ops_log.clone()
    }
}

#[async_trait]
impl Driver for LoggingDriver {
    fn capability(&self) -> &Capability {
        self.inner.capability()
    }

    fn schema_descriptor(&self) -> Option<Descriptor> {
        self.inner.schema_descriptor()
    }

    async fn exec(&self, op: Operation) -> Result<Value> {
        let response = self.inner.exec(op.clone()).await;

        self.ops_log.lock().unwrap().push(DriverOp {
            operation: op,
            response: response.clone(),
        });

        response
    }
}
