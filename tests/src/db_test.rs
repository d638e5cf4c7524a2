use crate::{
    exec_log::ExecLog,
    fixtures,
    logging_driver::{DriverOp, LoggingDriver},
};

use saltid::{db::Builder, schema::Descriptor, Db};
use saltid_driver_memory::MemoryDriver;

use std::sync::{Arc, Mutex};

/// Per-test state: the in-memory store and the log of operations that
/// reached it.
pub struct DbTest {
    driver: Option<MemoryDriver>,
    ops_log: Arc<Mutex<Vec<DriverOp>>>,
}

impl DbTest {
    pub fn new() -> Self {
        Self {
            driver: None,
            ops_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Build a `Db` over the blog schema.
    pub fn setup_db(&mut self, builder: Builder) -> Db {
        self.setup_db_with_schema(fixtures::blog(), builder)
    }

    pub fn setup_db_with_schema(&mut self, descriptor: Descriptor, mut builder: Builder) -> Db {
        let driver = MemoryDriver::new(descriptor);
        self.driver = Some(driver.clone());

        // Always wrap with logging, using our existing ops_log
        let logging_driver = LoggingDriver::new(Box::new(driver));
        self.ops_log = logging_driver.ops_log_handle();

        builder.build(logging_driver).unwrap()
    }

    /// Operations executed by the driver so far
    pub fn log(&self) -> ExecLog {
        ExecLog::new(self.ops_log.clone())
    }

    /// Rows as stored, salts included
    pub fn stored(&self, model: &str) -> Vec<serde_json::Value> {
        self.driver
            .as_ref()
            .expect("database not set up")
            .rows(model)
            .iter()
            .map(|row| row.to_json())
            .collect()
    }
}

impl Default for DbTest {
    fn default() -> Self {
        Self::new()
    }
}
