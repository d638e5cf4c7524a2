#[macro_use]
mod macros;

mod db_test;
pub use db_test::DbTest;

mod exec_log;
pub use exec_log::ExecLog;

pub mod fixtures;
pub mod logging_driver;

use std::{future::Future, sync::Once};

/// Install a `tracing` subscriber honouring `RUST_LOG`, once per process.
pub fn init_tracing() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Drive a test future to completion on a fresh current-thread runtime.
pub fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to create Tokio runtime")
        .block_on(future)
}

/// The public id a stored row exposes for `base` under the default settings.
pub fn public_id(row: &serde_json::Value, base: &str) -> i64 {
    let id = row[base].as_i64().expect("base is not an integer");
    let salt = row[format!("{base}Salt").as_str()]
        .as_i64()
        .expect("salt is not an integer");

    saltid::codec::encode(id, salt, saltid::codec::DEFAULT_SALT_LENGTH).unwrap()
}
