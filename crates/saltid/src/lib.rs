//! Salted public identifiers.
//!
//! Every salted entity stores two integers: a sequential real id and a random
//! salt in a sibling field named `{base}{suffix}`. Application code only ever
//! sees one public id, the decimal concatenation of the salt and the real id.
//! [`Db`] sits in front of a [`Driver`](driver::Driver): arguments are
//! rewritten before execution and results are hijacked after it.

/// Public id arithmetic.
pub mod codec {
    pub use saltid_core::codec::{
        decode, digit_len, encode, generate_salt, is_potential_salt_id, Decoded,
        DEFAULT_SALT_LENGTH, MAX_SALT_LENGTH,
    };
}

mod config;
pub use config::Config;

pub mod db;
pub use db::Db;

pub mod driver {
    pub use saltid_core::driver::*;

    #[cfg(feature = "memory")]
    pub use saltid_driver_memory::MemoryDriver;
}

mod engine;
pub use engine::{deep_hijack_result, transform_args, HijackConfig, Transformed};

pub mod raw;

pub use saltid_core::{bail, err, schema, stmt, Error, Registry, Result};

pub use saltid_sql as sql;
