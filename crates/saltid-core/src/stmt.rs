//! Argument and result trees.
//!
//! Operations carry their arguments (filters, write payloads, selections) as
//! a [`Value`] tree, and drivers return their results the same way. Trees are
//! most conveniently written with `serde_json::json!` and converted with
//! `Value::from`.

mod json;

pub mod keyword;

mod record;
pub use record::Record;

mod value;
pub use value::Value;
