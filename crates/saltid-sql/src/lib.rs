//! Building blocks for raw SQL that touches salted id columns.
//!
//! Raw statements carry no schema information, so nothing is inferred: the
//! caller names the base columns explicitly and builds predicates with the
//! functions in [`predicate`]. Results are hijacked either from an explicit
//! field list ([`ResultFields`]) or by scanning rows for numeric
//! `X` / `X{suffix}` pairs ([`result_scan`]).

mod column;
pub use column::{col, Column};

mod fragment;
pub use fragment::{Fragment, Part};

pub mod predicate;

mod result;
pub use result::{result_scan, ResultFields};

pub mod serializer;
pub use serializer::{to_unsafe, Params, Serializer, UnsafeQuery};

pub use saltid_core::driver::Flavor;
