//! Schema metadata: the descriptor supplied by the data-access layer and the
//! salt-pair registry derived from it.

pub mod descriptor;
pub use descriptor::Descriptor;

mod registry;
pub use registry::{Registry, RelationField, SaltField, DEFAULT_SALT_SUFFIX};
