mod capability;
pub use capability::{Capability, Flavor};

pub mod operation;
pub use operation::Operation;

use crate::{async_trait, schema::Descriptor, stmt::Value};

use std::fmt::Debug;

#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Describes the driver's capability, which informs raw query rendering.
    fn capability(&self) -> &Capability;

    /// The schema the driver operates on, when it can introspect one.
    fn schema_descriptor(&self) -> Option<Descriptor> {
        None
    }

    /// Execute a database operation
    async fn exec(&self, op: Operation) -> crate::Result<Value>;
}
