use super::{Db, Shared};
use crate::{Config, Result};

use saltid_core::{driver::Driver, schema::Descriptor, Registry};

use std::sync::Arc;

#[derive(Debug, Default)]
pub struct Builder {
    config: Config,

    /// Explicit schema. When absent, the driver is asked for one on first
    /// use.
    schema: Option<Descriptor>,
}

impl Builder {
    pub fn salt_length(&mut self, salt_length: usize) -> &mut Self {
        self.config.salt_length = salt_length;
        self
    }

    pub fn salt_suffix(&mut self, suffix: impl Into<String>) -> &mut Self {
        self.config.salt_suffix = suffix.into();
        self
    }

    pub fn raw_result_hijack(&mut self, enabled: bool) -> &mut Self {
        self.config.raw_result_hijack = enabled;
        self
    }

    /// Replace all options at once
    pub fn config(&mut self, config: Config) -> &mut Self {
        self.config = config;
        self
    }

    pub fn schema(&mut self, descriptor: Descriptor) -> &mut Self {
        self.schema = Some(descriptor);
        self
    }

    pub fn build(&mut self, driver: impl Driver) -> Result<Db> {
        self.config.validate()?;

        Ok(Db {
            shared: Arc::new(Shared {
                driver: Box::new(driver),
                config: self.config.clone(),
                registry: Registry::new(self.config.salt_suffix.clone()),
                descriptor: self.schema.clone(),
            }),
        })
    }
}
