use saltid_core::{
    codec::{DEFAULT_SALT_LENGTH, MAX_SALT_LENGTH},
    schema::DEFAULT_SALT_SUFFIX,
    Error, Result,
};

use serde::Deserialize;

/// Runtime options.
///
/// Deserializes from the camelCase form used in configuration files:
///
/// ```
/// let config = saltid::Config::from_json(r#"{ "saltLength": 3 }"#).unwrap();
/// assert_eq!(config.salt_length, 3);
/// assert_eq!(config.salt_suffix, "Salt");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Number of digits in every salt
    pub salt_length: usize,

    /// Appended to a base field name to name its salt field
    pub salt_suffix: String,

    /// Scan raw query results for salt pairs
    pub raw_result_hijack: bool,
}

impl Config {
    pub fn from_json(json: &str) -> Result<Config> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_SALT_LENGTH).contains(&self.salt_length) {
            return Err(Error::invalid_configuration(format!(
                "salt length must be between 1 and {MAX_SALT_LENGTH}; salt_length={}",
                self.salt_length
            )));
        }

        if self.salt_suffix.is_empty() {
            return Err(Error::invalid_configuration("salt suffix must not be empty"));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            salt_length: DEFAULT_SALT_LENGTH,
            salt_suffix: DEFAULT_SALT_SUFFIX.to_string(),
            raw_result_hijack: true,
        }
    }
}
