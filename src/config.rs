use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

// =============================================================================
// Kitchen configuration
// =============================================================================

/// Shape of one restaurant run. Every field may be left out of the TOML
/// file; missing fields take the defaults below.
///
/// ```toml
/// capacity = 100
/// customers = 90
/// cooks = 10
/// orders_per_customer = 3
/// cook_time_ms = 0
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KitchenConfig {
    /// Maximum number of orders waiting in the queue.
    pub capacity: usize,
    pub customers: usize,
    pub cooks: usize,
    pub orders_per_customer: usize,
    /// Simulated time a cook spends on every order.
    pub cook_time_ms: u64,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            customers: 90,
            cooks: 10,
            orders_per_customer: 3,
            cook_time_ms: 0,
        }
    }
}

impl KitchenConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::invalid("capacity", "must be at least 1"));
        }
        let expected = self.expected_orders()?;
        if self.cooks == 0 && expected > 0 {
            return Err(ConfigError::invalid(
                "cooks",
                format!("{expected} orders expected but no cook to prepare them"),
            ));
        }
        Ok(())
    }

    /// Total number of orders all customers will place.
    pub fn expected_orders(&self) -> Result<u64, ConfigError> {
        (self.customers as u64)
            .checked_mul(self.orders_per_customer as u64)
            .ok_or_else(|| {
                ConfigError::invalid(
                    "orders_per_customer",
                    format!(
                        "{} customers x {} orders overflows",
                        self.customers, self.orders_per_customer
                    ),
                )
            })
    }
}
