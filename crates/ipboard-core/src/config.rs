//! Configuration types for the table core

use serde::{Deserialize, Serialize};

/// The server caps page sizes at this value; requesting more gets clamped
/// (or rejected) remotely, which would desynchronize page-count math.
pub const MAX_ITEMS_PER_PAGE: u32 = 50;

/// Table configuration
///
/// The page size here is the single pagination constant: it is used both to
/// build fetch requests and to derive the page count from the total item
/// count, so it must match on both sides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    /// Number of records per page
    #[serde(default = "default_items_per_page")]
    pub items_per_page: u32,

    /// Capacity of the produced-upward event channel
    ///
    /// When full, new events are dropped (with a warning log).
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl TableConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self {
            items_per_page: default_items_per_page(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.items_per_page == 0 {
            return Err(crate::Error::config("items_per_page must be > 0"));
        }

        if self.items_per_page > MAX_ITEMS_PER_PAGE {
            return Err(crate::Error::config(format!(
                "items_per_page must be <= {} (server page-size cap)",
                MAX_ITEMS_PER_PAGE
            )));
        }

        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config("event_channel_capacity must be > 0"));
        }

        Ok(())
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn default_items_per_page() -> u32 {
    10
}

fn default_event_channel_capacity() -> usize {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(TableConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_page_size() {
        let config = TableConfig {
            items_per_page: 0,
            ..TableConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_page_size_over_server_cap() {
        let config = TableConfig {
            items_per_page: MAX_ITEMS_PER_PAGE + 1,
            ..TableConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_channel_capacity() {
        let config = TableConfig {
            event_channel_capacity: 0,
            ..TableConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
