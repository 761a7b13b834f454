//! Configuration for DDL rendering
//!
//! Provides a builder pattern for the catalog defaults the renderer compares against.

use crate::types::QueuePriority;

/// Catalog defaults that decide which clauses can be left out of the output
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Tablespace a database lands in when none is given (default: "pg_default")
    pub default_tablespace: String,
    /// Built-in resource queue that already exists on every target (default: "pg_default")
    pub default_resource_queue: String,
    /// Priority a resource queue gets when none is given (default: medium)
    pub default_priority: QueuePriority,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfigBuilder::new().build()
    }
}

impl RenderConfig {
    /// Create a new configuration builder
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder::new()
    }
}

/// Builder for RenderConfig
#[derive(Debug)]
pub struct RenderConfigBuilder {
    default_tablespace: String,
    default_resource_queue: String,
    default_priority: QueuePriority,
}

impl Default for RenderConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderConfigBuilder {
    pub fn new() -> Self {
        Self {
            default_tablespace: "pg_default".to_string(),
            default_resource_queue: "pg_default".to_string(),
            default_priority: QueuePriority::Medium,
        }
    }

    /// Set the default tablespace name (default: "pg_default")
    pub fn default_tablespace(mut self, name: impl Into<String>) -> Self {
        self.default_tablespace = name.into();
        self
    }

    /// Set the built-in resource queue name (default: "pg_default")
    pub fn default_resource_queue(mut self, name: impl Into<String>) -> Self {
        self.default_resource_queue = name.into();
        self
    }

    /// Set the default resource queue priority (default: medium)
    pub fn default_priority(mut self, priority: QueuePriority) -> Self {
        self.default_priority = priority;
        self
    }

    /// Build the configuration
    pub fn build(self) -> RenderConfig {
        RenderConfig {
            default_tablespace: self.default_tablespace,
            default_resource_queue: self.default_resource_queue,
            default_priority: self.default_priority,
        }
    }
}
