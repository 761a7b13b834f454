//! # pg-globals-ddl
//!
//! Renders cluster-wide global objects as the SQL needed to recreate them.
//!
//! Given databases, tablespaces, resource queues, roles and role memberships
//! as read from a PostgreSQL/Greenplum catalog, plus a map of per-object
//! metadata (owner, comment, ACL) keyed by OID, this crate produces the exact
//! statement sequence a restore replays: CREATE/ALTER statements, then
//! comment, owner and privilege blocks.
//!
//! ## Features
//!
//! - **Minimal Quoting**: identifiers are quoted only when PostgreSQL needs it
//! - **Privilege Diffing**: GRANT ALL vs. partial grants against per-kind tables
//! - **Default-Aware Clauses**: omitted clauses for tablespaces, queue attributes and role limits
//! - **Order Preserving**: output order always equals input order
//! - **Fail Fast**: malformed records abort the render before anything is written
//!
//! ## Quick Start
//!
//! ```rust
//! use pg_globals_ddl::{GlobalsWriter, MetadataMap, ObjectMetadata, Role};
//!
//! let mut writer = GlobalsWriter::with_defaults(Vec::new());
//!
//! let roles = vec![Role::new(1, "testrole1", "pg_default")];
//! let mut metadata = MetadataMap::new();
//! metadata.insert(1, ObjectMetadata::new().comment("This is a role comment."));
//!
//! writer.write_objects(&roles, &metadata).unwrap();
//!
//! let sql = String::from_utf8(writer.into_inner()).unwrap();
//! assert_eq!(
//!     sql,
//!     "CREATE ROLE testrole1;\n\
//!      ALTER ROLE testrole1 WITH NOSUPERUSER NOINHERIT NOCREATEROLE NOCREATEDB NOLOGIN RESOURCE QUEUE pg_default;\n\
//!      \n\
//!      COMMENT ON ROLE testrole1 IS 'This is a role comment.';\n"
//! );
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use pg_globals_ddl::{QueuePriority, RenderConfig};
//!
//! let config = RenderConfig::builder()
//!     .default_tablespace("pg_default")      // omitted from CREATE DATABASE
//!     .default_resource_queue("pg_default")  // ALTERed instead of CREATEd
//!     .default_priority(QueuePriority::Medium)
//!     .build();
//! ```

pub mod config;
pub mod error;
pub mod snapshot;
pub mod sql;
pub mod types;
pub mod writer;

// Re-export main types for convenience
pub use config::{RenderConfig, RenderConfigBuilder};
pub use error::{GlobalsError, Result};
pub use snapshot::GlobalsSnapshot;
pub use types::{
    Acl, CatalogEntry, CatalogObject, Database, MetadataMap, ObjectKind, ObjectMetadata, Oid,
    QueuePriority, ResourceQueue, Role, RoleMember, SessionGucs, Tablespace, TimeConstraint,
};
pub use writer::GlobalsWriter;

// Re-export SQL utilities for advanced users
pub use sql::block::BlockSet;
pub use sql::ddl::{DdlGenerator, GlobalObject};
pub use sql::sanitize::{escape_literal, quote_ident, quote_literal};
