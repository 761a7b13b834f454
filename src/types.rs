//! Core type definitions for global object rendering
//!
//! Value records for databases, tablespaces, resource queues, roles and role
//! memberships, plus the per-object metadata (owner, comment, ACL) keyed by OID.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Stable numeric identifier of a catalog object
pub type Oid = u32;

/// Lookup from OID to owner/comment/privilege metadata.
///
/// A missing key means the object gets its base statements only.
pub type MetadataMap = HashMap<Oid, ObjectMetadata>;

// ============================================================================
// Object kinds
// ============================================================================

/// Kind tag used to pick a statement builder and its privilege table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Database,
    Tablespace,
    ResourceQueue,
    Role,
    RoleMembership,
}

impl ObjectKind {
    /// SQL keyword naming this kind in COMMENT/ALTER/GRANT statements
    pub fn keyword(&self) -> &'static str {
        match self {
            ObjectKind::Database => "DATABASE",
            ObjectKind::Tablespace => "TABLESPACE",
            ObjectKind::ResourceQueue => "RESOURCE QUEUE",
            ObjectKind::Role => "ROLE",
            ObjectKind::RoleMembership => "ROLE MEMBERSHIP",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Common accessors shared by every renderable global object
pub trait CatalogEntry {
    fn kind(&self) -> ObjectKind;
    fn oid(&self) -> Oid;
    fn name(&self) -> &str;
}

// ============================================================================
// Metadata
// ============================================================================

/// One grantee's permission set on an object.
///
/// An empty grantee stands for PUBLIC. Each permission is either held
/// plainly or held WITH GRANT OPTION.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Acl {
    pub grantee: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grantor: Option<String>,
    pub create: bool,
    pub create_with_grant: bool,
    pub connect: bool,
    pub connect_with_grant: bool,
    pub temporary: bool,
    pub temporary_with_grant: bool,
}

impl Acl {
    /// Create an entry for the given grantee with no permissions
    pub fn new(grantee: impl Into<String>) -> Self {
        Self {
            grantee: grantee.into(),
            ..Self::default()
        }
    }

    /// Create an entry for PUBLIC with no permissions
    pub fn public() -> Self {
        Self::default()
    }

    pub fn is_public(&self) -> bool {
        self.grantee.is_empty()
    }
}

/// Owner, comment and ACL attached to a single object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub privileges: Vec<Acl>,
}

impl ObjectMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn privilege(mut self, acl: Acl) -> Self {
        self.privileges.push(acl);
        self
    }
}

// ============================================================================
// Databases and tablespaces
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    pub oid: Oid,
    pub name: String,
    pub tablespace: String,
}

impl Database {
    pub fn new(oid: Oid, name: impl Into<String>, tablespace: impl Into<String>) -> Self {
        Self {
            oid,
            name: name.into(),
            tablespace: tablespace.into(),
        }
    }
}

impl CatalogEntry for Database {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Database
    }
    fn oid(&self) -> Oid {
        self.oid
    }
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tablespace {
    pub oid: Oid,
    pub name: String,
    pub filespace: String,
}

impl Tablespace {
    pub fn new(oid: Oid, name: impl Into<String>, filespace: impl Into<String>) -> Self {
        Self {
            oid,
            name: name.into(),
            filespace: filespace.into(),
        }
    }
}

impl CatalogEntry for Tablespace {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Tablespace
    }
    fn oid(&self) -> Oid {
        self.oid
    }
    fn name(&self) -> &str {
        &self.name
    }
}

// ============================================================================
// Resource queues
// ============================================================================

/// Resource queue scheduling priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueuePriority {
    Min,
    Low,
    Medium,
    High,
    Max,
}

impl QueuePriority {
    /// Upper-cased form used in `PRIORITY=...`
    pub fn as_sql(&self) -> &'static str {
        match self {
            QueuePriority::Min => "MIN",
            QueuePriority::Low => "LOW",
            QueuePriority::Medium => "MEDIUM",
            QueuePriority::High => "HIGH",
            QueuePriority::Max => "MAX",
        }
    }
}

impl FromStr for QueuePriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "min" => Ok(QueuePriority::Min),
            "low" => Ok(QueuePriority::Low),
            "medium" => Ok(QueuePriority::Medium),
            "high" => Ok(QueuePriority::High),
            "max" => Ok(QueuePriority::Max),
            _ => Err(format!("unrecognized priority '{}'", s)),
        }
    }
}

/// Resource queue as read from the catalog.
///
/// Cost, priority and memory values are kept as the catalog's text so they
/// are emitted exactly as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceQueue {
    pub oid: Oid,
    pub name: String,
    /// -1 means no limit
    pub active_statements: i32,
    /// "-1.00" means unset
    pub max_cost: String,
    pub cost_overcommit: bool,
    /// "0.00" means unset
    pub min_cost: String,
    pub priority: String,
    /// "-1" means unset
    pub memory_limit: String,
}

impl ResourceQueue {
    /// Create a queue with every attribute at its unset value
    pub fn new(oid: Oid, name: impl Into<String>) -> Self {
        Self {
            oid,
            name: name.into(),
            active_statements: -1,
            max_cost: "-1.00".to_string(),
            cost_overcommit: false,
            min_cost: "0.00".to_string(),
            priority: "medium".to_string(),
            memory_limit: "-1".to_string(),
        }
    }

    pub fn active_statements(mut self, n: i32) -> Self {
        self.active_statements = n;
        self
    }

    pub fn max_cost(mut self, cost: impl Into<String>) -> Self {
        self.max_cost = cost.into();
        self
    }

    pub fn cost_overcommit(mut self, enabled: bool) -> Self {
        self.cost_overcommit = enabled;
        self
    }

    pub fn min_cost(mut self, cost: impl Into<String>) -> Self {
        self.min_cost = cost.into();
        self
    }

    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = priority.into();
        self
    }

    pub fn memory_limit(mut self, limit: impl Into<String>) -> Self {
        self.memory_limit = limit.into();
        self
    }
}

impl CatalogEntry for ResourceQueue {
    fn kind(&self) -> ObjectKind {
        ObjectKind::ResourceQueue
    }
    fn oid(&self) -> Oid {
        self.oid
    }
    fn name(&self) -> &str {
        &self.name
    }
}

// ============================================================================
// Roles
// ============================================================================

/// Login-restriction window on a role. Days run 0 (Sunday) to 6.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeConstraint {
    pub start_day: i32,
    pub start_time: String,
    pub end_day: i32,
    pub end_time: String,
}

impl TimeConstraint {
    pub fn new(
        start_day: i32,
        start_time: impl Into<String>,
        end_day: i32,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            start_day,
            start_time: start_time.into(),
            end_day,
            end_time: end_time.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub oid: Oid,
    pub name: String,
    pub superuser: bool,
    pub inherit: bool,
    pub create_role: bool,
    pub create_db: bool,
    pub can_login: bool,
    /// -1 means unlimited
    pub connection_limit: i32,
    /// Empty when no password is set
    pub password: String,
    /// Empty when the role never expires
    pub valid_until: String,
    pub resource_queue: String,
    pub create_readable_http: bool,
    pub create_readable_gpfdist: bool,
    pub create_writable_gpfdist: bool,
    pub create_readable_gphdfs: bool,
    pub create_writable_gphdfs: bool,
    #[serde(default)]
    pub time_constraints: Vec<TimeConstraint>,
}

impl Role {
    /// Create a role with every capability off, unlimited connections and
    /// membership in the given resource queue
    pub fn new(oid: Oid, name: impl Into<String>, resource_queue: impl Into<String>) -> Self {
        Self {
            oid,
            name: name.into(),
            superuser: false,
            inherit: false,
            create_role: false,
            create_db: false,
            can_login: false,
            connection_limit: -1,
            password: String::new(),
            valid_until: String::new(),
            resource_queue: resource_queue.into(),
            create_readable_http: false,
            create_readable_gpfdist: false,
            create_writable_gpfdist: false,
            create_readable_gphdfs: false,
            create_writable_gphdfs: false,
            time_constraints: Vec::new(),
        }
    }

    pub fn superuser(mut self) -> Self {
        self.superuser = true;
        self
    }

    pub fn inherit(mut self) -> Self {
        self.inherit = true;
        self
    }

    pub fn create_role(mut self) -> Self {
        self.create_role = true;
        self
    }

    pub fn create_db(mut self) -> Self {
        self.create_db = true;
        self
    }

    pub fn login(mut self) -> Self {
        self.can_login = true;
        self
    }

    pub fn connection_limit(mut self, limit: i32) -> Self {
        self.connection_limit = limit;
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    pub fn valid_until(mut self, ts: impl Into<String>) -> Self {
        self.valid_until = ts.into();
        self
    }

    /// Grant every external-table protocol capability
    pub fn all_external_tables(mut self) -> Self {
        self.create_readable_http = true;
        self.create_readable_gpfdist = true;
        self.create_writable_gpfdist = true;
        self.create_readable_gphdfs = true;
        self.create_writable_gphdfs = true;
        self
    }

    pub fn time_constraint(mut self, constraint: TimeConstraint) -> Self {
        self.time_constraints.push(constraint);
        self
    }
}

impl CatalogEntry for Role {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Role
    }
    fn oid(&self) -> Oid {
        self.oid
    }
    fn name(&self) -> &str {
        &self.name
    }
}

/// Membership of `member` in `role`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleMember {
    pub role: String,
    pub member: String,
    pub grantor: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl RoleMember {
    pub fn new(
        role: impl Into<String>,
        member: impl Into<String>,
        grantor: impl Into<String>,
        is_admin: bool,
    ) -> Self {
        Self {
            role: role.into(),
            member: member.into(),
            grantor: grantor.into(),
            is_admin,
        }
    }
}

// ============================================================================
// Session settings
// ============================================================================

/// Session settings captured from the source so the restore session matches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionGucs {
    pub client_encoding: String,
    pub standard_conforming_strings: String,
    pub default_with_oids: String,
}

// ============================================================================
// Tagged objects
// ============================================================================

/// Any global object with a block-set rendering, tagged by kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogObject {
    Database(Database),
    Tablespace(Tablespace),
    ResourceQueue(ResourceQueue),
    Role(Role),
}

impl CatalogEntry for CatalogObject {
    fn kind(&self) -> ObjectKind {
        match self {
            CatalogObject::Database(o) => o.kind(),
            CatalogObject::Tablespace(o) => o.kind(),
            CatalogObject::ResourceQueue(o) => o.kind(),
            CatalogObject::Role(o) => o.kind(),
        }
    }

    fn oid(&self) -> Oid {
        match self {
            CatalogObject::Database(o) => o.oid,
            CatalogObject::Tablespace(o) => o.oid,
            CatalogObject::ResourceQueue(o) => o.oid,
            CatalogObject::Role(o) => o.oid,
        }
    }

    fn name(&self) -> &str {
        match self {
            CatalogObject::Database(o) => &o.name,
            CatalogObject::Tablespace(o) => &o.name,
            CatalogObject::ResourceQueue(o) => &o.name,
            CatalogObject::Role(o) => &o.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // ObjectKind Tests
    // =========================================================================

    #[test]
    fn test_kind_keywords() {
        assert_eq!(ObjectKind::Database.keyword(), "DATABASE");
        assert_eq!(ObjectKind::Tablespace.keyword(), "TABLESPACE");
        assert_eq!(ObjectKind::ResourceQueue.keyword(), "RESOURCE QUEUE");
        assert_eq!(ObjectKind::Role.keyword(), "ROLE");
        assert_eq!(ObjectKind::ResourceQueue.to_string(), "RESOURCE QUEUE");
    }

    // =========================================================================
    // QueuePriority Tests
    // =========================================================================

    #[test]
    fn test_priority_parse_case_insensitive() {
        assert_eq!("low".parse::<QueuePriority>(), Ok(QueuePriority::Low));
        assert_eq!("HIGH".parse::<QueuePriority>(), Ok(QueuePriority::High));
        assert_eq!("Medium".parse::<QueuePriority>(), Ok(QueuePriority::Medium));
    }

    #[test]
    fn test_priority_parse_unknown() {
        let err = "urgent".parse::<QueuePriority>().unwrap_err();
        assert!(err.contains("urgent"));
    }

    #[test]
    fn test_priority_sql_is_upper_case() {
        assert_eq!(QueuePriority::Min.as_sql(), "MIN");
        assert_eq!(QueuePriority::Max.as_sql(), "MAX");
    }

    // =========================================================================
    // Constructor Tests
    // =========================================================================

    #[test]
    fn test_resource_queue_new_is_all_unset() {
        let q = ResourceQueue::new(1, "q");
        assert_eq!(q.active_statements, -1);
        assert_eq!(q.max_cost, "-1.00");
        assert!(!q.cost_overcommit);
        assert_eq!(q.min_cost, "0.00");
        assert_eq!(q.priority, "medium");
        assert_eq!(q.memory_limit, "-1");
    }

    #[test]
    fn test_role_builder() {
        let role = Role::new(3, "admin", "pg_default")
            .superuser()
            .login()
            .connection_limit(5)
            .time_constraint(TimeConstraint::new(1, "08:00:00", 1, "09:00:00"));

        assert!(role.superuser);
        assert!(role.can_login);
        assert!(!role.inherit);
        assert_eq!(role.connection_limit, 5);
        assert_eq!(role.time_constraints.len(), 1);
    }

    #[test]
    fn test_acl_public() {
        assert!(Acl::public().is_public());
        assert!(!Acl::new("testrole").is_public());
    }

    // =========================================================================
    // Serde Tests
    // =========================================================================

    #[test]
    fn test_metadata_map_from_json() {
        let json = r#"{
            "1": {"owner": "testrole", "comment": "hi", "privileges": [{"grantee": "testrole", "create": true}]},
            "2": {}
        }"#;
        let map: MetadataMap = serde_json::from_str(json).unwrap();

        assert_eq!(map[&1].owner.as_deref(), Some("testrole"));
        assert!(map[&1].privileges[0].create);
        assert!(!map[&1].privileges[0].connect);
        assert_eq!(map[&2], ObjectMetadata::default());
    }

    #[test]
    fn test_catalog_object_tagged_json() {
        let json = r#"{"kind": "tablespace", "oid": 9, "name": "ts", "filespace": "fs"}"#;
        let obj: CatalogObject = serde_json::from_str(json).unwrap();

        assert_eq!(obj.kind(), ObjectKind::Tablespace);
        assert_eq!(obj.oid(), 9);
        assert_eq!(obj.name(), "ts");
    }
}
