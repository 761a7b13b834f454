//! DDL Generation for Global Objects
//!
//! Generates the statements that recreate databases, tablespaces, resource
//! queues, roles and role memberships, plus the comment, owner and privilege
//! blocks attached to them.

use rust_decimal::Decimal;

use crate::config::RenderConfig;
use crate::error::{GlobalsError, Result};
use crate::sql::block::BlockSet;
use crate::sql::privileges::{diff, privilege_table};
use crate::sql::sanitize::{quote_ident, quote_literal};
use crate::types::{
    CatalogEntry, CatalogObject, Database, MetadataMap, ObjectKind, ObjectMetadata, Oid,
    QueuePriority, ResourceQueue, Role, RoleMember, SessionGucs, Tablespace,
};

/// `CREATEEXTTABLE` clauses in the order they are appended to `ALTER ROLE`
fn external_table_clauses(role: &Role) -> [(bool, &'static str); 5] {
    [
        (role.create_readable_http, "CREATEEXTTABLE (protocol='http')"),
        (
            role.create_readable_gpfdist,
            "CREATEEXTTABLE (protocol='gpfdist', type='readable')",
        ),
        (
            role.create_writable_gpfdist,
            "CREATEEXTTABLE (protocol='gpfdist', type='writable')",
        ),
        (
            role.create_readable_gphdfs,
            "CREATEEXTTABLE (protocol='gphdfs', type='readable')",
        ),
        (
            role.create_writable_gphdfs,
            "CREATEEXTTABLE (protocol='gphdfs', type='writable')",
        ),
    ]
}

fn supports_owner(kind: ObjectKind) -> bool {
    matches!(kind, ObjectKind::Database | ObjectKind::Tablespace)
}

fn require(kind: ObjectKind, oid: Oid, field: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(GlobalsError::missing(kind, oid, field));
    }
    Ok(())
}

fn parse_cost(queue: &ResourceQueue, field: &'static str, value: &str) -> Result<Decimal> {
    value.parse::<Decimal>().map_err(|e| {
        GlobalsError::precondition(
            ObjectKind::ResourceQueue,
            queue.oid,
            field,
            format!("'{}' is not a numeric cost: {}", value, e),
        )
    })
}

/// A global object whose base statements can be generated
pub trait GlobalObject: CatalogEntry {
    fn primary_statements(&self, generator: &DdlGenerator<'_>) -> Result<Vec<String>>;
}

impl GlobalObject for Database {
    fn primary_statements(&self, generator: &DdlGenerator<'_>) -> Result<Vec<String>> {
        Ok(vec![generator.generate_create_database(self)?])
    }
}

impl GlobalObject for Tablespace {
    fn primary_statements(&self, generator: &DdlGenerator<'_>) -> Result<Vec<String>> {
        Ok(vec![generator.generate_create_tablespace(self)?])
    }
}

impl GlobalObject for ResourceQueue {
    fn primary_statements(&self, generator: &DdlGenerator<'_>) -> Result<Vec<String>> {
        Ok(vec![generator.generate_resource_queue(self)?])
    }
}

impl GlobalObject for Role {
    fn primary_statements(&self, generator: &DdlGenerator<'_>) -> Result<Vec<String>> {
        generator.generate_role(self)
    }
}

impl GlobalObject for CatalogObject {
    fn primary_statements(&self, generator: &DdlGenerator<'_>) -> Result<Vec<String>> {
        match self {
            CatalogObject::Database(o) => o.primary_statements(generator),
            CatalogObject::Tablespace(o) => o.primary_statements(generator),
            CatalogObject::ResourceQueue(o) => o.primary_statements(generator),
            CatalogObject::Role(o) => o.primary_statements(generator),
        }
    }
}

/// DDL Generator for global objects
pub struct DdlGenerator<'a> {
    config: &'a RenderConfig,
}

impl<'a> DdlGenerator<'a> {
    /// Create a new DDL generator with the given configuration
    pub fn new(config: &'a RenderConfig) -> Self {
        Self { config }
    }

    /// Generate `CREATE DATABASE`, naming the tablespace only when it is not the default
    pub fn generate_create_database(&self, db: &Database) -> Result<String> {
        require(ObjectKind::Database, db.oid, "name", &db.name)?;
        require(ObjectKind::Database, db.oid, "tablespace", &db.tablespace)?;

        let mut stmt = format!("CREATE DATABASE {}", quote_ident(&db.name));
        if db.tablespace != self.config.default_tablespace {
            stmt.push_str(&format!(" TABLESPACE {}", quote_ident(&db.tablespace)));
        }
        stmt.push(';');
        Ok(stmt)
    }

    /// Generate one `ALTER DATABASE ... <guc>;` per setting
    pub fn generate_database_gucs(&self, db_name: &str, gucs: &[String]) -> Vec<String> {
        let quoted = quote_ident(db_name);
        gucs.iter()
            .map(|guc| format!("ALTER DATABASE {} {};", quoted, guc))
            .collect()
    }

    pub fn generate_create_tablespace(&self, ts: &Tablespace) -> Result<String> {
        require(ObjectKind::Tablespace, ts.oid, "name", &ts.name)?;
        require(ObjectKind::Tablespace, ts.oid, "filespace", &ts.filespace)?;

        Ok(format!(
            "CREATE TABLESPACE {} FILESPACE {};",
            quote_ident(&ts.name),
            quote_ident(&ts.filespace)
        ))
    }

    /// Generate `CREATE RESOURCE QUEUE` (or `ALTER` for the built-in queue)
    ///
    /// Only attributes that differ from their unset value are listed, except
    /// `ACTIVE_STATEMENTS`, which appears whenever it is not -1 and is also
    /// the fallback when nothing else would be listed.
    pub fn generate_resource_queue(&self, queue: &ResourceQueue) -> Result<String> {
        let kind = ObjectKind::ResourceQueue;
        require(kind, queue.oid, "name", &queue.name)?;
        require(kind, queue.oid, "memory_limit", &queue.memory_limit)?;

        let max_cost = parse_cost(queue, "max_cost", &queue.max_cost)?;
        let min_cost = parse_cost(queue, "min_cost", &queue.min_cost)?;
        let priority: QueuePriority = queue
            .priority
            .parse()
            .map_err(|reason: String| GlobalsError::precondition(kind, queue.oid, "priority", reason))?;

        let mut attributes = Vec::new();
        if queue.active_statements != -1 {
            attributes.push(format!("ACTIVE_STATEMENTS={}", queue.active_statements));
        }
        if max_cost != Decimal::NEGATIVE_ONE {
            attributes.push(format!("MAX_COST={}", queue.max_cost));
        }
        if queue.cost_overcommit {
            attributes.push("COST_OVERCOMMIT=TRUE".to_string());
        }
        if min_cost != Decimal::ZERO {
            attributes.push(format!("MIN_COST={}", queue.min_cost));
        }
        if priority != self.config.default_priority {
            attributes.push(format!("PRIORITY={}", priority.as_sql()));
        }
        if queue.memory_limit != "-1" {
            attributes.push(format!("MEMORY_LIMIT={}", quote_literal(&queue.memory_limit)));
        }
        if attributes.is_empty() {
            attributes.push(format!("ACTIVE_STATEMENTS={}", queue.active_statements));
        }

        let verb = if queue.name == self.config.default_resource_queue {
            "ALTER"
        } else {
            "CREATE"
        };

        Ok(format!(
            "{} RESOURCE QUEUE {} WITH ({});",
            verb,
            quote_ident(&queue.name),
            attributes.join(", ")
        ))
    }

    /// Generate `CREATE ROLE`, the combined `ALTER ROLE ... WITH`, and one
    /// `DENY BETWEEN` statement per time constraint
    pub fn generate_role(&self, role: &Role) -> Result<Vec<String>> {
        let kind = ObjectKind::Role;
        require(kind, role.oid, "name", &role.name)?;
        require(kind, role.oid, "resource_queue", &role.resource_queue)?;

        let name = quote_ident(&role.name);
        let flag = |set: bool, on: &str, off: &str| (if set { on } else { off }).to_string();

        let mut clauses = vec![
            flag(role.superuser, "SUPERUSER", "NOSUPERUSER"),
            flag(role.inherit, "INHERIT", "NOINHERIT"),
            flag(role.create_role, "CREATEROLE", "NOCREATEROLE"),
            flag(role.create_db, "CREATEDB", "NOCREATEDB"),
            flag(role.can_login, "LOGIN", "NOLOGIN"),
        ];
        if role.connection_limit != -1 {
            clauses.push(format!("CONNECTION LIMIT {}", role.connection_limit));
        }
        if !role.password.is_empty() {
            clauses.push(format!("PASSWORD {}", quote_literal(&role.password)));
        }
        if !role.valid_until.is_empty() {
            clauses.push(format!("VALID UNTIL {}", quote_literal(&role.valid_until)));
        }
        clauses.push(format!("RESOURCE QUEUE {}", quote_ident(&role.resource_queue)));
        for (held, clause) in external_table_clauses(role) {
            if held {
                clauses.push(clause.to_string());
            }
        }

        let mut statements = vec![
            format!("CREATE ROLE {};", name),
            format!("ALTER ROLE {} WITH {};", name, clauses.join(" ")),
        ];

        for constraint in &role.time_constraints {
            for (field, day) in [
                ("time_constraints.start_day", constraint.start_day),
                ("time_constraints.end_day", constraint.end_day),
            ] {
                if !(0..=6).contains(&day) {
                    return Err(GlobalsError::precondition(
                        kind,
                        role.oid,
                        field,
                        format!("day {} is outside 0..=6", day),
                    ));
                }
            }
            require(kind, role.oid, "time_constraints.start_time", &constraint.start_time)?;
            require(kind, role.oid, "time_constraints.end_time", &constraint.end_time)?;

            statements.push(format!(
                "ALTER ROLE {} DENY BETWEEN DAY {} TIME {} AND DAY {} TIME {};",
                name,
                constraint.start_day,
                quote_literal(&constraint.start_time),
                constraint.end_day,
                quote_literal(&constraint.end_time)
            ));
        }

        Ok(statements)
    }

    /// Generate `GRANT <role> TO <member> [WITH ADMIN OPTION] GRANTED BY <grantor>;`
    pub fn generate_role_membership(&self, membership: &RoleMember) -> Result<String> {
        for (field, value) in [
            ("role", &membership.role),
            ("member", &membership.member),
            ("grantor", &membership.grantor),
        ] {
            if value.is_empty() {
                return Err(GlobalsError::precondition(
                    ObjectKind::RoleMembership,
                    0,
                    field,
                    format!(
                        "must not be empty (role '{}', member '{}')",
                        membership.role, membership.member
                    ),
                ));
            }
        }

        let admin = if membership.is_admin {
            " WITH ADMIN OPTION"
        } else {
            ""
        };
        Ok(format!(
            "GRANT {} TO {}{} GRANTED BY {};",
            quote_ident(&membership.role),
            quote_ident(&membership.member),
            admin,
            quote_ident(&membership.grantor)
        ))
    }

    /// Generate the `SET` preamble that makes the restore session match the source
    pub fn generate_session_gucs(&self, gucs: &SessionGucs) -> Vec<String> {
        vec![
            "SET statement_timeout = 0;".to_string(),
            "SET check_function_bodies = false;".to_string(),
            "SET client_min_messages = error;".to_string(),
            format!("SET client_encoding = {};", quote_literal(&gucs.client_encoding)),
            format!(
                "SET standard_conforming_strings = {};",
                gucs.standard_conforming_strings
            ),
            format!("SET default_with_oids = {};", gucs.default_with_oids),
        ]
    }

    /// Build the comment, owner and privilege blocks for an object
    ///
    /// Fails when the metadata carries a block the object's kind cannot have.
    pub fn generate_metadata_blocks<T: CatalogEntry + ?Sized>(
        &self,
        object: &T,
        metadata: Option<&ObjectMetadata>,
    ) -> Result<BlockSet> {
        let mut blocks = BlockSet::default();
        let Some(metadata) = metadata else {
            return Ok(blocks);
        };

        let kind = object.kind();
        let keyword = kind.keyword();
        let name = quote_ident(object.name());

        if let Some(comment) = &metadata.comment {
            blocks.comment = Some(format!(
                "COMMENT ON {} {} IS {};",
                keyword,
                name,
                quote_literal(comment)
            ));
        }

        if let Some(owner) = &metadata.owner {
            if !supports_owner(kind) {
                return Err(GlobalsError::precondition(
                    kind,
                    object.oid(),
                    "owner",
                    format!("{} objects have no owner", keyword),
                ));
            }
            blocks.owner = Some(format!(
                "ALTER {} {} OWNER TO {};",
                keyword,
                name,
                quote_ident(owner)
            ));
        }

        if !metadata.privileges.is_empty() {
            let table = privilege_table(kind).ok_or_else(|| {
                GlobalsError::precondition(
                    kind,
                    object.oid(),
                    "privileges",
                    format!("{} objects have no ACL", keyword),
                )
            })?;
            for acl in &metadata.privileges {
                if let Some(privilege) = table.unlisted(acl) {
                    return Err(GlobalsError::precondition(
                        kind,
                        object.oid(),
                        "privileges",
                        format!(
                            "{} objects have no {} privilege (granted to {})",
                            keyword,
                            privilege.label(),
                            if acl.is_public() { "PUBLIC" } else { acl.grantee.as_str() }
                        ),
                    ));
                }
            }
            blocks.privileges = diff(table, metadata).to_statements(keyword, &name);
        }

        Ok(blocks)
    }

    /// Build the complete block set for an object, looking its metadata up by OID
    pub fn generate_blocks<T: GlobalObject + ?Sized>(
        &self,
        object: &T,
        metadata: &MetadataMap,
    ) -> Result<BlockSet> {
        let mut blocks = self.generate_metadata_blocks(object, metadata.get(&object.oid()))?;
        blocks.primary = object.primary_statements(self)?;
        Ok(blocks)
    }
}
