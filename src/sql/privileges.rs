//! GRANT/REVOKE generation against per-kind default privileges
//!
//! Each object kind that carries an ACL has a static table listing its
//! permissions in canonical keyword order. The differ only reads the table,
//! so adding a kind means adding a table, not a branch.

use crate::sql::sanitize::quote_ident;
use crate::types::{Acl, ObjectKind, ObjectMetadata};

/// A single permission an ACL entry can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    Create,
    Connect,
    Temporary,
}

impl Privilege {
    /// Every permission an ACL record can carry, whatever the kind
    pub const ALL: [Privilege; 3] = [Privilege::Create, Privilege::Connect, Privilege::Temporary];

    pub fn label(&self) -> &'static str {
        match self {
            Privilege::Create => "CREATE",
            Privilege::Connect => "CONNECT",
            Privilege::Temporary => "TEMPORARY",
        }
    }

    fn held(&self, acl: &Acl) -> bool {
        match self {
            Privilege::Create => acl.create,
            Privilege::Connect => acl.connect,
            Privilege::Temporary => acl.temporary,
        }
    }

    fn held_with_grant(&self, acl: &Acl) -> bool {
        match self {
            Privilege::Create => acl.create_with_grant,
            Privilege::Connect => acl.connect_with_grant,
            Privilege::Temporary => acl.temporary_with_grant,
        }
    }
}

/// Full permission set of a kind, in the order GRANT lists them
#[derive(Debug)]
pub struct PrivilegeTable {
    pub kind: ObjectKind,
    pub privileges: &'static [Privilege],
    /// Whether fresh objects of this kind grant something to PUBLIC
    pub revoke_public: bool,
}

pub static DATABASE_PRIVILEGES: PrivilegeTable = PrivilegeTable {
    kind: ObjectKind::Database,
    privileges: &[Privilege::Create, Privilege::Connect, Privilege::Temporary],
    revoke_public: true,
};

pub static TABLESPACE_PRIVILEGES: PrivilegeTable = PrivilegeTable {
    kind: ObjectKind::Tablespace,
    privileges: &[Privilege::Create],
    revoke_public: true,
};

impl PrivilegeTable {
    /// First permission `acl` holds that this kind does not have, if any
    pub fn unlisted(&self, acl: &Acl) -> Option<Privilege> {
        Privilege::ALL.into_iter().find(|p| {
            !self.privileges.contains(p) && (p.held(acl) || p.held_with_grant(acl))
        })
    }
}

/// Look up the privilege table for a kind; `None` when the kind has no ACL
pub fn privilege_table(kind: ObjectKind) -> Option<&'static PrivilegeTable> {
    match kind {
        ObjectKind::Database => Some(&DATABASE_PRIVILEGES),
        ObjectKind::Tablespace => Some(&TABLESPACE_PRIVILEGES),
        ObjectKind::ResourceQueue | ObjectKind::Role | ObjectKind::RoleMembership => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Grant,
    Revoke,
}

/// Either every permission of the kind, or an ordered subset of labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrivilegeSet {
    All,
    Some(Vec<&'static str>),
}

impl PrivilegeSet {
    fn to_sql(&self) -> String {
        match self {
            PrivilegeSet::All => "ALL".to_string(),
            PrivilegeSet::Some(labels) => labels.join(","),
        }
    }
}

/// One GRANT or REVOKE line for one grantee
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivilegeClause {
    pub verb: Verb,
    pub privileges: PrivilegeSet,
    /// Already rendered: `PUBLIC` or a quoted role name
    pub grantee: String,
    pub with_grant_option: bool,
}

impl PrivilegeClause {
    fn revoke_all(grantee: String) -> Self {
        Self {
            verb: Verb::Revoke,
            privileges: PrivilegeSet::All,
            grantee,
            with_grant_option: false,
        }
    }

    fn grant(privileges: PrivilegeSet, grantee: String, with_grant_option: bool) -> Self {
        Self {
            verb: Verb::Grant,
            privileges,
            grantee,
            with_grant_option,
        }
    }

    /// Render against an object, e.g. `GRANT ALL ON DATABASE testdb TO testrole;`
    pub fn to_sql(&self, keyword: &str, object_name: &str) -> String {
        let privileges = self.privileges.to_sql();
        match self.verb {
            Verb::Revoke => format!(
                "REVOKE {} ON {} {} FROM {};",
                privileges, keyword, object_name, self.grantee
            ),
            Verb::Grant => {
                let grant_option = if self.with_grant_option {
                    " WITH GRANT OPTION"
                } else {
                    ""
                };
                format!(
                    "GRANT {} ON {} {} TO {}{};",
                    privileges, keyword, object_name, self.grantee, grant_option
                )
            }
        }
    }
}

/// Result of comparing an object's ACL with the kind's implicit defaults
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrivilegeDiff {
    /// Emit `REVOKE ALL ... FROM PUBLIC;` before every other clause
    pub revoke_public: bool,
    pub clauses: Vec<PrivilegeClause>,
}

impl PrivilegeDiff {
    pub fn is_empty(&self) -> bool {
        !self.revoke_public && self.clauses.is_empty()
    }

    /// Render every clause, PUBLIC revoke first
    pub fn to_statements(&self, keyword: &str, object_name: &str) -> Vec<String> {
        let mut statements = Vec::with_capacity(self.clauses.len() + 1);
        if self.revoke_public {
            statements.push(
                PrivilegeClause::revoke_all("PUBLIC".to_string()).to_sql(keyword, object_name),
            );
        }
        for clause in &self.clauses {
            statements.push(clause.to_sql(keyword, object_name));
        }
        statements
    }
}

fn render_grantee(acl: &Acl) -> String {
    if acl.is_public() {
        "PUBLIC".to_string()
    } else {
        quote_ident(&acl.grantee)
    }
}

/// Compute the grant clauses for a single ACL entry.
///
/// A permission held both plain and with grant option is granted once,
/// with the option.
pub fn grant_clauses(table: &PrivilegeTable, acl: &Acl) -> Vec<PrivilegeClause> {
    let grantee = render_grantee(acl);
    let plain: Vec<&'static str> = table
        .privileges
        .iter()
        .filter(|p| p.held(acl) && !p.held_with_grant(acl))
        .map(|p| p.label())
        .collect();
    let grantable: Vec<&'static str> = table
        .privileges
        .iter()
        .filter(|p| p.held_with_grant(acl))
        .map(|p| p.label())
        .collect();

    let full = table.privileges.len();
    if plain.len() == full {
        return vec![PrivilegeClause::grant(PrivilegeSet::All, grantee, false)];
    }
    if grantable.len() == full {
        return vec![PrivilegeClause::grant(PrivilegeSet::All, grantee, true)];
    }

    let mut clauses = Vec::new();
    if !plain.is_empty() {
        clauses.push(PrivilegeClause::grant(
            PrivilegeSet::Some(plain),
            grantee.clone(),
            false,
        ));
    }
    if !grantable.is_empty() {
        clauses.push(PrivilegeClause::grant(
            PrivilegeSet::Some(grantable),
            grantee,
            true,
        ));
    }
    clauses
}

/// Diff an object's metadata against the kind's implicit privileges.
///
/// Nothing is emitted when the ACL is empty. Otherwise PUBLIC loses its
/// implicit privileges (for kinds that hand any out), the owner is reset
/// with `REVOKE ALL`, and each entry is granted back in list order.
pub fn diff(table: &PrivilegeTable, metadata: &ObjectMetadata) -> PrivilegeDiff {
    if metadata.privileges.is_empty() {
        return PrivilegeDiff::default();
    }

    let mut clauses = Vec::new();
    if let Some(owner) = &metadata.owner {
        clauses.push(PrivilegeClause::revoke_all(quote_ident(owner)));
    }
    for acl in &metadata.privileges {
        clauses.extend(grant_clauses(table, acl));
    }

    PrivilegeDiff {
        revoke_public: table.revoke_public,
        clauses,
    }
}
