//! Bundle of every global object handed over by the extraction step
//!
//! A snapshot can be built in code or parsed from JSON, and written out as
//! one script in restore order.

use std::io::Write;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::types::{Database, MetadataMap, ResourceQueue, Role, RoleMember, SessionGucs, Tablespace};
use crate::writer::GlobalsWriter;

/// All global objects of one cluster together with their metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalsSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_gucs: Option<SessionGucs>,
    /// Database being backed up; no database section is written when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_database: Option<String>,
    /// Also write the ACLs of databases other than the target
    pub include_other_database_privileges: bool,
    pub databases: Vec<Database>,
    pub database_gucs: Vec<String>,
    pub resource_queues: Vec<ResourceQueue>,
    pub roles: Vec<Role>,
    pub role_members: Vec<RoleMember>,
    pub tablespaces: Vec<Tablespace>,
    pub database_metadata: MetadataMap,
    pub resource_queue_metadata: MetadataMap,
    pub role_metadata: MetadataMap,
    pub tablespace_metadata: MetadataMap,
}

impl GlobalsSnapshot {
    /// Parse a snapshot from its JSON form
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Render the whole snapshot as text.
    ///
    /// Sections follow restore order: session settings, target database,
    /// database settings, resource queues, roles, role memberships,
    /// tablespaces. Empty sections are skipped; the rest are separated by
    /// one blank line.
    pub fn render<W: Write>(&self, writer: &GlobalsWriter<W>) -> Result<String> {
        let mut sections = Vec::new();

        if let Some(gucs) = &self.session_gucs {
            sections.push(writer.render_session_gucs(gucs));
        }
        if let Some(target) = &self.target_database {
            sections.push(writer.render_create_database(
                target,
                &self.databases,
                &self.database_metadata,
                self.include_other_database_privileges,
            )?);
            sections.push(writer.render_database_gucs(target, &self.database_gucs));
        }
        sections.push(writer.render_objects(&self.resource_queues, &self.resource_queue_metadata)?);
        sections.push(writer.render_objects(&self.roles, &self.role_metadata)?);
        sections.push(writer.render_role_memberships(&self.role_members)?);
        sections.push(writer.render_objects(&self.tablespaces, &self.tablespace_metadata)?);

        Ok(sections
            .into_iter()
            .filter(|section| !section.is_empty())
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// Render the snapshot and write it in one piece
    pub fn write_to<W: Write>(&self, writer: &mut GlobalsWriter<W>) -> Result<()> {
        info!(
            "Writing globals: {} queue(s), {} role(s), {} membership(s), {} tablespace(s)",
            self.resource_queues.len(),
            self.roles.len(),
            self.role_members.len(),
            self.tablespaces.len()
        );
        let text = self.render(writer)?;
        writer.write_raw(&text)
    }
}
