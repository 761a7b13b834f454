//! GlobalsWriter - renders ordered object lists into an output sink
//!
//! Every `write_*` call renders its whole section in memory first, so a
//! precondition failure leaves the sink untouched for that call.

use std::io::Write;

use tracing::{debug, info};

use crate::config::RenderConfig;
use crate::error::{GlobalsError, Result};
use crate::sql::block::{BlockSet, join_objects};
use crate::sql::ddl::{DdlGenerator, GlobalObject};
use crate::types::{Database, MetadataMap, RoleMember, SessionGucs};

/// Writes global-object DDL to any `std::io::Write` destination
pub struct GlobalsWriter<W: Write> {
    sink: W,
    config: RenderConfig,
}

impl<W: Write> GlobalsWriter<W> {
    /// Create a writer with the given configuration
    pub fn new(sink: W, config: RenderConfig) -> Self {
        Self { sink, config }
    }

    /// Create a writer with the default catalog configuration
    pub fn with_defaults(sink: W) -> Self {
        Self::new(sink, RenderConfig::default())
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Consume the writer and hand back the sink
    pub fn into_inner(self) -> W {
        self.sink
    }

    fn generator(&self) -> DdlGenerator<'_> {
        DdlGenerator::new(&self.config)
    }

    /// Write already-rendered text as is
    pub(crate) fn write_raw(&mut self, text: &str) -> Result<()> {
        self.sink.write_all(text.as_bytes())?;
        Ok(())
    }

    // ==================== Rendering ====================

    /// Render every object in input order, one blank line between objects
    pub fn render_objects<T: GlobalObject>(
        &self,
        objects: &[T],
        metadata: &MetadataMap,
    ) -> Result<String> {
        let generator = self.generator();
        let mut rendered = Vec::with_capacity(objects.len());
        for object in objects {
            let blocks = generator.generate_blocks(object, metadata)?;
            debug!(
                kind = %object.kind(),
                oid = object.oid(),
                name = object.name(),
                "Rendered object"
            );
            rendered.push(blocks.assemble());
        }
        Ok(join_objects(rendered))
    }

    /// Render the target database in full, optionally followed by the
    /// privilege blocks of every other database that carries an ACL
    pub fn render_create_database(
        &self,
        target: &str,
        databases: &[Database],
        metadata: &MetadataMap,
        include_other_privileges: bool,
    ) -> Result<String> {
        let generator = self.generator();
        let db = databases
            .iter()
            .find(|db| db.name == target)
            .ok_or_else(|| GlobalsError::object_not_found(format!("database '{}'", target)))?;

        let mut rendered = vec![generator.generate_blocks(db, metadata)?.assemble()];

        if include_other_privileges {
            for other in databases.iter().filter(|other| other.name != target) {
                let Some(meta) = metadata.get(&other.oid) else {
                    continue;
                };
                let privileges = generator
                    .generate_metadata_blocks(other, Some(meta))?
                    .privileges;
                if !privileges.is_empty() {
                    debug!(oid = other.oid, name = %other.name, "Rendered database privileges");
                    rendered.push(BlockSet::privileges_only(privileges).assemble());
                }
            }
        }

        Ok(join_objects(rendered))
    }

    pub fn render_database_gucs(&self, db_name: &str, gucs: &[String]) -> String {
        join_lines(self.generator().generate_database_gucs(db_name, gucs))
    }

    pub fn render_session_gucs(&self, gucs: &SessionGucs) -> String {
        join_lines(self.generator().generate_session_gucs(gucs))
    }

    /// Render one GRANT per membership, no blank lines between them
    pub fn render_role_memberships(&self, members: &[RoleMember]) -> Result<String> {
        let generator = self.generator();
        let statements = members
            .iter()
            .map(|m| generator.generate_role_membership(m))
            .collect::<Result<Vec<_>>>()?;
        Ok(join_lines(statements))
    }

    // ==================== Writing ====================

    pub fn write_objects<T: GlobalObject>(
        &mut self,
        objects: &[T],
        metadata: &MetadataMap,
    ) -> Result<()> {
        if let Some(first) = objects.first() {
            info!("Writing {} {} statement set(s)", objects.len(), first.kind());
        }
        let text = self.render_objects(objects, metadata)?;
        self.write_raw(&text)
    }

    pub fn write_create_database(
        &mut self,
        target: &str,
        databases: &[Database],
        metadata: &MetadataMap,
        include_other_privileges: bool,
    ) -> Result<()> {
        info!("Writing CREATE DATABASE statement for {}", target);
        let text =
            self.render_create_database(target, databases, metadata, include_other_privileges)?;
        self.write_raw(&text)
    }

    pub fn write_database_gucs(&mut self, db_name: &str, gucs: &[String]) -> Result<()> {
        let text = self.render_database_gucs(db_name, gucs);
        self.write_raw(&text)
    }

    pub fn write_session_gucs(&mut self, gucs: &SessionGucs) -> Result<()> {
        let text = self.render_session_gucs(gucs);
        self.write_raw(&text)
    }

    pub fn write_role_memberships(&mut self, members: &[RoleMember]) -> Result<()> {
        info!("Writing {} role membership(s)", members.len());
        let text = self.render_role_memberships(members)?;
        self.write_raw(&text)
    }

    /// Write a blank line, used between sections
    pub fn write_separator(&mut self) -> Result<()> {
        self.write_raw("\n")
    }

    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }
}

fn join_lines(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}
