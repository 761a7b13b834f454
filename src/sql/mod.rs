//! SQL utilities for global object rendering
//!
//! Provides identifier quoting, privilege diffing, statement generation and
//! block assembly.

pub mod block;
pub mod ddl;
pub mod privileges;
pub mod sanitize;

pub use block::{BlockSet, join_objects};
pub use ddl::{DdlGenerator, GlobalObject};
pub use privileges::{PrivilegeDiff, PrivilegeTable, diff, privilege_table};
pub use sanitize::{POSTGRES_RESERVED_WORDS, escape_literal, quote_ident, quote_literal};
