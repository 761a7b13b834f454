//! End-to-end rendering tests for pg-globals-ddl
//!
//! Each test renders through `GlobalsWriter` into an in-memory buffer and
//! compares the complete output text.

use pg_globals_ddl::{
    Acl, CatalogObject, Database, GlobalsError, GlobalsSnapshot, GlobalsWriter, MetadataMap,
    ObjectKind, ObjectMetadata, ResourceQueue, Role, RoleMember, SessionGucs, Tablespace,
    TimeConstraint,
};

/// Metadata for OID 1 with the usual test owner, comment and full ACL
fn default_metadata_map(
    kind: ObjectKind,
    privileges: bool,
    owner: bool,
    comment: bool,
) -> MetadataMap {
    let mut metadata = ObjectMetadata::new();
    if privileges {
        metadata = metadata.privilege(Acl {
            create: true,
            connect: kind == ObjectKind::Database,
            temporary: kind == ObjectKind::Database,
            ..Acl::new("testrole")
        });
    }
    if owner {
        metadata = metadata.owner("testrole");
    }
    if comment {
        metadata = metadata.comment(format!(
            "This is a {} comment.",
            kind.keyword().to_lowercase()
        ));
    }
    MetadataMap::from([(1, metadata)])
}

fn new_writer() -> GlobalsWriter<Vec<u8>> {
    GlobalsWriter::with_defaults(Vec::new())
}

fn output(writer: GlobalsWriter<Vec<u8>>) -> String {
    String::from_utf8(writer.into_inner()).unwrap()
}

fn testrole1() -> Role {
    Role::new(1, "testrole1", "pg_default")
}

fn testrole2() -> Role {
    Role::new(1, "testRole2", "testQueue")
        .superuser()
        .inherit()
        .create_role()
        .create_db()
        .login()
        .connection_limit(4)
        .password("md5a8b2c77dfeba4705f29c094592eb3369")
        .valid_until("2099-01-01 00:00:00-08")
        .all_external_tables()
        .time_constraint(TimeConstraint::new(0, "13:30:00", 3, "14:30:00"))
        .time_constraint(TimeConstraint::new(5, "00:00:00", 5, "24:00:00"))
}

const TESTROLE2_SQL: &str = "CREATE ROLE \"testRole2\";
ALTER ROLE \"testRole2\" WITH SUPERUSER INHERIT CREATEROLE CREATEDB LOGIN CONNECTION LIMIT 4 PASSWORD 'md5a8b2c77dfeba4705f29c094592eb3369' VALID UNTIL '2099-01-01 00:00:00-08' RESOURCE QUEUE \"testQueue\" CREATEEXTTABLE (protocol='http') CREATEEXTTABLE (protocol='gpfdist', type='readable') CREATEEXTTABLE (protocol='gpfdist', type='writable') CREATEEXTTABLE (protocol='gphdfs', type='readable') CREATEEXTTABLE (protocol='gphdfs', type='writable');
ALTER ROLE \"testRole2\" DENY BETWEEN DAY 0 TIME '13:30:00' AND DAY 3 TIME '14:30:00';
ALTER ROLE \"testRole2\" DENY BETWEEN DAY 5 TIME '00:00:00' AND DAY 5 TIME '24:00:00';";

// ==================== Session GUC Tests ====================

#[test]
fn test_session_gucs() {
    let mut writer = new_writer();
    writer
        .write_session_gucs(&SessionGucs {
            client_encoding: "UTF8".to_string(),
            standard_conforming_strings: "on".to_string(),
            default_with_oids: "false".to_string(),
        })
        .unwrap();

    assert_eq!(
        output(writer),
        "SET statement_timeout = 0;
SET check_function_bodies = false;
SET client_min_messages = error;
SET client_encoding = 'UTF8';
SET standard_conforming_strings = on;
SET default_with_oids = false;
"
    );
}

// ==================== Database Tests ====================

#[test]
fn test_create_database_basic() {
    let mut writer = new_writer();
    let dbs = vec![Database::new(1, "testdb", "pg_default")];
    writer
        .write_create_database("testdb", &dbs, &MetadataMap::new(), false)
        .unwrap();

    assert_eq!(output(writer), "CREATE DATABASE testdb;\n");
}

#[test]
fn test_create_database_with_privileges_owner_and_comment() {
    let mut writer = new_writer();
    let dbs = vec![
        Database::new(1, "testdb", "pg_default"),
        Database::new(2, "otherdb", "pg_default"),
    ];
    let metadata = default_metadata_map(ObjectKind::Database, true, true, true);
    writer
        .write_create_database("testdb", &dbs, &metadata, false)
        .unwrap();

    assert_eq!(
        output(writer),
        "CREATE DATABASE testdb;

COMMENT ON DATABASE testdb IS 'This is a database comment.';

ALTER DATABASE testdb OWNER TO testrole;

REVOKE ALL ON DATABASE testdb FROM PUBLIC;
REVOKE ALL ON DATABASE testdb FROM testrole;
GRANT ALL ON DATABASE testdb TO testrole;
"
    );
}

#[test]
fn test_create_database_with_privileges_for_other_database() {
    let mut writer = new_writer();
    let dbs = vec![
        Database::new(1, "testdb", "pg_default"),
        Database::new(2, "otherdb", "pg_default"),
    ];
    let mut metadata = default_metadata_map(ObjectKind::Database, true, true, true);
    metadata.insert(
        2,
        ObjectMetadata::new().privilege(Acl {
            create: true,
            ..Acl::new("testrole")
        }),
    );
    writer
        .write_create_database("testdb", &dbs, &metadata, true)
        .unwrap();

    assert_eq!(
        output(writer),
        "CREATE DATABASE testdb;

COMMENT ON DATABASE testdb IS 'This is a database comment.';

ALTER DATABASE testdb OWNER TO testrole;

REVOKE ALL ON DATABASE testdb FROM PUBLIC;
REVOKE ALL ON DATABASE testdb FROM testrole;
GRANT ALL ON DATABASE testdb TO testrole;

REVOKE ALL ON DATABASE otherdb FROM PUBLIC;
GRANT CREATE ON DATABASE otherdb TO testrole;
"
    );
}

#[test]
fn test_create_database_with_tablespace() {
    let mut writer = new_writer();
    let dbs = vec![Database::new(1, "testdb", "test_tablespace")];
    writer
        .write_create_database("testdb", &dbs, &MetadataMap::new(), false)
        .unwrap();

    assert_eq!(
        output(writer),
        "CREATE DATABASE testdb TABLESPACE test_tablespace;\n"
    );
}

#[test]
fn test_create_database_named_like_a_keyword() {
    let mut writer = new_writer();
    let dbs = vec![Database::new(1, "join", "pg_default")];
    writer
        .write_create_database("join", &dbs, &MetadataMap::new(), false)
        .unwrap();

    assert_eq!(output(writer), "CREATE DATABASE \"join\";\n");
}

#[test]
fn test_write_every_database() {
    let mut writer = new_writer();
    let dbs = vec![
        Database::new(1, "testdb", "pg_default"),
        Database::new(2, "otherdb", "pg_default"),
    ];
    let mut metadata = MetadataMap::new();
    metadata.insert(
        2,
        ObjectMetadata::new().privilege(Acl {
            create: true,
            ..Acl::new("testrole")
        }),
    );
    writer.write_objects(&dbs, &metadata).unwrap();

    assert_eq!(
        output(writer),
        "CREATE DATABASE testdb;

CREATE DATABASE otherdb;

REVOKE ALL ON DATABASE otherdb FROM PUBLIC;
GRANT CREATE ON DATABASE otherdb TO testrole;
"
    );
}

#[test]
fn test_database_gucs() {
    let mut writer = new_writer();
    let gucs = vec![
        "SET default_with_oids TO 'true'".to_string(),
        "SET search_path TO 'pg_catalog, public'".to_string(),
        "SET gp_default_storage_options TO 'appendonly=true,blocksize=32768'".to_string(),
    ];
    writer.write_database_gucs("testdb", &gucs).unwrap();

    assert_eq!(
        output(writer),
        "ALTER DATABASE testdb SET default_with_oids TO 'true';
ALTER DATABASE testdb SET search_path TO 'pg_catalog, public';
ALTER DATABASE testdb SET gp_default_storage_options TO 'appendonly=true,blocksize=32768';
"
    );
}

// ==================== Resource Queue Tests ====================

#[test]
fn test_resource_queues() {
    let mut writer = new_writer();
    let queues = vec![
        ResourceQueue::new(1, "some_queue").active_statements(1),
        ResourceQueue::new(1, "someMaxCostQueue")
            .max_cost("99.9")
            .cost_overcommit(true),
    ];
    writer.write_objects(&queues, &MetadataMap::new()).unwrap();

    assert_eq!(
        output(writer),
        "CREATE RESOURCE QUEUE some_queue WITH (ACTIVE_STATEMENTS=1);

CREATE RESOURCE QUEUE \"someMaxCostQueue\" WITH (MAX_COST=99.9, COST_OVERCOMMIT=TRUE);
"
    );
}

#[test]
fn test_resource_queue_active_statements_and_max_cost() {
    let mut writer = new_writer();
    let queues = vec![
        ResourceQueue::new(1, "someActiveMaxCostQueue")
            .active_statements(5)
            .max_cost("62.03"),
    ];
    writer.write_objects(&queues, &MetadataMap::new()).unwrap();

    assert_eq!(
        output(writer),
        "CREATE RESOURCE QUEUE \"someActiveMaxCostQueue\" WITH (ACTIVE_STATEMENTS=5, MAX_COST=62.03);\n"
    );
}

#[test]
fn test_resource_queue_everything() {
    let mut writer = new_writer();
    let queues = vec![
        ResourceQueue::new(1, "everythingQueue")
            .active_statements(7)
            .max_cost("32.80")
            .cost_overcommit(true)
            .min_cost("1.34")
            .priority("low")
            .memory_limit("2GB"),
    ];
    writer.write_objects(&queues, &MetadataMap::new()).unwrap();

    assert_eq!(
        output(writer),
        "CREATE RESOURCE QUEUE \"everythingQueue\" WITH (ACTIVE_STATEMENTS=7, MAX_COST=32.80, COST_OVERCOMMIT=TRUE, MIN_COST=1.34, PRIORITY=LOW, MEMORY_LIMIT='2GB');\n"
    );
}

#[test]
fn test_resource_queue_with_comment() {
    let mut writer = new_writer();
    let queues = vec![ResourceQueue::new(1, "commentQueue").active_statements(1)];
    let metadata = default_metadata_map(ObjectKind::ResourceQueue, false, false, true);
    writer.write_objects(&queues, &metadata).unwrap();

    assert_eq!(
        output(writer),
        "CREATE RESOURCE QUEUE \"commentQueue\" WITH (ACTIVE_STATEMENTS=1);

COMMENT ON RESOURCE QUEUE \"commentQueue\" IS 'This is a resource queue comment.';
"
    );
}

#[test]
fn test_default_resource_queue_is_altered() {
    let mut writer = new_writer();
    let queues = vec![ResourceQueue::new(1, "pg_default").active_statements(1)];
    writer.write_objects(&queues, &MetadataMap::new()).unwrap();

    assert_eq!(
        output(writer),
        "ALTER RESOURCE QUEUE pg_default WITH (ACTIVE_STATEMENTS=1);\n"
    );
}

#[test]
fn test_resource_queue_with_nothing_set_keeps_active_statements() {
    let mut writer = new_writer();
    let queues = vec![ResourceQueue::new(1, "idle_queue")];
    writer.write_objects(&queues, &MetadataMap::new()).unwrap();

    assert_eq!(
        output(writer),
        "CREATE RESOURCE QUEUE idle_queue WITH (ACTIVE_STATEMENTS=-1);\n"
    );
}

// ==================== Role Tests ====================

#[test]
fn test_basic_role() {
    let mut writer = new_writer();
    let metadata = default_metadata_map(ObjectKind::Role, false, false, true);
    writer.write_objects(&[testrole1()], &metadata).unwrap();

    assert_eq!(
        output(writer),
        "CREATE ROLE testrole1;
ALTER ROLE testrole1 WITH NOSUPERUSER NOINHERIT NOCREATEROLE NOCREATEDB NOLOGIN RESOURCE QUEUE pg_default;

COMMENT ON ROLE testrole1 IS 'This is a role comment.';
"
    );
}

#[test]
fn test_role_with_non_defaults() {
    let mut writer = new_writer();
    let metadata = default_metadata_map(ObjectKind::Role, false, false, true);
    writer.write_objects(&[testrole2()], &metadata).unwrap();

    assert_eq!(
        output(writer),
        format!(
            "{}\n\nCOMMENT ON ROLE \"testRole2\" IS 'This is a role comment.';\n",
            TESTROLE2_SQL
        )
    );
}

#[test]
fn test_multiple_roles() {
    let mut writer = new_writer();
    writer
        .write_objects(&[testrole1(), testrole2()], &MetadataMap::new())
        .unwrap();

    assert_eq!(
        output(writer),
        format!(
            "CREATE ROLE testrole1;
ALTER ROLE testrole1 WITH NOSUPERUSER NOINHERIT NOCREATEROLE NOCREATEDB NOLOGIN RESOURCE QUEUE pg_default;

{}
",
            TESTROLE2_SQL
        )
    );
}

#[test]
fn test_role_deny_statement_count_matches_constraints() {
    let mut writer = new_writer();
    writer
        .write_objects(&[testrole2()], &MetadataMap::new())
        .unwrap();

    let text = output(writer);
    assert_eq!(text.matches("DENY BETWEEN").count(), 2);
    let first = text.find("DAY 0 TIME").unwrap();
    let second = text.find("DAY 5 TIME").unwrap();
    assert!(first < second);
}

// ==================== Role Membership Tests ====================

#[test]
fn test_role_membership_without_admin_option() {
    let mut writer = new_writer();
    writer
        .write_role_memberships(&[RoleMember::new("admins", "rolewithout", "grantor", false)])
        .unwrap();

    assert_eq!(
        output(writer),
        "GRANT admins TO rolewithout GRANTED BY grantor;\n"
    );
}

#[test]
fn test_role_membership_with_admin_option() {
    let mut writer = new_writer();
    writer
        .write_role_memberships(&[RoleMember::new("admins", "rolewith", "grantor", true)])
        .unwrap();

    assert_eq!(
        output(writer),
        "GRANT admins TO rolewith WITH ADMIN OPTION GRANTED BY grantor;\n"
    );
}

#[test]
fn test_multiple_role_memberships() {
    let mut writer = new_writer();
    writer
        .write_role_memberships(&[
            RoleMember::new("group", "rolewith", "grantor", true),
            RoleMember::new("group", "rolewithout", "grantor", false),
        ])
        .unwrap();

    assert_eq!(
        output(writer),
        "GRANT \"group\" TO rolewith WITH ADMIN OPTION GRANTED BY grantor;
GRANT \"group\" TO rolewithout GRANTED BY grantor;
"
    );
}

// ==================== Tablespace Tests ====================

#[test]
fn test_basic_tablespace() {
    let mut writer = new_writer();
    writer
        .write_objects(
            &[Tablespace::new(1, "test_tablespace", "test_filespace")],
            &MetadataMap::new(),
        )
        .unwrap();

    assert_eq!(
        output(writer),
        "CREATE TABLESPACE test_tablespace FILESPACE test_filespace;\n"
    );
}

#[test]
fn test_tablespace_with_privileges_owner_and_comment() {
    let mut writer = new_writer();
    let metadata = default_metadata_map(ObjectKind::Tablespace, true, true, true);
    writer
        .write_objects(
            &[Tablespace::new(1, "test_tablespace", "test_filespace")],
            &metadata,
        )
        .unwrap();

    assert_eq!(
        output(writer),
        "CREATE TABLESPACE test_tablespace FILESPACE test_filespace;

COMMENT ON TABLESPACE test_tablespace IS 'This is a tablespace comment.';

ALTER TABLESPACE test_tablespace OWNER TO testrole;

REVOKE ALL ON TABLESPACE test_tablespace FROM PUBLIC;
REVOKE ALL ON TABLESPACE test_tablespace FROM testrole;
GRANT ALL ON TABLESPACE test_tablespace TO testrole;
"
    );
}

#[test]
fn test_tablespace_grant_option_is_kept() {
    let mut writer = new_writer();
    let mut metadata = MetadataMap::new();
    metadata.insert(
        1,
        ObjectMetadata::new().owner("o").privilege(Acl {
            create: true,
            create_with_grant: true,
            ..Acl::new("r")
        }),
    );
    writer
        .write_objects(&[Tablespace::new(1, "ts", "fs")], &metadata)
        .unwrap();

    assert_eq!(
        output(writer),
        "CREATE TABLESPACE ts FILESPACE fs;

ALTER TABLESPACE ts OWNER TO o;

REVOKE ALL ON TABLESPACE ts FROM PUBLIC;
REVOKE ALL ON TABLESPACE ts FROM o;
GRANT ALL ON TABLESPACE ts TO r WITH GRANT OPTION;
"
    );
}

#[test]
fn test_tablespace_acl_with_database_privileges_is_rejected() {
    let mut writer = new_writer();
    let mut metadata = MetadataMap::new();
    metadata.insert(
        1,
        ObjectMetadata::new().owner("o").privilege(Acl {
            connect: true,
            temporary: true,
            ..Acl::new("r")
        }),
    );
    let err = writer
        .write_objects(&[Tablespace::new(1, "ts", "fs")], &metadata)
        .unwrap_err();

    match err {
        GlobalsError::Precondition {
            kind, oid, field, ..
        } => {
            assert_eq!(kind, ObjectKind::Tablespace);
            assert_eq!(oid, 1);
            assert_eq!(field, "privileges");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(output(writer), "");
}

// ==================== Mixed and Failure Tests ====================

#[test]
fn test_catalog_objects_of_mixed_kinds() {
    let mut writer = new_writer();
    let objects = vec![
        CatalogObject::ResourceQueue(ResourceQueue::new(10, "etl").active_statements(3)),
        CatalogObject::Role(Role::new(11, "loader", "etl").login()),
    ];
    writer.write_objects(&objects, &MetadataMap::new()).unwrap();

    assert_eq!(
        output(writer),
        "CREATE RESOURCE QUEUE etl WITH (ACTIVE_STATEMENTS=3);

CREATE ROLE loader;
ALTER ROLE loader WITH NOSUPERUSER NOINHERIT NOCREATEROLE NOCREATEDB LOGIN RESOURCE QUEUE etl;
"
    );
}

#[test]
fn test_bad_record_aborts_whole_render() {
    let mut writer = new_writer();
    let queues = vec![
        ResourceQueue::new(1, "good").active_statements(1),
        ResourceQueue::new(2, "bad").priority("whenever"),
    ];
    let err = writer.write_objects(&queues, &MetadataMap::new()).unwrap_err();

    match err {
        GlobalsError::Precondition {
            kind, oid, field, ..
        } => {
            assert_eq!(kind, ObjectKind::ResourceQueue);
            assert_eq!(oid, 2);
            assert_eq!(field, "priority");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(output(writer), "");
}

#[test]
fn test_snapshot_script() {
    let json = r#"{
        "session_gucs": {"client_encoding": "UTF8", "standard_conforming_strings": "on", "default_with_oids": "false"},
        "target_database": "testdb",
        "databases": [{"oid": 1, "name": "testdb", "tablespace": "pg_default"}],
        "database_gucs": ["SET search_path TO 'public'"],
        "resource_queues": [{"oid": 5, "name": "pg_default", "active_statements": 20, "max_cost": "-1.00",
                             "cost_overcommit": false, "min_cost": "0.00", "priority": "medium", "memory_limit": "-1"}],
        "roles": [{"oid": 6, "name": "testrole1", "superuser": false, "inherit": false, "create_role": false,
                   "create_db": false, "can_login": false, "connection_limit": -1, "password": "",
                   "valid_until": "", "resource_queue": "pg_default", "create_readable_http": false,
                   "create_readable_gpfdist": false, "create_writable_gpfdist": false,
                   "create_readable_gphdfs": false, "create_writable_gphdfs": false}],
        "role_members": [{"role": "admins", "member": "testrole1", "grantor": "postgres"}],
        "tablespaces": [{"oid": 7, "name": "test_tablespace", "filespace": "test_filespace"}],
        "role_metadata": {"6": {"comment": "This is a role comment."}}
    }"#;
    let snapshot = GlobalsSnapshot::from_json(json).unwrap();
    let mut writer = new_writer();
    snapshot.write_to(&mut writer).unwrap();

    assert_eq!(
        output(writer),
        "SET statement_timeout = 0;
SET check_function_bodies = false;
SET client_min_messages = error;
SET client_encoding = 'UTF8';
SET standard_conforming_strings = on;
SET default_with_oids = false;

CREATE DATABASE testdb;

ALTER DATABASE testdb SET search_path TO 'public';

ALTER RESOURCE QUEUE pg_default WITH (ACTIVE_STATEMENTS=20);

CREATE ROLE testrole1;
ALTER ROLE testrole1 WITH NOSUPERUSER NOINHERIT NOCREATEROLE NOCREATEDB NOLOGIN RESOURCE QUEUE pg_default;

COMMENT ON ROLE testrole1 IS 'This is a role comment.';

GRANT admins TO testrole1 GRANTED BY postgres;

CREATE TABLESPACE test_tablespace FILESPACE test_filespace;
"
    );
}
