//! Statement classification and lifecycle phases.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlparser::ast::Statement;

/// Coarse lifecycle buckets used as tie-breakers in the final sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Bootstrap,
    PreData,
    DataStructures,
    Routines,
    PostData,
    Privileges,
}

impl Phase {
    pub fn parse(s: &str) -> Option<Phase> {
        match s {
            "bootstrap" => Some(Phase::Bootstrap),
            "pre_data" => Some(Phase::PreData),
            "data_structures" => Some(Phase::DataStructures),
            "routines" => Some(Phase::Routines),
            "post_data" => Some(Phase::PostData),
            "privileges" => Some(Phase::Privileges),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatementClass {
    CreateSchema,
    CreateRole,
    AlterRole,
    CreateExtension,
    CreateCollation,
    CreateType,
    CreateDomain,
    AlterDomain,
    CreateSequence,
    AlterSequence,
    CreateTable,
    AlterTable,
    CreateIndex,
    CreateView,
    CreateMaterializedView,
    CreateFunction,
    CreateProcedure,
    CreateAggregate,
    CreateTrigger,
    CreateEventTrigger,
    CreatePolicy,
    CreatePublication,
    CreateSubscription,
    AlterType,
    AlterDefaultPrivileges,
    Grant,
    Revoke,
    CommentOn,
    DropObject,
    Insert,
    Update,
    Delete,
    Select,
    Do,
    Transaction,
    SetParameter,
    Unknown,
}

impl StatementClass {
    /// The phase bucket this class lands in unless an annotation overrides.
    pub fn phase(self) -> Phase {
        match self {
            StatementClass::CreateSchema
            | StatementClass::CreateRole
            | StatementClass::AlterRole
            | StatementClass::Transaction
            | StatementClass::SetParameter => Phase::Bootstrap,
            StatementClass::CreateExtension
            | StatementClass::CreateCollation
            | StatementClass::CreateType
            | StatementClass::CreateDomain
            | StatementClass::AlterDomain
            | StatementClass::AlterType
            | StatementClass::CreateSequence
            | StatementClass::AlterSequence => Phase::PreData,
            StatementClass::CreateTable
            | StatementClass::AlterTable
            | StatementClass::CreateView
            | StatementClass::CreateMaterializedView
            | StatementClass::DropObject
            | StatementClass::Unknown => Phase::DataStructures,
            StatementClass::CreateFunction
            | StatementClass::CreateProcedure
            | StatementClass::CreateAggregate => Phase::Routines,
            StatementClass::CreateIndex
            | StatementClass::CreateTrigger
            | StatementClass::CreateEventTrigger
            | StatementClass::CreatePolicy
            | StatementClass::CreatePublication
            | StatementClass::CreateSubscription
            | StatementClass::CommentOn
            | StatementClass::Insert
            | StatementClass::Update
            | StatementClass::Delete
            | StatementClass::Select
            | StatementClass::Do => Phase::PostData,
            StatementClass::Grant
            | StatementClass::Revoke
            | StatementClass::AlterDefaultPrivileges => Phase::Privileges,
        }
    }
}

/// Classify a parsed statement. Polymorphic AST nodes are narrowed here:
/// `CreateView` splits on `materialized`, aggregates and collations arrive
/// as DEFINE-style statements the text check resolves.
pub fn classify(statement: &Statement, sql: &str) -> StatementClass {
    match statement {
        Statement::CreateSchema { .. } => StatementClass::CreateSchema,
        Statement::CreateRole { .. } => StatementClass::CreateRole,
        Statement::AlterRole { .. } => StatementClass::AlterRole,
        Statement::CreateExtension { .. } => StatementClass::CreateExtension,
        Statement::CreateType { .. } => StatementClass::CreateType,
        Statement::CreateDomain { .. } => StatementClass::CreateDomain,
        Statement::CreateSequence { .. } => StatementClass::CreateSequence,
        Statement::CreateTable { .. } => StatementClass::CreateTable,
        Statement::CreateIndex { .. } => StatementClass::CreateIndex,
        Statement::CreateView { materialized, .. } => {
            if *materialized {
                StatementClass::CreateMaterializedView
            } else {
                StatementClass::CreateView
            }
        }
        Statement::CreateFunction { .. } => {
            // CREATE AGGREGATE and CREATE PROCEDURE share parser plumbing
            // with functions in several grammars; the keyword decides.
            if leading_keywords(sql).contains("AGGREGATE") {
                StatementClass::CreateAggregate
            } else if leading_keywords(sql).contains("PROCEDURE") {
                StatementClass::CreateProcedure
            } else {
                StatementClass::CreateFunction
            }
        }
        Statement::CreateTrigger { .. } => StatementClass::CreateTrigger,
        Statement::CreatePolicy { .. } => StatementClass::CreatePolicy,
        Statement::AlterTable { .. } => StatementClass::AlterTable,
        Statement::Grant { .. } => StatementClass::Grant,
        Statement::Revoke { .. } => StatementClass::Revoke,
        Statement::Comment { .. } => StatementClass::CommentOn,
        Statement::Drop { .. }
        | Statement::DropFunction { .. }
        | Statement::DropDomain { .. }
        | Statement::DropTrigger { .. }
        | Statement::DropPolicy { .. }
        | Statement::DropExtension { .. } => StatementClass::DropObject,
        Statement::Insert { .. } => StatementClass::Insert,
        Statement::Update { .. } => StatementClass::Update,
        Statement::Delete { .. } => StatementClass::Delete,
        Statement::Query(_) => StatementClass::Select,
        Statement::StartTransaction { .. }
        | Statement::Commit { .. }
        | Statement::Rollback { .. } => StatementClass::Transaction,
        _ => classify_fallback(sql),
    }
}

static LEADING_WORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)^\s*([a-z_]+(?:\s+[a-z_]+){0,3})").unwrap());

fn leading_keywords(sql: &str) -> String {
    LEADING_WORDS
        .captures(sql)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_uppercase())
        .unwrap_or_default()
}

/// Keyword classification for statements the parser cannot represent
/// (DO blocks, ATTACH PARTITION, SET, dialect corners).
pub fn classify_fallback(sql: &str) -> StatementClass {
    let keywords = leading_keywords(sql);
    let starts = |prefix: &str| keywords.starts_with(prefix);

    if starts("DO") {
        StatementClass::Do
    } else if starts("CREATE OR REPLACE PROCEDURE") || starts("CREATE PROCEDURE") {
        StatementClass::CreateProcedure
    } else if starts("CREATE OR REPLACE AGGREGATE") || starts("CREATE AGGREGATE") {
        StatementClass::CreateAggregate
    } else if starts("CREATE COLLATION") {
        StatementClass::CreateCollation
    } else if starts("CREATE EVENT TRIGGER") {
        StatementClass::CreateEventTrigger
    } else if starts("CREATE PUBLICATION") {
        StatementClass::CreatePublication
    } else if starts("CREATE SUBSCRIPTION") {
        StatementClass::CreateSubscription
    } else if starts("ALTER DEFAULT PRIVILEGES") {
        StatementClass::AlterDefaultPrivileges
    } else if starts("ALTER TABLE") {
        StatementClass::AlterTable
    } else if starts("ALTER SEQUENCE") {
        StatementClass::AlterSequence
    } else if starts("ALTER DOMAIN") {
        StatementClass::AlterDomain
    } else if starts("ALTER TYPE") {
        StatementClass::AlterType
    } else if starts("ALTER ROLE") || starts("ALTER USER") {
        StatementClass::AlterRole
    } else if starts("COMMENT ON") {
        StatementClass::CommentOn
    } else if starts("GRANT") {
        StatementClass::Grant
    } else if starts("REVOKE") {
        StatementClass::Revoke
    } else if starts("SET") {
        StatementClass::SetParameter
    } else if starts("BEGIN") || starts("COMMIT") || starts("ROLLBACK") || starts("START") {
        StatementClass::Transaction
    } else {
        StatementClass::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlparser::dialect::PostgreSqlDialect;
    use sqlparser::parser::Parser;

    fn classify_sql(sql: &str) -> StatementClass {
        match Parser::parse_sql(&PostgreSqlDialect {}, sql) {
            Ok(statements) if !statements.is_empty() => classify(&statements[0], sql),
            _ => classify_fallback(sql),
        }
    }

    #[test]
    fn test_classify_basic_ddl() {
        assert_eq!(
            classify_sql("CREATE TABLE public.t (id integer)"),
            StatementClass::CreateTable
        );
        assert_eq!(
            classify_sql("CREATE SCHEMA app"),
            StatementClass::CreateSchema
        );
        assert_eq!(
            classify_sql("CREATE INDEX i ON t (a)"),
            StatementClass::CreateIndex
        );
    }

    #[test]
    fn test_materialized_view_narrows() {
        assert_eq!(
            classify_sql("CREATE VIEW v AS SELECT 1"),
            StatementClass::CreateView
        );
        assert_eq!(
            classify_sql("CREATE MATERIALIZED VIEW v AS SELECT 1"),
            StatementClass::CreateMaterializedView
        );
    }

    #[test]
    fn test_fallback_do_block() {
        assert_eq!(
            classify_fallback("DO $$ BEGIN NULL; END $$"),
            StatementClass::Do
        );
    }

    #[test]
    fn test_fallback_alter_default_privileges() {
        assert_eq!(
            classify_fallback("ALTER DEFAULT PRIVILEGES FOR ROLE r GRANT SELECT ON TABLES TO g"),
            StatementClass::AlterDefaultPrivileges
        );
    }

    #[test]
    fn test_phases_are_ordered() {
        assert!(Phase::Bootstrap < Phase::PreData);
        assert!(Phase::PreData < Phase::DataStructures);
        assert!(Phase::DataStructures < Phase::Routines);
        assert!(Phase::Routines < Phase::PostData);
        assert!(Phase::PostData < Phase::Privileges);
    }

    #[test]
    fn test_unknown_defaults_to_data_structures() {
        assert_eq!(StatementClass::Unknown.phase(), Phase::DataStructures);
    }
}
