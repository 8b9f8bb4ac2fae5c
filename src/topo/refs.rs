//! Reference extraction: what a statement provides, requires and drops.
//!
//! Classification leans on the parse tree; name and reference extraction
//! combines the parser's relation visitor with keyword-anchored regular
//! expressions so statements the parser cannot fully represent still
//! surface their references.

use std::collections::BTreeSet;
use std::ops::ControlFlow;

use once_cell::sync::Lazy;
use regex::Regex;
use sqlparser::ast::{
    visit_relations, ColumnOption, DataType, ObjectName, Statement, TableConstraint,
};

use crate::topo::classify::StatementClass;

const DEFAULT_SCHEMA: &str = "public";

fn strip_quotes(raw: &str) -> String {
    raw.trim().trim_matches('"').to_string()
}

/// Split a possibly-qualified name into `(schema?, name)`.
pub fn parse_qualified(raw: &str) -> (Option<String>, String) {
    let cleaned = raw.trim().trim_end_matches(';');
    match cleaned.split_once('.') {
        Some((schema, name)) => (Some(strip_quotes(schema)), strip_quotes(name)),
        None => (None, strip_quotes(cleaned)),
    }
}

fn qualify(schema: &Option<String>, name: &str) -> String {
    format!(
        "{}.{}",
        schema.as_deref().unwrap_or(DEFAULT_SCHEMA),
        name
    )
}

fn object_name_parts(name: &ObjectName) -> (Option<String>, String) {
    let parts: Vec<String> = name
        .0
        .iter()
        .map(|part| strip_quotes(&part.to_string()))
        .collect();
    match parts.as_slice() {
        [schema, name] => (Some(schema.clone()), name.clone()),
        [name] => (None, name.clone()),
        [.., schema, name] => (Some(schema.clone()), name.clone()),
        [] => (None, String::new()),
    }
}

fn is_system_schema(schema: &str) -> bool {
    matches!(schema, "pg_catalog" | "information_schema" | "pg_toast")
}

static FROM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bFROM\s+(?:("?[a-z_][\w$]*"?)\.)?("?[a-z_][\w$]*"?)"#).unwrap()
});
static JOIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bJOIN\s+(?:("?[a-z_][\w$]*"?)\.)?("?[a-z_][\w$]*"?)"#).unwrap()
});
static INSERT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bINSERT\s+INTO\s+(?:("?[a-z_][\w$]*"?)\.)?("?[a-z_][\w$]*"?)"#).unwrap()
});
static UPDATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bUPDATE\s+(?:("?[a-z_][\w$]*"?)\.)?("?[a-z_][\w$]*"?)"#).unwrap()
});

/// Relation references in a body of SQL text: FROM, JOIN, INSERT INTO and
/// UPDATE targets. Keyword-anchored, so SELECT-list noise stays out.
pub fn relation_names(sql: &str) -> Vec<(Option<String>, String)> {
    let mut refs = BTreeSet::new();
    for re in [&*FROM_RE, &*JOIN_RE, &*INSERT_RE, &*UPDATE_RE] {
        for capture in re.captures_iter(sql) {
            let schema = capture.get(1).map(|m| strip_quotes(m.as_str()));
            let name = strip_quotes(capture.get(2).unwrap().as_str());
            if let Some(s) = &schema {
                if is_system_schema(s) {
                    continue;
                }
            }
            refs.insert((schema, name));
        }
    }
    refs.into_iter().collect()
}

/// The references one statement contributes to the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedRefs {
    pub provides: Vec<String>,
    pub requires: Vec<String>,
    pub drops: Vec<String>,
}

impl ExtractedRefs {
    fn provide(&mut self, id: String) {
        if !self.provides.contains(&id) {
            self.provides.push(id);
        }
    }

    fn require(&mut self, id: String) {
        if !self.requires.contains(&id) {
            self.requires.push(id);
        }
    }

    fn drop_id(&mut self, id: String) {
        if !self.drops.contains(&id) {
            self.drops.push(id);
        }
    }
}

static OBJECT_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    // The name following CREATE/ALTER <kind>, skipping noise words.
    Regex::new(
        r#"(?is)^\s*(?:CREATE|ALTER)\s+(?:OR\s+REPLACE\s+)?(?:TEMP(?:ORARY)?\s+|UNLOGGED\s+|TRUSTED\s+|UNIQUE\s+|MATERIALIZED\s+|RECURSIVE\s+|CONSTRAINT\s+)*[A-Z]+(?:\s+(?:TABLE|VIEW|TRIGGER|INDEX|SEQUENCE|SCHEMA|TYPE|DOMAIN|EXTENSION|COLLATION|PUBLICATION|SUBSCRIPTION|SERVER|WRAPPER|LANGUAGE|FUNCTION|PROCEDURE|AGGREGATE|POLICY|ROLE|USER|DATA))*\s+(?:IF\s+NOT\s+EXISTS\s+)?(?:CONCURRENTLY\s+)?(?:ONLY\s+)?("?[\w$]+"?(?:\."?[\w$]+"?)?)"#,
    )
    .unwrap()
});

/// The first object name after the statement's leading keywords.
pub fn leading_object_name(sql: &str) -> Option<(Option<String>, String)> {
    OBJECT_NAME_RE
        .captures(sql)
        .and_then(|c| c.get(1))
        .map(|m| parse_qualified(m.as_str()))
}

static REFERENCES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bREFERENCES\s+("?[\w$]+"?(?:\."?[\w$]+"?)?)\s*\(([^)]*)\)"#).unwrap()
});
static EXECUTE_FUNCTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bEXECUTE\s+(?:FUNCTION|PROCEDURE)\s+("?[\w$]+"?(?:\."?[\w$]+"?)?)"#)
        .unwrap()
});
static ON_TABLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bON\s+("?[\w$]+"?(?:\."?[\w$]+"?)?)"#).unwrap());
static ATTACH_PARTITION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bATTACH\s+PARTITION\s+("?[\w$]+"?(?:\."?[\w$]+"?)?)"#).unwrap()
});
static CREATE_ENUM_IN_BODY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)CREATE\s+TYPE\s+("?[\w$]+"?(?:\."?[\w$]+"?)?)\s+AS\s+ENUM"#).unwrap()
});
static KEY_COLUMNS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\b(?:PRIMARY\s+KEY|UNIQUE)\s*\(([^)]*)\)"#).unwrap());
static GRANT_TARGET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\bON\s+(TABLE\s+|SEQUENCE\s+|SCHEMA\s+|DOMAIN\s+|TYPE\s+|LANGUAGE\s+|FUNCTION\s+|PROCEDURE\s+|FOREIGN\s+DATA\s+WRAPPER\s+|FOREIGN\s+SERVER\s+)?("?[\w$]+"?(?:\."?[\w$]+"?)?)"#,
    )
    .unwrap()
});
static GRANTEE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\b(?:TO|FROM)\s+(GROUP\s+)?("?[\w$]+"?(?:\s*,\s*"?[\w$]+"?)*)"#).unwrap()
});
static DROP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)^\s*DROP\s+(TABLE|MATERIALIZED\s+VIEW|VIEW|SEQUENCE|INDEX|SCHEMA|TYPE|DOMAIN|FUNCTION|PROCEDURE|AGGREGATE|TRIGGER|POLICY|EXTENSION|ROLE|COLLATION|PUBLICATION|SUBSCRIPTION|SERVER|LANGUAGE)\s+(?:CONCURRENTLY\s+)?(?:IF\s+EXISTS\s+)?("?[\w$]+"?(?:\."?[\w$]+"?)?)"#,
    )
    .unwrap()
});
static COMMENT_ON_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)^\s*COMMENT\s+ON\s+(TABLE|MATERIALIZED\s+VIEW|VIEW|COLUMN|SEQUENCE|INDEX|SCHEMA|TYPE|DOMAIN|FUNCTION|PROCEDURE|EXTENSION|ROLE|TRIGGER|POLICY)\s+("?[\w$]+"?(?:\."?[\w$]+"?){0,2})"#,
    )
    .unwrap()
});
static OWNED_BY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bOWNED\s+BY\s+("?[\w$]+"?(?:\."?[\w$]+"?){1,2})"#).unwrap()
});

fn visited_relations(statement: &Statement) -> Vec<(Option<String>, String)> {
    let mut names = BTreeSet::new();
    let _ = visit_relations(statement, |relation| {
        let (schema, name) = object_name_parts(relation);
        if let Some(s) = &schema {
            if is_system_schema(s) {
                return ControlFlow::<()>::Continue(());
            }
        }
        names.insert((schema, name));
        ControlFlow::<()>::Continue(())
    });
    names.into_iter().collect()
}

/// Require a relation whose concrete kind is unknown: both the table and
/// the view reading of the name go in, and the resolver treats the pair as
/// one reference.
fn require_relation(refs: &mut ExtractedRefs, schema: &Option<String>, name: &str) {
    refs.require(format!("table:{}", qualify(schema, name)));
    refs.require(format!("view:{}", qualify(schema, name)));
}

fn create_table_refs(statement: Option<&Statement>, sql: &str, refs: &mut ExtractedRefs) {
    let Some((schema, name)) = leading_object_name(sql) else {
        return;
    };
    let qualified = qualify(&schema, &name);
    refs.provide(format!("table:{}", qualified));

    if let Some(Statement::CreateTable(create)) = statement {
        for column in &create.columns {
            if let DataType::Custom(type_name, _) = &column.data_type {
                let (type_schema, type_name) = object_name_parts(type_name);
                if !type_schema.as_deref().map(is_system_schema).unwrap_or(false) {
                    refs.require(format!("type:{}", qualify(&type_schema, &type_name)));
                }
            }
            for option in &column.options {
                match &option.option {
                    ColumnOption::Unique { .. } => {
                        refs.provide(format!("key:{}({})", qualified, column.name));
                    }
                    ColumnOption::ForeignKey {
                        foreign_table,
                        referred_columns,
                        ..
                    } => {
                        let (ref_schema, ref_name) = object_name_parts(foreign_table);
                        let ref_qualified = qualify(&ref_schema, &ref_name);
                        refs.require(format!("table:{}", ref_qualified));
                        let columns: Vec<String> = referred_columns
                            .iter()
                            .map(|c| strip_quotes(&c.to_string()))
                            .collect();
                        if !columns.is_empty() {
                            refs.require(format!(
                                "key:{}({})",
                                ref_qualified,
                                columns.join(",")
                            ));
                        }
                    }
                    _ => {}
                }
            }
        }
        for constraint in &create.constraints {
            match constraint {
                TableConstraint::PrimaryKey { columns, .. }
                | TableConstraint::Unique { columns, .. } => {
                    let names: Vec<String> = columns
                        .iter()
                        .map(|c| strip_quotes(&c.to_string()))
                        .collect();
                    refs.provide(format!("key:{}({})", qualified, names.join(",")));
                }
                TableConstraint::ForeignKey {
                    foreign_table,
                    referred_columns,
                    ..
                } => {
                    let (ref_schema, ref_name) = object_name_parts(foreign_table);
                    let ref_qualified = qualify(&ref_schema, &ref_name);
                    refs.require(format!("table:{}", ref_qualified));
                    let columns: Vec<String> = referred_columns
                        .iter()
                        .map(|c| strip_quotes(&c.to_string()))
                        .collect();
                    if !columns.is_empty() {
                        refs.require(format!("key:{}({})", ref_qualified, columns.join(",")));
                    }
                }
                _ => {}
            }
        }
    } else {
        // No usable tree; fall back to keyword scans.
        for capture in REFERENCES_RE.captures_iter(sql) {
            let (ref_schema, ref_name) = parse_qualified(capture.get(1).unwrap().as_str());
            let ref_qualified = qualify(&ref_schema, &ref_name);
            refs.require(format!("table:{}", ref_qualified));
            let columns: Vec<String> = capture
                .get(2)
                .unwrap()
                .as_str()
                .split(',')
                .map(|c| strip_quotes(c))
                .filter(|c| !c.is_empty())
                .collect();
            if !columns.is_empty() {
                refs.require(format!("key:{}({})", ref_qualified, columns.join(",")));
            }
        }
        for capture in KEY_COLUMNS_RE.captures_iter(sql) {
            let columns: Vec<String> = capture
                .get(1)
                .unwrap()
                .as_str()
                .split(',')
                .map(|c| strip_quotes(c))
                .filter(|c| !c.is_empty())
                .collect();
            refs.provide(format!("key:{}({})", qualified, columns.join(",")));
        }
    }
}

fn create_index_refs(statement: Option<&Statement>, sql: &str, refs: &mut ExtractedRefs) {
    if let Some(Statement::CreateIndex(create)) = statement {
        let (table_schema, table_name) = object_name_parts(&create.table_name);
        let table_qualified = qualify(&table_schema, &table_name);
        refs.require(format!("table:{}", table_qualified));

        let index_name = create
            .name
            .as_ref()
            .map(|n| object_name_parts(n))
            .map(|(schema, name)| qualify(&schema.or(table_schema.clone()), &name));
        if let Some(qualified) = index_name {
            refs.provide(format!("index:{}", qualified));
        }

        // A unique index without a predicate guarantees a key set
        // downstream foreign keys can depend on.
        if create.unique && create.predicate.is_none() {
            let columns: Vec<String> = create
                .columns
                .iter()
                .map(|c| strip_quotes(&c.to_string()))
                .collect();
            if columns.iter().all(|c| !c.contains('(')) {
                refs.provide(format!("key:{}({})", table_qualified, columns.join(",")));
            }
        }
    } else if let Some(capture) = ON_TABLE_RE.captures(sql) {
        let (schema, name) = parse_qualified(capture.get(1).unwrap().as_str());
        refs.require(format!("table:{}", qualify(&schema, &name)));
        if let Some((index_schema, index_name)) = leading_object_name(sql) {
            refs.provide(format!("index:{}", qualify(&index_schema, &index_name)));
        }
    }
}

fn alter_table_refs(sql: &str, refs: &mut ExtractedRefs) {
    if let Some((schema, name)) = leading_object_name(sql) {
        let qualified = qualify(&schema, &name);
        refs.require(format!("table:{}", qualified));

        for capture in KEY_COLUMNS_RE.captures_iter(sql) {
            let columns: Vec<String> = capture
                .get(1)
                .unwrap()
                .as_str()
                .split(',')
                .map(|c| strip_quotes(c))
                .filter(|c| !c.is_empty())
                .collect();
            refs.provide(format!("key:{}({})", qualified, columns.join(",")));
        }
    }
    for capture in REFERENCES_RE.captures_iter(sql) {
        let (schema, name) = parse_qualified(capture.get(1).unwrap().as_str());
        let qualified = qualify(&schema, &name);
        refs.require(format!("table:{}", qualified));
        let columns: Vec<String> = capture
            .get(2)
            .unwrap()
            .as_str()
            .split(',')
            .map(|c| strip_quotes(c))
            .filter(|c| !c.is_empty())
            .collect();
        if !columns.is_empty() {
            refs.require(format!("key:{}({})", qualified, columns.join(",")));
        }
    }
    if let Some(capture) = ATTACH_PARTITION_RE.captures(sql) {
        let (schema, name) = parse_qualified(capture.get(1).unwrap().as_str());
        refs.require(format!("table:{}", qualify(&schema, &name)));
    }
}

fn grant_revoke_refs(sql: &str, refs: &mut ExtractedRefs) {
    if let Some(capture) = GRANT_TARGET_RE.captures(sql) {
        let keyword = capture
            .get(1)
            .map(|m| m.as_str().to_uppercase().split_whitespace().collect::<Vec<_>>().join(" "))
            .unwrap_or_default();
        let (schema, name) = parse_qualified(capture.get(2).unwrap().as_str());
        let prefix = match keyword.as_str() {
            "SEQUENCE" => "sequence",
            "SCHEMA" => "schema",
            "DOMAIN" => "domain",
            "TYPE" => "type",
            "LANGUAGE" => "language",
            "FUNCTION" | "PROCEDURE" => "function",
            "FOREIGN DATA WRAPPER" => "foreign_data_wrapper",
            "FOREIGN SERVER" => "foreign_server",
            _ => "table",
        };
        let id = match prefix {
            "schema" | "language" | "foreign_data_wrapper" | "foreign_server" => {
                format!("{}:{}", prefix, name)
            }
            "function" => format!("{}:{}", prefix, qualify(&schema, &name)),
            _ => format!("{}:{}", prefix, qualify(&schema, &name)),
        };
        refs.require(id);
    }
    if let Some(capture) = GRANTEE_RE.captures(sql) {
        for grantee in capture.get(2).unwrap().as_str().split(',') {
            let grantee = strip_quotes(grantee);
            if !grantee.is_empty() && !grantee.eq_ignore_ascii_case("public") {
                refs.require(format!("role:{}", grantee));
            }
        }
    }
}

fn drop_refs(sql: &str, refs: &mut ExtractedRefs) {
    if let Some(capture) = DROP_RE.captures(sql) {
        let keyword = capture
            .get(1)
            .unwrap()
            .as_str()
            .to_uppercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        let (schema, name) = parse_qualified(capture.get(2).unwrap().as_str());
        let id = match keyword.as_str() {
            "TABLE" => format!("table:{}", qualify(&schema, &name)),
            "VIEW" => format!("view:{}", qualify(&schema, &name)),
            "MATERIALIZED VIEW" => format!("materialized_view:{}", qualify(&schema, &name)),
            "SEQUENCE" => format!("sequence:{}", qualify(&schema, &name)),
            "INDEX" => format!("index:{}", qualify(&schema, &name)),
            "SCHEMA" => format!("schema:{}", name),
            "TYPE" => format!("type:{}", qualify(&schema, &name)),
            "DOMAIN" => format!("domain:{}", qualify(&schema, &name)),
            "FUNCTION" | "PROCEDURE" | "AGGREGATE" => {
                format!("function:{}", qualify(&schema, &name))
            }
            "ROLE" => format!("role:{}", name),
            "EXTENSION" => format!("extension:{}", name),
            "COLLATION" => format!("collation:{}", qualify(&schema, &name)),
            "PUBLICATION" => format!("publication:{}", name),
            "SUBSCRIPTION" => format!("subscription:{}", name),
            "LANGUAGE" => format!("language:{}", name),
            "SERVER" => format!("foreign_server:{}", name),
            _ => return,
        };
        refs.require(id.clone());
        refs.drop_id(id);
    }
}

/// Extract the reference sets for one classified statement.
pub fn extract_refs(
    class: StatementClass,
    statement: Option<&Statement>,
    sql: &str,
) -> ExtractedRefs {
    let mut refs = ExtractedRefs::default();

    match class {
        StatementClass::CreateSchema => {
            if let Some((_, name)) = leading_object_name(sql) {
                refs.provide(format!("schema:{}", name));
            }
        }
        StatementClass::CreateRole | StatementClass::AlterRole => {
            if let Some((_, name)) = leading_object_name(sql) {
                if class == StatementClass::CreateRole {
                    refs.provide(format!("role:{}", name));
                } else {
                    refs.require(format!("role:{}", name));
                }
            }
        }
        StatementClass::CreateExtension => {
            if let Some((_, name)) = leading_object_name(sql) {
                refs.provide(format!("extension:{}", name));
            }
        }
        StatementClass::CreateCollation => {
            if let Some((schema, name)) = leading_object_name(sql) {
                refs.provide(format!("collation:{}", qualify(&schema, &name)));
            }
        }
        StatementClass::CreateType => {
            if let Some((schema, name)) = leading_object_name(sql) {
                let qualified = qualify(&schema, &name);
                refs.provide(format!("type:{}", qualified));
                let upper = sql.to_uppercase();
                if upper.contains("AS ENUM") {
                    refs.provide(format!("enum:{}", qualified));
                } else if upper.contains("AS RANGE") {
                    refs.provide(format!("range:{}", qualified));
                } else {
                    refs.provide(format!("composite_type:{}", qualified));
                }
            }
        }
        StatementClass::CreateDomain => {
            if let Some((schema, name)) = leading_object_name(sql) {
                let qualified = qualify(&schema, &name);
                refs.provide(format!("domain:{}", qualified));
                refs.provide(format!("type:{}", qualified));
            }
        }
        StatementClass::CreateSequence => {
            if let Some((schema, name)) = leading_object_name(sql) {
                refs.provide(format!("sequence:{}", qualify(&schema, &name)));
            }
            if let Some(capture) = OWNED_BY_RE.captures(sql) {
                let target = capture.get(1).unwrap().as_str();
                let parts: Vec<&str> = target.split('.').collect();
                if parts.len() >= 2 {
                    let (schema, table) = if parts.len() == 3 {
                        (Some(strip_quotes(parts[0])), strip_quotes(parts[1]))
                    } else {
                        (None, strip_quotes(parts[0]))
                    };
                    refs.require(format!("table:{}", qualify(&schema, &table)));
                }
            }
        }
        StatementClass::AlterSequence => {
            if let Some((schema, name)) = leading_object_name(sql) {
                refs.require(format!("sequence:{}", qualify(&schema, &name)));
            }
        }
        StatementClass::CreateTable => create_table_refs(statement, sql, &mut refs),
        StatementClass::AlterTable => alter_table_refs(sql, &mut refs),
        StatementClass::CreateIndex => create_index_refs(statement, sql, &mut refs),
        StatementClass::CreateView | StatementClass::CreateMaterializedView => {
            let prefix = if class == StatementClass::CreateMaterializedView {
                "materialized_view"
            } else {
                "view"
            };
            let own = leading_object_name(sql);
            if let Some((schema, name)) = &own {
                refs.provide(format!("{}:{}", prefix, qualify(schema, name)));
            }
            let body_refs = match statement {
                Some(statement) => visited_relations(statement),
                None => relation_names(sql),
            };
            for (schema, name) in body_refs {
                if let Some((own_schema, own_name)) = &own {
                    if *own_name == name
                        && qualify(own_schema, own_name) == qualify(&schema, &name)
                    {
                        continue;
                    }
                }
                require_relation(&mut refs, &schema, &name);
            }
        }
        StatementClass::CreateFunction
        | StatementClass::CreateProcedure
        | StatementClass::CreateAggregate => {
            if let Some((schema, name)) = leading_object_name(sql) {
                refs.provide(format!("function:{}", qualify(&schema, &name)));
            }
            for (schema, name) in relation_names(sql) {
                require_relation(&mut refs, &schema, &name);
            }
        }
        StatementClass::CreateTrigger => {
            if let Some(capture) = ON_TABLE_RE.captures(sql) {
                let (schema, table) = parse_qualified(capture.get(1).unwrap().as_str());
                let table_qualified = qualify(&schema, &table);
                refs.require(format!("table:{}", table_qualified));
                if let Some((_, name)) = leading_object_name(sql) {
                    refs.provide(format!("trigger:{}.{}", table_qualified, name));
                }
            }
            if let Some(capture) = EXECUTE_FUNCTION_RE.captures(sql) {
                let (schema, name) = parse_qualified(capture.get(1).unwrap().as_str());
                refs.require(format!("function:{}", qualify(&schema, &name)));
            }
        }
        StatementClass::CreateEventTrigger => {
            if let Some((_, name)) = leading_object_name(sql) {
                refs.provide(format!("event_trigger:{}", name));
            }
            if let Some(capture) = EXECUTE_FUNCTION_RE.captures(sql) {
                let (schema, name) = parse_qualified(capture.get(1).unwrap().as_str());
                refs.require(format!("function:{}", qualify(&schema, &name)));
            }
        }
        StatementClass::CreatePolicy => {
            if let Some(capture) = ON_TABLE_RE.captures(sql) {
                let (schema, table) = parse_qualified(capture.get(1).unwrap().as_str());
                let table_qualified = qualify(&schema, &table);
                refs.require(format!("table:{}", table_qualified));
                if let Some((_, name)) = leading_object_name(sql) {
                    refs.provide(format!("policy:{}.{}", table_qualified, name));
                }
            }
        }
        StatementClass::CreatePublication => {
            if let Some((_, name)) = leading_object_name(sql) {
                refs.provide(format!("publication:{}", name));
            }
        }
        StatementClass::CreateSubscription => {
            if let Some((_, name)) = leading_object_name(sql) {
                refs.provide(format!("subscription:{}", name));
            }
        }
        StatementClass::AlterDomain => {
            if let Some((schema, name)) = leading_object_name(sql) {
                refs.require(format!("domain:{}", qualify(&schema, &name)));
            }
        }
        StatementClass::AlterType => {
            if let Some((schema, name)) = leading_object_name(sql) {
                refs.require(format!("type:{}", qualify(&schema, &name)));
            }
        }
        StatementClass::Grant | StatementClass::Revoke => grant_revoke_refs(sql, &mut refs),
        StatementClass::AlterDefaultPrivileges => {
            if let Some(capture) = GRANTEE_RE.captures(sql) {
                for grantee in capture.get(2).unwrap().as_str().split(',') {
                    let grantee = strip_quotes(grantee);
                    if !grantee.is_empty() && !grantee.eq_ignore_ascii_case("public") {
                        refs.require(format!("role:{}", grantee));
                    }
                }
            }
        }
        StatementClass::CommentOn => {
            if let Some(capture) = COMMENT_ON_RE.captures(sql) {
                let keyword = capture
                    .get(1)
                    .unwrap()
                    .as_str()
                    .to_uppercase()
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ");
                let raw_name = capture.get(2).unwrap().as_str();
                let (schema, name) = parse_qualified(raw_name);
                match keyword.as_str() {
                    "TABLE" => refs.require(format!("table:{}", qualify(&schema, &name))),
                    "VIEW" => refs.require(format!("view:{}", qualify(&schema, &name))),
                    "MATERIALIZED VIEW" => {
                        refs.require(format!("materialized_view:{}", qualify(&schema, &name)))
                    }
                    "COLUMN" => {
                        // schema.table.column; the table is the dependency.
                        let parts: Vec<&str> = raw_name.split('.').collect();
                        if parts.len() >= 2 {
                            let table_parts = &parts[..parts.len() - 1];
                            let (schema, table) = if table_parts.len() == 2 {
                                (Some(strip_quotes(table_parts[0])), strip_quotes(table_parts[1]))
                            } else {
                                (None, strip_quotes(table_parts[0]))
                            };
                            refs.require(format!("table:{}", qualify(&schema, &table)));
                        }
                    }
                    "SEQUENCE" => refs.require(format!("sequence:{}", qualify(&schema, &name))),
                    "SCHEMA" => refs.require(format!("schema:{}", name)),
                    "TYPE" => refs.require(format!("type:{}", qualify(&schema, &name))),
                    "DOMAIN" => refs.require(format!("domain:{}", qualify(&schema, &name))),
                    "FUNCTION" | "PROCEDURE" => {
                        refs.require(format!("function:{}", qualify(&schema, &name)))
                    }
                    "EXTENSION" => refs.require(format!("extension:{}", name)),
                    "ROLE" => refs.require(format!("role:{}", name)),
                    _ => {}
                }
            }
        }
        StatementClass::DropObject => drop_refs(sql, &mut refs),
        StatementClass::Insert
        | StatementClass::Update
        | StatementClass::Delete
        | StatementClass::Select => {
            let body_refs = match statement {
                Some(statement) => visited_relations(statement),
                None => relation_names(sql),
            };
            for (schema, name) in body_refs {
                require_relation(&mut refs, &schema, &name);
            }
        }
        StatementClass::Do => {
            // Enum creation hidden inside DO bodies still provides the
            // type; idempotent bootstrap scripts rely on this.
            for capture in CREATE_ENUM_IN_BODY_RE.captures_iter(sql) {
                let (schema, name) = parse_qualified(capture.get(1).unwrap().as_str());
                let qualified = qualify(&schema, &name);
                refs.provide(format!("enum:{}", qualified));
                refs.provide(format!("type:{}", qualified));
            }
        }
        StatementClass::Transaction
        | StatementClass::SetParameter
        | StatementClass::Unknown => {}
    }

    refs
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlparser::dialect::PostgreSqlDialect;
    use sqlparser::parser::Parser;

    fn refs_for(sql: &str) -> ExtractedRefs {
        let parsed = Parser::parse_sql(&PostgreSqlDialect {}, sql).ok();
        let statement = parsed.as_ref().and_then(|s| s.first());
        let class = match statement {
            Some(statement) => crate::topo::classify::classify(statement, sql),
            None => crate::topo::classify::classify_fallback(sql),
        };
        extract_refs(class, statement, sql)
    }

    #[test]
    fn test_create_table_provides_key_columns() {
        let refs = refs_for("CREATE TABLE public.users (id integer, CONSTRAINT pk PRIMARY KEY (id))");
        assert!(refs.provides.contains(&"table:public.users".to_string()));
        assert!(refs.provides.contains(&"key:public.users(id)".to_string()));
    }

    #[test]
    fn test_foreign_key_requires_referenced_key() {
        let refs = refs_for(
            "CREATE TABLE orders (id integer, user_id integer, CONSTRAINT fk FOREIGN KEY (user_id) REFERENCES public.users (id))",
        );
        assert!(refs.requires.contains(&"table:public.users".to_string()));
        assert!(refs.requires.contains(&"key:public.users(id)".to_string()));
    }

    #[test]
    fn test_view_requires_relations() {
        let refs = refs_for("CREATE VIEW v AS SELECT id FROM users");
        assert!(refs.provides.contains(&"view:public.v".to_string()));
        assert!(refs.requires.contains(&"table:public.users".to_string()));
    }

    #[test]
    fn test_unique_index_provides_key() {
        let refs = refs_for("CREATE UNIQUE INDEX users_email_key ON public.users (email)");
        assert!(refs.provides.contains(&"key:public.users(email)".to_string()));
        assert!(refs.requires.contains(&"table:public.users".to_string()));
    }

    #[test]
    fn test_partial_unique_index_provides_no_key() {
        let refs =
            refs_for("CREATE UNIQUE INDEX idx ON public.users (email) WHERE deleted_at IS NULL");
        assert!(!refs.provides.iter().any(|p| p.starts_with("key:")));
    }

    #[test]
    fn test_trigger_requires_table_and_function() {
        let refs = refs_for(
            "CREATE TRIGGER t AFTER INSERT ON public.users FOR EACH ROW EXECUTE FUNCTION audit.log_row()",
        );
        assert!(refs.requires.contains(&"table:public.users".to_string()));
        assert!(refs.requires.contains(&"function:audit.log_row".to_string()));
        assert!(refs.provides.contains(&"trigger:public.users.t".to_string()));
    }

    #[test]
    fn test_do_block_surfaces_enum() {
        let sql = "DO $$ BEGIN CREATE TYPE public.mood AS ENUM ('sad','ok'); EXCEPTION WHEN duplicate_object THEN NULL; END $$";
        let refs = extract_refs(StatementClass::Do, None, sql);
        assert!(refs.provides.contains(&"enum:public.mood".to_string()));
    }

    #[test]
    fn test_attach_partition_requires_partition() {
        let sql = "ALTER TABLE public.events ATTACH PARTITION public.events_2024 FOR VALUES FROM ('2024-01-01') TO ('2025-01-01')";
        let refs = extract_refs(StatementClass::AlterTable, None, sql);
        assert!(refs
            .requires
            .contains(&"table:public.events_2024".to_string()));
    }

    #[test]
    fn test_drop_records_dropped_id() {
        let refs = refs_for("DROP TABLE public.old_stuff");
        assert!(refs.drops.contains(&"table:public.old_stuff".to_string()));
    }

    #[test]
    fn test_grant_requires_object_and_role() {
        let refs = refs_for("GRANT SELECT ON TABLE public.users TO reporting");
        assert!(refs.requires.contains(&"table:public.users".to_string()));
        assert!(refs.requires.contains(&"role:reporting".to_string()));
    }
}
