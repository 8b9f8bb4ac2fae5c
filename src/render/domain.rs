//! SQL rendering for domain operations

use crate::diff::operations::DomainChange;
use crate::render::{
    quote_identifier, quote_qualified, render_change_owner, render_comment, SqlRenderer,
};

impl SqlRenderer for DomainChange {
    fn serialize(&self) -> String {
        match self {
            DomainChange::Create { domain } => {
                let mut sql = format!(
                    "CREATE DOMAIN {} AS {}",
                    quote_qualified(&domain.schema, &domain.name),
                    domain.qualified_base_type()
                );
                if let Some(collation) = &domain.collation {
                    sql.push_str(&format!(" COLLATE {}", quote_identifier(collation)));
                }
                if let Some(default) = &domain.default {
                    sql.push_str(&format!(" DEFAULT {}", default));
                }
                if domain.not_null {
                    sql.push_str(" NOT NULL");
                }
                // Inline checks ride unnamed; only ALTER DOMAIN ADD
                // CONSTRAINT needs the name.
                for constraint in domain.constraints.iter().filter(|c| c.validated) {
                    sql.push_str(&format!(" {}", constraint.expression));
                }
                sql
            }
            DomainChange::Drop { schema, name } => {
                format!("DROP DOMAIN {}", quote_qualified(schema, name))
            }
            DomainChange::SetDefault {
                schema,
                name,
                default,
            } => format!(
                "ALTER DOMAIN {} SET DEFAULT {}",
                quote_qualified(schema, name),
                default
            ),
            DomainChange::DropDefault { schema, name } => {
                format!("ALTER DOMAIN {} DROP DEFAULT", quote_qualified(schema, name))
            }
            DomainChange::SetNotNull { schema, name } => {
                format!("ALTER DOMAIN {} SET NOT NULL", quote_qualified(schema, name))
            }
            DomainChange::DropNotNull { schema, name } => format!(
                "ALTER DOMAIN {} DROP NOT NULL",
                quote_qualified(schema, name)
            ),
            DomainChange::AddConstraint {
                schema,
                name,
                constraint,
            } => {
                let mut sql = format!(
                    "ALTER DOMAIN {} ADD CONSTRAINT {} {}",
                    quote_qualified(schema, name),
                    quote_identifier(&constraint.name),
                    constraint.expression
                );
                if !constraint.validated {
                    sql.push_str(" NOT VALID");
                }
                sql
            }
            DomainChange::DropConstraint {
                schema,
                name,
                constraint_name,
            } => format!(
                "ALTER DOMAIN {} DROP CONSTRAINT {}",
                quote_qualified(schema, name),
                quote_identifier(constraint_name)
            ),
            DomainChange::ValidateConstraint {
                schema,
                name,
                constraint_name,
            } => format!(
                "ALTER DOMAIN {} VALIDATE CONSTRAINT {}",
                quote_qualified(schema, name),
                quote_identifier(constraint_name)
            ),
            DomainChange::ChangeOwner {
                schema,
                name,
                owner,
            } => render_change_owner("DOMAIN", &quote_qualified(schema, name), owner),
            DomainChange::Comment {
                schema,
                name,
                comment,
            } => render_comment("DOMAIN", &quote_qualified(schema, name), comment.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::domain::{Domain, DomainConstraint};

    fn domain() -> Domain {
        Domain {
            schema: "public".to_string(),
            name: "d".to_string(),
            base_type: "int4".to_string(),
            base_type_schema: "pg_catalog".to_string(),
            collation: None,
            default: None,
            not_null: false,
            constraints: vec![],
            owner: "postgres".to_string(),
            comment: None,
            privileges: vec![],
        }
    }

    #[test]
    fn test_create_domain_full() {
        let mut d = domain();
        d.collation = Some("en_US".to_string());
        d.default = Some("0".to_string());
        d.not_null = true;
        d.constraints = vec![DomainConstraint {
            name: "d_check".to_string(),
            expression: "CHECK (VALUE > 0)".to_string(),
            validated: true,
        }];
        let op = DomainChange::Create { domain: d };
        assert_eq!(
            op.serialize(),
            "CREATE DOMAIN public.d AS pg_catalog.int4 COLLATE \"en_US\" DEFAULT 0 NOT NULL CHECK (VALUE > 0)"
        );
    }

    #[test]
    fn test_unvalidated_constraint_excluded_from_create() {
        let mut d = domain();
        d.constraints = vec![DomainConstraint {
            name: "c1".to_string(),
            expression: "CHECK (VALUE <> 13)".to_string(),
            validated: false,
        }];
        let op = DomainChange::Create { domain: d };
        assert_eq!(op.serialize(), "CREATE DOMAIN public.d AS pg_catalog.int4");
    }

    #[test]
    fn test_add_constraint_not_valid() {
        let op = DomainChange::AddConstraint {
            schema: "public".to_string(),
            name: "d".to_string(),
            constraint: DomainConstraint {
                name: "c1".to_string(),
                expression: "CHECK (VALUE <> 13)".to_string(),
                validated: false,
            },
        };
        assert_eq!(
            op.serialize(),
            "ALTER DOMAIN public.d ADD CONSTRAINT c1 CHECK (VALUE <> 13) NOT VALID"
        );
    }

    #[test]
    fn test_validate_constraint() {
        let op = DomainChange::ValidateConstraint {
            schema: "public".to_string(),
            name: "d".to_string(),
            constraint_name: "c1".to_string(),
        };
        assert_eq!(
            op.serialize(),
            "ALTER DOMAIN public.d VALIDATE CONSTRAINT c1"
        );
    }

    #[test]
    fn test_drop_domain() {
        let op = DomainChange::Drop {
            schema: "public".to_string(),
            name: "test_domain".to_string(),
        };
        assert_eq!(op.serialize(), "DROP DOMAIN public.test_domain");
    }
}
