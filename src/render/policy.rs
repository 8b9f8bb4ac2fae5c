//! SQL rendering for row-level security policy operations

use crate::catalog::policy::Policy;
use crate::catalog::privilege::PUBLIC;
use crate::diff::operations::PolicyChange;
use crate::render::{quote_identifier, quote_qualified, render_comment, SqlRenderer};

fn render_roles(roles: &[String]) -> String {
    if roles.is_empty() {
        "PUBLIC".to_string()
    } else {
        roles
            .iter()
            .map(|r| {
                if r == PUBLIC {
                    "PUBLIC".to_string()
                } else {
                    quote_identifier(r)
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn render_create_policy(policy: &Policy) -> String {
    let mut sql = format!(
        "CREATE POLICY {} ON {}",
        quote_identifier(&policy.name),
        quote_qualified(&policy.schema, &policy.table)
    );
    if !policy.permissive {
        sql.push_str(" AS RESTRICTIVE");
    }
    sql.push_str(&format!(" FOR {}", policy.command.sql_keyword()));
    sql.push_str(&format!(" TO {}", render_roles(&policy.roles)));
    if let Some(using) = &policy.using_expr {
        sql.push_str(&format!(" USING ({})", using));
    }
    if let Some(check) = &policy.with_check_expr {
        sql.push_str(&format!(" WITH CHECK ({})", check));
    }
    sql
}

impl SqlRenderer for PolicyChange {
    fn serialize(&self) -> String {
        match self {
            PolicyChange::Create { policy } => render_create_policy(policy),
            PolicyChange::Alter {
                policy,
                set_roles,
                set_using,
                set_check,
            } => {
                let mut sql = format!(
                    "ALTER POLICY {} ON {}",
                    quote_identifier(&policy.name),
                    quote_qualified(&policy.schema, &policy.table)
                );
                if *set_roles {
                    sql.push_str(&format!(" TO {}", render_roles(&policy.roles)));
                }
                if *set_using {
                    if let Some(using) = &policy.using_expr {
                        sql.push_str(&format!(" USING ({})", using));
                    }
                }
                if *set_check {
                    if let Some(check) = &policy.with_check_expr {
                        sql.push_str(&format!(" WITH CHECK ({})", check));
                    }
                }
                sql
            }
            PolicyChange::Drop {
                schema,
                table,
                name,
            } => format!(
                "DROP POLICY {} ON {}",
                quote_identifier(name),
                quote_qualified(schema, table)
            ),
            PolicyChange::Comment {
                schema,
                table,
                name,
                comment,
            } => render_comment(
                "POLICY",
                &format!(
                    "{} ON {}",
                    quote_identifier(name),
                    quote_qualified(schema, table)
                ),
                comment.as_deref(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::policy::PolicyCommand;

    fn policy() -> Policy {
        Policy {
            schema: "public".to_string(),
            name: "by_owner".to_string(),
            table: "documents".to_string(),
            command: PolicyCommand::Select,
            permissive: true,
            roles: vec!["app_user".to_string()],
            using_expr: Some("owner_id = current_user_id()".to_string()),
            with_check_expr: None,
            comment: None,
        }
    }

    #[test]
    fn test_create_policy() {
        let op = PolicyChange::Create { policy: policy() };
        assert_eq!(
            op.serialize(),
            "CREATE POLICY by_owner ON public.documents FOR SELECT TO app_user USING (owner_id = current_user_id())"
        );
    }

    #[test]
    fn test_create_restrictive_policy_for_update() {
        let mut p = policy();
        p.permissive = false;
        p.command = PolicyCommand::Update;
        let op = PolicyChange::Create { policy: p };
        assert_eq!(
            op.serialize(),
            "CREATE POLICY by_owner ON public.documents AS RESTRICTIVE FOR UPDATE TO app_user USING (owner_id = current_user_id())"
        );
    }

    #[test]
    fn test_alter_policy_roles_only() {
        let mut p = policy();
        p.roles = vec!["app_user".to_string(), "auditor".to_string()];
        let op = PolicyChange::Alter {
            policy: p,
            set_roles: true,
            set_using: false,
            set_check: false,
        };
        assert_eq!(
            op.serialize(),
            "ALTER POLICY by_owner ON public.documents TO app_user, auditor"
        );
    }

    #[test]
    fn test_drop_policy() {
        let op = PolicyChange::Drop {
            schema: "public".to_string(),
            table: "documents".to_string(),
            name: "by_owner".to_string(),
        };
        assert_eq!(op.serialize(), "DROP POLICY by_owner ON public.documents");
    }

    #[test]
    fn test_empty_roles_render_as_public() {
        let mut p = policy();
        p.roles = vec![];
        let op = PolicyChange::Create { policy: p };
        assert!(op.serialize().contains("TO PUBLIC"));
    }
}
