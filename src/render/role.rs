//! SQL rendering for role operations

use crate::diff::operations::{role_flag_keywords, RoleChange};
use crate::render::{quote_identifier, quote_literal, render_comment, SqlRenderer};

impl SqlRenderer for RoleChange {
    fn serialize(&self) -> String {
        match self {
            RoleChange::Create { role } => {
                let flags = role_flag_keywords(role);
                if flags.is_empty() {
                    format!("CREATE ROLE {}", quote_identifier(&role.name))
                } else {
                    format!(
                        "CREATE ROLE {} WITH {}",
                        quote_identifier(&role.name),
                        flags.join(" ")
                    )
                }
            }
            RoleChange::Drop { name } => format!("DROP ROLE {}", quote_identifier(name)),
            RoleChange::SetOptions { name, options } => format!(
                "ALTER ROLE {} WITH {}",
                quote_identifier(name),
                options.join(" ")
            ),
            RoleChange::SetConfig { name, key, value } => format!(
                "ALTER ROLE {} SET {} = {}",
                quote_identifier(name),
                key,
                quote_literal(value)
            ),
            RoleChange::ResetConfig { name, key } => {
                format!("ALTER ROLE {} RESET {}", quote_identifier(name), key)
            }
            RoleChange::ResetAllConfig { name } => {
                format!("ALTER ROLE {} RESET ALL", quote_identifier(name))
            }
            RoleChange::GrantMembership {
                group,
                member,
                admin_option,
            } => {
                let mut sql = format!(
                    "GRANT {} TO {}",
                    quote_identifier(group),
                    quote_identifier(member)
                );
                if *admin_option {
                    sql.push_str(" WITH ADMIN OPTION");
                }
                sql
            }
            RoleChange::RevokeMembership { group, member } => format!(
                "REVOKE {} FROM {}",
                quote_identifier(group),
                quote_identifier(member)
            ),
            RoleChange::Comment { name, comment } => {
                render_comment("ROLE", &quote_identifier(name), comment.as_deref())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::role::Role;
    use std::collections::BTreeMap;

    fn bare_role(name: &str) -> Role {
        Role {
            name: name.to_string(),
            superuser: false,
            createdb: false,
            createrole: false,
            inherit: true,
            login: false,
            replication: false,
            bypassrls: false,
            connection_limit: None,
            config: BTreeMap::new(),
            member_of: vec![],
            default_privileges: vec![],
            comment: None,
        }
    }

    #[test]
    fn test_create_role_with_flags() {
        let mut role = bare_role("r");
        role.superuser = true;
        role.createdb = true;
        role.inherit = false;
        role.login = true;
        role.connection_limit = Some(5);
        let op = RoleChange::Create { role };
        assert_eq!(
            op.serialize(),
            "CREATE ROLE r WITH SUPERUSER CREATEDB NOINHERIT LOGIN CONNECTION LIMIT 5"
        );
    }

    #[test]
    fn test_create_role_defaults() {
        let op = RoleChange::Create {
            role: bare_role("plain"),
        };
        assert_eq!(op.serialize(), "CREATE ROLE plain");
    }

    #[test]
    fn test_set_config() {
        let op = RoleChange::SetConfig {
            name: "app".to_string(),
            key: "search_path".to_string(),
            value: "app, public".to_string(),
        };
        assert_eq!(
            op.serialize(),
            "ALTER ROLE app SET search_path = 'app, public'"
        );
    }

    #[test]
    fn test_reset_all_config() {
        let op = RoleChange::ResetAllConfig {
            name: "app".to_string(),
        };
        assert_eq!(op.serialize(), "ALTER ROLE app RESET ALL");
    }

    #[test]
    fn test_membership() {
        let op = RoleChange::GrantMembership {
            group: "readers".to_string(),
            member: "alice".to_string(),
            admin_option: true,
        };
        assert_eq!(op.serialize(), "GRANT readers TO alice WITH ADMIN OPTION");
    }
}
