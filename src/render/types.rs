//! SQL rendering for enum, composite and range type operations

use crate::diff::operations::{
    CompositeTypeChange, EnumChange, EnumValuePosition, RangeChange,
};
use crate::render::{
    quote_identifier, quote_literal, quote_qualified, render_change_owner, render_comment,
    SqlRenderer,
};

impl SqlRenderer for EnumChange {
    fn serialize(&self) -> String {
        match self {
            EnumChange::Create { enum_type } => {
                let labels: Vec<String> = enum_type
                    .sorted_labels()
                    .iter()
                    .map(|l| quote_literal(&l.name))
                    .collect();
                format!(
                    "CREATE TYPE {} AS ENUM ({})",
                    quote_qualified(&enum_type.schema, &enum_type.name),
                    labels.join(",")
                )
            }
            EnumChange::Drop { schema, name } => {
                format!("DROP TYPE {}", quote_qualified(schema, name))
            }
            EnumChange::AddValue {
                schema,
                name,
                value,
                position,
            } => {
                let placement = match position {
                    EnumValuePosition::Before(neighbor) => {
                        format!(" BEFORE {}", quote_literal(neighbor))
                    }
                    EnumValuePosition::After(neighbor) => {
                        format!(" AFTER {}", quote_literal(neighbor))
                    }
                    EnumValuePosition::Last => String::new(),
                };
                format!(
                    "ALTER TYPE {} ADD VALUE {}{}",
                    quote_qualified(schema, name),
                    quote_literal(value),
                    placement
                )
            }
            EnumChange::ChangeOwner {
                schema,
                name,
                owner,
            } => render_change_owner("TYPE", &quote_qualified(schema, name), owner),
            EnumChange::Comment {
                schema,
                name,
                comment,
            } => render_comment("TYPE", &quote_qualified(schema, name), comment.as_deref()),
        }
    }
}

impl SqlRenderer for CompositeTypeChange {
    fn serialize(&self) -> String {
        match self {
            CompositeTypeChange::Create { composite, .. } => {
                let attributes: Vec<String> = composite
                    .attributes
                    .iter()
                    .map(|attr| {
                        let mut part =
                            format!("{} {}", quote_identifier(&attr.name), attr.data_type);
                        if let Some(collation) = &attr.collation {
                            part.push_str(&format!(" COLLATE {}", quote_identifier(collation)));
                        }
                        part
                    })
                    .collect();
                format!(
                    "CREATE TYPE {} AS ({})",
                    quote_qualified(&composite.schema, &composite.name),
                    attributes.join(", ")
                )
            }
            CompositeTypeChange::Drop { schema, name } => {
                format!("DROP TYPE {}", quote_qualified(schema, name))
            }
            CompositeTypeChange::ChangeOwner {
                schema,
                name,
                owner,
            } => render_change_owner("TYPE", &quote_qualified(schema, name), owner),
            CompositeTypeChange::Comment {
                schema,
                name,
                comment,
            } => render_comment("TYPE", &quote_qualified(schema, name), comment.as_deref()),
        }
    }
}

impl SqlRenderer for RangeChange {
    fn serialize(&self) -> String {
        match self {
            RangeChange::Create { range, .. } => {
                let mut parts = vec![format!("subtype = {}", range.subtype)];
                if let Some(opclass) = &range.subtype_opclass {
                    parts.push(format!("subtype_opclass = {}", opclass));
                }
                if let Some(collation) = &range.collation {
                    parts.push(format!("collation = {}", quote_identifier(collation)));
                }
                if let Some(canonical) = &range.canonical {
                    parts.push(format!("canonical = {}", canonical));
                }
                if let Some(diff) = &range.subtype_diff {
                    parts.push(format!("subtype_diff = {}", diff));
                }
                format!(
                    "CREATE TYPE {} AS RANGE ({})",
                    quote_qualified(&range.schema, &range.name),
                    parts.join(", ")
                )
            }
            RangeChange::Drop { schema, name } => {
                format!("DROP TYPE {}", quote_qualified(schema, name))
            }
            RangeChange::ChangeOwner {
                schema,
                name,
                owner,
            } => render_change_owner("TYPE", &quote_qualified(schema, name), owner),
            RangeChange::Comment {
                schema,
                name,
                comment,
            } => render_comment("TYPE", &quote_qualified(schema, name), comment.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::custom_type::{EnumLabel, EnumType};

    fn enum_type(labels: &[(&str, f64)]) -> EnumType {
        EnumType {
            schema: "public".to_string(),
            name: "e".to_string(),
            labels: labels
                .iter()
                .map(|(name, order)| EnumLabel {
                    name: name.to_string(),
                    sort_order: *order,
                })
                .collect(),
            owner: "postgres".to_string(),
            comment: None,
            privileges: vec![],
        }
    }

    #[test]
    fn test_create_enum() {
        let op = EnumChange::Create {
            enum_type: enum_type(&[("a", 1.0), ("b", 2.0)]),
        };
        assert_eq!(op.serialize(), "CREATE TYPE public.e AS ENUM ('a','b')");
    }

    #[test]
    fn test_add_value_after() {
        let op = EnumChange::AddValue {
            schema: "public".to_string(),
            name: "e".to_string(),
            value: "c".to_string(),
            position: EnumValuePosition::After("b".to_string()),
        };
        assert_eq!(op.serialize(), "ALTER TYPE public.e ADD VALUE 'c' AFTER 'b'");
    }

    #[test]
    fn test_add_value_before() {
        let op = EnumChange::AddValue {
            schema: "public".to_string(),
            name: "e".to_string(),
            value: "b".to_string(),
            position: EnumValuePosition::Before("c".to_string()),
        };
        assert_eq!(
            op.serialize(),
            "ALTER TYPE public.e ADD VALUE 'b' BEFORE 'c'"
        );
    }
}
