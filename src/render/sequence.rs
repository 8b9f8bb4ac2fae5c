//! SQL rendering for sequence operations

use crate::diff::operations::{SequenceChange, SequenceOptionClause};
use crate::render::{
    quote_identifier, quote_qualified, render_change_owner, render_comment, SqlRenderer,
};

fn render_option_clause(clause: &SequenceOptionClause) -> String {
    match clause {
        SequenceOptionClause::Increment(n) => format!("INCREMENT BY {}", n),
        SequenceOptionClause::MinValue(Some(n)) => format!("MINVALUE {}", n),
        SequenceOptionClause::MinValue(None) => "NO MINVALUE".to_string(),
        SequenceOptionClause::MaxValue(Some(n)) => format!("MAXVALUE {}", n),
        SequenceOptionClause::MaxValue(None) => "NO MAXVALUE".to_string(),
        SequenceOptionClause::Start(n) => format!("START WITH {}", n),
        SequenceOptionClause::Cache(n) => format!("CACHE {}", n),
        SequenceOptionClause::Cycle(true) => "CYCLE".to_string(),
        SequenceOptionClause::Cycle(false) => "NO CYCLE".to_string(),
    }
}

impl SqlRenderer for SequenceChange {
    fn serialize(&self) -> String {
        match self {
            SequenceChange::Create { sequence } => {
                let unlogged = if sequence.unlogged { "UNLOGGED " } else { "" };
                let mut sql = format!(
                    "CREATE {}SEQUENCE {}",
                    unlogged,
                    quote_qualified(&sequence.schema, &sequence.name)
                );
                if sequence.data_type != "bigint" {
                    sql.push_str(&format!(" AS {}", sequence.data_type));
                }
                if sequence.increment != 1 {
                    sql.push_str(&format!(" INCREMENT BY {}", sequence.increment));
                }
                if let Some(min) = sequence.min_value {
                    sql.push_str(&format!(" MINVALUE {}", min));
                }
                if let Some(max) = sequence.max_value {
                    sql.push_str(&format!(" MAXVALUE {}", max));
                }
                if sequence.start_value != 1 {
                    sql.push_str(&format!(" START WITH {}", sequence.start_value));
                }
                if sequence.cache != 1 {
                    sql.push_str(&format!(" CACHE {}", sequence.cache));
                }
                if sequence.cycle {
                    sql.push_str(" CYCLE");
                }
                sql
            }
            SequenceChange::Drop { schema, name } => {
                format!("DROP SEQUENCE {}", quote_qualified(schema, name))
            }
            SequenceChange::SetOptions {
                schema,
                name,
                options,
            } => {
                let clauses: Vec<String> = options.iter().map(render_option_clause).collect();
                format!(
                    "ALTER SEQUENCE {} {}",
                    quote_qualified(schema, name),
                    clauses.join(" ")
                )
            }
            SequenceChange::OwnedBy {
                schema,
                name,
                owned_by,
            } => {
                let target = match owned_by {
                    Some(owner) => format!(
                        "{}.{}",
                        quote_qualified(&owner.schema, &owner.table),
                        quote_identifier(&owner.column)
                    ),
                    None => "NONE".to_string(),
                };
                format!(
                    "ALTER SEQUENCE {} OWNED BY {}",
                    quote_qualified(schema, name),
                    target
                )
            }
            SequenceChange::ChangeOwner {
                schema,
                name,
                owner,
            } => render_change_owner("SEQUENCE", &quote_qualified(schema, name), owner),
            SequenceChange::Comment {
                schema,
                name,
                comment,
            } => render_comment("SEQUENCE", &quote_qualified(schema, name), comment.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sequence::{Sequence, SequenceOwner};

    fn sequence() -> Sequence {
        Sequence {
            schema: "public".to_string(),
            name: "s".to_string(),
            data_type: "bigint".to_string(),
            unlogged: false,
            increment: 1,
            min_value: None,
            max_value: None,
            start_value: 1,
            cache: 1,
            cycle: false,
            owned_by: None,
            owner: "postgres".to_string(),
            comment: None,
            privileges: vec![],
        }
    }

    #[test]
    fn test_create_sequence_with_options() {
        let mut s = sequence();
        s.data_type = "integer".to_string();
        s.increment = 2;
        s.min_value = Some(5);
        s.max_value = Some(100);
        s.start_value = 10;
        s.cache = 3;
        s.cycle = true;
        let op = SequenceChange::Create { sequence: s };
        assert_eq!(
            op.serialize(),
            "CREATE SEQUENCE public.s AS integer INCREMENT BY 2 MINVALUE 5 MAXVALUE 100 START WITH 10 CACHE 3 CYCLE"
        );
    }

    #[test]
    fn test_create_sequence_defaults() {
        let op = SequenceChange::Create {
            sequence: sequence(),
        };
        assert_eq!(op.serialize(), "CREATE SEQUENCE public.s");
    }

    #[test]
    fn test_reset_options() {
        let op = SequenceChange::SetOptions {
            schema: "public".to_string(),
            name: "s".to_string(),
            options: vec![
                SequenceOptionClause::Increment(1),
                SequenceOptionClause::MinValue(None),
                SequenceOptionClause::MaxValue(None),
                SequenceOptionClause::Start(1),
                SequenceOptionClause::Cache(1),
                SequenceOptionClause::Cycle(false),
            ],
        };
        assert_eq!(
            op.serialize(),
            "ALTER SEQUENCE public.s INCREMENT BY 1 NO MINVALUE NO MAXVALUE START WITH 1 CACHE 1 NO CYCLE"
        );
    }

    #[test]
    fn test_owned_by() {
        let op = SequenceChange::OwnedBy {
            schema: "public".to_string(),
            name: "s".to_string(),
            owned_by: Some(SequenceOwner {
                schema: "public".to_string(),
                table: "t".to_string(),
                column: "id".to_string(),
            }),
        };
        assert_eq!(op.serialize(), "ALTER SEQUENCE public.s OWNED BY public.t.id");

        let none = SequenceChange::OwnedBy {
            schema: "public".to_string(),
            name: "s".to_string(),
            owned_by: None,
        };
        assert_eq!(none.serialize(), "ALTER SEQUENCE public.s OWNED BY NONE");
    }
}
