//! `.sql` tree discovery, statement splitting and annotation parsing.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::topo::classify::Phase;
use crate::topo::statement::Annotations;

/// One discovered source file, with path relative to its root.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub relative_path: String,
    pub content: String,
}

/// Collect `.sql` files under each root (recursively, via a `**/*.sql`
/// glob), sorted by relative path for deterministic ingest order. A root
/// may also name a single `.sql` file directly.
pub fn discover_sql_files(roots: &[PathBuf]) -> Result<Vec<SourceFile>> {
    let mut files = Vec::new();

    for root in roots {
        if !root.exists() {
            anyhow::bail!("root path does not exist: {}", root.display());
        }

        let mut paths: Vec<PathBuf> = if root.is_file() {
            vec![root.clone()]
        } else {
            let pattern = format!("{}/**/*.sql", root.display());
            let mut matched = Vec::new();
            for entry in glob::glob(&pattern)
                .with_context(|| format!("invalid discovery pattern {}", pattern))?
            {
                matched.push(entry.with_context(|| {
                    format!("failed to walk {}", root.display())
                })?);
            }
            matched
        };
        paths.sort();

        for path in paths {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let relative = path
                .strip_prefix(root)
                .unwrap_or(&path)
                .to_string_lossy()
                .replace('\\', "/");
            files.push(SourceFile {
                relative_path: relative,
                content,
            });
        }
    }

    Ok(files)
}

/// Split file content into statements, honoring line comments, block
/// comments, quoted strings and dollar-quoted bodies. Statements keep their
/// leading comments (annotations live there) but lose the terminating
/// semicolon.
pub fn split_statements(content: &str) -> Vec<String> {
    let bytes = content.as_bytes();
    let mut statements = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let mut depth = 1;
                i += 2;
                while i < bytes.len() && depth > 0 {
                    if bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'*') {
                        depth += 1;
                        i += 2;
                    } else if bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/') {
                        depth -= 1;
                        i += 2;
                    } else {
                        i += 1;
                    }
                }
            }
            b'\'' => {
                i += 1;
                while i < bytes.len() {
                    if bytes[i] == b'\'' {
                        if bytes.get(i + 1) == Some(&b'\'') {
                            i += 2;
                        } else {
                            i += 1;
                            break;
                        }
                    } else {
                        i += 1;
                    }
                }
            }
            b'"' => {
                i += 1;
                while i < bytes.len() && bytes[i] != b'"' {
                    i += 1;
                }
                i += 1;
            }
            b'$' => {
                // Possible dollar-quote opener: $tag$ … $tag$.
                let tag_end = content[i + 1..]
                    .find('$')
                    .map(|offset| i + 1 + offset)
                    .filter(|end| {
                        content[i + 1..*end]
                            .chars()
                            .all(|c| c.is_alphanumeric() || c == '_')
                    });
                match tag_end {
                    Some(end) => {
                        let tag = &content[i..=end];
                        match content[end + 1..].find(tag) {
                            Some(close) => i = end + 1 + close + tag.len(),
                            None => i = bytes.len(),
                        }
                    }
                    None => i += 1,
                }
            }
            b';' => {
                let statement = content[start..i].trim();
                if !statement.is_empty() {
                    statements.push(statement.to_string());
                }
                i += 1;
                start = i;
            }
            _ => i += 1,
        }
    }

    let tail = content[start..].trim();
    if !tail.is_empty() {
        statements.push(tail.to_string());
    }

    statements
}

static ANNOTATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*--\s*pgplan:(provides|requires|depends-on|phase)\s+(.+?)\s*$").unwrap()
});

/// Parse `-- pgplan:` annotations from a statement's (or file header's)
/// comment lines.
pub fn parse_annotations(text: &str) -> Annotations {
    let mut annotations = Annotations::default();

    for capture in ANNOTATION_RE.captures_iter(text) {
        let key = capture.get(1).unwrap().as_str();
        let value = capture.get(2).unwrap().as_str();
        match key {
            "provides" => annotations
                .provides
                .extend(value.split_whitespace().map(|s| s.to_string())),
            "requires" => annotations
                .requires
                .extend(value.split_whitespace().map(|s| s.to_string())),
            "depends-on" => annotations
                .depends_on
                .extend(value.split_whitespace().map(|s| s.to_string())),
            "phase" => annotations.phase = Phase::parse(value),
            _ => {}
        }
    }

    annotations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_simple() {
        let statements = split_statements("CREATE TABLE a (x int);\nCREATE TABLE b (y int);\n");
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0], "CREATE TABLE a (x int)");
    }

    #[test]
    fn test_split_respects_dollar_quotes() {
        let sql = "CREATE FUNCTION f() RETURNS void LANGUAGE plpgsql AS $$ BEGIN PERFORM 1; END; $$;\nSELECT 1;";
        let statements = split_statements(sql);
        assert_eq!(statements.len(), 2);
        assert!(statements[0].contains("PERFORM 1;"));
    }

    #[test]
    fn test_split_respects_string_literals_and_comments() {
        let sql = "INSERT INTO t VALUES ('a;b'); -- trailing; comment\nSELECT 1;";
        let statements = split_statements(sql);
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0], "INSERT INTO t VALUES ('a;b')");
    }

    #[test]
    fn test_split_tagged_dollar_quote() {
        let sql = "CREATE FUNCTION g() RETURNS void AS $body$ SELECT 'x;y'; $body$ LANGUAGE sql;";
        let statements = split_statements(sql);
        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn test_parse_annotations() {
        let text = "-- pgplan:provides table:public.users\n-- pgplan:requires schema:app\n-- pgplan:phase post_data\nCREATE TABLE ...";
        let annotations = parse_annotations(text);
        assert_eq!(annotations.provides, vec!["table:public.users"]);
        assert_eq!(annotations.requires, vec!["schema:app"]);
        assert_eq!(annotations.phase, Some(Phase::PostData));
    }

    #[test]
    fn test_discover_is_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.sql"), "SELECT 2;").unwrap();
        fs::write(dir.path().join("a.sql"), "SELECT 1;").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/c.sql"), "SELECT 3;").unwrap();

        let files = discover_sql_files(&[dir.path().to_path_buf()]).unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.relative_path.as_str()).collect();
        assert_eq!(paths, vec!["a.sql", "b.sql", "sub/c.sql"]);
    }
}
