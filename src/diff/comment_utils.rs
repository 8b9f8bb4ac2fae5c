//! Comment reconciliation shared by every per-kind differ.

/// Decide whether a comment change statement is needed when an object is
/// altered. `Some(payload)` means emit one COMMENT statement; a `None`
/// payload serializes as `IS NULL` (PostgreSQL's way to drop a comment).
pub fn diff_comment(main: &Option<String>, branch: &Option<String>) -> Option<Option<String>> {
    match (main, branch) {
        (None, Some(comment)) => Some(Some(comment.clone())),
        (Some(_), None) => Some(None),
        (Some(old), Some(new)) if old != new => Some(Some(new.clone())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_comment() {
        assert_eq!(diff_comment(&None, &None), None);
        assert_eq!(
            diff_comment(&None, &Some("a".into())),
            Some(Some("a".to_string()))
        );
        assert_eq!(diff_comment(&Some("a".into()), &None), Some(None));
        assert_eq!(
            diff_comment(&Some("a".into()), &Some("b".into())),
            Some(Some("b".to_string()))
        );
        assert_eq!(diff_comment(&Some("a".into()), &Some("a".into())), None);
    }
}
