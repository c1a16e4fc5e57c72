// ── Tag set helpers ──
//
// Device tags are an unordered set on the service side. Merges here keep
// first-seen order so summaries and request bodies are stable.

use indexmap::IndexSet;

/// Tag marking a switch as safe to overwrite.
pub const UNDEPLOYED_TAG: &str = "undeployed";

/// Tag appended to a target after a migration, naming its source.
pub fn migration_marker(source_serial: &str) -> String {
    format!("migrated-from-{source_serial}")
}

/// Union of tag lists, in order of first appearance, without duplicates
/// or blank entries.
pub fn merge_tags<'a, I, S>(groups: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a [S]>,
    S: AsRef<str> + 'a,
{
    let mut merged: IndexSet<String> = IndexSet::new();
    for group in groups {
        for tag in group {
            let tag = tag.as_ref().trim();
            if !tag.is_empty() {
                merged.insert(tag.to_owned());
            }
        }
    }
    merged.into_iter().collect()
}

/// `tags` with `tag` appended, or `None` when it is already present.
pub fn with_tag(tags: &[String], tag: &str) -> Option<Vec<String>> {
    if tags.iter().any(|t| t == tag) {
        return None;
    }
    Some(merge_tags([tags, &[tag.to_owned()][..]]))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn merge_preserves_existing_order_and_dedups() {
        let target = vec!["floor-2".to_string(), "idf".to_string()];
        let source = vec!["idf".to_string(), "voice".to_string()];
        let marker = [migration_marker("Q2AA")];

        let merged = merge_tags([&target[..], &source[..], &marker[..]]);
        assert_eq!(merged, vec!["floor-2", "idf", "voice", "migrated-from-Q2AA"]);
    }

    #[test]
    fn with_tag_is_idempotent() {
        let tags = vec!["floor-2".to_string()];
        let once = with_tag(&tags, UNDEPLOYED_TAG).unwrap_or_default();
        assert_eq!(once, vec!["floor-2", "undeployed"]);
        assert_eq!(with_tag(&once, UNDEPLOYED_TAG), None);
    }
}
